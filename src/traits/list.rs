//! List trait for fetching collections of resources.

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};

use crate::client::HighbondClient;
use crate::error::Result;
use crate::pagination::{fetch_page, paginate, Page};
use crate::query::ListQuery;
use crate::traits::Resource;

/// List resources with pagination support.
///
/// `Scope` selects which collection is listed (for example all issues of
/// the organization, or those of one project).
///
/// # Example
///
/// ```ignore
/// use futures::TryStreamExt;
/// use highbond::{HighbondClient, Issue, List, ListQuery, Scope};
///
/// let client = HighbondClient::from_env()?;
///
/// // Fetch a single page
/// let page = Issue::list_page(&client, &Scope::Project(12), &ListQuery::new(), 1, 50).await?;
///
/// // Walk every page lazily
/// let mut issues = Issue::list_all(&client, &Scope::Organization, &ListQuery::new(), None);
/// while let Some(issue) = issues.try_next().await? {
///     println!("{}", issue.id);
/// }
/// ```
#[async_trait]
pub trait List: Resource {
    /// Which collection to list.
    type Scope: Send + Sync;

    /// Path of the collection for a scope.
    fn collection_path(client: &HighbondClient, scope: &Self::Scope) -> String;

    /// List resources in a scope (single page).
    ///
    /// # Arguments
    ///
    /// * `client` - The HighBond API client
    /// * `scope` - Which collection to read
    /// * `query` - Includes and filters
    /// * `page` - Page number (1-indexed)
    /// * `page_size` - Number of items per page (max 100)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &HighbondClient,
        scope: &Self::Scope,
        query: &ListQuery,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Self>> {
        let path = Self::collection_path(client, scope);
        let page = fetch_page(client, &path, query, page, page_size).await?;
        Ok(page.map(Self::from))
    }

    /// Lazily walk every page of a scope.
    ///
    /// Uses the client's pagination config; `max_pages` overrides its page
    /// limit for this call. Nothing is requested until the stream is polled.
    fn list_all<'a>(
        client: &'a HighbondClient,
        scope: &Self::Scope,
        query: &ListQuery,
        max_pages: Option<u32>,
    ) -> BoxStream<'a, Result<Self>> {
        let mut config = client.pagination();
        if max_pages.is_some() {
            config = config.with_max_pages(max_pages);
        }
        let path = Self::collection_path(client, scope);
        paginate(client, path, config, query.clone())
            .map_ok(Self::from)
            .boxed()
    }

    /// Fetch every page of a scope into a `Vec`.
    ///
    /// # Errors
    ///
    /// Returns the first page request error.
    async fn collect_all(
        client: &HighbondClient,
        scope: &Self::Scope,
        query: &ListQuery,
    ) -> Result<Vec<Self>> {
        Self::list_all(client, scope, query, None).try_collect().await
    }
}
