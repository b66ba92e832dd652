//! Get trait for fetching single resources.

use async_trait::async_trait;

use crate::client::HighbondClient;
use crate::error::Result;
use crate::jsonapi::Document;
use crate::parallel::{execute_parallel, BatchResult};
use crate::query::include_param;
use crate::traits::Resource;

/// Fetch a single resource by id.
///
/// # Example
///
/// ```ignore
/// use highbond::{HighbondClient, Issue, Get};
///
/// let client = HighbondClient::from_env()?;
/// let issue = Issue::get(&client, 42, &["owner_user"]).await?;
/// println!("{:?}", issue.data.title());
/// ```
#[async_trait]
pub trait Get: Resource {
    /// Fetch the resource by id.
    ///
    /// # Arguments
    ///
    /// * `client` - The HighBond API client
    /// * `id` - The resource id
    /// * `include` - Relationships to side-load
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is not found or the request fails.
    async fn get(client: &HighbondClient, id: u64, include: &[&str]) -> Result<Document<Self>> {
        let path = Self::member_path(client, id);
        let query: Vec<(&str, String)> = include_param(include)
            .map(|value| ("include", value))
            .into_iter()
            .collect();
        client.get_json(&path, &query).await
    }

    /// Fetch several resources concurrently.
    ///
    /// Uses the client's threading config. Outcomes line up with `ids`; a
    /// failed fetch does not affect the others.
    async fn get_many(
        client: &HighbondClient,
        ids: Vec<u64>,
        include: &[&str],
    ) -> BatchResult<Document<Self>> {
        execute_parallel(
            |id| Self::get(client, id, include),
            ids,
            client.threading(),
        )
        .await
    }
}
