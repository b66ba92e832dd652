//! Page-by-page walking of JSON:API collection endpoints.
//!
//! [`paginate`] turns a collection endpoint into a lazy stream of resource
//! objects. Pages are requested one at a time, starting at page 1, and only
//! when the consumer has drained the previous page. Each call starts a new
//! cursor; the stream itself is single-pass.

use futures::stream::{self, Stream, TryStreamExt};
use serde::Serialize;

use crate::client::HighbondClient;
use crate::error::{HighbondError, Result};
use crate::jsonapi::{Document, ResourceObject};
use crate::query::ListQuery;

/// Largest page size the server accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Hard stop for unbounded pagination (safety limit).
const PAGE_LIMIT: u32 = 10_000;

/// A page of results from the HighBond API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages (if the server declared it).
    pub total: Option<u64>,
    /// Current page number (1-indexed).
    pub page: u32,
    /// Number of items requested per page.
    pub page_size: u32,
    /// Whether there are more pages.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Create a new page from items and pagination info.
    #[must_use]
    pub fn new(items: Vec<T>, page: u32, page_size: u32, total: Option<u64>) -> Self {
        let has_more = match total {
            Some(t) => (u64::from(page) * u64::from(page_size)) < t,
            None => !items.is_empty() && items.len() >= page_size as usize,
        };
        Self {
            items,
            total,
            page,
            page_size,
            has_more,
        }
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            has_more: self.has_more,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Page size and page-count limits for automatic pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Items per page, always within `1..=MAX_PAGE_SIZE`.
    pub page_size: u32,
    /// Stop after this many pages (`None` = until the collection ends).
    pub max_pages: Option<u32>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: None,
        }
    }
}

impl PaginationConfig {
    /// Create a config with the given page size, clamped to the server limit.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: clamp_page_size(page_size),
            max_pages: None,
        }
    }

    /// Limit the number of pages fetched. `Some(0)` means no limit.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages.filter(|&m| m > 0);
        self
    }
}

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`.
pub fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(1, MAX_PAGE_SIZE)
}

/// Position in a collection between page requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    page: u32,
    pages_fetched: u32,
    items_seen: u64,
}

impl Cursor {
    fn start() -> Self {
        Self {
            page: 1,
            pages_fetched: 0,
            items_seen: 0,
        }
    }

    /// Cursor for the next request, or `None` once the collection is done.
    fn advance(
        self,
        received: usize,
        page_size: u32,
        total: Option<u64>,
        config: PaginationConfig,
    ) -> Option<Self> {
        let pages_fetched = self.pages_fetched + 1;
        let items_seen = self.items_seen + received as u64;

        if config.max_pages.is_some_and(|max| pages_fetched >= max) {
            return None;
        }
        if received == 0 {
            return None;
        }
        if received < page_size as usize {
            return None;
        }
        if total.is_some_and(|t| items_seen >= t) {
            return None;
        }
        if pages_fetched >= PAGE_LIMIT {
            tracing::warn!("Reached pagination limit of {} pages, stopping", PAGE_LIMIT);
            return None;
        }

        Some(Self {
            page: self.page + 1,
            pages_fetched,
            items_seen,
        })
    }
}

/// Fetch a single page of a collection.
///
/// Sends `page[number]` and `page[size]` (clamped to 100) along with the
/// query's include and filter parameters.
///
/// # Errors
///
/// Returns an error if the request fails or the body is not a JSON:API
/// collection document.
#[tracing::instrument(skip(client, query))]
pub async fn fetch_page(
    client: &HighbondClient,
    path: &str,
    query: &ListQuery,
    page: u32,
    page_size: u32,
) -> Result<Page<ResourceObject>> {
    let page = page.max(1);
    let page_size = clamp_page_size(page_size);

    let mut params = vec![
        ("page[number]".to_string(), page.to_string()),
        ("page[size]".to_string(), page_size.to_string()),
    ];
    params.extend(query.to_pairs());

    let document: Document<Vec<ResourceObject>> = client.get_json(path, &params).await?;
    let total = document.declared_total();

    tracing::debug!(page, page_size, received = document.data.len(), "fetched page");
    Ok(Page::new(document.data, page, page_size, total))
}

/// Walk a collection endpoint, yielding every resource object in server order.
///
/// One GET is issued per page, strictly sequentially. The walk stops when a
/// page comes back empty or shorter than the page size, when the server's
/// declared total has been reached, or when `config.max_pages` pages have
/// been fetched. A failed request is yielded as an `Err` and ends the stream.
///
/// # Example
///
/// ```no_run
/// use futures::TryStreamExt;
/// use highbond::{paginate, HighbondClient, ListQuery};
///
/// # async fn example(client: &HighbondClient) -> highbond::Result<()> {
/// let path = client.org_path("issues");
/// let query = ListQuery::new().filter("status", "open");
/// let issues: Vec<_> = paginate(client, path, client.pagination(), query)
///     .try_collect()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub fn paginate<'a>(
    client: &'a HighbondClient,
    path: String,
    config: PaginationConfig,
    query: ListQuery,
) -> impl Stream<Item = Result<ResourceObject>> + Send + 'a {
    let page_size = clamp_page_size(config.page_size);

    stream::try_unfold(Some(Cursor::start()), move |cursor| {
        let path = path.clone();
        let query = query.clone();
        async move {
            let Some(cursor) = cursor else {
                return Ok(None);
            };
            let page = fetch_page(client, &path, &query, cursor.page, page_size).await?;
            let next = cursor.advance(page.len(), page_size, page.total, config);
            Ok::<_, HighbondError>(Some((page.items, next)))
        }
    })
    .map_ok(|items| stream::iter(items.into_iter().map(Ok)))
    .try_flatten()
}

/// Drain a paginated walk into a `Vec`, stopping at the first error.
///
/// # Errors
///
/// Returns the first page request error.
pub async fn collect_all(
    client: &HighbondClient,
    path: String,
    config: PaginationConfig,
    query: ListQuery,
) -> Result<Vec<ResourceObject>> {
    paginate(client, path, config, query).try_collect().await
}
