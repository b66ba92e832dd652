//! Create trait for adding resources.

use async_trait::async_trait;

use crate::client::HighbondClient;
use crate::error::Result;
use crate::jsonapi::{Document, RequestBody, ResourceParams};
use crate::traits::Resource;

/// Create a resource under a parent.
///
/// Parameters are validated before any request is made; only fields that
/// were set end up in the request's `attributes`.
///
/// # Example
///
/// ```ignore
/// use highbond::{HighbondClient, Issue, IssueCreateParams, Create};
///
/// let client = HighbondClient::from_env()?;
/// let issue = Issue::create(
///     &client,
///     123, // project id
///     IssueCreateParams {
///         owner: Some("thomas@sodor.ca".to_string()),
///         ..IssueCreateParams::new("Access reviews not performed", "Deficiency")
///     },
/// ).await?;
/// ```
#[async_trait]
pub trait Create: Resource {
    /// Identifies the parent collection (e.g., a project id).
    type Parent: Send + Sync;

    /// Parameters for the new resource.
    type Params: ResourceParams;

    /// Path the create request is posted to.
    fn create_path(client: &HighbondClient, parent: &Self::Parent) -> String;

    /// Create the resource and return it.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request if the parameters are
    /// incomplete, or an error if the request fails.
    async fn create(
        client: &HighbondClient,
        parent: Self::Parent,
        params: Self::Params,
    ) -> Result<Document<Self>> {
        let body = RequestBody::from_params(Self::TYPE, None, &params)?;
        let path = Self::create_path(client, &parent);
        client.post_json(&path, &body).await
    }
}
