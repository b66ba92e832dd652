//! Update trait for modifying resources.

use async_trait::async_trait;

use crate::client::HighbondClient;
use crate::error::Result;
use crate::jsonapi::{Document, RequestBody, ResourceParams};
use crate::traits::Resource;

/// Update an existing resource.
///
/// Fields left as `None` are not sent and stay unchanged on the server.
///
/// # Example
///
/// ```ignore
/// use highbond::{HighbondClient, Risk, RiskUpdateParams, Update};
///
/// let client = HighbondClient::from_env()?;
/// let updated = Risk::update(
///     &client,
///     456,
///     RiskUpdateParams {
///         impact: Some("Low".to_string()),
///         ..Default::default()
///     },
/// ).await?;
/// ```
#[async_trait]
pub trait Update: Resource {
    /// Parameters for the update.
    type Params: ResourceParams;

    /// Update the resource and return the updated version.
    ///
    /// # Arguments
    ///
    /// * `client` - The HighBond API client
    /// * `id` - The resource id
    /// * `params` - Update parameters
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is not found or the request fails.
    async fn update(client: &HighbondClient, id: u64, params: Self::Params) -> Result<Document<Self>> {
        let body = RequestBody::from_params(Self::TYPE, Some(id), &params)?;
        client.patch_json(&Self::member_path(client, id), &body).await
    }
}
