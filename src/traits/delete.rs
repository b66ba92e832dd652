//! Delete trait for removing resources.

use async_trait::async_trait;
use serde_json::Value;

use crate::client::HighbondClient;
use crate::error::Result;
use crate::parallel::{execute_parallel, BatchResult};
use crate::traits::Resource;

/// Delete resources. Deletion is irreversible.
#[async_trait]
pub trait Delete: Resource {
    /// Delete one resource, returning the response body (`Null` when empty).
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is not found or the request fails.
    async fn delete(client: &HighbondClient, id: u64) -> Result<Value> {
        client.delete_json(&Self::member_path(client, id)).await
    }

    /// Delete several resources concurrently.
    ///
    /// Every id gets its own outcome: an id that is already gone fails on
    /// its own without stopping the remaining deletes.
    async fn delete_many(client: &HighbondClient, ids: Vec<u64>) -> BatchResult<Value> {
        execute_parallel(|id| Self::delete(client, id), ids, client.threading()).await
    }
}
