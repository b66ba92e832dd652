//! Trait definitions for HighBond operations.
//!
//! Each resource type implements the traits its endpoints support. Most
//! operations have default implementations driven by the resource's type
//! name and paths, so an implementation usually only states where the
//! collection lives.

mod create;
mod delete;
mod get;
mod list;
mod update;

pub use create::Create;
pub use delete::Delete;
pub use get::Get;
pub use list::List;
pub use update::Update;

use serde::de::DeserializeOwned;

use crate::client::HighbondClient;
use crate::jsonapi::ResourceObject;

/// A JSON:API resource type exposed by the HighBond API.
pub trait Resource: From<ResourceObject> + DeserializeOwned + Send + Sync + 'static {
    /// JSON:API type name, also the path segment (e.g., "issues").
    const TYPE: &'static str;

    /// Path of a single resource, relative to the API base.
    fn member_path(client: &HighbondClient, id: u64) -> String {
        client.org_path(&format!("{}/{id}", Self::TYPE))
    }

    /// The underlying resource object.
    fn object(&self) -> &ResourceObject;
}
