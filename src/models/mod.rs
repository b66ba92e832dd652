//! HighBond resource types.
//!
//! Every resource is a thin wrapper around a [`ResourceObject`] with the
//! operation traits its endpoints support. Attribute values stay untyped
//! JSON: most of them (severity, impact, status, ...) are strings whose
//! allowed values are configured per project type.

mod action;
mod control;
mod issue;
mod objective;
mod project;
mod project_type;
mod risk;

pub use action::*;
pub use control::*;
pub use issue::*;
pub use objective::*;
pub use project::*;
pub use project_type::*;
pub use risk::*;

use serde_json::Value;

use crate::client::HighbondClient;
use crate::error::Result;
use crate::jsonapi::{Document, Linkage, ResourceIdentifier, ResourceObject};
use crate::query::include_param;

/// Declares a resource newtype over [`ResourceObject`].
macro_rules! resource {
    ($(#[$meta:meta])* $name:ident, $type_name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub crate::jsonapi::ResourceObject);

        impl From<crate::jsonapi::ResourceObject> for $name {
            fn from(object: crate::jsonapi::ResourceObject) -> Self {
                Self(object)
            }
        }

        impl From<$name> for crate::jsonapi::ResourceObject {
            fn from(resource: $name) -> Self {
                resource.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = crate::jsonapi::ResourceObject;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl crate::traits::Resource for $name {
            const TYPE: &'static str = $type_name;

            fn object(&self) -> &crate::jsonapi::ResourceObject {
                &self.0
            }
        }
    };
}

pub(crate) use resource;

/// Which issues or risks to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    /// Everything in the organization.
    #[default]
    Organization,
    /// Everything in one project.
    Project(u64),
    /// Everything under one objective of a project.
    Objective { project_id: u64, objective_id: u64 },
}

impl Scope {
    /// Collection path for resources of `type_name` in this scope.
    pub(crate) fn path(self, client: &HighbondClient, type_name: &str) -> String {
        match self {
            Self::Organization => client.org_path(type_name),
            Self::Project(project_id) => {
                client.org_path(&format!("projects/{project_id}/{type_name}"))
            }
            Self::Objective {
                project_id,
                objective_id,
            } => client.org_path(&format!(
                "projects/{project_id}/objectives/{objective_id}/{type_name}"
            )),
        }
    }
}

/// `POST <member>/relationships/<name>` linking one resource.
pub(crate) async fn link(
    client: &HighbondClient,
    member_path: &str,
    relationship: &str,
    target: ResourceIdentifier,
) -> Result<Value> {
    let path = format!("{member_path}/relationships/{relationship}");
    client.post_json(&path, &Linkage::single(target)).await
}

/// `DELETE <member>/relationships/<name>/<id>` removing one link.
pub(crate) async fn unlink(
    client: &HighbondClient,
    member_path: &str,
    relationship: &str,
    target_id: u64,
) -> Result<Value> {
    let path = format!("{member_path}/relationships/{relationship}/{target_id}");
    client.delete_json(&path).await
}

/// `GET <member>/<name>` listing related resources (single request).
pub(crate) async fn related(
    client: &HighbondClient,
    member_path: &str,
    relationship: &str,
    include: &[&str],
) -> Result<Document<Vec<ResourceObject>>> {
    let path = format!("{member_path}/{relationship}");
    let query: Vec<(&str, String)> = include_param(include)
        .map(|value| ("include", value))
        .into_iter()
        .collect();
    client.get_json(&path, &query).await
}
