//! Project type resource.

use serde::Serialize;

use super::resource;
use crate::client::HighbondClient;
use crate::jsonapi::ResourceParams;
use crate::traits::{Delete, Get, List, Resource, Update};

resource!(
    /// A project type: the template that configures terminology and
    /// allowed field values for the projects based on it.
    ProjectType,
    "project_types"
);

impl ProjectType {
    pub fn name(&self) -> Option<&str> {
        self.attribute_str("name")
    }
}

/// Parameters for updating a project type.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectTypeUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ResourceParams for ProjectTypeUpdateParams {}

impl Get for ProjectType {}

impl List for ProjectType {
    type Scope = ();

    fn collection_path(client: &HighbondClient, _scope: &()) -> String {
        client.org_path(Self::TYPE)
    }
}

impl Update for ProjectType {
    type Params = ProjectTypeUpdateParams;
}

impl Delete for ProjectType {}
