//! Project model and trait implementations.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::resource;
use crate::client::HighbondClient;
use crate::jsonapi::{
    is_none_or_empty, CustomAttribute, ResourceIdentifier, ResourceParams,
};
use crate::traits::{Create, Delete, Get, List, Resource, Update};

resource!(
    /// A HighBond project.
    ///
    /// Projects are the top-level containers for audit and compliance work.
    /// Each project is based on a project type, which decides the available
    /// terminology and field values, and holds objectives, risks, controls
    /// and issues.
    Project,
    "projects"
);

impl Project {
    pub fn name(&self) -> Option<&str> {
        self.attribute_str("name")
    }

    pub fn status(&self) -> Option<&str> {
        self.attribute_str("status")
    }

    /// Project state ("active", "archived", ...).
    pub fn state(&self) -> Option<&str> {
        self.attribute_str("state")
    }

    /// Tags, empty when the server sent none.
    pub fn tags(&self) -> Vec<&str> {
        self.attribute("tag_list")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Id of the project type this project is based on.
    pub fn project_type_id(&self) -> Option<&str> {
        self.related_id("project_type")
    }
}

/// Parameters for creating a project.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectCreateParams {
    pub name: String,

    /// Sent as the `project_type` relationship.
    #[serde(skip)]
    pub project_type_id: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub opinion: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_response: Option<String>,

    #[serde(skip_serializing_if = "is_none_or_empty")]
    pub tag_list: Option<Vec<String>>,

    #[serde(skip_serializing_if = "is_none_or_empty")]
    pub custom_attributes: Option<Vec<CustomAttribute>>,
}

impl ProjectCreateParams {
    pub fn new(name: impl Into<String>, project_type_id: u64) -> Self {
        Self {
            name: name.into(),
            project_type_id,
            ..Default::default()
        }
    }
}

impl ResourceParams for ProjectCreateParams {
    fn relationships(&self) -> Vec<(&'static str, ResourceIdentifier)> {
        vec![(
            "project_type",
            ResourceIdentifier::new("project_types", self.project_type_id),
        )]
    }
}

/// Parameters for updating a project.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub opinion: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_response: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_list: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<Vec<CustomAttribute>>,
}

impl ResourceParams for ProjectUpdateParams {}

// =============================================================================
// TRAIT IMPLEMENTATIONS
// =============================================================================

impl Get for Project {}

impl List for Project {
    type Scope = ();

    fn collection_path(client: &HighbondClient, _scope: &()) -> String {
        client.org_path(Self::TYPE)
    }
}

impl Create for Project {
    type Parent = ();
    type Params = ProjectCreateParams;

    fn create_path(client: &HighbondClient, _parent: &()) -> String {
        client.org_path(Self::TYPE)
    }
}

impl Update for Project {
    type Params = ProjectUpdateParams;
}

impl Delete for Project {}
