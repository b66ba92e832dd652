//! Objective resource and trait implementations.
//!
//! Objectives (sections or processes) group the risks and controls of a
//! project.

use serde::Serialize;

use super::resource;
use crate::client::HighbondClient;
use crate::jsonapi::{is_none_or_empty, CustomAttribute, ResourceParams};
use crate::traits::{Create, Delete, Get, List, Update};

resource!(
    /// A project objective.
    Objective,
    "objectives"
);

impl Objective {
    pub fn title(&self) -> Option<&str> {
        self.attribute_str("title")
    }

    pub fn reference(&self) -> Option<&str> {
        self.attribute_str("reference")
    }
}

/// Parameters for creating an objective.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ObjectiveCreateParams {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub division_department: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub executive_owner: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    #[serde(skip_serializing_if = "is_none_or_empty")]
    pub custom_attributes: Option<Vec<CustomAttribute>>,
}

impl ObjectiveCreateParams {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

impl ResourceParams for ObjectiveCreateParams {}

/// Parameters for updating an objective.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ObjectiveUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub division_department: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub executive_owner: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<Vec<CustomAttribute>>,
}

impl ResourceParams for ObjectiveUpdateParams {}

impl Get for Objective {}

impl List for Objective {
    /// Project id.
    type Scope = u64;

    fn collection_path(client: &HighbondClient, project_id: &u64) -> String {
        client.org_path(&format!("projects/{project_id}/objectives"))
    }
}

impl Create for Objective {
    /// Project id.
    type Parent = u64;
    type Params = ObjectiveCreateParams;

    fn create_path(client: &HighbondClient, project_id: &u64) -> String {
        Self::collection_path(client, project_id)
    }
}

impl Update for Objective {
    type Params = ObjectiveUpdateParams;
}

impl Delete for Objective {}
