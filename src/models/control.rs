//! Control resource and trait implementations.

use serde::Serialize;

use super::resource;
use crate::client::HighbondClient;
use crate::jsonapi::{is_none_or_empty, CustomAttribute, ResourceParams};
use crate::traits::{Create, Delete, Get, List, Update};

resource!(
    /// A control that mitigates risks under an objective.
    Control,
    "controls"
);

impl Control {
    pub fn title(&self) -> Option<&str> {
        self.attribute_str("title")
    }

    pub fn status(&self) -> Option<&str> {
        self.attribute_str("status")
    }
}

/// Parameters for creating a control.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ControlCreateParams {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Reference code of the control (e.g., "C-001").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(skip)]
    pub owner_user_uid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_type: Option<String>,

    /// "Prevent" or "Detect".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevent_detect: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    #[serde(skip_serializing_if = "is_none_or_empty")]
    pub custom_attributes: Option<Vec<CustomAttribute>>,
}

impl ControlCreateParams {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

impl ResourceParams for ControlCreateParams {
    fn owner_user_uid(&self) -> Option<&str> {
        self.owner_user_uid.as_deref()
    }
}

/// Parameters for updating a control.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ControlUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(skip)]
    pub owner_user_uid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevent_detect: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<Vec<CustomAttribute>>,
}

impl ResourceParams for ControlUpdateParams {
    fn owner_user_uid(&self) -> Option<&str> {
        self.owner_user_uid.as_deref()
    }
}

impl Get for Control {}

impl List for Control {
    /// Objective id.
    type Scope = u64;

    fn collection_path(client: &HighbondClient, objective_id: &u64) -> String {
        client.org_path(&format!("objectives/{objective_id}/controls"))
    }
}

impl Create for Control {
    /// Objective id.
    type Parent = u64;
    type Params = ControlCreateParams;

    fn create_path(client: &HighbondClient, objective_id: &u64) -> String {
        Self::collection_path(client, objective_id)
    }
}

impl Update for Control {
    type Params = ControlUpdateParams;
}

impl Delete for Control {}
