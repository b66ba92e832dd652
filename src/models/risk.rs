//! Risk resource and trait implementations.

use futures::stream::BoxStream;
use serde::Serialize;
use serde_json::Value;

use super::{link, related, resource, unlink, Scope};
use crate::client::HighbondClient;
use crate::error::Result;
use crate::jsonapi::{
    is_none_or_empty, CustomAttribute, Document, ResourceIdentifier, ResourceObject,
    ResourceParams,
};
use crate::query::ListQuery;
use crate::traits::{Create, Delete, Get, List, Resource, Update};

resource!(
    /// A risk identified under a project objective.
    Risk,
    "risks"
);

impl Risk {
    pub fn title(&self) -> Option<&str> {
        self.attribute_str("title")
    }

    pub fn impact(&self) -> Option<&str> {
        self.attribute_str("impact")
    }

    pub fn likelihood(&self) -> Option<&str> {
        self.attribute_str("likelihood")
    }

    /// Risks of one project.
    pub fn list_by_project<'a>(
        client: &'a HighbondClient,
        project_id: u64,
        query: &ListQuery,
        max_pages: Option<u32>,
    ) -> BoxStream<'a, Result<Self>> {
        Self::list_all(client, &Scope::Project(project_id), query, max_pages)
    }

    /// Link a control to a risk.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn link_control(
        client: &HighbondClient,
        risk_id: u64,
        control_id: u64,
    ) -> Result<Value> {
        let member = Self::member_path(client, risk_id);
        link(
            client,
            &member,
            "controls",
            ResourceIdentifier::new("controls", control_id),
        )
        .await
    }

    /// Remove the link between a risk and a control.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn unlink_control(
        client: &HighbondClient,
        risk_id: u64,
        control_id: u64,
    ) -> Result<Value> {
        let member = Self::member_path(client, risk_id);
        unlink(client, &member, "controls", control_id).await
    }

    /// Controls mitigating a risk.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn controls(
        client: &HighbondClient,
        risk_id: u64,
        include: &[&str],
    ) -> Result<Document<Vec<ResourceObject>>> {
        related(client, &Self::member_path(client, risk_id), "controls", include).await
    }
}

/// Risk factor value for organizations with custom risk scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomFactor {
    pub id: String,
    pub value: String,
}

impl CustomFactor {
    pub fn new(id: impl ToString, value: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            value: value.into(),
        }
    }
}

/// Parameters for creating a risk.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RiskCreateParams {
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Reference code of the risk (e.g., "R-001").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(skip)]
    pub owner_user_uid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub likelihood: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    #[serde(skip_serializing_if = "is_none_or_empty")]
    pub custom_attributes: Option<Vec<CustomAttribute>>,

    #[serde(skip_serializing_if = "is_none_or_empty")]
    pub custom_factors: Option<Vec<CustomFactor>>,

    /// Framework risk this one was copied from.
    #[serde(skip)]
    pub framework_origin_id: Option<u64>,
}

impl RiskCreateParams {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }
}

impl ResourceParams for RiskCreateParams {
    fn owner_user_uid(&self) -> Option<&str> {
        self.owner_user_uid.as_deref()
    }

    fn relationships(&self) -> Vec<(&'static str, ResourceIdentifier)> {
        self.framework_origin_id
            .map(|id| ("framework_origin", ResourceIdentifier::new("risks", id)))
            .into_iter()
            .collect()
    }
}

/// Parameters for updating a risk.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RiskUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(skip)]
    pub owner_user_uid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub likelihood: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<Vec<CustomAttribute>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_factors: Option<Vec<CustomFactor>>,
}

impl ResourceParams for RiskUpdateParams {
    fn owner_user_uid(&self) -> Option<&str> {
        self.owner_user_uid.as_deref()
    }
}

impl Get for Risk {}

impl List for Risk {
    type Scope = Scope;

    fn collection_path(client: &HighbondClient, scope: &Scope) -> String {
        scope.path(client, Self::TYPE)
    }
}

impl Create for Risk {
    /// Objective id.
    type Parent = u64;
    type Params = RiskCreateParams;

    fn create_path(client: &HighbondClient, objective_id: &u64) -> String {
        client.org_path(&format!("objectives/{objective_id}/risks"))
    }
}

impl Update for Risk {
    type Params = RiskUpdateParams;
}

impl Delete for Risk {}
