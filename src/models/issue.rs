//! Issue resource and trait implementations.
//!
//! Issues are findings, deficiencies or audit observations that need
//! follow-up and remediation. They are created inside a project and can be
//! linked to risks and controls.

use chrono::{DateTime, NaiveDate, Utc};
use futures::stream::BoxStream;
use serde::Serialize;
use serde_json::Value;

use super::{link, related, resource, unlink, Scope};
use crate::client::HighbondClient;
use crate::error::{HighbondError, Result};
use crate::jsonapi::{
    is_none_or_empty, CustomAttribute, Document, RequestBody, ResourceIdentifier, ResourceObject,
    ResourceParams,
};
use crate::pagination::{fetch_page, Page};
use crate::query::ListQuery;
use crate::traits::{Create, Delete, Get, List, Resource, Update};

resource!(
    /// A HighBond issue.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use futures::TryStreamExt;
    /// use highbond::{HighbondClient, Issue};
    ///
    /// let client = HighbondClient::from_env()?;
    /// let open: Vec<Issue> = Issue::list_open(&client, &[], None).try_collect().await?;
    /// for issue in open {
    ///     println!("{} {:?}", issue.id, issue.title());
    /// }
    /// ```
    Issue,
    "issues"
);

impl Issue {
    pub fn title(&self) -> Option<&str> {
        self.attribute_str("title")
    }

    pub fn severity(&self) -> Option<&str> {
        self.attribute_str("severity")
    }

    pub fn deficiency_type(&self) -> Option<&str> {
        self.attribute_str("deficiency_type")
    }

    /// Whether the issue is closed (missing means open).
    pub fn is_closed(&self) -> bool {
        self.attribute("closed")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// All open issues of the organization (`filter[status]=open`).
    pub fn list_open<'a>(
        client: &'a HighbondClient,
        include: &[&str],
        max_pages: Option<u32>,
    ) -> BoxStream<'a, Result<Self>> {
        let query = ListQuery::new()
            .includes(include.iter().copied())
            .filter("status", "open");
        Self::list_all(client, &Scope::Organization, &query, max_pages)
    }

    /// Open issues whose due date is before today (UTC).
    pub fn list_overdue<'a>(
        client: &'a HighbondClient,
        include: &[&str],
        max_pages: Option<u32>,
    ) -> BoxStream<'a, Result<Self>> {
        let today = Utc::now().date_naive();
        let query = ListQuery::new()
            .includes(include.iter().copied())
            .filter("status", "open")
            .filter("due_date[lt]", today.format("%Y-%m-%d"));
        Self::list_all(client, &Scope::Organization, &query, max_pages)
    }

    /// Close an issue.
    ///
    /// `actual_remediation_date` defaults to today (UTC).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn close(
        client: &HighbondClient,
        issue_id: u64,
        actual_remediation_date: Option<NaiveDate>,
        retesting_results_overview: Option<String>,
    ) -> Result<Document<Self>> {
        let params = IssueUpdateParams {
            closed: Some(true),
            actual_remediation_date: Some(
                actual_remediation_date.unwrap_or_else(|| Utc::now().date_naive()),
            ),
            retesting_results_overview,
            ..Default::default()
        };
        Self::update(client, issue_id, params).await
    }

    /// Reopen a closed issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn reopen(client: &HighbondClient, issue_id: u64) -> Result<Document<Self>> {
        let params = IssueUpdateParams {
            closed: Some(false),
            ..Default::default()
        };
        Self::update(client, issue_id, params).await
    }

    /// Link a risk to an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn link_risk(client: &HighbondClient, issue_id: u64, risk_id: u64) -> Result<Value> {
        let member = Self::member_path(client, issue_id);
        link(client, &member, "risks", ResourceIdentifier::new("risks", risk_id)).await
    }

    /// Remove the link between an issue and a risk.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn unlink_risk(client: &HighbondClient, issue_id: u64, risk_id: u64) -> Result<Value> {
        let member = Self::member_path(client, issue_id);
        unlink(client, &member, "risks", risk_id).await
    }

    /// Link a control to an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn link_control(
        client: &HighbondClient,
        issue_id: u64,
        control_id: u64,
    ) -> Result<Value> {
        let member = Self::member_path(client, issue_id);
        link(
            client,
            &member,
            "controls",
            ResourceIdentifier::new("controls", control_id),
        )
        .await
    }

    /// Remove the link between an issue and a control.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn unlink_control(
        client: &HighbondClient,
        issue_id: u64,
        control_id: u64,
    ) -> Result<Value> {
        let member = Self::member_path(client, issue_id);
        unlink(client, &member, "controls", control_id).await
    }

    /// Risks linked to an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn risks(
        client: &HighbondClient,
        issue_id: u64,
        include: &[&str],
    ) -> Result<Document<Vec<ResourceObject>>> {
        related(client, &Self::member_path(client, issue_id), "risks", include).await
    }

    /// Controls linked to an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn controls(
        client: &HighbondClient,
        issue_id: u64,
        include: &[&str],
    ) -> Result<Document<Vec<ResourceObject>>> {
        related(client, &Self::member_path(client, issue_id), "controls", include).await
    }

    /// One page of comments on an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn comments(
        client: &HighbondClient,
        issue_id: u64,
        page: u32,
        page_size: u32,
    ) -> Result<Page<ResourceObject>> {
        let path = format!("{}/comments", Self::member_path(client, issue_id));
        fetch_page(client, &path, &ListQuery::new(), page, page_size).await
    }

    /// Add a comment to an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn add_comment(
        client: &HighbondClient,
        issue_id: u64,
        body: &str,
    ) -> Result<Document<ResourceObject>> {
        let path = format!("{}/comments", Self::member_path(client, issue_id));
        let request = RequestBody::new("comments").attribute("body", body);
        client.post_json(&path, &request).await
    }
}

/// Parameters for creating an issue.
///
/// `description` and `deficiency_type` are required, plus one of `owner`
/// (free-text name or email) or `owner_user_uid` (a HighBond user, which
/// takes precedence and is sent as the `owner_user` relationship).
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueCreateParams {
    pub description: String,

    /// Deficiency type, as configured in the project type (e.g., "Deficiency").
    pub deficiency_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(skip)]
    pub owner_user_uid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Visible to all roles (`true`) or hidden from some (`false`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identified_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_impact: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub executive_summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub executive_owner: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_owner: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation_status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation_plan: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_remediation_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub retest_deadline_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_retest_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub retesting_results_overview: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    #[serde(skip_serializing_if = "is_none_or_empty")]
    pub custom_attributes: Option<Vec<CustomAttribute>>,

    /// Resource the issue is about (defaults to the project). Sent as the
    /// `target` relationship, e.g. `ResourceIdentifier::new("controls", 12)`.
    #[serde(skip)]
    pub target: Option<ResourceIdentifier>,
}

impl IssueCreateParams {
    /// Parameters with the two required text fields set.
    pub fn new(description: impl Into<String>, deficiency_type: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            deficiency_type: deficiency_type.into(),
            ..Default::default()
        }
    }
}

impl ResourceParams for IssueCreateParams {
    fn validate(&self) -> Result<()> {
        if self.owner.is_none() && self.owner_user_uid.is_none() {
            return Err(HighbondError::validation(
                "an issue needs an owner: provide either 'owner' (name or email) or 'owner_user_uid' (user id)",
            ));
        }
        Ok(())
    }

    fn owner_user_uid(&self) -> Option<&str> {
        self.owner_user_uid.as_deref()
    }

    fn relationships(&self) -> Vec<(&'static str, ResourceIdentifier)> {
        self.target
            .clone()
            .map(|target| ("target", target))
            .into_iter()
            .collect()
    }
}

/// Parameters for updating an issue. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deficiency_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(skip)]
    pub owner_user_uid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identified_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_impact: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub executive_summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub executive_owner: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_owner: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation_status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation_plan: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_remediation_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub retest_deadline_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_retest_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub retesting_results_overview: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    /// `Some(vec![])` clears all custom attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<Vec<CustomAttribute>>,
}

impl ResourceParams for IssueUpdateParams {
    fn owner_user_uid(&self) -> Option<&str> {
        self.owner_user_uid.as_deref()
    }
}

// =============================================================================
// TRAIT IMPLEMENTATIONS
// =============================================================================

impl Get for Issue {}

impl List for Issue {
    type Scope = Scope;

    fn collection_path(client: &HighbondClient, scope: &Scope) -> String {
        scope.path(client, Self::TYPE)
    }
}

impl Create for Issue {
    /// Project id.
    type Parent = u64;
    type Params = IssueCreateParams;

    fn create_path(client: &HighbondClient, project_id: &u64) -> String {
        Scope::Project(*project_id).path(client, Self::TYPE)
    }
}

impl Update for Issue {
    type Params = IssueUpdateParams;
}

impl Delete for Issue {}
