//! Action resource and trait implementations.
//!
//! Actions are the remediation steps attached to an issue.

use chrono::NaiveDate;
use serde::Serialize;

use super::{resource, Issue, Scope};
use crate::client::HighbondClient;
use crate::error::Result;
use crate::jsonapi::{is_none_or_empty, CustomAttribute, ResourceParams};
use crate::parallel::execute_parallel;
use crate::query::ListQuery;
use crate::traits::{Create, Delete, Get, List, Resource, Update};

resource!(
    /// A remediation action on an issue.
    Action,
    "actions"
);

impl Action {
    pub fn title(&self) -> Option<&str> {
        self.attribute_str("title")
    }

    pub fn is_completed(&self) -> bool {
        self.attribute("completed")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }

    /// Every action of every issue in a project.
    ///
    /// Lists the project's issues, then fetches their actions concurrently
    /// with the client's threading config. Actions come back grouped by
    /// issue, in the order the issues were listed.
    ///
    /// # Errors
    ///
    /// Returns the first error in issue order if any listing fails.
    #[tracing::instrument(skip(client, query))]
    pub async fn list_by_project(
        client: &HighbondClient,
        project_id: u64,
        query: &ListQuery,
    ) -> Result<Vec<Self>> {
        let issues = Issue::collect_all(client, &Scope::Project(project_id), &ListQuery::new()).await?;
        let issue_ids: Vec<u64> = issues.iter().filter_map(|issue| issue.numeric_id()).collect();
        tracing::debug!(issues = issue_ids.len(), "listing actions per issue");

        let batch = execute_parallel(
            |issue_id| async move {
                Self::collect_all(client, &ActionScope::Issue(issue_id), query).await
            },
            issue_ids,
            client.threading(),
        )
        .await;

        Ok(batch.into_all()?.into_iter().flatten().collect())
    }
}

/// Which actions to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionScope {
    /// Every action in the organization.
    #[default]
    Organization,
    /// Actions of one issue.
    Issue(u64),
}

/// Parameters for creating an action.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActionCreateParams {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(skip)]
    pub owner_user_uid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    #[serde(skip_serializing_if = "is_none_or_empty")]
    pub custom_attributes: Option<Vec<CustomAttribute>>,
}

impl ActionCreateParams {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

impl ResourceParams for ActionCreateParams {
    fn owner_user_uid(&self) -> Option<&str> {
        self.owner_user_uid.as_deref()
    }
}

/// Parameters for updating an action.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActionUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(skip)]
    pub owner_user_uid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<Vec<CustomAttribute>>,
}

impl ResourceParams for ActionUpdateParams {
    fn owner_user_uid(&self) -> Option<&str> {
        self.owner_user_uid.as_deref()
    }
}

impl Get for Action {}

impl List for Action {
    type Scope = ActionScope;

    fn collection_path(client: &HighbondClient, scope: &ActionScope) -> String {
        match scope {
            ActionScope::Organization => client.org_path(Self::TYPE),
            ActionScope::Issue(issue_id) => client.org_path(&format!("issues/{issue_id}/actions")),
        }
    }
}

impl Create for Action {
    /// Issue id.
    type Parent = u64;
    type Params = ActionCreateParams;

    fn create_path(client: &HighbondClient, issue_id: &u64) -> String {
        Self::collection_path(client, &ActionScope::Issue(*issue_id))
    }
}

impl Update for Action {
    type Params = ActionUpdateParams;
}

impl Delete for Action {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonapi::RequestBody;
    use serde_json::json;

    #[test]
    fn test_action_paths() {
        let client = HighbondClient::new("token", "https://apis-us.highbond.com/v1", 7).unwrap();

        assert_eq!(
            Action::collection_path(&client, &ActionScope::Organization),
            "orgs/7/actions"
        );
        assert_eq!(Action::create_path(&client, &21), "orgs/7/issues/21/actions");
        assert_eq!(Action::member_path(&client, 3), "orgs/7/actions/3");
    }

    #[test]
    fn test_create_body_dates() {
        let params = ActionCreateParams {
            due_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            completed: Some(false),
            ..ActionCreateParams::new("Revoke stale accounts")
        };
        let body =
            serde_json::to_value(RequestBody::from_params("actions", None, &params).unwrap())
                .unwrap();

        assert_eq!(
            body["data"]["attributes"],
            json!({"title": "Revoke stale accounts", "due_date": "2025-03-01", "completed": false})
        );
    }
}
