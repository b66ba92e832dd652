//! Issue workflow tests against a mock HighBond server.

use chrono::{NaiveDate, Utc};
use futures::TryStreamExt;
use highbond::{
    Create, Delete, Get, HighbondClient, HighbondError, Issue, IssueCreateParams,
    IssueUpdateParams, ResourceIdentifier, ThreadingConfig, Update,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client(server: &MockServer) -> HighbondClient {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    HighbondClient::new("test-token", &format!("{}/v1", server.uri()), 1)
        .expect("Failed to create client")
}

fn issue_document(id: u64, attributes: Value) -> Value {
    json!({"data": {"type": "issues", "id": id.to_string(), "attributes": attributes}})
}

async fn single_request_body(server: &MockServer) -> Value {
    let requests: Vec<Request> = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    requests[0].body_json().expect("request body should be JSON")
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_without_owner_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    let result = Issue::create(
        &client,
        3,
        IssueCreateParams::new("Access reviews not performed", "Deficiency"),
    )
    .await;

    match result {
        Err(HighbondError::Validation { message }) => {
            assert!(message.contains("owner"));
            assert!(message.contains("owner_user_uid"));
        }
        other => panic!("Expected Validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_with_owner_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/orgs/1/projects/3/issues"))
        .respond_with(ResponseTemplate::new(201).set_body_json(issue_document(
            77,
            json!({"description": "Access reviews not performed", "owner": "thomas@sodor.ca"}),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let created = Issue::create(
        &client,
        3,
        IssueCreateParams {
            owner: Some("thomas@sodor.ca".to_string()),
            severity: Some("High".to_string()),
            ..IssueCreateParams::new("Access reviews not performed", "Deficiency")
        },
    )
    .await
    .expect("Failed to create issue");

    assert_eq!(created.data.numeric_id(), Some(77));

    let body = single_request_body(&server).await;
    assert_eq!(
        body,
        json!({"data": {
            "type": "issues",
            "attributes": {
                "description": "Access reviews not performed",
                "deficiency_type": "Deficiency",
                "owner": "thomas@sodor.ca",
                "severity": "High"
            }
        }})
    );
}

#[tokio::test]
async fn test_create_with_owner_user_and_target() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/orgs/1/projects/3/issues"))
        .respond_with(ResponseTemplate::new(201).set_body_json(issue_document(78, json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    Issue::create(
        &client,
        3,
        IssueCreateParams {
            owner_user_uid: Some("3NQ6XzAUxqJMnAQ7n4KF".to_string()),
            target: Some(ResourceIdentifier::new("controls", 12)),
            ..IssueCreateParams::new("Access reviews not performed", "Deficiency")
        },
    )
    .await
    .unwrap();

    let body = single_request_body(&server).await;
    assert!(body["data"]["attributes"].get("owner").is_none());
    assert_eq!(
        body["data"]["relationships"]["owner_user"],
        json!({"data": {"type": "users", "id": "3NQ6XzAUxqJMnAQ7n4KF"}})
    );
    assert_eq!(
        body["data"]["relationships"]["target"],
        json!({"data": {"type": "controls", "id": "12"}})
    );
}

// =============================================================================
// Update, close, reopen
// =============================================================================

#[tokio::test]
async fn test_update_sends_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/orgs/1/issues/999"))
        .and(body_json(json!({
            "data": {"type": "issues", "id": "999", "attributes": {"severity": "Low"}}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(issue_document(999, json!({"severity": "Low"}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let updated = Issue::update(
        &client,
        999,
        IssueUpdateParams {
            severity: Some("Low".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.data.severity(), Some("Low"));
}

#[tokio::test]
async fn test_close_with_explicit_date() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/orgs/1/issues/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_document(5, json!({"closed": true}))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let closed = Issue::close(
        &client,
        5,
        NaiveDate::from_ymd_opt(2024, 6, 30),
        Some("Retested, no exceptions".to_string()),
    )
    .await
    .unwrap();
    assert!(closed.data.is_closed());

    let body = single_request_body(&server).await;
    assert_eq!(
        body["data"]["attributes"],
        json!({
            "closed": true,
            "actual_remediation_date": "2024-06-30",
            "retesting_results_overview": "Retested, no exceptions"
        })
    );
}

#[tokio::test]
async fn test_close_defaults_to_today() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/orgs/1/issues/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_document(5, json!({}))))
        .mount(&server)
        .await;

    let client = client(&server);
    Issue::close(&client, 5, None, None).await.unwrap();

    let body = single_request_body(&server).await;
    let sent = body["data"]["attributes"]["actual_remediation_date"]
        .as_str()
        .unwrap()
        .to_string();
    let today = Utc::now().date_naive();
    // The request may straddle midnight UTC.
    assert!(
        sent == today.to_string() || sent == today.pred_opt().unwrap().to_string(),
        "unexpected date {sent}"
    );
    assert!(body["data"]["attributes"]
        .get("retesting_results_overview")
        .is_none());
}

#[tokio::test]
async fn test_reopen() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/orgs/1/issues/5"))
        .and(body_json(json!({
            "data": {"type": "issues", "id": "5", "attributes": {"closed": false}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_document(5, json!({"closed": false}))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let reopened = Issue::reopen(&client, 5).await.unwrap();
    assert!(!reopened.data.is_closed());
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_list_open_filters_by_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orgs/1/issues"))
        .and(query_param("filter[status]", "open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"type": "issues", "id": "1", "attributes": {"title": "A"}},
                {"type": "issues", "id": "2", "attributes": {"title": "B"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let open: Vec<Issue> = Issue::list_open(&client, &[], None).try_collect().await.unwrap();

    assert_eq!(open.len(), 2);
    assert_eq!(open[1].title(), Some("B"));
}

#[tokio::test]
async fn test_list_overdue_filters_by_due_date() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orgs/1/issues"))
        .and(query_param("filter[status]", "open"))
        .and(query_param("include", "owner_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let overdue: Vec<Issue> = Issue::list_overdue(&client, &["owner_user"], None)
        .try_collect()
        .await
        .unwrap();
    assert!(overdue.is_empty());

    let requests = server.received_requests().await.unwrap();
    let due = requests[0]
        .url
        .query_pairs()
        .find(|(key, _)| key == "filter[due_date[lt]]")
        .map(|(_, value)| value.into_owned())
        .expect("overdue filter should be sent");
    assert!(NaiveDate::parse_from_str(&due, "%Y-%m-%d").is_ok());
}

#[tokio::test]
async fn test_comments_single_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orgs/1/issues/5/comments"))
        .and(query_param("page[number]", "2"))
        .and(query_param("page[size]", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"type": "comments", "id": "40", "attributes": {"body": "Followed up"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let page = Issue::comments(&client, 5, 2, 10).await.unwrap();

    assert_eq!(page.page, 2);
    assert_eq!(page.len(), 1);
    assert_eq!(page.items[0].attribute_str("body"), Some("Followed up"));
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_add_comment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/orgs/1/issues/5/comments"))
        .and(body_json(json!({
            "data": {"type": "comments", "attributes": {"body": "Please attach evidence"}}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"type": "comments", "id": "41", "attributes": {"body": "Please attach evidence"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let comment = Issue::add_comment(&client, 5, "Please attach evidence")
        .await
        .unwrap();
    assert_eq!(comment.data.id, "41");
}

// =============================================================================
// Relationships
// =============================================================================

#[tokio::test]
async fn test_link_and_unlink_risk() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/orgs/1/issues/5/relationships/risks"))
        .and(body_json(json!({"data": [{"type": "risks", "id": "9"}]})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/orgs/1/issues/5/relationships/risks/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(Issue::link_risk(&client, 5, 9).await.unwrap(), Value::Null);
    assert_eq!(Issue::unlink_risk(&client, 5, 9).await.unwrap(), Value::Null);
}

#[tokio::test]
async fn test_link_control_and_list_controls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/orgs/1/issues/5/relationships/controls"))
        .and(body_json(json!({"data": [{"type": "controls", "id": "12"}]})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/orgs/1/issues/5/controls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"type": "controls", "id": "12", "attributes": {"title": "Review"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    Issue::link_control(&client, 5, 12).await.unwrap();
    let controls = Issue::controls(&client, 5, &[]).await.unwrap();

    assert_eq!(controls.data.len(), 1);
    assert_eq!(controls.data[0].resource_type, "controls");
}

// =============================================================================
// Batches
// =============================================================================

#[tokio::test]
async fn test_get_many_keeps_input_order() {
    let server = MockServer::start().await;
    for id in [1u64, 2, 3] {
        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/1/issues/{id}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(std::time::Duration::from_millis((4 - id) * 30))
                    .set_body_json(issue_document(id, json!({"title": format!("Issue {id}")}))),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client(&server).with_threading(ThreadingConfig::new(3));
    let batch = Issue::get_many(&client, vec![1, 2, 3], &[]).await;
    let titles: Vec<_> = batch
        .into_all()
        .unwrap()
        .into_iter()
        .map(|doc| doc.data.title().map(str::to_string))
        .collect();

    assert_eq!(
        titles,
        vec![
            Some("Issue 1".to_string()),
            Some("Issue 2".to_string()),
            Some("Issue 3".to_string())
        ]
    );
}

#[tokio::test]
async fn test_delete_many_partial_failure() {
    let server = MockServer::start().await;
    for id in [1, 3] {
        Mock::given(method("DELETE"))
            .and(path(format!("/v1/orgs/1/issues/{id}")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("DELETE"))
        .and(path("/v1/orgs/1/issues/2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let batch = Issue::delete_many(&client, vec![1, 2, 3]).await;

    assert_eq!(batch.len(), 3);
    assert!(!batch.is_success());
    assert!(matches!(batch.get(0), Some(Ok(Value::Null))));
    assert!(matches!(batch.get(2), Some(Ok(Value::Null))));

    let failures: Vec<_> = batch.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, 1);
    match failures[0].1 {
        HighbondError::NotFound { path } => assert_eq!(path, "orgs/1/issues/2"),
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_missing_issue() {
    let server = MockServer::start().await;
    let client = client(&server);

    let result = Issue::get(&client, 404, &[]).await;
    assert!(matches!(result, Err(HighbondError::NotFound { .. })));
}

#[tokio::test]
async fn test_delete_single_issue() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/orgs/1/issues/8"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(Issue::delete(&client, 8).await.unwrap(), Value::Null);
}
