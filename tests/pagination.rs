//! Pagination tests against a mock HighBond server.
//!
//! These tests count the requests each walk makes and check the exact
//! query parameters on the wire.

use futures::{StreamExt, TryStreamExt};
use highbond::{
    paginate, HighbondClient, HighbondError, List, ListQuery, PaginationConfig, Project, Risk,
    Scope,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HighbondClient {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    HighbondClient::new("test-token", &format!("{}/v1", server.uri()), 1)
        .expect("Failed to create client")
}

/// A collection document with `count` projects numbered from `first`.
fn projects_page(first: usize, count: usize) -> Value {
    let data: Vec<Value> = (first..first + count)
        .map(|n| {
            json!({
                "type": "projects",
                "id": n.to_string(),
                "attributes": {"name": format!("Project {n}")}
            })
        })
        .collect();
    json!({ "data": data })
}

async fn mount_page(server: &MockServer, page: u32, body: Value, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/orgs/1/projects"))
        .and(query_param("page[number]", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_walks_every_page_until_short_page() {
    let server = MockServer::start().await;
    mount_page(&server, 1, projects_page(1, 100), 1).await;
    mount_page(&server, 2, projects_page(101, 100), 1).await;
    mount_page(&server, 3, projects_page(201, 37), 1).await;

    let client = client(&server).with_pagination(PaginationConfig::new(100));
    let projects: Vec<Project> = Project::list_all(&client, &(), &ListQuery::new(), None)
        .try_collect()
        .await
        .expect("Failed to list projects");

    assert_eq!(projects.len(), 237);
    assert_eq!(projects[0].id, "1");
    assert_eq!(projects[236].id, "237");
    assert_eq!(projects[100].name(), Some("Project 101"));
}

#[tokio::test]
async fn test_max_pages_stops_early() {
    let server = MockServer::start().await;
    mount_page(&server, 1, projects_page(1, 100), 1).await;
    mount_page(&server, 2, projects_page(101, 100), 1).await;
    mount_page(&server, 3, projects_page(201, 37), 0).await;

    let client = client(&server).with_pagination(PaginationConfig::new(100));
    let projects: Vec<Project> = Project::list_all(&client, &(), &ListQuery::new(), Some(2))
        .try_collect()
        .await
        .unwrap();

    assert_eq!(projects.len(), 200);
}

#[tokio::test]
async fn test_client_default_max_pages() {
    let server = MockServer::start().await;
    mount_page(&server, 1, projects_page(1, 10), 1).await;
    mount_page(&server, 2, projects_page(11, 10), 0).await;

    let client = client(&server).with_pagination(PaginationConfig::new(10).with_max_pages(Some(1)));
    let projects = Project::collect_all(&client, &(), &ListQuery::new())
        .await
        .unwrap();

    assert_eq!(projects.len(), 10);
}

#[tokio::test]
async fn test_empty_collection_makes_one_request() {
    let server = MockServer::start().await;
    mount_page(&server, 1, json!({"data": []}), 1).await;

    let client = client(&server);
    let projects = Project::collect_all(&client, &(), &ListQuery::new())
        .await
        .unwrap();

    assert!(projects.is_empty());
}

#[tokio::test]
async fn test_declared_total_stops_on_exact_multiple() {
    let server = MockServer::start().await;
    let mut first = projects_page(1, 10);
    first["meta"] = json!({"total": 20});
    let mut second = projects_page(11, 10);
    second["meta"] = json!({"total": 20});
    mount_page(&server, 1, first, 1).await;
    mount_page(&server, 2, second, 1).await;
    mount_page(&server, 3, json!({"data": []}), 0).await;

    let client = client(&server).with_pagination(PaginationConfig::new(10));
    let projects = Project::collect_all(&client, &(), &ListQuery::new())
        .await
        .unwrap();

    assert_eq!(projects.len(), 20);
}

#[tokio::test]
async fn test_nothing_requested_until_polled() {
    let server = MockServer::start().await;
    mount_page(&server, 1, projects_page(1, 100), 1).await;
    mount_page(&server, 2, projects_page(101, 5), 0).await;

    let client = client(&server).with_pagination(PaginationConfig::new(100));
    let mut stream = Project::list_all(&client, &(), &ListQuery::new(), None);

    assert_eq!(server.received_requests().await.unwrap().len(), 0);

    // Draining the first page must not fetch the second.
    for _ in 0..100 {
        stream.next().await.unwrap().unwrap();
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    drop(stream);
}

#[tokio::test]
async fn test_query_parameters_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orgs/1/projects/5/risks"))
        .and(query_param("page[number]", "1"))
        .and(query_param("page[size]", "25"))
        .and(query_param("include", "owner_user,project"))
        .and(query_param("filter[impact]", "High"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).with_pagination(PaginationConfig::new(25));
    let query = ListQuery::new()
        .includes(["owner_user", "project"])
        .filter("impact", "High");
    let risks = Risk::collect_all(&client, &Scope::Project(5), &query)
        .await
        .unwrap();

    assert!(risks.is_empty());
}

#[tokio::test]
async fn test_page_size_is_clamped_to_server_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orgs/1/projects"))
        .and(query_param("page[size]", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let page = Project::list_page(&client, &(), &ListQuery::new(), 1, 500)
        .await
        .unwrap();

    assert_eq!(page.page_size, 100);
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_error_mid_walk_ends_the_stream() {
    let server = MockServer::start().await;
    mount_page(&server, 1, projects_page(1, 10), 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/orgs/1/projects"))
        .and(query_param("page[number]", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "errors": [{"status": "500", "detail": "database unavailable"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let results: Vec<_> = paginate(
        &client,
        client.org_path("projects"),
        PaginationConfig::new(10),
        ListQuery::new(),
    )
    .collect()
    .await;

    assert_eq!(results.len(), 11);
    assert!(results[..10].iter().all(Result::is_ok));
    match &results[10] {
        Err(HighbondError::ApiError {
            message,
            status_code,
        }) => {
            assert_eq!(message, "database unavailable");
            assert_eq!(*status_code, Some(500));
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }
}
