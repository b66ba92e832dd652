//! Basic usage of the HighBond client.
//!
//! Lists the first page of projects, fetches a handful of open issues
//! concurrently and prints both as tables.
//!
//! Run with:
//! ```sh
//! HIGHBOND_API_TOKEN=... HIGHBOND_ORG_ID=... cargo run --example basic
//! ```

use futures::TryStreamExt;
use highbond::{Get, HighbondClient, Issue, List, ListQuery, Project, Resource, Table};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> highbond::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = HighbondClient::from_env()?;
    println!("Connected to {} (org {})", client.base_url(), client.org_id());

    let projects: Vec<Project> = Project::list_all(&client, &(), &ListQuery::new(), Some(1))
        .try_collect()
        .await?;
    println!("{}", Table::from_resources(projects.iter().map(Resource::object)));

    let open: Vec<Issue> = Issue::list_open(&client, &[], Some(1)).try_collect().await?;
    let ids: Vec<u64> = open.iter().filter_map(|issue| issue.numeric_id()).take(10).collect();

    let batch = Issue::get_many(&client, ids, &["owner_user"]).await;
    for (index, error) in batch.failures() {
        eprintln!("Failed to fetch issue #{index}: {error}");
    }

    let issues: Vec<Issue> = batch.into_iter().filter_map(Result::ok).map(|doc| doc.data).collect();
    println!("{}", Table::from_resources(issues.iter().map(Resource::object)));

    Ok(())
}
