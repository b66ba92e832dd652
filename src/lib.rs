//! HighBond API client library.
//!
//! A Rust library for the HighBond (Diligent One) GRC REST API. Endpoints
//! speak JSON:API; each operation (Get, List, Create, Update, Delete) is a
//! trait that resource types implement, with default implementations built
//! on two shared engines:
//!
//! - [`paginate`] walks a collection page by page as a lazy [`Stream`](futures::Stream)
//! - [`execute_parallel`] runs a batch of calls with bounded concurrency
//!
//! # Quick Start
//!
//! ```no_run
//! use futures::TryStreamExt;
//! use highbond::{Get, HighbondClient, Issue, IssueCreateParams, Create, List, ListQuery, Scope};
//!
//! #[tokio::main]
//! async fn main() -> highbond::Result<()> {
//!     // Create client from environment variables
//!     let client = HighbondClient::from_env()?;
//!
//!     // Walk every open issue of a project
//!     let query = ListQuery::new().filter("status", "open");
//!     let issues: Vec<Issue> = Issue::list_all(&client, &Scope::Project(12), &query, None)
//!         .try_collect()
//!         .await?;
//!     println!("Found {} open issues", issues.len());
//!
//!     // Fetch several issues concurrently
//!     let batch = Issue::get_many(&client, vec![1, 2, 3], &[]).await;
//!     for (index, error) in batch.failures() {
//!         eprintln!("issue #{index} failed: {error}");
//!     }
//!
//!     // Create an issue
//!     let created = Issue::create(
//!         &client,
//!         12,
//!         IssueCreateParams {
//!             owner: Some("thomas@sodor.ca".to_string()),
//!             ..IssueCreateParams::new("Access reviews not performed", "Deficiency")
//!         },
//!     )
//!     .await?;
//!     println!("Created issue {}", created.data.id);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! [`HighbondClient::from_env`] reads:
//!
//! - `HIGHBOND_API_TOKEN` (required) - API access token
//! - `HIGHBOND_ORG_ID` (required) - Organization id
//! - `HIGHBOND_API_URL` (optional) - Explicit base URL
//! - `HIGHBOND_REGION` (optional) - `us`, `eu`, `au`, `ca` or `sa` (default `us`)
//! - `HIGHBOND_PAGE_SIZE`, `HIGHBOND_MAX_PAGES` (optional) - Pagination defaults
//! - `HIGHBOND_MAX_WORKERS`, `HIGHBOND_TIMEOUT_SECS` (optional) - Batch defaults

mod client;
mod error;
mod jsonapi;
mod models;
mod output;
mod pagination;
mod parallel;
mod query;
mod traits;

// Re-export core types
pub use client::{HighbondClient, Region};
pub use error::{HighbondError, Result};
pub use jsonapi::{
    CustomAttribute, Document, Linkage, RequestBody, RequestData, ResourceIdentifier,
    ResourceObject, ResourceParams,
};
pub use output::Table;
pub use pagination::{
    clamp_page_size, collect_all, fetch_page, paginate, Page, PaginationConfig, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
pub use parallel::{execute_parallel, BatchResult, ThreadingConfig, DEFAULT_MAX_WORKERS};
pub use query::ListQuery;

// Re-export traits
pub use traits::{Create, Delete, Get, List, Resource, Update};

// Re-export models
pub use models::{
    // Projects
    Project,
    ProjectCreateParams,
    ProjectUpdateParams,
    // Project types
    ProjectType,
    ProjectTypeUpdateParams,
    // Objectives
    Objective,
    ObjectiveCreateParams,
    ObjectiveUpdateParams,
    // Risks
    CustomFactor,
    Risk,
    RiskCreateParams,
    RiskUpdateParams,
    // Controls
    Control,
    ControlCreateParams,
    ControlUpdateParams,
    // Issues
    Issue,
    IssueCreateParams,
    IssueUpdateParams,
    // Actions
    Action,
    ActionCreateParams,
    ActionScope,
    ActionUpdateParams,
    // Listing scope shared by issues and risks
    Scope,
};
