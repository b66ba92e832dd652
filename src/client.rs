//! HighBond API client.
//!
//! Low-level HTTP client that handles authentication and raw JSON requests.
//! Higher-level operations are implemented via traits on resource types.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{HighbondError, Result};
use crate::pagination::PaginationConfig;
use crate::parallel::ThreadingConfig;

const USER_AGENT: &str = concat!("highbond-rs/", env!("CARGO_PKG_VERSION"));

/// Regional HighBond API deployments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Region {
    /// United States.
    #[default]
    Us,
    /// Europe.
    Eu,
    /// Australia.
    Au,
    /// Canada.
    Ca,
    /// South America.
    Sa,
}

impl Region {
    /// Short region code used in host names.
    pub fn code(self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Eu => "eu",
            Self::Au => "au",
            Self::Ca => "ca",
            Self::Sa => "sa",
        }
    }

    /// Base URL of the API for this region.
    pub fn base_url(self) -> String {
        match self {
            Self::Sa => "https://apis-sa.diligentoneplatform.com/v1".to_string(),
            other => format!("https://apis-{}.highbond.com/v1", other.code()),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = HighbondError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(Self::Us),
            "eu" => Ok(Self::Eu),
            "au" => Ok(Self::Au),
            "ca" => Ok(Self::Ca),
            "sa" => Ok(Self::Sa),
            _ => Err(HighbondError::InvalidConfig {
                name: "HIGHBOND_REGION",
                value: s.to_string(),
            }),
        }
    }
}

/// Low-level HighBond API client.
///
/// Handles authentication and HTTP requests, and carries the organization
/// id plus the default pagination and threading settings that resource
/// operations use. Resource-specific operations are implemented via the
/// `Get`, `List`, `Create`, `Update` and `Delete` traits on model types.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use highbond::{HighbondClient, PaginationConfig};
///
/// # fn example() -> highbond::Result<()> {
/// // Create from environment variables
/// let client = HighbondClient::from_env()?;
///
/// // Or configure manually
/// let client = HighbondClient::new("your-token", "https://apis-us.highbond.com/v1", 1234)?
///     .with_pagination(PaginationConfig::new(100));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HighbondClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
    org_id: u64,
    pagination: PaginationConfig,
    threading: ThreadingConfig,
}

impl fmt::Debug for HighbondClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighbondClient")
            .field("base_url", &self.base_url.as_str())
            .field("org_id", &self.org_id)
            .field("pagination", &self.pagination)
            .field("threading", &self.threading)
            .finish_non_exhaustive()
    }
}

impl HighbondClient {
    /// Create a client from environment variables.
    ///
    /// Reads `HIGHBOND_API_TOKEN` and `HIGHBOND_ORG_ID` (both required).
    /// The base URL comes from `HIGHBOND_API_URL` when set, otherwise from
    /// `HIGHBOND_REGION` (defaults to `us`). `HIGHBOND_PAGE_SIZE`,
    /// `HIGHBOND_MAX_PAGES`, `HIGHBOND_MAX_WORKERS` and
    /// `HIGHBOND_TIMEOUT_SECS` override the pagination and threading
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does
    /// not parse.
    pub fn from_env() -> Result<Self> {
        let token = env::var("HIGHBOND_API_TOKEN").map_err(|_| {
            HighbondError::ConfigMissing(
                "HIGHBOND_API_TOKEN environment variable not set".to_string(),
            )
        })?;

        let org_id: u64 = env_parse("HIGHBOND_ORG_ID")?.ok_or_else(|| {
            HighbondError::ConfigMissing("HIGHBOND_ORG_ID environment variable not set".to_string())
        })?;

        let base_url = match env::var("HIGHBOND_API_URL") {
            Ok(url) => url,
            Err(_) => match env::var("HIGHBOND_REGION") {
                Ok(region) => region.parse::<Region>()?.base_url(),
                Err(_) => Region::default().base_url(),
            },
        };

        let mut pagination = PaginationConfig::default();
        if let Some(size) = env_parse("HIGHBOND_PAGE_SIZE")? {
            pagination = PaginationConfig::new(size).with_max_pages(pagination.max_pages);
        }
        if let Some(max_pages) = env_parse("HIGHBOND_MAX_PAGES")? {
            pagination = pagination.with_max_pages(Some(max_pages));
        }

        let mut threading = ThreadingConfig::default();
        if let Some(workers) = env_parse("HIGHBOND_MAX_WORKERS")? {
            threading = ThreadingConfig::new(workers).with_timeout(threading.timeout);
        }
        if let Some(secs) = env_parse::<u64>("HIGHBOND_TIMEOUT_SECS")? {
            threading = threading.with_timeout(Some(Duration::from_secs(secs)));
        }

        Ok(Self::new(&token, &base_url, org_id)?
            .with_pagination(pagination)
            .with_threading(threading))
    }

    /// Create a new client for a region.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn for_region(token: &str, region: Region, org_id: u64) -> Result<Self> {
        Self::new(token, &region.base_url(), org_id)
    }

    /// Create a new client with the provided token, base URL and organization.
    ///
    /// # Arguments
    ///
    /// * `token` - HighBond API token
    /// * `base_url` - Base URL for the API (e.g., `https://apis-us.highbond.com/v1`)
    /// * `org_id` - Organization all requests are scoped to
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str, org_id: u64) -> Result<Self> {
        // Ensure base URL ends with / so relative joins keep the version segment
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(HighbondError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: token.to_string(),
            org_id,
            pagination: PaginationConfig::default(),
            threading: ThreadingConfig::default(),
        })
    }

    /// Replace the default pagination settings.
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Replace the default threading settings.
    #[must_use]
    pub fn with_threading(mut self, threading: ThreadingConfig) -> Self {
        self.threading = threading;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Organization id every request is scoped to.
    pub fn org_id(&self) -> u64 {
        self.org_id
    }

    /// Default pagination settings.
    pub fn pagination(&self) -> PaginationConfig {
        self.pagination
    }

    /// Default threading settings for batch operations.
    pub fn threading(&self) -> ThreadingConfig {
        self.threading
    }

    /// Path of an organization-scoped endpoint, relative to the base URL.
    pub fn org_path(&self, suffix: &str) -> String {
        format!("orgs/{}/{}", self.org_id, suffix.trim_start_matches('/'))
    }

    /// Make a GET request with query parameters and decode the JSON body.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(HighbondError::HttpError)?;

        Self::read_json(Self::check_response(response, path).await?).await
    }

    /// Make a POST request with a JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(HighbondError::HttpError)?;

        Self::read_json(Self::check_response(response, path).await?).await
    }

    /// Make a PATCH request with a JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn patch_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .patch(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(HighbondError::HttpError)?;

        Self::read_json(Self::check_response(response, path).await?).await
    }

    /// Make a DELETE request.
    ///
    /// Successful deletes usually answer `204 No Content`, which comes back
    /// as `Value::Null`.
    #[tracing::instrument(skip(self))]
    pub async fn delete_json(&self, path: &str) -> Result<Value> {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(HighbondError::HttpError)?;

        Self::read_json(Self::check_response(response, path).await?).await
    }

    /// Decode a response body, treating an empty body as JSON `null`.
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await.map_err(HighbondError::HttpError)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response, path: &str) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(HighbondError::NotFound {
                path: path.to_string(),
            });
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(HighbondError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;
        tracing::debug!(status = status.as_u16(), %message, "request failed");
        Err(HighbondError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        if let Ok(json) = serde_json::from_str::<Value>(&body) {
            if let Some(msg) = json_api_error(&json) {
                return msg;
            }
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }
    }
}

/// First `errors[].detail` (or `title`) of a JSON:API error document.
fn json_api_error(json: &Value) -> Option<String> {
    let first = json.get("errors")?.as_array()?.first()?;
    first
        .get("detail")
        .or_else(|| first.get("title"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Read and parse an optional environment variable.
fn env_parse<T: FromStr>(name: &'static str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| HighbondError::InvalidConfig { name, value: raw }),
        Err(_) => Ok(None),
    }
}
