//! Fauna HTTP client
//!
//! Implements [`QueryService`] on top of the Fauna FQL v4 HTTP endpoint. Each
//! query is a single JSON POST; failures are classified into transient and
//! fatal errors so the fetch loop knows what to retry.

use super::{query, wire};
use crate::adapters::service::{PageRequest, QueryService};
use crate::config::DatabaseConfig;
use crate::domain::{Collection, DumpError, Page, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;

/// API version header sent with every query
const API_VERSION: &str = "4";

/// Fauna client
///
/// # Example
///
/// ```no_run
/// use fauna_dump::adapters::fauna::FaunaClient;
/// use fauna_dump::adapters::service::QueryService;
/// use fauna_dump::config::{secret_string, DatabaseConfig};
///
/// # async fn example() -> fauna_dump::domain::Result<()> {
/// let config = DatabaseConfig {
///     secret: secret_string("fnAE...".to_string()),
///     ..Default::default()
/// };
/// let client = FaunaClient::new(&config)?;
/// let collections = client.list_collections().await?;
/// # Ok(())
/// # }
/// ```
pub struct FaunaClient {
    /// Query endpoint URL
    endpoint: String,

    /// HTTP client for making requests
    client: Client,

    /// Database configuration (holds the secret)
    config: DatabaseConfig,
}

impl FaunaClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DumpError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
            config: config.clone(),
        })
    }

    /// Execute one query expression and return its decoded resource
    async fn query(&self, expr: &Value) -> Result<Value> {
        tracing::trace!(endpoint = %self.endpoint, query = %expr, "Executing FQL query");

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.config.secret.expose_secret())
            .header("X-FaunaDB-API-Version", API_VERSION)
            .json(expr)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    DumpError::Connectivity(e.to_string())
                } else {
                    DumpError::TransientQuery(e.to_string())
                }
            })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| DumpError::TransientQuery(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<wire::ErrorResponse>(&body)
                .map(|errors| errors.summary())
                .unwrap_or(body);
            return Err(classify_status(status, message));
        }

        let response: wire::QueryResponse = serde_json::from_str(&body).map_err(|e| {
            DumpError::FatalQuery(format!("malformed response: {e}"))
        })?;

        Ok(wire::unwrap_objects(response.resource))
    }
}

/// Map a non-success HTTP status to an error
///
/// Contention, throttling and server-side failures are transient; every
/// other status means the request itself is wrong.
fn classify_status(status: StatusCode, message: String) -> DumpError {
    let message = format!("status {status}: {message}");
    if status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::CONFLICT
        || status.is_server_error()
    {
        DumpError::TransientQuery(message)
    } else {
        DumpError::FatalQuery(message)
    }
}

#[async_trait]
impl QueryService for FaunaClient {
    async fn list_collections(&self) -> Result<Vec<Collection>> {
        let mut collections = Vec::new();
        let mut after = None;

        loop {
            let resource = self.query(&query::list_collections(after.as_ref())).await?;
            let (page, next) = wire::decode_collections(resource)?;
            collections.extend(page);

            match next {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        tracing::debug!(
            endpoint = %self.endpoint,
            count = collections.len(),
            "Listed collections"
        );

        Ok(collections)
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page> {
        let resource = self.query(&query::page(request)).await?;
        wire::decode_page(resource)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
