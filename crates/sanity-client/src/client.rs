//! Content API client implementation
//!
//! This module implements read access to the Sanity content API: GROQ query
//! requests, the response envelope, error handling, and the HTTP client with
//! retry logic.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Status used for failures that never produced an HTTP response
pub const TRANSPORT_FAILURE_STATUS: u16 = 1;

// =============================================================================
// Error Types
// =============================================================================

/// Content API error with HTTP status and message
///
/// This represents errors returned from the query endpoint, including both
/// network failures and malformed responses.
///
/// # Examples
/// ```
/// use sanity_client::client::ContentError;
///
/// let error = ContentError::new(400, "queryParseError", "unexpected token");
/// assert_eq!(error.status(), 400);
/// assert!(!error.is_network_error());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentError {
    /// HTTP status code
    status: u16,
    /// Error code (e.g., "queryParseError", "NetworkError")
    code: String,
    /// Human-readable error message
    message: String,
}

impl ContentError {
    /// Create a new content error
    pub fn new(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Get the HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Get the error code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a network-related error that should be retried
    ///
    /// Transport failures carry status 1; the rest are gateway and throttling
    /// statuses: 408, 425, 429, 500, 502, 503, 504, 522, 524
    pub fn is_network_error(&self) -> bool {
        matches!(
            self.status,
            TRANSPORT_FAILURE_STATUS | 408 | 425 | 429 | 500 | 502 | 503 | 504 | 522 | 524
        )
    }

    /// Check if the response arrived but could not be decoded
    pub fn is_decode_error(&self) -> bool {
        self.code == "ParseError"
    }
}

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Content error {}: {} - {}",
            self.status, self.code, self.message
        )
    }
}

impl std::error::Error for ContentError {}

// =============================================================================
// Request Types
// =============================================================================

/// GROQ query request
///
/// Parameters are sent as `$name=<json>` pairs next to the `query` pair, the
/// way the query endpoint expects them.
#[derive(Debug, Clone)]
pub struct ContentRequest {
    /// GROQ query text
    pub query: String,
    /// Query parameters, referenced as `$name` inside the query
    pub params: HashMap<String, serde_json::Value>,
    /// Request headers
    pub headers: HashMap<String, String>,
}

impl ContentRequest {
    /// Create a new GROQ query request
    pub fn groq(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: HashMap::new(),
            headers: HashMap::new(),
        }
    }

    /// Bind a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Query-string pairs for this request, `query` first then sorted params
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("query".to_string(), self.query.clone())];
        let mut params: Vec<_> = self.params.iter().collect();
        params.sort_by_key(|(k, _)| *k);
        for (key, value) in params {
            pairs.push((format!("${}", key), value.to_string()));
        }
        pairs
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Successful query response
#[derive(Debug, Clone)]
pub struct ContentResponse<T> {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Decoded `result` field
    pub data: T,
    /// Server-side query time in milliseconds
    pub ms: Option<u64>,
}

impl<T> ContentResponse<T> {
    /// Create a new response
    pub fn new(status: u16, headers: HashMap<String, String>, data: T) -> Self {
        Self {
            status,
            headers,
            data,
            ms: None,
        }
    }

    /// Get a header value
    pub fn header(&self, key: &str) -> Option<&String> {
        self.headers.get(key)
    }

    /// Check if the response is successful (2xx status)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Envelope the query endpoint wraps results in
#[derive(Debug, Clone, Deserialize)]
struct QueryEnvelope<T> {
    result: T,
    #[serde(default)]
    ms: Option<u64>,
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for the content client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SanityConfig {
    /// Project identifier
    pub project_id: String,
    /// Dataset name
    pub dataset: String,
    /// Dated API version (e.g., "v2025-07-21")
    pub api_version: String,
    /// Use the cached CDN host for reads
    pub use_cdn: bool,
    /// Explicit API host, overriding the derived project host
    pub api_host: Option<String>,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Custom headers to include in all requests
    pub default_headers: HashMap<String, String>,
    /// Retries for network-class failures
    pub max_retries: usize,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            project_id: "or9vpa2z".to_string(),
            dataset: "production".to_string(),
            api_version: "v2025-07-21".to_string(),
            use_cdn: true,
            api_host: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("Portfolio/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
            max_retries: 2,
        }
    }
}

impl SanityConfig {
    /// Create a new config for a project
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Default::default()
        }
    }

    /// Set the dataset
    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = dataset.into();
        self
    }

    /// Set the API version
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Enable or disable the CDN host
    pub fn with_cdn(mut self, use_cdn: bool) -> Self {
        self.use_cdn = use_cdn;
        self
    }

    /// Point the client at an explicit host
    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = Some(host.into());
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the retry budget
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> String {
        match &self.api_host {
            Some(host) => host.trim_end_matches('/').to_string(),
            None => {
                let host = if self.use_cdn { "apicdn" } else { "api" };
                format!("https://{}.{}.sanity.io", self.project_id, host)
            }
        }
    }

    /// Full query endpoint URL
    pub fn query_url(&self) -> String {
        format!(
            "{}/{}/data/query/{}",
            self.base_url(),
            self.api_version,
            self.dataset
        )
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

// =============================================================================
// Error Response Format
// =============================================================================

/// Error body returned for rejected queries
#[derive(Debug, Clone, Deserialize)]
struct QueryErrorResponse {
    error: QueryErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
struct QueryErrorBody {
    description: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Flat error body used by the gateway (auth, rate limits)
#[derive(Debug, Clone, Deserialize)]
struct FlatErrorResponse {
    error: String,
    #[serde(default)]
    message: String,
}

fn error_from_body(status: u16, body: &str) -> ContentError {
    if let Ok(parsed) = serde_json::from_str::<QueryErrorResponse>(body) {
        let code = parsed.error.kind.unwrap_or_else(|| "QueryError".to_string());
        return ContentError::new(status, code, parsed.error.description);
    }
    if let Ok(parsed) = serde_json::from_str::<FlatErrorResponse>(body) {
        return ContentError::new(status, parsed.error, parsed.message);
    }
    ContentError::new(status, "Unknown", format!("HTTP {}: {}", status, body))
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Retry Logic with Exponential Backoff
// =============================================================================

use std::future::Future;
use tokio::time::sleep;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: usize,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier (e.g., 2.0 for exponential backoff)
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration
    pub fn new(max_retries: usize) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Set the initial delay
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Delay before the given retry attempt (0-based), capped at `max_delay`
    fn delay_for(&self, attempt: usize) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);

        Duration::from_millis(delay_ms as u64).min(self.max_delay)
    }
}

/// Retry an async operation while `should_retry` accepts its error
///
/// The first attempt is not counted against `max_retries`; the error of the
/// final attempt is returned once the budget is spent.
pub async fn retry<F, Fut, T, E>(
    config: RetryConfig,
    should_retry: impl Fn(&E) -> bool,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempts = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(err) => {
                if !should_retry(&err) || attempts >= config.max_retries {
                    return Err(err);
                }

                let delay = config.delay_for(attempts);
                tracing::debug!(attempt = attempts + 1, ?delay, "retrying content request");
                sleep(delay).await;
                attempts += 1;
            }
        }
    }
}

/// Retry only network-class content errors
pub async fn network_retry<F, Fut, T>(config: RetryConfig, operation: F) -> Result<T, ContentError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ContentError>>,
{
    retry(config, |err: &ContentError| err.is_network_error(), operation).await
}

// =============================================================================
// Retry Tests
// =============================================================================

#[cfg(test)]
mod retry_tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Hands out scripted statuses; 200 succeeds with the attempt number
    struct Script {
        statuses: RefCell<VecDeque<u16>>,
        attempts: RefCell<usize>,
    }

    impl Script {
        fn new(statuses: &[u16]) -> Self {
            Self {
                statuses: RefCell::new(statuses.iter().copied().collect()),
                attempts: RefCell::new(0),
            }
        }

        fn attempt(&self) -> std::future::Ready<Result<usize, ContentError>> {
            let n = {
                let mut attempts = self.attempts.borrow_mut();
                *attempts += 1;
                *attempts
            };
            let status = self.statuses.borrow_mut().pop_front().unwrap_or(200);
            std::future::ready(match status {
                200 => Ok(n),
                status => Err(ContentError::new(status, "Status", format!("attempt {}", n))),
            })
        }

        fn attempts(&self) -> usize {
            *self.attempts.borrow()
        }
    }

    #[tokio::test]
    async fn test_first_success_is_not_retried() {
        let script = Script::new(&[]);
        let result = network_retry(RetryConfig::new(3), || script.attempt()).await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(script.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gateway_errors_are_retried() {
        let script = Script::new(&[502, TRANSPORT_FAILURE_STATUS]);
        let result = network_retry(RetryConfig::new(3), || script.attempt()).await;

        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_query_errors_are_not_retried() {
        let script = Script::new(&[400]);
        let result = network_retry(RetryConfig::new(3), || script.attempt()).await;

        assert_eq!(result.unwrap_err().status(), 400);
        assert_eq!(script.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhaustion_returns_last_error() {
        let script = Script::new(&[503, 503, 504, 503]);
        let result = network_retry(RetryConfig::new(2), || script.attempt()).await;

        let err = result.unwrap_err();
        assert_eq!(err.status(), 504);
        assert_eq!(err.message(), "attempt 3");
        assert_eq!(script.attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_predicate() {
        let script = Script::new(&[404, 404]);
        let result = retry(
            RetryConfig::new(5),
            |err: &ContentError| err.status() == 404,
            || script.attempt(),
        )
        .await;

        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn test_delay_doubles_up_to_cap() {
        let config = RetryConfig::new(4)
            .with_initial_delay(Duration::from_millis(250))
            .with_max_delay(Duration::from_secs(1));

        let delays: Vec<Duration> = (0..4).map(|n| config.delay_for(n)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(250),
                Duration::from_millis(500),
                Duration::from_secs(1),
                Duration::from_secs(1),
            ]
        );
    }
}

// =============================================================================
// Client Implementation
// =============================================================================

use reqwest::{Client as ReqwestClient, Response as ReqwestResponse};

/// Client for read queries against the content API
///
/// # Examples
/// ```no_run
/// use sanity_client::{ContentRequest, SanityClient, SanityConfig};
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let client = SanityClient::new(SanityConfig::default())?;
///
///     let request = ContentRequest::groq(r#"count(*[_type == "photo"])"#);
///     let response = client.fetch::<u64>(request).await?;
///
///     println!("{} photos", response.data);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SanityClient {
    /// HTTP client
    client: ReqwestClient,
    /// Configuration
    config: SanityConfig,
}

impl SanityClient {
    /// Create a new content client
    pub fn new(config: SanityConfig) -> crate::Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Run a query once
    pub async fn fetch<T>(&self, request: ContentRequest) -> Result<ContentResponse<T>, ContentError>
    where
        T: DeserializeOwned,
    {
        self.execute_request(&request).await
    }

    /// Run a query, retrying network-class failures up to `max_retries`
    pub async fn fetch_with_retry<T>(
        &self,
        request: ContentRequest,
    ) -> Result<ContentResponse<T>, ContentError>
    where
        T: DeserializeOwned,
    {
        let config = RetryConfig::new(self.config.max_retries);
        network_retry(config, || self.execute_request(&request)).await
    }

    async fn execute_request<T>(
        &self,
        request: &ContentRequest,
    ) -> Result<ContentResponse<T>, ContentError>
    where
        T: DeserializeOwned,
    {
        let url = self.config.query_url();
        let mut req = self.client.get(&url).query(&request.query_pairs());

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }
        for (key, value) in &request.headers {
            req = req.header(key, value);
        }

        let response = req.send().await.map_err(|e| {
            ContentError::new(
                TRANSPORT_FAILURE_STATUS,
                "NetworkError",
                format!("Request failed: {}", e),
            )
        })?;

        self.parse_response(response).await
    }

    async fn parse_response<T>(
        &self,
        response: ReqwestResponse,
    ) -> Result<ContentResponse<T>, ContentError>
    where
        T: DeserializeOwned,
    {
        let status = response.status().as_u16();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(key.to_string(), value_str.to_string());
            }
        }

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let error = error_from_body(status, &error_body);
            tracing::warn!(status, code = error.code(), "content query rejected");
            return Err(error);
        }

        let body = response.text().await.map_err(|e| {
            ContentError::new(
                TRANSPORT_FAILURE_STATUS,
                "NetworkError",
                format!("Failed to read response: {}", e),
            )
        })?;

        let envelope: QueryEnvelope<T> = serde_json::from_str(&body).map_err(|e| {
            ContentError::new(status, "ParseError", format!("Failed to parse JSON: {}", e))
        })?;

        Ok(ContentResponse {
            status,
            headers,
            data: envelope.result,
            ms: envelope.ms,
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &SanityConfig {
        &self.config
    }
}
