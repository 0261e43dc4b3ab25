//! REST transport implementation using reqwest.
//!
//! [`RestTransport`] owns the HTTP connection pool, base URL, credentials and
//! retry policy. [`RestService`] binds a transport to one resource endpoint
//! and implements [`ResourceService`] over it:
//!
//! | Operation | Request                          | Success |
//! |-----------|----------------------------------|---------|
//! | `list`    | `GET {base}/{endpoint}`          | 200     |
//! | `create`  | `POST {base}/{endpoint}`         | 201     |
//! | `update`  | `PATCH {base}/{endpoint}{id}/`   | 200     |
//! | `delete`  | `DELETE {base}/{endpoint}{id}/`  | 204     |
//!
//! Any other status is mapped to an [`Error`] whose kind follows the status
//! and whose message is taken from the server's JSON body when present.

use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

use crate::auth::TokenCredentials;
use crate::config::{RetryCause, RetryConfig, TlsConfig};
use crate::error::ErrorKind;
use crate::transport::traits::ResourceService;
use crate::user_agent;
use crate::{Error, Record, Result};

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the server's correlation ID.
const REQUEST_ID_HEADER: &str = "x-request-id";

// ============================================================================
// REST Transport
// ============================================================================

/// Shared HTTP connection to the data service.
///
/// Cheap to clone; clones share the connection pool and the credentials.
#[derive(Clone)]
pub struct RestTransport {
    client: reqwest::Client,
    base_url: Url,
    credentials: TokenCredentials,
    retry_config: RetryConfig,
}

impl fmt::Debug for RestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestTransport")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl RestTransport {
    /// Creates a new REST transport builder.
    pub fn builder() -> RestTransportBuilder {
        RestTransportBuilder::new()
    }

    /// Creates a transport with the given configuration.
    ///
    /// A missing trailing slash is added to `base_url` so endpoint paths
    /// resolve beneath it.
    pub fn new(
        mut base_url: Url,
        credentials: TokenCredentials,
        tls_config: &TlsConfig,
        retry_config: RetryConfig,
        timeout: Duration,
    ) -> Result<Self> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client_builder = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent::user_agent());

        let client = apply_tls(client_builder, tls_config)?
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            credentials,
            retry_config,
        })
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the credentials sent with every request.
    pub fn credentials(&self) -> &TokenCredentials {
        &self.credentials
    }

    /// Resolves a path relative to the base URL.
    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::configuration(format!("Invalid URL path {:?}: {}", path, e)))
    }

    /// Builds default headers for requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(auth_value) = self.credentials.authorization() {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value)
                    .map_err(|_| Error::unauthorized("Invalid auth token format"))?,
            );
        }

        Ok(headers)
    }

    /// Makes a GET request and parses the JSON body.
    pub(crate) async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(Method::GET, path, None).await?;
        handle_response(response).await
    }

    /// Makes a POST request with a JSON body.
    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode_body(body)?;
        let response = self.send(Method::POST, path, Some(&body)).await?;
        handle_response(response).await
    }

    /// Makes a PATCH request with a JSON body.
    pub(crate) async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode_body(body)?;
        let response = self.send(Method::PATCH, path, Some(&body)).await?;
        handle_response(response).await
    }

    /// Makes a DELETE request. The response body is ignored.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let response = self.send(Method::DELETE, path, None).await?;
        handle_error_response(response).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let url = self.url(path)?;
        let headers = self.build_headers()?;

        self.execute_with_retry(&method, || {
            let mut request = self
                .client
                .request(method.clone(), url.clone())
                .headers(headers.clone());
            if let Some(body) = body {
                request = request.json(body);
            }
            request.send()
        })
        .await
    }

    /// Executes a request, retrying as the [`RetryConfig`] allows.
    ///
    /// A `POST` that may have reached the server is not sent again unless
    /// the policy opts in, so a create is delivered at most once.
    async fn execute_with_retry<F, Fut>(
        &self,
        method: &Method,
        make_request: F,
    ) -> Result<reqwest::Response>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<reqwest::Response, reqwest::Error>>,
    {
        let policy = &self.retry_config;
        let mut attempt = 0;

        loop {
            attempt += 1;

            let (cause, retry_after) = match make_request().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = retry_after_header(&response);
                        if !policy.should_retry(method.as_str(), RetryCause::RateLimited, attempt) {
                            let err = Error::from_status(429, Some("Rate limited after max retries"));
                            return Err(match retry_after {
                                Some(after) => err.with_retry_after(after),
                                None => err,
                            });
                        }
                        (RetryCause::RateLimited, retry_after)
                    } else if status.is_server_error()
                        && policy.should_retry(method.as_str(), RetryCause::ServerError, attempt)
                    {
                        (RetryCause::ServerError, None)
                    } else {
                        return Ok(response);
                    }
                }
                Err(e) => {
                    let cause = if e.is_connect() {
                        RetryCause::Connect
                    } else if e.is_timeout() {
                        RetryCause::Timeout
                    } else {
                        return Err(map_reqwest_error(e));
                    };

                    if !policy.should_retry(method.as_str(), cause, attempt) {
                        return Err(map_reqwest_error(e));
                    }
                    tracing::debug!(error = %e, "request failed");
                    (cause, None)
                }
            };

            tracing::debug!(attempt, %method, ?cause, "retrying request");
            tokio::time::sleep(retry_after.unwrap_or_else(|| policy.backoff(attempt))).await;
        }
    }
}

fn retry_after_header(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(any(feature = "rustls", feature = "native-tls"))]
fn apply_tls(
    mut client_builder: reqwest::ClientBuilder,
    tls_config: &TlsConfig,
) -> Result<reqwest::ClientBuilder> {
    if tls_config.skip_verification {
        tracing::warn!("TLS certificate verification is disabled");
        client_builder = client_builder.danger_accept_invalid_certs(true);
    }

    if let Some(ref ca_cert_file) = tls_config.ca_cert_file {
        let cert_pem = std::fs::read(ca_cert_file).map_err(|e| {
            Error::configuration(format!("Failed to read certificate {:?}: {}", ca_cert_file, e))
        })?;
        let cert = reqwest::Certificate::from_pem(&cert_pem).map_err(|e| {
            Error::configuration(format!("Invalid certificate {:?}: {}", ca_cert_file, e))
        })?;
        client_builder = client_builder.add_root_certificate(cert);
    }

    if let Some(ref ca_cert_pem) = tls_config.ca_cert_pem {
        let cert = reqwest::Certificate::from_pem(ca_cert_pem.as_bytes())
            .map_err(|e| Error::configuration(format!("Invalid CA certificate PEM: {}", e)))?;
        client_builder = client_builder.add_root_certificate(cert);
    }

    Ok(client_builder)
}

#[cfg(not(any(feature = "rustls", feature = "native-tls")))]
fn apply_tls(
    client_builder: reqwest::ClientBuilder,
    tls_config: &TlsConfig,
) -> Result<reqwest::ClientBuilder> {
    if tls_config.skip_verification || tls_config.has_custom_ca() {
        return Err(Error::configuration(
            "TLS options require the `rustls` or `native-tls` feature",
        ));
    }
    Ok(client_builder)
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| {
        Error::new(
            ErrorKind::InvalidArgument,
            format!("Failed to encode request body: {}", e),
        )
        .with_source(e)
    })
}

/// Handles a response and parses the JSON body.
async fn handle_response<T>(response: reqwest::Response) -> Result<T>
where
    T: DeserializeOwned,
{
    let status = response.status();

    if !status.is_success() {
        return Err(error_from_response(response).await);
    }

    response.json::<T>().await.map_err(|e| {
        Error::new(
            ErrorKind::InvalidResponse,
            format!("Failed to parse response: {}", e),
        )
    })
}

/// Handles a response whose body is not needed.
async fn handle_error_response(response: reqwest::Response) -> Result<()> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    Ok(())
}

async fn error_from_response(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = response.text().await.unwrap_or_default();

    let err = map_status_error(status, &body);
    match request_id {
        Some(id) => err.with_request_id(id),
        None => err,
    }
}

// ============================================================================
// REST Transport Builder
// ============================================================================

/// Builder for [`RestTransport`].
#[derive(Debug)]
pub struct RestTransportBuilder {
    base_url: Option<Url>,
    credentials: TokenCredentials,
    tls_config: TlsConfig,
    retry_config: RetryConfig,
    timeout: Duration,
}

impl RestTransportBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            credentials: TokenCredentials::anonymous(),
            tls_config: TlsConfig::default(),
            retry_config: RetryConfig::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the credentials.
    pub fn credentials(mut self, credentials: impl Into<TokenCredentials>) -> Self {
        self.credentials = credentials.into();
        self
    }

    /// Sets the TLS configuration.
    pub fn tls_config(mut self, config: TlsConfig) -> Self {
        self.tls_config = config;
        self
    }

    /// Sets the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the REST transport.
    pub fn build(self) -> Result<RestTransport> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::configuration("Base URL is required"))?;

        RestTransport::new(
            base_url,
            self.credentials,
            &self.tls_config,
            self.retry_config,
            self.timeout,
        )
    }
}

// ============================================================================
// REST Service
// ============================================================================

/// [`ResourceService`] for record type `R` over a [`RestTransport`].
pub struct RestService<R> {
    transport: RestTransport,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for RestService<R> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> fmt::Debug for RestService<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestService")
            .field("endpoint", &R::ENDPOINT)
            .field("transport", &self.transport)
            .finish()
    }
}

impl<R: Record> RestService<R> {
    /// Binds `transport` to `R`'s endpoint.
    pub fn new(transport: RestTransport) -> Self {
        Self {
            transport,
            _record: PhantomData,
        }
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &RestTransport {
        &self.transport
    }

    fn item_path(id: &R::Id) -> String {
        format!("{}{}/", R::ENDPOINT, id)
    }
}

/// A list body: a bare array, or a paginated envelope with `results`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<R> {
    Plain(Vec<R>),
    Paged { results: Vec<R> },
}

#[async_trait::async_trait]
impl<R: Record> ResourceService<R> for RestService<R> {
    async fn list(&self) -> Result<Vec<R>> {
        let body: ListBody<R> = self.transport.get(R::ENDPOINT).await?;
        Ok(match body {
            ListBody::Plain(records) | ListBody::Paged { results: records } => records,
        })
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        self.transport.post(R::ENDPOINT, draft).await
    }

    async fn update(&self, id: &R::Id, patch: &R::Patch) -> Result<R> {
        self.transport.patch(&Self::item_path(id), patch).await
    }

    async fn delete(&self, id: &R::Id) -> Result<()> {
        self.transport.delete(&Self::item_path(id)).await
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps reqwest errors to SDK errors.
fn map_reqwest_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::timeout(format!("Request timed out: {}", e)).with_source(e)
    } else if e.is_connect() {
        Error::connection(format!("Connection failed: {}", e)).with_source(e)
    } else if e.is_request() {
        Error::new(
            ErrorKind::InvalidArgument,
            format!("Invalid request: {}", e),
        )
        .with_source(e)
    } else {
        Error::new(ErrorKind::Transport, format!("HTTP error: {}", e)).with_source(e)
    }
}

/// Maps an HTTP status and body to an SDK error.
///
/// The message is taken from the first of `detail`, `error` or `message` in a
/// JSON body. Field validation bodies such as
/// `{"username": ["already taken"]}` are flattened to `username: already taken`.
fn map_status_error(status: u16, body: &str) -> Error {
    let message = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => server_message(&json).unwrap_or_else(|| body.to_string()),
        Err(_) => body.trim().to_string(),
    };
    Error::from_status(status, Some(&message))
}

fn server_message(json: &serde_json::Value) -> Option<String> {
    let object = json.as_object()?;

    for field in ["detail", "error", "message"] {
        if let Some(text) = object.get(field).and_then(|v| v.as_str()) {
            return Some(text.to_string());
        }
    }

    let fields: Vec<String> = object
        .iter()
        .filter_map(|(name, value)| {
            let first = match value {
                serde_json::Value::Array(items) => items.first()?.as_str()?,
                serde_json::Value::String(text) => text.as_str(),
                _ => return None,
            };
            Some(format!("{}: {}", name, first))
        })
        .collect();

    (!fields.is_empty()).then(|| fields.join("; "))
}

// ============================================================================
// Tests
// ============================================================================
