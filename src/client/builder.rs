//! Client builder with typestate pattern.

use std::{marker::PhantomData, time::Duration};

use url::Url;

use super::inner::ClientInner;
use crate::{
    Client, Error,
    auth::TokenCredentials,
    config::{ControllerConfig, RetryConfig, TlsConfig},
    transport::{DEFAULT_TIMEOUT, RestTransport},
};

/// Marker type: URL not yet provided.
pub struct NoUrl;

/// Marker type: URL has been provided.
pub struct HasUrl;

/// Builder for creating [`Client`] instances.
///
/// Uses the typestate pattern to ensure the API URL is provided at compile
/// time. Credentials are optional: a client without a token can still
/// [`login`](Client::login).
///
/// ## Required Configuration
///
/// - `url()`: The data service API root (e.g. `http://127.0.0.1:8000/api/`)
///
/// ## Optional Configuration
///
/// - `credentials()`: An existing token
/// - `retry_config()`: Retry behavior for transient failures
/// - `tls_config()`: Custom TLS settings
/// - `timeout()`: Request timeout
/// - `controller_config()`: Page size and sort direction of new controllers
///
/// ## Example
///
/// ```rust
/// use std::time::Duration;
/// use staffdesk::{Client, ControllerConfig, RetryConfig};
///
/// let client = Client::builder()
///     .url("http://127.0.0.1:8000/api/")
///     .credentials("9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b")
///     .retry_config(RetryConfig::new().with_max_retries(5))
///     .timeout(Duration::from_secs(10))
///     .controller_config(ControllerConfig::builder().page_size(10).build())
///     .build()?;
///
/// assert_eq!(client.controller_config().page_size(), 10);
/// # Ok::<(), staffdesk::Error>(())
/// ```
pub struct ClientBuilder<UrlState> {
    url: Option<String>,
    credentials: TokenCredentials,
    retry_config: RetryConfig,
    tls_config: TlsConfig,
    controller_config: ControllerConfig,
    timeout: Option<Duration>,
    _url_state: PhantomData<UrlState>,
}

impl ClientBuilder<NoUrl> {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            url: None,
            credentials: TokenCredentials::anonymous(),
            retry_config: RetryConfig::default(),
            tls_config: TlsConfig::default(),
            controller_config: ControllerConfig::default(),
            timeout: None,
            _url_state: PhantomData,
        }
    }

    /// Sets the data service API root.
    ///
    /// Resource endpoints such as `users/` are resolved beneath it.
    pub fn url(self, url: impl Into<String>) -> ClientBuilder<HasUrl> {
        ClientBuilder {
            url: Some(url.into()),
            credentials: self.credentials,
            retry_config: self.retry_config,
            tls_config: self.tls_config,
            controller_config: self.controller_config,
            timeout: self.timeout,
            _url_state: PhantomData,
        }
    }
}

impl Default for ClientBuilder<NoUrl> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> ClientBuilder<U> {
    /// Sets the token sent with every request.
    ///
    /// Accepts a token string or shared [`TokenCredentials`].
    #[must_use]
    pub fn credentials(mut self, credentials: impl Into<TokenCredentials>) -> Self {
        self.credentials = credentials.into();
        self
    }

    /// Sets the retry configuration.
    #[must_use]
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Sets the TLS configuration.
    #[must_use]
    pub fn tls_config(mut self, config: TlsConfig) -> Self {
        self.tls_config = config;
        self
    }

    /// Disables TLS certificate verification.
    ///
    /// **WARNING**: only for a local development server.
    #[must_use]
    pub fn insecure(mut self) -> Self {
        self.tls_config.skip_verification = true;
        self
    }

    /// Sets the request timeout.
    ///
    /// This timeout applies to individual requests, not including retries.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the configuration new controllers are created with.
    #[must_use]
    pub fn controller_config(mut self, config: ControllerConfig) -> Self {
        self.controller_config = config;
        self
    }
}

impl ClientBuilder<HasUrl> {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::Configuration` if the URL does not parse or the
    /// HTTP client cannot be created.
    pub fn build(self) -> Result<Client, Error> {
        let url = self.url.ok_or_else(|| Error::configuration("URL is required"))?;
        let url = Url::parse(&url)
            .map_err(|e| Error::configuration(format!("Invalid URL {:?}: {}", url, e)))?;

        let transport = RestTransport::new(
            url,
            self.credentials,
            &self.tls_config,
            self.retry_config,
            self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        )?;

        tracing::debug!(url = %transport.base_url(), "client built");

        Ok(Client::from_inner(ClientInner {
            transport,
            controller_config: self.controller_config,
        }))
    }
}

impl<U> std::fmt::Debug for ClientBuilder<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("url", &self.url)
            .field("credentials", &self.credentials)
            .field("timeout", &self.timeout)
            .field("controller_config", &self.controller_config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_build_adds_trailing_slash() {
        let client = Client::builder().url("http://localhost:8000/api").build().unwrap();
        assert_eq!(client.url(), "http://localhost:8000/api/");
    }

    #[test]
    fn test_invalid_url_is_configuration_error() {
        let err = Client::builder().url("not a url").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_credentials_are_shared() {
        let credentials = TokenCredentials::new("abc");
        let client = Client::builder()
            .credentials(credentials.clone())
            .url("http://localhost:8000/api/")
            .build()
            .unwrap();

        credentials.clear();
        assert!(!client.credentials().is_authenticated());
    }

    #[test]
    fn test_debug_redacts_token() {
        let builder = Client::builder().url("http://localhost/").credentials("secret-token");
        let debug = format!("{:?}", builder);
        assert!(!debug.contains("secret-token"));
    }
}
