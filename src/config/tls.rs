//! TLS configuration for the data service connection.

use std::path::PathBuf;

/// Configuration for TLS connections to the data service.
///
/// By default the REST service trusts the platform roots and validates
/// certificates. Back offices frequently sit behind an internal CA, which
/// this configuration lets you add.
///
/// ## Example
///
/// ```rust
/// use staffdesk::TlsConfig;
///
/// let config = TlsConfig::builder()
///     .ca_cert_file("/etc/staffdesk/internal-ca.crt")
///     .build();
/// assert!(config.has_custom_ca());
/// ```
#[derive(Debug, Clone, Default, bon::Builder)]
pub struct TlsConfig {
    /// Custom CA certificate file path.
    #[builder(into)]
    pub ca_cert_file: Option<PathBuf>,

    /// Custom CA certificate PEM data.
    #[builder(into)]
    pub ca_cert_pem: Option<String>,

    /// Whether to skip certificate verification.
    ///
    /// **WARNING**: insecure, only for a local API with a self-signed certificate.
    #[builder(default = false)]
    pub skip_verification: bool,
}

impl TlsConfig {
    /// Creates an insecure TLS config that skips verification.
    pub fn insecure() -> Self {
        Self::builder().skip_verification(true).build()
    }

    /// Returns `true` if a custom CA is configured.
    pub fn has_custom_ca(&self) -> bool {
        self.ca_cert_file.is_some() || self.ca_cert_pem.is_some()
    }
}
