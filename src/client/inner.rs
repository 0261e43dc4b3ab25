//! Internal client implementation.

use crate::config::ControllerConfig;
use crate::transport::RestTransport;

pub(crate) struct ClientInner {
    /// Shared HTTP connection and credentials.
    pub transport: RestTransport,

    /// Configuration new controllers are created with.
    pub controller_config: ControllerConfig,
}
