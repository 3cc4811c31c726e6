//! Per-request client configuration.
//!
//! Every `RequestSpec` owns its own `ClientConfig`; nothing here is shared
//! process-wide. Durations deserialize from humantime strings such as `"2s"`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Added on top of the transport's baseline TLS handshake timeout.
pub const TLS_HANDSHAKE_INCREMENT: Duration = Duration::from_secs(2);

/// How long to wait for response headers once the request is written.
pub const RESPONSE_HEADER_TIMEOUT: Duration = Duration::from_secs(10);

/// Idle connections kept per host.
pub const MAX_IDLE_PER_HOST: usize = 2;

/// Timeouts and connection pool settings applied by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    #[serde(with = "humantime_serde")]
    pub tls_handshake_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub response_header_timeout: Duration,
    pub max_idle_per_host: usize,
    pub keep_alive: bool,
}

impl ClientConfig {
    /// Configuration for a transport whose own TLS handshake timeout is
    /// `baseline`. The increment is applied once, here.
    pub fn with_baseline(baseline: Duration) -> Self {
        Self {
            tls_handshake_timeout: baseline + TLS_HANDSHAKE_INCREMENT,
            response_header_timeout: RESPONSE_HEADER_TIMEOUT,
            max_idle_per_host: MAX_IDLE_PER_HOST,
            keep_alive: true,
        }
    }
}

impl Default for ClientConfig {
    /// A freshly constructed transport has no handshake timeout of its own,
    /// so the default is the increment alone.
    fn default() -> Self {
        Self::with_baseline(Duration::ZERO)
    }
}
