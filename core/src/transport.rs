//! The seam between request encoding and the network.
//!
//! # Design
//! The core never opens sockets itself. A `Transport` takes a built
//! `HttpRequest`, applies its `ClientConfig`, and returns the status, headers,
//! and an undrained body reader. Failures are returned as
//! `HttpError::Transport` with the original error kept as the source; no
//! retry or classification happens here.

use std::io::Read;

use crate::error::HttpError;
use crate::http::{HttpRequest, RawResponse};

/// Something that can put an `HttpRequest` on the wire.
pub trait Transport {
    type Body: Read;

    fn send(&self, request: &HttpRequest) -> Result<RawResponse<Self::Body>, HttpError>;
}

#[cfg(feature = "ureq")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "ureq")]
mod ureq_transport {
    use tracing::debug;

    use super::Transport;
    use crate::config::ClientConfig;
    use crate::error::HttpError;
    use crate::http::{Headers, HttpRequest, RawResponse};

    /// Blocking transport backed by `ureq`.
    ///
    /// Each request gets a fresh agent, and with it a fresh connection pool,
    /// configured from the request's `ClientConfig`. Non-2xx statuses are
    /// returned as data rather than errors.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UreqTransport;

    impl UreqTransport {
        fn agent(config: &ClientConfig) -> ureq::Agent {
            let idle_per_host = if config.keep_alive { config.max_idle_per_host } else { 0 };
            ureq::Agent::config_builder()
                .http_status_as_error(false)
                .timeout_connect(Some(config.tls_handshake_timeout))
                .timeout_recv_response(Some(config.response_header_timeout))
                .max_idle_connections_per_host(idle_per_host)
                .build()
                .new_agent()
        }
    }

    impl Transport for UreqTransport {
        type Body = ureq::BodyReader<'static>;

        fn send(&self, request: &HttpRequest) -> Result<RawResponse<Self::Body>, HttpError> {
            let agent = Self::agent(&request.client);

            let mut builder = ureq::http::Request::builder()
                .method(request.method.as_str())
                .uri(request.url.as_str());
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            let result = match &request.body {
                Some(bytes) => builder
                    .body(bytes.as_slice())
                    .map_err(transport_error)
                    .and_then(|req| agent.run(req).map_err(transport_error)),
                None => builder
                    .body(())
                    .map_err(transport_error)
                    .and_then(|req| agent.run(req).map_err(transport_error)),
            };
            let response = result?;

            let status = response.status().as_u16();
            let mut headers = Headers::new();
            for (name, value) in response.headers() {
                headers
                    .entry(name.as_str().to_string())
                    .or_default()
                    .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
            }
            debug!(status, headers = headers.len(), "ureq response headers received");

            Ok(RawResponse {
                status,
                headers,
                body: response.into_body().into_reader(),
            })
        }
    }

    fn transport_error<E>(err: E) -> HttpError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HttpError::Transport(Box::new(err))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::time::Duration;

        use crate::http::HttpMethod;
        use crate::request::RequestSpec;

        #[test]
        fn connection_refused_is_a_transport_error() {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);

            let config = ClientConfig::with_baseline(Duration::ZERO);
            let Err(err) = RequestSpec::new(HttpMethod::Get, &format!("http://{addr}/"))
                .client_config(config)
                .perform(&UreqTransport)
            else {
                panic!("expected a transport error");
            };
            assert!(matches!(err, HttpError::Transport(_)));
        }
    }
}
