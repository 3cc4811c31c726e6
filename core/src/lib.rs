//! Outbound HTTP request encoding and response normalization.
//!
//! # Overview
//! `RequestSpec` describes one call: method, URL, headers, body, basic-auth
//! credentials, and client configuration. `build` turns it into a wire-ready
//! `HttpRequest` without touching the network. A `Transport` dispatches it,
//! and `normalize` drains the raw response into an immutable `HttpResponse`.
//!
//! # Design
//! - Header and form values are dynamic `Value`s, stringified with a fixed
//!   per-kind rule where `0` and `false` are kept but empty values are dropped.
//! - The body mode is an explicit `Body` variant: form fields or JSON.
//! - I/O is behind the `Transport` trait. The `ureq` feature provides a
//!   blocking implementation; hosts can also do the I/O themselves (see the
//!   FFI crate).

pub mod body;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod response;
pub mod transport;
pub mod value;

pub use body::Body;
pub use config::ClientConfig;
pub use error::{EncodingError, HttpError};
pub use http::{Headers, HttpMethod, HttpRequest, RawResponse};
pub use request::RequestSpec;
pub use response::{normalize, BodyMode, HttpResponse};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use value::{stringify, Value};
