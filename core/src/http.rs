//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! builds `HttpRequest` values and normalizes `RawResponse` values without
//! touching the network; a `Transport` implementation (or a foreign host via
//! the FFI crate) performs the actual I/O.
//!
//! Header names are compared case-insensitively when set, but stored with the
//! casing of the last writer.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

use crate::config::ClientConfig;

/// Header multimap: name to every value the peer sent, in order.
pub type Headers = BTreeMap<String, Vec<String>>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Look up a method by name, ignoring case. Anything unrecognized is GET.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            _ => HttpMethod::Get,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully encoded HTTP request described as plain data.
///
/// Produced by `RequestSpec::build`. `client` carries the timeouts and pool
/// settings the transport must apply when dispatching it.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub client: ClientConfig,
}

impl HttpRequest {
    pub(crate) fn new(method: HttpMethod, url: &str, client: ClientConfig) -> Self {
        Self {
            method,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
            client,
        }
    }

    /// First value of the named header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing any existing entry with the same name.
    pub(crate) fn set_header(&mut self, name: &str, value: String) {
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(entry) => *entry = (name.to_string(), value),
            None => self.headers.push((name.to_string(), value)),
        }
    }
}

/// A response as handed back by the transport, body not yet drained.
#[derive(Debug)]
pub struct RawResponse<B: Read> {
    pub status: u16,
    pub headers: Headers,
    pub body: B,
}
