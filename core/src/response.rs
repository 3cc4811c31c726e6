//! Response normalization.
//!
//! A transport hands back a status, a header multimap, and a body reader.
//! `normalize` drains the reader, drops it, and returns an immutable
//! `HttpResponse` that no longer depends on the transport.

use std::io::Read;

use tracing::debug;

use crate::error::HttpError;
use crate::http::{Headers, RawResponse};

/// Whether the normalized response should also carry a text body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    Text,
    Binary,
}

/// A fully materialized HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: u16,
    raw_body: Vec<u8>,
    body: Option<String>,
    headers: Headers,
}

impl HttpResponse {
    /// Normalize with the body also decoded as text.
    pub fn from_text<R: Read>(raw: RawResponse<R>) -> Result<Self, HttpError> {
        normalize(raw.status, raw.body, raw.headers, BodyMode::Text)
    }

    /// Normalize keeping only the raw bytes.
    pub fn from_binary<R: Read>(raw: RawResponse<R>) -> Result<Self, HttpError> {
        normalize(raw.status, raw.body, raw.headers, BodyMode::Binary)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn raw_body(&self) -> &[u8] {
        &self.raw_body
    }

    /// Text body; `None` for responses normalized in binary mode.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// First value of the named header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    pub fn into_raw_body(self) -> Vec<u8> {
        self.raw_body
    }
}

/// Drain `body` and build an `HttpResponse`.
///
/// The reader is dropped before returning on every path, including when
/// reading fails part way through.
pub fn normalize<R: Read>(
    status: u16,
    mut body: R,
    headers: Headers,
    mode: BodyMode,
) -> Result<HttpResponse, HttpError> {
    let mut raw_body = Vec::new();
    let drained = body.read_to_end(&mut raw_body);
    drop(body);
    drained.map_err(HttpError::Read)?;

    let text = match mode {
        BodyMode::Text => Some(String::from_utf8_lossy(&raw_body).into_owned()),
        BodyMode::Binary => None,
    };
    debug!(status, body_bytes = raw_body.len(), ?mode, "normalized response");

    Ok(HttpResponse {
        status,
        raw_body,
        body: text,
        headers,
    })
}
