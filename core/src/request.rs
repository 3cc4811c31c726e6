//! Outbound request description and its encoding into an `HttpRequest`.
//!
//! # Design
//! `RequestSpec` owns everything about one outbound call: method, URL,
//! headers, body, credentials, and its own `ClientConfig`. `build` is a pure
//! function of that state. Headers are applied in a fixed order so the
//! result is predictable: body content headers first, then caller headers,
//! then basic auth. A later writer replaces an earlier one with the same
//! (case-insensitive) name.

use std::collections::BTreeMap;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use tracing::debug;

use crate::body::Body;
use crate::config::ClientConfig;
use crate::error::HttpError;
use crate::http::{HttpMethod, HttpRequest, RawResponse};
use crate::response::HttpResponse;
use crate::transport::Transport;
use crate::value::Value;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_TYPE: &str = "Content-Type";

/// Description of one outbound HTTP call.
#[derive(Debug, Clone)]
#[must_use = "RequestSpec does nothing until it is built or performed"]
pub struct RequestSpec {
    method: HttpMethod,
    url: String,
    headers: BTreeMap<String, Value>,
    body: Body,
    username: String,
    password: String,
    client: ClientConfig,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, url: &str) -> Self {
        Self {
            method,
            url: url.to_string(),
            headers: BTreeMap::new(),
            body: Body::Absent,
            username: String::new(),
            password: String::new(),
            client: ClientConfig::default(),
        }
    }

    pub fn get(url: &str) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: &str) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: &str) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn patch(url: &str) -> Self {
        Self::new(HttpMethod::Patch, url)
    }

    pub fn delete(url: &str) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// Add a header. Values are stringified at build time; empty ones are
    /// not sent.
    pub fn header(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.headers.insert(name.to_string(), value.into());
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    pub fn form<I, K, V>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.body(Body::form(fields))
    }

    pub fn json(self, value: impl Into<Value>) -> Self {
        self.body(Body::json(value))
    }

    pub fn basic_auth(mut self, username: &str, password: &str) -> Self {
        self.username = username.to_string();
        self.password = password.to_string();
        self
    }

    pub fn client_config(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn client(&self) -> &ClientConfig {
        &self.client
    }

    /// Encode this spec into a transport-ready request. No I/O happens here.
    pub fn build(&self) -> Result<HttpRequest, HttpError> {
        let mut request = HttpRequest::new(self.method, &self.url, self.client.clone());

        if let Some(encoded) = self.body.encode()? {
            if encoded.declare_length {
                request.set_header(CONTENT_LENGTH, encoded.bytes.len().to_string());
            }
            request.set_header(CONTENT_TYPE, encoded.content_type.to_string());
            request.body = Some(encoded.bytes);
        }

        for (name, value) in &self.headers {
            let value = value.stringify("");
            if !value.is_empty() {
                request.set_header(name, value);
            }
        }

        if let Some(token) = self.basic_auth_token() {
            request.set_header(AUTHORIZATION, format!("Basic {token}"));
        }

        debug!(
            method = %request.method,
            url = %request.url,
            headers = request.headers.len(),
            body_bytes = request.body.as_ref().map_or(0, Vec::len),
            "built request"
        );
        Ok(request)
    }

    /// Build and dispatch through `transport`, returning the raw response.
    pub fn perform<T: Transport>(&self, transport: &T) -> Result<RawResponse<T::Body>, HttpError> {
        let request = self.build()?;
        let response = transport.send(&request)?;
        debug!(method = %request.method, url = %request.url, status = response.status, "received response");
        Ok(response)
    }

    /// Perform and normalize, decoding the body as text.
    pub fn send_text<T: Transport>(&self, transport: &T) -> Result<HttpResponse, HttpError> {
        HttpResponse::from_text(self.perform(transport)?)
    }

    /// Perform and normalize, keeping only the raw body bytes.
    pub fn send_binary<T: Transport>(&self, transport: &T) -> Result<HttpResponse, HttpError> {
        HttpResponse::from_binary(self.perform(transport)?)
    }

    /// Credentials are only sent when one of them is longer than a single
    /// byte.
    fn basic_auth_token(&self) -> Option<String> {
        if self.username.len() > 1 || self.password.len() > 1 {
            let credentials = format!("{}:{}", self.username, self.password);
            Some(BASE64_STANDARD.encode(credentials.as_bytes()))
        } else {
            None
        }
    }
}
