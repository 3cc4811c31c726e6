//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, pointer plus length instead of `Vec`,
//! and enums with explicit discriminants. Conversion functions live here to
//! keep `lib.rs` focused on the `extern "C"` surface.

use std::collections::BTreeMap;
use std::ffi::CString;
use std::os::raw::c_char;
use std::time::Duration;

use unirest_core::{Body, ClientConfig, HttpError, HttpMethod, HttpResponse, RequestSpec, Value};

/// Opaque handle holding the pieces of a request until it is built.
pub struct FfiRequestSpec {
    pub(crate) method: HttpMethod,
    pub(crate) url: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Body,
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) client: ClientConfig,
}

impl FfiRequestSpec {
    pub(crate) fn new(method: HttpMethod, url: String) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: Body::Absent,
            username: String::new(),
            password: String::new(),
            client: ClientConfig::default(),
        }
    }

    /// Add a form field, switching the body to form mode if it was not.
    pub(crate) fn add_form_field(&mut self, name: String, value: String) {
        match &mut self.body {
            Body::Form(fields) => {
                fields.insert(name, Value::from(value));
            }
            body => *body = Body::Form(BTreeMap::from([(name, Value::from(value))])),
        }
    }

    pub(crate) fn set_tls_baseline(&mut self, baseline: Duration) {
        self.client = ClientConfig::with_baseline(baseline);
    }

    pub(crate) fn to_core(&self) -> RequestSpec {
        RequestSpec::new(self.method, &self.url)
            .headers(self.headers.iter().cloned())
            .body(self.body.clone())
            .basic_auth(&self.username, &self.password)
            .client_config(self.client.clone())
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
///
/// Functions that accept a method from C take a plain `i32` code instead of
/// this enum, so an out-of-range value falls back to GET rather than being
/// undefined behaviour.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Patch = 3,
    Delete = 4,
}

impl FfiHttpMethod {
    pub(crate) fn from_code(code: i32) -> HttpMethod {
        match code {
            1 => HttpMethod::Post,
            2 => HttpMethod::Put,
            3 => HttpMethod::Patch,
            4 => HttpMethod::Delete,
            _ => HttpMethod::Get,
        }
    }
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Patch => FfiHttpMethod::Patch,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header owned by this library.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A single HTTP header borrowed from the C caller.
#[repr(C)]
pub struct FfiHeaderRef {
    pub key: *const c_char,
    pub value: *const c_char,
}

/// A built HTTP request described as C-compatible plain data.
///
/// The C caller executes the request, applying the timeouts and pool
/// settings given here, and passes the response back through
/// `unirest_response_normalize`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut u8,
    pub body_len: usize,
    pub tls_handshake_timeout_ms: u64,
    pub response_header_timeout_ms: u64,
    pub max_idle_per_host: u32,
    pub keep_alive: bool,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: unirest_core::HttpRequest) -> *mut Self {
        let (headers, headers_len) = headers_into_raw(req.headers);
        let (body, body_len) = match req.body {
            Some(bytes) => bytes_into_raw(bytes),
            None => (std::ptr::null_mut(), 0),
        };

        let ffi_req = Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: c_string(req.url),
            headers,
            headers_len,
            body,
            body_len,
            tls_handshake_timeout_ms: duration_ms(req.client.tls_handshake_timeout),
            response_header_timeout_ms: duration_ms(req.client.response_header_timeout),
            max_idle_per_host: u32::try_from(req.client.max_idle_per_host).unwrap_or(u32::MAX),
            keep_alive: req.client.keep_alive,
        });
        Box::into_raw(ffi_req)
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Encoding = 1,
    Read = 2,
    Transport = 3,
    Panic = 4,
    NullArg = 5,
}

/// A normalized response exposed to C.
///
/// `body` is null when the response was normalized in binary mode, or when
/// the decoded text contains a NUL byte; `raw_body` is always set.
#[repr(C)]
pub struct FfiResponse {
    pub status: u16,
    pub raw_body: *mut u8,
    pub raw_body_len: usize,
    pub body: *mut c_char,
    /// One entry per header value; repeated names appear repeatedly.
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

/// Result envelope for normalize operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the response. On failure `error_code` describes the category,
/// `error_message` is a human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub data: *mut FfiResponse,
}

impl FfiResult {
    pub(crate) fn ok_response(resp: HttpResponse) -> *mut Self {
        let flat: Vec<(String, String)> = resp
            .headers()
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.clone(), v.clone())))
            .collect();
        let (headers, headers_len) = headers_into_raw(flat);
        let body = resp
            .body()
            .and_then(|text| CString::new(text).ok())
            .map_or(std::ptr::null_mut(), CString::into_raw);
        let status = resp.status();
        let (raw_body, raw_body_len) = bytes_into_raw(resp.into_raw_body());

        let data = Box::new(FfiResponse {
            status,
            raw_body,
            raw_body_len,
            body,
            headers,
            headers_len,
        });
        Box::into_raw(Box::new(FfiResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            data: Box::into_raw(data),
        }))
    }

    pub(crate) fn from_error(err: HttpError) -> *mut Self {
        let error_code = match &err {
            HttpError::Encoding(_) => FfiErrorCode::Encoding,
            HttpError::Read(_) => FfiErrorCode::Read,
            HttpError::Transport(_) => FfiErrorCode::Transport,
        };
        Self::error(error_code, err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, msg.to_string())
    }

    fn error(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message: c_string(msg),
            data: std::ptr::null_mut(),
        }))
    }
}

// ---------------------------------------------------------------------------
// Allocation helpers
// ---------------------------------------------------------------------------

/// Strings with interior NUL bytes cannot cross the boundary; they become null.
pub(crate) fn c_string(s: String) -> *mut c_char {
    CString::new(s).map_or(std::ptr::null_mut(), CString::into_raw)
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn bytes_into_raw(bytes: Vec<u8>) -> (*mut u8, usize) {
    if bytes.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = bytes.len();
    (Box::into_raw(bytes.into_boxed_slice()) as *mut u8, len)
}

/// Free a buffer produced by `bytes_into_raw`.
pub(crate) fn free_bytes(ptr: *mut u8, len: usize) {
    if !ptr.is_null() && len > 0 {
        drop(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len)) });
    }
}

fn headers_into_raw(headers: Vec<(String, String)>) -> (*mut FfiHeader, u32) {
    if headers.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let ffi_headers: Box<[FfiHeader]> = headers
        .into_iter()
        .map(|(k, v)| FfiHeader {
            key: c_string(k),
            value: c_string(v),
        })
        .collect();
    let len = ffi_headers.len() as u32;
    (Box::into_raw(ffi_headers) as *mut FfiHeader, len)
}

/// Free a header array produced by `headers_into_raw`, including its strings.
pub(crate) fn free_headers(ptr: *mut FfiHeader, len: u32) {
    if ptr.is_null() || len == 0 {
        return;
    }
    let headers = unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len as usize)) };
    for h in headers.iter() {
        if !h.key.is_null() {
            drop(unsafe { CString::from_raw(h.key) });
        }
        if !h.value.is_null() {
            drop(unsafe { CString::from_raw(h.value) });
        }
    }
}
