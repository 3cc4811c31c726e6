//! C-ABI wrapper around `unirest-core`.
//!
//! # Overview
//! Lets any language with a C FFI describe a request, get back the exact
//! bytes and headers to send, and hand the response it received back for
//! normalization. The host performs all network I/O.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Request setters return `false` on null arguments or strings that are not
//!   UTF-8 instead of aborting.
//! - The C caller owns all returned pointers and must call the matching
//!   `unirest_*_free` / `unirest_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;
use std::time::Duration;

use unirest_core::{normalize, Body, BodyMode, Headers, Value};

use types::*;

/// Borrow a C string as `&str`. `None` if it is null or not UTF-8.
///
/// # Safety
/// A non-null `ptr` must point to a NUL-terminated string.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Like `borrow_str`, but null reads as empty.
unsafe fn borrow_str_or_empty<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        Some("")
    } else {
        unsafe { borrow_str(ptr) }
    }
}

// ---------------------------------------------------------------------------
// Request lifecycle
// ---------------------------------------------------------------------------

/// Start a new request. `method` is 0=GET, 1=POST, 2=PUT, 3=PATCH, 4=DELETE;
/// any other value is GET.
///
/// Returns null if `url` is null or not UTF-8, or if an internal panic occurs.
/// The caller must free the returned pointer with `unirest_request_free`.
#[unsafe(no_mangle)]
pub extern "C" fn unirest_request_new(method: i32, url: *const c_char) -> *mut FfiRequestSpec {
    catch_unwind(|| {
        let Some(url) = (unsafe { borrow_str(url) }) else {
            return std::ptr::null_mut();
        };
        let spec = FfiRequestSpec::new(FfiHttpMethod::from_code(method), url.to_string());
        Box::into_raw(Box::new(spec))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a request created by `unirest_request_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn unirest_request_free(spec: *mut FfiRequestSpec) {
    if !spec.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(spec) });
        });
    }
}

/// Set a header. An empty value means the header is not sent.
#[unsafe(no_mangle)]
pub extern "C" fn unirest_request_set_header(
    spec: *mut FfiRequestSpec,
    name: *const c_char,
    value: *const c_char,
) -> bool {
    catch_unwind(|| {
        if spec.is_null() {
            return false;
        }
        let (Some(name), Some(value)) = (unsafe { borrow_str(name) }, unsafe { borrow_str(value) }) else {
            return false;
        };
        let spec = unsafe { &mut *spec };
        let (name, value) = (name.to_string(), value.to_string());
        spec.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        spec.headers.push((name, value));
        true
    })
    .unwrap_or(false)
}

/// Add a form field. Replaces a JSON body if one was set.
#[unsafe(no_mangle)]
pub extern "C" fn unirest_request_set_form_field(
    spec: *mut FfiRequestSpec,
    name: *const c_char,
    value: *const c_char,
) -> bool {
    catch_unwind(|| {
        if spec.is_null() {
            return false;
        }
        let (Some(name), Some(value)) = (unsafe { borrow_str(name) }, unsafe { borrow_str(value) }) else {
            return false;
        };
        let spec = unsafe { &mut *spec };
        let (name, value) = (name.to_string(), value.to_string());
        spec.add_form_field(name, value);
        true
    })
    .unwrap_or(false)
}

/// Set a JSON body from its text. Returns false if `json` does not parse;
/// the previous body is kept in that case.
#[unsafe(no_mangle)]
pub extern "C" fn unirest_request_set_json_body(spec: *mut FfiRequestSpec, json: *const c_char) -> bool {
    catch_unwind(|| {
        if spec.is_null() {
            return false;
        }
        let Some(json) = (unsafe { borrow_str(json) }) else {
            return false;
        };
        let spec = unsafe { &mut *spec };
        match serde_json::from_str::<serde_json::Value>(json) {
            Ok(parsed) => {
                spec.body = Body::Json(Value::from(parsed));
                true
            }
            Err(_) => false,
        }
    })
    .unwrap_or(false)
}

/// Set basic-auth credentials. Either may be null, meaning empty. Returns
/// false, leaving the old credentials, if either is not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn unirest_request_set_basic_auth(
    spec: *mut FfiRequestSpec,
    username: *const c_char,
    password: *const c_char,
) -> bool {
    catch_unwind(|| {
        if spec.is_null() {
            return false;
        }
        let (Some(username), Some(password)) =
            (unsafe { borrow_str_or_empty(username) }, unsafe { borrow_str_or_empty(password) })
        else {
            return false;
        };
        let spec = unsafe { &mut *spec };
        spec.username = username.to_string();
        spec.password = password.to_string();
        true
    })
    .unwrap_or(false)
}

/// Tell the request what the host transport's own TLS handshake timeout is.
/// The built request reports that baseline plus the fixed increment.
#[unsafe(no_mangle)]
pub extern "C" fn unirest_request_set_tls_baseline_ms(spec: *mut FfiRequestSpec, baseline_ms: u64) -> bool {
    catch_unwind(|| {
        if spec.is_null() {
            return false;
        }
        let spec = unsafe { &mut *spec };
        spec.set_tls_baseline(Duration::from_millis(baseline_ms));
        true
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Encode the request.
///
/// Returns null if `spec` is null or the body cannot be encoded.
/// The caller must free the returned pointer with `unirest_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn unirest_request_build(spec: *const FfiRequestSpec) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if spec.is_null() {
            return std::ptr::null_mut();
        }
        let spec = unsafe { &*spec };
        match spec.to_core().build() {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Normalize
// ---------------------------------------------------------------------------

/// Copy caller-provided headers into a multimap. Entries with a null key are
/// skipped; a null value reads as empty. Bytes that are not UTF-8 are
/// replaced, since response headers come from the network.
fn ffi_headers_to_core(headers: *const FfiHeaderRef, len: u32) -> Headers {
    let mut out = Headers::new();
    if headers.is_null() || len == 0 {
        return out;
    }
    let slice = unsafe { std::slice::from_raw_parts(headers, len as usize) };
    for h in slice {
        if h.key.is_null() {
            continue;
        }
        let key = unsafe { CStr::from_ptr(h.key) }.to_string_lossy().into_owned();
        let value = if h.value.is_null() {
            String::new()
        } else {
            unsafe { CStr::from_ptr(h.value) }.to_string_lossy().into_owned()
        };
        out.entry(key).or_default().push(value);
    }
    out
}

/// Normalize a response the host received.
///
/// `body` may be null when `body_len` is 0. `text` selects whether the
/// result carries a decoded text body. The FFI layer reads but does not
/// free the inputs. Free the result with `unirest_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn unirest_response_normalize(
    status: u16,
    body: *const u8,
    body_len: usize,
    headers: *const FfiHeaderRef,
    headers_len: u32,
    text: bool,
) -> *mut FfiResult {
    catch_unwind(|| {
        if body.is_null() && body_len > 0 {
            return FfiResult::null_arg("body");
        }
        let bytes: &[u8] = if body_len == 0 {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(body, body_len) }
        };
        let headers = ffi_headers_to_core(headers, headers_len);
        let mode = if text { BodyMode::Text } else { BodyMode::Binary };
        match normalize(status, bytes, headers, mode) {
            Ok(resp) => FfiResult::ok_response(resp),
            Err(e) => FfiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in unirest_response_normalize"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by `unirest_request_build`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn unirest_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        free_bytes(req.body, req.body_len);
        free_headers(req.headers, req.headers_len);
    });
}

/// Free an `FfiResult` returned by `unirest_response_normalize`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn unirest_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.data.is_null() {
            let resp = unsafe { Box::from_raw(result.data) };
            free_bytes(resp.raw_body, resp.raw_body_len);
            if !resp.body.is_null() {
                drop(unsafe { CString::from_raw(resp.body) });
            }
            free_headers(resp.headers, resp.headers_len);
        }
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
