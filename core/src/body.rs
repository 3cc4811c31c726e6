//! Request body variants and their wire encodings.
//!
//! A body is either absent, a flat set of form fields, or a JSON payload.
//! The variant is chosen explicitly by the caller, or by `Body::classify`
//! when all the caller has is a dynamic `Value`.

use std::collections::BTreeMap;

use crate::error::EncodingError;
use crate::value::Value;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// What goes in the request body.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Body {
    #[default]
    Absent,
    /// Encoded as `application/x-www-form-urlencoded`.
    Form(BTreeMap<String, Value>),
    /// Encoded as JSON.
    Json(Value),
}

impl Body {
    /// Pick a variant from the shape of `value`.
    ///
    /// Null is no body. A map whose members are all scalars is form data.
    /// Anything else, nested maps, lists and bare scalars included, is JSON.
    /// To send nested values as form fields, each stringified as JSON, build
    /// `Body::Form` directly.
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Null => Body::Absent,
            Value::Map(fields) if fields.values().all(|v| !v.is_structured()) => Body::Form(fields),
            other => Body::Json(other),
        }
    }

    pub fn form<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Body::Form(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn json(value: impl Into<Value>) -> Self {
        Body::Json(value.into())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Body::Absent)
    }

    /// Encode to wire bytes. `None` for an absent body.
    pub(crate) fn encode(&self) -> Result<Option<EncodedBody>, EncodingError> {
        match self {
            Body::Absent => Ok(None),
            Body::Form(fields) => {
                let pairs: Vec<(&str, String)> = fields
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.stringify("")))
                    .filter(|(_, v)| !v.is_empty())
                    .collect();
                let encoded = serde_urlencoded::to_string(&pairs)?;
                Ok(Some(EncodedBody {
                    bytes: encoded.into_bytes(),
                    content_type: FORM_CONTENT_TYPE,
                    declare_length: false,
                }))
            }
            Body::Json(value) => {
                let bytes = serde_json::to_vec(value)?;
                Ok(Some(EncodedBody {
                    bytes,
                    content_type: JSON_CONTENT_TYPE,
                    declare_length: true,
                }))
            }
        }
    }
}

/// Body bytes plus the content headers that describe them.
#[derive(Debug)]
pub(crate) struct EncodedBody {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    /// Whether an explicit `Content-Length` header is emitted.
    pub declare_length: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_map_classifies_as_form() {
        let body = Body::classify(Value::from(json!({"a": 1, "b": "x", "c": null})));
        assert!(matches!(body, Body::Form(ref f) if f.len() == 3));
    }

    #[test]
    fn nested_and_scalar_values_classify_as_json() {
        assert!(matches!(Body::classify(Value::from(json!({"a": {"b": 1}}))), Body::Json(_)));
        assert!(matches!(Body::classify(Value::from(json!([1, 2]))), Body::Json(_)));
        assert!(matches!(Body::classify(Value::from(42)), Body::Json(_)));
        assert!(Body::classify(Value::Null).is_absent());
    }

    #[test]
    fn form_encoding_skips_empty_fields() {
        let body = Body::form([
            ("name", Value::from("a b&c")),
            ("empty", Value::from("")),
            ("none", Value::Null),
            ("zero", Value::from(0)),
        ]);
        let encoded = body.encode().unwrap().unwrap();
        assert_eq!(String::from_utf8(encoded.bytes).unwrap(), "name=a+b%26c&zero=0");
        assert_eq!(encoded.content_type, FORM_CONTENT_TYPE);
        assert!(!encoded.declare_length);
    }

    #[test]
    fn explicit_form_stringifies_nested_values_as_json() {
        let body = Body::form([("tags", Value::from(vec![1, 2]))]);
        let encoded = body.encode().unwrap().unwrap();
        assert_eq!(String::from_utf8(encoded.bytes).unwrap(), "tags=%5B1%2C2%5D");
    }

    #[test]
    fn json_encoding_fails_on_non_finite_numbers() {
        let body = Body::json(Value::Map(BTreeMap::from([("x".to_string(), Value::F64(f64::INFINITY))])));
        assert!(matches!(body.encode(), Err(EncodingError::Json(_))));
    }

    #[test]
    fn absent_encodes_to_nothing() {
        assert!(Body::Absent.encode().unwrap().is_none());
    }
}
