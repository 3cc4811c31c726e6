//! Dynamically-typed values for headers, form fields, and JSON bodies.
//!
//! # Design
//! `Value` is a closed set of kinds. Each kind knows its own canonical string
//! form and its own notion of "zero". Numbers and booleans are never zero:
//! `0` and `false` are meaningful on the wire. Every other kind is zero when
//! it is empty, and a list or map is zero only when every member is zero.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// A header, form field, or JSON body value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Convert any serializable value by way of its JSON representation.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Value::from)
    }

    /// Whether this value counts as empty for header and form purposes.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(_) | Value::Int(_) | Value::UInt(_) | Value::F32(_) | Value::F64(_) => false,
            Value::Str(s) => s.is_empty(),
            Value::Timestamp(t) => Some(*t) == zero_timestamp(),
            Value::Uuid(id) => id.is_nil(),
            Value::List(items) => items.iter().all(Value::is_zero),
            Value::Map(fields) => fields.values().all(Value::is_zero),
        }
    }

    /// Lists and maps; everything else is a scalar.
    pub fn is_structured(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    /// Canonical string form, or `default` when the value is zero.
    pub fn stringify(&self, default: &str) -> String {
        if self.is_zero() {
            return default.to_string();
        }
        match self {
            Value::Null => default.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::UInt(u) => u.to_string(),
            Value::F32(f) => f.to_string(),
            Value::F64(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            Value::Timestamp(t) => t.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Value::Uuid(id) => id.hyphenated().to_string(),
            Value::List(_) | Value::Map(_) => {
                serde_json::to_string(self).unwrap_or_else(|_| default.to_string())
            }
        }
    }
}

/// The zero instant, 0001-01-01T00:00:00Z. The Unix epoch is a real time.
fn zero_timestamp() -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}

/// Canonical string form of `value`, or `default` when it is zero.
pub fn stringify(value: &Value, default: &str) -> String {
    value.stringify(default)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::UInt(u) => serializer.serialize_u64(*u),
            Value::F32(f) if !f.is_finite() => Err(S::Error::custom(format!("non-finite number {f}"))),
            Value::F32(f) => serializer.serialize_f32(*f),
            Value::F64(f) if !f.is_finite() => Err(S::Error::custom(format!("non-finite number {f}"))),
            Value::F64(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Timestamp(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Uuid(id) => id.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty, $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int, i64, i8, i16, i32, i64, isize);
impl_from_int!(UInt, u64, u8, u16, u32, u64, usize);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::Timestamp(v.with_timezone(&Utc))
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(v: BTreeMap<String, T>) -> Self {
        Value::Map(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(v: HashMap<String, T>) -> Self {
        Value::Map(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::F64(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(fields) => {
                Value::Map(fields.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn numeric_and_bool_zeros_are_not_suppressed() {
        assert_eq!(stringify(&Value::from(0), "x"), "0");
        assert_eq!(stringify(&Value::from(0u8), "x"), "0");
        assert_eq!(stringify(&Value::from(0.0), "x"), "0");
        assert_eq!(stringify(&Value::from(false), "x"), "false");
    }

    #[test]
    fn empty_values_fall_back_to_default() {
        assert_eq!(stringify(&Value::from(""), "x"), "x");
        assert_eq!(stringify(&Value::Null, "x"), "x");
        assert_eq!(stringify(&Value::from(None::<i32>), "x"), "x");
        assert_eq!(stringify(&Value::from(Uuid::nil()), "x"), "x");
        let zero = Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(stringify(&Value::Timestamp(zero), "x"), "x");
        assert_eq!(stringify(&Value::List(Vec::new()), "x"), "x");
        assert_eq!(stringify(&Value::Map(BTreeMap::new()), "x"), "x");
    }

    #[test]
    fn integers_keep_sign_and_width() {
        assert_eq!(Value::from(-42i8).stringify(""), "-42");
        assert_eq!(Value::from(u64::MAX).stringify(""), "18446744073709551615");
        assert_eq!(Value::from(i64::MIN).stringify(""), "-9223372036854775808");
    }

    #[test]
    fn floats_round_trip_without_exponent() {
        let s = Value::from(3.14).stringify("");
        assert_eq!(s, "3.14");
        assert_eq!(s.parse::<f64>().unwrap(), 3.14);

        assert_eq!(Value::from(3.14f32).stringify(""), "3.14");
        assert_eq!(Value::from(1e21).stringify(""), "1000000000000000000000");
        assert_eq!(Value::from(0.0000001).stringify(""), "0.0000001");
    }

    #[test]
    fn strings_pass_through_unchanged() {
        assert_eq!(Value::from("  a b ").stringify("x"), "  a b ");
    }

    #[test]
    fn timestamps_use_rfc3339() {
        let t = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();
        let s = Value::from(t).stringify("");
        assert_eq!(s, "2024-05-17T08:30:00Z");
        assert_eq!(DateTime::parse_from_rfc3339(&s).unwrap(), t);
    }

    #[test]
    fn unix_epoch_is_not_zero() {
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert!(!Value::from(epoch).is_zero());
        assert_eq!(Value::from(epoch).stringify("dflt"), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn uuids_are_hyphenated() {
        let id = Uuid::parse_str("67E55044-10B1-426F-9247-BB680E5FE0C8").unwrap();
        assert_eq!(Value::from(id).stringify(""), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn structured_values_stringify_as_json() {
        let v = Value::from(json!({"b": [1, 2], "a": "x"}));
        assert_eq!(v.stringify(""), r#"{"a":"x","b":[1,2]}"#);
        assert_eq!(Value::from(vec![1, 2, 3]).stringify(""), "[1,2,3]");
    }

    #[test]
    fn structured_zero_requires_every_member_zero() {
        assert!(Value::from(json!({"a": "", "b": null, "c": {"d": []}})).is_zero());
        assert!(!Value::from(json!({"a": "", "b": 0})).is_zero());
        assert!(!Value::from(json!({"a": "", "b": false})).is_zero());
        assert_eq!(Value::from(json!({"a": ""})).stringify("dflt"), "dflt");
        assert_eq!(Value::from(json!({"a": "", "n": 0})).stringify(""), r#"{"a":"","n":0}"#);
    }

    #[test]
    fn json_numbers_map_to_native_kinds() {
        assert_eq!(Value::from(json!(7)), Value::Int(7));
        assert_eq!(Value::from(json!(u64::MAX)), Value::UInt(u64::MAX));
        assert_eq!(Value::from(json!(1.5)), Value::F64(1.5));
    }

    #[test]
    fn non_finite_numbers_fail_to_serialize() {
        let v = Value::List(vec![Value::from(1), Value::F64(f64::NAN)]);
        assert!(serde_json::to_vec(&v).is_err());
        assert_eq!(v.stringify("dflt"), "dflt");
    }

    #[test]
    fn from_serialize_goes_through_json() {
        #[derive(Serialize)]
        struct Point {
            x: i32,
            label: &'static str,
        }
        let v = Value::from_serialize(&Point { x: 0, label: "" }).unwrap();
        assert!(!v.is_zero());
        assert_eq!(v.stringify(""), r#"{"label":"","x":0}"#);
    }
}
