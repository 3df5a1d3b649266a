//! Value tree model.
//!
//! JSON-native nodes plus the special types the tag registry can carry over
//! the wire. Containers hold `Rc` children so a transformed tree shares
//! unchanged subtrees with its input and change detection is `Rc::ptr_eq`.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;
use serde_json::Number;

use crate::error::CodecError;

/// Caller-defined special value carried by [`Value::Ext`].
///
/// Implemented automatically for any `'static` type with `Debug` and
/// `PartialEq`. A custom transformer recognises its own type by downcasting
/// through [`as_any`](ExtValue::as_any).
pub trait ExtValue: fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn ext_eq(&self, other: &dyn ExtValue) -> bool;
}

impl<T: Any + fmt::Debug + PartialEq> ExtValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn ext_eq(&self, other: &dyn ExtValue) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }
}

/// A node in the value tree.
#[derive(Debug, Clone)]
pub enum Value {
    /// The absent-value marker.
    Undefined,
    Null,
    Bool(bool),
    Num(Number),
    Str(String),
    Arr(Vec<Rc<Value>>),
    /// Insertion-ordered mapping with unique string keys.
    Obj(IndexMap<String, Rc<Value>>),
    /// Arbitrary-precision integer.
    BigInt(BigInt),
    /// Raw byte sequence.
    Bin(Vec<u8>),
    /// Calendar timestamp, UTC.
    Date(DateTime<Utc>),
    /// Caller-defined special value, opaque to the tree walk.
    Ext(Rc<dyn ExtValue>),
}

impl Value {
    /// JSON scalar check used by the encode rule: strings, booleans and
    /// numbers always pass through untagged.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Value::Str(_) | Value::Bool(_) | Value::Num(_))
    }

    pub fn bigint(n: impl Into<BigInt>) -> Value {
        Value::BigInt(n.into())
    }

    pub fn bin(bytes: impl Into<Vec<u8>>) -> Value {
        Value::Bin(bytes.into())
    }

    /// Timestamp from milliseconds since the Unix epoch. `None` when `ms`
    /// falls outside the representable date range.
    pub fn date_ms(ms: i64) -> Option<Value> {
        DateTime::from_timestamp_millis(ms).map(Value::Date)
    }

    /// Builds a tree from a wire-level `serde_json` value, preserving
    /// object key order.
    pub fn from_json(json: serde_json::Value) -> Rc<Value> {
        Rc::new(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Num(n),
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Arr(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Obj(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from_json(value)))
                    .collect(),
            ),
        })
    }

    /// Lowers a tree back to a wire-level `serde_json` value.
    ///
    /// Only JSON-native nodes are representable; special types must have
    /// been tagged by [`TypeCodec::encode`](crate::TypeCodec::encode) first.
    pub fn to_json(&self) -> Result<serde_json::Value, CodecError> {
        Ok(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Num(n) => serde_json::Value::Number(n.clone()),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Arr(items) => serde_json::Value::Array(
                items.iter().map(|v| v.to_json()).collect::<Result<_, _>>()?,
            ),
            Value::Obj(entries) => {
                let mut map = serde_json::Map::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_json()?);
                }
                serde_json::Value::Object(map)
            }
            Value::Undefined => return Err(CodecError::Unrepresentable("undefined")),
            Value::BigInt(_) => return Err(CodecError::Unrepresentable("bigint")),
            Value::Bin(_) => return Err(CodecError::Unrepresentable("bytes")),
            Value::Date(_) => return Err(CodecError::Unrepresentable("date")),
            Value::Ext(_) => return Err(CodecError::Unrepresentable("extension")),
        })
    }
}

/// Structural deep equality. `Ext` values compare through
/// [`ExtValue::ext_eq`].
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Num(a), Value::Num(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Arr(a), Value::Arr(b)) => a == b,
            (Value::Obj(a), Value::Obj(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Bin(a), Value::Bin(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Ext(a), Value::Ext(b)) => a.ext_eq(b.as_ref()),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_round_trip_preserves_key_order() {
        let json = json!({"z": 1, "a": [true, null, "x"], "m": {"k": 2.5}});
        let value = Value::from_json(json.clone());
        assert_eq!(value.to_json().unwrap(), json);
        match value.as_ref() {
            Value::Obj(entries) => {
                let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
                assert_eq!(keys, ["z", "a", "m"]);
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn special_values_have_no_raw_json_form() {
        for value in [
            Value::Undefined,
            Value::bigint(7),
            Value::bin(*b"raw"),
            Value::date_ms(0).unwrap(),
        ] {
            assert!(matches!(
                value.to_json(),
                Err(CodecError::Unrepresentable(_))
            ));
        }
    }

    #[test]
    fn ext_equality_is_typed() {
        #[derive(Debug, PartialEq)]
        struct Point(i32, i32);

        let a = Value::Ext(Rc::new(Point(1, 2)));
        let b = Value::Ext(Rc::new(Point(1, 2)));
        let c = Value::Ext(Rc::new(Point(3, 4)));
        let other_type = Value::Ext(Rc::new("point".to_owned()));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, other_type);
    }
}
