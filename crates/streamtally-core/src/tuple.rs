//! The tuple wire format and query result units.
//!
//! An update or undo arrives from the stream runtime as an ordered 4-element
//! sequence `[cache, key, value, time]`. The `value` is the delta for an
//! update and the originally applied delta for an undo; result tuples carry
//! the new count in the same slot. Times have millisecond resolution.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TupleError;
use crate::types::{CacheId, Ident, TupleKey};

/// The update/undo wire unit: `[cache, key, value, time]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuple {
    /// Logical cache namespace.
    pub cache: CacheId,
    /// The counted relationship.
    pub key: TupleKey,
    /// Delta on input; updated count on output.
    pub value: i64,
    /// Event time (Unix ms).
    pub time: i64,
}

impl Tuple {
    /// Create a tuple from its components.
    pub fn new(cache: impl Into<CacheId>, key: TupleKey, value: i64, time: i64) -> Self {
        Self {
            cache: cache.into(),
            key,
            value,
            time,
        }
    }

    /// Decode the loose wire form.
    ///
    /// Rejections:
    /// - anything but a 4-element array is `InvalidShape`, as is a key that
    ///   does not decompose into subject|action|object;
    /// - a non-string cache or key, a non-integer value or time, or a
    ///   negative time is `InvalidValueType`.
    pub fn decode(raw: &Value) -> Result<Self, TupleError> {
        let elements = raw
            .as_array()
            .ok_or_else(|| TupleError::InvalidShape(format!("expected an array, got {}", raw)))?;
        if elements.len() != 4 {
            return Err(TupleError::arity(elements.len()));
        }

        let cache = elements[0]
            .as_str()
            .ok_or_else(|| TupleError::InvalidValueType {
                field: "cache",
                found: elements[0].to_string(),
            })?;
        let key = elements[1]
            .as_str()
            .ok_or_else(|| TupleError::InvalidValueType {
                field: "key",
                found: elements[1].to_string(),
            })?;
        let value = elements[2]
            .as_i64()
            .ok_or_else(|| TupleError::InvalidValueType {
                field: "value",
                found: elements[2].to_string(),
            })?;
        let time = elements[3]
            .as_i64()
            .filter(|t| *t >= 0)
            .ok_or_else(|| TupleError::InvalidValueType {
                field: "time",
                found: elements[3].to_string(),
            })?;

        Ok(Self {
            cache: CacheId::from(cache),
            key: TupleKey::parse(key)?,
            value,
            time,
        })
    }

    /// Encode back to the wire array form.
    pub fn encode(&self) -> Value {
        Value::Array(vec![
            Value::from(self.cache.as_str()),
            Value::from(self.key.to_string()),
            Value::from(self.value),
            Value::from(self.time),
        ])
    }
}

/// Query result unit for a single subject: (object, count, time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountTriple {
    pub object: Ident,
    pub count: i64,
    pub time: i64,
}

impl CountTriple {
    /// The zero-valued triple returned for an unseen key.
    pub fn absent(object: Ident) -> Self {
        Self {
            object,
            count: 0,
            time: 0,
        }
    }
}

/// Full query result unit: (subject, action, object, count, time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountTuple {
    pub subject: Ident,
    pub action: Ident,
    pub object: Ident,
    pub count: i64,
    pub time: i64,
}

impl CountTuple {
    /// The key this tuple was counted under.
    pub fn key(&self) -> TupleKey {
        TupleKey {
            subject: self.subject.clone(),
            action: self.action.clone(),
            object: self.object.clone(),
        }
    }
}
