//! Strong type definitions for the streamtally cache.
//!
//! Identifiers are newtypes over strings so subjects, actions, objects, and
//! cache namespaces cannot be mixed up at call sites. The cache treats them
//! as opaque: equality, hashing, and ordering are all that is required.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TupleError;

/// An opaque identifier: a subject, action, or object of a counted
/// relationship.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ident(String);

impl Ident {
    /// Create a new identifier.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ident({})", self.0)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ident {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Ident {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Ident {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Selector for a logical cache namespace.
///
/// One backing store may hold several logical caches; every wire tuple and
/// store access is scoped by a `CacheId`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheId(String);

impl CacheId {
    /// Create a new cache namespace id.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheId({})", self.0)
    }
}

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CacheId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The counted relationship: (subject, action, object).
///
/// On the wire a key travels as a single pipe-delimited string, e.g.
/// `"alice|like|post1"`. [`TupleKey::parse`] rejects anything that does not
/// decompose into exactly three non-empty segments.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TupleKey {
    pub subject: Ident,
    pub action: Ident,
    pub object: Ident,
}

impl TupleKey {
    /// Segment separator in the wire form.
    pub const SEPARATOR: char = '|';

    /// Create a key from its three components.
    pub fn new(
        subject: impl Into<Ident>,
        action: impl Into<Ident>,
        object: impl Into<Ident>,
    ) -> Self {
        Self {
            subject: subject.into(),
            action: action.into(),
            object: object.into(),
        }
    }

    /// Parse the pipe-delimited wire form.
    pub fn parse(s: &str) -> Result<Self, TupleError> {
        let mut segments = s.split(Self::SEPARATOR);
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(subj), Some(action), Some(obj), None)
                if !subj.is_empty() && !action.is_empty() && !obj.is_empty() =>
            {
                Ok(Self::new(subj, action, obj))
            }
            _ => Err(TupleError::InvalidShape(format!(
                "key {:?} does not split into subject|action|object",
                s
            ))),
        }
    }
}

impl fmt::Debug for TupleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TupleKey({})", self)
    }
}

impl fmt::Display for TupleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.subject,
            self.action,
            self.object,
            sep = Self::SEPARATOR
        )
    }
}

/// A type-safe "no filter" choice for query parameters.
///
/// `Any` matches every candidate; `Exactly(v)` matches only `v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<T> {
    Any,
    Exactly(T),
}

impl<'a, T: PartialEq> Filter<&'a T> {
    /// Check whether a candidate passes the filter.
    pub fn matches(&self, candidate: &T) -> bool {
        match self {
            Filter::Any => true,
            Filter::Exactly(v) => *v == candidate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parse_roundtrip() {
        let key = TupleKey::parse("alice|like|post1").unwrap();
        assert_eq!(key.subject.as_str(), "alice");
        assert_eq!(key.action.as_str(), "like");
        assert_eq!(key.object.as_str(), "post1");
        assert_eq!(key.to_string(), "alice|like|post1");
    }

    #[test]
    fn test_key_parse_rejects_wrong_arity() {
        assert!(TupleKey::parse("alice|like").is_err());
        assert!(TupleKey::parse("alice|like|post1|extra").is_err());
        assert!(TupleKey::parse("").is_err());
    }

    #[test]
    fn test_key_parse_rejects_empty_segment() {
        assert!(TupleKey::parse("alice||post1").is_err());
        assert!(TupleKey::parse("|like|post1").is_err());
        assert!(TupleKey::parse("alice|like|").is_err());
    }

    #[test]
    fn test_key_ordering_is_by_components() {
        let a = TupleKey::new("a", "x", "1");
        let b = TupleKey::new("a", "y", "0");
        let c = TupleKey::new("b", "a", "0");
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_filter_matches() {
        let like = Ident::from("like");
        let share = Ident::from("share");

        assert!(Filter::<&Ident>::Any.matches(&like));
        assert!(Filter::Exactly(&like).matches(&like));
        assert!(!Filter::Exactly(&like).matches(&share));
    }

    #[test]
    fn test_ident_debug() {
        let id = Ident::from("alice");
        assert_eq!(format!("{:?}", id), "Ident(alice)");
    }
}
