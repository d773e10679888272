//! Property value types for graph nodes and edges
//!
//! Every value has a canonical byte encoding. Property filters in queries
//! compare against that encoding, so `Integer(21)` and `String("21")` are
//! indistinguishable to a filter while still round-tripping with their kind.

use super::store::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of kinds a property value can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    String,
    Integer,
    Boolean,
    Bytes,
}

impl PropertyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::String => "string",
            PropertyKind::Integer => "integer",
            PropertyKind::Boolean => "boolean",
            PropertyKind::Bytes => "bytes",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" | "str" => Ok(PropertyKind::String),
            "integer" | "int" => Ok(PropertyKind::Integer),
            "boolean" | "bool" => Ok(PropertyKind::Boolean),
            "bytes" | "raw" => Ok(PropertyKind::Bytes),
            other => Err(GraphError::InvalidProperty {
                kind: other.to_string(),
                reason: "unknown property kind".to_string(),
            }),
        }
    }
}

/// Property value type
///
/// Supports:
/// - String
/// - Integer (i64)
/// - Boolean
/// - Bytes (opaque payload)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Bytes(Vec<u8>),
}

impl PropertyValue {
    /// Decode a typed byte payload (as carried by the service layer)
    pub fn decode(kind: &str, bytes: &[u8]) -> GraphResult<Self> {
        let kind: PropertyKind = kind.parse()?;
        Self::decode_kind(kind, bytes)
    }

    /// Decode a byte payload of a known kind
    pub fn decode_kind(kind: PropertyKind, bytes: &[u8]) -> GraphResult<Self> {
        let invalid = |reason: &str| GraphError::InvalidProperty {
            kind: kind.to_string(),
            reason: reason.to_string(),
        };

        match kind {
            PropertyKind::Bytes => Ok(PropertyValue::Bytes(bytes.to_vec())),
            PropertyKind::String => std::str::from_utf8(bytes)
                .map(|s| PropertyValue::String(s.to_string()))
                .map_err(|_| invalid("payload is not valid UTF-8")),
            PropertyKind::Integer => std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .map(PropertyValue::Integer)
                .ok_or_else(|| invalid("payload is not a decimal integer")),
            PropertyKind::Boolean => match bytes {
                b"true" => Ok(PropertyValue::Boolean(true)),
                b"false" => Ok(PropertyValue::Boolean(false)),
                _ => Err(invalid("payload is neither \"true\" nor \"false\"")),
            },
        }
    }

    /// Kind tag of this value
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::String(_) => PropertyKind::String,
            PropertyValue::Integer(_) => PropertyKind::Integer,
            PropertyValue::Boolean(_) => PropertyKind::Boolean,
            PropertyValue::Bytes(_) => PropertyKind::Bytes,
        }
    }

    /// Canonical byte encoding, borrowed where the value already holds bytes
    pub fn as_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            PropertyValue::String(s) => Cow::Borrowed(s.as_bytes()),
            PropertyValue::Bytes(b) => Cow::Borrowed(b.as_slice()),
            PropertyValue::Integer(i) => Cow::Owned(i.to_string().into_bytes()),
            PropertyValue::Boolean(true) => Cow::Borrowed(b"true"),
            PropertyValue::Boolean(false) => Cow::Borrowed(b"false"),
        }
    }

    /// Canonical byte encoding as an owned buffer
    pub fn encode(&self) -> Vec<u8> {
        self.as_bytes().into_owned()
    }

    /// Byte-exact comparison against a canonical encoding
    pub fn matches_encoded(&self, bytes: &[u8]) -> bool {
        self.as_bytes().as_ref() == bytes
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&[u8]> {
        match self {
            PropertyValue::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "\"{}\"", s),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
            PropertyValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

// Convenience conversions
impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Integer(i as i64)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(b: Vec<u8>) -> Self {
        PropertyValue::Bytes(b)
    }
}

/// Property map for storing node and edge properties
pub type PropertyMap = HashMap<String, PropertyValue>;

/// Build a property map from key/value pairs
pub fn properties<K, V, I>(pairs: I) -> PropertyMap
where
    K: Into<String>,
    V: Into<PropertyValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
