//! Core type definitions for the SAML toolkit

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step in a path through a document tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Index into a sequence
    Index(usize),
    /// Key of a mapping
    Key(String),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Location of a node inside a document, from the root down
///
/// Serializes as a plain array (`["workflows", 0, "superagent"]`) so editors
/// can walk it without knowing this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The empty path, addressing the document root
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// A new path extended by one segment
    pub fn join(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Whether this path addresses the root
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path has no segments
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The segments of this path
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
            }
        }
        Ok(())
    }
}

/// Structural type of a generic document value, for error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Explicit null or empty YAML value
    Null,
    /// `true` / `false`
    Boolean,
    /// Integer or float
    Number,
    /// Text scalar
    String,
    /// Ordered sequence
    Sequence,
    /// Key/value mapping
    Object,
}

impl ValueType {
    /// Classify a generic value
    pub fn of(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Sequence,
            Value::Object(_) => Self::Object,
        }
    }

    /// Lower-case name used in messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Sequence => "sequence",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
