//! Validation finding types.

use crate::types::FieldPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A required key is absent (or the root cannot hold it)
    MissingRequiredField,
    /// A value has the wrong structural type, or nests too deeply
    WrongType,
    /// A key outside a closed set, or a second variant key
    UnknownKey,
    /// A sequence that is allowed but empty; does not affect validity
    EmptySequence,
}

impl ErrorKind {
    /// Whether findings of this kind leave the document valid.
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::EmptySequence)
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Keys and indices leading to the offending node
    pub path: FieldPath,
    /// Human-readable description
    pub message: String,
    /// Category
    pub kind: ErrorKind,
}

impl ValidationError {
    /// Create a finding.
    pub fn new(path: FieldPath, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            kind,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Aggregated outcome of validating one document.
///
/// `errors` holds every finding in document order, informational notices
/// included; `valid` is false as soon as one non-informational finding exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the document is structurally acceptable
    pub valid: bool,
    /// All findings, in document order
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Build a result, deriving `valid` from the findings.
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        let valid = errors.iter().all(|e| e.kind.is_informational());
        Self { valid, errors }
    }

    /// Findings that make the document invalid.
    pub fn blocking(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(|e| !e.kind.is_informational())
    }

    /// Informational findings only.
    pub fn notices(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(|e| e.kind.is_informational())
    }

    /// Findings of one kind.
    pub fn errors_of_kind(&self, kind: ErrorKind) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.kind == kind).collect()
    }

    /// True when there are no findings at all, notices included.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "valid");
        }
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let level = if error.kind.is_informational() {
                "notice"
            } else {
                "error"
            };
            write!(f, "{} [{:?}] {}", level, error.kind, error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn finding(kind: ErrorKind) -> ValidationError {
        ValidationError::new(FieldPath::root().join("workflows"), kind, "test")
    }

    #[test]
    fn test_empty_result_is_valid() {
        let result = ValidationResult::from_errors(vec![]);
        assert!(result.valid);
        assert!(result.is_clean());
        assert_eq!(result.to_string(), "valid");
    }

    #[test]
    fn test_notices_do_not_invalidate() {
        let result = ValidationResult::from_errors(vec![finding(ErrorKind::EmptySequence)]);
        assert!(result.valid);
        assert!(!result.is_clean());
        assert_eq!(result.notices().count(), 1);
        assert_eq!(result.blocking().count(), 0);
    }

    #[test]
    fn test_mixed_findings() {
        let result = ValidationResult::from_errors(vec![
            finding(ErrorKind::EmptySequence),
            finding(ErrorKind::WrongType),
            finding(ErrorKind::UnknownKey),
        ]);
        assert!(!result.valid);
        assert_eq!(result.blocking().count(), 2);
        assert_eq!(result.errors_of_kind(ErrorKind::UnknownKey).len(), 1);
    }

    #[test]
    fn test_serialized_shape() {
        let result = ValidationResult::from_errors(vec![ValidationError::new(
            FieldPath::root(),
            ErrorKind::MissingRequiredField,
            "workflows is required",
        )]);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "valid": false,
                "errors": [{
                    "path": [],
                    "message": "workflows is required",
                    "kind": "MissingRequiredField"
                }]
            })
        );
    }

    #[test]
    fn test_display_lists_findings() {
        let result = ValidationResult::from_errors(vec![
            finding(ErrorKind::EmptySequence),
            finding(ErrorKind::WrongType),
        ]);
        let text = result.to_string();
        assert!(text.starts_with("notice [EmptySequence] workflows: test"));
        assert!(text.contains("error [WrongType] workflows: test"));
    }
}
