//! Structural validation of workflow documents
//!
//! The validator works on a generic document tree (`serde_json::Value`), as
//! produced by any YAML or JSON parser, and never parses text itself. It
//! checks shape and scalar types only: whether a URL resolves or a model is
//! supported is left to downstream consumers.
//!
//! All findings are collected in a single depth-first, pre-order pass, in
//! document order. The one exception is a root that cannot hold a
//! `workflows` sequence: nothing below it can be addressed, so validation
//! stops with a single finding.

mod types;

pub use types::{ErrorKind, ValidationError, ValidationResult};

use crate::catalog::{StepKind, ToolKind};
use crate::config::SamlConfig;
use crate::types::{FieldPath, ValueType};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Default bound on how deep a document may nest
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Structural validator for workflow documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    max_depth: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Validator {
    /// Create a validator with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator from loaded configuration
    pub fn from_config(config: &SamlConfig) -> Self {
        Self::new().with_max_depth(config.max_depth)
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Maximum nesting depth
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Validate a parsed document
    pub fn validate(&self, document: &Value) -> ValidationResult {
        let mut walk = Walk {
            max_depth: self.max_depth,
            errors: Vec::new(),
        };
        walk.document(document);

        let result = ValidationResult::from_errors(walk.errors);
        tracing::debug!(
            valid = result.valid,
            findings = result.errors.len(),
            "validated workflow document"
        );
        result
    }
}

/// Validate a parsed document with default limits
pub fn validate(document: &Value) -> ValidationResult {
    Validator::default().validate(document)
}

struct Walk {
    max_depth: usize,
    errors: Vec<ValidationError>,
}

impl Walk {
    fn push(&mut self, path: FieldPath, kind: ErrorKind, message: impl Into<String>) {
        self.errors.push(ValidationError::new(path, kind, message));
    }

    fn document(&mut self, document: &Value) {
        let root = FieldPath::root();
        let steps = match document {
            Value::Object(map) => match map.get("workflows") {
                None | Some(Value::Null) => {
                    self.push(root, ErrorKind::MissingRequiredField, "workflows is required");
                    return;
                }
                Some(Value::Array(steps)) => steps,
                Some(other) => {
                    self.push(
                        root,
                        ErrorKind::MissingRequiredField,
                        format!(
                            "workflows is required to be a sequence, found {}",
                            ValueType::of(other)
                        ),
                    );
                    return;
                }
            },
            other => {
                self.push(
                    root,
                    ErrorKind::MissingRequiredField,
                    format!(
                        "workflows is required, but the document root is a {}",
                        ValueType::of(other)
                    ),
                );
                return;
            }
        };

        let path = root.join("workflows");
        if steps.is_empty() {
            self.push(
                path.clone(),
                ErrorKind::EmptySequence,
                "workflows is empty; the document defines no steps",
            );
        }
        for (index, step) in steps.iter().enumerate() {
            self.step(path.join(index), step);
        }
    }

    fn step(&mut self, path: FieldPath, value: &Value) {
        if let Some(map) = self.object(&path, value) {
            self.variant(&path, map, "step", &StepKind::ALL, Self::agent);
        }
    }

    fn agent(&mut self, path: FieldPath, value: &Value) {
        if !self.within_depth(&path) {
            return;
        }
        let Some(map) = self.object(&path, value) else {
            return;
        };
        for (key, value) in map {
            let field = path.join(key.as_str());
            match key.as_str() {
                "name" | "llm" | "prompt" | "intro" => self.string(field, value),
                "tools" => {
                    if let Some(entries) = self.sequence(&field, value) {
                        for (index, entry) in entries.iter().enumerate() {
                            self.tool_ref(field.join(index), entry);
                        }
                    }
                }
                "data" => {
                    if let Some(data) = self.optional_object(&field, value) {
                        self.data_source(&field, data);
                    }
                }
                "superrag" => {
                    if let Some(entries) = self.sequence(&field, value) {
                        for (index, entry) in entries.iter().enumerate() {
                            self.superrag_entry(field.join(index), entry);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn tool_ref(&mut self, path: FieldPath, value: &Value) {
        if let Some(map) = self.object(&path, value) {
            self.variant(&path, map, "tool", &ToolKind::ALL, Self::tool_spec);
        }
    }

    fn tool_spec(&mut self, path: FieldPath, value: &Value) {
        if !self.within_depth(&path) {
            return;
        }
        let Some(map) = self.object(&path, value) else {
            return;
        };
        for (key, value) in map {
            let field = path.join(key.as_str());
            match key.as_str() {
                "name" | "use_for" => self.string(field, value),
                "metadata" => {
                    if let Some(metadata) = self.optional_object(&field, value) {
                        self.tool_metadata(&field, metadata);
                    }
                }
                _ => {}
            }
        }
    }

    fn tool_metadata(&mut self, path: &FieldPath, map: &Map<String, Value>) {
        for (key, value) in map {
            let field = path.join(key.as_str());
            match key.as_str() {
                "headers" => {
                    if let Some(headers) = self.optional_object(&field, value) {
                        for (name, header) in headers {
                            if !header.is_string() {
                                self.wrong_type(field.join(name.as_str()), "string", header);
                            }
                        }
                    }
                }
                "url" | "method" => self.string(field, value),
                "body" => {
                    if self.optional_object(&field, value).is_some() {
                        self.free_form(field, value);
                    }
                }
                // provider-specific keys are unconstrained, only bounded
                _ => self.free_form(field, value),
            }
        }
    }

    fn data_source(&mut self, path: &FieldPath, map: &Map<String, Value>) {
        for (key, value) in map {
            let field = path.join(key.as_str());
            match key.as_str() {
                "urls" => self.string_list(field, value),
                "use_for" => self.string(field, value),
                _ => {}
            }
        }
    }

    fn superrag_entry(&mut self, path: FieldPath, value: &Value) {
        let Some(map) = self.object(&path, value) else {
            return;
        };
        match map.get("index") {
            Some(index) => self.index_spec(path.join("index"), index),
            None => self.push(
                path,
                ErrorKind::MissingRequiredField,
                "superrag entry requires `index`",
            ),
        }
    }

    fn index_spec(&mut self, path: FieldPath, value: &Value) {
        if !self.within_depth(&path) {
            return;
        }
        let Some(map) = self.object(&path, value) else {
            return;
        };
        for (key, value) in map {
            let field = path.join(key.as_str());
            match key.as_str() {
                "name" | "use_for" | "database_provider" => self.string(field, value),
                "urls" => self.string_list(field, value),
                "encoder" => {
                    if self.optional_object(&field, value).is_some() {
                        self.free_form(field, value);
                    }
                }
                _ => {}
            }
        }
    }

    /// Check a mapping that must select exactly one variant of `K` by key.
    ///
    /// An entry gets at most one selection finding, placed at its first
    /// offending key; every recognized body is still checked.
    fn variant<K>(
        &mut self,
        path: &FieldPath,
        map: &Map<String, Value>,
        what: &str,
        allowed: &[K],
        mut body: impl FnMut(&mut Self, FieldPath, &Value),
    ) where
        K: FromStr + fmt::Display + Copy,
    {
        if map.is_empty() {
            self.push(
                path.clone(),
                ErrorKind::MissingRequiredField,
                format!("{} must declare one of: {}", what, key_list(allowed)),
            );
            return;
        }

        let mut chosen: Option<K> = None;
        // offending keys seen before and after the chosen one
        let mut unknown: Vec<&str> = Vec::new();
        let mut extra: Vec<&str> = Vec::new();
        let mut finding: Option<usize> = None;
        for (key, value) in map {
            let key_path = path.join(key.as_str());
            let parsed = key.parse::<K>().ok();
            match (parsed, chosen) {
                (Some(kind), None) => chosen = Some(kind),
                _ => {
                    if chosen.is_some() {
                        extra.push(key);
                    } else {
                        unknown.push(key);
                    }
                    if finding.is_none() {
                        finding = Some(self.errors.len());
                        self.push(key_path.clone(), ErrorKind::UnknownKey, String::new());
                    }
                }
            }
            if parsed.is_some() {
                body(self, key_path, value);
            }
        }

        if let Some(index) = finding {
            let mut parts = Vec::new();
            if !unknown.is_empty() {
                parts.push(format!(
                    "unknown {} key {}; expected one of: {}",
                    what,
                    quoted(&unknown),
                    key_list(allowed)
                ));
            }
            if let (Some(kind), false) = (chosen, extra.is_empty()) {
                parts.push(format!(
                    "{} already declares `{}`; unexpected {}",
                    what,
                    kind,
                    quoted(&extra)
                ));
            }
            self.errors[index].message = parts.join("; ");
        }
    }

    fn within_depth(&mut self, path: &FieldPath) -> bool {
        if path.len() > self.max_depth {
            self.push(
                path.clone(),
                ErrorKind::WrongType,
                format!("value nests deeper than the maximum depth of {}", self.max_depth),
            );
            return false;
        }
        true
    }

    /// Bound the depth of an unconstrained value without recursing.
    fn free_form(&mut self, path: FieldPath, value: &Value) {
        let mut stack = vec![(path, value)];
        while let Some((path, value)) = stack.pop() {
            if !self.within_depth(&path) {
                return;
            }
            match value {
                Value::Array(items) => {
                    for (index, item) in items.iter().enumerate().rev() {
                        stack.push((path.join(index), item));
                    }
                }
                Value::Object(map) => {
                    for (key, item) in map.iter().rev() {
                        stack.push((path.join(key.as_str()), item));
                    }
                }
                _ => {}
            }
        }
    }

    fn wrong_type(&mut self, path: FieldPath, expected: &str, found: &Value) {
        self.push(
            path,
            ErrorKind::WrongType,
            format!("expected {}, found {}", expected, ValueType::of(found)),
        );
    }

    /// A mapping that must be present and non-null.
    fn object<'v>(&mut self, path: &FieldPath, value: &'v Value) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.wrong_type(path.clone(), "object", other);
                None
            }
        }
    }

    fn optional_object<'v>(
        &mut self,
        path: &FieldPath,
        value: &'v Value,
    ) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Null => None,
            other => self.object(path, other),
        }
    }

    fn sequence<'v>(&mut self, path: &FieldPath, value: &'v Value) -> Option<&'v Vec<Value>> {
        match value {
            Value::Null => None,
            Value::Array(items) => Some(items),
            other => {
                self.wrong_type(path.clone(), "sequence", other);
                None
            }
        }
    }

    fn string(&mut self, path: FieldPath, value: &Value) {
        if !matches!(value, Value::Null | Value::String(_)) {
            self.wrong_type(path, "string", value);
        }
    }

    fn string_list(&mut self, path: FieldPath, value: &Value) {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        self.wrong_type(path.join(index), "string", item);
                    }
                }
            }
            other => self.wrong_type(path, "sequence of strings", other),
        }
    }
}

fn quoted(keys: &[&str]) -> String {
    keys.iter()
        .map(|key| format!("`{}`", key))
        .collect::<Vec<_>>()
        .join(", ")
}

fn key_list<K: fmt::Display>(keys: &[K]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PathSegment;
    use serde_json::json;

    fn path(segments: &[PathSegment]) -> FieldPath {
        segments.iter().cloned().collect()
    }

    fn key(k: &str) -> PathSegment {
        PathSegment::from(k)
    }

    fn idx(i: usize) -> PathSegment {
        PathSegment::from(i)
    }

    fn earnings_document() -> Value {
        json!({
            "workflows": [{
                "superagent": {
                    "name": "Earnings assistant",
                    "llm": "gpt-4-1106-preview",
                    "prompt": "Use the earnings report",
                    "data": {
                        "urls": ["https://example.com/report.pdf"],
                        "use_for": "Answering questions"
                    }
                }
            }]
        })
    }

    #[test]
    fn test_earnings_assistant_is_valid() {
        let result = validate(&earnings_document());
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_empty_document_requires_workflows() {
        let result = validate(&json!({}));
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![ValidationError::new(
                FieldPath::root(),
                ErrorKind::MissingRequiredField,
                "workflows is required",
            )]
        );
    }

    #[test]
    fn test_root_shape_failure_is_fatal() {
        for document in [
            json!({"workflows": null, "other": [{"superagent": 5}]}),
            json!({"workflows": {"superagent": {}}}),
            json!("workflows"),
            json!([{"superagent": {}}]),
        ] {
            let result = validate(&document);
            assert!(!result.valid);
            assert_eq!(result.errors.len(), 1, "{}", document);
            assert_eq!(result.errors[0].kind, ErrorKind::MissingRequiredField);
            assert!(result.errors[0].path.is_root());
        }
    }

    #[test]
    fn test_empty_workflows_is_a_notice() {
        let result = validate(&json!({"workflows": []}));
        assert!(result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ErrorKind::EmptySequence);
        assert_eq!(result.errors[0].path, path(&[key("workflows")]));
    }

    #[test]
    fn test_unknown_tool_key() {
        let document = json!({
            "workflows": [{
                "superagent": {
                    "name": "Tools",
                    "tools": [{"unknown_tool": {"name": "x"}}]
                }
            }]
        });
        let result = validate(&document);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ErrorKind::UnknownKey);
        assert_eq!(
            result.errors[0].path,
            path(&[
                key("workflows"),
                idx(0),
                key("superagent"),
                key("tools"),
                idx(0),
                key("unknown_tool"),
            ])
        );
    }

    #[test]
    fn test_tool_entries_need_exactly_one_recognized_key() {
        let document = json!({
            "workflows": [{
                "superagent": {
                    "tools": [
                        {"browser": {"name": "ok"}},
                        {},
                        {"http": {"name": "a"}, "browser": {"name": "b"}}
                    ]
                }
            }]
        });
        let result = validate(&document);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);

        let tools = path(&[key("workflows"), idx(0), key("superagent"), key("tools")]);
        assert_eq!(result.errors[0].kind, ErrorKind::MissingRequiredField);
        assert_eq!(result.errors[0].path, tools.join(1usize));
        assert_eq!(result.errors[1].kind, ErrorKind::UnknownKey);
        assert_eq!(result.errors[1].path, tools.join(2usize).join("browser"));
        assert!(result.errors[1].message.contains("already declares `http`"));
    }

    #[test]
    fn test_step_without_recognized_key() {
        let result = validate(&json!({"workflows": [{"llm": {"name": "x"}}, {}]}));
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].kind, ErrorKind::UnknownKey);
        assert_eq!(result.errors[0].path, path(&[key("workflows"), idx(0), key("llm")]));
        assert_eq!(result.errors[1].kind, ErrorKind::MissingRequiredField);
        assert_eq!(result.errors[1].path, path(&[key("workflows"), idx(1)]));
    }

    #[test]
    fn test_one_selection_finding_per_entry() {
        let result = validate(&json!({
            "workflows": [{
                "superagent": {
                    "tools": [
                        {"foo": {}, "bar": {}},
                        {"browser": {"name": 3}, "http": {}, "extra": 1}
                    ]
                }
            }]
        }));
        let found: Vec<(String, ErrorKind)> = result
            .errors
            .iter()
            .map(|e| (e.path.to_string(), e.kind))
            .collect();
        assert_eq!(
            found,
            vec![
                ("workflows[0].superagent.tools[0].foo".to_string(), ErrorKind::UnknownKey),
                ("workflows[0].superagent.tools[1].browser.name".to_string(), ErrorKind::WrongType),
                ("workflows[0].superagent.tools[1].http".to_string(), ErrorKind::UnknownKey),
            ]
        );
        assert!(result.errors[0].message.contains("`foo`, `bar`"));
        assert!(result.errors[2].message.contains("unexpected `http`, `extra`"));
    }

    #[test]
    fn test_unknown_key_before_tool_kind_is_not_a_duplicate() {
        let result = validate(&json!({
            "workflows": [{
                "superagent": {
                    "tools": [
                        {"foo": {}, "browser": {"name": "x"}},
                        {"foo": {}, "browser": {}, "http": {}}
                    ]
                }
            }]
        }));
        assert_eq!(result.errors.len(), 2);
        assert_eq!(
            result.errors[0].path.to_string(),
            "workflows[0].superagent.tools[0].foo"
        );
        let message = &result.errors[0].message;
        assert!(message.starts_with("unknown tool key `foo`"), "{}", message);
        assert!(!message.contains("already declares"), "{}", message);

        let message = &result.errors[1].message;
        assert!(message.starts_with("unknown tool key `foo`;"), "{}", message);
        assert!(message.ends_with("tool already declares `browser`; unexpected `http`"), "{}", message);
    }

    #[test]
    fn test_conflicting_step_keys_are_rejected() {
        let result = validate(&json!({
            "workflows": [{"superagent": {"name": "a"}, "openai_assistant": {"name": "b"}}]
        }));
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].path,
            path(&[key("workflows"), idx(0), key("openai_assistant")])
        );
    }

    #[test]
    fn test_wrong_types_are_accumulated_in_document_order() {
        let document = json!({
            "workflows": [
                {"superagent": {"name": 1, "tools": "browser", "data": ["x"]}},
                "not a step",
                {"openai_assistant": null}
            ]
        });
        let result = validate(&document);
        let found: Vec<(String, ErrorKind)> = result
            .errors
            .iter()
            .map(|e| (e.path.to_string(), e.kind))
            .collect();
        assert_eq!(
            found,
            vec![
                ("workflows[0].superagent.name".to_string(), ErrorKind::WrongType),
                ("workflows[0].superagent.tools".to_string(), ErrorKind::WrongType),
                ("workflows[0].superagent.data".to_string(), ErrorKind::WrongType),
                ("workflows[1]".to_string(), ErrorKind::WrongType),
                ("workflows[2].openai_assistant".to_string(), ErrorKind::WrongType),
            ]
        );
        assert_eq!(result.errors[0].message, "expected string, found number");
    }

    #[test]
    fn test_null_optional_fields_are_absent() {
        let result = validate(&json!({
            "workflows": [{
                "superagent": {"name": "a", "intro": null, "tools": null, "data": null}
            }]
        }));
        assert!(result.is_clean());
    }

    #[test]
    fn test_tool_metadata_sub_shapes() {
        let document = json!({
            "workflows": [{
                "superagent": {
                    "tools": [{
                        "http": {
                            "name": "api",
                            "use_for": "calling the api",
                            "metadata": {
                                "headers": {"Authorization": "Bearer x", "X-Retries": 3},
                                "url": "https://example.com",
                                "method": ["GET"],
                                "body": "payload",
                                "timeout": 30
                            }
                        }
                    }]
                }
            }]
        });
        let result = validate(&document);
        let paths: Vec<String> = result.errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "workflows[0].superagent.tools[0].http.metadata.headers.X-Retries",
                "workflows[0].superagent.tools[0].http.metadata.method",
                "workflows[0].superagent.tools[0].http.metadata.body",
            ]
        );
        assert!(result.errors.iter().all(|e| e.kind == ErrorKind::WrongType));
    }

    #[test]
    fn test_data_urls_must_be_strings() {
        let result = validate(&json!({
            "workflows": [{"superagent": {"data": {"urls": ["https://a", 7, null]}}}]
        }));
        let paths: Vec<String> = result.errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "workflows[0].superagent.data.urls[1]",
                "workflows[0].superagent.data.urls[2]",
            ]
        );
    }

    #[test]
    fn test_superrag_entries() {
        let document = json!({
            "workflows": [{
                "superagent": {
                    "superrag": [
                        {"index": {"name": "docs", "urls": ["https://a"], "use_for": "docs"}},
                        {"name": "missing index"},
                        {"index": {"urls": "https://a"}},
                        {"index": {"database_provider": "pinecone", "encoder": {"type": "openai"}}},
                        {"index": {"database_provider": 1, "encoder": "openai"}}
                    ]
                }
            }]
        });
        let result = validate(&document);
        assert_eq!(result.errors.len(), 4);
        assert_eq!(result.errors[0].kind, ErrorKind::MissingRequiredField);
        assert_eq!(
            result.errors[0].path.to_string(),
            "workflows[0].superagent.superrag[1]"
        );
        assert_eq!(
            result.errors[2].path.to_string(),
            "workflows[0].superagent.superrag[4].index.database_provider"
        );
        assert_eq!(
            result.errors[3].path.to_string(),
            "workflows[0].superagent.superrag[4].index.encoder"
        );
        assert_eq!(result.errors[1].kind, ErrorKind::WrongType);
        assert_eq!(
            result.errors[1].path.to_string(),
            "workflows[0].superagent.superrag[2].index.urls"
        );
    }

    #[test]
    fn test_deep_free_form_value_is_bounded() {
        let mut body = json!("leaf");
        for _ in 0..200 {
            body = json!({ "nested": body });
        }
        let document = json!({
            "workflows": [{
                "superagent": {"tools": [{"http": {"metadata": {"body": body}}}]}
            }]
        });
        let result = Validator::new().with_max_depth(32).validate(&document);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ErrorKind::WrongType);
        assert_eq!(result.errors[0].path.len(), 33);
        assert!(result.errors[0].message.contains("maximum depth of 32"));
    }

    #[test]
    fn test_shallow_limit_stops_at_agent() {
        let result = Validator::new()
            .with_max_depth(2)
            .validate(&earnings_document());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path.to_string(), "workflows[0].superagent");
    }

    #[test]
    fn test_validation_is_idempotent() {
        let document = json!({
            "workflows": [{"superagent": {"tools": [{"nope": {}}], "llm": 4}}]
        });
        let validator = Validator::default();
        assert_eq!(validator.validate(&document), validator.validate(&document));
    }

    #[test]
    fn test_unknown_agent_fields_are_ignored() {
        let result = validate(&json!({
            "workflows": [{"openai_assistant": {"name": "a", "description": 42}}]
        }));
        assert!(result.is_clean());
    }
}
