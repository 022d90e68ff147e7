//! Loading workflow documents from YAML or JSON text

use crate::error::Result;
use crate::schema::WorkflowDocument;
use crate::validation::{ValidationResult, Validator};
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Parse markup into a generic document tree
///
/// YAML is a superset of JSON, so both are accepted. No validation happens
/// here; an empty input yields `null`.
pub fn parse_document(text: &str) -> Result<Value> {
    let value: Value = serde_yaml::from_str(text)?;
    Ok(value)
}

/// Parse and validate, returning the report even for invalid documents
pub fn check_str(text: &str, validator: &Validator) -> Result<ValidationResult> {
    let document = parse_document(text)?;
    Ok(validator.validate(&document))
}

/// Parse, validate and convert to the typed model
pub fn load_str(text: &str, validator: &Validator) -> Result<WorkflowDocument> {
    let document = parse_document(text)?;
    let workflow = WorkflowDocument::try_from_value(&document, validator)?;
    debug!(steps = workflow.workflows.len(), "loaded workflow document");
    Ok(workflow)
}

/// Read a document from disk and load it
pub fn load_file<P: AsRef<Path>>(path: P, validator: &Validator) -> Result<WorkflowDocument> {
    let text = read_file(path.as_ref())?;
    let workflow = load_str(&text, validator)?;
    info!(
        path = %path.as_ref().display(),
        steps = workflow.workflows.len(),
        "loaded workflow file"
    );
    Ok(workflow)
}

/// Read a document from disk and validate it
pub fn check_file<P: AsRef<Path>>(path: P, validator: &Validator) -> Result<ValidationResult> {
    let text = read_file(path.as_ref())?;
    check_str(&text, validator)
}

fn read_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StepKind, ToolKind};
    use crate::validation::ErrorKind;
    use crate::Error;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EARNINGS: &str = r#"
workflows:
  - superagent:
      name: Earnings assistant
      llm: gpt-4-1106-preview
      prompt: Use the earnings report to answer questions.
      intro: Hi there! How can I help you?
      tools:
        - browser:
            name: browser
            use_for: searching the web
      data:
        urls:
          - https://s2.q4cdn.com/299287126/files/doc_financials/2023/q3/AMZN-Q3-2023-Earnings-Release.pdf
        use_for: Answering questions about Amazon earnings
"#;

    #[test]
    fn test_parse_yaml_and_json() {
        let yaml = parse_document("workflows:\n  - superagent:\n      name: a\n").unwrap();
        let json = parse_document(r#"{"workflows": [{"superagent": {"name": "a"}}]}"#).unwrap();
        assert_eq!(yaml, json);
        assert_eq!(parse_document("").unwrap(), Value::Null);
    }

    #[test]
    fn test_parse_error_is_yaml_error() {
        let err = parse_document("workflows: [unterminated").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_load_earnings_document() {
        let document = load_str(EARNINGS, &Validator::default()).unwrap();
        let (kind, agent) = document.agents().next().unwrap();
        assert_eq!(kind, StepKind::Superagent);
        assert_eq!(agent.llm.as_deref(), Some("gpt-4-1106-preview"));
        assert_eq!(agent.tools()[0].kind(), ToolKind::Browser);
        assert_eq!(agent.data_urls().len(), 1);
    }

    #[test]
    fn test_load_rejects_invalid_document() {
        let text = "workflows:\n  - superagent:\n      tools:\n        - unknown_tool:\n            name: x\n";
        let err = load_str(text, &Validator::default()).unwrap_err();
        let report = err.validation().unwrap();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ErrorKind::UnknownKey);
        assert_eq!(
            serde_json::to_value(&report.errors[0].path).unwrap(),
            json!(["workflows", 0, "superagent", "tools", 0, "unknown_tool"])
        );
    }

    #[test]
    fn test_check_reports_empty_workflows_as_valid() {
        let report = check_str("workflows: []\n", &Validator::default()).unwrap();
        assert!(report.valid);
        assert_eq!(report.errors[0].kind, ErrorKind::EmptySequence);
    }

    #[test]
    fn test_load_and_check_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(EARNINGS.as_bytes()).unwrap();

        let document = load_file(file.path(), &Validator::default()).unwrap();
        assert_eq!(document.workflows.len(), 1);
        assert!(check_file(file.path(), &Validator::default()).unwrap().is_clean());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_file("/nonexistent/workflow.yaml", &Validator::default()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
