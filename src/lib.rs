//! # SAML
//!
//! Toolkit for Super Agent Markup Language workflow documents.
//!
//! A workflow document is a YAML (or JSON) file listing agent steps, each
//! with optional tools, datasources and vector indexes. This crate checks
//! such documents structurally, converts accepted ones into a typed model,
//! and provides what editors and backends need around them: provider
//! catalogs, example templates, request transformation and change planning.
//!
//! ## Features
//!
//! - **Structural validation**: every finding in one pass, with its exact path
//! - **Typed model**: step and tool entries as sum types, plus a generated JSON Schema
//! - **Catalogs**: models, tool types, datasource types and vector databases
//! - **Change planning**: the backend operations turning one document into another
//!
//! ## Quick Start
//!
//! ```rust
//! use saml::{validate, loader::parse_document};
//!
//! let document = parse_document("workflows:\n  - superagent:\n      name: Helper\n")?;
//! let result = validate(&document);
//! assert!(result.valid);
//! # Ok::<(), saml::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod diff;
pub mod error;
pub mod integrations;
pub mod loader;
pub mod logging;
pub mod schema;
pub mod templates;
pub mod transform;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use catalog::{StepKind, ToolKind};
pub use config::{LogFormat, SamlConfig};
pub use diff::{plan_changes, WorkflowChange};
pub use error::{Error, Result};
pub use integrations::{VectorDbDirectory, VectorDbProvider, VectorDbRecord};
pub use loader::{check_str, load_file, load_str};
pub use schema::{AgentSpec, ToolRef, ToolSpec, WorkflowDocument, WorkflowStep};
pub use templates::Template;
pub use types::{FieldPath, PathSegment};
pub use validation::{validate, ErrorKind, ValidationError, ValidationResult, Validator};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::loader::{load_file, load_str};
    pub use crate::schema::WorkflowDocument;
    pub use crate::validation::{validate, ErrorKind, ValidationResult, Validator};
}
