//! Typed workflow document model
//!
//! These types mirror the structure the validator checks. Step and tool
//! entries are real sum types: a step is exactly one agent kind, a tool
//! entry is exactly one tool kind. Every document the validator accepts
//! converts into this model.

use crate::catalog::{StepKind, ToolKind};
use crate::error::{Error, Result};
use crate::validation::Validator;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A complete workflow document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowDocument {
    /// Steps, executed in order
    pub workflows: Vec<WorkflowStep>,
}

impl WorkflowDocument {
    /// Validate a parsed document tree and convert it
    ///
    /// Returns [`Error::Invalid`] carrying the full report when the tree is
    /// structurally invalid.
    pub fn try_from_value(value: &Value, validator: &Validator) -> Result<Self> {
        let result = validator.validate(value);
        if !result.valid {
            return Err(Error::Invalid(result));
        }
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Convert back into a generic document tree
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> Result<String> {
        // Through the generic tree, so steps render as plain keys, not YAML tags
        Ok(serde_yaml::to_string(&self.to_value()?)?)
    }

    /// Agent of every step, in order
    pub fn agents(&self) -> impl Iterator<Item = (StepKind, &AgentSpec)> {
        self.workflows.iter().map(|step| (step.kind(), step.agent()))
    }
}

/// One step of a workflow, selected by its top-level key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    /// Native agent
    Superagent(AgentSpec),
    /// Agent backed by the OpenAI assistants API
    OpenaiAssistant(AgentSpec),
}

impl WorkflowStep {
    /// Create a step of the given kind
    pub fn new(kind: StepKind, agent: AgentSpec) -> Self {
        match kind {
            StepKind::Superagent => Self::Superagent(agent),
            StepKind::OpenaiAssistant => Self::OpenaiAssistant(agent),
        }
    }

    /// Which key selected this step
    pub fn kind(&self) -> StepKind {
        match self {
            Self::Superagent(_) => StepKind::Superagent,
            Self::OpenaiAssistant(_) => StepKind::OpenaiAssistant,
        }
    }

    /// The agent configuration
    pub fn agent(&self) -> &AgentSpec {
        match self {
            Self::Superagent(agent) | Self::OpenaiAssistant(agent) => agent,
        }
    }
}

/// Configuration of a single agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AgentSpec {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Model name, e.g. `gpt-4-1106-preview`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<String>,
    /// Instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Greeting shown at the start of a conversation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    /// Tools the agent may call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolRef>>,
    /// Documents the agent grounds its answers on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataSourceSpec>,
    /// Vector indexes the agent retrieves from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superrag: Option<Vec<SuperRagEntry>>,
}

impl AgentSpec {
    /// Tools, empty when none are declared
    pub fn tools(&self) -> &[ToolRef] {
        self.tools.as_deref().unwrap_or_default()
    }

    /// Superrag entries, empty when none are declared
    pub fn superrag(&self) -> &[SuperRagEntry] {
        self.superrag.as_deref().unwrap_or_default()
    }

    /// Datasource URLs, empty when none are declared
    pub fn data_urls(&self) -> &[String] {
        self.data
            .as_ref()
            .and_then(|data| data.urls.as_deref())
            .unwrap_or_default()
    }
}

/// A tool entry, selected by its single key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ToolRef {
    /// Real-time web browsing
    Browser(ToolSpec),
    /// Sandboxed code execution
    CodeExecutor(ToolSpec),
    /// Human hand-off
    HandOff(ToolSpec),
    /// Arbitrary HTTP request
    Http(ToolSpec),
    /// Bing web search
    BingSearch(ToolSpec),
    /// Replicate model invocation
    Replicate(ToolSpec),
    /// Algolia index search
    Algolia(ToolSpec),
    /// Metaphor search
    Metaphor(ToolSpec),
    /// Client-side function call
    Function(ToolSpec),
    /// OpenAI assistant code interpreter
    CodeInterpreter(ToolSpec),
    /// OpenAI assistant retrieval
    Retrieval(ToolSpec),
}

impl ToolRef {
    /// Create an entry of the given kind
    pub fn new(kind: ToolKind, spec: ToolSpec) -> Self {
        match kind {
            ToolKind::Browser => Self::Browser(spec),
            ToolKind::CodeExecutor => Self::CodeExecutor(spec),
            ToolKind::HandOff => Self::HandOff(spec),
            ToolKind::Http => Self::Http(spec),
            ToolKind::BingSearch => Self::BingSearch(spec),
            ToolKind::Replicate => Self::Replicate(spec),
            ToolKind::Algolia => Self::Algolia(spec),
            ToolKind::Metaphor => Self::Metaphor(spec),
            ToolKind::Function => Self::Function(spec),
            ToolKind::CodeInterpreter => Self::CodeInterpreter(spec),
            ToolKind::Retrieval => Self::Retrieval(spec),
        }
    }

    /// Kind and configuration together
    pub fn parts(&self) -> (ToolKind, &ToolSpec) {
        match self {
            Self::Browser(spec) => (ToolKind::Browser, spec),
            Self::CodeExecutor(spec) => (ToolKind::CodeExecutor, spec),
            Self::HandOff(spec) => (ToolKind::HandOff, spec),
            Self::Http(spec) => (ToolKind::Http, spec),
            Self::BingSearch(spec) => (ToolKind::BingSearch, spec),
            Self::Replicate(spec) => (ToolKind::Replicate, spec),
            Self::Algolia(spec) => (ToolKind::Algolia, spec),
            Self::Metaphor(spec) => (ToolKind::Metaphor, spec),
            Self::Function(spec) => (ToolKind::Function, spec),
            Self::CodeInterpreter(spec) => (ToolKind::CodeInterpreter, spec),
            Self::Retrieval(spec) => (ToolKind::Retrieval, spec),
        }
    }

    /// Which key selected this entry
    pub fn kind(&self) -> ToolKind {
        self.parts().0
    }

    /// The tool configuration
    pub fn spec(&self) -> &ToolSpec {
        self.parts().1
    }
}

/// Configuration of a single tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolSpec {
    /// Tool name, unique within its agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// When the agent should reach for this tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_for: Option<String>,
    /// Provider-specific settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ToolMetadata>,
}

/// Tool settings; the known keys are typed, the rest pass through
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMetadata {
    /// Request headers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    /// Request URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Request method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Request body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Map<String, Value>>,
    /// Any other provider-specific keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Documents an agent grounds its answers on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DataSourceSpec {
    /// Document locations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<String>>,
    /// What the documents are for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_for: Option<String>,
}

/// One vector index directive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SuperRagEntry {
    /// The index to build and retrieve from
    pub index: IndexSpec,
}

/// A vector index over a set of documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IndexSpec {
    /// Index name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Documents to index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<String>>,
    /// What the index is for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_for: Option<String>,
    /// Configured vector database to store the index in, such as `pinecone`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_provider: Option<String>,
    /// Embedding model settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoder: Option<Map<String, Value>>,
}

/// JSON Schema of [`WorkflowDocument`] for editors and form libraries
pub fn editor_schema() -> Result<Value> {
    let schema = schemars::schema_for!(WorkflowDocument);
    Ok(serde_json::to_value(&schema)?)
}
