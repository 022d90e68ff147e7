//! Conversion of validated steps and tools into backend request bodies

use crate::catalog::{self, StepKind, ToolKind};
use crate::error::{Error, Result};
use crate::integrations::{VectorDbDirectory, VectorDbProvider};
use crate::schema::{AgentSpec, IndexSpec, ToolSpec};
use secrecy::SecretString;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Body of an assistant create or update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRequest {
    /// `SUPERAGENT` or `OPENAI_ASSISTANT`
    #[serde(rename = "type")]
    pub kind: String,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Greeting, from `intro`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_message: Option<String>,
    /// Backend model identifier, from `llm`
    pub llm_model: String,
    /// Provider offering the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_provider: Option<String>,
}

/// Body of a tool create or update request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolRequest {
    /// Upper-cased tool kind
    #[serde(rename = "type")]
    pub kind: String,
    /// Tool name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// From `use_for`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Provider-specific settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Build the request body for a tool entry
///
/// `function` tools get `metadata.functionName` set to the tool name unless
/// the document sets it explicitly.
pub fn transform_tool(kind: ToolKind, tool: &ToolSpec) -> Result<ToolRequest> {
    let mut metadata = match &tool.metadata {
        Some(metadata) => match serde_json::to_value(metadata)? {
            Value::Object(map) => Some(map),
            _ => return Err(Error::other("tool metadata did not serialize to an object")),
        },
        None => None,
    };

    if kind == ToolKind::Function {
        if let Some(name) = &tool.name {
            let mut merged = Map::new();
            merged.insert("functionName".to_string(), Value::String(name.clone()));
            merged.extend(metadata.take().unwrap_or_default());
            metadata = Some(merged);
        }
    }

    Ok(ToolRequest {
        kind: kind.backend_type(),
        name: tool.name.clone(),
        description: tool.use_for.clone(),
        metadata,
    })
}

/// Build the request body for a step's agent
///
/// Tools and data are not carried; they are created through their own
/// requests. A missing or unrecognized `llm` resolves to `default_llm`.
pub fn transform_assistant(kind: StepKind, agent: &AgentSpec, default_llm: &str) -> AgentRequest {
    let llm_model = agent
        .llm
        .as_deref()
        .and_then(catalog::llm_identifier)
        .unwrap_or(default_llm);
    let llm_provider = catalog::llm_title(llm_model)
        .and_then(catalog::llm_provider)
        .map(|provider| provider.id.to_string());

    AgentRequest {
        kind: kind.backend_type(),
        name: agent.name.clone(),
        prompt: agent.prompt.clone(),
        initial_message: agent.intro.clone(),
        llm_model: llm_model.to_string(),
        llm_provider,
    }
}

/// Body of a superrag ingestion request
///
/// URLs are passed through as-is; resolving each one to a file type needs
/// network access and is left to whoever sends the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperRagRequest {
    /// Index name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// From `use_for`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Documents to ingest
    pub urls: Vec<String>,
    /// Where the index is stored
    pub vector_database: VectorDatabaseConfig,
    /// Embedding model settings
    pub encoder: Map<String, Value>,
}

/// Vector store type and credentials for a superrag request
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct VectorDatabaseConfig {
    /// Superrag store type, such as `pinecone` or `pgvector`
    #[serde(rename = "type")]
    pub kind: String,
    /// Credential values from the account's record
    pub config: BTreeMap<String, String>,
}

impl fmt::Debug for VectorDatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorDatabaseConfig")
            .field("kind", &self.kind)
            .field("config", &self.config.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Encoder used when an index does not name one
pub fn default_encoder() -> Map<String, Value> {
    let mut encoder = Map::new();
    encoder.insert("type".to_string(), json!("openai"));
    encoder.insert("name".to_string(), json!("text-embedding-3-small"));
    encoder.insert("dimensions".to_string(), json!(1536));
    encoder
}

/// Build the ingestion request for a superrag index
///
/// The vector database is the account's record for `database_provider` when
/// the index names one, and the account's first record otherwise.
pub async fn transform_superrag(
    index: &IndexSpec,
    directory: &dyn VectorDbDirectory,
    api_key: &SecretString,
) -> Result<SuperRagRequest> {
    let records = directory.list(api_key).await?;

    let record = match index.database_provider.as_deref() {
        Some(requested) => {
            let provider = requested.parse::<VectorDbProvider>().map_err(|_| {
                Error::missing_vector_database(format!("`{}` is not a supported provider", requested))
            })?;
            records
                .iter()
                .find(|record| record.provider == provider)
                .ok_or_else(|| {
                    Error::missing_vector_database(format!("{} is not configured", provider))
                })?
        }
        None => records
            .first()
            .ok_or_else(|| Error::missing_vector_database("no provider is configured"))?,
    };
    debug!(provider = %record.provider, record = %record.id, "resolved superrag vector database");

    Ok(SuperRagRequest {
        name: index.name.clone(),
        description: index.use_for.clone(),
        urls: index.urls.clone().unwrap_or_default(),
        vector_database: VectorDatabaseConfig {
            kind: record.provider.superrag_type().to_string(),
            config: record.options.clone(),
        },
        encoder: index.encoder.clone().unwrap_or_else(default_encoder),
    })
}
