//! Static option tables: step kinds, tool kinds, models, tool types and
//! datasource types
//!
//! Everything here is immutable `static` data compiled into the binary.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level key selecting the kind of a workflow step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Native agent
    Superagent,
    /// Agent backed by the OpenAI assistants API
    OpenaiAssistant,
}

impl StepKind {
    /// Every recognized step kind, in declaration order
    pub const ALL: [StepKind; 2] = [StepKind::Superagent, StepKind::OpenaiAssistant];

    /// Document key for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Superagent => "superagent",
            Self::OpenaiAssistant => "openai_assistant",
        }
    }

    /// Type tag the backend expects (`SUPERAGENT`, `OPENAI_ASSISTANT`)
    pub fn backend_type(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::other(format!("unknown step kind: {}", s)))
    }
}

/// Key selecting the kind of a tool entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Real-time web browsing
    Browser,
    /// Sandboxed code execution
    CodeExecutor,
    /// Human hand-off
    HandOff,
    /// Arbitrary HTTP request
    Http,
    /// Bing web search
    BingSearch,
    /// Replicate model invocation
    Replicate,
    /// Algolia index search
    Algolia,
    /// Metaphor search
    Metaphor,
    /// Client-side function call
    Function,
    /// OpenAI assistant code interpreter
    CodeInterpreter,
    /// OpenAI assistant retrieval
    Retrieval,
}

impl ToolKind {
    /// Every recognized tool kind, in declaration order
    pub const ALL: [ToolKind; 11] = [
        ToolKind::Browser,
        ToolKind::CodeExecutor,
        ToolKind::HandOff,
        ToolKind::Http,
        ToolKind::BingSearch,
        ToolKind::Replicate,
        ToolKind::Algolia,
        ToolKind::Metaphor,
        ToolKind::Function,
        ToolKind::CodeInterpreter,
        ToolKind::Retrieval,
    ];

    /// Document key for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::CodeExecutor => "code_executor",
            Self::HandOff => "hand_off",
            Self::Http => "http",
            Self::BingSearch => "bing_search",
            Self::Replicate => "replicate",
            Self::Algolia => "algolia",
            Self::Metaphor => "metaphor",
            Self::Function => "function",
            Self::CodeInterpreter => "code_interpreter",
            Self::Retrieval => "retrieval",
        }
    }

    /// Type tag the backend expects (`BROWSER`, `BING_SEARCH`, ...)
    pub fn backend_type(&self) -> String {
        self.as_str().to_uppercase()
    }

    /// Whether this tool only exists for OpenAI assistants
    pub fn is_assistant_only(&self) -> bool {
        matches!(self, Self::CodeInterpreter | Self::Retrieval)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::other(format!("unknown tool kind: {}", s)))
    }
}

/// Input widget a form field is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain text input
    Input,
    /// Masked text input
    Password,
    /// JSON editor
    Json,
}

/// Description of one credential or metadata field a provider needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Key the value is stored under
    pub key: &'static str,
    /// Widget kind
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Human label
    pub label: &'static str,
    /// Example value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    /// Extra guidance
    #[serde(rename = "helpText", skip_serializing_if = "Option::is_none")]
    pub help_text: Option<&'static str>,
}

impl FieldDescriptor {
    /// Plain text field
    pub const fn input(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            kind: FieldKind::Input,
            label,
            placeholder: None,
            help_text: None,
        }
    }

    /// Masked secret field
    pub const fn password(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Password,
            ..Self::input(key, label)
        }
    }

    /// JSON-valued field
    pub const fn json(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Json,
            ..Self::input(key, label)
        }
    }

    /// Set the example value
    pub const fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Set the guidance text
    pub const fn with_help(mut self, help_text: &'static str) -> Self {
        self.help_text = Some(help_text);
        self
    }
}

/// A selectable model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LlmOption {
    /// Backend identifier (e.g. `GPT_4_1106_PREVIEW`)
    pub value: &'static str,
    /// Name authors write in documents (e.g. `gpt-4-1106-preview`)
    pub title: &'static str,
}

/// A model provider and the models it offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LlmProvider {
    /// Backend provider identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
    /// Logo asset path
    pub logo: &'static str,
    /// Whether the provider is offered at all
    pub disabled: bool,
    /// Models offered by this provider
    pub options: &'static [LlmOption],
}

/// Model used when a document does not name one
pub const DEFAULT_LLM: &str = "GPT_3_5_TURBO_16K_0613";

/// Known model providers
pub static LLM_PROVIDERS: &[LlmProvider] = &[
    LlmProvider {
        id: "OPENAI",
        name: "OpenAI",
        description: "Power your assistants with the latest models from OpenAI, powerful for calling external APIs and reasoning.",
        logo: "/openai-logo.png",
        disabled: false,
        options: &[
            LlmOption { value: "GPT_3_5_TURBO_16K_0613", title: "gpt-3.5-turbo-16k-0613" },
            LlmOption { value: "GPT_3_5_TURBO_0613", title: "gpt-3.5-turbo-0613" },
            LlmOption { value: "GPT_3_5_TURBO_1106", title: "gpt-3.5-turbo-1106" },
            LlmOption { value: "GPT_4_0613", title: "gpt-4-0613" },
            LlmOption { value: "GPT_4_1106_PREVIEW", title: "gpt-4-1106-preview" },
        ],
    },
    LlmProvider {
        id: "AZURE_OPENAI",
        name: "Azure OpenAI",
        description: "Use Azure OpenAI to power your assistants with the latest OpenAI models.",
        logo: "/azure-logo.png",
        disabled: false,
        options: &[],
    },
    LlmProvider {
        id: "HUGGINGFACE",
        name: "HuggingFace",
        description: "Use Open Source models on HuggingFace.",
        logo: "/hf-logo.png",
        disabled: true,
        options: &[LlmOption { value: "MISTRAL_7B_INSTRUCT_V01", title: "mistral-7b-instruct-v0.1" }],
    },
];

/// Backend identifier for a model name as written in a document
pub fn llm_identifier(title: &str) -> Option<&'static str> {
    find_llm(title).map(|(_, option)| option.value)
}

/// Provider offering a model name as written in a document
pub fn llm_provider(title: &str) -> Option<&'static LlmProvider> {
    find_llm(title).map(|(provider, _)| provider)
}

/// Document name for a backend model identifier
pub fn llm_title(value: &str) -> Option<&'static str> {
    LLM_PROVIDERS
        .iter()
        .flat_map(|provider| provider.options.iter())
        .find(|option| option.value == value)
        .map(|option| option.title)
}

fn find_llm(title: &str) -> Option<(&'static LlmProvider, &'static LlmOption)> {
    LLM_PROVIDERS.iter().find_map(|provider| {
        provider
            .options
            .iter()
            .find(|option| option.title == title)
            .map(|option| (provider, option))
    })
}

/// A backend tool type and the metadata it is configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolType {
    /// Backend type tag
    pub value: &'static str,
    /// Display title
    pub title: &'static str,
    /// Metadata fields
    pub metadata: &'static [FieldDescriptor],
}

/// Tool types the backend can host
pub static TOOL_TYPES: &[ToolType] = &[
    ToolType {
        value: "ALGOLIA",
        title: "Algolia Index",
        metadata: &[
            FieldDescriptor::input("index", "Algolia Index"),
            FieldDescriptor::input("appId", "Algolia App ID"),
            FieldDescriptor::password("apiKey", "Algolia API Key"),
        ],
    },
    ToolType {
        value: "BING_SEARCH",
        title: "Bing Search",
        metadata: &[
            FieldDescriptor::input("bingSearchUrl", "Bing Search URL"),
            FieldDescriptor::input("bingSubscriptionKey", "Bing Subscription Key"),
        ],
    },
    ToolType {
        value: "METAPHOR",
        title: "Metaphor Search",
        metadata: &[FieldDescriptor::input("metaphorApiKey", "Metaphor API Key")],
    },
    ToolType {
        value: "CHATGPT_PLUGIN",
        title: "ChatGPT plugin",
        metadata: &[FieldDescriptor::input("chatgptPluginURL", "Plugin manifest url")],
    },
    ToolType {
        value: "REPLICATE",
        title: "Replicate",
        metadata: &[
            FieldDescriptor::input("model", "Model"),
            FieldDescriptor::input("apiKey", "Replicate API key"),
            FieldDescriptor::json("arguments", "Other arguments"),
        ],
    },
    ToolType {
        value: "HTTP",
        title: "API Request",
        metadata: &[FieldDescriptor::json("headers", "Headers")],
    },
    ToolType { value: "PUBMED", title: "PubMed", metadata: &[] },
    ToolType { value: "CODE_EXECUTOR", title: "Code interpreter (alpha)", metadata: &[] },
    ToolType { value: "BROWSER", title: "Browser", metadata: &[] },
    ToolType { value: "HAND_OFF", title: "Human hand-off (Alpha)", metadata: &[] },
    ToolType {
        value: "FUNCTION",
        title: "Function",
        metadata: &[
            FieldDescriptor::input("functionName", "Function name")
                .with_help("Use lowercase letters, ex: get_article"),
            FieldDescriptor::json("args", "Arguments")
                .with_help("Add function arguments in the following format"),
        ],
    },
    ToolType {
        value: "OPENAPI",
        title: "OpenAPI",
        metadata: &[
            FieldDescriptor::input("openApiUrl", "OpenAPI spec url"),
            FieldDescriptor::json("headers", "Additional headers"),
        ],
    },
    ToolType {
        value: "GPT_VISION",
        title: "GPT Vision",
        metadata: &[FieldDescriptor::input("openaiApiKey", "Your OpenAI API Key")],
    },
    ToolType {
        value: "TTS_1",
        title: "Text-To-Speech (TTS1)",
        metadata: &[FieldDescriptor::input("openaiApiKey", "Your OpenAI API Key")],
    },
    ToolType {
        value: "WOLFRAM_ALPHA",
        title: "Wolfram Alpha",
        metadata: &[FieldDescriptor::input("appId", "Wolfram App ID")],
    },
    ToolType {
        value: "ZAPIER_NLA",
        title: "Zapier Natural Language",
        metadata: &[
            FieldDescriptor::input("zapierNlaApiKey", "Zapier NLA API key"),
            FieldDescriptor::input("openaiApiKey", "Your OpenAI API key"),
        ],
    },
    ToolType {
        value: "AGENT",
        title: "Agent",
        metadata: &[
            FieldDescriptor::input("agentId", "Superagent Agent ID"),
            FieldDescriptor::input("apiKey", "Superagent API key"),
        ],
    },
];

/// Look up a backend tool type by its tag
pub fn tool_type(value: &str) -> Option<&'static ToolType> {
    TOOL_TYPES.iter().find(|tool| tool.value == value)
}

/// A kind of document a datasource can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasourceType {
    /// Backend type tag
    pub value: &'static str,
    /// Display title
    pub title: &'static str,
}

/// Datasource types offered in the editor
pub static DATASOURCE_TYPES: &[DatasourceType] = &[
    DatasourceType { value: "PDF", title: "PDF" },
    DatasourceType { value: "TXT", title: "TXT" },
    DatasourceType { value: "CSV", title: "CSV" },
    DatasourceType { value: "MARKDOWN", title: "Markdown" },
];

static MIME_TYPE_TO_DATASOURCE: &[(&str, &str)] = &[
    ("application/pdf", "PDF"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "DOCX",
    ),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "PPTX",
    ),
    ("application/vnd.google-apps.document", "GOOGLE_DOC"),
    ("text/markdown", "MARKDOWN"),
    ("text/html", "WEBPAGE"),
    ("text/plain", "TXT"),
];

/// Datasource type for a `Content-Type` header value
///
/// Parameters such as `; charset=utf-8` are ignored.
pub fn datasource_type_for_mime(content_type: &str) -> Option<&'static str> {
    let primary = content_type.split(';').next()?.trim();
    MIME_TYPE_TO_DATASOURCE
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(primary))
        .map(|(_, datasource)| *datasource)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_kind_round_trips_through_str() {
        for kind in ToolKind::ALL {
            assert_eq!(kind.as_str().parse::<ToolKind>().unwrap(), kind);
        }
        assert!("unknown_tool".parse::<ToolKind>().is_err());
    }

    #[test]
    fn test_tool_kind_serde_matches_as_str() {
        for kind in ToolKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.as_str().to_string()));
        }
    }

    #[test]
    fn test_backend_types() {
        assert_eq!(ToolKind::BingSearch.backend_type(), "BING_SEARCH");
        assert_eq!(StepKind::OpenaiAssistant.backend_type(), "OPENAI_ASSISTANT");
        assert!(tool_type(&ToolKind::Browser.backend_type()).is_some());
        assert!(ToolKind::Retrieval.is_assistant_only());
        assert!(!ToolKind::Http.is_assistant_only());
    }

    #[test]
    fn test_llm_reverse_mapping() {
        assert_eq!(llm_identifier("gpt-4-1106-preview"), Some("GPT_4_1106_PREVIEW"));
        assert_eq!(llm_provider("gpt-4-0613").map(|p| p.id), Some("OPENAI"));
        assert_eq!(llm_provider("mistral-7b-instruct-v0.1").map(|p| p.id), Some("HUGGINGFACE"));
        assert_eq!(llm_identifier("gpt-5-turbo"), None);
        assert_eq!(llm_title(DEFAULT_LLM), Some("gpt-3.5-turbo-16k-0613"));
    }

    #[test]
    fn test_mime_lookup_strips_parameters() {
        assert_eq!(datasource_type_for_mime("application/pdf"), Some("PDF"));
        assert_eq!(datasource_type_for_mime("text/html; charset=utf-8"), Some("WEBPAGE"));
        assert_eq!(datasource_type_for_mime("Text/Plain"), Some("TXT"));
        assert_eq!(datasource_type_for_mime("image/png"), None);
    }

    #[test]
    fn test_function_tool_descriptor_help_text() {
        let function = tool_type("FUNCTION").unwrap();
        assert_eq!(function.metadata[0].key, "functionName");
        assert!(function.metadata[0].help_text.is_some());
        assert_eq!(function.metadata[1].kind, FieldKind::Json);
    }
}
