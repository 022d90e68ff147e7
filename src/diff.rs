//! Planning the backend changes between two accepted documents
//!
//! Steps are paired by position, as are the tools inside a step. Datasource
//! URLs are compared as sets. Assistants and tools are planned as backend
//! request bodies, so updates name backend fields. The plan is data only;
//! executing it against a backend is the caller's job.

use crate::error::Result;
use crate::schema::{AgentSpec, ToolRef, WorkflowDocument, WorkflowStep};
use crate::transform::{transform_assistant, transform_tool, AgentRequest, ToolRequest};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

/// One backend operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WorkflowChange {
    /// Create an assistant
    AddAssistant {
        /// Request body; tools and data follow as their own changes
        assistant: AgentRequest,
    },
    /// Delete an assistant
    DeleteAssistant {
        /// Assistant name
        assistant: Option<String>,
    },
    /// Change fields of an assistant
    UpdateAssistant {
        /// Assistant name before the change
        assistant: Option<String>,
        /// Changed request fields; removed fields are `null`
        changes: Map<String, Value>,
    },
    /// Create a tool and attach it
    AddTool {
        /// Owning assistant
        assistant: Option<String>,
        /// Request body
        tool: ToolRequest,
    },
    /// Delete a tool
    DeleteTool {
        /// Owning assistant
        assistant: Option<String>,
        /// Tool name
        tool: Option<String>,
    },
    /// Change fields of a tool
    UpdateTool {
        /// Owning assistant
        assistant: Option<String>,
        /// Tool name before the change
        tool: Option<String>,
        /// Changed request fields; removed fields are `null`
        changes: Map<String, Value>,
    },
    /// Create a datasource and attach it
    AddDatasource {
        /// Owning assistant
        assistant: Option<String>,
        /// Document location
        url: String,
        /// From the data `use_for`
        description: Option<String>,
    },
    /// Delete a datasource
    DeleteDatasource {
        /// Owning assistant
        assistant: Option<String>,
        /// Document location
        url: String,
    },
}

/// Ordered changes turning `old` into `new`
///
/// Assistants without a recognized `llm` are planned with `default_llm`.
pub fn plan_changes(
    old: &WorkflowDocument,
    new: &WorkflowDocument,
    default_llm: &str,
) -> Result<Vec<WorkflowChange>> {
    let mut planner = Planner::new(default_llm);
    let steps = old.workflows.len().max(new.workflows.len());
    for i in 0..steps {
        planner.step(old.workflows.get(i), new.workflows.get(i))?;
    }

    info!(changes = planner.changes.len(), "planned workflow changes");
    Ok(planner.changes)
}

/// Fields that changed between two flat objects
///
/// Values that differ take the new value, keys only in `old` become `null`,
/// keys only in `new` are added. Old keys come first, in their order.
pub fn compare(old: &Map<String, Value>, new: &Map<String, Value>) -> Map<String, Value> {
    let mut changes = Map::new();
    for (key, old_value) in old {
        match new.get(key) {
            Some(new_value) if new_value != old_value => {
                changes.insert(key.clone(), new_value.clone());
            }
            Some(_) => {}
            None => {
                changes.insert(key.clone(), Value::Null);
            }
        }
    }
    for (key, new_value) in new {
        if !old.contains_key(key) {
            changes.insert(key.clone(), new_value.clone());
        }
    }
    changes
}

struct Planner<'a> {
    default_llm: &'a str,
    changes: Vec<WorkflowChange>,
}

impl<'a> Planner<'a> {
    fn new(default_llm: &'a str) -> Self {
        Self {
            default_llm,
            changes: Vec::new(),
        }
    }

    fn step(&mut self, old: Option<&WorkflowStep>, new: Option<&WorkflowStep>) -> Result<()> {
        match (old, new) {
            (Some(old), Some(new)) if old.kind() == new.kind() => {
                let (old_agent, new_agent) = (old.agent(), new.agent());
                let name = &old_agent.name;
                self.tools(name, old_agent.tools(), new_agent.tools())?;
                self.data(name, old_agent, new_agent);

                let changes = compare(
                    &fields(&transform_assistant(old.kind(), old_agent, self.default_llm))?,
                    &fields(&transform_assistant(new.kind(), new_agent, self.default_llm))?,
                );
                if !changes.is_empty() {
                    self.changes.push(WorkflowChange::UpdateAssistant {
                        assistant: name.clone(),
                        changes,
                    });
                }
            }
            (Some(old), Some(new)) => {
                self.remove(old.agent())?;
                self.create(new)?;
            }
            (Some(old), None) => self.remove(old.agent())?,
            (None, Some(new)) => self.create(new)?,
            (None, None) => {}
        }
        Ok(())
    }

    /// Delete an assistant after its tools and datasources
    fn remove(&mut self, agent: &AgentSpec) -> Result<()> {
        self.tools(&agent.name, agent.tools(), &[])?;
        self.data(&agent.name, agent, &AgentSpec::default());
        self.changes.push(WorkflowChange::DeleteAssistant {
            assistant: agent.name.clone(),
        });
        Ok(())
    }

    /// Create an assistant, then its tools and datasources
    fn create(&mut self, step: &WorkflowStep) -> Result<()> {
        let agent = step.agent();
        self.changes.push(WorkflowChange::AddAssistant {
            assistant: transform_assistant(step.kind(), agent, self.default_llm),
        });
        self.tools(&agent.name, &[], agent.tools())?;
        self.data(&agent.name, &AgentSpec::default(), agent);
        Ok(())
    }

    fn tools(&mut self, assistant: &Option<String>, old: &[ToolRef], new: &[ToolRef]) -> Result<()> {
        for i in 0..old.len().max(new.len()) {
            match (old.get(i), new.get(i)) {
                (Some(old), Some(new)) if old.kind() == new.kind() => {
                    let changes = compare(
                        &fields(&transform_tool(old.kind(), old.spec())?)?,
                        &fields(&transform_tool(new.kind(), new.spec())?)?,
                    );
                    if !changes.is_empty() {
                        self.changes.push(WorkflowChange::UpdateTool {
                            assistant: assistant.clone(),
                            tool: old.spec().name.clone(),
                            changes,
                        });
                    }
                }
                (old, new) => {
                    if let Some(old) = old {
                        self.changes.push(WorkflowChange::DeleteTool {
                            assistant: assistant.clone(),
                            tool: old.spec().name.clone(),
                        });
                    }
                    if let Some(new) = new {
                        self.changes.push(WorkflowChange::AddTool {
                            assistant: assistant.clone(),
                            tool: transform_tool(new.kind(), new.spec())?,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn data(&mut self, assistant: &Option<String>, old: &AgentSpec, new: &AgentSpec) {
        let (old_urls, new_urls) = (old.data_urls(), new.data_urls());

        for (i, url) in old_urls.iter().enumerate() {
            if !new_urls.contains(url) && !old_urls[..i].contains(url) {
                self.changes.push(WorkflowChange::DeleteDatasource {
                    assistant: assistant.clone(),
                    url: url.clone(),
                });
            }
        }

        let description = new.data.as_ref().and_then(|data| data.use_for.clone());
        for (i, url) in new_urls.iter().enumerate() {
            if !old_urls.contains(url) && !new_urls[..i].contains(url) {
                self.changes.push(WorkflowChange::AddDatasource {
                    assistant: assistant.clone(),
                    url: url.clone(),
                    description: description.clone(),
                });
            }
        }
    }
}

fn fields<T: Serialize>(value: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}
