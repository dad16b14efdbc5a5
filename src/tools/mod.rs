//! Tool registry and the response envelope returned by every tool.

pub mod calculator;
pub mod docs_search;

pub use calculator::{format_number, AddTool, CalculateTool, Operation};
pub use docs_search::{whole_count, DocsSearchTool, TopK, DOCS_SEARCH_TOOL};

use crate::error::ToolError;
use crate::search::DocsSearch;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// One typed block inside a [`ToolResponse`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

/// Envelope returned to the RPC client for a tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub content: Vec<ContentBlock>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResponse {
    /// Successful response with a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Tool-level failure: same shape, flagged with `isError`.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// Text of the first content block.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|block| match block {
            ContentBlock::Text { text } => text.as_str(),
        })
    }
}

/// A named, schema-described callable operation.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON Schema of the `arguments` object.
    fn input_schema(&self) -> Value;

    async fn call(&self, arguments: Value) -> Result<ToolResponse, ToolError>;
}

/// Listing entry for `tools/list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Ordered set of tools keyed by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `add`, `calculate` and `cf_docs.search`.
    pub fn with_default_tools(search: DocsSearch) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AddTool));
        registry.register(Arc::new(CalculateTool));
        registry.register(Arc::new(DocsSearchTool::new(search)));
        registry
    }

    /// Add a tool. A tool with the same name is replaced in place.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(existing) => {
                tracing::warn!(tool = tool.name(), "Replacing registered tool");
                *existing = tool;
            }
            None => self.tools.push(tool),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|tool| ToolDescriptor {
                name: tool.name(),
                description: tool.description(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up `name` and run it with `arguments` (`null` is treated as `{}`).
    pub async fn invoke(&self, name: &str, arguments: Value) -> Result<ToolResponse, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let arguments = match arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        metrics::counter!("tool_calls_total", "tool" => name.to_string()).increment(1);
        tracing::debug!(tool = name, "Invoking tool");

        tool.call(arguments).await
    }
}

/// Deserialize tool arguments into a typed input, mapping failures to
/// `InvalidParams`.
pub(crate) fn parse_arguments<T: DeserializeOwned>(
    tool: &str,
    arguments: Value,
) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::invalid(tool, e.to_string()))
}
