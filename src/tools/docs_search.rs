//! `cf_docs.search`: Cloudflare Docs lookup through the search adapter.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Number, Value};

use super::{parse_arguments, Tool, ToolResponse};
use crate::error::ToolError;
use crate::search::{DocsSearch, DEFAULT_TOP_K, MAX_HITS_PER_PAGE, MIN_HITS_PER_PAGE};

pub const DOCS_SEARCH_TOOL: &str = "cf_docs.search";

/// Result count as sent by the caller: a JSON number or a digit string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TopK {
    Count(Number),
    Digits(String),
}

/// A JSON number as a count. Integral floats such as `5.0` count as `5`;
/// negative and fractional values do not.
pub fn whole_count(number: &Number) -> Option<u64> {
    if let Some(count) = number.as_u64() {
        return Some(count);
    }
    let value = number.as_f64()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        // Saturates above u64::MAX, which is out of range anyway.
        Some(value as u64)
    } else {
        None
    }
}

impl TopK {
    /// Parse and range-check to 1..=20.
    pub fn resolve(&self) -> Result<u32, String> {
        let count = match self {
            TopK::Count(number) => whole_count(number).ok_or_else(|| {
                format!("topK must be a non-negative whole number, got {}", number)
            })?,
            TopK::Digits(digits) => {
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(format!("topK must be a string of digits, got {:?}", digits));
                }
                digits
                    .parse::<u64>()
                    .map_err(|_| format!("topK {} is out of range", digits))?
            }
        };

        let range = u64::from(MIN_HITS_PER_PAGE)..=u64::from(MAX_HITS_PER_PAGE);
        if !range.contains(&count) {
            return Err(format!(
                "topK must be between {} and {}, got {}",
                MIN_HITS_PER_PAGE, MAX_HITS_PER_PAGE, count
            ));
        }
        Ok(count as u32)
    }
}

#[derive(Debug, Deserialize)]
struct SearchInput {
    q: String,
    #[serde(default, rename = "topK")]
    top_k: Option<TopK>,
}

pub struct DocsSearchTool {
    search: DocsSearch,
}

impl DocsSearchTool {
    pub fn new(search: DocsSearch) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Tool for DocsSearchTool {
    fn name(&self) -> &'static str {
        DOCS_SEARCH_TOOL
    }

    fn description(&self) -> &'static str {
        "Search Cloudflare Developer Docs (Algolia DocSearch)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "q": { "type": "string", "minLength": 1 },
                "topK": {
                    "anyOf": [
                        { "type": "integer", "minimum": MIN_HITS_PER_PAGE, "maximum": MAX_HITS_PER_PAGE },
                        { "type": "string", "pattern": "^\\d+$" }
                    ]
                }
            },
            "required": ["q"]
        })
    }

    async fn call(&self, arguments: Value) -> Result<ToolResponse, ToolError> {
        let input: SearchInput = parse_arguments(self.name(), arguments)?;
        if input.q.is_empty() {
            return Err(ToolError::invalid(self.name(), "q cannot be empty"));
        }
        let top_k = match &input.top_k {
            Some(top_k) => top_k
                .resolve()
                .map_err(|message| ToolError::invalid(self.name(), message))?,
            None => DEFAULT_TOP_K,
        };

        let items = self.search.search(&input.q, top_k).await?;

        Ok(ToolResponse::text(format!("{:#}", json!({ "items": items }))))
    }
}
