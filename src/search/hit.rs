//! Normalization of raw DocSearch hits into [`SearchResult`] records.
//!
//! The upstream hit shape is only loosely documented, so every field is kept
//! as untyped JSON and interpreted here. Title and score derivation are plain
//! functions over [`RawHit`] so they can be checked against literal fixtures.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title used when a hit has no hierarchy labels and no content.
pub const FALLBACK_TITLE: &str = "Cloudflare Docs";

/// Number of content characters used when deriving a title from content.
pub const TITLE_CONTENT_CHARS: usize = 80;

/// A hit as returned by the upstream index. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHit {
    #[serde(default)]
    pub hierarchy: Option<Value>,
    #[serde(default)]
    pub url: Option<Value>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default, rename = "_rankingInfo")]
    pub ranking_info: Option<Value>,
}

impl RawHit {
    /// Hierarchy label at `level` (`lvl0`, `lvl1`, ...), if it is a string.
    pub fn level(&self, level: u8) -> Option<&str> {
        self.hierarchy
            .as_ref()?
            .get(format!("lvl{}", level))
            .and_then(Value::as_str)
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_ref().and_then(Value::as_str)
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_ref().and_then(Value::as_str)
    }
}

/// The caller-facing result record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl From<RawHit> for SearchResult {
    fn from(hit: RawHit) -> Self {
        SearchResult {
            title: derive_title(&hit),
            url: hit.url().map(str::to_string),
            snippet: hit.content().map(str::to_string),
            score: derive_score(&hit),
        }
    }
}

/// First non-empty of `lvl0`, `lvl1`, the first 80 characters of content,
/// then [`FALLBACK_TITLE`].
pub fn derive_title(hit: &RawHit) -> String {
    let content_prefix = hit
        .content()
        .map(|content| content.chars().take(TITLE_CONTENT_CHARS).collect::<String>());

    hit.level(0)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .or_else(|| {
            hit.level(1)
                .filter(|label| !label.is_empty())
                .map(str::to_string)
        })
        .or_else(|| content_prefix.filter(|prefix| !prefix.is_empty()))
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}

/// `1 / (1 + nbTypos)` when the ranking info carries a typo count.
pub fn derive_score(hit: &RawHit) -> Option<f64> {
    let typos = hit.ranking_info.as_ref()?.get("nbTypos")?.as_f64()?;
    if typos < 0.0 {
        return None;
    }
    Some(1.0 / (1.0 + typos))
}
