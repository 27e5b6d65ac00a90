//! Community gallery document types.
//!
//! A single JSON document holds every shared metaphor, newest first.
//! Entries are owned exclusively by the document; there is no edit or
//! delete operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum accepted SVG size in bytes (100KB).
pub const MAX_SVG_LEN: usize = 100_000;
/// Maximum stored title length in characters.
pub const MAX_TITLE_LEN: usize = 100;
/// Maximum stored prompt/description length in characters.
pub const MAX_PROMPT_LEN: usize = 500;
/// Maximum stored author label length in characters.
pub const MAX_AUTHOR_LEN: usize = 50;

/// Up/down vote counts for a community entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub up: u32,
    pub down: u32,
}

/// One persisted metaphor in the community document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityMetaphor {
    pub id: String,
    pub title: String,
    #[serde(rename = "titleEn")]
    pub title_en: String,
    pub description: String,
    pub insight: String,
    pub prompt: String,
    pub svg: String,
    pub author: String,
    pub votes: VoteTally,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub source: String,
}

impl CommunityMetaphor {
    /// Build a new entry with a fresh id, the field caps applied, and
    /// a zeroed vote tally.
    pub fn new(title: &str, title_en: &str, prompt: &str, svg: &str, author: &str) -> Self {
        Self {
            id: generate_entry_id(),
            title: truncate_chars(title, MAX_TITLE_LEN),
            title_en: truncate_chars(&title_en.to_uppercase(), MAX_TITLE_LEN),
            description: truncate_chars(prompt, MAX_PROMPT_LEN),
            insight: String::new(),
            prompt: truncate_chars(prompt, MAX_PROMPT_LEN),
            svg: svg.to_string(),
            author: truncate_chars(author, MAX_AUTHOR_LEN),
            votes: VoteTally::default(),
            created_at: Utc::now(),
            source: "community".to_string(),
        }
    }
}

/// The single persisted community collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityDocument {
    pub version: u32,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    /// Newest first. Insertion order is meaningful and preserved.
    pub metaphors: Vec<CommunityMetaphor>,
}

impl CommunityDocument {
    /// Empty document, synthesized when the remote store has none yet.
    pub fn empty() -> Self {
        Self {
            version: 1,
            updated_at: Utc::now(),
            metaphors: Vec::new(),
        }
    }

    /// Prepend an entry (newest-first invariant) and touch the
    /// last-updated timestamp.
    pub fn prepend(&mut self, entry: CommunityMetaphor) {
        self.metaphors.insert(0, entry);
        self.updated_at = Utc::now();
    }
}

/// Quick shape check that a payload looks like an SVG document.
pub fn is_svg_document(svg: &str) -> bool {
    svg.contains("<svg") && svg.contains("</svg>")
}

/// Generate a community entry id: time-based component plus random
/// component. Uniqueness is best-effort; collisions are statistically
/// negligible at this system's write volume.
pub fn generate_entry_id() -> String {
    let timestamp = to_base36(Utc::now().timestamp_millis());
    let random: String = Uuid::new_v4().simple().to_string().chars().take(6).collect();
    format!("cm-{timestamp}-{random}")
}

fn to_base36(mut value: i64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value <= 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
