//! Domain types for paper collections and their embeddings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One bibliographic record from the `papers` collection.
///
/// Only the fields this crate acts on are modeled explicitly; everything
/// else in the record (ids, authors, year, DOI, citation lists, ...)
/// rides along in `extra` and is written back out untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_embedding: Option<Vec<f32>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Paper {
    /// The text an embedding is computed from: the abstract when present
    /// and non-empty, otherwise the title (possibly empty).
    ///
    /// No trimming is applied; a whitespace-only abstract still wins over
    /// the title.
    pub fn embedding_text(&self) -> &str {
        match &self.abstract_text {
            Some(a) if !a.is_empty() => a,
            _ => &self.title,
        }
    }
}

/// The top-level JSON document: `{ "papers": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaperCollection {
    #[serde(default)]
    pub papers: Vec<Paper>,
}
