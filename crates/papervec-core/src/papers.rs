//! Load, augment, and persist paper collections.

use crate::error::{Error, Result};
use crate::types::{Paper, PaperCollection};
use std::fs;
use std::path::Path;

/// Read a paper collection from `path`.
///
/// The two reportable conditions are distinguished from everything fatal:
/// a missing file maps to [`Error::NotFound`] and a present-but-empty
/// `papers` array (or an absent key) to [`Error::EmptyCollection`].
/// Malformed JSON surfaces as [`Error::Json`].
pub fn load_collection(path: &Path) -> Result<PaperCollection> {
    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    let raw = fs::read_to_string(path)?;
    let collection: PaperCollection = serde_json::from_str(&raw)?;
    if collection.papers.is_empty() {
        return Err(Error::EmptyCollection);
    }
    Ok(collection)
}

/// The ordered embedding inputs, one per paper (abstract or title).
pub fn select_texts(papers: &[Paper]) -> Vec<String> {
    papers.iter().map(|p| p.embedding_text().to_string()).collect()
}

/// Attach vector `i` to paper `i` as `abstract_embedding`.
pub fn attach_embeddings(papers: &mut [Paper], embeddings: Vec<Vec<f32>>) -> Result<()> {
    if papers.len() != embeddings.len() {
        return Err(Error::Operation(format!(
            "embedding count {} does not match paper count {}",
            embeddings.len(),
            papers.len()
        )));
    }
    for (paper, embedding) in papers.iter_mut().zip(embeddings) {
        paper.abstract_embedding = Some(embedding);
    }
    Ok(())
}

/// Write the collection as indented UTF-8 JSON.
///
/// The document is serialized in memory first so a failure never leaves a
/// truncated file behind.
pub fn write_collection(path: &Path, collection: &PaperCollection) -> Result<()> {
    let rendered = serde_json::to_string_pretty(collection)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, rendered)?;
    Ok(())
}
