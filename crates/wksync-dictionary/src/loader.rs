use std::path::Path;

use crate::types::{JmdictDocument, JmdictWord};

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse dictionary JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load the `words` array of a jmdict-simplified JSON file.
///
/// A file that cannot be read or parsed into the expected structure is fatal:
/// an index built from malformed input cannot be trusted.
pub fn load_words(path: &Path) -> Result<Vec<JmdictWord>, DictionaryError> {
    tracing::info!(path = %path.display(), "loading dictionary");
    let json = std::fs::read_to_string(path)?;
    let document: JmdictDocument = serde_json::from_str(&json)?;
    tracing::info!(words = document.words.len(), "dictionary loaded");
    Ok(document.words)
}
