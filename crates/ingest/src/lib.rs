pub mod reader;
pub mod source;

pub use reader::FileReader;
pub use source::{RawSource, derive_document_id, extract_core_text};

use anyhow::Result;
use std::path::Path;

/// Read every raw abstract under `dir` for bootstrapping.
///
/// A missing directory is not an error; it simply contributes no sources.
pub async fn ingest_directory(dir: &Path) -> Result<Vec<RawSource>> {
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        tracing::warn!(dir = %dir.display(), "Raw text directory not found, nothing to bootstrap");
        return Ok(Vec::new());
    }

    let files = FileReader::read_directory(dir).await?;
    let sources: Vec<RawSource> = files
        .into_iter()
        .map(|(name, content)| RawSource::new(name, content))
        .collect();

    tracing::info!(dir = %dir.display(), sources = sources.len(), "Read raw text sources");
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_directory_yields_no_sources() {
        let dir = tempfile::TempDir::new().unwrap();
        let sources = ingest_directory(&dir.path().join("raw")).await.unwrap();

        assert!(sources.is_empty());
    }

    #[tokio::test]
    async fn test_sources_carry_stem_and_content() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("case 3.txt"), "Fever and cough.").unwrap();

        let sources = ingest_directory(dir.path()).await.unwrap();

        assert_eq!(sources, vec![RawSource::new("case 3", "Fever and cough.")]);
        assert_eq!(sources[0].document_id(), "case_3");
    }
}
