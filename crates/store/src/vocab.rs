use schema::Vocabulary;
use std::path::Path;

use crate::error::{Result, StoreError};

/// Load the controlled vocabulary from a JSON file of the form
/// `{"entity_types": [...], "relation_types": [...]}`.
///
/// Called once at startup; any error here should abort the process.
pub fn load_vocabulary(path: &Path) -> Result<Vocabulary> {
    let invalid = |reason: String| StoreError::Vocabulary {
        path: path.to_path_buf(),
        reason,
    };

    let raw = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let vocabulary: Vocabulary = serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))?;

    if vocabulary.entity_types.is_empty() {
        return Err(invalid("entity_types is empty".to_string()));
    }
    if vocabulary
        .entity_types
        .iter()
        .chain(vocabulary.relation_types.iter())
        .any(|label| label.trim().is_empty())
    {
        return Err(invalid("type labels must not be blank".to_string()));
    }

    tracing::info!(
        path = %path.display(),
        entity_types = vocabulary.entity_types.len(),
        relation_types = vocabulary.relation_types.len(),
        "Loaded vocabulary"
    );
    Ok(vocabulary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("vocab.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_loads_types() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"{"entity_types": ["Disease", "Medication"], "relation_types": ["treats"]}"#,
        );

        let vocab = load_vocabulary(&path).unwrap();
        assert!(vocab.has_entity_type("Disease"));
        assert!(vocab.has_relation_type("treats"));
        assert!(!vocab.has_entity_type("disease"));
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = load_vocabulary(&dir.path().join("absent.json")).unwrap_err();

        assert!(matches!(err, StoreError::Vocabulary { .. }));
    }

    #[test]
    fn test_malformed_files_fail() {
        let dir = TempDir::new().unwrap();

        for body in [
            "not json",
            r#"{"entity_types": ["Disease"]}"#,
            r#"{"entity_types": [], "relation_types": ["treats"]}"#,
            r#"{"entity_types": ["  "], "relation_types": []}"#,
        ] {
            let path = write(&dir, body);
            assert!(load_vocabulary(&path).is_err(), "accepted: {}", body);
        }
    }
}
