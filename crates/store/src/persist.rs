use schema::Document;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// One pretty-printed JSON file per document, named `<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirectory {
    root: PathBuf,
}

impl JsonDirectory {
    /// Open the directory, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::io(&root, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).is_file()
    }

    /// Read a persisted document; `Ok(None)` when there is no file for `id`.
    pub fn load(&self, id: &str) -> Result<Option<Document>> {
        let path = self.path_for(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let doc: Document = serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        if doc.id != id {
            return Err(StoreError::Corrupt {
                path,
                reason: format!("file holds document '{}'", doc.id),
            });
        }

        Ok(Some(doc))
    }

    /// Write the document through a sibling temp file and rename it into
    /// place, so readers never see a half-written file. Last writer wins.
    pub fn save(&self, doc: &Document) -> Result<()> {
        let path = self.path_for(&doc.id);
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(doc)?;

        let mut file = File::create(&tmp_path).map_err(|e| StoreError::io(&tmp_path, e))?;
        file.write_all(&json)
            .and_then(|_| file.sync_all())
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, &path).map_err(|e| StoreError::io(&path, e))?;

        tracing::debug!(doc_id = %doc.id, path = %path.display(), "Saved document");
        Ok(())
    }
}
