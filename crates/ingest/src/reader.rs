use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

pub struct FileReader;

impl FileReader {
    pub async fn read_file(path: &Path) -> Result<String> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match extension {
            "txt" | "md" => {
                let content = fs::read_to_string(path)
                    .await
                    .context(format!("Failed to read file: {:?}", path))?;
                Ok(content)
            }
            _ => anyhow::bail!("Unsupported file format: {}", extension),
        }
    }

    /// Read all `.txt`/`.md` files directly under `dir` as `(file stem, content)`,
    /// sorted by file name.
    pub async fn read_directory(dir: &Path) -> Result<Vec<(String, String)>> {
        let mut paths = Vec::new();

        let mut entries = fs::read_dir(dir)
            .await
            .context(format!("Failed to read directory: {:?}", dir))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext == "txt" || ext == "md" {
                        paths.push(path);
                    }
                }
            }
        }

        paths.sort();

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let content = Self::read_file(&path).await?;
            files.push((stem, content));
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_text_files_in_name_order() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("b_case.txt"), "second").unwrap();
        std::fs::write(dir.path().join("a_case.md"), "first").unwrap();
        std::fs::write(dir.path().join("notes.pdf"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let files = FileReader::read_directory(dir.path()).await.unwrap();

        assert_eq!(
            files,
            vec![
                ("a_case".to_string(), "first".to_string()),
                ("b_case".to_string(), "second".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_rejects_unsupported_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("scan.pdf");
        std::fs::write(&path, "binary").unwrap();

        assert!(FileReader::read_file(&path).await.is_err());
    }
}
