use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use store::AnnotationDefaults;

/// Process configuration, resolved once at startup from `APP_*` variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Annotator recorded when a request does not name one (`APP_ANNOTATOR`).
    pub annotator: String,
    /// Deployment label (`APP_ENV`); `prod`/`production` switch logs to JSON.
    pub env: String,
    pub bind_addr: String,
    pub annotations_dir: PathBuf,
    pub raw_dir: PathBuf,
    pub vocab_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            annotator: "anon".to_string(),
            env: "dev".to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
            annotations_dir: PathBuf::from("data/annotations"),
            raw_dir: PathBuf::from("data/raw"),
            vocab_path: PathBuf::from("data/vocab.json"),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            annotator: get("APP_ANNOTATOR").unwrap_or(defaults.annotator),
            env: get("APP_ENV").unwrap_or(defaults.env),
            bind_addr: get("APP_BIND").unwrap_or(defaults.bind_addr),
            annotations_dir: get("APP_ANNOTATIONS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.annotations_dir),
            raw_dir: get("APP_RAW_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.raw_dir),
            vocab_path: get("APP_VOCAB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.vocab_path),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self.env.as_str(), "prod" | "production")
    }

    pub fn annotation_defaults(&self) -> AnnotationDefaults {
        AnnotationDefaults {
            annotator: self.annotator.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None);

        assert_eq!(config.annotator, "anon");
        assert_eq!(config.env, "dev");
        assert!(!config.is_production());
        assert_eq!(config.vocab_path, PathBuf::from("data/vocab.json"));
    }

    #[test]
    fn test_overrides_from_variables() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("APP_ANNOTATOR", "dr_lee"),
            ("APP_ENV", "prod"),
            ("APP_RAW_DIR", "/srv/raw"),
            ("APP_BIND", "   "),
        ]);
        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.annotation_defaults().annotator, "dr_lee");
        assert!(config.is_production());
        assert_eq!(config.raw_dir, PathBuf::from("/srv/raw"));
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
    }
}
