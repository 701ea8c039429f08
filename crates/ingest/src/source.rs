use serde::{Deserialize, Serialize};

/// Lines that belong to the worked examples in a raw abstract, not to the text.
const EXAMPLE_LINE_PREFIXES: [&str; 3] = ["Entities", "Relations", "Use Case"];

/// Minimum distance between the outermost quotes for the quoted region to be
/// taken as the abstract body.
const MIN_QUOTED_LEN: usize = 20;

/// One raw text file offered to bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSource {
    /// File stem the document id is derived from.
    pub name: String,
    pub content: String,
}

impl RawSource {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn document_id(&self) -> String {
        derive_document_id(&self.name)
    }

    pub fn core_text(&self) -> String {
        extract_core_text(&self.content)
    }
}

/// Turn a file stem into a document id: characters outside `[A-Za-z0-9._-]`
/// become `_`, and leading dots are replaced so the id never names a hidden file.
pub fn derive_document_id(name: &str) -> String {
    let mut id: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if id.starts_with('.') {
        id = id.replacen('.', "_", 1);
    }
    if id.is_empty() {
        id = "_".to_string();
    }
    id.chars().take(128).collect()
}

/// Pull the annotatable abstract out of a raw file.
///
/// Raw files often wrap the abstract in double quotes and follow it with
/// example annotations. A long enough quoted region wins; otherwise the
/// example lines are dropped.
pub fn extract_core_text(raw: &str) -> String {
    if raw.matches('"').count() >= 2 {
        if let (Some(first), Some(last)) = (raw.find('"'), raw.rfind('"')) {
            if raw[first..last].chars().count() > MIN_QUOTED_LEN {
                return raw[first + 1..last].trim().to_string();
            }
        }
    }

    raw.lines()
        .filter(|line| {
            !EXAMPLE_LINE_PREFIXES
                .iter()
                .any(|prefix| line.starts_with(prefix))
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_abstract_is_extracted() {
        let raw = "Use Case 1\n\"  Hypertension is treated with amlodipine in adults.  \"\nEntities: Hypertension (Disease)";

        assert_eq!(
            extract_core_text(raw),
            "Hypertension is treated with amlodipine in adults."
        );
    }

    #[test]
    fn test_short_quotes_fall_back_to_line_filter() {
        let raw = "Use Case 2\nPatient said \"ok\" after dosing.\nEntities: none\nRelations: none\n";

        assert_eq!(extract_core_text(raw), "Patient said \"ok\" after dosing.");
    }

    #[test]
    fn test_plain_text_is_trimmed() {
        assert_eq!(
            extract_core_text("\n  Asthma managed with budesonide.\n\n"),
            "Asthma managed with budesonide."
        );
    }

    #[test]
    fn test_document_id_from_file_stem() {
        assert_eq!(derive_document_id("abstract_01"), "abstract_01");
        assert_eq!(derive_document_id("case 7 (final)"), "case_7__final_");
        assert_eq!(derive_document_id(".hidden"), "_hidden");
        assert_eq!(derive_document_id("café"), "caf_");

        let source = RawSource::new("case 1", "text");
        assert_eq!(source.document_id(), "case_1");
        assert!(schema::is_valid_document_id(&source.document_id()));
    }
}
