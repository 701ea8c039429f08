pub mod heuristic;
pub mod keywords;

pub use heuristic::{HeuristicSuggester, KeywordRule};

use schema::{Document, Span};
use serde::{Deserialize, Serialize};

/// Which rule produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionSource {
    #[serde(rename = "heuristic-med")]
    MedicationKeyword,
    #[serde(rename = "heuristic-symptom")]
    SymptomKeyword,
    #[serde(rename = "heuristic-cap")]
    Capitalized,
}

/// A candidate entity span proposed to the annotator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub start: usize,
    pub end: usize,
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub confidence: f32,
    pub source: SuggestionSource,
}

impl Suggestion {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Anything that can propose entity spans for a text.
///
/// Implementations must be pure functions of their input: the same text and
/// existing spans always give the same ordered candidates, and no candidate
/// may overlap an existing span.
pub trait Suggester: Send + Sync {
    fn suggest(&self, text: &str, existing: &[Span]) -> Vec<Suggestion>;
}

/// Run a suggester against a document's text and current entities.
pub fn suggest_entities(suggester: &dyn Suggester, document: &Document) -> Vec<Suggestion> {
    let existing = document.entity_spans();
    let suggestions = suggester.suggest(&document.text, &existing);

    tracing::debug!(
        doc_id = %document.id,
        existing = existing.len(),
        count = suggestions.len(),
        "Computed entity suggestions"
    );

    suggestions
}
