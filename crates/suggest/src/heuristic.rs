use regex::Regex;
use schema::{CharIndex, Span};
use std::collections::HashSet;

use crate::keywords;
use crate::{Suggester, Suggestion, SuggestionSource};

/// Runs of capitalized words of three or more letters, e.g. "Crohn Disease".
const CAPITALIZED_SEQUENCE: &str = r"\b[A-Z][A-Za-z\-]{2,}(?:[ \t]+[A-Z][A-Za-z\-]{2,})*\b";
const CAPITALIZED_WORD: &str = r"[A-Z][A-Za-z\-]{2,}";

const KEYWORD_CONFIDENCE: f32 = 0.9;
const CAPITALIZED_CONFIDENCE: f32 = 0.5;
const CAPITALIZED_TYPE: &str = "Disease";

/// A case-insensitive whole-word keyword list mapped to one entity type.
pub struct KeywordRule {
    pub entity_type: String,
    pub source: SuggestionSource,
    pub confidence: f32,
    pattern: Regex,
}

impl KeywordRule {
    pub fn new(
        entity_type: impl Into<String>,
        source: SuggestionSource,
        confidence: f32,
        terms: &[&str],
    ) -> Result<Self, regex::Error> {
        // Longest first, so "chest pain" wins over a shorter keyword at the same position.
        let mut terms: Vec<&str> = terms.iter().copied().filter(|t| !t.is_empty()).collect();
        terms.sort_by_key(|t| std::cmp::Reverse(t.len()));

        let alternation = terms
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))?;

        Ok(Self {
            entity_type: entity_type.into(),
            source,
            confidence,
            pattern,
        })
    }
}

/// Lexical suggester: keyword lists plus capitalized-word runs.
///
/// Candidates overlapping an existing entity are dropped. Candidates may
/// overlap each other; only an exact span already proposed by a keyword rule
/// is not proposed again as a capitalized run.
pub struct HeuristicSuggester {
    keyword_rules: Vec<KeywordRule>,
    capitalized: Regex,
    capitalized_word: Regex,
    stopwords: HashSet<String>,
}

impl HeuristicSuggester {
    pub fn new(keyword_rules: Vec<KeywordRule>) -> Result<Self, regex::Error> {
        Ok(Self {
            keyword_rules,
            capitalized: Regex::new(CAPITALIZED_SEQUENCE)?,
            capitalized_word: Regex::new(CAPITALIZED_WORD)?,
            stopwords: keywords::CAPITALIZED_STOPWORDS
                .iter()
                .map(|w| w.to_string())
                .collect(),
        })
    }

    /// Medication and symptom keyword lists shipped with the service.
    pub fn builtin() -> Result<Self, regex::Error> {
        Self::new(vec![
            KeywordRule::new(
                "Medication",
                SuggestionSource::MedicationKeyword,
                KEYWORD_CONFIDENCE,
                keywords::MEDICATIONS,
            )?,
            KeywordRule::new(
                "Symptom",
                SuggestionSource::SymptomKeyword,
                KEYWORD_CONFIDENCE,
                keywords::SYMPTOMS,
            )?,
        ])
    }

    fn keyword_candidates(&self, text: &str, index: &CharIndex<'_>) -> Vec<Suggestion> {
        let mut out = Vec::new();
        for rule in &self.keyword_rules {
            for m in rule.pattern.find_iter(text) {
                if m.is_empty() {
                    continue;
                }
                if let Some(span) = index.span_of_bytes(m.start(), m.end()) {
                    out.push(Suggestion {
                        start: span.start,
                        end: span.end,
                        text: m.as_str().to_string(),
                        entity_type: rule.entity_type.clone(),
                        confidence: rule.confidence,
                        source: rule.source,
                    });
                }
            }
        }
        out
    }

    fn capitalized_candidates(&self, text: &str, index: &CharIndex<'_>) -> Vec<Suggestion> {
        let mut out = Vec::new();
        for m in self.capitalized.find_iter(text) {
            // Skip leading sentence words such as "The" in "The Mayo Clinic".
            let first_kept = self
                .capitalized_word
                .find_iter(m.as_str())
                .find(|w| !self.stopwords.contains(&w.as_str().to_lowercase()));
            let Some(first_kept) = first_kept else {
                continue;
            };

            let start = m.start() + first_kept.start();
            if let Some(span) = index.span_of_bytes(start, m.end()) {
                out.push(Suggestion {
                    start: span.start,
                    end: span.end,
                    text: text[start..m.end()].to_string(),
                    entity_type: CAPITALIZED_TYPE.to_string(),
                    confidence: CAPITALIZED_CONFIDENCE,
                    source: SuggestionSource::Capitalized,
                });
            }
        }
        out
    }
}

impl Suggester for HeuristicSuggester {
    fn suggest(&self, text: &str, existing: &[Span]) -> Vec<Suggestion> {
        let index = CharIndex::new(text);
        let is_free = |s: &Suggestion| !existing.iter().any(|e| e.overlaps(&s.span()));

        let mut suggestions: Vec<Suggestion> = self
            .keyword_candidates(text, &index)
            .into_iter()
            .filter(|s| is_free(s))
            .collect();

        let keyword_spans: HashSet<Span> = suggestions.iter().map(Suggestion::span).collect();
        suggestions.extend(
            self.capitalized_candidates(text, &index)
                .into_iter()
                .filter(|s| is_free(s) && !keyword_spans.contains(&s.span())),
        );

        suggestions.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then_with(|| b.confidence.total_cmp(&a.confidence))
        });
        suggestions
    }
}
