//! Built-in keyword lists for the heuristic suggester.

pub const MEDICATIONS: &[&str] = &[
    "amlodipine",
    "lisinopril",
    "budesonide",
    "montelukast",
    "prednisone",
    "metformin",
    "insulin",
];

pub const SYMPTOMS: &[&str] = &[
    "fever",
    "cough",
    "wheezing",
    "dyspnea",
    "shortness of breath",
    "chest pain",
    "headache",
    "fatigue",
    "nausea",
    "dizziness",
];

/// Capitalized words that start sentences far more often than they name
/// anything clinical.
pub const CAPITALIZED_STOPWORDS: &[&str] = &[
    "the", "this", "that", "these", "those", "for", "with", "after", "before", "during",
    "our", "its", "she", "they", "his", "her", "their", "patient", "patients", "results",
    "methods", "background", "conclusion", "conclusions", "objective",
];
