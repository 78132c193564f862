//! Static disease knowledge base
//!
//! Maps lowercase disease-name substrings to description and treatment
//! text. Matching is deliberately fuzzy (case-insensitive containment,
//! first entry wins) so it tolerates the label formatting differences
//! between the local and hosted classifiers.

use crate::types::{EnrichedPrediction, ScoredLabel};

struct DiseaseInfo {
    description: &'static str,
    treatment: &'static str,
}

const DISEASE_INFO: &[(&str, DiseaseInfo)] = &[
    (
        "early blight",
        DiseaseInfo {
            description: "Early blight is characterized by brown spots with concentric rings that grow together.",
            treatment: "Remove affected leaves, improve air circulation, and apply appropriate fungicides.",
        },
    ),
    (
        "late blight",
        DiseaseInfo {
            description: "Late blight appears as dark, water-soaked spots with white fungal growth on undersides.",
            treatment: "Remove infected plants, ensure good drainage, and apply copper-based fungicides.",
        },
    ),
    (
        "leaf mold",
        DiseaseInfo {
            description: "Leaf mold shows as yellow spots on upper leaf surfaces with gray-brown growths underneath.",
            treatment: "Improve ventilation, reduce humidity, and apply suitable fungicides.",
        },
    ),
    (
        "healthy",
        DiseaseInfo {
            description: "This plant appears healthy with no visible disease symptoms.",
            treatment: "Continue regular care and monitoring.",
        },
    ),
];

/// Look up description and treatment text for a disease label.
///
/// Case-insensitive substring containment; the first matching table entry
/// wins.
pub fn lookup(label: &str) -> Option<(&'static str, &'static str)> {
    let needle = label.to_lowercase();
    DISEASE_INFO
        .iter()
        .find(|(key, _)| needle.contains(key))
        .map(|(_, info)| (info.description, info.treatment))
}

/// Attach knowledge-base text to a prediction where a table entry matches.
///
/// Unmatched labels pass through unchanged. Stable under repeated
/// application.
pub fn enrich(mut prediction: EnrichedPrediction) -> EnrichedPrediction {
    if let Some((description, treatment)) = lookup(&prediction.label) {
        prediction.description = Some(description.to_string());
        prediction.treatment = Some(treatment.to_string());
    }
    prediction
}

/// Enrich a list of scored labels into predictions.
pub fn enrich_labels(labels: Vec<ScoredLabel>) -> Vec<EnrichedPrediction> {
    labels
        .into_iter()
        .map(|scored| enrich(scored.into()))
        .collect()
}
