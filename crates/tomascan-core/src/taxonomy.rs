//! Raw class-index to canonical tomato-disease label mapping
//!
//! The underlying classifier is trained on a larger plant-disease label
//! space; only a contiguous block of its raw output indices corresponds to
//! tomato classes. This module owns that sparse table and the arg-max
//! selection over a raw score vector.

/// Canonical tomato-disease labels reported by the system, in table order.
pub const CANONICAL_LABELS: [&str; 10] = [
    "Tomato___Bacterial_spot",
    "Tomato___Early_blight",
    "Tomato___Late_blight",
    "Tomato___Leaf_Mold",
    "Tomato___Septoria_leaf_spot",
    "Tomato___Spider_mites Two-spotted_spider_mite",
    "Tomato___Target_Spot",
    "Tomato___Tomato_Yellow_Leaf_Curl_Virus",
    "Tomato___Tomato_mosaic_virus",
    "Tomato___healthy",
];

/// Number of classes the raw model emits scores for.
pub const RAW_CLASS_COUNT: usize = 38;

/// Sparse raw-index -> canonical-index table.
///
/// Indices 15-24 are the primary tomato block; 25-34 alias the same ten
/// labels in the same order. Any raw index absent from this table is
/// out of domain.
const RAW_CLASS_TABLE: &[(usize, usize)] = &[
    (15, 0),
    (16, 1),
    (17, 2),
    (18, 3),
    (19, 4),
    (20, 5),
    (21, 6),
    (22, 7),
    (23, 8),
    (24, 9),
    (25, 0),
    (26, 1),
    (27, 2),
    (28, 3),
    (29, 4),
    (30, 5),
    (31, 6),
    (32, 7),
    (33, 8),
    (34, 9),
];

/// Translate a raw model output index into a canonical label.
///
/// Returns `None` for indices outside the tomato block.
pub fn canonical_label(raw_index: usize) -> Option<&'static str> {
    RAW_CLASS_TABLE
        .iter()
        .find(|(raw, _)| *raw == raw_index)
        .map(|&(_, canonical)| CANONICAL_LABELS[canonical])
}

/// Index of the largest score, ties broken by first occurrence.
pub fn arg_max(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

/// Map a raw score vector to a canonical label and its confidence.
///
/// Confidence is the arg-max score returned verbatim, with no
/// re-normalization. A `None` label means the classification succeeded but
/// the result is outside the supported tomato classes.
pub fn map_scores(scores: &[f32]) -> (Option<&'static str>, f32) {
    match arg_max(scores) {
        Some(index) => (canonical_label(index), scores[index]),
        None => (None, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_exactly_the_tomato_block() {
        for raw in 0..RAW_CLASS_COUNT + 4 {
            let label = canonical_label(raw);
            if (15..=34).contains(&raw) {
                let expected = CANONICAL_LABELS[(raw - 15) % 10];
                assert_eq!(label, Some(expected), "raw index {raw}");
            } else {
                assert_eq!(label, None, "raw index {raw}");
            }
        }
    }

    #[test]
    fn test_aliased_indices_share_labels() {
        for raw in 15..25 {
            assert_eq!(canonical_label(raw), canonical_label(raw + 10));
        }
    }

    #[test]
    fn test_arg_max_breaks_ties_by_first_occurrence() {
        assert_eq!(arg_max(&[0.1, 0.5, 0.5, 0.2]), Some(1));
        assert_eq!(arg_max(&[]), None);
        assert_eq!(arg_max(&[0.3]), Some(0));
    }

    #[test]
    fn test_map_scores_healthy_at_index_24() {
        let mut scores = vec![0.01f32; RAW_CLASS_COUNT];
        scores[24] = 0.87;
        let (label, confidence) = map_scores(&scores);
        assert_eq!(label, Some("Tomato___healthy"));
        assert!((confidence - 0.87).abs() < f32::EPSILON);
    }

    #[test]
    fn test_map_scores_out_of_domain() {
        let mut scores = vec![0.01f32; RAW_CLASS_COUNT];
        scores[3] = 0.66;
        let (label, confidence) = map_scores(&scores);
        assert_eq!(label, None);
        assert!((confidence - 0.66).abs() < f32::EPSILON);
    }

    #[test]
    fn test_map_scores_empty_vector() {
        let (label, confidence) = map_scores(&[]);
        assert_eq!(label, None);
        assert_eq!(confidence, 0.0);
    }
}
