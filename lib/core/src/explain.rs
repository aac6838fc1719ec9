//! Feature-overlap explanations for movie catalogs.
//!
//! Exposes *why* two items were judged similar by the upstream similarity
//! computation: the strongest TF-IDF terms of one item, and the shared terms
//! of a pair with their pairwise contribution. This is a diagnostic surface,
//! not a recomputation of similarity.

use crate::matrix::FeatureMatrix;
use serde::Serialize;

/// A single feature term and its weight in an item's row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureWeight {
    pub term: String,
    pub weight: f32,
}

/// Top features of one item plus the size of its non-zero feature set
#[derive(Debug, Clone, Serialize)]
pub struct FeatureProfile {
    pub features: Vec<FeatureWeight>,
    pub total_nonzero: usize,
}

/// A feature present with strictly positive weight in both items of a pair.
///
/// `contribution = weight_a * weight_b` — an unnormalized term-overlap score,
/// not a cosine decomposition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharedFeature {
    pub term: String,
    pub weight_a: f32,
    pub weight_b: f32,
    pub contribution: f32,
}

/// Top `n` strictly-positive features of an item, descending by weight.
/// Ties keep vocabulary (column) order.
pub fn feature_profile(features: &FeatureMatrix, index: usize, n: usize) -> FeatureProfile {
    let mut weighted: Vec<(usize, f32)> = features
        .row(index)
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, w)| w > 0.0)
        .collect();
    let total_nonzero = weighted.len();

    weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let top = weighted
        .into_iter()
        .take(n)
        .map(|(column, weight)| FeatureWeight {
            term: features.term(column).to_string(),
            weight,
        })
        .collect();

    FeatureProfile {
        features: top,
        total_nonzero,
    }
}

/// Features strictly positive in both rows, descending by contribution,
/// truncated to `n`.
pub fn common_features(
    features: &FeatureMatrix,
    index_a: usize,
    index_b: usize,
    n: usize,
) -> Vec<SharedFeature> {
    let row_a = features.row(index_a);
    let row_b = features.row(index_b);

    let mut shared: Vec<SharedFeature> = row_a
        .iter()
        .zip(row_b.iter())
        .enumerate()
        .filter(|&(_, (&a, &b))| a > 0.0 && b > 0.0)
        .map(|(column, (&weight_a, &weight_b))| SharedFeature {
            term: features.term(column).to_string(),
            weight_a,
            weight_b,
            contribution: weight_a * weight_b,
        })
        .collect();

    shared.sort_by(|a, b| {
        b.contribution
            .partial_cmp(&a.contribution)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    shared.truncate(n);
    shared
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> FeatureMatrix {
        let vocab = ["action", "space", "desert", "politics"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        FeatureMatrix::from_rows(
            vec![
                vec![0.0, 0.6, 0.9, 0.3],
                vec![0.4, 0.5, 0.0, 0.8],
            ],
            vocab,
        )
        .unwrap()
    }

    #[test]
    fn test_profile_sorted_and_positive_only() {
        let profile = feature_profile(&features(), 0, 10);

        assert_eq!(profile.total_nonzero, 3);
        let terms: Vec<&str> = profile.features.iter().map(|f| f.term.as_str()).collect();
        assert_eq!(terms, vec!["desert", "space", "politics"]);
    }

    #[test]
    fn test_profile_truncates_but_counts_all() {
        let profile = feature_profile(&features(), 0, 1);
        assert_eq!(profile.features.len(), 1);
        assert_eq!(profile.total_nonzero, 3);
    }

    #[test]
    fn test_common_features_intersection_by_contribution() {
        let shared = common_features(&features(), 0, 1, 10);

        // "desert" is zero for item 1, "action" zero for item 0
        let terms: Vec<&str> = shared.iter().map(|f| f.term.as_str()).collect();
        assert_eq!(terms, vec!["space", "politics"]);

        assert!((shared[0].contribution - 0.3).abs() < 1e-6);
        assert!((shared[1].contribution - 0.24).abs() < 1e-6);
    }

    #[test]
    fn test_common_features_truncation() {
        let shared = common_features(&features(), 0, 1, 1);
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].term, "space");
    }
}
