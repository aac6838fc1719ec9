//! Personalized aggregation over a user's full rating history.
//!
//! Every rated title nominates its most similar unrated neighbours; nominations
//! are weighted by the square of the normalized rating so enthusiastic ratings
//! dominate mediocre ones, then averaged over the number of nominating sources.
//! The caller supplies the history as a value up front, so one aggregation call
//! always works against a consistent snapshot.

use crate::catalog::CatalogIndex;
use crate::matrix::SimilarityMatrix;
use crate::rank::top_similar;
use crate::resolve::normalize_title;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// Similar items fetched per rated source title
pub const SOURCE_FAN_OUT: usize = 20;
/// Provenance records surfaced per recommendation
pub const PROVENANCE_DISPLAY: usize = 3;

/// One entry of a user's rating history: rating is 1-10 inclusive, validated
/// before it reaches the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRating {
    pub title: String,
    pub rating: u8,
}

/// Which rated source nominated a recommendation, and with what weight
#[derive(Debug, Clone, Serialize)]
pub struct Provenance {
    pub source_title: String,
    pub user_rating: u8,
    pub similarity: f32,
    pub weighted_contribution: f64,
}

/// An aggregated candidate: matrix index, mean weighted score, full provenance
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub index: usize,
    pub score: f64,
    pub sources: Vec<Provenance>,
}

/// Contribution multiplier for a rating: `(rating / 10)²`.
///
/// Deliberately non-linear — a 4/10 contributes 0.16, a 9/10 contributes 0.81,
/// roughly five times the influence despite being just over twice the raw
/// value. Mediocre ratings must not pollute recommendations as strongly as
/// enthusiastic ones.
pub fn exponential_weight(rating: u8) -> f64 {
    let normalized = f64::from(rating) / 10.0;
    normalized * normalized
}

/// Aggregates weighted similarity contributions across a rating history.
#[derive(Debug, Clone, Copy)]
pub struct PreferenceAggregator<'a> {
    catalog: &'a CatalogIndex,
    similarity: &'a SimilarityMatrix,
}

impl<'a> PreferenceAggregator<'a> {
    pub fn new(catalog: &'a CatalogIndex, similarity: &'a SimilarityMatrix) -> Self {
        Self { catalog, similarity }
    }

    /// Rank unrated catalog items by mean weighted similarity to the rated
    /// history, descending, truncated to `limit`.
    ///
    /// Rated titles are excluded from the output regardless of score. Rated
    /// titles absent from the similarity model contribute nothing; that is a
    /// silent skip, not an error. An empty history (or one where nothing
    /// resolves) yields an empty list.
    pub fn recommend(&self, ratings: &[UserRating], limit: usize) -> Vec<Recommendation> {
        // Full rated set first: a rated title must never be nominated, not
        // even by a source processed before it.
        let rated: AHashSet<String> = ratings
            .iter()
            .map(|r| normalize_title(&r.title))
            .collect();

        let mut totals: AHashMap<usize, f64> = AHashMap::new();
        let mut counts: AHashMap<usize, u32> = AHashMap::new();
        let mut sources: AHashMap<usize, Vec<Provenance>> = AHashMap::new();

        for entry in ratings {
            let normalized = normalize_title(&entry.title);
            let Some(index) = self.catalog.position(&normalized) else {
                continue;
            };

            let weight = exponential_weight(entry.rating);
            for (candidate, similarity) in top_similar(self.similarity, index, SOURCE_FAN_OUT) {
                let candidate_title = &self.catalog.normalized_titles()[candidate];
                if rated.contains(candidate_title) {
                    continue;
                }

                let contribution = f64::from(similarity) * weight;
                *totals.entry(candidate).or_insert(0.0) += contribution;
                *counts.entry(candidate).or_insert(0) += 1;
                sources.entry(candidate).or_default().push(Provenance {
                    source_title: entry.title.clone(),
                    user_rating: entry.rating,
                    similarity,
                    weighted_contribution: contribution,
                });
            }
        }

        let mut recommendations: Vec<Recommendation> = totals
            .into_iter()
            .map(|(index, total)| {
                // Mean over the number of nominating sources, not over the
                // fan-out width.
                let count = counts[&index];
                let mut provenance = sources.remove(&index).unwrap_or_default();
                provenance.sort_by(|a, b| {
                    b.weighted_contribution
                        .partial_cmp(&a.weighted_contribution)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                Recommendation {
                    index,
                    score: total / f64::from(count),
                    sources: provenance,
                }
            })
            .collect();

        recommendations.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.index.cmp(&b.index))
        });
        recommendations.truncate(limit);
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogItem, ItemDetails, ItemId};

    fn catalog(titles: &[&str]) -> CatalogIndex {
        let entries = titles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                CatalogItem::new(
                    ItemId::Isbn(format!("isbn-{i}")),
                    *t,
                    ItemDetails::Book {
                        author: "A".to_string(),
                        publisher: "P".to_string(),
                        year: "2000".to_string(),
                        image_url: None,
                    },
                )
            })
            .collect();
        CatalogIndex::from_entries(entries)
    }

    fn rating(title: &str, rating: u8) -> UserRating {
        UserRating {
            title: title.to_string(),
            rating,
        }
    }

    #[test]
    fn test_exponential_weight_values() {
        assert!((exponential_weight(4) - 0.16).abs() < 1e-9);
        assert!((exponential_weight(7) - 0.49).abs() < 1e-9);
        assert!((exponential_weight(9) - 0.81).abs() < 1e-9);
        assert!((exponential_weight(10) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rated_titles_never_recommended() {
        let catalog = catalog(&["the hobbit", "the lord of the rings", "dune"]);
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.9, 0.4],
            vec![0.9, 1.0, 0.3],
            vec![0.4, 0.3, 1.0],
        ])
        .unwrap();

        let aggregator = PreferenceAggregator::new(&catalog, &matrix);
        let results = aggregator.recommend(
            &[rating("The Hobbit", 9), rating(" the lord of the rings ", 8)],
            10,
        );

        // Only "dune" is unrated
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index, 2);
    }

    #[test]
    fn test_higher_rating_contributes_more() {
        // "the hobbit" and "dune" both 0.5-similar to "foundation"
        let catalog = catalog(&["the hobbit", "dune", "foundation"]);
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.0, 0.5],
            vec![0.0, 1.0, 0.5],
            vec![0.5, 0.5, 1.0],
        ])
        .unwrap();

        let aggregator = PreferenceAggregator::new(&catalog, &matrix);
        let results = aggregator.recommend(&[rating("the hobbit", 9), rating("dune", 4)], 10);

        assert_eq!(results.len(), 1);
        let foundation = &results[0];
        assert_eq!(foundation.index, 2);
        assert_eq!(foundation.sources.len(), 2);

        // Provenance sorted by weighted contribution: 0.5*0.81 over 0.5*0.16
        assert_eq!(foundation.sources[0].source_title, "the hobbit");
        assert!((foundation.sources[0].weighted_contribution - 0.405).abs() < 1e-9);
        assert_eq!(foundation.sources[1].source_title, "dune");
        assert!((foundation.sources[1].weighted_contribution - 0.08).abs() < 1e-9);

        // Mean over the two nominating sources
        assert!((foundation.score - (0.405 + 0.08) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_unresolvable_titles_silently_skipped() {
        let catalog = catalog(&["the hobbit", "dune"]);
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.7],
            vec![0.7, 1.0],
        ])
        .unwrap();

        let aggregator = PreferenceAggregator::new(&catalog, &matrix);
        let results = aggregator.recommend(
            &[rating("not in the model", 10), rating("the hobbit", 8)],
            10,
        );

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index, 1);
        assert_eq!(results[0].sources.len(), 1);
    }

    #[test]
    fn test_empty_history_empty_result() {
        let catalog = catalog(&["dune"]);
        let matrix = SimilarityMatrix::from_rows(vec![vec![1.0]]).unwrap();

        let aggregator = PreferenceAggregator::new(&catalog, &matrix);
        assert!(aggregator.recommend(&[], 10).is_empty());
    }

    #[test]
    fn test_limit_truncates_by_score() {
        let catalog = catalog(&["a", "b", "c", "d"]);
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.9, 0.2, 0.6],
            vec![0.9, 1.0, 0.1, 0.3],
            vec![0.2, 0.1, 1.0, 0.0],
            vec![0.6, 0.3, 0.0, 1.0],
        ])
        .unwrap();

        let aggregator = PreferenceAggregator::new(&catalog, &matrix);
        let results = aggregator.recommend(&[rating("a", 10)], 2);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].index, 1); // 0.9
        assert_eq!(results[1].index, 3); // 0.6
    }
}
