//! Read-only facade over one catalog's loaded data.
//!
//! A [`RecommendEngine`] is constructed once at process start from the static
//! inputs and then shared freely across callers: it owns only immutable data,
//! takes no locks and performs no I/O. Construction is where coordinate-space
//! alignment is enforced — a misaligned matrix refuses to become an engine.

use crate::aggregate::{PreferenceAggregator, UserRating, PROVENANCE_DISPLAY};
use crate::catalog::{CatalogIndex, CatalogItem, ItemDetails, ItemId};
use crate::explain::{self, FeatureProfile, SharedFeature};
use crate::matrix::{FeatureMatrix, SimilarityMatrix};
use crate::rank::{format_percent, top_similar, MOVIE_TOP_K};
use crate::resolve;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Precomputed popularity entry (book catalogs ship these as a separate table)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularityEntry {
    pub title: String,
    pub num_ratings: u32,
    pub avg_rating: f64,
}

/// A related item decorated with catalog metadata and its similarity
#[derive(Debug, Clone, Serialize)]
pub struct RankedItem {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub similarity: f32,
    pub similarity_percent: String,
}

/// Result of resolving a title and ranking its neighbours
#[derive(Debug, Clone, Serialize)]
pub struct RelatedItems {
    pub resolved_title: String,
    pub recommendations: Vec<RankedItem>,
}

/// Shared-feature explanation for a pair of resolved titles
#[derive(Debug, Clone, Serialize)]
pub struct SharedFeatures {
    pub title_a: String,
    pub title_b: String,
    pub common: Vec<SharedFeature>,
}

/// Display form of one provenance record
#[derive(Debug, Clone, Serialize)]
pub struct ProvenanceDisplay {
    pub title: String,
    pub your_rating: String,
    pub similarity: String,
    pub contribution: String,
}

/// One personalized recommendation with provenance
#[derive(Debug, Clone, Serialize)]
pub struct RecommendedItem {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub score: f64,
    pub recommendation_score: String,
    pub similar_to: Vec<ProvenanceDisplay>,
}

/// Result of aggregating a rating history
#[derive(Debug, Clone, Serialize)]
pub struct PersonalizedRecommendations {
    pub based_on: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub recommendations: Vec<RecommendedItem>,
}

/// A popular item decorated with catalog metadata
#[derive(Debug, Clone, Serialize)]
pub struct PopularItem {
    #[serde(flatten)]
    pub item: CatalogItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_ratings: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
}

/// The recommendation resolution engine for one catalog.
pub struct RecommendEngine {
    catalog: CatalogIndex,
    similarity: SimilarityMatrix,
    features: Option<FeatureMatrix>,
    popularity: Option<Vec<PopularityEntry>>,
    top_k: usize,
}

impl RecommendEngine {
    /// Build an engine, refusing misaligned inputs.
    pub fn new(catalog: CatalogIndex, similarity: SimilarityMatrix) -> Result<Self> {
        if similarity.dim() != catalog.len() {
            return Err(Error::IndexMisaligned {
                matrix_dim: similarity.dim(),
                index_len: catalog.len(),
            });
        }
        Ok(Self {
            catalog,
            similarity,
            features: None,
            popularity: None,
            top_k: MOVIE_TOP_K,
        })
    }

    /// Attach a feature matrix (movie catalogs), refusing misaligned rows.
    pub fn with_features(mut self, features: FeatureMatrix) -> Result<Self> {
        if features.rows() != self.catalog.len() {
            return Err(Error::FeatureRowsMisaligned {
                matrix_rows: features.rows(),
                index_len: self.catalog.len(),
            });
        }
        self.features = Some(features);
        Ok(self)
    }

    /// Attach a precomputed popularity table (book catalogs), already sorted.
    pub fn with_popularity(mut self, popularity: Vec<PopularityEntry>) -> Self {
        self.popularity = Some(popularity);
        self
    }

    /// Set how many related items `related` surfaces.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    /// Resolve a free-text title and rank its most similar neighbours.
    pub fn related(&self, raw_title: &str) -> Result<RelatedItems> {
        let index = resolve::resolve(&self.catalog, raw_title)?;
        let resolved_title = self
            .catalog
            .display_title(index)
            .unwrap_or_default()
            .to_string();

        let recommendations = top_similar(&self.similarity, index, self.top_k)
            .into_iter()
            .filter_map(|(candidate, similarity)| {
                // Candidates without a metadata row are dropped, matching the
                // upstream table join.
                self.catalog.metadata(candidate).map(|item| RankedItem {
                    item: item.clone(),
                    similarity,
                    similarity_percent: format_percent(f64::from(similarity)),
                })
            })
            .collect();

        Ok(RelatedItems {
            resolved_title,
            recommendations,
        })
    }

    /// Metadata for a stable id.
    pub fn describe(&self, id: &ItemId) -> Result<CatalogItem> {
        self.catalog.find_by_id(id).cloned()
    }

    /// Metadata for a free-text title, resolved through all tiers.
    pub fn describe_title(&self, raw_title: &str) -> Result<CatalogItem> {
        let index = resolve::resolve(&self.catalog, raw_title)?;
        self.catalog
            .metadata(index)
            .cloned()
            .ok_or_else(|| Error::TitleNotFound(raw_title.to_string()))
    }

    /// Top contributing features of a resolved title (movies only).
    pub fn explain(&self, raw_title: &str, top_features: usize) -> Result<FeatureProfile> {
        let features = self.features.as_ref().ok_or(Error::FeaturesUnavailable)?;
        let index = resolve::resolve(&self.catalog, raw_title)?;
        Ok(explain::feature_profile(features, index, top_features))
    }

    /// Shared contributing features of two resolved titles (movies only).
    pub fn explain_pair(
        &self,
        raw_title_a: &str,
        raw_title_b: &str,
        top_features: usize,
    ) -> Result<SharedFeatures> {
        let features = self.features.as_ref().ok_or(Error::FeaturesUnavailable)?;
        let index_a = resolve::resolve(&self.catalog, raw_title_a)?;
        let index_b = resolve::resolve(&self.catalog, raw_title_b)?;

        Ok(SharedFeatures {
            title_a: self
                .catalog
                .display_title(index_a)
                .unwrap_or_default()
                .to_string(),
            title_b: self
                .catalog
                .display_title(index_b)
                .unwrap_or_default()
                .to_string(),
            common: explain::common_features(features, index_a, index_b, top_features),
        })
    }

    /// Aggregate a full rating history into one ranked recommendation list.
    ///
    /// An empty history is a normal new-user state: empty list, explanatory
    /// message, never an error.
    pub fn recommend_for_user(
        &self,
        ratings: &[UserRating],
        limit: usize,
    ) -> PersonalizedRecommendations {
        if ratings.is_empty() {
            return PersonalizedRecommendations {
                based_on: 0,
                message: Some(
                    "No ratings found for this user. Please rate some items first.".to_string(),
                ),
                recommendations: Vec::new(),
            };
        }

        let aggregator = PreferenceAggregator::new(&self.catalog, &self.similarity);
        let recommendations = aggregator
            .recommend(ratings, limit)
            .into_iter()
            .filter_map(|rec| {
                let item = self.catalog.metadata(rec.index)?.clone();
                let similar_to = rec
                    .sources
                    .iter()
                    .take(PROVENANCE_DISPLAY)
                    .map(|p| ProvenanceDisplay {
                        title: p.source_title.clone(),
                        your_rating: format!("{}/10", p.user_rating),
                        similarity: format_percent(f64::from(p.similarity)),
                        contribution: format_percent(p.weighted_contribution),
                    })
                    .collect();
                Some(RecommendedItem {
                    item,
                    score: rec.score,
                    recommendation_score: format_percent(rec.score),
                    similar_to,
                })
            })
            .collect();

        PersonalizedRecommendations {
            based_on: ratings.len(),
            message: None,
            recommendations,
        }
    }

    /// Most popular items, deduplicated by title.
    ///
    /// Book catalogs carry a precomputed popularity table; movie catalogs are
    /// sorted by the popularity metadata field.
    pub fn popular(&self, limit: usize) -> Vec<PopularItem> {
        if let Some(table) = &self.popularity {
            return table
                .iter()
                .take(limit)
                .filter_map(|entry| {
                    let item = self.catalog.find_by_title(&entry.title).ok()?.clone();
                    Some(PopularItem {
                        item,
                        num_ratings: Some(entry.num_ratings),
                        avg_rating: Some(entry.avg_rating),
                    })
                })
                .collect();
        }

        let mut seen = ahash::AHashSet::new();
        let mut items: Vec<&CatalogItem> = self
            .catalog
            .entries()
            .iter()
            .filter(|e| seen.insert(resolve::normalize_title(&e.title)))
            .collect();
        items.sort_by(|a, b| {
            let pop = |item: &CatalogItem| match &item.details {
                ItemDetails::Movie { popularity, .. } => popularity.unwrap_or(0.0),
                ItemDetails::Book { .. } => 0.0,
            };
            pop(b).partial_cmp(&pop(a)).unwrap_or(std::cmp::Ordering::Equal)
        });

        items
            .into_iter()
            .take(limit)
            .map(|item| PopularItem {
                item: item.clone(),
                num_ratings: None,
                avg_rating: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64, title: &str, popularity: f64) -> CatalogItem {
        CatalogItem::new(
            ItemId::Id(id),
            title,
            ItemDetails::Movie {
                overview: format!("{title} overview"),
                genres: vec!["Drama".to_string()],
                cast: None,
                crew: None,
                homepage: None,
                image: None,
                popularity: Some(popularity),
                vote_average: None,
            },
        )
    }

    fn engine() -> RecommendEngine {
        let catalog = CatalogIndex::from_entries(vec![
            movie(1, "The Hobbit", 20.0),
            movie(2, "The Lord of the Rings", 50.0),
            movie(3, "Dune", 80.0),
        ]);
        let similarity = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.8, 0.1],
            vec![0.8, 1.0, 0.2],
            vec![0.1, 0.2, 1.0],
        ])
        .unwrap();
        RecommendEngine::new(catalog, similarity).unwrap()
    }

    #[test]
    fn test_misaligned_matrix_refused() {
        let catalog = CatalogIndex::from_entries(vec![movie(1, "Dune", 1.0)]);
        let similarity =
            SimilarityMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();

        let err = RecommendEngine::new(catalog, similarity);
        assert!(matches!(
            err,
            Err(Error::IndexMisaligned {
                matrix_dim: 2,
                index_len: 1
            })
        ));
    }

    #[test]
    fn test_related_resolves_and_ranks() {
        let result = engine().related("  the hobbit ").unwrap();

        assert_eq!(result.resolved_title, "The Hobbit");
        assert_eq!(result.recommendations.len(), 2);
        assert_eq!(result.recommendations[0].item.title, "The Lord of the Rings");
        assert_eq!(result.recommendations[0].similarity_percent, "80.00%");
    }

    #[test]
    fn test_related_unknown_title() {
        assert!(matches!(
            engine().related("qqqqzzzz"),
            Err(Error::TitleNotFound(_))
        ));
    }

    #[test]
    fn test_describe_by_id() {
        let item = engine().describe(&ItemId::Id(3)).unwrap();
        assert_eq!(item.title, "Dune");
    }

    #[test]
    fn test_explain_unavailable_without_features() {
        assert!(matches!(
            engine().explain("dune", 5),
            Err(Error::FeaturesUnavailable)
        ));
    }

    #[test]
    fn test_explain_with_features() {
        let vocab = vec!["ring".to_string(), "desert".to_string()];
        let features = FeatureMatrix::from_rows(
            vec![
                vec![0.7, 0.0],
                vec![0.9, 0.0],
                vec![0.0, 0.8],
            ],
            vocab,
        )
        .unwrap();
        let engine = engine().with_features(features).unwrap();

        let profile = engine.explain("dune", 5).unwrap();
        assert_eq!(profile.total_nonzero, 1);
        assert_eq!(profile.features[0].term, "desert");

        let pair = engine.explain_pair("the hobbit", "lord of the rings", 5).unwrap();
        assert_eq!(pair.common.len(), 1);
        assert_eq!(pair.common[0].term, "ring");
        assert!((pair.common[0].contribution - 0.63).abs() < 1e-6);
    }

    #[test]
    fn test_empty_history_message() {
        let result = engine().recommend_for_user(&[], 10);
        assert_eq!(result.based_on, 0);
        assert!(result.recommendations.is_empty());
        assert!(result.message.is_some());
    }

    #[test]
    fn test_recommend_for_user_decorates_and_formats() {
        let ratings = vec![UserRating {
            title: "The Hobbit".to_string(),
            rating: 9,
        }];
        let result = engine().recommend_for_user(&ratings, 10);

        assert_eq!(result.based_on, 1);
        let top = &result.recommendations[0];
        assert_eq!(top.item.title, "The Lord of the Rings");
        // 0.8 similarity * 0.81 weight
        assert_eq!(top.recommendation_score, "64.80%");
        assert_eq!(top.similar_to[0].your_rating, "9/10");
        assert_eq!(top.similar_to[0].similarity, "80.00%");
        assert_eq!(top.similar_to[0].contribution, "64.80%");
    }

    #[test]
    fn test_popular_by_metadata() {
        let popular = engine().popular(2);
        assert_eq!(popular.len(), 2);
        assert_eq!(popular[0].item.title, "Dune");
        assert_eq!(popular[1].item.title, "The Lord of the Rings");
    }

    #[test]
    fn test_popular_from_table() {
        let engine = engine().with_popularity(vec![PopularityEntry {
            title: "The Hobbit".to_string(),
            num_ratings: 120,
            avg_rating: 8.7,
        }]);

        let popular = engine.popular(5);
        assert_eq!(popular.len(), 1);
        assert_eq!(popular[0].num_ratings, Some(120));
    }
}
