//! # kindred Core
//!
//! Core library for the kindred recommendation engine.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`CatalogIndex`] - Immutable item table with a normalized-title index
//! - [`SimilarityMatrix`] / [`FeatureMatrix`] - Precomputed static inputs
//! - [`resolve`] - Tiered exact/substring/fuzzy title resolution
//! - [`rank`] - Similarity-ranked top-K selection
//! - [`explain`] - TF-IDF feature-overlap explanations
//! - [`PreferenceAggregator`] - Weighted aggregation over a rating history
//! - [`RecommendEngine`] - Read-only facade tying it all together
//!
//! ## Example
//!
//! ```rust
//! use kindred_core::{
//!     CatalogIndex, CatalogItem, ItemDetails, ItemId, RecommendEngine, SimilarityMatrix,
//! };
//!
//! let catalog = CatalogIndex::from_entries(vec![
//!     CatalogItem::new(ItemId::Id(1), "The Hobbit", ItemDetails::Movie {
//!         overview: "A hobbit leaves home".to_string(),
//!         genres: vec!["Fantasy".to_string()],
//!         cast: None, crew: None, homepage: None, image: None,
//!         popularity: None, vote_average: None,
//!     }),
//!     CatalogItem::new(ItemId::Id(2), "The Lord of the Rings", ItemDetails::Movie {
//!         overview: "A hobbit leaves home again".to_string(),
//!         genres: vec!["Fantasy".to_string()],
//!         cast: None, crew: None, homepage: None, image: None,
//!         popularity: None, vote_average: None,
//!     }),
//! ]);
//! let similarity = SimilarityMatrix::from_rows(vec![
//!     vec![1.0, 0.8],
//!     vec![0.8, 1.0],
//! ]).unwrap();
//!
//! let engine = RecommendEngine::new(catalog, similarity).unwrap();
//! let related = engine.related("the hobbit").unwrap();
//! assert_eq!(related.recommendations[0].item.title, "The Lord of the Rings");
//! ```
//!
//! The engine holds no mutable state after construction: every operation is a
//! bounded, synchronous computation over immutable in-memory arrays, safe to
//! share across concurrent callers without locks.

pub mod aggregate;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod explain;
pub mod matrix;
pub mod rank;
pub mod resolve;

pub use aggregate::{
    exponential_weight, PreferenceAggregator, Provenance, Recommendation, UserRating,
    PROVENANCE_DISPLAY, SOURCE_FAN_OUT,
};
pub use catalog::{CatalogIndex, CatalogItem, ItemDetails, ItemId};
pub use engine::{
    PersonalizedRecommendations, PopularItem, PopularityEntry, ProvenanceDisplay, RankedItem,
    RecommendEngine, RecommendedItem, RelatedItems, SharedFeatures,
};
pub use error::{Error, Result};
pub use explain::{FeatureProfile, FeatureWeight, SharedFeature};
pub use matrix::{FeatureMatrix, SimilarityMatrix};
pub use rank::{format_percent, top_similar, BOOK_TOP_K, MOVIE_TOP_K};
pub use resolve::{normalize_title, similarity_ratio, FUZZY_CUTOFF};
