//! # kindred
//!
//! A recommendation resolution engine for book and movie catalogs.
//!
//! kindred resolves free-text titles (misspelled, differently cased or
//! partial) against a precomputed item×item similarity matrix, ranks related
//! items, explains movie similarity through shared TF-IDF features, and
//! aggregates a user's full rating history into one personalized list with
//! provenance.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! kindred --data-dir ./data --catalog books related "the hobit"
//! kindred --data-dir ./data --catalog books recommend ratings.json --limit 10
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use kindred::prelude::*;
//!
//! let engine = kindred::load_books("./data/books".as_ref()).unwrap();
//!
//! // Fuzzy resolution + similarity ranking
//! let related = engine.related("the hobit").unwrap();
//!
//! // Personalized aggregation over a rating history
//! let ratings = vec![UserRating { title: "The Hobbit".into(), rating: 9 }];
//! let personalized = engine.recommend_for_user(&ratings, 10);
//! ```
//!
//! ## Crate Structure
//!
//! kindred is composed of several crates:
//!
//! - [`kindred-core`](https://docs.rs/kindred-core) - Catalog index, title
//!   resolution, similarity ranking, feature explanations, preference
//!   aggregation
//! - [`kindred-data`](https://docs.rs/kindred-data) - Dataset loading and
//!   load-time integrity validation
//!
//! ## Features
//!
//! - **Tiered Resolution**: exact, substring and fuzzy title matching
//! - **Similarity Ranking**: stable top-K over precomputed matrices
//! - **Explainability**: shared TF-IDF feature contributions per movie pair
//! - **Preference Aggregation**: exponential rating weighting with provenance
//! - **Read-only Engine**: no locks, safe to share across concurrent callers

// Re-export core types
pub use kindred_core::{
    exponential_weight, format_percent, normalize_title, similarity_ratio, top_similar,
    CatalogIndex, CatalogItem, Error, FeatureMatrix, FeatureProfile, FeatureWeight, ItemDetails,
    ItemId, PersonalizedRecommendations, PopularItem, PopularityEntry, PreferenceAggregator,
    Provenance, ProvenanceDisplay, RankedItem, Recommendation, RecommendEngine, RecommendedItem,
    RelatedItems, Result, SharedFeature, SharedFeatures, SimilarityMatrix, UserRating,
    BOOK_TOP_K, FUZZY_CUTOFF, MOVIE_TOP_K, PROVENANCE_DISPLAY, SOURCE_FAN_OUT,
};

// Re-export dataset loading
pub use kindred_data::{
    load_books, load_movies, BookDataset, BookRow, DatasetError, MovieDataset, MovieRow,
    PopularRow,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CatalogIndex, CatalogItem, Error, FeatureMatrix, ItemDetails, ItemId,
        PersonalizedRecommendations, PreferenceAggregator, RecommendEngine, RelatedItems, Result,
        SimilarityMatrix, UserRating,
    };
    pub use crate::{load_books, load_movies, DatasetError};
}
