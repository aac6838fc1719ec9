//! # kindred Data
//!
//! Dataset loading for the kindred recommendation engine.
//!
//! The engine consumes static precomputed inputs: catalog tables, an
//! item×item similarity matrix and (for movies) an item×term feature matrix.
//! This crate reads them from a dataset directory, validates that every input
//! agrees on the coordinate space, and hands back a ready
//! [`kindred_core::RecommendEngine`]. A dimension mismatch is fatal at load
//! time: the engine must refuse to initialize rather than serve results
//! against misaligned coordinates.
//!
//! Catalog tables are JSON (with the column names of the upstream data
//! export), matrices are bincode.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kindred_data::load_books;
//!
//! let engine = load_books("./data/books".as_ref()).unwrap();
//! let related = engine.related("the hobbit").unwrap();
//! ```

pub mod dataset;

pub use dataset::{
    load_books, load_movies, BookDataset, BookRow, MovieDataset, MovieRow, PopularRow,
    BOOKS_FILE, BOOK_INDEX_FILE, FEATURES_FILE, MOVIES_FILE, POPULAR_FILE, SIMILARITY_FILE,
    VOCABULARY_FILE,
};

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Missing dataset file: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid matrix file {path}: {source}")]
    Matrix {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error(transparent)]
    Integrity(#[from] kindred_core::Error),
}
