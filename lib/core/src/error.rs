use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No catalog entry matches title: {0}")]
    TitleNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Similarity matrix is not square: {rows} rows, {cols} columns")]
    NonSquareMatrix { rows: usize, cols: usize },

    #[error("Similarity matrix has {matrix_dim} rows but title index has {index_len} entries")]
    IndexMisaligned { matrix_dim: usize, index_len: usize },

    #[error("Feature matrix has {matrix_rows} rows but catalog index has {index_len} entries")]
    FeatureRowsMisaligned { matrix_rows: usize, index_len: usize },

    #[error("Feature row {row} has {row_len} weights but vocabulary has {vocab_len} terms")]
    VocabularyMisaligned {
        row: usize,
        row_len: usize,
        vocab_len: usize,
    },

    #[error("No feature matrix loaded for this catalog")]
    FeaturesUnavailable,
}
