//! Dense matrix inputs: the item×item similarity matrix and the item×term
//! feature matrix.
//!
//! Both are static, loaded once and read-only. Dimension checks happen at
//! construction so a misaligned coordinate space can never reach a query.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Square, row-major item×item similarity matrix with scores in `[0, 1]`.
///
/// Cell `[i][j]` is the precomputed similarity between the catalog items at
/// index positions `i` and `j`. The matrix is symmetric in intent, though not
/// necessarily bit-exact, so rows are always read from the query side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    dim: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    /// Build from nested rows, rejecting non-square input.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dim = rows.len();
        let mut data = Vec::with_capacity(dim * dim);
        for row in &rows {
            if row.len() != dim {
                return Err(Error::NonSquareMatrix {
                    rows: dim,
                    cols: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { dim, data })
    }

    /// Number of rows (== columns == catalog index length)
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Full similarity row for an index position
    pub fn row(&self, index: usize) -> &[f32] {
        let start = index * self.dim;
        &self.data[start..start + self.dim]
    }

    /// Single cell access
    pub fn score(&self, i: usize, j: usize) -> f32 {
        self.data[i * self.dim + j]
    }
}

/// Item×term weight matrix (TF-IDF-like) with a column-aligned vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureMatrix {
    rows: usize,
    vocabulary: Vec<String>,
    data: Vec<f32>,
}

impl FeatureMatrix {
    /// Build from nested rows and a vocabulary, rejecting rows whose width
    /// disagrees with the vocabulary.
    pub fn from_rows(rows: Vec<Vec<f32>>, vocabulary: Vec<String>) -> Result<Self> {
        let width = vocabulary.len();
        let mut data = Vec::with_capacity(rows.len() * width);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(Error::VocabularyMisaligned {
                    row: i,
                    row_len: row.len(),
                    vocab_len: width,
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            vocabulary,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Feature weights for an item, column-aligned with the vocabulary
    pub fn row(&self, index: usize) -> &[f32] {
        let width = self.vocabulary.len();
        let start = index * width;
        &self.data[start..start + width]
    }

    /// Feature name for a column
    pub fn term(&self, column: usize) -> &str {
        &self.vocabulary[column]
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }
}
