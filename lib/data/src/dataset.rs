//! Dataset file layout, row records and load/write helpers.
//!
//! A book dataset directory contains `books.json` (full metadata table,
//! duplicates included), `book_index.json` (matrix-aligned display titles),
//! `similarity.bin` and optionally `popular_books.json`. A movie dataset
//! contains `movies.json` (matrix rows align 1:1 with the table),
//! `similarity.bin` and optionally `features.bin` + `vocabulary.json`.

use crate::{DatasetError, Result};
use kindred_core::{
    CatalogIndex, CatalogItem, FeatureMatrix, ItemDetails, ItemId, PopularityEntry,
    RecommendEngine, SimilarityMatrix, BOOK_TOP_K, MOVIE_TOP_K,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub const BOOKS_FILE: &str = "books.json";
pub const BOOK_INDEX_FILE: &str = "book_index.json";
pub const MOVIES_FILE: &str = "movies.json";
pub const SIMILARITY_FILE: &str = "similarity.bin";
pub const FEATURES_FILE: &str = "features.bin";
pub const VOCABULARY_FILE: &str = "vocabulary.json";
pub const POPULAR_FILE: &str = "popular_books.json";

/// One row of the book metadata table, with the upstream export's column names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRow {
    #[serde(rename = "ISBN")]
    pub isbn: String,
    #[serde(rename = "Book-Title")]
    pub title: String,
    #[serde(rename = "Book-Author")]
    pub author: String,
    #[serde(rename = "Year-Of-Publication")]
    pub year: String,
    #[serde(rename = "Publisher")]
    pub publisher: String,
    #[serde(rename = "Image-URL-L")]
    pub image_url: Option<String>,
}

impl From<BookRow> for CatalogItem {
    fn from(row: BookRow) -> Self {
        CatalogItem::new(
            ItemId::Isbn(row.isbn),
            row.title,
            ItemDetails::Book {
                author: row.author,
                publisher: row.publisher,
                year: row.year,
                image_url: row.image_url,
            },
        )
    }
}

/// One row of the movie metadata table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRow {
    pub movie_id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default)]
    pub crew: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl From<MovieRow> for CatalogItem {
    fn from(row: MovieRow) -> Self {
        CatalogItem::new(
            ItemId::Id(row.movie_id),
            row.title,
            ItemDetails::Movie {
                overview: row.overview,
                genres: row.genres,
                cast: row.cast,
                crew: row.crew,
                homepage: row.homepage,
                image: row.image,
                popularity: row.popularity,
                vote_average: row.vote_average,
            },
        )
    }
}

/// One row of the precomputed popular-books table, already sorted upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularRow {
    pub title: String,
    pub num_rating: u32,
    pub avg_rating: f64,
}

impl From<PopularRow> for PopularityEntry {
    fn from(row: PopularRow) -> Self {
        PopularityEntry {
            title: row.title,
            num_ratings: row.num_rating,
            avg_rating: row.avg_rating,
        }
    }
}

/// A complete book dataset as it sits on disk.
#[derive(Debug, Clone)]
pub struct BookDataset {
    pub books: Vec<BookRow>,
    pub index_titles: Vec<String>,
    pub similarity: SimilarityMatrix,
    pub popular: Option<Vec<PopularRow>>,
}

impl BookDataset {
    pub fn load(dir: &Path) -> Result<Self> {
        let books: Vec<BookRow> = read_json(&dir.join(BOOKS_FILE))?;
        let index_titles: Vec<String> = read_json(&dir.join(BOOK_INDEX_FILE))?;
        let similarity: SimilarityMatrix = read_matrix(&dir.join(SIMILARITY_FILE))?;
        let popular_path = dir.join(POPULAR_FILE);
        let popular = if popular_path.exists() {
            Some(read_json(&popular_path)?)
        } else {
            None
        };

        Ok(Self {
            books,
            index_titles,
            similarity,
            popular,
        })
    }

    pub fn write(&self, dir: &Path) -> Result<()> {
        write_json(&dir.join(BOOKS_FILE), &self.books)?;
        write_json(&dir.join(BOOK_INDEX_FILE), &self.index_titles)?;
        write_matrix(&dir.join(SIMILARITY_FILE), &self.similarity)?;
        if let Some(popular) = &self.popular {
            write_json(&dir.join(POPULAR_FILE), popular)?;
        }
        Ok(())
    }

    /// Validate alignment and construct the engine.
    pub fn into_engine(self) -> Result<RecommendEngine> {
        let entries = self.books.into_iter().map(CatalogItem::from).collect();
        let catalog = CatalogIndex::new(entries, self.index_titles);
        let mut engine =
            RecommendEngine::new(catalog, self.similarity)?.with_top_k(BOOK_TOP_K);
        if let Some(popular) = self.popular {
            engine =
                engine.with_popularity(popular.into_iter().map(PopularityEntry::from).collect());
        }
        Ok(engine)
    }
}

/// A complete movie dataset as it sits on disk.
#[derive(Debug, Clone)]
pub struct MovieDataset {
    pub movies: Vec<MovieRow>,
    pub similarity: SimilarityMatrix,
    pub features: Option<FeatureMatrix>,
}

impl MovieDataset {
    pub fn load(dir: &Path) -> Result<Self> {
        let movies: Vec<MovieRow> = read_json(&dir.join(MOVIES_FILE))?;
        let similarity: SimilarityMatrix = read_matrix(&dir.join(SIMILARITY_FILE))?;
        let features_path = dir.join(FEATURES_FILE);
        let features = if features_path.exists() {
            Some(read_matrix(&features_path)?)
        } else {
            None
        };

        Ok(Self {
            movies,
            similarity,
            features,
        })
    }

    pub fn write(&self, dir: &Path) -> Result<()> {
        write_json(&dir.join(MOVIES_FILE), &self.movies)?;
        write_matrix(&dir.join(SIMILARITY_FILE), &self.similarity)?;
        if let Some(features) = &self.features {
            write_matrix(&dir.join(FEATURES_FILE), features)?;
            write_json(&dir.join(VOCABULARY_FILE), features.vocabulary())?;
        }
        Ok(())
    }

    /// Validate alignment and construct the engine.
    pub fn into_engine(self) -> Result<RecommendEngine> {
        let entries = self.movies.into_iter().map(CatalogItem::from).collect();
        let catalog = CatalogIndex::from_entries(entries);
        let mut engine =
            RecommendEngine::new(catalog, self.similarity)?.with_top_k(MOVIE_TOP_K);
        if let Some(features) = self.features {
            engine = engine.with_features(features)?;
        }
        Ok(engine)
    }
}

/// Load a book dataset directory into a ready engine.
pub fn load_books(dir: &Path) -> Result<RecommendEngine> {
    BookDataset::load(dir)?.into_engine()
}

/// Load a movie dataset directory into a ready engine.
pub fn load_movies(dir: &Path) -> Result<RecommendEngine> {
    MovieDataset::load(dir)?.into_engine()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(DatasetError::MissingFile(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer(BufWriter::new(file), value).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_matrix<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(DatasetError::MissingFile(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    bincode::deserialize_from(BufReader::new(file)).map_err(|source| DatasetError::Matrix {
        path: path.to_path_buf(),
        source,
    })
}

fn write_matrix<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    bincode::serialize_into(BufWriter::new(file), value).map_err(|source| DatasetError::Matrix {
        path: path.to_path_buf(),
        source,
    })
}
