//! Catalog index: the immutable per-item table and its normalized-title index.
//!
//! Everything else in the engine works in "index position" coordinates, so the
//! catalog is the only place that maps between free-form titles, stable ids and
//! matrix rows. The metadata table may contain duplicate titles (multiple
//! printings of the same book); lookups always collapse to the first matching
//! row so callers never see duplicates.

use crate::resolve::normalize_title;
use crate::{Error, Result};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Stable identifier for a catalog item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    /// Book identifier (ISBN-10/13, kept verbatim)
    Isbn(String),
    /// Movie identifier
    Id(u64),
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemId::Isbn(s) => write!(f, "{}", s),
            ItemId::Id(i) => write!(f, "{}", i),
        }
    }
}

/// Domain-specific metadata attached to a catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemDetails {
    Book {
        author: String,
        publisher: String,
        year: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
    },
    Movie {
        overview: String,
        genres: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        cast: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        crew: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        homepage: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        popularity: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        vote_average: Option<f64>,
    },
}

/// A single catalog entry. Loaded once at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub title: String,
    #[serde(flatten)]
    pub details: ItemDetails,
}

impl CatalogItem {
    pub fn new(id: ItemId, title: impl Into<String>, details: ItemDetails) -> Self {
        Self {
            id,
            title: title.into(),
            details,
        }
    }
}

/// Immutable catalog table plus the title index aligned with matrix rows.
///
/// The metadata table and the matrix index are distinct: the table may hold
/// several rows per title, while the index has exactly one entry per matrix
/// row. `position` and `metadata` bridge the two coordinate spaces.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    entries: Vec<CatalogItem>,
    index_titles: Vec<String>,
    normalized: Vec<String>,
    by_normalized: AHashMap<String, usize>,
    entry_by_title: AHashMap<String, usize>,
    entry_by_id: AHashMap<ItemId, usize>,
}

impl CatalogIndex {
    /// Build a catalog whose matrix index is supplied separately from the
    /// metadata table (book catalogs: the pivot-table index is a deduplicated
    /// subset of the full table).
    pub fn new(entries: Vec<CatalogItem>, index_titles: Vec<String>) -> Self {
        let normalized: Vec<String> = index_titles.iter().map(|t| normalize_title(t)).collect();

        let mut by_normalized = AHashMap::with_capacity(normalized.len());
        for (pos, title) in normalized.iter().enumerate() {
            by_normalized.entry(title.clone()).or_insert(pos);
        }

        let mut entry_by_title = AHashMap::with_capacity(entries.len());
        let mut entry_by_id = AHashMap::with_capacity(entries.len());
        for (pos, entry) in entries.iter().enumerate() {
            entry_by_title
                .entry(normalize_title(&entry.title))
                .or_insert(pos);
            entry_by_id.entry(entry.id.clone()).or_insert(pos);
        }

        Self {
            entries,
            index_titles,
            normalized,
            by_normalized,
            entry_by_title,
            entry_by_id,
        }
    }

    /// Build a catalog whose matrix rows are aligned 1:1 with the metadata
    /// table (movie catalogs).
    pub fn from_entries(entries: Vec<CatalogItem>) -> Self {
        let index_titles = entries.iter().map(|e| e.title.clone()).collect();
        Self::new(entries, index_titles)
    }

    /// Number of matrix coordinates (rows of the similarity matrix)
    pub fn len(&self) -> usize {
        self.index_titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_titles.is_empty()
    }

    /// Display-cased title at a matrix position
    pub fn display_title(&self, index: usize) -> Option<&str> {
        self.index_titles.get(index).map(String::as_str)
    }

    /// Normalized titles, index-aligned with the similarity matrix
    pub fn normalized_titles(&self) -> &[String] {
        &self.normalized
    }

    /// Exact normalized-title lookup into matrix coordinates.
    ///
    /// The caller is expected to have normalized the title already; this is
    /// the tier-1 lookup the resolver and the aggregator share.
    pub fn position(&self, normalized_title: &str) -> Option<usize> {
        self.by_normalized.get(normalized_title).copied()
    }

    /// Catalog entry backing a matrix row, first matching row when titles are
    /// duplicated. `None` when the index title has no metadata row at all.
    pub fn metadata(&self, index: usize) -> Option<&CatalogItem> {
        let normalized = self.normalized.get(index)?;
        self.entry_by_title
            .get(normalized)
            .map(|&pos| &self.entries[pos])
    }

    /// Look up an entry by stable id
    pub fn find_by_id(&self, id: &ItemId) -> Result<&CatalogItem> {
        self.entry_by_id
            .get(id)
            .map(|&pos| &self.entries[pos])
            .ok_or_else(|| Error::ItemNotFound(id.to_string()))
    }

    /// Look up an entry by exact title (case/whitespace/quote-insensitive)
    pub fn find_by_title(&self, title: &str) -> Result<&CatalogItem> {
        let normalized = normalize_title(title);
        self.entry_by_title
            .get(&normalized)
            .map(|&pos| &self.entries[pos])
            .ok_or_else(|| Error::TitleNotFound(title.to_string()))
    }

    /// The full metadata table, duplicates included
    pub fn entries(&self) -> &[CatalogItem] {
        &self.entries
    }
}
