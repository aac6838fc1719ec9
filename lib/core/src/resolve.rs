//! Free-text title resolution.
//!
//! Maps a raw query (possibly misspelled, differently cased or partial) to a
//! matrix index position using a tiered strategy:
//!
//! 1. exact normalized match — O(1) map lookup
//! 2. substring match — first index-order entry containing the query
//! 3. fuzzy match — best sequence-ratio candidate at or above [`FUZZY_CUTOFF`]
//!
//! The first two tiers handle the overwhelming majority of real queries
//! (trailing punctuation, partial titles); the fuzzy tier is the expensive
//! fallback reserved for misspellings. Substring resolution deliberately takes
//! the first positional match, not the best-scoring one.

use crate::catalog::CatalogIndex;
use crate::{Error, Result};
use ahash::AHashMap;

/// Minimum sequence ratio for the fuzzy tier to accept a candidate
pub const FUZZY_CUTOFF: f64 = 0.6;

/// Normalize a title for index lookup: strip surrounding whitespace and
/// enclosing quote characters, then lowercase.
pub fn normalize_title(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_lowercase()
}

/// Resolve a free-text query to a matrix index position.
pub fn resolve(catalog: &CatalogIndex, raw: &str) -> Result<usize> {
    let query = normalize_title(raw);
    if query.is_empty() {
        return Err(Error::TitleNotFound(raw.to_string()));
    }

    if let Some(pos) = catalog.position(&query) {
        return Ok(pos);
    }

    if let Some(pos) = catalog
        .normalized_titles()
        .iter()
        .position(|title| title.contains(&query))
    {
        return Ok(pos);
    }

    let mut best: Option<(usize, f64)> = None;
    for (pos, title) in catalog.normalized_titles().iter().enumerate() {
        let ratio = similarity_ratio(&query, title);
        if ratio >= FUZZY_CUTOFF && best.map_or(true, |(_, b)| ratio > b) {
            best = Some((pos, ratio));
        }
    }

    best.map(|(pos, _)| pos)
        .ok_or_else(|| Error::TitleNotFound(raw.to_string()))
}

/// Sequence similarity ratio in `[0, 1]`: `2·M / (len(a) + len(b))` where `M`
/// is the total length of the longest matching blocks shared by both strings.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    let matches = matching_chars(&a, &b);
    2.0 * matches as f64 / (a.len() + b.len()) as f64
}

/// Total length of matching blocks: repeatedly take the longest common
/// substring and recurse into the unmatched regions on either side.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size > 0 {
            total += size;
            pending.push((alo, i, blo, j));
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    total
}

/// Longest common substring of `a[alo..ahi]` and `b[blo..bhi]`, earliest
/// starting position winning ties.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best_i = alo;
    let mut best_j = blo;
    let mut best_size = 0;

    // j2len[j] = length of the match ending at a[i], b[j]
    let mut j2len: AHashMap<usize, usize> = AHashMap::new();
    for i in alo..ahi {
        let mut next: AHashMap<usize, usize> = AHashMap::new();
        for j in blo..bhi {
            if a[i] == b[j] {
                let len = match j.checked_sub(1) {
                    Some(prev) => j2len.get(&prev).copied().unwrap_or(0) + 1,
                    None => 1,
                };
                next.insert(j, len);
                if len > best_size {
                    best_i = i + 1 - len;
                    best_j = j + 1 - len;
                    best_size = len;
                }
            }
        }
        j2len = next;
    }

    (best_i, best_j, best_size)
}
