//! Similarity-ranked top-K selection over matrix rows.

use crate::matrix::SimilarityMatrix;

/// Related items surfaced for a book catalog
pub const BOOK_TOP_K: usize = 5;
/// Related items surfaced for a movie catalog
pub const MOVIE_TOP_K: usize = 10;

/// Top `k` most similar items to `index`, self excluded.
///
/// The full row is sorted descending by score with a stable sort, so ties keep
/// their original index order. An item is always most similar to itself, so
/// the identity row is dropped rather than surfaced as a trivial rank-0 hit.
/// An all-zero row still returns the k best (tied) rows; "no good matches" is
/// not an error here, only failing to resolve a title is.
pub fn top_similar(matrix: &SimilarityMatrix, index: usize, k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = matrix.row(index).iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    ranked
        .into_iter()
        .filter(|&(candidate, _)| candidate != index)
        .take(k)
        .collect()
}

/// Format a `[0, 1]` score as a percentage: two decimal places, trailing `%`.
///
/// Used for every percentage the engine surfaces, on both the ranking and the
/// aggregation path.
pub fn format_percent(score: f64) -> String {
    format!("{:.2}%", score * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> SimilarityMatrix {
        SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.8, 0.1],
            vec![0.8, 1.0, 0.2],
            vec![0.1, 0.2, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_top_similar_excludes_self_and_sorts() {
        let results = top_similar(&matrix(), 0, 2);
        assert_eq!(results, vec![(1, 0.8), (2, 0.1)]);
    }

    #[test]
    fn test_top_similar_truncates_to_k() {
        let results = top_similar(&matrix(), 1, 1);
        assert_eq!(results, vec![(0, 0.8)]);
    }

    #[test]
    fn test_ties_keep_index_order() {
        let m = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.5, 0.5, 0.5],
            vec![0.5, 1.0, 0.0, 0.0],
            vec![0.5, 0.0, 1.0, 0.0],
            vec![0.5, 0.0, 0.0, 1.0],
        ])
        .unwrap();

        let results = top_similar(&m, 0, 3);
        assert_eq!(results, vec![(1, 0.5), (2, 0.5), (3, 0.5)]);
    }

    #[test]
    fn test_self_excluded_even_when_tied_at_full_score() {
        let m = SimilarityMatrix::from_rows(vec![
            vec![1.0, 1.0, 0.2],
            vec![1.0, 1.0, 0.3],
            vec![0.2, 0.3, 1.0],
        ])
        .unwrap();

        // Row 1 ties with self at 1.0; the identity row must still be dropped
        let results = top_similar(&m, 1, 2);
        assert!(results.iter().all(|&(i, _)| i != 1));
        assert_eq!(results[0], (0, 1.0));
    }

    #[test]
    fn test_all_zero_row_still_ranks() {
        let m = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();

        let results = top_similar(&m, 0, 2);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|&(_, score)| score == 0.0));
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.8), "80.00%");
        assert_eq!(format_percent(0.125), "12.50%");
        assert_eq!(format_percent(0.0), "0.00%");
    }
}
