//! Cosine similarity and best-match selection over embedding sets.

use super::provider::{Embedding, EmbeddingError};

/// Cosine similarity between two vectors.
///
/// Returns `0.0` when either vector has zero magnitude.  The result is
/// clamped to `[-1.0, 1.0]` to absorb floating-point drift.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let mag_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        0.0
    } else {
        (dot / (mag_a * mag_b)).clamp(-1.0, 1.0)
    }
}

/// Full pairwise matrix: `matrix[row][col] = cos(rows[row], cols[col])`.
///
/// All vectors must share one dimension; a mismatch is an error rather than a
/// silently meaningless score.
pub fn similarity_matrix(
    rows: &[Embedding],
    cols: &[Embedding],
) -> Result<Vec<Vec<f64>>, EmbeddingError> {
    let dim = rows.first().or(cols.first()).map_or(0, Vec::len);
    if let Some(bad) = rows.iter().chain(cols).find(|v| v.len() != dim) {
        return Err(EmbeddingError::DimensionMismatch {
            expected: dim,
            got: bad.len(),
        });
    }

    Ok(rows
        .iter()
        .map(|r| cols.iter().map(|c| cosine_similarity(r, c)).collect())
        .collect())
}

/// Index and value of the maximum entry.  Ties resolve to the first
/// occurrence; `None` for an empty row.
pub fn argmax(row: &[f64]) -> Option<(usize, f64)> {
    row.iter()
        .copied()
        .enumerate()
        .fold(None, |best, (idx, value)| match best {
            Some((_, best_value)) if value <= best_value => best,
            _ => Some((idx, value)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_score_one() {
        let v = [0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn opposite_vectors_score_minus_one() {
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn matrix_has_rows_by_cols_shape() {
        let rows = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];
        let cols = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let m = similarity_matrix(&rows, &cols).unwrap();
        assert_eq!(m.len(), 3);
        assert!(m.iter().all(|r| r.len() == 2));
        assert_eq!(m[0], vec![1.0, 0.0]);
    }

    #[test]
    fn matrix_rejects_mixed_dimensions() {
        let rows = vec![vec![1.0, 0.0]];
        let cols = vec![vec![1.0, 0.0, 0.0]];
        assert!(matches!(
            similarity_matrix(&rows, &cols),
            Err(EmbeddingError::DimensionMismatch { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn argmax_prefers_first_on_tie() {
        assert_eq!(argmax(&[0.2, 0.9, 0.9, 0.1]), Some((1, 0.9)));
    }

    #[test]
    fn argmax_handles_negative_rows_and_empty() {
        assert_eq!(argmax(&[-0.5, -0.2, -0.9]), Some((1, -0.2)));
        assert_eq!(argmax(&[]), None);
    }
}
