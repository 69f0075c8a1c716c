//! Vector similarity primitives
//!
//! Cosine similarity between optional embeddings, full pairwise similarity
//! matrices, and thresholded top-k ranking. Absent or zero-magnitude
//! vectors score `0.0`; mismatched lengths are reported as
//! [`Error::InvalidDimension`].

use crate::{simd, Error, Result, Vector};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::cmp::Reverse;

/// Cosine similarity between two optional vectors.
///
/// Returns `0.0` when either side is absent or has zero magnitude.
pub fn cosine_similarity(a: Option<&Vector>, b: Option<&Vector>) -> Result<f32> {
    match (a, b) {
        (Some(a), Some(b)) => a.cosine_similarity(b),
        _ => Ok(0.0),
    }
}

/// Pairwise cosine similarity, `result[i][j] = sim(sources[i], targets[j])`.
///
/// Each side is normalized once up front; rows are computed in parallel.
/// Every vector in both sets must share one dimension.
pub fn similarity_matrix(sources: &[Vector], targets: &[Vector]) -> Result<Vec<Vec<f32>>> {
    let dim = match sources.first().or_else(|| targets.first()) {
        Some(v) => v.dim(),
        None => return Ok(Vec::new()),
    };
    for v in sources.iter().chain(targets) {
        if v.dim() != dim {
            return Err(Error::InvalidDimension {
                expected: dim,
                actual: v.dim(),
            });
        }
    }

    let sources: Vec<Vector> = sources.iter().map(Vector::normalized).collect();
    let targets: Vec<Vector> = targets.iter().map(Vector::normalized).collect();

    Ok(sources
        .par_iter()
        .map(|s| {
            targets
                .iter()
                .map(|t| simd::dot_product(s.as_slice(), t.as_slice()))
                .collect()
        })
        .collect())
}

/// Rank candidates by similarity to `query`.
///
/// Keeps candidates scoring `>= threshold`, sorts them by descending score
/// (ties keep input order) and truncates to `k`.
pub fn top_k<'a, I>(
    query: &Vector,
    candidates: I,
    k: usize,
    threshold: f32,
) -> Result<Vec<(&'a str, f32)>>
where
    I: IntoIterator<Item = (&'a str, Option<&'a Vector>)>,
{
    let mut scores = Vec::new();
    for (id, embedding) in candidates {
        let score = cosine_similarity(Some(query), embedding)?;
        if score >= threshold {
            scores.push((id, score));
        }
    }

    // sort_by_key is stable
    scores.sort_by_key(|&(_, score)| Reverse(OrderedFloat(score)));
    scores.truncate(k);
    Ok(scores)
}
