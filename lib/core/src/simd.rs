// Unrolled scalar kernels for embedding math.
// Two independent accumulators keep the FP pipeline busy; the compiler
// auto-vectorizes the 8-wide chunks on targets that support it.

/// Dot product of two equal-length slices.
///
/// Callers check lengths; extra elements in the longer slice are ignored.
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    let mut dot0 = 0.0f32;
    let mut dot1 = 0.0f32;

    let chunks = a.chunks_exact(8);
    let remainder = chunks.remainder().len();
    let b_chunks = b.chunks_exact(8);

    for (x, y) in chunks.zip(b_chunks) {
        dot0 += x[0] * y[0] + x[1] * y[1] + x[2] * y[2] + x[3] * y[3];
        dot1 += x[4] * y[4] + x[5] * y[5] + x[6] * y[6] + x[7] * y[7];
    }

    let len = a.len().min(b.len());
    for i in (a.len() - remainder)..len {
        dot0 += a[i] * b[i];
    }

    dot0 + dot1
}

#[inline]
pub fn norm_squared(v: &[f32]) -> f32 {
    dot_product(v, v)
}

#[inline]
pub fn norm(v: &[f32]) -> f32 {
    norm_squared(v).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product_matches_naive() {
        let a: Vec<f32> = (0..19).map(|i| i as f32 * 0.5).collect();
        let b: Vec<f32> = (0..19).map(|i| 1.0 - i as f32 * 0.1).collect();
        let naive: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        assert!((dot_product(&a, &b) - naive).abs() < 1e-4);
    }

    #[test]
    fn test_norm() {
        assert!((norm(&[3.0, 4.0]) - 5.0).abs() < 1e-6);
        assert_eq!(norm(&[]), 0.0);
    }
}
