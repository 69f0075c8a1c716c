use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A dense embedding vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim],
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[inline]
    pub fn magnitude(&self) -> f32 {
        crate::simd::norm(&self.data)
    }

    /// Fails with [`Error::InvalidDimension`] unless both vectors have the same length.
    #[inline]
    pub fn check_dim(&self, other: &Vector) -> Result<()> {
        if self.dim() != other.dim() {
            return Err(Error::InvalidDimension {
                expected: self.dim(),
                actual: other.dim(),
            });
        }
        Ok(())
    }

    /// Cosine similarity with another vector.
    ///
    /// A zero-magnitude operand yields `0.0`. Mismatched lengths are a caller
    /// error and return [`Error::InvalidDimension`].
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> Result<f32> {
        self.check_dim(other)?;

        let norm_a = self.magnitude();
        let norm_b = other.magnitude();
        if norm_a == 0.0 || norm_b == 0.0 {
            return Ok(0.0);
        }

        let dot = crate::simd::dot_product(&self.data, &other.data);
        Ok(dot / (norm_a * norm_b))
    }

    /// Normalize the vector to unit length. Zero vectors are left untouched.
    ///
    /// Divides by the norm rather than multiplying by its inverse, which
    /// would overflow for subnormal norms.
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.magnitude();
        if norm > 0.0 {
            for x in &mut self.data {
                *x /= norm;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}
