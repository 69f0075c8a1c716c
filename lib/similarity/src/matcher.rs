//! Identity matching between real-world materials and catalog items
//!
//! Greedy best-of: every material with an embedding is compared against
//! every embedded catalog item and linked to the single highest-scoring one.

use matledger_core::similarity::top_k;
use matledger_core::{CatalogItem, RealWorldMaterial, Result, Vector};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Similarity below which a match is flagged for human review
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.85;

/// A link from one real-world material to one catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub material_id: String,
    pub item_id: String,
    pub confidence_score: f32,
    pub review_needed: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct IdentityMatcher {
    threshold: f32,
}

impl Default for IdentityMatcher {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl IdentityMatcher {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// At most one [`MatchResult`] per material, in material order.
    ///
    /// Materials and items without embeddings are left out. A material is
    /// only matched when some item scores strictly above `0.0`; among equal
    /// scores the earliest item wins. Embeddings of differing lengths are a
    /// caller error.
    pub fn match_materials(
        &self,
        materials: &[RealWorldMaterial],
        items: &[CatalogItem],
    ) -> Result<Vec<MatchResult>> {
        let candidates: Vec<(&CatalogItem, &Vector)> = items
            .iter()
            .filter_map(|item| item.embedding.as_ref().map(|e| (item, e)))
            .collect();

        if candidates.is_empty() {
            debug!("no embedded catalog items, nothing to match");
            return Ok(Vec::new());
        }

        let per_material: Vec<Option<MatchResult>> = materials
            .par_iter()
            .map(|material| self.best_match(material, &candidates))
            .collect::<Result<_>>()?;

        Ok(per_material.into_iter().flatten().collect())
    }

    fn best_match(
        &self,
        material: &RealWorldMaterial,
        candidates: &[(&CatalogItem, &Vector)],
    ) -> Result<Option<MatchResult>> {
        let Some(query) = &material.embedding else {
            return Ok(None);
        };

        let mut best_score = 0.0f32;
        let mut best_item: Option<&CatalogItem> = None;
        for &(item, embedding) in candidates {
            let score = query.cosine_similarity(embedding)?;
            if score > best_score {
                best_score = score;
                best_item = Some(item);
            }
        }

        Ok(best_item.map(|item| MatchResult {
            material_id: material.id.clone(),
            item_id: item.id.clone(),
            confidence_score: best_score,
            review_needed: best_score < self.threshold,
        }))
    }

    /// The `k` most similar embedded items for `material`, best first.
    pub fn candidates<'a>(
        &self,
        material: &RealWorldMaterial,
        items: &'a [CatalogItem],
        k: usize,
    ) -> Result<Vec<(&'a str, f32)>> {
        let Some(query) = &material.embedding else {
            return Ok(Vec::new());
        };
        top_k(
            query,
            items
                .iter()
                .filter(|item| item.embedding.is_some())
                .map(|item| (item.id.as_str(), item.embedding.as_ref())),
            k,
            0.0,
        )
    }
}
