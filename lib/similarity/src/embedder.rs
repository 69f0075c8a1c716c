//! Text embedding
//!
//! [`Embedder`] is the seam where a sentence-embedding model plugs in.
//! [`HashingEmbedder`] is the offline default: character trigrams and whole
//! words hashed into a fixed number of buckets, then L2-normalized.

use matledger_core::{CatalogItem, Error, RealWorldMaterial, Result, Vector};
use rayon::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::debug;

/// Dimension of the sentence-embedding models the pipeline is tuned for
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

const TRIGRAM_WEIGHT: f32 = 1.0;
const WORD_WEIGHT: f32 = 2.0;

/// Turns text into fixed-length vectors
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;

    fn embed(&self, text: &str) -> Vector;

    fn embed_batch(&self, texts: &[String]) -> Vec<Vector> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Deterministic feature-hashing embedder
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidConfig(
                "embedding dimension must be positive".to_string(),
            ));
        }
        Ok(Self { dim })
    }

    fn bucket<T: Hash + ?Sized>(&self, token: &T) -> usize {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        (hasher.finish() as usize) % self.dim
    }
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Vector {
        let normalized = text.trim().to_lowercase();
        let mut vector = Vector::zeros(self.dim);
        if normalized.is_empty() {
            return vector;
        }

        let slots = vector.as_mut_slice();
        for trigram in trigrams(&normalized) {
            slots[self.bucket(&trigram)] += TRIGRAM_WEIGHT;
        }
        for word in normalized.split_whitespace() {
            slots[self.bucket(word)] += WORD_WEIGHT;
        }

        vector.normalize();
        vector
    }

    fn embed_batch(&self, texts: &[String]) -> Vec<Vector> {
        texts.par_iter().map(|t| self.embed(t)).collect()
    }
}

/// Distinct padded character trigrams, sorted
fn trigrams(s: &str) -> Vec<String> {
    let padded: Vec<char> = format!("  {s}  ").chars().collect();
    let mut grams: Vec<String> = padded.windows(3).map(|w| w.iter().collect()).collect();
    grams.sort_unstable();
    grams.dedup();
    grams
}

/// Label, description and aliases, space separated
pub fn material_text(material: &RealWorldMaterial) -> String {
    let mut parts: Vec<&str> = vec![material.label.as_str()];
    if let Some(description) = material.description.as_deref().filter(|d| !d.is_empty()) {
        parts.push(description);
    }
    parts.extend(material.aliases.iter().map(String::as_str));
    parts.join(" ")
}

/// Name followed by material names
pub fn item_text(item: &CatalogItem) -> String {
    let mut parts: Vec<&str> = vec![item.name.as_str()];
    parts.extend(item.materials.iter().map(String::as_str));
    parts.join(" ")
}

/// Attach embeddings to materials that lack one. Returns how many were embedded.
pub fn embed_materials(embedder: &dyn Embedder, materials: &mut [RealWorldMaterial]) -> usize {
    let pending: Vec<usize> = (0..materials.len())
        .filter(|&i| materials[i].embedding.is_none())
        .collect();
    let texts: Vec<String> = pending.iter().map(|&i| material_text(&materials[i])).collect();

    for (i, vector) in pending.iter().zip(embedder.embed_batch(&texts)) {
        materials[*i].embedding = Some(vector);
    }
    debug!(count = pending.len(), "embedded materials");
    pending.len()
}

/// Attach embeddings to catalog items that lack one. Returns how many were embedded.
pub fn embed_items(embedder: &dyn Embedder, items: &mut [CatalogItem]) -> usize {
    let pending: Vec<usize> = (0..items.len())
        .filter(|&i| items[i].embedding.is_none())
        .collect();
    let texts: Vec<String> = pending.iter().map(|&i| item_text(&items[i])).collect();

    for (i, vector) in pending.iter().zip(embedder.embed_batch(&texts)) {
        items[*i].embedding = Some(vector);
    }
    debug!(count = pending.len(), "embedded catalog items");
    pending.len()
}
