//! # matledger Similarity
//!
//! Embedding and identity matching between the real-world materials catalog
//! and the game item catalog.
//!
//! ## Features
//!
//! - **Embedder**: pluggable text-to-vector seam with an offline hashing implementation
//! - **IdentityMatcher**: greedy best-candidate linking with a review threshold
//! - **Candidates**: ranked alternatives for matches that need a human look
//!
//! ## Example
//!
//! ```rust
//! use matledger_core::{CatalogItem, RealWorldMaterial};
//! use matledger_similarity::{embed_items, embed_materials, HashingEmbedder, IdentityMatcher};
//!
//! let embedder = HashingEmbedder::default();
//! let mut materials = vec![RealWorldMaterial::new("Q11427", "steel")];
//! let mut items = vec![
//!     CatalogItem::new("steel_chunk", "chunk of steel").with_material("steel"),
//!     CatalogItem::new("rag", "cotton rag").with_material("cotton"),
//! ];
//! embed_materials(&embedder, &mut materials);
//! embed_items(&embedder, &mut items);
//!
//! let matches = IdentityMatcher::default().match_materials(&materials, &items).unwrap();
//! assert_eq!(matches[0].item_id, "steel_chunk");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Materials  │────>│  Embedder   │────>│  Matcher    │──> MatchResult
//! │   + Items   │     │ (text→v)    │     │ (best-of)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```

pub mod embedder;
pub mod matcher;

pub use embedder::{
    embed_items, embed_materials, item_text, material_text, Embedder, HashingEmbedder,
    DEFAULT_EMBEDDING_DIM,
};
pub use matcher::{IdentityMatcher, MatchResult, DEFAULT_MATCH_THRESHOLD};
