//! # matledger
//!
//! Reconciles a crafted-item catalog with real-world material data into a
//! priced ledger.
//!
//! A run embeds both sides, matches each material to its most similar
//! catalog item, decomposes items through their recipes into base
//! materials, derives physical properties from those materials and prices
//! everything with bounded formulas.
//!
//! ## Quick Start
//!
//! ```bash
//! matledger --materials materials.json --catalog-dir ./catalog --output ledger_materials.json
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use matledger::prelude::*;
//!
//! let materials = vec![
//!     RealWorldMaterial::new("Q11427", "iron").with_property(Property::Density, 7.87),
//! ];
//! let items = vec![
//!     CatalogItem::new("iron_ingot", "Iron Ingot").with_material("iron"),
//!     CatalogItem::new("iron_bars", "Iron Bars")
//!         .with_recipe(Recipe::new().with("iron_ingot", 6.0)),
//! ];
//!
//! let pipeline = Pipeline::with_hashing_embedder(PipelineConfig::default()).unwrap();
//! let output = pipeline.run(materials, items).unwrap();
//!
//! let bars = &output.items[1];
//! assert_eq!(bars.composition.as_ref().unwrap()["iron"], 6.0);
//! assert!(bars.price.is_some());
//! ```
//!
//! ## Crate Structure
//!
//! - `matledger-core` - data model, similarity, recipe decomposition, property propagation, pricing
//! - `matledger-similarity` - text embedders and the identity matcher
//! - `matledger-storage` - catalog and material loaders, ledger export

pub mod config;
pub mod pipeline;

pub use config::PipelineConfig;
pub use pipeline::{Pipeline, PipelineOutput, PipelineReport};

// Re-export core types
pub use matledger_core::{
    CatalogItem, Composition, CompositionResolver, Error, ItemKind, MaterialIndex,
    MaterialLookup, PricingEngine, Property, PropertyMap, PropertyPropagator,
    RealWorldMaterial, Recipe, RecipeComponent, Resolution, Result, Vector,
};

// Re-export similarity
pub use matledger_similarity::{Embedder, HashingEmbedder, IdentityMatcher, MatchResult};

// Re-export storage
pub use matledger_storage::{
    CatalogLoader, ExportSummary, LedgerEntry, LedgerExporter, LoadOutcome, MaterialsLoader,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CatalogItem, CatalogLoader, CompositionResolver, Embedder, Error, HashingEmbedder,
        IdentityMatcher, LedgerEntry, LedgerExporter, MatchResult, MaterialsLoader, Pipeline,
        PipelineConfig, PricingEngine, Property, PropertyPropagator, RealWorldMaterial, Recipe,
        Result, Vector,
    };
}

/// Pricing formulas
pub mod pricing {
    pub use matledger_core::pricing::{
        base_material_price, composite_material_price, price_composite, price_raw_material,
        recipe_depth_modifier,
    };
}
