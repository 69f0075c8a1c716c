//! # matledger Core
//!
//! Core library for matledger, the material ledger engine.
//!
//! This crate provides the data model and the algorithmic pieces:
//!
//! - [`Vector`] - Dense embedding vector with unrolled dot/norm kernels
//! - [`RealWorldMaterial`] / [`CatalogItem`] - the two reconciled datasets
//! - [`similarity`] - cosine similarity, similarity matrices, top-k ranking
//! - [`CompositionResolver`] - recursive recipe decomposition with cycle protection
//! - [`PropertyPropagator`] - quantity-weighted physics propagation
//! - [`pricing`] - bounded pricing formulas
//!
//! ## Example
//!
//! ```rust
//! use matledger_core::{CatalogItem, CompositionResolver, MaterialIndex, Property,
//!     PropertyPropagator, RealWorldMaterial, Recipe};
//!
//! let items = vec![
//!     CatalogItem::new("plank", "plank").with_material("wood"),
//!     CatalogItem::new("crate", "crate").with_recipe(Recipe::new().with("plank", 6.0)),
//! ];
//! let mut resolver = CompositionResolver::new(&items);
//! let composition = resolver.decompose(&items[1]);
//! assert_eq!(composition["wood"], 6.0);
//!
//! let materials = vec![
//!     RealWorldMaterial::new("Q287", "wood").with_property(Property::Density, 0.6),
//! ];
//! let index = MaterialIndex::new(&materials);
//! let props = PropertyPropagator::new().propagate(&composition, &index);
//! assert!((props[&Property::Density] - 0.6).abs() < 1e-9);
//! ```

pub mod composition;
pub mod error;
pub mod item;
pub mod material;
pub mod physics;
pub mod pricing;
pub mod similarity;
pub mod vector;

/// Unrolled scalar kernels for dot products and norms
pub mod simd;

pub use composition::{CompositionResolver, Resolution};
pub use error::{Error, Result};
pub use item::{CatalogItem, Composition, ItemKind, PropertyMap, Recipe, RecipeComponent};
pub use material::{Property, RealWorldMaterial};
pub use physics::{normalize_name, MaterialIndex, MaterialLookup, PropertyPropagator};
pub use pricing::PricingEngine;
pub use vector::Vector;
