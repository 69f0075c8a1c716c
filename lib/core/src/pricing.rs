//! Pricing formulas
//!
//! Pure functions turning physical attributes or constituent costs into a
//! bounded price rounded to cents. Missing physical inputs count as zero;
//! non-finite numbers are rejected with [`Error::InvalidInput`].

use crate::material::RealWorldMaterial;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const PRICE_FLOOR: f64 = 0.1;
pub const BASE_PRICE_CEILING: f64 = 10_000.0;
pub const COMPOSITE_PRICE_CEILING: f64 = 50_000.0;

pub const DENSITY_WEIGHT: f64 = 0.4;
pub const MELTING_POINT_WEIGHT: f64 = 0.002;
pub const TENSILE_STRENGTH_WEIGHT: f64 = 0.3;

/// Cost increase per unit of processing complexity
pub const COMPLEXITY_STEP: f64 = 0.25;
/// Cost increase per level of recipe depth, capped at [`MAX_DEPTH_BONUS`]
pub const DEPTH_STEP: f64 = 0.1;
pub const MAX_DEPTH_BONUS: f64 = 1.0;

pub const DEFAULT_LOSS_FACTOR: f64 = 0.15;
pub const DEFAULT_ALIAS_RARITY_FACTOR: f64 = 1.2;

fn finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidInput(format!("{name} must be finite, got {value}")))
    }
}

fn or_zero(name: &str, value: Option<f64>) -> Result<f64> {
    value.map_or(Ok(0.0), |v| finite(name, v))
}

/// Half-cent ties go to the even cent.
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Price of a raw material from its physical attributes.
///
/// `(density*0.4 + melting_point*0.002 + tensile_strength*0.3) * rarity_factor`,
/// clamped to `[0.1, 10000]`.
pub fn base_material_price(
    density: Option<f64>,
    melting_point: Option<f64>,
    tensile_strength: Option<f64>,
    rarity_factor: f64,
) -> Result<f64> {
    let density = or_zero("density", density)?;
    let melting_point = or_zero("melting_point", melting_point)?;
    let tensile_strength = or_zero("tensile_strength", tensile_strength)?;
    let rarity_factor = finite("rarity_factor", rarity_factor)?;

    let price = (density * DENSITY_WEIGHT
        + melting_point * MELTING_POINT_WEIGHT
        + tensile_strength * TENSILE_STRENGTH_WEIGHT)
        * rarity_factor;

    Ok(round_cents(price.clamp(PRICE_FLOOR, BASE_PRICE_CEILING)))
}

/// Price of a crafted or alloyed material from its constituents.
///
/// `sum * (1 + complexity*0.25) * (1 + loss_factor)`, clamped to `[0.1, 50000]`.
pub fn composite_material_price(
    constituent_price_sum: f64,
    processing_complexity: u32,
    loss_factor: f64,
) -> Result<f64> {
    let sum = finite("constituent_price_sum", constituent_price_sum)?;
    let loss_factor = finite("loss_factor", loss_factor)?;

    let processing = 1.0 + f64::from(processing_complexity) * COMPLEXITY_STEP;
    let waste = 1.0 + loss_factor;

    Ok(round_cents(
        (sum * processing * waste).clamp(PRICE_FLOOR, COMPOSITE_PRICE_CEILING),
    ))
}

/// `1 + min(depth*0.1, 1.0)`; never more than 2x.
pub fn recipe_depth_modifier(depth: u32) -> f64 {
    1.0 + (f64::from(depth) * DEPTH_STEP).min(MAX_DEPTH_BONUS)
}

/// Raw material price with the default alias rarity rule.
pub fn price_raw_material(material: &RealWorldMaterial) -> Result<f64> {
    PricingEngine::default().price_raw_material(material)
}

/// Composite price with the default loss factor.
pub fn price_composite(constituent_prices: &[f64], recipe_depth: u32) -> Result<f64> {
    PricingEngine::default().price_composite(constituent_prices, recipe_depth)
}

/// Pricing parameters shared by one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingEngine {
    pub loss_factor: f64,
    /// Multiplier for materials that carry at least one alias.
    // Open product question: aliases mark well-documented materials, not
    // necessarily rare ones.
    pub alias_rarity_factor: f64,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self {
            loss_factor: DEFAULT_LOSS_FACTOR,
            alias_rarity_factor: DEFAULT_ALIAS_RARITY_FACTOR,
        }
    }
}

impl PricingEngine {
    pub fn new(loss_factor: f64, alias_rarity_factor: f64) -> Self {
        Self {
            loss_factor,
            alias_rarity_factor,
        }
    }

    pub fn price_raw_material(&self, material: &RealWorldMaterial) -> Result<f64> {
        let rarity = if material.has_aliases() {
            self.alias_rarity_factor
        } else {
            1.0
        };
        base_material_price(
            material.density,
            material.melting_point,
            material.tensile_strength,
            rarity,
        )
    }

    /// Sum constituents, apply the depth modifier, then the composite formula
    /// with `processing_complexity = recipe_depth`.
    pub fn price_composite(&self, constituent_prices: &[f64], recipe_depth: u32) -> Result<f64> {
        let mut sum = 0.0;
        for &price in constituent_prices {
            sum += finite("constituent price", price)?;
        }
        composite_material_price(
            sum * recipe_depth_modifier(recipe_depth),
            recipe_depth,
            self.loss_factor,
        )
    }
}
