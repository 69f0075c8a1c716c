//! Batch reconciliation pipeline
//!
//! embed -> match -> price materials -> decompose + propagate -> price items -> ledger

use crate::config::PipelineConfig;
use matledger_core::{
    CatalogItem, CompositionResolver, Error, ItemKind, MaterialIndex, MaterialLookup,
    PropertyPropagator, RealWorldMaterial, Result,
};
use matledger_similarity::{
    embed_items, embed_materials, Embedder, HashingEmbedder, IdentityMatcher, MatchResult,
};
use matledger_storage::LedgerEntry;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Counts gathered over one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub materials: usize,
    pub items: usize,
    pub matches: usize,
    pub review_needed: usize,
    /// Items whose composition is non-empty
    pub items_resolved: usize,
    pub items_with_properties: usize,
    pub materials_priced: usize,
    pub items_priced: usize,
}

pub struct PipelineOutput {
    pub materials: Vec<RealWorldMaterial>,
    pub items: Vec<CatalogItem>,
    pub matches: Vec<MatchResult>,
    pub ledger: Vec<LedgerEntry>,
    pub report: PipelineReport,
}

pub struct Pipeline {
    config: PipelineConfig,
    embedder: Box<dyn Embedder>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, embedder: Box<dyn Embedder>) -> Result<Self> {
        config.validate()?;
        if embedder.dim() != config.embedding_dim {
            return Err(Error::InvalidConfig(format!(
                "embedder produces {}-dimensional vectors, config expects {}",
                embedder.dim(),
                config.embedding_dim
            )));
        }
        Ok(Self { config, embedder })
    }

    /// Pipeline backed by the offline [`HashingEmbedder`]
    pub fn with_hashing_embedder(config: PipelineConfig) -> Result<Self> {
        let embedder = HashingEmbedder::new(config.embedding_dim)?;
        Self::new(config, Box::new(embedder))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(
        &self,
        mut materials: Vec<RealWorldMaterial>,
        mut items: Vec<CatalogItem>,
    ) -> Result<PipelineOutput> {
        let mut report = PipelineReport {
            materials: materials.len(),
            items: items.len(),
            ..Default::default()
        };
        info!(materials = report.materials, items = report.items, "pipeline started");

        embed_materials(self.embedder.as_ref(), &mut materials);
        embed_items(self.embedder.as_ref(), &mut items);

        let matcher = IdentityMatcher::new(self.config.match_threshold);
        let matches = matcher.match_materials(&materials, &items)?;
        report.matches = matches.len();
        report.review_needed = matches.iter().filter(|m| m.review_needed).count();
        info!(matches = report.matches, review_needed = report.review_needed, "matching complete");

        let pricing = self.config.pricing();
        for material in &mut materials {
            material.price = Some(pricing.price_raw_material(material)?);
        }
        report.materials_priced = materials.len();

        let material_pos = first_positions(materials.iter().map(|m| m.id.as_str()));
        let item_pos = first_positions(items.iter().map(|i| i.id.as_str()));

        // first match in material order wins
        let mut matched_material: HashMap<usize, usize> = HashMap::new();
        for m in &matches {
            if let (Some(&item), Some(&material)) =
                (item_pos.get(&m.item_id), material_pos.get(&m.material_id))
            {
                matched_material.entry(item).or_insert(material);
            }
        }

        let index = MaterialIndex::new(&materials);
        let mut resolver = CompositionResolver::new(&items);
        let propagator = PropertyPropagator::new();

        for (i, item) in items.iter_mut().enumerate() {
            let resolution = resolver.resolve_item(item);
            let matched = matched_material.get(&i).map(|&m| &materials[m]);

            // quantities multiplied along a recipe chain can overflow
            let overflowed = resolution.composition.values().any(|q| !q.is_finite());
            if overflowed {
                warn!(item = %item.id, "composition overflowed, skipping derived values");
            }

            let mut properties = if overflowed {
                Default::default()
            } else {
                propagator.propagate(&resolution.composition, &index)
            };
            if properties.is_empty() {
                if let Some(material) = matched {
                    properties = propagator.of_material(material);
                }
            }

            let mut price = None;
            if item.kind() == ItemKind::Composite && !overflowed {
                let constituents: Vec<f64> = resolution
                    .composition
                    .iter()
                    .filter_map(|(name, qty)| {
                        index.lookup(name).and_then(|m| m.price).map(|p| p * qty)
                    })
                    .collect();
                if !constituents.is_empty() {
                    match pricing.price_composite(&constituents, resolution.depth) {
                        Ok(p) => price = Some(p),
                        Err(e) => warn!(item = %item.id, error = %e, "composite price skipped"),
                    }
                }
            }
            if price.is_none() {
                price = matched.and_then(|m| m.price);
            }
            if price.is_some() {
                item.price = price;
                report.items_priced += 1;
            }

            if !resolution.composition.is_empty() {
                report.items_resolved += 1;
            }
            if !properties.is_empty() {
                report.items_with_properties += 1;
                item.properties = Some(properties);
            } else {
                item.properties = None;
            }
            debug!(
                item = %item.id,
                depth = resolution.depth,
                price = ?item.price,
                "item resolved"
            );
            item.composition = Some(resolution.composition);
        }
        info!(
            resolved = report.items_resolved,
            with_properties = report.items_with_properties,
            priced = report.items_priced,
            "propagation and pricing complete"
        );

        let mut ledger = Vec::with_capacity(matches.len());
        for m in &matches {
            let (Some(&mi), Some(&ii)) =
                (material_pos.get(&m.material_id), item_pos.get(&m.item_id))
            else {
                continue;
            };
            let material = &materials[mi];
            let mut entry =
                LedgerEntry::new(material, &items[ii], m.confidence_score, m.review_needed);

            if m.review_needed && self.config.review_candidates > 0 {
                let alternatives = matcher
                    .candidates(material, &items, self.config.review_candidates + 1)?
                    .into_iter()
                    .filter(|(id, _)| *id != m.item_id)
                    .take(self.config.review_candidates)
                    .map(|(id, _)| id.to_string())
                    .collect();
                entry = entry.with_alternatives(alternatives);
            }
            ledger.push(entry);
        }

        Ok(PipelineOutput {
            materials,
            items,
            matches,
            ledger,
            report,
        })
    }
}

fn first_positions<'a>(ids: impl Iterator<Item = &'a str>) -> HashMap<String, usize> {
    let mut positions = HashMap::new();
    for (i, id) in ids.enumerate() {
        positions.entry(id.to_string()).or_insert(i);
    }
    positions
}
