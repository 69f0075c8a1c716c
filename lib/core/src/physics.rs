//! Physics propagation
//!
//! Quantity-weighted averaging of real-world physical properties from base
//! materials onto the catalog items built from them.

use crate::item::{CatalogItem, Composition, PropertyMap};
use crate::material::{Property, RealWorldMaterial};
use ahash::AHashMap;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Resolves a base-material name to its real-world record
pub trait MaterialLookup {
    fn lookup(&self, name: &str) -> Option<&RealWorldMaterial>;
}

impl<S: BuildHasher> MaterialLookup for HashMap<String, RealWorldMaterial, S> {
    fn lookup(&self, name: &str) -> Option<&RealWorldMaterial> {
        self.get(name)
    }
}

/// Canonical lookup key: lowercase, trimmed, spaces and hyphens as `_`
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Name index over a slice of materials, keyed by label and aliases.
#[derive(Debug)]
pub struct MaterialIndex<'a> {
    materials: &'a [RealWorldMaterial],
    by_name: AHashMap<String, usize>,
}

impl<'a> MaterialIndex<'a> {
    /// Labels are registered before aliases; the first registration of a
    /// key wins.
    pub fn new(materials: &'a [RealWorldMaterial]) -> Self {
        let mut by_name = AHashMap::with_capacity(materials.len() * 2);
        for (i, material) in materials.iter().enumerate() {
            by_name.entry(normalize_name(&material.label)).or_insert(i);
        }
        for (i, material) in materials.iter().enumerate() {
            for alias in &material.aliases {
                by_name.entry(normalize_name(alias)).or_insert(i);
            }
        }
        by_name.remove("");
        Self { materials, by_name }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn materials(&self) -> &'a [RealWorldMaterial] {
        self.materials
    }
}

impl MaterialLookup for MaterialIndex<'_> {
    fn lookup(&self, name: &str) -> Option<&RealWorldMaterial> {
        self.by_name
            .get(&normalize_name(name))
            .map(|&i| &self.materials[i])
    }
}

/// Stateless propagator of physical properties
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyPropagator;

impl PropertyPropagator {
    pub fn new() -> Self {
        Self
    }

    /// Quantity-weighted mean of each tracked property over `composition`.
    ///
    /// Every material found in `lookup` adds its quantity to a single shared
    /// denominator, whether or not it carries a given property; a property
    /// appears in the result only if at least one material supplied it.
    /// Unknown materials are skipped. Zero total weight yields an empty map.
    pub fn propagate<L>(&self, composition: &Composition, lookup: &L) -> PropertyMap
    where
        L: MaterialLookup + ?Sized,
    {
        let mut totals = PropertyMap::new();
        let mut total_weight = 0.0;

        for (name, &quantity) in composition {
            let Some(material) = lookup.lookup(name) else {
                continue;
            };
            total_weight += quantity;

            for property in Property::ALL {
                if let Some(value) = material.property(property) {
                    *totals.entry(property).or_insert(0.0) += value * quantity;
                }
            }
        }

        if total_weight == 0.0 {
            return PropertyMap::new();
        }

        for value in totals.values_mut() {
            *value /= total_weight;
        }
        totals
    }

    /// The material's own known properties, as if it made up the whole item
    pub fn of_material(&self, material: &RealWorldMaterial) -> PropertyMap {
        Property::ALL
            .into_iter()
            .filter_map(|p| material.property(p).map(|v| (p, v)))
            .collect()
    }

    /// Propagate onto `item.properties`; an empty result clears the field.
    pub fn apply<L>(
        &self,
        item: &mut CatalogItem,
        composition: &Composition,
        lookup: &L,
    ) -> PropertyMap
    where
        L: MaterialLookup + ?Sized,
    {
        let properties = self.propagate(composition, lookup);
        item.properties = if properties.is_empty() {
            None
        } else {
            Some(properties.clone())
        };
        properties
    }
}
