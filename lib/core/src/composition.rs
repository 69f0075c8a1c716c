//! Recipe decomposition
//!
//! Expands crafted items into flat base-material quantities. The catalog is
//! copied into an index-addressed arena once; traversal is an explicit-stack
//! depth-first walk, so deep recipe chains never grow the call stack.
//!
//! Per item the resolver moves through `unresolved -> resolving -> resolved`:
//! `resolving` is membership in the active chain (`on_chain`), `resolved` is a
//! filled slot in the results cache. Re-entering an item that is still
//! resolving is a cycle; that edge contributes nothing.

use crate::item::{CatalogItem, Composition};
use ahash::AHashMap;
use tracing::debug;

/// Composition of one item together with its recipe depth
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub composition: Composition,
    /// 0 for base and unresolvable items, 1 + deepest component otherwise
    pub depth: u32,
}

#[derive(Debug)]
struct Node {
    id: String,
    materials: Vec<String>,
    /// (component node, quantity) across all recipes, in declaration order
    edges: Vec<(usize, f64)>,
}

struct Frame {
    node: usize,
    next_edge: usize,
    pending_quantity: f64,
    composition: Composition,
    depth: u32,
}

impl Frame {
    fn new(node: usize) -> Self {
        Self {
            node,
            next_edge: 0,
            pending_quantity: 0.0,
            composition: Composition::new(),
            depth: 0,
        }
    }
}

/// Decomposes catalog items into base materials, memoizing per item id for
/// the lifetime of the resolver.
///
/// Not thread-safe: the cache is owned and mutated through `&mut self`.
pub struct CompositionResolver {
    nodes: Vec<Node>,
    index: AHashMap<String, usize>,
    resolved: Vec<Option<Resolution>>,
    on_chain: Vec<bool>,
}

impl CompositionResolver {
    /// Build the arena. When ids repeat, the first item wins.
    pub fn new(items: &[CatalogItem]) -> Self {
        let mut index = AHashMap::with_capacity(items.len());
        let mut unique = Vec::with_capacity(items.len());
        for item in items {
            if index.contains_key(&item.id) {
                debug!(item = %item.id, "duplicate catalog id ignored by resolver");
                continue;
            }
            index.insert(item.id.clone(), unique.len());
            unique.push(item);
        }

        let nodes: Vec<Node> = unique
            .iter()
            .map(|item| Node {
                id: item.id.clone(),
                materials: item.materials.clone(),
                edges: Self::link(&index, item),
            })
            .collect();

        let n = nodes.len();
        Self {
            nodes,
            index,
            resolved: vec![None; n],
            on_chain: vec![false; n],
        }
    }

    fn link(index: &AHashMap<String, usize>, item: &CatalogItem) -> Vec<(usize, f64)> {
        let mut edges = Vec::new();
        for recipe in &item.recipes {
            for (component_id, quantity) in recipe.iter() {
                match index.get(component_id) {
                    Some(&component) => edges.push((component, quantity)),
                    None => debug!(
                        item = %item.id,
                        component = component_id,
                        "recipe component not in catalog, skipping"
                    ),
                }
            }
        }
        edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Whether the item's composition is already cached
    pub fn is_resolved(&self, id: &str) -> bool {
        self.index
            .get(id)
            .is_some_and(|&i| self.resolved[i].is_some())
    }

    /// Flat base-material quantities for `item`
    pub fn decompose(&mut self, item: &CatalogItem) -> Composition {
        self.resolve_item(item).composition
    }

    /// Recipe depth for `item`
    pub fn depth(&mut self, item: &CatalogItem) -> u32 {
        self.resolve_item(item).depth
    }

    /// Composition for a catalog id, `None` if the id is unknown
    pub fn decompose_id(&mut self, id: &str) -> Option<Composition> {
        let node = *self.index.get(id)?;
        Some(self.resolve(node).composition)
    }

    /// Composition and depth for `item`.
    ///
    /// Items known to the arena are resolved (and cached) by id. Other items
    /// are resolved detached: their components are looked up in the arena
    /// but the item itself is not cached.
    pub fn resolve_item(&mut self, item: &CatalogItem) -> Resolution {
        if let Some(&node) = self.index.get(&item.id) {
            return self.resolve(node);
        }

        let mut resolution = Resolution::default();
        if !item.materials.is_empty() {
            add_materials(&mut resolution.composition, &item.materials);
            return resolution;
        }
        for (component, quantity) in Self::link(&self.index, item) {
            let child = self.resolve(component);
            merge_scaled(&mut resolution.composition, &child.composition, quantity);
            resolution.depth = resolution.depth.max(child.depth + 1);
        }
        resolution
    }

    fn resolve(&mut self, root: usize) -> Resolution {
        if let Some(done) = &self.resolved[root] {
            return done.clone();
        }

        let mut stack = vec![Frame::new(root)];
        self.on_chain[root] = true;

        while let Some(frame) = stack.last_mut() {
            let node = &self.nodes[frame.node];

            if node.materials.is_empty() {
                if let Some(&(child, quantity)) = node.edges.get(frame.next_edge) {
                    frame.next_edge += 1;

                    if let Some(done) = &self.resolved[child] {
                        merge_scaled(&mut frame.composition, &done.composition, quantity);
                        frame.depth = frame.depth.max(done.depth + 1);
                    } else if self.on_chain[child] {
                        debug!(
                            item = %node.id,
                            component = %self.nodes[child].id,
                            "recipe cycle, edge contributes nothing"
                        );
                        frame.depth = frame.depth.max(1);
                    } else {
                        frame.pending_quantity = quantity;
                        self.on_chain[child] = true;
                        stack.push(Frame::new(child));
                    }
                    continue;
                }
            } else {
                add_materials(&mut frame.composition, &node.materials);
            }

            let Some(done) = stack.pop() else { break };
            self.on_chain[done.node] = false;
            let resolution = Resolution {
                composition: done.composition,
                depth: done.depth,
            };
            if let Some(parent) = stack.last_mut() {
                merge_scaled(
                    &mut parent.composition,
                    &resolution.composition,
                    parent.pending_quantity,
                );
                parent.depth = parent.depth.max(resolution.depth + 1);
            }
            self.resolved[done.node] = Some(resolution);
        }

        self.resolved[root].clone().unwrap_or_default()
    }
}

fn add_materials(acc: &mut Composition, materials: &[String]) {
    for material in materials {
        *acc.entry(material.clone()).or_insert(0.0) += 1.0;
    }
}

fn merge_scaled(acc: &mut Composition, part: &Composition, quantity: f64) {
    for (material, amount) in part {
        *acc.entry(material.clone()).or_insert(0.0) += amount * quantity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Recipe;

    fn base(id: &str, materials: &[&str]) -> CatalogItem {
        let mut item = CatalogItem::new(id, id);
        for m in materials {
            item = item.with_material(*m);
        }
        item
    }

    fn crafted(id: &str, parts: &[(&str, f64)]) -> CatalogItem {
        let recipe = parts
            .iter()
            .fold(Recipe::new(), |r, (part, qty)| r.with(*part, *qty));
        CatalogItem::new(id, id).with_recipe(recipe)
    }

    fn comp(pairs: &[(&str, f64)]) -> Composition {
        pairs.iter().map(|(m, q)| (m.to_string(), *q)).collect()
    }

    #[test]
    fn test_base_item_counts_repeats() {
        let items = vec![base("rebar", &["steel", "steel", "concrete"])];
        let mut resolver = CompositionResolver::new(&items);
        assert_eq!(
            resolver.decompose(&items[0]),
            comp(&[("steel", 2.0), ("concrete", 1.0)])
        );
        assert_eq!(resolver.depth(&items[0]), 0);
    }

    #[test]
    fn test_composite_scales_components() {
        let items = vec![
            base("base1", &["wood"]),
            base("base2", &["steel"]),
            crafted("tool", &[("base1", 2.0), ("base2", 3.0)]),
        ];
        let mut resolver = CompositionResolver::new(&items);
        assert_eq!(
            resolver.decompose(&items[2]),
            comp(&[("wood", 2.0), ("steel", 3.0)])
        );
        assert_eq!(resolver.depth(&items[2]), 1);
    }

    #[test]
    fn test_multiple_recipes_accumulate() {
        let mut item = crafted("kit", &[("plank", 1.0)]);
        item.recipes.push(Recipe::new().with("plank", 2.0).with("nail", 5.0));
        let items = vec![base("plank", &["wood"]), base("nail", &["iron"]), item];
        let mut resolver = CompositionResolver::new(&items);
        assert_eq!(
            resolver.decompose(&items[2]),
            comp(&[("wood", 3.0), ("iron", 5.0)])
        );
    }

    #[test]
    fn test_nested_depth_and_scaling() {
        let items = vec![
            crafted("table", &[("leg", 4.0), ("plank", 1.0)]),
            crafted("leg", &[("plank", 2.0)]),
            base("plank", &["wood"]),
        ];
        let mut resolver = CompositionResolver::new(&items);
        assert_eq!(resolver.decompose(&items[0]), comp(&[("wood", 9.0)]));
        assert_eq!(resolver.depth(&items[0]), 2);
        assert_eq!(resolver.depth(&items[1]), 1);
    }

    #[test]
    fn test_two_item_cycle_terminates_empty() {
        let items = vec![crafted("a", &[("b", 1.0)]), crafted("b", &[("a", 1.0)])];
        let mut resolver = CompositionResolver::new(&items);
        assert!(resolver.decompose(&items[0]).is_empty());
        assert!(resolver.decompose(&items[1]).is_empty());
    }

    #[test]
    fn test_cycle_edge_counts_as_depth_zero() {
        let items = vec![crafted("a", &[("b", 1.0)]), crafted("b", &[("a", 1.0)])];
        let mut resolver = CompositionResolver::new(&items);

        // b is resolved on a's chain, where its edge back to a is the cycle
        let resolution = resolver.resolve_item(&items[0]);
        assert_eq!(resolution.depth, 2);
        assert_eq!(resolver.depth(&items[1]), 1);

        let looped = vec![crafted("ouroboros", &[("ouroboros", 2.0)])];
        let mut resolver = CompositionResolver::new(&looped);
        assert_eq!(resolver.depth(&looped[0]), 1);
    }

    #[test]
    fn test_self_reference_terminates_empty() {
        let items = vec![crafted("ouroboros", &[("ouroboros", 2.0)])];
        let mut resolver = CompositionResolver::new(&items);
        assert!(resolver.decompose(&items[0]).is_empty());
    }

    #[test]
    fn test_cycle_edge_only_drops_that_edge() {
        let items = vec![
            crafted("a", &[("b", 1.0), ("plank", 2.0)]),
            crafted("b", &[("a", 1.0)]),
            base("plank", &["wood"]),
        ];
        let mut resolver = CompositionResolver::new(&items);
        assert_eq!(resolver.decompose(&items[0]), comp(&[("wood", 2.0)]));
    }

    #[test]
    fn test_missing_component_is_skipped() {
        let items = vec![
            crafted("lamp", &[("bulb", 1.0), ("unobtainium", 9.0)]),
            base("bulb", &["glass"]),
        ];
        let mut resolver = CompositionResolver::new(&items);
        assert_eq!(resolver.decompose(&items[0]), comp(&[("glass", 1.0)]));
    }

    #[test]
    fn test_unresolvable_item_is_empty() {
        let items = vec![CatalogItem::new("rock", "rock")];
        let mut resolver = CompositionResolver::new(&items);
        assert!(resolver.decompose(&items[0]).is_empty());
        assert_eq!(resolver.depth(&items[0]), 0);
    }

    #[test]
    fn test_memoized_and_idempotent() {
        let items = vec![
            base("plank", &["wood"]),
            crafted("crate", &[("plank", 6.0)]),
            crafted("pallet", &[("plank", 3.0)]),
        ];
        let mut resolver = CompositionResolver::new(&items);
        assert!(!resolver.is_resolved("plank"));

        let first = resolver.decompose(&items[1]);
        assert!(resolver.is_resolved("plank"));
        assert!(resolver.is_resolved("crate"));
        assert!(!resolver.is_resolved("pallet"));

        let second = resolver.decompose(&items[1]);
        assert_eq!(first, second);
        assert_eq!(resolver.decompose(&items[2]), comp(&[("wood", 3.0)]));
    }

    #[test]
    fn test_detached_item_uses_arena_components() {
        let items = vec![base("plank", &["wood"])];
        let mut resolver = CompositionResolver::new(&items);
        let shelf = crafted("shelf", &[("plank", 3.0)]);

        let resolution = resolver.resolve_item(&shelf);
        assert_eq!(resolution.composition, comp(&[("wood", 3.0)]));
        assert_eq!(resolution.depth, 1);
        assert!(!resolver.contains("shelf"));
        assert_eq!(resolver.decompose_id("shelf"), None);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let depth = 20_000;
        let mut items: Vec<CatalogItem> = (0..depth)
            .map(|i| crafted(&format!("stage{i}"), &[(format!("stage{}", i + 1).as_str(), 1.0)]))
            .collect();
        items.push(base(&format!("stage{depth}"), &["ore"]));

        let mut resolver = CompositionResolver::new(&items);
        let resolution = resolver.resolve_item(&items[0]);
        assert_eq!(resolution.composition, comp(&[("ore", 1.0)]));
        assert_eq!(resolution.depth, depth as u32);
    }
}
