use crate::material::Property;
use crate::vector::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Base-material name -> quantity
pub type Composition = BTreeMap<String, f64>;

/// Property -> quantity-weighted mean value
pub type PropertyMap = BTreeMap<Property, f64>;

/// One component slot of a recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeComponent {
    pub item_id: String,
    pub quantity: f64,
}

/// A crafting recipe: the component items consumed, in declaration order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub components: SmallVec<[RecipeComponent; 4]>,
}

impl Recipe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, item_id: impl Into<String>, quantity: f64) -> Self {
        self.components.push(RecipeComponent {
            item_id: item_id.into(),
            quantity,
        });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.components
            .iter()
            .map(|c| (c.item_id.as_str(), c.quantity))
    }
}

/// How an item's composition is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Explicit material list
    Base,
    /// Derived recursively from recipes
    Composite,
    /// Neither materials nor recipes
    Unresolvable,
}

/// A crafted item from the game catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<Composition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyMap>,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.materials.push(material.into());
        self
    }

    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipes.push(recipe);
        self
    }

    pub fn with_embedding(mut self, embedding: Vector) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn kind(&self) -> ItemKind {
        if !self.materials.is_empty() {
            ItemKind::Base
        } else if self.recipes.iter().any(|r| !r.components.is_empty()) {
            ItemKind::Composite
        } else {
            ItemKind::Unresolvable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_kind() {
        let base = CatalogItem::new("plank", "wooden plank").with_material("wood");
        assert_eq!(base.kind(), ItemKind::Base);

        let composite =
            CatalogItem::new("table", "table").with_recipe(Recipe::new().with("plank", 4.0));
        assert_eq!(composite.kind(), ItemKind::Composite);

        assert_eq!(CatalogItem::new("rock", "rock").kind(), ItemKind::Unresolvable);
        let empty_recipe = CatalogItem::new("ghost", "ghost").with_recipe(Recipe::new());
        assert_eq!(empty_recipe.kind(), ItemKind::Unresolvable);
    }

    #[test]
    fn test_materials_win_over_recipes() {
        let item = CatalogItem::new("ingot", "steel ingot")
            .with_material("steel")
            .with_recipe(Recipe::new().with("scrap", 2.0));
        assert_eq!(item.kind(), ItemKind::Base);
    }
}
