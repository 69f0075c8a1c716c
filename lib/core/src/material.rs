use crate::vector::Vector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Physical attributes tracked for every real-world material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Density,
    MeltingPoint,
    TensileStrength,
    ThermalConductivity,
}

impl Property {
    pub const ALL: [Property; 4] = [
        Property::Density,
        Property::MeltingPoint,
        Property::TensileStrength,
        Property::ThermalConductivity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Property::Density => "density",
            Property::MeltingPoint => "melting_point",
            Property::TensileStrength => "tensile_strength",
            Property::ThermalConductivity => "thermal_conductivity",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A material record from the real-world physical-properties catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RealWorldMaterial {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub density: Option<f64>,
    #[serde(default)]
    pub melting_point: Option<f64>,
    #[serde(default)]
    pub tensile_strength: Option<f64>,
    #[serde(default)]
    pub thermal_conductivity: Option<f64>,
    #[serde(default)]
    pub aliases: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vector>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl RealWorldMaterial {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_property(mut self, property: Property, value: f64) -> Self {
        *self.property_slot(property) = Some(value);
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into());
        self
    }

    pub fn with_embedding(mut self, embedding: Vector) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn property(&self, property: Property) -> Option<f64> {
        match property {
            Property::Density => self.density,
            Property::MeltingPoint => self.melting_point,
            Property::TensileStrength => self.tensile_strength,
            Property::ThermalConductivity => self.thermal_conductivity,
        }
    }

    fn property_slot(&mut self, property: Property) -> &mut Option<f64> {
        match property {
            Property::Density => &mut self.density,
            Property::MeltingPoint => &mut self.melting_point,
            Property::TensileStrength => &mut self.tensile_strength,
            Property::ThermalConductivity => &mut self.thermal_conductivity,
        }
    }

    pub fn has_aliases(&self) -> bool {
        !self.aliases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_accessors() {
        let iron = RealWorldMaterial::new("Q677", "iron")
            .with_property(Property::Density, 7.874)
            .with_property(Property::MeltingPoint, 1811.0);

        assert_eq!(iron.property(Property::Density), Some(7.874));
        assert_eq!(iron.property(Property::MeltingPoint), Some(1811.0));
        assert_eq!(iron.property(Property::TensileStrength), None);
        assert!(!iron.has_aliases());
    }

    #[test]
    fn test_property_serializes_snake_case() {
        let json = serde_json::to_string(&Property::ThermalConductivity).unwrap();
        assert_eq!(json, "\"thermal_conductivity\"");
    }
}
