//! Ledger export
//!
//! The ledger is an ordered JSON list, one record per material match,
//! written atomically so a crashed run never leaves a truncated file.

use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::{DateTime, Utc};
use matledger_core::{CatalogItem, Error, PropertyMap, RealWorldMaterial, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRef {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: String,
    pub name: String,
}

/// One reconciled record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub real_world: MaterialRef,
    pub catalog: ItemRef,
    pub properties: Option<PropertyMap>,
    pub price: Option<f64>,
    pub confidence_score: f32,
    pub review_needed: bool,
    /// Other plausible catalog ids, best first; only for flagged matches
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
}

impl LedgerEntry {
    pub fn new(
        material: &RealWorldMaterial,
        item: &CatalogItem,
        confidence_score: f32,
        review_needed: bool,
    ) -> Self {
        Self {
            real_world: MaterialRef {
                id: material.id.clone(),
                label: material.label.clone(),
                description: material.description.clone(),
            },
            catalog: ItemRef {
                id: item.id.clone(),
                name: item.name.clone(),
            },
            properties: item.properties.clone(),
            price: item.price,
            confidence_score,
            review_needed,
            alternatives: Vec::new(),
        }
    }

    pub fn with_alternatives(mut self, alternatives: Vec<String>) -> Self {
        self.alternatives = alternatives;
        self
    }
}

/// What an export wrote
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub records: usize,
    /// SHA-256 of the written bytes, lowercase hex
    pub checksum: String,
    pub written_at: DateTime<Utc>,
}

pub struct LedgerExporter {
    output_path: PathBuf,
}

impl LedgerExporter {
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        Self {
            output_path: output_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }

    pub fn export(&self, entries: &[LedgerEntry]) -> Result<ExportSummary> {
        let data = serde_json::to_vec_pretty(entries)?;

        if let Some(parent) = self.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = AtomicFile::new(&self.output_path, OverwriteBehavior::AllowOverwrite);
        file.write(|f| f.write_all(&data)).map_err(|e| match e {
            atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => Error::Io(e),
        })?;

        let summary = ExportSummary {
            path: self.output_path.clone(),
            records: entries.len(),
            checksum: format!("{:x}", Sha256::digest(&data)),
            written_at: Utc::now(),
        };
        info!(
            path = %summary.path.display(),
            records = summary.records,
            checksum = %summary.checksum,
            "ledger exported"
        );
        Ok(summary)
    }

    /// Read a previously exported ledger
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<LedgerEntry>> {
        let data = std::fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matledger_core::Property;

    fn entry() -> LedgerEntry {
        let material = RealWorldMaterial::new("Q11427", "steel").with_description("alloy");
        let mut item = CatalogItem::new("steel_chunk", "chunk of steel").with_material("steel");
        item.price = Some(12.5);
        item.properties = Some(PropertyMap::from([(Property::Density, 7.85)]));
        LedgerEntry::new(&material, &item, 0.91, false)
    }

    #[test]
    fn test_entry_shape() {
        let value = serde_json::to_value(entry()).unwrap();
        assert_eq!(value["real_world"]["id"], "Q11427");
        assert_eq!(value["catalog"]["name"], "chunk of steel");
        assert_eq!(value["properties"]["density"], 7.85);
        assert_eq!(value["price"], 12.5);
        assert_eq!(value["review_needed"], false);
        assert!(value.get("alternatives").is_none());
    }

    #[test]
    fn test_export_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("ledger.json");
        let entries = vec![
            entry(),
            entry().with_alternatives(vec!["steel_lump".to_string()]),
        ];

        let summary = LedgerExporter::new(&path).export(&entries).unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(summary.checksum.len(), 64);

        let loaded = LedgerExporter::load(&path).unwrap();
        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_export_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = LedgerExporter::new(dir.path().join("ledger.json"));
        let first = exporter.export(&[entry()]).unwrap();
        let second = exporter.export(&[entry()]).unwrap();
        assert_eq!(first.checksum, second.checksum);
    }
}
