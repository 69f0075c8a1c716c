//! Real-world materials ingestion
//!
//! Reads material records either as a flat JSON list or as a saved SPARQL
//! result (`results.bindings`), and merges several sources by id.

use crate::record::{as_number, as_string_list, non_empty_str, read_json, LoadOutcome};
use ahash::AHashMap;
use matledger_core::{RealWorldMaterial, Result};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

pub struct MaterialsLoader;

impl MaterialsLoader {
    /// Load one file. An unreadable or malformed file is an error.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<LoadOutcome<RealWorldMaterial>> {
        let path = path.as_ref();
        let value = read_json(path)?;
        let mut outcome = Self::parse(&value);
        outcome.files_read = 1;
        debug!(
            path = %path.display(),
            materials = outcome.records.len(),
            skipped = outcome.skipped,
            "materials file parsed"
        );
        Ok(outcome)
    }

    /// Load several files and deduplicate by id.
    ///
    /// A later record replaces an earlier one with the same id; the
    /// replacement keeps the position of the first occurrence.
    pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<LoadOutcome<RealWorldMaterial>> {
        let mut merged = LoadOutcome::default();
        let mut positions: AHashMap<String, usize> = AHashMap::new();

        for path in paths {
            let outcome = Self::load_file(path)?;
            merged.files_read += outcome.files_read;
            merged.skipped += outcome.skipped;

            for material in outcome.records {
                match positions.get(&material.id) {
                    Some(&i) => merged.records[i] = material,
                    None => {
                        positions.insert(material.id.clone(), merged.records.len());
                        merged.records.push(material);
                    }
                }
            }
        }

        info!(
            materials = merged.records.len(),
            skipped = merged.skipped,
            files = merged.files_read,
            "real-world materials loaded"
        );
        Ok(merged)
    }

    /// Parse an already-decoded document of either supported shape
    pub fn parse(value: &Value) -> LoadOutcome<RealWorldMaterial> {
        match bindings(value) {
            Some(rows) => collect(rows, parse_binding),
            None => collect(value.as_array().map_or(&[][..], Vec::as_slice), parse_record),
        }
    }
}

fn collect<F>(rows: &[Value], parse_row: F) -> LoadOutcome<RealWorldMaterial>
where
    F: Fn(&Value) -> Option<RealWorldMaterial>,
{
    let mut outcome = LoadOutcome::default();
    for row in rows {
        match parse_row(row) {
            Some(material) => outcome.records.push(material),
            None => outcome.skipped += 1,
        }
    }
    outcome
}

fn bindings(value: &Value) -> Option<&[Value]> {
    value
        .get("results")?
        .get("bindings")?
        .as_array()
        .map(Vec::as_slice)
}

/// Flat record: `id` (or `qid`), `label`, optional description, properties, aliases
pub fn parse_record(raw: &Value) -> Option<RealWorldMaterial> {
    let obj = raw.as_object()?;
    let id = non_empty_str(obj.get("id")).or_else(|| non_empty_str(obj.get("qid")))?;

    let mut material = RealWorldMaterial::new(
        id,
        obj.get("label").and_then(Value::as_str).unwrap_or_default(),
    );
    material.description = non_empty_str(obj.get("description")).map(str::to_string);
    material.density = obj.get("density").and_then(as_number);
    material.melting_point = obj.get("melting_point").and_then(as_number);
    material.tensile_strength = obj.get("tensile_strength").and_then(as_number);
    material.thermal_conductivity = obj.get("thermal_conductivity").and_then(as_number);
    material.aliases = obj
        .get("aliases")
        .map(as_string_list)
        .unwrap_or_default()
        .into_iter()
        .collect();
    Some(material)
}

/// SPARQL binding row; the id is the last path segment of the entity URI
pub fn parse_binding(row: &Value) -> Option<RealWorldMaterial> {
    let uri = non_empty_str(row.get("material").and_then(|m| m.get("value")))?;
    let id = uri.rsplit('/').next().filter(|s| !s.is_empty())?;

    let field = |name: &str| row.get(name).and_then(|b| b.get("value"));

    let mut material = RealWorldMaterial::new(
        id,
        field("materialLabel").and_then(Value::as_str).unwrap_or_default(),
    );
    material.description = non_empty_str(field("materialDescription")).map(str::to_string);
    material.density = field("density").and_then(as_number);
    material.melting_point = field("melting_point").and_then(as_number);
    material.tensile_strength = field("tensile_strength").and_then(as_number);
    material.thermal_conductivity = field("thermal_conductivity").and_then(as_number);
    Some(material)
}
