//! Game catalog ingestion
//!
//! Crawls a directory tree of JSON files. Each file holds a list of item
//! records, or an object with an `items` list. Records are validated one by
//! one; a bad record or an unreadable file is counted and skipped.

use crate::record::{as_number, as_string_list, as_text, non_empty_str, read_json, LoadOutcome};
use matledger_core::{CatalogItem, Recipe, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct CatalogLoader {
    root_dir: PathBuf,
}

impl CatalogLoader {
    pub fn new<P: AsRef<Path>>(root_dir: P) -> Self {
        Self {
            root_dir: root_dir.as_ref().to_path_buf(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Load every item under the root directory.
    ///
    /// Fails only when the root itself cannot be listed.
    pub fn load(&self) -> Result<LoadOutcome<CatalogItem>> {
        let mut outcome = LoadOutcome::default();

        for path in self.json_files()? {
            let value = match read_json(&path) {
                Ok(value) => value,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable catalog file");
                    outcome.files_failed += 1;
                    continue;
                }
            };
            outcome.files_read += 1;

            for raw in records(&value) {
                match parse_item(raw) {
                    Some(item) => outcome.records.push(item),
                    None => outcome.skipped += 1,
                }
            }
        }

        info!(
            items = outcome.records.len(),
            skipped = outcome.skipped,
            files = outcome.files_read,
            failed = outcome.files_failed,
            "catalog loaded"
        );
        Ok(outcome)
    }

    /// `*.json` files under the root, depth-first, sorted per directory
    fn json_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![self.root_dir.clone()];
        let mut is_root = true;

        while let Some(dir) = pending.pop() {
            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if is_root => return Err(e.into()),
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                    continue;
                }
            };
            is_root = false;

            let mut paths: Vec<PathBuf> =
                entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
            paths.sort();

            let mut subdirs = Vec::new();
            for path in paths {
                if path.is_dir() {
                    subdirs.push(path);
                } else if path.extension().is_some_and(|ext| ext == "json") {
                    files.push(path);
                }
            }
            pending.extend(subdirs.into_iter().rev());
        }

        Ok(files)
    }
}

fn records(value: &Value) -> &[Value] {
    match value {
        Value::Array(list) => list.as_slice(),
        Value::Object(obj) => obj
            .get("items")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice),
        _ => &[],
    }
}

/// Validate and normalize one raw item record
pub fn parse_item(raw: &Value) -> Option<CatalogItem> {
    let Some(obj) = raw.as_object() else {
        debug!("skipping non-object catalog record");
        return None;
    };
    let Some(id) = non_empty_str(obj.get("id")) else {
        debug!("skipping catalog record without id");
        return None;
    };

    let mut item = CatalogItem::new(id, obj.get("name").and_then(as_text).unwrap_or_default());
    item.weight = obj.get("weight").and_then(as_number);
    item.volume = obj.get("volume").and_then(as_number);
    item.price = obj.get("price").and_then(as_number);
    item.materials = obj.get("material").map(as_string_list).unwrap_or_default();
    item.recipes = obj
        .get("recipes")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(parse_recipe).collect())
        .unwrap_or_default();

    Some(item)
}

fn parse_recipe(raw: &Value) -> Option<Recipe> {
    let obj = raw.as_object()?;
    let mut recipe = Recipe::new();
    for (component, quantity) in obj {
        match as_number(quantity) {
            Some(q) => recipe = recipe.with(component.as_str(), q),
            None => debug!(component = %component, "ignoring recipe component without quantity"),
        }
    }
    Some(recipe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use matledger_core::ItemKind;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_parse_item_lenient_fields() {
        let raw = json!({
            "id": "knife_steak",
            "name": {"str": "steak knife"},
            "weight": "90 g",
            "volume": 0.25,
            "price": 800,
            "material": ["steel", "wood"],
        });
        let item = parse_item(&raw).unwrap();
        assert_eq!(item.name, "steak knife");
        assert_eq!(item.weight, Some(90.0));
        assert_eq!(item.volume, Some(0.25));
        assert_eq!(item.price, Some(800.0));
        assert_eq!(item.materials, vec!["steel", "wood"]);
        assert_eq!(item.kind(), ItemKind::Base);
    }

    #[test]
    fn test_parse_item_recipes() {
        let raw = json!({
            "id": "spear",
            "name": "spear",
            "recipes": [{"stick": 1, "knife_steak": 1}, "garbage", {"rope": "2"}],
        });
        let item = parse_item(&raw).unwrap();
        assert_eq!(item.recipes.len(), 2);
        assert_eq!(item.recipes[1].components[0].quantity, 2.0);
        assert_eq!(item.kind(), ItemKind::Composite);
    }

    #[test]
    fn test_parse_item_requires_id() {
        assert!(parse_item(&json!({"name": "nameless"})).is_none());
        assert!(parse_item(&json!({"id": "  "})).is_none());
        assert!(parse_item(&json!({"id": 42})).is_none());
        assert!(parse_item(&json!("not an object")).is_none());
    }

    #[test]
    fn test_load_directory_tree() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("items").join("tools");
        fs::create_dir_all(&nested).unwrap();

        fs::write(
            dir.path().join("a.json"),
            json!([{"id": "plank", "material": "wood"}, {"name": "no id"}]).to_string(),
        )
        .unwrap();
        fs::write(
            nested.join("b.json"),
            json!({"items": [{"id": "hammer", "recipes": [{"plank": 1}]}]}).to_string(),
        )
        .unwrap();
        fs::write(nested.join("broken.json"), "{ not json").unwrap();
        fs::write(nested.join("notes.txt"), "ignored").unwrap();

        let outcome = CatalogLoader::new(dir.path()).load().unwrap();
        let ids: Vec<&str> = outcome.records.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["plank", "hammer"]);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.files_read, 2);
        assert_eq!(outcome.files_failed, 1);
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CatalogLoader::new(dir.path().join("missing")).load().is_err());
    }
}
