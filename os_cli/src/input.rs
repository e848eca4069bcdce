use crate::error::{CliError, CliResult};
use os_filter::log_debug;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Records from a JSON array, or the `properties` of a GeoJSON FeatureCollection
pub fn load_records(path: &Path) -> CliResult<Vec<Arc<Value>>> {
    let text = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    let document: Value = serde_json::from_str(&text).map_err(|e| CliError::json(path, e))?;

    let records = records_from(document).ok_or_else(|| CliError::UnsupportedInput {
        path: path.to_path_buf(),
    })?;

    log_debug!("Records loaded", "path" => path.display(), "count" => records.len());
    Ok(records)
}

fn records_from(document: Value) -> Option<Vec<Arc<Value>>> {
    match document {
        Value::Array(items) => Some(items.into_iter().map(Arc::new).collect()),
        Value::Object(mut object) => {
            if object.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
                return None;
            }
            let Some(Value::Array(features)) = object.remove("features") else {
                return None;
            };
            Some(features.into_iter().map(feature_properties).collect())
        }
        _ => None,
    }
}

/// A feature without properties is an empty record
fn feature_properties(feature: Value) -> Arc<Value> {
    match feature {
        Value::Object(mut feature) => match feature.remove("properties") {
            Some(properties @ Value::Object(_)) => Arc::new(properties),
            _ => Arc::new(Value::Object(Map::new())),
        },
        _ => Arc::new(Value::Object(Map::new())),
    }
}
