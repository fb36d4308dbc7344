use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Boundary-polygon dataset (GeoJSON FeatureCollection)
// ---------------------------------------------------------------------------

/// Minimal view of a GeoJSON FeatureCollection: we only need each feature's
/// properties for the name join; geometries pass through untouched for the
/// downstream renderer.
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: serde_json::Map<String, JsonValue>,
}

/// Parsed boundary polygons plus the set of region names extracted from the
/// configured property key.
#[derive(Debug, Clone)]
pub struct BoundaryDataset {
    /// Region names available for the choropleth join.
    pub region_names: BTreeSet<String>,
    /// The original GeoJSON document, forwarded verbatim to the renderer.
    pub raw: JsonValue,
}

impl BoundaryDataset {
    pub fn contains_region(&self, name: &str) -> bool {
        self.region_names.contains(name)
    }
}

/// Load the boundary-polygon file if present.
///
/// A missing file is not an error: the map renders without the choropleth
/// layer and the caller emits a warning notice. A file that exists but does
/// not parse as GeoJSON is a real [`LoadError`].
pub fn load_boundaries(path: &Path, name_key: &str) -> Result<Option<BoundaryDataset>, LoadError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("boundary file {} not found; choropleth disabled", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let raw: JsonValue = serde_json::from_str(&text)?;
    let collection: FeatureCollection = serde_json::from_value(raw.clone())?;

    let mut region_names = BTreeSet::new();
    for (i, feature) in collection.features.iter().enumerate() {
        match feature.properties.get(name_key).and_then(JsonValue::as_str) {
            Some(name) => {
                region_names.insert(name.to_string());
            }
            None => debug!("feature {i} has no string property '{name_key}', skipping"),
        }
    }

    info!(
        "loaded {} boundary features ({} named) from {}",
        collection.features.len(),
        region_names.len(),
        path.display()
    );
    Ok(Some(BoundaryDataset { region_names, raw }))
}
