//! Viewer configuration.
//!
//! Every field has a default; a JSON config only needs the fields it
//! changes.

use crate::error::ViewError;
use serde::{Deserialize, Serialize};

/// Default grid overlay locator pattern.
pub const DEFAULT_GRID_PATTERN: &str =
    "grids/{kmlId}/{urlEncodedName}_{reformattedDate}_grid.geojson";

/// Fixed file name of the exported catalog.
pub const DEFAULT_EXPORT_FILENAME: &str = "parcels.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    /// Catalog document (JSON array of parcels)
    pub catalog_url: String,
    /// Statistics table (CSV)
    pub statistics_url: String,
    /// Parcel boundaries (KML), handed to the map widget
    pub boundaries_url: String,
    /// Grid locator pattern used when a parcel has no `gridBaseUrl`
    pub grid_pattern: String,
    pub export_filename: String,
    /// Grid feature property holding the mean vegetation index
    pub vegetation_property: String,
    /// Grid feature property holding the mean elevation
    pub elevation_property: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            catalog_url: "data/parcels.json".to_string(),
            statistics_url: "data/ndvi_stats.csv".to_string(),
            boundaries_url: "data/parcels.kml".to_string(),
            grid_pattern: DEFAULT_GRID_PATTERN.to_string(),
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
            vegetation_property: "ndvi_mean".to_string(),
            elevation_property: "elevation_mean".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(source: &str) -> Result<Self, ViewError> {
        Ok(serde_json::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config =
            ViewerConfig::from_json(r#"{"catalogUrl":"https://x/parcels.json"}"#).unwrap();
        assert_eq!(config.catalog_url, "https://x/parcels.json");
        assert_eq!(config.grid_pattern, DEFAULT_GRID_PATTERN);
        assert_eq!(config.export_filename, "parcels.json");
    }
}
