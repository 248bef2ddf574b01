//! Grid overlay resolution.
//!
//! Each (parcel, date) may have a GeoJSON grid whose cells carry a mean
//! vegetation index and a mean elevation. Overlay files are named with the
//! date month-first (`MM-DD-YYYY`) even though the catalog is day-first.
//!
//! Fetches are asynchronous and may land after the user has moved on, so
//! every request carries the generation it was issued under; see
//! [`crate::viewer::Viewer::apply_grid_response`].

use crate::config::ViewerConfig;
use crate::error::ViewError;
use pv_db::models::normalize_vegetation;
use pv_parcel::parcel::Parcel;
use pv_utils::dates::ui_to_grid_date;
use pv_utils::urls::{encode_component, join};
use serde::Serialize;
use serde_json::{json, Value};

/// Locator of the grid overlay for `parcel` on `date` (`DD-MM-YYYY`).
///
/// A parcel's `gridBaseUrl` wins over `default_pattern`. Returns `None`
/// when `date` is not a `DD-MM-YYYY` string.
pub fn grid_locator(parcel: &Parcel, date: &str, default_pattern: &str) -> Option<String> {
    let grid_date = ui_to_grid_date(date)?;
    let encoded_name = encode_component(parcel.name.trim());
    let locator = match parcel.grid_base_url.as_deref() {
        Some(base) => join(base, &format!("{}_{}_grid.geojson", encoded_name, grid_date)),
        None => default_pattern
            .replace("{kmlId}", parcel.kml_id.trim())
            .replace("{urlEncodedName}", &encoded_name)
            .replace("{reformattedDate}", &grid_date),
    };
    Some(locator)
}

/// An overlay fetch the renderer should perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRequest {
    pub generation: u64,
    pub parcel_id: String,
    pub date: String,
    pub locator: String,
}

/// One labelled grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLabel {
    /// Index into the overlay's `features`
    pub feature_index: usize,
    pub vegetation: f64,
    pub elevation: f64,
    pub text: String,
}

/// Overlay ready for the map: only labelled features are kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridOverlay {
    pub geojson: Value,
    pub labels: Vec<GridLabel>,
}

fn number(properties: &Value, name: &str) -> Option<f64> {
    properties
        .get(name)?
        .as_f64()
        .filter(|v| v.is_finite())
}

/// Parse a grid overlay document.
///
/// Features missing either property are dropped; that is not an error.
pub fn parse_overlay(body: &str, config: &ViewerConfig) -> Result<GridOverlay, ViewError> {
    let doc: Value = serde_json::from_str(body)?;
    let features = doc
        .get("features")
        .and_then(Value::as_array)
        .ok_or(ViewError::GridFormat("document has no features array"))?;

    let mut kept = Vec::new();
    let mut labels = Vec::new();
    for feature in features {
        let Some(properties) = feature.get("properties") else {
            continue;
        };
        let (Some(vegetation), Some(elevation)) = (
            number(properties, &config.vegetation_property),
            number(properties, &config.elevation_property),
        ) else {
            continue;
        };
        let vegetation = normalize_vegetation(vegetation);
        labels.push(GridLabel {
            feature_index: kept.len(),
            vegetation,
            elevation,
            text: format!("NDVI {:.2} · {:.0} m", vegetation, elevation),
        });
        kept.push(feature.clone());
    }
    log::debug!(
        "[PV] grid: {} of {} features labelled",
        labels.len(),
        features.len()
    );

    Ok(GridOverlay {
        geojson: json!({ "type": "FeatureCollection", "features": kept }),
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const PATTERN: &str = "grids/{kmlId}/{urlEncodedName}_{reformattedDate}_grid.geojson";

    fn parcel(grid_base_url: Option<&str>) -> Parcel {
        Parcel {
            id: "f1".to_string(),
            kml_id: "42".to_string(),
            name: "Kuzey Tarla".to_string(),
            location: "Bademli".to_string(),
            csv_available: true,
            grid_base_url: grid_base_url.map(str::to_string),
            layers: BTreeMap::new(),
        }
    }

    #[test]
    fn default_pattern_uses_month_first_date() {
        assert_eq!(
            grid_locator(&parcel(None), "01-06-2024", PATTERN).unwrap(),
            "grids/42/Kuzey%20Tarla_06-01-2024_grid.geojson"
        );
    }

    #[test]
    fn grid_base_url_overrides_pattern() {
        assert_eq!(
            grid_locator(&parcel(Some("https://cdn/grids/")), "15-09-2023", PATTERN).unwrap(),
            "https://cdn/grids/Kuzey%20Tarla_09-15-2023_grid.geojson"
        );
    }

    #[test]
    fn bad_date_has_no_locator() {
        assert!(grid_locator(&parcel(None), "2024-06-01", PATTERN).is_none());
    }

    #[test]
    fn features_without_both_properties_are_skipped() {
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"ndvi_mean":0.614,"elevation_mean":412.4},"geometry":null},
            {"type":"Feature","properties":{"ndvi_mean":0.5},"geometry":null},
            {"type":"Feature","properties":{"ndvi_mean":"0.3","elevation_mean":"398"},"geometry":null},
            {"type":"Feature","properties":{"ndvi_mean":null,"elevation_mean":400},"geometry":null},
            {"type":"Feature","geometry":null}
        ]}"#;
        let overlay = parse_overlay(body, &ViewerConfig::default()).unwrap();
        assert_eq!(overlay.labels.len(), 1);
        assert_eq!(overlay.labels[0].text, "NDVI 0.61 · 412 m");
        assert_eq!(overlay.geojson["features"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn quoted_numbers_are_not_numeric() {
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"ndvi_mean":"0.3","elevation_mean":398},"geometry":null},
            {"type":"Feature","properties":{"ndvi_mean":0.3,"elevation_mean":"398"},"geometry":null},
            {"type":"Feature","properties":{"ndvi_mean":0.3,"elevation_mean":398},"geometry":null}
        ]}"#;
        let overlay = parse_overlay(body, &ViewerConfig::default()).unwrap();
        assert_eq!(overlay.labels.len(), 1);
        assert_eq!(overlay.labels[0].feature_index, 0);
        assert_eq!(overlay.labels[0].text, "NDVI 0.30 · 398 m");
    }

    #[test]
    fn unusable_documents_are_errors() {
        let config = ViewerConfig::default();
        assert!(parse_overlay("<html>404</html>", &config).is_err());
        assert!(parse_overlay(r#"{"type":"Feature"}"#, &config).is_err());
    }
}
