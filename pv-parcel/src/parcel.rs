use chrono::NaiveDate;
use pv_utils::dates::parse_ui_date;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Suffix that marks the NDVI variant of a date key.
pub const NDVI_SUFFIX: &str = "-NDVI";

/// Imagery kind for a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    Rgb,
    Ndvi,
}

impl Variant {
    /// The variant the UI asks for given the NDVI toggle.
    pub fn requested(ndvi: bool) -> Self {
        if ndvi {
            Variant::Ndvi
        } else {
            Variant::Rgb
        }
    }

    /// Composite `layers` key for `date` in this variant.
    pub fn key(self, date: &str) -> String {
        match self {
            Variant::Rgb => date.to_string(),
            Variant::Ndvi => format!("{}{}", date, NDVI_SUFFIX),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Rgb => write!(f, "RGB"),
            Variant::Ndvi => write!(f, "NDVI"),
        }
    }
}

/// Split a `layers` key into its date part and variant.
pub fn split_layer_key(key: &str) -> (&str, Variant) {
    match key.strip_suffix(NDVI_SUFFIX) {
        Some(date) => (date, Variant::Ndvi),
        None => (key, Variant::Rgb),
    }
}

/// Comparison form of a kmlId: trimmed and lowercased.
pub fn normalize_kml_id(kml_id: &str) -> String {
    kml_id.trim().to_lowercase()
}

/// One agricultural field and its imagery.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parcel {
    /// Operator-assigned primary key
    pub id: String,
    /// Identifier of the boundary polygon in the KML document
    pub kml_id: String,
    #[serde(default)]
    pub name: String,
    /// Village or group the parcel belongs to
    #[serde(default)]
    pub location: String,
    /// Whether the statistics table has rows for this parcel
    #[serde(default)]
    pub csv_available: bool,
    /// Replaces the default grid overlay naming convention when set
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub grid_base_url: Option<String>,
    /// `DD-MM-YYYY` or `DD-MM-YYYY-NDVI` to tile URL template
    #[serde(default)]
    pub layers: BTreeMap<String, String>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

impl Parcel {
    /// Case-insensitive, whitespace-trimmed kmlId comparison.
    pub fn kml_matches(&self, kml_id: &str) -> bool {
        normalize_kml_id(&self.kml_id) == normalize_kml_id(kml_id)
    }

    /// Tile template for `date` in the given variant, if present.
    pub fn layer(&self, date: &str, variant: Variant) -> Option<&str> {
        self.layers.get(&variant.key(date)).map(String::as_str)
    }

    /// Dates that have an RGB layer, oldest first.
    ///
    /// Keys that are not real `DD-MM-YYYY` dates cannot be placed on the
    /// timeline and are left out.
    pub fn available_dates(&self) -> Vec<String> {
        let mut dated: Vec<(NaiveDate, &str)> = self
            .layers
            .keys()
            .filter_map(|key| match split_layer_key(key) {
                (date, Variant::Rgb) => match parse_ui_date(date) {
                    Ok(parsed) => Some((parsed, date)),
                    Err(e) => {
                        log::debug!(
                            "[PV] parcel {}: skipping layer key '{}': {}",
                            self.id,
                            key,
                            e
                        );
                        None
                    }
                },
                (_, Variant::Ndvi) => None,
            })
            .collect();
        dated.sort();
        dated.into_iter().map(|(_, date)| date.to_string()).collect()
    }

    /// True when the NDVI variant exists for `date`.
    pub fn has_ndvi(&self, date: &str) -> bool {
        self.layer(date, Variant::Ndvi).is_some()
    }

    /// True when any date carries NDVI imagery.
    pub fn has_any_ndvi(&self) -> bool {
        self.layers
            .keys()
            .any(|key| split_layer_key(key).1 == Variant::Ndvi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parcel(layers: &[(&str, &str)]) -> Parcel {
        Parcel {
            id: "f1".to_string(),
            kml_id: "42".to_string(),
            name: "North Field".to_string(),
            location: "Ayvalı".to_string(),
            csv_available: true,
            grid_base_url: None,
            layers: layers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_has_any_ndvi() {
        assert!(parcel(&[("01-06-2024", "a"), ("15-06-2024-NDVI", "b")]).has_any_ndvi());
        assert!(!parcel(&[("01-06-2024", "a")]).has_any_ndvi());
        assert!(!parcel(&[]).has_any_ndvi());
    }

    #[test]
    fn test_split_layer_key() {
        assert_eq!(split_layer_key("01-06-2024"), ("01-06-2024", Variant::Rgb));
        assert_eq!(split_layer_key("01-06-2024-NDVI"), ("01-06-2024", Variant::Ndvi));
    }

    #[test]
    fn test_available_dates_are_chronological_rgb_only() {
        let p = parcel(&[
            ("15-07-2024", "a"),
            ("01-06-2024", "b"),
            ("01-06-2024-NDVI", "c"),
            ("20-05-2024-NDVI", "d"),
            ("03-01-2025", "e"),
        ]);
        assert_eq!(
            p.available_dates(),
            vec!["01-06-2024", "15-07-2024", "03-01-2025"]
        );
    }

    #[test]
    fn test_available_dates_skips_unparseable_keys() {
        let p = parcel(&[("2024-06-01", "a"), ("latest", "b"), ("02-06-2024", "c")]);
        assert_eq!(p.available_dates(), vec!["02-06-2024"]);
    }

    #[test]
    fn test_kml_matches_is_trimmed_and_case_insensitive() {
        let mut p = parcel(&[]);
        p.kml_id = "Ada-12".to_string();
        assert!(p.kml_matches("  ada-12 "));
        assert!(!p.kml_matches("ada-1"));
    }

    #[test]
    fn test_deserialize_defaults_and_blank_grid_base() {
        let p: Parcel = serde_json::from_str(
            r#"{"id":"f1","kmlId":"42","gridBaseUrl":"  "}"#,
        )
        .unwrap();
        assert_eq!(p.grid_base_url, None);
        assert!(!p.csv_available);
        assert!(p.layers.is_empty());

        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("gridBaseUrl"));
        assert!(json.contains("\"kmlId\":\"42\""));
    }
}
