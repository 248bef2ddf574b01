//! Catalog editor: validates a form submission and commits it to the store.
//!
//! Validation stops at the first violation and nothing is written unless
//! the whole submission passes.

use crate::catalog::CatalogStore;
use crate::error::EditorError;
use crate::parcel::{split_layer_key, Parcel, Variant};
use crate::tile::missing_placeholders;
use pv_utils::dates::parse_ui_date;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Whether the submission creates a parcel or replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Add,
    Update,
}

/// One row of the layer table in the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerEntry {
    pub date: String,
    pub rgb_url: String,
    /// Blank when the date has no NDVI imagery
    #[serde(default)]
    pub ndvi_url: String,
}

/// Raw form contents, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelSubmission {
    pub id: String,
    pub kml_id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub csv_available: bool,
    #[serde(default)]
    pub grid_base_url: String,
    #[serde(default)]
    pub layers: Vec<LayerEntry>,
}

impl ParcelSubmission {
    /// Pre-fill the form from an existing record, one row per date.
    pub fn from_parcel(parcel: &Parcel) -> Self {
        let mut rows: BTreeMap<&str, LayerEntry> = BTreeMap::new();
        for (key, url) in &parcel.layers {
            let (date, variant) = split_layer_key(key);
            let row = rows.entry(date).or_insert_with(|| LayerEntry {
                date: date.to_string(),
                ..LayerEntry::default()
            });
            match variant {
                Variant::Rgb => row.rgb_url = url.clone(),
                Variant::Ndvi => row.ndvi_url = url.clone(),
            }
        }
        let mut layers: Vec<LayerEntry> = rows.into_values().collect();
        // Real dates first and in calendar order, anything else after.
        layers.sort_by_key(|row| {
            let parsed = parse_ui_date(&row.date).ok();
            (parsed.is_none(), parsed, row.date.clone())
        });

        Self {
            id: parcel.id.clone(),
            kml_id: parcel.kml_id.clone(),
            name: parcel.name.clone(),
            location: parcel.location.clone(),
            csv_available: parcel.csv_available,
            grid_base_url: parcel.grid_base_url.clone().unwrap_or_default(),
            layers,
        }
    }

    /// Check every rule and build the record to store.
    pub fn validate(&self) -> Result<Parcel, EditorError> {
        let id = required("id", &self.id)?;
        let kml_id = required("kmlId", &self.kml_id)?;
        let name = required("name", &self.name)?;
        let location = required("location", &self.location)?;

        let mut seen: HashSet<&str> = HashSet::new();
        let mut layers = BTreeMap::new();
        for (i, entry) in self.layers.iter().enumerate() {
            let row = i + 1;
            let date = entry.date.trim();
            if date.is_empty() {
                return Err(EditorError::MissingDate { row });
            }
            if parse_ui_date(date).is_err() {
                return Err(EditorError::InvalidDate {
                    row,
                    value: date.to_string(),
                });
            }
            if !seen.insert(date) {
                return Err(EditorError::DuplicateDate {
                    row,
                    value: date.to_string(),
                });
            }

            let rgb_url = entry.rgb_url.trim();
            if rgb_url.is_empty() {
                return Err(EditorError::MissingRgbUrl {
                    row,
                    date: date.to_string(),
                });
            }
            check_template(row, date, Variant::Rgb, rgb_url)?;
            layers.insert(Variant::Rgb.key(date), rgb_url.to_string());

            let ndvi_url = entry.ndvi_url.trim();
            if !ndvi_url.is_empty() {
                check_template(row, date, Variant::Ndvi, ndvi_url)?;
                layers.insert(Variant::Ndvi.key(date), ndvi_url.to_string());
            }
        }

        let grid_base_url = Some(self.grid_base_url.trim().to_string()).filter(|s| !s.is_empty());

        Ok(Parcel {
            id,
            kml_id,
            name,
            location,
            csv_available: self.csv_available,
            grid_base_url,
            layers,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, EditorError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(EditorError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn check_template(row: usize, date: &str, variant: Variant, url: &str) -> Result<(), EditorError> {
    match missing_placeholders(url).first().copied() {
        Some(placeholder) => Err(EditorError::MissingPlaceholder {
            row,
            date: date.to_string(),
            variant,
            placeholder,
        }),
        None => Ok(()),
    }
}

/// Validate `submission` and write it to `store`. Returns the stored record.
pub fn commit(
    store: &mut CatalogStore,
    submission: &ParcelSubmission,
    mode: EditMode,
) -> Result<Parcel, EditorError> {
    let parcel = submission.validate()?;
    match mode {
        EditMode::Add => store.add(parcel.clone())?,
        EditMode::Update => store.update(parcel.clone())?,
    }
    Ok(parcel)
}
