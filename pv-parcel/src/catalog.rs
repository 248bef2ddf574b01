//! In-memory parcel catalog.
//!
//! The store is loaded once from the catalog document and afterwards only
//! changed through the editor. Records are kept sorted by
//! `(location, name)`; the grouped parcel list and search both rely on
//! that order.

use crate::error::CatalogError;
use crate::parcel::{normalize_kml_id, Parcel};
use log::{info, warn};

/// Parcels sharing one `location`, in store order.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationGroup<'a> {
    pub location: &'a str,
    pub parcels: Vec<&'a Parcel>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogStore {
    parcels: Vec<Parcel>,
    populated: bool,
}

impl CatalogStore {
    /// Create an empty, unpopulated store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a catalog document without touching any store.
    pub fn parse_document(source: &str) -> Result<Vec<Parcel>, CatalogError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Replace the whole catalog with the records in `source`.
    ///
    /// On failure the store is emptied and marked unpopulated; a partial
    /// catalog is never kept.
    pub fn load(&mut self, source: &str) -> Result<&[Parcel], CatalogError> {
        match Self::parse_document(source) {
            Ok(parcels) => {
                self.parcels = parcels;
                self.populated = true;
                self.sort();
                info!("[PV] catalog: Loaded {} parcels", self.parcels.len());
                Ok(&self.parcels)
            }
            Err(e) => {
                self.parcels.clear();
                self.populated = false;
                warn!("[PV] catalog: load failed: {}", e);
                Err(e)
            }
        }
    }

    /// Whether a catalog document has been loaded successfully.
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn parcels(&self) -> &[Parcel] {
        &self.parcels
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }

    /// First parcel whose kmlId matches, trimmed and case-insensitive.
    pub fn find_by_kml_id(&self, kml_id: &str) -> Option<&Parcel> {
        let wanted = normalize_kml_id(kml_id);
        self.parcels
            .iter()
            .find(|p| normalize_kml_id(&p.kml_id) == wanted)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Parcel> {
        self.parcels.iter().find(|p| p.id == id)
    }

    /// Insert a new record. Fails when its id or kmlId is already taken.
    pub fn add(&mut self, parcel: Parcel) -> Result<(), CatalogError> {
        if self.find_by_id(&parcel.id).is_some() {
            return Err(CatalogError::DuplicateId(parcel.id));
        }
        if let Some(owner) = self.find_by_kml_id(&parcel.kml_id) {
            return Err(CatalogError::DuplicateKmlId {
                kml_id: parcel.kml_id.clone(),
                owner: owner.id.clone(),
            });
        }
        info!("[PV] catalog: added parcel {}", parcel.id);
        self.parcels.push(parcel);
        self.sort();
        Ok(())
    }

    /// Replace the record with the same id.
    ///
    /// Fails when the id is unknown or when the kmlId belongs to a
    /// different record.
    pub fn update(&mut self, parcel: Parcel) -> Result<(), CatalogError> {
        let position = self
            .parcels
            .iter()
            .position(|p| p.id == parcel.id)
            .ok_or_else(|| CatalogError::NotFound(parcel.id.clone()))?;
        let wanted = normalize_kml_id(&parcel.kml_id);
        if let Some(owner) = self
            .parcels
            .iter()
            .find(|p| p.id != parcel.id && normalize_kml_id(&p.kml_id) == wanted)
        {
            return Err(CatalogError::DuplicateKmlId {
                kml_id: parcel.kml_id.clone(),
                owner: owner.id.clone(),
            });
        }
        info!("[PV] catalog: updated parcel {}", parcel.id);
        self.parcels[position] = parcel;
        self.sort();
        Ok(())
    }

    /// Parcels whose name, location, id or kmlId contains `query`
    /// (case-insensitive), in store order. A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Parcel> {
        let needle = query.trim().to_lowercase();
        self.parcels
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || [&p.name, &p.location, &p.id, &p.kml_id]
                        .iter()
                        .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Consecutive runs of parcels with the same location.
    pub fn grouped_by_location(&self) -> Vec<LocationGroup<'_>> {
        let mut groups: Vec<LocationGroup<'_>> = Vec::new();
        for parcel in &self.parcels {
            match groups.last_mut() {
                Some(group) if group.location == parcel.location => group.parcels.push(parcel),
                _ => groups.push(LocationGroup {
                    location: &parcel.location,
                    parcels: vec![parcel],
                }),
            }
        }
        groups
    }

    /// Serialize the whole store, in store order, as the catalog document.
    pub fn to_document(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(&self.parcels)?)
    }

    // Stable, so duplicate records keep their source order and the first
    // one still wins lookups.
    fn sort(&mut self) {
        self.parcels.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then_with(|| a.name.cmp(&b.name))
        });
    }
}
