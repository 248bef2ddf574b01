//! Result structs for statistics lookups.

use serde::Serialize;

/// Vegetation index statistics for one parcel on one date.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Stats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Vegetation value as displayed. Currently the identity: the raw index is
/// shown without rescaling.
pub fn normalize_vegetation(value: f64) -> f64 {
    value
}

impl Stats {
    /// Mean as shown in the statistics panel.
    pub fn normalized_mean(&self) -> f64 {
        normalize_vegetation(self.mean)
    }
}

/// Row counts from one CSV load.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: u32,
    pub skipped: u32,
}
