//! Render projection of the viewer state.
//!
//! A [`Frame`] is recomputed from scratch after every command; the map
//! side applies it as a whole rather than patching individual pieces.

use crate::grid::GridRequest;
use crate::resolver::Resolution;
use pv_db::models::Stats;
use serde::Serialize;
use std::fmt;

/// The selected parcel as the sidebar and date picker show it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedView {
    pub parcel_id: String,
    pub kml_id: String,
    pub name: String,
    pub location: String,
    pub dates: Vec<String>,
    pub date_index: usize,
    /// Label of the date whose imagery is resolved
    pub date: String,
}

/// Statistics panel contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StatsView {
    /// NDVI view is off or nothing is selected
    #[default]
    Hidden,
    /// The statistics table has not arrived yet
    Loading,
    /// No statistics exist for this parcel, or the table failed to load
    NotAvailable,
    /// The parcel has statistics but not for this date
    NotFound { date: String },
    Values { date: String, stats: Stats },
}

impl StatsView {
    /// Panel text, `None` when the panel is hidden.
    pub fn text(&self) -> Option<String> {
        match self {
            StatsView::Hidden => None,
            StatsView::Loading => Some("Loading statistics...".to_string()),
            StatsView::NotAvailable => Some("Statistics not available".to_string()),
            StatsView::NotFound { date } => Some(format!("No statistics for {}", date)),
            StatsView::Values { date, stats } => Some(format!(
                "{}: NDVI mean {:.3} (min {:.3}, max {:.3})",
                date,
                stats.normalized_mean(),
                stats.min,
                stats.max
            )),
        }
    }
}

/// Non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Notice {
    /// A map click or list entry referred to a parcel not in the catalog
    UnknownParcel { reference: String },
    /// The parcel has no dated imagery
    NoImagery { name: String },
    NdviFallback { date: String },
    ImageryMissing { date: String },
    /// No date at this position of the timeline (0-based)
    NoDateAt { index: usize },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::UnknownParcel { reference } => {
                write!(f, "No catalog entry for parcel {}", reference)
            }
            Notice::NoImagery { name } => write!(f, "No imagery available for {}", name),
            Notice::NdviFallback { date } => {
                write!(f, "NDVI unavailable for {}, showing RGB", date)
            }
            Notice::ImageryMissing { date } => write!(f, "Image not available for {}", date),
            Notice::NoDateAt { index } => write!(f, "No imagery date at position {}", index + 1),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub selection: Option<SelectedView>,
    /// `None` when nothing is selected: any imagery on the map is removed
    pub imagery: Option<Resolution>,
    pub stats: StatsView,
    pub ndvi_requested: bool,
    pub grid_requested: bool,
    pub notice: Option<Notice>,
}

/// What to do with the grid overlay after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridInstruction {
    /// Leave whatever is on the map
    Keep,
    /// Remove the overlay
    Clear,
    /// Remove the overlay and fetch this one
    Fetch(GridRequest),
}

/// Result of dispatching one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Render {
    pub frame: Frame,
    pub grid: GridInstruction,
}
