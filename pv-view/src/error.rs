/// Error types for the viewer
use pv_parcel::error::{CatalogError, EditorError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewError {
    /// Catalog could not be loaded or exported
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Editor submission rejected
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// Statistics index failure
    #[error("Statistics index error: {0}")]
    Statistics(#[from] anyhow::Error),

    /// JSON decoding failed (config or grid overlay)
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Grid overlay document has an unexpected shape
    #[error("Invalid grid overlay: {0}")]
    GridFormat(&'static str),
}
