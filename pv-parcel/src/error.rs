/// Error types for the parcel catalog
use crate::parcel::Variant;
use thiserror::Error;

/// Errors raised by the catalog store
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog document could not be decoded
    #[error("Failed to parse catalog document: {0}")]
    Parse(#[from] serde_json::Error),

    /// `add` with an id that is already present
    #[error("A parcel with id '{0}' already exists")]
    DuplicateId(String),

    /// The kmlId belongs to another record
    #[error("kmlId '{kml_id}' is already used by parcel '{owner}'")]
    DuplicateKmlId { kml_id: String, owner: String },

    /// `update` with an unknown id
    #[error("No parcel with id '{0}'")]
    NotFound(String),
}

/// Errors raised while validating or committing an editor submission.
///
/// Layer rows are numbered from 1, matching the form.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("Layer {row}: date is required")]
    MissingDate { row: usize },

    #[error("Layer {row}: date '{value}' must be a real DD-MM-YYYY date")]
    InvalidDate { row: usize, value: String },

    #[error("Layer {row}: date '{value}' is listed more than once")]
    DuplicateDate { row: usize, value: String },

    #[error("Layer {row} ({date}): RGB URL is required")]
    MissingRgbUrl { row: usize, date: String },

    #[error("Layer {row} ({date}): {variant} URL must contain {placeholder}")]
    MissingPlaceholder {
        row: usize,
        date: String,
        variant: Variant,
        placeholder: &'static str,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl EditorError {
    /// Name of the form field the error points at.
    pub fn field(&self) -> String {
        match self {
            EditorError::MissingField(name) => name.to_string(),
            EditorError::MissingDate { row }
            | EditorError::InvalidDate { row, .. }
            | EditorError::DuplicateDate { row, .. } => format!("layers[{}].date", row),
            EditorError::MissingRgbUrl { row, .. } => format!("layers[{}].rgbUrl", row),
            EditorError::MissingPlaceholder { row, variant, .. } => match variant {
                Variant::Rgb => format!("layers[{}].rgbUrl", row),
                Variant::Ndvi => format!("layers[{}].ndviUrl", row),
            },
            EditorError::Catalog(CatalogError::DuplicateId(_))
            | EditorError::Catalog(CatalogError::NotFound(_)) => "id".to_string(),
            EditorError::Catalog(CatalogError::DuplicateKmlId { .. }) => "kmlId".to_string(),
            EditorError::Catalog(CatalogError::Parse(_)) => "catalog".to_string(),
        }
    }
}
