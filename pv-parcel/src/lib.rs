//! Parcel model, catalog store and catalog editor.
//!
//! A parcel is one agricultural field. Its `layers` map holds a sparse set of
//! imagery tile templates keyed by date (`DD-MM-YYYY` for true colour,
//! `DD-MM-YYYY-NDVI` for the vegetation index).
//!
//! # Usage
//!
//! ```rust
//! use pv_parcel::catalog::CatalogStore;
//!
//! let mut store = CatalogStore::new();
//! store
//!     .load(r#"[{"id":"f1","kmlId":"42","name":"North","location":"Ayvalı",
//!              "layers":{"01-06-2024":"https://t/{z}/{x}/{y}.png"}}]"#)
//!     .unwrap();
//! let parcel = store.find_by_kml_id(" 42 ").unwrap();
//! assert_eq!(parcel.available_dates(), vec!["01-06-2024".to_string()]);
//! ```

pub mod catalog;
pub mod editor;
pub mod error;
pub mod parcel;
pub mod tile;

pub use catalog::CatalogStore;
pub use error::{CatalogError, EditorError};
pub use parcel::{Parcel, Variant};
