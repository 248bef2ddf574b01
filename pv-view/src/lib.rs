//! Viewer core: what the map should show for the current selection.
//!
//! [`Viewer`] ties the catalog and statistics index to the selection state
//! machine. The UI sends [`Command`]s and draws the returned [`Render`];
//! nothing in this crate touches the DOM or the network, so the same code
//! drives the browser app and the command-line tools.
//!
//! # Usage
//!
//! ```rust
//! use pv_view::{Command, ParcelRef, Viewer, ViewerConfig};
//!
//! let mut viewer = Viewer::new(ViewerConfig::default()).unwrap();
//! viewer
//!     .load_catalog(r#"[{"id":"f1","kmlId":"42","name":"North","location":"Ayvalı",
//!                      "layers":{"01-06-2024":"https://t/{z}/{x}/{y}.png"}}]"#)
//!     .unwrap();
//! let render = viewer.dispatch(Command::Select(ParcelRef::KmlId("42".into())));
//! let imagery = render.frame.imagery.unwrap();
//! assert_eq!(imagery.url(), Some("https://t/{z}/{x}/{y}.png"));
//! ```

pub mod config;
pub mod error;
pub mod frame;
pub mod grid;
pub mod resolver;
pub mod selection;
pub mod viewer;

pub use config::ViewerConfig;
pub use error::ViewError;
pub use frame::{Frame, GridInstruction, Notice, Render, SelectedView, StatsView};
pub use grid::{GridOverlay, GridRequest};
pub use resolver::Resolution;
pub use selection::{Selection, Transition};
pub use viewer::{Command, EditOutcome, ParcelRef, StatsStatus, Viewer};
