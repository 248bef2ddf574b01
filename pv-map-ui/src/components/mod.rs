//! Reusable Dioxus RSX components for the parcel viewer.

mod date_picker;
mod error_display;
mod layer_toggles;
mod loading_spinner;
mod map_container;
mod notice_banner;
mod parcel_editor;
mod parcel_list;
mod stats_panel;

pub use date_picker::DatePicker;
pub use error_display::ErrorDisplay;
pub use layer_toggles::LayerToggles;
pub use loading_spinner::LoadingSpinner;
pub use map_container::MapContainer;
pub use notice_banner::NoticeBanner;
pub use parcel_editor::ParcelEditor;
pub use parcel_list::ParcelList;
pub use stats_panel::StatsPanel;
