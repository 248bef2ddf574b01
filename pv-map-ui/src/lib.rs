//! Shared Dioxus components and Leaflet bridge for the parcel viewer.
//!
//! This crate provides:
//! - `js_bridge`: Rust wrappers for the Leaflet map functions via `js_sys::eval()`
//! - `fetch`: browser `fetch()` of catalog, statistics and grid documents
//! - `state`: Reactive AppState with Dioxus Signals, wrapping the `Viewer`
//! - `components`: Reusable RSX components (parcel list, date picker, editor, etc.)

pub mod components;
pub mod fetch;
pub mod js_bridge;
pub mod state;
