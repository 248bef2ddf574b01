//! Application state managed via Dioxus context.
//!
//! `AppState` bundles all reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with `use_context::<AppState>()`.
//!
//! All viewer mutations go through [`AppState::dispatch`] and friends, which
//! apply the resulting render to the signals and the map.

use crate::fetch::fetch_text;
use crate::js_bridge;
use dioxus::prelude::*;
use log::{info, warn};
use pv_parcel::editor::{EditMode, ParcelSubmission};
use pv_view::{Command, Frame, GridInstruction, GridRequest, Render, Resolution, ViewError, Viewer};

/// An open editor form.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorForm {
    pub mode: EditMode,
    pub submission: ParcelSubmission,
}

/// Shared application state for the parcel viewer.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Viewer instance (None until created)
    pub viewer: Signal<Option<Viewer>>,
    /// Last rendered frame
    pub frame: Signal<Frame>,
    /// Whether the catalog is still loading
    pub loading: Signal<bool>,
    /// Error message if something went wrong
    pub error_msg: Signal<Option<String>>,
    /// Parcel list filter
    pub search_query: Signal<String>,
    /// Editor form, when open
    pub editor: Signal<Option<EditorForm>>,
    /// Validation message for the open form
    pub editor_error: Signal<Option<String>>,
}

impl AppState {
    /// Create a new AppState with default signal values.
    pub fn new() -> Self {
        Self {
            viewer: Signal::new(None),
            frame: Signal::new(Frame::default()),
            loading: Signal::new(true),
            error_msg: Signal::new(None),
            search_query: Signal::new(String::new()),
            editor: Signal::new(None),
            editor_error: Signal::new(None),
        }
    }

    /// Send one command to the viewer and draw the result.
    pub fn dispatch(mut self, command: Command) {
        let render = match self.viewer.write().as_mut() {
            Some(viewer) => viewer.dispatch(command),
            None => {
                warn!("[PV] app: {:?} before the viewer exists", command);
                return;
            }
        };
        self.apply_render(render);
    }

    /// Replace the catalog with `body`. On failure the viewer stays empty.
    pub fn load_catalog(mut self, body: &str) -> Result<usize, ViewError> {
        let (loaded, frame) = match self.viewer.write().as_mut() {
            Some(viewer) => (viewer.load_catalog(body), viewer.frame()),
            None => return Ok(0),
        };
        self.clear_map();
        self.frame.set(frame);
        let count = loaded?;
        info!("[PV] app: catalog has {} parcels", count);
        Ok(count)
    }

    /// Feed the statistics fetch result to the viewer. Failures only
    /// disable the statistics panel.
    pub fn load_statistics(mut self, fetched: anyhow::Result<String>) {
        let frame = match self.viewer.write().as_mut() {
            Some(viewer) => {
                match fetched {
                    Ok(body) => {
                        if let Ok(summary) = viewer.load_statistics(&body) {
                            info!(
                                "[PV] app: statistics loaded ({} rows, {} skipped)",
                                summary.loaded, summary.skipped
                            );
                        }
                    }
                    Err(e) => viewer.statistics_unavailable(&e.to_string()),
                }
                viewer.frame()
            }
            None => return,
        };
        self.frame.set(frame);
    }

    /// Commit the editor form and download the updated catalog.
    pub fn commit_edit(mut self, submission: &ParcelSubmission, mode: EditMode) -> Result<(), ViewError> {
        let outcome = match self.viewer.write().as_mut() {
            Some(viewer) => viewer.commit_edit(submission, mode)?,
            None => return Ok(()),
        };
        info!("[PV] app: saved parcel {}", outcome.parcel_id);
        js_bridge::download_text(&outcome.filename, &outcome.document);
        if let Some(render) = outcome.render {
            self.apply_render(render);
        }
        Ok(())
    }

    fn apply_render(mut self, render: Render) {
        let Render { frame, grid } = render;
        let previous = self.frame.peek().clone();

        if previous.imagery != frame.imagery {
            match frame.imagery.as_ref().and_then(Resolution::url) {
                Some(url) => js_bridge::show_imagery(url),
                None => js_bridge::clear_imagery(),
            }
        }
        let kml_id = frame.selection.as_ref().map(|s| s.kml_id.as_str());
        if previous.selection.as_ref().map(|s| s.kml_id.as_str()) != kml_id {
            js_bridge::highlight_parcel(kml_id);
        }
        match grid {
            GridInstruction::Keep => {}
            GridInstruction::Clear => js_bridge::clear_grid(),
            GridInstruction::Fetch(request) => {
                js_bridge::clear_grid();
                self.fetch_grid(request);
            }
        }

        self.frame.set(frame);
    }

    // The response is checked against the live selection when it lands.
    fn fetch_grid(self, request: GridRequest) {
        spawn(async move {
            let response = fetch_text(&request.locator)
                .await
                .map_err(|e| e.to_string());
            let overlay = self
                .viewer
                .peek()
                .as_ref()
                .and_then(|viewer| viewer.apply_grid_response(&request, response));
            if let Some(overlay) = overlay {
                js_bridge::show_grid(&overlay);
            }
        });
    }

    fn clear_map(self) {
        js_bridge::clear_imagery();
        js_bridge::clear_grid();
        js_bridge::highlight_parcel(None);
    }
}
