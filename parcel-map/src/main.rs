//! Parcel Imagery Viewer
//!
//! A map of agricultural parcels. Selecting one (from the sidebar or by
//! clicking its boundary) shows its dated satellite imagery, optionally as
//! NDVI with per-date statistics and a labelled grid overlay.
//!
//! Data flow:
//! 1. On mount: create the `Viewer`, start the map, and fetch the catalog
//!    and the statistics table concurrently (cache-busted).
//! 2. Boundary clicks arrive from JS on a channel and become
//!    `Command::Select`; sidebar and toolbar events dispatch directly.
//! 3. Each dispatch yields a `Render` that `AppState` applies to the map.

use dioxus::prelude::*;
use pv_map_ui::components::{
    DatePicker, ErrorDisplay, LayerToggles, LoadingSpinner, MapContainer, NoticeBanner,
    ParcelEditor, ParcelList, StatsPanel,
};
use pv_map_ui::fetch::{cache_busted, fetch_text};
use pv_map_ui::js_bridge;
use pv_map_ui::state::AppState;
use pv_view::{Command, ParcelRef, Viewer, ViewerConfig};

/// DOM id for the Leaflet map container div.
const MAP_CONTAINER_ID: &str = "parcel-map";

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("parcel-map-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(AppState::new);

    // ─── Effect: one-time startup ───
    use_effect(move || {
        let config = ViewerConfig::default();
        match Viewer::new(config.clone()) {
            Ok(viewer) => state.viewer.set(Some(viewer)),
            Err(e) => {
                state.error_msg.set(Some(format!("Could not start the viewer: {}", e)));
                state.loading.set(false);
                return;
            }
        }

        js_bridge::init_map(MAP_CONTAINER_ID, &config.boundaries_url);

        // Boundary clicks come from outside the Dioxus runtime.
        let (clicks_tx, mut clicks_rx) = tokio::sync::mpsc::unbounded_channel::<String>();
        js_bridge::on_parcel_click(move |kml_id| {
            let _ = clicks_tx.send(kml_id);
        });
        spawn(async move {
            while let Some(kml_id) = clicks_rx.recv().await {
                state.dispatch(Command::Select(ParcelRef::KmlId(kml_id)));
            }
        });

        let catalog_url = cache_busted(&config.catalog_url);
        spawn(async move {
            let loaded = match fetch_text(&catalog_url).await {
                Ok(body) => state.load_catalog(&body).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            if let Err(e) = loaded {
                log::error!("[PV] app: catalog load failed: {}", e);
                state.error_msg.set(Some(format!("Could not load the parcel catalog: {}", e)));
            }
            state.loading.set(false);
        });

        let statistics_url = cache_busted(&config.statistics_url);
        spawn(async move {
            let fetched = fetch_text(&statistics_url).await;
            state.load_statistics(fetched);
        });
    });

    // ─── Render ───
    rsx! {
        div {
            style: "display: flex; height: 100vh; font-family: system-ui, -apple-system, sans-serif;",

            aside {
                style: "width: 300px; padding: 8px; overflow-y: auto; border-right: 1px solid #e0e0e0;",
                h2 { style: "margin: 4px 0 8px 0; font-size: 18px;", "Parcels" }

                if let Some(err) = state.error_msg.read().as_ref() {
                    ErrorDisplay { message: err.clone() }
                }

                if *state.loading.read() {
                    LoadingSpinner {}
                } else {
                    ParcelList {}
                }
            }

            main {
                style: "flex: 1; display: flex; flex-direction: column;",
                div {
                    style: "display: flex; gap: 16px; align-items: center; justify-content: space-between; padding: 8px 12px; border-bottom: 1px solid #e0e0e0;",
                    DatePicker {}
                    LayerToggles {}
                }
                NoticeBanner {}
                StatsPanel {}
                MapContainer { id: MAP_CONTAINER_ID.to_string() }
            }

            ParcelEditor {}
        }
    }
}
