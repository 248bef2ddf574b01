//! NDVI and grid overlay toggles.

use crate::state::AppState;
use dioxus::prelude::*;
use pv_view::Command;

#[component]
pub fn LayerToggles() -> Element {
    let state = use_context::<AppState>();
    let (ndvi, grid) = {
        let frame = state.frame.read();
        (frame.ndvi_requested, frame.grid_requested)
    };

    rsx! {
        div {
            style: "display: flex; gap: 16px; align-items: center;",
            label {
                input {
                    r#type: "checkbox",
                    checked: ndvi,
                    onchange: move |_| state.dispatch(Command::ToggleNdvi),
                }
                " NDVI"
            }
            label {
                input {
                    r#type: "checkbox",
                    checked: grid,
                    onchange: move |_| state.dispatch(Command::ToggleGrid),
                }
                " Grid"
            }
        }
    }
}
