//! NDVI statistics for the selected parcel and date.

use crate::state::AppState;
use dioxus::prelude::*;
use pv_view::StatsView;

#[component]
pub fn StatsPanel() -> Element {
    let state = use_context::<AppState>();
    let stats = state.frame.read().stats.clone();

    let Some(text) = stats.text() else {
        return rsx! {};
    };
    let color = match stats {
        StatsView::Values { .. } => "#1B5E20",
        _ => "#757575",
    };

    rsx! {
        div {
            style: "padding: 6px 12px; border-bottom: 1px solid #e0e0e0; font-size: 13px; color: {color};",
            "{text}"
        }
    }
}
