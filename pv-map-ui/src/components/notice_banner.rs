//! Banner for non-blocking viewer notices.

use crate::state::AppState;
use dioxus::prelude::*;
use pv_view::Notice;

#[component]
pub fn NoticeBanner() -> Element {
    let state = use_context::<AppState>();
    let notice = state.frame.read().notice.clone();

    let Some(notice) = notice else {
        return rsx! {};
    };
    let (background, color) = match notice {
        Notice::ImageryMissing { .. } | Notice::NoDateAt { .. } | Notice::UnknownParcel { .. } => {
            ("#FFF3E0", "#E65100")
        }
        Notice::NoImagery { .. } | Notice::NdviFallback { .. } => ("#E3F2FD", "#0D47A1"),
    };

    rsx! {
        div {
            style: "padding: 6px 12px; background: {background}; color: {color}; font-size: 13px;",
            "{notice}"
        }
    }
}
