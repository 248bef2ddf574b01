//! Loading indicator for the parcel list.

use dioxus::prelude::*;

#[component]
pub fn LoadingSpinner(#[props(default = "Loading parcels...".to_string())] label: String) -> Element {
    rsx! {
        div {
            style: "display: flex; justify-content: center; padding: 24px; color: #666; font-size: 13px;",
            "{label}"
        }
    }
}
