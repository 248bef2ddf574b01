//! Date selector for the selected parcel's imagery timeline.

use crate::state::AppState;
use dioxus::prelude::*;
use pv_view::Command;

/// Dropdown plus previous/next buttons. Hidden while nothing is selected.
#[component]
pub fn DatePicker() -> Element {
    let state = use_context::<AppState>();
    let Some(selected) = state.frame.read().selection.clone() else {
        return rsx! {
            span { style: "color: #888; font-size: 13px;", "Select a parcel to browse imagery" }
        };
    };
    let index = selected.date_index;
    let last = selected.dates.len().saturating_sub(1);

    let on_change = move |evt: Event<FormData>| {
        if let Ok(i) = evt.value().parse::<usize>() {
            state.dispatch(Command::ChangeDate(i));
        }
    };

    rsx! {
        div {
            style: "display: flex; gap: 6px; align-items: center;",
            strong { "{selected.name}" }
            button {
                disabled: index == 0,
                onclick: move |_| state.dispatch(Command::ChangeDate(index.saturating_sub(1))),
                "◀"
            }
            select {
                id: "date-select",
                onchange: on_change,
                for (i, date) in selected.dates.iter().enumerate() {
                    option {
                        key: "{date}",
                        value: "{i}",
                        selected: i == index,
                        "{date}"
                    }
                }
            }
            button {
                disabled: index >= last,
                onclick: move |_| state.dispatch(Command::ChangeDate(index + 1)),
                "▶"
            }
            button {
                onclick: move |_| state.dispatch(Command::Clear),
                "Clear"
            }
        }
    }
}
