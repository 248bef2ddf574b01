//! Sidebar list of parcels, grouped by location, with a search box.

use crate::state::{AppState, EditorForm};
use dioxus::prelude::*;
use pv_parcel::catalog::CatalogStore;
use pv_parcel::editor::{EditMode, ParcelSubmission};
use pv_parcel::parcel::Parcel;
use pv_view::{Command, ParcelRef};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
struct ListEntry {
    id: String,
    name: String,
    kml_id: String,
    /// Shows the NDVI badge
    has_ndvi: bool,
}

impl ListEntry {
    fn from_parcel(parcel: &Parcel) -> Self {
        Self {
            id: parcel.id.clone(),
            name: parcel.name.clone(),
            kml_id: parcel.kml_id.clone(),
            has_ndvi: parcel.has_any_ndvi(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ListGroup {
    location: String,
    entries: Vec<ListEntry>,
}

/// Location groups of the parcels matching `query`, in store order.
/// Groups left empty by the filter are dropped.
fn group_matches(catalog: &CatalogStore, query: &str) -> Vec<ListGroup> {
    let matches: HashSet<&str> = catalog
        .search(query)
        .into_iter()
        .map(|p| p.id.as_str())
        .collect();

    catalog
        .grouped_by_location()
        .into_iter()
        .filter_map(|group| {
            let entries: Vec<ListEntry> = group
                .parcels
                .iter()
                .filter(|p| matches.contains(p.id.as_str()))
                .map(|p| ListEntry::from_parcel(p))
                .collect();
            (!entries.is_empty()).then(|| ListGroup {
                location: group.location.to_string(),
                entries,
            })
        })
        .collect()
}

// Copy out of the viewer so no borrow is held while rendering.
fn visible_groups(state: &AppState, query: &str) -> Vec<ListGroup> {
    match state.viewer.read().as_ref() {
        Some(viewer) => group_matches(viewer.catalog(), query),
        None => Vec::new(),
    }
}

fn entry_style(selected: bool) -> &'static str {
    if selected {
        "display: flex; justify-content: space-between; padding: 4px 6px; cursor: pointer; background: #FFF3E0; font-weight: bold;"
    } else {
        "display: flex; justify-content: space-between; padding: 4px 6px; cursor: pointer;"
    }
}

fn open_editor(mut state: AppState, id: Option<&str>) {
    let form = match id {
        Some(id) => {
            let viewer = state.viewer.read();
            let Some(parcel) = viewer.as_ref().and_then(|v| v.catalog().find_by_id(id)) else {
                return;
            };
            EditorForm {
                mode: EditMode::Update,
                submission: ParcelSubmission::from_parcel(parcel),
            }
        }
        None => EditorForm {
            mode: EditMode::Add,
            submission: ParcelSubmission::default(),
        },
    };
    state.editor_error.set(None);
    state.editor.set(Some(form));
}

#[component]
pub fn ParcelList() -> Element {
    let mut state = use_context::<AppState>();
    let query = (state.search_query)();
    let selected_id = state
        .frame
        .read()
        .selection
        .as_ref()
        .map(|s| s.parcel_id.clone());
    let groups = visible_groups(&state, &query);

    rsx! {
        div {
            style: "display: flex; gap: 6px; margin-bottom: 8px;",
            input {
                r#type: "search",
                placeholder: "Search parcels",
                style: "flex: 1;",
                value: "{query}",
                oninput: move |evt: Event<FormData>| state.search_query.set(evt.value()),
            }
            button {
                onclick: move |_| open_editor(state, None),
                "+ Add"
            }
        }
        if groups.is_empty() {
            p { style: "color: #888; font-size: 13px;", "No parcels match." }
        }
        for group in groups {
            div {
                key: "{group.location}",
                h4 {
                    style: "margin: 10px 0 4px 0; color: #455A64;",
                    "{group.location}"
                }
                ul {
                    style: "list-style: none; margin: 0; padding: 0;",
                    for entry in group.entries {
                        li {
                            key: "{entry.id}",
                            style: entry_style(selected_id.as_deref() == Some(entry.id.as_str())),
                            onclick: {
                                let id = entry.id.clone();
                                move |_| state.dispatch(Command::Select(ParcelRef::Id(id.clone())))
                            },
                            span {
                                "{entry.name} "
                                small { style: "color: #888;", "#{entry.kml_id}" }
                                if entry.has_ndvi {
                                    small { style: "color: #2E7D32; margin-left: 4px;", "NDVI" }
                                }
                            }
                            button {
                                onclick: {
                                    let id = entry.id.clone();
                                    move |evt: Event<MouseData>| {
                                        evt.stop_propagation();
                                        open_editor(state, Some(&id));
                                    }
                                },
                                "Edit"
                            }
                        }
                    }
                }
            }
        }
    }
}
