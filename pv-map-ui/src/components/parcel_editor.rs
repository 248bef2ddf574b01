//! Modal form for adding or editing a catalog record.
//!
//! Nothing is written until Save; a rejected submission keeps the form open
//! with a message naming the offending field. A successful save downloads
//! the whole catalog.

use crate::state::AppState;
use dioxus::prelude::*;
use pv_parcel::editor::{EditMode, LayerEntry, ParcelSubmission};
use pv_view::ViewError;

const TILE_HINT: &str = "https://.../{z}/{x}/{y}.png";

fn edit_form(mut state: AppState, change: impl FnOnce(&mut ParcelSubmission)) {
    if let Some(form) = state.editor.write().as_mut() {
        change(&mut form.submission);
    }
}

fn edit_layer(state: AppState, row: usize, change: impl FnOnce(&mut LayerEntry)) {
    edit_form(state, move |f| {
        if let Some(layer) = f.layers.get_mut(row) {
            change(layer);
        }
    });
}

fn rejection_message(err: &ViewError) -> String {
    match err {
        ViewError::Editor(e) => format!("{}: {}", e.field(), e),
        other => other.to_string(),
    }
}

#[derive(Props, Clone, PartialEq)]
struct TextFieldProps {
    label: String,
    value: String,
    #[props(default)]
    placeholder: String,
    #[props(default)]
    disabled: bool,
    oninput: EventHandler<String>,
}

#[component]
fn TextField(props: TextFieldProps) -> Element {
    rsx! {
        label {
            style: "display: flex; flex-direction: column; flex: 1; font-size: 12px; color: #555;",
            "{props.label}"
            input {
                value: "{props.value}",
                placeholder: "{props.placeholder}",
                disabled: props.disabled,
                oninput: move |evt: Event<FormData>| props.oninput.call(evt.value()),
            }
        }
    }
}

#[component]
pub fn ParcelEditor() -> Element {
    let mut state = use_context::<AppState>();
    let Some(form) = state.editor.read().clone() else {
        return rsx! {};
    };
    let error = state.editor_error.read().clone();
    let updating = form.mode == EditMode::Update;
    let title = if updating {
        format!("Edit parcel {}", form.submission.id)
    } else {
        "Add parcel".to_string()
    };
    let s = form.submission;

    let on_save = move |_| {
        let Some(form) = state.editor.peek().clone() else {
            return;
        };
        match state.commit_edit(&form.submission, form.mode) {
            Ok(()) => {
                state.editor.set(None);
                state.editor_error.set(None);
            }
            Err(e) => state.editor_error.set(Some(rejection_message(&e))),
        }
    };

    rsx! {
        div {
            style: "position: fixed; inset: 0; background: rgba(0,0,0,0.35); display: flex; align-items: center; justify-content: center; z-index: 2000;",
            div {
                style: "background: white; border-radius: 6px; padding: 16px; width: 640px; max-height: 90vh; overflow-y: auto; display: flex; flex-direction: column; gap: 8px;",
                h3 { style: "margin: 0;", "{title}" }
                if let Some(message) = error {
                    crate::components::ErrorDisplay {
                        title: "Not saved: ".to_string(),
                        message: message.clone(),
                    }
                }
                div {
                    style: "display: flex; gap: 8px;",
                    TextField {
                        label: "Id".to_string(),
                        value: s.id.clone(),
                        disabled: updating,
                        oninput: move |v: String| edit_form(state, move |f| f.id = v),
                    }
                    TextField {
                        label: "KML id".to_string(),
                        value: s.kml_id.clone(),
                        oninput: move |v: String| edit_form(state, move |f| f.kml_id = v),
                    }
                }
                div {
                    style: "display: flex; gap: 8px;",
                    TextField {
                        label: "Name".to_string(),
                        value: s.name.clone(),
                        oninput: move |v: String| edit_form(state, move |f| f.name = v),
                    }
                    TextField {
                        label: "Location".to_string(),
                        value: s.location.clone(),
                        oninput: move |v: String| edit_form(state, move |f| f.location = v),
                    }
                }
                TextField {
                    label: "Grid base URL".to_string(),
                    value: s.grid_base_url.clone(),
                    placeholder: "optional".to_string(),
                    oninput: move |v: String| edit_form(state, move |f| f.grid_base_url = v),
                }
                label {
                    style: "font-size: 13px;",
                    input {
                        r#type: "checkbox",
                        checked: s.csv_available,
                        onchange: move |_| edit_form(state, |f| f.csv_available = !f.csv_available),
                    }
                    " Statistics available"
                }
                h4 { style: "margin: 8px 0 0 0;", "Imagery layers" }
                for (row, layer) in s.layers.iter().enumerate() {
                    div {
                        key: "{row}",
                        style: "display: flex; gap: 6px; align-items: flex-end;",
                        TextField {
                            label: "Date".to_string(),
                            value: layer.date.clone(),
                            placeholder: "DD-MM-YYYY".to_string(),
                            oninput: move |v: String| edit_layer(state, row, move |l| l.date = v),
                        }
                        TextField {
                            label: "RGB tiles".to_string(),
                            value: layer.rgb_url.clone(),
                            placeholder: TILE_HINT.to_string(),
                            oninput: move |v: String| edit_layer(state, row, move |l| l.rgb_url = v),
                        }
                        TextField {
                            label: "NDVI tiles".to_string(),
                            value: layer.ndvi_url.clone(),
                            placeholder: "optional".to_string(),
                            oninput: move |v: String| edit_layer(state, row, move |l| l.ndvi_url = v),
                        }
                        button {
                            onclick: move |_| edit_form(state, move |f| {
                                if row < f.layers.len() {
                                    f.layers.remove(row);
                                }
                            }),
                            "Remove"
                        }
                    }
                }
                button {
                    style: "align-self: flex-start;",
                    onclick: move |_| edit_form(state, |f| f.layers.push(LayerEntry::default())),
                    "+ Layer"
                }
                div {
                    style: "display: flex; gap: 8px; justify-content: flex-end; margin-top: 8px;",
                    button {
                        onclick: move |_| state.editor.set(None),
                        "Cancel"
                    }
                    button {
                        style: "font-weight: bold;",
                        onclick: on_save,
                        "Save"
                    }
                }
            }
        }
    }
}
