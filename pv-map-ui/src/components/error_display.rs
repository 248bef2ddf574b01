//! Error display component.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ErrorDisplayProps {
    pub message: String,
    /// Bold prefix before the message
    #[props(default = "Error: ".to_string())]
    pub title: String,
}

/// Displays an error message in a styled box.
#[component]
pub fn ErrorDisplay(props: ErrorDisplayProps) -> Element {
    rsx! {
        div {
            role: "alert",
            style: "padding: 10px 12px; margin: 8px 0; background: #FFEBEE; color: #B71C1C; border-radius: 4px; border: 1px solid #EF9A9A; font-size: 13px;",
            strong { "{props.title}" }
            "{props.message}"
        }
    }
}
