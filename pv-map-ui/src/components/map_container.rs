//! Map container component.

use dioxus::prelude::*;

/// Props for MapContainer
#[derive(Props, Clone, PartialEq)]
pub struct MapContainerProps {
    /// The DOM id for the map container (Leaflet renders into this)
    pub id: String,
    /// Optional minimum height in pixels
    #[props(default = 480)]
    pub min_height: u32,
}

/// A container div that Leaflet takes over once the map is initialised.
#[component]
pub fn MapContainer(props: MapContainerProps) -> Element {
    let style = format!(
        "min-height: {}px; flex: 1; position: relative; width: 100%;",
        props.min_height
    );

    rsx! {
        div {
            id: "{props.id}",
            style: "{style}",
        }
    }
}
