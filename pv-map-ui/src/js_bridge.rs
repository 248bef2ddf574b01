//! Typed wrappers around JS interop via `js_sys::eval()`.
//!
//! The map lives in `assets/js/parcel-map.js`, evaluated at global scope once
//! Leaflet has loaded and exposed as `window.pvMap`. Calls made before the
//! map is ready are queued on the JS side and replayed in order.

use pv_view::GridOverlay;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;

// Embed the map script at compile time
static PARCEL_MAP_JS: &str = include_str!("../assets/js/parcel-map.js");

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const OMNIVORE_JS: &str =
    "https://api.tiles.mapbox.com/mapbox.js/plugins/leaflet-omnivore/v0.3.1/leaflet-omnivore.min.js";

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('[PV] map call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Quote `value` as a JS string literal.
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

// Run `call` against `window.pvMap` now, or once the map is ready.
fn call_map(call: &str) {
    call_js(&format!(
        r#"
        (function() {{
            var run = function(map) {{ {call} }};
            if (window.pvMap) {{ run(window.pvMap); }}
            else {{ (window.__pvPending = window.__pvPending || []).push(run); }}
        }})();
        "#,
    ));
}

/// Load Leaflet, evaluate the map script and build the map in `container_id`.
///
/// Boundaries are read from `boundaries_url` by the KML plugin. Call once at
/// app startup.
pub fn init_map(container_id: &str, boundaries_url: &str) {
    let store_js = format!(
        "window.__pvMapScript = {};",
        js_string(PARCEL_MAP_JS)
    );
    let _ = js_sys::eval(&store_js);

    call_js(&format!(
        r#"
        (function() {{
            var load = function(tag, attrs) {{
                var el = document.createElement(tag);
                Object.keys(attrs).forEach(function(k) {{ el[k] = attrs[k]; }});
                document.head.appendChild(el);
            }};
            if (typeof L === 'undefined') {{
                load('link', {{ rel: 'stylesheet', href: {css} }});
                load('script', {{ src: {leaflet}, onload: function() {{
                    load('script', {{ src: {omnivore} }});
                }} }});
            }}
            var poll = setInterval(function() {{
                if (typeof L !== 'undefined' && typeof omnivore !== 'undefined' &&
                    document.getElementById({container})) {{
                    clearInterval(poll);
                    // Eval at global scope via indirect eval
                    (0, eval)(window.__pvMapScript);
                    delete window.__pvMapScript;
                    window.pvMap = createParcelMap({container}, {boundaries});
                    var pending = window.__pvPending || [];
                    delete window.__pvPending;
                    pending.forEach(function(run) {{ run(window.pvMap); }});
                    console.log('[PV] map initialized');
                }}
            }}, 100);
        }})();
        "#,
        css = js_string(LEAFLET_CSS),
        leaflet = js_string(LEAFLET_JS),
        omnivore = js_string(OMNIVORE_JS),
        container = js_string(container_id),
        boundaries = js_string(boundaries_url),
    ));
}

/// Show the tile layer at `url` (a `{z}/{x}/{y}` template), replacing any other.
pub fn show_imagery(url: &str) {
    call_map(&format!("map.showImagery({});", js_string(url)));
}

pub fn clear_imagery() {
    call_map("map.clearImagery();");
}

/// Outline the boundary with `kml_id`, or none.
pub fn highlight_parcel(kml_id: Option<&str>) {
    let arg = kml_id.map(js_string).unwrap_or_else(|| "null".to_string());
    call_map(&format!("map.highlight({});", arg));
}

/// Draw a grid overlay with its cell labels, replacing any other.
pub fn show_grid(overlay: &GridOverlay) {
    let geojson = serde_json::to_string(&overlay.geojson).unwrap_or_default();
    let labels = serde_json::to_string(&overlay.labels).unwrap_or_default();
    call_map(&format!("map.showGrid({}, {});", geojson, labels));
}

pub fn clear_grid() {
    call_map("map.clearGrid();");
}

/// Offer `contents` as a file download named `filename`.
pub fn download_text(filename: &str, contents: &str) {
    call_js(&format!(
        r#"
        (function() {{
            var blob = new Blob([{contents}], {{ type: 'application/json' }});
            var a = document.createElement('a');
            a.href = URL.createObjectURL(blob);
            a.download = {filename};
            document.body.appendChild(a);
            a.click();
            setTimeout(function() {{
                URL.revokeObjectURL(a.href);
                a.remove();
            }}, 0);
        }})();
        "#,
        contents = js_string(contents),
        filename = js_string(filename),
    ));
}

/// Route boundary clicks to `handler`, which receives the clicked kmlId.
///
/// The handler is installed as `window.pvOnParcelClick` and lives for the
/// rest of the page.
pub fn on_parcel_click(handler: impl FnMut(String) + 'static) {
    let closure = Closure::<dyn FnMut(String)>::new(handler);
    match web_sys::window() {
        Some(window) => {
            let _ = js_sys::Reflect::set(
                &window,
                &JsValue::from_str("pvOnParcelClick"),
                closure.as_ref(),
            );
        }
        None => log::warn!("[PV] map: no window, boundary clicks are ignored"),
    }
    closure.forget();
}
