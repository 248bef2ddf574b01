//! Slippy-map tile URL templates.

/// Placeholders every tile template must carry.
pub const TILE_PLACEHOLDERS: [&str; 3] = ["{z}", "{x}", "{y}"];

/// Placeholders that `template` is missing, in `{z}`, `{x}`, `{y}` order.
pub fn missing_placeholders(template: &str) -> Vec<&'static str> {
    TILE_PLACEHOLDERS
        .iter()
        .copied()
        .filter(|p| !template.contains(p))
        .collect()
}

/// Substitute tile coordinates into a template.
pub fn expand(template: &str, z: u32, x: u32, y: u32) -> String {
    template
        .replace("{z}", &z.to_string())
        .replace("{x}", &x.to_string())
        .replace("{y}", &y.to_string())
}
