//! Text fetches through the browser's `fetch()`.

use anyhow::{anyhow, Result};
use pv_utils::urls::with_cache_bust;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// GET `url` and return the body. Non-2xx statuses are errors.
pub async fn fetch_text(url: &str) -> Result<String> {
    let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow!("fetch {} failed: {:?}", url, e))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| anyhow!("fetch {} did not return a Response", url))?;
    if !response.ok() {
        return Err(anyhow!("fetch {}: HTTP {}", url, response.status()));
    }
    let body = response
        .text()
        .map_err(|e| anyhow!("fetch {}: {:?}", url, e))?;
    let body = JsFuture::from(body)
        .await
        .map_err(|e| anyhow!("fetch {}: {:?}", url, e))?;
    body.as_string()
        .ok_or_else(|| anyhow!("fetch {}: body is not text", url))
}

/// `url` with a fresh cache-busting stamp, so a reload sees edited files.
pub fn cache_busted(url: &str) -> String {
    with_cache_bust(url, js_sys::Date::now() as u64)
}
