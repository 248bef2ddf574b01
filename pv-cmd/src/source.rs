//! Reading data sources and the optional viewer config.

use chrono::Utc;
use log::info;
use pv_utils::urls::with_cache_bust;
use pv_view::ViewerConfig;

fn is_url(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

/// Read `src` as text. URLs are fetched cache-busted; anything else is a
/// file path.
pub async fn read_source(src: &str) -> anyhow::Result<String> {
    if !is_url(src) {
        return std::fs::read_to_string(src)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", src, e));
    }

    let url = with_cache_bust(src, Utc::now().timestamp_millis() as u64);
    info!("Fetching {}", url);
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()?;
    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        anyhow::bail!("Bad response for {}: {}", src, response.status());
    }
    Ok(response.text().await?)
}

/// Viewer config from a JSON file, or the defaults.
pub async fn load_config(path: Option<&str>) -> anyhow::Result<ViewerConfig> {
    match path {
        Some(path) => {
            let source = read_source(path).await?;
            ViewerConfig::from_json(&source)
                .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path, e))
        }
        None => Ok(ViewerConfig::default()),
    }
}
