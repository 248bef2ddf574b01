//! Grid overlay lookup from the command line.

use crate::resolve::{select_and_seek, DateTarget};
use crate::source::{load_config, read_source};
use anyhow::anyhow;
use pv_view::{Command, GridInstruction, GridRequest, Viewer, ViewerConfig};

/// Select the parcel on `date` with the grid toggle on and return the
/// fetch the viewer asks for, together with the viewer that issued it.
pub fn grid_request(
    config: ViewerConfig,
    catalog: &str,
    kml_id: &str,
    date: &str,
) -> anyhow::Result<(Viewer, GridRequest)> {
    let mut viewer = Viewer::new(config)?;
    viewer.load_catalog(catalog)?;
    select_and_seek(&mut viewer, kml_id, &DateTarget::Date(date.to_string()))?;
    match viewer.dispatch(Command::ToggleGrid).grid {
        GridInstruction::Fetch(request) => Ok((viewer, request)),
        _ => Err(anyhow!("no grid overlay locator for parcel {} on {}", kml_id, date)),
    }
}

pub async fn run_grid(
    catalog: &str,
    kml_id: &str,
    date: &str,
    fetch: bool,
    config: Option<&str>,
) -> anyhow::Result<()> {
    let config = load_config(config).await?;
    let source = read_source(catalog).await?;
    let (viewer, request) = grid_request(config, &source, kml_id, date)?;
    println!("{}", request.locator);
    if !fetch {
        return Ok(());
    }

    let response = read_source(&request.locator)
        .await
        .map_err(|e| e.to_string());
    let overlay = viewer
        .apply_grid_response(&request, response)
        .ok_or_else(|| anyhow!("grid overlay {} is unavailable or unusable", request.locator))?;
    for label in &overlay.labels {
        println!("{:>4} {}", label.feature_index, label.text);
    }
    Ok(())
}
