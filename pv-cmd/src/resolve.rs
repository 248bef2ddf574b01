//! Imagery resolution from the command line.
//!
//! Drives a `Viewer` through the same commands a user would send, so the
//! output matches what the map shows.

use crate::source::{load_config, read_source};
use anyhow::{anyhow, bail};
use pv_parcel::tile::expand;
use pv_view::{Command, Frame, ParcelRef, Resolution, Viewer, ViewerConfig};

/// Which date of the parcel's timeline to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTarget {
    Date(String),
    Index(usize),
}

/// Parse a `z/x/y` tile address.
pub fn parse_tile(tile: &str) -> anyhow::Result<(u32, u32, u32)> {
    let parts: Vec<&str> = tile.trim().split('/').collect();
    let [z, x, y] = parts.as_slice() else {
        bail!("tile must be z/x/y, got '{}'", tile);
    };
    let parse = |v: &str| {
        v.parse::<u32>()
            .map_err(|_| anyhow!("tile must be z/x/y, got '{}'", tile))
    };
    Ok((parse(*z)?, parse(*x)?, parse(*y)?))
}

/// Select `kml_id` and move to `target`; returns the resulting frame.
pub fn select_and_seek(
    viewer: &mut Viewer,
    kml_id: &str,
    target: &DateTarget,
) -> anyhow::Result<Frame> {
    let render = viewer.dispatch(Command::Select(ParcelRef::KmlId(kml_id.to_string())));
    let Some(selected) = render.frame.selection else {
        match render.frame.notice {
            Some(notice) => bail!("{}", notice),
            None => bail!("parcel {} could not be selected", kml_id),
        }
    };
    let index = match target {
        DateTarget::Index(index) => *index,
        DateTarget::Date(date) => selected
            .dates
            .iter()
            .position(|d| d == date.trim())
            .ok_or_else(|| {
                anyhow!(
                    "parcel {} has no imagery for {} (dates: {})",
                    kml_id,
                    date,
                    selected.dates.join(", ")
                )
            })?,
    };
    viewer.dispatch(Command::ChangeDate(index));
    Ok(viewer.frame())
}

/// Human-readable resolution report.
pub fn resolve_report(
    config: ViewerConfig,
    catalog: &str,
    kml_id: &str,
    target: &DateTarget,
    ndvi: bool,
    tile: Option<&str>,
) -> anyhow::Result<String> {
    let tile = tile.map(parse_tile).transpose()?;
    let mut viewer = Viewer::new(config)?;
    viewer.load_catalog(catalog)?;
    if ndvi {
        viewer.dispatch(Command::ToggleNdvi);
    }
    let frame = select_and_seek(&mut viewer, kml_id, target)?;

    let mut lines = Vec::new();
    if let Some(selected) = &frame.selection {
        lines.push(format!(
            "{} / {} (id {}, kmlId {})",
            selected.location, selected.name, selected.parcel_id, selected.kml_id
        ));
        lines.push(format!(
            "date {} [{}/{}]",
            selected.date,
            selected.date_index + 1,
            selected.dates.len()
        ));
    }
    match &frame.imagery {
        Some(Resolution::Found { url, variant }) => lines.push(format!("{}: {}", variant, url)),
        Some(Resolution::FellBack { url }) => lines.push(format!("RGB (NDVI unavailable): {}", url)),
        Some(Resolution::Missing { date }) => lines.push(format!("no imagery for {}", date)),
        Some(Resolution::NoDate { index }) => lines.push(format!("no date at position {}", index + 1)),
        None => lines.push("nothing selected".to_string()),
    }
    if let (Some((z, x, y)), Some(url)) = (tile, frame.imagery.as_ref().and_then(Resolution::url)) {
        lines.push(format!("tile {}/{}/{}: {}", z, x, y, expand(url, z, x, y)));
    }
    Ok(lines.join("\n"))
}

pub async fn run_resolve(
    catalog: &str,
    kml_id: &str,
    target: DateTarget,
    ndvi: bool,
    tile: Option<&str>,
    config: Option<&str>,
) -> anyhow::Result<()> {
    let config = load_config(config).await?;
    let source = read_source(catalog).await?;
    println!("{}", resolve_report(config, &source, kml_id, &target, ndvi, tile)?);
    Ok(())
}
