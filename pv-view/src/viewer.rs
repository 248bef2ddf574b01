//! The viewer's application state.
//!
//! `Viewer` owns the catalog, the statistics index, the selection and the
//! NDVI/grid toggles. UI events come in as [`Command`]s; each dispatch
//! returns a fresh [`Frame`] plus an instruction for the grid overlay.
//! Everything runs on the UI thread; only fetches are asynchronous.

use crate::config::ViewerConfig;
use crate::error::ViewError;
use crate::frame::{Frame, GridInstruction, Notice, Render, SelectedView, StatsView};
use crate::grid::{grid_locator, parse_overlay, GridOverlay, GridRequest};
use crate::resolver::{resolve, Resolution};
use crate::selection::{ActiveSelection, Selection, Transition};
use log::{debug, info, warn};
use pv_db::models::LoadSummary;
use pv_db::Database;
use pv_parcel::catalog::CatalogStore;
use pv_parcel::editor::{self, EditMode, ParcelSubmission};
use pv_parcel::parcel::Parcel;
use std::fmt;

/// How a UI element refers to a parcel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParcelRef {
    /// Sidebar entries carry the catalog id
    Id(String),
    /// Map clicks carry the boundary's kmlId
    KmlId(String),
}

impl fmt::Display for ParcelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParcelRef::Id(id) => write!(f, "id {}", id),
            ParcelRef::KmlId(kml_id) => write!(f, "kmlId {}", kml_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(ParcelRef),
    ChangeDate(usize),
    ToggleNdvi,
    ToggleGrid,
    Clear,
}

/// State of the statistics table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsStatus {
    Pending,
    Loaded(LoadSummary),
    Failed(String),
}

/// Result of a committed edit.
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    pub parcel_id: String,
    /// Whole catalog, ready to download
    pub document: String,
    pub filename: String,
    /// Present when the edited parcel is the selected one
    pub render: Option<Render>,
}

pub struct Viewer {
    config: ViewerConfig,
    catalog: CatalogStore,
    stats: Database,
    stats_status: StatsStatus,
    selection: Selection,
    ndvi_requested: bool,
    grid_requested: bool,
    grid_generation: u64,
    notice: Option<Notice>,
}

impl Viewer {
    /// Create a viewer with an empty catalog and statistics index.
    pub fn new(config: ViewerConfig) -> Result<Self, ViewError> {
        Ok(Self {
            config,
            catalog: CatalogStore::new(),
            stats: Database::new()?,
            stats_status: StatsStatus::Pending,
            selection: Selection::default(),
            ndvi_requested: false,
            grid_requested: false,
            grid_generation: 0,
            notice: None,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn statistics(&self) -> &Database {
        &self.stats
    }

    pub fn stats_status(&self) -> &StatsStatus {
        &self.stats_status
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn ndvi_requested(&self) -> bool {
        self.ndvi_requested
    }

    pub fn grid_requested(&self) -> bool {
        self.grid_requested
    }

    /// Replace the catalog. Any selection is dropped first.
    ///
    /// On error the catalog is left empty and the viewer is unusable.
    pub fn load_catalog(&mut self, source: &str) -> Result<usize, ViewError> {
        self.selection.clear();
        self.grid_generation += 1;
        let count = self.catalog.load(source)?.len();
        Ok(count)
    }

    /// Load the statistics table. A failure only disables statistics.
    pub fn load_statistics(&mut self, csv_data: &str) -> Result<LoadSummary, ViewError> {
        match self.stats.load_statistics(csv_data) {
            Ok(summary) => {
                self.stats_status = StatsStatus::Loaded(summary);
                Ok(summary)
            }
            Err(e) => {
                warn!("[PV] viewer: statistics unavailable: {}", e);
                self.stats_status = StatsStatus::Failed(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Record that the statistics table could not be fetched.
    pub fn statistics_unavailable(&mut self, reason: &str) {
        warn!("[PV] viewer: statistics unavailable: {}", reason);
        self.stats_status = StatsStatus::Failed(reason.to_string());
    }

    /// The selected parcel, if any.
    pub fn current_parcel(&self) -> Option<&Parcel> {
        self.active_parcel().map(|(_, parcel)| parcel)
    }

    fn active_parcel(&self) -> Option<(&ActiveSelection, &Parcel)> {
        let active = self.selection.active()?;
        let parcel = self.catalog.find_by_id(active.parcel_id())?;
        Some((active, parcel))
    }

    pub fn dispatch(&mut self, command: Command) -> Render {
        debug!("[PV] viewer: {:?}", command);
        self.notice = None;
        let grid = match command {
            Command::Select(reference) => {
                let found = match &reference {
                    ParcelRef::Id(id) => self.catalog.find_by_id(id),
                    ParcelRef::KmlId(kml_id) => self.catalog.find_by_kml_id(kml_id),
                };
                match found {
                    None => {
                        info!("[PV] viewer: no catalog entry for {}", reference);
                        self.notice = Some(Notice::UnknownParcel {
                            reference: reference.to_string(),
                        });
                        GridInstruction::Keep
                    }
                    Some(parcel) => {
                        match self.selection.select(parcel) {
                            Transition::NoImagery => {
                                self.notice = Some(Notice::NoImagery {
                                    name: parcel.name.clone(),
                                });
                            }
                            transition => {
                                debug!("[PV] viewer: {} -> {:?}", parcel.id, transition);
                            }
                        }
                        self.grid_instruction()
                    }
                }
            }
            Command::ChangeDate(index) => match self.selection.change_date(index) {
                Transition::DateChanged { .. } => self.grid_instruction(),
                _ => GridInstruction::Keep,
            },
            Command::ToggleNdvi => {
                self.ndvi_requested = !self.ndvi_requested;
                GridInstruction::Keep
            }
            Command::ToggleGrid => {
                self.grid_requested = !self.grid_requested;
                self.grid_instruction()
            }
            Command::Clear => {
                self.selection.clear();
                self.grid_instruction()
            }
        };
        Render {
            frame: self.frame(),
            grid,
        }
    }

    // Every call starts a new generation, so responses to earlier
    // requests are recognised as stale.
    fn grid_instruction(&mut self) -> GridInstruction {
        self.grid_generation += 1;
        if !self.grid_requested {
            return GridInstruction::Clear;
        }
        let Some((active, parcel)) = self.active_parcel() else {
            return GridInstruction::Clear;
        };
        match grid_locator(parcel, active.date(), &self.config.grid_pattern) {
            Some(locator) => GridInstruction::Fetch(GridRequest {
                generation: self.grid_generation,
                parcel_id: parcel.id.clone(),
                date: active.date().to_string(),
                locator,
            }),
            None => GridInstruction::Clear,
        }
    }

    /// Turn a finished grid fetch into an overlay, or drop it.
    ///
    /// Dropped when the fetch failed, the document is unusable, or the
    /// selection has moved on since `request` was issued.
    pub fn apply_grid_response(
        &self,
        request: &GridRequest,
        response: Result<String, String>,
    ) -> Option<GridOverlay> {
        let live = self.grid_requested
            && request.generation == self.grid_generation
            && self.selection.parcel_id() == Some(request.parcel_id.as_str())
            && self.selection.date() == Some(request.date.as_str());
        if !live {
            debug!(
                "[PV] viewer: discarding stale grid response for {} {}",
                request.parcel_id, request.date
            );
            return None;
        }
        let body = match response {
            Ok(body) => body,
            Err(e) => {
                warn!("[PV] viewer: grid fetch failed for {}: {}", request.locator, e);
                return None;
            }
        };
        match parse_overlay(&body, &self.config) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                warn!("[PV] viewer: grid overlay {} unusable: {}", request.locator, e);
                None
            }
        }
    }

    /// Project the current state.
    pub fn frame(&self) -> Frame {
        let mut frame = Frame {
            ndvi_requested: self.ndvi_requested,
            grid_requested: self.grid_requested,
            notice: self.notice.clone(),
            ..Frame::default()
        };
        let Some((active, parcel)) = self.active_parcel() else {
            return frame;
        };

        let resolution = resolve(parcel, active.dates(), active.index(), self.ndvi_requested);
        if frame.notice.is_none() {
            frame.notice = match &resolution {
                Resolution::FellBack { .. } => Some(Notice::NdviFallback {
                    date: active.date().to_string(),
                }),
                Resolution::Missing { date } => Some(Notice::ImageryMissing { date: date.clone() }),
                Resolution::NoDate { index } => Some(Notice::NoDateAt { index: *index }),
                Resolution::Found { .. } => None,
            };
        }
        frame.stats = self.stats_view(parcel, active.date());
        frame.selection = Some(SelectedView {
            parcel_id: parcel.id.clone(),
            kml_id: parcel.kml_id.clone(),
            name: parcel.name.clone(),
            location: parcel.location.clone(),
            dates: active.dates().to_vec(),
            date_index: active.index(),
            date: active.date().to_string(),
        });
        frame.imagery = Some(resolution);
        frame
    }

    fn stats_view(&self, parcel: &Parcel, date: &str) -> StatsView {
        if !self.ndvi_requested {
            return StatsView::Hidden;
        }
        if !parcel.csv_available {
            return StatsView::NotAvailable;
        }
        match &self.stats_status {
            StatsStatus::Pending => StatsView::Loading,
            StatsStatus::Failed(_) => StatsView::NotAvailable,
            StatsStatus::Loaded(_) => match self.stats.lookup(&parcel.kml_id, date) {
                Ok(Some(stats)) => StatsView::Values {
                    date: date.to_string(),
                    stats,
                },
                Ok(None) => StatsView::NotFound {
                    date: date.to_string(),
                },
                Err(e) => {
                    warn!("[PV] viewer: statistics lookup failed: {}", e);
                    StatsView::NotFound {
                        date: date.to_string(),
                    }
                }
            },
        }
    }

    /// Validate and commit an editor submission.
    ///
    /// When the edited parcel is selected, its timeline is re-derived and
    /// the outcome carries the new render.
    pub fn commit_edit(
        &mut self,
        submission: &ParcelSubmission,
        mode: EditMode,
    ) -> Result<EditOutcome, ViewError> {
        let parcel = editor::commit(&mut self.catalog, submission, mode)?;
        let render = if self.selection.parcel_id() == Some(parcel.id.as_str()) {
            self.notice = None;
            if self.selection.refresh(&parcel) == Transition::NoImagery {
                self.notice = Some(Notice::NoImagery {
                    name: parcel.name.clone(),
                });
            }
            let grid = self.grid_instruction();
            Some(Render {
                frame: self.frame(),
                grid,
            })
        } else {
            None
        };
        Ok(EditOutcome {
            parcel_id: parcel.id,
            document: self.export_document()?,
            filename: self.config.export_filename.clone(),
            render,
        })
    }

    /// The whole catalog as the downloadable document.
    pub fn export_document(&self) -> Result<String, ViewError> {
        Ok(self.catalog.to_document()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_parcel::editor::LayerEntry;
    use pv_parcel::parcel::Variant;

    const CATALOG: &str = r#"[
        {"id":"f1","kmlId":"42","name":"Kuzey","location":"Bademli","csvAvailable":true,
         "layers":{"01-06-2024":"rgb_url","01-06-2024-NDVI":"ndvi_url","15-06-2024":"rgb2_url"}},
        {"id":"f2","kmlId":"43","name":"Güney","location":"Bademli",
         "gridBaseUrl":"https://cdn/grids",
         "layers":{"03-05-2024":"rgb3_url"}},
        {"id":"f3","kmlId":"44","name":"Boş","location":"Bademli",
         "layers":{"03-05-2024-NDVI":"only_ndvi"}}
    ]"#;

    const STATS: &str = "kmlId,date,mean,min,max\n42,01-06-2024,0.61,0.20,0.83\n";

    fn viewer() -> Viewer {
        let mut viewer = Viewer::new(ViewerConfig::default()).unwrap();
        viewer.load_catalog(CATALOG).unwrap();
        viewer
    }

    fn select_id(id: &str) -> Command {
        Command::Select(ParcelRef::Id(id.to_string()))
    }

    fn fetch_of(render: &Render) -> GridRequest {
        match &render.grid {
            GridInstruction::Fetch(request) => request.clone(),
            other => panic!("expected a grid fetch, got {:?}", other),
        }
    }

    const GRID_BODY: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"ndvi_mean":0.5,"elevation_mean":400},"geometry":null}]}"#;

    #[test]
    fn select_resolves_first_date() {
        let mut v = viewer();
        let render = v.dispatch(Command::Select(ParcelRef::KmlId(" 42 ".to_string())));
        let selected = render.frame.selection.unwrap();
        assert_eq!(selected.parcel_id, "f1");
        assert_eq!(selected.date, "01-06-2024");
        assert_eq!(render.frame.imagery.unwrap().url(), Some("rgb_url"));
        assert_eq!(render.frame.stats, StatsView::Hidden);
        assert_eq!(render.grid, GridInstruction::Clear);
    }

    #[test]
    fn ndvi_toggle_switches_imagery_and_falls_back() {
        let mut v = viewer();
        v.dispatch(select_id("f1"));
        let render = v.dispatch(Command::ToggleNdvi);
        assert_eq!(
            render.frame.imagery,
            Some(Resolution::Found {
                url: "ndvi_url".to_string(),
                variant: Variant::Ndvi
            })
        );
        assert_eq!(render.grid, GridInstruction::Keep);

        let render = v.dispatch(Command::ChangeDate(1));
        assert_eq!(
            render.frame.imagery,
            Some(Resolution::FellBack {
                url: "rgb2_url".to_string()
            })
        );
        assert_eq!(
            render.frame.notice,
            Some(Notice::NdviFallback {
                date: "15-06-2024".to_string()
            })
        );
    }

    #[test]
    fn reselect_deselects_and_clears_imagery() {
        let mut v = viewer();
        v.dispatch(select_id("f1"));
        let render = v.dispatch(Command::Select(ParcelRef::KmlId("42".to_string())));
        assert!(render.frame.selection.is_none());
        assert!(render.frame.imagery.is_none());
        assert_eq!(render.grid, GridInstruction::Clear);
    }

    #[test]
    fn parcel_without_rgb_dates_is_not_selected() {
        let mut v = viewer();
        v.dispatch(select_id("f1"));
        let render = v.dispatch(select_id("f3"));
        assert!(render.frame.selection.is_none());
        assert!(!v.selection().is_selected());
        assert_eq!(
            render.frame.notice,
            Some(Notice::NoImagery {
                name: "Boş".to_string()
            })
        );
    }

    #[test]
    fn unknown_parcel_keeps_selection() {
        let mut v = viewer();
        v.dispatch(select_id("f1"));
        let render = v.dispatch(Command::Select(ParcelRef::KmlId("999".to_string())));
        assert_eq!(render.frame.selection.unwrap().parcel_id, "f1");
        assert!(matches!(render.frame.notice, Some(Notice::UnknownParcel { .. })));
        assert_eq!(render.grid, GridInstruction::Keep);
    }

    #[test]
    fn change_date_clamps_and_label_matches_imagery() {
        let mut v = viewer();
        v.dispatch(select_id("f1"));
        let render = v.dispatch(Command::ChangeDate(10));
        let selected = render.frame.selection.unwrap();
        assert_eq!(selected.date_index, 1);
        assert_eq!(selected.date, "15-06-2024");
        assert_eq!(render.frame.imagery.unwrap().url(), Some("rgb2_url"));
    }

    #[test]
    fn stats_follow_ndvi_and_csv_flag() {
        let mut v = viewer();
        v.dispatch(select_id("f1"));
        let render = v.dispatch(Command::ToggleNdvi);
        assert_eq!(render.frame.stats, StatsView::Loading);

        v.load_statistics(STATS).unwrap();
        let frame = v.frame();
        assert!(matches!(frame.stats, StatsView::Values { .. }));

        let render = v.dispatch(Command::ChangeDate(1));
        assert_eq!(
            render.frame.stats,
            StatsView::NotFound {
                date: "15-06-2024".to_string()
            }
        );

        let render = v.dispatch(select_id("f2"));
        assert_eq!(render.frame.stats, StatsView::NotAvailable);
    }

    #[test]
    fn failed_statistics_degrade_to_not_available() {
        let mut v = viewer();
        assert!(v.load_statistics("no,header\n").is_err());
        v.dispatch(select_id("f1"));
        let render = v.dispatch(Command::ToggleNdvi);
        assert_eq!(render.frame.stats, StatsView::NotAvailable);
        assert!(render.frame.selection.is_some());
    }

    #[test]
    fn grid_toggle_issues_fetch_with_override() {
        let mut v = viewer();
        v.dispatch(select_id("f2"));
        let render = v.dispatch(Command::ToggleGrid);
        let request = fetch_of(&render);
        assert_eq!(request.locator, "https://cdn/grids/G%C3%BCney_05-03-2024_grid.geojson");

        let overlay = v
            .apply_grid_response(&request, Ok(GRID_BODY.to_string()))
            .unwrap();
        assert_eq!(overlay.labels.len(), 1);

        assert_eq!(v.dispatch(Command::ToggleGrid).grid, GridInstruction::Clear);
    }

    #[test]
    fn stale_grid_response_after_parcel_switch_is_discarded() {
        let mut v = viewer();
        v.dispatch(Command::ToggleGrid);
        let first = fetch_of(&v.dispatch(select_id("f1")));
        let second = fetch_of(&v.dispatch(select_id("f2")));
        assert!(second.generation > first.generation);

        assert!(v
            .apply_grid_response(&first, Ok(GRID_BODY.to_string()))
            .is_none());
        assert!(v
            .apply_grid_response(&second, Ok(GRID_BODY.to_string()))
            .is_some());
    }

    #[test]
    fn stale_grid_response_after_toggle_off_or_date_change_is_discarded() {
        let mut v = viewer();
        v.dispatch(Command::ToggleGrid);
        let request = fetch_of(&v.dispatch(select_id("f1")));
        v.dispatch(Command::ChangeDate(1));
        assert!(v
            .apply_grid_response(&request, Ok(GRID_BODY.to_string()))
            .is_none());

        let request = fetch_of(&v.dispatch(Command::ChangeDate(0)));
        v.dispatch(Command::ToggleGrid);
        assert!(v
            .apply_grid_response(&request, Ok(GRID_BODY.to_string()))
            .is_none());
    }

    #[test]
    fn failed_grid_fetch_is_dropped() {
        let mut v = viewer();
        v.dispatch(Command::ToggleGrid);
        let request = fetch_of(&v.dispatch(select_id("f1")));
        assert!(v
            .apply_grid_response(&request, Err("HTTP 404".to_string()))
            .is_none());
        assert!(v
            .apply_grid_response(&request, Ok("not json".to_string()))
            .is_none());
    }

    #[test]
    fn clear_drops_selection_and_overlay() {
        let mut v = viewer();
        v.dispatch(Command::ToggleGrid);
        v.dispatch(select_id("f1"));
        let render = v.dispatch(Command::Clear);
        assert_eq!(render.frame.selection, None);
        assert_eq!(render.frame.imagery, None);
        assert_eq!(render.grid, GridInstruction::Clear);
    }

    fn edit_of_f1(dates: &[&str]) -> ParcelSubmission {
        let v = viewer();
        let mut form = ParcelSubmission::from_parcel(v.catalog().find_by_id("f1").unwrap());
        form.layers = dates
            .iter()
            .map(|d| LayerEntry {
                date: d.to_string(),
                rgb_url: format!("https://t/{}/{{z}}/{{x}}/{{y}}.png", d),
                ndvi_url: String::new(),
            })
            .collect();
        form
    }

    #[test]
    fn editing_selected_parcel_redrives_selection() {
        let mut v = viewer();
        v.dispatch(select_id("f1"));
        v.dispatch(Command::ChangeDate(1));

        let outcome = v
            .commit_edit(&edit_of_f1(&["20-05-2024", "15-06-2024"]), EditMode::Update)
            .unwrap();
        assert_eq!(outcome.filename, "parcels.json");
        assert!(outcome.document.contains("20-05-2024"));
        let frame = outcome.render.unwrap().frame;
        let selected = frame.selection.unwrap();
        assert_eq!(selected.dates, vec!["20-05-2024", "15-06-2024"]);
        assert_eq!(selected.date, "15-06-2024");
        assert_eq!(
            frame.imagery.unwrap().url(),
            Some("https://t/15-06-2024/{z}/{x}/{y}.png")
        );
    }

    #[test]
    fn editing_other_parcel_leaves_selection_alone() {
        let mut v = viewer();
        v.dispatch(select_id("f2"));
        let outcome = v
            .commit_edit(&edit_of_f1(&["20-05-2024"]), EditMode::Update)
            .unwrap();
        assert!(outcome.render.is_none());
        assert_eq!(v.selection().parcel_id(), Some("f2"));
    }

    #[test]
    fn rejected_edit_changes_nothing() {
        let mut v = viewer();
        let mut form = edit_of_f1(&["20-05-2024"]);
        form.kml_id = "43".to_string();
        let err = v.commit_edit(&form, EditMode::Update).unwrap_err();
        assert!(matches!(err, ViewError::Editor(_)));
        assert_eq!(v.catalog().find_by_id("f1").unwrap().kml_id, "42");

        let err = v.commit_edit(&edit_of_f1(&["20-05-2024"]), EditMode::Add).unwrap_err();
        assert!(matches!(err, ViewError::Editor(_)));
    }

    #[test]
    fn failed_catalog_load_leaves_nothing() {
        let mut v = viewer();
        v.dispatch(select_id("f1"));
        assert!(v.load_catalog("[{\"id\":").is_err());
        assert!(v.catalog().is_empty());
        assert_eq!(v.frame().selection, None);
    }
}
