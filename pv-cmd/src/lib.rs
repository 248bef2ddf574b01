//! Command implementations for the parcel viewer CLI.
//!
//! Provides subcommands that check and inspect the viewer's data files
//! (catalog, statistics table, grid overlays) without a browser. Every
//! `<src>` argument is a file path or an `http(s)://` URL.

use clap::Subcommand;

pub mod export;
pub mod grid;
pub mod resolve;
pub mod source;
pub mod stats;
pub mod validate;

#[derive(Subcommand)]
pub enum Command {
    /// Check every catalog record the way the editor would, plus id/kmlId uniqueness
    Validate {
        /// Catalog document (JSON array of parcels)
        #[arg(short = 'c', long)]
        catalog: String,
    },

    /// Print the imagery the viewer would show for a parcel
    Resolve {
        #[arg(short = 'c', long)]
        catalog: String,

        /// Parcel kmlId
        #[arg(short = 'p', long)]
        parcel: String,

        /// Imagery date (DD-MM-YYYY); defaults to the earliest
        #[arg(short = 'd', long, conflicts_with = "index")]
        date: Option<String>,

        /// Position in the parcel's date list (clamped)
        #[arg(short = 'i', long)]
        index: Option<usize>,

        /// Request the NDVI variant
        #[arg(long)]
        ndvi: bool,

        /// Expand the tile template for this tile, as z/x/y
        #[arg(long)]
        tile: Option<String>,

        /// JSON viewer config overriding the defaults
        #[arg(long)]
        config: Option<String>,
    },

    /// Print NDVI statistics for a parcel
    Stats {
        /// Statistics table (CSV)
        #[arg(short = 's', long)]
        stats: String,

        /// Parcel kmlId
        #[arg(short = 'p', long)]
        parcel: String,

        /// Only this date (DD-MM-YYYY)
        #[arg(short = 'd', long)]
        date: Option<String>,
    },

    /// Print the grid overlay locator for a parcel and date
    Grid {
        #[arg(short = 'c', long)]
        catalog: String,

        /// Parcel kmlId
        #[arg(short = 'p', long)]
        parcel: String,

        /// Imagery date (DD-MM-YYYY)
        #[arg(short = 'd', long)]
        date: String,

        /// Also fetch the overlay and print its cell labels
        #[arg(long)]
        fetch: bool,

        /// JSON viewer config overriding the defaults
        #[arg(long)]
        config: Option<String>,
    },

    /// Write the catalog back out sorted and normalized, as the editor exports it
    Export {
        #[arg(short = 'c', long)]
        catalog: String,

        /// Output path
        #[arg(short = 'o', long)]
        output: String,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Validate { catalog } => validate::run_validate(&catalog).await,
        Command::Resolve {
            catalog,
            parcel,
            date,
            index,
            ndvi,
            tile,
            config,
        } => {
            let target = match (date, index) {
                (Some(date), _) => resolve::DateTarget::Date(date),
                (None, Some(index)) => resolve::DateTarget::Index(index),
                (None, None) => resolve::DateTarget::Index(0),
            };
            resolve::run_resolve(&catalog, &parcel, target, ndvi, tile.as_deref(), config.as_deref())
                .await
        }
        Command::Stats {
            stats,
            parcel,
            date,
        } => stats::run_stats(&stats, &parcel, date.as_deref()).await,
        Command::Grid {
            catalog,
            parcel,
            date,
            fetch,
            config,
        } => grid::run_grid(&catalog, &parcel, &date, fetch, config.as_deref()).await,
        Command::Export { catalog, output } => export::run_export(&catalog, &output).await,
    }
}
