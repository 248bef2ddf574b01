//! Typed lookups against the statistics table.

use crate::models::Stats;
use crate::Database;
use pv_parcel::parcel::normalize_kml_id;
use pv_utils::dates::parse_ui_date;
use rusqlite::{params, OptionalExtension};

impl Database {
    /// Statistics for one parcel on one date.
    ///
    /// The kmlId is matched trimmed and case-insensitively, like the
    /// catalog does.
    pub fn lookup(&self, kml_id: &str, date: &str) -> anyhow::Result<Option<Stats>> {
        let conn = self.conn.borrow();
        let stats = conn
            .query_row(
                "SELECT mean, min, max FROM parcel_stats WHERE kml_key = ?1 AND date = ?2",
                params![normalize_kml_id(kml_id), date.trim()],
                |row| {
                    Ok(Stats {
                        mean: row.get(0)?,
                        min: row.get(1)?,
                        max: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(stats)
    }

    /// Dates with statistics for a parcel, oldest first.
    ///
    /// Dates that do not parse as `DD-MM-YYYY` are listed last.
    pub fn dates_for(&self, kml_id: &str) -> anyhow::Result<Vec<String>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare("SELECT date FROM parcel_stats WHERE kml_key = ?1")?;
        let mut dates = stmt
            .query_map(params![normalize_kml_id(kml_id)], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        dates.sort_by_key(|d| {
            let parsed = parse_ui_date(d).ok();
            (parsed.is_none(), parsed, d.clone())
        });
        Ok(dates)
    }

    /// Number of stored rows.
    pub fn count(&self) -> anyhow::Result<usize> {
        let conn = self.conn.borrow();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM parcel_stats", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
