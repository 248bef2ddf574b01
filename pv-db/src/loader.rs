//! CSV loading for the statistics table.
//!
//! # CSV Format
//!
//! Header row required; the five columns are found by name (any order,
//! case-insensitive), extra columns are ignored:
//!
//! ```text
//! kmlId,date,mean,min,max
//! 42,01-06-2024,0.61,0.20,0.83
//! ```
//!
//! A bad row is skipped on its own: wrong column count, a blank kmlId or
//! date, or a mean/min/max that is not a finite number. Only a missing or
//! unusable header fails the whole load.

use crate::models::LoadSummary;
use crate::Database;
use csv::StringRecord;
use pv_parcel::parcel::normalize_kml_id;
use rusqlite::params;

const REQUIRED_COLUMNS: [&str; 5] = ["kmlid", "date", "mean", "min", "max"];

/// Positions of the required columns in the header row.
struct StatsColumns {
    kml_id: usize,
    date: usize,
    mean: usize,
    min: usize,
    max: usize,
}

impl StatsColumns {
    fn locate(headers: &StringRecord) -> anyhow::Result<Self> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(wanted))
                .ok_or_else(|| anyhow::anyhow!("statistics header has no '{}' column", wanted))
        };
        Ok(Self {
            kml_id: find(REQUIRED_COLUMNS[0])?,
            date: find(REQUIRED_COLUMNS[1])?,
            mean: find(REQUIRED_COLUMNS[2])?,
            min: find(REQUIRED_COLUMNS[3])?,
            max: find(REQUIRED_COLUMNS[4])?,
        })
    }
}

fn parse_value(record: &StringRecord, index: usize) -> Option<f64> {
    record
        .get(index)?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

impl Database {
    /// Load vegetation statistics from a CSV string.
    ///
    /// A later row for the same (kmlId, date) replaces an earlier one.
    pub fn load_statistics(&self, csv_data: &str) -> anyhow::Result<LoadSummary> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());
        let headers = rdr.headers()?.clone();
        let columns = StatsColumns::locate(&headers)?;
        let width = headers.len();

        let conn = self.conn.borrow();
        let tx = conn.unchecked_transaction()?;
        let mut summary = LoadSummary::default();
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO parcel_stats (kml_key, date, kml_id, mean, min, max)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for result in rdr.records() {
                let r = match result {
                    Ok(r) => r,
                    Err(e) => {
                        log::debug!("[PV] loader: unreadable statistics row: {}", e);
                        summary.skipped += 1;
                        continue;
                    }
                };
                if r.len() != width {
                    summary.skipped += 1;
                    continue;
                }

                let kml_id = r.get(columns.kml_id).unwrap_or("").trim();
                let date = r.get(columns.date).unwrap_or("").trim();
                if kml_id.is_empty() || date.is_empty() {
                    summary.skipped += 1;
                    continue;
                }

                let (Some(mean), Some(min), Some(max)) = (
                    parse_value(&r, columns.mean),
                    parse_value(&r, columns.min),
                    parse_value(&r, columns.max),
                ) else {
                    summary.skipped += 1;
                    continue;
                };

                stmt.execute(params![normalize_kml_id(kml_id), date, kml_id, mean, min, max])?;
                summary.loaded += 1;
            }
        }
        tx.commit()?;
        log::info!(
            "[PV] loader: Loaded {} statistics rows, skipped {} malformed",
            summary.loaded,
            summary.skipped
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    #[test]
    fn load_statistics_from_csv() {
        let db = Database::new().unwrap();
        let csv = "\
kmlId,date,mean,min,max
42,01-06-2024,0.61,0.20,0.83
42,15-06-2024,0.66,0.25,0.88
43,01-06-2024,0.40,0.10,0.70
";
        let summary = db.load_statistics(csv).unwrap();
        assert_eq!(summary.loaded, 3);
        assert_eq!(summary.skipped, 0);

        let conn = db.conn.borrow();
        let max: f64 = conn
            .query_row(
                "SELECT max FROM parcel_stats WHERE kml_key = '43' AND date = '01-06-2024'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!((max - 0.70).abs() < 1e-9);
    }

    #[test]
    fn malformed_rows_are_skipped_individually() {
        let db = Database::new().unwrap();
        let csv = "\
kmlId,date,mean,min,max
42,01-06-2024,0.61,0.20,0.83
42,02-06-2024,n/a,0.20,0.83
42,03-06-2024,0.5,0.2
,04-06-2024,0.5,0.2,0.9
42,,0.5,0.2,0.9
42,06-06-2024,0.5,0.2,0.9,extra
42,07-06-2024,NaN,0.2,0.9
42,08-06-2024, 0.7 ,0.3,0.95
";
        let summary = db.load_statistics(csv).unwrap();
        assert_eq!(summary.loaded, 2);
        assert_eq!(summary.skipped, 6);
    }

    #[test]
    fn columns_found_by_name() {
        let db = Database::new().unwrap();
        let csv = "\
Date,MAX,min,KmlId,mean,note
01-06-2024,0.9,0.1,A7,0.5,clear sky
";
        db.load_statistics(csv).unwrap();
        let stats = db.lookup("a7", "01-06-2024").unwrap().unwrap();
        assert!((stats.max - 0.9).abs() < 1e-9);
        assert!((stats.mean - 0.5).abs() < 1e-9);
    }

    #[test]
    fn missing_header_column_fails_whole_load() {
        let db = Database::new().unwrap();
        assert!(db.load_statistics("kmlId,date,mean,min\n42,01-06-2024,1,2\n").is_err());
        assert!(db.load_statistics("").is_err());
        assert_eq!(db.count().unwrap(), 0);
    }

    #[test]
    fn later_duplicate_replaces_earlier() {
        let db = Database::new().unwrap();
        let csv = "\
kmlId,date,mean,min,max
42,01-06-2024,0.1,0.0,0.2
42 ,01-06-2024,0.3,0.2,0.4
";
        db.load_statistics(csv).unwrap();
        assert_eq!(db.count().unwrap(), 1);
        let stats = db.lookup("42", "01-06-2024").unwrap().unwrap();
        assert!((stats.mean - 0.3).abs() < 1e-9);
    }
}
