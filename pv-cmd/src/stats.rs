//! Statistics lookups from the command line.

use crate::source::read_source;
use log::info;
use pv_db::Database;

/// One line per date: `date mean min max`, in date order.
pub fn stats_report(csv_data: &str, kml_id: &str, date: Option<&str>) -> anyhow::Result<String> {
    let db = Database::new()?;
    let summary = db.load_statistics(csv_data)?;
    info!(
        "Loaded {} statistics rows ({} skipped)",
        summary.loaded, summary.skipped
    );

    let dates = match date {
        Some(date) => vec![date.trim().to_string()],
        None => db.dates_for(kml_id)?,
    };
    if dates.is_empty() {
        anyhow::bail!("no statistics for parcel {}", kml_id);
    }

    let mut lines = Vec::with_capacity(dates.len());
    for date in &dates {
        match db.lookup(kml_id, date)? {
            Some(stats) => lines.push(format!(
                "{} mean {:.3} min {:.3} max {:.3}",
                date,
                stats.normalized_mean(),
                stats.min,
                stats.max
            )),
            None => lines.push(format!("{} no statistics", date)),
        }
    }
    Ok(lines.join("\n"))
}

pub async fn run_stats(stats: &str, kml_id: &str, date: Option<&str>) -> anyhow::Result<()> {
    let csv_data = read_source(stats).await?;
    println!("{}", stats_report(&csv_data, kml_id, date)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATS: &str = "kmlId,date,mean,min,max
42,15-06-2024,0.70,0.30,0.90
42,01-06-2024,0.61,0.20,0.83
43,01-06-2024,0.10,0.00,0.20
";

    #[test]
    fn all_dates_in_calendar_order() {
        let out = stats_report(STATS, "42", None).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "01-06-2024 mean 0.610 min 0.200 max 0.830");
        assert!(lines[1].starts_with("15-06-2024"));
    }

    #[test]
    fn single_date() {
        let out = stats_report(STATS, " 43 ", Some("01-06-2024")).unwrap();
        assert_eq!(out, "01-06-2024 mean 0.100 min 0.000 max 0.200");
        let out = stats_report(STATS, "43", Some("02-06-2024")).unwrap();
        assert_eq!(out, "02-06-2024 no statistics");
    }

    #[test]
    fn unknown_parcel_is_an_error() {
        assert!(stats_report(STATS, "99", None).is_err());
    }
}
