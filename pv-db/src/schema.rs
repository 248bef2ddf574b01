//! SQL schema for the in-memory statistics database.

/// Returns the full SQL schema as a single batch string.
///
/// `parcel_stats` is keyed by the normalized kmlId (trimmed, lowercased) and
/// the `DD-MM-YYYY` date string. The kmlId as written in the source is kept
/// alongside for display.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS parcel_stats (
        kml_key TEXT NOT NULL,
        date TEXT NOT NULL,
        kml_id TEXT NOT NULL,
        mean REAL NOT NULL,
        min REAL NOT NULL,
        max REAL NOT NULL,
        PRIMARY KEY (kml_key, date)
    );
    "#
}
