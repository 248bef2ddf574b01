//! Shared utility functions for the parcel viewer crates.

/// Date utility functions.
///
/// Imagery dates are written `DD-MM-YYYY` everywhere in the catalog. Grid
/// overlay files are named with `MM-DD-YYYY` instead.
pub mod dates {
    use chrono::NaiveDate;

    /// chrono format of the catalog date keys
    pub const UI_DATE_FORMAT: &str = "%d-%m-%Y";

    /// True when `s` is exactly two digits, dash, two digits, dash, four digits.
    pub fn is_ui_date_pattern(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == 10
            && bytes.iter().enumerate().all(|(i, b)| match i {
                2 | 5 => *b == b'-',
                _ => b.is_ascii_digit(),
            })
    }

    /// Parse a `DD-MM-YYYY` date. The pattern must match exactly and the
    /// result must be a real calendar day.
    pub fn parse_ui_date(s: &str) -> anyhow::Result<NaiveDate> {
        if !is_ui_date_pattern(s) {
            anyhow::bail!("'{}' is not in DD-MM-YYYY form", s);
        }
        Ok(NaiveDate::parse_from_str(s, UI_DATE_FORMAT)?)
    }

    /// Format a NaiveDate as `DD-MM-YYYY`.
    pub fn format_ui_date(date: &NaiveDate) -> String {
        date.format(UI_DATE_FORMAT).to_string()
    }

    /// Swap day and month: `01-06-2024` becomes `06-01-2024`.
    ///
    /// Grid overlay files use month-first names while the catalog is
    /// day-first. The characters are moved as-is, nothing is re-validated.
    pub fn ui_to_grid_date(s: &str) -> Option<String> {
        if !is_ui_date_pattern(s) {
            return None;
        }
        Some(format!("{}-{}-{}", &s[3..5], &s[0..2], &s[6..10]))
    }

}

/// URL helpers
pub mod urls {
    /// Percent-encode a single path component with the same set of
    /// unescaped characters as the browser's `encodeURIComponent`.
    pub fn encode_component(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for b in s.bytes() {
            match b {
                b'A'..=b'Z'
                | b'a'..=b'z'
                | b'0'..=b'9'
                | b'-'
                | b'_'
                | b'.'
                | b'!'
                | b'~'
                | b'*'
                | b'\''
                | b'('
                | b')' => out.push(b as char),
                _ => out.push_str(&format!("%{:02X}", b)),
            }
        }
        out
    }

    /// Append a `v=<stamp>` query parameter so the browser and any proxy
    /// fetch a fresh copy.
    pub fn with_cache_bust(url: &str, stamp: u64) -> String {
        let separator = if url.contains('?') { '&' } else { '?' };
        format!("{}{}v={}", url, separator, stamp)
    }

    /// Join a base URL and a file name with exactly one `/`.
    pub fn join(base: &str, file: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), file)
    }

}
