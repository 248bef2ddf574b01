//! Date/layer resolution.
//!
//! Pure function of (parcel, date index, NDVI toggle). Same inputs, same
//! answer; nothing is cached between calls.

use pv_parcel::parcel::{Parcel, Variant};
use serde::Serialize;

/// Which imagery to show for the selected date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Resolution {
    /// The requested variant exists.
    Found { url: String, variant: Variant },
    /// NDVI was requested but only RGB exists for this date.
    FellBack { url: String },
    /// Nothing to show for this date.
    Missing { date: String },
    /// The date index points past the end of the date list.
    NoDate { index: usize },
}

impl Resolution {
    /// Tile template to display, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Resolution::Found { url, .. } | Resolution::FellBack { url } => Some(url.as_str()),
            Resolution::Missing { .. } | Resolution::NoDate { .. } => None,
        }
    }

    pub fn fell_back(&self) -> bool {
        matches!(self, Resolution::FellBack { .. })
    }
}

/// Resolve the imagery for `dates[date_index]` of `parcel`.
///
/// `dates` is the parcel's available date list; an index outside it
/// resolves to `NoDate`.
pub fn resolve(parcel: &Parcel, dates: &[String], date_index: usize, ndvi: bool) -> Resolution {
    let Some(date) = dates.get(date_index) else {
        return Resolution::NoDate { index: date_index };
    };
    resolve_date(parcel, date, ndvi)
}

/// Resolve the imagery for an explicit date string.
pub fn resolve_date(parcel: &Parcel, date: &str, ndvi: bool) -> Resolution {
    let variant = Variant::requested(ndvi);
    if let Some(url) = parcel.layer(date, variant) {
        return Resolution::Found {
            url: url.to_string(),
            variant,
        };
    }
    if variant == Variant::Ndvi {
        if let Some(url) = parcel.layer(date, Variant::Rgb) {
            return Resolution::FellBack {
                url: url.to_string(),
            };
        }
    }
    Resolution::Missing {
        date: date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn parcel(layers: &[(&str, &str)]) -> Parcel {
        Parcel {
            id: "f1".to_string(),
            kml_id: "42".to_string(),
            name: "North".to_string(),
            location: "Bademli".to_string(),
            csv_available: true,
            grid_base_url: None,
            layers: layers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn ndvi_and_rgb_both_present() {
        let p = parcel(&[("01-06-2024", "rgb_url"), ("01-06-2024-NDVI", "ndvi_url")]);
        let dates = p.available_dates();
        assert_eq!(
            resolve(&p, &dates, 0, true),
            Resolution::Found {
                url: "ndvi_url".to_string(),
                variant: Variant::Ndvi
            }
        );
        assert_eq!(
            resolve(&p, &dates, 0, false),
            Resolution::Found {
                url: "rgb_url".to_string(),
                variant: Variant::Rgb
            }
        );
    }

    #[test]
    fn ndvi_missing_falls_back_to_rgb() {
        let p = parcel(&[("01-06-2024", "rgb_url")]);
        let dates = p.available_dates();
        let r = resolve(&p, &dates, 0, true);
        assert_eq!(r.url(), Some("rgb_url"));
        assert!(r.fell_back());
    }

    #[test]
    fn nothing_for_date_is_missing() {
        let p = parcel(&[("01-06-2024-NDVI", "ndvi_url")]);
        assert_eq!(
            resolve_date(&p, "01-06-2024", false),
            Resolution::Missing {
                date: "01-06-2024".to_string()
            }
        );
    }

    #[test]
    fn index_past_the_end_keeps_the_index() {
        let p = parcel(&[("01-06-2024", "rgb_url")]);
        let dates = p.available_dates();
        let r = resolve(&p, &dates, 3, true);
        assert_eq!(r, Resolution::NoDate { index: 3 });
        assert!(r.url().is_none());
        assert!(!r.fell_back());
    }

    #[test]
    fn resolution_is_deterministic() {
        let p = parcel(&[
            ("01-06-2024", "a"),
            ("15-06-2024", "b"),
            ("15-06-2024-NDVI", "c"),
        ]);
        let dates = p.available_dates();
        for index in 0..3 {
            for ndvi in [false, true] {
                assert_eq!(resolve(&p, &dates, index, ndvi), resolve(&p, &dates, index, ndvi));
            }
        }
    }
}
