//! Selection state machine.
//!
//! `Unselected` or `Selected(parcel, date index)`. A `Selected` state always
//! has at least one date and an index inside the date list; every
//! transition below keeps that true.

use pv_parcel::parcel::Parcel;

/// The selected parcel and its timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSelection {
    parcel_id: String,
    dates: Vec<String>,
    index: usize,
}

impl ActiveSelection {
    pub fn parcel_id(&self) -> &str {
        &self.parcel_id
    }

    /// Available dates, oldest first. Never empty.
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn date(&self) -> &str {
        &self.dates[self.index]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(ActiveSelection),
}

/// What a transition did, for the caller to recompute and report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A parcel became selected at its first date.
    Selected,
    /// The active parcel was clicked again and is now deselected.
    Deselected,
    /// The parcel has no dated imagery; nothing is selected.
    NoImagery,
    /// The date index moved (`clamped` when the request was out of range).
    DateChanged { clamped: bool },
    /// Request for the current date, or no parcel selected.
    Unchanged,
    /// Selection was cleared.
    Cleared,
}

impl Selection {
    pub fn active(&self) -> Option<&ActiveSelection> {
        match self {
            Selection::Selected(active) => Some(active),
            Selection::Unselected => None,
        }
    }

    pub fn is_selected(&self) -> bool {
        self.active().is_some()
    }

    pub fn parcel_id(&self) -> Option<&str> {
        self.active().map(ActiveSelection::parcel_id)
    }

    pub fn date(&self) -> Option<&str> {
        self.active().map(ActiveSelection::date)
    }

    /// Select `parcel`. Selecting the parcel that is already active
    /// deselects it.
    pub fn select(&mut self, parcel: &Parcel) -> Transition {
        if self.parcel_id() == Some(parcel.id.as_str()) {
            *self = Selection::Unselected;
            return Transition::Deselected;
        }
        let dates = parcel.available_dates();
        if dates.is_empty() {
            *self = Selection::Unselected;
            return Transition::NoImagery;
        }
        *self = Selection::Selected(ActiveSelection {
            parcel_id: parcel.id.clone(),
            dates,
            index: 0,
        });
        Transition::Selected
    }

    /// Move to another date. Out-of-range indexes are clamped to the last
    /// date. Does nothing while unselected.
    pub fn change_date(&mut self, index: usize) -> Transition {
        let Selection::Selected(active) = self else {
            return Transition::Unchanged;
        };
        let last = active.dates.len() - 1;
        let clamped = index > last;
        let index = index.min(last);
        if index == active.index && !clamped {
            return Transition::Unchanged;
        }
        active.index = index;
        Transition::DateChanged { clamped }
    }

    pub fn clear(&mut self) -> Transition {
        *self = Selection::Unselected;
        Transition::Cleared
    }

    /// Re-derive the timeline after `parcel` (the active one) was edited.
    ///
    /// The index is kept when the same date is still present, else reset
    /// to 0. If the edit removed every date the selection is dropped.
    pub fn refresh(&mut self, parcel: &Parcel) -> Transition {
        let Selection::Selected(active) = self else {
            return Transition::Unchanged;
        };
        if active.parcel_id != parcel.id {
            return Transition::Unchanged;
        }
        let dates = parcel.available_dates();
        if dates.is_empty() {
            *self = Selection::Unselected;
            return Transition::NoImagery;
        }
        let previous = active.date().to_string();
        active.index = dates.iter().position(|d| *d == previous).unwrap_or(0);
        active.dates = dates;
        Transition::Selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn parcel(id: &str, dates: &[&str]) -> Parcel {
        Parcel {
            id: id.to_string(),
            kml_id: format!("k-{}", id),
            name: id.to_uppercase(),
            location: "Bademli".to_string(),
            csv_available: false,
            grid_base_url: None,
            layers: dates
                .iter()
                .map(|d| (d.to_string(), format!("https://t/{}/{{z}}/{{x}}/{{y}}", d)))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn select_starts_at_first_date() {
        let mut s = Selection::default();
        let p = parcel("a", &["15-06-2024", "01-06-2024"]);
        assert_eq!(s.select(&p), Transition::Selected);
        let active = s.active().unwrap();
        assert_eq!(active.index(), 0);
        assert_eq!(active.date(), "01-06-2024");
    }

    #[test]
    fn reselecting_active_parcel_deselects() {
        let mut s = Selection::default();
        let p = parcel("a", &["01-06-2024"]);
        s.select(&p);
        assert_eq!(s.select(&p), Transition::Deselected);
        assert_eq!(s, Selection::Unselected);
        // and a third click selects again
        assert_eq!(s.select(&p), Transition::Selected);
    }

    #[test]
    fn parcel_without_dates_never_selected() {
        let mut s = Selection::default();
        s.select(&parcel("a", &["01-06-2024"]));
        let mut empty = parcel("b", &[]);
        empty
            .layers
            .insert("01-06-2024-NDVI".to_string(), "x".to_string());
        assert_eq!(s.select(&empty), Transition::NoImagery);
        assert!(!s.is_selected());
    }

    #[test]
    fn change_date_clamps() {
        let mut s = Selection::default();
        s.select(&parcel("a", &["01-06-2024", "15-06-2024", "01-07-2024"]));
        assert_eq!(s.change_date(1), Transition::DateChanged { clamped: false });
        assert_eq!(s.change_date(99), Transition::DateChanged { clamped: true });
        assert_eq!(s.active().unwrap().index(), 2);
        assert_eq!(s.date(), Some("01-07-2024"));
        assert_eq!(s.change_date(2), Transition::Unchanged);
    }

    #[test]
    fn change_date_while_unselected_is_noop() {
        let mut s = Selection::default();
        assert_eq!(s.change_date(3), Transition::Unchanged);
        assert_eq!(s, Selection::Unselected);
    }

    #[test]
    fn refresh_keeps_current_date_when_possible() {
        let mut s = Selection::default();
        let p = parcel("a", &["01-06-2024", "15-06-2024"]);
        s.select(&p);
        s.change_date(1);

        let edited = parcel("a", &["01-05-2024", "01-06-2024", "15-06-2024"]);
        assert_eq!(s.refresh(&edited), Transition::Selected);
        assert_eq!(s.date(), Some("15-06-2024"));
        assert_eq!(s.active().unwrap().index(), 2);

        let shrunk = parcel("a", &["01-05-2024"]);
        s.refresh(&shrunk);
        assert_eq!(s.active().unwrap().index(), 0);

        assert_eq!(s.refresh(&parcel("a", &[])), Transition::NoImagery);
        assert!(!s.is_selected());
    }

    #[test]
    fn clear_always_unselects() {
        let mut s = Selection::default();
        s.select(&parcel("a", &["01-06-2024"]));
        assert_eq!(s.clear(), Transition::Cleared);
        assert_eq!(s.parcel_id(), None);
    }
}
