//! Predicate engine.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::BASELINE_CATEGORY;
use crate::model::{EffectKind, Record};

/// The boolean filter toggles, persisted between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterToggles {
    pub show_positive: bool,
    pub show_negative: bool,
    pub show_scaling: bool,
    pub show_baseline: bool,
}

impl Default for FilterToggles {
    fn default() -> Self {
        Self {
            show_positive: true,
            show_negative: true,
            show_scaling: true,
            show_baseline: true,
        }
    }
}

/// Identifies one of the filter toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterToggle {
    Positive,
    Negative,
    Scaling,
    Baseline,
}

/// Current search text and toggles.
///
/// Visibility is a pure function of a record and this state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search_text: String,
    pub show_positive: bool,
    pub show_negative: bool,
    pub show_scaling: bool,
    pub show_baseline: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::with_toggles(FilterToggles::default())
    }
}

impl FilterState {
    /// Creates a state with empty search and the given toggles.
    pub fn with_toggles(toggles: FilterToggles) -> Self {
        Self {
            search_text: String::new(),
            show_positive: toggles.show_positive,
            show_negative: toggles.show_negative,
            show_scaling: toggles.show_scaling,
            show_baseline: toggles.show_baseline,
        }
    }

    /// Returns the toggles for persistence.
    pub fn toggles(&self) -> FilterToggles {
        FilterToggles {
            show_positive: self.show_positive,
            show_negative: self.show_negative,
            show_scaling: self.show_scaling,
            show_baseline: self.show_baseline,
        }
    }

    /// Overwrites every toggle.
    pub fn apply_toggles(&mut self, toggles: FilterToggles) {
        self.show_positive = toggles.show_positive;
        self.show_negative = toggles.show_negative;
        self.show_scaling = toggles.show_scaling;
        self.show_baseline = toggles.show_baseline;
    }

    /// Sets one toggle. Returns `true` if the value changed.
    pub fn set(&mut self, toggle: FilterToggle, on: bool) -> bool {
        let slot = match toggle {
            FilterToggle::Positive => &mut self.show_positive,
            FilterToggle::Negative => &mut self.show_negative,
            FilterToggle::Scaling => &mut self.show_scaling,
            FilterToggle::Baseline => &mut self.show_baseline,
        };
        let changed = *slot != on;
        *slot = on;
        changed
    }

    /// Returns `true` if the record is visible.
    ///
    /// Baseline, then type and scaling decide the candidate set, and search
    /// narrows it.
    pub fn matches(&self, record: &Record) -> bool {
        self.passes_baseline(record) && self.passes_type(record) && self.passes_search(record)
    }

    fn passes_baseline(&self, record: &Record) -> bool {
        self.show_baseline || record.category() != BASELINE_CATEGORY
    }

    fn passes_type(&self, record: &Record) -> bool {
        let Some(kind) = record.kind() else {
            return true;
        };
        let by_type = match kind {
            EffectKind::Positive => self.show_positive,
            EffectKind::Negative => self.show_negative,
        };
        let by_scaling = !record.is_scaling() || self.show_scaling;
        by_type && by_scaling
    }

    fn passes_search(&self, record: &Record) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        record.search_text().contains(&self.search_text.to_lowercase())
    }
}

/// Computes the visibility of every record, keyed by id.
pub fn compute_visibility(records: &[Record], filters: &FilterState) -> HashMap<String, bool> {
    records
        .iter()
        .map(|r| (r.id().to_string(), filters.matches(r)))
        .collect()
}

/// The records passing every predicate, in display order, before paging.
///
/// Holds positions into the record store rather than the records
/// themselves, so pagination and navigation consume the same value instead
/// of re-deriving visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleSet {
    positions: Vec<usize>,
    ids: HashSet<String>,
}

impl VisibleSet {
    /// Filters `order` (positions into `records`) by `filters`.
    pub fn compute(records: &[Record], order: &[usize], filters: &FilterState) -> Self {
        let mut positions = Vec::new();
        let mut ids = HashSet::new();
        for &pos in order {
            let record = &records[pos];
            if filters.matches(record) {
                positions.push(pos);
                ids.insert(record.id().to_string());
            }
        }
        Self { positions, ids }
    }

    /// Returns the store positions of the visible records, in display order.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Returns `true` if the record with `id` is visible.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns the display index of the record with `id`.
    pub fn index_of(&self, records: &[Record], id: &str) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        self.positions.iter().position(|&pos| records[pos].id() == id)
    }

    /// Returns the number of visible records.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_on() -> FilterState {
        FilterState::with_toggles(FilterToggles::default())
    }

    #[test]
    fn test_untyped_passes_type_toggles() {
        let record = Record::new("h", "Foo", "Header");
        let mut filters = all_on();
        filters.set(FilterToggle::Positive, false);
        filters.set(FilterToggle::Negative, false);

        assert!(filters.matches(&record));
    }

    #[test]
    fn test_tag_only_record_obeys_type_toggles() {
        let tagged = Record::new("t", "Foo", "Wither").with_tags(["negative"]);
        let typed = Record::new("u", "Foo", "Wither").with_kind(EffectKind::Negative);
        let mut filters = all_on();
        filters.set(FilterToggle::Negative, false);

        assert!(!filters.matches(&tagged));
        assert!(!filters.matches(&typed));

        filters.set(FilterToggle::Negative, true);
        filters.set(FilterToggle::Positive, false);
        assert!(filters.matches(&tagged));
    }

    #[test]
    fn test_baseline_hidden_regardless_of_type() {
        let record = Record::new("m", BASELINE_CATEGORY, "Plain");
        let mut filters = all_on();
        filters.set(FilterToggle::Baseline, false);

        assert!(!filters.matches(&record));
    }

    #[test]
    fn test_scaling_toggle() {
        let scaling = Record::new("s", "Foo", "Strength").with_tags(["positive", "scaling"]);
        let plain = Record::new("p", "Foo", "Haste").with_tags(["positive"]);
        let mut filters = all_on();
        filters.set(FilterToggle::Scaling, false);

        assert!(!filters.matches(&scaling));
        assert!(filters.matches(&plain));
    }

    #[test]
    fn test_search_narrows_type_visible_set() {
        let pos = Record::new("a", "Foo", "Speed").with_tags(["positive"]);
        let neg = Record::new("b", "Foo", "Slowness").with_tags(["negative"]);
        let mut filters = all_on();
        filters.search_text = "S".into();
        filters.set(FilterToggle::Negative, false);

        assert!(filters.matches(&pos));
        assert!(!filters.matches(&neg));
    }

    #[test]
    fn test_search_matches_rank_and_description() {
        let record = Record::new("a", "Foo", "Speed")
            .with_rank(crate::model::Rank::Label("IV".into()))
            .with_description("Move <b>20%</b> faster");
        let mut filters = all_on();

        filters.search_text = "iv".into();
        assert!(filters.matches(&record));
        filters.search_text = "20% faster".into();
        assert!(filters.matches(&record));
        filters.search_text = "<b>".into();
        assert!(!filters.matches(&record));
    }

    #[test]
    fn test_compute_visibility_is_idempotent() {
        let records = vec![
            Record::new("a", BASELINE_CATEGORY, "Speed").with_tags(["positive"]),
            Record::new("b", "Foo", "Poison").with_tags(["negative", "scaling"]),
            Record::new("c", "Foo", "Header"),
        ];
        let mut filters = all_on();
        filters.set(FilterToggle::Scaling, false);
        filters.search_text = "o".into();

        let first = compute_visibility(&records, &filters);
        let second = compute_visibility(&records, &filters);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(first["b"], false);
    }

    #[test]
    fn test_visible_set_keeps_order() {
        let records = vec![
            Record::new("a", "Foo", "A"),
            Record::new("b", "Foo", "B").with_tags(["negative"]),
            Record::new("c", "Foo", "C"),
        ];
        let mut filters = all_on();
        filters.set(FilterToggle::Negative, false);

        let visible = VisibleSet::compute(&records, &[2, 1, 0], &filters);
        assert_eq!(visible.positions(), &[2, 0]);
        assert_eq!(visible.index_of(&records, "a"), Some(1));
        assert_eq!(visible.index_of(&records, "b"), None);
    }
}
