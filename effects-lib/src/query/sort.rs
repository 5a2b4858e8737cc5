//! Sort engine.

use std::cmp::Ordering;

use super::order::{Direction, SortField, SortState};
use super::BASELINE_CATEGORY;
use crate::model::{NEGATIVE_TAG, POSITIVE_TAG, Record};

/// Ordering key for the tags column: positive first, negative last.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum TagKey {
    Positive,
    Other(String),
    Untagged,
    Negative,
}

fn tag_key(record: &Record) -> TagKey {
    if record.has_tag(POSITIVE_TAG) {
        TagKey::Positive
    } else if record.has_tag(NEGATIVE_TAG) {
        TagKey::Negative
    } else {
        match record.tags().first() {
            Some(first) => TagKey::Other(first.to_lowercase()),
            None => TagKey::Untagged,
        }
    }
}

/// Empty categories sort after every named one.
fn category_key(record: &Record) -> (bool, String) {
    (record.category().is_empty(), record.category().to_lowercase())
}

/// Baseline-first ordering that ignores direction.
fn pinned(a: &Record, b: &Record, field: SortField) -> Ordering {
    if field != SortField::Category {
        return Ordering::Equal;
    }
    let a_base = a.category() == BASELINE_CATEGORY;
    let b_base = b.category() == BASELINE_CATEGORY;
    b_base.cmp(&a_base)
}

/// Compares two records on one field in ascending order.
pub fn compare_field(a: &Record, b: &Record, field: SortField) -> Ordering {
    match field {
        SortField::Category => category_key(a).cmp(&category_key(b)),
        SortField::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        SortField::Rank => a.rank().value().cmp(&b.rank().value()),
        SortField::Description => a
            .description()
            .to_lowercase()
            .cmp(&b.description().to_lowercase()),
        SortField::Tags => tag_key(a).cmp(&tag_key(b)),
    }
}

/// Compares two records under the full sort cascade.
///
/// Each key breaks ties left by the previous one. A descending key reverses
/// only its own comparison, and the baseline category stays first on the
/// category key in either direction.
pub fn compare(a: &Record, b: &Record, state: &SortState) -> Ordering {
    for &(field, direction) in state.keys() {
        let pin = pinned(a, b, field);
        if pin != Ordering::Equal {
            return pin;
        }
        let ord = compare_field(a, b, field);
        let ord = match direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Returns store positions in sorted order.
///
/// The sort is stable relative to `records`, which is always the load order.
pub fn sort_indices(records: &[Record], state: &SortState) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| compare(&records[a], &records[b], state));
    order
}

/// Returns the records in sorted order without touching the input.
pub fn sort<'a>(records: &'a [Record], state: &SortState) -> Vec<&'a Record> {
    sort_indices(records, state)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}
