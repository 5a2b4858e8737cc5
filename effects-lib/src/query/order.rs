//! Sort keys and header activation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A sortable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Category,
    Name,
    Rank,
    Description,
    Tags,
}

impl SortField {
    /// Every column in header order.
    pub const ALL: [SortField; 5] = [
        SortField::Category,
        SortField::Name,
        SortField::Rank,
        SortField::Description,
        SortField::Tags,
    ];

    /// Returns the header label.
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Category => "Mod",
            SortField::Name => "Effect",
            SortField::Rank => "Max",
            SortField::Description => "Description",
            SortField::Tags => "Tags",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "category" | "mod" => Ok(SortField::Category),
            "name" | "effect" => Ok(SortField::Name),
            "rank" | "max" | "maxlevel" => Ok(SortField::Rank),
            "description" => Ok(SortField::Description),
            "tags" => Ok(SortField::Tags),
            other => Err(format!("unknown sort field '{other}'")),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sort direction for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

/// Ordered sort keys, highest priority first.
///
/// Never empty and never lists a field twice.
///
/// # Example
///
/// ```
/// use effects_lib::query::{Direction, SortField, SortState};
///
/// let mut sort = SortState::asc(SortField::Category).then_asc(SortField::Name);
///
/// // Shift-click on a new column appends it.
/// sort.activate_additive(SortField::Rank);
/// assert_eq!(sort.keys().len(), 3);
///
/// // A plain click replaces the cascade.
/// sort.activate(SortField::Name);
/// assert_eq!(sort.keys(), &[(SortField::Name, Direction::Asc)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    keys: Vec<(SortField, Direction)>,
}

impl Default for SortState {
    /// Mod A-Z, then effect A-Z, then positive tags first.
    fn default() -> Self {
        SortState::asc(SortField::Category)
            .then_asc(SortField::Name)
            .then_asc(SortField::Tags)
    }
}

impl SortState {
    /// Creates an ascending order on a field.
    pub fn asc(field: SortField) -> Self {
        Self {
            keys: vec![(field, Direction::Asc)],
        }
    }

    /// Creates a descending order on a field.
    pub fn desc(field: SortField) -> Self {
        Self {
            keys: vec![(field, Direction::Desc)],
        }
    }

    /// Adds a lower-priority ascending key, or updates the field in place.
    pub fn then_asc(self, field: SortField) -> Self {
        self.then(field, Direction::Asc)
    }

    /// Adds a lower-priority descending key, or updates the field in place.
    pub fn then_desc(self, field: SortField) -> Self {
        self.then(field, Direction::Desc)
    }

    /// Adds a lower-priority key, or updates the field in place.
    pub fn then(mut self, field: SortField, direction: Direction) -> Self {
        match self.keys.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = direction,
            None => self.keys.push((field, direction)),
        }
        self
    }

    /// Returns the keys with their directions, primary first.
    pub fn keys(&self) -> &[(SortField, Direction)] {
        &self.keys
    }

    /// Returns the primary key.
    pub fn primary(&self) -> (SortField, Direction) {
        self.keys[0]
    }

    /// Returns the direction of `field` if it takes part in the sort.
    pub fn direction_of(&self, field: SortField) -> Option<Direction> {
        self.keys.iter().find(|(f, _)| *f == field).map(|(_, d)| *d)
    }

    /// Plain header activation.
    ///
    /// The field becomes the only key. Its direction flips if it was the
    /// primary key, otherwise it starts ascending.
    pub fn activate(&mut self, field: SortField) {
        let (primary, direction) = self.primary();
        let direction = if primary == field {
            direction.toggled()
        } else {
            Direction::Asc
        };
        self.keys = vec![(field, direction)];
    }

    /// Modified (shift) header activation.
    ///
    /// Flips the field in place if present, otherwise appends it ascending
    /// with the lowest priority. Other keys are kept.
    pub fn activate_additive(&mut self, field: SortField) {
        match self.keys.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = entry.1.toggled(),
            None => self.keys.push((field, Direction::Asc)),
        }
    }
}
