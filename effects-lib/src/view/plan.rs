//! The projected view: everything the host needs to draw one frame.

use crate::model::{NEGATIVE_TAG, POSITIVE_TAG, Record};
use crate::nav::NavTree;
use crate::query::{Direction, PagerItem, SortField};

/// A tag badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    /// Style class: `pos`, `neg`, `util`, or the tag itself.
    pub class: String,
    /// The tag with its first letter upper-cased.
    pub label: String,
}

impl Badge {
    /// Builds the badge for a tag.
    pub fn for_tag(tag: &str) -> Self {
        let class = match tag {
            POSITIVE_TAG => "pos",
            NEGATIVE_TAG => "neg",
            "utility" => "util",
            other => other,
        };
        let mut chars = tag.chars();
        let label = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        Self {
            class: class.to_string(),
            label,
        }
    }
}

/// Row stripe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zebra {
    Odd,
    Even,
}

impl Zebra {
    fn for_index(index: usize) -> Self {
        if index % 2 == 0 { Zebra::Odd } else { Zebra::Even }
    }
}

/// A displayed table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPlan {
    pub id: String,
    pub category: String,
    pub name: String,
    /// The max level as displayed.
    pub rank: String,
    pub description_html: String,
    pub badges: Vec<Badge>,
    pub source: Option<String>,
    pub zebra: Zebra,
}

impl RowPlan {
    /// Projects a record shown at `index` on the current page.
    pub fn new(record: &Record, index: usize) -> Self {
        Self {
            id: record.id().to_string(),
            category: record.category().to_string(),
            name: record.name().to_string(),
            rank: record.rank().to_string(),
            description_html: record.description_html(),
            badges: record.tags().iter().map(|t| Badge::for_tag(t)).collect(),
            source: record.source().map(str::to_string),
            zebra: Zebra::for_index(index),
        }
    }
}

/// A sortable column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderPlan {
    pub field: SortField,
    pub label: &'static str,
    /// Arrow to show, `None` when the column is not part of the sort.
    pub direction: Option<Direction>,
}

/// The complete derived view after the last reconciliation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderPlan {
    /// Rows on the current page, in display order.
    pub rows: Vec<RowPlan>,
    /// Show the "No results found." placeholder instead of rows.
    pub no_results: bool,
    /// `Showing X to Y of Z entries.`
    pub info: String,
    pub pager: Vec<PagerItem>,
    pub headers: Vec<HeaderPlan>,
    pub nav: NavTree,
    pub current_page: usize,
    pub total_pages: usize,
    /// Records passing every filter, across all pages.
    pub visible_count: usize,
    /// Transition classes are off until the next frame.
    pub transitions_suspended: bool,
    pub search_clear_visible: bool,
    /// The table is scrolled away from the top.
    pub table_scrolled: bool,
    pub dark: bool,
    pub highlighted: Option<String>,
}

impl RenderPlan {
    /// Returns the display index of the row with `id` on this page.
    pub fn row_index(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }
}
