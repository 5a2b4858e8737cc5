//! View reconciliation.
//!
//! Every mutating [`Event`] goes through the [`Reconciler`], which re-runs
//! the pipeline (sort, filter, paginate, navigation, projection) in that
//! order and publishes a fresh [`RenderPlan`]. Work that needs post-layout
//! geometry or a fixed delay is queued on the [`Scheduler`] and resumed by
//! the host through [`Reconciler::on_frame`] and [`Reconciler::advance`].

mod effect;
mod layout;
mod plan;
mod reconciler;
mod schedule;

pub use effect::{Container, Effect};
pub use layout::{Bounds, LayoutProbe, Viewport};
pub use plan::{Badge, HeaderPlan, RenderPlan, RowPlan, Zebra};
pub use reconciler::{Reconciler, Update, ViewState};
pub use schedule::{Scheduler, Task, TaskKey};

use crate::model::Record;
use crate::query::{FilterToggle, PageSize, PageTarget, SortField};
use crate::theme::Theme;

/// A user or host event that may change the view.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Replace the record set.
    Load(Vec<Record>),
    SetSearch(String),
    ClearSearch,
    SetFilter(FilterToggle, bool),
    /// A header activation. `additive` is the modified (shift) activation.
    SortHeader { field: SortField, additive: bool },
    SetPageSize(PageSize),
    GoToPage(PageTarget),
    ToggleGroup(String),
    /// A click on a category link in the navigation panel.
    ActivateNavLink(String),
    /// Navigate to a record by id.
    NavigateTo(String),
    /// The location fragment changed outside the reconciler.
    HashChanged(String),
    /// A click outside the highlighted row.
    ClearHighlight,
    TableScrolled(f32),
    NavScrolled(f32),
    SetTheme(Theme),
    SetIgnoreExportFilters(bool),
    /// Export in the named format.
    Export(String),
}
