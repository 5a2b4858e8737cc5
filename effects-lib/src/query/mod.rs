//! Filtering, ordering and paging of the record set.
//!
//! These are the pure stages of the view pipeline. Each takes the output of
//! the previous stage and never mutates its input.
//!
//! - [`FilterState`] / [`VisibleSet`] - which records pass search and toggles
//! - [`SortState`] / [`sort`] - multi-key stable ordering
//! - [`PaginationState`] / [`paginate`] - fixed-size pages over the visible set

mod filter;
mod order;
mod page;
mod sort;

pub use filter::{FilterState, FilterToggle, FilterToggles, VisibleSet, compute_visibility};
pub use order::{Direction, SortField, SortState};
pub use page::{Page, PageSize, PageSlot, PageTarget, PagerItem, PaginationState, page_slots, paginate, pager_items, total_pages};
pub use sort::{compare, compare_field, sort, sort_indices};

/// The category that is pinned first when sorting and can be hidden with its
/// own toggle.
pub const BASELINE_CATEGORY: &str = "Minecraft";
