//! Pagination engine.

use serde::{Deserialize, Serialize};

/// Rows per page. Only 25, 50, 75 and 100 are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    /// The selectable sizes.
    pub const ALLOWED: [u32; 4] = [25, 50, 75, 100];

    /// Returns the size as a row count.
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(25)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("page size {value} is not one of {:?}", Self::ALLOWED))
        }
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

/// Number of pages needed for `count` rows; at least 1.
pub fn total_pages(count: usize, size: PageSize) -> usize {
    count.div_ceil(size.get()).max(1)
}

/// A requested page change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    Prev,
    Next,
    First,
    Last,
    Number(usize),
}

/// Page size and current page.
///
/// `current_page` is 1-based and kept inside `[1, total_pages]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    page_size: PageSize,
    current_page: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl PaginationState {
    /// Creates a state on page 1.
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            current_page: 1,
        }
    }

    /// Returns the page size.
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Returns the current page.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.current_page = 1;
    }

    /// Returns to page 1.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Clamps the current page for `count` visible rows.
    pub fn clamp(&mut self, count: usize) {
        let total = total_pages(count, self.page_size);
        self.current_page = self.current_page.clamp(1, total);
    }

    /// Moves to `target`, clamped to the available pages.
    ///
    /// Returns `true` if the current page changed.
    pub fn go_to(&mut self, target: PageTarget, count: usize) -> bool {
        let total = total_pages(count, self.page_size);
        let wanted = match target {
            PageTarget::Prev => self.current_page.saturating_sub(1),
            PageTarget::Next => self.current_page + 1,
            PageTarget::First => 1,
            PageTarget::Last => total,
            PageTarget::Number(n) => n,
        };
        let next = wanted.clamp(1, total);
        let changed = next != self.current_page;
        self.current_page = next;
        changed
    }

    /// Returns the page that holds the row at display index `index`.
    pub fn page_of(&self, index: usize) -> usize {
        index / self.page_size.get() + 1
    }
}

/// One page of the visible sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Rows on this page, in display order.
    pub items: &'a [T],
    /// The (clamped) page number, 1-based.
    pub current_page: usize,
    /// Total number of pages, at least 1.
    pub total_pages: usize,
    /// Total visible rows across all pages.
    pub total: usize,
    /// 1-based index of the first row on the page, 0 when empty.
    pub start: usize,
    /// 1-based index of the last row on the page, 0 when empty.
    pub end: usize,
}

impl<T> Page<'_, T> {
    /// Returns the summary line shown under the table.
    pub fn info(&self) -> String {
        format!(
            "Showing {} to {} of {} entries.",
            self.start, self.end, self.total
        )
    }
}

/// Slices `visible` to the current page of `state`.
pub fn paginate<'a, T>(visible: &'a [T], state: &PaginationState) -> Page<'a, T> {
    let size = state.page_size.get();
    let total = visible.len();
    let total_pages = total_pages(total, state.page_size);
    let current_page = state.current_page.clamp(1, total_pages);
    let from = ((current_page - 1) * size).min(total);
    let to = (current_page * size).min(total);
    Page {
        items: &visible[from..to],
        current_page,
        total_pages,
        total,
        start: if total == 0 { 0 } else { from + 1 },
        end: to,
    }
}

/// A slot in the compacted page-number list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(usize),
    Ellipsis,
}

/// Computes the compacted page-number list.
///
/// Up to five pages are all shown. Beyond that the first and last page are
/// always present, with up to three pages around the current one and an
/// ellipsis over each gap.
pub fn page_slots(current: usize, total: usize) -> Vec<PageSlot> {
    if total <= 5 {
        return (1..=total).map(PageSlot::Page).collect();
    }
    let mut slots = vec![PageSlot::Page(1)];
    if current <= 3 {
        slots.extend((2..=4).map(PageSlot::Page));
        slots.push(PageSlot::Ellipsis);
        slots.push(PageSlot::Page(total));
    } else if current >= total - 2 {
        slots.push(PageSlot::Ellipsis);
        slots.extend((total - 3..=total).map(PageSlot::Page));
    } else {
        slots.push(PageSlot::Ellipsis);
        slots.extend((current - 1..=current + 1).map(PageSlot::Page));
        slots.push(PageSlot::Ellipsis);
        slots.push(PageSlot::Page(total));
    }
    slots
}

/// A pager control.
///
/// A `None` target means the control is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerItem {
    Prev { target: Option<usize> },
    Page { number: usize, current: bool },
    Ellipsis,
    Next { target: Option<usize> },
}

/// Builds the pager controls. A single page gets no controls at all.
pub fn pager_items(current: usize, total: usize) -> Vec<PagerItem> {
    if total <= 1 {
        return Vec::new();
    }
    let mut items = vec![PagerItem::Prev {
        target: (current > 1).then(|| current - 1),
    }];
    items.extend(page_slots(current, total).into_iter().map(|slot| match slot {
        PageSlot::Page(number) => PagerItem::Page {
            number,
            current: number == current,
        },
        PageSlot::Ellipsis => PagerItem::Ellipsis,
    }));
    items.push(PagerItem::Next {
        target: (current < total).then(|| current + 1),
    });
    items
}
