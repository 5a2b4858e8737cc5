//! Post-layout geometry supplied by the host.

use super::effect::Container;

/// Scroll metrics of a container.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub scroll_top: f32,
    pub scroll_height: f32,
    pub client_height: f32,
}

impl Viewport {
    /// Largest valid scroll offset.
    pub fn max_scroll(&self) -> f32 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Clamps `top` into `[0, max_scroll]`.
    pub fn clamp(&self, top: f32) -> f32 {
        top.clamp(0.0, self.max_scroll())
    }
}

/// Vertical extent of an element inside its scrolling container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f32,
    pub bottom: f32,
}

/// Reads geometry after the host has laid out the latest render plan.
///
/// Only consulted from frame callbacks, never while an event is being
/// reconciled.
pub trait LayoutProbe {
    /// Returns the scroll metrics of a container.
    fn viewport(&self, container: Container) -> Viewport;

    /// Returns the offset of a displayed row from the top of the table
    /// content, or `None` if the row is not laid out.
    fn row_offset(&self, id: &str) -> Option<f32>;

    /// Returns the height of the sticky table header.
    fn header_height(&self) -> f32;

    /// Returns the extent of a navigation group inside the nav panel.
    fn group_bounds(&self, group: &str) -> Option<Bounds>;
}
