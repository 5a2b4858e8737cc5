//! A fixed-height text layout standing in for the browser.
//!
//! Every table row and every navigation line is one unit tall.

use effects_lib::nav::NavEntry;
use effects_lib::view::{Bounds, Container, Effect, LayoutProbe, RenderPlan, Viewport};

const HEADER_HEIGHT: f32 = 1.0;

pub struct TextLayout {
    height: f32,
    rows: Vec<String>,
    /// Group name and line span in the nav panel.
    groups: Vec<(String, f32, f32)>,
    nav_lines: f32,
    table_scroll: f32,
    nav_scroll: f32,
}

impl TextLayout {
    pub fn new(height: usize) -> Self {
        Self {
            height: height as f32,
            rows: Vec::new(),
            groups: Vec::new(),
            nav_lines: 0.0,
            table_scroll: 0.0,
            nav_scroll: 0.0,
        }
    }

    /// Lays out a freshly reconciled plan.
    pub fn update(&mut self, plan: &RenderPlan) {
        self.rows = plan.rows.iter().map(|r| r.id.clone()).collect();
        self.groups.clear();

        let mut line = 0.0;
        for entry in &plan.nav.entries {
            match entry {
                NavEntry::Link(_) => line += 1.0,
                NavEntry::Group(group) => {
                    let top = line;
                    line += 1.0;
                    if group.expanded {
                        line += group.child_count() as f32;
                    }
                    self.groups.push((group.name.clone(), top, line));
                }
            }
        }
        self.nav_lines = line;
        self.table_scroll = self.viewport(Container::Table).clamp(self.table_scroll);
        self.nav_scroll = self.viewport(Container::Nav).clamp(self.nav_scroll);
    }

    /// Applies the scroll effects; smooth scrolls land immediately.
    pub fn apply(&mut self, effects: &[Effect]) {
        for effect in effects {
            if let Effect::SetScrollTop { container, top, .. } = effect {
                match container {
                    Container::Table => self.table_scroll = *top,
                    Container::Nav => self.nav_scroll = *top,
                }
            }
        }
    }

    pub fn table_scroll(&self) -> f32 {
        self.table_scroll
    }
}

impl LayoutProbe for TextLayout {
    fn viewport(&self, container: Container) -> Viewport {
        match container {
            Container::Table => Viewport {
                scroll_top: self.table_scroll,
                scroll_height: HEADER_HEIGHT + self.rows.len() as f32,
                client_height: self.height,
            },
            Container::Nav => Viewport {
                scroll_top: self.nav_scroll,
                scroll_height: self.nav_lines,
                client_height: self.height,
            },
        }
    }

    fn row_offset(&self, id: &str) -> Option<f32> {
        let index = self.rows.iter().position(|r| r == id)?;
        Some(HEADER_HEIGHT + index as f32)
    }

    fn header_height(&self) -> f32 {
        HEADER_HEIGHT
    }

    fn group_bounds(&self, group: &str) -> Option<Bounds> {
        self.groups
            .iter()
            .find(|(name, _, _)| name == group)
            .map(|&(_, top, bottom)| Bounds { top, bottom })
    }
}
