//! The view reconciler.

use std::time::Duration;

use super::Event;
use super::effect::{Container, Effect};
use super::layout::LayoutProbe;
use super::plan::{HeaderPlan, RenderPlan, RowPlan};
use super::schedule::{Scheduler, Task, TaskKey};
use crate::error::ExportError;
use crate::export::{self, ExportFormat, ExportRequest};
use crate::model::Record;
use crate::nav::{NavConfig, NavigationState, build_index};
use crate::query::{
    FilterState, PageTarget, PaginationState, SortField, SortState, VisibleSet, paginate,
    pager_items, sort_indices,
};
use crate::settings::Preferences;
use crate::store::RecordStore;
use crate::theme::Theme;

/// Height transition of a navigation group.
pub const GROUP_ANIMATION: Duration = Duration::from_millis(500);
/// Duration assumed for a smooth table scroll.
pub const SMOOTH_SCROLL: Duration = Duration::from_millis(600);
/// Delay between a row settling into view and its highlight.
pub const HIGHLIGHT_DELAY: Duration = Duration::from_millis(70);
/// A row this close to its target offset counts as already in view.
const SCROLL_TOLERANCE: f32 = 2.0;

/// The mutable view state owned by the reconciler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub filters: FilterState,
    pub sort: SortState,
    pub pagination: PaginationState,
    pub navigation: NavigationState,
    pub theme: Theme,
    pub ignore_export_filters: bool,
}

impl ViewState {
    /// Builds the initial state from stored preferences.
    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self {
            filters: FilterState::with_toggles(prefs.toggles),
            pagination: PaginationState::new(prefs.page_size),
            theme: prefs.theme,
            ignore_export_filters: prefs.ignore_export_filters,
            ..Self::default()
        }
    }

    /// Returns the part of the state that is persisted.
    pub fn preferences(&self) -> Preferences {
        Preferences {
            page_size: self.pagination.page_size(),
            toggles: self.filters.toggles(),
            ignore_export_filters: self.ignore_export_filters,
            theme: self.theme,
        }
    }
}

/// The outcome of one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    pub effects: Vec<Effect>,
    /// A persisted preference changed and should be saved.
    pub preferences_changed: bool,
}

/// Owns the record store and view state and derives the [`RenderPlan`].
///
/// Each event is reconciled to completion before the next one is accepted.
/// The pipeline always runs in the same order: sort, filter, paginate,
/// navigation, projection.
#[derive(Debug)]
pub struct Reconciler {
    store: RecordStore,
    state: ViewState,
    nav_config: NavConfig,
    scheduler: Scheduler,
    /// Store positions in sort order.
    order: Vec<usize>,
    visible: VisibleSet,
    plan: RenderPlan,
    nav_scroll: f32,
    table_scroll: f32,
    highlighted: Option<String>,
    highlight_generation: u64,
    /// Fragment of a navigation still in flight. Its hash-change echo is
    /// ignored.
    pending_fragment: Option<String>,
}

impl Reconciler {
    /// Creates a reconciler with an empty store.
    pub fn new(state: ViewState, nav_config: NavConfig) -> Self {
        let mut reconciler = Self {
            store: RecordStore::new(),
            state,
            nav_config,
            scheduler: Scheduler::new(),
            order: Vec::new(),
            visible: VisibleSet::default(),
            plan: RenderPlan::default(),
            nav_scroll: 0.0,
            table_scroll: 0.0,
            highlighted: None,
            highlight_generation: 0,
            pending_fragment: None,
        };
        reconciler.reconcile();
        reconciler
    }

    /// Creates a reconciler from stored preferences.
    pub fn with_preferences(prefs: &Preferences, nav_config: NavConfig) -> Self {
        Self::new(ViewState::from_preferences(prefs), nav_config)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the plan produced by the last reconciliation.
    pub fn plan(&self) -> &RenderPlan {
        &self.plan
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Returns the records passing the current filters.
    pub fn visible(&self) -> &VisibleSet {
        &self.visible
    }

    /// Returns the visible records in display order, across all pages.
    pub fn visible_records(&self) -> Vec<&Record> {
        let records = self.store.records();
        self.visible.positions().iter().map(|&pos| &records[pos]).collect()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn nav_scroll(&self) -> f32 {
        self.nav_scroll
    }

    pub fn table_scroll(&self) -> f32 {
        self.table_scroll
    }

    /// Returns the currently highlighted row.
    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    /// Returns the export request for the current view.
    pub fn export_request(&self, format: ExportFormat) -> ExportRequest {
        ExportRequest::new(
            format,
            &self.state.filters,
            self.state.theme,
            self.state.ignore_export_filters,
        )
    }

    /// Renders the current export offline.
    pub fn render_export(&self, format: ExportFormat) -> Result<String, ExportError> {
        let request = self.export_request(format);
        let records = export::filter_for_export(self.store.records(), &request);
        export::render(&records, format)
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Applies one event.
    pub fn dispatch(&mut self, event: Event) -> Update {
        let mut update = Update::default();
        match event {
            Event::Load(records) => {
                self.store.replace(records);
                self.reconcile();
            }
            Event::SetSearch(text) => self.set_search(text),
            Event::ClearSearch => self.set_search(String::new()),
            Event::SetFilter(toggle, on) => {
                if self.state.filters.set(toggle, on) {
                    self.state.pagination.reset();
                    self.reconcile();
                    update.preferences_changed = true;
                }
            }
            Event::SortHeader { field, additive } => self.sort_header(field, additive),
            Event::SetPageSize(size) => {
                if size != self.state.pagination.page_size() {
                    self.state.pagination.set_page_size(size);
                    self.reconcile();
                    update.preferences_changed = true;
                }
            }
            Event::GoToPage(target) => {
                if self.state.pagination.go_to(target, self.visible.len()) {
                    self.reconcile();
                    update.effects.push(Effect::SetScrollTop {
                        container: Container::Table,
                        top: 0.0,
                        smooth: true,
                    });
                }
            }
            Event::ToggleGroup(name) => self.toggle_group(&name, &mut update.effects),
            Event::ActivateNavLink(category) => {
                if let Some(link) = self.plan.nav.link(&category)
                    && link.available
                {
                    let id = link.target_id.clone();
                    self.navigate_to(id, true, &mut update.effects);
                }
            }
            Event::NavigateTo(id) => self.navigate_to(id, true, &mut update.effects),
            Event::HashChanged(id) => {
                if self.pending_fragment.as_deref() == Some(id.as_str()) {
                    log::debug!("Ignoring fragment echo for {id}");
                } else {
                    self.navigate_to(id, false, &mut update.effects);
                }
            }
            Event::ClearHighlight => {
                if self.highlighted.take().is_some() {
                    self.plan.highlighted = None;
                    update.effects.push(Effect::ClearHighlight);
                }
            }
            Event::TableScrolled(top) => {
                self.table_scroll = top;
                self.plan.table_scrolled = top > 0.0;
            }
            Event::NavScrolled(top) => self.nav_scroll = top,
            Event::SetTheme(theme) => {
                if theme != self.state.theme {
                    self.state.theme = theme;
                    self.plan.dark = theme.is_dark();
                    update.preferences_changed = true;
                }
            }
            Event::SetIgnoreExportFilters(ignore) => {
                if ignore != self.state.ignore_export_filters {
                    self.state.ignore_export_filters = ignore;
                    update.preferences_changed = true;
                }
            }
            Event::Export(format) => update.effects.push(self.export(&format)),
        }
        update
    }

    /// Runs the tasks queued for the frame after the last render.
    pub fn on_frame(&mut self, probe: &dyn LayoutProbe) -> Vec<Effect> {
        let mut effects = Vec::new();
        for task in self.scheduler.take_frame() {
            self.run(task, probe, &mut effects);
        }
        effects
    }

    /// Moves time forward by `dt` and runs the timers that fell due.
    pub fn advance(&mut self, dt: Duration, probe: &dyn LayoutProbe) -> Vec<Effect> {
        let mut effects = Vec::new();
        for task in self.scheduler.advance(dt) {
            self.run(task, probe, &mut effects);
        }
        effects
    }

    fn set_search(&mut self, text: String) {
        if text == self.state.filters.search_text {
            return;
        }
        self.state.filters.search_text = text;
        self.state.pagination.reset();
        self.reconcile();
    }

    fn sort_header(&mut self, field: SortField, additive: bool) {
        if additive {
            self.state.sort.activate_additive(field);
        } else {
            self.state.sort.activate(field);
        }
        self.state.pagination.reset();
        self.reconcile();
    }

    fn export(&self, format: &str) -> Effect {
        match format.parse::<ExportFormat>() {
            Ok(format) => Effect::Download {
                href: self.export_request(format).href(),
            },
            Err(e) => {
                log::warn!("Export failed: {e}");
                Effect::Alert {
                    message: format!("Export failed: {e}"),
                }
            }
        }
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    /// Re-derives the whole view from the store and state.
    fn reconcile(&mut self) {
        let records = self.store.records();

        self.order = sort_indices(records, &self.state.sort);
        self.visible = VisibleSet::compute(records, &self.order, &self.state.filters);
        self.state.pagination.clamp(self.visible.len());
        let page = paginate(self.visible.positions(), &self.state.pagination);

        let ordered: Vec<&Record> = self.order.iter().map(|&pos| &records[pos]).collect();
        let mut nav = build_index(&ordered, &self.visible, &self.nav_config);
        self.state.navigation.apply(&mut nav);

        if let Some(id) = &self.highlighted
            && !self.visible.contains(id)
        {
            self.highlighted = None;
        }

        self.plan = RenderPlan {
            rows: page
                .items
                .iter()
                .enumerate()
                .map(|(i, &pos)| RowPlan::new(&records[pos], i))
                .collect(),
            no_results: self.visible.is_empty(),
            info: page.info(),
            pager: pager_items(page.current_page, page.total_pages),
            headers: SortField::ALL
                .iter()
                .map(|&field| HeaderPlan {
                    field,
                    label: field.label(),
                    direction: self.state.sort.direction_of(field),
                })
                .collect(),
            nav,
            current_page: page.current_page,
            total_pages: page.total_pages,
            visible_count: self.visible.len(),
            transitions_suspended: true,
            search_clear_visible: !self.state.filters.search_text.is_empty(),
            table_scrolled: self.table_scroll > 0.0,
            dark: self.state.theme.is_dark(),
            highlighted: self.highlighted.clone(),
        };

        log::debug!(
            "Reconciled {} records: {} visible, page {}/{}",
            records.len(),
            self.plan.visible_count,
            self.plan.current_page,
            self.plan.total_pages
        );

        self.scheduler
            .schedule_frame(TaskKey::Transitions, Task::ResumeTransitions);
        self.scheduler
            .schedule_frame(TaskKey::NavScroll, Task::RestoreNavScroll);
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    fn navigate_to(&mut self, id: String, push_fragment: bool, effects: &mut Vec<Effect>) {
        let Some(index) = self.visible.index_of(self.store.records(), &id) else {
            log::debug!("No visible row for fragment {id}");
            return;
        };

        let page = self.state.pagination.page_of(index);
        if self
            .state
            .pagination
            .go_to(PageTarget::Number(page), self.visible.len())
        {
            self.reconcile();
        }

        if push_fragment {
            effects.push(Effect::PushFragment { id: id.clone() });
        }
        self.pending_fragment = Some(id.clone());
        self.scheduler.cancel(&TaskKey::DeepLink);
        self.scheduler
            .schedule_frame(TaskKey::DeepLink, Task::ScrollToRow { id });
    }

    fn toggle_group(&mut self, name: &str, effects: &mut Vec<Effect>) {
        let Some(expanding) = self.state.navigation.toggle(&mut self.plan.nav, name) else {
            return;
        };

        let key = TaskKey::Group(name.to_string());
        let cancelled = self.scheduler.cancel(&key);
        if cancelled > 0 {
            log::debug!("Cancelled {cancelled} pending tasks for group {name}");
        }

        effects.push(Effect::GroupAnimation {
            group: name.to_string(),
            expanding,
            duration: GROUP_ANIMATION,
        });
        self.scheduler.schedule_after(
            GROUP_ANIMATION,
            key.clone(),
            Task::FinishGroupAnimation {
                group: name.to_string(),
            },
        );
        if expanding {
            self.scheduler.schedule_after(
                GROUP_ANIMATION,
                key,
                Task::AutoScrollGroup {
                    group: name.to_string(),
                },
            );
        }
    }

    // =========================================================================
    // Deferred tasks
    // =========================================================================

    fn run(&mut self, task: Task, probe: &dyn LayoutProbe, effects: &mut Vec<Effect>) {
        match task {
            Task::ResumeTransitions => {
                self.plan.transitions_suspended = false;
                effects.push(Effect::ResumeTransitions);
            }
            Task::RestoreNavScroll => {
                let top = probe.viewport(Container::Nav).clamp(self.nav_scroll);
                self.nav_scroll = top;
                effects.push(Effect::SetScrollTop {
                    container: Container::Nav,
                    top,
                    smooth: false,
                });
            }
            Task::ScrollToRow { id } => self.scroll_to_row(id, probe, effects),
            Task::Highlight { id } => {
                self.pending_fragment = None;
                if !self.visible.contains(&id) {
                    return;
                }
                self.highlight_generation += 1;
                self.highlighted = Some(id.clone());
                self.plan.highlighted = Some(id.clone());
                effects.push(Effect::Highlight {
                    row_id: id,
                    generation: self.highlight_generation,
                });
            }
            Task::FinishGroupAnimation { group } => {
                effects.push(Effect::GroupAnimationFinished { group });
            }
            Task::AutoScrollGroup { group } => self.auto_scroll_group(&group, probe, effects),
        }
    }

    fn scroll_to_row(&mut self, id: String, probe: &dyn LayoutProbe, effects: &mut Vec<Effect>) {
        let Some(offset) = probe.row_offset(&id) else {
            log::debug!("Row {id} is not laid out");
            self.pending_fragment = None;
            return;
        };

        let viewport = probe.viewport(Container::Table);
        let wanted = if self.plan.row_index(&id) == Some(0) {
            0.0
        } else {
            offset - probe.header_height()
        };
        let target = viewport.clamp(wanted);

        let delay = if (viewport.scroll_top - target).abs() <= SCROLL_TOLERANCE {
            HIGHLIGHT_DELAY
        } else {
            effects.push(Effect::SetScrollTop {
                container: Container::Table,
                top: target,
                smooth: true,
            });
            SMOOTH_SCROLL + HIGHLIGHT_DELAY
        };
        self.scheduler
            .schedule_after(delay, TaskKey::DeepLink, Task::Highlight { id });
    }

    fn auto_scroll_group(&mut self, group: &str, probe: &dyn LayoutProbe, effects: &mut Vec<Effect>) {
        if !self.state.navigation.is_expanded(group) {
            return;
        }
        let Some(bounds) = probe.group_bounds(group) else {
            return;
        };

        let viewport = probe.viewport(Container::Nav);
        let view_bottom = viewport.scroll_top + viewport.client_height;
        let wanted = if bounds.bottom > view_bottom {
            (bounds.bottom - viewport.client_height).min(bounds.top)
        } else if bounds.top < viewport.scroll_top {
            bounds.top
        } else {
            return;
        };

        let top = viewport.clamp(wanted);
        self.nav_scroll = top;
        effects.push(Effect::SetScrollTop {
            container: Container::Nav,
            top,
            smooth: true,
        });
    }
}
