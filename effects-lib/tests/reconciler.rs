use std::time::Duration;

use effects_lib::model::{Rank, Record};
use effects_lib::nav::{NavConfig, NavEntry};
use effects_lib::query::{
    FilterState, FilterToggle, PageSize, PageTarget, PagerItem, SortField, compute_visibility,
};
use effects_lib::theme::Theme;
use effects_lib::view::{
    Bounds, Container, Effect, Event, LayoutProbe, Reconciler, RenderPlan, Viewport,
    ViewState,
};

const ROW: f32 = 30.0;
const HEADER: f32 = 40.0;
const CLIENT: f32 = 300.0;

/// Pretends to be the browser: fixed row height, scroll offsets as given.
struct FakeLayout {
    rows: Vec<String>,
    table_top: f32,
    nav_top: f32,
    nav_height: f32,
    groups: Vec<(String, Bounds)>,
}

impl FakeLayout {
    fn of(plan: &RenderPlan) -> Self {
        Self {
            rows: plan.rows.iter().map(|r| r.id.clone()).collect(),
            table_top: 0.0,
            nav_top: 0.0,
            nav_height: 400.0,
            groups: Vec::new(),
        }
    }
}

impl LayoutProbe for FakeLayout {
    fn viewport(&self, container: Container) -> Viewport {
        match container {
            Container::Table => Viewport {
                scroll_top: self.table_top,
                scroll_height: HEADER + self.rows.len() as f32 * ROW,
                client_height: CLIENT,
            },
            Container::Nav => Viewport {
                scroll_top: self.nav_top,
                scroll_height: self.nav_height,
                client_height: CLIENT,
            },
        }
    }

    fn row_offset(&self, id: &str) -> Option<f32> {
        let index = self.rows.iter().position(|r| r == id)?;
        Some(HEADER + index as f32 * ROW)
    }

    fn header_height(&self) -> f32 {
        HEADER
    }

    fn group_bounds(&self, group: &str) -> Option<Bounds> {
        self.groups.iter().find(|(g, _)| g == group).map(|(_, b)| *b)
    }
}

fn effect(id: &str, category: &str, name: &str, tags: &[&str]) -> Record {
    Record::new(id, category, name).with_tags(tags.iter().copied())
}

fn reconciler_with(records: Vec<Record>) -> Reconciler {
    let mut reconciler = Reconciler::new(ViewState::default(), NavConfig::default());
    reconciler.dispatch(Event::Load(records));
    reconciler
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn highlights(effects: &[Effect]) -> Vec<(String, u64)> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Highlight { row_id, generation } => Some((row_id.clone(), *generation)),
            _ => None,
        })
        .collect()
}

/// Sixty baseline effects named so that name order equals id order.
fn sixty() -> Vec<Record> {
    (0..60)
        .map(|i| effect(&format!("e{i:03}"), "Minecraft", &format!("Effect {i:03}"), &["positive"]))
        .collect()
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn test_scenario_first_page_of_two() {
    let mut records: Vec<Record> = (0..28)
        .map(|i| effect(&format!("mc{i}"), "Minecraft", &format!("Effect {i:02}"), &["positive"]))
        .collect();
    records.push(effect("a1", "Alpha", "Glow", &["positive"]));
    records.push(effect("a2", "Alpha", "Gloom", &["negative"]));

    let reconciler = reconciler_with(records);
    let plan = reconciler.plan();

    assert_eq!(plan.rows.len(), 25);
    assert_eq!(plan.total_pages, 2);
    assert_eq!(plan.current_page, 1);
    assert!(!plan.no_results);
    assert_eq!(plan.info, "Showing 1 to 25 of 30 entries.");
    // Baseline pinned first
    assert!(plan.rows.iter().all(|r| r.category == "Minecraft"));
    assert!(matches!(plan.pager.first(), Some(PagerItem::Prev { target: None })));
}

#[test]
fn test_scenario_search_without_matches() {
    let mut reconciler = reconciler_with(vec![
        effect("a", "Minecraft", "Speed", &["positive"]),
        effect("b", "Alpha", "Slowness", &["negative"]),
        effect("c", "Deep Aether", "Frost", &[]),
    ]);

    reconciler.dispatch(Event::SetSearch("nothing matches this".into()));
    let plan = reconciler.plan();

    assert!(plan.rows.is_empty());
    assert!(plan.no_results);
    assert_eq!(plan.info, "Showing 0 to 0 of 0 entries.");
    assert!(plan.pager.is_empty());
    assert_eq!(plan.nav.links().count(), 3);
    assert!(plan.nav.links().all(|l| !l.available));
    assert!(plan.search_clear_visible);
}

#[test]
fn test_scenario_scaling_toggle() {
    let scaling = effect("s", "Alpha", "Strength", &["positive", "scaling"]);
    let flagged = Record::new("f", "Alpha", "Haste")
        .with_kind(effects_lib::model::EffectKind::Positive)
        .with_scaling(true);
    let plain = effect("p", "Alpha", "Luck", &["positive"]);
    let mut reconciler = reconciler_with(vec![scaling, flagged, plain]);

    let update = reconciler.dispatch(Event::SetFilter(FilterToggle::Scaling, false));

    assert!(update.preferences_changed);
    let ids: Vec<&str> = reconciler.plan().rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["p"]);
}

#[test]
fn test_deep_link_selects_page_and_highlights_once() {
    let mut reconciler = reconciler_with(sixty());

    let update = reconciler.dispatch(Event::NavigateTo("e055".into()));
    assert_eq!(reconciler.plan().current_page, 3);
    assert_eq!(update.effects, [Effect::PushFragment { id: "e055".into() }]);

    // The browser echoes the fragment change back
    assert!(reconciler.dispatch(Event::HashChanged("e055".into())).effects.is_empty());

    let layout = FakeLayout::of(reconciler.plan());
    let frame = reconciler.on_frame(&layout);
    assert!(frame.contains(&Effect::SetScrollTop {
        container: Container::Table,
        top: 40.0,
        smooth: true,
    }));

    let mut fired = highlights(&frame);
    fired.extend(highlights(&reconciler.advance(ms(600), &layout)));
    assert!(fired.is_empty());
    fired.extend(highlights(&reconciler.advance(ms(70), &layout)));
    fired.extend(highlights(&reconciler.advance(ms(5000), &layout)));

    assert_eq!(fired, [("e055".to_string(), 1)]);
    assert_eq!(reconciler.plan().highlighted.as_deref(), Some("e055"));
}

// ============================================================================
// Deep links
// ============================================================================

#[test]
fn test_deep_link_restarts_highlight_on_same_row() {
    let mut reconciler = reconciler_with(sixty());
    let layout = FakeLayout::of(reconciler.plan());

    let mut fired = Vec::new();
    for _ in 0..2 {
        reconciler.dispatch(Event::NavigateTo("e000".into()));
        fired.extend(highlights(&reconciler.on_frame(&layout)));
        fired.extend(highlights(&reconciler.advance(ms(70), &layout)));
    }

    assert_eq!(fired, [("e000".to_string(), 1), ("e000".to_string(), 2)]);
}

#[test]
fn test_deep_link_first_row_scrolls_to_top() {
    let mut reconciler = reconciler_with(sixty());
    reconciler.dispatch(Event::NavigateTo("e000".into()));

    let mut layout = FakeLayout::of(reconciler.plan());
    layout.table_top = 120.0;
    let frame = reconciler.on_frame(&layout);

    assert!(frame.contains(&Effect::SetScrollTop {
        container: Container::Table,
        top: 0.0,
        smooth: true,
    }));
}

#[test]
fn test_hash_change_to_other_row_navigates() {
    let mut reconciler = reconciler_with(sixty());
    let update = reconciler.dispatch(Event::HashChanged("e030".into()));

    assert_eq!(reconciler.plan().current_page, 2);
    assert!(update.effects.is_empty());
}

#[test]
fn test_deep_link_to_hidden_or_unknown_row_is_noop() {
    let mut reconciler = reconciler_with(sixty());
    reconciler.dispatch(Event::GoToPage(PageTarget::Number(2)));
    reconciler.dispatch(Event::SetSearch("effect 00".into()));

    assert!(reconciler.dispatch(Event::NavigateTo("e055".into())).effects.is_empty());
    assert!(reconciler.dispatch(Event::NavigateTo("missing".into())).effects.is_empty());
    assert!(reconciler.plan().highlighted.is_none());
}

#[test]
fn test_clear_highlight() {
    let mut reconciler = reconciler_with(sixty());
    let layout = FakeLayout::of(reconciler.plan());
    reconciler.dispatch(Event::NavigateTo("e002".into()));
    reconciler.on_frame(&layout);
    reconciler.advance(ms(670), &layout);
    assert_eq!(reconciler.highlighted(), Some("e002"));

    let update = reconciler.dispatch(Event::ClearHighlight);
    assert_eq!(update.effects, [Effect::ClearHighlight]);
    assert!(reconciler.plan().highlighted.is_none());
    assert!(reconciler.dispatch(Event::ClearHighlight).effects.is_empty());
}

#[test]
fn test_nav_link_activation() {
    let mut records = sixty();
    records.push(effect("x1", "Alpha", "Zap", &["negative"]));
    records.push(effect("x2", "Alpha", "Buzz", &["negative"]));
    records.push(effect("x3", "Alpha", "Fizz", &["positive"]));
    let mut reconciler = reconciler_with(records);
    reconciler.dispatch(Event::SetFilter(FilterToggle::Negative, false));

    let update = reconciler.dispatch(Event::ActivateNavLink("Alpha".into()));
    assert_eq!(update.effects, [Effect::PushFragment { id: "x3".into() }]);
    assert_eq!(reconciler.plan().current_page, 3);

    reconciler.dispatch(Event::SetFilter(FilterToggle::Positive, false));
    assert!(reconciler.dispatch(Event::ActivateNavLink("Alpha".into())).effects.is_empty());
}

// ============================================================================
// Pipeline
// ============================================================================

#[test]
fn test_current_page_stays_in_bounds() {
    let mut reconciler = reconciler_with(sixty());

    for size in PageSize::ALLOWED {
        let size = PageSize::try_from(size).unwrap();
        reconciler.dispatch(Event::SetPageSize(size));
        for target in [PageTarget::Number(99), PageTarget::Next, PageTarget::Number(0), PageTarget::Last] {
            reconciler.dispatch(Event::GoToPage(target));
            let plan = reconciler.plan();
            assert!(plan.current_page >= 1 && plan.current_page <= plan.total_pages);
            assert_eq!(plan.total_pages, 60usize.div_ceil(size.get()).max(1));
        }
    }
}

#[test]
fn test_filter_change_resets_page() {
    let mut reconciler = reconciler_with(sixty());
    reconciler.dispatch(Event::GoToPage(PageTarget::Last));
    assert_eq!(reconciler.plan().current_page, 3);

    reconciler.dispatch(Event::SetSearch("effect".into()));
    assert_eq!(reconciler.plan().current_page, 1);

    reconciler.dispatch(Event::GoToPage(PageTarget::Next));
    reconciler.dispatch(Event::SortHeader {
        field: SortField::Name,
        additive: false,
    });
    assert_eq!(reconciler.plan().current_page, 1);
}

#[test]
fn test_page_navigation_scrolls_table_to_top() {
    let mut reconciler = reconciler_with(sixty());
    let update = reconciler.dispatch(Event::GoToPage(PageTarget::Next));

    assert_eq!(
        update.effects,
        [Effect::SetScrollTop {
            container: Container::Table,
            top: 0.0,
            smooth: true,
        }]
    );
    assert_eq!(reconciler.plan().rows[0].id, "e025");
    assert!(reconciler.dispatch(Event::GoToPage(PageTarget::Number(2))).effects.is_empty());
}

#[test]
fn test_reload_keeps_filters_and_clamps_page() {
    let mut reconciler = reconciler_with(sixty());
    reconciler.dispatch(Event::SetFilter(FilterToggle::Baseline, false));
    reconciler.dispatch(Event::SetFilter(FilterToggle::Baseline, true));
    reconciler.dispatch(Event::GoToPage(PageTarget::Last));

    reconciler.dispatch(Event::Load(sixty().into_iter().take(30).collect()));
    assert_eq!(reconciler.plan().current_page, 2);
    assert_eq!(reconciler.plan().total_pages, 2);

    reconciler.dispatch(Event::SetFilter(FilterToggle::Baseline, false));
    reconciler.dispatch(Event::Load(sixty()));
    assert!(reconciler.plan().no_results);
}

#[test]
fn test_baseline_toggle_hides_untyped_baseline_records() {
    let records = vec![
        Record::new("m", "Minecraft", "Bad Omen"),
        effect("o", "Alpha", "Omen", &[]),
    ];
    let mut reconciler = reconciler_with(records.clone());

    let mut filters = FilterState::default();
    filters.set(FilterToggle::Baseline, false);
    filters.set(FilterToggle::Positive, true);
    assert_eq!(compute_visibility(&records, &filters), compute_visibility(&records, &filters));
    assert!(!compute_visibility(&records, &filters)["m"]);

    reconciler.dispatch(Event::SetFilter(FilterToggle::Baseline, false));
    let ids: Vec<&str> = reconciler.plan().rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["o"]);
}

#[test]
fn test_rank_and_tag_sorting() {
    let records = vec![
        effect("i", "Alpha", "One", &["negative"]).with_rank(Rank::Label("I".into())),
        effect("iii", "Alpha", "Three", &[]).with_rank(Rank::Label("III".into())),
        effect("ii", "Alpha", "Two", &["positive"]).with_rank(Rank::Label("II".into())),
    ];
    let mut reconciler = reconciler_with(records);
    let ids = |r: &Reconciler| -> Vec<String> { r.plan().rows.iter().map(|r| r.id.clone()).collect() };

    reconciler.dispatch(Event::SortHeader {
        field: SortField::Rank,
        additive: false,
    });
    assert_eq!(ids(&reconciler), ["i", "ii", "iii"]);

    reconciler.dispatch(Event::SortHeader {
        field: SortField::Tags,
        additive: false,
    });
    assert_eq!(ids(&reconciler), ["ii", "iii", "i"]);

    reconciler.dispatch(Event::SortHeader {
        field: SortField::Tags,
        additive: false,
    });
    assert_eq!(ids(&reconciler), ["i", "iii", "ii"]);
}

#[test]
fn test_headers_report_sort_keys() {
    let mut reconciler = reconciler_with(sixty());
    let direction = |r: &Reconciler, field: SortField| {
        r.plan().headers.iter().find(|h| h.field == field).and_then(|h| h.direction)
    };

    assert!(direction(&reconciler, SortField::Category).is_some());
    assert!(direction(&reconciler, SortField::Rank).is_none());

    reconciler.dispatch(Event::SortHeader {
        field: SortField::Rank,
        additive: false,
    });
    assert!(direction(&reconciler, SortField::Category).is_none());

    reconciler.dispatch(Event::SortHeader {
        field: SortField::Description,
        additive: true,
    });
    assert!(direction(&reconciler, SortField::Rank).is_some());
    assert!(direction(&reconciler, SortField::Description).is_some());
}

#[test]
fn test_rows_are_striped_per_page() {
    let mut reconciler = reconciler_with(sixty());
    reconciler.dispatch(Event::GoToPage(PageTarget::Next));
    let plan = reconciler.plan();

    assert_eq!(plan.rows[0].zebra, effects_lib::view::Zebra::Odd);
    assert_eq!(plan.rows[1].zebra, effects_lib::view::Zebra::Even);
}

// ============================================================================
// Sticky state and deferred work
// ============================================================================

#[test]
fn test_transitions_resume_on_next_frame() {
    let mut reconciler = reconciler_with(sixty());
    let layout = FakeLayout::of(reconciler.plan());
    reconciler.on_frame(&layout);

    reconciler.dispatch(Event::SetSearch("effect 01".into()));
    assert!(reconciler.plan().transitions_suspended);

    let effects = reconciler.on_frame(&layout);
    assert!(effects.contains(&Effect::ResumeTransitions));
    assert!(!reconciler.plan().transitions_suspended);
}

#[test]
fn test_nav_scroll_restored_and_clamped() {
    let mut reconciler = reconciler_with(sixty());
    reconciler.dispatch(Event::NavScrolled(250.0));
    reconciler.dispatch(Event::SetSearch("effect 0".into()));

    let mut layout = FakeLayout::of(reconciler.plan());
    layout.nav_height = 380.0;
    let effects = reconciler.on_frame(&layout);

    assert!(effects.contains(&Effect::SetScrollTop {
        container: Container::Nav,
        top: 80.0,
        smooth: false,
    }));
    assert_eq!(reconciler.nav_scroll(), 80.0);
}

#[test]
fn test_nav_scroll_restore_uses_latest_offset() {
    let mut reconciler = reconciler_with(sixty());
    reconciler.dispatch(Event::SetSearch("effect 1".into()));
    reconciler.dispatch(Event::NavScrolled(60.0));

    let layout = FakeLayout::of(reconciler.plan());
    let effects = reconciler.on_frame(&layout);

    assert!(effects.contains(&Effect::SetScrollTop {
        container: Container::Nav,
        top: 60.0,
        smooth: false,
    }));
    assert_eq!(reconciler.nav_scroll(), 60.0);
}

fn magic_records() -> Vec<Record> {
    vec![
        effect("bm1", "Blood Magic", "Soul Fray", &["negative"]),
        effect("bm2", "Blood Magic", "Boost", &["positive"]),
        effect("ars", "Ars Nouveau", "Mana Regen", &["positive"]),
        effect("mc1", "Minecraft", "Speed", &["positive"]),
        effect("mc2", "Minecraft", "Haste", &["positive"]),
        effect("mc3", "Minecraft", "Luck", &["positive"]),
    ]
}

#[test]
fn test_group_toggle_animates_and_auto_scrolls() {
    let mut reconciler = reconciler_with(magic_records());
    let update = reconciler.dispatch(Event::ToggleGroup("Magic Mods".into()));

    assert_eq!(
        update.effects,
        [Effect::GroupAnimation {
            group: "Magic Mods".into(),
            expanding: true,
            duration: ms(500),
        }]
    );
    let group = reconciler.plan().nav.group("Magic Mods").unwrap();
    assert!(group.expanded);
    assert_eq!(group.child_count(), 2);

    let mut layout = FakeLayout::of(reconciler.plan());
    layout.nav_height = 1000.0;
    layout.groups.push((
        "Magic Mods".into(),
        Bounds {
            top: 200.0,
            bottom: 420.0,
        },
    ));

    assert!(reconciler.advance(ms(499), &layout).is_empty());
    let effects = reconciler.advance(ms(1), &layout);
    assert!(effects.contains(&Effect::GroupAnimationFinished {
        group: "Magic Mods".into()
    }));
    assert!(effects.contains(&Effect::SetScrollTop {
        container: Container::Nav,
        top: 120.0,
        smooth: true,
    }));
}

#[test]
fn test_second_toggle_cancels_pending_auto_scroll() {
    let mut reconciler = reconciler_with(magic_records());
    let mut layout = FakeLayout::of(reconciler.plan());
    layout.groups.push((
        "Magic Mods".into(),
        Bounds {
            top: 280.0,
            bottom: 400.0,
        },
    ));

    reconciler.dispatch(Event::ToggleGroup("Magic Mods".into()));
    reconciler.advance(ms(200), &layout);
    let update = reconciler.dispatch(Event::ToggleGroup("Magic Mods".into()));
    assert!(matches!(
        &update.effects[..],
        [Effect::GroupAnimation { expanding: false, .. }]
    ));

    let effects = reconciler.advance(ms(1000), &layout);
    assert_eq!(
        effects,
        [Effect::GroupAnimationFinished {
            group: "Magic Mods".into()
        }]
    );
}

#[test]
fn test_expanded_group_survives_rerender_until_unavailable() {
    let mut reconciler = reconciler_with(magic_records());
    reconciler.dispatch(Event::ToggleGroup("Magic Mods".into()));

    reconciler.dispatch(Event::SetSearch("boost".into()));
    assert!(reconciler.plan().nav.group("Magic Mods").unwrap().expanded);

    reconciler.dispatch(Event::SetSearch("speed".into()));
    let group = reconciler.plan().nav.group("Magic Mods").unwrap();
    assert!(!group.available);
    assert!(!group.expanded);
    assert!(reconciler.dispatch(Event::ToggleGroup("Magic Mods".into())).effects.is_empty());

    reconciler.dispatch(Event::ClearSearch);
    assert!(!reconciler.plan().nav.group("Magic Mods").unwrap().expanded);
    assert!(!reconciler.plan().search_clear_visible);
}

#[test]
fn test_nav_lists_baseline_first() {
    let reconciler = reconciler_with(magic_records());
    let first = reconciler.plan().nav.entries.first();
    assert!(matches!(first, Some(NavEntry::Link(l)) if l.category == "Minecraft"));
}

// ============================================================================
// Preferences and export
// ============================================================================

#[test]
fn test_preference_events() {
    let mut reconciler = reconciler_with(sixty());

    let update = reconciler.dispatch(Event::SetTheme(Theme::Dark));
    assert!(update.preferences_changed);
    assert!(reconciler.plan().dark);
    assert!(!reconciler.dispatch(Event::SetTheme(Theme::Dark)).preferences_changed);

    let update = reconciler.dispatch(Event::SetPageSize(PageSize::try_from(50).unwrap()));
    assert!(update.preferences_changed);
    assert_eq!(reconciler.plan().rows.len(), 50);

    assert!(!reconciler.dispatch(Event::SetSearch("x".into())).preferences_changed);
    assert!(reconciler.dispatch(Event::SetIgnoreExportFilters(true)).preferences_changed);

    let prefs = reconciler.state().preferences();
    assert_eq!(prefs.theme, Theme::Dark);
    assert_eq!(u32::from(prefs.page_size), 50);
    assert!(prefs.ignore_export_filters);
}

#[test]
fn test_export_events() {
    let mut reconciler = reconciler_with(sixty());
    reconciler.dispatch(Event::SetSearch("effect 05".into()));

    let update = reconciler.dispatch(Event::Export("CSV".into()));
    assert_eq!(
        update.effects,
        [Effect::Download {
            href: "/export/csv?theme=light&ignore_filters=false&search=effect+05\
                   &positive=true&negative=true&scaling=true&vanilla=true"
                .into()
        }]
    );

    let update = reconciler.dispatch(Event::Export("pdf".into()));
    assert!(matches!(
        &update.effects[..],
        [Effect::Alert { message }] if message.contains("pdf")
    ));
}

#[test]
fn test_offline_export_uses_current_filters() {
    let mut reconciler = reconciler_with(sixty());
    reconciler.dispatch(Event::SetSearch("effect 05".into()));

    let csv = reconciler
        .render_export(effects_lib::export::ExportFormat::Csv)
        .unwrap();
    // Header plus ten matches
    assert_eq!(csv.lines().count(), 11);

    reconciler.dispatch(Event::SetIgnoreExportFilters(true));
    let csv = reconciler
        .render_export(effects_lib::export::ExportFormat::Csv)
        .unwrap();
    assert_eq!(csv.lines().count(), 61);
}
