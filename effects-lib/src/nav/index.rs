//! Building the navigation tree.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use super::config::NavConfig;
use crate::model::Record;
use crate::query::{BASELINE_CATEGORY, VisibleSet};

/// A jump link to one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub category: String,
    /// Id of the first visible record of the category, or of its first
    /// record overall when none is visible.
    pub target_id: String,
    /// `false` when no record of the category passes the filters. Such links
    /// are listed but inert.
    pub available: bool,
    /// Position inside the parent group, used to stagger animations.
    pub child_index: usize,
}

impl NavLink {
    /// Returns the fragment link to the target row.
    pub fn href(&self) -> String {
        format!("#{}", urlencoding::encode(&self.target_id))
    }
}

/// A collapsible group of category links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavGroup {
    pub name: String,
    pub links: Vec<NavLink>,
    /// `true` when at least one link is available.
    pub available: bool,
    pub expanded: bool,
}

impl NavGroup {
    /// Number of links, exposed to the stylesheet as `--child-count`.
    pub fn child_count(&self) -> usize {
        self.links.len()
    }
}

/// A top-level navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEntry {
    Link(NavLink),
    Group(NavGroup),
}

/// The derived navigation directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavTree {
    pub entries: Vec<NavEntry>,
}

impl NavTree {
    /// Iterates over every link, grouped or not.
    pub fn links(&self) -> impl Iterator<Item = &NavLink> {
        self.entries.iter().flat_map(|entry| match entry {
            NavEntry::Link(link) => std::slice::from_ref(link).iter(),
            NavEntry::Group(group) => group.links.iter(),
        })
    }

    /// Finds the link for `category`.
    pub fn link(&self, category: &str) -> Option<&NavLink> {
        self.links().find(|l| l.category == category)
    }

    /// Iterates over the groups.
    pub fn groups(&self) -> impl Iterator<Item = &NavGroup> {
        self.entries.iter().filter_map(|entry| match entry {
            NavEntry::Group(group) => Some(group),
            NavEntry::Link(_) => None,
        })
    }

    /// Iterates mutably over the groups.
    pub fn groups_mut(&mut self) -> impl Iterator<Item = &mut NavGroup> {
        self.entries.iter_mut().filter_map(|entry| match entry {
            NavEntry::Group(group) => Some(group),
            NavEntry::Link(_) => None,
        })
    }

    /// Finds a group by name.
    pub fn group(&self, name: &str) -> Option<&NavGroup> {
        self.groups().find(|g| g.name == name)
    }

    /// Returns the categories that currently have visible records.
    pub fn available_categories(&self) -> Vec<&str> {
        self.links()
            .filter(|l| l.available)
            .map(|l| l.category.as_str())
            .collect()
    }
}

/// Baseline first, then plain lexical order.
fn category_order(a: &str, b: &str) -> Ordering {
    let a_base = a == BASELINE_CATEGORY;
    let b_base = b == BASELINE_CATEGORY;
    b_base.cmp(&a_base).then_with(|| a.cmp(b))
}

/// Builds the navigation tree.
///
/// `records` is the full, unfiltered set in display order: every category
/// is listed even when filtering hides all of its records. Availability and
/// link targets come from `visible`. Groups are built collapsed; apply a
/// [`NavigationState`](super::NavigationState) to restore expansion.
pub fn build_index(records: &[&Record], visible: &VisibleSet, config: &NavConfig) -> NavTree {
    let mut categories: Vec<&str> = Vec::new();
    let mut first_record: HashMap<&str, &str> = HashMap::new();
    let mut first_visible: HashMap<&str, &str> = HashMap::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let category = record.category();
        if category.is_empty() {
            continue;
        }
        if !first_record.contains_key(category) {
            categories.push(category);
            first_record.insert(category, record.id());
        }
        *counts.entry(category).or_default() += 1;
        if visible.contains(record.id()) {
            first_visible.entry(category).or_insert(record.id());
        }
    }

    let make_link = |category: &str| NavLink {
        category: category.to_string(),
        target_id: first_visible
            .get(category)
            .or_else(|| first_record.get(category))
            .map(|id| id.to_string())
            .unwrap_or_default(),
        available: first_visible.contains_key(category),
        child_index: 0,
    };

    let mut ungrouped: Vec<&str> = Vec::new();
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for &category in &categories {
        match config.group_for(category, counts[category]) {
            Some(group) => grouped.entry(group).or_default().push(category),
            None => ungrouped.push(category),
        }
    }

    ungrouped.sort_by(|a, b| category_order(a, b));
    let mut group_names: Vec<&str> = grouped.keys().copied().collect();
    group_names.sort_by(|a, b| {
        let a_other = *a == config.other_group;
        let b_other = *b == config.other_group;
        a_other.cmp(&b_other).then_with(|| a.cmp(b))
    });

    let mut entries: Vec<NavEntry> = ungrouped
        .into_iter()
        .map(|c| NavEntry::Link(make_link(c)))
        .collect();

    for name in group_names {
        let mut members = grouped.remove(name).unwrap_or_default();
        members.sort_by(|a, b| category_order(a, b));
        let links: Vec<NavLink> = members
            .into_iter()
            .enumerate()
            .map(|(i, c)| NavLink {
                child_index: i,
                ..make_link(c)
            })
            .collect();
        let available = links.iter().any(|l| l.available);
        entries.push(NavEntry::Group(NavGroup {
            name: name.to_string(),
            links,
            available,
            expanded: false,
        }));
    }

    NavTree { entries }
}
