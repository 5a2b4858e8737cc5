//! Expand/collapse state of navigation groups.

use std::collections::BTreeSet;

use super::index::NavTree;

/// Which navigation groups are expanded.
///
/// Lives for the session only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    expanded: BTreeSet<String>,
}

impl NavigationState {
    /// Creates a state with every group collapsed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the group is expanded.
    pub fn is_expanded(&self, group: &str) -> bool {
        self.expanded.contains(group)
    }

    /// Copies the expansion state onto a freshly built tree.
    ///
    /// Groups without available links cannot stay open and are dropped from
    /// the expanded set.
    pub fn apply(&mut self, tree: &mut NavTree) {
        for group in tree.groups_mut() {
            if !group.available {
                self.expanded.remove(&group.name);
            }
            group.expanded = group.available && self.expanded.contains(&group.name);
        }
    }

    /// Toggles a group.
    ///
    /// Returns `Some(true)` when the group expands, `Some(false)` when it
    /// collapses, and `None` when the group is unknown or has no available
    /// links.
    pub fn toggle(&mut self, tree: &mut NavTree, name: &str) -> Option<bool> {
        let group = tree.groups_mut().find(|g| g.name == name)?;
        if !group.available {
            return None;
        }
        let expanding = !self.expanded.contains(name);
        if expanding {
            self.expanded.insert(name.to_string());
        } else {
            self.expanded.remove(name);
        }
        group.expanded = expanding;
        Some(expanding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::{NavEntry, NavGroup, NavLink};

    fn tree(available: bool) -> NavTree {
        NavTree {
            entries: vec![NavEntry::Group(NavGroup {
                name: "Magic Mods".into(),
                links: vec![NavLink {
                    category: "Blood Magic".into(),
                    target_id: "bm".into(),
                    available,
                    child_index: 0,
                }],
                available,
                expanded: false,
            })],
        }
    }

    #[test]
    fn test_toggle_roundtrip() {
        let mut state = NavigationState::new();
        let mut tree = tree(true);

        assert_eq!(state.toggle(&mut tree, "Magic Mods"), Some(true));
        assert!(tree.group("Magic Mods").unwrap().expanded);
        assert_eq!(state.toggle(&mut tree, "Magic Mods"), Some(false));
        assert!(!state.is_expanded("Magic Mods"));
    }

    #[test]
    fn test_unavailable_group_is_forced_closed() {
        let mut state = NavigationState::new();
        let mut open = tree(true);
        state.toggle(&mut open, "Magic Mods");

        let mut closed = tree(false);
        state.apply(&mut closed);
        assert!(!state.is_expanded("Magic Mods"));
        assert_eq!(state.toggle(&mut closed, "Magic Mods"), None);
    }

    #[test]
    fn test_apply_keeps_valid_expansion() {
        let mut state = NavigationState::new();
        state.toggle(&mut tree(true), "Magic Mods");

        let mut rebuilt = tree(true);
        state.apply(&mut rebuilt);
        assert!(rebuilt.group("Magic Mods").unwrap().expanded);
    }

    #[test]
    fn test_unknown_group() {
        let mut state = NavigationState::new();
        assert_eq!(state.toggle(&mut tree(true), "Nope"), None);
    }
}
