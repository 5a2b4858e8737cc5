//! Grouping rules for the navigation index.

use serde::{Deserialize, Serialize};

/// How a group recognises its categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "match", rename_all = "snake_case")]
pub enum Matcher {
    /// Category name contains `needle`, ignoring case.
    Contains { needle: String },
    /// Category name is exactly one of `names`.
    OneOf { names: Vec<String> },
}

impl Matcher {
    /// Returns `true` if `category` belongs to the group.
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Matcher::Contains { needle } => category.to_lowercase().contains(&needle.to_lowercase()),
            Matcher::OneOf { names } => names.iter().any(|n| n == category),
        }
    }
}

/// A named group and its matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRule {
    pub name: String,
    #[serde(flatten)]
    pub matcher: Matcher,
}

impl GroupRule {
    /// Creates a substring rule.
    pub fn contains(name: impl Into<String>, needle: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matcher: Matcher::Contains {
                needle: needle.into(),
            },
        }
    }

    /// Creates a membership rule.
    pub fn one_of<I, S>(name: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            matcher: Matcher::OneOf {
                names: names.into_iter().map(Into::into).collect(),
            },
        }
    }
}

/// Navigation grouping configuration.
///
/// Rules are tried in order and the first match wins. A category matching
/// no rule with fewer than `other_threshold` records goes into the catch-all
/// group; the rest stay ungrouped.
///
/// # Example
///
/// ```
/// use effects_lib::nav::NavConfig;
///
/// let json = r#"{
///     "groups": [{ "name": "Tech", "match": "contains", "needle": "tech" }],
///     "other_group": "Misc",
///     "other_threshold": 2
/// }"#;
/// let config: NavConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.group_for("Mekanism Tech", 10), Some("Tech"));
/// assert_eq!(config.group_for("Tiny", 1), Some("Misc"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub groups: Vec<GroupRule>,
    pub other_group: String,
    pub other_threshold: usize,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            groups: vec![
                GroupRule::contains("The Aether Mods", "aether"),
                GroupRule::contains("Delight Mods", "delight"),
                GroupRule::one_of(
                    "Magic Mods",
                    [
                        "Ars Nouveau",
                        "Blood Magic",
                        "Iron Spells'n'Spellbooks",
                        "T.O Magic 'n Extras",
                    ],
                ),
            ],
            other_group: "Other".to_string(),
            other_threshold: 3,
        }
    }
}

impl NavConfig {
    /// Returns the group for a category with `count` records, if any.
    pub fn group_for(&self, category: &str, count: usize) -> Option<&str> {
        if let Some(rule) = self.groups.iter().find(|r| r.matcher.matches(category)) {
            return Some(&rule.name);
        }
        (count < self.other_threshold).then_some(self.other_group.as_str())
    }
}
