//! Status effect record

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::description::{description_text, render_description};

/// Tag that marks an effect as beneficial.
pub const POSITIVE_TAG: &str = "positive";
/// Tag that marks an effect as harmful.
pub const NEGATIVE_TAG: &str = "negative";
/// Tag that marks an effect whose strength scales with its level.
pub const SCALING_TAG: &str = "scaling";

/// Classification of an effect used by the type toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Positive,
    Negative,
}

impl EffectKind {
    /// Parses a kind from its wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            POSITIVE_TAG => Some(Self::Positive),
            NEGATIVE_TAG => Some(Self::Negative),
            _ => None,
        }
    }

    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => POSITIVE_TAG,
            Self::Negative => NEGATIVE_TAG,
        }
    }
}

/// Maximum level of an effect.
///
/// Data files carry either a plain number or an ordinal label such as `"IV"`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Rank {
    /// A numeric level.
    Level(i64),
    /// A textual label, usually a roman numeral.
    Label(String),
    /// No level given.
    #[default]
    Missing,
}

impl Rank {
    /// Returns the numeric value used for ordering.
    ///
    /// Roman numerals `I` to `X` map to 1..10, other labels are read as a
    /// leading integer, anything else is 0.
    pub fn value(&self) -> i64 {
        match self {
            Rank::Level(n) => *n,
            Rank::Label(label) => roman_value(label.trim())
                .or_else(|| leading_int(label.trim()))
                .unwrap_or(0),
            Rank::Missing => 0,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Level(n) => write!(f, "{n}"),
            Rank::Label(label) => f.write_str(label),
            Rank::Missing => Ok(()),
        }
    }
}

fn roman_value(label: &str) -> Option<i64> {
    let value = match label {
        "I" => 1,
        "II" => 2,
        "III" => 3,
        "IV" => 4,
        "V" => 5,
        "VI" => 6,
        "VII" => 7,
        "VIII" => 8,
        "IX" => 9,
        "X" => 10,
        _ => return None,
    };
    Some(value)
}

fn leading_int(label: &str) -> Option<i64> {
    let end = label
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(label.len());
    label[..end].parse().ok()
}

/// One row of the effects table.
///
/// Records are created once per load and never mutated afterwards; sorting
/// reorders them but does not touch their contents.
///
/// # Example
///
/// ```
/// use effects_lib::model::{EffectKind, Rank, Record};
///
/// let record = Record::new("speed", "Minecraft", "Speed")
///     .with_rank(Rank::Label("II".into()))
///     .with_tags(["positive"]);
///
/// assert_eq!(record.kind(), Some(EffectKind::Positive));
/// assert_eq!(record.rank().value(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecord", into = "RawRecord")]
pub struct Record {
    pub(crate) id: String,
    pub(crate) category: String,
    pub(crate) name: String,
    pub(crate) rank: Rank,
    pub(crate) description: String,
    pub(crate) description_html: Option<String>,
    pub(crate) tags: Vec<String>,
    pub(crate) source: Option<String>,
    pub(crate) explicit_kind: Option<EffectKind>,
    pub(crate) scaling_flag: bool,
    /// Lower-cased rendered text, matched by the search box.
    pub(crate) search_text: String,
}

impl Record {
    /// Creates a record with the given identity, category and name.
    pub fn new(id: impl Into<String>, category: impl Into<String>, name: impl Into<String>) -> Self {
        let mut record = Self {
            id: id.into(),
            category: category.into(),
            name: name.into(),
            rank: Rank::Missing,
            description: String::new(),
            description_html: None,
            tags: Vec::new(),
            source: None,
            explicit_kind: None,
            scaling_flag: false,
            search_text: String::new(),
        };
        record.refresh_search_text();
        record
    }

    /// Sets the rank.
    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = rank;
        self.refresh_search_text();
        self
    }

    /// Sets the raw description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self.refresh_search_text();
        self
    }

    /// Sets the tag list. Duplicate tags are dropped, first occurrence wins.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = dedup_tags(tags.into_iter().map(Into::into));
        self
    }

    /// Sets an explicit classification, overriding the tag-derived one.
    pub fn with_kind(mut self, kind: EffectKind) -> Self {
        self.explicit_kind = Some(kind);
        self
    }

    /// Marks the record as scaling without adding the tag.
    pub fn with_scaling(mut self, scaling: bool) -> Self {
        self.scaling_flag = scaling;
        self
    }

    /// Sets the source note.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    fn refresh_search_text(&mut self) {
        let raw = self.description_html.as_deref().unwrap_or(&self.description);
        self.search_text = format!(
            "{}\t{}\t{}\t{}",
            self.category,
            self.name,
            self.rank,
            description_text(raw)
        )
        .to_lowercase();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the unique identifier, also used as the row fragment.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the category (the mod the effect belongs to).
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the effect name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the maximum level.
    pub fn rank(&self) -> &Rank {
        &self.rank
    }

    /// Returns the raw description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the description as display HTML.
    pub fn description_html(&self) -> String {
        render_description(self.description_html.as_deref().unwrap_or(&self.description))
    }

    /// Returns the tags in their original order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns `true` if the record carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns the source note, if any.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Returns the classification used by the type toggles.
    ///
    /// An explicit `type` wins, otherwise the `positive`/`negative` tags
    /// decide. Records with neither are unclassified.
    pub fn kind(&self) -> Option<EffectKind> {
        self.explicit_kind.or_else(|| {
            if self.has_tag(POSITIVE_TAG) {
                Some(EffectKind::Positive)
            } else if self.has_tag(NEGATIVE_TAG) {
                Some(EffectKind::Negative)
            } else {
                None
            }
        })
    }

    /// Returns `true` if the record carries the scaling marker.
    pub fn is_scaling(&self) -> bool {
        self.scaling_flag || self.has_tag(SCALING_TAG)
    }

    /// Returns the lower-cased text matched by free-text search.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }
}

fn dedup_tags(tags: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawRank {
    Number(i64),
    Fraction(f64),
    Text(String),
}

/// Reads `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// JSON shape of a record in `effects.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    id: String,
    #[serde(rename = "mod", default, deserialize_with = "null_as_default")]
    category: String,
    #[serde(rename = "effect", default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_level: Option<RawRank>,
    #[serde(default, deserialize_with = "null_as_default")]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description_html: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "std::ops::Not::not"
    )]
    scaling: bool,
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        let rank = match raw.max_level {
            Some(RawRank::Number(n)) => Rank::Level(n),
            Some(RawRank::Fraction(f)) => Rank::Label(f.to_string()),
            Some(RawRank::Text(s)) if s.trim().is_empty() => Rank::Missing,
            Some(RawRank::Text(s)) => Rank::Label(s),
            None => Rank::Missing,
        };
        let mut record = Record {
            id: raw.id,
            category: raw.category,
            name: raw.name,
            rank,
            description: raw.description,
            description_html: raw.description_html,
            tags: dedup_tags(raw.tags.into_iter()),
            source: raw.source,
            explicit_kind: raw.kind.as_deref().and_then(EffectKind::parse),
            scaling_flag: raw.scaling,
            search_text: String::new(),
        };
        record.refresh_search_text();
        record
    }
}

impl From<Record> for RawRecord {
    fn from(record: Record) -> Self {
        let max_level = match record.rank {
            Rank::Level(n) => Some(RawRank::Number(n)),
            Rank::Label(s) => Some(RawRank::Text(s)),
            Rank::Missing => None,
        };
        RawRecord {
            id: record.id,
            category: record.category,
            name: record.name,
            max_level,
            description: record.description,
            description_html: record.description_html,
            tags: record.tags,
            source: record.source,
            kind: record.explicit_kind.map(|k| k.as_str().to_string()),
            scaling: record.scaling_flag,
        }
    }
}
