//! Export request construction and offline formatting.
//!
//! The download itself is performed by the host. This module only builds the
//! canonical request for the current view, and can render JSON or CSV
//! locally for hosts without an export server.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::ExportError;
use crate::model::{Record, strip_html};
use crate::query::{FilterState, FilterToggles};
use crate::theme::Theme;

/// Downloadable formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// Returns the format identifier used in the export path.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// Returns a timestamped download filename.
    pub fn filename(&self, at: DateTime<Local>) -> String {
        format!("status-effects-{}.{}", at.format("%Y%m%d-%H%M%S"), self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ExportError::NoFormat);
        }
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical description of an export.
///
/// When `ignore_filters` is set the search text and toggles are not part of
/// the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub theme: Theme,
    pub ignore_filters: bool,
    /// Trimmed search text, `None` when empty.
    pub search: Option<String>,
    pub toggles: Option<FilterToggles>,
}

impl ExportRequest {
    /// Captures the export for the current filters and theme.
    pub fn new(format: ExportFormat, filters: &FilterState, theme: Theme, ignore_filters: bool) -> Self {
        let (search, toggles) = if ignore_filters {
            (None, None)
        } else {
            let search = filters.search_text.trim();
            (
                (!search.is_empty()).then(|| search.to_string()),
                Some(filters.toggles()),
            )
        };
        Self {
            format,
            theme,
            ignore_filters,
            search,
            toggles,
        }
    }

    /// Returns the query parameters in canonical order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("theme", self.theme.as_str().to_string()),
            ("ignore_filters", self.ignore_filters.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(t) = &self.toggles {
            pairs.push(("positive", t.show_positive.to_string()));
            pairs.push(("negative", t.show_negative.to_string()));
            pairs.push(("scaling", t.show_scaling.to_string()));
            pairs.push(("vanilla", t.show_baseline.to_string()));
        }
        pairs
    }

    /// Returns the URL-encoded query string.
    pub fn query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }

    /// Returns the relative download path, `/export/{format}?{query}`.
    pub fn href(&self) -> String {
        format!("/export/{}?{}", self.format, self.query_string())
    }

    /// The filter state the export applies, or `None` for everything.
    pub fn filter_state(&self) -> Option<FilterState> {
        let toggles = self.toggles?;
        let mut filters = FilterState::with_toggles(toggles);
        filters.search_text = self.search.clone().unwrap_or_default();
        Some(filters)
    }
}

/// Selects the records an export contains, in load order.
pub fn filter_for_export<'a>(records: &'a [Record], request: &ExportRequest) -> Vec<&'a Record> {
    match request.filter_state() {
        Some(filters) => records.iter().filter(|r| filters.matches(r)).collect(),
        None => records.iter().collect(),
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    effects: &'a [&'a Record],
}

/// Renders records as the pretty-printed `{"effects": [...]}` document.
pub fn to_json(records: &[&Record]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&ExportDocument { effects: records })?)
}

/// Renders records as CSV with HTML stripped from text columns.
pub fn to_csv(records: &[&Record]) -> String {
    let mut out = String::new();
    push_row(&mut out, ["Mod", "Effect", "Max", "Description", "Tags", "Source"]);
    for record in records {
        let max = record.rank().to_string();
        let description = strip_html(record.description());
        let tags = record.tags().join(", ");
        let source = record.source().map(strip_html).unwrap_or_default();
        push_row(
            &mut out,
            [
                record.category(),
                record.name(),
                max.as_str(),
                description.as_str(),
                tags.as_str(),
                source.as_str(),
            ],
        );
    }
    out
}

/// Renders an export offline. XLSX needs the export server.
pub fn render(records: &[&Record], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => to_json(records),
        ExportFormat::Csv => Ok(to_csv(records)),
        ExportFormat::Xlsx => Err(ExportError::ServerOnly("xlsx")),
    }
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push_str("\r\n");
}
