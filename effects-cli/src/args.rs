use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use effects_lib::query::{FilterToggle, PageSize, SortField};
use effects_lib::theme::Theme;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "effects",
    version,
    about = "Browse the status effect table from the terminal",
    long_about = "Loads the status effect list, applies search, filters, sorting and paging \
                  exactly like the web table, and prints the resulting page.\n\n\
                  Examples:\n  effects data/effects.json -s regen\n  \
                  effects https://example.com/data/effects.json --hide vanilla --sort max --sort +tags\n  \
                  effects data/effects.json --goto minecraft-speed --nav"
)]
pub struct CliArgs {
    #[arg(value_name = "SOURCE", help = "URL or path of the effects JSON.")]
    pub source: String,

    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 10,
        help = "Seconds to wait for a remote source."
    )]
    pub timeout: u64,

    #[arg(short = 's', long, value_name = "TEXT", help_heading = "View", help = "Free-text search.")]
    pub search: Option<String>,

    #[arg(
        long,
        value_enum,
        action = ArgAction::Append,
        help_heading = "View",
        help = "Turn a filter off (remembered)."
    )]
    pub hide: Vec<FilterArg>,

    #[arg(
        long,
        value_enum,
        action = ArgAction::Append,
        help_heading = "View",
        help = "Turn a filter on (remembered)."
    )]
    pub show: Vec<FilterArg>,

    #[arg(
        long,
        value_name = "COLUMN",
        value_parser = parse_sort_click,
        action = ArgAction::Append,
        help_heading = "View",
        help = "Click a column header (mod, effect, max, description, tags). Prefix '+' for a shift-click. Repeatable."
    )]
    pub sort: Vec<SortClick>,

    #[arg(short = 'p', long, value_name = "N", help_heading = "View", help = "Page to show.")]
    pub page: Option<usize>,

    #[arg(
        long,
        value_name = "ROWS",
        value_parser = parse_page_size,
        help_heading = "View",
        help = "Rows per page: 25, 50, 75 or 100 (remembered)."
    )]
    pub page_size: Option<PageSize>,

    #[arg(short = 'g', long, value_name = "ID", help_heading = "View", help = "Jump to and highlight a record.")]
    pub goto: Option<String>,

    #[arg(
        long,
        value_name = "GROUP",
        action = ArgAction::Append,
        help_heading = "Navigation",
        help = "Expand a navigation group. Repeatable."
    )]
    pub expand: Vec<String>,

    #[arg(long, help_heading = "Navigation", help = "Print the navigation index.")]
    pub nav: bool,

    #[arg(
        long,
        value_name = "FILE",
        help_heading = "Navigation",
        help = "JSON file with navigation grouping rules."
    )]
    pub nav_config: Option<PathBuf>,

    #[arg(long, value_enum, help_heading = "Appearance", help = "Colour theme (remembered).")]
    pub theme: Option<ThemeArg>,

    #[arg(
        long,
        value_name = "ROWS",
        default_value_t = 20,
        help_heading = "Appearance",
        help = "Terminal rows available to the table."
    )]
    pub height: usize,

    #[arg(long, value_name = "FORMAT", help_heading = "Export", help = "Print the export link for json, csv or xlsx.")]
    pub export: Option<String>,

    #[arg(
        long,
        value_name = "FILE",
        requires = "export",
        help_heading = "Export",
        help = "Write the export locally instead (json or csv). A directory gets a timestamped file."
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        value_name = "BOOL",
        help_heading = "Export",
        help = "Export everything regardless of filters (remembered)."
    )]
    pub ignore_filters: Option<bool>,

    #[arg(long, help_heading = "Output", help = "Do not read or write remembered preferences.")]
    pub no_save: bool,

    #[arg(
        short = 'v',
        long,
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Log to the terminal as well (-v, -vv)."
    )]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterArg {
    Positive,
    Negative,
    Scaling,
    Vanilla,
}

impl From<FilterArg> for FilterToggle {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Positive => FilterToggle::Positive,
            FilterArg::Negative => FilterToggle::Negative,
            FilterArg::Scaling => FilterToggle::Scaling,
            FilterArg::Vanilla => FilterToggle::Baseline,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

/// A header activation given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortClick {
    pub field: SortField,
    pub additive: bool,
}

fn parse_sort_click(s: &str) -> Result<SortClick, String> {
    let (additive, name) = match s.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let field = name.parse::<SortField>()?;
    Ok(SortClick { field, additive })
}

fn parse_page_size(s: &str) -> Result<PageSize, String> {
    let n: u32 = s.parse().map_err(|e| format!("{s}: {e}"))?;
    PageSize::try_from(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_click() {
        assert_eq!(
            parse_sort_click("+max").unwrap(),
            SortClick {
                field: SortField::Rank,
                additive: true
            }
        );
        assert!(!parse_sort_click("mod").unwrap().additive);
        assert!(parse_sort_click("colour").is_err());
    }

    #[test]
    fn test_page_size() {
        assert!(parse_page_size("75").is_ok());
        assert!(parse_page_size("10").is_err());
        assert!(parse_page_size("ten").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = CliArgs::try_parse_from([
            "effects",
            "data.json",
            "--hide",
            "vanilla",
            "--sort",
            "effect",
            "--sort",
            "+tags",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.hide, [FilterArg::Vanilla]);
        assert_eq!(args.sort.len(), 2);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.height, 20);
        assert_eq!(args.timeout, 10);
    }
}
