//! Plain-text rendering of a [`RenderPlan`].

use std::fmt::Write;

use effects_lib::model::description_text;
use effects_lib::nav::{NavEntry, NavLink};
use effects_lib::query::{Direction, PagerItem};
use effects_lib::view::RenderPlan;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const WIDTHS: [usize; 5] = [22, 26, 4, 60, 24];

/// Renders the visible rows between `skip` and `skip + height`.
pub fn table(plan: &RenderPlan, skip: usize, height: usize) -> String {
    let mut out = String::new();

    let headers: Vec<String> = plan
        .headers
        .iter()
        .map(|h| match h.direction {
            Some(Direction::Asc) => format!("{} ▲", h.label),
            Some(Direction::Desc) => format!("{} ▼", h.label),
            None => h.label.to_string(),
        })
        .collect();
    push_line(&mut out, "  ", headers.iter().map(String::as_str));

    if plan.no_results {
        out.push_str("  No results found.\n");
    }

    for row in plan.rows.iter().skip(skip).take(height) {
        let marker = if plan.highlighted.as_deref() == Some(row.id.as_str()) { "> " } else { "  " };
        let description = description_text(&row.description_html);
        let tags = row
            .badges
            .iter()
            .map(|b| b.label.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        push_line(
            &mut out,
            marker,
            [
                row.category.as_str(),
                row.name.as_str(),
                row.rank.as_str(),
                description.as_str(),
                tags.as_str(),
            ],
        );
    }

    let _ = writeln!(out, "\n{}", plan.info);
    let pager = pager(&plan.pager);
    if !pager.is_empty() {
        let _ = writeln!(out, "{pager}");
    }
    out
}

fn pager(items: &[PagerItem]) -> String {
    items
        .iter()
        .map(|item| match item {
            PagerItem::Prev { target: Some(_) } => "‹".to_string(),
            PagerItem::Prev { target: None } => " ".to_string(),
            PagerItem::Page { number, current: true } => format!("[{number}]"),
            PagerItem::Page { number, current: false } => number.to_string(),
            PagerItem::Ellipsis => "…".to_string(),
            PagerItem::Next { target: Some(_) } => "›".to_string(),
            PagerItem::Next { target: None } => " ".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders the navigation index.
pub fn nav(plan: &RenderPlan) -> String {
    let mut out = String::new();
    for entry in &plan.nav.entries {
        match entry {
            NavEntry::Link(link) => push_link(&mut out, "", link),
            NavEntry::Group(group) => {
                let sign = match (group.available, group.expanded) {
                    (false, _) => ' ',
                    (true, true) => '-',
                    (true, false) => '+',
                };
                let _ = writeln!(out, "{sign} {} ({})", group.name, group.child_count());
                if group.expanded {
                    for link in &group.links {
                        push_link(&mut out, "    ", link);
                    }
                }
            }
        }
    }
    out
}

fn push_link(out: &mut String, indent: &str, link: &NavLink) {
    if link.available {
        let _ = writeln!(out, "{indent}  {}  {}", link.category, link.href());
    } else {
        let _ = writeln!(out, "{indent}  ({})", link.category);
    }
}

fn push_line<'a>(out: &mut String, marker: &str, cells: impl IntoIterator<Item = &'a str>) {
    let mut line = marker.to_string();
    for (cell, width) in cells.into_iter().zip(WIDTHS) {
        let cell = fit(cell, width);
        line.push_str(&cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width()) + 1));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Cuts `s` to `width` display columns, ending in an ellipsis when cut.
fn fit(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit() {
        assert_eq!(fit("Speed", 10), "Speed");
        assert_eq!(fit("Regeneration", 6), "Regen…");
        assert_eq!(fit("ブロック", 5), "ブロ…");
    }

    #[test]
    fn test_pager() {
        let items = [
            PagerItem::Prev { target: None },
            PagerItem::Page { number: 1, current: true },
            PagerItem::Page { number: 2, current: false },
            PagerItem::Next { target: Some(2) },
        ];
        assert_eq!(pager(&items), "  [1] 2 ›");
    }
}
