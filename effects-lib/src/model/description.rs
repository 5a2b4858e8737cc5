//! Rich-text description rendering.
//!
//! Descriptions arrive as small HTML fragments. Two substitutions are applied
//! before display: the `^level` placeholder becomes a superscript, and arrow
//! glyphs are wrapped so their font metrics do not stretch the row.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

const LEVEL_TOKEN: &str = "^level";
const LEVEL_HTML: &str = r#"<sup class="lvl-sup">level</sup>"#;
const ARROW_HTML: &str = r#"<span class="arrow" aria-hidden="true">→</span>"#;

/// Renders a raw description into display HTML.
pub fn render_description(raw: &str) -> String {
    raw.replace(LEVEL_TOKEN, LEVEL_HTML)
        .replace('→', ARROW_HTML)
        .replace("-&gt;", ARROW_HTML)
        .replace("->", ARROW_HTML)
}

/// Removes every HTML tag from `html`.
pub fn strip_html(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Returns the text a reader sees for a raw description.
///
/// Tags are stripped, the level placeholder reads as `level` and the common
/// entities are decoded. Arrows read as `→`, as they are displayed.
pub fn description_text(raw: &str) -> String {
    let text = strip_html(&raw.replace(LEVEL_TOKEN, "level"));
    text.replace("-&gt;", "→")
        .replace("->", "→")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_placeholder() {
        assert_eq!(
            render_description("<b>10 × 2^level</b>"),
            r#"<b>10 × 2<sup class="lvl-sup">level</sup></b>"#
        );
    }

    #[test]
    fn test_arrow_variants() {
        let expected = format!("a {ARROW_HTML} b");
        assert_eq!(render_description("a → b"), expected);
        assert_eq!(render_description("a -> b"), expected);
        assert_eq!(render_description("a -&gt; b"), expected);
    }

    #[test]
    fn test_description_text() {
        assert_eq!(
            description_text("Deals <b>4^level</b> damage -&gt; target"),
            "Deals 4level damage → target"
        );
        assert_eq!(description_text("a -> b"), description_text("a → b"));
        assert_eq!(description_text("x &gt; 2"), "x > 2");
    }
}
