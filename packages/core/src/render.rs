//! Markdown to HTML rendering for post and comment bodies.
//!
//! Content is stored as raw markdown and rendered on every read; nothing here
//! caches. The conversion is pure and infallible.

use pulldown_cmark::{html, Options, Parser};

/// Render markdown text to an HTML string.
///
/// CommonMark with tables, footnotes, strikethrough, and task lists enabled.
///
/// ```text
/// render_markdown("World") == "<p>World</p>\n"
/// ```
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_renders_empty() {
        assert!(render_markdown("").is_empty());
    }

    #[test]
    fn paragraph() {
        assert_eq!(render_markdown("World"), "<p>World</p>\n");
    }

    #[test]
    fn emphasis_and_heading() {
        let html = render_markdown("# Title\n\nsome *emphasis*");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn strikethrough_enabled() {
        assert!(render_markdown("~~gone~~").contains("<del>gone</del>"));
    }

    #[test]
    fn tables_enabled() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn deterministic() {
        let md = "- one\n- two\n\n```rust\nfn main() {}\n```\n";
        assert_eq!(render_markdown(md), render_markdown(md));
    }
}
