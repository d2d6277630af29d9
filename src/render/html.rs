// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

//! Inline Markdown to HTML for the node detail view.

use pulldown_cmark::{html, Options, Parser};

/// Renders one section body to an HTML fragment.
///
/// Total: pulldown-cmark treats unrenderable input as literal text and the
/// writer escapes it, so this never fails.
pub fn render_markdown_html(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH);
    let mut out = String::with_capacity(text.len() * 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::render_markdown_html;

    #[test]
    fn renders_emphasis() {
        assert_eq!(
            render_markdown_html("This is **bold**."),
            "<p>This is <strong>bold</strong>.</p>\n"
        );
    }

    #[test]
    fn empty_input_renders_empty() {
        assert_eq!(render_markdown_html(""), "");
    }

    #[test]
    fn raw_angle_brackets_are_escaped_as_literal_text() {
        let out = render_markdown_html("a < b & c");
        assert!(out.contains("&lt;"));
        assert!(out.contains("&amp;"));
    }

    #[test]
    fn links_become_anchors() {
        let out = render_markdown_html("[Doc](http://x)");
        assert_eq!(out, "<p><a href=\"http://x\">Doc</a></p>\n");
    }
}
