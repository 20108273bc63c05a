//! Post body markup.
//!
//! Authors write plain text with a handful of tokens:
//!
//! | token            | result                              |
//! |------------------|-------------------------------------|
//! | `*text*`         | `<strong>`                          |
//! | `#text#`         | `<em>` (delimiters kept or stripped)|
//! | `%text%`         | `<blockquote>`, may span lines      |
//! | `{img:url}`      | lazy inline image with fallback     |
//! | bare video/tweet | YouTube, Vimeo or Twitter/X embed   |
//!
//! Everything else is escaped text; newlines outside block elements become
//! `<br>`. Malformed tokens are left as literal text, never an error.
//!
//! The transformer must see each raw value exactly once. Feeding its own
//! output back in escapes the markup it produced.

pub mod embed;
pub mod html;
pub mod node;
pub mod parser;

pub use html::LINE_BREAK;
pub use node::{Embed, Node};

use serde::{Deserialize, Serialize};

pub const DEFAULT_FALLBACK_IMAGE: &str =
    "https://via.placeholder.com/800x400?text=Image+Not+Found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItalicStyle {
    /// `#text#` renders as `<em>text</em>`.
    #[default]
    Strip,
    /// `#text#` renders as `<em>#text#</em>`.
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupOptions {
    #[serde(default)]
    pub italic: ItalicStyle,
    /// Image shown by the browser when an inline image fails to load.
    #[serde(default = "default_fallback_image")]
    pub fallback_image: String,
}

fn default_fallback_image() -> String {
    DEFAULT_FALLBACK_IMAGE.to_string()
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            italic: ItalicStyle::default(),
            fallback_image: default_fallback_image(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarkupTransformer {
    options: MarkupOptions,
}

impl MarkupTransformer {
    pub fn new(options: MarkupOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MarkupOptions {
        &self.options
    }

    pub fn parse(&self, raw: &str) -> Vec<Node> {
        parser::parse(&normalize_newlines(raw))
    }

    pub fn transform(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }
        html::render(&self.parse(raw), &self.options)
    }
}

/// Transforms with default options.
pub fn transform(raw: &str) -> String {
    MarkupTransformer::default().transform(raw)
}

fn normalize_newlines(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(transform(""), "");
    }

    #[test]
    fn test_plain_text_is_escaped_fixed_point() {
        assert_eq!(
            transform("Hello <world> & \"friends\""),
            "Hello &lt;world&gt; &amp; &quot;friends&quot;"
        );
    }

    #[test]
    fn test_script_is_not_html() {
        let html = transform("<script>alert('x')</script>");
        assert_eq!(html, "&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;");
    }

    #[test]
    fn test_apostrophe_entity_is_not_an_italic_delimiter() {
        assert_eq!(transform("it's a #test#"), "it&#039;s a <em>test</em>");
        assert_eq!(transform("don't won't"), "don&#039;t won&#039;t");
    }

    #[test]
    fn test_bold() {
        assert_eq!(transform("*bold*"), "<strong>bold</strong>");
        assert_eq!(
            transform("*a* and *b*"),
            "<strong>a</strong> and <strong>b</strong>"
        );
    }

    #[test]
    fn test_italic_styles() {
        assert_eq!(transform("#soft#"), "<em>soft</em>");
        let keep = MarkupTransformer::new(MarkupOptions {
            italic: ItalicStyle::Keep,
            ..MarkupOptions::default()
        });
        assert_eq!(keep.transform("#soft#"), "<em>#soft#</em>");
    }

    #[test]
    fn test_quote_is_one_block() {
        let html = transform("%line one\nline two%");
        assert_eq!(
            html,
            "<blockquote class=\"custom-quote\">line one\nline two</blockquote>"
        );
        assert_eq!(html.matches("<blockquote").count(), 1);
    }

    #[test]
    fn test_line_breaks_outside_blocks() {
        assert_eq!(transform("a\nb\r\nc"), "a<br>b<br>c");
        assert_eq!(
            transform("*a*\n*b*"),
            "<strong>a</strong><br><strong>b</strong>"
        );
    }

    #[test]
    fn test_empty_image_dropped() {
        assert_eq!(transform("{img:}"), "");
        assert!(!transform("x {img: } y").contains("<img"));
    }

    #[test]
    fn test_inline_image_markup() {
        let html = transform("{img:https://cdn.example.com/p.jpg}");
        assert_eq!(
            html,
            "<div class=\"inline-img-wrapper\"><img src=\"https://cdn.example.com/p.jpg\" class=\"inline-img\" loading=\"lazy\" alt=\"Blog image\" onerror=\"this.onerror=null;this.src='https://via.placeholder.com/800x400?text=Image+Not+Found';\"></div>"
        );
    }

    #[test]
    fn test_image_src_cannot_inject_attributes() {
        let html = transform("{img:https://e.com/a.png\" onload=\"evil()}");
        assert!(html.contains("src=\"https://e.com/a.png&quot; onload=&quot;evil()\""));
        assert!(!html.contains("\" onload=\""));
    }

    #[test]
    fn test_youtube_query_discarded() {
        let html = transform("https://youtu.be/abc123?si=xyz");
        assert_eq!(html.matches("<iframe").count(), 1);
        assert!(html.contains("src=\"https://www.youtube.com/embed/abc123\""));
        assert!(!html.contains("si=xyz"));
    }

    #[test]
    fn test_embeds_inline_with_text() {
        let html = transform("watch https://vimeo.com/76979871\nthen x.com/jack/status/20");
        assert!(html.starts_with("watch <div class=\"video-embed\">"));
        assert!(html.contains("https://player.vimeo.com/video/76979871"));
        assert!(html.contains("</div><br>then <div class=\"twitter-embed\">"));
        assert!(html.contains("<a href=\"https://x.com/jack/status/20\"></a>"));
    }

    #[test]
    fn test_unbalanced_markers_stay_literal() {
        assert_eq!(transform("5 * 3 = 15"), "5 * 3 = 15");
        assert_eq!(transform("#1 fan"), "#1 fan");
        assert_eq!(transform("{img:https://e.com/a.png"), "{img:https://e.com/a.png");
    }
}
