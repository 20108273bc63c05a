use super::node::{Embed, Node};
use super::{ItalicStyle, MarkupOptions};

/// Line-break marker emitted for newlines outside block containers. The ad
/// distributor splits on exactly this string.
pub const LINE_BREAK: &str = "<br>";

const YOUTUBE_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

/// Serializes a node stream. Every text leaf and attribute value is escaped.
pub fn render(nodes: &[Node], options: &MarkupOptions) -> String {
    let mut out = String::new();
    write_nodes(&mut out, nodes, options, false);
    out
}

fn write_nodes(out: &mut String, nodes: &[Node], options: &MarkupOptions, in_block: bool) {
    for node in nodes {
        write_node(out, node, options, in_block || node.is_block());
    }
}

fn write_node(out: &mut String, node: &Node, options: &MarkupOptions, in_block: bool) {
    match node {
        Node::Text(text) => write_text(out, text, in_block),
        Node::Bold(children) => {
            out.push_str("<strong>");
            write_nodes(out, children, options, in_block);
            out.push_str("</strong>");
        }
        Node::Italic(children) => {
            out.push_str("<em>");
            if options.italic == ItalicStyle::Keep {
                out.push('#');
            }
            write_nodes(out, children, options, in_block);
            if options.italic == ItalicStyle::Keep {
                out.push('#');
            }
            out.push_str("</em>");
        }
        Node::Quote(children) => {
            out.push_str("<blockquote class=\"custom-quote\">");
            write_nodes(out, children, options, true);
            out.push_str("</blockquote>");
        }
        Node::Image { src } => write_image(out, src, &options.fallback_image),
        Node::Embed(embed) => write_embed(out, embed),
    }
}

fn write_text(out: &mut String, text: &str, in_block: bool) {
    if in_block {
        push_escaped(out, text);
        return;
    }
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push_str(LINE_BREAK);
        }
        push_escaped(out, line);
    }
}

fn write_image(out: &mut String, src: &str, fallback: &str) {
    out.push_str("<div class=\"inline-img-wrapper\"><img src=\"");
    push_escaped(out, src);
    out.push_str("\" class=\"inline-img\" loading=\"lazy\" alt=\"Blog image\" onerror=\"this.onerror=null;this.src='");
    push_escaped(out, &js_quoted_safe(fallback));
    out.push_str("';\"></div>");
}

fn write_embed(out: &mut String, embed: &Embed) {
    match embed {
        Embed::YouTube { id } => {
            out.push_str("<div class=\"video-embed\"><iframe src=\"https://www.youtube.com/embed/");
            push_escaped(out, id);
            out.push_str("\" loading=\"lazy\" allow=\"");
            out.push_str(YOUTUBE_ALLOW);
            out.push_str("\" allowfullscreen></iframe></div>");
        }
        Embed::Vimeo { id } => {
            out.push_str("<div class=\"video-embed\"><iframe src=\"https://player.vimeo.com/video/");
            push_escaped(out, id);
            out.push_str("\" loading=\"lazy\" allowfullscreen></iframe></div>");
        }
        Embed::Tweet { url, .. } => {
            out.push_str("<div class=\"twitter-embed\"><blockquote class=\"twitter-tweet\"><a href=\"");
            push_escaped(out, url);
            out.push_str("\"></a></blockquote></div>");
        }
    }
}

/// The fallback URL sits inside a single-quoted JS string inside an HTML
/// attribute; quotes and backslashes are percent-encoded first.
fn js_quoted_safe(url: &str) -> String {
    url.replace('\\', "%5C").replace('\'', "%27")
}

pub fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}
