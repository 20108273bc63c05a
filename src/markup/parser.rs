use super::embed;
use super::node::{push_node, push_text, Node};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static IMAGE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{img:(.*?)\}").expect("image token regex is valid"));

/// A delimiter pair such as `*bold*`.
struct Span {
    delimiter: char,
    multiline: bool,
    trim: bool,
    build: fn(Vec<Node>) -> Node,
}

const BOLD: Span = Span {
    delimiter: '*',
    multiline: false,
    trim: false,
    build: Node::Bold,
};

const ITALIC: Span = Span {
    delimiter: '#',
    multiline: false,
    trim: false,
    build: Node::Italic,
};

const QUOTE: Span = Span {
    delimiter: '%',
    multiline: true,
    trim: true,
    build: Node::Quote,
};

/// Parses a raw post body into a node stream.
///
/// Passes run in a fixed order: bold, italic, quote, inline image, embeds.
/// Each pass only looks at text that earlier passes left as text, so an image
/// URL can never be picked up as an embed and a later span may enclose
/// earlier ones but never cut through them.
pub fn parse(raw: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    push_text(&mut nodes, raw);

    let nodes = wrap_delimited(nodes, &BOLD);
    let nodes = wrap_delimited(nodes, &ITALIC);
    let nodes = wrap_delimited(nodes, &QUOTE);
    let nodes = replace_matches(nodes, &IMAGE_TOKEN, &image_node);
    embed::apply(nodes)
}

fn image_node(caps: &Captures) -> Option<Node> {
    let src = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
    if src.is_empty() {
        return None;
    }
    if !crate::utils::validation::is_web_url(src) {
        tracing::debug!("Dropping inline image with non-web URL: {}", src);
        return None;
    }
    Some(Node::Image {
        src: src.to_string(),
    })
}

/// Wraps the shortest runs between two delimiters at this level, then
/// descends into child nodes.
///
/// An opening delimiter without a partner (or, for single-line spans, without
/// one before the next newline) stays literal. Blank spans stay literal too.
fn wrap_delimited(nodes: Vec<Node>, span: &Span) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    let mut open: Option<Vec<Node>> = None;

    for node in nodes {
        let text = match node {
            Node::Text(text) => text,
            other => {
                match open.as_mut() {
                    Some(inner) => inner.push(other),
                    None => out.push(other),
                }
                continue;
            }
        };

        let mut rest = text.as_str();
        while !rest.is_empty() {
            if open.is_none() {
                match rest.find(span.delimiter) {
                    Some(pos) => {
                        push_text(&mut out, &rest[..pos]);
                        open = Some(Vec::new());
                        rest = &rest[pos + span.delimiter.len_utf8()..];
                    }
                    None => {
                        push_text(&mut out, rest);
                        rest = "";
                    }
                }
                continue;
            }
            let Some(inner) = open.as_mut() else { continue };

            let stop = rest.find(|c: char| c == span.delimiter || (!span.multiline && c == '\n'));
            match stop {
                Some(pos) if rest[pos..].starts_with(span.delimiter) => {
                    push_text(inner, &rest[..pos]);
                    if let Some(inner) = open.take() {
                        close(&mut out, inner, span);
                    }
                    rest = &rest[pos + span.delimiter.len_utf8()..];
                }
                Some(pos) => {
                    // 換行前沒有結束符號，開頭符號保留為文字
                    push_text(inner, &rest[..pos]);
                    if let Some(inner) = open.take() {
                        abandon(&mut out, inner, span.delimiter);
                    }
                    rest = &rest[pos..];
                }
                None => {
                    push_text(inner, rest);
                    rest = "";
                }
            }
        }
    }

    if let Some(inner) = open {
        abandon(&mut out, inner, span.delimiter);
    }

    out.into_iter()
        .map(|node| node.map_children(&mut |children| wrap_delimited(children, span)))
        .collect()
}

fn close(out: &mut Vec<Node>, mut inner: Vec<Node>, span: &Span) {
    if is_blank(&inner) {
        let mut delimiters = String::new();
        delimiters.push(span.delimiter);
        push_text(out, &delimiters);
        for node in inner {
            push_node(out, node);
        }
        push_text(out, &delimiters);
        return;
    }
    if span.trim {
        trim_edges(&mut inner);
    }
    out.push((span.build)(inner));
}

fn abandon(out: &mut Vec<Node>, inner: Vec<Node>, delimiter: char) {
    let mut literal = String::new();
    literal.push(delimiter);
    push_text(out, &literal);
    for node in inner {
        push_node(out, node);
    }
}

fn is_blank(nodes: &[Node]) -> bool {
    nodes.iter().all(|node| match node {
        Node::Text(text) => text.trim().is_empty(),
        _ => false,
    })
}

fn trim_edges(nodes: &mut Vec<Node>) {
    if let Some(Node::Text(first)) = nodes.first_mut() {
        *first = first.trim_start().to_string();
    }
    if let Some(Node::Text(last)) = nodes.last_mut() {
        *last = last.trim_end().to_string();
    }
    nodes.retain(|node| !matches!(node, Node::Text(text) if text.is_empty()));
}

/// Replaces every match of `pattern` inside text nodes with the node `build`
/// returns; `None` removes the match.
pub(crate) fn replace_matches(
    nodes: Vec<Node>,
    pattern: &Regex,
    build: &dyn Fn(&Captures) -> Option<Node>,
) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        let text = match node {
            Node::Text(text) => text,
            other => {
                out.push(other.map_children(&mut |children| {
                    replace_matches(children, pattern, build)
                }));
                continue;
            }
        };

        let mut last = 0;
        for caps in pattern.captures_iter(&text) {
            let Some(whole) = caps.get(0) else { continue };
            push_text(&mut out, &text[last..whole.start()]);
            if let Some(node) = build(&caps) {
                push_node(&mut out, node);
            }
            last = whole.end();
        }
        push_text(&mut out, &text[last..]);
    }
    out
}
