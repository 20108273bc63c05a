/// One piece of a parsed post body.
///
/// Text leaves hold the author's raw characters; escaping happens when the
/// tree is serialized, so nothing in here is HTML yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Bold(Vec<Node>),
    Italic(Vec<Node>),
    Quote(Vec<Node>),
    Image { src: String },
    Embed(Embed),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Embed {
    YouTube { id: String },
    Vimeo { id: String },
    Tweet { url: String, status_id: String },
}

impl Node {
    /// Block nodes own their line wrapping: newlines inside them are never
    /// turned into `<br>`.
    pub fn is_block(&self) -> bool {
        matches!(self, Node::Quote(_) | Node::Image { .. } | Node::Embed(_))
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Bold(children) | Node::Italic(children) | Node::Quote(children) => children,
            _ => &[],
        }
    }

    pub(crate) fn map_children(self, f: &mut impl FnMut(Vec<Node>) -> Vec<Node>) -> Node {
        match self {
            Node::Bold(children) => Node::Bold(f(children)),
            Node::Italic(children) => Node::Italic(f(children)),
            Node::Quote(children) => Node::Quote(f(children)),
            leaf => leaf,
        }
    }
}

/// Appends text, merging with a trailing text node so passes only ever see
/// maximal text runs.
pub(crate) fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}

pub(crate) fn push_node(nodes: &mut Vec<Node>, node: Node) {
    match node {
        Node::Text(text) => push_text(nodes, &text),
        other => nodes.push(other),
    }
}

/// Counts nodes of a kind anywhere in the tree. Used by tests and by the
/// pipeline's debug logging.
pub fn count_where(nodes: &[Node], pred: &impl Fn(&Node) -> bool) -> usize {
    nodes
        .iter()
        .map(|node| usize::from(pred(node)) + count_where(node.children(), pred))
        .sum()
}
