//! Prefix tree of path segments for one HTTP method.
//!
//! # Responsibilities
//! - Store the structural shape of every registered pattern
//! - Mark terminal nodes with the pattern that ends there
//! - Find the terminal node for a split request path
//!
//! # Design Decisions
//! - Nodes carry no handlers; resolution happens in the router's table
//! - Placeholders merge by class only: `/:id` and `/:name` share one node,
//!   `/:id` and `/*rest` do not
//! - Search tries literal children, then `:` children, then `*` children,
//!   backtracking into the next candidate when a subtree fails

use super::pattern::SegmentKind;

/// One segment level of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    segment: String,
    kind: SegmentKind,
    pattern: Option<String>,
    children: Vec<Node>,
}

impl Default for Node {
    fn default() -> Self {
        Self::root()
    }
}

impl Node {
    /// Create an empty root node.
    pub fn root() -> Self {
        Self {
            segment: String::new(),
            kind: SegmentKind::Static,
            pattern: None,
            children: Vec::new(),
        }
    }

    fn child(segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
            kind: SegmentKind::of(segment),
            pattern: None,
            children: Vec::new(),
        }
    }

    /// Literal or placeholder text of this node (empty at the root).
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Pattern terminating at this node, if any.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn is_wild(&self) -> bool {
        self.kind.is_wild()
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    fn accepts_on_insert(&self, part: &str, kind: SegmentKind) -> bool {
        self.segment == part || (self.kind.is_wild() && self.kind == kind)
    }

    /// Insert `parts` below this node and mark the last one with `pattern`.
    ///
    /// Returns the pattern previously stored on the terminal node, if any.
    pub fn insert(&mut self, pattern: &str, parts: &[&str]) -> Option<String> {
        let mut node = self;
        for part in parts {
            let kind = SegmentKind::of(part);
            let index = match node
                .children
                .iter()
                .position(|child| child.accepts_on_insert(part, kind))
            {
                Some(index) => index,
                None => {
                    node.children.push(Node::child(part));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index];
        }
        node.pattern.replace(pattern.to_string())
    }

    /// Find the terminal node matching `parts`, starting at depth `height`.
    pub fn search(&self, parts: &[&str], height: usize) -> Option<&Node> {
        if self.kind == SegmentKind::Wildcard {
            return self.pattern.is_some().then_some(self);
        }

        let Some(part) = parts.get(height) else {
            if self.pattern.is_some() {
                return Some(self);
            }
            // `/assets/` against `/assets/*filepath`: empty capture
            return self
                .children
                .iter()
                .find(|child| child.kind == SegmentKind::Wildcard && child.pattern.is_some());
        };

        for kind in [SegmentKind::Static, SegmentKind::Param, SegmentKind::Wildcard] {
            let candidates = self.children.iter().filter(|child| child.kind == kind);
            for child in candidates {
                if kind == SegmentKind::Static && child.segment != *part {
                    continue;
                }
                if let Some(found) = child.search(parts, height + 1) {
                    return Some(found);
                }
            }
        }
        None
    }
}
