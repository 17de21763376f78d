use crate::geom::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable render identity of a node.
///
/// Ids are handed out by the engine that first renders a node and are never reused by that
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inline content attached to a heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Rule {
    Text { content: String },
    Link { href: String, content: String },
    Image { src: String },
}

impl Rule {
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }
}

/// One vertex of the mind-map tree.
///
/// A node owns its subtree. Collapsing moves `children` into `hidden_children` and expanding
/// moves them back, so at most one of the two lists is non-empty at any time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default)]
    pub depth: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hidden_children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_position: Option<Point>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules = rules.into_iter().collect();
        self
    }

    pub fn is_collapsed(&self) -> bool {
        !self.hidden_children.is_empty()
    }

    /// True if the node has children, shown or hidden.
    pub fn has_any_children(&self) -> bool {
        !self.children.is_empty() || !self.hidden_children.is_empty()
    }

    /// A named node whose single child has no name. Outline sources emit these when a label is
    /// continued on the next level.
    pub fn has_label_continuation(&self) -> bool {
        !self.name.is_empty() && self.children.len() == 1 && self.children[0].name.is_empty()
    }

    /// Depth-first, pre-order walk over visible nodes (never enters `hidden_children`).
    pub fn visit_visible<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        for c in &self.children {
            c.visit_visible(f);
        }
    }

    pub fn visit_visible_mut(&mut self, f: &mut impl FnMut(&mut Node)) {
        f(self);
        for c in &mut self.children {
            c.visit_visible_mut(f);
        }
    }

    /// Pre-order walk over every node, including collapsed subtrees.
    pub fn visit_all_mut(&mut self, f: &mut impl FnMut(&mut Node)) {
        f(self);
        for c in self.children.iter_mut().chain(self.hidden_children.iter_mut()) {
            c.visit_all_mut(f);
        }
    }

    pub fn find(&self, id: NodeId) -> Option<&Node> {
        if self.id == Some(id) {
            return Some(self);
        }
        self.children
            .iter()
            .chain(self.hidden_children.iter())
            .find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.id == Some(id) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .chain(self.hidden_children.iter_mut())
            .find_map(|c| c.find_mut(id))
    }

    pub fn visible_count(&self) -> usize {
        1 + self.children.iter().map(Node::visible_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_reaches_hidden_subtrees() {
        let mut leaf = Node::new("leaf");
        leaf.id = Some(NodeId(7));
        let mut root = Node::new("root");
        root.hidden_children.push(Node::new("a").with_children([leaf]));

        assert_eq!(root.find(NodeId(7)).map(|n| n.name.as_str()), Some("leaf"));
        assert_eq!(root.visible_count(), 1);
    }

    #[test]
    fn label_continuation_requires_single_nameless_child() {
        let n = Node::new("title").with_children([Node::new("")]);
        assert!(n.has_label_continuation());

        let n = Node::new("title").with_children([Node::new(""), Node::new("")]);
        assert!(!n.has_label_continuation());

        let n = Node::new("").with_children([Node::new("")]);
        assert!(!n.has_label_continuation());
    }

    #[test]
    fn rules_serialize_with_type_tag() {
        let rule = Rule::Link {
            href: "https://example.com".to_string(),
            content: "site".to_string(),
        };
        let v = serde_json::to_value(&rule).unwrap();
        assert_eq!(v["type"], "link");
        assert_eq!(v["href"], "https://example.com");
    }
}
