//! Collapse/expand bookkeeping.
//!
//! Collapsing moves a node's `children` into `hidden_children` wholesale and expanding moves them
//! back, so nodes are never destroyed and their order is preserved.

use narwhal_core::Node;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Toggled {
    Collapsed,
    Expanded,
    /// The node has no children of either kind.
    Unchanged,
}

/// Collapses the tree so that only depths below `threshold` stay visible: every non-root node at
/// depth `threshold - 1` or deeper starts collapsed. The root itself is never collapsed.
///
/// Descent stops at a collapsed node: its subtree moves as a unit and keeps its own visibility.
/// A threshold of 0 disables collapsing. Returns the number of nodes collapsed.
pub fn collapse_to_depth(root: &mut Node, threshold: usize) -> usize {
    if threshold == 0 {
        return 0;
    }
    fn walk(node: &mut Node, depth: usize, threshold: usize) -> usize {
        if depth + 1 >= threshold && !node.children.is_empty() {
            collapse(node);
            return 1;
        }
        node.children
            .iter_mut()
            .map(|c| walk(c, depth + 1, threshold))
            .sum()
    }

    root.children.iter_mut().map(|c| walk(c, 1, threshold)).sum()
}

fn collapse(node: &mut Node) {
    let mut shown = std::mem::take(&mut node.children);
    node.hidden_children.append(&mut shown);
}

fn expand(node: &mut Node) {
    let mut hidden = std::mem::take(&mut node.hidden_children);
    node.children.append(&mut hidden);
}

pub fn toggle(node: &mut Node) -> Toggled {
    if !node.children.is_empty() {
        collapse(node);
        Toggled::Collapsed
    } else if !node.hidden_children.is_empty() {
        expand(node);
        Toggled::Expanded
    } else {
        Toggled::Unchanged
    }
}

/// Restores every hidden subtree under (and including) `node`. Returns how many nodes were
/// expanded.
pub fn expand_all(node: &mut Node) -> usize {
    let mut expanded = 0;
    if node.is_collapsed() {
        expand(node);
        expanded += 1;
    }
    for c in &mut node.children {
        expanded += expand_all(c);
    }
    expanded
}
