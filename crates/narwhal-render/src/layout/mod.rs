//! Raw tree placement.
//!
//! A [`LayoutStrategy`] assigns every visible node a raw `(breadth, depth)` pair in arbitrary
//! units. The normalizer later rescales the breadth axis and replaces the depth axis with a fixed
//! per-level stride, so strategies only have to get the relative spacing right.

mod cluster;
mod tidy;

pub use cluster::Cluster;
pub use tidy::TidyTree;

use narwhal_core::Node;
use serde::Serialize;
use std::fmt;

/// Raw coordinates of one visible node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawPosition {
    /// Position across siblings (the axis the normalizer rescales).
    pub breadth: f64,
    pub depth: usize,
}

/// Output of a raw layout pass.
///
/// `positions` holds one entry per visible node in pre-order. `links` are `(parent, child)` pairs
/// of indices into `positions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawLayout {
    pub positions: Vec<RawPosition>,
    pub links: Vec<(usize, usize)>,
}

pub trait LayoutStrategy: fmt::Debug {
    fn compute(&self, root: &Node) -> RawLayout;
}

/// Pre-order, index-based copy of the visible tree shape.
#[derive(Debug, Clone)]
pub(crate) struct FlatNode {
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
    pub(crate) depth: usize,
}

pub(crate) fn flatten(root: &Node) -> Vec<FlatNode> {
    fn visit(node: &Node, parent: Option<usize>, depth: usize, out: &mut Vec<FlatNode>) {
        let idx = out.len();
        out.push(FlatNode {
            parent,
            children: Vec::with_capacity(node.children.len()),
            depth,
        });
        if let Some(p) = parent {
            out[p].children.push(idx);
        }
        for c in &node.children {
            visit(c, Some(idx), depth + 1, out);
        }
    }

    let mut out = Vec::with_capacity(root.visible_count());
    visit(root, None, 0, &mut out);
    out
}

pub(crate) fn links_of(flat: &[FlatNode]) -> Vec<(usize, usize)> {
    flat.iter()
        .enumerate()
        .filter_map(|(i, n)| n.parent.map(|p| (p, i)))
        .collect()
}

/// Children of one parent sit one unit apart; cousins two units apart.
pub(crate) fn separation(flat: &[FlatNode], a: usize, b: usize) -> f64 {
    if flat[a].parent == flat[b].parent {
        1.0
    } else {
        2.0
    }
}

/// Post-order (children left to right, then the parent) over a flattened tree.
pub(crate) fn post_order(flat: &[FlatNode]) -> Vec<usize> {
    let mut out = Vec::with_capacity(flat.len());
    if flat.is_empty() {
        return out;
    }
    let mut stack: Vec<(usize, bool)> = vec![(0, false)];
    while let Some((v, expanded)) = stack.pop() {
        if expanded {
            out.push(v);
            continue;
        }
        stack.push((v, true));
        for &c in flat[v].children.iter().rev() {
            stack.push((c, false));
        }
    }
    out
}
