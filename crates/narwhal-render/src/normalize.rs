//! Turns a raw layout into screen coordinates.
//!
//! The breadth axis is rescaled so that the tightest pair of same-level neighbours ends up exactly
//! one row pitch (`nodeHeight + spacingVertical`) apart, then translated so the node that
//! triggered the update stays where it was. The depth axis is a fixed stride per level.

use crate::config::Config;
use crate::error::Result;
use crate::layout::{RawLayout, RawPosition};
use narwhal_core::{Node, NodeId, point};

const MIN_GAP: f64 = 1e-9;

/// Sets `branch` and `depth` on every node, collapsed subtrees included.
///
/// The root has no branch; every other node inherits the sibling index of its top-level ancestor.
pub fn assign_branches(root: &mut Node) {
    fn mark(node: &mut Node, branch: usize, depth: usize) {
        node.branch = Some(branch);
        node.depth = depth;
        for c in node.children.iter_mut().chain(node.hidden_children.iter_mut()) {
            mark(c, branch, depth + 1);
        }
    }

    root.branch = None;
    root.depth = 0;
    for (i, c) in root
        .children
        .iter_mut()
        .chain(root.hidden_children.iter_mut())
        .enumerate()
    {
        mark(c, i, 1);
    }
}

/// Smallest raw breadth gap between consecutive nodes on the same level.
///
/// `positions` must be in pre-order, which keeps every level in left-to-right order. Returns
/// `f64::INFINITY` when no level holds two nodes.
pub fn min_distance(positions: &[RawPosition]) -> f64 {
    let mut last_on_level: Vec<Option<f64>> = Vec::new();
    let mut min = f64::INFINITY;
    for p in positions {
        if last_on_level.len() <= p.depth {
            last_on_level.resize(p.depth + 1, None);
        }
        if let Some(prev) = last_on_level[p.depth] {
            min = min.min((p.breadth - prev).abs());
        }
        last_on_level[p.depth] = Some(p.breadth);
    }
    min
}

/// Scale applied to raw breadths. Falls back to 1 when there is nothing to space out.
pub fn ratio(config: &Config, min_distance: f64) -> f64 {
    if !min_distance.is_finite() || min_distance <= MIN_GAP {
        return 1.0;
    }
    config.row_pitch() / min_distance
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalized {
    pub min_distance: f64,
    pub ratio: f64,
    pub offset: f64,
}

/// Writes `position` for every visible node of `root` from `raw`.
///
/// `raw` must come from a layout pass over the same visible tree. The trigger node keeps its
/// current breadth coordinate (or its previous one if it was never placed).
pub fn normalize(
    root: &mut Node,
    raw: &RawLayout,
    trigger: NodeId,
    config: &Config,
) -> Result<Normalized> {
    let mut trigger_index = None;
    let mut i = 0usize;
    root.visit_visible(&mut |n| {
        if trigger_index.is_none() && n.id == Some(trigger) {
            trigger_index = Some(i);
        }
        i += 1;
    });
    let (Some(raw_trigger), Some(anchor_node)) = (
        trigger_index.and_then(|ti| raw.positions.get(ti)),
        root.find(trigger),
    ) else {
        return Err(narwhal_core::Error::UnknownNode { id: trigger }.into());
    };
    let anchor = anchor_node
        .position
        .or(anchor_node.previous_position)
        .map(|p| p.y)
        .unwrap_or(0.0);

    let min_distance = min_distance(&raw.positions);
    let ratio = ratio(config, min_distance);
    let offset = anchor - raw_trigger.breadth * ratio;
    tracing::trace!(min_distance, ratio, offset, trigger = %trigger, "normalized layout");

    let stride = config.level_stride();
    let mut i = 0usize;
    root.visit_visible_mut(&mut |n| {
        if let Some(p) = raw.positions.get(i) {
            n.position = Some(point(p.depth as f64 * stride, p.breadth * ratio + offset));
        }
        i += 1;
    });

    if config.label_width_adjust {
        adjust_label_widths(root, config.label_char_width);
    }

    Ok(Normalized {
        min_distance,
        ratio,
        offset,
    })
}

/// Pushes the nameless continuation child of a named node (and everything under it) along the
/// depth axis by the estimated width of the named node's label.
fn adjust_label_widths(node: &mut Node, char_width: f64) {
    if node.has_label_continuation() {
        let delta = node.name.chars().count() as f64 * char_width;
        node.children[0].visit_visible_mut(&mut |n| {
            if let Some(p) = n.position.as_mut() {
                p.x += delta;
            }
        });
    }
    for c in &mut node.children {
        adjust_label_widths(c, char_width);
    }
}
