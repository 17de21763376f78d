//! Keyed enter/update/exit reconciliation of nodes and links against a [`Scene`].
//!
//! Nodes are keyed by id and links by their target's id. Entering elements start at the trigger
//! node's previous position, every element still present animates to its new position, and
//! exiting elements animate into the trigger node's new position before they are removed.
//! The renderer variants differ only in the decoration applied afterwards.

mod boxed;
mod content;
mod plain;

pub use content::{Content, label_x, project};
pub use plain::link_width;

use crate::color::{Color, ColorStrategy};
use crate::config::{Config, RendererKind};
use crate::layout::RawLayout;
use crate::link_shape::LinkShape;
use crate::scene::{Attr, ElementKey, ElementKind, Scene, attrs};
use indexmap::{IndexMap, IndexSet};
use narwhal_core::{Node, NodeId, Point, vector};
use serde::Serialize;

pub struct RenderContext<'a> {
    pub config: &'a Config,
    pub link_shape: &'a dyn LinkShape,
    pub color: &'a mut dyn ColorStrategy,
}

/// The trigger node's position before and after the layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub previous: Point,
    pub current: Point,
}

/// What is currently on screen, carried from one pass to the next.
#[derive(Debug, Clone, Default)]
pub struct RenderedSets {
    nodes: IndexMap<NodeId, Vec<Content>>,
    links: IndexSet<NodeId>,
}

impl RenderedSets {
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Link keys (target ids).
    pub fn links(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.links.iter().copied()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub entered: Vec<NodeId>,
    pub updated: Vec<NodeId>,
    pub exited: Vec<NodeId>,
    pub links_entered: Vec<NodeId>,
    pub links_updated: Vec<NodeId>,
    pub links_exited: Vec<NodeId>,
}

impl Reconciliation {
    /// True if any element entered or exited.
    pub fn has_deltas(&self) -> bool {
        !(self.entered.is_empty()
            && self.exited.is_empty()
            && self.links_entered.is_empty()
            && self.links_exited.is_empty())
    }
}

pub(crate) struct Visible<'a> {
    pub(crate) node: &'a Node,
    pub(crate) id: NodeId,
    pub(crate) position: Point,
    pub(crate) parent: Option<Point>,
    pub(crate) color: Color,
}

/// Visible nodes in pre-order, with colors requested in the same order.
///
/// The second vector maps each pre-order index (the indexing used by [`RawLayout`]) to an entry
/// of the first; nodes without an id or position map to `None`.
fn collect_visible<'a>(
    root: &'a Node,
    color: &mut dyn ColorStrategy,
) -> (Vec<Visible<'a>>, Vec<Option<usize>>) {
    fn walk<'a>(
        node: &'a Node,
        parent: Option<Point>,
        color: &mut dyn ColorStrategy,
        out: &mut Vec<Visible<'a>>,
        slots: &mut Vec<Option<usize>>,
    ) {
        let placed = match (node.id, node.position) {
            (Some(id), Some(position)) => {
                slots.push(Some(out.len()));
                out.push(Visible {
                    node,
                    id,
                    position,
                    parent,
                    color: color.color(node.branch),
                });
                Some(position)
            }
            _ => {
                tracing::warn!(name = %node.name, "skipping node without id or position");
                slots.push(None);
                None
            }
        };
        for c in &node.children {
            walk(c, placed, color, out, slots);
        }
    }

    let n = root.visible_count();
    let mut out = Vec::with_capacity(n);
    let mut slots = Vec::with_capacity(n);
    walk(root, None, color, &mut out, &mut slots);
    (out, slots)
}

/// Diffs the visible tree under `root` against `rendered`, drives `scene` accordingly, and
/// replaces `rendered` with the new sets.
///
/// `layout` must be the raw layout of the same visible tree; its links decide which edges are
/// drawn.
pub fn reconcile<S: Scene + ?Sized>(
    scene: &mut S,
    rendered: &mut RenderedSets,
    root: &Node,
    layout: &RawLayout,
    anchor: Anchor,
    ctx: &mut RenderContext<'_>,
) -> Reconciliation {
    let config = ctx.config;
    let (visible, slots) = collect_visible(root, &mut *ctx.color);
    let mut report = Reconciliation::default();

    let mut previous = std::mem::take(&mut rendered.nodes);
    let mut items_by_node = Vec::with_capacity(visible.len());
    for v in &visible {
        let items = match previous.swap_remove(&v.id) {
            Some(items) => {
                report.updated.push(v.id);
                items
            }
            None => {
                let items = project(v.node);
                plain::enter_node(scene, v, &items, anchor.previous, config);
                report.entered.push(v.id);
                items
            }
        };
        plain::update_node(scene, v, &items, config);
        items_by_node.push(items);
    }
    for (id, items) in previous {
        plain::exit_node(scene, id, &items, anchor.current, config);
        report.exited.push(id);
    }

    let offset = vector(config.node_width, 0.0);
    let mut previous_links = std::mem::take(&mut rendered.links);
    for &(parent, child) in &layout.links {
        let (Some(&Some(p)), Some(&Some(c))) = (slots.get(parent), slots.get(child)) else {
            continue;
        };
        let (source, v) = (visible[p].position, &visible[c]);
        let key = ElementKey::Link(v.id);
        if previous_links.swap_remove(&v.id) {
            report.links_updated.push(v.id);
        } else {
            let o = anchor.previous + offset;
            scene.create(
                key,
                ElementKind::Path,
                None,
                attrs([
                    (Attr::Class, "markmap-link".into()),
                    (Attr::Stroke, v.color.into()),
                    (Attr::StrokeWidth, link_width(v.node).into()),
                    (Attr::D, ctx.link_shape.path(o, o).into()),
                ]),
            );
            report.links_entered.push(v.id);
        }
        scene.animate(
            key,
            attrs([(Attr::D, ctx.link_shape.path(source + offset, v.position).into())]),
            config.duration,
        );
        rendered.links.insert(v.id);
    }
    for id in previous_links {
        let o = anchor.current + offset;
        let key = ElementKey::Link(id);
        scene.animate(
            key,
            attrs([(Attr::D, ctx.link_shape.path(o, o).into())]),
            config.duration,
        );
        scene.remove(key, config.duration);
        report.links_exited.push(id);
    }

    if config.renderer == RendererKind::Boxed {
        for (v, items) in visible.iter().zip(&items_by_node) {
            boxed::decorate(scene, v, items, config);
        }
    }

    rendered.nodes = visible
        .iter()
        .map(|v| v.id)
        .zip(items_by_node)
        .collect();

    tracing::debug!(
        entered = report.entered.len(),
        updated = report.updated.len(),
        exited = report.exited.len(),
        links_entered = report.links_entered.len(),
        links_exited = report.links_exited.len(),
        "reconciled"
    );
    report
}
