#![forbid(unsafe_code)]

//! Headless mind-map layout, viewport and animated reconciliation.
//!
//! [`Markmap`] owns a [`narwhal_core::Node`] tree and drives a [`Scene`] host:
//! - a pluggable [`layout::LayoutStrategy`] places the visible nodes,
//! - [`normalize`] rescales that placement to the configured spacing,
//! - [`viewport`] optionally fits the result into the container,
//! - [`render::reconcile`] diffs against what is on screen and issues animated updates.
//!
//! [`MemoryScene`] is an in-memory host with time-based transitions; [`svg::render_svg`]
//! snapshots it.

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod link_shape;
pub mod normalize;
pub mod path;
pub mod render;
pub mod scene;
pub mod strategy;
pub mod svg;
pub mod viewport;
pub mod visibility;

pub use config::{Config, Options, Preset, RendererKind};
pub use engine::{IdAllocator, Markmap};
pub use error::{Error, Result};
pub use render::{Reconciliation, RenderedSets};
pub use scene::{MemoryScene, Scene, SceneEvent, SceneEventKind};
pub use strategy::{ColorKind, LayoutKind, LinkShapeKind};
pub use viewport::{Bounds, ViewportState};

use narwhal_core::NodeId;
use serde::Serialize;

/// A parent/child edge, keyed by its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
}

/// Links between visible nodes, in pre-order of their targets.
pub fn visible_links(root: &narwhal_core::Node) -> Vec<Link> {
    fn walk(node: &narwhal_core::Node, out: &mut Vec<Link>) {
        for c in &node.children {
            if let (Some(source), Some(target)) = (node.id, c.id) {
                out.push(Link { source, target });
            }
            walk(c, out);
        }
    }

    let mut out = Vec::new();
    walk(root, &mut out);
    out
}
