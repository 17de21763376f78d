//! The mind-map engine.

use crate::config::{Config, Options};
use crate::error::{Error, Result};
use crate::normalize::{assign_branches, normalize};
use crate::render::{Anchor, Reconciliation, RenderContext, RenderedSets, reconcile};
use crate::scene::{Scene, SceneEvent, SceneEventKind};
use crate::strategy::Strategies;
use crate::viewport::{Bounds, ViewportState};
use crate::visibility::{self, Toggled};
use narwhal_core::{Node, NodeId, Point, point};

/// Hands out node ids. Ids only ever grow, and ids already present in a tree are skipped.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    /// `None` once `u64::MAX` has been handed out or observed.
    next: Option<u64>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: Some(1) }
    }
}

impl IdAllocator {
    pub fn observe(&mut self, id: NodeId) {
        self.next = match (self.next, id.0.checked_add(1)) {
            (Some(next), Some(after)) => Some(next.max(after)),
            _ => None,
        };
    }

    pub fn allocate(&mut self) -> Result<NodeId> {
        let id = self.next.ok_or(Error::IdsExhausted)?;
        self.next = id.checked_add(1);
        Ok(NodeId(id))
    }

    /// Gives every visible node without an id a fresh one. Returns how many were assigned.
    pub fn assign_visible(&mut self, root: &mut Node) -> Result<usize> {
        let mut assigned = 0;
        let mut exhausted = false;
        root.visit_visible_mut(&mut |n| {
            if n.id.is_some() || exhausted {
                return;
            }
            match self.allocate() {
                Ok(id) => {
                    n.id = Some(id);
                    assigned += 1;
                }
                Err(_) => exhausted = true,
            }
        });
        if exhausted {
            return Err(Error::IdsExhausted);
        }
        Ok(assigned)
    }
}

/// A collapsible, animated mind map drawn onto a [`Scene`].
///
/// All state (the tree with its visibility split, positions, the viewport and what is currently
/// on screen) lives here and changes only through `&mut self` methods.
#[derive(Debug)]
pub struct Markmap<S: Scene> {
    scene: S,
    root: Node,
    config: Config,
    strategies: Strategies,
    viewport: ViewportState,
    rendered: RenderedSets,
    ids: IdAllocator,
}

impl<S: Scene> Markmap<S> {
    /// Resolves `options`, measures the container, loads `root` and renders it once.
    ///
    /// The first render is fitted to the container unless `autoFit` is explicitly `false`. Later
    /// passes only re-fit if `autoFit` was explicitly `true`.
    pub fn new(scene: S, root: Node, options: Options) -> Result<Self> {
        let config = Config::resolve(&options)?;
        let strategies = Strategies::resolve(&config);
        let mut viewport = ViewportState::new(scene.container_size());
        viewport.auto_fit = config.auto_fit.unwrap_or(true);
        tracing::debug!(
            width = viewport.container.width,
            height = viewport.container.height,
            renderer = %config.renderer,
            layout = %config.layout,
            "initializing mind map"
        );

        let mut map = Self {
            scene,
            root: Node::default(),
            config,
            strategies,
            viewport,
            rendered: RenderedSets::default(),
            ids: IdAllocator::default(),
        };
        let (translate, scale) = (map.viewport.zoom_translate, map.viewport.zoom_scale);
        map.viewport
            .set_zoom(&mut map.scene, translate, scale, None, &map.config);
        map.set_data(root);
        map.update(None)?;
        if map.config.auto_fit.is_none() {
            map.viewport.auto_fit = false;
        }
        Ok(map)
    }

    /// Replaces the tree. Nothing is drawn until the next [`Markmap::update`].
    pub fn set_data(&mut self, mut root: Node) {
        assign_branches(&mut root);
        root.visit_all_mut(&mut |n| {
            if let Some(id) = n.id {
                self.ids.observe(id);
            }
        });
        root.position = None;
        root.previous_position = Some(point(0.0, self.viewport.container.height / 2.0));
        if let Some(threshold) = self.config.collapse_depth {
            let collapsed = visibility::collapse_to_depth(&mut root, threshold);
            tracing::debug!(threshold, collapsed, "applied initial collapse depth");
        }
        self.root = root;
    }

    /// Lays the tree out again and reconciles the scene, anchored on `from` (the root by
    /// default).
    pub fn update(&mut self, from: Option<NodeId>) -> Result<Reconciliation> {
        if let Some(id) = from {
            self.ensure_visible(id)?;
        }
        let assigned = self.ids.assign_visible(&mut self.root)?;
        if assigned > 0 {
            tracing::trace!(assigned, "assigned node ids");
        }
        // The root is always visible, so it has an id by now.
        let Some(trigger) = from.or(self.root.id) else {
            return Ok(Reconciliation::default());
        };

        let previous = self.anchor_point(trigger, |n| n.previous_position.or(n.position));
        let raw = self.strategies.layout.compute(&self.root);
        normalize(&mut self.root, &raw, trigger, &self.config)?;
        let current = self.anchor_point(trigger, |n| n.position);

        if self.viewport.auto_fit {
            self.viewport
                .auto_fit(&mut self.scene, &self.root, &self.config);
        }

        let mut ctx = RenderContext {
            config: &self.config,
            link_shape: &*self.strategies.link_shape,
            color: &mut *self.strategies.color,
        };
        let report = reconcile(
            &mut self.scene,
            &mut self.rendered,
            &self.root,
            &raw,
            Anchor { previous, current },
            &mut ctx,
        );

        self.root.visit_visible_mut(&mut |n| n.previous_position = n.position);
        Ok(report)
    }

    /// Collapses or expands `id`, then updates anchored on it.
    pub fn toggle(&mut self, id: NodeId) -> Result<Reconciliation> {
        self.ensure_visible(id)?;
        let node = self
            .root
            .find_mut(id)
            .ok_or(narwhal_core::Error::UnknownNode { id })?;
        let outcome = visibility::toggle(node);
        tracing::debug!(node = %id, ?outcome, "toggled node");
        if outcome == Toggled::Unchanged {
            tracing::trace!(node = %id, "toggle on a leaf");
        }
        self.update(Some(id))
    }

    /// Expands every collapsed node, then updates from the root.
    pub fn expand_all(&mut self) -> Result<Reconciliation> {
        let expanded = visibility::expand_all(&mut self.root);
        tracing::debug!(expanded, "expanded all nodes");
        self.update(None)
    }

    /// Applies a pan/zoom gesture. The scale is bounded by `scaleRange`.
    pub fn set_viewport(&mut self, translate: Point, scale: f64) {
        let scale = self.config.clamp_scale(scale);
        let content = Bounds::of_visible(&self.root);
        self.viewport
            .set_zoom(&mut self.scene, translate, scale, content, &self.config);
    }

    /// Merges `options` into the live configuration. On error nothing changes.
    ///
    /// Strategies are rebuilt only if their name changed. New sizes take effect on the next
    /// update, a new collapse depth on the next [`Markmap::set_data`].
    pub fn set_options(&mut self, options: &Options) -> Result<()> {
        let next = self.config.merged(options)?;
        let rebuilt = self.strategies.sync(&next);
        if let Some(auto_fit) = options.auto_fit {
            self.viewport.auto_fit = auto_fit;
        }
        tracing::debug!(rebuilt, "updated options");
        self.config = next;
        Ok(())
    }

    /// Dispatches an interaction reported by the host. Events for nodes that are not on screen
    /// are ignored.
    pub fn handle_event(&mut self, event: SceneEvent) -> Result<Option<Reconciliation>> {
        match event.kind {
            SceneEventKind::Toggle => {
                if !self.is_visible(event.node_id) {
                    tracing::warn!(node = %event.node_id, "click on a node that is not shown");
                    return Ok(None);
                }
                self.toggle(event.node_id).map(Some)
            }
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn rendered(&self) -> &RenderedSets {
        &self.rendered
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn into_scene(self) -> S {
        self.scene
    }

    fn is_visible(&self, id: NodeId) -> bool {
        let mut found = false;
        self.root.visit_visible(&mut |n| found |= n.id == Some(id));
        found
    }

    fn ensure_visible(&self, id: NodeId) -> Result<()> {
        if self.is_visible(id) {
            Ok(())
        } else {
            Err(narwhal_core::Error::UnknownNode { id }.into())
        }
    }

    fn anchor_point(&self, id: NodeId, pick: impl Fn(&Node) -> Option<Point>) -> Point {
        self.root
            .find(id)
            .and_then(pick)
            .unwrap_or_else(|| point(0.0, self.viewport.container.height / 2.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_skips_observed_ids() {
        let mut ids = IdAllocator::default();
        assert_eq!(ids.allocate().unwrap(), NodeId(1));
        ids.observe(NodeId(10));
        ids.observe(NodeId(3));
        assert_eq!(ids.allocate().unwrap(), NodeId(11));
    }

    #[test]
    fn allocator_reports_exhaustion_instead_of_wrapping() {
        let mut ids = IdAllocator::default();
        ids.observe(NodeId(u64::MAX - 1));
        assert_eq!(ids.allocate().unwrap(), NodeId(u64::MAX));
        assert!(matches!(ids.allocate(), Err(Error::IdsExhausted)));

        let mut ids = IdAllocator::default();
        ids.observe(NodeId(u64::MAX));
        assert!(matches!(ids.allocate(), Err(Error::IdsExhausted)));
        // Observing a smaller id later does not bring the space back.
        ids.observe(NodeId(5));
        assert!(matches!(ids.allocate(), Err(Error::IdsExhausted)));

        let mut root = Node::new("root");
        assert!(matches!(ids.assign_visible(&mut root), Err(Error::IdsExhausted)));
        assert_eq!(root.id, None);
    }

    #[test]
    fn assign_visible_leaves_hidden_nodes_alone() {
        let mut root = Node::new("root").with_children([Node::new("a")]);
        root.children[0].hidden_children.push(Node::new("hidden"));
        let mut ids = IdAllocator::default();
        assert_eq!(ids.assign_visible(&mut root).unwrap(), 2);
        assert_eq!(root.children[0].id, Some(NodeId(2)));
        assert_eq!(root.children[0].hidden_children[0].id, None);
    }
}
