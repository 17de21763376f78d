#![forbid(unsafe_code)]

//! `narwhal` turns Markdown outlines into collapsible, animated mind maps, headlessly.
//!
//! # Features
//!
//! - `render`: enable layout, viewport handling and SVG snapshots (`narwhal::render`)

pub use narwhal_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use narwhal_render::svg::render_svg;
    pub use narwhal_render::{
        Bounds, Config, Error, Link, Markmap, MemoryScene, Options, Preset, Reconciliation, Scene,
        SceneEvent, ViewportState, visible_links,
    };

    use narwhal_core::{Node, NodeId, Size};
    use serde::Serialize;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Parse(#[from] narwhal_core::Error),
        #[error(transparent)]
        Render(#[from] narwhal_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// One positioned node in a [`LayoutSnapshot`].
    #[derive(Debug, Clone, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PlacedNode {
        pub id: NodeId,
        pub name: String,
        pub depth: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub branch: Option<usize>,
        pub x: f64,
        pub y: f64,
        pub collapsed: bool,
    }

    /// Positions of everything visible plus the viewport, in a serializable form.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LayoutSnapshot {
        pub nodes: Vec<PlacedNode>,
        pub links: Vec<Link>,
        pub viewport: ViewportState,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub bounds: Option<Bounds>,
    }

    impl LayoutSnapshot {
        pub fn capture<S: Scene>(map: &Markmap<S>) -> Self {
            let root = map.root();
            let mut nodes = Vec::with_capacity(root.visible_count());
            root.visit_visible(&mut |n| {
                if let (Some(id), Some(p)) = (n.id, n.position) {
                    nodes.push(PlacedNode {
                        id,
                        name: n.name.clone(),
                        depth: n.depth,
                        branch: n.branch,
                        x: p.x,
                        y: p.y,
                        collapsed: n.is_collapsed(),
                    });
                }
            });
            Self {
                nodes,
                links: visible_links(root),
                viewport: *map.viewport(),
                bounds: Bounds::of_visible(root),
            }
        }
    }

    /// Parses `text` and lays it out once in an in-memory scene of `container` size.
    pub fn layout_markdown(
        text: &str,
        options: Options,
        container: Size,
    ) -> Result<Markmap<MemoryScene>> {
        layout_tree(crate::parse_markdown(text), options, container)
    }

    pub fn layout_tree(
        root: Node,
        options: Options,
        container: Size,
    ) -> Result<Markmap<MemoryScene>> {
        Ok(Markmap::new(MemoryScene::new(container), root, options)?)
    }

    /// Parses, lays out and settles `text`, returning the final frame as SVG.
    pub fn render_markdown_svg(text: &str, options: Options, container: Size) -> Result<String> {
        let mut map = layout_markdown(text, options, container)?;
        map.scene_mut().settle();
        Ok(render_svg(map.scene()))
    }
}

#[cfg(all(test, feature = "render"))]
mod tests {
    use super::render::*;
    use narwhal_core::size;

    const DOC: &str = "# Root\n## Left\n### Deep\n## Right\n";

    #[test]
    fn snapshot_lists_visible_nodes_in_preorder() {
        let map = layout_markdown(DOC, Options::default(), size(800.0, 600.0)).unwrap();
        let snap = LayoutSnapshot::capture(&map);
        let names: Vec<&str> = snap.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Root", "Left", "Deep", "Right"]);
        assert_eq!(snap.links.len(), 3);
        assert!(snap.bounds.is_some());

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["nodes"][0]["name"], "Root");
        assert!(json["nodes"][0].get("branch").is_none());
        assert_eq!(json["nodes"][1]["branch"], 0);
        assert!(json["viewport"]["zoomScale"].is_number());
    }

    #[test]
    fn collapse_depth_shows_in_snapshot() {
        let options = Options {
            collapse_depth: Some(2),
            ..Default::default()
        };
        let map = layout_markdown(DOC, options, size(800.0, 600.0)).unwrap();
        let snap = LayoutSnapshot::capture(&map);
        assert_eq!(snap.nodes.len(), 3);
        assert!(snap.nodes[1].collapsed);
    }

    #[test]
    fn render_errors_surface_as_headless_errors() {
        let err = render_markdown_svg(DOC, Options::preset("neon"), size(800.0, 600.0))
            .expect_err("unknown preset");
        assert!(matches!(err, HeadlessError::Render(_)));
        assert!(err.to_string().contains("neon"), "{err}");
    }

    #[test]
    fn svg_contains_every_label() {
        let svg = render_markdown_svg(DOC, Options::default(), size(800.0, 600.0)).unwrap();
        for name in ["Root", "Left", "Deep", "Right"] {
            assert!(svg.contains(&format!(">{name}</text>")), "{name}: {svg}");
        }
    }
}
