//! Bars, toggles and labels: the base decoration every renderer starts from.

use super::Visible;
use super::content::{Content, icon_y, label_x};
use crate::color::{Color, WHITE};
use crate::config::Config;
use crate::scene::{
    Attr, AttrValue, ElementKey, ElementKind, Part, Scene, SceneEvent, SceneEventKind, attrs,
};
use narwhal_core::{Node, NodeId, Point};

/// Bar thickness (and link stroke width) for a node. A named node continued by a nameless child
/// counts one level deeper.
pub fn link_width(node: &Node) -> f64 {
    let depth = node.depth + usize::from(node.has_label_continuation());
    (6.0 - 2.0 * depth as f64).max(1.5)
}

fn toggle_fill(node: &Node, color: Color) -> Color {
    if node.is_collapsed() { color } else { WHITE }
}

pub(super) fn enter_node<S: Scene + ?Sized>(
    scene: &mut S,
    v: &Visible<'_>,
    items: &[Content],
    start: Point,
    config: &Config,
) {
    let id = v.id;
    let group = ElementKey::Node(id);
    let nw = config.node_width;
    let lw = link_width(v.node);

    scene.create(
        group,
        ElementKind::Group,
        None,
        attrs([
            (Attr::Class, format!("markmap-node markmap-depth-{}", v.node.depth).into()),
            (Attr::Transform, AttrValue::Translate(start)),
        ]),
    );
    scene.bind_click(
        group,
        SceneEvent {
            node_id: id,
            kind: SceneEventKind::Toggle,
        },
    );
    scene.create(
        ElementKey::Part(id, Part::Shape),
        ElementKind::Rect,
        Some(group),
        attrs([
            (Attr::Class, "markmap-node-rect".into()),
            (Attr::Y, (-lw / 2.0).into()),
            (Attr::X, nw.into()),
            (Attr::Width, 0.0.into()),
            (Attr::Height, lw.into()),
            (Attr::Fill, v.color.into()),
        ]),
    );
    scene.create(
        ElementKey::Part(id, Part::Toggle),
        ElementKind::Circle,
        Some(group),
        attrs([
            (Attr::Class, "markmap-node-circle".into()),
            (Attr::Cx, nw.into()),
            (Attr::Stroke, v.color.into()),
            (Attr::R, 1e-6.into()),
            (Attr::Fill, toggle_fill(v.node, v.color).into()),
        ]),
    );

    for item in items {
        match item {
            Content::Icon { index, src } => scene.create(
                ElementKey::Part(id, Part::Icon(*index)),
                ElementKind::Image,
                Some(group),
                attrs([
                    (Attr::Class, "href".into()),
                    (Attr::X, 10.0.into()),
                    (Attr::Y, icon_y(v.node.depth).into()),
                    (Attr::Href, src.as_str().into()),
                ]),
            ),
            Content::Label {
                index, text, href, ..
            } => {
                let mut parent = group;
                if let Some(href) = href {
                    parent = ElementKey::Part(id, Part::Anchor(*index));
                    scene.create(
                        parent,
                        ElementKind::Anchor,
                        Some(group),
                        attrs([
                            (Attr::Class, "markmap-node-text".into()),
                            (Attr::Href, href.as_str().into()),
                            (Attr::Target, "_blank".into()),
                        ]),
                    );
                }
                scene.create(
                    ElementKey::Part(id, Part::Label(*index)),
                    ElementKind::Text,
                    Some(parent),
                    attrs([
                        (Attr::Class, "markmap-node-text".into()),
                        (Attr::X, nw.into()),
                        (Attr::Dy, "-0.5em".into()),
                        (Attr::TextAnchor, "start".into()),
                        (Attr::Content, text.as_str().into()),
                        (Attr::FillOpacity, 1e-6.into()),
                    ]),
                );
            }
        }
    }
}

pub(super) fn update_node<S: Scene + ?Sized>(
    scene: &mut S,
    v: &Visible<'_>,
    items: &[Content],
    config: &Config,
) {
    let id = v.id;
    let duration = config.duration;
    scene.animate(
        ElementKey::Node(id),
        attrs([(Attr::Transform, AttrValue::Translate(v.position))]),
        duration,
    );
    scene.animate(
        ElementKey::Part(id, Part::Shape),
        attrs([
            (Attr::X, (-1.0).into()),
            (Attr::Width, (config.node_width + 2.0).into()),
        ]),
        duration,
    );
    let display = if v.node.has_any_children() { "inline" } else { "none" };
    scene.animate(
        ElementKey::Part(id, Part::Toggle),
        attrs([
            (Attr::R, 4.5.into()),
            (Attr::Fill, toggle_fill(v.node, v.color).into()),
            (Attr::Display, display.into()),
        ]),
        duration,
    );
    for item in items {
        if let Content::Label {
            index, after_icon, ..
        } = item
        {
            scene.animate(
                ElementKey::Part(id, Part::Label(*index)),
                attrs([
                    (Attr::X, label_x(*after_icon, v.node.depth, config).into()),
                    (Attr::FillOpacity, 1.0.into()),
                ]),
                duration,
            );
        }
    }
}

pub(super) fn exit_node<S: Scene + ?Sized>(
    scene: &mut S,
    id: NodeId,
    items: &[Content],
    end: Point,
    config: &Config,
) {
    let duration = config.duration;
    let nw = config.node_width;
    scene.animate(
        ElementKey::Node(id),
        attrs([(Attr::Transform, AttrValue::Translate(end))]),
        duration,
    );
    scene.animate(
        ElementKey::Part(id, Part::Shape),
        attrs([(Attr::X, nw.into()), (Attr::Width, 0.0.into())]),
        duration,
    );
    scene.animate(
        ElementKey::Part(id, Part::Toggle),
        attrs([(Attr::R, 1e-6.into())]),
        duration,
    );
    for item in items {
        if let Content::Label { index, .. } = item {
            scene.animate(
                ElementKey::Part(id, Part::Label(*index)),
                attrs([(Attr::FillOpacity, 1e-6.into()), (Attr::X, nw.into())]),
                duration,
            );
        }
    }
    scene.remove(ElementKey::Node(id), duration);
}
