//! The host scene-graph capability the engine drives.
//!
//! Elements are addressed by [`ElementKey`]s derived from node ids, so a re-render always finds
//! the element it created for the same node on an earlier pass. Attribute updates are either
//! immediate ([`Scene::set`]) or animated ([`Scene::animate`]); an animation issued for an
//! attribute that is already in flight retargets it from the current value.

mod memory;

pub use memory::{Element, MemoryScene};

use crate::color::Color;
use crate::path::{Num, PathData};
use narwhal_core::{NodeId, Point, Size};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Shape,
    Toggle,
    /// Image item `i` of the node's inline content.
    Icon(usize),
    /// Anchor wrapping link item `i`.
    Anchor(usize),
    /// Text of inline item `i`.
    Label(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKey {
    /// The group holding everything drawn for a node.
    Node(NodeId),
    Part(NodeId, Part),
    /// The link ending at the given node.
    Link(NodeId),
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "node-{id}"),
            Self::Part(id, part) => match part {
                Part::Shape => write!(f, "node-{id}-shape"),
                Part::Toggle => write!(f, "node-{id}-toggle"),
                Part::Icon(i) => write!(f, "node-{id}-icon-{i}"),
                Part::Anchor(i) => write!(f, "node-{id}-anchor-{i}"),
                Part::Label(i) => write!(f, "node-{id}-label-{i}"),
            },
            Self::Link(id) => write!(f, "link-{id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Group,
    Rect,
    Circle,
    Path,
    Text,
    Image,
    Anchor,
}

impl ElementKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Group => "g",
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Path => "path",
            Self::Text => "text",
            Self::Image => "image",
            Self::Anchor => "a",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Attr {
    Class,
    Transform,
    X,
    Y,
    Dy,
    Width,
    Height,
    Rx,
    Ry,
    Cx,
    R,
    D,
    Fill,
    FillOpacity,
    Stroke,
    StrokeWidth,
    Display,
    TextAnchor,
    Href,
    Target,
    /// Text content rather than an XML attribute.
    Content,
}

impl Attr {
    pub fn name(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Transform => "transform",
            Self::X => "x",
            Self::Y => "y",
            Self::Dy => "dy",
            Self::Width => "width",
            Self::Height => "height",
            Self::Rx => "rx",
            Self::Ry => "ry",
            Self::Cx => "cx",
            Self::R => "r",
            Self::D => "d",
            Self::Fill => "fill",
            Self::FillOpacity => "fill-opacity",
            Self::Stroke => "stroke",
            Self::StrokeWidth => "stroke-width",
            Self::Display => "display",
            Self::TextAnchor => "text-anchor",
            Self::Href => "href",
            Self::Target => "target",
            Self::Content => "#text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    /// A `translate(x, y)` transform.
    Translate(Point),
    Color(Color),
    Path(PathData),
    Text(String),
}

impl AttrValue {
    /// Interpolates towards `to`. Values of different kinds (and text) cannot be blended and snap
    /// to `to`.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        match (self, to) {
            (Self::Number(a), Self::Number(b)) => Self::Number(a + (b - a) * t),
            (Self::Translate(a), Self::Translate(b)) => Self::Translate(a.lerp(*b, t)),
            (Self::Color(a), Self::Color(b)) => Self::Color(a.lerp(*b, t)),
            (Self::Path(a), Self::Path(b)) => Self::Path(a.lerp(b, t)),
            _ => to.clone(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_translate(&self) -> Option<Point> {
        match self {
            Self::Translate(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathData> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{}", Num(*v)),
            Self::Translate(p) => write!(f, "translate({},{})", Num(p.x), Num(p.y)),
            Self::Color(c) => write!(f, "{c}"),
            Self::Path(d) => write!(f, "{d}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<Color> for AttrValue {
    fn from(c: Color) -> Self {
        Self::Color(c)
    }
}

impl From<PathData> for AttrValue {
    fn from(d: PathData) -> Self {
        Self::Path(d)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

pub type Attrs = BTreeMap<Attr, AttrValue>;

pub fn attrs<const N: usize>(items: [(Attr, AttrValue); N]) -> Attrs {
    items.into_iter().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SceneEventKind {
    Toggle,
}

/// An interaction the host reports back to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneEvent {
    pub node_id: NodeId,
    pub kind: SceneEventKind,
}

pub trait Scene {
    /// Logical size of the drawing surface.
    fn container_size(&self) -> Size;

    /// Creates an element, or revives one that is still animating out (its pending removal is
    /// cancelled and its current attributes are kept).
    fn create(
        &mut self,
        key: ElementKey,
        kind: ElementKind,
        parent: Option<ElementKey>,
        attrs: Attrs,
    );

    fn set(&mut self, key: ElementKey, attrs: Attrs);

    /// Animates each attribute from its current value to the given one. Attributes that are
    /// already animating are retargeted from where they are now.
    fn animate(&mut self, key: ElementKey, attrs: Attrs, duration: Duration);

    /// Removes the element (and its descendants) once `after` has elapsed.
    fn remove(&mut self, key: ElementKey, after: Duration);

    fn set_view_transform(&mut self, translate: Point, scale: f64);

    fn bind_click(&mut self, key: ElementKey, event: SceneEvent);
}
