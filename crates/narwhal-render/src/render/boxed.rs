use super::Visible;
use super::content::Content;
use crate::config::Config;
use crate::scene::{Attr, ElementKey, Part, Scene, attrs};

/// Restyles the plain bars as rounded boxes filled with a lighter branch color.
pub(super) fn decorate<S: Scene + ?Sized>(
    scene: &mut S,
    v: &Visible<'_>,
    items: &[Content],
    config: &Config,
) {
    let id = v.id;
    let nh = config.node_height;
    scene.set(
        ElementKey::Part(id, Part::Shape),
        attrs([
            (Attr::Y, (-nh / 2.0).into()),
            (Attr::Rx, 10.0.into()),
            (Attr::Ry, 10.0.into()),
            (Attr::Height, nh.into()),
            (Attr::Fill, v.color.brighter(1.2).into()),
            (Attr::Stroke, v.color.into()),
            (Attr::StrokeWidth, 1.0.into()),
        ]),
    );
    for item in items {
        if let Content::Label { index, .. } = item {
            scene.set(
                ElementKey::Part(id, Part::Label(*index)),
                attrs([(Attr::Dy, ".3em".into())]),
            );
        }
    }
    if v.parent.is_some() {
        scene.set(ElementKey::Link(id), attrs([(Attr::StrokeWidth, 1.0.into())]));
    }
}
