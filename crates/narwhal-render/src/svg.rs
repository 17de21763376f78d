//! Static SVG snapshot of a [`MemoryScene`].
//!
//! Writes whatever the scene currently holds, mid-transition values included; call
//! [`MemoryScene::settle`] first for the final frame.

use crate::path::Num;
use crate::scene::{Attr, ElementKey, MemoryScene, Scene};
use indexmap::IndexMap;
use std::fmt::{self, Write as _};

const STYLE: &str = "\
.markmap-node{cursor:pointer}\
.markmap-node-circle{fill:#fff;stroke-width:1.5px}\
.markmap-node-text{fill:#000;font:10px sans-serif}\
.markmap-link{fill:none}";

struct EscapeXml<'a>(&'a str);

impl fmt::Display for EscapeXml<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0;
        let mut start = 0usize;
        for (i, b) in text.bytes().enumerate() {
            let esc = match b {
                b'&' => "&amp;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'"' => "&quot;",
                b'\'' => "&#39;",
                _ => continue,
            };
            f.write_str(&text[start..i])?;
            f.write_str(esc)?;
            start = i + 1;
        }
        f.write_str(&text[start..])
    }
}

pub fn escape_xml(text: &str) -> String {
    EscapeXml(text).to_string()
}

pub fn render_svg(scene: &MemoryScene) -> String {
    let size = scene.container_size();
    let (translate, scale) = scene.view_transform();

    let mut children: IndexMap<Option<ElementKey>, Vec<ElementKey>> = IndexMap::new();
    for (key, el) in scene.elements() {
        children.entry(el.parent).or_default().push(key);
    }
    // Links are drawn underneath nodes.
    let mut top = children.get(&None).cloned().unwrap_or_default();
    top.sort_by_key(|k| !matches!(k, ElementKey::Link(_)));

    let mut out = String::new();
    let _ = write!(
        &mut out,
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="markmap""#,
            r#" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        ),
        w = Num(size.width),
        h = Num(size.height),
    );
    let _ = write!(&mut out, "<style>{STYLE}</style>");
    let _ = write!(
        &mut out,
        r#"<g transform="translate({},{}) scale({})">"#,
        Num(translate.x),
        Num(translate.y),
        Num(scale)
    );
    for key in top {
        write_element(&mut out, scene, &children, key);
    }
    out.push_str("</g></svg>\n");
    out
}

fn write_element(
    out: &mut String,
    scene: &MemoryScene,
    children: &IndexMap<Option<ElementKey>, Vec<ElementKey>>,
    key: ElementKey,
) {
    let Some(el) = scene.get(key) else {
        return;
    };
    let tag = el.kind.tag();
    let _ = write!(out, "<{tag}");
    for (attr, value) in &el.attrs {
        if *attr == Attr::Content {
            continue;
        }
        let _ = write!(out, r#" {}="{}""#, attr.name(), EscapeXml(&value.to_string()));
    }

    let text = el.attr(Attr::Content).and_then(|v| v.as_text());
    let kids = children.get(&Some(key)).map(Vec::as_slice).unwrap_or_default();
    if text.is_none() && kids.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    if let Some(text) = text {
        let _ = write!(out, "{}", EscapeXml(text));
    }
    for &kid in kids {
        write_element(out, scene, children, kid);
    }
    let _ = write!(out, "</{tag}>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{AttrValue, ElementKind, Part, attrs};
    use narwhal_core::{NodeId, point, size};

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml(r#"a<b & "c">'"#), "a&lt;b &amp; &quot;c&quot;&gt;&#39;");
    }

    #[test]
    fn writes_nested_elements_with_links_first() {
        let mut scene = MemoryScene::new(size(400.0, 300.0));
        let group = ElementKey::Node(NodeId(1));
        scene.create(
            group,
            ElementKind::Group,
            None,
            attrs([(Attr::Transform, AttrValue::Translate(point(10.0, 20.5)))]),
        );
        scene.create(
            ElementKey::Part(NodeId(1), Part::Label(0)),
            ElementKind::Text,
            Some(group),
            attrs([(Attr::Content, "R&D".into()), (Attr::X, 10.0.into())]),
        );
        scene.create(
            ElementKey::Link(NodeId(2)),
            ElementKind::Path,
            None,
            attrs([(Attr::Class, "markmap-link".into())]),
        );
        scene.set_view_transform(point(5.0, 0.0), 0.5);

        let svg = render_svg(&scene);
        assert!(svg.starts_with("<svg "), "{svg}");
        assert!(svg.contains(r#"viewBox="0 0 400 300""#), "{svg}");
        assert!(svg.contains(r#"<g transform="translate(5,0) scale(0.5)">"#), "{svg}");
        let link = svg.find(r#"<path class="markmap-link"/>"#).unwrap();
        let node = svg
            .find(r#"<g transform="translate(10,20.5)"><text x="10">R&amp;D</text></g>"#)
            .unwrap();
        assert!(link < node);
    }
}
