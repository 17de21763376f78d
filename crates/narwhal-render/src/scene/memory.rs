use super::{Attr, AttrValue, Attrs, ElementKey, ElementKind, Scene, SceneEvent};
use indexmap::IndexMap;
use narwhal_core::{Point, Size, point};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
struct Transition {
    from: AttrValue,
    to: AttrValue,
    elapsed: Duration,
    duration: Duration,
}

impl Transition {
    fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }
}

/// One retained element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    pub parent: Option<ElementKey>,
    /// Current (possibly mid-transition) attribute values.
    pub attrs: Attrs,
    transitions: BTreeMap<Attr, Transition>,
    remove_in: Option<Duration>,
    click: Option<SceneEvent>,
}

impl Element {
    pub fn attr(&self, attr: Attr) -> Option<&AttrValue> {
        self.attrs.get(&attr)
    }

    pub fn is_exiting(&self) -> bool {
        self.remove_in.is_some()
    }

    pub fn is_animating(&self) -> bool {
        !self.transitions.is_empty()
    }

    /// Final value of `attr` once every running transition has finished.
    pub fn target(&self, attr: Attr) -> Option<&AttrValue> {
        self.transitions
            .get(&attr)
            .map(|t| &t.to)
            .or_else(|| self.attrs.get(&attr))
    }

    pub fn click(&self) -> Option<SceneEvent> {
        self.click
    }
}

/// In-memory retained scene with time-based transitions.
///
/// Nothing moves until the host calls [`MemoryScene::advance`]. Transitions use cubic in-out
/// easing.
#[derive(Debug, Clone)]
pub struct MemoryScene {
    size: Size,
    elements: IndexMap<ElementKey, Element>,
    view_translate: Point,
    view_scale: f64,
}

fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

impl MemoryScene {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            elements: IndexMap::new(),
            view_translate: point(0.0, 0.0),
            view_scale: 1.0,
        }
    }

    pub fn get(&self, key: ElementKey) -> Option<&Element> {
        self.elements.get(&key)
    }

    pub fn contains(&self, key: ElementKey) -> bool {
        self.elements.contains_key(&key)
    }

    pub fn attr(&self, key: ElementKey, attr: Attr) -> Option<&AttrValue> {
        self.elements.get(&key)?.attrs.get(&attr)
    }

    /// Elements in creation order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementKey, &Element)> {
        self.elements.iter().map(|(k, e)| (*k, e))
    }

    pub fn children_of(&self, parent: ElementKey) -> impl Iterator<Item = (ElementKey, &Element)> {
        self.elements()
            .filter(move |(_, e)| e.parent == Some(parent))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn view_transform(&self) -> (Point, f64) {
        (self.view_translate, self.view_scale)
    }

    pub fn is_animating(&self) -> bool {
        self.elements
            .values()
            .any(|e| e.is_animating() || e.is_exiting())
    }

    /// The event bound to `key` or to its nearest ancestor that has one, the way a click bubbles.
    pub fn click(&self, key: ElementKey) -> Option<SceneEvent> {
        let mut cur = Some(key);
        while let Some(k) = cur {
            let el = self.elements.get(&k)?;
            if let Some(ev) = el.click {
                return Some(ev);
            }
            cur = el.parent;
        }
        None
    }

    /// Moves every transition forward by `dt` and drops elements whose removal came due.
    pub fn advance(&mut self, dt: Duration) {
        let mut due = Vec::new();
        for (key, el) in self.elements.iter_mut() {
            let mut finished = Vec::new();
            for (attr, tr) in el.transitions.iter_mut() {
                tr.elapsed = tr.elapsed.saturating_add(dt);
                let t = if tr.duration.is_zero() {
                    1.0
                } else {
                    (tr.elapsed.as_secs_f64() / tr.duration.as_secs_f64()).min(1.0)
                };
                let value = if t >= 1.0 {
                    finished.push(*attr);
                    tr.to.clone()
                } else {
                    tr.from.lerp(&tr.to, ease_cubic_in_out(t))
                };
                el.attrs.insert(*attr, value);
            }
            for attr in finished {
                el.transitions.remove(&attr);
            }

            if let Some(left) = el.remove_in {
                let left = left.saturating_sub(dt);
                el.remove_in = Some(left);
                if left.is_zero() {
                    due.push(*key);
                }
            }
        }
        for key in due {
            self.remove_now(key);
        }
    }

    /// Runs every pending transition and removal to completion.
    pub fn settle(&mut self) {
        let longest = self
            .elements
            .values()
            .flat_map(|e| {
                e.transitions
                    .values()
                    .map(Transition::remaining)
                    .chain(e.remove_in)
            })
            .max()
            .unwrap_or_default();
        self.advance(longest);
    }

    fn remove_now(&mut self, key: ElementKey) {
        let mut doomed = vec![key];
        let mut i = 0;
        while i < doomed.len() {
            let parent = doomed[i];
            doomed.extend(
                self.elements
                    .iter()
                    .filter(|(_, e)| e.parent == Some(parent))
                    .map(|(k, _)| *k),
            );
            i += 1;
        }
        for k in doomed {
            self.elements.shift_remove(&k);
        }
    }
}

impl Scene for MemoryScene {
    fn container_size(&self) -> Size {
        self.size
    }

    fn create(
        &mut self,
        key: ElementKey,
        kind: ElementKind,
        parent: Option<ElementKey>,
        attrs: Attrs,
    ) {
        if let Some(el) = self.elements.get_mut(&key) {
            if el.remove_in.take().is_some() {
                tracing::trace!(%key, "revived exiting element");
            }
            return;
        }
        self.elements.insert(
            key,
            Element {
                kind,
                parent,
                attrs,
                transitions: BTreeMap::new(),
                remove_in: None,
                click: None,
            },
        );
    }

    fn set(&mut self, key: ElementKey, attrs: Attrs) {
        let Some(el) = self.elements.get_mut(&key) else {
            return;
        };
        for (attr, value) in attrs {
            el.transitions.remove(&attr);
            el.attrs.insert(attr, value);
        }
    }

    fn animate(&mut self, key: ElementKey, attrs: Attrs, duration: Duration) {
        let Some(el) = self.elements.get_mut(&key) else {
            return;
        };
        for (attr, to) in attrs {
            let from = el.attrs.get(&attr).cloned().unwrap_or_else(|| to.clone());
            if duration.is_zero() {
                el.transitions.remove(&attr);
                el.attrs.insert(attr, to);
                continue;
            }
            // Values that cannot be blended take the new value up front.
            let snapped = from.lerp(&to, 0.0);
            if snapped == to {
                el.attrs.insert(attr, to.clone());
            }
            el.transitions.insert(
                attr,
                Transition {
                    from,
                    to,
                    elapsed: Duration::ZERO,
                    duration,
                },
            );
        }
    }

    fn remove(&mut self, key: ElementKey, after: Duration) {
        if after.is_zero() {
            self.remove_now(key);
        } else if let Some(el) = self.elements.get_mut(&key) {
            el.remove_in = Some(after);
        }
    }

    fn set_view_transform(&mut self, translate: Point, scale: f64) {
        self.view_translate = translate;
        self.view_scale = scale;
    }

    fn bind_click(&mut self, key: ElementKey, event: SceneEvent) {
        if let Some(el) = self.elements.get_mut(&key) {
            el.click = Some(event);
        }
    }
}
