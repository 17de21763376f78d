//! Pan/zoom state, translate clamping and auto-fit.

use crate::config::Config;
use crate::scene::Scene;
use narwhal_core::{Node, Point, Size, point};
use serde::Serialize;

/// Axis-aligned box in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut it = points.into_iter();
        let p0 = it.next()?;
        let mut b = Self {
            min_x: p0.x,
            min_y: p0.y,
            max_x: p0.x,
            max_y: p0.y,
        };
        for p in it {
            b.min_x = b.min_x.min(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_x = b.max_x.max(p.x);
            b.max_y = b.max_y.max(p.y);
        }
        Some(b)
    }

    /// Bounds of the visible node positions under `root`.
    pub fn of_visible(root: &Node) -> Option<Self> {
        let mut points = Vec::with_capacity(root.visible_count());
        root.visit_visible(&mut |n| points.extend(n.position));
        Self::from_points(points)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// The area actually drawn for nodes at these positions: each node box reaches `nodeWidth`
    /// along the depth axis and `nodeHeight / 2` to either side.
    pub fn drawn(&self, config: &Config) -> Self {
        let half = config.node_height / 2.0;
        Self {
            min_x: self.min_x,
            min_y: self.min_y - half,
            max_x: self.max_x + config.node_width,
            max_y: self.max_y + half,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    pub zoom_scale: f64,
    pub zoom_translate: Point,
    pub auto_fit: bool,
    pub container: Size,
}

impl ViewportState {
    pub fn new(container: Size) -> Self {
        Self {
            zoom_scale: 1.0,
            zoom_translate: point(0.0, 0.0),
            auto_fit: true,
            container,
        }
    }

    /// Keeps a drawing of `rendered` size (already scaled) from being dragged out of view.
    ///
    /// A drawing smaller than the container stays inside it; a larger one always covers the
    /// container, with `pan_slack` extra room on the horizontal leading edge.
    pub fn clamp_translate(&self, translate: Point, rendered: Size, pan_slack: f64) -> Point {
        let (cw, ch) = (self.container.width, self.container.height);
        let (rw, rh) = (rendered.width, rendered.height);

        let h = (ch - rh) / 2.0;
        let y = if rh < ch {
            translate.y.max(-h).min(h)
        } else {
            translate.y.max(h).min((rh + ch) / 2.0)
        };

        let w = (rw - cw) / 2.0;
        let x = if rw < cw {
            translate.x.max(0.0).min(cw - rw)
        } else {
            translate.x.max(-(w + pan_slack)).min(w)
        };
        point(x, y)
    }

    /// Applies a pan/zoom. `scale` is taken as given; gesture callers bound it with
    /// [`Config::clamp_scale`] first. `translate` is clamped against the drawn extent of `content`
    /// (no clamping without content). The result is pushed to the scene immediately.
    pub fn set_zoom<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        translate: Point,
        scale: f64,
        content: Option<Bounds>,
        config: &Config,
    ) {
        let translate = match content {
            Some(b) => {
                let drawn = b.drawn(config);
                let rendered = Size::new(drawn.width() * scale, drawn.height() * scale);
                self.clamp_translate(translate, rendered, config.pan_slack)
            }
            None => translate,
        };
        self.zoom_translate = translate;
        self.zoom_scale = scale;
        scene.set_view_transform(translate, scale);
    }

    /// Scale and translate that fit `bounds` inside the container, centred.
    ///
    /// The scale never exceeds 1 but may go below the configured zoom range, so that large trees
    /// still fit. An axis with zero extent does not constrain the scale.
    pub fn fit(&self, bounds: Bounds) -> (Point, f64) {
        let (cw, ch) = (self.container.width, self.container.height);
        let (bw, bh) = (bounds.width(), bounds.height());
        let ratio = |avail: f64, used: f64| {
            if used > 0.0 { avail / used } else { f64::INFINITY }
        };
        let scale = ratio(ch, bh).min(ratio(cw, bw)).min(1.0);
        let translate = point(
            (cw - bw * scale) / 2.0 - bounds.min_x * scale,
            (ch - bh * scale) / 2.0 - bounds.min_y * scale,
        );
        (translate, scale)
    }

    /// Fits the visible tree under `root` into the container.
    pub fn auto_fit<S: Scene + ?Sized>(&mut self, scene: &mut S, root: &Node, config: &Config) {
        let Some(bounds) = Bounds::of_visible(root) else {
            return;
        };
        let (translate, scale) = self.fit(bounds);
        tracing::trace!(scale, x = translate.x, y = translate.y, "auto-fit");
        self.set_zoom(scene, translate, scale, Some(bounds), config);
    }
}
