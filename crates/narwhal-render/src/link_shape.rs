//! Link path generators.
//!
//! Endpoints are screen-space points (`x` along depth, `y` across siblings).

use crate::path::{PathCommand, PathData};
use narwhal_core::{Point, point};
use std::fmt;

pub trait LinkShape: fmt::Debug {
    fn path(&self, source: Point, target: Point) -> PathData;
}

/// Horizontal cubic Bézier whose control points sit halfway along the depth axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct Diagonal;

impl LinkShape for Diagonal {
    fn path(&self, s: Point, t: Point) -> PathData {
        let mx = (s.x + t.x) / 2.0;
        PathData(vec![
            PathCommand::MoveTo(s),
            PathCommand::CubicTo(point(mx, s.y), point(mx, t.y), t),
        ])
    }
}

/// Elbow connector: straight across to the target's row, then along to the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bracket;

impl LinkShape for Bracket {
    fn path(&self, s: Point, t: Point) -> PathData {
        PathData(vec![
            PathCommand::MoveTo(s),
            PathCommand::VerticalTo(t.y),
            PathCommand::HorizontalTo(t.x),
        ])
    }
}
