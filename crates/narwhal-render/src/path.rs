//! SVG path data for links.

use narwhal_core::{Point, point};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    CubicTo(Point, Point, Point),
    VerticalTo(f64),
    HorizontalTo(f64),
}

impl PathCommand {
    fn same_shape(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    fn lerp(&self, to: &Self, t: f64) -> Self {
        let p = |a: Point, b: Point| a.lerp(b, t);
        let s = |a: f64, b: f64| a + (b - a) * t;
        match (*self, *to) {
            (Self::MoveTo(a), Self::MoveTo(b)) => Self::MoveTo(p(a, b)),
            (Self::CubicTo(a1, a2, a3), Self::CubicTo(b1, b2, b3)) => {
                Self::CubicTo(p(a1, b1), p(a2, b2), p(a3, b3))
            }
            (Self::VerticalTo(a), Self::VerticalTo(b)) => Self::VerticalTo(s(a, b)),
            (Self::HorizontalTo(a), Self::HorizontalTo(b)) => Self::HorizontalTo(s(a, b)),
            (_, to) => to,
        }
    }
}

/// A sequence of absolute path commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData(pub Vec<PathCommand>);

impl PathData {
    /// Interpolates command by command. Paths with a different command structure cannot be
    /// blended and snap to `to`.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        let compatible = self.0.len() == to.0.len()
            && self.0.iter().zip(&to.0).all(|(a, b)| a.same_shape(b));
        if !compatible {
            return to.clone();
        }
        Self(
            self.0
                .iter()
                .zip(&to.0)
                .map(|(a, b)| a.lerp(b, t))
                .collect(),
        )
    }

    /// The point the path currently ends at.
    pub fn end(&self) -> Option<Point> {
        let mut cur: Option<Point> = None;
        for cmd in &self.0 {
            cur = match *cmd {
                PathCommand::MoveTo(p) => Some(p),
                PathCommand::CubicTo(_, _, p) => Some(p),
                PathCommand::VerticalTo(y) => cur.map(|c| point(c.x, y)),
                PathCommand::HorizontalTo(x) => cur.map(|c| point(x, c.y)),
            };
        }
        cur
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cmd in &self.0 {
            match *cmd {
                PathCommand::MoveTo(p) => write!(f, "M{},{}", Num(p.x), Num(p.y))?,
                PathCommand::CubicTo(a, b, c) => write!(
                    f,
                    "C{},{} {},{} {},{}",
                    Num(a.x),
                    Num(a.y),
                    Num(b.x),
                    Num(b.y),
                    Num(c.x),
                    Num(c.y)
                )?,
                PathCommand::VerticalTo(y) => write!(f, "V{}", Num(y))?,
                PathCommand::HorizontalTo(x) => write!(f, "H{}", Num(x))?,
            }
        }
        Ok(())
    }
}

impl Serialize for PathData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Stable number formatting for SVG attributes: snaps float noise and never prints `-0`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Num(pub(crate) f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if !v.is_finite() {
            return f.write_str("0");
        }
        let nearest = v.round();
        let mut v = if (v - nearest).abs() < 1e-6 {
            nearest
        } else {
            (v * 1000.0).round() / 1000.0
        };
        if v == 0.0 {
            v = 0.0;
        }
        write!(f, "{v}")
    }
}
