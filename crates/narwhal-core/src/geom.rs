pub type Unit = euclid::UnknownUnit;

/// Screen-space point. `x` runs along the tree depth, `y` across siblings.
pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

pub type Size = euclid::Size2D<f64, Unit>;

pub fn size(width: f64, height: f64) -> Size {
    euclid::size2(width, height)
}
