//! Branch coloring strategies.

use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Lightens the color by `0.7^-k`.
    ///
    /// Pure black becomes a dark gray, and channels below 30 are lifted to 30 before
    /// scaling so that dark colors still visibly change.
    pub fn brighter(self, k: f64) -> Self {
        const FLOOR: f64 = 30.0;
        let k = 0.7_f64.powf(k);
        let (mut r, mut g, mut b) = (f64::from(self.r), f64::from(self.g), f64::from(self.b));
        if r == 0.0 && g == 0.0 && b == 0.0 {
            return Self::rgb(30, 30, 30);
        }
        for c in [&mut r, &mut g, &mut b] {
            if *c > 0.0 && *c < FLOOR {
                *c = FLOOR;
            }
        }
        let scale = |c: f64| (c / k).min(255.0) as u8;
        Self::rgb(scale(r), scale(g), scale(b))
    }

    pub fn lerp(self, to: Self, t: f64) -> Self {
        let mix = |a: u8, b: u8| {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self::rgb(mix(self.r, to.r), mix(self.g, to.g), mix(self.b, to.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Maps a node's branch (`None` for the root) to a color.
pub trait ColorStrategy: fmt::Debug {
    fn color(&mut self, branch: Option<usize>) -> Color;
}

#[derive(Debug, Clone, Copy)]
pub struct Constant(pub Color);

impl ColorStrategy for Constant {
    fn color(&mut self, _branch: Option<usize>) -> Color {
        self.0
    }
}

/// Ordinal palette with an implicit domain: keys take palette entries in order of first use and
/// wrap around when the palette is exhausted.
#[derive(Debug, Clone)]
pub struct Ordinal {
    palette: &'static [Color],
    domain: FxHashMap<Option<usize>, usize>,
}

impl Ordinal {
    pub fn new(palette: &'static [Color]) -> Self {
        Self {
            palette,
            domain: FxHashMap::default(),
        }
    }
}

impl ColorStrategy for Ordinal {
    fn color(&mut self, branch: Option<usize>) -> Color {
        if self.palette.is_empty() {
            return GRAY;
        }
        let next = self.domain.len();
        let slot = *self.domain.entry(branch).or_insert(next);
        self.palette[slot % self.palette.len()]
    }
}

pub const GRAY: Color = Color::from_hex(0x929292);
pub const WHITE: Color = Color::from_hex(0xffffff);

pub const CATEGORY10: [Color; 10] = [
    Color::from_hex(0x1f77b4),
    Color::from_hex(0xff7f0e),
    Color::from_hex(0x2ca02c),
    Color::from_hex(0xd62728),
    Color::from_hex(0x9467bd),
    Color::from_hex(0x8c564b),
    Color::from_hex(0xe377c2),
    Color::from_hex(0x7f7f7f),
    Color::from_hex(0xbcbd22),
    Color::from_hex(0x17becf),
];

pub const CATEGORY20: [Color; 20] = [
    Color::from_hex(0x1f77b4),
    Color::from_hex(0xaec7e8),
    Color::from_hex(0xff7f0e),
    Color::from_hex(0xffbb78),
    Color::from_hex(0x2ca02c),
    Color::from_hex(0x98df8a),
    Color::from_hex(0xd62728),
    Color::from_hex(0xff9896),
    Color::from_hex(0x9467bd),
    Color::from_hex(0xc5b0d5),
    Color::from_hex(0x8c564b),
    Color::from_hex(0xc49c94),
    Color::from_hex(0xe377c2),
    Color::from_hex(0xf7b6d2),
    Color::from_hex(0x7f7f7f),
    Color::from_hex(0xc7c7c7),
    Color::from_hex(0xbcbd22),
    Color::from_hex(0xdbdb8d),
    Color::from_hex(0x17becf),
    Color::from_hex(0x9edae5),
];

pub const CATEGORY20B: [Color; 20] = [
    Color::from_hex(0x393b79),
    Color::from_hex(0x5254a3),
    Color::from_hex(0x6b6ecf),
    Color::from_hex(0x9c9ede),
    Color::from_hex(0x637939),
    Color::from_hex(0x8ca252),
    Color::from_hex(0xb5cf6b),
    Color::from_hex(0xcedb9c),
    Color::from_hex(0x8c6d31),
    Color::from_hex(0xbd9e39),
    Color::from_hex(0xe7ba52),
    Color::from_hex(0xe7cb94),
    Color::from_hex(0x843c39),
    Color::from_hex(0xad494a),
    Color::from_hex(0xd6616b),
    Color::from_hex(0xe7969c),
    Color::from_hex(0x7b4173),
    Color::from_hex(0xa55194),
    Color::from_hex(0xce6dbd),
    Color::from_hex(0xde9ed6),
];

pub const CATEGORY20C: [Color; 20] = [
    Color::from_hex(0x3182bd),
    Color::from_hex(0x6baed6),
    Color::from_hex(0x9ecae1),
    Color::from_hex(0xc6dbef),
    Color::from_hex(0xe6550d),
    Color::from_hex(0xfd8d3c),
    Color::from_hex(0xfdae6b),
    Color::from_hex(0xfdd0a2),
    Color::from_hex(0x31a354),
    Color::from_hex(0x74c476),
    Color::from_hex(0xa1d99b),
    Color::from_hex(0xc7e9c0),
    Color::from_hex(0x756bb1),
    Color::from_hex(0x9e9ac8),
    Color::from_hex(0xbcbddc),
    Color::from_hex(0xdadaeb),
    Color::from_hex(0x636363),
    Color::from_hex(0x969696),
    Color::from_hex(0xbdbdbd),
    Color::from_hex(0xd9d9d9),
];
