//! Name-addressed registry of pluggable strategies.
//!
//! Every strategy family is a closed set of identifiers. Names are parsed once, when a
//! configuration is resolved, and the boxed strategy objects are rebuilt only when the selected
//! name changes.

use crate::color::{
    CATEGORY10, CATEGORY20, CATEGORY20B, CATEGORY20C, ColorStrategy, Constant, GRAY, Ordinal,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::layout::{Cluster, LayoutStrategy, TidyTree};
use crate::link_shape::{Bracket, Diagonal, LinkShape};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

fn lookup<T: Copy>(kind: &'static str, table: &[(&'static str, T)], name: &str) -> Result<T> {
    table
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| *v)
        .ok_or_else(|| Error::UnknownStrategy {
            kind,
            name: name.to_string(),
        })
}

fn name_of<T: Copy + PartialEq>(table: &[(&'static str, T)], value: T) -> &'static str {
    table
        .iter()
        .find(|(_, v)| *v == value)
        .map(|(n, _)| *n)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Tree,
    Cluster,
}

impl LayoutKind {
    pub const NAMES: &'static [(&'static str, Self)] =
        &[("tree", Self::Tree), ("cluster", Self::Cluster)];

    pub fn name(self) -> &'static str {
        name_of(Self::NAMES, self)
    }

    pub fn build(self) -> Box<dyn LayoutStrategy> {
        match self {
            Self::Tree => Box::new(TidyTree),
            Self::Cluster => Box::new(Cluster),
        }
    }
}

impl FromStr for LayoutKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        lookup("layout", Self::NAMES, s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkShapeKind {
    Diagonal,
    Bracket,
}

impl LinkShapeKind {
    pub const NAMES: &'static [(&'static str, Self)] =
        &[("diagonal", Self::Diagonal), ("bracket", Self::Bracket)];

    pub fn name(self) -> &'static str {
        name_of(Self::NAMES, self)
    }

    pub fn build(self) -> Box<dyn LinkShape> {
        match self {
            Self::Diagonal => Box::new(Diagonal),
            Self::Bracket => Box::new(Bracket),
        }
    }
}

impl FromStr for LinkShapeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        lookup("linkShape", Self::NAMES, s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorKind {
    Gray,
    Category10,
    Category20,
    Category20b,
    Category20c,
}

impl ColorKind {
    pub const NAMES: &'static [(&'static str, Self)] = &[
        ("gray", Self::Gray),
        ("category10", Self::Category10),
        ("category20", Self::Category20),
        ("category20b", Self::Category20b),
        ("category20c", Self::Category20c),
    ];

    pub fn name(self) -> &'static str {
        name_of(Self::NAMES, self)
    }

    pub fn build(self) -> Box<dyn ColorStrategy> {
        match self {
            Self::Gray => Box::new(Constant(GRAY)),
            Self::Category10 => Box::new(Ordinal::new(&CATEGORY10)),
            Self::Category20 => Box::new(Ordinal::new(&CATEGORY20)),
            Self::Category20b => Box::new(Ordinal::new(&CATEGORY20B)),
            Self::Category20c => Box::new(Ordinal::new(&CATEGORY20C)),
        }
    }
}

impl FromStr for ColorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        lookup("color", Self::NAMES, s)
    }
}

macro_rules! display_by_name {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        })*
    };
}

display_by_name!(LayoutKind, LinkShapeKind, ColorKind);

/// The live strategy objects for one configuration.
#[derive(Debug)]
pub struct Strategies {
    layout_kind: LayoutKind,
    link_shape_kind: LinkShapeKind,
    color_kind: ColorKind,
    pub layout: Box<dyn LayoutStrategy>,
    pub link_shape: Box<dyn LinkShape>,
    pub color: Box<dyn ColorStrategy>,
}

impl Strategies {
    pub fn resolve(config: &Config) -> Self {
        Self {
            layout_kind: config.layout,
            link_shape_kind: config.link_shape,
            color_kind: config.color,
            layout: config.layout.build(),
            link_shape: config.link_shape.build(),
            color: config.color.build(),
        }
    }

    /// Rebuilds the strategies whose selected name differs from `config`. Returns how many were
    /// rebuilt. Unchanged strategies keep their state (e.g. an ordinal palette's domain).
    pub fn sync(&mut self, config: &Config) -> usize {
        let mut rebuilt = 0;
        if self.layout_kind != config.layout {
            tracing::debug!(from = %self.layout_kind, to = %config.layout, "re-resolving layout");
            self.layout_kind = config.layout;
            self.layout = config.layout.build();
            rebuilt += 1;
        }
        if self.link_shape_kind != config.link_shape {
            tracing::debug!(
                from = %self.link_shape_kind,
                to = %config.link_shape,
                "re-resolving link shape"
            );
            self.link_shape_kind = config.link_shape;
            self.link_shape = config.link_shape.build();
            rebuilt += 1;
        }
        if self.color_kind != config.color {
            tracing::debug!(from = %self.color_kind, to = %config.color, "re-resolving color");
            self.color_kind = config.color;
            self.color = config.color.build();
            rebuilt += 1;
        }
        rebuilt
    }
}
