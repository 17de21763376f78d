//! Options, presets and the resolved configuration.

use crate::error::{Error, Result};
use crate::strategy::{ColorKind, LayoutKind, LinkShapeKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Caller-supplied overrides. Every field is optional and absent fields leave the current value
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_vertical: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_horizontal: Option<f64>,
    /// Transition duration in milliseconds.
    #[serde(alias = "transitionDuration", skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(alias = "layoutStrategy", skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(alias = "linkShapeStrategy", skip_serializing_if = "Option::is_none")]
    pub link_shape: Option<String>,
    #[serde(alias = "colorStrategy", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renderer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_indent: Option<f64>,
    #[serde(alias = "scaleRange", skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f64; 2]>,
    #[serde(alias = "depth", skip_serializing_if = "Option::is_none")]
    pub collapse_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_fit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan_slack: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_width_adjust: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_char_width: Option<f64>,
}

impl Options {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn preset(name: impl Into<String>) -> Self {
        Self {
            preset: Some(name.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Thin bars under the label (`basic`).
    Plain,
    /// Rounded, filled boxes.
    Boxed,
}

impl FromStr for RendererKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "basic" | "plain" => Ok(Self::Plain),
            "boxed" => Ok(Self::Boxed),
            _ => Err(Error::UnknownRenderer {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "basic",
            Self::Boxed => "boxed",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Default,
    Colorful,
}

impl Preset {
    /// Overwrites every field the preset covers. Fields outside the preset (collapse depth,
    /// auto-fit, pan slack, label width) are left alone.
    pub fn apply(self, config: &mut Config) {
        config.node_height = 20.0;
        config.node_width = 200.0;
        config.spacing_vertical = 10.0;
        config.spacing_horizontal = 120.0;
        config.duration = Duration::from_millis(750);
        config.layout = LayoutKind::Tree;
        config.color = ColorKind::Gray;
        config.link_shape = LinkShapeKind::Diagonal;
        config.renderer = RendererKind::Boxed;
        config.text_indent = 40.0;
        config.scale_range = (0.5, 1.0);

        if self == Self::Colorful {
            config.node_height = 10.0;
            config.renderer = RendererKind::Plain;
            config.color = ColorKind::Category20;
        }
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(Self::Default),
            "colorful" => Ok(Self::Colorful),
            _ => Err(Error::UnknownPreset {
                name: s.to_string(),
            }),
        }
    }
}

/// Fully resolved, immutable configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub node_height: f64,
    pub node_width: f64,
    pub spacing_vertical: f64,
    pub spacing_horizontal: f64,
    pub duration: Duration,
    pub layout: LayoutKind,
    pub link_shape: LinkShapeKind,
    pub color: ColorKind,
    pub renderer: RendererKind,
    pub text_indent: f64,
    pub scale_range: (f64, f64),
    /// 1-based level from which nodes start collapsed.
    pub collapse_depth: Option<usize>,
    /// `None` means the caller never chose; the engine then fits once on initialization.
    pub auto_fit: Option<bool>,
    /// Extra horizontal leading-edge slack allowed when panning wide diagrams.
    pub pan_slack: f64,
    pub label_width_adjust: bool,
    pub label_char_width: f64,
}

impl Default for Config {
    fn default() -> Self {
        let mut config = Self {
            node_height: 0.0,
            node_width: 0.0,
            spacing_vertical: 0.0,
            spacing_horizontal: 0.0,
            duration: Duration::ZERO,
            layout: LayoutKind::Tree,
            link_shape: LinkShapeKind::Diagonal,
            color: ColorKind::Gray,
            renderer: RendererKind::Boxed,
            text_indent: 0.0,
            scale_range: (0.5, 1.0),
            collapse_depth: None,
            auto_fit: None,
            pan_slack: 300.0,
            label_width_adjust: false,
            label_char_width: 5.0,
        };
        Preset::Default.apply(&mut config);
        config
    }
}

impl Config {
    /// Defaults, then the preset named in `options` (if any), then the remaining overrides.
    pub fn resolve(options: &Options) -> Result<Self> {
        Self::default().merged(options)
    }

    /// Merges `options` on top of `self` without touching `self`.
    pub fn merged(&self, options: &Options) -> Result<Self> {
        let mut next = self.clone();
        if let Some(name) = options.preset.as_deref() {
            name.parse::<Preset>()?.apply(&mut next);
        }

        macro_rules! take {
            ($($field:ident),*) => {
                $(if let Some(v) = options.$field {
                    next.$field = v;
                })*
            };
        }
        take!(
            node_height,
            node_width,
            spacing_vertical,
            spacing_horizontal,
            text_indent,
            pan_slack,
            label_char_width
        );

        if let Some(ms) = options.duration {
            next.duration = Duration::from_millis(ms);
        }
        if let Some(name) = options.layout.as_deref() {
            next.layout = name.parse()?;
        }
        if let Some(name) = options.link_shape.as_deref() {
            next.link_shape = name.parse()?;
        }
        if let Some(name) = options.color.as_deref() {
            next.color = name.parse()?;
        }
        if let Some(name) = options.renderer.as_deref() {
            next.renderer = name.parse()?;
        }
        if let Some([min, max]) = options.scale {
            next.scale_range = (min, max);
        }
        if options.collapse_depth.is_some() {
            next.collapse_depth = options.collapse_depth;
        }
        if options.auto_fit.is_some() {
            next.auto_fit = options.auto_fit;
        }
        if let Some(v) = options.label_width_adjust {
            next.label_width_adjust = v;
        }

        let (min, max) = next.scale_range;
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(Error::InvalidScaleRange { min, max });
        }
        Ok(next)
    }

    /// Minimum perpendicular distance between two rendered nodes on one level.
    pub fn row_pitch(&self) -> f64 {
        self.node_height + self.spacing_vertical
    }

    /// Distance between two depth levels.
    pub fn level_stride(&self) -> f64 {
        self.node_width + self.spacing_horizontal
    }

    pub fn clamp_scale(&self, scale: f64) -> f64 {
        let (min, max) = self.scale_range;
        scale.max(min).min(max)
    }
}
