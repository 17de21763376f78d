//! Projection of a node's inline items onto drawable parts.

use crate::config::Config;
use narwhal_core::{Node, Rule};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Content {
    Icon {
        index: usize,
        src: String,
    },
    Label {
        index: usize,
        text: String,
        /// Present for link items; the label is wrapped in an anchor.
        href: Option<String>,
        /// An image item came before this label.
        after_icon: bool,
    },
}

impl Content {
    pub fn index(&self) -> usize {
        match self {
            Self::Icon { index, .. } | Self::Label { index, .. } => *index,
        }
    }
}

/// Lists the parts drawn for `node`. A node without inline items falls back to a single label
/// holding its name.
pub fn project(node: &Node) -> Vec<Content> {
    if node.rules.is_empty() {
        if node.name.is_empty() {
            return Vec::new();
        }
        return vec![Content::Label {
            index: 0,
            text: node.name.clone(),
            href: None,
            after_icon: false,
        }];
    }

    let mut after_icon = false;
    node.rules
        .iter()
        .enumerate()
        .map(|(index, rule)| match rule {
            Rule::Image { src } => {
                after_icon = true;
                Content::Icon {
                    index,
                    src: src.clone(),
                }
            }
            Rule::Link { href, content } => Content::Label {
                index,
                text: content.clone(),
                href: Some(href.clone()),
                after_icon,
            },
            Rule::Text { content } => Content::Label {
                index,
                text: content.clone(),
                href: None,
                after_icon,
            },
        })
        .collect()
}

pub fn icon_y(depth: usize) -> f64 {
    if depth > 2 { -18.0 } else { -30.0 }
}

/// Settled x offset of a label inside its node.
pub fn label_x(after_icon: bool, depth: usize, config: &Config) -> f64 {
    if !after_icon {
        10.0
    } else if depth > 2 {
        config.text_indent
    } else {
        45.0
    }
}
