#![forbid(unsafe_code)]

//! Markdown outline extraction and the mind-map tree model (headless).
//!
//! The pipeline is:
//! - [`outline::extract_headings`]: Markdown text -> flat heading records
//! - [`tree::assemble`]: heading records -> a rooted [`Node`] tree
//!
//! Layout, viewport handling and rendering live in `narwhal-render`.

pub mod error;
pub mod geom;
pub mod model;
pub mod outline;
pub mod tree;

pub use error::{Error, Result};
pub use geom::{Point, Size, Vector, point, size, vector};
pub use model::{Node, NodeId, Rule};
pub use outline::{Heading, extract_headings};
pub use tree::assemble;

/// Parses Markdown text straight into a mind-map tree.
pub fn parse_markdown(text: &str) -> Node {
    assemble(extract_headings(text))
}
