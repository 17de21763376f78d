use super::{LayoutStrategy, RawLayout, RawPosition, flatten, links_of, post_order, separation};
use narwhal_core::Node;

/// Dendrogram placement: leaves are laid out in order, one separation apart, and every parent
/// sits at the mean of its children.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cluster;

impl LayoutStrategy for Cluster {
    fn compute(&self, root: &Node) -> RawLayout {
        let flat = flatten(root);
        let mut breadth = vec![0.0; flat.len()];
        let mut previous_leaf: Option<usize> = None;

        for v in post_order(&flat) {
            let kids = &flat[v].children;
            if kids.is_empty() {
                breadth[v] = match previous_leaf {
                    Some(p) => breadth[p] + separation(&flat, v, p),
                    None => 0.0,
                };
                previous_leaf = Some(v);
            } else {
                let sum: f64 = kids.iter().map(|&c| breadth[c]).sum();
                breadth[v] = sum / kids.len() as f64;
            }
        }

        RawLayout {
            positions: flat
                .iter()
                .zip(breadth)
                .map(|(n, breadth)| RawPosition {
                    breadth,
                    depth: n.depth,
                })
                .collect(),
            links: links_of(&flat),
        }
    }
}
