//! Tidy tree placement (Reingold–Tilford, with Walker's apportioning in Buchheim et al.'s
//! linear-time form).

use super::{FlatNode, LayoutStrategy, RawLayout, RawPosition, flatten, links_of, post_order};
use narwhal_core::Node;

#[derive(Debug, Clone, Copy, Default)]
pub struct TidyTree;

impl LayoutStrategy for TidyTree {
    fn compute(&self, root: &Node) -> RawLayout {
        let flat = flatten(root);
        let breadth = Walker::new(&flat).run();
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

/// Per-node working state. Index `flat.len()` is a virtual parent of the real root.
#[derive(Debug, Clone, Default)]
struct Slot {
    /// Preliminary x.
    prelim: f64,
    modifier: f64,
    change: f64,
    shift: f64,
    thread: Option<usize>,
    ancestor: usize,
    /// Default ancestor used while apportioning this node's children.
    default_ancestor: Option<usize>,
}

struct Walker<'a> {
    flat: &'a [FlatNode],
    slots: Vec<Slot>,
    /// Sibling index of every node.
    index: Vec<usize>,
    virtual_root: usize,
}

impl<'a> Walker<'a> {
    fn new(flat: &'a [FlatNode]) -> Self {
        let n = flat.len();
        let mut index = vec![0; n + 1];
        for node in flat {
            for (i, &c) in node.children.iter().enumerate() {
                index[c] = i;
            }
        }
        let slots = (0..=n)
            .map(|i| Slot {
                ancestor: i,
                ..Default::default()
            })
            .collect();
        Self {
            flat,
            slots,
            index,
            virtual_root: n,
        }
    }

    fn parent(&self, v: usize) -> usize {
        self.flat[v].parent.unwrap_or(self.virtual_root)
    }

    fn children(&self, v: usize) -> &[usize] {
        if v == self.virtual_root {
            return &[0];
        }
        &self.flat[v].children
    }

    fn separation(&self, a: usize, b: usize) -> f64 {
        if self.parent(a) == self.parent(b) {
            1.0
        } else {
            2.0
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.children(v).first().copied().or(self.slots[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.children(v).last().copied().or(self.slots[v].thread)
    }

    fn run(mut self) -> Vec<f64> {
        if self.flat.is_empty() {
            return Vec::new();
        }
        for v in post_order(self.flat) {
            self.first_walk(v);
        }

        let mut x = vec![0.0; self.flat.len()];
        self.slots[self.virtual_root].modifier = -self.slots[0].prelim;
        // Pre-order: parents are always visited before their children.
        for v in 0..self.flat.len() {
            let pm = self.slots[self.parent(v)].modifier;
            x[v] = self.slots[v].prelim + pm;
            self.slots[v].modifier += pm;
        }
        x
    }

    fn first_walk(&mut self, v: usize) {
        let p = self.parent(v);
        let i = self.index[v];
        let left = if i > 0 {
            Some(self.children(p)[i - 1])
        } else {
            None
        };

        let kids = self.children(v).to_vec();
        if let (Some(&first), Some(&last)) = (kids.first(), kids.last()) {
            self.execute_shifts(&kids);
            let midpoint = (self.slots[first].prelim + self.slots[last].prelim) / 2.0;
            match left {
                Some(w) => {
                    self.slots[v].prelim = self.slots[w].prelim + self.separation(v, w);
                    self.slots[v].modifier = self.slots[v].prelim - midpoint;
                }
                None => self.slots[v].prelim = midpoint,
            }
        } else if let Some(w) = left {
            self.slots[v].prelim = self.slots[w].prelim + self.separation(v, w);
        }

        let leftmost = self.children(p)[0];
        let default_ancestor = self.slots[p].default_ancestor.unwrap_or(leftmost);
        let next = self.apportion(v, left, default_ancestor);
        self.slots[p].default_ancestor = Some(next);
    }

    fn execute_shifts(&mut self, kids: &[usize]) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for &w in kids.iter().rev() {
            let s = &mut self.slots[w];
            s.prelim += shift;
            s.modifier += shift;
            change += s.change;
            shift += s.shift + change;
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let subtrees = self.index[wp] as f64 - self.index[wm] as f64;
        let change = shift / subtrees;
        self.slots[wp].change -= change;
        self.slots[wp].shift += shift;
        self.slots[wm].change += change;
        self.slots[wp].prelim += shift;
        self.slots[wp].modifier += shift;
    }

    fn next_ancestor(&self, vim: usize, v: usize, default_ancestor: usize) -> usize {
        let a = self.slots[vim].ancestor;
        if self.parent(a) == self.parent(v) {
            a
        } else {
            default_ancestor
        }
    }

    fn apportion(&mut self, v: usize, left: Option<usize>, mut default_ancestor: usize) -> usize {
        let Some(w) = left else {
            return default_ancestor;
        };

        // i = inside, o = outside; p = right contour (v's subtree), m = left contour.
        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.children(self.parent(v))[0];
        let mut sip = self.slots[vip].modifier;
        let mut sop = self.slots[vop].modifier;
        let mut sim = self.slots[vim].modifier;
        let mut som = self.slots[vom].modifier;

        let (tail_im, tail_ip) = loop {
            let (nim, nip) = (self.next_right(vim), self.next_left(vip));
            let (Some(a), Some(b)) = (nim, nip) else {
                break (nim, nip);
            };
            let (Some(om), Some(op)) = (self.next_left(vom), self.next_right(vop)) else {
                break (None, None);
            };
            vim = a;
            vip = b;
            vom = om;
            vop = op;
            self.slots[vop].ancestor = v;

            let shift = self.slots[vim].prelim + sim - self.slots[vip].prelim - sip
                + self.separation(vim, vip);
            if shift > 0.0 {
                let wm = self.next_ancestor(vim, v, default_ancestor);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.slots[vim].modifier;
            sip += self.slots[vip].modifier;
            som += self.slots[vom].modifier;
            sop += self.slots[vop].modifier;
        };

        if let Some(im) = tail_im {
            if self.next_right(vop).is_none() {
                self.slots[vop].thread = Some(im);
                self.slots[vop].modifier += sim - sop;
            }
        }
        if let Some(ip) = tail_ip {
            if self.next_left(vom).is_none() {
                self.slots[vom].thread = Some(ip);
                self.slots[vom].modifier += sip - som;
                default_ancestor = v;
            }
        }
        default_ancestor
    }
}
