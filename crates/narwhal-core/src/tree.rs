use crate::model::Node;
use crate::outline::Heading;

fn node_from_heading(h: Heading) -> (u8, Node) {
    let node = Node {
        name: h.name,
        line: Some(h.line),
        rules: h.rules.unwrap_or_default(),
        ..Default::default()
    };
    (h.depth, node)
}

fn set_depths(node: &mut Node, depth: usize) {
    node.depth = depth;
    for c in node.children.iter_mut() {
        set_depths(c, depth + 1);
    }
}

/// Nests flat heading records into a tree.
///
/// Each heading becomes a child of the nearest preceding heading with a smaller level. If the
/// first heading is the only one at the document's top level it becomes the root; otherwise an
/// unnamed root holds every top-level heading. Node depths are tree distances, so skipped
/// heading levels do not leave gaps.
pub fn assemble(headings: impl IntoIterator<Item = Heading>) -> Node {
    let items: Vec<(u8, Node)> = headings.into_iter().map(node_from_heading).collect();

    let top = items.iter().map(|(d, _)| *d).min().unwrap_or(1);
    let top_count = items.iter().filter(|(d, _)| *d == top).count();
    let single_root = top_count == 1 && items.first().is_some_and(|(d, _)| *d == top);

    // Stack of open ancestors: (heading level, node). Level 0 is the synthetic root.
    let mut stack: Vec<(u8, Node)> = Vec::new();
    let mut items = items.into_iter();
    if single_root {
        if let Some(first) = items.next() {
            stack.push(first);
        }
    } else {
        stack.push((0, Node::default()));
    }

    for (depth, node) in items {
        while stack.len() > 1 && stack.last().is_some_and(|(d, _)| *d >= depth) {
            close_top(&mut stack);
        }
        stack.push((depth, node));
    }
    while stack.len() > 1 {
        close_top(&mut stack);
    }

    let mut root = stack.pop().map(|(_, n)| n).unwrap_or_default();
    set_depths(&mut root, 0);
    root
}

fn close_top(stack: &mut Vec<(u8, Node)>) {
    if let Some((_, done)) = stack.pop() {
        if let Some((_, parent)) = stack.last_mut() {
            parent.children.push(done);
        }
    }
}
