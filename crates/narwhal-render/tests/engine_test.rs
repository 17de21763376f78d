use narwhal_core::{Node, NodeId, Point, parse_markdown, point, size};
use narwhal_render::scene::{Attr, ElementKey, Part};
use narwhal_render::{Error, Markmap, MemoryScene, Options, visible_links};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn fixture(name: &str) -> String {
    let path = workspace_root().join("fixtures").join("markdown").join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

fn scene() -> MemoryScene {
    MemoryScene::new(size(800.0, 600.0))
}

fn no_fit() -> Options {
    Options {
        auto_fit: Some(false),
        ..Default::default()
    }
}

/// R with children A (A1, A2), B and C.
fn abc() -> Node {
    Node::new("R").with_children([
        Node::new("A").with_children([Node::new("A1"), Node::new("A2")]),
        Node::new("B"),
        Node::new("C"),
    ])
}

/// A deterministic, uneven tree: fan-out cycles through 0..=3 so that some subtrees are leaves
/// and neighbouring subtrees have very different widths.
fn uneven(depth: usize, seed: &mut u64) -> Node {
    let mut node = Node::new(format!("n{seed}"));
    if depth == 0 {
        return node;
    }
    *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let fan = ((*seed >> 33) % 4) as usize;
    node.children = (0..fan).map(|_| uneven(depth - 1, seed)).collect();
    node
}

fn find_by_name<'a>(node: &'a Node, name: &str) -> Option<&'a Node> {
    if node.name == name {
        return Some(node);
    }
    node.children
        .iter()
        .chain(&node.hidden_children)
        .find_map(|c| find_by_name(c, name))
}

fn id_of(map: &Markmap<MemoryScene>, name: &str) -> NodeId {
    find_by_name(map.root(), name)
        .and_then(|n| n.id)
        .unwrap_or_else(|| panic!("no id for {name}"))
}

fn position_of(map: &Markmap<MemoryScene>, name: &str) -> Point {
    find_by_name(map.root(), name)
        .and_then(|n| n.position)
        .unwrap_or_else(|| panic!("no position for {name}"))
}

fn visible_names(root: &Node) -> Vec<String> {
    let mut out = Vec::new();
    root.visit_visible(&mut |n| out.push(n.name.clone()));
    out
}

fn all_ids(root: &Node) -> BTreeMap<String, NodeId> {
    fn walk(node: &Node, out: &mut BTreeMap<String, NodeId>) {
        if let Some(id) = node.id {
            out.insert(node.name.clone(), id);
        }
        for c in node.children.iter().chain(&node.hidden_children) {
            walk(c, out);
        }
    }
    let mut out = BTreeMap::new();
    walk(root, &mut out);
    out
}

fn level_gaps(root: &Node) -> Vec<f64> {
    let mut levels: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
    root.visit_visible(&mut |n| {
        let p = n.position.expect("visible nodes are positioned");
        levels.entry(n.depth).or_default().push(p.y);
    });
    let mut gaps = Vec::new();
    for ys in levels.values_mut() {
        ys.sort_by(f64::total_cmp);
        gaps.extend(ys.windows(2).map(|w| w[1] - w[0]));
    }
    gaps
}

#[test]
fn same_level_nodes_never_overlap() {
    for layout in ["tree", "cluster"] {
        for start in [1u64, 7, 42, 1234] {
            let mut seed = start;
            let root = uneven(5, &mut seed);
            let options = Options {
                layout: Some(layout.to_string()),
                ..no_fit()
            };
            let map = Markmap::new(scene(), root, options).expect("markmap");
            let pitch = map.config().row_pitch();
            let gaps = level_gaps(map.root());
            for gap in &gaps {
                assert!(
                    *gap >= pitch - 1e-6,
                    "{layout}/{start}: gap {gap} is tighter than the row pitch {pitch}"
                );
            }
            if let Some(min) = gaps.iter().copied().reduce(f64::min) {
                assert!((min - pitch).abs() < 1e-6, "{layout}/{start}: tightest gap {min}");
            }
        }
    }
}

#[test]
fn depth_axis_is_a_fixed_stride() {
    let map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    let stride = map.config().level_stride();
    assert_eq!(stride, 320.0);
    map.root().visit_visible(&mut |n| {
        let p = n.position.expect("positioned");
        assert_eq!(p.x, n.depth as f64 * stride, "{}", n.name);
    });
}

#[test]
fn first_render_is_anchored_on_the_vertical_middle() {
    let map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    assert_eq!(position_of(&map, "R"), point(0.0, 300.0));
}

#[test]
fn sibling_leaves_sit_one_row_pitch_apart() {
    let map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    let a1 = position_of(&map, "A1");
    let a2 = position_of(&map, "A2");
    assert!((a2.y - a1.y - 30.0).abs() < 1e-9, "{a1:?} {a2:?}");

    let a = position_of(&map, "A");
    let b = position_of(&map, "B");
    assert!(b.y - a.y >= 30.0 - 1e-9);
}

#[test]
fn second_update_without_changes_has_no_deltas() {
    let mut map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    let report = map.update(None).expect("update");
    assert!(!report.has_deltas(), "{report:?}");
    assert_eq!(report.updated.len(), 6);
    assert_eq!(report.links_updated.len(), 5);
}

#[test]
fn collapse_and_expand_round_trip() {
    let mut map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    map.scene_mut().settle();
    let before_names = visible_names(map.root());
    let before_ids = all_ids(map.root());
    let a = id_of(&map, "A");

    let collapsed = map.toggle(a).expect("collapse");
    assert_eq!(collapsed.exited.len(), 2);
    assert_eq!(collapsed.links_exited.len(), 2);
    assert_eq!(visible_names(map.root()), vec!["R", "A", "B", "C"]);
    let hidden: Vec<&str> = find_by_name(map.root(), "A")
        .expect("A")
        .hidden_children
        .iter()
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(hidden, vec!["A1", "A2"]);
    assert_eq!(map.rendered().node_count(), 4);

    map.scene_mut().settle();
    assert!(!map.scene().contains(ElementKey::Node(before_ids["A1"])));

    let expanded = map.toggle(a).expect("expand");
    assert_eq!(expanded.entered.len(), 2);
    assert_eq!(visible_names(map.root()), before_names);
    assert_eq!(all_ids(map.root()), before_ids);
}

#[test]
fn toggle_keeps_the_trigger_in_place() {
    let mut map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    let a = id_of(&map, "A");
    let before = position_of(&map, "A");
    map.toggle(a).expect("collapse");
    assert_eq!(position_of(&map, "A"), before);
    map.toggle(a).expect("expand");
    assert_eq!(position_of(&map, "A"), before);
}

#[test]
fn leaf_toggle_changes_nothing() {
    let mut map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    let b = id_of(&map, "B");
    let report = map.toggle(b).expect("toggle");
    assert!(!report.has_deltas(), "{report:?}");
}

#[test]
fn exiting_nodes_are_revived_when_reexpanded_mid_transition() {
    let mut map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    map.scene_mut().settle();
    let a = id_of(&map, "A");
    let a1 = id_of(&map, "A1");
    let target = position_of(&map, "A1");

    map.toggle(a).expect("collapse");
    map.scene_mut().advance(Duration::from_millis(300));
    let mid = map
        .scene()
        .attr(ElementKey::Node(a1), Attr::Transform)
        .and_then(|v| v.as_translate())
        .expect("still on screen");
    assert_ne!(mid, target);

    map.toggle(a).expect("expand");
    assert!(!map.scene().get(ElementKey::Node(a1)).expect("A1").is_exiting());
    // The transition restarts from where the element was, not from the parent.
    let restart = map
        .scene()
        .attr(ElementKey::Node(a1), Attr::Transform)
        .and_then(|v| v.as_translate());
    assert_eq!(restart, Some(mid));

    map.scene_mut().settle();
    let settled = map
        .scene()
        .attr(ElementKey::Node(a1), Attr::Transform)
        .and_then(|v| v.as_translate());
    assert_eq!(settled, Some(target));
}

#[test]
fn new_nodes_enter_from_the_trigger() {
    let mut map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    map.scene_mut().settle();
    let a = id_of(&map, "A");
    let at = position_of(&map, "A");
    map.toggle(a).expect("collapse");
    map.scene_mut().settle();
    map.toggle(a).expect("expand");

    let a2 = id_of(&map, "A2");
    let start = map
        .scene()
        .attr(ElementKey::Node(a2), Attr::Transform)
        .and_then(|v| v.as_translate());
    assert_eq!(start, Some(at));
}

#[test]
fn collapse_depth_limits_initial_visibility() {
    let root = Node::new("r").with_children([
        Node::new("a").with_children([
            Node::new("a1").with_children([Node::new("a1x")]),
            Node::new("a2"),
        ]),
        Node::new("b").with_children([Node::new("b1")]),
        Node::new("c"),
    ]);
    let options = Options {
        collapse_depth: Some(2),
        ..no_fit()
    };
    let map = Markmap::new(scene(), root, options).expect("markmap");
    let mut deepest = 0;
    map.root().visit_visible(&mut |n| deepest = deepest.max(n.depth));
    assert_eq!(deepest, 1);
    assert_eq!(visible_names(map.root()), vec!["r", "a", "b", "c"]);
    assert!(find_by_name(map.root(), "a").expect("a").is_collapsed());
    // Nested subtrees keep their own state.
    assert!(!find_by_name(map.root(), "a1").expect("a1").is_collapsed());
}

#[test]
fn collapse_depth_zero_is_disabled() {
    let options = Options {
        collapse_depth: Some(0),
        ..no_fit()
    };
    let map = Markmap::new(scene(), abc(), options).expect("markmap");
    assert_eq!(visible_names(map.root()), vec!["R", "A", "A1", "A2", "B", "C"]);
    assert!(!find_by_name(map.root(), "A").expect("A").is_collapsed());
}

#[test]
fn expand_all_reveals_everything() {
    let root = Node::new("r").with_children([
        Node::new("a").with_children([Node::new("a1").with_children([Node::new("a1x")])]),
        Node::new("b").with_children([Node::new("b1")]),
    ]);
    let options = Options {
        collapse_depth: Some(1),
        ..no_fit()
    };
    let mut map = Markmap::new(scene(), root, options).expect("markmap");
    assert_eq!(map.root().visible_count(), 3);
    let report = map.expand_all().expect("expand");
    assert_eq!(report.entered.len(), 3);
    assert_eq!(map.root().visible_count(), 6);
}

#[test]
fn branches_follow_top_level_ancestors() {
    let map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    let root = map.root();
    assert_eq!(root.branch, None);
    for (name, branch) in [("A", 0), ("A1", 0), ("A2", 0), ("B", 1), ("C", 2)] {
        assert_eq!(find_by_name(root, name).expect(name).branch, Some(branch), "{name}");
    }
}

#[test]
fn auto_fit_centres_tall_content() {
    // Two levels 400 apart and five children 300 apart: a 400 x 1200 box.
    let root = Node::new("r").with_children((0..5).map(|i| Node::new(format!("c{i}"))));
    let options = Options {
        node_width: Some(200.0),
        spacing_horizontal: Some(200.0),
        node_height: Some(20.0),
        spacing_vertical: Some(280.0),
        ..Default::default()
    };
    let map = Markmap::new(scene(), root, options).expect("markmap");
    let vp = map.viewport();
    assert_eq!(vp.zoom_scale, 0.5);
    assert_eq!(vp.zoom_translate, point(300.0, 150.0));
    assert_eq!(map.scene().view_transform(), (point(300.0, 150.0), 0.5));
    // Auto-fit only applies to the first render unless requested.
    assert!(!vp.auto_fit);
}

#[test]
fn auto_fit_shrinks_below_the_zoom_range() {
    // Twenty children 300 apart: a 400 x 5700 box, far taller than the container.
    let root = Node::new("r").with_children((0..20).map(|i| Node::new(format!("c{i}"))));
    let options = Options {
        node_width: Some(200.0),
        spacing_horizontal: Some(200.0),
        node_height: Some(20.0),
        spacing_vertical: Some(280.0),
        ..Default::default()
    };
    let map = Markmap::new(scene(), root, options).expect("markmap");
    let vp = map.viewport();
    let expected = 600.0 / 5700.0;
    assert!((vp.zoom_scale - expected).abs() < 1e-12, "scale {}", vp.zoom_scale);
    assert!(vp.zoom_scale < map.config().scale_range.0);

    // Every node lands inside the container.
    let (t, s) = (vp.zoom_translate, vp.zoom_scale);
    map.root().visit_visible(&mut |n| {
        let p = n.position.expect("positioned");
        let (x, y) = (p.x * s + t.x, p.y * s + t.y);
        assert!((-1e-6..=800.0 + 1e-6).contains(&x), "{}: x {x}", n.name);
        assert!((-1e-6..=600.0 + 1e-6).contains(&y), "{}: y {y}", n.name);
    });

    // Gestures are still bounded by the range.
    let mut map = map;
    map.set_viewport(t, s);
    assert_eq!(map.viewport().zoom_scale, 0.5);
}

#[test]
fn explicit_auto_fit_persists() {
    let options = Options {
        auto_fit: Some(true),
        ..Default::default()
    };
    let map = Markmap::new(scene(), abc(), options).expect("markmap");
    assert!(map.viewport().auto_fit);
}

#[test]
fn viewport_scale_is_clamped() {
    let mut map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    map.set_viewport(point(0.0, 0.0), 10.0);
    assert_eq!(map.viewport().zoom_scale, 1.0);
    map.set_viewport(point(0.0, 0.0), 0.01);
    assert_eq!(map.viewport().zoom_scale, 0.5);
}

#[test]
fn running_out_of_ids_is_an_error() {
    let mut root = abc();
    root.id = Some(NodeId(u64::MAX));
    let err = Markmap::new(scene(), root, no_fit()).expect_err("no ids left");
    assert!(matches!(err, Error::IdsExhausted), "{err}");
}

#[test]
fn unknown_names_are_rejected() {
    let bad = Options {
        layout: Some("radial".to_string()),
        ..Default::default()
    };
    let err = Markmap::new(scene(), abc(), bad).expect_err("radial is not a layout");
    assert!(matches!(err, Error::UnknownStrategy { kind: "layout", .. }), "{err}");

    let mut map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    let before = map.config().clone();
    for options in [
        Options::preset("neon"),
        Options {
            color: Some("rainbow".to_string()),
            ..Default::default()
        },
        Options {
            renderer: Some("fancy".to_string()),
            node_height: Some(99.0),
            ..Default::default()
        },
    ] {
        assert!(map.set_options(&options).is_err(), "{options:?}");
        assert_eq!(map.config(), &before);
    }
}

#[test]
fn set_options_applies_on_next_update() {
    let mut map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    map.set_options(&Options {
        spacing_vertical: Some(40.0),
        layout: Some("cluster".to_string()),
        ..Default::default()
    })
    .expect("options");
    map.update(None).expect("update");
    let pitch = map.config().row_pitch();
    assert_eq!(pitch, 60.0);
    let min = level_gaps(map.root())
        .into_iter()
        .reduce(f64::min)
        .expect("gaps");
    assert!((min - pitch).abs() < 1e-6);
}

#[test]
fn update_rejects_unknown_triggers() {
    let mut map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    let err = map.update(Some(NodeId(999))).expect_err("unknown");
    assert!(matches!(
        err,
        Error::Core(narwhal_core::Error::UnknownNode { id: NodeId(999) })
    ));

    let a = id_of(&map, "A");
    map.toggle(a).expect("collapse");
    let a1 = id_of(&map, "A1");
    assert!(map.toggle(a1).is_err(), "hidden nodes cannot be toggled");
    assert!(find_by_name(map.root(), "A").expect("A").is_collapsed());
}

#[test]
fn clicks_toggle_through_events() {
    let mut map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    let a = id_of(&map, "A");
    let event = map
        .scene()
        .click(ElementKey::Part(a, Part::Label(0)))
        .expect("label click bubbles to the node");
    assert_eq!(event.node_id, a);

    let report = map.handle_event(event).expect("event").expect("handled");
    assert_eq!(report.exited.len(), 2);
    assert!(find_by_name(map.root(), "A").expect("A").is_collapsed());
}

#[test]
fn clicks_on_vanished_nodes_are_ignored() {
    let mut map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    let a1 = id_of(&map, "A1");
    let stale = map
        .scene()
        .click(ElementKey::Node(a1))
        .expect("bound on enter");
    map.toggle(id_of(&map, "A")).expect("collapse");
    assert_eq!(map.handle_event(stale).expect("event"), None);
}

#[test]
fn preset_ids_are_kept_and_never_reused() {
    let mut root = abc();
    root.children[1].id = Some(NodeId(40));
    let mut map = Markmap::new(scene(), root, no_fit()).expect("markmap");
    assert_eq!(id_of(&map, "B"), NodeId(40));

    let ids = all_ids(map.root());
    let mut unique: Vec<NodeId> = ids.values().copied().collect();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());

    map.set_data(Node::new("fresh").with_children([Node::new("x")]));
    map.update(None).expect("update");
    assert!(id_of(&map, "x").0 > 40);
}

#[test]
fn links_follow_visible_edges() {
    let mut map = Markmap::new(scene(), abc(), no_fit()).expect("markmap");
    let links = visible_links(map.root());
    assert_eq!(links.len(), 5);
    let mut rendered: Vec<NodeId> = map.rendered().links().collect();
    let mut expected: Vec<NodeId> = links.iter().map(|l| l.target).collect();
    rendered.sort();
    expected.sort();
    assert_eq!(rendered, expected);

    map.toggle(id_of(&map, "A")).expect("collapse");
    assert_eq!(visible_links(map.root()).len(), 3);
    assert_eq!(map.rendered().link_count(), 3);
}

#[test]
fn markdown_fixture_renders_to_svg() {
    let root = parse_markdown(&fixture("basic.md"));
    let mut map = Markmap::new(scene(), root, Options::default()).expect("markmap");
    map.scene_mut().settle();

    let svg = narwhal_render::svg::render_svg(map.scene());
    assert!(svg.starts_with("<svg "), "{svg}");
    assert!(svg.ends_with("</g></svg>\n"));
    assert_eq!(svg.matches(r#"class="markmap-link""#).count(), 6);
    assert_eq!(svg.matches("markmap-node markmap-depth-").count(), 7);
    assert!(svg.contains(">Ship the layout engine</text>"), "{svg}");
    assert!(svg.contains(r#"href="https://example.com/docs""#), "{svg}");
    assert!(svg.contains(r#"href="assets/icon.png""#), "{svg}");
}
