use numbat::{Hierarchy, Point, Separation, Sizing, TreeLayout, layout};

fn fit(width: f64, height: f64) -> TreeLayout {
    TreeLayout {
        sizing: Sizing::Fit { width, height },
        ..Default::default()
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn tree_two_leaves_span_the_width() {
    let mut h = Hierarchy::new();
    let a = h.add_child(h.root());
    let b = h.add_child(h.root());

    let pts = layout(&h, &fit(400.0, 100.0));
    assert_eq!(pts[h.root().index()], Point { x: 200.0, y: 0.0 });
    assert_eq!(pts[a.index()], Point { x: 100.0, y: 100.0 });
    assert_eq!(pts[b.index()], Point { x: 300.0, y: 100.0 });
}

#[test]
fn tree_cousins_are_separated_twice_as_far_as_siblings() {
    let mut h = Hierarchy::new();
    let a = h.add_child(h.root());
    let b = h.add_child(h.root());
    let c = h.add_child(a);
    let d = h.add_child(b);

    let pts = layout(
        &h,
        &TreeLayout {
            sizing: Sizing::NodeSize { dx: 1.0, dy: 1.0 },
            ..Default::default()
        },
    );
    assert!(close(pts[h.root().index()].x, 0.0));
    assert!(close(pts[a.index()].x, -1.0));
    assert!(close(pts[b.index()].x, 1.0));
    assert!(close(pts[c.index()].x, -1.0));
    assert!(close(pts[d.index()].x, 1.0));
    assert!(close(pts[d.index()].y, 2.0));
}

#[test]
fn tree_parent_is_centered_over_its_children() {
    let mut h = Hierarchy::new();
    let a = h.add_child(h.root());
    let kids: Vec<_> = (0..3).map(|_| h.add_child(a)).collect();
    h.add_child(h.root());

    let pts = layout(
        &h,
        &TreeLayout {
            sizing: Sizing::NodeSize { dx: 10.0, dy: 10.0 },
            ..Default::default()
        },
    );
    let first = pts[kids[0].index()].x;
    let last = pts[kids[2].index()].x;
    assert!(close(pts[a.index()].x, (first + last) / 2.0));
}

#[test]
fn tree_nodes_on_a_level_never_overlap() {
    // A lopsided tree exercises threads and subtree shifts.
    let mut h = Hierarchy::new();
    let mut spine = h.root();
    for _ in 0..4 {
        let left = h.add_child(spine);
        h.add_child(left);
        h.add_child(left);
        spine = h.add_child(spine);
    }
    for _ in 0..3 {
        h.add_child(spine);
    }

    let pts = layout(
        &h,
        &TreeLayout {
            sizing: Sizing::NodeSize { dx: 1.0, dy: 1.0 },
            separation: Separation::default(),
        },
    );

    for depth in 0..=h.height() {
        let mut xs: Vec<f64> = h
            .pre_order()
            .into_iter()
            .filter(|n| h.depth(*n) == depth)
            .map(|n| pts[n.index()].x)
            .collect();
        xs.sort_by(f64::total_cmp);
        for pair in xs.windows(2) {
            assert!(
                pair[1] - pair[0] >= 1.0 - 1e-9,
                "nodes at depth {depth} overlap: {xs:?}"
            );
        }
    }
}

#[test]
fn tree_fit_keeps_every_node_inside_the_extent() {
    let mut h = Hierarchy::new();
    for _ in 0..5 {
        let c = h.add_child(h.root());
        h.add_child(c);
    }
    let pts = layout(&h, &fit(1240.0, 700.0));
    for p in &pts {
        assert!(p.x > 0.0 && p.x < 1240.0, "{p:?}");
        assert!(p.y >= 0.0 && p.y <= 700.0, "{p:?}");
    }
    assert!(pts.iter().any(|p| close(p.y, 700.0)));
}
