use semtree_core::{DisplayTree, NodeId, NodeShape, SemanticTree, VisibilityState};
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

fn fixtures_root() -> PathBuf {
    workspace_root().join("fixtures").join("stree")
}

fn load(name: &str) -> SemanticTree {
    let text = std::fs::read_to_string(fixtures_root().join(name)).expect("read fixture");
    SemanticTree::from_json_str(&text)
        .expect("parse fixture")
        .expect("fixture has a tree")
}

#[test]
fn every_fixture_builds_a_display_tree() {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(fixtures_root())
        .expect("fixtures dir")
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    entries.sort();
    assert!(!entries.is_empty());

    for path in entries {
        let text = std::fs::read_to_string(&path).expect("read fixture");
        let tree = SemanticTree::from_json_str(&text)
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()))
            .expect("tree present");
        let display = DisplayTree::from_semantic(tree.root())
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        assert_eq!(display.len(), tree.root().count(), "{}", path.display());
    }
}

#[test]
fn string_ids_and_extra_attributes_survive() {
    let tree = load("quadratic.json");
    assert_eq!(tree.root().id, NodeId(16));

    let x = tree.find(NodeId(1)).expect("x");
    assert_eq!(x.attribute("font").as_deref(), Some("italic"));

    let pretty = tree.to_pretty_json().expect("json");
    let back = SemanticTree::from_json_str(&pretty)
        .expect("reparse")
        .expect("tree present");
    assert_eq!(back, tree);
}

#[test]
fn shapes_and_labels_follow_the_node_payload() {
    let tree = load("quadratic.json");
    let display = DisplayTree::from_semantic(tree.root()).expect("display tree");
    let node = |id: u32| display.node(display.find(NodeId(id)).expect("node"));

    assert_eq!(node(16).label, "=");
    assert_eq!(node(16).shape, NodeShape::ContentOperator);
    assert_eq!(node(15).label, "++");
    assert_eq!(node(2).shape, NodeShape::Other);
    assert_eq!(node(8).shape, NodeShape::Leaf);
    assert_eq!(node(8).attribute("type").as_deref(), Some("identifier"));
}

#[test]
fn collapse_everything_then_reapply() {
    let tree = load("quadratic.json");
    let mut display = DisplayTree::from_semantic(tree.root()).expect("display tree");
    let mut state = VisibilityState::new();
    let root = display.root();
    state.collapse_subtree(&mut display, root);
    assert_eq!(display.visible_ids(), vec![NodeId(16)]);
    assert_eq!(state.len(), 5);

    state.record(NodeId(16), true);
    let mut fresh = DisplayTree::from_semantic(tree.root()).expect("display tree");
    state.reapply(&mut fresh);
    assert_eq!(fresh.visible_ids(), vec![NodeId(16), NodeId(15), NodeId(9)]);
}
