//! Tests for the tree model: construction, edges, queries and display

use rstest::rstest;

use treeviz::domain::{
    fib_call_tree, parse_tree, BinaryTree, DomainError, Edge, Side, TreeDisplay, TreeSpec,
};

const DEEP: usize = 5000;

fn right_spine(levels: usize) -> BinaryTree {
    let mut tree = BinaryTree::new("0");
    let mut current = tree.root().unwrap();
    for i in 1..levels {
        current = tree.insert_right(current, i.to_string()).unwrap();
    }
    tree
}

fn label_of(tree: &BinaryTree, edge: &Edge) -> (String, String, Side) {
    (
        tree.label(edge.parent).unwrap().to_string(),
        tree.label(edge.child).unwrap().to_string(),
        edge.side,
    )
}

// ============================================================
// Edges
// ============================================================

#[test]
fn given_fib2_when_listing_edges_then_left_and_right_are_tagged() {
    // Arrange
    let tree = parse_tree("f(2) { f(1), f(0) }").unwrap();

    // Act
    let edges: Vec<_> = tree.edges().iter().map(|e| label_of(&tree, e)).collect();

    // Assert
    assert_eq!(
        edges,
        vec![
            ("f(2)".to_string(), "f(1)".to_string(), Side::Left),
            ("f(2)".to_string(), "f(0)".to_string(), Side::Right),
        ]
    );
}

#[rstest]
#[case("a")]
#[case("a { b, _ }")]
#[case("a { b { d, e }, c { _, f } }")]
#[case("a { _, b { _, c { d, _ } } }")]
fn given_tree_when_listing_edges_then_one_less_than_node_count(#[case] expr: &str) {
    let tree = parse_tree(expr).unwrap();

    let edges = tree.edges();

    assert_eq!(edges.len(), tree.len() - 1);
    for edge in &edges {
        assert_eq!(tree.parent(edge.child), Some(edge.parent));
        assert_eq!(tree.child(edge.parent, edge.side), Some(edge.child));
    }
}

#[test]
fn given_empty_tree_when_listing_edges_then_empty() {
    let tree = BinaryTree::default();
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert!(tree.edges().is_empty());
    assert!(tree.leaves().is_empty());
}

// ============================================================
// Construction
// ============================================================

#[test]
fn given_built_tree_when_attaching_to_occupied_side_then_invalid_argument() {
    // Arrange
    let mut tree = BinaryTree::new("root");
    let root = tree.root().unwrap();
    tree.insert_right(root, "r").unwrap();

    // Act
    let result = tree.insert_right(root, "again");

    // Assert
    assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
    assert_eq!(tree.len(), 2);
}

#[test]
fn given_spec_when_building_and_converting_back_then_shape_is_preserved() {
    // Arrange
    let spec = TreeSpec::leaf("a")
        .with_left(TreeSpec::leaf("b").with_right(TreeSpec::leaf("d")))
        .with_right(TreeSpec::leaf("c"));

    // Act
    let tree = spec.build().unwrap();

    // Assert
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.depth(), 3);
    let b = tree.left(tree.root().unwrap()).unwrap();
    assert_eq!(tree.label(b), Some("b"));
    assert_eq!(tree.left(b), None);
    assert_eq!(tree.to_spec(), Some(spec));
}

#[rstest]
#[case(0, 1, 1)]
#[case(3, 5, 3)]
#[case(5, 15, 8)]
fn given_fib_n_when_building_call_tree_then_counts_match(
    #[case] n: u32,
    #[case] nodes: usize,
    #[case] leaves: usize,
) {
    let tree = fib_call_tree(n).unwrap();

    assert_eq!(tree.len(), nodes);
    assert_eq!(tree.leaves().len(), leaves);
    assert_eq!(tree.label(tree.root().unwrap()), Some(format!("f({})", n).as_str()));
}

#[test]
fn given_fib4_when_building_call_tree_then_left_is_n_minus_one() {
    let tree = fib_call_tree(4).unwrap();
    let root = tree.root().unwrap();

    assert_eq!(tree.label(tree.left(root).unwrap()), Some("f(3)"));
    assert_eq!(tree.label(tree.right(root).unwrap()), Some("f(2)"));
}

// ============================================================
// Queries
// ============================================================

#[test]
fn given_fib4_when_finding_label_then_returns_all_occurrences_in_preorder() {
    let tree = fib_call_tree(4).unwrap();

    let f1 = tree.find_all("f(1)");
    let f2 = tree.find_all("f(2)");

    assert_eq!(f1.len(), 3);
    assert_eq!(f2.len(), 2);
    assert_eq!(tree.find_first("f(2)"), Some(f2[0]));
    assert_eq!(tree.depth_of(f2[0]), Some(2));
    assert_eq!(tree.depth_of(f2[1]), Some(1));
    assert!(tree.find_all("f(9)").is_empty());
}

#[test]
fn given_fib4_when_listing_repeated_subproblems_then_only_later_occurrences() {
    // Pre-order: f4 f3 f2 f1 f0 | f1 f2 f1 f0 (repeats after the bar)
    let tree = fib_call_tree(4).unwrap();

    let repeats: Vec<&str> = tree
        .repeated_subproblems()
        .into_iter()
        .map(|id| tree.label(id).unwrap())
        .collect();

    assert_eq!(repeats, vec!["f(1)", "f(2)", "f(1)", "f(0)"]);
}

// ============================================================
// Display
// ============================================================

#[test]
fn given_one_sided_node_when_displaying_then_missing_side_is_marked() {
    let tree = parse_tree("a { _, b }").unwrap();

    let rendered = tree.to_tree_string().to_string();

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "a");
    assert!(lines[1].ends_with("∅"));
    assert!(lines[2].ends_with("b"));
}

#[test]
fn given_empty_tree_when_displaying_then_placeholder() {
    let tree = BinaryTree::default();
    assert_eq!(tree.to_tree_string().to_string().trim(), "Empty tree");
}

#[test]
fn given_custom_renderer_when_displaying_then_uses_it() {
    let tree = fib_call_tree(2).unwrap();

    let rendered = tree
        .to_tree_string_with(|id| format!("[{}]", tree.label(id).unwrap()))
        .to_string();

    assert!(rendered.starts_with("[f(2)]"));
    assert!(rendered.contains("[f(0)]"));
}

// ============================================================
// Deep trees
// ============================================================

#[test]
fn given_deep_spine_when_displaying_then_renders_every_level() {
    // Arrange
    let tree = right_spine(DEEP);

    // Act
    let mut rendered = tree.to_tree_string();

    // Assert: follow the right-hand leaves down, detaching one level at a time
    let mut depth = 1;
    while let Some(next) = rendered.leaves.pop() {
        assert_eq!(rendered.leaves.len(), 1);
        assert_eq!(rendered.leaves[0].root, "∅");
        rendered = next;
        depth += 1;
    }
    assert_eq!(depth, DEEP);
    assert_eq!(rendered.root, (DEEP - 1).to_string());
}

#[test]
fn given_deep_spine_when_converting_to_spec_then_every_level_is_kept() {
    // Arrange
    let tree = right_spine(DEEP);

    // Act
    let spec = tree.to_spec().unwrap();

    // Assert
    let mut depth = 1;
    let mut current = &spec;
    while let Some(next) = current.right.as_deref() {
        assert!(current.left.is_none());
        current = next;
        depth += 1;
    }
    assert_eq!(depth, DEEP);
    assert_eq!(current.label, (DEEP - 1).to_string());
    assert_eq!(spec.build().unwrap().depth(), DEEP);
}
