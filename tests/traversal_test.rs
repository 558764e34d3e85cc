//! Tests for breadth-first and depth-first traversal orders

use std::collections::HashSet;

use rstest::{fixture, rstest};

use treeviz::domain::{fib_call_tree, parse_tree, BinaryTree, NodeId};

fn labels<I: IntoIterator<Item = NodeId>>(tree: &BinaryTree, ids: I) -> Vec<String> {
    ids.into_iter()
        .map(|id| tree.label(id).unwrap().to_string())
        .collect()
}

#[fixture]
fn fib2() -> BinaryTree {
    parse_tree("f(2) { f(1), f(0) }").unwrap()
}

//        a
//      /   \
//     b     c
//    / \     \
//   d   e     f
#[fixture]
fn mixed() -> BinaryTree {
    parse_tree("a { b { d, e }, c { _, f } }").unwrap()
}

#[rstest]
fn given_fib2_when_bfs_layers_then_yields_root_then_children(fib2: BinaryTree) {
    let layers: Vec<Vec<String>> = fib2
        .bfs_layers()
        .map(|layer| labels(&fib2, layer))
        .collect();

    assert_eq!(layers, vec![vec!["f(2)"], vec!["f(1)", "f(0)"]]);
}

#[rstest]
fn given_fib2_when_dfs_then_left_and_right_first_orders_differ(fib2: BinaryTree) {
    assert_eq!(
        labels(&fib2, fib2.dfs_left_first()),
        vec!["f(2)", "f(1)", "f(0)"]
    );
    assert_eq!(
        labels(&fib2, fib2.dfs_right_first()),
        vec!["f(2)", "f(0)", "f(1)"]
    );
}

#[rstest]
fn given_mixed_tree_when_traversing_then_orders_match(mixed: BinaryTree) {
    assert_eq!(
        labels(&mixed, mixed.bfs()),
        vec!["a", "b", "c", "d", "e", "f"]
    );
    assert_eq!(
        labels(&mixed, mixed.dfs_left_first()),
        vec!["a", "b", "d", "e", "c", "f"]
    );
    assert_eq!(
        labels(&mixed, mixed.dfs_right_first()),
        vec!["a", "c", "f", "b", "e", "d"]
    );
    let layer_sizes: Vec<usize> = mixed.bfs_layers().map(|layer| layer.len()).collect();
    assert_eq!(layer_sizes, vec![1, 2, 3]);
}

#[rstest]
#[case(0, 1)]
#[case(1, 1)]
#[case(2, 2)]
#[case(4, 4)]
#[case(7, 7)]
fn given_fib_tree_when_counting_layers_then_equals_depth(#[case] n: u32, #[case] depth: usize) {
    let tree = fib_call_tree(n).unwrap();

    assert_eq!(tree.depth(), depth);
    assert_eq!(tree.bfs_layers().count(), tree.depth());
}

#[rstest]
fn given_fib_tree_when_bfs_and_dfs_then_same_nodes_each_once() {
    // Arrange
    let tree = fib_call_tree(7).unwrap();

    // Act
    let bfs: Vec<NodeId> = tree.bfs().collect();
    let dfs: Vec<NodeId> = tree.dfs_left_first().collect();
    let dfs_right: Vec<NodeId> = tree.dfs_right_first().collect();

    // Assert
    assert_eq!(bfs.len(), tree.len());
    assert_eq!(dfs.len(), tree.len());
    let bfs_set: HashSet<NodeId> = bfs.into_iter().collect();
    let dfs_set: HashSet<NodeId> = dfs.into_iter().collect();
    let dfs_right_set: HashSet<NodeId> = dfs_right.into_iter().collect();
    assert_eq!(bfs_set.len(), tree.len());
    assert_eq!(bfs_set, dfs_set);
    assert_eq!(bfs_set, dfs_right_set);
}

#[rstest]
fn given_traversal_when_called_twice_then_restarts(mixed: BinaryTree) {
    let first: Vec<NodeId> = mixed.dfs_left_first().collect();
    let second: Vec<NodeId> = mixed.dfs_left_first().collect();
    assert_eq!(first, second);

    let mut layers = mixed.bfs_layers();
    layers.next();
    assert_eq!(mixed.bfs_layers().count(), 3);
}

#[rstest]
fn given_subtree_root_when_traversing_from_it_then_only_subtree_is_visited(mixed: BinaryTree) {
    // Arrange
    let b = mixed.find_first("b").unwrap();

    // Act & Assert
    assert_eq!(labels(&mixed, mixed.bfs_from(b)), vec!["b", "d", "e"]);
    assert_eq!(labels(&mixed, mixed.dfs_right_first_from(b)), vec!["b", "e", "d"]);
    assert_eq!(mixed.bfs_layers_from(b).count(), 2);
    assert_eq!(labels(&mixed, mixed.dfs_left_first_from(b)), vec!["b", "d", "e"]);
}

#[rstest]
fn given_empty_tree_when_traversing_then_yields_nothing() {
    let tree = BinaryTree::default();

    assert_eq!(tree.bfs_layers().count(), 0);
    assert_eq!(tree.bfs().count(), 0);
    assert_eq!(tree.dfs_left_first().count(), 0);
    assert_eq!(tree.dfs_right_first().count(), 0);
    assert_eq!(tree.depth(), 0);
}

#[rstest]
fn given_foreign_start_node_when_traversing_then_yields_nothing(fib2: BinaryTree) {
    let other = fib_call_tree(6).unwrap();
    let foreign = other.bfs().last().unwrap();

    assert_eq!(fib2.bfs_from(foreign).count(), 0);
    assert_eq!(fib2.dfs_left_first_from(foreign).count(), 0);
}
