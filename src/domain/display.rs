use termtree::Tree;
use tracing::instrument;

use crate::domain::tree::{BinaryTree, NodeId, Side};

/// Placeholder shown for a missing child whose sibling exists.
pub const EMPTY_SLOT: &str = "∅";

const EMPTY_TREE: &str = "Empty tree";

pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;

    /// Like [`to_tree_string`](Self::to_tree_string) with a custom text per node.
    fn to_tree_string_with<F>(&self, render: F) -> Tree<String>
    where
        F: Fn(NodeId) -> String;
}

impl TreeDisplay for BinaryTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        self.to_tree_string_with(|id| self.label(id).unwrap_or_default().to_string())
    }

    fn to_tree_string_with<F>(&self, render: F) -> Tree<String>
    where
        F: Fn(NodeId) -> String,
    {
        enum Visit {
            Enter(NodeId),
            Empty,
            Exit(NodeId),
        }

        let Some(root) = self.root() else {
            return Tree::new(EMPTY_TREE.to_string());
        };

        // Post-order over an explicit stack; finished subtrees wait on `done`
        // until their parent collects them
        let mut done: Vec<Tree<String>> = Vec::new();
        let mut stack = vec![Visit::Enter(root)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(id) => match self.get_node(id) {
                    Some(node) if !node.is_leaf() => {
                        stack.push(Visit::Exit(id));
                        for side in [Side::Right, Side::Left] {
                            stack.push(node.child(side).map_or(Visit::Empty, Visit::Enter));
                        }
                    }
                    _ => done.push(Tree::new(render(id))),
                },
                Visit::Empty => done.push(Tree::new(EMPTY_SLOT.to_string())),
                Visit::Exit(id) => {
                    let children = done.split_off(done.len().saturating_sub(2));
                    done.push(Tree::new(render(id)).with_leaves(children));
                }
            }
        }
        done.pop().unwrap_or_else(|| Tree::new(EMPTY_TREE.to_string()))
    }
}
