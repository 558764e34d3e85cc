//! Traversal orders over a [`BinaryTree`].
//!
//! All iterators borrow the tree immutably, are finite, and start fresh on
//! every call. Starting from an id that is not in the tree yields nothing.

use std::collections::VecDeque;

use tracing::instrument;

use crate::domain::tree::{BinaryTree, NodeId, Side};

impl BinaryTree {
    /// Breadth-first layers from the root, each ordered left to right.
    pub fn bfs_layers(&self) -> BfsLayers<'_> {
        BfsLayers::new(self, self.root())
    }

    pub fn bfs_layers_from(&self, start: NodeId) -> BfsLayers<'_> {
        BfsLayers::new(self, Some(start))
    }

    /// Breadth-first order, level by level, left to right.
    pub fn bfs(&self) -> Bfs<'_> {
        Bfs::new(self.bfs_layers())
    }

    pub fn bfs_from(&self, start: NodeId) -> Bfs<'_> {
        Bfs::new(self.bfs_layers_from(start))
    }

    /// Pre-order, left subtree before right subtree.
    pub fn dfs_left_first(&self) -> PreOrder<'_> {
        PreOrder::new(self, self.root(), Side::Left)
    }

    pub fn dfs_left_first_from(&self, start: NodeId) -> PreOrder<'_> {
        PreOrder::new(self, Some(start), Side::Left)
    }

    /// Pre-order, right subtree before left subtree.
    pub fn dfs_right_first(&self) -> PreOrder<'_> {
        PreOrder::new(self, self.root(), Side::Right)
    }

    pub fn dfs_right_first_from(&self, start: NodeId) -> PreOrder<'_> {
        PreOrder::new(self, Some(start), Side::Right)
    }
}

/// Queue-based breadth-first iterator yielding one layer at a time.
pub struct BfsLayers<'a> {
    tree: &'a BinaryTree,
    queue: VecDeque<NodeId>,
}

impl<'a> BfsLayers<'a> {
    #[instrument(level = "trace", skip(tree))]
    fn new(tree: &'a BinaryTree, start: Option<NodeId>) -> Self {
        let mut queue = VecDeque::new();
        if let Some(start) = start.filter(|&id| tree.contains(id)) {
            queue.push_back(start);
        }
        Self { tree, queue }
    }
}

impl Iterator for BfsLayers<'_> {
    type Item = Vec<NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.queue.is_empty() {
            return None;
        }
        // Everything queued now belongs to the current layer
        let width = self.queue.len();
        let mut layer = Vec::with_capacity(width);
        for _ in 0..width {
            let Some(id) = self.queue.pop_front() else {
                break;
            };
            layer.push(id);
            if let Some(node) = self.tree.get_node(id) {
                self.queue.extend(node.left);
                self.queue.extend(node.right);
            }
        }
        Some(layer)
    }
}

/// Flattened breadth-first iterator.
pub struct Bfs<'a> {
    layers: BfsLayers<'a>,
    current: std::vec::IntoIter<NodeId>,
}

impl<'a> Bfs<'a> {
    fn new(layers: BfsLayers<'a>) -> Self {
        Self {
            layers,
            current: Vec::new().into_iter(),
        }
    }
}

impl Iterator for Bfs<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.current.next() {
                return Some(id);
            }
            self.current = self.layers.next()?.into_iter();
        }
    }
}

/// Stack-based pre-order iterator; `first` is the side visited first.
pub struct PreOrder<'a> {
    tree: &'a BinaryTree,
    stack: Vec<NodeId>,
    first: Side,
}

impl<'a> PreOrder<'a> {
    #[instrument(level = "trace", skip(tree))]
    fn new(tree: &'a BinaryTree, start: Option<NodeId>, first: Side) -> Self {
        let mut stack = Vec::new();
        if let Some(start) = start.filter(|&id| tree.contains(id)) {
            stack.push(start);
        }
        Self { tree, stack, first }
    }
}

impl Iterator for PreOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        if let Some(node) = self.tree.get_node(current) {
            // Push the side visited second first so it is popped last
            let (first, second) = match self.first {
                Side::Left => (node.left, node.right),
                Side::Right => (node.right, node.left),
            };
            self.stack.extend(second);
            self.stack.extend(first);
        }
        Some(current)
    }
}
