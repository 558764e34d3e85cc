use std::collections::HashSet;
use std::fmt;

use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};

/// Stable identity of a node inside one [`BinaryTree`].
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{}.{}", slot, generation)
    }
}

/// Which child slot of the parent a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Horizontal direction of this side: -1 for left, +1 for right.
    pub fn sign(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Logical tree node. Structure is fixed once the node is attached.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Application-defined label, not unique across the tree
    pub label: String,
    /// Parent node, None for the root
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl TreeNode {
    fn new(label: String, parent: Option<NodeId>) -> Self {
        Self {
            label,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Directed parent -> child relation derived from the tree shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub parent: NodeId,
    pub child: NodeId,
    pub side: Side,
}

/// Arena-backed binary tree.
///
/// Nodes are only ever added below a free child slot, so the structure is a
/// strict tree: no shared children and no cycles. An empty tree (no root) is
/// the "null root" case; traversals over it yield nothing.
#[derive(Debug, Clone, Default)]
pub struct BinaryTree {
    arena: Arena<TreeNode>,
    root: Option<NodeId>,
}

impl BinaryTree {
    /// Creates a tree consisting of a single root node.
    pub fn new(label: impl Into<String>) -> Self {
        let mut tree = Self::default();
        let idx = tree.arena.insert(TreeNode::new(label.into(), None));
        tree.root = Some(NodeId(idx));
        tree
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.arena.get(id.0)
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.get_node(id).map(|node| node.label.as_str())
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(|node| node.left)
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(|node| node.right)
    }

    pub fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        self.get_node(id).and_then(|node| node.child(side))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(|node| node.parent)
    }

    pub fn insert_left(&mut self, parent: NodeId, label: impl Into<String>) -> DomainResult<NodeId> {
        self.insert_child(parent, Side::Left, label)
    }

    pub fn insert_right(&mut self, parent: NodeId, label: impl Into<String>) -> DomainResult<NodeId> {
        self.insert_child(parent, Side::Right, label)
    }

    /// Attaches a new node in the free `side` slot of `parent`.
    #[instrument(level = "trace", skip(self, label))]
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        side: Side,
        label: impl Into<String>,
    ) -> DomainResult<NodeId> {
        let occupied = self
            .get_node(parent)
            .ok_or_else(|| DomainError::invalid(format!("unknown parent node {}", parent)))?
            .child(side)
            .is_some();
        if occupied {
            return Err(DomainError::invalid(format!(
                "{} child of node {} is already set",
                side, parent
            )));
        }

        let child = NodeId(
            self.arena
                .insert(TreeNode::new(label.into(), Some(parent))),
        );
        if let Some(node) = self.arena.get_mut(parent.0) {
            match side {
                Side::Left => node.left = Some(child),
                Side::Right => node.right = Some(child),
            }
        }
        Ok(child)
    }

    /// Number of levels, counted with a full breadth-first sweep.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.bfs_layers().count()
    }

    /// Distance from the root, the root being at depth 0.
    pub fn depth_of(&self, id: NodeId) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        Some(depth)
    }

    /// Leaf nodes in left-first pre-order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.dfs_left_first()
            .filter(|&id| self.get_node(id).is_some_and(TreeNode::is_leaf))
            .collect()
    }

    /// One edge per parent -> child relation, parents in breadth-first order,
    /// left edge before right edge.
    #[instrument(level = "debug", skip(self))]
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.len().saturating_sub(1));
        for parent in self.bfs() {
            let Some(node) = self.get_node(parent) else {
                continue;
            };
            for side in [Side::Left, Side::Right] {
                if let Some(child) = node.child(side) {
                    edges.push(Edge {
                        parent,
                        child,
                        side,
                    });
                }
            }
        }
        edges
    }

    /// All nodes carrying `label`, in left-first pre-order.
    pub fn find_all(&self, label: &str) -> Vec<NodeId> {
        self.dfs_left_first()
            .filter(|&id| self.label(id) == Some(label))
            .collect()
    }

    pub fn find_first(&self, label: &str) -> Option<NodeId> {
        self.dfs_left_first().find(|&id| self.label(id) == Some(label))
    }

    /// Nodes whose label was already visited earlier in left-first pre-order,
    /// i.e. the calls a memoized recursion would answer from its cache.
    #[instrument(level = "debug", skip(self))]
    pub fn repeated_subproblems(&self) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let repeats: Vec<NodeId> = self
            .dfs_left_first()
            .filter(|&id| {
                self.label(id)
                    .is_some_and(|label| !seen.insert(label.to_string()))
            })
            .collect();
        debug!(count = repeats.len(), "repeated subproblems");
        repeats
    }
}
