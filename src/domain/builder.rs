use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::{BinaryTree, NodeId, Side};

/// Largest `n` accepted by [`fib_call_tree`]; f(20) already has 21891 calls.
pub const MAX_FIB_CALL_TREE: u32 = 20;

/// Nested, serializable description of a tree.
///
/// ```toml
/// label = "f(2)"
///
/// [left]
/// label = "f(1)"
///
/// [right]
/// label = "f(0)"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSpec {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<TreeSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<TreeSpec>>,
}

impl TreeSpec {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            left: None,
            right: None,
        }
    }

    pub fn with_left(mut self, child: TreeSpec) -> Self {
        self.left = Some(Box::new(child));
        self
    }

    pub fn with_right(mut self, child: TreeSpec) -> Self {
        self.right = Some(Box::new(child));
        self
    }

    fn child(&self, side: Side) -> Option<&TreeSpec> {
        match side {
            Side::Left => self.left.as_deref(),
            Side::Right => self.right.as_deref(),
        }
    }

    pub fn from_toml(input: &str) -> DomainResult<Self> {
        toml::from_str(input).map_err(|e| {
            let offset = e.span().map(|span| span.start).unwrap_or(0);
            DomainError::parse(offset, e.message())
        })
    }

    pub fn to_toml(&self) -> DomainResult<String> {
        toml::to_string(self).map_err(|e| DomainError::invalid(e.to_string()))
    }

    /// Materializes the description into an arena tree.
    #[instrument(level = "debug", skip(self), fields(root = %self.label))]
    pub fn build(&self) -> DomainResult<BinaryTree> {
        let mut tree = BinaryTree::new(self.label.clone());
        let root = tree
            .root()
            .ok_or_else(|| DomainError::invalid("tree has no root"))?;
        let mut stack: Vec<(&TreeSpec, NodeId)> = vec![(self, root)];

        while let Some((spec, id)) = stack.pop() {
            for side in [Side::Left, Side::Right] {
                if let Some(child) = spec.child(side) {
                    let child_id = tree.insert_child(id, side, child.label.clone())?;
                    stack.push((child, child_id));
                }
            }
        }
        debug!(nodes = tree.len(), "built tree from description");
        Ok(tree)
    }
}

/// Children are released one level at a time so dropping a deep description
/// does not recurse through every `Box`.
impl Drop for TreeSpec {
    fn drop(&mut self) {
        let mut pending: Vec<Box<TreeSpec>> = Vec::new();
        pending.extend(self.left.take());
        pending.extend(self.right.take());
        while let Some(mut spec) = pending.pop() {
            pending.extend(spec.left.take());
            pending.extend(spec.right.take());
        }
    }
}

impl BinaryTree {
    /// Nested description of the tree, None for an empty tree.
    ///
    /// Built bottom-up in reverse breadth-first order, so every child is
    /// finished before its parent is assembled.
    pub fn to_spec(&self) -> Option<TreeSpec> {
        let root = self.root()?;
        let order: Vec<NodeId> = self.bfs().collect();
        let mut built: HashMap<NodeId, TreeSpec> = HashMap::with_capacity(order.len());

        for &id in order.iter().rev() {
            let node = self.get_node(id)?;
            let mut take = |child: Option<NodeId>| {
                child.and_then(|c| built.remove(&c)).map(Box::new)
            };
            let spec = TreeSpec {
                label: node.label.clone(),
                left: take(node.left),
                right: take(node.right),
            };
            built.insert(id, spec);
        }
        built.remove(&root)
    }
}

/// Call tree of the naive recursive Fibonacci: `f(n)` calls `f(n-1)` on the
/// left and `f(n-2)` on the right; `f(1)` and `f(0)` are leaves.
#[instrument(level = "debug")]
pub fn fib_call_tree(n: u32) -> DomainResult<BinaryTree> {
    if n > MAX_FIB_CALL_TREE {
        return Err(DomainError::invalid(format!(
            "fibonacci call tree is limited to n <= {}, got {}",
            MAX_FIB_CALL_TREE, n
        )));
    }

    let mut tree = BinaryTree::new(fib_label(n));
    let root = tree
        .root()
        .ok_or_else(|| DomainError::invalid("tree has no root"))?;
    let mut stack = vec![(root, n)];

    while let Some((id, k)) = stack.pop() {
        if k <= 1 {
            continue;
        }
        let left = tree.insert_left(id, fib_label(k - 1))?;
        let right = tree.insert_right(id, fib_label(k - 2))?;
        stack.push((left, k - 1));
        stack.push((right, k - 2));
    }
    debug!(nodes = tree.len(), "built fibonacci call tree");
    Ok(tree)
}

pub fn fib_label(n: u32) -> String {
    format!("f({})", n)
}
