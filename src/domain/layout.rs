//! Top-down positioning of a [`BinaryTree`].
//!
//! Positions are kept in a side table owned by [`BinaryTreeLayout`]; the tree
//! itself stays pure data. The root sits at the origin and each level is placed
//! `vbuff` below the previous one (y grows upwards, so children have smaller y).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::{BinaryTree, NodeId, Side};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Horizontal and vertical spacing units of a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    hbuff: f64,
    vbuff: f64,
}

impl Spacing {
    /// Both units must be finite and strictly positive.
    pub fn new(hbuff: f64, vbuff: f64) -> DomainResult<Self> {
        check_unit("hbuff", hbuff)?;
        check_unit("vbuff", vbuff)?;
        Ok(Self { hbuff, vbuff })
    }

    pub fn hbuff(&self) -> f64 {
        self.hbuff
    }

    pub fn vbuff(&self) -> f64 {
        self.vbuff
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            hbuff: 1.0,
            vbuff: 1.0,
        }
    }
}

pub(crate) fn check_unit(name: &str, value: f64) -> DomainResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DomainError::invalid(format!(
            "{} must be a positive number, got {}",
            name, value
        )))
    }
}

/// How horizontal space is distributed among subtrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStrategy {
    /// The root subtree gets `2^(depth-1)` units and every level halves the
    /// allotment. Unbalanced subtrees leave their unused half empty.
    #[default]
    Halving,
    /// Leaves take consecutive slots and parents are centered over their
    /// children. A missing sibling reserves one slot so sides stay visible.
    Compact,
}

impl fmt::Display for LayoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutStrategy::Halving => write!(f, "halving"),
            LayoutStrategy::Compact => write!(f, "compact"),
        }
    }
}

/// An edge resolved against the positions of the latest layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub parent: NodeId,
    pub child: NodeId,
    pub side: Side,
    pub from: Position,
    pub to: Position,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Position,
    pub max: Position,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}

/// Layout pass over one tree.
///
/// Created unlaid; [`layout`](Self::layout) assigns every node a position.
/// Changing the spacing or the strategy reruns the whole pass.
#[derive(Debug, Clone)]
pub struct BinaryTreeLayout<'t> {
    tree: &'t BinaryTree,
    spacing: Spacing,
    strategy: LayoutStrategy,
    positions: HashMap<NodeId, Position>,
    laid_out: bool,
}

impl<'t> BinaryTreeLayout<'t> {
    pub fn new(tree: &'t BinaryTree, spacing: Spacing) -> Self {
        Self {
            tree,
            spacing,
            strategy: LayoutStrategy::default(),
            positions: HashMap::new(),
            laid_out: false,
        }
    }

    pub fn with_strategy(mut self, strategy: LayoutStrategy) -> Self {
        self.strategy = strategy;
        self.laid_out = false;
        self
    }

    /// Creates the layout and runs the first pass.
    pub fn compute(
        tree: &'t BinaryTree,
        spacing: Spacing,
        strategy: LayoutStrategy,
    ) -> DomainResult<Self> {
        let mut layout = Self::new(tree, spacing).with_strategy(strategy);
        layout.layout()?;
        Ok(layout)
    }

    pub fn tree(&self) -> &'t BinaryTree {
        self.tree
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    pub fn strategy(&self) -> LayoutStrategy {
        self.strategy
    }

    pub fn is_laid_out(&self) -> bool {
        self.laid_out
    }

    /// Width allotted to the root subtree by the halving strategy, in units of `hbuff`.
    pub fn breadth(&self) -> f64 {
        halving_breadth(self.tree.depth())
    }

    /// Assigns a position to every node, overwriting any previous pass.
    #[instrument(level = "debug", skip(self), fields(strategy = %self.strategy))]
    pub fn layout(&mut self) -> DomainResult<()> {
        let root = self
            .tree
            .root()
            .ok_or_else(|| DomainError::invalid("cannot lay out an empty tree"))?;

        let positions = match self.strategy {
            LayoutStrategy::Halving => self.place_halving(root)?,
            LayoutStrategy::Compact => self.place_compact(root)?,
        };
        debug!(
            nodes = positions.len(),
            hbuff = self.spacing.hbuff,
            vbuff = self.spacing.vbuff,
            "layout complete"
        );

        self.positions = positions;
        self.laid_out = true;
        Ok(())
    }

    pub fn set_hbuff(&mut self, hbuff: f64) -> DomainResult<()> {
        self.set_spacing(Spacing::new(hbuff, self.spacing.vbuff)?)
    }

    pub fn set_vbuff(&mut self, vbuff: f64) -> DomainResult<()> {
        self.set_spacing(Spacing::new(self.spacing.hbuff, vbuff)?)
    }

    /// Replaces the spacing and reflows the tree. On failure the previous
    /// spacing and positions are kept.
    pub fn set_spacing(&mut self, spacing: Spacing) -> DomainResult<()> {
        let previous = std::mem::replace(&mut self.spacing, spacing);
        if let Err(e) = self.layout() {
            self.spacing = previous;
            return Err(e);
        }
        Ok(())
    }

    pub fn set_strategy(&mut self, strategy: LayoutStrategy) -> DomainResult<()> {
        let previous = std::mem::replace(&mut self.strategy, strategy);
        if let Err(e) = self.layout() {
            self.strategy = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Current position of `id`.
    pub fn position(&self, id: NodeId) -> DomainResult<Position> {
        if !self.laid_out {
            return Err(DomainError::NotLaidOut(id));
        }
        if !self.tree.contains(id) {
            return Err(DomainError::invalid(format!("unknown node {}", id)));
        }
        self.positions
            .get(&id)
            .copied()
            .ok_or(DomainError::NotLaidOut(id))
    }

    /// All positions in breadth-first order.
    pub fn positions(&self) -> DomainResult<Vec<(NodeId, Position)>> {
        self.tree
            .bfs()
            .map(|id| self.position(id).map(|pos| (id, pos)))
            .collect()
    }

    /// Tree edges with the endpoints each node holds right now.
    pub fn arrows(&self) -> DomainResult<Vec<Arrow>> {
        self.tree
            .edges()
            .into_iter()
            .map(|edge| -> DomainResult<Arrow> {
                Ok(Arrow {
                    parent: edge.parent,
                    child: edge.child,
                    side: edge.side,
                    from: self.position(edge.parent)?,
                    to: self.position(edge.child)?,
                })
            })
            .collect()
    }

    pub fn bounding_box(&self) -> DomainResult<BoundingBox> {
        let positions = self.positions()?;
        let (first, rest) = positions
            .split_first()
            .ok_or_else(|| DomainError::invalid("cannot bound an empty tree"))?;
        let init = BoundingBox {
            min: first.1,
            max: first.1,
        };
        Ok(rest.iter().fold(init, |bbox, (_, pos)| BoundingBox {
            min: Position::new(bbox.min.x.min(pos.x), bbox.min.y.min(pos.y)),
            max: Position::new(bbox.max.x.max(pos.x), bbox.max.y.max(pos.y)),
        }))
    }

    /// Positions shifted so the bounding box is centered on the origin.
    pub fn centered(&self) -> DomainResult<Vec<(NodeId, Position)>> {
        let center = self.bounding_box()?.center();
        Ok(self
            .positions()?
            .into_iter()
            .map(|(id, pos)| (id, pos.translate(-center.x, -center.y)))
            .collect())
    }

    fn level_y(&self, level: usize) -> f64 {
        0.0 - level as f64 * self.spacing.vbuff
    }

    #[instrument(level = "trace", skip(self))]
    fn place_halving(&self, root: NodeId) -> DomainResult<HashMap<NodeId, Position>> {
        let breadth = self.breadth();
        if !breadth.is_finite() {
            return Err(DomainError::invalid(
                "tree is too deep for the halving strategy, use compact",
            ));
        }

        let hbuff = self.spacing.hbuff;
        let mut positions = HashMap::with_capacity(self.tree.len());
        let mut stack = vec![(root, Position::ORIGIN, breadth, 0usize)];

        while let Some((id, pos, width, level)) = stack.pop() {
            positions.insert(id, pos);
            let Some(node) = self.tree.get_node(id) else {
                continue;
            };
            let child_width = width / 2.0;
            for side in [Side::Left, Side::Right] {
                if let Some(child) = node.child(side) {
                    let offset = side.sign() * child_width / 2.0 * hbuff;
                    let child_pos = Position::new(pos.x + offset, self.level_y(level + 1));
                    stack.push((child, child_pos, child_width, level + 1));
                }
            }
        }
        Ok(positions)
    }

    #[instrument(level = "trace", skip(self))]
    fn place_compact(&self, root: NodeId) -> DomainResult<HashMap<NodeId, Position>> {
        enum Visit {
            Enter(NodeId),
            Exit(NodeId),
        }

        // First pass: horizontal slot of every node, bottom-up
        let mut slots: HashMap<NodeId, f64> = HashMap::with_capacity(self.tree.len());
        let mut phantoms: HashMap<NodeId, f64> = HashMap::new();
        let mut next_slot = 0.0;
        let mut stack = vec![Visit::Enter(root)];

        let slot_of = |slots: &HashMap<NodeId, f64>, id: NodeId| {
            slots
                .get(&id)
                .copied()
                .ok_or_else(|| DomainError::invalid(format!("node {} has no slot", id)))
        };

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(id) => {
                    let Some(node) = self.tree.get_node(id) else {
                        continue;
                    };
                    if node.is_leaf() {
                        slots.insert(id, next_slot);
                        next_slot += 1.0;
                        continue;
                    }
                    if node.left.is_none() {
                        phantoms.insert(id, next_slot);
                        next_slot += 1.0;
                    }
                    stack.push(Visit::Exit(id));
                    stack.extend(node.right.map(Visit::Enter));
                    stack.extend(node.left.map(Visit::Enter));
                }
                Visit::Exit(id) => {
                    let Some(node) = self.tree.get_node(id) else {
                        continue;
                    };
                    let left = match node.left {
                        Some(child) => slot_of(&slots, child)?,
                        None => slot_of(&phantoms, id)?,
                    };
                    let right = match node.right {
                        Some(child) => slot_of(&slots, child)?,
                        None => {
                            let phantom = next_slot;
                            next_slot += 1.0;
                            phantom
                        }
                    };
                    slots.insert(id, (left + right) / 2.0);
                }
            }
        }

        // Second pass: top-down, root at x = 0
        let root_slot = slot_of(&slots, root)?;
        let mut positions = HashMap::with_capacity(slots.len());
        for (level, layer) in self.tree.bfs_layers().enumerate() {
            for id in layer {
                let x = (slot_of(&slots, id)? - root_slot) * self.spacing.hbuff;
                positions.insert(id, Position::new(x, self.level_y(level)));
            }
        }
        Ok(positions)
    }
}

/// `2^(depth-1)`, or 0 for an empty tree.
pub fn halving_breadth(depth: usize) -> f64 {
    match depth {
        0 => 0.0,
        d => {
            let exponent = i32::try_from(d - 1).unwrap_or(i32::MAX);
            2f64.powi(exponent)
        }
    }
}
