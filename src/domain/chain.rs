//! Horizontal layout of a linked list: one node per item, evenly spaced,
//! centered on the origin, with an arrow from each node to its successor.

use tracing::{debug, instrument};

use crate::domain::error::DomainResult;
use crate::domain::layout::{check_unit, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct ChainNode {
    pub label: String,
    pub position: Position,
}

/// Link between item `from` and item `from + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainLink {
    pub from: usize,
    pub to: usize,
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone)]
pub struct ChainLayout {
    nodes: Vec<ChainNode>,
    buff: f64,
}

impl ChainLayout {
    #[instrument(level = "debug", skip(items))]
    pub fn new<I, S>(items: I, buff: f64) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        check_unit("buff", buff)?;
        let labels: Vec<String> = items.into_iter().map(Into::into).collect();
        let mid = labels.len().saturating_sub(1) as f64 / 2.0;
        let nodes: Vec<ChainNode> = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| ChainNode {
                label,
                position: Position::new((i as f64 - mid) * buff, 0.0),
            })
            .collect();
        debug!(items = nodes.len(), "chain laid out");
        Ok(Self { nodes, buff })
    }

    pub fn buff(&self) -> f64 {
        self.buff
    }

    /// Re-spaces the chain around the origin.
    pub fn set_buff(&mut self, buff: f64) -> DomainResult<()> {
        check_unit("buff", buff)?;
        let labels: Vec<String> = self.nodes.drain(..).map(|node| node.label).collect();
        *self = Self::new(labels, buff)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[ChainNode] {
        &self.nodes
    }

    pub fn position(&self, index: usize) -> Option<Position> {
        self.nodes.get(index).map(|node| node.position)
    }

    pub fn links(&self) -> Vec<ChainLink> {
        self.nodes
            .windows(2)
            .enumerate()
            .map(|(i, pair)| ChainLink {
                from: i,
                to: i + 1,
                start: pair[0].position,
                end: pair[1].position,
            })
            .collect()
    }
}
