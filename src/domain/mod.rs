//! Domain layer: tree model, construction, traversal and layout
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod chain;
pub mod display;
pub mod error;
pub mod layout;
pub mod parser;
pub mod traversal;
pub mod tree;

pub use builder::{fib_call_tree, TreeSpec, MAX_FIB_CALL_TREE};
pub use chain::{ChainLayout, ChainLink, ChainNode};
pub use display::TreeDisplay;
pub use error::{DomainError, DomainResult};
pub use layout::{Arrow, BinaryTreeLayout, BoundingBox, LayoutStrategy, Position, Spacing};
pub use parser::{parse_spec, parse_tree};
pub use traversal::{Bfs, BfsLayers, PreOrder};
pub use tree::{BinaryTree, Edge, NodeId, Side, TreeNode};
