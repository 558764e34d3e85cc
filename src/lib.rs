//! Layout and traversal of binary trees and linked lists for algorithm
//! visualizations.
//!
//! The library produces plain data (positions, arrows, traversal orders) that a
//! rendering layer turns into shapes. A typical pass:
//!
//! ```
//! use treeviz::domain::{parse_tree, BinaryTreeLayout, LayoutStrategy, Spacing};
//!
//! let tree = parse_tree("f(2) { f(1), f(0) }").unwrap();
//! let layout = BinaryTreeLayout::compute(&tree, Spacing::default(), LayoutStrategy::Halving).unwrap();
//! let left = tree.left(tree.root().unwrap()).unwrap();
//! assert_eq!(layout.position(left).unwrap().x, -0.5);
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
