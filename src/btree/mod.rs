//! B-tree index implementation.
//!
//! - [`BTree`] - top-level open/insert/search/traverse API
//! - [`Node`] - one tree node: record codec and the recursive algorithms

mod node;
mod tree;

pub use node::Node;
pub use tree::BTree;
