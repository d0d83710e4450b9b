//! Storage layer - node records in a single backing file.
//!
//! This module handles persistent storage:
//! - [`NodeLayout`] - Degree-derived record geometry
//! - [`NodeStore`] - Positioned file I/O

mod layout;
mod node_store;

pub use layout::NodeLayout;
pub use node_store::NodeStore;
