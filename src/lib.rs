//! arbordb - a disk-resident B-tree stored in a single backing file.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 B-tree Layer (btree/)               │
//! │     BTree: open / insert / search / traverse        │
//! │     Node: split_child + non-full insertion          │
//! └─────────────────────────────────────────────────────┘
//!                           ↓
//! ┌─────────────────────────────────────────────────────┐
//! │               Storage Layer (storage/)              │
//! │     NodeStore: positioned read/write/append         │
//! │     NodeLayout: degree-derived record sizes         │
//! └─────────────────────────────────────────────────────┘
//!                           ↓
//! ┌─────────────────────────────────────────────────────┐
//! │                    Backing File                     │
//! │   [root offset (4B)][node record][node record]...   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Nodes are serialized as fixed-size records of 4-byte big-endian signed
//! integers. A node's byte offset in the file is its identity: parents store
//! child offsets, and the 4-byte file header stores the root's offset. Every
//! operation re-reads the nodes it visits from disk; there is no cross-call
//! node cache.
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeOffset, Error, config)
//! - [`storage`] - Record layout and file I/O
//! - [`btree`] - The tree itself
//!
//! # Quick Start
//! ```no_run
//! use arbordb::BTree;
//!
//! // Creates the file with an empty root on first open.
//! let mut tree = BTree::open("index.db", 2).unwrap();
//!
//! tree.insert(42).unwrap();
//! assert!(tree.search(42).unwrap().is_some());
//!
//! // Keys come back in ascending order.
//! tree.traverse(|key| println!("{key}")).unwrap();
//! ```

pub mod btree;
pub mod common;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use btree::{BTree, Node};
pub use common::{Error, NodeOffset, Result};
pub use storage::{NodeLayout, NodeStore};
