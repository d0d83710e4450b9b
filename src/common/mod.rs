//! Common types and utilities shared across arbordb.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Serialization constants
//! - Error types
//! - The node address type ([`NodeOffset`])

pub mod config;
pub mod error;
mod node_offset;

pub use error::{Error, Result};
pub use node_offset::NodeOffset;
