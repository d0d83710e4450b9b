//! Error types for arbordb.

use thiserror::Error;

use crate::common::NodeOffset;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in arbordb.
///
/// An absent key is not an error: `search` reports it as `Ok(None)`.
/// Capacity violations (a node exceeding its maximum key count) are
/// prevented structurally by the split protocol and have no variant here.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested degree cannot form a valid B-tree.
    #[error("invalid degree {0}: must be at least 2")]
    InvalidDegree(u32),

    /// The record at this offset lies outside the backing file.
    #[error("no node record at {0}")]
    NodeNotFound(NodeOffset),

    /// The record at this offset does not parse as a node.
    ///
    /// Raised for an unrecognized leaf flag, an out-of-range key count,
    /// or a null child offset where a child must exist.
    #[error("corrupt node record at {0}")]
    CorruptNode(NodeOffset),

    /// Appending another record would push its offset past the `i32`
    /// range the file format can address.
    #[error("backing file is full: record offsets are limited to {} bytes", i32::MAX)]
    StoreFull,
}
