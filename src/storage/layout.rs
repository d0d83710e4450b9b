//! Node record geometry.

use crate::common::config::{FIELD_SIZE, MIN_DEGREE, NODE_HEADER_SIZE};
use crate::common::{Error, Result};

/// Degree-derived sizes for one tree's fixed-width node records.
///
/// For a tree of degree `t`, every node holds at most `2t-1` keys and `2t`
/// children, and every record is padded to full capacity so that its size
/// depends only on the leaf flag:
///
/// # Record Layout
/// ```text
/// Leaf (8 + 4·(2t-1) bytes):
/// ┌─────────┬───────────┬──────────────────────────┐
/// │ is_leaf │ key_count │ keys[0 .. 2t-1)          │
/// │  (4B)   │   (4B)    │ (4B each, zero-padded)   │
/// └─────────┴───────────┴──────────────────────────┘
///
/// Internal (8 + 4·(2t-1) + 4·2t bytes):
/// ┌─────────┬───────────┬──────────────────────────┬──────────────────────────┐
/// │ is_leaf │ key_count │ keys[0 .. 2t-1)          │ children[0 .. 2t)        │
/// │  (4B)   │   (4B)    │ (4B each, zero-padded)   │ (4B each, -1 padded)     │
/// └─────────┴───────────┴──────────────────────────┴──────────────────────────┘
/// ```
///
/// Fixed sizes make in-place rewrites always valid: a node record never
/// grows or shrinks after allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLayout {
    degree: usize,
    max_keys: usize,
    max_children: usize,
    leaf_size: usize,
    internal_size: usize,
}

impl NodeLayout {
    /// Compute the record geometry for a tree of the given degree.
    ///
    /// # Errors
    /// Returns `Error::InvalidDegree` for degrees below 2.
    pub fn new(degree: u32) -> Result<Self> {
        if degree < MIN_DEGREE {
            return Err(Error::InvalidDegree(degree));
        }

        let degree = degree as usize;
        let max_keys = 2 * degree - 1;
        let max_children = 2 * degree;
        let leaf_size = NODE_HEADER_SIZE + FIELD_SIZE * max_keys;
        let internal_size = leaf_size + FIELD_SIZE * max_children;

        Ok(Self {
            degree,
            max_keys,
            max_children,
            leaf_size,
            internal_size,
        })
    }

    /// Minimum branching parameter `t`.
    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Maximum keys per node (`2t-1`).
    #[inline]
    pub fn max_keys(&self) -> usize {
        self.max_keys
    }

    /// Maximum children per internal node (`2t`).
    #[inline]
    pub fn max_children(&self) -> usize {
        self.max_children
    }

    /// Serialized record size for a node with the given leaf flag.
    #[inline]
    pub fn record_size(&self, is_leaf: bool) -> usize {
        if is_leaf {
            self.leaf_size
        } else {
            self.internal_size
        }
    }
}
