//! Node address type.

use std::fmt;

/// Identifies a node record by its byte offset in the backing file.
///
/// Offsets are the tree's only form of node reference: a parent stores the
/// offsets of its children and the file header stores the offset of the
/// root. An offset is a lookup key into storage, never a live in-memory
/// link - loading the same offset twice produces two independent values.
///
/// `i32` matches the 4-byte signed field width of the on-disk format, and
/// `-1` is the reserved "no child" sentinel written into unused child slots.
///
/// # Example
/// ```
/// use arbordb::NodeOffset;
///
/// let offset = NodeOffset::new(4);
/// assert!(!offset.is_null());
/// assert_eq!(offset.0, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeOffset(pub i32);

impl NodeOffset {
    /// Sentinel offset meaning "no node".
    ///
    /// Used for empty child slots and for the root pointer of a store
    /// whose root has not been written yet.
    pub const NULL: NodeOffset = NodeOffset(-1);

    /// Create a new NodeOffset.
    #[inline]
    pub fn new(offset: i32) -> Self {
        NodeOffset(offset)
    }

    /// Check if this offset is the "no node" sentinel.
    #[inline]
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl fmt::Display for NodeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::NULL {
            write!(f, "Node(NULL)")
        } else {
            write!(f, "Node({})", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_offset_new() {
        let offset = NodeOffset::new(128);
        assert_eq!(offset.0, 128);
        assert!(!offset.is_null());
    }

    #[test]
    fn test_node_offset_null() {
        assert!(NodeOffset::NULL.is_null());
        assert_eq!(NodeOffset::NULL.0, -1);
    }

    #[test]
    fn test_node_offset_ordering() {
        assert!(NodeOffset::new(4) < NodeOffset::new(36));
        assert!(NodeOffset::new(100) > NodeOffset::new(68));
    }

    #[test]
    fn test_node_offset_display() {
        assert_eq!(format!("{}", NodeOffset::new(36)), "Node(36)");
        assert_eq!(format!("{}", NodeOffset::NULL), "Node(NULL)");
    }
}
