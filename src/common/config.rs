//! Serialization constants for arbordb.

/// Width in bytes of every serialized field.
///
/// The on-disk format is uniformly fixed-width: leaf flags, key counts,
/// keys, and child offsets are all 4-byte big-endian signed integers
/// (`i32`). Record sizes are therefore fully determined by the tree's
/// degree - there is no variable-length encoding anywhere in the file.
pub const FIELD_SIZE: usize = 4;

/// Size of the file header: one field holding the root node's offset.
///
/// The header lives at byte 0 and is rewritten whenever a root split
/// installs a new root.
pub const FILE_HEADER_SIZE: usize = FIELD_SIZE;

/// Size of a node record's header: the leaf flag followed by the key count.
pub const NODE_HEADER_SIZE: usize = 2 * FIELD_SIZE;

/// Smallest degree that forms a valid B-tree.
///
/// A degree-1 node would hold at most one key and could never be split
/// about a median.
pub const MIN_DEGREE: u32 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_sizes() {
        assert_eq!(FILE_HEADER_SIZE, 4);
        assert_eq!(NODE_HEADER_SIZE, 8);
    }

    #[test]
    fn test_field_width_matches_i32() {
        assert_eq!(FIELD_SIZE, std::mem::size_of::<i32>());
    }
}
