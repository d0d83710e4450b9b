//! Node store - positioned file I/O for node records.
//!
//! The [`NodeStore`] handles all direct file operations:
//! - Reading and rewriting node records
//! - Allocating new records at end-of-file
//! - Maintaining the root-offset header

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::btree::Node;
use crate::common::config::{FIELD_SIZE, FILE_HEADER_SIZE};
use crate::common::{Error, NodeOffset, Result};
use crate::storage::NodeLayout;

/// Mediates all disk access for a single backing file.
///
/// # File Layout
/// ```text
/// ┌─────────────┬───────────────┬───────────────┬─────┐
/// │ root offset │ node record 0 │ node record 1 │ ... │
/// │ (4 bytes)   │ (fixed size)  │ (fixed size)  │     │
/// └─────────────┴───────────────┴───────────────┴─────┘
/// Offset:  0         4
/// ```
///
/// Records are append-allocated and rewritten in place thereafter; they are
/// never moved or reclaimed. Leaf and internal records have different (but
/// individually fixed) sizes, so the file is not uniformly strided - a
/// record is reachable only through an offset held by its parent or by the
/// header.
///
/// # Access Model
/// The store keeps no open handle: every call opens the file, performs one
/// positioned read or write, and closes it. A logical tree operation may
/// therefore open the file once per node it visits.
///
/// # Thread Safety
/// `NodeStore` is **single-threaded**. Concurrent mutation of the same
/// backing file is not supported at any layer.
///
/// # Durability
/// Writes are left to the OS page cache; there is no fsync, no write-ahead
/// log, and no multi-record atomicity. A crash between the record writes of
/// a split can leave the file inconsistent.
pub struct NodeStore {
    path: PathBuf,
    layout: NodeLayout,
}

impl NodeStore {
    /// Create a new backing file with a null root header.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P, layout: NodeLayout) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)?;

        // Reserve the header so the first appended record lands at offset 4.
        file.write_all(&NodeOffset::NULL.0.to_be_bytes())?;

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            layout,
        })
    }

    /// Open an existing backing file.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P, layout: NodeLayout) -> Result<Self> {
        // Probe once so a missing or unreadable file fails here, not on the
        // first node access.
        OpenOptions::new().read(true).write(true).open(&path)?;

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            layout,
        })
    }

    /// Open an existing backing file, or create if it doesn't exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P, layout: NodeLayout) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path, layout)
        } else {
            Self::create(path, layout)
        }
    }

    /// Record geometry for this store's degree.
    #[inline]
    pub fn layout(&self) -> &NodeLayout {
        &self.layout
    }

    /// Read the root offset from the file header.
    pub fn read_root(&self) -> Result<NodeOffset> {
        let mut file = self.open_file()?;

        let mut raw = [0u8; FILE_HEADER_SIZE];
        file.seek(SeekFrom::Start(0))?;
        file.read_exact(&mut raw)?;

        Ok(NodeOffset::new(i32::from_be_bytes(raw)))
    }

    /// Write the root offset into the file header.
    pub fn write_root(&self, root: NodeOffset) -> Result<()> {
        let mut file = self.open_file()?;

        file.seek(SeekFrom::Start(0))?;
        file.write_all(&root.0.to_be_bytes())?;

        Ok(())
    }

    /// Read the node record at `offset`.
    ///
    /// Returns `Ok(None)` for the null sentinel or an empty store.
    ///
    /// # Errors
    /// Returns `Error::NodeNotFound` if the record lies outside the file and
    /// `Error::CorruptNode` if it does not parse as a node.
    pub fn read_node(&self, offset: NodeOffset) -> Result<Option<Node>> {
        if offset.is_null() {
            return Ok(None);
        }

        let mut file = self.open_file()?;
        let file_len = file.metadata()?.len();
        if file_len == 0 {
            return Ok(None);
        }

        if offset.0 < 0 || offset.0 as u64 >= file_len {
            return Err(Error::NodeNotFound(offset));
        }

        // The leaf flag comes first and determines the record size, so read
        // it before sizing the body.
        file.seek(SeekFrom::Start(offset.0 as u64))?;
        let mut raw = [0u8; FIELD_SIZE];
        file.read_exact(&mut raw)?;
        let is_leaf = match i32::from_be_bytes(raw) {
            1 => true,
            0 => false,
            _ => return Err(Error::CorruptNode(offset)),
        };

        let record_size = self.layout.record_size(is_leaf) as u64;
        if offset.0 as u64 + record_size > file_len {
            return Err(Error::NodeNotFound(offset));
        }

        let mut body = vec![0u8; self.layout.record_size(is_leaf) - FIELD_SIZE];
        file.read_exact(&mut body)?;

        Node::decode(offset, is_leaf, &body, &self.layout).map(Some)
    }

    /// Overwrite the record at `node.offset()` with the node's current
    /// contents.
    ///
    /// # Errors
    /// Returns `Error::NodeNotFound` if the node's record was never
    /// allocated within the file.
    pub fn write_node(&self, node: &Node) -> Result<()> {
        let offset = node.offset();
        let record_size = self.layout.record_size(node.is_leaf()) as u64;

        let mut file = self.open_file()?;
        let file_len = file.metadata()?.len();
        if offset.0 < 0 || offset.0 as u64 + record_size > file_len {
            return Err(Error::NodeNotFound(offset));
        }

        file.seek(SeekFrom::Start(offset.0 as u64))?;
        file.write_all(&node.encode(&self.layout))?;

        Ok(())
    }

    /// Allocate a record for `node` at end-of-file and persist it.
    ///
    /// Sets `node`'s offset to the newly allocated position. Records are
    /// never reclaimed, so allocation is a pure append.
    ///
    /// # Errors
    /// Returns `Error::StoreFull` once offsets would no longer fit in the
    /// 4-byte signed field the format stores them in.
    pub fn append_node(&self, node: &mut Node) -> Result<()> {
        let mut file = self.open_file()?;
        let file_len = file.metadata()?.len();
        if file_len > i32::MAX as u64 {
            return Err(Error::StoreFull);
        }

        node.set_offset(NodeOffset::new(file_len as i32));

        file.seek(SeekFrom::Start(file_len))?;
        file.write_all(&node.encode(&self.layout))?;

        Ok(())
    }

    fn open_file(&self) -> Result<File> {
        Ok(OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn layout() -> NodeLayout {
        NodeLayout::new(2).unwrap()
    }

    #[test]
    fn test_create_writes_null_root_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let store = NodeStore::create(&path, layout()).unwrap();
        assert!(store.read_root().unwrap().is_null());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 4);
    }

    #[test]
    fn test_create_existing_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        NodeStore::create(&path, layout()).unwrap();
        assert!(NodeStore::create(&path, layout()).is_err());
    }

    #[test]
    fn test_open_nonexistent_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent.db");

        assert!(NodeStore::open(&path, layout()).is_err());
    }

    #[test]
    fn test_root_header_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let store = NodeStore::create(&path, layout()).unwrap();
        store.write_root(NodeOffset::new(36)).unwrap();
        assert_eq!(store.read_root().unwrap(), NodeOffset::new(36));
    }

    #[test]
    fn test_append_then_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let store = NodeStore::create(&path, layout()).unwrap();

        let mut node = Node::new_leaf();
        node.keys.extend([10, 20]);
        store.append_node(&mut node).unwrap();

        // First record lands right after the header.
        assert_eq!(node.offset(), NodeOffset::new(4));

        let loaded = store.read_node(node.offset()).unwrap().unwrap();
        assert_eq!(loaded, node);
    }

    #[test]
    fn test_write_node_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let store = NodeStore::create(&path, layout()).unwrap();

        let mut node = Node::new_leaf();
        node.keys.push(10);
        store.append_node(&mut node).unwrap();

        node.keys.push(20);
        store.write_node(&node).unwrap();

        let loaded = store.read_node(node.offset()).unwrap().unwrap();
        assert_eq!(loaded.keys(), &[10, 20]);
    }

    #[test]
    fn test_read_null_offset_is_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let store = NodeStore::create(&path, layout()).unwrap();

        assert!(store.read_node(NodeOffset::NULL).unwrap().is_none());
    }

    #[test]
    fn test_read_empty_store_is_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        // A zero-length file left behind by an external collaborator.
        std::fs::File::create(&path).unwrap();
        let store = NodeStore::open(&path, layout()).unwrap();

        assert!(store.read_node(NodeOffset::new(4)).unwrap().is_none());
    }

    #[test]
    fn test_read_past_end_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let store = NodeStore::create(&path, layout()).unwrap();

        let result = store.read_node(NodeOffset::new(400));
        assert!(matches!(result, Err(Error::NodeNotFound(_))));
    }

    #[test]
    fn test_write_unallocated_node_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let store = NodeStore::create(&path, layout()).unwrap();

        let node = Node::new_leaf();
        assert!(matches!(
            store.write_node(&node),
            Err(Error::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_read_bad_leaf_flag_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let store = NodeStore::create(&path, layout()).unwrap();

        let mut node = Node::new_leaf();
        store.append_node(&mut node).unwrap();

        // Stamp garbage over the leaf flag.
        let mut file = OpenOptions::new().write(true).open(&path).unwrap();
        file.seek(SeekFrom::Start(4)).unwrap();
        file.write_all(&7i32.to_be_bytes()).unwrap();
        drop(file);

        let result = store.read_node(node.offset());
        assert!(matches!(result, Err(Error::CorruptNode(_))));
    }

    #[test]
    fn test_records_persist_across_store_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let offset;
        {
            let store = NodeStore::create(&path, layout()).unwrap();
            let mut node = Node::new_leaf();
            node.keys.extend([1, 2, 3]);
            store.append_node(&mut node).unwrap();
            store.write_root(node.offset()).unwrap();
            offset = node.offset();
        }

        {
            let store = NodeStore::open(&path, layout()).unwrap();
            assert_eq!(store.read_root().unwrap(), offset);

            let loaded = store.read_node(offset).unwrap().unwrap();
            assert_eq!(loaded.keys(), &[1, 2, 3]);
        }
    }

    #[test]
    fn test_mixed_record_sizes_append_densely() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let store = NodeStore::create(&path, layout()).unwrap();

        let mut leaf = Node::new_leaf();
        store.append_node(&mut leaf).unwrap();
        assert_eq!(leaf.offset(), NodeOffset::new(4));

        // Leaf record is 20 bytes at degree 2, so the next record starts
        // at 24 regardless of its own kind.
        let mut internal = Node::new_internal();
        internal.children.push(leaf.offset());
        store.append_node(&mut internal).unwrap();
        assert_eq!(internal.offset(), NodeOffset::new(24));

        let mut second_leaf = Node::new_leaf();
        store.append_node(&mut second_leaf).unwrap();
        assert_eq!(second_leaf.offset(), NodeOffset::new(24 + 36));
    }
}
