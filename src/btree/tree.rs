//! Top-level B-tree API.

use std::path::Path;

use crate::btree::Node;
use crate::common::{Error, NodeOffset, Result};
use crate::storage::{NodeLayout, NodeStore};

/// A B-tree over `i32` keys, stored in a single backing file.
///
/// The tree owns its [`NodeStore`] and is the sole mutator of the backing
/// file for its lifetime. It caches nothing across calls: each operation
/// re-reads the root offset from the file header and every node it visits
/// from disk, so all state lives in the file.
///
/// Insertion is single-pass top-down: a full child is split before the
/// descent enters it, which guarantees the recursion only ever inserts
/// into non-full nodes and the tree grows by at most one level (at the
/// root) per insert.
///
/// # Example
/// ```no_run
/// use arbordb::BTree;
///
/// let mut tree = BTree::open("index.db", 2).unwrap();
/// tree.insert(10).unwrap();
/// tree.insert(20).unwrap();
///
/// let node = tree.search(10).unwrap().expect("inserted above");
/// assert!(node.contains(10));
/// ```
pub struct BTree {
    store: NodeStore,
}

impl BTree {
    /// Open the tree at `path`, creating it if the file is absent.
    ///
    /// A fresh file gets an empty leaf root (the first record, at offset 4)
    /// and a header pointing at it. An existing file has its header read
    /// and its root record loaded as validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidDegree` for degrees below 2, and an I/O or
    /// corruption error for unreadable storage. Reopening a file with a
    /// different degree than it was built with is undetectable (the format
    /// stores no degree) and misreads records.
    pub fn open<P: AsRef<Path>>(path: P, degree: u32) -> Result<Self> {
        let layout = NodeLayout::new(degree)?;

        if path.as_ref().exists() {
            let store = NodeStore::open(path, layout)?;
            let tree = Self { store };
            tree.load_root()?;
            Ok(tree)
        } else {
            let store = NodeStore::create(path, layout)?;
            let mut root = Node::new_leaf();
            store.append_node(&mut root)?;
            store.write_root(root.offset())?;
            Ok(Self { store })
        }
    }

    /// Insert `key` into the tree.
    ///
    /// When the root is full, a new internal root is allocated over it and
    /// the old root is split about index 0 before the non-full insertion
    /// runs; this is the only way the tree gains height. Duplicate keys are
    /// kept.
    pub fn insert(&mut self, key: i32) -> Result<()> {
        let mut root = self.load_root()?;

        if root.is_full(self.store.layout()) {
            let mut new_root = Node::new_internal();
            new_root.children.push(root.offset());
            self.store.append_node(&mut new_root)?;
            self.store.write_root(new_root.offset())?;

            new_root.split_child(0, &mut root, &self.store)?;
            new_root.insert_non_full(key, &self.store)
        } else {
            root.insert_non_full(key, &self.store)
        }
    }

    /// Look up `key`, returning the node that holds it.
    ///
    /// An absent key is a normal result, not an error.
    pub fn search(&self, key: i32) -> Result<Option<Node>> {
        self.load_root()?.search(key, &self.store)
    }

    /// Visit every key in the tree in ascending order.
    pub fn traverse<F: FnMut(i32)>(&self, mut visit: F) -> Result<()> {
        self.load_root()?.for_each_key(&self.store, &mut visit)
    }

    /// Collect every key in the tree in ascending order.
    pub fn keys(&self) -> Result<Vec<i32>> {
        let mut keys = Vec::new();
        self.traverse(|key| keys.push(key))?;
        Ok(keys)
    }

    /// Read the node record at `offset`; `None` for the null sentinel.
    pub fn load_node(&self, offset: NodeOffset) -> Result<Option<Node>> {
        self.store.read_node(offset)
    }

    /// Offset of the current root record, per the file header.
    pub fn root_offset(&self) -> Result<NodeOffset> {
        self.store.read_root()
    }

    /// Record geometry for this tree's degree.
    pub fn layout(&self) -> &NodeLayout {
        self.store.layout()
    }

    fn load_root(&self) -> Result<Node> {
        let offset = self.store.read_root()?;
        self.store
            .read_node(offset)?
            .ok_or(Error::CorruptNode(offset))
    }
}
