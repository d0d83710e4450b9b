//! B-tree node: record format and the recursive search/insert algorithms.

use std::fmt;

use crate::common::config::FIELD_SIZE;
use crate::common::{Error, NodeOffset, Result};
use crate::storage::{NodeLayout, NodeStore};

/// One B-tree node, loaded from (or destined for) a fixed-size record.
///
/// A `Node` is an owned, transient value. Loading the same offset twice
/// yields two independent copies, and a mutation becomes visible to later
/// loads only once the node is written back through the store - node
/// operations therefore persist every record they touch before returning.
///
/// In memory, `keys` holds exactly the live keys (its length is the key
/// count) and `children` holds exactly `keys.len() + 1` offsets for an
/// internal node, or nothing for a leaf. Padding to fixed capacity exists
/// only in the serialized form.
///
/// # Invariants
/// - `keys` is sorted ascending.
/// - Every key in the subtree under `children[i]` is `<= keys[i]` and
///   `>= keys[i-1]`.
/// - A non-root node holds between `t-1` and `2t-1` keys.
/// - All leaves sit at the same depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) offset: NodeOffset,
    pub(crate) is_leaf: bool,
    pub(crate) keys: Vec<i32>,
    pub(crate) children: Vec<NodeOffset>,
}

impl Node {
    /// Create an empty leaf with no record allocated yet.
    pub(crate) fn new_leaf() -> Self {
        Self {
            offset: NodeOffset::NULL,
            is_leaf: true,
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an empty internal node with no record allocated yet.
    pub(crate) fn new_internal() -> Self {
        Self {
            offset: NodeOffset::NULL,
            is_leaf: false,
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    /// This node's record location - its identity within the tree.
    #[inline]
    pub fn offset(&self) -> NodeOffset {
        self.offset
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    /// Number of live keys.
    #[inline]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// The node's key set, sorted ascending.
    #[inline]
    pub fn keys(&self) -> &[i32] {
        &self.keys
    }

    /// Child offsets (`key_count + 1` of them; empty for a leaf).
    #[inline]
    pub fn children(&self) -> &[NodeOffset] {
        &self.children
    }

    /// Check whether this node's key set holds `key`.
    pub fn contains(&self, key: i32) -> bool {
        self.keys.binary_search(&key).is_ok()
    }

    pub(crate) fn is_full(&self, layout: &NodeLayout) -> bool {
        self.keys.len() == layout.max_keys()
    }

    pub(crate) fn set_offset(&mut self, offset: NodeOffset) {
        self.offset = offset;
    }

    // ------------------------------------------------------------------
    // Record codec
    // ------------------------------------------------------------------

    /// Serialize this node into a full record, padded to fixed capacity.
    ///
    /// Unused key slots are zero-filled and unused child slots hold the
    /// null sentinel; readers ignore everything past the key count.
    pub(crate) fn encode(&self, layout: &NodeLayout) -> Vec<u8> {
        let mut buf = Vec::with_capacity(layout.record_size(self.is_leaf));

        let flag: i32 = if self.is_leaf { 1 } else { 0 };
        buf.extend_from_slice(&flag.to_be_bytes());
        buf.extend_from_slice(&(self.keys.len() as i32).to_be_bytes());

        for slot in 0..layout.max_keys() {
            let key = self.keys.get(slot).copied().unwrap_or(0);
            buf.extend_from_slice(&key.to_be_bytes());
        }

        if !self.is_leaf {
            for slot in 0..layout.max_children() {
                let child = self.children.get(slot).copied().unwrap_or(NodeOffset::NULL);
                buf.extend_from_slice(&child.0.to_be_bytes());
            }
        }

        buf
    }

    /// Deserialize a record body (everything after the leaf flag).
    ///
    /// # Errors
    /// Returns `Error::CorruptNode` for a mis-sized body or an out-of-range
    /// key count.
    pub(crate) fn decode(
        offset: NodeOffset,
        is_leaf: bool,
        body: &[u8],
        layout: &NodeLayout,
    ) -> Result<Self> {
        if body.len() != layout.record_size(is_leaf) - FIELD_SIZE {
            return Err(Error::CorruptNode(offset));
        }

        let key_count = field(body, 0);
        if key_count < 0 || key_count as usize > layout.max_keys() {
            return Err(Error::CorruptNode(offset));
        }
        let key_count = key_count as usize;

        let keys = (0..key_count).map(|slot| field(body, 1 + slot)).collect();

        let children = if is_leaf {
            Vec::new()
        } else {
            (0..key_count + 1)
                .map(|slot| NodeOffset::new(field(body, 1 + layout.max_keys() + slot)))
                .collect()
        };

        Ok(Self {
            offset,
            is_leaf,
            keys,
            children,
        })
    }

    // ------------------------------------------------------------------
    // Algorithms
    // ------------------------------------------------------------------

    /// Split the full `child` occupying slot `index` of this node.
    ///
    /// The upper `t-1` keys (and upper `t` children) of `child` move into a
    /// freshly allocated sibling of the same kind, the median key moves up
    /// into this node at `index`, and the sibling's offset is inserted at
    /// `index + 1`. All three records are persisted. This is the tree's
    /// only rebalancing primitive.
    ///
    /// # Panics
    /// Panics if `child` is not full.
    pub(crate) fn split_child(
        &mut self,
        index: usize,
        child: &mut Node,
        store: &NodeStore,
    ) -> Result<()> {
        let t = store.layout().degree();

        let mut sibling = if child.is_leaf {
            Node::new_leaf()
        } else {
            Node::new_internal()
        };

        // Upper t-1 keys move over; the median (local index t-1) moves up.
        sibling.keys = child.keys.split_off(t);
        let median = child
            .keys
            .pop()
            .expect("split_child requires a full child");

        if !child.is_leaf {
            sibling.children = child.children.split_off(t);
        }

        // Allocating persists the sibling's full contents.
        store.append_node(&mut sibling)?;

        self.children.insert(index + 1, sibling.offset);
        self.keys.insert(index, median);

        store.write_node(child)?;
        store.write_node(self)
    }

    /// Insert `key` into the subtree rooted at this node.
    ///
    /// Precondition (maintained by the caller splitting ahead of descent):
    /// this node has spare key capacity. A full child is split before
    /// recursing into it, so at most one split happens per level.
    pub(crate) fn insert_non_full(&mut self, key: i32, store: &NodeStore) -> Result<()> {
        if self.is_leaf {
            // Duplicates land to the right of their equals.
            let slot = self.keys.partition_point(|&k| k <= key);
            self.keys.insert(slot, key);
            return store.write_node(self);
        }

        let mut index = self.keys.partition_point(|&k| k <= key);
        let mut child = self.load_child(index, store)?;

        if child.is_full(store.layout()) {
            self.split_child(index, &mut child, store)?;

            // The promoted median may route the key into the new sibling.
            if key > self.keys[index] {
                index += 1;
            }
            child = self.load_child(index, store)?;
        }

        child.insert_non_full(key, store)?;
        store.write_node(self)
    }

    /// Find the node holding `key` in the subtree rooted at this node.
    pub(crate) fn search(&self, key: i32, store: &NodeStore) -> Result<Option<Node>> {
        // First slot whose key is >= the probe, bounded strictly by the
        // live key count.
        let index = self.keys.partition_point(|&k| k < key);

        if index < self.keys.len() && self.keys[index] == key {
            return Ok(Some(self.clone()));
        }
        if self.is_leaf {
            return Ok(None);
        }

        self.load_child(index, store)?.search(key, store)
    }

    /// Visit every key in the subtree rooted at this node, in order.
    ///
    /// Children and keys interleave (child 0, key 0, child 1, key 1, ...,
    /// last child), so keys arrive in ascending order.
    pub(crate) fn for_each_key(
        &self,
        store: &NodeStore,
        visit: &mut dyn FnMut(i32),
    ) -> Result<()> {
        if self.is_leaf {
            for &key in &self.keys {
                visit(key);
            }
            return Ok(());
        }

        for (index, &key) in self.keys.iter().enumerate() {
            self.load_child(index, store)?.for_each_key(store, visit)?;
            visit(key);
        }
        self.load_child(self.keys.len(), store)?
            .for_each_key(store, visit)
    }

    /// Load the child in slot `index`, which must exist for an internal
    /// node within bounds.
    fn load_child(&self, index: usize, store: &NodeStore) -> Result<Node> {
        let offset = self.children[index];
        store
            .read_node(offset)?
            .ok_or(Error::CorruptNode(offset))
    }
}

/// Read the big-endian field at `index` within a record body.
fn field(body: &[u8], index: usize) -> i32 {
    let start = index * FIELD_SIZE;
    let mut raw = [0u8; FIELD_SIZE];
    raw.copy_from_slice(&body[start..start + FIELD_SIZE]);
    i32::from_be_bytes(raw)
}

impl fmt::Display for Node {
    /// Render the node's key set, e.g. `Leaf[10, 20]` or `Internal[30]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_leaf { "Leaf" } else { "Internal" };
        write!(f, "{kind}[")?;
        for (slot, key) in self.keys.iter().enumerate() {
            if slot > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}")?;
        }
        write!(f, "]")
    }
}
