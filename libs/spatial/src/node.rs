//! Arena-allocated tree nodes.

use geometry::rect::Rect;

slotmap::new_key_type! {
    /// Identifies a node in an [`RTree`](crate::RTree) arena.
    pub struct NodeKey;
}

/// A bounded entry stored at a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entry<K> {
    /// The identity of the indexed object.
    pub key: K,
    /// The bounding box the object was indexed under.
    pub bbox: Rect,
}

/// The children of a node. Leaves hold entries and internal nodes hold other nodes.
#[derive(Debug, Clone)]
pub(crate) enum Children<K> {
    Leaf(Vec<Entry<K>>),
    Internal(Vec<NodeKey>),
}

#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    pub(crate) parent: Option<NodeKey>,
    /// Union of the children's bounding boxes.
    pub(crate) bbox: Rect,
    pub(crate) children: Children<K>,
}

impl<K> Node<K> {
    pub(crate) fn leaf(parent: Option<NodeKey>) -> Self {
        Self {
            parent,
            bbox: Rect::default(),
            children: Children::Leaf(Vec::new()),
        }
    }

    pub(crate) fn internal(parent: Option<NodeKey>, children: Vec<NodeKey>) -> Self {
        Self {
            parent,
            bbox: Rect::default(),
            children: Children::Internal(children),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        match &self.children {
            Children::Leaf(entries) => entries.len(),
            Children::Internal(nodes) => nodes.len(),
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.children, Children::Leaf(_))
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn entries_mut(&mut self) -> Option<&mut Vec<Entry<K>>> {
        match &mut self.children {
            Children::Leaf(entries) => Some(entries),
            Children::Internal(_) => None,
        }
    }
}
