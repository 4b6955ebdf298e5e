//! A balanced R-tree over bounded entries.
//!
//! Nodes live in a [`SlotMap`] arena and refer to their parent by [`NodeKey`].
//! Insertion descends by least area enlargement and splits overflowing nodes
//! with a quadratic seed-and-grow split. Removal reinserts the entries of
//! underflowing nodes instead of redistributing them among siblings.

use std::fmt::Debug;
use std::hash::Hash;

use geometry::point::Point;
use geometry::rect::Rect;
use slotmap::SlotMap;

use crate::config::RTreeConfig;
use crate::error::{Error, Result};
use crate::node::{Children, Entry, Node, NodeKey};
use crate::search::Search;

/// An R-tree mapping keys to bounding boxes.
///
/// Keys identify entries; two entries with equal boxes and distinct keys are distinct.
/// A key may appear at most once in a tree.
///
/// # Examples
///
/// ```
/// # use geometry::prelude::*;
/// # use spatial::RTree;
/// let mut tree = RTree::new();
/// tree.insert(1u32, Rect::from_lambda(0., 0., 2., 2.)).unwrap();
/// tree.insert(2u32, Rect::from_lambda(5., 5., 7., 7.)).unwrap();
///
/// let query = Rect::from_lambda(4., 4., 8., 8.);
/// let hits: Vec<u32> = tree.search(query, false).map(|e| e.key).collect();
/// assert_eq!(hits, vec![2]);
/// ```
#[derive(Debug, Clone)]
pub struct RTree<K> {
    pub(crate) nodes: SlotMap<NodeKey, Node<K>>,
    pub(crate) root: NodeKey,
    pub(crate) config: RTreeConfig,
    pub(crate) len: usize,
}

impl<K: Copy + Eq + Hash + Debug> Default for RTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash + Debug> RTree<K> {
    /// Creates an empty tree with the default [`RTreeConfig`].
    pub fn new() -> Self {
        Self::with_valid_config(RTreeConfig::default())
    }

    /// Creates an empty tree with the given configuration.
    pub fn with_config(config: RTreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: RTreeConfig) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::leaf(None));
        Self {
            nodes,
            root,
            config,
            len: 0,
        }
    }

    /// Builds a tree by inserting every entry in order.
    pub fn from_entries(
        config: RTreeConfig,
        entries: impl IntoIterator<Item = (K, Rect)>,
    ) -> Result<Self> {
        let mut tree = Self::with_config(config)?;
        tree.extend(entries)?;
        Ok(tree)
    }

    /// Inserts every entry in order, stopping at the first failure.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = (K, Rect)>) -> Result<()> {
        for (key, bbox) in entries {
            self.insert(key, bbox)?;
        }
        Ok(())
    }

    /// The configuration this tree was built with.
    #[inline]
    pub fn config(&self) -> &RTreeConfig {
        &self.config
    }

    /// The number of entries in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of levels in the tree. A tree whose root is a leaf has height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = self.root;
        while let Children::Internal(children) = &self.nodes[node].children {
            let Some(&first) = children.first() else {
                break;
            };
            node = first;
            height += 1;
        }
        height
    }

    /// The number of nodes in the arena.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The bounding box of every entry in the tree, or `None` if the tree is empty.
    pub fn bbox(&self) -> Option<Rect> {
        let root = &self.nodes[self.root];
        (!root.is_empty()).then_some(root.bbox)
    }

    /// Removes every entry, keeping the configuration.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.insert(Node::leaf(None));
        self.len = 0;
    }

    /// Iterates over all entries in depth-first order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry<K>> + '_ {
        let mut stack = vec![self.root];
        std::iter::from_fn(move || {
            while let Some(node) = stack.pop() {
                match &self.nodes[node].children {
                    Children::Leaf(entries) => return Some(entries.iter()),
                    Children::Internal(children) => stack.extend(children.iter().rev().copied()),
                }
            }
            None
        })
        .flatten()
    }

    /// Returns `true` if an entry with the given key is stored in the tree.
    ///
    /// This scans the whole tree.
    pub fn contains_key(&self, key: K) -> bool {
        self.entries().any(|e| e.key == key)
    }

    /// Returns a lazy iterator over the entries whose boxes overlap `query`.
    ///
    /// See [`Rect::overlaps`] for the meaning of `include_edges`.
    pub fn search(&self, query: Rect, include_edges: bool) -> Search<'_, K> {
        Search::new(self, query, include_edges)
    }

    /// Inserts an entry.
    ///
    /// The key must not already be present. This is not checked here, since
    /// checking would scan the whole tree; [`RTree::validate`] reports
    /// duplicates as [`Cause::DuplicateKey`](crate::Cause::DuplicateKey).
    pub fn insert(&mut self, key: K, bbox: Rect) -> Result<()> {
        if bbox.is_empty() {
            return Err(Error::empty_bbox(key));
        }
        tracing::trace!(?key, ?bbox, "inserting entry");
        self.insert_entry(Entry { key, bbox });
        self.len += 1;
        Ok(())
    }

    /// Removes the entry with the given key, returning the box it was indexed under.
    ///
    /// If `hint` is given, only subtrees whose boxes contain `hint` are searched first.
    /// Should that miss, as it does when an object has moved since it was indexed,
    /// the whole tree is scanned.
    pub fn remove(&mut self, key: K, hint: Option<Rect>) -> Result<Rect> {
        let found = match hint {
            Some(hint) => self.locate(key, Some(&hint)).or_else(|| {
                tracing::warn!(
                    ?key,
                    ?hint,
                    "entry not found under its bounding box, scanning the whole tree"
                );
                self.locate(key, None)
            }),
            None => {
                tracing::debug!(?key, "no bounding box hint, scanning the whole tree");
                self.locate(key, None)
            }
        };
        let Some((leaf, index)) = found else {
            return Err(Error::not_found(key));
        };
        let entries = self.nodes[leaf]
            .entries_mut()
            .ok_or_else(|| Error::not_found(key))?;
        let entry = entries.remove(index);
        tracing::trace!(?key, bbox = ?entry.bbox, "removed entry");
        self.len -= 1;
        self.condense(leaf);
        Ok(entry.bbox)
    }

    /// Finds the leaf holding `key` and the entry's position in it.
    fn locate(&self, key: K, hint: Option<&Rect>) -> Option<(NodeKey, usize)> {
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            let node_ref = &self.nodes[node];
            if let Some(hint) = hint {
                if !node_ref.bbox.contains_rect(hint) {
                    continue;
                }
            }
            match &node_ref.children {
                Children::Leaf(entries) => {
                    if let Some(index) = entries.iter().position(|e| e.key == key) {
                        return Some((node, index));
                    }
                }
                Children::Internal(children) => stack.extend(children.iter().rev().copied()),
            }
        }
        None
    }

    /// Adds an entry below the root without touching `len`.
    fn insert_entry(&mut self, entry: Entry<K>) {
        let leaf = self.choose_leaf(&entry.bbox);
        if let Some(entries) = self.nodes[leaf].entries_mut() {
            entries.push(entry);
        }
        self.settle(leaf);
    }

    fn choose_leaf(&self, bbox: &Rect) -> NodeKey {
        let mut node = self.root;
        while let Children::Internal(children) = &self.nodes[node].children {
            node = self.choose_child(children, bbox);
        }
        node
    }

    /// Picks the child whose box grows least in area to cover `bbox`.
    ///
    /// On ties the first such child wins.
    fn choose_child(&self, children: &[NodeKey], bbox: &Rect) -> NodeKey {
        let mut best = children[0];
        let mut best_cost: Option<i128> = None;
        for &child in children {
            let cost = enlargement(&self.nodes[child].bbox, bbox);
            if best_cost.map(|bc| cost < bc).unwrap_or(true) {
                best_cost = Some(cost);
                best = child;
            }
        }
        best
    }

    fn add_child(&mut self, parent: NodeKey, child: NodeKey) {
        self.nodes[child].parent = Some(parent);
        if let Children::Internal(children) = &mut self.nodes[parent].children {
            children.push(child);
        }
        self.settle(parent);
    }

    /// Splits `node` if it overflowed, otherwise refreshes boxes up to the root.
    fn settle(&mut self, node: NodeKey) {
        if self.nodes[node].len() > self.config.max_fanout {
            self.split(node);
        } else {
            self.refresh_upward(node);
        }
    }

    fn refresh_upward(&mut self, node: NodeKey) {
        let mut current = Some(node);
        while let Some(node) = current {
            self.nodes[node].bbox = self.compute_bbox(node);
            current = self.nodes[node].parent;
        }
    }

    pub(crate) fn compute_bbox(&self, node: NodeKey) -> Rect {
        let bbox = match &self.nodes[node].children {
            Children::Leaf(entries) => Rect::union_all_option(entries.iter().map(|e| e.bbox)),
            Children::Internal(children) => {
                Rect::union_all_option(children.iter().map(|&c| self.nodes.get(c).map(|n| n.bbox)))
            }
        };
        bbox.unwrap_or_default()
    }

    fn child_boxes(&self, node: NodeKey) -> Vec<Rect> {
        match &self.nodes[node].children {
            Children::Leaf(entries) => entries.iter().map(|e| e.bbox).collect(),
            Children::Internal(children) => {
                children.iter().map(|&c| self.nodes[c].bbox).collect()
            }
        }
    }

    fn split(&mut self, node: NodeKey) {
        let boxes = self.child_boxes(node);
        let moved = quadratic_split(&boxes, self.config.min_fanout);
        let parent = self.nodes[node].parent;

        let sibling_children = match &mut self.nodes[node].children {
            Children::Leaf(entries) => {
                let (keep, split_off) = partition(std::mem::take(entries), &moved);
                *entries = keep;
                Children::Leaf(split_off)
            }
            Children::Internal(children) => {
                let (keep, split_off) = partition(std::mem::take(children), &moved);
                *children = keep;
                Children::Internal(split_off)
            }
        };
        let sibling = self.nodes.insert(Node {
            parent,
            bbox: Rect::default(),
            children: sibling_children,
        });
        if let Children::Internal(children) = &self.nodes[sibling].children {
            let children = children.clone();
            for child in children {
                self.nodes[child].parent = Some(sibling);
            }
        }
        self.nodes[node].bbox = self.compute_bbox(node);
        self.nodes[sibling].bbox = self.compute_bbox(sibling);
        tracing::debug!(
            kept = self.nodes[node].len(),
            moved = self.nodes[sibling].len(),
            leaf = self.nodes[node].is_leaf(),
            "split node"
        );

        match parent {
            Some(parent) => self.add_child(parent, sibling),
            None => {
                let root = self.nodes.insert(Node::internal(None, vec![node, sibling]));
                self.nodes[node].parent = Some(root);
                self.nodes[sibling].parent = Some(root);
                self.nodes[root].bbox = self.compute_bbox(root);
                self.root = root;
                tracing::debug!(height = self.height(), "grew new root");
            }
        }
    }

    /// Restores fan-out bounds after an entry was removed from `leaf`,
    /// then reinserts the entries of every node that had to be discarded.
    fn condense(&mut self, leaf: NodeKey) {
        let mut orphans = Vec::new();
        let mut node = leaf;
        loop {
            let len = self.nodes[node].len();
            match self.nodes[node].parent {
                Some(parent) if len < self.config.min_fanout => {
                    if let Children::Internal(children) = &mut self.nodes[parent].children {
                        children.retain(|&c| c != node);
                    }
                    self.drain_subtree(node, &mut orphans);
                    node = parent;
                }
                Some(_) => {
                    self.refresh_upward(node);
                    break;
                }
                None if !self.nodes[node].is_leaf() && len < self.config.min_fanout => {
                    tracing::debug!(
                        children = len,
                        "dissolving underfull root"
                    );
                    self.drain_subtree(node, &mut orphans);
                    self.root = self.nodes.insert(Node::leaf(None));
                    break;
                }
                None => {
                    self.refresh_upward(node);
                    break;
                }
            }
        }
        if !orphans.is_empty() {
            tracing::trace!(count = orphans.len(), "reinserting orphaned entries");
        }
        for entry in orphans {
            self.insert_entry(entry);
        }
    }

    /// Frees `node` and all of its descendants, collecting their entries into `out`.
    fn drain_subtree(&mut self, node: NodeKey, out: &mut Vec<Entry<K>>) {
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            let Some(removed) = self.nodes.remove(node) else {
                continue;
            };
            match removed.children {
                Children::Leaf(entries) => out.extend(entries),
                Children::Internal(children) => stack.extend(children.into_iter().rev()),
            }
        }
    }
}

/// The increase in area of `node` when grown to cover `bbox`.
fn enlargement(node: &Rect, bbox: &Rect) -> i128 {
    node.union(*bbox).area() - node.area()
}

/// Splits `items` into those not flagged and those flagged in `moved`, preserving order.
fn partition<T>(items: Vec<T>, moved: &[bool]) -> (Vec<T>, Vec<T>) {
    let mut keep = Vec::with_capacity(items.len());
    let mut split_off = Vec::with_capacity(items.len());
    for (item, &m) in items.into_iter().zip(moved) {
        if m {
            split_off.push(item);
        } else {
            keep.push(item);
        }
    }
    (keep, split_off)
}

fn farthest_from(centers: &[Point], from: usize) -> usize {
    let mut best = from;
    let mut best_dist = -1;
    for (i, c) in centers.iter().enumerate() {
        if i == from {
            continue;
        }
        let dist = centers[from].distance_sq(c);
        if dist > best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

/// Assigns each box to one of two groups, returning `true` for boxes that leave the node.
///
/// The seeds are the box whose center lies farthest from that of box 0, and the box
/// farthest from that one. Remaining boxes are taken one at a time, always choosing
/// the box with the greatest difference in area enlargement between the groups
/// (the last such box on ties) and giving it to the group it enlarges less.
/// Equal enlargements go to the group that stays in the node. A group that needs every
/// remaining box to reach `min_fill` takes them all.
pub(crate) fn quadratic_split(boxes: &[Rect], min_fill: usize) -> Vec<bool> {
    let n = boxes.len();
    let mut assigned: Vec<Option<bool>> = vec![None; n];
    if n < 2 {
        return vec![false; n];
    }
    let centers: Vec<Point> = boxes.iter().map(Rect::center).collect();
    let seed_keep = farthest_from(&centers, 0);
    let seed_move = farthest_from(&centers, seed_keep);
    assigned[seed_keep] = Some(false);
    assigned[seed_move] = Some(true);

    let mut keep_bbox = boxes[seed_keep];
    let mut move_bbox = boxes[seed_move];
    let mut keep_count = 1;
    let mut move_count = 1;
    let mut remaining = n - 2;

    while remaining > 0 {
        let fill = if keep_count + remaining <= min_fill {
            Some(false)
        } else if move_count + remaining <= min_fill {
            Some(true)
        } else {
            None
        };
        if let Some(group) = fill {
            for slot in assigned.iter_mut().filter(|slot| slot.is_none()) {
                *slot = Some(group);
            }
            break;
        }

        let mut pick: Option<(usize, i128, i128)> = None;
        let mut best_pref = -1;
        for (i, b) in boxes.iter().enumerate() {
            if assigned[i].is_some() {
                continue;
            }
            let d_keep = enlargement(&keep_bbox, b);
            let d_move = enlargement(&move_bbox, b);
            let pref = (d_keep - d_move).abs();
            if pref >= best_pref {
                best_pref = pref;
                pick = Some((i, d_keep, d_move));
            }
        }
        let Some((i, d_keep, d_move)) = pick else {
            break;
        };
        if d_move < d_keep {
            assigned[i] = Some(true);
            move_bbox = move_bbox.union(boxes[i]);
            move_count += 1;
        } else {
            assigned[i] = Some(false);
            keep_bbox = keep_bbox.union(boxes[i]);
            keep_count += 1;
        }
        remaining -= 1;
    }

    assigned.into_iter().map(|a| a.unwrap_or(false)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(l: i64, b: i64, rt: i64, t: i64) -> Rect {
        Rect::from_raw_sides(l, b, rt, t)
    }

    #[test]
    fn split_seeds_the_farthest_pair() {
        let boxes = [
            r(0, 0, 1, 1),
            r(100, 100, 101, 101),
            r(1, 1, 2, 2),
            r(99, 99, 100, 100),
            r(2, 0, 3, 1),
            r(98, 100, 99, 101),
            r(0, 2, 1, 3),
            r(100, 98, 101, 99),
            r(3, 3, 4, 4),
        ];
        let moved = quadratic_split(&boxes, 4);
        assert_eq!(moved.len(), boxes.len());
        // Seeds are box 1 (farthest from box 0) and box 0 (farthest from box 1).
        assert!(!moved[1]);
        assert!(moved[0]);
        for (i, &m) in moved.iter().enumerate() {
            let far = boxes[i].left() >= geometry::fixp::Fixp::from_raw(50);
            assert_eq!(m, !far, "box {i} landed in the wrong group");
        }
    }

    #[test]
    fn split_fills_both_groups() {
        // All but one box cluster together, so greedy growth alone would starve a group.
        let mut boxes: Vec<Rect> = (0..8).map(|i| r(i, i, i + 1, i + 1)).collect();
        boxes.push(r(1000, 1000, 1001, 1001));
        let moved = quadratic_split(&boxes, 4);
        let count = moved.iter().filter(|&&m| m).count();
        assert!((4..=5).contains(&count), "moved {count} boxes");
    }

    #[test]
    fn choose_child_prefers_first_on_ties() {
        let mut tree: RTree<u32> = RTree::new();
        for i in 0..9u32 {
            let x = i as i64 * 10;
            tree.insert(i, r(x, 0, x + 5, 5)).unwrap();
        }
        assert_eq!(tree.height(), 2);
        let Children::Internal(children) = tree.nodes[tree.root].children.clone() else {
            panic!("root should be internal");
        };
        assert_eq!(tree.nodes[children[0]].bbox, r(40, 0, 85, 5));
        assert_eq!(tree.nodes[children[1]].bbox, r(0, 0, 35, 5));

        let covered = tree.nodes[children[1]].bbox;
        assert_eq!(tree.choose_child(&children, &covered), children[1]);

        // Both children grow by the same area.
        let gap = r(37, 0, 38, 5);
        assert_eq!(tree.choose_child(&children, &gap), children[0]);
        let reversed = [children[1], children[0]];
        assert_eq!(tree.choose_child(&reversed, &gap), children[1]);
    }

    #[test]
    fn empty_boxes_are_rejected() {
        let mut tree: RTree<u32> = RTree::new();
        let inverted = r(0, 0, 10, 10).intersect(r(20, 20, 30, 30));
        assert!(matches!(
            tree.insert(1, inverted),
            Err(Error::EmptyBbox { .. })
        ));
        assert!(tree.is_empty());
    }

    #[test]
    fn remove_missing_key_fails() {
        let mut tree: RTree<u32> = RTree::new();
        tree.insert(1, r(0, 0, 1, 1)).unwrap();
        assert!(matches!(
            tree.remove(2, Some(r(0, 0, 1, 1))),
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(tree.remove(2, None), Err(Error::NotFound { .. })));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn clear_resets_tree() {
        let mut tree: RTree<u32> = RTree::new();
        tree.extend((0..20).map(|i| (i, r(i as i64, 0, i as i64 + 1, 1))))
            .unwrap();
        assert!(tree.height() > 1);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.bbox(), None);
    }
}
