//! Per-cell spatial index over owned primitives.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use geometry::bbox::Bbox;
use geometry::rect::Rect;
use indexmap::IndexMap;

use crate::config::RTreeConfig;
use crate::error::{Error, Result};
use crate::rtree::RTree;
use crate::validation::{Cause, InvariantIssue, IssueSet, Severity};

/// An object that can be stored in a [`SpatialIndex`].
///
/// The key identifies the object: two objects with equal bounding boxes
/// and distinct keys are distinct entries.
pub trait Indexable: Bbox {
    /// The identity of an object.
    type Key: Copy + Eq + Hash + Debug;

    /// Returns the identity of this object. It must not change while the object is indexed.
    fn key(&self) -> Self::Key;
}

/// A collection of primitives together with an R-tree over their bounding boxes.
///
/// The index does not notice when a primitive's bounding box changes.
/// Callers either [`reindex`](SpatialIndex::reindex) the primitive, or signal
/// the change with [`mark_stale`](SpatialIndex::mark_stale) (which
/// [`modify`](SpatialIndex::modify) does automatically) and let the next
/// query rebuild the tree.
///
/// # Examples
///
/// ```
/// # use geometry::prelude::*;
/// # use spatial::{Indexable, SpatialIndex};
/// #[derive(Clone, Debug)]
/// struct Shape {
///     id: u32,
///     rect: Rect,
/// }
///
/// impl Bbox for Shape {
///     fn bbox(&self) -> Option<Rect> {
///         self.rect.bbox()
///     }
/// }
///
/// impl Indexable for Shape {
///     type Key = u32;
///     fn key(&self) -> u32 {
///         self.id
///     }
/// }
///
/// let mut index = SpatialIndex::new();
/// index.insert(Shape { id: 1, rect: Rect::from_lambda(0., 0., 2., 2.) }).unwrap();
/// index.insert(Shape { id: 2, rect: Rect::from_lambda(5., 5., 7., 7.) }).unwrap();
///
/// // Move shape 1 into the query region.
/// index.modify(1, |s| s.rect = Rect::from_lambda(4., 4., 5., 5.)).unwrap();
/// assert!(!index.is_fresh());
///
/// let mut hits: Vec<u32> = index
///     .search_area(Rect::from_lambda(3., 3., 8., 8.), false)
///     .map(|s| s.id)
///     .collect();
/// hits.sort();
/// assert_eq!(hits, vec![1, 2]);
/// assert!(index.is_fresh());
/// ```
#[derive(Debug, Clone)]
pub struct SpatialIndex<P: Indexable> {
    primitives: IndexMap<P::Key, P>,
    pub(crate) tree: RTree<P::Key>,
    /// Bumped on every staleness signal.
    epoch: u64,
    /// The epoch the tree was last rebuilt at.
    built_epoch: u64,
}

impl<P: Indexable> Default for SpatialIndex<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Indexable> SpatialIndex<P> {
    /// Creates an empty index with the default tree configuration.
    pub fn new() -> Self {
        Self::from_tree(RTree::new())
    }

    /// Creates an empty index with the given tree configuration.
    pub fn with_config(config: RTreeConfig) -> Result<Self> {
        Ok(Self::from_tree(RTree::with_config(config)?))
    }

    fn from_tree(tree: RTree<P::Key>) -> Self {
        Self {
            primitives: IndexMap::new(),
            tree,
            epoch: 0,
            built_epoch: 0,
        }
    }

    /// The number of primitives in the index.
    #[inline]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Returns `true` if the index holds no primitives.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Returns the primitive with the given key.
    #[inline]
    pub fn get(&self, key: P::Key) -> Option<&P> {
        self.primitives.get(&key)
    }

    /// Returns `true` if a primitive with the given key is stored.
    #[inline]
    pub fn contains(&self, key: P::Key) -> bool {
        self.primitives.contains_key(&key)
    }

    /// Iterates over the primitives in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.primitives.values()
    }

    /// The underlying tree, which may be stale.
    #[inline]
    pub fn tree(&self) -> &RTree<P::Key> {
        &self.tree
    }

    /// Adds a primitive to the index.
    ///
    /// Fails if a primitive with the same key is present or the primitive has no bounding box.
    pub fn insert(&mut self, primitive: P) -> Result<()> {
        let key = primitive.key();
        if self.primitives.contains_key(&key) {
            return Err(Error::already_present(key));
        }
        let bbox = primitive.bbox().ok_or_else(|| Error::empty_bbox(key))?;
        self.tree.insert(key, bbox)?;
        self.primitives.insert(key, primitive);
        Ok(())
    }

    /// Removes and returns the primitive with the given key.
    ///
    /// The primitive's current bounding box guides the search for its entry.
    /// If the primitive moved since it was indexed, the whole tree is scanned.
    pub fn remove(&mut self, key: P::Key) -> Result<P> {
        let hint = self
            .primitives
            .get(&key)
            .ok_or_else(|| Error::not_found(key))?
            .bbox();
        match self.tree.remove(key, hint) {
            Ok(_) => (),
            Err(Error::NotFound { .. }) if self.may_be_unindexed(hint) => {
                tracing::debug!(?key, "removing primitive that has no entry in the tree");
            }
            Err(e) => return Err(e),
        }
        self.primitives
            .shift_remove(&key)
            .ok_or_else(|| Error::not_found(key))
    }

    /// Moves a primitive's entry to its current bounding box.
    pub fn reindex(&mut self, key: P::Key) -> Result<()> {
        let bbox = self
            .primitives
            .get(&key)
            .ok_or_else(|| Error::not_found(key))?
            .bbox()
            .ok_or_else(|| Error::empty_bbox(key))?;
        match self.tree.remove(key, Some(bbox)) {
            Ok(_) => (),
            Err(Error::NotFound { .. }) if self.may_be_unindexed(Some(bbox)) => (),
            Err(e) => return Err(e),
        }
        self.tree.insert(key, bbox)
    }

    /// Returns `true` if a stored primitive with the given box may lack a tree entry.
    ///
    /// Rebuilds leave out primitives without a usable box, and the box may have
    /// changed since the last rebuild.
    fn may_be_unindexed(&self, bbox: Option<Rect>) -> bool {
        !self.is_fresh() || bbox.map_or(true, |b| b.is_empty())
    }

    /// Applies `f` to the primitive with the given key and marks the index stale.
    pub fn modify<R>(&mut self, key: P::Key, f: impl FnOnce(&mut P) -> R) -> Result<R> {
        let primitive = self
            .primitives
            .get_mut(&key)
            .ok_or_else(|| Error::not_found(key))?;
        let result = f(primitive);
        debug_assert_eq!(
            primitive.key(),
            key,
            "primitives must not change key while indexed"
        );
        self.mark_stale();
        Ok(result)
    }

    /// Signals that cached bounding boxes may no longer match the primitives.
    #[inline]
    pub fn mark_stale(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Returns `true` if the tree reflects every staleness signal received so far.
    #[inline]
    pub fn is_fresh(&self) -> bool {
        self.built_epoch == self.epoch
    }

    /// Rebuilds the tree if the index is stale. Returns `true` if a rebuild happened.
    pub fn ensure_fresh(&mut self) -> bool {
        if self.is_fresh() {
            return false;
        }
        self.rebuild();
        true
    }

    fn rebuild(&mut self) {
        self.tree.clear();
        for (&key, primitive) in self.primitives.iter() {
            let inserted = match primitive.bbox() {
                Some(bbox) => self.tree.insert(key, bbox),
                None => Err(Error::empty_bbox(key)),
            };
            if let Err(error) = inserted {
                tracing::warn!(?key, %error, "leaving primitive out of the rebuilt index");
            }
        }
        self.built_epoch = self.epoch;
        tracing::debug!(
            primitives = self.primitives.len(),
            entries = self.tree.len(),
            height = self.tree.height(),
            "rebuilt spatial index"
        );
    }

    /// Returns the primitives whose bounding boxes overlap `rect`, rebuilding first if stale.
    ///
    /// See [`Rect::overlaps`] for the meaning of `include_edges`.
    pub fn search_area(
        &mut self,
        rect: Rect,
        include_edges: bool,
    ) -> impl Iterator<Item = &P> + '_ {
        self.ensure_fresh();
        let primitives = &self.primitives;
        self.tree
            .search(rect, include_edges)
            .filter_map(move |entry| primitives.get(&entry.key))
    }

    /// Returns a copy of every primitive, in insertion order.
    ///
    /// The copy may be iterated while the index is modified.
    pub fn primitives(&self) -> Vec<P>
    where
        P: Clone,
    {
        self.primitives.values().cloned().collect()
    }

    /// Checks the tree's invariants and its agreement with the stored primitives.
    ///
    /// Disagreements are errors when the index is fresh, and informational otherwise.
    pub fn validate(&self) -> IssueSet<InvariantIssue> {
        let mut issues = IssueSet::new();
        let severity = if self.is_fresh() {
            Severity::Error
        } else {
            Severity::Info
        };

        let indexed: HashMap<P::Key, Rect> =
            self.tree.entries().map(|e| (e.key, e.bbox)).collect();
        for (key, primitive) in self.primitives.iter() {
            let current = primitive.bbox();
            match indexed.get(key) {
                Some(&bbox) if Some(bbox) != current => {
                    issues.add(InvariantIssue::new_and_log(
                        Cause::OutdatedEntry {
                            key: format!("{:?}", key),
                            indexed: bbox,
                            current,
                        },
                        severity,
                    ));
                }
                Some(_) => (),
                None if current.is_some() => {
                    issues.add(InvariantIssue::new_and_log(
                        Cause::MissingEntry {
                            key: format!("{:?}", key),
                        },
                        severity,
                    ));
                }
                None => (),
            }
        }
        for key in indexed.keys() {
            if !self.primitives.contains_key(key) {
                issues.add(InvariantIssue::new_and_log(
                    Cause::UnknownEntry {
                        key: format!("{:?}", key),
                    },
                    Severity::Error,
                ));
            }
        }
        let mut all = self.tree.validate();
        all.append(issues);
        all
    }
}
