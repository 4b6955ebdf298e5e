//! Range search.

use geometry::rect::Rect;

use crate::node::{Children, Entry, NodeKey};
use crate::rtree::RTree;

/// A lazy depth-first iterator over the entries overlapping a query rectangle.
///
/// Created by [`RTree::search`]. The iterator borrows the tree, so the tree
/// cannot be modified while a search is in progress. A search cannot be
/// restarted; create a new one instead.
///
/// Subtrees deeper than [`RTreeConfig::max_search_depth`](crate::RTreeConfig::max_search_depth)
/// are skipped with a warning.
#[derive(Debug, Clone)]
pub struct Search<'a, K> {
    tree: &'a RTree<K>,
    query: Rect,
    include_edges: bool,
    /// Nodes being visited, with the index of the next child to examine.
    stack: Vec<(NodeKey, usize)>,
}

impl<'a, K> Search<'a, K> {
    pub(crate) fn new(tree: &'a RTree<K>, query: Rect, include_edges: bool) -> Self {
        let mut stack = Vec::with_capacity(tree.config.max_search_depth.min(16));
        let root = &tree.nodes[tree.root];
        if !root.is_empty() && root.bbox.overlaps(&query, include_edges) {
            stack.push((tree.root, 0));
        }
        Self {
            tree,
            query,
            include_edges,
            stack,
        }
    }

    /// The rectangle being searched.
    #[inline]
    pub fn query(&self) -> Rect {
        self.query
    }
}

impl<'a, K> Iterator for Search<'a, K> {
    type Item = &'a Entry<K>;

    fn next(&mut self) -> Option<Self::Item> {
        let tree: &'a RTree<K> = self.tree;
        let max_depth = tree.config.max_search_depth;
        while let Some(top) = self.stack.last_mut() {
            let (node, next) = *top;
            match &tree.nodes[node].children {
                Children::Leaf(entries) => {
                    let hit = entries[next.min(entries.len())..]
                        .iter()
                        .position(|e| e.bbox.overlaps(&self.query, self.include_edges));
                    match hit {
                        Some(offset) => {
                            top.1 = next + offset + 1;
                            return Some(&entries[next + offset]);
                        }
                        None => {
                            self.stack.pop();
                        }
                    }
                }
                Children::Internal(children) => {
                    let Some(&child) = children.get(next) else {
                        self.stack.pop();
                        continue;
                    };
                    top.1 = next + 1;
                    if !tree.nodes[child]
                        .bbox
                        .overlaps(&self.query, self.include_edges)
                    {
                        continue;
                    }
                    if self.stack.len() >= max_depth {
                        tracing::warn!(
                            depth = self.stack.len(),
                            max_depth,
                            "search exceeded maximum depth, skipping subtree"
                        );
                        continue;
                    }
                    self.stack.push((child, 0));
                }
            }
        }
        None
    }
}
