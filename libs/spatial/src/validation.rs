//! Structural validation of R-trees.

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use geometry::rect::Rect;
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::node::{Children, NodeKey};
use crate::rtree::RTree;

/// An issue that should be reported to users.
pub trait Diagnostic: Debug + Display {
    /// Returns the severity of this issue.
    fn severity(&self) -> Severity;
}

/// An enumeration of possible severity levels.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    /// An informational message.
    Info,
    /// A warning.
    #[default]
    Warning,
    /// A broken invariant. Queries on the structure may return wrong results.
    Error,
}

impl Severity {
    /// Returns log level corresponding to this severity.
    #[inline]
    pub const fn as_tracing_level(&self) -> Level {
        match *self {
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }

    /// Returns `true` if the severity is [`Severity::Error`].
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(*self, Self::Error)
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A collection of issues found by a validation pass.
#[derive(Debug, Clone)]
pub struct IssueSet<T> {
    issues: Vec<T>,
    num_errors: usize,
    num_warnings: usize,
}

impl<T> IssueSet<T> {
    /// Creates a new, empty issue set.
    #[inline]
    pub fn new() -> Self {
        Self {
            issues: Vec::new(),
            num_errors: 0,
            num_warnings: 0,
        }
    }

    /// Returns an iterator over all issues in the set.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.issues.iter()
    }

    /// The number of issues in this issue set.
    #[inline]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns `true` if this issue set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns `true` if this issue set contains an error.
    pub fn has_error(&self) -> bool {
        self.num_errors > 0
    }

    /// The number of errors in this issue set.
    #[inline]
    pub fn num_errors(&self) -> usize {
        self.num_errors
    }

    /// The number of warnings in this issue set.
    #[inline]
    pub fn num_warnings(&self) -> usize {
        self.num_warnings
    }
}

impl<T: Diagnostic> IssueSet<T> {
    /// Adds the given issue to the issue set.
    pub fn add(&mut self, issue: T) {
        match issue.severity() {
            Severity::Error => self.num_errors += 1,
            Severity::Warning => self.num_warnings += 1,
            Severity::Info => (),
        };
        self.issues.push(issue);
    }

    /// Moves every issue of `other` into `self`.
    pub fn append(&mut self, other: IssueSet<T>) {
        for issue in other {
            self.add(issue);
        }
    }
}

impl IssueSet<InvariantIssue> {
    /// Returns `true` if some issue has the given cause.
    pub fn contains_cause(&self, pred: impl Fn(&Cause) -> bool) -> bool {
        self.issues.iter().any(|issue| pred(&issue.cause))
    }
}

impl<T> IntoIterator for IssueSet<T> {
    type Item = T;
    type IntoIter = <std::vec::Vec<T> as IntoIterator>::IntoIter;
    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl<T> Default for IssueSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Display> Display for IssueSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for issue in self.issues.iter() {
            writeln!(f, "{}", issue)?;
        }
        Ok(())
    }
}

/// A broken tree or index invariant.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct InvariantIssue {
    cause: Cause,
    severity: Severity,
}

/// The reason an [`InvariantIssue`] was raised.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum Cause {
    /// A node's cached bounding box differs from the union of its children's boxes.
    StaleBbox {
        /// The offending node.
        node: NodeKey,
        /// The box stored in the node.
        cached: Rect,
        /// The union of the children's boxes.
        actual: Rect,
    },
    /// A node has more children than the maximum fan-out.
    Overfull {
        /// The offending node.
        node: NodeKey,
        /// Its number of children.
        len: usize,
    },
    /// A non-root node has fewer children than the minimum fan-out,
    /// or an internal root has fewer than two children.
    Underfull {
        /// The offending node.
        node: NodeKey,
        /// Its number of children.
        len: usize,
    },
    /// Leaves are reachable at different depths.
    UnevenDepth {
        /// The offending leaf.
        node: NodeKey,
        /// The depth of this leaf.
        depth: usize,
        /// The depth of the first leaf encountered.
        expected: usize,
    },
    /// A node's parent reference does not point at the node holding it.
    ParentMismatch {
        /// The offending node.
        node: NodeKey,
        /// The parent reference stored in the node.
        stored: Option<NodeKey>,
        /// The node that holds it.
        actual: Option<NodeKey>,
    },
    /// An entry's bounding box is inverted.
    EmptyEntry {
        /// The debug representation of the entry's key.
        key: String,
    },
    /// A key is stored more than once.
    DuplicateKey {
        /// The debug representation of the key.
        key: String,
        /// The number of times the key was found.
        count: usize,
    },
    /// The entry counter disagrees with the number of stored entries.
    LengthMismatch {
        /// The counter value.
        recorded: usize,
        /// The number of entries found.
        actual: usize,
    },
    /// Nodes in the arena cannot be reached from the root.
    UnreachableNodes {
        /// The number of unreachable nodes.
        count: usize,
    },
    /// An indexed entry's box differs from its object's current box.
    OutdatedEntry {
        /// The debug representation of the key.
        key: String,
        /// The box the entry is indexed under.
        indexed: Rect,
        /// The object's current box, if it has one.
        current: Option<Rect>,
    },
    /// An object is not present in the tree.
    MissingEntry {
        /// The debug representation of the key.
        key: String,
    },
    /// The tree holds a key that belongs to no object.
    UnknownEntry {
        /// The debug representation of the key.
        key: String,
    },
}

impl Diagnostic for InvariantIssue {
    fn severity(&self) -> Severity {
        self.severity
    }
}

impl InvariantIssue {
    /// Creates a new issue.
    pub fn new(cause: Cause, severity: Severity) -> Self {
        Self { cause, severity }
    }

    pub(crate) fn new_and_log(cause: Cause, severity: Severity) -> Self {
        let result = Self::new(cause, severity);
        match severity {
            Severity::Info => tracing::event!(Level::INFO, issue = ?result.cause, "{}", result),
            Severity::Warning => tracing::event!(Level::WARN, issue = ?result.cause, "{}", result),
            Severity::Error => tracing::event!(Level::ERROR, issue = ?result.cause, "{}", result),
        }
        result
    }

    /// The reason this issue was raised.
    #[inline]
    pub fn cause(&self) -> &Cause {
        &self.cause
    }
}

impl Display for InvariantIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.cause)
    }
}

impl Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StaleBbox {
                node,
                cached,
                actual,
            } => write!(
                f,
                "node {:?} caches bounding box {:?}, but its children span {:?}",
                node, cached, actual
            ),
            Self::Overfull { node, len } => {
                write!(f, "node {:?} has too many children ({})", node, len)
            }
            Self::Underfull { node, len } => {
                write!(f, "node {:?} has too few children ({})", node, len)
            }
            Self::UnevenDepth {
                node,
                depth,
                expected,
            } => write!(
                f,
                "leaf {:?} is at depth {}, but other leaves are at depth {}",
                node, depth, expected
            ),
            Self::ParentMismatch {
                node,
                stored,
                actual,
            } => write!(
                f,
                "node {:?} records parent {:?}, but is held by {:?}",
                node, stored, actual
            ),
            Self::EmptyEntry { key } => write!(f, "entry `{}` has an inverted bounding box", key),
            Self::DuplicateKey { key, count } => {
                write!(f, "entry `{}` is stored {} times", key, count)
            }
            Self::LengthMismatch { recorded, actual } => write!(
                f,
                "tree records {} entries, but {} are stored",
                recorded, actual
            ),
            Self::UnreachableNodes { count } => {
                write!(f, "{} nodes are unreachable from the root", count)
            }
            Self::OutdatedEntry {
                key,
                indexed,
                current,
            } => write!(
                f,
                "entry `{}` is indexed under {:?}, but its bounding box is {:?}",
                key, indexed, current
            ),
            Self::MissingEntry { key } => write!(f, "entry `{}` is missing from the tree", key),
            Self::UnknownEntry { key } => {
                write!(f, "the tree holds unknown entry `{}`", key)
            }
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> RTree<K> {
    /// Checks every structural invariant of the tree.
    ///
    /// Cached boxes are recomputed bottom-up and compared with the stored ones.
    /// This walks the entire tree and is meant for tests and consistency checks.
    pub fn validate(&self) -> IssueSet<InvariantIssue> {
        let mut issues = IssueSet::new();
        let mut leaf_depth: Option<usize> = None;
        let mut visited = 0;
        let mut counts: HashMap<K, usize> = HashMap::new();

        if self.nodes[self.root].parent.is_some() {
            issues.add(InvariantIssue::new_and_log(
                Cause::ParentMismatch {
                    node: self.root,
                    stored: self.nodes[self.root].parent,
                    actual: None,
                },
                Severity::Error,
            ));
        }

        // Each box is compared with the union of its children's cached boxes,
        // which are in turn checked when the children are popped.
        let mut stack = vec![(self.root, 1)];
        while let Some((node, depth)) = stack.pop() {
            visited += 1;
            let node_ref = &self.nodes[node];
            let len = node_ref.len();
            let is_root = node == self.root;

            if len > self.config.max_fanout {
                issues.add(InvariantIssue::new_and_log(
                    Cause::Overfull { node, len },
                    Severity::Error,
                ));
            }
            let min = match (is_root, node_ref.is_leaf()) {
                (false, _) => self.config.min_fanout,
                (true, true) => 0,
                (true, false) => 2,
            };
            if len < min {
                issues.add(InvariantIssue::new_and_log(
                    Cause::Underfull { node, len },
                    Severity::Error,
                ));
            }

            if len > 0 {
                let actual = self.compute_bbox(node);
                if actual != node_ref.bbox {
                    issues.add(InvariantIssue::new_and_log(
                        Cause::StaleBbox {
                            node,
                            cached: node_ref.bbox,
                            actual,
                        },
                        Severity::Error,
                    ));
                }
            }

            match &node_ref.children {
                Children::Leaf(entries) => {
                    match leaf_depth {
                        None => leaf_depth = Some(depth),
                        Some(expected) if expected != depth => {
                            issues.add(InvariantIssue::new_and_log(
                                Cause::UnevenDepth {
                                    node,
                                    depth,
                                    expected,
                                },
                                Severity::Error,
                            ));
                        }
                        Some(_) => (),
                    }
                    for entry in entries {
                        if entry.bbox.is_empty() {
                            issues.add(InvariantIssue::new_and_log(
                                Cause::EmptyEntry {
                                    key: format!("{:?}", entry.key),
                                },
                                Severity::Error,
                            ));
                        }
                        *counts.entry(entry.key).or_default() += 1;
                    }
                }
                Children::Internal(children) => {
                    for &child in children.iter().rev() {
                        let Some(child_ref) = self.nodes.get(child) else {
                            issues.add(InvariantIssue::new_and_log(
                                Cause::ParentMismatch {
                                    node: child,
                                    stored: None,
                                    actual: Some(node),
                                },
                                Severity::Error,
                            ));
                            continue;
                        };
                        if child_ref.parent != Some(node) {
                            issues.add(InvariantIssue::new_and_log(
                                Cause::ParentMismatch {
                                    node: child,
                                    stored: child_ref.parent,
                                    actual: Some(node),
                                },
                                Severity::Error,
                            ));
                        }
                        stack.push((child, depth + 1));
                    }
                }
            }
        }

        let mut stored = 0;
        for (key, count) in counts {
            stored += count;
            if count > 1 {
                issues.add(InvariantIssue::new_and_log(
                    Cause::DuplicateKey {
                        key: format!("{:?}", key),
                        count,
                    },
                    Severity::Error,
                ));
            }
        }
        if stored != self.len {
            issues.add(InvariantIssue::new_and_log(
                Cause::LengthMismatch {
                    recorded: self.len,
                    actual: stored,
                },
                Severity::Error,
            ));
        }
        if visited < self.nodes.len() {
            issues.add(InvariantIssue::new_and_log(
                Cause::UnreachableNodes {
                    count: self.nodes.len() - visited,
                },
                Severity::Warning,
            ));
        }

        issues
    }
}
