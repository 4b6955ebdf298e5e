//! Spatial indexing of layout primitives.
//!
//! [`RTree`] maps keys to fixed-point bounding boxes and answers
//! rectangle overlap queries. [`SpatialIndex`] pairs an [`RTree`] with the
//! primitives it indexes and rebuilds the tree on demand when their
//! bounding boxes are known to be out of date.
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod index;
pub mod node;
pub mod rtree;
pub mod search;
pub mod validation;

pub use config::RTreeConfig;
pub use error::{Error, Result};
pub use index::{Indexable, SpatialIndex};
pub use node::{Entry, NodeKey};
pub use rtree::RTree;
pub use search::Search;
pub use validation::{Cause, Diagnostic, InvariantIssue, IssueSet, Severity};
