//! Spatial index error types.

/// The result type returned by spatial index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error raised by a spatial index operation.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The key is already stored in the index.
    #[error("entry `{key}` is already present in the index")]
    AlreadyPresent {
        /// The debug representation of the offending key.
        key: String,
    },
    /// The key could not be found, even by a full scan of the tree.
    #[error("entry `{key}` was not found in the index")]
    NotFound {
        /// The debug representation of the missing key.
        key: String,
    },
    /// The entry has no bounding box, or its bounding box is inverted.
    #[error("entry `{key}` has an empty bounding box")]
    EmptyBbox {
        /// The debug representation of the offending key.
        key: String,
    },
    /// The tree configuration is unusable.
    #[error("invalid R-tree configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },
    /// The configuration could not be parsed.
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn already_present(key: impl std::fmt::Debug) -> Self {
        Self::AlreadyPresent {
            key: format!("{key:?}"),
        }
    }

    pub(crate) fn not_found(key: impl std::fmt::Debug) -> Self {
        Self::NotFound {
            key: format!("{key:?}"),
        }
    }

    pub(crate) fn empty_bbox(key: impl std::fmt::Debug) -> Self {
        Self::EmptyBbox {
            key: format!("{key:?}"),
        }
    }
}
