//! R-tree tuning parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fan-out and traversal limits of an [`RTree`](crate::RTree).
///
/// Missing fields take their default values when deserialized.
///
/// # Examples
///
/// ```
/// # use spatial::RTreeConfig;
/// let config = RTreeConfig::from_toml_str("max_fanout = 16\nmin_fanout = 6").unwrap();
/// assert_eq!(config.max_fanout, 16);
/// assert_eq!(config.max_search_depth, RTreeConfig::default().max_search_depth);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RTreeConfig {
    /// The maximum number of children of any node.
    pub max_fanout: usize,
    /// The minimum number of children of any node other than the root.
    pub min_fanout: usize,
    /// The deepest level a search descends to before skipping a subtree.
    pub max_search_depth: usize,
}

impl Default for RTreeConfig {
    fn default() -> Self {
        Self {
            max_fanout: 8,
            min_fanout: 4,
            max_search_depth: 64,
        }
    }
}

impl RTreeConfig {
    /// Parses and validates a configuration from a TOML table.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that a tree built with this configuration can satisfy its fan-out bounds.
    ///
    /// Splitting `max_fanout + 1` children must leave at least `min_fanout` in each half.
    pub fn validate(&self) -> Result<()> {
        let reason = if self.min_fanout == 0 {
            "min_fanout must be at least 1".to_string()
        } else if self.max_fanout < 2 {
            "max_fanout must be at least 2".to_string()
        } else if 2 * self.min_fanout > self.max_fanout + 1 {
            format!(
                "min_fanout ({}) is too large for max_fanout ({})",
                self.min_fanout, self.max_fanout
            )
        } else if self.max_search_depth == 0 {
            "max_search_depth must be at least 1".to_string()
        } else {
            return Ok(());
        };
        Err(Error::InvalidConfig { reason })
    }
}
