// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Construction-time configuration for [`BTreeVec`](crate::BTreeVec).
//!
//! The two capacities trade branching factor against tree height: a wide
//! fanout keeps the tree shallow but makes each level's child scan longer,
//! a large leaf keeps more elements contiguous but makes mid-leaf inserts
//! shift more entries.

use crate::error::{Error, Result};

/// Default maximum number of children per internal node.
pub const DEFAULT_MAX_FANOUT: usize = 16;

/// Default maximum number of elements per leaf.
pub const DEFAULT_MAX_LEAF: usize = 128;

/// Capacity parameters, fixed for the lifetime of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum children an internal node may hold.
    pub max_fanout: usize,
    /// Maximum elements a leaf may hold.
    pub max_leaf: usize,
    /// Reuse the last descent path for nearby positions.
    /// Turning this off only makes access slower.
    pub path_cache: bool,
}

impl Default for Config {
    fn default() -> Self {
        return Config {
            max_fanout: DEFAULT_MAX_FANOUT,
            max_leaf: DEFAULT_MAX_LEAF,
            path_cache: true,
        };
    }
}

impl Config {
    pub fn new(max_fanout: usize, max_leaf: usize) -> Config {
        return Config { max_fanout, max_leaf, path_cache: true };
    }

    pub fn with_path_cache(mut self, enabled: bool) -> Config {
        self.path_cache = enabled;
        return self;
    }

    /// Both capacities must be even and at least 4, so that a split yields
    /// two nodes of exactly half capacity and a merge of two half-full
    /// nodes always fits.
    pub fn validate(&self) -> Result<()> {
        check_capacity("max_fanout", self.max_fanout)?;
        check_capacity("max_leaf", self.max_leaf)?;
        return Ok(());
    }
}

fn check_capacity(name: &'static str, value: usize) -> Result<()> {
    if value < 4 || value % 2 != 0 {
        return Err(Error::InvalidCapacity { name, value });
    }
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = Config::default();
        assert_eq!(config.max_fanout, 16);
        assert_eq!(config.max_leaf, 128);
        assert!(config.path_cache);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn smallest_valid() {
        assert!(Config::new(4, 4).validate().is_ok());
    }

    #[test]
    fn rejects_odd_fanout() {
        let err = Config::new(5, 8).validate().unwrap_err();
        assert_eq!(err, Error::InvalidCapacity { name: "max_fanout", value: 5 });
    }

    #[test]
    fn rejects_small_leaf() {
        let err = Config::new(8, 2).validate().unwrap_err();
        assert_eq!(err, Error::InvalidCapacity { name: "max_leaf", value: 2 });
    }

    #[test]
    fn path_cache_toggle() {
        let config = Config::new(4, 4).with_path_cache(false);
        assert!(!config.path_cache);
        assert!(config.validate().is_ok());
    }
}
