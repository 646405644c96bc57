//! Acquisition tunables.
//!
//! Hosts deserialize this from whatever settings format they use; every field
//! has a default so an empty object is a valid configuration.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default cap on items picked in one library import.
pub const DEFAULT_SELECTION_LIMIT: u32 = 5;
/// Default capacity of the channel that carries library picker results.
pub const DEFAULT_FEED_CAPACITY: usize = 16;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Media accepted by the library picker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaFilter {
    #[default]
    Images,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AcquisitionConfig {
    /// Maximum accepted library results per session. `0` means unlimited.
    pub selection_limit: u32,
    pub media_filter: MediaFilter,
    /// Bounded capacity of the library picker feed.
    pub feed_capacity: usize,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            selection_limit: DEFAULT_SELECTION_LIMIT,
            media_filter: MediaFilter::Images,
            feed_capacity: DEFAULT_FEED_CAPACITY,
        }
    }
}

impl AcquisitionConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.feed_capacity == 0 {
            return Err(ConfigError::ZeroFeedCapacity);
        }
        Ok(())
    }

    /// Selection limit as an optional cap; `None` when unlimited.
    pub fn selection_cap(&self) -> Option<usize> {
        match self.selection_limit {
            0 => None,
            limit => Some(limit as usize),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroFeedCapacity,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroFeedCapacity => write!(f, "feed_capacity must be greater than zero"),
        }
    }
}

impl Error for ConfigError {}
