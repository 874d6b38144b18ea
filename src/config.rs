//! Table sizing configuration.

use thiserror::Error;

/// Bucket count of a freshly created table.
pub const DEFAULT_INITIAL_BUCKETS: usize = 16;

/// Ratio of entries to buckets at which `set` grows the table.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// Smallest accepted maximum load factor. Below this a handful of keys
/// would demand an enormous bucket array.
pub const MIN_MAX_LOAD_FACTOR: f64 = 1.0 / 64.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("initial bucket count must be at least 1")]
    ZeroBuckets,
    #[error("maximum load factor must be finite and at least 1/64, got {0}")]
    InvalidLoadFactor(f64),
}

/// Sizing knobs for `ChainedHashMap::with_config`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    pub initial_buckets: usize,
    pub max_load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_buckets: DEFAULT_INITIAL_BUCKETS,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_buckets(mut self, n: usize) -> Self {
        self.initial_buckets = n;
        self
    }

    pub fn max_load_factor(mut self, lf: f64) -> Self {
        self.max_load_factor = lf;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_buckets == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        if !self.max_load_factor.is_finite() || self.max_load_factor < MIN_MAX_LOAD_FACTOR {
            return Err(ConfigError::InvalidLoadFactor(self.max_load_factor));
        }
        Ok(())
    }
}
