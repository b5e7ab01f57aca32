//! `chunkplan` global configuration options.

use std::sync::{OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Global configuration options for the chunkplan crate.
///
/// Retrieve the global [`Config`] with [`global_config`] and modify it with [`global_config_mut`].
///
/// ## Alternative Chunk Sizes Limit
/// > default: `5`
///
/// The maximum number of evenly dividing alternative chunk sizes reported by [`analyze_chunking_strategy`](crate::analyze_chunking_strategy).
#[derive(Debug)]
pub struct Config {
    alternative_chunk_sizes_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            alternative_chunk_sizes_limit: 5,
        }
    }
}

impl Config {
    /// Get the [alternative chunk sizes limit](#alternative-chunk-sizes-limit) configuration.
    #[must_use]
    pub fn alternative_chunk_sizes_limit(&self) -> usize {
        self.alternative_chunk_sizes_limit
    }

    /// Set the [alternative chunk sizes limit](#alternative-chunk-sizes-limit) configuration.
    pub fn set_alternative_chunk_sizes_limit(&mut self, limit: usize) -> &mut Self {
        self.alternative_chunk_sizes_limit = limit;
        self
    }
}

static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

/// Returns a reference to the global chunkplan configuration.
///
/// # Panics
/// This function panics if the underlying lock has been poisoned and might panic if the global config is already held by the current thread.
pub fn global_config() -> RwLockReadGuard<'static, Config> {
    CONFIG
        .get_or_init(|| RwLock::new(Config::default()))
        .read()
        .unwrap()
}

/// Returns a mutable reference to the global chunkplan configuration.
///
/// # Panics
/// This function panics if the underlying lock has been poisoned and might panic if the global config is already held by the current thread.
pub fn global_config_mut() -> RwLockWriteGuard<'static, Config> {
    CONFIG
        .get_or_init(|| RwLock::new(Config::default()))
        .write()
        .unwrap()
}
