//! Global configuration options.

use std::sync::{OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Global configuration options for the ndchunk crate.
///
/// Retrieve the global [`Config`] with [`global_config`] and modify it with [`global_config_mut`].
///
/// ## Chunk Concurrent Limit
/// > default: [`std::thread::available_parallelism`]`()`
///
/// The maximum number of chunks retrieved and decoded concurrently by [`par_retrieve_region`](crate::array::ChunkedArray::par_retrieve_region).
/// A limit of zero is treated as one.
///
/// ## Fill Missing Chunks
/// > default: [`true`]
///
/// If enabled, a chunk that is absent from its [`ChunkSource`](crate::storage::ChunkSource) reads as the fill value of the array.
/// Otherwise reading an absent chunk fails with [`ArrayError::MissingChunk`](crate::array::ArrayError::MissingChunk).
#[derive(Debug)]
pub struct Config {
    chunk_concurrent_limit: usize,
    fill_missing_chunks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chunk_concurrent_limit: std::thread::available_parallelism()
                .map_or(1, std::num::NonZeroUsize::get),
            fill_missing_chunks: true,
        }
    }
}

impl Config {
    /// Get the [chunk concurrent limit](#chunk-concurrent-limit) configuration.
    #[must_use]
    pub fn chunk_concurrent_limit(&self) -> usize {
        self.chunk_concurrent_limit
    }

    /// Set the [chunk concurrent limit](#chunk-concurrent-limit) configuration.
    pub fn set_chunk_concurrent_limit(&mut self, concurrent_limit: usize) {
        self.chunk_concurrent_limit = concurrent_limit;
    }

    /// Get the [fill missing chunks](#fill-missing-chunks) configuration.
    #[must_use]
    pub fn fill_missing_chunks(&self) -> bool {
        self.fill_missing_chunks
    }

    /// Set the [fill missing chunks](#fill-missing-chunks) configuration.
    pub fn set_fill_missing_chunks(&mut self, fill_missing_chunks: bool) {
        self.fill_missing_chunks = fill_missing_chunks;
    }
}

static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

/// Returns a reference to the global ndchunk configuration.
///
/// # Panics
/// This function panics if the underlying lock has been poisoned and might panic if the global config is already held by the current thread.
pub fn global_config() -> RwLockReadGuard<'static, Config> {
    CONFIG
        .get_or_init(|| RwLock::new(Config::default()))
        .read()
        .unwrap()
}

/// Returns a mutable reference to the global ndchunk configuration.
///
/// # Panics
/// This function panics if the underlying lock has been poisoned and might panic if the global config is already held by the current thread.
pub fn global_config_mut() -> RwLockWriteGuard<'static, Config> {
    CONFIG
        .get_or_init(|| RwLock::new(Config::default()))
        .write()
        .unwrap()
}
