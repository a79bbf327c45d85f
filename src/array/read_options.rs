//! Options for reading chunked arrays.

use crate::config::global_config;

/// Options for reading chunks and regions of a [`ChunkedArray`](super::ChunkedArray).
///
/// The default options are taken from the [global configuration](crate::config::global_config).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    chunk_concurrent_limit: usize,
    fill_missing_chunks: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        let config = global_config();
        Self {
            chunk_concurrent_limit: config.chunk_concurrent_limit(),
            fill_missing_chunks: config.fill_missing_chunks(),
        }
    }
}

impl ReadOptions {
    /// Create a new read options builder.
    #[must_use]
    pub fn builder() -> ReadOptionsBuilder {
        ReadOptionsBuilder::new()
    }

    /// Return the maximum number of chunks retrieved concurrently.
    #[must_use]
    pub fn chunk_concurrent_limit(&self) -> usize {
        self.chunk_concurrent_limit
    }

    /// Set the maximum number of chunks retrieved concurrently.
    ///
    /// A limit of zero is treated as one.
    pub fn set_chunk_concurrent_limit(&mut self, chunk_concurrent_limit: usize) {
        self.chunk_concurrent_limit = chunk_concurrent_limit;
    }

    /// Return true if chunks absent from storage are substituted with the fill value.
    #[must_use]
    pub fn fill_missing_chunks(&self) -> bool {
        self.fill_missing_chunks
    }

    /// Set whether chunks absent from storage are substituted with the fill value.
    pub fn set_fill_missing_chunks(&mut self, fill_missing_chunks: bool) {
        self.fill_missing_chunks = fill_missing_chunks;
    }
}

/// Builder for [`ReadOptions`].
#[derive(Debug, Clone)]
pub struct ReadOptionsBuilder {
    options: ReadOptions,
}

impl Default for ReadOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadOptionsBuilder {
    /// Create a new read options builder initialised from the global configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: ReadOptions::default(),
        }
    }

    /// Build into read options.
    #[must_use]
    pub fn build(&self) -> ReadOptions {
        self.options
    }

    /// Set the maximum number of chunks retrieved concurrently.
    #[must_use]
    pub fn chunk_concurrent_limit(mut self, chunk_concurrent_limit: usize) -> Self {
        self.options.chunk_concurrent_limit = chunk_concurrent_limit;
        self
    }

    /// Set whether chunks absent from storage are substituted with the fill value.
    #[must_use]
    pub fn fill_missing_chunks(mut self, fill_missing_chunks: bool) -> Self {
        self.options.fill_missing_chunks = fill_missing_chunks;
        self
    }
}
