//! Chunk storage.
//!
//! A [`ChunkSource`] retrieves the raw bytes of a chunk identified by its chunk grid indices.
//! It sits behind any decompression or other codecs: the bytes it returns are the stored elements of the chunk, ready to [decode](crate::array::decode).
//!
//! [`MemoryChunkStore`] is an in-memory chunk source.

mod memory_chunk_store;

use thiserror::Error;

use crate::array::ArrayIndices;

pub use self::memory_chunk_store::MemoryChunkStore;

/// The raw bytes of a chunk, or [`None`] if the chunk is absent.
pub type MaybeBytes = Option<bytes::Bytes>;

/// Retrieves the raw bytes of chunks.
///
/// Sources are shared between threads when reading regions in parallel.
pub trait ChunkSource: Send + Sync {
    /// Retrieve the bytes of the chunk at `chunk_indices`.
    ///
    /// Returns [`None`] if the chunk does not exist.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying error with the source.
    fn retrieve_chunk(&self, chunk_indices: &[u64]) -> Result<MaybeBytes, StorageError>;
}

/// A storage error.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    /// A chunk could not be retrieved.
    #[error("chunk {0:?} could not be retrieved: {1}")]
    ChunkUnavailable(ArrayIndices, String),
    /// The requested method is not supported.
    #[error("{0}")]
    Unsupported(String),
    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl From<&str> for StorageError {
    fn from(err: &str) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<String> for StorageError {
    fn from(err: String) -> Self {
        Self::Other(err)
    }
}
