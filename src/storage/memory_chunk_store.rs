//! An in-memory chunk store.

use std::collections::BTreeMap;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::array::ArrayIndices;

use super::{ChunkSource, MaybeBytes, StorageError};

/// An in-memory chunk store.
///
/// Chunks are keyed by their chunk grid indices.
#[derive(Debug, Default)]
pub struct MemoryChunkStore {
    chunks: RwLock<BTreeMap<ArrayIndices, Bytes>>,
}

impl MemoryChunkStore {
    /// Create a new empty memory chunk store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the bytes of the chunk at `chunk_indices`, replacing any existing chunk.
    pub fn set_chunk(&self, chunk_indices: &[u64], bytes: impl Into<Bytes>) {
        self.chunks.write().insert(chunk_indices.to_vec(), bytes.into());
    }

    /// Erase the chunk at `chunk_indices`.
    ///
    /// Returns true if the chunk existed.
    pub fn erase_chunk(&self, chunk_indices: &[u64]) -> bool {
        self.chunks.write().remove(chunk_indices).is_some()
    }

    /// Return the number of stored chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.read().len()
    }

    /// Return true if no chunks are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.read().is_empty()
    }
}

impl ChunkSource for MemoryChunkStore {
    fn retrieve_chunk(&self, chunk_indices: &[u64]) -> Result<MaybeBytes, StorageError> {
        Ok(self.chunks.read().get(chunk_indices).cloned())
    }
}
