//! Region reads over chunked N-dimensional integer arrays.
//!
//! A chunked array store splits a large logical array into a regular grid of fixed-size chunks, each of which is stored (and compressed) independently.
//! Reading an arbitrary axis-aligned [`Region`](region::Region) therefore involves:
//!  - resolving which chunks overlap the region and which part of each chunk lands where in the output ([`resolve_overlaps`](array::resolve_overlaps)), and
//!  - decoding the raw bytes of each chunk according to its declared element encoding ([`decode`](array::decode)).
//!
//! Decoding always widens into [`WideInt`](array::WideInt) using the declared signedness of the stored elements.
//! Unsigned data is zero-extended and signed data is sign-extended, so a `uint16` element holding `65535` is never observed as `-1`.
//!
//! Storage I/O and compression are external collaborators, represented by the [`ChunkSource`](storage::ChunkSource) trait.
//! A [`ChunkedArray`](array::ChunkedArray) ties a source and an [`ArrayDescriptor`](array::ArrayDescriptor) together.
//!
//! ## Example
//! ```rust
//! # use std::sync::Arc;
//! use ndchunk::array::{ArrayDescriptor, ChunkedArray, ElementEncoding, Endianness};
//! use ndchunk::region::Region;
//! use ndchunk::storage::MemoryChunkStore;
//!
//! let descriptor = ArrayDescriptor::new(
//!     vec![10],
//!     vec![4u64].try_into()?,
//!     ElementEncoding::new_unsigned(2, Endianness::Little)?,
//! )?;
//! let store = Arc::new(MemoryChunkStore::new());
//! store.set_chunk(&[2], [0xFF, 0xFF, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00].to_vec());
//!
//! let array = ChunkedArray::new(store, descriptor);
//! let values = array.retrieve_region_elements::<i32>(&Region::new_with_ranges(&[8..10]))?;
//! assert_eq!(values, vec![65535, 1]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crate Features
//! #### Default
//!  - `ndarray`: [`ndarray`] utility functions for [`ChunkedArray`](array::ChunkedArray).
//!
//! ## Licence
//! `ndchunk` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

#![warn(unused_variables)]
#![warn(dead_code)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::missing_panics_doc)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod array;
pub mod config;
pub mod region;
pub mod storage;
