//! Chunked arrays.
//!
//! An array is described by an [`ArrayDescriptor`]: its logical shape, the [`ChunkShape`] of its regular chunk grid, and the [`ElementEncoding`] of its stored elements.
//!
//! The read path is made up of two pure operations:
//!  - [`resolve_overlaps`] determines the chunks overlapping a requested [`Region`](crate::region::Region), and for each the chunk-local region to read and the destination region to write, and
//!  - [`decode`] converts the raw bytes of a chunk into [`WideInt`] values, widening with the declared signedness.
//!
//! A [`ChunkedArray`] composes these over a [`ChunkSource`](crate::storage::ChunkSource) to read regions of an array.

mod array_descriptor;
mod array_errors;
pub mod chunk_grid;
mod chunk_overlap;
mod chunk_shape;
mod chunked_array;
mod decode;
mod element_encoding;
mod endianness;
mod read_options;
mod unsafe_cell_slice;

pub use self::{
    array_descriptor::{ArrayDescriptor, EdgeChunks},
    array_errors::{
        ArrayError, ElementOutOfRangeError, InvalidFillValueError, MalformedChunkError,
        OutOfBoundsError, ShapeMismatchError, UnsupportedElementEncodingError,
    },
    chunk_overlap::{resolve_overlaps, ChunkOverlap, ChunkOverlaps},
    chunk_shape::{chunk_shape_to_array_shape, ChunkShape},
    chunked_array::ChunkedArray,
    decode::{decode, decode_into},
    element_encoding::{ElementEncoding, ElementWidth, Signedness},
    endianness::{Endianness, NATIVE_ENDIAN},
    read_options::{ReadOptions, ReadOptionsBuilder},
};

pub(crate) use unsafe_cell_slice::UnsafeCellSlice;

/// An ND index to an element in an array.
pub type ArrayIndices = Vec<u64>;

/// The shape of an array.
pub type ArrayShape = Vec<u64>;

/// The integer type decoded elements are widened into.
///
/// Holds every value of every supported [`ElementEncoding`], from `i64::MIN` to `u64::MAX`.
pub type WideInt = i128;

/// Convert ND `indices` within an array of `shape` to a row-major linearised index.
#[must_use]
pub fn ravel_indices(indices: &[u64], shape: &[u64]) -> u64 {
    let mut index: u64 = 0;
    let mut count = 1;
    for (i, s) in std::iter::zip(indices, shape).rev() {
        index += i * count;
        count *= s;
    }
    index
}

/// Convert a row-major linearised `index` within an array of `shape` to ND indices.
#[must_use]
pub fn unravel_index(mut index: u64, shape: &[u64]) -> ArrayIndices {
    let mut indices = vec![0; shape.len()];
    for (out, &s) in std::iter::zip(indices.iter_mut().rev(), shape.iter().rev()) {
        *out = index % s;
        index /= s;
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_ravel_unravel() {
        let shape = [3, 4, 5];
        assert_eq!(ravel_indices(&[0, 0, 0], &shape), 0);
        assert_eq!(ravel_indices(&[1, 2, 3], &shape), 33);
        assert_eq!(unravel_index(33, &shape), vec![1, 2, 3]);
        assert_eq!(unravel_index(59, &shape), vec![2, 3, 4]);
    }
}
