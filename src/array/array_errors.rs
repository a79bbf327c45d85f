use thiserror::Error;

use crate::{
    region::{Region, RegionRequestError},
    storage::StorageError,
};

use super::{ArrayIndices, ArrayShape, ElementEncoding, WideInt};

/// A requested region exceeds the logical extent of an array.
#[derive(Clone, Debug, Error)]
#[error("region {0} is out of bounds of array shape {1:?}")]
pub struct OutOfBoundsError(Region, ArrayShape);

impl OutOfBoundsError {
    /// Create a new out of bounds error.
    #[must_use]
    pub const fn new(region: Region, array_shape: ArrayShape) -> Self {
        Self(region, array_shape)
    }

    /// Return the offending region.
    #[must_use]
    pub fn region(&self) -> &Region {
        &self.0
    }
}

/// A shape mismatch error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ShapeMismatchError {
    /// The dimensionality (rank) of two shapes or indices does not match.
    #[error("incompatible dimensionality {got}, expected {expected}")]
    Dimensionality {
        /// The received dimensionality.
        got: usize,
        /// The expected dimensionality.
        expected: usize,
    },
    /// A shape has a zero-length dimension where every dimension must be positive.
    #[error("shape {shape:?} has a zero-length dimension on axis {axis}")]
    ZeroExtent {
        /// The first axis with zero length.
        axis: usize,
        /// The offending shape.
        shape: ArrayShape,
    },
    /// The number of elements of a shape is not representable as a [`u64`].
    #[error("shape {shape:?} has more than u64::MAX elements")]
    ElementCountOverflow {
        /// The offending shape.
        shape: ArrayShape,
    },
}

/// The decoded bytes of a chunk do not agree with its declared encoding and element count.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("malformed chunk: got {got} bytes, expected {expected} ({count} elements of {width} bytes)")]
pub struct MalformedChunkError {
    got: usize,
    expected: u64,
    count: u64,
    width: usize,
}

impl MalformedChunkError {
    /// Create a new malformed chunk error.
    #[must_use]
    pub fn new(got: usize, count: u64, width: usize) -> Self {
        Self {
            got,
            expected: count.saturating_mul(width as u64),
            count,
            width,
        }
    }

    /// Return the number of bytes received.
    #[must_use]
    pub const fn got(&self) -> usize {
        self.got
    }

    /// Return the number of bytes expected.
    #[must_use]
    pub const fn expected(&self) -> u64 {
        self.expected
    }
}

/// A fill value that is not representable in the element encoding of an array.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("fill value {fill_value} is not representable with element encoding {encoding}")]
pub struct InvalidFillValueError {
    fill_value: WideInt,
    encoding: ElementEncoding,
}

impl InvalidFillValueError {
    /// Create a new invalid fill value error.
    #[must_use]
    pub const fn new(fill_value: WideInt, encoding: ElementEncoding) -> Self {
        Self {
            fill_value,
            encoding,
        }
    }

    /// Return the rejected fill value.
    #[must_use]
    pub const fn fill_value(&self) -> WideInt {
        self.fill_value
    }
}

/// An unsupported element encoding.
#[derive(Clone, Debug, Error)]
#[error("unsupported element encoding {0}")]
pub struct UnsupportedElementEncodingError(String);

impl UnsupportedElementEncodingError {
    /// Create a new unsupported element encoding error.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }
}

/// A decoded value does not fit the requested element type.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("decoded value {value} is out of range of {type_name}")]
pub struct ElementOutOfRangeError {
    value: WideInt,
    type_name: &'static str,
}

impl ElementOutOfRangeError {
    /// Create a new element out of range error.
    #[must_use]
    pub const fn new(value: WideInt, type_name: &'static str) -> Self {
        Self { value, type_name }
    }

    /// Return the value that could not be represented.
    #[must_use]
    pub const fn value(&self) -> WideInt {
        self.value
    }
}

/// Array errors.
#[derive(Debug, Error)]
pub enum ArrayError {
    /// A region out of bounds of the array.
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBoundsError),
    /// A shape mismatch.
    #[error(transparent)]
    ShapeMismatch(#[from] ShapeMismatchError),
    /// A malformed chunk.
    #[error("chunk {0:?}: {1}")]
    MalformedChunk(ArrayIndices, MalformedChunkError),
    /// A decoded value out of range of the requested element type.
    #[error(transparent)]
    ElementOutOfRange(#[from] ElementOutOfRangeError),
    /// An invalid fill value.
    #[error(transparent)]
    InvalidFillValue(#[from] InvalidFillValueError),
    /// A storage error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// Chunk indices outside of the chunk grid.
    #[error("chunk indices {0:?} are not within chunk grid shape {1:?}")]
    InvalidChunkIndices(ArrayIndices, ArrayShape),
    /// A chunk is absent from storage and missing chunks are not filled.
    #[error("chunk {0:?} is missing")]
    MissingChunk(ArrayIndices),
    /// A number of elements incompatible with a shape.
    #[error("{0} elements cannot be arranged with shape {1:?}")]
    InvalidElementCount(usize, ArrayShape),
}

impl From<RegionRequestError> for ArrayError {
    fn from(err: RegionRequestError) -> Self {
        match err {
            RegionRequestError::ShapeMismatch(err) => Self::ShapeMismatch(err),
            RegionRequestError::OutOfBounds(err) => Self::OutOfBounds(err),
        }
    }
}
