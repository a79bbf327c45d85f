//! Regions.
//!
//! A [`Region`] is an axis-aligned sub-rectangle of an array, defined by a start (offset) and a shape.
//! Regions are used both in array space (the region requested by a caller) and in chunk grid space (the chunks overlapping a region).
//!
//! Regions can produce iterators over their [indices](Region::iter_indices) and over the [contiguous runs](Region::iter_contiguous_runs) they occupy in a row-major array.

mod iterators;

pub use iterators::{ContiguousRunsIterator, IndicesIterator};

use std::ops::Range;

use derive_more::Display;
use itertools::izip;
use serde::{Deserialize, Serialize};

use crate::array::{ArrayIndices, ArrayShape, OutOfBoundsError, ShapeMismatchError};

/// An axis-aligned region of an array.
#[derive(
    Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Default, Serialize, Deserialize,
)]
#[display("start {start:?} shape {shape:?}")]
pub struct Region {
    /// The start (offset) of the region.
    start: ArrayIndices,
    /// The shape of the region.
    shape: ArrayShape,
}

impl Region {
    /// Create a new region with `shape` starting at the origin.
    #[must_use]
    pub fn new_with_shape(shape: ArrayShape) -> Self {
        Self {
            start: vec![0; shape.len()],
            shape,
        }
    }

    /// Create a new region from a start and shape.
    ///
    /// # Errors
    /// Returns [`ShapeMismatchError`] if the lengths of `start` and `shape` do not match.
    pub fn new_with_start_shape(
        start: ArrayIndices,
        shape: ArrayShape,
    ) -> Result<Self, ShapeMismatchError> {
        if start.len() == shape.len() {
            Ok(Self { start, shape })
        } else {
            Err(ShapeMismatchError::Dimensionality {
                got: start.len(),
                expected: shape.len(),
            })
        }
    }

    /// Create a new region from a start and shape without checking their lengths match.
    pub(crate) fn new_with_start_shape_unchecked(start: ArrayIndices, shape: ArrayShape) -> Self {
        debug_assert_eq!(start.len(), shape.len());
        Self { start, shape }
    }

    /// Create a new region from per-axis ranges.
    ///
    /// A range with `end < start` has zero length.
    #[must_use]
    pub fn new_with_ranges(ranges: &[Range<u64>]) -> Self {
        let start = ranges.iter().map(|range| range.start).collect();
        let shape = ranges
            .iter()
            .map(|range| range.end.saturating_sub(range.start))
            .collect();
        Self { start, shape }
    }

    /// Create a new region from a start and an inclusive end.
    ///
    /// # Errors
    /// Returns [`ShapeMismatchError`] if the lengths of `start` and `end` do not match.
    pub fn new_with_start_end_inc(
        start: ArrayIndices,
        end: &[u64],
    ) -> Result<Self, ShapeMismatchError> {
        if start.len() != end.len() {
            return Err(ShapeMismatchError::Dimensionality {
                got: end.len(),
                expected: start.len(),
            });
        }
        let shape = std::iter::zip(&start, end)
            .map(|(&start, &end)| end.saturating_sub(start) + 1)
            .collect();
        Ok(Self { start, shape })
    }

    /// Return the start of the region.
    #[must_use]
    pub fn start(&self) -> &[u64] {
        &self.start
    }

    /// Return the shape of the region.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// Return the per-axis ranges of the region.
    #[must_use]
    pub fn to_ranges(&self) -> Vec<Range<u64>> {
        std::iter::zip(&self.start, &self.shape)
            .map(|(&start, &size)| start..start + size)
            .collect()
    }

    /// Return the dimensionality of the region.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.start.len()
    }

    /// Return the end (exclusive) of the region.
    #[must_use]
    pub fn end_exc(&self) -> ArrayIndices {
        std::iter::zip(&self.start, &self.shape)
            .map(|(start, size)| start + size)
            .collect()
    }

    /// Return the end (inclusive) of the region.
    ///
    /// Returns [`None`] if the region is empty.
    #[must_use]
    pub fn end_inc(&self) -> Option<ArrayIndices> {
        if self.is_empty() {
            None
        } else {
            Some(
                std::iter::zip(&self.start, &self.shape)
                    .map(|(start, size)| start + size - 1)
                    .collect(),
            )
        }
    }

    /// Return the number of elements of the region.
    ///
    /// Equal to the product of the components of its shape, saturating at [`u64::MAX`].
    /// See [`num_elements_checked()`](Self::num_elements_checked()) to detect overflow.
    #[must_use]
    pub fn num_elements(&self) -> u64 {
        self.num_elements_checked().unwrap_or(u64::MAX)
    }

    /// Return the number of elements of the region, or [`None`] if it exceeds [`u64::MAX`].
    #[must_use]
    pub fn num_elements_checked(&self) -> Option<u64> {
        shape_num_elements(&self.shape)
    }

    /// Return the number of elements of the region as a `usize`.
    ///
    /// # Panics
    /// Panics if [`num_elements()`](Self::num_elements()) is greater than [`usize::MAX`].
    #[must_use]
    pub fn num_elements_usize(&self) -> usize {
        usize::try_from(self.num_elements()).unwrap()
    }

    /// Returns true if any dimension of the region has zero length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shape.iter().any(|&size| size == 0)
    }

    /// Returns true if the region is within the bounds of `array_shape`.
    #[must_use]
    pub fn inbounds(&self, array_shape: &[u64]) -> bool {
        self.dimensionality() == array_shape.len()
            && izip!(&self.start, &self.shape, array_shape).all(|(&start, &size, &extent)| {
                start
                    .checked_add(size)
                    .is_some_and(|end| end <= extent)
            })
    }

    /// Validate the region as a read request against an array with shape `array_shape`.
    ///
    /// # Errors
    /// Returns a [`ShapeMismatchError`] if the dimensionality does not match, the region has a zero-length dimension, or its element count exceeds [`u64::MAX`].
    /// Returns an [`OutOfBoundsError`] if the region extends beyond `array_shape` on any axis.
    pub fn validate_request(&self, array_shape: &[u64]) -> Result<(), RegionRequestError> {
        // a deserialised region may have mismatched start and shape lengths
        for rank in [self.start.len(), self.shape.len()] {
            if rank != array_shape.len() {
                return Err(ShapeMismatchError::Dimensionality {
                    got: rank,
                    expected: array_shape.len(),
                }
                .into());
            }
        }
        if let Some(axis) = self.shape.iter().position(|&size| size == 0) {
            return Err(ShapeMismatchError::ZeroExtent {
                axis,
                shape: self.shape.clone(),
            }
            .into());
        }
        if self.num_elements_checked().is_none() {
            return Err(ShapeMismatchError::ElementCountOverflow {
                shape: self.shape.clone(),
            }
            .into());
        }
        if !self.inbounds(array_shape) {
            return Err(OutOfBoundsError::new(self.clone(), array_shape.to_vec()).into());
        }
        Ok(())
    }

    /// Return the overlapping region between this region and `other`.
    ///
    /// # Errors
    /// Returns [`ShapeMismatchError`] if the dimensionality of `other` does not match.
    pub fn overlap(&self, other: &Region) -> Result<Self, ShapeMismatchError> {
        if other.dimensionality() != self.dimensionality() {
            return Err(ShapeMismatchError::Dimensionality {
                got: other.dimensionality(),
                expected: self.dimensionality(),
            });
        }
        let mut start = Vec::with_capacity(self.dimensionality());
        let mut shape = Vec::with_capacity(self.dimensionality());
        for (&start_a, &size_a, &start_b, &size_b) in
            izip!(&self.start, &self.shape, &other.start, &other.shape)
        {
            let overlap_start = std::cmp::max(start_a, start_b);
            let overlap_end = std::cmp::min(start_a + size_a, start_b + size_b);
            start.push(overlap_start);
            shape.push(overlap_end.saturating_sub(overlap_start));
        }
        Ok(Self { start, shape })
    }

    /// Return this region with its start made relative to `origin`.
    ///
    /// # Errors
    /// Returns [`ShapeMismatchError`] if the length of `origin` does not match the dimensionality, or [`OutOfBoundsError`] if `origin` exceeds the start on any axis.
    pub fn relative_to(&self, origin: &[u64]) -> Result<Self, RegionRequestError> {
        if origin.len() != self.dimensionality() {
            return Err(ShapeMismatchError::Dimensionality {
                got: origin.len(),
                expected: self.dimensionality(),
            }
            .into());
        }
        let start = std::iter::zip(&self.start, origin)
            .map(|(&start, &origin)| start.checked_sub(origin))
            .collect::<Option<ArrayIndices>>()
            .ok_or_else(|| OutOfBoundsError::new(self.clone(), origin.to_vec()))?;
        Ok(Self {
            start,
            shape: self.shape.clone(),
        })
    }

    /// Returns an iterator over the indices of elements within the region in row-major order.
    #[must_use]
    pub fn iter_indices(&self) -> IndicesIterator {
        IndicesIterator::new(self.clone())
    }

    /// Returns an iterator over the contiguous runs of this region within a row-major array of shape `array_shape`.
    ///
    /// Each item is a (linearised index, run length) tuple.
    ///
    /// # Errors
    /// Returns [`OutOfBoundsError`] if `array_shape` does not encapsulate this region or has more than [`u64::MAX`] elements.
    pub fn iter_contiguous_runs(
        &self,
        array_shape: &[u64],
    ) -> Result<ContiguousRunsIterator, OutOfBoundsError> {
        if self.inbounds(array_shape) && shape_num_elements(array_shape).is_some() {
            Ok(ContiguousRunsIterator::new(self, array_shape))
        } else {
            Err(OutOfBoundsError::new(self.clone(), array_shape.to_vec()))
        }
    }
}

/// Return the number of elements of `shape`, or [`None`] if it exceeds [`u64::MAX`].
#[must_use]
pub fn shape_num_elements(shape: &[u64]) -> Option<u64> {
    shape
        .iter()
        .try_fold(1u64, |count, &size| count.checked_mul(size))
}

/// A region request error.
#[derive(Debug, thiserror::Error, derive_more::From)]
pub enum RegionRequestError {
    /// A shape mismatch.
    #[error(transparent)]
    ShapeMismatch(ShapeMismatchError),
    /// An out of bounds region.
    #[error(transparent)]
    OutOfBounds(OutOfBoundsError),
}
