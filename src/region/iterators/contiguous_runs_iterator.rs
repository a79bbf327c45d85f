use std::iter::FusedIterator;

use crate::{array::ravel_indices, region::Region};

use super::IndicesIterator;

/// Iterates over the contiguous runs of a region within a row-major array.
///
/// Trailing axes that the region spans completely are merged into a single run.
/// The iterator item is a (linearised index, run length) tuple.
pub struct ContiguousRunsIterator {
    inner: IndicesIterator,
    inner_start: Vec<u64>,
    array_shape: Vec<u64>,
    run_length: u64,
}

impl ContiguousRunsIterator {
    /// Create a new contiguous runs iterator.
    ///
    /// `region` must be within the bounds of `array_shape`.
    pub(crate) fn new(region: &Region, array_shape: &[u64]) -> Self {
        debug_assert!(region.inbounds(array_shape));
        let mut run_length = 1;
        let mut outer_dims = region.dimensionality();
        for (axis, (&size, &extent)) in std::iter::zip(region.shape(), array_shape)
            .enumerate()
            .rev()
        {
            run_length *= size;
            outer_dims = axis;
            if size != extent {
                break;
            }
        }
        let outer = if region.is_empty() {
            Region::new_with_start_shape_unchecked(vec![0], vec![0])
        } else {
            Region::new_with_start_shape_unchecked(
                region.start()[..outer_dims].to_vec(),
                region.shape()[..outer_dims].to_vec(),
            )
        };
        Self {
            inner: IndicesIterator::new(outer),
            inner_start: region.start()[outer_dims..].to_vec(),
            array_shape: array_shape.to_vec(),
            run_length,
        }
    }

    /// Return the number of elements in each run.
    #[must_use]
    pub fn run_length(&self) -> u64 {
        self.run_length
    }
}

impl Iterator for ContiguousRunsIterator {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|mut indices| {
            indices.extend_from_slice(&self.inner_start);
            (ravel_indices(&indices, &self.array_shape), self.run_length)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ContiguousRunsIterator {}

impl FusedIterator for ContiguousRunsIterator {}
