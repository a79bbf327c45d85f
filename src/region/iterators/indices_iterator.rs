use std::iter::FusedIterator;

use itertools::izip;

use crate::{array::ArrayIndices, region::Region};

/// Iterates over element indices in a region in row-major order (last axis fastest).
pub struct IndicesIterator {
    region: Region,
    index: u64,
    length: u64,
}

impl IndicesIterator {
    /// Create a new indices iterator.
    #[must_use]
    pub fn new(region: Region) -> Self {
        let length = region.num_elements();
        Self {
            region,
            index: 0,
            length,
        }
    }
}

impl Iterator for IndicesIterator {
    type Item = ArrayIndices;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.length {
            return None;
        }
        let mut current = self.index;
        let mut indices = vec![0; self.region.dimensionality()];
        for (out, &start, &size) in izip!(
            indices.iter_mut().rev(),
            self.region.start().iter().rev(),
            self.region.shape().iter().rev(),
        ) {
            *out = start + current % size;
            current /= size;
        }
        self.index += 1;
        Some(indices)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.length - self.index).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for IndicesIterator {}

impl FusedIterator for IndicesIterator {}
