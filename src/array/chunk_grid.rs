//! The regular chunk grid.
//!
//! A regular chunk grid divides an array into chunks of a fixed [`ChunkShape`].
//! The last chunk along an axis may extend beyond the array, in which case only its leading portion holds array elements.

use serde::{Deserialize, Serialize};

use crate::region::Region;

use super::{ArrayIndices, ArrayShape, ChunkShape};

/// A regular chunk grid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegularChunkGrid {
    chunk_shape: ChunkShape,
}

impl RegularChunkGrid {
    /// Create a new regular chunk grid with chunk shape `chunk_shape`.
    #[must_use]
    pub fn new(chunk_shape: ChunkShape) -> Self {
        Self { chunk_shape }
    }

    /// Return the chunk shape.
    #[must_use]
    pub fn chunk_shape(&self) -> &ChunkShape {
        &self.chunk_shape
    }

    /// The dimensionality of the grid.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.chunk_shape.len()
    }

    /// The grid shape (i.e. number of chunks along each axis) of an array with shape `array_shape`.
    ///
    /// `array_shape` must match the dimensionality of the grid.
    #[must_use]
    pub fn grid_shape(&self, array_shape: &[u64]) -> ArrayShape {
        debug_assert_eq!(array_shape.len(), self.dimensionality());
        std::iter::zip(array_shape, self.chunk_shape.iter())
            .map(|(&a, s)| a.div_ceil(s.get()))
            .collect()
    }

    /// The origin (in array space) of the chunk at `chunk_indices`.
    #[must_use]
    pub fn chunk_origin(&self, chunk_indices: &[u64]) -> ArrayIndices {
        debug_assert_eq!(chunk_indices.len(), self.dimensionality());
        std::iter::zip(chunk_indices, self.chunk_shape.iter())
            .map(|(i, s)| i * s.get())
            .collect()
    }

    /// The indices of the chunk holding the element at `array_indices`.
    #[must_use]
    pub fn chunk_indices(&self, array_indices: &[u64]) -> ArrayIndices {
        debug_assert_eq!(array_indices.len(), self.dimensionality());
        std::iter::zip(array_indices, self.chunk_shape.iter())
            .map(|(i, s)| i / s.get())
            .collect()
    }

    /// The indices of the element at `array_indices` within its chunk.
    #[must_use]
    pub fn chunk_element_indices(&self, array_indices: &[u64]) -> ArrayIndices {
        debug_assert_eq!(array_indices.len(), self.dimensionality());
        std::iter::zip(array_indices, self.chunk_shape.iter())
            .map(|(i, s)| i % s.get())
            .collect()
    }

    /// The shape of the chunk at `chunk_indices` cropped to the bounds of an array with shape `array_shape`.
    ///
    /// Along each axis this is `min(chunk_shape, array_shape - chunk_index * chunk_shape)`.
    #[must_use]
    pub fn chunk_shape_bounded(&self, chunk_indices: &[u64], array_shape: &[u64]) -> ArrayShape {
        debug_assert_eq!(chunk_indices.len(), self.dimensionality());
        itertools::izip!(chunk_indices, self.chunk_shape.iter(), array_shape)
            .map(|(&i, s, &a)| std::cmp::min(s.get(), a.saturating_sub(i * s.get())))
            .collect()
    }

    /// The region of the array covered by the chunk at `chunk_indices`, cropped to the bounds of an array with shape `array_shape`.
    #[must_use]
    pub fn chunk_region_bounded(&self, chunk_indices: &[u64], array_shape: &[u64]) -> Region {
        Region::new_with_start_shape_unchecked(
            self.chunk_origin(chunk_indices),
            self.chunk_shape_bounded(chunk_indices, array_shape),
        )
    }

    /// Return true if `chunk_indices` are within the grid of an array with shape `array_shape`.
    #[must_use]
    pub fn chunk_indices_inbounds(&self, chunk_indices: &[u64], array_shape: &[u64]) -> bool {
        chunk_indices.len() == self.dimensionality()
            && std::iter::zip(chunk_indices, self.grid_shape(array_shape))
                .all(|(&i, grid)| i < grid)
    }

    /// The chunks (in chunk grid space) intersecting a non-empty `region`.
    ///
    /// Per axis, this is the inclusive range `start / chunk ..= (end - 1) / chunk`.
    /// Returns [`None`] if `region` is empty.
    #[must_use]
    pub fn chunks_in_region(&self, region: &Region) -> Option<Region> {
        debug_assert_eq!(region.dimensionality(), self.dimensionality());
        let end_inc = region.end_inc()?;
        let chunks_start = self.chunk_indices(region.start());
        let chunks_end_inc = self.chunk_indices(&end_inc);
        Region::new_with_start_end_inc(chunks_start, &chunks_end_inc).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_grid_regular() {
        let array_shape: ArrayShape = vec![5, 7, 52];
        let chunk_grid = RegularChunkGrid::new([1, 2, 3].try_into().unwrap());

        assert_eq!(chunk_grid.dimensionality(), 3);
        assert_eq!(chunk_grid.chunk_origin(&[1, 1, 1]), vec![1, 2, 3]);
        assert_eq!(chunk_grid.grid_shape(&array_shape), vec![5, 4, 18]);

        let array_indices: ArrayIndices = vec![3, 5, 50];
        assert_eq!(chunk_grid.chunk_indices(&array_indices), vec![3, 2, 16]);
        assert_eq!(
            chunk_grid.chunk_element_indices(&array_indices),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn chunk_grid_regular_edge_chunks() {
        let array_shape: ArrayShape = vec![10];
        let chunk_grid = RegularChunkGrid::new([4].try_into().unwrap());
        assert_eq!(chunk_grid.grid_shape(&array_shape), vec![3]);
        assert_eq!(chunk_grid.chunk_shape_bounded(&[0], &array_shape), vec![4]);
        assert_eq!(chunk_grid.chunk_shape_bounded(&[1], &array_shape), vec![4]);
        assert_eq!(chunk_grid.chunk_shape_bounded(&[2], &array_shape), vec![2]);
        assert_eq!(
            chunk_grid.chunk_region_bounded(&[2], &array_shape),
            Region::new_with_ranges(&[8..10])
        );
        assert!(chunk_grid.chunk_indices_inbounds(&[2], &array_shape));
        assert!(!chunk_grid.chunk_indices_inbounds(&[3], &array_shape));
        assert!(!chunk_grid.chunk_indices_inbounds(&[0, 0], &array_shape));
    }

    #[test]
    fn chunk_grid_regular_chunks_in_region() {
        let chunk_grid = RegularChunkGrid::new([4, 3].try_into().unwrap());
        assert_eq!(
            chunk_grid.chunks_in_region(&Region::new_with_ranges(&[3..9, 0..3])),
            Some(Region::new_with_ranges(&[0..3, 0..1]))
        );
        assert_eq!(
            chunk_grid.chunks_in_region(&Region::new_with_ranges(&[4..8, 5..6])),
            Some(Region::new_with_ranges(&[1..2, 1..2]))
        );
        assert_eq!(
            chunk_grid.chunks_in_region(&Region::new_with_ranges(&[4..4, 5..6])),
            None
        );
    }
}
