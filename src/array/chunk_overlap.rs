use std::iter::FusedIterator;

use itertools::izip;

use crate::region::{IndicesIterator, Region};

use super::{ArrayDescriptor, ArrayError, ArrayIndices, ArrayShape, OutOfBoundsError};

/// The overlap of a requested region with one chunk.
///
/// The chunk region is relative to the origin of the chunk, and the output region is relative to the start of the requested region.
/// Both regions have the same shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChunkOverlap {
    chunk_indices: ArrayIndices,
    stored_chunk_shape: ArrayShape,
    chunk_region: Region,
    output_region: Region,
}

impl ChunkOverlap {
    /// Return the indices of the chunk in the chunk grid.
    #[must_use]
    pub fn chunk_indices(&self) -> &[u64] {
        &self.chunk_indices
    }

    /// Return the shape the chunk is stored with.
    #[must_use]
    pub fn stored_chunk_shape(&self) -> &[u64] {
        &self.stored_chunk_shape
    }

    /// Return the region to read, relative to the chunk origin.
    #[must_use]
    pub fn chunk_region(&self) -> &Region {
        &self.chunk_region
    }

    /// Return the region to write, relative to the start of the requested region.
    #[must_use]
    pub fn output_region(&self) -> &Region {
        &self.output_region
    }

    /// Return the number of elements in the overlap.
    #[must_use]
    pub fn num_elements(&self) -> u64 {
        self.output_region.num_elements()
    }
}

/// Iterates over the [`ChunkOverlap`]s of a region in row-major order of chunk grid indices (last axis fastest).
pub struct ChunkOverlaps<'a> {
    descriptor: &'a ArrayDescriptor,
    region: Region,
    chunks: IndicesIterator,
}

impl<'a> ChunkOverlaps<'a> {
    /// Create a new chunk overlaps iterator for `region` of an array described by `descriptor`.
    ///
    /// # Errors
    /// Returns [`ArrayError::ShapeMismatch`] if the dimensionality of `region` does not match the array or it has a zero-length dimension.
    /// Returns [`ArrayError::OutOfBounds`] if `region` extends beyond the array.
    pub fn new(descriptor: &'a ArrayDescriptor, region: &Region) -> Result<Self, ArrayError> {
        region.validate_request(descriptor.shape())?;
        let Some(chunks) = descriptor.chunks_in_region(region) else {
            return Err(OutOfBoundsError::new(region.clone(), descriptor.shape().to_vec()).into());
        };
        Ok(Self {
            descriptor,
            region: region.clone(),
            chunks: chunks.iter_indices(),
        })
    }

    fn overlap(&self, chunk_indices: ArrayIndices) -> ChunkOverlap {
        let dimensionality = self.region.dimensionality();
        let mut chunk_start = Vec::with_capacity(dimensionality);
        let mut output_start = Vec::with_capacity(dimensionality);
        let mut overlap_shape = Vec::with_capacity(dimensionality);
        for (&chunk_index, chunk_size, &array_size, &region_start, &region_size) in izip!(
            &chunk_indices,
            self.descriptor.chunk_shape().iter(),
            self.descriptor.shape(),
            self.region.start(),
            self.region.shape(),
        ) {
            let chunk_origin = chunk_index * chunk_size.get();
            let chunk_end = chunk_origin + std::cmp::min(chunk_size.get(), array_size - chunk_origin);
            let start = std::cmp::max(chunk_origin, region_start);
            let end = std::cmp::min(chunk_end, region_start + region_size);
            chunk_start.push(start - chunk_origin);
            output_start.push(start - region_start);
            overlap_shape.push(end - start);
        }
        let stored_chunk_shape = self.descriptor.stored_chunk_shape(&chunk_indices);
        ChunkOverlap {
            chunk_indices,
            stored_chunk_shape,
            chunk_region: Region::new_with_start_shape_unchecked(
                chunk_start,
                overlap_shape.clone(),
            ),
            output_region: Region::new_with_start_shape_unchecked(output_start, overlap_shape),
        }
    }
}

impl Iterator for ChunkOverlaps<'_> {
    type Item = ChunkOverlap;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks
            .next()
            .map(|chunk_indices| self.overlap(chunk_indices))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for ChunkOverlaps<'_> {}

impl FusedIterator for ChunkOverlaps<'_> {}

/// Resolve the chunks overlapping `region` of an array described by `descriptor`.
///
/// Overlaps are ordered row-major over chunk grid indices (last axis fastest).
/// The output regions of the overlaps tile the requested region exactly, without gaps or overlaps.
///
/// # Errors
/// Returns [`ArrayError::ShapeMismatch`] if the dimensionality of `region` does not match the array or it has a zero-length dimension.
/// Returns [`ArrayError::OutOfBounds`] if `region` extends beyond the array.
pub fn resolve_overlaps(
    descriptor: &ArrayDescriptor,
    region: &Region,
) -> Result<Vec<ChunkOverlap>, ArrayError> {
    let overlaps: Vec<ChunkOverlap> = ChunkOverlaps::new(descriptor, region)?.collect();
    log::trace!("region {region} overlaps {} chunks", overlaps.len());
    Ok(overlaps)
}

#[cfg(test)]
mod tests {
    use crate::array::{
        ravel_indices, EdgeChunks, ElementEncoding, Endianness, ShapeMismatchError,
    };

    use super::*;

    fn descriptor(shape: &[u64], chunk_shape: &[u64]) -> ArrayDescriptor {
        ArrayDescriptor::new(
            shape.to_vec(),
            chunk_shape.try_into().unwrap(),
            ElementEncoding::new_unsigned(2, Endianness::Little).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn resolve_overlaps_edge_chunk() {
        let descriptor = descriptor(&[10], &[4]);
        let overlaps =
            resolve_overlaps(&descriptor, &Region::new_with_ranges(&[8..10])).unwrap();
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].chunk_indices(), &[2]);
        assert_eq!(overlaps[0].chunk_region(), &Region::new_with_ranges(&[0..2]));
        assert_eq!(overlaps[0].output_region(), &Region::new_with_ranges(&[0..2]));
        assert_eq!(overlaps[0].stored_chunk_shape(), &[4]);
    }

    #[test]
    fn resolve_overlaps_multi_chunk() {
        let descriptor = descriptor(&[10], &[4]);
        let overlaps =
            resolve_overlaps(&descriptor, &Region::new_with_ranges(&[0..10])).unwrap();
        let chunk_indices: Vec<_> = overlaps
            .iter()
            .map(|overlap| overlap.chunk_indices().to_vec())
            .collect();
        assert_eq!(chunk_indices, vec![vec![0], vec![1], vec![2]]);
        assert_eq!(overlaps[0].chunk_region(), &Region::new_with_ranges(&[0..4]));
        assert_eq!(overlaps[1].output_region(), &Region::new_with_ranges(&[4..8]));
        assert_eq!(overlaps[2].chunk_region(), &Region::new_with_ranges(&[0..2]));
        assert_eq!(overlaps[2].output_region(), &Region::new_with_ranges(&[8..10]));
    }

    #[test]
    fn resolve_overlaps_partial_first_chunk() {
        let descriptor = descriptor(&[10], &[4]);
        let overlaps =
            resolve_overlaps(&descriptor, &Region::new_with_ranges(&[3..6])).unwrap();
        assert_eq!(overlaps.len(), 2);
        assert_eq!(overlaps[0].chunk_region(), &Region::new_with_ranges(&[3..4]));
        assert_eq!(overlaps[0].output_region(), &Region::new_with_ranges(&[0..1]));
        assert_eq!(overlaps[1].chunk_region(), &Region::new_with_ranges(&[0..2]));
        assert_eq!(overlaps[1].output_region(), &Region::new_with_ranges(&[1..3]));
    }

    #[test]
    fn resolve_overlaps_row_major_order() {
        let descriptor = descriptor(&[6, 6], &[3, 2]);
        let overlaps = ChunkOverlaps::new(&descriptor, &Region::new_with_ranges(&[2..4, 1..5]))
            .unwrap();
        assert_eq!(overlaps.len(), 6);
        let chunk_indices: Vec<_> = overlaps.map(|overlap| overlap.chunk_indices().to_vec()).collect();
        assert_eq!(
            chunk_indices,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2]
            ]
        );
    }

    #[test]
    fn resolve_overlaps_truncated_edge_chunks() {
        let descriptor = descriptor(&[10, 5], &[4, 4]).with_edge_chunks(EdgeChunks::Truncated);
        let overlaps = resolve_overlaps(&descriptor, &descriptor.region_all()).unwrap();
        let stored: Vec<_> = overlaps
            .iter()
            .map(|overlap| overlap.stored_chunk_shape().to_vec())
            .collect();
        assert_eq!(
            stored,
            vec![vec![4, 4], vec![4, 1], vec![4, 4], vec![4, 1], vec![2, 4], vec![2, 1]]
        );
    }

    #[test]
    fn resolve_overlaps_out_of_bounds() {
        let descriptor = descriptor(&[10], &[4]);
        assert!(matches!(
            resolve_overlaps(&descriptor, &Region::new_with_ranges(&[8..11])),
            Err(ArrayError::OutOfBounds(_))
        ));
        let overflowing = Region::new_with_start_shape(vec![u64::MAX], vec![2]).unwrap();
        assert!(matches!(
            resolve_overlaps(&descriptor, &overflowing),
            Err(ArrayError::OutOfBounds(_))
        ));
    }

    #[test]
    fn resolve_overlaps_large_array() {
        assert!(matches!(
            ArrayDescriptor::new(
                vec![1 << 33, 1 << 33],
                [1, 1].try_into().unwrap(),
                ElementEncoding::new_unsigned(2, Endianness::Little).unwrap(),
            ),
            Err(ShapeMismatchError::ElementCountOverflow { .. })
        ));

        let descriptor = descriptor(&[1 << 32, 1 << 31], &[1, 1]);
        let mut overlaps = ChunkOverlaps::new(&descriptor, &descriptor.region_all()).unwrap();
        let first = overlaps.next().unwrap();
        assert_eq!(first.chunk_indices(), &[0, 0]);
        assert_eq!(first.output_region(), &Region::new_with_ranges(&[0..1, 0..1]));
        let second = overlaps.next().unwrap();
        assert_eq!(second.chunk_indices(), &[0, 1]);
        assert_eq!(second.output_region(), &Region::new_with_ranges(&[0..1, 1..2]));

        let corner = Region::new_with_ranges(&[(1 << 32) - 1..1 << 32, (1 << 31) - 2..1 << 31]);
        let overlaps = resolve_overlaps(&descriptor, &corner).unwrap();
        let chunk_indices: Vec<_> = overlaps
            .iter()
            .map(|overlap| overlap.chunk_indices().to_vec())
            .collect();
        assert_eq!(
            chunk_indices,
            vec![
                vec![(1 << 32) - 1, (1 << 31) - 2],
                vec![(1 << 32) - 1, (1 << 31) - 1]
            ]
        );
    }

    #[test]
    fn resolve_overlaps_shape_mismatch() {
        let descriptor = descriptor(&[10], &[4]);
        assert!(matches!(
            resolve_overlaps(&descriptor, &Region::new_with_ranges(&[0..2, 0..2])),
            Err(ArrayError::ShapeMismatch(ShapeMismatchError::Dimensionality {
                got: 2,
                expected: 1
            }))
        ));
        assert!(matches!(
            resolve_overlaps(&descriptor, &Region::new_with_ranges(&[4..4])),
            Err(ArrayError::ShapeMismatch(ShapeMismatchError::ZeroExtent { .. }))
        ));
    }

    /// Check that the output regions tile `region` exactly and each element maps back to the same array element.
    fn check_tiling(descriptor: &ArrayDescriptor, region: &Region) {
        let mut coverage = vec![0u8; region.num_elements_usize()];
        for overlap in resolve_overlaps(descriptor, region).unwrap() {
            let chunk_origin = descriptor.chunk_grid().chunk_origin(overlap.chunk_indices());
            assert!(overlap
                .chunk_region()
                .inbounds(overlap.stored_chunk_shape()));
            assert!(overlap
                .chunk_region()
                .inbounds(descriptor.chunk_region(overlap.chunk_indices()).shape()));
            for (chunk_element, output_element) in std::iter::zip(
                overlap.chunk_region().iter_indices(),
                overlap.output_region().iter_indices(),
            ) {
                let from_chunk: Vec<u64> = std::iter::zip(&chunk_origin, &chunk_element)
                    .map(|(o, i)| o + i)
                    .collect();
                let from_output: Vec<u64> = std::iter::zip(region.start(), &output_element)
                    .map(|(o, i)| o + i)
                    .collect();
                assert_eq!(from_chunk, from_output);
                let index = usize::try_from(ravel_indices(&output_element, region.shape()))
                    .unwrap();
                coverage[index] += 1;
            }
        }
        assert!(
            coverage.iter().all(|&count| count == 1),
            "region {region} is not tiled exactly by its chunk overlaps"
        );
    }

    #[test]
    fn resolve_overlaps_tile_region_1d() {
        for array_size in 1..=9 {
            for chunk_size in 1..=array_size + 1 {
                let descriptor = descriptor(&[array_size], &[chunk_size]);
                for start in 0..array_size {
                    for end in start + 1..=array_size {
                        check_tiling(&descriptor, &Region::new_with_ranges(&[start..end]));
                    }
                }
            }
        }
    }

    #[test]
    fn resolve_overlaps_tile_region_3d() {
        let descriptor = descriptor(&[7, 5, 6], &[3, 2, 4]);
        for region in [
            descriptor.region_all(),
            Region::new_with_ranges(&[1..6, 1..4, 3..5]),
            Region::new_with_ranges(&[6..7, 0..5, 5..6]),
            Region::new_with_ranges(&[2..3, 3..4, 0..1]),
        ] {
            check_tiling(&descriptor, &region);
            check_tiling(
                &descriptor.clone().with_edge_chunks(EdgeChunks::Truncated),
                &region,
            );
        }
    }
}
