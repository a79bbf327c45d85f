use std::sync::Arc;

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use rayon_iter_concurrent_limit::iter_concurrent_limit;

use crate::{region::Region, storage::ChunkSource};

use super::{
    decode, resolve_overlaps, ArrayDescriptor, ArrayError, ChunkOverlap, ElementOutOfRangeError,
    ReadOptions, UnsafeCellSlice, WideInt,
};

/// A chunked array.
///
/// A chunked array reads regions of an array laid out by an [`ArrayDescriptor`] from the chunks of a [`ChunkSource`].
/// Elements are decoded with their declared [`ElementEncoding`](super::ElementEncoding) and widened into [`WideInt`] without loss.
///
/// Every method has an `_opt` variant taking explicit [`ReadOptions`]; the others use [`ReadOptions::default`].
#[derive(Debug)]
pub struct ChunkedArray<S: ?Sized> {
    source: Arc<S>,
    descriptor: ArrayDescriptor,
}

impl<S: ?Sized> Clone for ChunkedArray<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            descriptor: self.descriptor.clone(),
        }
    }
}

impl<S: ChunkSource + ?Sized> ChunkedArray<S> {
    /// Create a chunked array reading chunks from `source` laid out by `descriptor`.
    #[must_use]
    pub fn new(source: Arc<S>, descriptor: ArrayDescriptor) -> Self {
        Self { source, descriptor }
    }

    /// Return the chunk source.
    #[must_use]
    pub fn source(&self) -> Arc<S> {
        self.source.clone()
    }

    /// Return the array descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &ArrayDescriptor {
        &self.descriptor
    }

    /// Return the shape of the array.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        self.descriptor.shape()
    }

    /// Read and decode the chunk at `chunk_indices`.
    ///
    /// The elements are in row-major order with the stored chunk shape (see [`ArrayDescriptor::stored_chunk_shape`]).
    /// If the chunk is absent from the source, it is filled with the fill value.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if:
    ///  - `chunk_indices` are not within the chunk grid,
    ///  - the stored bytes do not hold the stored chunk shape,
    ///  - the chunk is missing and missing chunks are not filled, or
    ///  - there is an underlying storage error.
    pub fn retrieve_chunk(&self, chunk_indices: &[u64]) -> Result<Vec<WideInt>, ArrayError> {
        self.retrieve_chunk_opt(chunk_indices, &ReadOptions::default())
    }

    /// Read and decode `region` of the array.
    ///
    /// Chunks are read sequentially in row-major order of their chunk grid indices.
    /// The elements are in row-major order with the shape of `region`.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if:
    ///  - `region` does not match the dimensionality of the array or has a zero-length dimension,
    ///  - `region` is out of bounds of the array, or
    ///  - retrieving any intersected chunk fails (see [`retrieve_chunk`](ChunkedArray::retrieve_chunk)).
    ///
    /// No partial output is returned on failure.
    pub fn retrieve_region(&self, region: &Region) -> Result<Vec<WideInt>, ArrayError> {
        self.retrieve_region_opt(region, &ReadOptions::default())
    }

    /// Read and decode `region` of the array, retrieving chunks in parallel.
    ///
    /// The output is identical to [`retrieve_region`](ChunkedArray::retrieve_region).
    ///
    /// # Errors
    /// See [`retrieve_region`](ChunkedArray::retrieve_region).
    pub fn par_retrieve_region(&self, region: &Region) -> Result<Vec<WideInt>, ArrayError> {
        self.par_retrieve_region_opt(region, &ReadOptions::default())
    }

    /// Read and decode `region` of the array into elements of type `T`.
    ///
    /// # Errors
    /// Returns [`ArrayError::ElementOutOfRange`] if a decoded element cannot be represented by `T`.
    /// See [`retrieve_region`](ChunkedArray::retrieve_region) for other errors.
    pub fn retrieve_region_elements<T: TryFrom<WideInt> + Send>(
        &self,
        region: &Region,
    ) -> Result<Vec<T>, ArrayError> {
        self.retrieve_region_elements_opt(region, &ReadOptions::default())
    }

    /// Read and decode the block at `offset` with `shape` into elements of type `T`.
    ///
    /// # Errors
    /// Returns [`ArrayError::ShapeMismatch`] if `offset` and `shape` differ in length.
    /// See [`retrieve_region_elements`](ChunkedArray::retrieve_region_elements) for other errors.
    pub fn read_block<T: TryFrom<WideInt> + Send>(
        &self,
        offset: &[u64],
        shape: &[u64],
    ) -> Result<Vec<T>, ArrayError> {
        let region = Region::new_with_start_shape(offset.to_vec(), shape.to_vec())?;
        self.retrieve_region_elements(&region)
    }

    #[cfg(feature = "ndarray")]
    /// Read and decode `region` of the array into an [`ndarray::ArrayD`].
    ///
    /// # Errors
    /// See [`retrieve_region_elements`](ChunkedArray::retrieve_region_elements).
    pub fn retrieve_region_ndarray<T: TryFrom<WideInt> + Send>(
        &self,
        region: &Region,
    ) -> Result<ndarray::ArrayD<T>, ArrayError> {
        self.retrieve_region_ndarray_opt(region, &ReadOptions::default())
    }

    /// Explicit options version of [`retrieve_chunk`](ChunkedArray::retrieve_chunk).
    #[allow(clippy::missing_errors_doc)]
    pub fn retrieve_chunk_opt(
        &self,
        chunk_indices: &[u64],
        options: &ReadOptions,
    ) -> Result<Vec<WideInt>, ArrayError> {
        if !self.descriptor.chunk_indices_inbounds(chunk_indices) {
            return Err(ArrayError::InvalidChunkIndices(
                chunk_indices.to_vec(),
                self.descriptor.chunk_grid_shape(),
            ));
        }
        let stored_chunk = Region::new_with_shape(self.descriptor.stored_chunk_shape(chunk_indices));
        log::trace!("retrieving chunk {chunk_indices:?}");
        match self.source.retrieve_chunk(chunk_indices)? {
            Some(bytes) => decode(
                &bytes,
                self.descriptor.encoding(),
                stored_chunk.num_elements(),
            )
            .map_err(|err| ArrayError::MalformedChunk(chunk_indices.to_vec(), err)),
            None if options.fill_missing_chunks() => {
                log::debug!(
                    "chunk {chunk_indices:?} is missing, filling with {}",
                    self.descriptor.fill_value()
                );
                Ok(vec![
                    self.descriptor.fill_value();
                    stored_chunk.num_elements_usize()
                ])
            }
            None => Err(ArrayError::MissingChunk(chunk_indices.to_vec())),
        }
    }

    /// Explicit options version of [`retrieve_region`](ChunkedArray::retrieve_region).
    #[allow(clippy::missing_errors_doc)]
    pub fn retrieve_region_opt(
        &self,
        region: &Region,
        options: &ReadOptions,
    ) -> Result<Vec<WideInt>, ArrayError> {
        let overlaps = resolve_overlaps(&self.descriptor, region)?;
        log::debug!(
            "reading region {region} from {} chunks sequentially",
            overlaps.len()
        );
        let mut output = vec![self.descriptor.fill_value(); region.num_elements_usize()];
        for overlap in &overlaps {
            let chunk = self.retrieve_chunk_opt(overlap.chunk_indices(), options)?;
            copy_overlap(&chunk, overlap, &mut output, region.shape())?;
        }
        Ok(output)
    }

    /// Explicit options version of [`par_retrieve_region`](ChunkedArray::par_retrieve_region).
    #[allow(clippy::missing_errors_doc)]
    pub fn par_retrieve_region_opt(
        &self,
        region: &Region,
        options: &ReadOptions,
    ) -> Result<Vec<WideInt>, ArrayError> {
        let overlaps = resolve_overlaps(&self.descriptor, region)?;
        let chunk_concurrent_limit = options.chunk_concurrent_limit().max(1);
        log::debug!(
            "reading region {region} from {} chunks with concurrency {chunk_concurrent_limit}",
            overlaps.len()
        );
        let mut output = vec![self.descriptor.fill_value(); region.num_elements_usize()];
        {
            let output = UnsafeCellSlice::new(&mut output);
            let retrieve_overlap = |overlap: ChunkOverlap| {
                let chunk = self.retrieve_chunk_opt(overlap.chunk_indices(), options)?;
                // Output regions of distinct overlaps are disjoint
                copy_overlap(&chunk, &overlap, unsafe { output.get() }, region.shape())
            };
            iter_concurrent_limit!(
                chunk_concurrent_limit,
                overlaps,
                try_for_each,
                retrieve_overlap
            )?;
        }
        Ok(output)
    }

    /// Explicit options version of [`retrieve_region_elements`](ChunkedArray::retrieve_region_elements).
    #[allow(clippy::missing_errors_doc)]
    pub fn retrieve_region_elements_opt<T: TryFrom<WideInt> + Send>(
        &self,
        region: &Region,
        options: &ReadOptions,
    ) -> Result<Vec<T>, ArrayError> {
        let elements = self.par_retrieve_region_opt(region, options)?;
        elements
            .into_par_iter()
            .map(|element| {
                T::try_from(element).map_err(|_| {
                    ArrayError::from(ElementOutOfRangeError::new(
                        element,
                        std::any::type_name::<T>(),
                    ))
                })
            })
            .collect()
    }

    #[cfg(feature = "ndarray")]
    /// Explicit options version of [`retrieve_region_ndarray`](ChunkedArray::retrieve_region_ndarray).
    #[allow(clippy::missing_errors_doc)]
    pub fn retrieve_region_ndarray_opt<T: TryFrom<WideInt> + Send>(
        &self,
        region: &Region,
        options: &ReadOptions,
    ) -> Result<ndarray::ArrayD<T>, ArrayError> {
        let elements = self.retrieve_region_elements_opt::<T>(region, options)?;
        elements_to_ndarray(region.shape(), elements)
    }
}

/// Copy the elements of `overlap` from a decoded `chunk` into `output`, a buffer with shape `output_shape`.
///
/// Contiguous runs of the chunk region and the output region can differ in length, so they are consumed in step.
fn copy_overlap(
    chunk: &[WideInt],
    overlap: &ChunkOverlap,
    output: &mut [WideInt],
    output_shape: &[u64],
) -> Result<(), ArrayError> {
    let mut chunk_runs = overlap
        .chunk_region()
        .iter_contiguous_runs(overlap.stored_chunk_shape())?;
    let mut output_runs = overlap.output_region().iter_contiguous_runs(output_shape)?;
    let mut chunk_run = chunk_runs.next();
    let mut output_run = output_runs.next();
    while let (Some((chunk_index, chunk_length)), Some((output_index, output_length))) =
        (chunk_run, output_run)
    {
        let length = std::cmp::min(chunk_length, output_length);
        // Runs index within allocated buffers
        #[allow(clippy::cast_possible_truncation)]
        let (chunk_start, output_start, length_usize) =
            (chunk_index as usize, output_index as usize, length as usize);
        output[output_start..output_start + length_usize]
            .copy_from_slice(&chunk[chunk_start..chunk_start + length_usize]);
        chunk_run = if length == chunk_length {
            chunk_runs.next()
        } else {
            Some((chunk_index + length, chunk_length - length))
        };
        output_run = if length == output_length {
            output_runs.next()
        } else {
            Some((output_index + length, output_length - length))
        };
    }
    Ok(())
}

#[cfg(feature = "ndarray")]
fn elements_to_ndarray<T>(
    shape: &[u64],
    elements: Vec<T>,
) -> Result<ndarray::ArrayD<T>, ArrayError> {
    let length = elements.len();
    let invalid = || ArrayError::InvalidElementCount(length, shape.to_vec());
    let shape = shape
        .iter()
        .map(|&size| usize::try_from(size))
        .collect::<Result<Vec<usize>, _>>()
        .map_err(|_| invalid())?;
    ndarray::ArrayD::<T>::from_shape_vec(shape, elements).map_err(|_| invalid())
}
