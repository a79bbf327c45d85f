use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::region::{shape_num_elements, Region};

use super::{
    chunk_grid::RegularChunkGrid, ArrayError, ArrayIndices, ArrayShape, ChunkShape,
    ElementEncoding, InvalidFillValueError, ShapeMismatchError, WideInt,
};

/// How the chunks on the trailing edge of an array are stored.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeChunks {
    /// Edge chunks are stored with the full chunk shape; elements beyond the array are padding (Zarr).
    #[default]
    #[display("padded")]
    Padded,
    /// Edge chunks are stored cropped to the bounds of the array (N5).
    #[display("truncated")]
    Truncated,
}

/// The layout of a chunked array: its logical shape, chunk grid, and element encoding.
///
/// A descriptor is immutable once constructed and is validated on construction:
///  - every dimension of the logical shape is non-zero,
///  - the chunk shape has the same dimensionality as the logical shape,
///  - neither shape has more than [`u64::MAX`] elements, and
///  - the fill value is representable in the element encoding.
#[derive(Clone, Debug, PartialEq, Eq, Display, Serialize)]
#[display("{}", serde_json::to_string(self).unwrap_or_default())]
pub struct ArrayDescriptor {
    shape: ArrayShape,
    chunk_grid: RegularChunkGrid,
    encoding: ElementEncoding,
    fill_value: WideInt,
    edge_chunks: EdgeChunks,
}

/// The serialised form of an [`ArrayDescriptor`], validated on deserialisation.
#[derive(Deserialize)]
struct ArrayDescriptorFields {
    shape: ArrayShape,
    chunk_grid: RegularChunkGrid,
    encoding: ElementEncoding,
    #[serde(default)]
    fill_value: WideInt,
    #[serde(default)]
    edge_chunks: EdgeChunks,
}

impl<'de> Deserialize<'de> for ArrayDescriptor {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let fields = ArrayDescriptorFields::deserialize(d)?;
        Self::new(fields.shape, fields.chunk_grid.chunk_shape().clone(), fields.encoding)
            .map_err(ArrayError::from)
            .and_then(|descriptor| {
                descriptor
                    .with_fill_value(fields.fill_value)
                    .map_err(ArrayError::from)
            })
            .map(|descriptor| descriptor.with_edge_chunks(fields.edge_chunks))
            .map_err(serde::de::Error::custom)
    }
}

impl ArrayDescriptor {
    /// Create a new array descriptor with a fill value of zero and [padded](EdgeChunks::Padded) edge chunks.
    ///
    /// # Errors
    /// Returns a [`ShapeMismatchError`] if `shape` has a zero-length dimension, its dimensionality does not match `chunk_shape`, or either shape has more than [`u64::MAX`] elements.
    pub fn new(
        shape: ArrayShape,
        chunk_shape: ChunkShape,
        encoding: ElementEncoding,
    ) -> Result<Self, ShapeMismatchError> {
        if chunk_shape.len() != shape.len() {
            return Err(ShapeMismatchError::Dimensionality {
                got: chunk_shape.len(),
                expected: shape.len(),
            });
        }
        if let Some(axis) = shape.iter().position(|&size| size == 0) {
            return Err(ShapeMismatchError::ZeroExtent { axis, shape });
        }
        if shape_num_elements(&shape).is_none() {
            return Err(ShapeMismatchError::ElementCountOverflow { shape });
        }
        let chunk_array_shape = chunk_shape.to_array_shape();
        if shape_num_elements(&chunk_array_shape).is_none() {
            return Err(ShapeMismatchError::ElementCountOverflow {
                shape: chunk_array_shape,
            });
        }
        Ok(Self {
            shape,
            chunk_grid: RegularChunkGrid::new(chunk_shape),
            encoding,
            fill_value: 0,
            edge_chunks: EdgeChunks::default(),
        })
    }

    /// Set the fill value, used for chunks absent from storage.
    ///
    /// # Errors
    /// Returns an [`InvalidFillValueError`] if `fill_value` is outside the range of the element encoding.
    pub fn with_fill_value(mut self, fill_value: WideInt) -> Result<Self, InvalidFillValueError> {
        if (self.encoding.min_value()..=self.encoding.max_value()).contains(&fill_value) {
            self.fill_value = fill_value;
            Ok(self)
        } else {
            Err(InvalidFillValueError::new(fill_value, self.encoding))
        }
    }

    /// Set how edge chunks are stored.
    #[must_use]
    pub fn with_edge_chunks(mut self, edge_chunks: EdgeChunks) -> Self {
        self.edge_chunks = edge_chunks;
        self
    }

    /// Return the logical shape of the array.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// Return the dimensionality of the array.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.shape.len()
    }

    /// Return the chunk shape.
    #[must_use]
    pub fn chunk_shape(&self) -> &ChunkShape {
        self.chunk_grid.chunk_shape()
    }

    /// Return the chunk grid.
    #[must_use]
    pub fn chunk_grid(&self) -> &RegularChunkGrid {
        &self.chunk_grid
    }

    /// Return the element encoding.
    #[must_use]
    pub fn encoding(&self) -> &ElementEncoding {
        &self.encoding
    }

    /// Return the fill value.
    #[must_use]
    pub fn fill_value(&self) -> WideInt {
        self.fill_value
    }

    /// Return how edge chunks are stored.
    #[must_use]
    pub fn edge_chunks(&self) -> EdgeChunks {
        self.edge_chunks
    }

    /// Return the number of chunks along each axis.
    #[must_use]
    pub fn chunk_grid_shape(&self) -> ArrayShape {
        self.chunk_grid.grid_shape(&self.shape)
    }

    /// Return a region spanning the entire array.
    #[must_use]
    pub fn region_all(&self) -> Region {
        Region::new_with_shape(self.shape.clone())
    }

    /// Return true if `chunk_indices` identify a chunk of the array.
    #[must_use]
    pub fn chunk_indices_inbounds(&self, chunk_indices: &[u64]) -> bool {
        self.chunk_grid
            .chunk_indices_inbounds(chunk_indices, &self.shape)
    }

    /// Return the region of the array holding elements of the chunk at `chunk_indices`.
    ///
    /// Edge chunks are cropped to the array bounds.
    #[must_use]
    pub fn chunk_region(&self, chunk_indices: &[u64]) -> Region {
        self.chunk_grid
            .chunk_region_bounded(chunk_indices, &self.shape)
    }

    /// Return the shape the chunk at `chunk_indices` is stored with.
    ///
    /// This is the full chunk shape for [padded](EdgeChunks::Padded) edge chunks, otherwise it is cropped to the array bounds.
    #[must_use]
    pub fn stored_chunk_shape(&self, chunk_indices: &[u64]) -> ArrayShape {
        match self.edge_chunks {
            EdgeChunks::Padded => self.chunk_grid.chunk_shape().to_array_shape(),
            EdgeChunks::Truncated => self
                .chunk_grid
                .chunk_shape_bounded(chunk_indices, &self.shape),
        }
    }

    /// Return the chunks (in chunk grid space) overlapping `region`, or [`None`] if `region` is empty.
    #[must_use]
    pub fn chunks_in_region(&self, region: &Region) -> Option<Region> {
        self.chunk_grid.chunks_in_region(region)
    }

    /// Return the indices of the chunk holding the element at `array_indices`.
    #[must_use]
    pub fn chunk_indices(&self, array_indices: &[u64]) -> ArrayIndices {
        self.chunk_grid.chunk_indices(array_indices)
    }
}

#[cfg(test)]
mod tests {
    use crate::array::Endianness;

    use super::*;

    fn uint16() -> ElementEncoding {
        ElementEncoding::new_unsigned(2, Endianness::Little).unwrap()
    }

    #[test]
    fn array_descriptor_new() {
        let descriptor =
            ArrayDescriptor::new(vec![10, 6], [4, 4].try_into().unwrap(), uint16()).unwrap();
        assert_eq!(descriptor.dimensionality(), 2);
        assert_eq!(descriptor.chunk_grid_shape(), vec![3, 2]);
        assert_eq!(descriptor.fill_value(), 0);
        assert_eq!(descriptor.edge_chunks(), EdgeChunks::Padded);
        assert_eq!(descriptor.region_all(), Region::new_with_ranges(&[0..10, 0..6]));
        assert_eq!(
            descriptor.chunk_region(&[2, 1]),
            Region::new_with_ranges(&[8..10, 4..6])
        );
        assert_eq!(descriptor.chunk_indices(&[9, 5]), vec![2, 1]);
    }

    #[test]
    fn array_descriptor_invalid() {
        assert_eq!(
            ArrayDescriptor::new(vec![10, 6], [4].try_into().unwrap(), uint16()).unwrap_err(),
            ShapeMismatchError::Dimensionality {
                got: 1,
                expected: 2
            }
        );
        assert!(matches!(
            ArrayDescriptor::new(vec![10, 0], [4, 4].try_into().unwrap(), uint16()),
            Err(ShapeMismatchError::ZeroExtent { axis: 1, .. })
        ));
    }

    #[test]
    fn array_descriptor_element_count_overflow() {
        assert_eq!(
            ArrayDescriptor::new(vec![1 << 33, 1 << 33], [1, 1].try_into().unwrap(), uint16())
                .unwrap_err(),
            ShapeMismatchError::ElementCountOverflow {
                shape: vec![1 << 33, 1 << 33]
            }
        );
        assert_eq!(
            ArrayDescriptor::new(vec![10, 10], [1 << 40, 1 << 40].try_into().unwrap(), uint16())
                .unwrap_err(),
            ShapeMismatchError::ElementCountOverflow {
                shape: vec![1 << 40, 1 << 40]
            }
        );
        assert!(
            ArrayDescriptor::new(vec![1 << 32, 1 << 31], [1, 1].try_into().unwrap(), uint16())
                .is_ok()
        );
        assert!(serde_json::from_str::<ArrayDescriptor>(
            r#"{"shape":[8589934592,8589934592],"chunk_grid":{"chunk_shape":[1,1]},"encoding":"<u2"}"#,
        )
        .is_err());
    }

    #[test]
    fn array_descriptor_fill_value_range() {
        let uint8 = ElementEncoding::new_unsigned(1, Endianness::Little).unwrap();
        let descriptor = ArrayDescriptor::new(vec![2], [2].try_into().unwrap(), uint8).unwrap();
        let err = descriptor.clone().with_fill_value(1000).unwrap_err();
        assert_eq!(err.fill_value(), 1000);
        assert_eq!(
            err.to_string(),
            "fill value 1000 is not representable with element encoding |u1"
        );
        assert!(descriptor.clone().with_fill_value(-1).is_err());
        assert_eq!(descriptor.with_fill_value(255).unwrap().fill_value(), 255);

        let int8 = ElementEncoding::new_signed(1, Endianness::Big).unwrap();
        let descriptor = ArrayDescriptor::new(vec![2], [2].try_into().unwrap(), int8).unwrap();
        assert!(descriptor.clone().with_fill_value(-128).is_ok());
        assert!(descriptor.with_fill_value(128).is_err());

        let err = serde_json::from_str::<ArrayDescriptor>(
            r#"{"shape":[2],"chunk_grid":{"chunk_shape":[2]},"encoding":"|u1","fill_value":1000}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("fill value 1000"));
    }

    #[test]
    fn array_descriptor_stored_chunk_shape() {
        let descriptor =
            ArrayDescriptor::new(vec![10, 6], [4, 4].try_into().unwrap(), uint16()).unwrap();
        assert_eq!(descriptor.stored_chunk_shape(&[2, 1]), vec![4, 4]);
        let descriptor = descriptor.with_edge_chunks(EdgeChunks::Truncated);
        assert_eq!(descriptor.stored_chunk_shape(&[2, 1]), vec![2, 2]);
        assert_eq!(descriptor.stored_chunk_shape(&[1, 0]), vec![4, 4]);
    }

    #[test]
    fn array_descriptor_serde() {
        let descriptor = ArrayDescriptor::new(vec![10], [4].try_into().unwrap(), uint16())
            .unwrap()
            .with_fill_value(7)
            .unwrap();
        let json = serde_json::to_string(&descriptor).unwrap();
        assert_eq!(
            json,
            r#"{"shape":[10],"chunk_grid":{"chunk_shape":[4]},"encoding":"<u2","fill_value":7,"edge_chunks":"padded"}"#
        );
        assert_eq!(descriptor.to_string(), json);
        assert_eq!(
            serde_json::from_str::<ArrayDescriptor>(&json).unwrap(),
            descriptor
        );

        let minimal: ArrayDescriptor = serde_json::from_str(
            r#"{"shape":[10],"chunk_grid":{"chunk_shape":[4]},"encoding":">i4"}"#,
        )
        .unwrap();
        assert_eq!(minimal.fill_value(), 0);
        assert_eq!(minimal.edge_chunks(), EdgeChunks::Padded);

        assert!(serde_json::from_str::<ArrayDescriptor>(
            r#"{"shape":[10, 2],"chunk_grid":{"chunk_shape":[4]},"encoding":">i4"}"#,
        )
        .is_err());
        assert!(serde_json::from_str::<ArrayDescriptor>(
            r#"{"shape":[10],"chunk_grid":{"chunk_shape":[0]},"encoding":">i4"}"#,
        )
        .is_err());
    }
}
