use std::num::NonZeroU64;

use derive_more::{Deref, From};
use serde::{Deserialize, Serialize};

use super::{ArrayShape, ShapeMismatchError};

/// The shape of a chunk. All dimensions must be non-zero.
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Hash, Debug, Deref, From)]
pub struct ChunkShape(Vec<NonZeroU64>);

impl ChunkShape {
    /// Return the number of elements.
    ///
    /// Equal to the product of the components of its shape, saturating at [`u64::MAX`].
    #[must_use]
    pub fn num_elements_u64(&self) -> u64 {
        self.0
            .iter()
            .try_fold(1u64, |count, size| count.checked_mul(size.get()))
            .unwrap_or(u64::MAX)
    }

    /// Convert to an [`ArrayShape`].
    #[must_use]
    pub fn to_array_shape(&self) -> ArrayShape {
        chunk_shape_to_array_shape(&self.0)
    }
}

impl From<ChunkShape> for Vec<NonZeroU64> {
    fn from(val: ChunkShape) -> Self {
        val.0
    }
}

fn try_from_u64s(value: &[u64]) -> Result<ChunkShape, ShapeMismatchError> {
    value
        .iter()
        .enumerate()
        .map(|(axis, &size)| {
            NonZeroU64::new(size).ok_or_else(|| ShapeMismatchError::ZeroExtent {
                axis,
                shape: value.to_vec(),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(ChunkShape)
}

macro_rules! try_from_chunkshape {
    ( $t:ty ) => {
        impl TryFrom<$t> for ChunkShape {
            type Error = ShapeMismatchError;
            fn try_from(value: $t) -> Result<Self, Self::Error> {
                try_from_u64s(&value)
            }
        }
    };
    ( $t:ty, $g:ident ) => {
        impl<const $g: usize> TryFrom<$t> for ChunkShape {
            type Error = ShapeMismatchError;
            fn try_from(value: $t) -> Result<Self, Self::Error> {
                try_from_u64s(&value[..])
            }
        }
    };
}

try_from_chunkshape!(Vec<u64>);
try_from_chunkshape!(&[u64]);
try_from_chunkshape!([u64; N], N);
try_from_chunkshape!(&[u64; N], N);

/// Convert a [`ChunkShape`] to an [`ArrayShape`].
#[must_use]
pub fn chunk_shape_to_array_shape(chunk_shape: &[NonZeroU64]) -> ArrayShape {
    chunk_shape.iter().map(|i| i.get()).collect()
}
