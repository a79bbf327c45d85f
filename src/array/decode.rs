//! Decoding of stored integer elements.
//!
//! Elements are read at their declared width and byte order, then widened into [`WideInt`].
//! Widening is performed from a source type of matching signedness, so unsigned elements are zero-extended and signed elements are sign-extended.
//! Elements are never reinterpreted through a same-width type of the other signedness: a `uint16` of `0xFFFF` decodes to `65535`, not `-1`.

use super::{ElementEncoding, ElementWidth, Endianness, MalformedChunkError, Signedness, WideInt};

macro_rules! decode_elements {
    ( $bytes:expr, $out:expr, $endianness:expr, $t:ty ) => {{
        const WIDTH: usize = std::mem::size_of::<$t>();
        let from_bytes: fn([u8; WIDTH]) -> $t = match $endianness {
            Endianness::Little => <$t>::from_le_bytes,
            Endianness::Big => <$t>::from_be_bytes,
        };
        for (out, element) in std::iter::zip($out.iter_mut(), $bytes.chunks_exact(WIDTH)) {
            let mut element_bytes = [0u8; WIDTH];
            element_bytes.copy_from_slice(element);
            *out = WideInt::from(from_bytes(element_bytes));
        }
    }};
}

/// Decode `bytes` holding `out.len()` elements with `encoding` into `out`.
///
/// # Errors
/// Returns [`MalformedChunkError`] if the length of `bytes` is not the length of `out` multiplied by the element width.
pub fn decode_into(
    bytes: &[u8],
    encoding: &ElementEncoding,
    out: &mut [WideInt],
) -> Result<(), MalformedChunkError> {
    let count = out.len() as u64;
    validate_length(bytes, encoding, count)?;
    let endianness = encoding.endianness();
    match (encoding.width(), encoding.signedness()) {
        (ElementWidth::One, Signedness::Unsigned) => decode_elements!(bytes, out, endianness, u8),
        (ElementWidth::One, Signedness::Signed) => decode_elements!(bytes, out, endianness, i8),
        (ElementWidth::Two, Signedness::Unsigned) => decode_elements!(bytes, out, endianness, u16),
        (ElementWidth::Two, Signedness::Signed) => decode_elements!(bytes, out, endianness, i16),
        (ElementWidth::Four, Signedness::Unsigned) => {
            decode_elements!(bytes, out, endianness, u32);
        }
        (ElementWidth::Four, Signedness::Signed) => decode_elements!(bytes, out, endianness, i32),
        (ElementWidth::Eight, Signedness::Unsigned) => {
            decode_elements!(bytes, out, endianness, u64);
        }
        (ElementWidth::Eight, Signedness::Signed) => decode_elements!(bytes, out, endianness, i64),
    }
    Ok(())
}

/// Decode `bytes` holding `count` elements with `encoding`.
///
/// # Errors
/// Returns [`MalformedChunkError`] if the length of `bytes` is not `count` multiplied by the element width.
pub fn decode(
    bytes: &[u8],
    encoding: &ElementEncoding,
    count: u64,
) -> Result<Vec<WideInt>, MalformedChunkError> {
    validate_length(bytes, encoding, count)?;
    let count = usize::try_from(count)
        .map_err(|_| MalformedChunkError::new(bytes.len(), count, encoding.width_bytes()))?;
    let mut out = vec![0; count];
    decode_into(bytes, encoding, &mut out)?;
    Ok(out)
}

fn validate_length(
    bytes: &[u8],
    encoding: &ElementEncoding,
    count: u64,
) -> Result<(), MalformedChunkError> {
    let width = encoding.width_bytes();
    if count.checked_mul(width as u64) == Some(bytes.len() as u64) {
        Ok(())
    } else {
        Err(MalformedChunkError::new(bytes.len(), count, width))
    }
}
