//! Element encodings.
//!
//! An [`ElementEncoding`] describes how one integer element of an array is stored: its width in bytes, its signedness, and its byte order.
//!
//! Encodings display and parse as NumPy-style type strings, as found in Zarr V2 `dtype` metadata:
//!  - `"<u2"`: little endian unsigned 16-bit integer,
//!  - `">i4"`: big endian signed 32-bit integer,
//!  - `"|u1"`: unsigned 8-bit integer (byte order is not applicable).

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::{Endianness, UnsupportedElementEncodingError, WideInt};

/// The width of a stored element.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
pub enum ElementWidth {
    /// 1 byte.
    #[display("1")]
    One,
    /// 2 bytes.
    #[display("2")]
    Two,
    /// 4 bytes.
    #[display("4")]
    Four,
    /// 8 bytes.
    #[display("8")]
    Eight,
}

impl ElementWidth {
    /// Return the width in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
        }
    }
}

impl TryFrom<usize> for ElementWidth {
    type Error = UnsupportedElementEncodingError;

    fn try_from(width_bytes: usize) -> Result<Self, Self::Error> {
        match width_bytes {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            _ => Err(UnsupportedElementEncodingError::new(format!(
                "with width {width_bytes} bytes, expected 1, 2, 4, or 8"
            ))),
        }
    }
}

/// The signedness of a stored element.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
pub enum Signedness {
    /// Two's complement signed integer.
    #[display("signed")]
    Signed,
    /// Unsigned integer.
    #[display("unsigned")]
    Unsigned,
}

/// The encoding of a stored integer element.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ElementEncoding {
    width: ElementWidth,
    signedness: Signedness,
    endianness: Endianness,
}

impl ElementEncoding {
    /// Create a new element encoding.
    ///
    /// The byte order of single byte elements is not meaningful and is normalised to [`Endianness::Little`].
    ///
    /// # Errors
    /// Returns [`UnsupportedElementEncodingError`] if `width_bytes` is not 1, 2, 4, or 8.
    pub fn new(
        width_bytes: usize,
        signedness: Signedness,
        endianness: Endianness,
    ) -> Result<Self, UnsupportedElementEncodingError> {
        let width = ElementWidth::try_from(width_bytes)?;
        let endianness = if width == ElementWidth::One {
            Endianness::Little
        } else {
            endianness
        };
        Ok(Self {
            width,
            signedness,
            endianness,
        })
    }

    /// Create a new unsigned element encoding.
    ///
    /// # Errors
    /// Returns [`UnsupportedElementEncodingError`] if `width_bytes` is not 1, 2, 4, or 8.
    pub fn new_unsigned(
        width_bytes: usize,
        endianness: Endianness,
    ) -> Result<Self, UnsupportedElementEncodingError> {
        Self::new(width_bytes, Signedness::Unsigned, endianness)
    }

    /// Create a new signed element encoding.
    ///
    /// # Errors
    /// Returns [`UnsupportedElementEncodingError`] if `width_bytes` is not 1, 2, 4, or 8.
    pub fn new_signed(
        width_bytes: usize,
        endianness: Endianness,
    ) -> Result<Self, UnsupportedElementEncodingError> {
        Self::new(width_bytes, Signedness::Signed, endianness)
    }

    /// Create an element encoding from a Zarr V3 integer data type name (e.g. `uint16`) and a byte order.
    ///
    /// # Errors
    /// Returns [`UnsupportedElementEncodingError`] if `name` is not an integer data type.
    pub fn from_data_type_name(
        name: &str,
        endianness: Endianness,
    ) -> Result<Self, UnsupportedElementEncodingError> {
        let (signedness, width_bytes) = match name {
            "int8" => (Signedness::Signed, 1),
            "int16" => (Signedness::Signed, 2),
            "int32" => (Signedness::Signed, 4),
            "int64" => (Signedness::Signed, 8),
            "uint8" => (Signedness::Unsigned, 1),
            "uint16" => (Signedness::Unsigned, 2),
            "uint32" => (Signedness::Unsigned, 4),
            "uint64" => (Signedness::Unsigned, 8),
            _ => return Err(UnsupportedElementEncodingError::new(name)),
        };
        Self::new(width_bytes, signedness, endianness)
    }

    /// Return the Zarr V3 data type name of the encoding (e.g. `uint16`).
    #[must_use]
    pub fn data_type_name(&self) -> String {
        let prefix = match self.signedness {
            Signedness::Signed => "int",
            Signedness::Unsigned => "uint",
        };
        format!("{prefix}{}", self.width.bytes() * 8)
    }

    /// Return the element width.
    #[must_use]
    pub const fn width(&self) -> ElementWidth {
        self.width
    }

    /// Return the element width in bytes.
    #[must_use]
    pub const fn width_bytes(&self) -> usize {
        self.width.bytes()
    }

    /// Return the signedness.
    #[must_use]
    pub const fn signedness(&self) -> Signedness {
        self.signedness
    }

    /// Return true if the encoding is signed.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        self.signedness == Signedness::Signed
    }

    /// Return the byte order.
    #[must_use]
    pub const fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Return the smallest value representable by the encoding.
    #[must_use]
    pub fn min_value(&self) -> WideInt {
        match self.signedness {
            Signedness::Unsigned => 0,
            Signedness::Signed => -(1 << (self.width.bytes() * 8 - 1)),
        }
    }

    /// Return the largest value representable by the encoding.
    #[must_use]
    pub fn max_value(&self) -> WideInt {
        match self.signedness {
            Signedness::Unsigned => (1 << (self.width.bytes() * 8)) - 1,
            Signedness::Signed => (1 << (self.width.bytes() * 8 - 1)) - 1,
        }
    }
}

impl std::fmt::Display for ElementEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let byte_order = match (self.width, self.endianness) {
            (ElementWidth::One, _) => '|',
            (_, Endianness::Little) => '<',
            (_, Endianness::Big) => '>',
        };
        let kind = match self.signedness {
            Signedness::Signed => 'i',
            Signedness::Unsigned => 'u',
        };
        write!(f, "{byte_order}{kind}{}", self.width)
    }
}

impl FromStr for ElementEncoding {
    type Err = UnsupportedElementEncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(byte_order), Some(kind)) = (chars.next(), chars.next()) else {
            return Err(UnsupportedElementEncodingError::new(s));
        };
        let signedness = match kind {
            'i' => Signedness::Signed,
            'u' => Signedness::Unsigned,
            _ => return Err(UnsupportedElementEncodingError::new(s)),
        };
        let width_bytes: usize = chars
            .as_str()
            .parse()
            .map_err(|_| UnsupportedElementEncodingError::new(s))?;
        let endianness = match (byte_order, width_bytes) {
            ('<', _) => Endianness::Little,
            ('>', _) => Endianness::Big,
            ('|', 1) => Endianness::Little,
            _ => return Err(UnsupportedElementEncodingError::new(s)),
        };
        Self::new(width_bytes, signedness, endianness)
    }
}

impl TryFrom<String> for ElementEncoding {
    type Error = UnsupportedElementEncodingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ElementEncoding> for String {
    fn from(value: ElementEncoding) -> Self {
        value.to_string()
    }
}
