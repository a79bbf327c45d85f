use derive_more::Display;
use serde::{Deserialize, Serialize};

/// The byte order of each stored element, either `big` or `little`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// Little endian.
    #[display("little")]
    Little,

    /// Big endian.
    #[display("big")]
    Big,
}

impl Endianness {
    /// Return true if the endianness matches the endianness of the CPU.
    #[must_use]
    pub fn is_native(self) -> bool {
        self == NATIVE_ENDIAN
    }
}

/// The endianness of the CPU.
pub const NATIVE_ENDIAN: Endianness = if cfg!(target_endian = "big") {
    Endianness::Big
} else {
    Endianness::Little
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endianness_serde() {
        assert_eq!(serde_json::to_string(&Endianness::Big).unwrap(), r#""big""#);
        assert_eq!(
            serde_json::from_str::<Endianness>(r#""little""#).unwrap(),
            Endianness::Little
        );
        assert!(serde_json::from_str::<Endianness>(r#""middle""#).is_err());
    }

    #[test]
    fn endianness_native() {
        assert!(NATIVE_ENDIAN.is_native());
        assert_eq!(Endianness::Little.to_string(), "little");
    }
}
