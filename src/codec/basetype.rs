//! Static table of FIT base types.
//!
//! A field definition names its primitive encoding with a one-byte base type code. Bit 7 of the
//! code flags types whose byte order follows the definition's architecture, bits 0-4 are the
//! base type number. Lookups here mask the code down to the base type number, so a writer that
//! forgets the endian-ability bit still resolves to the right type.
//!
//! Every base type reserves one bit pattern as its "invalid" value, the format's way of saying
//! "field not set". Codes that are not in the table are not an error: such fields are carried
//! as opaque bytes of their declared size.

use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::codec::definition::Architecture;

/// Mask selecting the base type number from a base type code.
pub const BASE_TYPE_NUMBER_MASK: u8 = 0x1F;

/// Bit marking a base type code as byte-order dependent.
pub const BASE_TYPE_ENDIAN_FLAG: u8 = 0x80;

/// The primitive encodings a FIT field can use.
///
/// The discriminant is the canonical base type code as written by the FIT SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
#[repr(u8)]
pub enum BaseType {
    /// 8-bit enumeration
    Enum = 0x00,
    /// Signed 8-bit integer
    SInt8 = 0x01,
    /// Unsigned 8-bit integer
    UInt8 = 0x02,
    /// Signed 16-bit integer
    SInt16 = 0x83,
    /// Unsigned 16-bit integer
    UInt16 = 0x84,
    /// Signed 32-bit integer
    SInt32 = 0x85,
    /// Unsigned 32-bit integer
    UInt32 = 0x86,
    /// Null-terminated UTF-8 string
    String = 0x07,
    /// IEEE 754 single precision
    Float32 = 0x88,
    /// IEEE 754 double precision
    Float64 = 0x89,
    /// Unsigned 8-bit integer, zero is invalid
    UInt8z = 0x0A,
    /// Unsigned 16-bit integer, zero is invalid
    UInt16z = 0x8B,
    /// Unsigned 32-bit integer, zero is invalid
    UInt32z = 0x8C,
    /// Raw byte array
    Byte = 0x0D,
    /// Signed 64-bit integer
    SInt64 = 0x8E,
    /// Unsigned 64-bit integer
    UInt64 = 0x8F,
    /// Unsigned 64-bit integer, zero is invalid
    UInt64z = 0x90,
}

impl BaseType {
    /// Resolve a base type code, ignoring the endian-ability bit.
    ///
    /// Returns `None` for codes that are not part of the table.
    ///
    /// ```rust
    /// use fitscope::codec::basetype::BaseType;
    ///
    /// assert_eq!(BaseType::from_code(0x84), Some(BaseType::UInt16));
    /// assert_eq!(BaseType::from_code(0x04), Some(BaseType::UInt16));
    /// assert_eq!(BaseType::from_code(0x1F), None);
    /// ```
    #[must_use]
    pub fn from_code(code: u8) -> Option<BaseType> {
        let number = code & BASE_TYPE_NUMBER_MASK;
        BaseType::iter().find(|base_type| base_type.number() == number)
    }

    /// Canonical code including the endian-ability bit.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Base type number (bits 0-4 of the code).
    #[must_use]
    pub fn number(self) -> u8 {
        self.code() & BASE_TYPE_NUMBER_MASK
    }

    /// Width of a single element in bytes.
    #[must_use]
    pub fn width(self) -> usize {
        match self {
            BaseType::Enum
            | BaseType::SInt8
            | BaseType::UInt8
            | BaseType::UInt8z
            | BaseType::String
            | BaseType::Byte => 1,
            BaseType::SInt16 | BaseType::UInt16 | BaseType::UInt16z => 2,
            BaseType::SInt32 | BaseType::UInt32 | BaseType::UInt32z | BaseType::Float32 => 4,
            BaseType::Float64 | BaseType::SInt64 | BaseType::UInt64 | BaseType::UInt64z => 8,
        }
    }

    /// `true` for two's complement integer types.
    #[must_use]
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            BaseType::SInt8 | BaseType::SInt16 | BaseType::SInt32 | BaseType::SInt64
        )
    }

    /// `true` for the IEEE 754 types.
    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(self, BaseType::Float32 | BaseType::Float64)
    }

    /// `true` when values are stored in the definition's byte order.
    #[must_use]
    pub fn is_endian_sensitive(self) -> bool {
        self.code() & BASE_TYPE_ENDIAN_FLAG != 0
    }

    /// The invalid sentinel, as the integer value of one element's bits.
    #[must_use]
    pub fn invalid_value(self) -> u64 {
        match self {
            BaseType::Enum | BaseType::UInt8 | BaseType::Byte => 0xFF,
            BaseType::SInt8 => 0x7F,
            BaseType::SInt16 => 0x7FFF,
            BaseType::UInt16 => 0xFFFF,
            BaseType::SInt32 => 0x7FFF_FFFF,
            BaseType::UInt32 | BaseType::Float32 => 0xFFFF_FFFF,
            BaseType::SInt64 => 0x7FFF_FFFF_FFFF_FFFF,
            BaseType::UInt64 | BaseType::Float64 => 0xFFFF_FFFF_FFFF_FFFF,
            BaseType::String
            | BaseType::UInt8z
            | BaseType::UInt16z
            | BaseType::UInt32z
            | BaseType::UInt64z => 0,
        }
    }

    /// Name used by the FIT profile.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            BaseType::Enum => "enum",
            BaseType::SInt8 => "sint8",
            BaseType::UInt8 => "uint8",
            BaseType::SInt16 => "sint16",
            BaseType::UInt16 => "uint16",
            BaseType::SInt32 => "sint32",
            BaseType::UInt32 => "uint32",
            BaseType::String => "string",
            BaseType::Float32 => "float32",
            BaseType::Float64 => "float64",
            BaseType::UInt8z => "uint8z",
            BaseType::UInt16z => "uint16z",
            BaseType::UInt32z => "uint32z",
            BaseType::Byte => "byte",
            BaseType::SInt64 => "sint64",
            BaseType::UInt64 => "uint64",
            BaseType::UInt64z => "uint64z",
        }
    }

    /// `true` when `raw` holds nothing but the invalid sentinel.
    ///
    /// Strings are invalid when empty or starting with a NUL. Byte arrays are invalid only when
    /// every byte is `0xFF`. Numeric fields may be arrays: they are invalid when every element
    /// is the sentinel. A raw window whose length is not a multiple of the element width cannot
    /// be split into elements and is never reported invalid.
    #[must_use]
    pub fn is_invalid(self, raw: &[u8], architecture: Architecture) -> bool {
        if raw.is_empty() {
            return true;
        }

        match self {
            BaseType::String => raw[0] == 0,
            BaseType::Byte => raw.iter().all(|&byte| byte == 0xFF),
            _ => {
                let width = self.width();
                if raw.len() % width != 0 {
                    return false;
                }
                let sentinel = self.invalid_value();
                raw.chunks_exact(width)
                    .all(|element| read_uint(element, architecture) == sentinel)
            }
        }
    }
}

impl std::fmt::Display for BaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Element width for a base type code; unknown codes are opaque single bytes.
#[must_use]
pub fn width_of(code: u8) -> usize {
    BaseType::from_code(code).map_or(1, BaseType::width)
}

/// Sentinel check for a base type code; unknown codes are never invalid.
#[must_use]
pub fn is_invalid(code: u8, raw: &[u8], architecture: Architecture) -> bool {
    BaseType::from_code(code).is_some_and(|base_type| base_type.is_invalid(raw, architecture))
}

/// Number of entries in the base type table.
#[must_use]
pub fn table_len() -> usize {
    BaseType::COUNT
}

/// Interpret up to eight bytes as an unsigned integer in the given byte order.
pub(crate) fn read_uint(raw: &[u8], architecture: Architecture) -> u64 {
    let fold = |acc: u64, &byte: &u8| (acc << 8) | u64::from(byte);
    match architecture {
        Architecture::BigEndian => raw.iter().fold(0, fold),
        Architecture::LittleEndian => raw.iter().rev().fold(0, fold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_complete() {
        assert_eq!(table_len(), 17);
        for base_type in BaseType::iter() {
            assert_eq!(BaseType::from_code(base_type.code()), Some(base_type));
        }
    }

    #[test]
    fn endian_flag_matches_width() {
        for base_type in BaseType::iter() {
            let multi_byte_number = base_type.width() > 1;
            assert_eq!(
                base_type.is_endian_sensitive(),
                multi_byte_number,
                "{base_type}"
            );
        }
    }

    #[test]
    fn unknown_codes_are_opaque_bytes() {
        assert_eq!(BaseType::from_code(0x11), None);
        assert_eq!(width_of(0x11), 1);
        assert!(!is_invalid(0x11, &[0xFF], Architecture::LittleEndian));
    }

    #[test]
    fn widths_by_code() {
        assert_eq!(width_of(0x02), 1);
        assert_eq!(width_of(0x84), 2);
        assert_eq!(width_of(0x86), 4);
        assert_eq!(width_of(0x89), 8);
    }

    #[test]
    fn unsigned_sentinels() {
        let le = Architecture::LittleEndian;
        assert!(is_invalid(0x02, &[0xFF], le));
        assert!(!is_invalid(0x02, &[0x04], le));
        assert!(is_invalid(0x84, &[0xFF, 0xFF], le));
        assert!(!is_invalid(0x84, &[0xF5, 0x10], le));
        assert!(is_invalid(0x8C, &[0, 0, 0, 0], le));
    }

    #[test]
    fn signed_sentinel_respects_byte_order() {
        assert!(BaseType::SInt16.is_invalid(&[0xFF, 0x7F], Architecture::LittleEndian));
        assert!(!BaseType::SInt16.is_invalid(&[0xFF, 0x7F], Architecture::BigEndian));
        assert!(BaseType::SInt16.is_invalid(&[0x7F, 0xFF], Architecture::BigEndian));
    }

    #[test]
    fn arrays_and_strings() {
        let le = Architecture::LittleEndian;
        assert!(BaseType::UInt16.is_invalid(&[0xFF, 0xFF, 0xFF, 0xFF], le));
        assert!(!BaseType::UInt16.is_invalid(&[0xFF, 0xFF, 0x01, 0x00], le));
        assert!(!BaseType::UInt16.is_invalid(&[0xFF, 0xFF, 0xFF], le));
        assert!(BaseType::String.is_invalid(&[0, 0, 0], le));
        assert!(!BaseType::String.is_invalid(b"ab\0", le));
        assert!(BaseType::Byte.is_invalid(&[0xFF, 0xFF], le));
        assert!(!BaseType::Byte.is_invalid(&[0xFF, 0x00], le));
    }

    #[test]
    fn read_uint_orders() {
        assert_eq!(read_uint(&[0x01, 0x02], Architecture::LittleEndian), 0x0201);
        assert_eq!(read_uint(&[0x01, 0x02], Architecture::BigEndian), 0x0102);
    }
}
