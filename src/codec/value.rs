//! Typed field values.
//!
//! [`FieldValue`] is what a raw field window decodes to, and what a caller hands to
//! [`crate::codec::record::DataRecord::set_field`]. Each scalar variant has a fixed encoded
//! width, which is what the same-width overwrite rule is checked against: a `UInt16` can only
//! replace a 2-byte field, a three-element `Array` of `UInt32` only a 12-byte one.
//!
//! The `z` types and `enum` decode to the unsigned variant of their width; the type code in the
//! definition is never changed by an overwrite, so the distinction does not need to survive.

use crate::codec::{basetype::BaseType, definition::Architecture};

/// A decoded or to-be-encoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// 1-byte unsigned (`enum`, `uint8`, `uint8z`)
    UInt8(u8),
    /// 2-byte unsigned (`uint16`, `uint16z`)
    UInt16(u16),
    /// 4-byte unsigned (`uint32`, `uint32z`)
    UInt32(u32),
    /// 8-byte unsigned (`uint64`, `uint64z`)
    UInt64(u64),
    /// 1-byte signed
    SInt8(i8),
    /// 2-byte signed
    SInt16(i16),
    /// 4-byte signed
    SInt32(i32),
    /// 8-byte signed
    SInt64(i64),
    /// 4-byte float
    Float32(f32),
    /// 8-byte float
    Float64(f64),
    /// String; encodes with a trailing NUL
    String(String),
    /// Raw bytes: `byte` fields, unknown base types and windows that do not split into elements
    Bytes(Vec<u8>),
    /// Several elements of one scalar type
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// Decode a raw window.
    ///
    /// Returns `None` when the window holds the invalid sentinel of its base type. Unknown base
    /// types, `byte` fields and windows whose length is not a multiple of the element width
    /// decode to [`FieldValue::Bytes`].
    #[must_use]
    pub fn decode(
        base_type: Option<BaseType>,
        raw: &[u8],
        architecture: Architecture,
    ) -> Option<FieldValue> {
        let Some(base_type) = base_type else {
            return Some(FieldValue::Bytes(raw.to_vec()));
        };

        if base_type.is_invalid(raw, architecture) {
            return None;
        }

        match base_type {
            BaseType::String => {
                let end = raw.iter().position(|&byte| byte == 0).unwrap_or(raw.len());
                Some(FieldValue::String(
                    String::from_utf8_lossy(&raw[..end]).into_owned(),
                ))
            }
            BaseType::Byte => Some(FieldValue::Bytes(raw.to_vec())),
            _ => {
                let width = base_type.width();
                if raw.len() % width != 0 {
                    return Some(FieldValue::Bytes(raw.to_vec()));
                }

                let mut elements: Vec<FieldValue> = raw
                    .chunks_exact(width)
                    .map(|element| decode_scalar(base_type, element, architecture))
                    .collect();

                if elements.len() == 1 {
                    elements.pop()
                } else {
                    Some(FieldValue::Array(elements))
                }
            }
        }
    }

    /// Encode in the given byte order.
    #[must_use]
    pub fn encode(&self, architecture: Architecture) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(architecture, &mut out);
        out
    }

    /// Number of bytes [`FieldValue::encode`] produces.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        match self {
            FieldValue::UInt8(_) | FieldValue::SInt8(_) => 1,
            FieldValue::UInt16(_) | FieldValue::SInt16(_) => 2,
            FieldValue::UInt32(_) | FieldValue::SInt32(_) | FieldValue::Float32(_) => 4,
            FieldValue::UInt64(_) | FieldValue::SInt64(_) | FieldValue::Float64(_) => 8,
            FieldValue::String(value) => value.len() + 1,
            FieldValue::Bytes(value) => value.len(),
            FieldValue::Array(values) => values.iter().map(FieldValue::encoded_len).sum(),
        }
    }

    /// Integer view of unsigned and non-negative signed scalars.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            FieldValue::UInt8(value) => Some(u64::from(value)),
            FieldValue::UInt16(value) => Some(u64::from(value)),
            FieldValue::UInt32(value) => Some(u64::from(value)),
            FieldValue::UInt64(value) => Some(value),
            FieldValue::SInt8(value) => u64::try_from(value).ok(),
            FieldValue::SInt16(value) => u64::try_from(value).ok(),
            FieldValue::SInt32(value) => u64::try_from(value).ok(),
            FieldValue::SInt64(value) => u64::try_from(value).ok(),
            _ => None,
        }
    }

    /// Floating point view of numeric scalars.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            FieldValue::Float32(value) => Some(f64::from(value)),
            FieldValue::Float64(value) => Some(value),
            FieldValue::SInt8(value) => Some(f64::from(value)),
            FieldValue::SInt16(value) => Some(f64::from(value)),
            FieldValue::SInt32(value) => Some(f64::from(value)),
            FieldValue::SInt64(value) => Some(value as f64),
            _ => self.as_u64().map(|value| value as f64),
        }
    }

    /// String view.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(value) => Some(value),
            _ => None,
        }
    }

    fn encode_into(&self, architecture: Architecture, out: &mut Vec<u8>) {
        macro_rules! ordered {
            ($value:expr) => {
                match architecture {
                    Architecture::LittleEndian => out.extend_from_slice(&$value.to_le_bytes()),
                    Architecture::BigEndian => out.extend_from_slice(&$value.to_be_bytes()),
                }
            };
        }

        match self {
            FieldValue::UInt8(value) => out.push(*value),
            FieldValue::SInt8(value) => ordered!(value),
            FieldValue::UInt16(value) => ordered!(value),
            FieldValue::SInt16(value) => ordered!(value),
            FieldValue::UInt32(value) => ordered!(value),
            FieldValue::SInt32(value) => ordered!(value),
            FieldValue::UInt64(value) => ordered!(value),
            FieldValue::SInt64(value) => ordered!(value),
            FieldValue::Float32(value) => ordered!(value),
            FieldValue::Float64(value) => ordered!(value),
            FieldValue::String(value) => {
                out.extend_from_slice(value.as_bytes());
                out.push(0);
            }
            FieldValue::Bytes(value) => out.extend_from_slice(value),
            FieldValue::Array(values) => {
                for value in values {
                    value.encode_into(architecture, out);
                }
            }
        }
    }
}

fn decode_scalar(base_type: BaseType, raw: &[u8], architecture: Architecture) -> FieldValue {
    macro_rules! ordered {
        ($ty:ty) => {{
            let mut bytes = [0u8; std::mem::size_of::<$ty>()];
            bytes.copy_from_slice(raw);
            match architecture {
                Architecture::LittleEndian => <$ty>::from_le_bytes(bytes),
                Architecture::BigEndian => <$ty>::from_be_bytes(bytes),
            }
        }};
    }

    match base_type {
        BaseType::Enum | BaseType::UInt8 | BaseType::UInt8z => FieldValue::UInt8(raw[0]),
        BaseType::SInt8 => FieldValue::SInt8(ordered!(i8)),
        BaseType::UInt16 | BaseType::UInt16z => FieldValue::UInt16(ordered!(u16)),
        BaseType::SInt16 => FieldValue::SInt16(ordered!(i16)),
        BaseType::UInt32 | BaseType::UInt32z => FieldValue::UInt32(ordered!(u32)),
        BaseType::SInt32 => FieldValue::SInt32(ordered!(i32)),
        BaseType::UInt64 | BaseType::UInt64z => FieldValue::UInt64(ordered!(u64)),
        BaseType::SInt64 => FieldValue::SInt64(ordered!(i64)),
        BaseType::Float32 => FieldValue::Float32(ordered!(f32)),
        BaseType::Float64 => FieldValue::Float64(ordered!(f64)),
        BaseType::String | BaseType::Byte => FieldValue::Bytes(raw.to_vec()),
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar!(
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    i8 => SInt8,
    i16 => SInt16,
    i32 => SInt32,
    i64 => SInt64,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Vec<u8> => Bytes,
);

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LE: Architecture = Architecture::LittleEndian;
    const BE: Architecture = Architecture::BigEndian;

    #[test]
    fn decode_scalars() {
        assert_eq!(
            FieldValue::decode(Some(BaseType::UInt8), &[0x04], LE),
            Some(FieldValue::UInt8(4))
        );
        assert_eq!(
            FieldValue::decode(Some(BaseType::UInt16), &[0xF5, 0x10], LE),
            Some(FieldValue::UInt16(4341))
        );
        assert_eq!(
            FieldValue::decode(Some(BaseType::UInt16), &[0x10, 0xF5], BE),
            Some(FieldValue::UInt16(4341))
        );
        assert_eq!(
            FieldValue::decode(Some(BaseType::SInt32), &(-5i32).to_le_bytes(), LE),
            Some(FieldValue::SInt32(-5))
        );
        assert_eq!(
            FieldValue::decode(Some(BaseType::Float32), &1.5f32.to_be_bytes(), BE),
            Some(FieldValue::Float32(1.5))
        );
    }

    #[test]
    fn decode_invalid_is_none() {
        assert_eq!(FieldValue::decode(Some(BaseType::UInt8), &[0xFF], LE), None);
        assert_eq!(
            FieldValue::decode(Some(BaseType::UInt32z), &[0, 0, 0, 0], LE),
            None
        );
    }

    #[test]
    fn decode_string_stops_at_nul() {
        assert_eq!(
            FieldValue::decode(Some(BaseType::String), b"Edge\0\0\0\0", LE),
            Some(FieldValue::String("Edge".to_string()))
        );
        assert_eq!(
            FieldValue::decode(Some(BaseType::String), b"abc", LE),
            Some(FieldValue::String("abc".to_string()))
        );
    }

    #[test]
    fn decode_arrays_and_opaque() {
        assert_eq!(
            FieldValue::decode(Some(BaseType::UInt16), &[1, 0, 2, 0], LE),
            Some(FieldValue::Array(vec![
                FieldValue::UInt16(1),
                FieldValue::UInt16(2)
            ]))
        );
        assert_eq!(
            FieldValue::decode(Some(BaseType::UInt16), &[1, 0, 2], LE),
            Some(FieldValue::Bytes(vec![1, 0, 2]))
        );
        assert_eq!(
            FieldValue::decode(None, &[0xFF, 0xFF], LE),
            Some(FieldValue::Bytes(vec![0xFF, 0xFF]))
        );
    }

    #[test]
    fn encode_respects_order_and_width() {
        assert_eq!(FieldValue::UInt16(4341).encode(LE), vec![0xF5, 0x10]);
        assert_eq!(FieldValue::UInt16(4341).encode(BE), vec![0x10, 0xF5]);
        assert_eq!(FieldValue::from("ab").encode(LE), vec![b'a', b'b', 0]);
        assert_eq!(FieldValue::from("ab").encoded_len(), 3);
        let array = FieldValue::Array(vec![FieldValue::UInt32(1), FieldValue::UInt32(2)]);
        assert_eq!(array.encoded_len(), 8);
        assert_eq!(array.encode(BE), vec![0, 0, 0, 1, 0, 0, 0, 2]);
    }

    #[test]
    fn decode_encode_agree() {
        let raw = [0x12, 0x34, 0x56, 0x78];
        for architecture in [LE, BE] {
            let value = FieldValue::decode(Some(BaseType::UInt32), &raw, architecture).unwrap();
            assert_eq!(value.encode(architecture), raw.to_vec());
        }
    }

    #[test]
    fn numeric_views() {
        assert_eq!(FieldValue::UInt16(1).as_u64(), Some(1));
        assert_eq!(FieldValue::SInt8(-1).as_u64(), None);
        assert_eq!(FieldValue::SInt8(-1).as_f64(), Some(-1.0));
        assert_eq!(FieldValue::from("x").as_str(), Some("x"));
        assert_eq!(FieldValue::Bytes(vec![]).as_u64(), None);
    }
}
