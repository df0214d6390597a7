//! Low-level byte order and safe reading/writing utilities.
//!
//! FIT files mix byte orders: the file header and the checksums are always little-endian,
//! while every definition record declares the byte order ("architecture") of its own global
//! message number and of all field values in the data records that use it. Everything in this
//! module is bounds-checked and returns [`crate::Error::OutOfBounds`] instead of panicking.
//!
//! # Key Components
//!
//! - [`FitIO`] - Trait tying a primitive type to its fixed-size byte array
//! - [`read_le`] / [`read_le_at`] / [`read_be`] / [`read_be_at`] - Reading with offset tracking
//! - [`write_le_at`] / [`write_be_at`] - Writing with offset tracking
//!
//! # Examples
//!
//! ```rust,ignore
//! use fitscope::file::io::{read_le_at, write_be_at};
//!
//! let data = [0x01, 0x00, 0x02, 0x00];
//! let mut offset = 0;
//! let first: u16 = read_le_at(&data, &mut offset)?;
//! assert_eq!(first, 1);
//! assert_eq!(offset, 2);
//!
//! let mut out = [0u8; 2];
//! let mut offset = 0;
//! write_be_at(&mut out, &mut offset, 0x0102u16)?;
//! assert_eq!(out, [0x01, 0x02]);
//! # Ok::<(), fitscope::Error>(())
//! ```

use crate::{Error::OutOfBounds, Result};

/// Trait for type-specific binary conversions in either byte order.
///
/// Implemented for every primitive that a FIT base type maps onto. `Bytes` is the
/// fixed-size array for the type (e.g. `[u8; 4]` for `u32`).
pub trait FitIO: Sized + Copy {
    /// Associated byte array type for this numeric type.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
    /// Read T from a byte buffer in big-endian
    fn from_be_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
    /// Write T to a byte buffer in big-endian
    fn to_be_bytes(self) -> Self::Bytes;
}

macro_rules! impl_fit_io {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FitIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }

                fn to_be_bytes(self) -> Self::Bytes {
                    <$ty>::to_be_bytes(self)
                }
            }
        )*
    };
}

impl_fit_io!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Safely reads a value of type `T` in little-endian byte order from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le<T: FitIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Safely reads a little-endian `T` at `offset` and advances `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le_at<T: FitIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let bytes = take::<T>(data, offset)?;
    Ok(T::from_le_bytes(bytes))
}

/// Safely reads a value of type `T` in big-endian byte order from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_be<T: FitIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_be_at(data, &mut offset)
}

/// Safely reads a big-endian `T` at `offset` and advances `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_be_at<T: FitIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let bytes = take::<T>(data, offset)?;
    Ok(T::from_be_bytes(bytes))
}

/// Writes `value` in little-endian byte order at `offset` and advances `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the value does not fit.
pub fn write_le_at<T: FitIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    put(data, offset, value.to_le_bytes().as_ref())
}

/// Writes `value` in big-endian byte order at `offset` and advances `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the value does not fit.
pub fn write_be_at<T: FitIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    put(data, offset, value.to_be_bytes().as_ref())
}

fn take<T: FitIO>(data: &[u8], offset: &mut usize) -> Result<T::Bytes> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;
    Ok(read)
}

fn put(data: &mut [u8], offset: &mut usize, bytes: &[u8]) -> Result<()> {
    let Some(end) = offset.checked_add(bytes.len()) else {
        return Err(OutOfBounds);
    };
    if end > data.len() {
        return Err(OutOfBounds);
    }

    data[*offset..end].copy_from_slice(bytes);
    *offset = end;
    Ok(())
}
