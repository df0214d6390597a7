//! The FIT record codec.
//!
//! A FIT file is a small header, a payload of interleaved definition and data records, and a
//! trailing CRC-16. Definition records bind a local message id (0-15) to a global message
//! number, a byte order and an ordered list of field definitions; every following data record
//! with that local id is laid out by the most recent binding.
//!
//! # Key Components
//!
//! - [`header`] - File header codec and header CRC
//! - [`basetype`] - Base type table: widths, signedness, invalid sentinels
//! - [`definition`] - Definition records and byte order
//! - [`registry`] - Local id to definition bindings
//! - [`record`] - Record headers, data records and the [`record::Record`] stream element
//! - [`reader`] - Forward-only record stream reader
//! - [`value`] - Typed field values
//! - [`accessor`] - Field lookup and same-width overwrite
//! - [`checksum`] - FIT CRC-16
//! - [`writer`] - Serialization back to bytes
//! - [`diagnostics`] - Non-fatal findings collected during decode
//!
//! Most users go through [`crate::FitFile`], which ties these together.

pub mod accessor;
pub mod basetype;
pub mod checksum;
pub mod definition;
pub mod diagnostics;
pub mod header;
pub mod reader;
pub mod record;
pub mod registry;
pub mod value;
pub mod writer;
