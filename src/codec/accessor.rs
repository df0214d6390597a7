//! Field lookup and in-place overwrite.
//!
//! Fields are addressed by their numeric field number, never by position: two definitions of
//! the same message can list fields in different orders and sizes. The accessor only borrows
//! records; it never keeps a reference past the call.
//!
//! An overwrite must encode to exactly the declared field width. Growing or shrinking a field
//! would shift every following record and is not supported; a rejected overwrite leaves the
//! record byte-for-byte unchanged.
//!
//! # Examples
//!
//! ```rust
//! use fitscope::codec::{accessor, reader::read_records, value::FieldValue};
//!
//! let payload = [0x40, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01, 0x01, 0x02, 0x00, 0x04];
//! let mut records = read_records(&payload)?;
//!
//! let record = accessor::find_records(&records, 0).next().unwrap();
//! assert_eq!(record.field(1)?.value(), Some(FieldValue::UInt8(4)));
//!
//! let record = accessor::find_records_mut(&mut records, 0).next().unwrap();
//! record.set_field(1, 0u8)?;
//! assert!(record.set_field(1, 0u16).is_err());
//! assert_eq!(record.data(), &[0x00]);
//! # Ok::<(), fitscope::Error>(())
//! ```

use crate::{
    codec::{
        basetype::BaseType,
        definition::{Architecture, FieldDefinition},
        record::{DataRecord, Record},
        value::FieldValue,
    },
    Error::{FieldNotPresent, WidthMismatch},
    Result,
};

/// A borrowed view of one field of a data record.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    /// The field's definition
    pub definition: &'a FieldDefinition,
    /// Byte order of the owning definition
    pub architecture: Architecture,
    /// The raw window, exactly `definition.size` bytes
    pub raw: &'a [u8],
}

impl FieldView<'_> {
    /// Field number.
    #[must_use]
    pub fn number(&self) -> u8 {
        self.definition.number
    }

    /// Resolved base type; `None` for codes outside the table.
    #[must_use]
    pub fn base_type(&self) -> Option<BaseType> {
        self.definition.base_type()
    }

    /// `true` when the window holds the invalid sentinel.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        crate::codec::basetype::is_invalid(self.definition.base_type, self.raw, self.architecture)
    }

    /// Typed value; `None` when the field is not set.
    #[must_use]
    pub fn value(&self) -> Option<FieldValue> {
        FieldValue::decode(self.base_type(), self.raw, self.architecture)
    }
}

/// Data records whose definition has global message number `global`, in stream order.
pub fn find_records(records: &[Record], global: u16) -> impl Iterator<Item = &DataRecord> {
    records
        .iter()
        .filter_map(Record::as_data)
        .filter(move |record| record.global() == global)
}

/// Mutable variant of [`find_records`].
pub fn find_records_mut(
    records: &mut [Record],
    global: u16,
) -> impl Iterator<Item = &mut DataRecord> {
    records
        .iter_mut()
        .filter_map(Record::as_data_mut)
        .filter(move |record| record.global() == global)
}

/// Look up `field_number` in `record`.
///
/// # Errors
/// Returns [`crate::Error::FieldNotPresent`] if the definition does not declare the field.
pub fn get_field(record: &DataRecord, field_number: u8) -> Result<FieldView<'_>> {
    let (definition, offset) = locate(record, field_number)?;
    Ok(FieldView {
        definition,
        architecture: record.definition.architecture,
        raw: &record.data[offset..offset + definition.size()],
    })
}

/// Overwrite `field_number` with `value`, encoded in the record's byte order.
///
/// # Errors
/// Returns [`crate::Error::FieldNotPresent`] if the field is not declared and
/// [`crate::Error::WidthMismatch`] if `value` does not encode to the declared width.
pub fn set_field(
    record: &mut DataRecord,
    field_number: u8,
    value: impl Into<FieldValue>,
) -> Result<()> {
    let encoded = value.into().encode(record.definition.architecture);
    set_field_raw(record, field_number, &encoded)
}

/// Overwrite `field_number` with `bytes` as given.
///
/// # Errors
/// Returns [`crate::Error::FieldNotPresent`] if the field is not declared and
/// [`crate::Error::WidthMismatch`] if `bytes` is not exactly the declared width.
pub fn set_field_raw(record: &mut DataRecord, field_number: u8, bytes: &[u8]) -> Result<()> {
    let (definition, offset) = locate(record, field_number)?;
    let size = definition.size();
    if bytes.len() != size {
        return Err(WidthMismatch {
            field: field_number,
            expected: size,
            actual: bytes.len(),
        });
    }

    record.data[offset..offset + size].copy_from_slice(bytes);
    record.modified = true;
    Ok(())
}

fn locate(record: &DataRecord, field_number: u8) -> Result<(&FieldDefinition, usize)> {
    record
        .definition
        .field(field_number)
        .ok_or(FieldNotPresent {
            global: record.global(),
            field: field_number,
        })
}

impl DataRecord {
    /// See [`get_field`].
    ///
    /// # Errors
    /// Returns [`crate::Error::FieldNotPresent`] if the definition does not declare the field.
    pub fn field(&self, field_number: u8) -> Result<FieldView<'_>> {
        get_field(self, field_number)
    }

    /// See [`set_field`].
    ///
    /// # Errors
    /// Returns [`crate::Error::FieldNotPresent`] or [`crate::Error::WidthMismatch`].
    pub fn set_field(&mut self, field_number: u8, value: impl Into<FieldValue>) -> Result<()> {
        set_field(self, field_number, value)
    }

    /// See [`set_field_raw`].
    ///
    /// # Errors
    /// Returns [`crate::Error::FieldNotPresent`] or [`crate::Error::WidthMismatch`].
    pub fn set_field_raw(&mut self, field_number: u8, bytes: &[u8]) -> Result<()> {
        set_field_raw(self, field_number, bytes)
    }
}
