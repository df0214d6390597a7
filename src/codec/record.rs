//! Record headers and decoded stream elements.
//!
//! Every record starts with one header byte. Two layouts exist:
//!
//! ```text
//! normal header              compressed timestamp header
//! bit 7    0                 bit 7    1
//! bit 6    definition flag   bits 5-6 local message id
//! bit 5    developer data    bits 0-4 time offset (seconds, rollover 32)
//! bit 4    reserved
//! bits 0-3 local message id
//! ```
//!
//! A compressed timestamp header always introduces a data record. Its time offset is carried
//! through untouched: the header byte is stored and re-emitted verbatim, as are reserved bits.

use bitflags::bitflags;

use crate::codec::definition::{DeveloperFieldDefinition, FieldDefinition, MessageDefinitionRc};

bitflags! {
    /// Flag bits of a record header byte.
    ///
    /// Only [`RecordHeaderFlags::COMPRESSED_TIMESTAMP`] is meaningful on its own; the other two
    /// bits are only flags when the compressed timestamp bit is clear.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RecordHeaderFlags: u8 {
        /// Compressed timestamp data record
        const COMPRESSED_TIMESTAMP = 0x80;
        /// Definition record
        const DEFINITION = 0x40;
        /// Definition carries developer fields
        const DEVELOPER_DATA = 0x20;
    }
}

/// Mask of the local message id in a normal header.
const LOCAL_ID_MASK: u8 = 0x0F;

/// Mask of the local message id in a compressed timestamp header, after shifting.
const COMPRESSED_LOCAL_ID_MASK: u8 = 0x03;

/// Mask of the time offset in a compressed timestamp header.
const TIME_OFFSET_MASK: u8 = 0x1F;

/// A record header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordHeader(u8);

impl RecordHeader {
    /// Wrap a raw header byte.
    #[must_use]
    pub fn new(byte: u8) -> Self {
        RecordHeader(byte)
    }

    /// Build a normal header byte for a definition or data record.
    ///
    /// `local_id` is masked to four bits.
    #[must_use]
    pub fn normal(local_id: u8, definition: bool, developer_data: bool) -> Self {
        let mut flags = RecordHeaderFlags::empty();
        flags.set(RecordHeaderFlags::DEFINITION, definition);
        flags.set(RecordHeaderFlags::DEVELOPER_DATA, developer_data);
        RecordHeader(flags.bits() | (local_id & LOCAL_ID_MASK))
    }

    /// The raw byte.
    #[must_use]
    pub fn byte(self) -> u8 {
        self.0
    }

    /// Flag bits as read, without interpretation.
    #[must_use]
    pub fn flags(self) -> RecordHeaderFlags {
        RecordHeaderFlags::from_bits_truncate(self.0)
    }

    /// `true` for a compressed timestamp data record.
    #[must_use]
    pub fn is_compressed_timestamp(self) -> bool {
        self.flags().contains(RecordHeaderFlags::COMPRESSED_TIMESTAMP)
    }

    /// `true` for a definition record.
    #[must_use]
    pub fn is_definition(self) -> bool {
        !self.is_compressed_timestamp() && self.flags().contains(RecordHeaderFlags::DEFINITION)
    }

    /// `true` when a definition record carries developer field entries.
    #[must_use]
    pub fn has_developer_data(self) -> bool {
        self.is_definition() && self.flags().contains(RecordHeaderFlags::DEVELOPER_DATA)
    }

    /// Local message id, 0-15 for normal headers and 0-3 for compressed timestamp headers.
    #[must_use]
    pub fn local_id(self) -> u8 {
        if self.is_compressed_timestamp() {
            (self.0 >> 5) & COMPRESSED_LOCAL_ID_MASK
        } else {
            self.0 & LOCAL_ID_MASK
        }
    }

    /// Time offset of a compressed timestamp header.
    #[must_use]
    pub fn time_offset(self) -> Option<u8> {
        self.is_compressed_timestamp().then_some(self.0 & TIME_OFFSET_MASK)
    }
}

/// A decoded data record.
///
/// The body is kept as one contiguous buffer; field windows are computed from the owning
/// definition. Data records only come out of the stream reader, which guarantees that the body
/// length equals [`crate::codec::definition::MessageDefinition::data_size`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRecord {
    pub(crate) header: RecordHeader,
    pub(crate) definition: MessageDefinitionRc,
    pub(crate) data: Vec<u8>,
    pub(crate) modified: bool,
}

impl DataRecord {
    /// Record header byte as read.
    #[must_use]
    pub fn header(&self) -> RecordHeader {
        self.header
    }

    /// The definition this record was decoded against.
    #[must_use]
    pub fn definition(&self) -> &MessageDefinitionRc {
        &self.definition
    }

    /// Global message number of the owning definition.
    #[must_use]
    pub fn global(&self) -> u16 {
        self.definition.global
    }

    /// Raw body bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// `true` once any field of this record has been overwritten.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Regular fields with their raw windows, in definition order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDefinition, &[u8])> {
        let mut offset = 0;
        self.definition.fields.iter().map(move |field| {
            let start = offset;
            offset += field.size();
            (field, &self.data[start..offset])
        })
    }

    /// Developer fields with their raw windows, in definition order.
    pub fn developer_fields(&self) -> impl Iterator<Item = (DeveloperFieldDefinition, &[u8])> {
        self.definition
            .developer_field_offsets()
            .into_iter()
            .map(move |(field, start)| (field, &self.data[start..start + usize::from(field.size)]))
    }

    /// Encoded length, header byte included.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        1 + self.data.len()
    }

    /// Append the full record, header byte included.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(self.header.byte());
        out.extend_from_slice(&self.data);
    }
}

/// One element of the record stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// A definition record; shared with the data records decoded against it
    Definition(MessageDefinitionRc),
    /// A data record
    Data(DataRecord),
}

impl Record {
    /// `true` for definition records.
    #[must_use]
    pub fn is_definition(&self) -> bool {
        matches!(self, Record::Definition(_))
    }

    /// Global message number of the record or of its definition.
    #[must_use]
    pub fn global(&self) -> u16 {
        match self {
            Record::Definition(definition) => definition.global,
            Record::Data(record) => record.global(),
        }
    }

    /// The data record, if this is one.
    #[must_use]
    pub fn as_data(&self) -> Option<&DataRecord> {
        match self {
            Record::Data(record) => Some(record),
            Record::Definition(_) => None,
        }
    }

    /// The data record for mutation, if this is one.
    pub fn as_data_mut(&mut self) -> Option<&mut DataRecord> {
        match self {
            Record::Data(record) => Some(record),
            Record::Definition(_) => None,
        }
    }

    /// Encoded length, header byte included.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        match self {
            Record::Definition(definition) => definition.encoded_len(),
            Record::Data(record) => record.encoded_len(),
        }
    }

    /// Append the full record, header byte included.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Record::Definition(definition) => definition.write_to(out),
            Record::Data(record) => record.write_to(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_data_header() {
        let header = RecordHeader::new(0x03);
        assert!(!header.is_definition());
        assert!(!header.is_compressed_timestamp());
        assert_eq!(header.local_id(), 3);
        assert_eq!(header.time_offset(), None);
    }

    #[test]
    fn definition_header() {
        let header = RecordHeader::new(0x4F);
        assert!(header.is_definition());
        assert!(!header.has_developer_data());
        assert_eq!(header.local_id(), 15);

        let header = RecordHeader::new(0x62);
        assert!(header.has_developer_data());
        assert_eq!(header.local_id(), 2);
    }

    #[test]
    fn compressed_timestamp_header() {
        // 1 01 10111: local id 1, offset 23
        let header = RecordHeader::new(0b1011_0111);
        assert!(header.is_compressed_timestamp());
        assert!(!header.is_definition());
        assert!(!header.has_developer_data());
        assert_eq!(header.local_id(), 1);
        assert_eq!(header.time_offset(), Some(23));
    }

    #[test]
    fn reserved_bit_does_not_leak_into_local_id() {
        let header = RecordHeader::new(0x15);
        assert_eq!(header.local_id(), 5);
        assert_eq!(header.byte(), 0x15);
    }

    #[test]
    fn build_normal_headers() {
        assert_eq!(RecordHeader::normal(4, true, false).byte(), 0x44);
        assert_eq!(RecordHeader::normal(1, true, true).byte(), 0x61);
        assert_eq!(RecordHeader::normal(0x1F, false, false).byte(), 0x0F);
    }
}
