//! Forward-only decoding of the record stream.
//!
//! [`RecordReader`] walks a payload (the bytes between the file header and the trailing CRC)
//! and yields one [`Record`] per step. Definition records are bound into the reader's
//! [`DefinitionRegistry`] as they pass, data records are sliced against whatever definition
//! their local id is bound to at that point in the stream.
//!
//! The reader is single-pass. It cannot be rewound or positioned mid-record; to scan again,
//! create a new reader over the same payload. After the first error it yields nothing more,
//! since the bytes following an undecodable record have no known framing.
//!
//! # Examples
//!
//! ```rust
//! use fitscope::codec::reader::RecordReader;
//!
//! // definition: local 0, global 0, field 1 (1 byte, uint8); data: 0x04
//! let payload = [0x40, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01, 0x01, 0x02, 0x00, 0x04];
//! let records = RecordReader::new(&payload).collect::<fitscope::Result<Vec<_>>>()?;
//! assert_eq!(records.len(), 2);
//! assert!(records[0].is_definition());
//! assert_eq!(records[1].as_data().unwrap().data(), &[0x04]);
//! # Ok::<(), fitscope::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    codec::{
        definition::MessageDefinition,
        record::{DataRecord, Record, RecordHeader},
        registry::DefinitionRegistry,
    },
    file::parser::Parser,
    Result,
};

/// Lazy iterator over the records of one payload.
pub struct RecordReader<'a> {
    parser: Parser<'a>,
    registry: DefinitionRegistry,
    failed: bool,
}

impl<'a> RecordReader<'a> {
    /// Start reading at the first byte of `payload`.
    #[must_use]
    pub fn new(payload: &'a [u8]) -> Self {
        RecordReader {
            parser: Parser::new(payload),
            registry: DefinitionRegistry::new(),
            failed: false,
        }
    }

    /// Payload offset of the next record.
    #[must_use]
    pub fn position(&self) -> usize {
        self.parser.pos()
    }

    /// Bindings as of the current position.
    #[must_use]
    pub fn registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    fn read_record(&mut self) -> Result<Record> {
        let offset = self.parser.pos();
        let header = RecordHeader::new(self.parser.read_le::<u8>()?);

        if header.is_definition() {
            let definition = Arc::new(MessageDefinition::read(header, &mut self.parser)?);
            log::trace!(
                "offset {}: definition local {} -> global {} ({} fields, {} developer)",
                offset,
                header.local_id(),
                definition.global,
                definition.fields.len(),
                definition.developer_fields.len()
            );
            self.registry.bind(header.local_id(), Arc::clone(&definition));
            return Ok(Record::Definition(definition));
        }

        let definition = Arc::clone(self.registry.resolve(header.local_id())?);
        let size = definition.data_size();
        self.parser.ensure_remaining(size)?;
        let data = self.parser.read_bytes(size)?.to_vec();

        Ok(Record::Data(DataRecord {
            header,
            definition,
            data,
            modified: false,
        }))
    }
}

impl Iterator for RecordReader<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.parser.has_more_data() {
            return None;
        }

        let record = self.read_record();
        if let Err(error) = &record {
            log::debug!("record stream stopped at offset {}: {}", self.parser.pos(), error);
            self.failed = true;
        }
        Some(record)
    }
}

impl std::iter::FusedIterator for RecordReader<'_> {}

/// Decode a complete payload.
///
/// # Errors
/// Returns the first decode error; no records are returned in that case.
pub fn read_records(payload: &[u8]) -> Result<Vec<Record>> {
    RecordReader::new(payload).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codec::definition::Architecture, Error};

    const FILE_ID_DEFINITION: [u8; 9] = [0x40, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01, 0x01, 0x02];

    #[test]
    fn definition_then_data() {
        let mut payload = FILE_ID_DEFINITION.to_vec();
        payload.extend_from_slice(&[0x00, 0x04]);

        let records = read_records(&payload).unwrap();
        assert_eq!(records.len(), 2);
        let data = records[1].as_data().unwrap();
        assert_eq!(data.global(), 0);
        assert_eq!(data.data(), &[0x04]);
        assert!(!data.is_modified());
    }

    #[test]
    fn data_shares_definition() {
        let mut payload = FILE_ID_DEFINITION.to_vec();
        payload.extend_from_slice(&[0x00, 0x01, 0x00, 0x02]);

        let records = read_records(&payload).unwrap();
        let Record::Definition(definition) = &records[0] else {
            panic!("Expected definition");
        };
        for record in &records[1..] {
            assert!(Arc::ptr_eq(record.as_data().unwrap().definition(), definition));
        }
    }

    #[test]
    fn redefinition_changes_layout() {
        let mut payload = FILE_ID_DEFINITION.to_vec();
        payload.extend_from_slice(&[0x00, 0x07]);
        // local 0 rebound: global 23, big-endian, field 2 (2 bytes, uint16)
        payload.extend_from_slice(&[0x40, 0x00, 0x01, 0x00, 0x17, 0x01, 0x02, 0x02, 0x84]);
        payload.extend_from_slice(&[0x00, 0x10, 0xF5]);

        let records = read_records(&payload).unwrap();
        assert_eq!(records.len(), 4);
        let second = records[3].as_data().unwrap();
        assert_eq!(second.global(), 23);
        assert_eq!(second.definition().architecture, Architecture::BigEndian);
        assert_eq!(second.data(), &[0x10, 0xF5]);
    }

    #[test]
    fn unbound_local_id_is_fatal() {
        let mut payload = FILE_ID_DEFINITION.to_vec();
        payload.extend_from_slice(&[0x03, 0x00]);

        let mut reader = RecordReader::new(&payload);
        assert!(reader.next().unwrap().is_ok());
        assert!(matches!(
            reader.next(),
            Some(Err(Error::UnboundLocalId(3)))
        ));
        assert!(reader.next().is_none());
        assert!(matches!(
            read_records(&payload),
            Err(Error::UnboundLocalId(3))
        ));
    }

    #[test]
    fn truncated_data_record_yields_nothing_partial() {
        // local 0: one 4-byte uint32 field; the data record supplies only 2 bytes
        let mut payload = vec![0x40, 0x00, 0x00, 0x14, 0x00, 0x01, 0xFD, 0x04, 0x86];
        payload.extend_from_slice(&[0x00, 0xAA, 0xBB]);

        let mut reader = RecordReader::new(&payload);
        assert!(reader.next().unwrap().unwrap().is_definition());
        match reader.next() {
            Some(Err(Error::TruncatedStream {
                needed, available, ..
            })) => {
                assert_eq!(needed, 4);
                assert_eq!(available, 2);
            }
            other => panic!("Expected TruncatedStream, got {other:?}"),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn truncated_definition() {
        let payload = [0x40, 0x00, 0x00];
        assert!(matches!(
            read_records(&payload),
            Err(Error::TruncatedStream { .. })
        ));
    }

    #[test]
    fn compressed_timestamp_record() {
        // local 1: one uint8 field
        let mut payload = vec![0x41, 0x00, 0x00, 0x14, 0x00, 0x01, 0x03, 0x01, 0x02];
        // compressed header: local 1, offset 5
        payload.extend_from_slice(&[0b1010_0101, 0x78]);

        let records = read_records(&payload).unwrap();
        let data = records[1].as_data().unwrap();
        assert!(data.header().is_compressed_timestamp());
        assert_eq!(data.header().time_offset(), Some(5));
        assert_eq!(data.global(), 20);
        assert_eq!(data.data(), &[0x78]);
    }

    #[test]
    fn developer_fields_extend_data_size() {
        // local 2 with developer flag: field 3 (1 byte), one developer field (2 bytes)
        let mut payload = vec![0x62, 0x00, 0x00, 0x14, 0x00, 0x01, 0x03, 0x01, 0x02, 0x01];
        payload.extend_from_slice(&[0x00, 0x02, 0x00]);
        payload.extend_from_slice(&[0x02, 0x11, 0x22, 0x33]);

        let records = read_records(&payload).unwrap();
        let data = records[1].as_data().unwrap();
        assert_eq!(data.data(), &[0x11, 0x22, 0x33]);
        let developer: Vec<_> = data.developer_fields().collect();
        assert_eq!(developer.len(), 1);
        assert_eq!(developer[0].1, &[0x22, 0x33]);
    }

    #[test]
    fn empty_payload() {
        assert!(read_records(&[]).unwrap().is_empty());
    }

    #[test]
    fn position_tracks_records() {
        let mut payload = FILE_ID_DEFINITION.to_vec();
        payload.extend_from_slice(&[0x00, 0x04]);

        let mut reader = RecordReader::new(&payload);
        reader.next();
        assert_eq!(reader.position(), 9);
        assert!(reader.registry().is_bound(0));
        reader.next();
        assert_eq!(reader.position(), 11);
    }
}
