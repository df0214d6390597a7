//! Serialization of a record stream back into a FIT file.
//!
//! The output is laid out as header, records, file CRC, trailing bytes. Records are written
//! from their stored bytes, so anything the decoder did not interpret (reserved bits, developer
//! fields, unknown base types) is reproduced unchanged. The header's payload length is set to
//! the number of record bytes actually written.
//!
//! The file CRC is computed fresh over header and records when any record has been modified, or
//! when [`CodecConfig::always_recompute_checksum`] is set. Otherwise the CRC read from the
//! source is written back, so an untouched file round-trips byte for byte even if its stored
//! CRC was wrong.
//!
//! # Examples
//!
//! ```rust
//! use fitscope::codec::{header::FileHeader, reader::read_records, writer::{FitWriter, Trailer}};
//! use fitscope::CodecConfig;
//!
//! let header = FileHeader::new(0x20, 2132);
//! let records = read_records(&[0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00])?;
//! let trailer = Trailer::default();
//!
//! let writer = FitWriter::new(&header, &records, &trailer, CodecConfig::default())?;
//! assert_eq!(writer.header().data_size, 7);
//! assert_eq!(writer.write().len(), 14 + 7 + 2);
//! # Ok::<(), fitscope::Error>(())
//! ```

use std::path::Path;

use crate::{
    codec::{checksum, header::FileHeader, record::Record},
    config::CodecConfig,
    file::output::Output,
    Error, Result,
};

/// What follows the records: the stored file CRC and any bytes after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trailer {
    /// File CRC as read from the source
    pub crc: u16,
    /// Bytes after the CRC, e.g. a chained FIT file
    pub bytes: Vec<u8>,
}

/// A planned write of one FIT file.
///
/// Construction fixes the output header (payload length, header CRC); [`FitWriter::write`]
/// and [`FitWriter::write_to_file`] then produce the bytes without further allocation
/// decisions.
pub struct FitWriter<'a> {
    header: FileHeader,
    records: &'a [Record],
    trailer: &'a Trailer,
    config: CodecConfig,
    payload_len: usize,
}

impl<'a> FitWriter<'a> {
    /// Plan the write of `records` under `header`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Error`] if the records do not fit into a 32-bit payload length.
    pub fn new(
        header: &FileHeader,
        records: &'a [Record],
        trailer: &'a Trailer,
        config: CodecConfig,
    ) -> Result<Self> {
        let payload_len: usize = records.iter().map(Record::encoded_len).sum();
        let data_size = u32::try_from(payload_len).map_err(|_| {
            Error::Error(format!(
                "Payload of {payload_len} bytes exceeds the 32-bit length field"
            ))
        })?;

        let mut header = *header;
        header.set_data_size(data_size);

        Ok(FitWriter {
            header,
            records,
            trailer,
            config,
            payload_len,
        })
    }

    /// The header as it will be written.
    #[must_use]
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// `true` when any data record has been modified.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.records
            .iter()
            .filter_map(Record::as_data)
            .any(|record| record.is_modified())
    }

    /// Total number of bytes [`FitWriter::write`] produces.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.header.len() + self.payload_len + 2 + self.trailing().len()
    }

    /// Serialize the file.
    #[must_use]
    pub fn write(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total_len());
        out.extend_from_slice(&self.header.to_bytes());
        for record in self.records {
            record.write_to(&mut out);
        }

        let crc = if self.is_dirty() || self.config.always_recompute_checksum {
            let computed = checksum::compute(&out);
            log::debug!(
                "Writing fresh file CRC 0x{:04x} over {} bytes",
                computed,
                out.len()
            );
            computed
        } else {
            self.trailer.crc
        };

        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(self.trailing());
        out
    }

    /// Serialize the file to `path` through a memory-mapped [`Output`].
    ///
    /// The target is removed again if any step fails.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be created, sized or flushed.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.write();
        let mut output = Output::create(path, bytes.len() as u64)?;
        output.write_at(0, &bytes)?;
        output.finalize()
    }

    fn trailing(&self) -> &[u8] {
        if self.config.preserve_trailing_bytes {
            &self.trailer.bytes
        } else {
            &[]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{header::HeaderChecksum, reader::read_records};

    // local 0: global 0, one uint16 field; one data record
    const PAYLOAD: [u8; 12] = [
        0x40, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01, 0x02, 0x84, 0x00, 0x34, 0x12,
    ];

    fn header() -> FileHeader {
        let mut header = FileHeader::new(0x20, 2132);
        header.set_data_size(PAYLOAD.len() as u32);
        header
    }

    #[test]
    fn clean_stream_keeps_stored_crc() {
        let records = read_records(&PAYLOAD).unwrap();
        let trailer = Trailer {
            crc: 0xBEEF,
            bytes: vec![],
        };
        let writer = FitWriter::new(&header(), &records, &trailer, CodecConfig::default()).unwrap();
        assert!(!writer.is_dirty());

        let out = writer.write();
        assert_eq!(out.len(), writer.total_len());
        assert_eq!(&out[out.len() - 2..], &[0xEF, 0xBE]);
        assert_eq!(&out[14..26], &PAYLOAD);
    }

    #[test]
    fn always_recompute_writes_valid_crc() {
        let records = read_records(&PAYLOAD).unwrap();
        let trailer = Trailer {
            crc: 0xBEEF,
            bytes: vec![],
        };
        let config = CodecConfig {
            always_recompute_checksum: true,
            ..CodecConfig::default()
        };
        let out = FitWriter::new(&header(), &records, &trailer, config)
            .unwrap()
            .write();

        // a CRC appended little-endian makes the whole file check to zero
        assert_eq!(checksum::compute(&out), 0);
    }

    #[test]
    fn dirty_stream_gets_fresh_crc() {
        let mut records = read_records(&PAYLOAD).unwrap();
        records[1].as_data_mut().unwrap().set_field(1, 0x5678u16).unwrap();

        let trailer = Trailer {
            crc: 0xBEEF,
            bytes: vec![],
        };
        let writer = FitWriter::new(&header(), &records, &trailer, CodecConfig::default()).unwrap();
        assert!(writer.is_dirty());

        let out = writer.write();
        assert_eq!(&out[24..26], &[0x78, 0x56]);
        assert_eq!(checksum::compute(&out), 0);
        assert_eq!(writer.header().verify_checksum(), HeaderChecksum::Valid);
    }

    #[test]
    fn payload_length_follows_records() {
        let records = read_records(&PAYLOAD[..6]).unwrap();
        let trailer = Trailer::default();
        let writer = FitWriter::new(&header(), &records, &trailer, CodecConfig::default()).unwrap();

        assert_eq!(writer.header().data_size, 6);
        // the length changed, so the nonzero header CRC follows it
        assert_eq!(writer.header().verify_checksum(), HeaderChecksum::Valid);

        let out = writer.write();
        assert_eq!(FileHeader::read(&out).unwrap().data_size, 6);
    }

    #[test]
    fn trailing_bytes() {
        let records = read_records(&PAYLOAD).unwrap();
        let trailer = Trailer {
            crc: 0,
            bytes: vec![0xAA, 0xBB],
        };

        let kept = FitWriter::new(&header(), &records, &trailer, CodecConfig::default())
            .unwrap()
            .write();
        assert_eq!(&kept[kept.len() - 2..], &[0xAA, 0xBB]);

        let dropped = FitWriter::new(&header(), &records, &trailer, CodecConfig::normalize())
            .unwrap()
            .write();
        assert_eq!(dropped.len(), kept.len() - 2);
        assert_eq!(checksum::compute(&dropped), 0);
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.fit");

        let records = read_records(&PAYLOAD).unwrap();
        let trailer = Trailer::default();
        let writer = FitWriter::new(&header(), &records, &trailer, CodecConfig::default()).unwrap();
        writer.write_to_file(&path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), writer.write());
    }
}
