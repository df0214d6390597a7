//! The edit session for one FIT file.
//!
//! [`FitFile`] decodes a complete file up front: header, every record of the payload, the
//! stored file CRC and anything after it. The session then owns the record stream
//! exclusively. Fields can be read and overwritten in place through it, and it can be written
//! back to memory or disk at any time.
//!
//! Decoding either succeeds completely or fails with no session at all. Problems that do not
//! stop decoding (wrong header CRC, bytes after the file CRC, a wrong file CRC under
//! [`CodecConfig::lenient`]) are reported through [`FitFile::diagnostics`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use fitscope::{profile::{FILE_ID, MesgNum}, FitFile};
//! use std::path::Path;
//!
//! let mut fit = FitFile::from_file(Path::new("activity.fit"))?;
//! let changed = fit.set_field(MesgNum::FileId.number(), FILE_ID::PRODUCT, 4341u16)?;
//! println!("updated {changed} record(s)");
//! fit.to_file("activity-patched.fit")?;
//! # Ok::<(), fitscope::Error>(())
//! ```

use std::{path::Path, sync::Arc};

use crate::{
    codec::{
        accessor::{self, FieldView},
        checksum,
        definition::Architecture,
        diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics},
        header::{FileHeader, HeaderChecksum},
        reader::read_records,
        record::{DataRecord, Record},
        value::FieldValue,
        writer::{FitWriter, Trailer},
    },
    config::CodecConfig,
    file::{io::read_le, File},
    Error::{self, ChecksumMismatch, FieldNotPresent, TruncatedStream, WidthMismatch},
    Result,
};

/// A decoded FIT file open for editing.
#[derive(Debug)]
pub struct FitFile {
    header: FileHeader,
    records: Vec<Record>,
    trailer: Trailer,
    diagnostics: Arc<Diagnostics>,
    config: CodecConfig,
}

impl FitFile {
    /// Decode a file from disk with the default configuration.
    ///
    /// The file is memory-mapped for the duration of the decode only; the session owns copies
    /// of every record.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or mapped, and any
    /// decode error of [`FitFile::from_bytes`].
    pub fn from_file(path: &Path) -> Result<FitFile> {
        Self::from_file_with_config(path, CodecConfig::default())
    }

    /// Decode a file from disk.
    ///
    /// # Errors
    /// See [`FitFile::from_file`].
    pub fn from_file_with_config(path: &Path, config: CodecConfig) -> Result<FitFile> {
        let file = File::from_file(path)?;
        Self::from_bytes(file.data(), config)
    }

    /// Decode from an already opened file.
    ///
    /// # Errors
    /// See [`FitFile::from_file`].
    pub fn from_std_file(file: std::fs::File) -> Result<FitFile> {
        let file = File::from_std_file(file)?;
        Self::from_bytes(file.data(), CodecConfig::default())
    }

    /// Decode an in-memory buffer with the default configuration.
    ///
    /// # Errors
    /// See [`FitFile::from_bytes`].
    pub fn from_mem(data: Vec<u8>) -> Result<FitFile> {
        Self::from_mem_with_config(data, CodecConfig::default())
    }

    /// Decode an in-memory buffer.
    ///
    /// # Errors
    /// See [`FitFile::from_bytes`].
    pub fn from_mem_with_config(data: Vec<u8>, config: CodecConfig) -> Result<FitFile> {
        let file = File::from_mem(data)?;
        Self::from_bytes(file.data(), config)
    }

    /// Decode a borrowed buffer.
    ///
    /// # Errors
    /// - [`crate::Error::Empty`] for an empty buffer
    /// - [`crate::Error::MalformedHeader`] for a bad header
    /// - [`crate::Error::UnboundLocalId`] / [`crate::Error::Malformed`] for a broken payload
    /// - [`crate::Error::TruncatedStream`] if the buffer ends before the payload or its CRC
    /// - [`crate::Error::ChecksumMismatch`] if the file CRC is wrong and
    ///   [`CodecConfig::verify_file_checksum`] is set
    pub fn from_bytes(data: &[u8], config: CodecConfig) -> Result<FitFile> {
        if data.is_empty() {
            return Err(Error::Empty);
        }

        let diagnostics = Arc::new(Diagnostics::new());
        let header = FileHeader::read(data)?;

        if config.verify_header_checksum {
            if let HeaderChecksum::Mismatch { stored, computed } = header.verify_checksum() {
                log::warn!("Header CRC 0x{stored:04x} does not match computed 0x{computed:04x}");
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticSeverity::Warning,
                        DiagnosticCategory::Header,
                        format!("Header CRC 0x{stored:04x} does not match computed 0x{computed:04x}"),
                    )
                    .with_offset(header.len() - 2),
                );
            }
        }

        let payload_start = header.len();
        let payload_end = usize::try_from(header.data_size)
            .ok()
            .and_then(|size| payload_start.checked_add(size))
            .ok_or_else(|| malformed_error!("Payload length {} overflows", header.data_size))?;

        // Decode what is there first, so a record cut short reports its own offset.
        let payload = &data[payload_start..payload_end.min(data.len())];
        let records = read_records(payload)?;

        let crc_end = payload_end + 2;
        if data.len() < crc_end {
            let available = data.len() - payload_start;
            return Err(TruncatedStream {
                offset: payload.len(),
                needed: crc_end - payload_start,
                available,
            });
        }

        let stored = read_le::<u16>(&data[payload_end..crc_end])?;
        let computed = checksum::compute(&data[..payload_end]);
        if stored != computed {
            if config.verify_file_checksum {
                return Err(ChecksumMismatch { stored, computed });
            }
            log::warn!("File CRC 0x{stored:04x} does not match computed 0x{computed:04x}");
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticSeverity::Warning,
                    DiagnosticCategory::Checksum,
                    format!("File CRC 0x{stored:04x} does not match computed 0x{computed:04x}"),
                )
                .with_offset(payload_end),
            );
        }

        let trailing = data[crc_end..].to_vec();
        if !trailing.is_empty() {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticSeverity::Info,
                    DiagnosticCategory::Trailer,
                    format!("{} bytes follow the file CRC", trailing.len()),
                )
                .with_offset(crc_end),
            );
        }

        log::debug!(
            "Decoded {} records from {} payload bytes",
            records.len(),
            payload.len()
        );

        Ok(FitFile {
            header,
            records,
            trailer: Trailer {
                crc: stored,
                bytes: trailing,
            },
            diagnostics,
            config,
        })
    }

    /// The header as read.
    #[must_use]
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// The record stream in file order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The record stream for in-place edits. Records cannot be added or removed.
    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    /// Stored file CRC and bytes after it.
    #[must_use]
    pub fn trailer(&self) -> &Trailer {
        &self.trailer
    }

    /// Findings collected during decode.
    #[must_use]
    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }

    /// The configuration this session was decoded with and will encode with.
    #[must_use]
    pub fn config(&self) -> CodecConfig {
        self.config
    }

    /// `true` once any field has been overwritten.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.records
            .iter()
            .filter_map(Record::as_data)
            .any(DataRecord::is_modified)
    }

    /// Data records of global message `global`, in file order.
    pub fn find_records(&self, global: u16) -> impl Iterator<Item = &DataRecord> {
        accessor::find_records(&self.records, global)
    }

    /// Mutable variant of [`FitFile::find_records`].
    pub fn find_records_mut(&mut self, global: u16) -> impl Iterator<Item = &mut DataRecord> {
        accessor::find_records_mut(&mut self.records, global)
    }

    /// Field `field` of the first record of message `global` that declares it.
    ///
    /// # Errors
    /// Returns [`crate::Error::FieldNotPresent`] if no such record exists.
    pub fn get_field(&self, global: u16, field: u8) -> Result<FieldView<'_>> {
        self.find_records(global)
            .find_map(|record| record.field(field).ok())
            .ok_or(FieldNotPresent { global, field })
    }

    /// Overwrite `field` with `value` in every record of message `global` that declares it.
    ///
    /// Records of the message that do not declare the field are skipped. The value is encoded
    /// separately for each byte order present. If it does not fit the declared width of any
    /// target record, nothing is changed.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    /// - [`crate::Error::FieldNotPresent`] if no record of the message declares the field
    /// - [`crate::Error::WidthMismatch`] if the value does not encode to the declared width
    pub fn set_field(
        &mut self,
        global: u16,
        field: u8,
        value: impl Into<FieldValue>,
    ) -> Result<usize> {
        let value = value.into();
        let little = value.encode(Architecture::LittleEndian);
        let big = value.encode(Architecture::BigEndian);
        let encoded = |architecture| match architecture {
            Architecture::LittleEndian => &little,
            Architecture::BigEndian => &big,
        };

        let mut targets = 0;
        for record in self.find_records(global) {
            let Some((definition, _)) = record.definition().field(field) else {
                continue;
            };
            let actual = encoded(record.definition().architecture).len();
            if actual != definition.size() {
                return Err(WidthMismatch {
                    field,
                    expected: definition.size(),
                    actual,
                });
            }
            targets += 1;
        }

        if targets == 0 {
            return Err(FieldNotPresent { global, field });
        }

        for record in accessor::find_records_mut(&mut self.records, global) {
            if record.definition().field(field).is_some() {
                let bytes = encoded(record.definition().architecture);
                record.set_field_raw(field, bytes)?;
            }
        }

        log::debug!("Set field {field} of message {global} in {targets} record(s)");
        Ok(targets)
    }

    /// Plan a write of the current state.
    ///
    /// # Errors
    /// See [`FitWriter::new`].
    pub fn writer(&self) -> Result<FitWriter<'_>> {
        FitWriter::new(&self.header, &self.records, &self.trailer, self.config)
    }

    /// Serialize the current state.
    ///
    /// # Errors
    /// See [`FitWriter::new`].
    pub fn to_memory(&self) -> Result<Vec<u8>> {
        Ok(self.writer()?.write())
    }

    /// Serialize the current state to `path`.
    ///
    /// # Errors
    /// See [`FitWriter::write_to_file`].
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.writer()?.write_to_file(path)
    }
}
