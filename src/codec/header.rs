//! FIT file header.
//!
//! Every FIT file starts with a little-endian preamble of 12 or 14 bytes:
//!
//! | Offset | Size | Field                                       |
//! |--------|------|---------------------------------------------|
//! | 0      | 1    | Header length (12 or 14)                    |
//! | 1      | 1    | Protocol version                            |
//! | 2      | 2    | Profile version                             |
//! | 4      | 4    | Payload length (bytes of records)           |
//! | 8      | 4    | Signature `.FIT`                            |
//! | 12     | 2    | Header CRC over bytes 0..12 (14-byte only)  |
//!
//! A stored header CRC of zero means "not computed". A wrong header CRC is tolerated: many
//! devices and tools write them, and consumers accept such files. [`FileHeader::verify_checksum`]
//! reports the outcome so the caller can raise a warning.

use crate::{
    codec::checksum,
    file::parser::Parser,
    Result,
};

/// The four signature bytes at offset 8.
pub const FIT_SIGNATURE: [u8; 4] = *b".FIT";

/// Length of a header without CRC.
pub const HEADER_LEN_LEGACY: u8 = 12;

/// Length of a header with CRC.
pub const HEADER_LEN: u8 = 14;

/// Decoded FIT file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Header length in bytes, 12 or 14
    pub header_size: u8,
    /// Protocol version byte (major in the high nibble)
    pub protocol_version: u8,
    /// Profile version, e.g. 2132 for 21.32
    pub profile_version: u16,
    /// Number of record bytes between header and trailing CRC
    pub data_size: u32,
    /// Header CRC; `None` for 12-byte headers
    pub crc: Option<u16>,
}

/// Outcome of checking the header CRC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderChecksum {
    /// 12-byte header or stored CRC of zero
    Absent,
    /// Stored CRC matches
    Valid,
    /// Stored CRC differs from the computed one
    Mismatch {
        /// CRC in the header
        stored: u16,
        /// CRC computed over the first 12 bytes
        computed: u16,
    },
}

impl FileHeader {
    /// A 14-byte header for an empty payload, with a valid header CRC.
    #[must_use]
    pub fn new(protocol_version: u8, profile_version: u16) -> FileHeader {
        let mut header = FileHeader {
            header_size: HEADER_LEN,
            protocol_version,
            profile_version,
            data_size: 0,
            crc: None,
        };
        header.crc = Some(checksum::compute(&header.crc_region()));
        header
    }

    /// Decode the header at the start of `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedHeader`] if the declared length is not 12 or 14, the
    /// buffer is shorter than the declared length, or the signature is not `.FIT`.
    pub fn read(data: &[u8]) -> Result<FileHeader> {
        let Some(&header_size) = data.first() else {
            return Err(header_error!("buffer is empty"));
        };

        if header_size != HEADER_LEN_LEGACY && header_size != HEADER_LEN {
            return Err(header_error!(
                "header length {} is neither {} nor {}",
                header_size,
                HEADER_LEN_LEGACY,
                HEADER_LEN
            ));
        }

        if data.len() < usize::from(header_size) {
            return Err(header_error!(
                "header declares {} bytes, buffer holds {}",
                header_size,
                data.len()
            ));
        }

        let mut parser = Parser::new(&data[..usize::from(header_size)]);
        parser.advance_by(1)?;
        let protocol_version = parser.read_le::<u8>()?;
        let profile_version = parser.read_le::<u16>()?;
        let data_size = parser.read_le::<u32>()?;
        let signature = parser.read_bytes(4)?;

        if signature != FIT_SIGNATURE {
            return Err(header_error!(
                "signature {:02x?} does not match .FIT",
                signature
            ));
        }

        let crc = if header_size == HEADER_LEN {
            Some(parser.read_le::<u16>()?)
        } else {
            None
        };

        Ok(FileHeader {
            header_size,
            protocol_version,
            profile_version,
            data_size,
            crc,
        })
    }

    /// Encode the header into exactly `header_size` bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.crc_region().to_vec();
        if self.header_size == HEADER_LEN {
            bytes.extend_from_slice(&self.crc.unwrap_or(0).to_le_bytes());
        }
        bytes
    }

    /// Check the stored header CRC against the header content.
    #[must_use]
    pub fn verify_checksum(&self) -> HeaderChecksum {
        match self.crc {
            None | Some(0) => HeaderChecksum::Absent,
            Some(stored) => {
                let computed = checksum::compute(&self.crc_region());
                if stored == computed {
                    HeaderChecksum::Valid
                } else {
                    HeaderChecksum::Mismatch { stored, computed }
                }
            }
        }
    }

    /// Set the payload length.
    ///
    /// When the length actually changes and the header carries a nonzero CRC, the CRC is
    /// recomputed so a previously valid header stays valid. An unchanged length leaves the
    /// stored CRC alone, including a wrong one.
    pub fn set_data_size(&mut self, data_size: u32) {
        if self.data_size == data_size {
            return;
        }

        self.data_size = data_size;
        if matches!(self.crc, Some(crc) if crc != 0) {
            self.crc = Some(checksum::compute(&self.crc_region()));
        }
    }

    /// Length of the header in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.header_size)
    }

    /// Always `false`; a header is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    fn crc_region(&self) -> [u8; 12] {
        let mut bytes = [0u8; 12];
        bytes[0] = self.header_size;
        bytes[1] = self.protocol_version;
        bytes[2..4].copy_from_slice(&self.profile_version.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.data_size.to_le_bytes());
        bytes[8..12].copy_from_slice(&FIT_SIGNATURE);
        bytes
    }
}
