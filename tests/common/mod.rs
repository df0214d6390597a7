//! Shared helpers for the integration tests: a builder for synthetic FIT files.
#![allow(dead_code)]

use fitscope::codec::checksum;

/// Little-endian architecture byte.
pub const LE: u8 = 0;
/// Big-endian architecture byte.
pub const BE: u8 = 1;

/// Builds FIT files record by record.
///
/// By default the file gets a 14-byte header with a valid header CRC, the payload length of
/// the records added, and a valid file CRC.
pub struct FitBuilder {
    header_size: u8,
    header_crc: Option<u16>,
    data_size: Option<u32>,
    payload: Vec<u8>,
}

impl Default for FitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FitBuilder {
    pub fn new() -> Self {
        FitBuilder {
            header_size: 14,
            header_crc: None,
            data_size: None,
            payload: Vec::new(),
        }
    }

    /// Use a 12-byte header without CRC.
    pub fn legacy_header(mut self) -> Self {
        self.header_size = 12;
        self
    }

    /// Store `crc` as header CRC instead of the correct value.
    pub fn header_crc(mut self, crc: u16) -> Self {
        self.header_crc = Some(crc);
        self
    }

    /// Declare `size` as payload length instead of the real one.
    pub fn data_size(mut self, size: u32) -> Self {
        self.data_size = Some(size);
        self
    }

    /// A definition record; `fields` are `(number, size, base type)`.
    pub fn definition(self, local: u8, global: u16, arch: u8, fields: &[(u8, u8, u8)]) -> Self {
        self.developer_definition(local, global, arch, fields, None)
    }

    /// A definition record with developer fields `(number, size, developer data index)`.
    pub fn developer_definition(
        mut self,
        local: u8,
        global: u16,
        arch: u8,
        fields: &[(u8, u8, u8)],
        developer: Option<&[(u8, u8, u8)]>,
    ) -> Self {
        let mut header = 0x40 | (local & 0x0F);
        if developer.is_some() {
            header |= 0x20;
        }
        self.payload.extend_from_slice(&[header, 0x00, arch]);
        if arch == BE {
            self.payload.extend_from_slice(&global.to_be_bytes());
        } else {
            self.payload.extend_from_slice(&global.to_le_bytes());
        }
        self.payload.push(fields.len() as u8);
        for &(number, size, base_type) in fields {
            self.payload.extend_from_slice(&[number, size, base_type]);
        }
        if let Some(developer) = developer {
            self.payload.push(developer.len() as u8);
            for &(number, size, index) in developer {
                self.payload.extend_from_slice(&[number, size, index]);
            }
        }
        self
    }

    /// A normal data record.
    pub fn data(mut self, local: u8, body: &[u8]) -> Self {
        self.payload.push(local & 0x0F);
        self.payload.extend_from_slice(body);
        self
    }

    /// A compressed timestamp data record.
    pub fn compressed(mut self, local: u8, time_offset: u8, body: &[u8]) -> Self {
        self.payload
            .push(0x80 | ((local & 0x03) << 5) | (time_offset & 0x1F));
        self.payload.extend_from_slice(body);
        self
    }

    /// Arbitrary payload bytes.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.payload.extend_from_slice(bytes);
        self
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn header_bytes(&self) -> Vec<u8> {
        let data_size = self.data_size.unwrap_or(self.payload.len() as u32);
        let mut header = vec![self.header_size, 0x20];
        header.extend_from_slice(&2132u16.to_le_bytes());
        header.extend_from_slice(&data_size.to_le_bytes());
        header.extend_from_slice(b".FIT");
        if self.header_size == 14 {
            let crc = self
                .header_crc
                .unwrap_or_else(|| checksum::compute(&header));
            header.extend_from_slice(&crc.to_le_bytes());
        }
        header
    }

    /// Header, payload and a valid file CRC.
    pub fn build(&self) -> Vec<u8> {
        let mut file = self.header_bytes();
        file.extend_from_slice(&self.payload);
        let crc = checksum::compute(&file);
        file.extend_from_slice(&crc.to_le_bytes());
        file
    }

    /// Header, payload and `crc` as file CRC.
    pub fn build_with_crc(&self, crc: u16) -> Vec<u8> {
        let mut file = self.header_bytes();
        file.extend_from_slice(&self.payload);
        file.extend_from_slice(&crc.to_le_bytes());
        file
    }
}

/// A small but realistic activity: file_id, creator, a big-endian device_info, samples with
/// a string, an array, a developer field, a compressed timestamp record and a redefinition.
pub fn activity() -> FitBuilder {
    FitBuilder::new()
        // file_id: type enum, manufacturer uint16, product uint16, serial uint32z, time_created uint32
        .definition(
            0,
            0,
            LE,
            &[(0, 1, 0x00), (1, 2, 0x84), (2, 2, 0x84), (3, 4, 0x8C), (4, 4, 0x86)],
        )
        .data(
            0,
            &[0x04, 0x0F, 0x00, 0xF5, 0x10, 0x78, 0x56, 0x34, 0x12, 0x00, 0x10, 0x20, 0x30],
        )
        // device_info, big-endian: device_index uint8, manufacturer uint16, product uint16,
        // product_name string[8]
        .definition(
            1,
            23,
            BE,
            &[(0, 1, 0x02), (2, 2, 0x84), (4, 2, 0x84), (27, 8, 0x07)],
        )
        .data(1, &[0x00, 0x00, 0x0F, 0x10, 0xF5, b'e', b'd', b'g', b'e', 0, 0, 0, 0])
        // developer data id and record with one developer field
        .developer_definition(
            2,
            20,
            LE,
            &[(253, 4, 0x86), (3, 1, 0x02), (6, 2, 0x84), (0x40, 3, 0x02)],
            Some(&[(0, 2, 0)]),
        )
        .data(2, &[0x00, 0x10, 0x20, 0x30, 0x8C, 0xE8, 0x03, 1, 2, 3, 0xAA, 0xBB])
        .compressed(2, 5, &[0x01, 0x10, 0x20, 0x30, 0x8D, 0xE9, 0x03, 4, 5, 6, 0xCC, 0xDD])
        // unknown base type 0x1F, invalid heart rate
        .definition(3, 0xFF00, LE, &[(1, 3, 0x1F), (3, 1, 0x02)])
        .data(3, &[9, 8, 7, 0xFF])
        // local 0 redefined as an event
        .definition(0, 21, LE, &[(0, 1, 0x00), (1, 1, 0x00)])
        .data(0, &[0x00, 0x04])
}
