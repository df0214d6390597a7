//! The FIT CRC-16.
//!
//! FIT protects both the 14-byte header and the whole file with the same 16-bit CRC. It is
//! not CRC-16/CCITT: every input byte is folded in as two nibbles, low nibble first, each step
//! shifting the running value right by four and mixing in two entries of a fixed 16-entry table.
//!
//! The serializer recomputes the file CRC from scratch on every write of a modified stream;
//! nothing in this module is cached across mutations.
//!
//! # Examples
//!
//! ```rust
//! use fitscope::codec::checksum::{compute, Crc16};
//!
//! let data = b"123456789";
//! let mut crc = Crc16::new();
//! crc.update(&data[..4]);
//! crc.update(&data[4..]);
//! assert_eq!(crc.value(), compute(data));
//! ```

const CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
    0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
];

/// Running FIT CRC over bytes fed in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crc16 {
    value: u16,
}

impl Crc16 {
    /// A CRC with the initial value of zero.
    #[must_use]
    pub fn new() -> Self {
        Self { value: 0 }
    }

    /// Fold one byte into the running value.
    pub fn update_byte(&mut self, byte: u8) {
        let mut crc = self.value;

        // low nibble
        let tmp = CRC_TABLE[usize::from(crc & 0x0F)];
        crc = (crc >> 4) & 0x0FFF;
        crc = crc ^ tmp ^ CRC_TABLE[usize::from(byte & 0x0F)];

        // high nibble
        let tmp = CRC_TABLE[usize::from(crc & 0x0F)];
        crc = (crc >> 4) & 0x0FFF;
        crc = crc ^ tmp ^ CRC_TABLE[usize::from(byte >> 4)];

        self.value = crc;
    }

    /// Fold every byte of `data` into the running value.
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.update_byte(byte);
        }
    }

    /// Current CRC value.
    #[must_use]
    pub fn value(&self) -> u16 {
        self.value
    }
}

/// CRC of `data` in one call.
#[must_use]
pub fn compute(data: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.update(data);
    crc.value()
}
