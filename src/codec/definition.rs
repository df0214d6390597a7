//! Definition records: the field layouts that data records are decoded against.
//!
//! A definition record binds a local message id (0-15) to a global message number, a byte
//! order and an ordered list of fields. Every data record that follows with the same local id
//! is laid out as the concatenation of those fields, until the id is redefined.
//!
//! Body layout after the record header byte:
//!
//! | Size  | Field                                                       |
//! |-------|-------------------------------------------------------------|
//! | 1     | Reserved                                                    |
//! | 1     | Architecture: 0 little-endian, 1 big-endian                 |
//! | 2     | Global message number, in the declared architecture         |
//! | 1     | Field count                                                 |
//! | 3 * n | Field number, size, base type code                          |
//! | 1     | Developer field count (only with the developer data flag)   |
//! | 3 * m | Field number, size, developer data index                    |

use std::sync::Arc;

use crate::{
    codec::{basetype::BaseType, record::RecordHeader},
    file::parser::Parser,
    Result,
};

/// A reference-counted pointer to a [`MessageDefinition`].
///
/// Data records share the definition they were decoded against.
pub type MessageDefinitionRc = Arc<MessageDefinition>;

/// Byte order of a definition's global message number and of its data records' values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Architecture {
    /// Architecture byte 0
    #[default]
    LittleEndian,
    /// Architecture byte 1
    BigEndian,
}

impl Architecture {
    /// Decode the architecture byte of a definition record.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for any byte other than 0 or 1.
    pub fn from_byte(byte: u8) -> Result<Architecture> {
        match byte {
            0 => Ok(Architecture::LittleEndian),
            1 => Ok(Architecture::BigEndian),
            other => Err(malformed_error!("Unknown architecture byte {}", other)),
        }
    }

    /// The architecture byte as stored in a definition record.
    #[must_use]
    pub fn as_byte(self) -> u8 {
        match self {
            Architecture::LittleEndian => 0,
            Architecture::BigEndian => 1,
        }
    }
}

/// One field of a [`MessageDefinition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Field number within the global message
    pub number: u8,
    /// Size of the field in data records, in bytes
    pub size: u8,
    /// Base type code as written, including the endian-ability bit
    pub base_type: u8,
}

impl FieldDefinition {
    /// The resolved base type, `None` for codes outside the table.
    #[must_use]
    pub fn base_type(&self) -> Option<BaseType> {
        BaseType::from_code(self.base_type)
    }

    /// Field size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        usize::from(self.size)
    }
}

/// A developer field entry, carried through without interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeveloperFieldDefinition {
    /// Developer field number
    pub number: u8,
    /// Size in data records, in bytes
    pub size: u8,
    /// Index of the developer data id message that describes the field
    pub developer_data_index: u8,
}

/// A decoded definition record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDefinition {
    /// Record header byte exactly as read
    pub header: RecordHeader,
    /// Reserved byte exactly as read
    pub reserved: u8,
    /// Byte order of the global number and of data values
    pub architecture: Architecture,
    /// Global message number, the semantic message kind
    pub global: u16,
    /// Fields in data record order
    pub fields: Vec<FieldDefinition>,
    /// Developer fields, appended after `fields` in data records
    pub developer_fields: Vec<DeveloperFieldDefinition>,
}

impl MessageDefinition {
    /// Decode a definition record body; `header` has already been consumed.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedStream`] when the body is cut short and
    /// [`crate::Error::Malformed`] for an unknown architecture byte.
    pub fn read(header: RecordHeader, parser: &mut Parser) -> Result<MessageDefinition> {
        parser.ensure_remaining(5)?;
        let reserved = parser.read_le::<u8>()?;
        let architecture = Architecture::from_byte(parser.read_le::<u8>()?)?;
        let global = match architecture {
            Architecture::LittleEndian => parser.read_le::<u16>()?,
            Architecture::BigEndian => parser.read_be::<u16>()?,
        };
        let field_count = usize::from(parser.read_le::<u8>()?);

        parser.ensure_remaining(field_count * 3)?;
        let mut fields = Vec::with_capacity(field_count);
        for _ in 0..field_count {
            fields.push(FieldDefinition {
                number: parser.read_le::<u8>()?,
                size: parser.read_le::<u8>()?,
                base_type: parser.read_le::<u8>()?,
            });
        }

        let mut developer_fields = Vec::new();
        if header.has_developer_data() {
            parser.ensure_remaining(1)?;
            let developer_count = usize::from(parser.read_le::<u8>()?);

            parser.ensure_remaining(developer_count * 3)?;
            developer_fields.reserve(developer_count);
            for _ in 0..developer_count {
                developer_fields.push(DeveloperFieldDefinition {
                    number: parser.read_le::<u8>()?,
                    size: parser.read_le::<u8>()?,
                    developer_data_index: parser.read_le::<u8>()?,
                });
            }
        }

        Ok(MessageDefinition {
            header,
            reserved,
            architecture,
            global,
            fields,
            developer_fields,
        })
    }

    /// Local message id this definition binds.
    #[must_use]
    pub fn local_id(&self) -> u8 {
        self.header.local_id()
    }

    /// Body length of every data record using this definition.
    #[must_use]
    pub fn data_size(&self) -> usize {
        let regular: usize = self.fields.iter().map(FieldDefinition::size).sum();
        let developer: usize = self
            .developer_fields
            .iter()
            .map(|field| usize::from(field.size))
            .sum();
        regular + developer
    }

    /// Locate a field by number: its definition and its byte offset within a data body.
    ///
    /// The first field with that number wins if a definition declares it twice.
    #[must_use]
    pub fn field(&self, number: u8) -> Option<(&FieldDefinition, usize)> {
        let mut offset = 0;
        for field in &self.fields {
            if field.number == number {
                return Some((field, offset));
            }
            offset += field.size();
        }
        None
    }

    /// Byte offsets of the developer field windows within a data body.
    #[must_use]
    pub fn developer_field_offsets(&self) -> Vec<(DeveloperFieldDefinition, usize)> {
        let mut offset: usize = self.fields.iter().map(FieldDefinition::size).sum();
        self.developer_fields
            .iter()
            .map(|field| {
                let start = offset;
                offset += usize::from(field.size);
                (*field, start)
            })
            .collect()
    }

    /// Encoded length of the full record, header byte included.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let developer = if self.header.has_developer_data() {
            1 + self.developer_fields.len() * 3
        } else {
            0
        };
        1 + 5 + self.fields.len() * 3 + developer
    }

    /// Append the full record, header byte included.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(self.header.byte());
        out.push(self.reserved);
        out.push(self.architecture.as_byte());
        match self.architecture {
            Architecture::LittleEndian => out.extend_from_slice(&self.global.to_le_bytes()),
            Architecture::BigEndian => out.extend_from_slice(&self.global.to_be_bytes()),
        }
        out.push(self.fields.len() as u8);
        for field in &self.fields {
            out.extend_from_slice(&[field.number, field.size, field.base_type]);
        }
        if self.header.has_developer_data() {
            out.push(self.developer_fields.len() as u8);
            for field in &self.developer_fields {
                out.extend_from_slice(&[field.number, field.size, field.developer_data_index]);
            }
        }
    }
}
