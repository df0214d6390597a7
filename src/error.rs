use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! header_error {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        crate::Error::MalformedHeader {
            message: format!($fmt $(, $arg)*),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The variants split into two groups. Fatal decode errors abort the decode with no partial
/// output, the session they belong to never comes into existence. Recoverable errors are
/// returned by single operations on an existing [`crate::FitFile`] and leave it fully usable.
///
/// # Error Categories
///
/// ## Fatal decode errors
/// - [`Error::MalformedHeader`] - Bad signature or header length
/// - [`Error::UnboundLocalId`] - Data record refers to a local id with no definition
/// - [`Error::TruncatedStream`] - Fewer bytes remain than a record needs
/// - [`Error::ChecksumMismatch`] - Stored file CRC differs (only when verification is enabled)
/// - [`Error::Malformed`] - Any other structural damage, such as an unknown architecture byte
///
/// ## Recoverable field errors
/// - [`Error::FieldNotPresent`] - Requested field number is not part of the record
/// - [`Error::WidthMismatch`] - New value does not encode to the declared field width
///
/// ## Byte layer and I/O
/// - [`Error::OutOfBounds`] - Attempted to read beyond buffer boundaries
/// - [`Error::Empty`] - Empty input provided
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::Error`] - Anything else, carrying a message
///
/// # Examples
///
/// ```rust,no_run
/// use fitscope::{Error, FitFile};
///
/// match FitFile::from_file(std::path::Path::new("activity.fit")) {
///     Ok(fit) => println!("{} records", fit.records().len()),
///     Err(Error::MalformedHeader { message }) => eprintln!("Not a FIT file: {message}"),
///     Err(Error::TruncatedStream { offset, .. }) => eprintln!("Cut off at {offset}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The file header could not be decoded.
    ///
    /// Raised when the signature is not `.FIT`, when the declared header length is neither
    /// 12 nor 14, or when the buffer is shorter than the declared header.
    #[error("Malformed header: {message}")]
    MalformedHeader {
        /// Description of what was wrong with the header
        message: String,
    },

    /// A data record references a local message id that has no bound definition.
    ///
    /// The field layout of the record is unknown, so no byte after it can be interpreted.
    #[error("Data record references unbound local message id {0}")]
    UnboundLocalId(u8),

    /// Fewer bytes remain than the current record declares.
    #[error("Truncated stream at payload offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedStream {
        /// Payload offset of the record that could not be completed
        offset: usize,
        /// Bytes the record requires
        needed: usize,
        /// Bytes left in the payload
        available: usize,
    },

    /// The requested field number is not declared by the record's definition.
    #[error("Field {field} is not present in message {global}")]
    FieldNotPresent {
        /// Global message number of the record
        global: u16,
        /// Field number that was looked up
        field: u8,
    },

    /// An overwrite would change the byte width of a field.
    ///
    /// Records cannot be resized in place; the rejected mutation leaves the record untouched.
    #[error("Field {field} is {expected} bytes wide, new value encodes to {actual}")]
    WidthMismatch {
        /// Field number that was targeted
        field: u8,
        /// Declared width of the field
        expected: usize,
        /// Width of the encoded replacement
        actual: usize,
    },

    /// The trailing file CRC does not match the file contents.
    #[error("File checksum mismatch: stored 0x{stored:04x}, computed 0x{computed:04x}")]
    ChecksumMismatch {
        /// CRC found in the file
        stored: u16,
        /// CRC computed over header and payload
        computed: u16,
    },

    /// The file is damaged and could not be parsed.
    ///
    /// Includes the source location where the malformation was detected.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the buffer.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),
}

impl Error {
    /// Returns `true` for errors after which the owning session is still usable.
    ///
    /// ```rust
    /// use fitscope::Error;
    ///
    /// assert!(Error::FieldNotPresent { global: 0, field: 9 }.is_recoverable());
    /// assert!(!Error::UnboundLocalId(3).is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::FieldNotPresent { .. } | Error::WidthMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_macro_records_location() {
        let error = malformed_error!("architecture {} is not supported", 7);
        match error {
            Error::Malformed {
                message,
                file,
                line,
            } => {
                assert_eq!(message, "architecture 7 is not supported");
                assert!(file.ends_with("error.rs"));
                assert!(line > 0);
            }
            _ => panic!("Expected Malformed"),
        }
    }

    #[test]
    fn header_macro_formats_message() {
        let error = header_error!("header length {} is invalid", 9);
        assert_eq!(
            error.to_string(),
            "Malformed header: header length 9 is invalid"
        );
    }

    #[test]
    fn recoverable_classification() {
        assert!(Error::WidthMismatch {
            field: 1,
            expected: 2,
            actual: 1
        }
        .is_recoverable());
        assert!(!Error::TruncatedStream {
            offset: 0,
            needed: 4,
            available: 2
        }
        .is_recoverable());
        assert!(!Error::Empty.is_recoverable());
    }
}
