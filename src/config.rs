//! Decode and encode options for [`crate::FitFile`].

/// Options controlling checksum verification and output normalization.
///
/// The header CRC is never fatal: a mismatch is reported as a warning in
/// [`crate::codec::diagnostics::Diagnostics`]. The file CRC is fatal when
/// [`CodecConfig::verify_file_checksum`] is set and a warning otherwise.
///
/// ```rust
/// use fitscope::CodecConfig;
///
/// let config = CodecConfig::lenient();
/// assert!(!config.verify_file_checksum);
/// assert!(CodecConfig::default().verify_file_checksum);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Check a nonzero header CRC on decode
    pub verify_header_checksum: bool,

    /// Fail decoding with [`crate::Error::ChecksumMismatch`] when the file CRC does not match.
    /// When unset the mismatch is recorded as a warning instead
    pub verify_file_checksum: bool,

    /// Write a freshly computed file CRC even when no record was modified
    pub always_recompute_checksum: bool,

    /// Keep bytes that follow the file CRC (chained FIT files, padding) on encode
    pub preserve_trailing_bytes: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            verify_header_checksum: true,
            verify_file_checksum: true,
            always_recompute_checksum: false,
            preserve_trailing_bytes: true,
        }
    }
}

impl CodecConfig {
    /// All checks enabled; identical to [`CodecConfig::default`].
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Decode files whose file CRC is wrong, reporting the mismatch as a warning.
    ///
    /// Useful for files cut short by a device that lost power; writing them back produces a
    /// consistent file.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            verify_file_checksum: false,
            ..Self::default()
        }
    }

    /// Lenient decode, and on encode always rewrite the CRC and drop trailing bytes.
    #[must_use]
    pub fn normalize() -> Self {
        Self {
            verify_file_checksum: false,
            always_recompute_checksum: true,
            preserve_trailing_bytes: false,
            ..Self::default()
        }
    }
}
