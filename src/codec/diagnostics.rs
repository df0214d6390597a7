//! Diagnostics collection for decode and encode.
//!
//! Problems that do not prevent a file from being decoded or written are reported here instead
//! of failing the operation: a header CRC that does not match, a file CRC mismatch under a
//! lenient [`crate::CodecConfig`], bytes trailing the file CRC. Fatal conditions are still
//! returned as [`crate::Error`].
//!
//! The [`Diagnostics`] container uses `boxcar::Vec` for lock-free appends, so a shared
//! collector can be handed to several sessions decoded in parallel by [`crate::batch`].
//!
//! # Key Components
//!
//! - [`Diagnostics`] - Thread-safe container for diagnostic entries
//! - [`Diagnostic`] - Individual entry with severity, category and optional location
//! - [`DiagnosticSeverity`] - Severity level (Info, Warning, Error)
//! - [`DiagnosticCategory`] - Which part of the file the entry is about
//!
//! # Examples
//!
//! ```rust
//! use fitscope::codec::diagnostics::{DiagnosticCategory, Diagnostics};
//!
//! let diagnostics = Diagnostics::new();
//! diagnostics.warning(DiagnosticCategory::Header, "Header CRC 0x1234 does not match 0x4321");
//!
//! assert!(diagnostics.has_warnings());
//! for entry in diagnostics.iter() {
//!     println!("{entry}");
//! }
//! ```

use std::fmt::{self, Write};

/// Severity level of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticSeverity {
    /// Unusual but valid construct, e.g. bytes after the file CRC.
    Info,

    /// Something is inconsistent, but the file was still decoded completely.
    ///
    /// Re-encoding repairs most of these (checksums are rewritten on every dirty write).
    Warning,

    /// A problem the current configuration chose not to treat as fatal.
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Info => write!(f, "INFO"),
            DiagnosticSeverity::Warning => write!(f, "WARN"),
            DiagnosticSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// Part of the file a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// The file header, including its optional CRC.
    Header,

    /// The trailing file CRC.
    Checksum,

    /// A definition or data record.
    Record,

    /// Bytes after the file CRC.
    Trailer,

    /// Anything else.
    General,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Header => write!(f, "Header"),
            DiagnosticCategory::Checksum => write!(f, "Checksum"),
            DiagnosticCategory::Record => write!(f, "Record"),
            DiagnosticCategory::Trailer => write!(f, "Trailer"),
            DiagnosticCategory::General => write!(f, "General"),
        }
    }
}

/// A single diagnostic entry.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level of this diagnostic.
    pub severity: DiagnosticSeverity,

    /// Part of the file this diagnostic is about.
    pub category: DiagnosticCategory,

    /// Human-readable description of the issue.
    pub message: String,

    /// Optional file offset where the issue was found.
    pub offset: Option<usize>,

    /// Optional global message number of the record involved.
    pub global: Option<u16>,
}

impl Diagnostic {
    /// Creates a new diagnostic entry without location information.
    pub fn new(
        severity: DiagnosticSeverity,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            offset: None,
            global: None,
        }
    }

    /// Adds a file offset.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Adds the global message number of the record involved.
    #[must_use]
    pub fn with_global(mut self, global: u16) -> Self {
        self.global = Some(global);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;

        if let Some(offset) = self.offset {
            write!(f, " (offset: 0x{offset:08x})")?;
        }

        if let Some(global) = self.global {
            write!(f, " (message: {global})")?;
        }

        Ok(())
    }
}

/// Thread-safe, append-only container for diagnostic entries.
#[derive(Debug)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Creates a new empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Adds an informational entry.
    pub fn info(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(DiagnosticSeverity::Info, category, message));
    }

    /// Adds a warning.
    pub fn warning(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Warning,
            category,
            message,
        ));
    }

    /// Adds an error-level entry.
    pub fn error(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Error,
            category,
            message,
        ));
    }

    /// Adds an entry built with location information.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Returns true if any entries have been collected.
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Returns true if any error-level entries have been collected.
    pub fn has_errors(&self) -> bool {
        self.count_of(DiagnosticSeverity::Error) > 0
    }

    /// Returns true if any warnings have been collected.
    pub fn has_warnings(&self) -> bool {
        self.count_of(DiagnosticSeverity::Warning) > 0
    }

    /// Total number of entries.
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Number of entries with the given severity.
    pub fn count_of(&self, severity: DiagnosticSeverity) -> usize {
        self.iter().filter(|d| d.severity == severity).count()
    }

    /// Iterates over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// All error-level entries.
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.with_severity(DiagnosticSeverity::Error)
    }

    /// All warnings.
    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.with_severity(DiagnosticSeverity::Warning)
    }

    /// Entries of one category.
    pub fn by_category(&self, category: DiagnosticCategory) -> Vec<&Diagnostic> {
        self.iter().filter(|d| d.category == category).collect()
    }

    fn with_severity(&self, severity: DiagnosticSeverity) -> Vec<&Diagnostic> {
        self.iter().filter(|d| d.severity == severity).collect()
    }

    /// Formats a summary of all entries for display.
    pub fn summary(&self) -> String {
        let mut output = String::new();

        let error_count = self.count_of(DiagnosticSeverity::Error);
        let warning_count = self.count_of(DiagnosticSeverity::Warning);
        let info_count = self.count_of(DiagnosticSeverity::Info);

        let _ = writeln!(
            output,
            "Diagnostics: {error_count} error(s), {warning_count} warning(s), {info_count} info(s)"
        );

        for (title, entries) in [("Errors", self.errors()), ("Warnings", self.warnings())] {
            if entries.is_empty() {
                continue;
            }
            let _ = writeln!(output, "\n{title}:");
            for diag in entries {
                let _ = writeln!(output, "  {diag}");
            }
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
