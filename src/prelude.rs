//! # fitscope Prelude
//!
//! The types needed for the common decode, edit, encode cycle. Import with
//! `use fitscope::prelude::*;`.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all fitscope operations
pub use crate::Error;

/// The result type used throughout fitscope
pub use crate::Result;

/// Decode and encode options
pub use crate::CodecConfig;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The edit session for one file
pub use crate::FitFile;

/// Low-level file parsing utilities
pub use crate::{File, Parser};

// ================================================================================================
// Codec
// ================================================================================================

/// Base type table
pub use crate::codec::basetype::BaseType;

/// Definitions and byte order
pub use crate::codec::definition::{Architecture, FieldDefinition, MessageDefinition};

/// Header
pub use crate::codec::header::FileHeader;

/// Record stream elements
pub use crate::codec::record::{DataRecord, Record, RecordHeader};

/// Field access
pub use crate::codec::{accessor::FieldView, value::FieldValue};

/// Diagnostics
pub use crate::codec::diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics,
};

// ================================================================================================
// Profile
// ================================================================================================

/// Message numbers and field numbers
pub use crate::profile::{MesgNum, DEVICE_INFO, FILE_ID, MANUFACTURER};
