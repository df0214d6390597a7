// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory
// - 'file/output.rs' uses mmap to write the output file

//! # fitscope
//!
//! A byte-exact codec for FIT activity files, the format written by sports watches, bike
//! computers and fitness apps.
//!
//! `fitscope` decodes the self-describing record stream of a FIT file, finds records and fields
//! by their numeric identifiers, overwrites field values in place and writes the file back.
//! Everything that was not touched comes out exactly as it went in; the trailing CRC is
//! recomputed when something changed.
//!
//! ## Features
//!
//! - **Byte-exact round trip** - An unmodified file re-encodes to identical bytes
//! - **Generic decoding** - Unknown messages, base types and developer fields pass through
//! - **Both byte orders** - Little- and big-endian definitions, decoded and encoded per record
//! - **Safe edits** - Overwrites that would change a field's width are rejected
//! - **Memory-mapped I/O** - Input files are mapped, output files are written through a mapping
//! - **Parallel batches** - Many files processed independently with rayon
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fitscope::prelude::*;
//!
//! let mut fit = FitFile::from_file("activity.fit".as_ref())?;
//! for diagnostic in fit.diagnostics().iter() {
//!     println!("{diagnostic}");
//! }
//!
//! let product = fit.get_field(MesgNum::FileId.number(), FILE_ID::PRODUCT)?;
//! println!("product: {:?}", product.value());
//!
//! fit.set_field(MesgNum::FileId.number(), FILE_ID::PRODUCT, 4341u16)?;
//! fit.to_file("activity-patched.fit")?;
//! # Ok::<(), fitscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`FitFile`] - The edit session: decode, query, modify, encode
//! - [`codec`] - Header, base types, definitions, record reader, accessor, checksum, writer
//! - [`profile`] - Names for the messages and fields device editing needs
//! - [`batch`] - Parallel processing of independent files
//! - [`file`] - Byte-level parsing and memory-mapped input/output
//! - [`CodecConfig`] - Checksum and output options
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade: decode and encode progress at
//! `debug`, individual records at `trace`, checksum problems at `warn`. No logger is installed.

#[macro_use]
pub(crate) mod error;

/// Byte-level parsing and file access.
///
/// - [`file::parser::Parser`] - Cursor over a byte slice
/// - [`file::io`] - Endian-aware reads and writes
/// - [`file::File`] - Input bytes, memory-mapped or owned
/// - [`file::output::Output`] - Memory-mapped output file, removed unless finalized
pub mod file;

/// Convenient re-exports of the most commonly used types.
///
/// ```rust,no_run
/// use fitscope::prelude::*;
///
/// let fit = FitFile::from_file("activity.fit".as_ref())?;
/// println!("{} records", fit.records().len());
/// # Ok::<(), fitscope::Error>(())
/// ```
pub mod prelude;

pub mod batch;
pub mod codec;
pub mod profile;

mod config;
mod fitfile;

/// `fitscope` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`Error`]. This is used consistently throughout the crate.
///
/// # Example
///
/// ```rust,no_run
/// use fitscope::{FitFile, Result};
///
/// fn load(path: &str) -> Result<FitFile> {
///     FitFile::from_file(std::path::Path::new(path))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `fitscope` Error type
///
/// See [`Error`] for the complete list of variants and which of them are fatal.
pub use error::Error;

/// The edit session for one FIT file.
///
/// # Example
///
/// ```rust
/// use fitscope::FitFile;
///
/// // an empty buffer is not a FIT file
/// assert!(FitFile::from_mem(Vec::new()).is_err());
/// ```
pub use fitfile::FitFile;

/// Decode and encode options.
pub use config::CodecConfig;

/// Low-level parsing utilities.
///
/// ```rust
/// use fitscope::Parser;
///
/// let mut parser = Parser::new(&[0x0E, 0x20]);
/// assert_eq!(parser.read_le::<u8>()?, 14);
/// # Ok::<(), fitscope::Error>(())
/// ```
pub use file::{parser::Parser, File};
