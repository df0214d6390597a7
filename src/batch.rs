//! Parallel processing of many independent files.
//!
//! Each file gets its own [`FitFile`] session; nothing is shared between them, so the work is
//! spread with rayon's `par_iter` and results come back in input order. One failing file does
//! not affect the others.
//!
//! ```rust,no_run
//! use fitscope::{batch, profile, CodecConfig};
//! use std::path::PathBuf;
//!
//! let jobs = vec![
//!     (PathBuf::from("a.fit"), PathBuf::from("a-out.fit")),
//!     (PathBuf::from("b.fit"), PathBuf::from("b-out.fit")),
//! ];
//! let results = batch::transform_files(&jobs, CodecConfig::lenient(), |fit| {
//!     profile::retarget_device(fit, profile::MANUFACTURER::GARMIN, 4341)
//! });
//! for ((input, _), result) in jobs.iter().zip(&results) {
//!     if let Err(error) = result {
//!         eprintln!("{}: {error}", input.display());
//!     }
//! }
//! ```

use std::path::Path;

use rayon::prelude::*;

use crate::{config::CodecConfig, FitFile, Result};

/// Decode every file in `paths`.
pub fn decode_files<P>(paths: &[P], config: CodecConfig) -> Vec<Result<FitFile>>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| FitFile::from_file_with_config(path.as_ref(), config))
        .collect()
}

/// Decode every buffer in `buffers`.
pub fn decode_buffers(buffers: Vec<Vec<u8>>, config: CodecConfig) -> Vec<Result<FitFile>> {
    buffers
        .into_par_iter()
        .map(|data| FitFile::from_mem_with_config(data, config))
        .collect()
}

/// Decode each input, apply `edit`, and write the result to the paired output path.
///
/// The output is only written when decoding and `edit` both succeed. The value `edit` returns
/// is passed through.
pub fn transform_files<P, Q, T, F>(
    jobs: &[(P, Q)],
    config: CodecConfig,
    edit: F,
) -> Vec<Result<T>>
where
    P: AsRef<Path> + Sync,
    Q: AsRef<Path> + Sync,
    T: Send,
    F: Fn(&mut FitFile) -> Result<T> + Sync,
{
    jobs.par_iter()
        .map(|(input, output)| {
            let mut fit = FitFile::from_file_with_config(input.as_ref(), config)?;
            let outcome = edit(&mut fit)?;
            fit.to_file(output)?;
            log::debug!(
                "{} -> {}",
                input.as_ref().display(),
                output.as_ref().display()
            );
            Ok(outcome)
        })
        .collect()
}
