//! # Module for File IO (Writing and Parsing)
//!
//! As the submodules only operate on already opened readers and writers, it is
//! recommended to parse and write through the interface of [`Instance`] rather
//! than using these functions directly.
//!
//! [`Instance`]: crate::instances::Instance

use std::{
    fs::File,
    io::{self, Write},
    path::Path,
};

use nom::{
    character::complete::{digit1, one_of},
    combinator::{all_consuming, opt},
    error::Error as NomErr,
    sequence::pair,
};
use thiserror::Error;

pub mod compact;
pub mod knappi;

/// Errors occurring while reading instance files
#[derive(Error, Debug)]
pub enum Error {
    /// A token that has to be an integer could not be parsed as one
    #[error("token {index} ('{token}') is not a valid {expected}")]
    Format {
        /// The position of the token in the input
        index: usize,
        /// The offending token
        token: String,
        /// What the token was expected to be
        expected: &'static str,
    },
    /// The input ended before all declared items were read
    #[error("expected at least {expected} tokens, but the input only has {found}")]
    OutOfRange {
        /// The number of tokens required by the declared item count
        expected: usize,
        /// The number of tokens present
        found: usize,
    },
    /// The input does not follow the compact three-line layout
    #[error("invalid compact instance in line {line}: {reason}")]
    Compact {
        /// The (one-based) line number
        line: usize,
        /// Description of the problem
        reason: String,
    },
    /// IO Errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Parses a whole token as a decimal integer with an optional sign and returns
/// it in canonical form, without a `+` sign and without leading zeros
pub(crate) fn parse_int(token: &str) -> Option<String> {
    let (_, (sign, digits)) =
        all_consuming(pair(opt(one_of::<_, _, NomErr<&str>>("+-")), digit1))(token).ok()?;
    let digits = digits.trim_start_matches('0');
    Some(match (sign, digits) {
        (_, "") => "0".to_owned(),
        (Some('-'), digits) => format!("-{digits}"),
        (_, digits) => digits.to_owned(),
    })
}

/// Parses a whole token as a non-negative item count
pub(crate) fn parse_count(token: &str) -> Option<usize> {
    parse_int(token).and_then(|val| val.parse().ok())
}

/// Opens a reader for the file at Path.
/// With feature `compression` supports bzip2, gzip and xz compression.
pub(crate) fn open_compressed_uncompressed_read<P: AsRef<Path>>(
    path: P,
) -> Result<Box<dyn io::Read>, io::Error> {
    let path = path.as_ref();
    let raw_reader = File::open(path)?;
    #[cfg(feature = "compression")]
    if let Some(ext) = path.extension() {
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("bz2")) {
            return Ok(Box::new(bzip2::read::BzDecoder::new(raw_reader)));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("gz")) {
            return Ok(Box::new(flate2::read::GzDecoder::new(raw_reader)));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("xz")) {
            return Ok(Box::new(xz2::read::XzDecoder::new(raw_reader)));
        }
    }
    Ok(Box::new(raw_reader))
}

/// Runs `write` on a writer into `sink`, compressing the data according to
/// the extension of `path` if feature `compression` is enabled.
fn write_compressed_uncompressed<S, F>(sink: S, path: &Path, write: F) -> io::Result<()>
where
    S: Write,
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    #[cfg(feature = "compression")]
    if let Some(ext) = path.extension() {
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("bz2")) {
            let mut writer = bzip2::write::BzEncoder::new(
                io::BufWriter::new(sink),
                bzip2::Compression::fast(),
            );
            write(&mut writer)?;
            return writer.finish()?.flush();
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("gz")) {
            let mut writer = flate2::write::GzEncoder::new(
                io::BufWriter::new(sink),
                flate2::Compression::fast(),
            );
            write(&mut writer)?;
            return writer.finish()?.flush();
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("xz")) {
            let mut writer = xz2::write::XzEncoder::new(io::BufWriter::new(sink), 1);
            write(&mut writer)?;
            return writer.finish()?.flush();
        }
    }
    #[cfg(not(feature = "compression"))]
    let _ = path;
    let mut writer = io::BufWriter::new(sink);
    write(&mut writer)?;
    writer.flush()
}

/// Writes a file at Path through a temporary file in the same directory that
/// only replaces `path` once `write` and all flushing succeeded. On failure,
/// `path` is left untouched and the temporary file is removed.
/// With feature `compression` supports bzip2, gzip and xz compression.
pub(crate) fn write_atomic<P, F>(path: P, write: F) -> io::Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = tempfile::NamedTempFile::new_in(dir)?;
    // temporary files are owner-only, outputs should look like any other file
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }
    write_compressed_uncompressed(tmp.as_file(), path, write)?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
