//! # Batch Conversion of Instance Directories
//!
//! Reformats every regular file directly inside a source directory from the
//! knapPI layout into the compact layout. Results are written under an output
//! subdirectory of the source directory (by default `reformatted/`), keeping
//! the original file names. Subdirectories are not descended into.
//!
//! By default, conversion stops at the first file that fails. Files converted
//! up to that point are kept. With [`Options::keep_going`], failures are
//! collected in the returned [`Summary`] instead.

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use thiserror::Error;

use crate::instances::{fio, Instance};

/// The default name of the output directory
pub const DEFAULT_OUT_DIR: &str = "reformatted";

/// Options for directory conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// The name of the output directory, relative to the source directory
    pub out_dir_name: String,
    /// Continue with the remaining files if converting a file fails
    pub keep_going: bool,
    /// Read every written file back and check it against the parsed instance
    pub verify: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            out_dir_name: DEFAULT_OUT_DIR.to_owned(),
            keep_going: false,
            verify: false,
        }
    }
}

/// Errors occurring during conversion
#[derive(Error, Debug)]
pub enum Error {
    /// The source directory could not be listed
    #[error("failed to list directory {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A source file could not be read or parsed
    #[error("failed to parse instance {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: fio::Error,
    },
    /// The output directory could not be created
    #[error("failed to create output directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// An output file could not be written
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A written file could not be read back
    #[error("failed to read back {}", path.display())]
    Verify {
        path: PathBuf,
        #[source]
        source: fio::Error,
    },
    /// A written file does not describe the same instance as its source
    #[error("{} does not match its source instance", path.display())]
    Mismatch { path: PathBuf },
    /// The output directory name is not a single plain directory name
    #[error("invalid output directory name '{}', expected a single plain directory name", path.display())]
    OutDirName { path: PathBuf },
}

impl Error {
    /// The path of the file or directory the error is about
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Error::ReadDir { path, .. }
            | Error::Parse { path, .. }
            | Error::CreateDir { path, .. }
            | Error::Write { path, .. }
            | Error::Verify { path, .. }
            | Error::Mismatch { path }
            | Error::OutDirName { path } => path,
        }
    }
}

/// Notifications emitted while converting a directory
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// A regular file is about to be converted
    Processing(&'a Path),
    /// A file was converted and its output committed
    Written { source: &'a Path, target: &'a Path },
    /// A directory entry is not a regular file and was skipped
    Skipped(&'a Path),
    /// Converting a file failed, only emitted with [`Options::keep_going`]
    Failed { source: &'a Path, error: &'a Error },
}

/// The outcome of converting a directory
#[derive(Debug, Default)]
pub struct Summary {
    /// Paths of the written output files
    pub converted: Vec<PathBuf>,
    /// Directory entries that are not regular files
    pub skipped: Vec<PathBuf>,
    /// Files that failed to convert, only populated with [`Options::keep_going`]
    pub failed: Vec<(PathBuf, Error)>,
}

impl Summary {
    /// Checks whether no file failed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Converts all regular files directly in `dir` into the compact layout
///
/// Entries are processed sorted by file name. `observe` is called with an
/// [`Event`] for every entry; [`Event::Processing`] precedes reading the file.
///
/// # Errors
///
/// If [`Options::out_dir_name`] is not a plain directory name, the directory
/// cannot be listed, or (without [`Options::keep_going`]) the
/// first error encountered while converting a file.
pub fn reformat_dir<P, F>(dir: P, opts: &Options, mut observe: F) -> Result<Summary, Error>
where
    P: AsRef<Path>,
    F: FnMut(Event<'_>),
{
    let dir = dir.as_ref();
    let out_dir = out_dir(dir, opts)?;
    let read_dir_err = |source| Error::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(read_dir_err)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_dir_err)?;
    entries.sort_unstable_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut summary = Summary::default();
    for source in entries {
        if !is_regular_file(&source) {
            observe(Event::Skipped(&source));
            summary.skipped.push(source);
            continue;
        }
        observe(Event::Processing(&source));
        match reformat_file(&source, &out_dir, opts) {
            Ok(target) => {
                observe(Event::Written {
                    source: &source,
                    target: &target,
                });
                summary.converted.push(target);
            }
            Err(error) if opts.keep_going => {
                observe(Event::Failed {
                    source: &source,
                    error: &error,
                });
                summary.failed.push((source, error));
            }
            Err(error) => return Err(error),
        }
    }
    Ok(summary)
}

/// Converts a single knapPI file into `out_dir`, keeping its file name, and
/// returns the path of the written file
///
/// `out_dir` is created if it does not exist yet. An existing output file is
/// replaced. The output only appears once it is completely written.
///
/// # Errors
///
/// If the source cannot be read or parsed, or the output cannot be written.
pub fn reformat_file<P, Q>(source: P, out_dir: Q, opts: &Options) -> Result<PathBuf, Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let source = source.as_ref();
    let out_dir = out_dir.as_ref();
    let Some(file_name) = source.file_name() else {
        return Err(Error::Parse {
            path: source.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name").into(),
        });
    };

    let inst = Instance::from_knappi_path(source).map_err(|source_err| Error::Parse {
        path: source.to_path_buf(),
        source: source_err,
    })?;

    fs::create_dir_all(out_dir).map_err(|err| Error::CreateDir {
        path: out_dir.to_path_buf(),
        source: err,
    })?;

    let target = out_dir.join(file_name);
    inst.write_compact_path(&target)
        .map_err(|err| Error::Write {
            path: target.clone(),
            source: err,
        })?;

    if opts.verify {
        verify(&target, &inst)?;
    }
    Ok(target)
}

fn verify(target: &Path, inst: &Instance) -> Result<(), Error> {
    let written = Instance::from_compact_path(target).map_err(|err| Error::Verify {
        path: target.to_path_buf(),
        source: err,
    })?;
    if written != *inst {
        return Err(Error::Mismatch {
            path: target.to_path_buf(),
        });
    }
    Ok(())
}

/// Checks whether a path is a regular file, following symlinks
fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_file())
}

/// Checks whether `name` is exactly one normal path component, i.e., not
/// empty, not `.` or `..`, without separators and not absolute
#[must_use]
pub fn is_valid_out_dir_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.ends_with(std::path::is_separator)
}

/// Gets the output directory for a source directory
///
/// # Errors
///
/// [`Error::OutDirName`] if [`Options::out_dir_name`] would not resolve to a
/// subdirectory of `dir`.
pub fn out_dir<P: AsRef<Path>>(dir: P, opts: &Options) -> Result<PathBuf, Error> {
    if !is_valid_out_dir_name(&opts.out_dir_name) {
        return Err(Error::OutDirName {
            path: PathBuf::from(&opts.out_dir_name),
        });
    }
    Ok(dir.as_ref().join(&opts.out_dir_name))
}
