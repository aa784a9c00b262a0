// Copyright (C) 2024 the Fluorite developers
//
// This file is part of Fluorite.
//
// Fluorite is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Fluorite is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Fluorite.  If not, see <http://www.gnu.org/licenses/>.

//! Bounded retries for contended data files.
//!
//! The game engine (or a second editor instance) may transiently hold a
//! data file open while we try to read or write it. A short fixed-delay
//! retry absorbs that race. Only the locked cause retries; anything else
//! (missing file, corrupt stream, wrong contents) fails immediately so
//! real errors are never masked by a stall.

use std::io::{Read, Write};
use std::time::{Duration, Instant};

use fluorite_filesystem::erased::ErasedFilesystem;
use fluorite_filesystem::{File, OpenFlags};

/// Retry policy for opening one file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Retry {
    pub tries: u32,
    pub delay: Duration,
}

impl Default for Retry {
    fn default() -> Self {
        Self {
            tries: 10,
            delay: Duration::from_millis(40),
        }
    }
}

/// Why a file operation failed, classified from the underlying error.
#[derive(Debug)]
pub enum ErrorCause {
    /// The file was held by another process (EACCES). The only retried
    /// cause.
    Locked,
    NotFound,
    /// The stream decoded, but its contents have the wrong shape or the
    /// wrong marshal class.
    TypeMismatch,
    /// The stream was empty, cut short, or failed to decode at all.
    Truncated,
    Other(color_eyre::Report),
}

impl std::fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Locked => f.write_str("file in use by another process"),
            Self::NotFound => f.write_str("file does not exist"),
            Self::TypeMismatch => f.write_str("file contains incorrect data"),
            Self::Truncated => f.write_str("file was empty or contained invalid data"),
            Self::Other(report) => write!(f, "{report}"),
        }
    }
}

/// Classifies an error chain into an [`ErrorCause`].
///
/// The chain is scanned outermost first, so `wrap_err` context does not
/// hide the underlying io or decode error.
pub fn classify(report: color_eyre::Report) -> ErrorCause {
    #[derive(Clone, Copy)]
    enum Kind {
        Locked,
        NotFound,
        TypeMismatch,
        Truncated,
    }

    let kind = report.chain().find_map(|error| {
        if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
            return match io_error.kind() {
                std::io::ErrorKind::PermissionDenied => Some(Kind::Locked),
                std::io::ErrorKind::NotFound => Some(Kind::NotFound),
                std::io::ErrorKind::UnexpectedEof => Some(Kind::Truncated),
                _ => None,
            };
        }
        if error.is::<fluorite_data::ShapeError>() {
            return Some(Kind::TypeMismatch);
        }
        if error.is::<alox_48::DeError>() || error.is::<alox_48::SerError>() {
            return Some(Kind::Truncated);
        }
        None
    });

    match kind {
        Some(Kind::Locked) => ErrorCause::Locked,
        Some(Kind::NotFound) => ErrorCause::NotFound,
        Some(Kind::TypeMismatch) => ErrorCause::TypeMismatch,
        Some(Kind::Truncated) => ErrorCause::Truncated,
        None => ErrorCause::Other(report),
    }
}

/// A classified failure on one data file, carrying the project relative
/// path for the user-facing message.
#[derive(Debug)]
pub struct FileError {
    pub path: camino::Utf8PathBuf,
    pub cause: ErrorCause,
}

impl FileError {
    pub fn classified(path: &camino::Utf8Path, report: color_eyre::Report) -> Self {
        Self {
            path: path.to_path_buf(),
            cause: classify(report),
        }
    }

    pub fn other(path: &camino::Utf8Path, report: color_eyre::Report) -> Self {
        Self {
            path: path.to_path_buf(),
            cause: ErrorCause::Other(report),
        }
    }

    pub fn to_load_message(&self) -> String {
        let path = &self.path;
        match &self.cause {
            ErrorCause::Locked => format!(
                "Fluorite was unable to load '{path}' because it was likely in use by another process.\nPlease try again."
            ),
            ErrorCause::NotFound => {
                format!("Fluorite was unable to load '{path}' because it does not exist.")
            }
            ErrorCause::TypeMismatch => format!(
                "Fluorite was unable to load '{path}' because it contains incorrect data. Are you sure this file has the correct name?"
            ),
            ErrorCause::Truncated => format!(
                "Fluorite was unable to load '{path}' because it was empty or contained invalid data.\nIt may be corrupt or outdated."
            ),
            ErrorCause::Other(report) => format!(
                "Fluorite was unable to load '{path}'.\n\n{report}\n\nPlease try again."
            ),
        }
    }

    pub fn to_save_message(&self) -> String {
        let path = &self.path;
        match &self.cause {
            ErrorCause::Locked => format!(
                "Fluorite was unable to save '{path}' because it was likely in use by another process.\n\nAll other data has been saved successfully. Please try again."
            ),
            cause => format!(
                "Fluorite was unable to save '{path}'.\n\n{cause}\n\nAll other data has been saved successfully. Please try again."
            ),
        }
    }
}

/// Opens `path` with `flags` and runs `action` on the open file,
/// retrying the whole open/run sequence while the failure classifies as
/// [`ErrorCause::Locked`].
///
/// Sleeps happen between attempts only: a file locked for the whole
/// window costs `retry.tries` attempts and `(retry.tries - 1)` delays
/// before giving up. Any other cause returns on the spot.
pub fn open_and_run<T>(
    filesystem: &dyn ErasedFilesystem,
    path: &camino::Utf8Path,
    flags: OpenFlags,
    retry: Retry,
    mut action: impl FnMut(&mut dyn File) -> color_eyre::Result<T>,
) -> Result<T, FileError> {
    let tries = retry.tries.max(1);
    let basename = path.file_name().unwrap_or_else(|| path.as_str());
    let started = Instant::now();

    let mut attempt = 1;
    loop {
        let result = filesystem
            .open_file(path, flags)
            .and_then(|mut file| action(&mut *file));
        let report = match result {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(
                        "{basename} opened after {attempt} attempt(s) and {}ms",
                        started.elapsed().as_millis()
                    );
                }
                return Ok(value);
            }
            Err(report) => report,
        };

        let cause = classify(report);
        if !matches!(cause, ErrorCause::Locked) {
            return Err(FileError {
                path: path.to_path_buf(),
                cause,
            });
        }
        if attempt == tries {
            tracing::warn!(
                "{basename} failed to open after {tries} attempt(s) and {}ms",
                started.elapsed().as_millis()
            );
            return Err(FileError {
                path: path.to_path_buf(),
                cause,
            });
        }
        std::thread::sleep(retry.delay);
        attempt += 1;
    }
}

/// Reads a whole file through [`open_and_run`].
pub fn read_file(
    filesystem: &dyn ErasedFilesystem,
    retry: Retry,
    path: &camino::Utf8Path,
) -> Result<Vec<u8>, FileError> {
    open_and_run(filesystem, path, OpenFlags::Read, retry, |file| {
        let mut buf = Vec::with_capacity(file.metadata()?.size as usize);
        file.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

/// Writes a whole file through [`open_and_run`], truncating any previous
/// contents.
pub fn write_file(
    filesystem: &dyn ErasedFilesystem,
    retry: Retry,
    path: &camino::Utf8Path,
    data: &[u8],
) -> Result<(), FileError> {
    open_and_run(
        filesystem,
        path,
        OpenFlags::Write | OpenFlags::Create | OpenFlags::Truncate,
        retry,
        |file| {
            file.write_all(data)?;
            file.flush()?;
            Ok(())
        },
    )
}
