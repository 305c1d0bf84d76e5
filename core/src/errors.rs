//! The errors produced while exporting a dataset.
//!
//! [`ExportError`] is what [`export`](crate::export) returns, and its
//! [`Display`](std::fmt::Display) names the phase that failed.
use std::{io, path::PathBuf};

use thiserror::Error;

/// An export run failed. Nothing was written to the output file.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ExportError {
    /// The sandbox directory could not be created.
    #[error("sandbox creation: {0}")]
    Sandbox(io::Error),
    /// The package could not be installed into the sandbox.
    #[error("install {package}: {source}")]
    Install {
        /// Name of the package that failed to install.
        package: String,
        /// What went wrong.
        #[source]
        source: InstallError,
    },
    /// The extraction procedure failed.
    #[error("extraction: {0}")]
    Extraction(#[from] ExtractionError),
    /// The output file could not be written.
    #[error("write {}: {}", .0.display(), .1)]
    Write(PathBuf, io::Error),
}

/// Installing a package into a [`Sandbox`](crate::Sandbox) failed.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The package could not be downloaded.
    #[error(transparent)]
    Download(#[from] DownloadError),
    /// A local package could not be copied into the sandbox.
    #[error("failed to copy {}: {}", .0.display(), .1)]
    Copy(PathBuf, io::Error),
    /// The downloaded package could not be saved into the sandbox.
    #[error("failed to save {}: {}", .0.display(), .1)]
    Save(PathBuf, io::Error),
}

/// A download failed before any bytes were handed to an exporter.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The request itself failed (DNS, TLS, connection, ...).
    #[error("failed to fetch {0}: {1}")]
    Request(String, MinreqError),
    /// The server answered, but not with `200 OK`.
    #[error("failed to fetch {url}: {status} {reason}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: i32,
        /// The HTTP reason phrase.
        reason: String,
    },
}

// New-typed errors to not have 3rd party errors in public API
/// [`minreq`] failed to perform a request.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct MinreqError(#[from] pub(crate) minreq::Error);

/// [`zip`] could not read an archive.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ZipError(#[from] pub(crate) zip::result::ZipError);

/// Reading or unpacking a package archive failed.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The archive is not a readable zip file.
    #[error("unreadable archive: {0}")]
    Zip(#[from] ZipError),
    /// No entry in the archive matched what the exporter looks for.
    #[error("archive has no entry matching {0:?}")]
    MissingEntry(String),
    /// Filesystem access failed while unpacking.
    #[error("failed to unpack to {}: {}", .0.display(), .1)]
    Io(PathBuf, io::Error),
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(err: zip::result::ZipError) -> Self {
        ArchiveError::Zip(ZipError(err))
    }
}

/// An extraction procedure could not produce its output.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The installed package could not be read.
    #[error("failed to read {}: {}", .0.display(), .1)]
    Read(PathBuf, io::Error),
    /// The installed package archive was unusable.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    /// The stopword corpus could not be staged for reading.
    #[error("corpus download: {0}")]
    CorpusDownload(ArchiveError),
    /// The dataset was not valid JSON, or not in the expected shape.
    #[error("malformed dataset: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The dataset parsed, but can't be used.
    #[error("{0}")]
    Invalid(&'static str),
    /// Every language failed or produced no usable words.
    #[error("no valid stopwords")]
    NoStopwords,
    /// No color survived validation.
    #[error("no valid colors")]
    NoColors,
}

/// A single language's word list couldn't be read from the corpus.
///
/// These are recovered from: the language is logged and skipped.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The corpus has no list for this language.
    #[error("no stopword list for \"{0}\"")]
    UnknownLanguage(String),
    /// The list exists but couldn't be read.
    #[error("failed to read from {}: {}", .0.display(), .1)]
    FailedToRead(PathBuf, io::Error),
    /// The list isn't valid UTF-8.
    #[error("{} is not valid UTF-8", .0.display())]
    NotUtf8(PathBuf),
}
