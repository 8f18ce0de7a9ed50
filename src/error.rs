use std::path::PathBuf;
use thiserror::Error;

use crate::file_type::FileType;

/// Errors raised while resolving, downloading, extracting or joining bulk data.
#[derive(Debug, Error)]
pub enum Error {
    /// The jurisdiction has no legislative session with this identifier.
    #[error("invalid session {session:?} for jurisdiction {jurisdiction:?}")]
    InvalidSession {
        jurisdiction: String,
        session: String,
    },

    /// The archive has no member ending in the file type's suffix.
    #[error("no file of type {file_type} in {}", .archive.display())]
    MissingMember {
        file_type: FileType,
        archive: PathBuf,
    },

    /// The matched session lists no bulk downloads.
    #[error("session {session:?} has no downloads")]
    NoDownloads { session: String },

    /// A download URL with no usable final path segment.
    #[error("cannot derive an archive filename from {0}")]
    BadArchiveUrl(String),

    /// A join key column is absent from one side of a join.
    #[error("missing join column {column:?}")]
    MissingColumn { column: String },

    #[error("archive member {member} is not valid UTF-8")]
    Utf8 { member: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown file type {0:?}")]
    UnknownFileType(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
}

pub type Result<T> = std::result::Result<T, Error>;
