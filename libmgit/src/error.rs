use std::{io, path::PathBuf};

use miniz_oxide::inflate::TINFLStatus;
use thiserror::Error;

use crate::hash::ObjectHash;

/// Everything that can go wrong while working with a repository
/// and its object store.
#[derive(Debug, Error)]
pub enum Error {
    #[error("object {0} does not exist in the repository")]
    ObjectNotFound(ObjectHash),

    #[error("malformed {kind} object: {reason}")]
    MalformedObject { kind: &'static str, reason: String },

    #[error("failed to decompress object data: {0:?}")]
    Decompression(TINFLStatus),

    #[error("failed to read {}", .path.display())]
    StorageRead { path: PathBuf, source: io::Error },

    #[error("failed to write {}", .path.display())]
    StorageWrite { path: PathBuf, source: io::Error },

    #[error("no commits have been made in the repository")]
    NoCommits,

    #[error("commit object does not reference a tree")]
    MissingTreeReference,

    #[error("invalid object hash: {0:?}")]
    InvalidHash(String),

    #[error("no .mgit directory found when searching upwards from: {}", .0.display())]
    NotARepository(PathBuf),
}

impl Error {
    /// Build a [`Error::MalformedObject`] for an unparseable tree.
    pub(crate) fn malformed_tree(reason: impl Into<String>) -> Error {
        Error::MalformedObject { kind: "tree", reason: reason.into() }
    }

    /// Build a [`Error::MalformedObject`] for an unparseable commit.
    pub(crate) fn malformed_commit(reason: impl Into<String>) -> Error {
        Error::MalformedObject { kind: "commit", reason: reason.into() }
    }

    /// Attach a path to an [`io::Error`] raised while reading.
    pub(crate) fn read(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Error {
        |source| Error::StorageRead { path: path.into(), source }
    }

    /// Attach a path to an [`io::Error`] raised while writing.
    pub(crate) fn write(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Error {
        |source| Error::StorageWrite { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
