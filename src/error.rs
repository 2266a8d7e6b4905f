// src/error.rs
use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type VirtphpResult<T> = Result<T, VirtphpError>;

#[derive(Debug, Error)]
pub enum VirtphpError {
    /// The target directory is absent.
    #[error("This directory does not exist! ({0})")]
    NotFound(PathBuf),

    /// The target exists but carries no `.virtphp` marker.
    #[error("This directory does not contain a valid VirtPHP environment! ({0})")]
    NotManaged(PathBuf),

    #[error("failed to remove {path}: {source}")]
    RemovalFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("environment list {path} is not a valid JSON object: {source}")]
    RegistryCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write environment list {path}: {source}")]
    RegistryWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize environment list: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,
}
