use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while writing a rendered translation unit to disk.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to create directory '{path}'")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// The path the failed operation targeted.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::CreateDir { path, .. } | Self::Write { path, .. } => path,
        }
    }
}
