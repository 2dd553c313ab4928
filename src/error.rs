use std::path::PathBuf;

use thiserror::Error;

use crate::options::IllegalOption;

#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be opened or read.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `DOTREF_CONFIG_*` variable holds a value that can't be parsed.
    #[error(transparent)]
    IllegalOption(#[from] IllegalOption),
}

impl Error {
    #[inline]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    #[inline]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
