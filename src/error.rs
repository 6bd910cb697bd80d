//! Error kinds shared by the store, playback and file handling layers.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HornError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("could not decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("button store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("invalid color {0:?}, expected #RRGGBB or #AARRGGBB")]
    InvalidColor(String),

    #[error("no button in slot {0}")]
    UnknownSlot(usize),

    #[error("key source unavailable: {0}")]
    KeySource(String),
}

pub type Result<T> = std::result::Result<T, HornError>;

impl HornError {
    /// Wrap an I/O error with the path it happened on. Missing files map to
    /// `NotFound` so callers can tell them apart.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            HornError::NotFound(path)
        } else {
            HornError::Io { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let err = HornError::io(
            "/missing/file.wav",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, HornError::NotFound(ref p) if p == Path::new("/missing/file.wav")));
    }

    #[test]
    fn test_io_other_kind_keeps_source() {
        let err = HornError::io(
            "/locked.wav",
            io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(matches!(err, HornError::Io { .. }));
        assert!(err.to_string().contains("/locked.wav"));
    }
}
