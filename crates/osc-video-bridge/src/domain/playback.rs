//! Playback state types.

use std::path::{Path, PathBuf};

/// An absolute path to a media file that existed when it was validated.
///
/// Only the path resolver constructs values of this type, so holding one is
/// proof that validation happened.  Existence is not re-checked afterwards: a
/// file deleted later surfaces as an error when it is streamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath(PathBuf);

impl ResolvedPath {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self(path)
    }

    /// Borrows the underlying filesystem path.
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// A point-in-time copy of the bridge's playback state.
///
/// Both fields start unset at process start and are only ever overwritten,
/// never cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    /// The current media file, once a valid path has been received.
    pub file_path: Option<ResolvedPath>,
    /// The last known upstream position in seconds, once one has been received.
    pub position_seconds: Option<f64>,
}
