//! Path Resolver: turns an untrusted path string into a [`ResolvedPath`].
//!
//! Upstream hosts send whatever their settings field contains.  In practice
//! that means paths wrapped in quotes, Windows separators arriving on a Unix
//! bridge, and the occasional path that does not exist.  The resolver:
//!
//! 1. trims surrounding whitespace and wrapping quote characters,
//! 2. rewrites foreign separators to the host convention,
//! 3. anchors relative paths at the configured base directory,
//! 4. checks that the result names an existing regular file.
//!
//! It never opens or reads the file, but the existence check is a blocking
//! `stat`; async callers run [`PathResolver::resolve`] on the blocking pool.

use std::io::ErrorKind;
use std::path::{PathBuf, MAIN_SEPARATOR};

use thiserror::Error;

use crate::domain::ResolvedPath;

/// The separator this host does *not* use.
#[cfg(windows)]
const FOREIGN_SEPARATOR: char = '/';
#[cfg(not(windows))]
const FOREIGN_SEPARATOR: char = '\\';

/// Why a proposed path was rejected.
///
/// Every variant is a non-fatal `InvalidPath` condition: it is logged and the
/// playback state keeps its previous file.
#[derive(Debug, Error)]
pub enum PathError {
    /// Nothing is left after trimming whitespace and quotes.
    #[error("empty path")]
    Empty,

    /// No filesystem entry exists at the normalized path.
    #[error("file does not exist: {0}")]
    NotFound(PathBuf),

    /// The path exists but is a directory or other non-file entry.
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),

    /// The existence check itself failed (permissions, I/O error).
    #[error("cannot access {path}: {source}")]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Normalizes and validates incoming file paths.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    base_dir: Option<PathBuf>,
}

impl PathResolver {
    /// Creates a resolver.  Relative paths are resolved against `base_dir`, or
    /// against the process working directory when it is `None`.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Normalizes `raw` and checks that it names an existing file.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when the normalized path is empty, missing, not a
    /// regular file, or cannot be inspected.
    pub fn resolve(&self, raw: &str) -> Result<ResolvedPath, PathError> {
        let normalized = normalize(raw);
        if normalized.as_os_str().is_empty() {
            return Err(PathError::Empty);
        }

        let absolute = if normalized.is_absolute() {
            normalized
        } else {
            match &self.base_dir {
                Some(base) => base.join(normalized),
                None => {
                    std::path::absolute(&normalized).map_err(|source| PathError::Inaccessible {
                        path: normalized.clone(),
                        source,
                    })?
                }
            }
        };

        match std::fs::metadata(&absolute) {
            Ok(meta) if meta.is_file() => Ok(ResolvedPath::new(absolute)),
            Ok(_) => Err(PathError::NotAFile(absolute)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(PathError::NotFound(absolute)),
            Err(source) => Err(PathError::Inaccessible {
                path: absolute,
                source,
            }),
        }
    }
}

/// Strips whitespace and wrapping quotes, then converts separators to the
/// host convention.  Pure string manipulation; no filesystem access.
pub fn normalize(raw: &str) -> PathBuf {
    let mut s = raw.trim();
    while let Some(inner) = strip_wrapping_quotes(s) {
        s = inner.trim();
    }
    PathBuf::from(s.replace(FOREIGN_SEPARATOR, &MAIN_SEPARATOR.to_string()))
}

fn strip_wrapping_quotes(s: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|q| {
        s.strip_prefix(q).and_then(|rest| rest.strip_suffix(q))
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn media_fixture() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("movie.mp4");
        fs::write(&file, b"not really a movie").unwrap();
        (dir, file)
    }

    // ── normalize ────────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_strips_double_quotes() {
        assert_eq!(normalize("\"movie.mp4\""), PathBuf::from("movie.mp4"));
    }

    #[test]
    fn test_normalize_strips_single_quotes_and_whitespace() {
        assert_eq!(normalize("  'movie.mp4'  "), PathBuf::from("movie.mp4"));
    }

    #[test]
    fn test_normalize_keeps_unbalanced_quote() {
        assert_eq!(normalize("\"movie.mp4"), PathBuf::from("\"movie.mp4"));
    }

    #[test]
    fn test_normalize_empty_quotes_yield_empty() {
        assert_eq!(normalize("\"\""), PathBuf::new());
    }

    #[cfg(not(windows))]
    #[test]
    fn test_normalize_converts_backslashes_on_unix() {
        assert_eq!(
            normalize("C:\\videos\\a.mp4"),
            PathBuf::from("C:/videos/a.mp4")
        );
    }

    #[cfg(windows)]
    #[test]
    fn test_normalize_converts_forward_slashes_on_windows() {
        assert_eq!(
            normalize("C:/videos/a.mp4"),
            PathBuf::from("C:\\videos\\a.mp4")
        );
    }

    // ── resolve ──────────────────────────────────────────────────────────────

    #[test]
    fn test_resolve_existing_absolute_file() {
        // Arrange
        let (_dir, file) = media_fixture();
        let resolver = PathResolver::default();

        // Act
        let resolved = resolver.resolve(file.to_str().unwrap()).unwrap();

        // Assert
        assert_eq!(resolved.as_path(), file.as_path());
    }

    #[test]
    fn test_resolve_quoted_existing_file() {
        let (_dir, file) = media_fixture();
        let raw = format!("\"{}\"", file.display());
        let resolved = PathResolver::default().resolve(&raw).unwrap();
        assert_eq!(resolved.as_path(), file.as_path());
    }

    #[cfg(not(windows))]
    #[test]
    fn test_resolve_backslash_path_on_unix() {
        // Arrange: express an existing absolute path with Windows separators.
        let (_dir, file) = media_fixture();
        let foreign = file.to_str().unwrap().replace('/', "\\");

        // Act
        let resolved = PathResolver::default().resolve(&foreign).unwrap();

        // Assert
        assert_eq!(resolved.as_path(), file.as_path());
    }

    #[cfg(not(windows))]
    #[test]
    fn test_resolve_drive_letter_path_relative_to_base_dir() {
        // Arrange: on a forward-slash host "C:\videos\a.mp4" normalizes to the
        // relative path "C:/videos/a.mp4".
        let base = tempfile::tempdir().unwrap();
        let videos = base.path().join("C:").join("videos");
        fs::create_dir_all(&videos).unwrap();
        fs::write(videos.join("a.mp4"), b"x").unwrap();
        let resolver = PathResolver::new(Some(base.path().to_path_buf()));

        // Act
        let resolved = resolver.resolve("C:\\videos\\a.mp4").unwrap();

        // Assert
        assert_eq!(resolved.as_path(), videos.join("a.mp4").as_path());
    }

    #[test]
    fn test_resolve_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.mp4");
        let result = PathResolver::default().resolve(missing.to_str().unwrap());
        assert!(matches!(result, Err(PathError::NotFound(p)) if p == missing));
    }

    #[test]
    fn test_resolve_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = PathResolver::default().resolve(dir.path().to_str().unwrap());
        assert!(matches!(result, Err(PathError::NotAFile(_))));
    }

    #[test]
    fn test_resolve_empty_is_rejected() {
        assert!(matches!(
            PathResolver::default().resolve("   "),
            Err(PathError::Empty)
        ));
        assert!(matches!(
            PathResolver::default().resolve("''"),
            Err(PathError::Empty)
        ));
    }

    #[test]
    fn test_resolve_relative_path_is_anchored_at_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = "definitely-not-here-7c1e.mp4";
        let resolver = PathResolver::new(Some(dir.path().to_path_buf()));
        match resolver.resolve(missing) {
            Err(PathError::NotFound(p)) => assert!(p.is_absolute()),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
