//! Playback State Store: the single source of truth for "current file" and
//! "current position".
//!
//! The store is shared between the control task, the push-channel sessions
//! and every HTTP request, so it is wrapped in an `Arc` by its owner and
//! guarded internally by a `std::sync::Mutex`.  Critical sections are a field
//! assignment or a clone, never an `.await`, so a blocking mutex is the right
//! tool here.
//!
//! Mutations are whole-field replacements (last writer wins).  [`snapshot`]
//! copies both fields under one lock, so a reader never sees a half-applied
//! update.
//!
//! [`snapshot`]: PlaybackStore::snapshot

use std::sync::{Mutex, MutexGuard};

use crate::domain::{PlaybackState, ResolvedPath};

/// Thread-safe owner of the [`PlaybackState`].
#[derive(Debug, Default)]
pub struct PlaybackStore {
    inner: Mutex<PlaybackState>,
}

impl PlaybackStore {
    /// Creates a store with both fields unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current file.
    pub fn set_file_path(&self, path: ResolvedPath) {
        self.lock().file_path = Some(path);
    }

    /// Replaces the last known position.
    pub fn set_position(&self, seconds: f64) {
        self.lock().position_seconds = Some(seconds);
    }

    /// Returns a consistent point-in-time copy of both fields.
    pub fn snapshot(&self) -> PlaybackState {
        self.lock().clone()
    }

    // A panic while holding the lock cannot leave the state half-written
    // (every mutation is a single assignment), so a poisoned lock is safe to
    // keep using.
    fn lock(&self) -> MutexGuard<'_, PlaybackState> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
