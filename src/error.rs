//! Error types shared across the application
//!
//! Playback failures are typed so the controller can reset its state and the
//! view can tell a resolution failure apart from an audio failure. Everything
//! above the playback core uses `anyhow` for context.

use thiserror::Error;

/// Failures surfaced by the playback controller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The audio URL lookup for a verse failed or returned nothing
    #[error("Could not resolve audio for {surah}:{ayah}: {reason}")]
    Resolution { surah: u32, ayah: u32, reason: String },

    /// The transport refused to load or play the resource
    #[error("Playback failed: {0}")]
    Playback(String),

    /// Surah and ayah numbers start at 1
    #[error("Invalid verse reference {surah}:{ayah}")]
    InvalidRequest { surah: u32, ayah: u32 },
}

/// Failures while fetching Surah lists, Surah text or translations
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {code} ({status})")]
    Api { code: u16, status: String },

    #[error("Unexpected response: {0}")]
    Malformed(String),
}

/// Failures reading or writing the saved-verse file
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Saved verses I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Saved verses file is corrupt: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No saved verse at index {0}")]
    OutOfRange(usize),
}
