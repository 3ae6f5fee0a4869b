//! Verse to audio resource lookup

use std::future::Future;

use super::types::PlaybackRequest;
use crate::error::PlaybackError;

pub trait VerseAudioResolver: Send + Sync + 'static {
    /// Return a playable URL for the verse, or `PlaybackError::Resolution`.
    fn resolve_audio(
        &self,
        request: &PlaybackRequest,
    ) -> impl Future<Output = Result<String, PlaybackError>> + Send;
}
