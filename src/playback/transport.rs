//! Audio transport capability used by the playback controller

use std::time::Duration;

use crate::error::PlaybackError;

/// Lifecycle signals emitted by a transport, tagged with the bind id they belong to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    Ready { bind_id: u64 },
    Ended { bind_id: u64 },
    Failed { bind_id: u64, reason: String },
}

impl TransportEvent {
    pub fn bind_id(&self) -> u64 {
        match self {
            TransportEvent::Ready { bind_id }
            | TransportEvent::Ended { bind_id }
            | TransportEvent::Failed { bind_id, .. } => *bind_id,
        }
    }
}

/// A single-resource media player.
///
/// Binding a new resource discards the previous one. Readiness, natural end
/// and asynchronous failures are reported as `TransportEvent`s carrying the
/// `bind_id` passed to `bind`, so the owner can ignore events of resources it
/// no longer cares about.
pub trait AudioTransport: Send + Sync + 'static {
    fn bind(&self, bind_id: u64, resource: &str) -> Result<(), PlaybackError>;

    fn play(&self) -> Result<(), PlaybackError>;

    fn pause(&self);

    fn seek(&self, position: Duration);
}
