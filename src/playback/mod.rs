//! Playback module - verse audio playback core
//!
//! - `types`: Requests, playlist and the published playback state
//! - `session`: The state machine behind the controller
//! - `transport`: Audio transport capability and its events
//! - `resolver`: Verse to audio URL lookup
//! - `controller`: `PlaybackController`, tying the above together

mod controller;
mod resolver;
mod session;
mod transport;
mod types;

#[cfg(test)]
mod testing;

pub use controller::PlaybackController;
pub use resolver::VerseAudioResolver;
pub use transport::{AudioTransport, TransportEvent};
pub use types::{PlaybackRequest, PlaybackState, PlayerStatus};
