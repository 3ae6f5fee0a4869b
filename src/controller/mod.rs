//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and drives the playback controller.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Verse and Surah playback actions
//! - `navigation`: Surah list, saved verses, translations and reciters
//! - `player_events`: Listeners for playback state and verse changes

mod input;
mod playback;
mod navigation;
mod player_events;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::audio::RodioTransport;
use crate::error::{FetchError, PlaybackError, StoreError};
use crate::model::{AppModel, QuranClient};
use crate::playback::PlaybackController;

pub type Player = PlaybackController<RodioTransport, QuranClient>;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) client: QuranClient,
    pub(crate) player: Player,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>, client: QuranClient, player: Player) -> Self {
        Self {
            model,
            client,
            player,
        }
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        if let Some(e) = error.downcast_ref::<FetchError>() {
            return match e {
                FetchError::Http(inner) if inner.is_timeout() => {
                    "The Quran API timed out. Please try again.".to_string()
                }
                FetchError::Http(inner) if inner.is_connect() => {
                    "Could not reach the Quran API. Check your connection.".to_string()
                }
                FetchError::Api { code: 429, .. } => "Rate limited. Please wait a moment.".to_string(),
                other => format!("Error: {}", other),
            };
        }
        if let Some(e) = error.downcast_ref::<StoreError>() {
            return format!("Could not update saved verses: {}", e);
        }
        if let Some(e) = error.downcast_ref::<PlaybackError>() {
            return e.to_string();
        }
        format!("Error: {:#}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_by_kind() {
        let api = anyhow::Error::new(FetchError::Api {
            code: 429,
            status: "Too Many Requests".to_string(),
        });
        assert_eq!(AppController::format_error(&api), "Rate limited. Please wait a moment.");

        let store = anyhow::Error::new(StoreError::OutOfRange(4));
        assert_eq!(
            AppController::format_error(&store),
            "Could not update saved verses: No saved verse at index 4"
        );

        let playback = anyhow::Error::new(PlaybackError::Playback("no device".to_string()));
        assert_eq!(AppController::format_error(&playback), "Playback failed: no device");

        let other = anyhow::anyhow!("disk full").context("Saving");
        assert_eq!(AppController::format_error(&other), "Error: Saving: disk full");
    }
}
