//! Playback-related controller methods

use crate::playback::{PlaybackRequest, PlayerStatus};
use super::AppController;

impl AppController {
    /// Play the verse under the cursor with the current reciter.
    pub async fn play_selected_verse(&self) {
        let model = self.model.lock().await;
        let content = model.get_content_state().await;
        let reciter = model.reciter_id().await;
        drop(model);

        let (Some(surah), Some(verse)) = (content.surah_number(), content.selected_verse()) else {
            return;
        };
        let request = match PlaybackRequest::new(surah, verse.number_in_surah, reciter) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Refusing to play verse");
                return;
            }
        };

        tracing::info!(%request, "Playing verse");
        let player = self.player.clone();
        // Failures land in the playback state and are surfaced by the state listener
        tokio::spawn(async move {
            if let Err(e) = player.play_verse(request).await {
                tracing::warn!(error = %e, "Verse playback failed");
            }
        });
    }

    /// Play every verse of the open Surah, or stop if a Surah is already playing.
    pub async fn toggle_play_surah(&self) {
        if self.player.state().playlist.is_active() {
            tracing::info!("Stopping Surah playback");
            self.player.stop_all().await;
            return;
        }

        let model = self.model.lock().await;
        let content = model.get_content_state().await;
        let reciter = model.reciter_id().await;
        drop(model);

        let Some(detail) = content.detail else {
            return;
        };
        let surah = detail.surah.number;
        let ayahs = detail.ayah_numbers();
        tracing::info!(surah, verses = ayahs.len(), %reciter, "Playing Surah");

        let player = self.player.clone();
        tokio::spawn(async move {
            if let Err(e) = player.play_all(surah, &ayahs, &reciter).await {
                tracing::warn!(surah, error = %e, "Surah playback failed");
            }
        });
    }

    /// Space bar: pause a playing verse, restart a paused one, or start the selected verse.
    pub async fn toggle_pause(&self) {
        match self.player.state().status() {
            PlayerStatus::Playing | PlayerStatus::Loading => self.player.pause().await,
            PlayerStatus::Paused => self.player.restart_current().await,
            PlayerStatus::Idle => self.play_selected_verse().await,
        }
    }

    pub async fn toggle_repeat(&self) {
        let repeating = self.player.toggle_repeat().await;
        tracing::debug!(repeating, "Repeat toggled");
    }

    /// Save the verse under the cursor, or unsave it if already saved.
    pub async fn toggle_selected_saved(&self) {
        let model = self.model.lock().await;
        match model.toggle_selected_verse_saved().await {
            Ok(Some(saved)) => tracing::info!(saved, "Saved verse toggled"),
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "Failed to update saved verses");
                let error_msg = Self::format_error(&e.into());
                model.set_error(error_msg).await;
            }
        }
    }

    pub async fn remove_selected_saved(&self) {
        let model = self.model.lock().await;
        let index = model.get_ui_state().await.saved_selected;
        if model.get_saved_ayahs().await.is_empty() {
            return;
        }
        match model.remove_saved(index).await {
            Ok(removed) => tracing::info!(
                surah = removed.surah_number,
                ayah = removed.ayah_number,
                "Saved verse removed"
            ),
            Err(e) => {
                tracing::error!(error = %e, "Failed to remove saved verse");
                let error_msg = Self::format_error(&e.into());
                model.set_error(error_msg).await;
            }
        }
    }
}
