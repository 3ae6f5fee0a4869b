//! Listeners for playback controller notifications

use tokio::sync::broadcast::error::RecvError;

use super::AppController;

impl AppController {
    /// Start the background tasks that mirror playback into the UI model.
    pub fn start_player_listeners(&self) {
        self.start_verse_change_listener();
        self.start_playback_error_listener();
    }

    /// Keep the verse cursor on the verse a Surah playback has moved to.
    fn start_verse_change_listener(&self) {
        let model = self.model.clone();
        let mut verse_changes = self.player.subscribe_verse_changes();
        tracing::info!("Starting verse change listener");

        tokio::spawn(async move {
            loop {
                let changed = match verse_changes.recv().await {
                    Ok(changed) => changed,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Verse change listener lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                let model_guard = model.lock().await;
                if model_guard.should_quit().await {
                    tracing::debug!("Verse change listener shutting down");
                    break;
                }
                let focused = model_guard.focus_verse(changed.surah, changed.ayah).await;
                tracing::debug!(surah = changed.surah, ayah = changed.ayah, focused, "Verse changed");
            }
        });
    }

    /// Pop up the error of any verse that fails to resolve or play.
    fn start_playback_error_listener(&self) {
        let model = self.model.clone();
        let mut state_rx = self.player.subscribe();

        tokio::spawn(async move {
            let mut seen_failures = state_rx.borrow_and_update().failures;
            while state_rx.changed().await.is_ok() {
                let (failures, last_error) = {
                    let state = state_rx.borrow_and_update();
                    (state.failures, state.last_error.clone())
                };
                if failures == seen_failures {
                    continue;
                }
                seen_failures = failures;
                if let Some(message) = last_error {
                    let model_guard = model.lock().await;
                    model_guard.set_error(message).await;
                }
            }
            tracing::debug!("Playback error listener stopped");
        });
    }
}
