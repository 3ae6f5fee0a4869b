//! Navigation-related controller methods (Surahs, saved verses, editions)

use crate::model::{ActiveSection, RECITERS, TRANSLATIONS, reciter_index, translation_index};
use super::AppController;

impl AppController {
    pub async fn load_surahs(&self) {
        let result = self.client.get_surahs().await;
        let model = self.model.lock().await;

        match result {
            Ok(surahs) => {
                tracing::info!(count = surahs.len(), "Surah list loaded");
                model.set_surahs(surahs).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load Surah list");
                let error_msg = Self::format_error(&e.into());
                model.set_error(error_msg).await;
            }
        }
    }

    /// Load Surah `number` with the current translation and show it.
    pub async fn open_surah(&self, number: u32) {
        tracing::debug!(surah = number, "Opening Surah");
        let model = self.model.lock().await;
        let generation = model.begin_surah_load(number).await;
        let translation_id = model.translation_id().await;
        // Released while fetching so the view can draw the loading state
        drop(model);

        let result = self.client.get_surah(number, &translation_id).await;
        let model = self.model.lock().await;
        match result {
            Ok(detail) => {
                tracing::info!(
                    surah = number,
                    verses = detail.verses.len(),
                    translation = %translation_id,
                    "Surah loaded"
                );
                if !model.set_surah_detail(generation, detail).await {
                    tracing::debug!(surah = number, "Discarding superseded Surah load");
                    return;
                }
                model.set_active_section(ActiveSection::Verses).await;
            }
            Err(e) => {
                tracing::error!(surah = number, error = %e, "Failed to load Surah");
                if !model.fail_surah_load(generation).await {
                    return;
                }
                let error_msg = Self::format_error(&e.into());
                model.set_error(error_msg).await;
            }
        }
    }

    /// Load a Surah in the background so the UI keeps drawing the loading state.
    pub fn spawn_open_surah(&self, number: u32) {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.open_surah(number).await;
        });
    }

    /// Jump to the selected saved verse, loading its Surah first if needed.
    pub async fn open_selected_saved(&self) {
        let model = self.model.lock().await;
        let Some(saved) = model.get_selected_saved().await else {
            return;
        };

        if model.focus_verse(saved.surah_number, saved.ayah_number).await {
            model.set_active_section(ActiveSection::Verses).await;
            return;
        }

        model
            .set_pending_focus(saved.surah_number, saved.ayah_number)
            .await;
        drop(model);
        self.spawn_open_surah(saved.surah_number);
    }

    /// Switch to the next translation edition and reload the open Surah with it.
    pub async fn cycle_translation(&self) {
        let model = self.model.lock().await;
        let current = model.translation_id().await;
        let next = TRANSLATIONS[(translation_index(&current) + 1) % TRANSLATIONS.len()];
        model.set_translation_id(next.id).await;
        tracing::info!(translation = next.id, "Translation changed");

        let open = model.open_surah_number().await;
        drop(model);
        if let Some(number) = open {
            self.spawn_open_surah(number);
        }
    }

    /// Switch to the next reciter. Takes effect from the next verse played.
    pub async fn cycle_reciter(&self) {
        let model = self.model.lock().await;
        let current = model.reciter_id().await;
        let next = RECITERS[(reciter_index(&current) + 1) % RECITERS.len()];
        model.set_reciter_id(next.id).await;
        tracing::info!(reciter = next.id, "Reciter changed");
    }
}
