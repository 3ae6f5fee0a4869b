//! Main application model with state management

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::content::ContentState;
use super::quran::{Surah, SurahDetail};
use super::saved::{SavedAyah, SavedAyahStore};
use super::types::{ActiveSection, UiState};
use crate::error::StoreError;

const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

/// Main application model containing all UI-side state
pub struct AppModel {
    pub ui_state: Arc<Mutex<UiState>>,
    pub content_state: Arc<Mutex<ContentState>>,
    saved: Arc<Mutex<SavedAyahStore>>,
    /// Verse to select once the Surah being loaded arrives
    pending_focus: Arc<Mutex<Option<(u32, u32)>>>,
    /// Generation of the latest Surah load; older results are dropped
    surah_load: Arc<Mutex<u64>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(ui_state: UiState, saved: SavedAyahStore) -> Self {
        Self {
            ui_state: Arc::new(Mutex::new(ui_state)),
            content_state: Arc::new(Mutex::new(ContentState::default())),
            saved: Arc::new(Mutex::new(saved)),
            pending_focus: Arc::new(Mutex::new(None)),
            surah_load: Arc::new(Mutex::new(0)),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn get_content_state(&self) -> ContentState {
        self.content_state.lock().await.clone()
    }

    // ========================================================================
    // Sections & Selection
    // ========================================================================

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        let mut state = self.ui_state.lock().await;
        state.active_section = section;
    }

    pub async fn move_selection_up(&self) {
        let mut state = self.ui_state.lock().await;
        let section = state.active_section;
        match section {
            ActiveSection::Surahs => {
                state.surah_selected = state.surah_selected.saturating_sub(1);
            }
            ActiveSection::Saved => {
                state.saved_selected = state.saved_selected.saturating_sub(1);
            }
            ActiveSection::Verses => {
                drop(state);
                self.content_state.lock().await.move_up();
            }
        }
    }

    pub async fn move_selection_down(&self) {
        let mut state = self.ui_state.lock().await;
        let section = state.active_section;
        match section {
            ActiveSection::Surahs => {
                if state.surah_selected + 1 < state.surahs.len() {
                    state.surah_selected += 1;
                }
            }
            ActiveSection::Saved => {
                let count = self.saved.lock().await.len();
                if state.saved_selected + 1 < count {
                    state.saved_selected += 1;
                }
            }
            ActiveSection::Verses => {
                drop(state);
                self.content_state.lock().await.move_down();
            }
        }
    }

    // ========================================================================
    // Surahs & Content
    // ========================================================================

    pub async fn set_surahs(&self, surahs: Vec<Surah>) {
        let mut state = self.ui_state.lock().await;
        state.surah_selected = state.surah_selected.min(surahs.len().saturating_sub(1));
        state.surahs = surahs;
    }

    /// Move the Surah list cursor onto Surah `number`.
    pub async fn select_surah_number(&self, number: u32) {
        let mut state = self.ui_state.lock().await;
        if let Some(index) = state.surahs.iter().position(|s| s.number == number) {
            state.surah_selected = index;
        }
    }

    pub async fn get_selected_surah(&self) -> Option<Surah> {
        self.ui_state.lock().await.selected_surah().cloned()
    }

    /// Start loading Surah `number`. The returned generation must accompany
    /// the result; loads started later supersede this one.
    pub async fn begin_surah_load(&self, number: u32) -> u64 {
        let generation = {
            let mut latest = self.surah_load.lock().await;
            *latest += 1;
            *latest
        };
        self.content_state.lock().await.is_loading = true;
        self.select_surah_number(number).await;
        generation
    }

    async fn is_latest_surah_load(&self, generation: u64) -> bool {
        *self.surah_load.lock().await == generation
    }

    /// Clear the loading flag after a failed load. Returns false if superseded.
    pub async fn fail_surah_load(&self, generation: u64) -> bool {
        if !self.is_latest_surah_load(generation).await {
            return false;
        }
        self.content_state.lock().await.is_loading = false;
        true
    }

    /// Show a freshly loaded Surah, selecting the pending verse if one was requested.
    /// Returns false, changing nothing, when a newer load has started since.
    pub async fn set_surah_detail(&self, generation: u64, detail: SurahDetail) -> bool {
        if !self.is_latest_surah_load(generation).await {
            return false;
        }
        let focus = self.pending_focus.lock().await.take();
        let mut content = self.content_state.lock().await;
        let same_surah = content.surah_number() == Some(detail.surah.number);
        let previous = content.verse_selected;
        content.detail = Some(detail);
        content.is_loading = false;
        content.verse_selected = if same_surah { previous } else { 0 };
        if let Some((surah, ayah)) = focus {
            content.focus_verse(surah, ayah);
        }
        true
    }

    pub async fn set_pending_focus(&self, surah: u32, ayah: u32) {
        *self.pending_focus.lock().await = Some((surah, ayah));
    }

    /// Select `ayah` in the verse list when `surah` is the open Surah.
    pub async fn focus_verse(&self, surah: u32, ayah: u32) -> bool {
        self.content_state.lock().await.focus_verse(surah, ayah)
    }

    pub async fn open_surah_number(&self) -> Option<u32> {
        self.content_state.lock().await.surah_number()
    }

    // ========================================================================
    // Translation & Reciter
    // ========================================================================

    pub async fn toggle_translation(&self) -> bool {
        let mut state = self.ui_state.lock().await;
        state.show_translation = !state.show_translation;
        state.show_translation
    }

    pub async fn translation_id(&self) -> String {
        self.ui_state.lock().await.translation_id.clone()
    }

    pub async fn set_translation_id(&self, id: &str) {
        self.ui_state.lock().await.translation_id = id.to_string();
    }

    pub async fn reciter_id(&self) -> String {
        self.ui_state.lock().await.reciter_id.clone()
    }

    pub async fn set_reciter_id(&self, id: &str) {
        self.ui_state.lock().await.reciter_id = id.to_string();
    }

    // ========================================================================
    // Saved Verses
    // ========================================================================

    pub async fn get_saved_ayahs(&self) -> Vec<SavedAyah> {
        self.saved.lock().await.all().to_vec()
    }

    pub async fn get_selected_saved(&self) -> Option<SavedAyah> {
        let index = self.ui_state.lock().await.saved_selected;
        self.saved.lock().await.get(index).cloned()
    }

    /// Save the selected verse of the open Surah, or unsave it if already saved.
    /// Returns the new saved status, or `None` when no verse is selected.
    pub async fn toggle_selected_verse_saved(&self) -> Result<Option<bool>, StoreError> {
        let record = {
            let content = self.content_state.lock().await;
            let (Some(detail), Some(verse)) = (content.detail.as_ref(), content.selected_verse()) else {
                return Ok(None);
            };
            SavedAyah {
                surah_number: detail.surah.number,
                ayah_number: verse.number_in_surah,
                text: verse.text.clone(),
                translation: verse.translation.clone().unwrap_or_default(),
                surah_name: detail.surah.english_name.clone(),
                timestamp: 0,
            }
        };
        let saved = self.saved.lock().await.toggle(record)?;
        self.clamp_saved_selection().await;
        Ok(Some(saved))
    }

    pub async fn remove_saved(&self, index: usize) -> Result<SavedAyah, StoreError> {
        let removed = self.saved.lock().await.remove(index)?;
        self.clamp_saved_selection().await;
        Ok(removed)
    }

    async fn clamp_saved_selection(&self) {
        let count = self.saved.lock().await.len();
        let mut state = self.ui_state.lock().await;
        state.saved_selected = state.saved_selected.min(count.saturating_sub(1));
    }

    // ========================================================================
    // Errors & Popups
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if state
            .error_timestamp
            .is_some_and(|t| t.elapsed() >= ERROR_DISPLAY_TIME)
        {
            state.error_message = None;
            state.error_timestamp = None;
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quran::{RevelationType, Verse};
    use crate::model::saved::SAVED_AYAHS_FILE;
    use tempfile::TempDir;

    fn detail(surah: u32, verses: u32) -> SurahDetail {
        SurahDetail {
            surah: Surah {
                number: surah,
                name: "ٱلْإِخْلَاص".to_string(),
                english_name: "Al-Ikhlaas".to_string(),
                english_name_translation: "Sincerity".to_string(),
                number_of_ayahs: verses,
                revelation_type: RevelationType::Meccan,
            },
            verses: (1..=verses)
                .map(|n| Verse {
                    number: 6000 + n,
                    number_in_surah: n,
                    text: format!("arabic {}", n),
                    translation: Some(format!("english {}", n)),
                    juz: 30,
                    page: 604,
                    sajda: false,
                })
                .collect(),
            translation_id: "en.asad".to_string(),
        }
    }

    async fn load(model: &AppModel, detail: SurahDetail) {
        let generation = model.begin_surah_load(detail.surah.number).await;
        assert!(model.set_surah_detail(generation, detail).await);
    }

    fn model(dir: &TempDir) -> AppModel {
        let store = SavedAyahStore::load(dir.path().join(SAVED_AYAHS_FILE)).unwrap();
        AppModel::new(UiState::new("en.asad", "ar.alafasy"), store)
    }

    #[tokio::test]
    async fn test_pending_focus_applies_on_load() {
        let dir = TempDir::new().unwrap();
        let model = model(&dir);

        model.set_pending_focus(112, 3).await;
        load(&model, detail(112, 4)).await;

        let content = model.get_content_state().await;
        assert_eq!(content.verse_selected, 2);
        assert!(!content.is_loading);
    }

    #[tokio::test]
    async fn test_toggle_selected_verse_saved() {
        let dir = TempDir::new().unwrap();
        let model = model(&dir);
        assert_eq!(model.toggle_selected_verse_saved().await.unwrap(), None);

        load(&model, detail(112, 4)).await;
        model.focus_verse(112, 2).await;

        assert_eq!(model.toggle_selected_verse_saved().await.unwrap(), Some(true));
        let saved = model.get_saved_ayahs().await;
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].ayah_number, 2);
        assert_eq!(saved[0].translation, "english 2");
        assert_eq!(saved[0].surah_name, "Al-Ikhlaas");

        assert_eq!(model.toggle_selected_verse_saved().await.unwrap(), Some(false));
        assert!(model.get_saved_ayahs().await.is_empty());
    }

    #[tokio::test]
    async fn test_old_errors_are_cleared() {
        let dir = TempDir::new().unwrap();
        let model = model(&dir);
        model.set_error("boom".to_string()).await;
        model.auto_clear_old_errors().await;
        assert!(model.has_error().await);

        model.ui_state.lock().await.error_timestamp =
            Some(Instant::now() - ERROR_DISPLAY_TIME - Duration::from_millis(1));
        model.auto_clear_old_errors().await;
        assert!(!model.has_error().await);
    }

    #[tokio::test]
    async fn test_reload_same_surah_keeps_cursor() {
        let dir = TempDir::new().unwrap();
        let model = model(&dir);
        load(&model, detail(112, 4)).await;
        model.focus_verse(112, 4).await;

        load(&model, detail(112, 4)).await;
        assert_eq!(model.get_content_state().await.verse_selected, 3);

        load(&model, detail(113, 5)).await;
        assert_eq!(model.get_content_state().await.verse_selected, 0);
    }

    #[tokio::test]
    async fn test_superseded_surah_load_is_dropped() {
        let dir = TempDir::new().unwrap();
        let model = model(&dir);

        let slow = model.begin_surah_load(2).await;
        model.set_pending_focus(113, 3).await;
        let fast = model.begin_surah_load(113).await;

        assert!(model.set_surah_detail(fast, detail(113, 5)).await);
        assert!(!model.set_surah_detail(slow, detail(2, 7)).await);
        assert!(!model.fail_surah_load(slow).await);

        let content = model.get_content_state().await;
        assert_eq!(content.surah_number(), Some(113));
        assert_eq!(content.verse_selected, 2);
        assert!(!content.is_loading);
    }

    #[tokio::test]
    async fn test_stale_detail_keeps_pending_focus() {
        let dir = TempDir::new().unwrap();
        let model = model(&dir);

        let stale = model.begin_surah_load(1).await;
        let latest = model.begin_surah_load(112).await;
        model.set_pending_focus(112, 4).await;

        assert!(!model.set_surah_detail(stale, detail(1, 7)).await);
        assert!(model.get_content_state().await.is_loading);

        assert!(model.set_surah_detail(latest, detail(112, 4)).await);
        assert_eq!(model.get_content_state().await.verse_selected, 3);
    }
}
