//! Core type definitions for the application

use std::time::Instant;

use super::quran::Surah;

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Surahs,
    Verses,
    Saved,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Surahs => ActiveSection::Verses,
            ActiveSection::Verses => ActiveSection::Saved,
            ActiveSection::Saved => ActiveSection::Surahs,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Surahs => ActiveSection::Saved,
            ActiveSection::Verses => ActiveSection::Surahs,
            ActiveSection::Saved => ActiveSection::Verses,
        }
    }
}

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub surahs: Vec<Surah>,
    pub surah_selected: usize,
    pub saved_selected: usize,
    pub show_translation: bool,
    pub translation_id: String,
    pub reciter_id: String,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl UiState {
    pub fn new(translation_id: &str, reciter_id: &str) -> Self {
        Self {
            active_section: ActiveSection::Verses,
            surahs: vec![], // Loaded from the API at startup
            surah_selected: 0,
            saved_selected: 0,
            show_translation: true,
            translation_id: translation_id.to_string(),
            reciter_id: reciter_id.to_string(),
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
        }
    }

    pub fn selected_surah(&self) -> Option<&Surah> {
        self.surahs.get(self.surah_selected)
    }
}
