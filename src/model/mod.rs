//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (sections, UI state)
//! - `quran`: Surah, verse, reciter and translation types
//! - `content`: The open Surah and verse cursor
//! - `cache`: Query cache for API responses
//! - `saved`: Saved verses persisted to disk
//! - `quran_client`: alquran.cloud API client
//! - `app_model`: Main application model with state management methods

mod types;
mod quran;
mod content;
mod cache;
mod saved;
mod quran_client;
mod app_model;

// Re-export all public types for convenient access
pub use types::{ActiveSection, UiState};

pub use quran::{RECITERS, SURAH_COUNT, TRANSLATIONS, Verse, reciter_index, translation_index};

pub use content::ContentState;

pub use saved::{SAVED_AYAHS_FILE, SavedAyah, SavedAyahStore};

pub use quran_client::{DEFAULT_API_URL, QuranClient};

pub use app_model::AppModel;
