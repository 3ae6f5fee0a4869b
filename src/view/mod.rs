//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (truncation, wrapping, scrollable lists)
//! - `layout`: Main layout structure (top bar, sidebar)
//! - `content`: Verse list of the open Surah
//! - `progress`: Playback status bar
//! - `overlays`: Modal overlays (error, help)

mod utils;
mod layout;
mod content;
mod progress;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{ContentState, SavedAyah, UiState};
use crate::playback::PlaybackState;

pub struct AppView;

impl AppView {
    pub fn render(
        frame: &mut Frame,
        playback: &PlaybackState,
        ui_state: &UiState,
        content_state: &ContentState,
        saved: &[SavedAyah],
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Surah title + editions
                Constraint::Min(0),    // Main content (sidebar + verses)
                Constraint::Length(3), // Playback status
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ui_state, content_state);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30), // Sidebar (Surahs + Saved)
                Constraint::Percentage(70), // Verses
            ])
            .split(chunks[1]);

        layout::render_sidebar(frame, main_chunks[0], ui_state, saved);

        content::render_verses(frame, main_chunks[1], ui_state, content_state, playback, saved);

        progress::render_status_bar(frame, chunks[2], playback, content_state);

        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
