//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ActiveSection;
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    model.clear_error().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                    model.hide_help_popup().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        let section = model.get_ui_state().await.active_section;

        // Section-specific keys
        match (section, key.code) {
            (ActiveSection::Surahs, KeyCode::Enter) => {
                if let Some(surah) = model.get_selected_surah().await {
                    drop(model);
                    self.spawn_open_surah(surah.number);
                }
                return Ok(());
            }
            (ActiveSection::Verses, KeyCode::Enter) => {
                drop(model);
                self.play_selected_verse().await;
                return Ok(());
            }
            (ActiveSection::Verses, KeyCode::Char('s') | KeyCode::Char('S')) => {
                drop(model);
                self.toggle_selected_saved().await;
                return Ok(());
            }
            (ActiveSection::Saved, KeyCode::Enter) => {
                drop(model);
                self.open_selected_saved().await;
                return Ok(());
            }
            (ActiveSection::Saved, KeyCode::Delete | KeyCode::Char('d') | KeyCode::Char('D')) => {
                drop(model);
                self.remove_selected_saved().await;
                return Ok(());
            }
            _ => {}
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                model.set_should_quit(true).await;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_section_backward().await;
                } else {
                    model.cycle_section_forward().await;
                }
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
            }
            KeyCode::Up => {
                model.move_selection_up().await;
            }
            KeyCode::Down => {
                model.move_selection_down().await;
            }
            // Pause / resume
            KeyCode::Char(' ') => {
                drop(model);
                self.toggle_pause().await;
            }
            // Play the whole Surah, or stop it if already playing
            KeyCode::Char('p') | KeyCode::Char('P') => {
                drop(model);
                self.toggle_play_surah().await;
            }
            KeyCode::Char('r') => {
                drop(model);
                self.toggle_repeat().await;
            }
            KeyCode::Char('R') => {
                drop(model);
                self.player.restart_current().await;
            }
            KeyCode::Char('x') | KeyCode::Char('X') => {
                drop(model);
                self.player.stop_all().await;
            }
            KeyCode::Char('t') => {
                model.toggle_translation().await;
            }
            KeyCode::Char('T') => {
                drop(model);
                self.cycle_translation().await;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                drop(model);
                self.cycle_reciter().await;
            }
            // Jump to a section
            KeyCode::Char('1') => model.set_active_section(ActiveSection::Surahs).await,
            KeyCode::Char('2') => model.set_active_section(ActiveSection::Verses).await,
            KeyCode::Char('3') => model.set_active_section(ActiveSection::Saved).await,
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                model.show_help_popup().await;
            }
            _ => {}
        }
        Ok(())
    }
}
