//! Verse list rendering for the open Surah

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, ContentState, SavedAyah, UiState, Verse};
use crate::playback::{PlaybackState, PlayerStatus};
use super::utils::{render_scrollable_list, section_border_style, wrap_text};

/// Width of the "{number} {markers} " gutter in front of each verse
const GUTTER_WIDTH: usize = 10;

pub fn render_verses(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    content_state: &ContentState,
    playback: &PlaybackState,
    saved: &[SavedAyah],
) {
    let is_focused = ui_state.active_section == ActiveSection::Verses;

    let title = match (&content_state.detail, content_state.selected_verse()) {
        (Some(detail), Some(verse)) => format!(
            " {} · Ayah {} (#{}) · Juz {} · Page {} ",
            detail.surah.english_name, verse.number_in_surah, verse.number, verse.juz, verse.page
        ),
        (Some(detail), None) => format!(" {} ", detail.surah.english_name),
        _ => " Verses ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(section_border_style(is_focused));

    let detail = match &content_state.detail {
        Some(detail) if !content_state.is_loading => detail,
        _ => {
            let message = if content_state.is_loading {
                "  Loading..."
            } else {
                "  Select a Surah to start reading"
            };
            let placeholder = Paragraph::new(message)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }
    };

    let text_width = (area.width.saturating_sub(4) as usize).saturating_sub(GUTTER_WIDTH);
    let surah = detail.surah.number;

    let items: Vec<ListItem> = detail
        .verses
        .iter()
        .enumerate()
        .map(|(i, verse)| {
            let is_saved = saved.iter().any(|s| s.is_verse(surah, verse.number_in_surah));
            render_verse(
                verse,
                VerseMarks {
                    selected: i == content_state.verse_selected,
                    focused: is_focused,
                    status: playback
                        .is_current(surah, verse.number_in_surah)
                        .then(|| playback.status()),
                    repeating: playback.is_repeating,
                    queued: playback.playlist.contains(surah, verse.number_in_surah),
                    saved: is_saved,
                },
                ui_state.show_translation,
                text_width,
            )
        })
        .collect();

    render_scrollable_list(frame, area, items, content_state.verse_selected, block);
}

struct VerseMarks {
    selected: bool,
    focused: bool,
    /// Player status when this verse is the current request
    status: Option<PlayerStatus>,
    repeating: bool,
    queued: bool,
    saved: bool,
}

fn render_verse(verse: &Verse, marks: VerseMarks, show_translation: bool, width: usize) -> ListItem<'static> {
    let play_marker = match marks.status {
        Some(PlayerStatus::Loading) => "⏳",
        Some(PlayerStatus::Playing) if marks.repeating => "🔁",
        Some(PlayerStatus::Playing) => "▶ ",
        Some(PlayerStatus::Paused) => "⏸ ",
        Some(PlayerStatus::Idle) | None if marks.queued => "♪ ",
        Some(PlayerStatus::Idle) | None => "  ",
    };
    let saved_marker = if marks.saved { "★" } else { " " };
    let sajda_marker = if verse.sajda { "۩" } else { " " };

    let text_style = if marks.status.is_some() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if marks.selected && marks.focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if marks.selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let gutter_style = Style::default().fg(Color::DarkGray);
    let blank_gutter = " ".repeat(GUTTER_WIDTH);

    let mut lines = Vec::new();
    for (n, chunk) in wrap_text(&verse.text, width).into_iter().enumerate() {
        let gutter = if n == 0 {
            Line::from(vec![
                Span::styled(format!("{:>4} ", verse.number_in_surah), gutter_style),
                Span::styled(play_marker, Style::default().fg(Color::Green)),
                Span::styled(saved_marker, Style::default().fg(Color::Yellow)),
                Span::styled(sajda_marker, Style::default().fg(Color::Magenta)),
                Span::raw(" "),
                Span::styled(chunk, text_style),
            ])
        } else {
            Line::from(vec![Span::raw(blank_gutter.clone()), Span::styled(chunk, text_style)])
        };
        lines.push(gutter);
    }

    if show_translation {
        if let Some(translation) = &verse.translation {
            let translation_style = Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC);
            for chunk in wrap_text(translation, width) {
                lines.push(Line::from(vec![
                    Span::raw(blank_gutter.clone()),
                    Span::styled(chunk, translation_style),
                ]));
            }
        }
    }
    lines.push(Line::from(""));

    let item = ListItem::new(lines);
    if marks.selected && marks.focused {
        item.style(Style::default().bg(Color::Rgb(30, 30, 30)))
    } else {
        item
    }
}
