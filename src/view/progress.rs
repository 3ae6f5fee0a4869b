//! Playback status bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::ContentState;
use crate::playback::{PlaybackState, PlayerStatus};

pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    playback: &PlaybackState,
    content_state: &ContentState,
) {
    let verse_label = playback.current_request.as_ref().map(|request| {
        let name = content_state
            .detail
            .as_ref()
            .filter(|d| d.surah.number == request.surah)
            .map(|d| d.surah.english_name.as_str())
            .unwrap_or("Surah");
        format!("{} {}:{}", name, request.surah, request.ayah)
    });

    let status_text = match (playback.status(), &verse_label) {
        (PlayerStatus::Loading, Some(label)) => format!(" ⏳ Loading {} ", label),
        (PlayerStatus::Playing, Some(label)) => format!(" ▶ {} ", label),
        (PlayerStatus::Paused, Some(label)) => format!(" ⏸  {} ", label),
        _ => " Nothing playing ".to_string(),
    };

    let repeat_text = if playback.is_repeating { "Repeat: On" } else { "Repeat: Off" };
    let mode_text = match (playback.playlist.entries().first(), playback.playlist.entries().last()) {
        (Some(first), Some(last)) => format!("Surah {} ({}-{})", first.surah, first.ayah, last.ayah),
        _ => "Single verse".to_string(),
    };
    let controls_info = format!(" {} | {} ", mode_text, repeat_text);

    // The gauge tracks position within the Surah playlist
    let (ratio, label) = if playback.playlist.is_active() {
        let position = playback.playlist.index() + 1;
        let total = playback.playlist.len();
        (
            (position as f64 / total as f64).clamp(0.0, 1.0),
            format!("{} / {}", position, total),
        )
    } else {
        (0.0, String::new())
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(status_text)
        .title_bottom(Line::from(controls_info).right_aligned());

    if let Some(error) = &playback.last_error {
        block = block.title_bottom(
            Line::from(Span::styled(
                format!(" {} ", error),
                Style::default().fg(Color::Red),
            ))
            .left_aligned(),
        );
    }

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(label);

    frame.render_widget(gauge, area);
}
