//! Layout rendering (top bar, sidebar)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{
    ActiveSection, ContentState, RECITERS, SavedAyah, TRANSLATIONS, UiState, reciter_index,
    translation_index,
};
use super::utils::{render_scrollable_list, section_border_style, truncate_string};

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState, content_state: &ContentState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Surah title
            Constraint::Length(34), // Reciter + translation
        ])
        .split(area);

    let title = match &content_state.detail {
        Some(detail) => format!(
            "{}. {} ({}) · {} · {} · {} verses",
            detail.surah.number,
            detail.surah.english_name,
            detail.surah.english_name_translation,
            detail.surah.name,
            detail.surah.revelation_type.label(),
            detail.surah.number_of_ayahs,
        ),
        None if content_state.is_loading => "Loading...".to_string(),
        None => "No Surah open".to_string(),
    };

    let surah = Paragraph::new(title)
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Surah ")
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(surah, chunks[0]);

    let reciter = RECITERS[reciter_index(&ui_state.reciter_id)];
    // The loaded text may lag behind a translation switch until the reload lands
    let shown_translation = content_state
        .detail
        .as_ref()
        .map(|d| d.translation_id.as_str())
        .unwrap_or(&ui_state.translation_id);
    let translation = TRANSLATIONS[translation_index(shown_translation)];
    let translation_label = if ui_state.show_translation {
        translation.name
    } else {
        "hidden"
    };
    let editions = Paragraph::new(format!("🎙 {} · {}kbps", reciter.english_name, reciter.bitrate))
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", reciter.name))
                .title_bottom(format!(" {} ", translation_label)),
        );
    frame.render_widget(editions, chunks[1]);
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, ui_state: &UiState, saved: &[SavedAyah]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(60), // Surahs
            Constraint::Percentage(40), // Saved verses
        ])
        .split(area);

    let width = chunks[0].width.saturating_sub(4) as usize;
    let surahs_focused = ui_state.active_section == ActiveSection::Surahs;

    let surah_items: Vec<ListItem> = ui_state
        .surahs
        .iter()
        .enumerate()
        .map(|(i, surah)| {
            let style = if i == ui_state.surah_selected && surahs_focused {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else if i == ui_state.surah_selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let label = format!("{:>3} {}", surah.number, surah.english_name);
            ListItem::new(truncate_string(&label, width)).style(style)
        })
        .collect();

    render_scrollable_list(
        frame,
        chunks[0],
        surah_items,
        ui_state.surah_selected,
        Block::default()
            .borders(Borders::ALL)
            .title(" Surahs ")
            .padding(Padding::horizontal(1))
            .border_style(section_border_style(surahs_focused)),
    );

    let saved_focused = ui_state.active_section == ActiveSection::Saved;
    let saved_items: Vec<ListItem> = saved
        .iter()
        .enumerate()
        .map(|(i, ayah)| {
            let style = if i == ui_state.saved_selected && saved_focused {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else if i == ui_state.saved_selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let label = format!(
                "★ {} {}:{}",
                ayah.surah_name, ayah.surah_number, ayah.ayah_number
            );
            ListItem::new(truncate_string(&label, width)).style(style)
        })
        .collect();

    let saved_block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Saved ({}) ", saved.len()))
        .padding(Padding::horizontal(1))
        .border_style(section_border_style(saved_focused));

    if saved_items.is_empty() {
        let empty = Paragraph::new("Press S on a verse to save it")
            .style(Style::default().fg(Color::DarkGray))
            .block(saved_block);
        frame.render_widget(empty, chunks[1]);
    } else {
        render_scrollable_list(frame, chunks[1], saved_items, ui_state.saved_selected, saved_block);
    }
}
