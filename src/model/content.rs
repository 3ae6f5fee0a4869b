//! Content view data: the open Surah and the verse cursor

use super::quran::{SurahDetail, Verse};

#[derive(Clone, Default)]
pub struct ContentState {
    pub is_loading: bool,
    pub detail: Option<SurahDetail>,
    pub verse_selected: usize,
}

impl ContentState {
    pub fn surah_number(&self) -> Option<u32> {
        self.detail.as_ref().map(|d| d.surah.number)
    }

    pub fn selected_verse(&self) -> Option<&Verse> {
        self.detail
            .as_ref()
            .and_then(|d| d.verses.get(self.verse_selected))
    }

    /// Point the cursor at `ayah` of `surah` if that Surah is open.
    pub fn focus_verse(&mut self, surah: u32, ayah: u32) -> bool {
        let Some(detail) = &self.detail else {
            return false;
        };
        if detail.surah.number != surah {
            return false;
        }
        match detail.verses.iter().position(|v| v.number_in_surah == ayah) {
            Some(index) => {
                self.verse_selected = index;
                true
            }
            None => false,
        }
    }

    pub fn move_up(&mut self) {
        self.verse_selected = self.verse_selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let count = self.detail.as_ref().map(|d| d.verses.len()).unwrap_or(0);
        if self.verse_selected + 1 < count {
            self.verse_selected += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quran::{RevelationType, Surah};

    fn content(surah: u32, verses: u32) -> ContentState {
        ContentState {
            is_loading: false,
            detail: Some(SurahDetail {
                surah: Surah {
                    number: surah,
                    name: String::new(),
                    english_name: format!("Surah {}", surah),
                    english_name_translation: String::new(),
                    number_of_ayahs: verses,
                    revelation_type: RevelationType::Meccan,
                },
                verses: (1..=verses)
                    .map(|n| Verse {
                        number: n,
                        number_in_surah: n,
                        text: String::new(),
                        translation: None,
                        juz: 1,
                        page: 1,
                        sajda: false,
                    })
                    .collect(),
                translation_id: "en.asad".to_string(),
            }),
            verse_selected: 0,
        }
    }

    #[test]
    fn test_focus_only_in_open_surah() {
        let mut state = content(112, 4);

        assert!(state.focus_verse(112, 3));
        assert_eq!(state.verse_selected, 2);
        assert_eq!(state.selected_verse().map(|v| v.number_in_surah), Some(3));

        assert!(!state.focus_verse(113, 1));
        assert!(!state.focus_verse(112, 9));
        assert_eq!(state.verse_selected, 2);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut state = content(1, 2);
        state.move_up();
        assert_eq!(state.verse_selected, 0);
        state.move_down();
        state.move_down();
        assert_eq!(state.verse_selected, 1);
    }
}
