//! Quran content types: Surahs, verses, reciters and translation editions

use serde::{Deserialize, Serialize};

pub const SURAH_COUNT: u32 = 114;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevelationType {
    Meccan,
    Medinan,
}

impl RevelationType {
    pub fn label(self) -> &'static str {
        match self {
            RevelationType::Meccan => "Meccan",
            RevelationType::Medinan => "Medinan",
        }
    }
}

/// Surah metadata as listed in the index
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surah {
    pub number: u32,
    /// Arabic name
    pub name: String,
    pub english_name: String,
    pub english_name_translation: String,
    pub number_of_ayahs: u32,
    pub revelation_type: RevelationType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verse {
    /// Position in the whole Quran
    pub number: u32,
    pub number_in_surah: u32,
    pub text: String,
    pub translation: Option<String>,
    pub juz: u32,
    pub page: u32,
    pub sajda: bool,
}

/// A Surah with its verses and the translation they were fetched with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurahDetail {
    pub surah: Surah,
    pub verses: Vec<Verse>,
    pub translation_id: String,
}

impl SurahDetail {
    pub fn ayah_numbers(&self) -> Vec<u32> {
        self.verses.iter().map(|v| v.number_in_surah).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reciter {
    /// Audio edition identifier used by the API
    pub id: &'static str,
    pub name: &'static str,
    pub english_name: &'static str,
    pub bitrate: u32,
}

pub const RECITERS: &[Reciter] = &[
    Reciter {
        id: "ar.abdulbasitmurattal",
        name: "عبد الباسط عبد الصمد",
        english_name: "Abdul Basit Abdul Samad",
        bitrate: 64,
    },
    Reciter {
        id: "ar.alafasy",
        name: "مشاري العفاسي",
        english_name: "Mishary Rashid Alafasy",
        bitrate: 128,
    },
    Reciter {
        id: "ar.mahermuaiqly",
        name: "ماهر المعيقلي",
        english_name: "Maher Al Mueaqly",
        bitrate: 64,
    },
    Reciter {
        id: "ar.ahmedajamy",
        name: "أحمد العجمي",
        english_name: "Ahmed ibn Ali al-Ajamy",
        bitrate: 64,
    },
    Reciter {
        id: "ar.saadalghamdi",
        name: "سعد الغامدي",
        english_name: "Saad Al Ghamdi",
        bitrate: 64,
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TranslationEdition {
    pub id: &'static str,
    pub name: &'static str,
}

pub const TRANSLATIONS: &[TranslationEdition] = &[
    TranslationEdition { id: "en.asad", name: "Muhammad Asad" },
    TranslationEdition { id: "en.sahih", name: "Saheeh International" },
    TranslationEdition { id: "en.pickthall", name: "Pickthall" },
    TranslationEdition { id: "en.yusufali", name: "Yusuf Ali" },
    TranslationEdition { id: "en.hilali", name: "Hilali & Khan" },
];

/// Index of `id` in `RECITERS`, falling back to the first entry.
pub fn reciter_index(id: &str) -> usize {
    RECITERS.iter().position(|r| r.id == id).unwrap_or(0)
}

pub fn translation_index(id: &str) -> usize {
    TRANSLATIONS.iter().position(|t| t.id == id).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_falls_back_to_first() {
        assert_eq!(RECITERS[reciter_index("ar.alafasy")].id, "ar.alafasy");
        assert_eq!(reciter_index("xx.unknown"), 0);
        assert_eq!(TRANSLATIONS[translation_index("en.sahih")].id, "en.sahih");
    }

    #[test]
    fn test_detail_ayah_numbers() {
        let verse = |n| Verse {
            number: n + 7,
            number_in_surah: n,
            text: format!("verse {}", n),
            translation: None,
            juz: 1,
            page: 2,
            sajda: false,
        };
        let detail = SurahDetail {
            surah: Surah {
                number: 2,
                name: "البقرة".to_string(),
                english_name: "Al-Baqara".to_string(),
                english_name_translation: "The Cow".to_string(),
                number_of_ayahs: 3,
                revelation_type: RevelationType::Medinan,
            },
            verses: vec![verse(1), verse(2), verse(3)],
            translation_id: "en.asad".to_string(),
        };

        assert_eq!(detail.ayah_numbers(), vec![1, 2, 3]);
    }
}
