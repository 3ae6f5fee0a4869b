//! Saved (bookmarked) verses, persisted as a JSON file

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub const SAVED_AYAHS_FILE: &str = "saved_ayahs.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAyah {
    pub surah_number: u32,
    pub ayah_number: u32,
    pub text: String,
    pub translation: String,
    pub surah_name: String,
    /// Milliseconds since the Unix epoch, set when saved
    pub timestamp: i64,
}

impl SavedAyah {
    pub fn is_verse(&self, surah: u32, ayah: u32) -> bool {
        self.surah_number == surah && self.ayah_number == ayah
    }
}

/// Ordered list of saved verses. Every change rewrites the whole file.
#[derive(Debug)]
pub struct SavedAyahStore {
    path: PathBuf,
    ayahs: Vec<SavedAyah>,
}

impl SavedAyahStore {
    /// Read the store at `path`; a missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let ayahs = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };
        tracing::debug!(path = %path.display(), count = ayahs.len(), "Saved verses loaded");
        Ok(Self { path, ayahs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn all(&self) -> &[SavedAyah] {
        &self.ayahs
    }

    pub fn len(&self) -> usize {
        self.ayahs.len()
    }

    pub fn get(&self, index: usize) -> Option<&SavedAyah> {
        self.ayahs.get(index)
    }

    pub fn is_saved(&self, surah: u32, ayah: u32) -> bool {
        self.ayahs.iter().any(|s| s.is_verse(surah, ayah))
    }

    /// Append `ayah`, stamping it with the current time.
    pub fn add(&mut self, mut ayah: SavedAyah) -> Result<(), StoreError> {
        ayah.timestamp = chrono::Utc::now().timestamp_millis();
        let mut ayahs = self.ayahs.clone();
        ayahs.push(ayah);
        self.commit(ayahs)
    }

    pub fn remove(&mut self, index: usize) -> Result<SavedAyah, StoreError> {
        if index >= self.ayahs.len() {
            return Err(StoreError::OutOfRange(index));
        }
        let mut ayahs = self.ayahs.clone();
        let removed = ayahs.remove(index);
        self.commit(ayahs)?;
        Ok(removed)
    }

    /// Save `ayah` if absent, otherwise remove the first record of that verse.
    /// Returns whether the verse is saved afterwards.
    pub fn toggle(&mut self, ayah: SavedAyah) -> Result<bool, StoreError> {
        if !self.is_saved(ayah.surah_number, ayah.ayah_number) {
            self.add(ayah)?;
            return Ok(true);
        }
        if let Some(index) = self
            .ayahs
            .iter()
            .position(|s| s.is_verse(ayah.surah_number, ayah.ayah_number))
        {
            self.remove(index)?;
        }
        Ok(false)
    }

    /// Write `ayahs` to disk and adopt them only once the write succeeded.
    fn commit(&mut self, ayahs: Vec<SavedAyah>) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let content = serde_json::to_string(&ayahs)?;
        fs::write(&self.path, content)?;
        self.ayahs = ayahs;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn saved(surah: u32, ayah: u32) -> SavedAyah {
        SavedAyah {
            surah_number: surah,
            ayah_number: ayah,
            text: "ٱلْحَمْدُ لِلَّهِ رَبِّ ٱلْعَٰلَمِينَ".to_string(),
            translation: "All praise is due to God alone".to_string(),
            surah_name: "Al-Faatiha".to_string(),
            timestamp: 0,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = SavedAyahStore::load(dir.path().join(SAVED_AYAHS_FILE)).unwrap();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_add_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(SAVED_AYAHS_FILE);

        let mut store = SavedAyahStore::load(&path).unwrap();
        store.add(saved(1, 2)).unwrap();
        store.add(saved(2, 255)).unwrap();

        let reloaded = SavedAyahStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.is_saved(2, 255));
        assert!(reloaded.get(0).unwrap().timestamp > 0);
        assert_eq!(reloaded.all()[1].ayah_number, 255);
    }

    #[test]
    fn test_file_uses_camel_case_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SAVED_AYAHS_FILE);

        let mut store = SavedAyahStore::load(&path).unwrap();
        store.add(saved(1, 2)).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"surahNumber\":1"));
        assert!(raw.contains("\"ayahNumber\":2"));
        assert!(raw.contains("\"surahName\""));
    }

    #[test]
    fn test_remove_by_index() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SAVED_AYAHS_FILE);
        let mut store = SavedAyahStore::load(&path).unwrap();
        store.add(saved(1, 1)).unwrap();
        store.add(saved(1, 2)).unwrap();

        let removed = store.remove(0).unwrap();
        assert_eq!(removed.ayah_number, 1);
        assert!(matches!(store.remove(5), Err(StoreError::OutOfRange(5))));

        let reloaded = SavedAyahStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.is_saved(1, 2));
        assert!(!reloaded.is_saved(1, 1));
    }

    #[test]
    fn test_toggle_saves_then_removes() {
        let dir = TempDir::new().unwrap();
        let mut store = SavedAyahStore::load(dir.path().join(SAVED_AYAHS_FILE)).unwrap();

        assert!(store.toggle(saved(3, 4)).unwrap());
        assert!(store.is_saved(3, 4));

        assert!(!store.toggle(saved(3, 4)).unwrap());
        assert!(!store.is_saved(3, 4));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_failed_write_keeps_memory_in_sync() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SAVED_AYAHS_FILE);
        let mut store = SavedAyahStore::load(&path).unwrap();
        store.add(saved(1, 1)).unwrap();

        // A regular file where the parent directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let mut broken = SavedAyahStore::load(blocker.join(SAVED_AYAHS_FILE)).unwrap();
        assert!(broken.add(saved(2, 255)).is_err());
        assert_eq!(broken.len(), 0);
        assert!(!broken.is_saved(2, 255));
        assert!(broken.toggle(saved(2, 255)).is_err());
        assert!(!broken.is_saved(2, 255));

        // Remove on a store whose file became unwritable
        store.path = blocker.join(SAVED_AYAHS_FILE);
        assert!(store.remove(0).is_err());
        assert_eq!(store.len(), 1);
        assert!(store.is_saved(1, 1));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SAVED_AYAHS_FILE);
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(SavedAyahStore::load(&path), Err(StoreError::Json(_))));
    }
}
