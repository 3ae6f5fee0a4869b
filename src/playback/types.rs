//! Playback data model: requests, playlist and the published state

use std::fmt;

use crate::error::PlaybackError;

/// Identifies one playable verse for one reciter
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlaybackRequest {
    pub surah: u32,
    pub ayah: u32,
    pub reciter: String,
}

impl PlaybackRequest {
    pub fn new(surah: u32, ayah: u32, reciter: impl Into<String>) -> Result<Self, PlaybackError> {
        if surah == 0 || ayah == 0 {
            return Err(PlaybackError::InvalidRequest { surah, ayah });
        }
        Ok(Self {
            surah,
            ayah,
            reciter: reciter.into(),
        })
    }

    pub fn is_verse(&self, surah: u32, ayah: u32) -> bool {
        self.surah == surah && self.ayah == ayah
    }
}

impl fmt::Display for PlaybackRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} ({})", self.surah, self.ayah, self.reciter)
    }
}

/// Ordered verses played back to back, with a cursor on the current entry.
///
/// An empty playlist means playlist mode is off; `index` is then 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Playlist {
    entries: Vec<PlaybackRequest>,
    index: usize,
}

impl Playlist {
    pub fn new(entries: Vec<PlaybackRequest>) -> Self {
        Self { entries, index: 0 }
    }

    pub fn is_active(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entries(&self) -> &[PlaybackRequest] {
        &self.entries
    }

    pub fn current(&self) -> Option<&PlaybackRequest> {
        self.entries.get(self.index)
    }

    pub fn contains(&self, surah: u32, ayah: u32) -> bool {
        self.entries.iter().any(|r| r.is_verse(surah, ayah))
    }

    /// Move to the next entry, returning it. Returns `None` at the last entry.
    pub fn advance(&mut self) -> Option<&PlaybackRequest> {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
            self.entries.get(self.index)
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
    }
}

/// Snapshot of the player, published to the view after every transition
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub current_request: Option<PlaybackRequest>,
    pub is_playing: bool,
    pub is_loading: bool,
    pub is_repeating: bool,
    pub playlist: Playlist,
    /// Message of the last failed verse, cleared by the next request
    pub last_error: Option<String>,
    /// Number of failed verses so far; tells repeated identical errors apart
    pub failures: u64,
}

impl PlaybackState {
    pub fn status(&self) -> PlayerStatus {
        if self.is_loading {
            PlayerStatus::Loading
        } else if self.is_playing {
            PlayerStatus::Playing
        } else if self.current_request.is_some() {
            PlayerStatus::Paused
        } else {
            PlayerStatus::Idle
        }
    }

    pub fn is_current(&self, surah: u32, ayah: u32) -> bool {
        self.current_request
            .as_ref()
            .is_some_and(|r| r.is_verse(surah, ayah))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerStatus {
    Idle,
    Loading,
    Playing,
    Paused,
}

/// Broadcast when playlist playback moves on to another verse
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerseChanged {
    pub surah: u32,
    pub ayah: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(ayah: u32) -> PlaybackRequest {
        PlaybackRequest::new(1, ayah, "ar.alafasy").unwrap()
    }

    #[test]
    fn test_request_rejects_zero() {
        assert_eq!(
            PlaybackRequest::new(0, 3, "r1"),
            Err(PlaybackError::InvalidRequest { surah: 0, ayah: 3 })
        );
        assert!(PlaybackRequest::new(2, 0, "r1").is_err());
    }

    #[test]
    fn test_playlist_advances_to_end() {
        let mut playlist = Playlist::new(vec![request(1), request(2)]);
        assert!(playlist.is_active());
        assert_eq!(playlist.current(), Some(&request(1)));

        assert_eq!(playlist.advance(), Some(&request(2)));
        assert_eq!(playlist.index(), 1);

        assert_eq!(playlist.advance(), None);
        assert_eq!(playlist.index(), 1);

        playlist.clear();
        assert!(!playlist.is_active());
        assert_eq!(playlist.index(), 0);
    }

    #[test]
    fn test_playlist_keeps_duplicates_in_order() {
        let playlist = Playlist::new(vec![request(3), request(1), request(3)]);
        let ayahs: Vec<u32> = playlist.entries().iter().map(|r| r.ayah).collect();
        assert_eq!(ayahs, vec![3, 1, 3]);
    }

    #[test]
    fn test_status_derivation() {
        let mut state = PlaybackState::default();
        assert_eq!(state.status(), PlayerStatus::Idle);

        state.current_request = Some(request(1));
        state.is_loading = true;
        assert_eq!(state.status(), PlayerStatus::Loading);

        state.is_loading = false;
        state.is_playing = true;
        assert_eq!(state.status(), PlayerStatus::Playing);

        state.is_playing = false;
        assert_eq!(state.status(), PlayerStatus::Paused);
        assert!(state.is_current(1, 1));
    }
}
