//! Playback state machine
//!
//! `PlaybackSession` owns the published `PlaybackState` together with the
//! bookkeeping the controller needs to reject stale work: every verse request
//! gets a new id, and only the id currently bound to the transport may react
//! to transport events. Nothing here touches audio or the runtime, so each
//! transition can be tested in isolation.

use super::types::{PlaybackRequest, PlaybackState, PlayerStatus, Playlist};
use crate::error::PlaybackError;

/// What the controller must do after the bound track ended naturally
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EndAction {
    /// Repeat is on: seek the transport to zero and play again
    Restart,
    /// Playlist moved on: start playback of this request
    Advance(PlaybackRequest),
    /// Nothing left to play
    Finished,
}

#[derive(Debug, Default)]
pub struct PlaybackSession {
    state: PlaybackState,
    latest_request: u64,
    bound: Option<u64>,
    held: bool,
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn status(&self) -> PlayerStatus {
        self.state.status()
    }

    /// Start a new verse request, superseding any request still in flight.
    pub fn begin_request(&mut self, request: PlaybackRequest) -> u64 {
        self.latest_request += 1;
        self.bound = None;
        self.held = false;
        self.state.current_request = Some(request);
        self.state.is_loading = true;
        self.state.is_playing = false;
        self.state.last_error = None;
        self.latest_request
    }

    pub fn is_latest(&self, request_id: u64) -> bool {
        self.latest_request == request_id
    }

    /// Record that `request_id` now owns the transport.
    pub fn bind(&mut self, request_id: u64) {
        if self.is_latest(request_id) {
            self.bound = Some(request_id);
        }
    }

    pub fn is_bound(&self, bind_id: u64) -> bool {
        self.bound == Some(bind_id)
    }

    pub fn has_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub fn bound_id(&self) -> Option<u64> {
        self.bound
    }

    /// Transport is ready to play. Returns false for stale or repeated signals.
    pub fn mark_ready(&mut self, bind_id: u64) -> bool {
        if !self.is_bound(bind_id) || !self.state.is_loading {
            return false;
        }
        self.state.is_loading = false;
        self.state.is_playing = !self.held;
        true
    }

    /// The current verse failed. Resets the player and aborts playlist mode.
    pub fn fail(&mut self, error: &PlaybackError) {
        self.bound = None;
        self.held = false;
        self.state.current_request = None;
        self.state.is_loading = false;
        self.state.is_playing = false;
        self.state.playlist.clear();
        self.state.last_error = Some(error.to_string());
        self.state.failures += 1;
    }

    /// Returns false when nothing is bound.
    pub fn pause(&mut self) -> bool {
        if !self.has_bound() {
            return false;
        }
        if self.state.is_loading {
            self.held = true;
        }
        self.state.is_playing = false;
        true
    }

    /// Mark the bound verse as playing again from the start.
    pub fn resume(&mut self) -> bool {
        if !self.has_bound() {
            return false;
        }
        self.held = false;
        if !self.state.is_loading {
            self.state.is_playing = true;
        }
        true
    }

    /// Flip repeat mode and return the new value.
    pub fn toggle_repeat(&mut self) -> bool {
        self.state.is_repeating = !self.state.is_repeating;
        self.state.is_repeating
    }

    /// Enter playlist mode and return the first entry, or `None` for an empty list.
    pub fn start_playlist(&mut self, entries: Vec<PlaybackRequest>) -> Option<PlaybackRequest> {
        let playlist = Playlist::new(entries);
        let first = playlist.current().cloned()?;
        self.state.playlist = playlist;
        Some(first)
    }

    /// React to the bound track finishing. Repeat takes precedence over the playlist.
    pub fn on_track_ended(&mut self) -> EndAction {
        if self.state.is_repeating {
            self.state.is_playing = true;
            return EndAction::Restart;
        }

        if self.state.playlist.is_active() {
            if let Some(next) = self.state.playlist.advance().cloned() {
                return EndAction::Advance(next);
            }
            self.state.playlist.clear();
        }

        self.clear_playback();
        EndAction::Finished
    }

    /// Leave playlist mode, forget the current verse and turn repeat off.
    pub fn stop_all(&mut self) {
        // Superseding the latest id makes any in-flight request drop its result.
        self.latest_request += 1;
        self.state.playlist.clear();
        self.clear_playback();
        self.state.is_repeating = false;
    }

    fn clear_playback(&mut self) {
        self.bound = None;
        self.held = false;
        self.state.current_request = None;
        self.state.is_loading = false;
        self.state.is_playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(surah: u32, ayah: u32) -> PlaybackRequest {
        PlaybackRequest::new(surah, ayah, "r1").unwrap()
    }

    fn playing(session: &mut PlaybackSession, req: PlaybackRequest) -> u64 {
        let id = session.begin_request(req);
        session.bind(id);
        assert!(session.mark_ready(id));
        id
    }

    #[test]
    fn test_ready_moves_loading_to_playing() {
        let mut session = PlaybackSession::new();
        let id = session.begin_request(request(1, 1));
        assert_eq!(session.status(), PlayerStatus::Loading);

        // Not bound yet, so readiness is ignored
        assert!(!session.mark_ready(id));

        session.bind(id);
        assert!(session.mark_ready(id));
        assert_eq!(session.status(), PlayerStatus::Playing);

        // A second ready signal changes nothing
        assert!(!session.mark_ready(id));
    }

    #[test]
    fn test_newer_request_supersedes_older() {
        let mut session = PlaybackSession::new();
        let first = session.begin_request(request(1, 1));
        let second = session.begin_request(request(1, 2));

        assert!(!session.is_latest(first));
        session.bind(first);
        assert!(!session.has_bound());

        session.bind(second);
        assert!(session.is_bound(second));
        assert_eq!(session.state().current_request, Some(request(1, 2)));
    }

    #[test]
    fn test_repeat_restarts_same_verse() {
        let mut session = PlaybackSession::new();
        playing(&mut session, request(1, 1));
        session.toggle_repeat();

        assert_eq!(session.on_track_ended(), EndAction::Restart);
        assert_eq!(session.state().current_request, Some(request(1, 1)));
        assert!(session.state().is_playing);
    }

    #[test]
    fn test_repeat_wins_over_playlist() {
        let mut session = PlaybackSession::new();
        let first = session
            .start_playlist(vec![request(2, 1), request(2, 2)])
            .unwrap();
        playing(&mut session, first);
        session.toggle_repeat();

        assert_eq!(session.on_track_ended(), EndAction::Restart);
        assert_eq!(session.state().playlist.index(), 0);
    }

    #[test]
    fn test_playlist_advances_one_step_per_end() {
        let n = 5;
        let mut session = PlaybackSession::new();
        let entries: Vec<_> = (1..=n).map(|a| request(3, a)).collect();
        let first = session.start_playlist(entries).unwrap();
        playing(&mut session, first);

        for expected in 1..n as usize {
            match session.on_track_ended() {
                EndAction::Advance(next) => {
                    assert_eq!(session.state().playlist.index(), expected);
                    assert_eq!(next.ayah, expected as u32 + 1);
                    playing(&mut session, next);
                }
                other => panic!("expected advance, got {:?}", other),
            }
        }

        assert_eq!(session.on_track_ended(), EndAction::Finished);
        assert!(!session.state().playlist.is_active());
        assert_eq!(session.state().playlist.index(), 0);
        assert_eq!(session.status(), PlayerStatus::Idle);
    }

    #[test]
    fn test_end_without_playlist_goes_idle() {
        let mut session = PlaybackSession::new();
        let id = playing(&mut session, request(1, 7));

        assert_eq!(session.on_track_ended(), EndAction::Finished);
        assert_eq!(session.status(), PlayerStatus::Idle);
        assert!(!session.is_bound(id));
    }

    #[test]
    fn test_empty_playlist_is_not_started() {
        let mut session = PlaybackSession::new();
        assert!(session.start_playlist(Vec::new()).is_none());
        assert!(!session.state().playlist.is_active());
    }

    #[test]
    fn test_stop_all_resets_everything() {
        let mut session = PlaybackSession::new();
        let first = session
            .start_playlist(vec![request(2, 1), request(2, 2)])
            .unwrap();
        let id = playing(&mut session, first);
        session.toggle_repeat();

        session.stop_all();

        let state = session.state();
        assert!(!state.is_playing);
        assert!(state.current_request.is_none());
        assert!(!state.is_repeating);
        assert!(state.playlist.entries().is_empty());
        assert_eq!(state.playlist.index(), 0);
        assert!(!session.is_latest(id));
    }

    #[test]
    fn test_failure_aborts_playlist() {
        let mut session = PlaybackSession::new();
        let first = session
            .start_playlist(vec![request(2, 1), request(2, 2)])
            .unwrap();
        session.begin_request(first);

        session.fail(&PlaybackError::Playback("decoder error".to_string()));

        let state = session.state();
        assert_eq!(state.status(), PlayerStatus::Idle);
        assert!(!state.playlist.is_active());
        assert_eq!(state.last_error.as_deref(), Some("Playback failed: decoder error"));
    }

    #[test]
    fn test_repeated_identical_failures_are_counted() {
        let mut session = PlaybackSession::new();
        let error = PlaybackError::Playback("decoder error".to_string());

        session.begin_request(request(1, 1));
        session.fail(&error);
        let first = session.state().clone();

        session.begin_request(request(1, 1));
        session.fail(&error);
        let second = session.state().clone();

        assert_eq!(first.last_error, second.last_error);
        assert_eq!(first.failures, 1);
        assert_eq!(second.failures, 2);
        assert_ne!(first, second);
    }

    #[test]
    fn test_pause_while_loading_holds_playback() {
        let mut session = PlaybackSession::new();
        let id = session.begin_request(request(1, 1));
        assert!(!session.pause());

        session.bind(id);
        assert!(session.pause());
        assert!(session.mark_ready(id));
        assert_eq!(session.status(), PlayerStatus::Paused);

        assert!(session.resume());
        assert_eq!(session.status(), PlayerStatus::Playing);
    }

    #[test]
    fn test_toggle_repeat_twice_round_trips() {
        let mut session = PlaybackSession::new();
        assert!(session.toggle_repeat());
        assert!(!session.toggle_repeat());
        assert!(!session.state().is_repeating);
    }
}
