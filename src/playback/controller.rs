//! Playback controller: single verse and playlist playback over an `AudioTransport`

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use super::resolver::VerseAudioResolver;
use super::session::{EndAction, PlaybackSession};
use super::transport::{AudioTransport, TransportEvent};
use super::types::{PlaybackRequest, PlaybackState, VerseChanged};
use crate::error::PlaybackError;

const VERSE_CHANGED_CAPACITY: usize = 16;

/// Completes a `play_verse` call once its binding becomes ready or fails
struct ReadyWaiter {
    bind_id: u64,
    tx: oneshot::Sender<Result<(), PlaybackError>>,
}

struct Inner {
    session: PlaybackSession,
    ready_waiter: Option<ReadyWaiter>,
}

impl Inner {
    fn settle_waiter(&mut self, bind_id: u64, result: Result<(), PlaybackError>) {
        if self.ready_waiter.as_ref().is_some_and(|w| w.bind_id == bind_id) {
            if let Some(waiter) = self.ready_waiter.take() {
                let _ = waiter.tx.send(result);
            }
        }
    }
}

/// Owns the transport and the playback state.
///
/// Cloning is cheap; all clones drive the same player. State changes are
/// published on a `watch` channel and automatic playlist advances on a
/// `broadcast` channel of `VerseChanged`.
pub struct PlaybackController<T, R> {
    inner: Arc<Mutex<Inner>>,
    transport: Arc<T>,
    resolver: Arc<R>,
    state_tx: Arc<watch::Sender<PlaybackState>>,
    verse_tx: broadcast::Sender<VerseChanged>,
}

impl<T, R> Clone for PlaybackController<T, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            transport: self.transport.clone(),
            resolver: self.resolver.clone(),
            state_tx: self.state_tx.clone(),
            verse_tx: self.verse_tx.clone(),
        }
    }
}

impl<T, R> PlaybackController<T, R>
where
    T: AudioTransport,
    R: VerseAudioResolver,
{
    pub fn new(transport: Arc<T>, resolver: Arc<R>) -> Self {
        let (state_tx, _) = watch::channel(PlaybackState::default());
        let (verse_tx, _) = broadcast::channel(VERSE_CHANGED_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                session: PlaybackSession::new(),
                ready_waiter: None,
            })),
            transport,
            resolver,
            state_tx: Arc::new(state_tx),
            verse_tx,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }

    pub fn subscribe_verse_changes(&self) -> broadcast::Receiver<VerseChanged> {
        self.verse_tx.subscribe()
    }

    /// Feed transport events into the controller until the transport goes away.
    pub fn spawn_event_loop(&self, mut events: mpsc::UnboundedReceiver<TransportEvent>) -> JoinHandle<()> {
        let controller = self.clone();
        tracing::info!("Starting transport event listener");

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                controller.handle_transport_event(event).await;
            }
            tracing::debug!("Transport event channel closed");
        })
    }

    /// Play one verse, interrupting whatever is playing.
    ///
    /// Resolves once the transport reports the verse ready. A call superseded
    /// by a newer `play_verse`, `play_all` or `stop_all` completes with
    /// `Ok(())` without binding anything.
    pub async fn play_verse(&self, request: PlaybackRequest) -> Result<(), PlaybackError> {
        let request_id = {
            let mut inner = self.inner.lock().await;
            let id = self.begin(&mut inner, request.clone());
            self.publish(&inner);
            id
        };
        self.finish_verse(request_id, request).await.map(|_| ())
    }

    /// Play `ayahs` of `surah` back to back, in the given order.
    pub async fn play_all(&self, surah: u32, ayahs: &[u32], reciter: &str) -> Result<(), PlaybackError> {
        let entries = ayahs
            .iter()
            .map(|&ayah| PlaybackRequest::new(surah, ayah, reciter))
            .collect::<Result<Vec<_>, _>>()?;

        let (request_id, first) = {
            let mut inner = self.inner.lock().await;
            let Some(first) = inner.session.start_playlist(entries) else {
                tracing::debug!(surah, "Ignoring play all with no verses");
                return Ok(());
            };
            tracing::info!(surah, verses = ayahs.len(), reciter, "Starting playlist");
            let id = self.begin(&mut inner, first.clone());
            self.publish(&inner);
            (id, first)
        };
        self.finish_verse(request_id, first).await.map(|_| ())
    }

    pub async fn pause(&self) {
        let mut inner = self.inner.lock().await;
        if inner.session.pause() {
            self.transport.pause();
            tracing::debug!("Playback paused");
            self.publish(&inner);
        }
    }

    /// Seek the bound verse back to the start and play it.
    pub async fn restart_current(&self) {
        let mut inner = self.inner.lock().await;
        if !inner.session.has_bound() {
            return;
        }
        self.transport.seek(Duration::ZERO);
        match self.transport.play() {
            Ok(()) => {
                inner.session.resume();
                tracing::debug!("Restarted current verse");
            }
            Err(e) => {
                tracing::error!(error = %e, "Error restarting current verse");
                Self::fail_bound(&mut inner, e);
            }
        }
        self.publish(&inner);
    }

    /// Flip repeat mode. A bound verse starts over right away.
    pub async fn toggle_repeat(&self) -> bool {
        let mut inner = self.inner.lock().await;
        let repeating = inner.session.toggle_repeat();
        tracing::debug!(repeating, "Repeat toggled");

        if inner.session.has_bound() {
            self.transport.seek(Duration::ZERO);
            if inner.session.state().is_playing {
                if let Err(e) = self.transport.play() {
                    tracing::error!(error = %e, "Error restarting verse after repeat toggle");
                    Self::fail_bound(&mut inner, e);
                }
            }
        }
        self.publish(&inner);
        repeating
    }

    /// Leave playlist mode, stop the transport and turn repeat off.
    pub async fn stop_all(&self) {
        let mut inner = self.inner.lock().await;
        if inner.session.has_bound() {
            self.transport.pause();
            self.transport.seek(Duration::ZERO);
        }
        inner.session.stop_all();
        inner.ready_waiter = None;
        tracing::info!("Playback stopped");
        self.publish(&inner);
    }

    pub async fn handle_transport_event(&self, event: TransportEvent) {
        let mut inner = self.inner.lock().await;
        if !inner.session.is_bound(event.bind_id()) {
            tracing::trace!(?event, "Ignoring event for a released binding");
            return;
        }

        match event {
            TransportEvent::Ready { bind_id } => {
                if inner.session.mark_ready(bind_id) {
                    tracing::debug!(bind_id, "Verse ready");
                }
                inner.settle_waiter(bind_id, Ok(()));
            }
            TransportEvent::Failed { bind_id, reason } => {
                tracing::error!(bind_id, reason = %reason, "Transport failed");
                let error = PlaybackError::Playback(reason);
                inner.session.fail(&error);
                inner.settle_waiter(bind_id, Err(error));
            }
            TransportEvent::Ended { bind_id } => match inner.session.on_track_ended() {
                EndAction::Restart => {
                    tracing::debug!(bind_id, "Verse ended, repeating");
                    self.transport.seek(Duration::ZERO);
                    if let Err(e) = self.transport.play() {
                        tracing::error!(error = %e, "Error repeating verse");
                        Self::fail_bound(&mut inner, e);
                    }
                }
                EndAction::Advance(next) => {
                    tracing::info!(
                        index = inner.session.state().playlist.index(),
                        next = %next,
                        "Verse ended, playing next in playlist"
                    );
                    let request_id = self.begin(&mut inner, next.clone());
                    let controller = self.clone();
                    tokio::spawn(async move {
                        controller.advance_to(request_id, next).await;
                    });
                }
                EndAction::Finished => {
                    tracing::info!(bind_id, "Verse ended, playback finished");
                }
            },
        }
        self.publish(&inner);
    }

    async fn advance_to(&self, request_id: u64, request: PlaybackRequest) {
        let changed = VerseChanged {
            surah: request.surah,
            ayah: request.ayah,
        };
        match self.finish_verse(request_id, request).await {
            Ok(true) => {
                // No subscribers is fine
                let _ = self.verse_tx.send(changed);
            }
            Ok(false) => tracing::debug!(request_id, "Playlist advance superseded"),
            Err(e) => tracing::warn!(error = %e, "Playlist aborted"),
        }
    }

    /// Release the bound verse and register `request` as the latest one.
    fn begin(&self, inner: &mut Inner, request: PlaybackRequest) -> u64 {
        if inner.session.has_bound() {
            self.transport.pause();
        }
        inner.ready_waiter = None;
        let id = inner.session.begin_request(request);
        tracing::debug!(request_id = id, "Verse requested");
        id
    }

    /// Resolve, bind and wait for readiness. `Ok(false)` means superseded.
    async fn finish_verse(&self, request_id: u64, request: PlaybackRequest) -> Result<bool, PlaybackError> {
        let resolved = self.resolver.resolve_audio(&request).await;

        let ready = {
            let mut inner = self.inner.lock().await;
            if !inner.session.is_latest(request_id) {
                tracing::debug!(request = %request, request_id, "Discarding superseded audio resolution");
                return Ok(false);
            }

            let url = match resolved {
                Ok(url) => url,
                Err(e) => {
                    tracing::error!(request = %request, error = %e, "Error resolving verse audio");
                    inner.session.fail(&e);
                    self.publish(&inner);
                    return Err(e);
                }
            };

            if let Err(e) = self
                .transport
                .bind(request_id, &url)
                .and_then(|()| self.transport.play())
            {
                tracing::error!(request = %request, url = %url, error = %e, "Error playing verse audio");
                inner.session.fail(&e);
                self.publish(&inner);
                return Err(e);
            }

            tracing::debug!(request = %request, url = %url, request_id, "Verse audio bound");
            inner.session.bind(request_id);
            let (tx, rx) = oneshot::channel();
            inner.ready_waiter = Some(ReadyWaiter {
                bind_id: request_id,
                tx,
            });
            self.publish(&inner);
            rx
        };

        match ready.await {
            Ok(Ok(())) => Ok(true),
            Ok(Err(e)) => Err(e),
            // Waiter dropped: a newer request or stop_all took over
            Err(_) => Ok(false),
        }
    }

    fn fail_bound(inner: &mut Inner, error: PlaybackError) {
        let bound = inner.session.bound_id();
        inner.session.fail(&error);
        if let Some(bind_id) = bound {
            inner.settle_waiter(bind_id, Err(error));
        }
    }

    fn publish(&self, inner: &Inner) {
        self.state_tx.send_replace(inner.session.state().clone());
    }
}
