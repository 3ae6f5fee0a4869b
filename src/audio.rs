//! Audio output backed by rodio
//!
//! The output stream is not `Send`, so it lives on a dedicated thread that
//! receives commands over a std channel. Verse audio is downloaded on the
//! tokio runtime and handed to that thread fully buffered; ayah recordings
//! are small enough that seeking is done by re-decoding from memory.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc as std_mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::error::PlaybackError;
use crate::playback::{AudioTransport, TransportEvent};

const END_POLL_INTERVAL: Duration = Duration::from_millis(100);

enum AudioCommand {
    Load { bind_id: u64, bytes: Vec<u8> },
    Play,
    Pause,
    Seek(Duration),
    /// Drop the loaded track; only a `Load` for `bind_id` is accepted afterwards
    Unload { bind_id: u64 },
}

pub struct RodioTransport {
    commands: std_mpsc::Sender<AudioCommand>,
    http: reqwest::Client,
    runtime: Handle,
    events: mpsc::UnboundedSender<TransportEvent>,
    active: Arc<AtomicU64>,
}

impl RodioTransport {
    /// Open the default output device. Must be called from within the tokio runtime.
    pub fn new(http: reqwest::Client, events: mpsc::UnboundedSender<TransportEvent>) -> Result<Self> {
        let (commands, command_rx) = std_mpsc::channel();
        let (init_tx, init_rx) = std_mpsc::channel();
        let worker_events = events.clone();

        std::thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || OutputWorker::run(command_rx, worker_events, init_tx))
            .context("Failed to spawn audio output thread")?;

        init_rx
            .recv()
            .context("Audio output thread exited during startup")?
            .map_err(|e| anyhow::anyhow!("Failed to open audio output: {}", e))?;

        tracing::info!("Audio output initialized");

        Ok(Self {
            commands,
            http,
            runtime: Handle::current(),
            events,
            active: Arc::new(AtomicU64::new(0)),
        })
    }

    fn send(&self, command: AudioCommand) -> Result<(), PlaybackError> {
        self.commands
            .send(command)
            .map_err(|_| PlaybackError::Playback("audio output thread stopped".to_string()))
    }
}

impl AudioTransport for RodioTransport {
    fn bind(&self, bind_id: u64, resource: &str) -> Result<(), PlaybackError> {
        let url = reqwest::Url::parse(resource)
            .map_err(|e| PlaybackError::Playback(format!("invalid audio URL {}: {}", resource, e)))?;

        self.active.store(bind_id, Ordering::SeqCst);
        self.send(AudioCommand::Unload { bind_id })?;

        let http = self.http.clone();
        let commands = self.commands.clone();
        let events = self.events.clone();
        let active = self.active.clone();

        self.runtime.spawn(async move {
            let result = download(&http, url.clone()).await;
            if active.load(Ordering::SeqCst) != bind_id {
                tracing::debug!(bind_id, "Dropping download for released binding");
                return;
            }
            match result {
                Ok(bytes) => {
                    tracing::debug!(bind_id, bytes = bytes.len(), url = %url, "Verse audio downloaded");
                    hand_off(&commands, &events, bind_id, bytes);
                }
                Err(e) => {
                    tracing::error!(bind_id, url = %url, error = %e, "Verse audio download failed");
                    let _ = events.send(TransportEvent::Failed {
                        bind_id,
                        reason: format!("download failed: {}", e),
                    });
                }
            }
        });
        Ok(())
    }

    fn play(&self) -> Result<(), PlaybackError> {
        self.send(AudioCommand::Play)
    }

    fn pause(&self) {
        let _ = self.send(AudioCommand::Pause);
    }

    fn seek(&self, position: Duration) {
        let _ = self.send(AudioCommand::Seek(position));
    }
}

/// Pass downloaded audio to the output thread, failing the binding if the
/// thread has exited so the controller does not wait on it forever.
fn hand_off(
    commands: &std_mpsc::Sender<AudioCommand>,
    events: &mpsc::UnboundedSender<TransportEvent>,
    bind_id: u64,
    bytes: Vec<u8>,
) {
    if commands.send(AudioCommand::Load { bind_id, bytes }).is_err() {
        tracing::error!(bind_id, "Audio output thread stopped before load");
        let _ = events.send(TransportEvent::Failed {
            bind_id,
            reason: "audio output thread stopped".to_string(),
        });
    }
}

async fn download(http: &reqwest::Client, url: reqwest::Url) -> Result<Vec<u8>, reqwest::Error> {
    let response = http.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// Tracks which binding the output thread is waiting for. Downloads race
/// with rebinding, so a `Load` can arrive after a newer `Unload`.
#[derive(Debug, Default)]
struct LoadGate {
    expected: u64,
}

impl LoadGate {
    fn expect(&mut self, bind_id: u64) {
        self.expected = bind_id;
    }

    fn accepts(&self, bind_id: u64) -> bool {
        bind_id == self.expected
    }
}

struct LoadedTrack {
    bind_id: u64,
    bytes: Vec<u8>,
    sink: Sink,
    ended: bool,
}

struct OutputWorker {
    handle: OutputStreamHandle,
    events: mpsc::UnboundedSender<TransportEvent>,
    track: Option<LoadedTrack>,
    gate: LoadGate,
    autoplay: bool,
}

impl OutputWorker {
    fn run(
        commands: std_mpsc::Receiver<AudioCommand>,
        events: mpsc::UnboundedSender<TransportEvent>,
        init: std_mpsc::Sender<Result<(), String>>,
    ) {
        let (_stream, handle) = match OutputStream::try_default() {
            Ok(pair) => {
                let _ = init.send(Ok(()));
                pair
            }
            Err(e) => {
                let _ = init.send(Err(e.to_string()));
                return;
            }
        };

        let mut worker = OutputWorker {
            handle,
            events,
            track: None,
            gate: LoadGate::default(),
            autoplay: false,
        };

        loop {
            match commands.recv_timeout(END_POLL_INTERVAL) {
                Ok(command) => worker.apply(command),
                Err(std_mpsc::RecvTimeoutError::Timeout) => {}
                Err(std_mpsc::RecvTimeoutError::Disconnected) => break,
            }
            worker.check_ended();
        }

        tracing::debug!("Audio output thread exiting");
    }

    fn apply(&mut self, command: AudioCommand) {
        match command {
            AudioCommand::Load { bind_id, .. } if !self.gate.accepts(bind_id) => {
                tracing::debug!(bind_id, "Ignoring load for a released binding");
            }
            AudioCommand::Load { bind_id, bytes } => match self.start_sink(&bytes, Duration::ZERO) {
                Ok(sink) => {
                    if self.autoplay {
                        sink.play();
                    }
                    self.track = Some(LoadedTrack {
                        bind_id,
                        bytes,
                        sink,
                        ended: false,
                    });
                    let _ = self.events.send(TransportEvent::Ready { bind_id });
                }
                Err(reason) => {
                    let _ = self.events.send(TransportEvent::Failed { bind_id, reason });
                }
            },
            AudioCommand::Play => {
                self.autoplay = true;
                if let Some(track) = &self.track {
                    track.sink.play();
                }
            }
            AudioCommand::Pause => {
                self.autoplay = false;
                if let Some(track) = &self.track {
                    track.sink.pause();
                }
            }
            AudioCommand::Seek(position) => {
                let Some(track) = self.track.take() else {
                    return;
                };
                track.sink.stop();
                match self.start_sink(&track.bytes, position) {
                    Ok(sink) => {
                        if self.autoplay {
                            sink.play();
                        }
                        self.track = Some(LoadedTrack {
                            sink,
                            ended: false,
                            ..track
                        });
                    }
                    Err(reason) => {
                        let _ = self.events.send(TransportEvent::Failed {
                            bind_id: track.bind_id,
                            reason,
                        });
                    }
                }
            }
            AudioCommand::Unload { bind_id } => {
                self.gate.expect(bind_id);
                self.autoplay = false;
                if let Some(track) = self.track.take() {
                    track.sink.stop();
                }
            }
        }
    }

    /// Build a paused sink positioned at `position`.
    fn start_sink(&self, bytes: &[u8], position: Duration) -> Result<Sink, String> {
        let source = Decoder::new(Cursor::new(bytes.to_vec()))
            .map_err(|e| format!("cannot decode audio: {}", e))?;
        let sink = Sink::try_new(&self.handle).map_err(|e| format!("cannot open sink: {}", e))?;
        sink.pause();
        sink.append(source.skip_duration(position));
        Ok(sink)
    }

    fn check_ended(&mut self) {
        if let Some(track) = self.track.as_mut() {
            if !track.ended && !track.sink.is_paused() && track.sink.empty() {
                track.ended = true;
                let _ = self.events.send(TransportEvent::Ended {
                    bind_id: track.bind_id,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_for_released_binding_is_refused() {
        let mut gate = LoadGate::default();
        gate.expect(1);
        assert!(gate.accepts(1));

        // Rebinding lands before the first download's load
        gate.expect(2);
        assert!(!gate.accepts(1));
        assert!(gate.accepts(2));
    }

    #[test]
    fn test_nothing_accepted_before_first_binding() {
        let gate = LoadGate::default();
        assert!(!gate.accepts(1));
    }

    #[test]
    fn test_load_after_output_thread_exit_fails_binding() {
        let (commands, command_rx) = std_mpsc::channel();
        drop(command_rx);
        let (events, mut event_rx) = mpsc::unbounded_channel();

        hand_off(&commands, &events, 7, vec![0xff, 0xfb]);

        let event = event_rx.try_recv().unwrap();
        assert!(matches!(event, TransportEvent::Failed { bind_id: 7, .. }));
    }

    #[test]
    fn test_load_reaches_live_output_thread() {
        let (commands, command_rx) = std_mpsc::channel();
        let (events, mut event_rx) = mpsc::unbounded_channel();

        hand_off(&commands, &events, 3, vec![1, 2, 3]);

        assert!(matches!(
            command_rx.try_recv().unwrap(),
            AudioCommand::Load { bind_id: 3, ref bytes } if bytes == &[1, 2, 3]
        ));
        assert!(event_rx.try_recv().is_err());
    }
}
