//! In-memory transport and resolver for exercising the controller without audio or network

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{Notify, mpsc};

use super::resolver::VerseAudioResolver;
use super::transport::{AudioTransport, TransportEvent};
use super::types::PlaybackRequest;
use crate::error::PlaybackError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportCall {
    Bind(String),
    Play,
    Pause,
    Seek(Duration),
}

pub fn audio_url(request: &PlaybackRequest) -> String {
    format!(
        "https://audio.test/{}/{}/{}.mp3",
        request.reciter, request.surah, request.ayah
    )
}

/// Records every call and reports `Ready` (or `Failed`) as soon as `play` is called
pub struct FakeTransport {
    events: mpsc::UnboundedSender<TransportEvent>,
    calls: Mutex<Vec<TransportCall>>,
    bound: Mutex<Option<(u64, String)>>,
    fail_on_play: Mutex<HashSet<String>>,
}

impl FakeTransport {
    pub fn new(events: mpsc::UnboundedSender<TransportEvent>) -> Self {
        Self {
            events,
            calls: Mutex::new(Vec::new()),
            bound: Mutex::new(None),
            fail_on_play: Mutex::new(HashSet::new()),
        }
    }

    pub fn fail_on_play(&self, url: &str) {
        self.fail_on_play.lock().unwrap().insert(url.to_string());
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn bound_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::Bind(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn bound_id(&self) -> Option<u64> {
        self.bound.lock().unwrap().as_ref().map(|(id, _)| *id)
    }

    fn record(&self, call: TransportCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl AudioTransport for FakeTransport {
    fn bind(&self, bind_id: u64, resource: &str) -> Result<(), PlaybackError> {
        self.record(TransportCall::Bind(resource.to_string()));
        *self.bound.lock().unwrap() = Some((bind_id, resource.to_string()));
        Ok(())
    }

    fn play(&self) -> Result<(), PlaybackError> {
        self.record(TransportCall::Play);
        if let Some((bind_id, url)) = self.bound.lock().unwrap().clone() {
            let event = if self.fail_on_play.lock().unwrap().contains(&url) {
                TransportEvent::Failed {
                    bind_id,
                    reason: "unsupported format".to_string(),
                }
            } else {
                TransportEvent::Ready { bind_id }
            };
            let _ = self.events.send(event);
        }
        Ok(())
    }

    fn pause(&self) {
        self.record(TransportCall::Pause);
    }

    fn seek(&self, position: Duration) {
        self.record(TransportCall::Seek(position));
    }
}

/// Resolves to `audio_url`, optionally failing or blocking per verse
#[derive(Default)]
pub struct FakeResolver {
    failing: Mutex<HashSet<(u32, u32)>>,
    gates: Mutex<HashMap<(u32, u32), Arc<Notify>>>,
}

impl FakeResolver {
    pub fn fail(&self, surah: u32, ayah: u32) {
        self.failing.lock().unwrap().insert((surah, ayah));
    }

    /// Hold resolution of this verse until the returned `Notify` fires.
    pub fn gate(&self, surah: u32, ayah: u32) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert((surah, ayah), notify.clone());
        notify
    }
}

impl VerseAudioResolver for FakeResolver {
    async fn resolve_audio(&self, request: &PlaybackRequest) -> Result<String, PlaybackError> {
        let key = (request.surah, request.ayah);
        let gate = self.gates.lock().unwrap().get(&key).cloned();
        let fails = self.failing.lock().unwrap().contains(&key);

        if let Some(gate) = gate {
            gate.notified().await;
        }

        if fails {
            Err(PlaybackError::Resolution {
                surah: request.surah,
                ayah: request.ayah,
                reason: "network unreachable".to_string(),
            })
        } else {
            Ok(audio_url(request))
        }
    }
}
