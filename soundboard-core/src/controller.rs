//! Single-active-playback controller.
//!
//! The controller owns the one "currently playing" slot. Every `play` tears
//! down the previous session before starting the next, and every transition is
//! reported to a [`UiSink`] so the presentation never shows a stale "playing"
//! control. Backend lifecycle events are stamped with the [`SessionId`] they
//! belong to; events for anything other than the live session are dropped.
//!
//! The controller is `&mut self` throughout and is meant to be driven from a
//! single event loop, one event at a time.

use std::fmt;
use std::time::Instant;

use crate::error::{Error, Result};

/// Identifier of a sound resource, e.g. `"applause.mp3"`. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SoundId(String);

impl SoundId {
    /// Creates a sound id, rejecting the empty string.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::EmptySoundId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identity of the UI control that triggered a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlId(String);

impl ControlId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which sound to play, and which control asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundRequest {
    pub id: SoundId,
    pub control: ControlId,
}

impl SoundRequest {
    pub fn new(id: SoundId, control: ControlId) -> Self {
        Self { id, control }
    }
}

/// Monotonic tag for one playback attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub(crate) u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle events reported by an audio backend for a started sound.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    Started,
    /// Playback position in seconds. `total` is `None` when the duration is unknown.
    TimeUpdate {
        elapsed: f64,
        total: Option<f64>,
        paused: bool,
    },
    Ended,
    Failed(String),
}

/// Host audio capability: starts and halts sounds, and reports their lifecycle.
pub trait AudioBackend {
    /// Backend-specific reference to an in-progress sound.
    type Handle;

    /// Loads `id` and begins playback. Events for this sound must be tagged with `session`.
    fn start(&mut self, session: SessionId, id: &SoundId) -> Result<Self::Handle>;

    /// Stops and releases a sound.
    fn halt(&mut self, handle: Self::Handle) -> Result<()>;

    /// Drains lifecycle events observed since the last call.
    fn poll_events(&mut self) -> Vec<(SessionId, BackendEvent)> {
        Vec::new()
    }
}

/// Receives presentation updates. The controller never renders anything itself.
pub trait UiSink {
    /// `Some(control)` marks that control playing; `None` returns the board to idle.
    fn playing_changed(&mut self, control: Option<&ControlId>);

    /// Whole seconds left for the playing control.
    fn progress(&mut self, control: &ControlId, seconds_left: u32);

    /// Playback for `control` failed; its visual state should revert.
    fn failed(&mut self, control: &ControlId, reason: &str);
}

/// The one in-flight playback.
struct PlaybackSession<H> {
    id: SessionId,
    request: SoundRequest,
    handle: H,
    started_at: Instant,
    last_reported: Option<u32>,
}

/// Enforces at most one playing sound and keeps the UI sink in step with it.
pub struct PlaybackController<B: AudioBackend, S: UiSink> {
    backend: B,
    sink: S,
    active: Option<PlaybackSession<B::Handle>>,
    next_session: u64,
}

impl<B: AudioBackend, S: UiSink> PlaybackController<B, S> {
    /// Creates an idle controller.
    pub fn new(backend: B, sink: S) -> Self {
        Self {
            backend,
            sink,
            active: None,
            next_session: 0,
        }
    }

    /// Plays `request`, replacing whatever is playing.
    ///
    /// On a synchronous start failure the sink receives `failed` and no session
    /// is recorded; the error is also returned as `Error::StartFailed`.
    pub fn play(&mut self, request: SoundRequest) -> Result<()> {
        self.teardown();

        self.next_session += 1;
        let session = SessionId(self.next_session);

        match self.backend.start(session, &request.id) {
            Ok(handle) => {
                tracing::info!("Playing {} for '{}' (session {})", request.id, request.control, session);
                let control = request.control.clone();
                self.active = Some(PlaybackSession {
                    id: session,
                    request,
                    handle,
                    started_at: Instant::now(),
                    last_reported: None,
                });
                self.sink.playing_changed(Some(&control));
                Ok(())
            }
            Err(e) => {
                let reason = match e {
                    Error::StartFailed(reason) => reason,
                    other => other.to_string(),
                };
                tracing::warn!("Failed to play {} for '{}': {}", request.id, request.control, reason);
                self.sink.failed(&request.control, &reason);
                Err(Error::StartFailed(reason))
            }
        }
    }

    /// Stops the playing sound. No-op when idle.
    pub fn stop(&mut self) {
        self.teardown();
    }

    /// Returns true while a session is active.
    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }

    /// Returns the request behind the active session.
    pub fn current(&self) -> Option<&SoundRequest> {
        self.active.as_ref().map(|s| &s.request)
    }

    /// Returns the active session's id.
    pub fn session_id(&self) -> Option<SessionId> {
        self.active.as_ref().map(|s| s.id)
    }

    /// Handles one lifecycle event from the backend.
    pub fn on_backend_event(&mut self, session: SessionId, event: BackendEvent) {
        let active = match self.active.as_mut() {
            Some(active) if active.id == session => active,
            _ => {
                tracing::debug!("Ignoring {:?} for stale session {}", event, session);
                return;
            }
        };

        match event {
            BackendEvent::Started => {
                tracing::debug!("Backend started {} (session {})", active.request.id, session);
            }
            BackendEvent::TimeUpdate { elapsed, total, paused } => {
                if paused {
                    return;
                }
                let Some(total) = total.filter(|t| t.is_finite() && *t >= 0.0) else {
                    return;
                };

                let left = seconds_left(elapsed, total);
                // Never let the countdown climb back up.
                let left = active.last_reported.map_or(left, |last| left.min(last));
                active.last_reported = Some(left);
                tracing::debug!("{} has {}s left", active.request.id, left);
                self.sink.progress(&active.request.control, left);
            }
            BackendEvent::Ended => {
                if let Some(done) = self.active.take() {
                    tracing::info!(
                        "Finished {} after {:.1}s",
                        done.request.id,
                        done.started_at.elapsed().as_secs_f64()
                    );
                }
                self.sink.playing_changed(None);
            }
            BackendEvent::Failed(reason) => {
                if let Some(failed) = self.active.take() {
                    tracing::warn!("Playback of {} failed: {}", failed.request.id, reason);
                    self.sink.failed(&failed.request.control, &reason);
                }
                self.sink.playing_changed(None);
            }
        }
    }

    /// Pulls pending events from the backend and dispatches them in order.
    pub fn pump(&mut self) {
        for (session, event) in self.backend.poll_events() {
            self.on_backend_event(session, event);
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Halts and clears the active session. Returns false when already idle.
    fn teardown(&mut self) -> bool {
        let Some(session) = self.active.take() else {
            return false;
        };

        if let Err(e) = self.backend.halt(session.handle) {
            tracing::warn!("Ignoring teardown failure for {}: {}", session.request.id, e);
        }
        tracing::info!(
            "Stopped {} after {:.1}s",
            session.request.id,
            session.started_at.elapsed().as_secs_f64()
        );
        self.sink.playing_changed(None);
        true
    }
}

impl<B: AudioBackend, S: UiSink> Drop for PlaybackController<B, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// `ceil(total - elapsed)`, floored at zero. Negative elapsed counts as zero.
fn seconds_left(elapsed: f64, total: f64) -> u32 {
    let elapsed = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };
    let remaining = (total - elapsed).ceil();
    if remaining > 0.0 {
        remaining as u32
    } else {
        0
    }
}
