//! Application state: the controller plus the trigger keymap, driven one event at a time.

use soundboard_core::controller::{AudioBackend, PlaybackController, UiSink};
use soundboard_core::keymap::{Keymap, Trigger};

/// Everything the event loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// One line typed by the user.
    Input(String),
    /// Periodic wake-up to collect playback progress.
    Tick,
    /// Input closed.
    Eof,
}

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Soundboard application state.
pub struct SoundboardApp<B: AudioBackend, S: UiSink> {
    controller: PlaybackController<B, S>,
    keymap: Keymap,
}

impl<B: AudioBackend, S: UiSink> SoundboardApp<B, S> {
    pub fn new(controller: PlaybackController<B, S>, keymap: Keymap) -> Self {
        Self { controller, keymap }
    }

    /// Handles a single event to completion.
    pub fn handle(&mut self, event: AppEvent) -> Flow {
        match event {
            AppEvent::Tick => {
                self.controller.pump();
                Flow::Continue
            }
            AppEvent::Eof => Flow::Quit,
            AppEvent::Input(line) => self.handle_input(&line),
        }
    }

    fn handle_input(&mut self, line: &str) -> Flow {
        let input = line.trim();
        if input.is_empty() {
            return Flow::Continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            return Flow::Quit;
        }

        match self.keymap.dispatch_input(input) {
            Some(Trigger::Play(request)) => {
                // Failures are already reported through the sink.
                if let Err(e) = self.controller.play(request) {
                    tracing::debug!("Play request failed: {}", e);
                }
            }
            Some(Trigger::Stop) => self.controller.stop(),
            None => tracing::warn!("Nothing bound to '{}'", input),
        }
        Flow::Continue
    }

    /// Stops playback before exit.
    pub fn shutdown(&mut self) {
        tracing::info!("Shutting down, stopping playback");
        self.controller.stop();
    }

    pub fn controller(&self) -> &PlaybackController<B, S> {
        &self.controller
    }
}
