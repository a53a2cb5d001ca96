//! Label-rendering UI sink.
//!
//! `LabelBoard` is the presentation side of the controller: it remembers each
//! control's original label, shows a countdown on the playing control and puts
//! the original back when playback stops, ends or fails.

use crate::config::BoardConfig;
use crate::controller::{ControlId, UiSink};

/// Formats the countdown label shown while a control is playing.
pub fn format_time_left(label: &str, seconds_left: u32) -> String {
    format!("{} ({}s)", label, seconds_left)
}

/// Current presentation of one control.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlLabel {
    pub control: ControlId,
    pub original: String,
    pub shown: String,
}

/// Last failure reported for a control.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackFailure {
    pub control: ControlId,
    pub reason: String,
}

/// Tracks labels and the "playing" mark for every control on a board.
#[derive(Debug, Default)]
pub struct LabelBoard {
    controls: Vec<ControlLabel>,
    playing: Option<ControlId>,
    last_error: Option<PlaybackFailure>,
}

impl LabelBoard {
    /// Creates an empty board; controls are added with `register`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board with one control per configured button.
    pub fn from_board(board: &BoardConfig) -> Self {
        let mut labels = Self::new();
        for button in &board.buttons {
            labels.register(button.control_id(), button.label.trim());
        }
        labels
    }

    /// Adds a control, or resets its label if it is already known.
    pub fn register(&mut self, control: ControlId, label: impl Into<String>) {
        let label = label.into();
        match self.find_mut(&control) {
            Some(existing) => {
                existing.original = label.clone();
                existing.shown = label;
            }
            None => self.controls.push(ControlLabel {
                control,
                shown: label.clone(),
                original: label,
            }),
        }
    }

    /// Returns the label currently shown for a control.
    pub fn label(&self, control: &ControlId) -> Option<&str> {
        self.controls
            .iter()
            .find(|c| &c.control == control)
            .map(|c| c.shown.as_str())
    }

    /// Returns the original label for a control.
    pub fn original_label(&self, control: &ControlId) -> Option<&str> {
        self.controls
            .iter()
            .find(|c| &c.control == control)
            .map(|c| c.original.as_str())
    }

    /// Returns the control currently marked playing.
    pub fn playing(&self) -> Option<&ControlId> {
        self.playing.as_ref()
    }

    pub fn controls(&self) -> &[ControlLabel] {
        &self.controls
    }

    pub fn last_error(&self) -> Option<&PlaybackFailure> {
        self.last_error.as_ref()
    }

    fn find_mut(&mut self, control: &ControlId) -> Option<&mut ControlLabel> {
        self.controls.iter_mut().find(|c| &c.control == control)
    }

    fn restore(&mut self, control: &ControlId) {
        if let Some(entry) = self.find_mut(control) {
            entry.shown = entry.original.clone();
        }
    }
}

impl UiSink for LabelBoard {
    fn playing_changed(&mut self, control: Option<&ControlId>) {
        if let Some(previous) = self.playing.take() {
            self.restore(&previous);
        }
        self.playing = control.cloned();
    }

    fn progress(&mut self, control: &ControlId, seconds_left: u32) {
        match self.find_mut(control) {
            Some(entry) => entry.shown = format_time_left(&entry.original, seconds_left),
            None => tracing::debug!("Progress for unknown control '{}'", control),
        }
    }

    fn failed(&mut self, control: &ControlId, reason: &str) {
        self.restore(control);
        if self.playing.as_ref() == Some(control) {
            self.playing = None;
        }
        self.last_error = Some(PlaybackFailure {
            control: control.clone(),
            reason: reason.to_string(),
        });
    }
}
