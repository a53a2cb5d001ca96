//! Console UI sink: keeps a `LabelBoard` current and prints each change.

use std::io::Write;

use serde::Serialize;
use soundboard_core::controller::{ControlId, UiSink};
use soundboard_core::labels::LabelBoard;

/// How notifications are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

/// One UI notification as printed in JSON mode.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Notification<'a> {
    PlayingChanged {
        control: Option<&'a str>,
    },
    Progress {
        control: &'a str,
        seconds_left: u32,
        label: &'a str,
    },
    Failed {
        control: &'a str,
        reason: &'a str,
    },
}

/// Prints notifications to `out` after applying them to the label board.
pub struct ConsoleSink<W: Write> {
    labels: LabelBoard,
    mode: OutputMode,
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(labels: LabelBoard, mode: OutputMode, out: W) -> Self {
        Self { labels, mode, out }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    fn emit(&mut self, notification: Notification<'_>, text: String) {
        let line = match self.mode {
            OutputMode::Text => text,
            OutputMode::Json => match serde_json::to_string(&notification) {
                Ok(json) => json,
                Err(e) => {
                    tracing::warn!("Failed to serialize notification: {}", e);
                    return;
                }
            },
        };
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write notification: {}", e);
        }
    }
}

impl<W: Write> UiSink for ConsoleSink<W> {
    fn playing_changed(&mut self, control: Option<&ControlId>) {
        self.labels.playing_changed(control);

        let text = match control {
            Some(c) => format!("▶ {}", self.labels.label(c).unwrap_or(c.as_str())),
            None => "■ idle".to_string(),
        };
        self.emit(
            Notification::PlayingChanged {
                control: control.map(ControlId::as_str),
            },
            text,
        );
    }

    fn progress(&mut self, control: &ControlId, seconds_left: u32) {
        let before = self.labels.label(control).map(str::to_string);
        self.labels.progress(control, seconds_left);

        let label = self
            .labels
            .label(control)
            .unwrap_or(control.as_str())
            .to_string();
        // Only print when the countdown label actually changes.
        if before.as_deref() == Some(label.as_str()) {
            return;
        }
        self.emit(
            Notification::Progress {
                control: control.as_str(),
                seconds_left,
                label: &label,
            },
            format!("▶ {}", label),
        );
    }

    fn failed(&mut self, control: &ControlId, reason: &str) {
        self.labels.failed(control, reason);

        let label = self
            .labels
            .original_label(control)
            .unwrap_or(control.as_str())
            .to_string();
        self.emit(
            Notification::Failed {
                control: control.as_str(),
                reason,
            },
            format!("✖ {}: {}", label, reason),
        );
    }
}
