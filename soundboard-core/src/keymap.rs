//! Keyboard and label trigger dispatch.

use std::collections::{BTreeMap, HashMap};

use crate::config::BoardConfig;
use crate::controller::SoundRequest;
use crate::error::Result;

/// A user request to the playback controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Play(SoundRequest),
    Stop,
}

/// Maps shortcuts and button labels to triggers.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    by_key: BTreeMap<char, Trigger>,
    by_label: HashMap<String, SoundRequest>,
}

impl Keymap {
    /// Builds the keymap for a board. Fails if a button has no usable sound id.
    pub fn from_board(board: &BoardConfig) -> Result<Self> {
        let mut keymap = Self::default();

        for button in &board.buttons {
            let request = SoundRequest::new(button.sound_id(&board.extension)?, button.control_id());
            if let Some(key) = button.key_char() {
                keymap.by_key.insert(key, Trigger::Play(request.clone()));
            }
            keymap
                .by_label
                .insert(button.label.trim().to_lowercase(), request);
        }

        if let Some(key) = board.stop_char() {
            keymap.by_key.insert(key, Trigger::Stop);
        }

        Ok(keymap)
    }

    /// Looks up a single key press (case-insensitive).
    pub fn dispatch(&self, key: char) -> Option<Trigger> {
        let key = key.to_lowercase().next()?;
        self.by_key.get(&key).cloned()
    }

    /// Looks up a button by its label, as a click would.
    pub fn dispatch_label(&self, label: &str) -> Option<Trigger> {
        self.by_label
            .get(&label.trim().to_lowercase())
            .cloned()
            .map(Trigger::Play)
    }

    /// Interprets one line of user input: a bound key, `stop`, or a button label.
    pub fn dispatch_input(&self, input: &str) -> Option<Trigger> {
        let input = input.trim();
        let mut chars = input.chars();
        if let (Some(key), None) = (chars.next(), chars.next()) {
            if let Some(trigger) = self.dispatch(key) {
                return Some(trigger);
            }
        }
        if input.eq_ignore_ascii_case("stop") {
            return Some(Trigger::Stop);
        }
        self.dispatch_label(input)
    }

    /// Returns the key bindings in key order.
    pub fn bindings(&self) -> impl Iterator<Item = (char, &Trigger)> {
        self.by_key.iter().map(|(k, t)| (*k, t))
    }
}
