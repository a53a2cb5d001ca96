//! Soundboard Core - single-active-playback soundboard library.
//!
//! This library provides:
//! - Board configuration loading and validation (YAML)
//! - Label-to-resource derivation for buttons
//! - Keyboard trigger dispatch
//! - The playback controller that keeps at most one sound playing
//! - A kira-backed audio backend and a label-rendering UI sink
//!
//! # Example
//!
//! ```rust,no_run
//! use soundboard_core::config::ConfigLoader;
//! use soundboard_core::controller::PlaybackController;
//! use soundboard_core::engines::KiraBackend;
//! use soundboard_core::keymap::{Keymap, Trigger};
//! use soundboard_core::labels::LabelBoard;
//!
//! let board = ConfigLoader::new().load("board.yaml").unwrap();
//! let keymap = Keymap::from_board(&board).unwrap();
//! let backend = KiraBackend::new(board.sounds_path()).unwrap();
//! let mut controller = PlaybackController::new(backend, LabelBoard::from_board(&board));
//!
//! if let Some(Trigger::Play(request)) = keymap.dispatch('a') {
//!     controller.play(request).unwrap();
//! }
//! ```

pub mod config;
pub mod controller;
pub mod engines;
pub mod error;
pub mod keymap;
pub mod labels;
pub mod resolve;

pub use error::{Error, Result};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::config::{BoardConfig, ButtonConfig, ConfigLoader};
    pub use crate::controller::{
        AudioBackend, BackendEvent, ControlId, PlaybackController, SessionId, SoundId,
        SoundRequest, UiSink,
    };
    pub use crate::engines::KiraBackend;
    pub use crate::error::{Error, Result};
    pub use crate::keymap::{Keymap, Trigger};
    pub use crate::labels::LabelBoard;
}
