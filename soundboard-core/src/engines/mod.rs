//! Audio backend implementations.

pub mod audio_output;
mod sound;

pub use sound::KiraBackend;
