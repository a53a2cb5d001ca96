//! Audio output initialization.
//!
//! All playback goes through one kira `AudioManager` (one cpal stream). The
//! manager is owned by the backend and lives on the event-loop thread.

use kira::{AudioManager, AudioManagerSettings, DefaultBackend};

use crate::error::{Error, Result};

/// Opens the default audio output device.
pub fn open_audio_manager() -> Result<AudioManager<DefaultBackend>> {
    AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()).map_err(|e| {
        tracing::error!("Failed to initialize audio output: {}", e);
        Error::NoAudioPlayer
    })
}
