//! Audio backend that plays sound files via kira.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use kira::backend::Backend;
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::sound::PlaybackState;
use kira::{AudioManager, DefaultBackend, Tween};

use crate::controller::{AudioBackend, BackendEvent, SessionId, SoundId};
use crate::engines::audio_output::open_audio_manager;
use crate::error::{Error, Result};

/// Read side of a playing sound, as polled for lifecycle events.
trait SoundProgress {
    fn playback_state(&self) -> PlaybackState;
    fn position(&self) -> f64;
}

impl SoundProgress for StaticSoundHandle {
    fn playback_state(&self) -> PlaybackState {
        self.state()
    }

    fn position(&self) -> f64 {
        StaticSoundHandle::position(self)
    }
}

/// A sound started by the backend and not yet reported as ended.
struct LiveSound<H> {
    handle: H,
    /// Decoded length in seconds.
    duration: Option<f64>,
    announced: bool,
}

/// Audio backend that resolves sound ids to files in a sounds directory.
///
/// Files are decoded synchronously in `start`, so missing files, decode
/// errors and a full mixer all surface as `StartFailed` there. Polling only
/// ever reports `Started`, `TimeUpdate` and `Ended`; it never emits `Failed`.
pub struct KiraBackend<B: Backend = DefaultBackend> {
    sounds_dir: PathBuf,
    manager: AudioManager<B>,
    live: HashMap<SessionId, LiveSound<StaticSoundHandle>>,
}

impl KiraBackend<DefaultBackend> {
    /// Opens the default audio device and plays files from `sounds_dir`.
    pub fn new<P: AsRef<Path>>(sounds_dir: P) -> Result<Self> {
        Ok(Self::with_manager(sounds_dir, open_audio_manager()?))
    }
}

impl<B: Backend> KiraBackend<B> {
    /// Plays files from `sounds_dir` through an already opened manager.
    pub fn with_manager<P: AsRef<Path>>(sounds_dir: P, manager: AudioManager<B>) -> Self {
        let sounds_dir = sounds_dir.as_ref().to_path_buf();
        if !sounds_dir.is_dir() {
            tracing::warn!("Sounds directory {} does not exist", sounds_dir.display());
        }

        Self {
            sounds_dir,
            manager,
            live: HashMap::new(),
        }
    }

    /// Returns the number of sounds started and not yet reported as ended.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

fn resolve_sound_path(sounds_dir: &Path, id: &SoundId) -> Result<PathBuf> {
    let candidate = Path::new(id.as_str());
    let path = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        sounds_dir.join(candidate)
    };

    if !path.is_file() {
        return Err(Error::StartFailed(format!("not found: {}", path.display())));
    }
    Ok(path)
}

/// Turns the current state of every live sound into events, dropping the ones that stopped.
fn drain_events<H: SoundProgress>(
    live: &mut HashMap<SessionId, LiveSound<H>>,
) -> Vec<(SessionId, BackendEvent)> {
    let mut events = Vec::new();
    let mut finished = Vec::new();

    for (session, sound) in live.iter_mut() {
        if !sound.announced {
            sound.announced = true;
            events.push((*session, BackendEvent::Started));
        }

        match sound.handle.playback_state() {
            PlaybackState::Stopped => {
                finished.push(*session);
                events.push((*session, BackendEvent::Ended));
            }
            state => events.push((
                *session,
                BackendEvent::TimeUpdate {
                    elapsed: sound.handle.position(),
                    total: sound.duration,
                    paused: matches!(state, PlaybackState::Paused | PlaybackState::Pausing),
                },
            )),
        }
    }

    for session in finished {
        live.remove(&session);
    }
    events
}

impl<B: Backend> AudioBackend for KiraBackend<B> {
    type Handle = SessionId;

    fn start(&mut self, session: SessionId, id: &SoundId) -> Result<SessionId> {
        let path = resolve_sound_path(&self.sounds_dir, id)?;
        let sound_data = StaticSoundData::from_file(&path)
            .map_err(|e| Error::StartFailed(format!("Failed to load {}: {}", path.display(), e)))?;
        let duration = Some(sound_data.duration().as_secs_f64());

        let handle = self
            .manager
            .play(sound_data)
            .map_err(|e| Error::StartFailed(format!("{}", e)))?;

        tracing::debug!("Started {} from {}", session, path.display());
        self.live.insert(
            session,
            LiveSound {
                handle,
                duration,
                announced: false,
            },
        );
        Ok(session)
    }

    fn halt(&mut self, handle: SessionId) -> Result<()> {
        match self.live.remove(&handle) {
            Some(mut sound) => {
                sound.handle.stop(Tween::default());
                Ok(())
            }
            None => Err(Error::TeardownFailed(format!("no live sound for session {}", handle))),
        }
    }

    fn poll_events(&mut self) -> Vec<(SessionId, BackendEvent)> {
        drain_events(&mut self.live)
    }
}

impl<B: Backend> Drop for KiraBackend<B> {
    fn drop(&mut self) {
        for (_, mut sound) in self.live.drain() {
            sound.handle.stop(Tween::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kira::backend::mock::MockBackend;
    use kira::AudioManagerSettings;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_path_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let id = SoundId::new("missing.mp3").unwrap();

        let result = resolve_sound_path(temp_dir.path(), &id);
        match result {
            Err(Error::StartFailed(reason)) => assert!(reason.starts_with("not found")),
            other => panic!("expected StartFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_path_in_sounds_dir() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("applause.wav");
        std::fs::write(&file, b"not really audio").unwrap();

        let id = SoundId::new("applause.wav").unwrap();
        assert_eq!(resolve_sound_path(temp_dir.path(), &id).unwrap(), file);
    }

    #[test]
    fn test_resolve_absolute_id() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("boo.wav");
        std::fs::write(&file, b"x").unwrap();

        let id = SoundId::new(file.display().to_string()).unwrap();
        assert_eq!(resolve_sound_path(Path::new("/nowhere"), &id).unwrap(), file);
    }

    struct FakeHandle {
        state: PlaybackState,
        position: f64,
    }

    impl SoundProgress for FakeHandle {
        fn playback_state(&self) -> PlaybackState {
            self.state
        }

        fn position(&self) -> f64 {
            self.position
        }
    }

    fn live_with(state: PlaybackState, position: f64) -> HashMap<SessionId, LiveSound<FakeHandle>> {
        let mut live = HashMap::new();
        live.insert(
            SessionId(7),
            LiveSound {
                handle: FakeHandle { state, position },
                duration: Some(2.0),
                announced: false,
            },
        );
        live
    }

    #[test]
    fn test_started_reported_once() {
        let mut live = live_with(PlaybackState::Playing, 0.25);
        let update = BackendEvent::TimeUpdate {
            elapsed: 0.25,
            total: Some(2.0),
            paused: false,
        };

        assert_eq!(
            drain_events(&mut live),
            vec![(SessionId(7), BackendEvent::Started), (SessionId(7), update.clone())]
        );
        assert_eq!(drain_events(&mut live), vec![(SessionId(7), update)]);
    }

    #[test]
    fn test_pausing_and_paused_report_paused() {
        for state in [PlaybackState::Pausing, PlaybackState::Paused] {
            let mut live = live_with(state, 1.0);
            let events = drain_events(&mut live);
            assert_eq!(
                events[1].1,
                BackendEvent::TimeUpdate {
                    elapsed: 1.0,
                    total: Some(2.0),
                    paused: true,
                }
            );
        }
    }

    #[test]
    fn test_stopped_reports_ended_and_forgets_sound() {
        let mut live = live_with(PlaybackState::Playing, 0.5);
        drain_events(&mut live);

        live.get_mut(&SessionId(7)).unwrap().handle.state = PlaybackState::Stopped;
        assert_eq!(drain_events(&mut live), vec![(SessionId(7), BackendEvent::Ended)]);
        assert!(live.is_empty());
        assert!(drain_events(&mut live).is_empty());
    }

    fn mock_backend(sounds_dir: &Path) -> KiraBackend<MockBackend> {
        let manager = AudioManager::<MockBackend>::new(AudioManagerSettings::default()).unwrap();
        KiraBackend::with_manager(sounds_dir, manager)
    }

    #[test]
    fn test_start_poll_and_halt_without_device() {
        let temp_dir = TempDir::new().unwrap();
        create_test_wav(&temp_dir.path().join("a.wav"), 440.0, 0.5, 44100);
        let mut backend = mock_backend(temp_dir.path());
        let session = SessionId(1);

        let handle = backend.start(session, &SoundId::new("a.wav").unwrap()).unwrap();
        assert_eq!(handle, session);
        assert_eq!(backend.live_count(), 1);

        let first = backend.poll_events();
        assert_eq!(first[0], (session, BackendEvent::Started));
        match &first[1].1 {
            BackendEvent::TimeUpdate { total, .. } => {
                let total = total.unwrap();
                assert!((total - 0.5).abs() < 0.01, "unexpected duration {}", total);
            }
            other => panic!("expected TimeUpdate, got {:?}", other),
        }
        assert!(backend
            .poll_events()
            .iter()
            .all(|(_, event)| *event != BackendEvent::Started));

        backend.halt(handle).unwrap();
        assert_eq!(backend.live_count(), 0);
        assert!(backend.poll_events().is_empty());
        assert!(matches!(backend.halt(handle), Err(Error::TeardownFailed(_))));
    }

    #[test]
    fn test_start_undecodable_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("broken.wav"), b"not really audio").unwrap();
        let mut backend = mock_backend(temp_dir.path());

        match backend.start(SessionId(1), &SoundId::new("broken.wav").unwrap()) {
            Err(Error::StartFailed(reason)) => assert!(reason.starts_with("Failed to load")),
            other => panic!("expected StartFailed, got {:?}", other),
        }
        assert_eq!(backend.live_count(), 0);
    }

    #[test]
    fn test_start_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut backend = mock_backend(temp_dir.path());

        match backend.start(SessionId(1), &SoundId::new("nope.wav").unwrap()) {
            Err(Error::StartFailed(reason)) => assert!(reason.starts_with("not found")),
            other => panic!("expected StartFailed, got {:?}", other),
        }
        assert!(backend.poll_events().is_empty());
    }

    /// Plays a short generated tone, then a second one, and checks that the
    /// first is halted and the second eventually reports `Ended`.
    ///
    /// Requires a working audio device — skip in CI.
    #[test]
    #[ignore] // Requires audio device — run with: cargo test -- --ignored
    fn test_kira_backend_plays_and_ends() {
        let temp_dir = TempDir::new().unwrap();
        create_test_wav(&temp_dir.path().join("a.wav"), 440.0, 1.0, 44100);
        create_test_wav(&temp_dir.path().join("b.wav"), 660.0, 0.5, 44100);

        let mut backend = KiraBackend::new(temp_dir.path()).unwrap();
        let first = SessionId(1);
        let second = SessionId(2);

        backend.start(first, &SoundId::new("a.wav").unwrap()).unwrap();
        backend.halt(first).unwrap();
        backend.start(second, &SoundId::new("b.wav").unwrap()).unwrap();
        assert_eq!(backend.live_count(), 1);

        let mut ended = false;
        for _ in 0..40 {
            std::thread::sleep(std::time::Duration::from_millis(50));
            for (session, event) in backend.poll_events() {
                assert_eq!(session, second);
                if event == BackendEvent::Ended {
                    ended = true;
                }
            }
            if ended {
                break;
            }
        }
        assert!(ended, "second sound never reported Ended");
        assert_eq!(backend.live_count(), 0);
        assert!(backend.halt(second).is_err());
    }

    /// Helper: create a WAV file with a sine wave for testing.
    fn create_test_wav(path: &Path, frequency: f32, duration_secs: f32, sample_rate: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        let num_samples = (sample_rate as f32 * duration_secs) as usize;
        for i in 0..num_samples {
            let t = i as f32 / sample_rate as f32;
            let sample = (t * frequency * 2.0 * std::f32::consts::PI).sin();
            writer
                .write_sample((sample * i16::MAX as f32) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }
}
