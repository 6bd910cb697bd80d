//! Single-voice playback adapter.
//!
//! A [`Player`] owns at most one playing voice. Every `play` call stops and
//! releases the current voice before building a new one, so rapid triggers
//! cut the previous sound off instead of layering it. Completion is observed
//! by polling, and every state change comes back to the caller as a
//! [`PlaybackEvent`].

mod output;

pub use output::{RodioOutput, RodioVoice};

use log::{debug, error, info};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::focus::{AudioFocus, FocusGrant, Unarbitrated};

/// A sound that is playing (or has just finished).
pub trait Voice {
    fn stop(&mut self);
    fn is_finished(&self) -> bool;
}

/// Something that can decode a file and start it on an audio device.
pub trait AudioOutput {
    type Voice: Voice;

    fn start(&mut self, path: &Path) -> Result<Self::Voice>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Started(PathBuf),
    FocusDenied(PathBuf),
    Completed(PathBuf),
    Stopped(PathBuf),
}

struct ActiveVoice<V> {
    voice: V,
    path: PathBuf,
}

pub struct Player<O: AudioOutput, F: AudioFocus = Unarbitrated> {
    output: O,
    focus: F,
    active: Option<ActiveVoice<O::Voice>>,
}

impl<O: AudioOutput> Player<O, Unarbitrated> {
    pub fn new(output: O) -> Self {
        Self::with_focus(output, Unarbitrated)
    }
}

impl<O: AudioOutput, F: AudioFocus> Player<O, F> {
    pub fn with_focus(output: O, focus: F) -> Self {
        Self {
            output,
            focus,
            active: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|a| a.path.as_path())
    }

    pub fn play(&mut self, path: &Path) -> Result<PlaybackEvent> {
        if let Some(event) = self.stop() {
            debug!("Cut off previous voice: {event:?}");
        }

        if self.focus.request()? == FocusGrant::Denied {
            debug!("Audio focus denied, skipping {}", path.display());
            return Ok(PlaybackEvent::FocusDenied(path.to_path_buf()));
        }

        match self.output.start(path) {
            Ok(voice) => {
                info!("Playing {}", path.display());
                self.active = Some(ActiveVoice {
                    voice,
                    path: path.to_path_buf(),
                });
                Ok(PlaybackEvent::Started(path.to_path_buf()))
            }
            Err(e) => {
                self.focus.release();
                error!("Could not play {}: {e}", path.display());
                Err(e)
            }
        }
    }

    /// Stop and release the active voice, if any.
    pub fn stop(&mut self) -> Option<PlaybackEvent> {
        let mut active = self.active.take()?;
        active.voice.stop();
        self.focus.release();
        Some(PlaybackEvent::Stopped(active.path))
    }

    /// Release the active voice once it has played to the end. While it is
    /// still playing, the held focus is refreshed.
    pub fn poll(&mut self) -> Option<PlaybackEvent> {
        if !self.active.as_ref()?.voice.is_finished() {
            self.focus.refresh();
            return None;
        }

        let mut active = self.active.take()?;
        active.voice.stop();
        self.focus.release();
        debug!("Finished {}", active.path.display());
        Some(PlaybackEvent::Completed(active.path))
    }
}

impl<O: AudioOutput, F: AudioFocus> Drop for Player<O, F> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! An output that records what it was asked to do instead of making noise.

    use super::*;
    use crate::error::HornError;
    use std::cell::{Cell, RefCell};
    use std::collections::HashSet;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum OutputEvent {
        Started(PathBuf),
        Stopped(PathBuf),
    }

    #[derive(Default)]
    struct Shared {
        events: Vec<OutputEvent>,
        voices: Vec<Rc<Cell<bool>>>,
        live: usize,
        max_live: usize,
        failing: HashSet<PathBuf>,
    }

    #[derive(Clone, Default)]
    pub struct Recorder(Rc<RefCell<Shared>>);

    impl Recorder {
        pub fn events(&self) -> Vec<OutputEvent> {
            self.0.borrow().events.clone()
        }

        pub fn live(&self) -> usize {
            self.0.borrow().live
        }

        pub fn max_live(&self) -> usize {
            self.0.borrow().max_live
        }

        /// Mark every voice started so far as played to the end.
        pub fn finish_all(&self) {
            for finished in &self.0.borrow().voices {
                finished.set(true);
            }
        }

        pub fn fail_on(&self, path: &Path) {
            self.0.borrow_mut().failing.insert(path.to_path_buf());
        }
    }

    pub struct RecordingOutput {
        recorder: Recorder,
    }

    impl RecordingOutput {
        pub fn new() -> (Self, Recorder) {
            let recorder = Recorder::default();
            (
                Self {
                    recorder: recorder.clone(),
                },
                recorder,
            )
        }
    }

    pub struct RecordedVoice {
        path: PathBuf,
        finished: Rc<Cell<bool>>,
        stopped: bool,
        recorder: Recorder,
    }

    impl Voice for RecordedVoice {
        fn stop(&mut self) {
            if self.stopped {
                return;
            }
            self.stopped = true;
            let mut shared = self.recorder.0.borrow_mut();
            shared.live -= 1;
            shared.events.push(OutputEvent::Stopped(self.path.clone()));
        }

        fn is_finished(&self) -> bool {
            self.finished.get()
        }
    }

    impl AudioOutput for RecordingOutput {
        type Voice = RecordedVoice;

        fn start(&mut self, path: &Path) -> Result<RecordedVoice> {
            let mut shared = self.recorder.0.borrow_mut();
            if shared.failing.contains(path) {
                return Err(HornError::Decode {
                    path: path.to_path_buf(),
                    reason: "unsupported format".to_string(),
                });
            }

            let finished = Rc::new(Cell::new(false));
            shared.voices.push(finished.clone());
            shared.live += 1;
            shared.max_live = shared.max_live.max(shared.live);
            shared.events.push(OutputEvent::Started(path.to_path_buf()));

            Ok(RecordedVoice {
                path: path.to_path_buf(),
                finished,
                stopped: false,
                recorder: self.recorder.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{OutputEvent, RecordingOutput};
    use super::*;
    use crate::error::HornError;

    struct DenyingFocus {
        requests: usize,
    }

    impl AudioFocus for DenyingFocus {
        fn request(&mut self) -> Result<FocusGrant> {
            self.requests += 1;
            Ok(FocusGrant::Denied)
        }

        fn release(&mut self) {}
    }

    #[derive(Default)]
    struct CountingFocus {
        held: bool,
        releases: usize,
    }

    impl AudioFocus for &mut CountingFocus {
        fn request(&mut self) -> Result<FocusGrant> {
            self.held = true;
            Ok(FocusGrant::Granted)
        }

        fn release(&mut self) {
            if self.held {
                self.releases += 1;
            }
            self.held = false;
        }
    }

    #[test]
    fn test_play_starts_voice() {
        let (output, recorder) = RecordingOutput::new();
        let mut player = Player::new(output);

        let event = player.play(Path::new("/s/honk.wav")).unwrap();

        assert_eq!(event, PlaybackEvent::Started(PathBuf::from("/s/honk.wav")));
        assert!(player.is_active());
        assert_eq!(player.active_path(), Some(Path::new("/s/honk.wav")));
        assert_eq!(recorder.live(), 1);
    }

    #[test]
    fn test_replaying_same_file_stops_previous_first() {
        let (output, recorder) = RecordingOutput::new();
        let mut player = Player::new(output);
        let path = Path::new("/s/siren.wav");

        player.play(path).unwrap();
        player.play(path).unwrap();

        assert_eq!(
            recorder.events(),
            vec![
                OutputEvent::Started(path.to_path_buf()),
                OutputEvent::Stopped(path.to_path_buf()),
                OutputEvent::Started(path.to_path_buf()),
            ]
        );
        assert_eq!(recorder.max_live(), 1);
        assert_eq!(recorder.live(), 1);
    }

    #[test]
    fn test_focus_denied_leaves_player_idle() {
        let (output, recorder) = RecordingOutput::new();
        let mut player = Player::with_focus(output, DenyingFocus { requests: 0 });

        let event = player.play(Path::new("/s/woof.wav")).unwrap();

        assert_eq!(
            event,
            PlaybackEvent::FocusDenied(PathBuf::from("/s/woof.wav"))
        );
        assert!(!player.is_active());
        assert!(recorder.events().is_empty());
        assert_eq!(player.focus.requests, 1);
    }

    #[test]
    fn test_failed_start_releases_focus_and_stays_idle() {
        let (output, recorder) = RecordingOutput::new();
        let broken = Path::new("/s/broken.wav");
        recorder.fail_on(broken);
        let mut focus = CountingFocus::default();

        {
            let mut player = Player::with_focus(output, &mut focus);
            let result = player.play(broken);

            assert!(matches!(result, Err(HornError::Decode { .. })));
            assert!(!player.is_active());
        }

        assert!(!focus.held);
        assert_eq!(focus.releases, 1);
    }

    #[test]
    fn test_poll_reports_completion_once() {
        let (output, recorder) = RecordingOutput::new();
        let mut focus = CountingFocus::default();

        {
            let mut player = Player::with_focus(output, &mut focus);
            player.play(Path::new("/s/chime.wav")).unwrap();
            assert_eq!(player.poll(), None);

            recorder.finish_all();

            assert_eq!(
                player.poll(),
                Some(PlaybackEvent::Completed(PathBuf::from("/s/chime.wav")))
            );
            assert_eq!(player.poll(), None);
            assert!(!player.is_active());
        }

        assert_eq!(focus.releases, 1);
        assert_eq!(recorder.live(), 0);
    }

    #[test]
    fn test_stop_when_idle() {
        let (output, _recorder) = RecordingOutput::new();
        let mut player = Player::new(output);
        assert_eq!(player.stop(), None);
    }

    #[test]
    fn test_drop_stops_active_voice() {
        let (output, recorder) = RecordingOutput::new();
        {
            let mut player = Player::new(output);
            player.play(Path::new("/s/honk.wav")).unwrap();
        }
        assert_eq!(recorder.live(), 0);
    }
}
