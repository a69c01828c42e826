use thiserror::Error;

use crate::bindings::{MediaElementErrorCode, PlaybackErrorCode};
use crate::source::SourceCandidates;
use crate::utils::url::Url;

/// Categorized playback failure, with the user-facing message attached.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum PlaybackError {
    #[error("Video loading was aborted")]
    Aborted,
    #[error("Network error while loading video")]
    NetworkFailure,
    #[error("Video format not supported")]
    UnsupportedFormat,
    #[error("Video source not supported or not accessible")]
    SourceNotAccessible,
    #[error("Unknown video error")]
    Unknown,
}

impl From<MediaElementErrorCode> for PlaybackError {
    fn from(code: MediaElementErrorCode) -> Self {
        match code {
            MediaElementErrorCode::Aborted => PlaybackError::Aborted,
            MediaElementErrorCode::Network => PlaybackError::NetworkFailure,
            MediaElementErrorCode::Decode => PlaybackError::UnsupportedFormat,
            MediaElementErrorCode::SrcNotSupported => PlaybackError::SourceNotAccessible,
        }
    }
}

impl PlaybackError {
    pub(crate) fn code(&self) -> PlaybackErrorCode {
        match self {
            PlaybackError::Aborted => PlaybackErrorCode::Aborted,
            PlaybackError::NetworkFailure => PlaybackErrorCode::NetworkFailure,
            PlaybackError::UnsupportedFormat => PlaybackErrorCode::UnsupportedFormat,
            PlaybackError::SourceNotAccessible => PlaybackErrorCode::SourceNotAccessible,
            PlaybackError::Unknown => PlaybackErrorCode::Unknown,
        }
    }
}

/// Where the session currently stands in the playback lifecycle.
///
/// Exactly one variant holds at any time. In particular a session cannot be
/// both loading and in error: a media failure moves it to `Error`, and any
/// new load attempt moves it back to `Loading` first.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum PlaybackPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(PlaybackError),
    Closed,
}

/// Full state of a single playback session, from the moment a video
/// reference is opened to the moment the viewer is closed.
///
/// All methods here are pure state transitions. Talking to the actual media
/// element is the caller's job, driven by the URLs and flags these methods
/// return.
///
/// A `generation` counter increments on every (re)load so that callbacks
/// raised by a source that has since been replaced can be told apart from
/// callbacks for the current one and discarded.
#[derive(Debug, Default)]
pub(crate) struct PlaybackSession {
    phase: PlaybackPhase,
    candidates: SourceCandidates,
    reference: String,
    generation: u32,
    playing: bool,
    muted: bool,
    volume: f64,
    current_time: f64,
    duration: Option<f64>,
    queued_seek: Option<f64>,
}

impl PlaybackSession {
    pub(crate) fn new() -> Self {
        Self {
            volume: 1.,
            ..Self::default()
        }
    }

    pub(crate) fn phase(&self) -> &PlaybackPhase {
        &self.phase
    }

    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }

    /// `true` if `generation` identifies the load attempt the session is
    /// currently bound to. Callbacks carrying a stale generation must be
    /// ignored.
    pub(crate) fn is_current(&self, generation: u32) -> bool {
        self.generation == generation
    }

    pub(crate) fn reference(&self) -> &str {
        &self.reference
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.playing
    }

    pub(crate) fn volume(&self) -> f64 {
        self.volume
    }

    pub(crate) fn is_muted(&self) -> bool {
        self.muted
    }

    pub(crate) fn current_time(&self) -> f64 {
        self.current_time
    }

    pub(crate) fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub(crate) fn current_candidate_index(&self) -> usize {
        self.candidates.current_index()
    }

    /// URLs of every candidate derived from the opened reference.
    pub(crate) fn candidate_urls(&self) -> Vec<String> {
        self.candidates.all().map(str::to_string).collect()
    }

    /// Begin playback of a new video reference.
    ///
    /// Previous session state is dropped, the generation moves forward and
    /// the first candidate URL is returned for the caller to attach to the
    /// media element. If the reference yields no candidate at all, the
    /// session goes straight to `Error` and `None` is returned.
    pub(crate) fn open(&mut self, reference: &str) -> Option<&Url> {
        self.reference = reference.to_string();
        self.candidates = SourceCandidates::from_reference(reference);
        self.generation = self.generation.wrapping_add(1);
        self.playing = false;
        self.current_time = 0.;
        self.duration = None;
        self.queued_seek = None;
        if self.candidates.is_empty() {
            self.phase = PlaybackPhase::Error(PlaybackError::SourceNotAccessible);
            return None;
        }
        self.phase = PlaybackPhase::Loading;
        self.candidates.current()
    }

    /// Duration became known. Returns a seek position queued while metadata
    /// was not yet available, to be applied now.
    pub(crate) fn on_metadata(&mut self, duration: f64) -> Option<f64> {
        self.duration = Some(duration);
        self.queued_seek.take()
    }

    /// Enough media data arrived to begin playing. Returns `true` if this
    /// actually completed a pending load, `false` for redundant signals.
    pub(crate) fn on_data_ready(&mut self, duration: f64) -> bool {
        if self.duration.is_none() {
            self.duration = Some(duration);
        }
        if self.phase == PlaybackPhase::Loading {
            self.phase = PlaybackPhase::Ready;
            true
        } else {
            false
        }
    }

    /// The media element reported a fatal error for the current source.
    pub(crate) fn on_media_error(&mut self, error: PlaybackError) {
        match self.phase {
            PlaybackPhase::Loading | PlaybackPhase::Ready => {
                self.playing = false;
                self.phase = PlaybackPhase::Error(error);
            }
            _ => {}
        }
    }

    /// Re-attempt the current candidate after a failure.
    ///
    /// Only legal from the `Error` phase. The generation moves forward so
    /// that late callbacks from the failed attempt are discarded.
    pub(crate) fn retry(&mut self) -> Option<&Url> {
        if !matches!(self.phase, PlaybackPhase::Error(_)) {
            return None;
        }
        self.generation = self.generation.wrapping_add(1);
        self.playing = false;
        self.current_time = 0.;
        self.duration = None;
        self.queued_seek = None;
        self.phase = PlaybackPhase::Loading;
        self.candidates.current()
    }

    /// Fall back to the next candidate URL after a failure.
    ///
    /// Only legal from the `Error` phase. When there is no other candidate
    /// to try, the session stays in `Error` and `None` is returned.
    pub(crate) fn advance(&mut self) -> Option<&Url> {
        if !matches!(self.phase, PlaybackPhase::Error(_)) {
            return None;
        }
        if !self.candidates.advance() {
            return None;
        }
        self.generation = self.generation.wrapping_add(1);
        self.playing = false;
        self.current_time = 0.;
        self.duration = None;
        self.queued_seek = None;
        self.phase = PlaybackPhase::Loading;
        self.candidates.current()
    }

    /// New playback position observed on the media element.
    pub(crate) fn observe_time(&mut self, current_time: f64) {
        self.current_time = match self.duration {
            Some(duration) if current_time > duration => duration,
            _ => {
                if current_time < 0. {
                    0.
                } else {
                    current_time
                }
            }
        };
    }

    pub(crate) fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Set the volume, clamped to `[0, 1]`. Setting it to exactly zero also
    /// mutes, mirroring how a volume slider dragged to the bottom behaves.
    pub(crate) fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0., 1.);
        self.muted = self.volume == 0.;
    }

    pub(crate) fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Ask to move playback to `position` seconds.
    ///
    /// If the duration is not yet known the seek is queued instead and will
    /// be returned by `on_metadata`. Returns the clamped position to apply
    /// immediately, if any.
    pub(crate) fn request_seek(&mut self, position: f64) -> Option<f64> {
        match self.duration {
            Some(duration) => {
                let clamped = position.clamp(0., duration);
                self.current_time = clamped;
                Some(clamped)
            }
            None => {
                self.queued_seek = Some(if position < 0. { 0. } else { position });
                None
            }
        }
    }

    /// Tear the session down. Volume settings go back to their defaults so
    /// the next session starts from a known state.
    pub(crate) fn close(&mut self) {
        self.phase = PlaybackPhase::Closed;
        self.candidates = SourceCandidates::default();
        self.reference = String::new();
        self.generation = self.generation.wrapping_add(1);
        self.playing = false;
        self.volume = 1.;
        self.muted = false;
        self.current_time = 0.;
        self.duration = None;
        self.queued_seek = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_moves_to_loading_with_first_candidate() {
        let mut session = PlaybackSession::new();
        let url = session.open("gs://bucket/v.mp4").map(|u| u.get_ref().to_string());
        assert_eq!(
            url,
            Some("https://storage.googleapis.com/bucket/v.mp4".to_string())
        );
        assert_eq!(session.phase(), &PlaybackPhase::Loading);
        assert!(!session.is_playing());
        assert_eq!(session.duration(), None);
    }

    #[test]
    fn test_open_empty_reference_is_an_error() {
        let mut session = PlaybackSession::new();
        assert_eq!(session.open(""), None);
        assert_eq!(
            session.phase(),
            &PlaybackPhase::Error(PlaybackError::SourceNotAccessible)
        );
    }

    #[test]
    fn test_generation_guard_discards_stale_callbacks() {
        let mut session = PlaybackSession::new();
        session.open("https://example.com/a.mp4");
        let old_generation = session.generation();
        session.open("https://example.com/b.mp4");
        assert!(!session.is_current(old_generation));
        assert!(session.is_current(session.generation()));
    }

    #[test]
    fn test_data_ready_completes_the_load_once() {
        let mut session = PlaybackSession::new();
        session.open("https://example.com/a.mp4");
        assert!(session.on_data_ready(120.));
        assert_eq!(session.phase(), &PlaybackPhase::Ready);
        assert_eq!(session.duration(), Some(120.));
        assert!(!session.on_data_ready(120.));
    }

    #[test]
    fn test_media_error_from_loading_and_ready() {
        let mut session = PlaybackSession::new();
        session.open("https://example.com/a.mp4");
        session.on_media_error(PlaybackError::NetworkFailure);
        assert_eq!(
            session.phase(),
            &PlaybackPhase::Error(PlaybackError::NetworkFailure)
        );

        let mut session = PlaybackSession::new();
        session.open("https://example.com/a.mp4");
        session.on_data_ready(120.);
        session.set_playing(true);
        session.on_media_error(PlaybackError::UnsupportedFormat);
        assert_eq!(
            session.phase(),
            &PlaybackPhase::Error(PlaybackError::UnsupportedFormat)
        );
        assert!(!session.is_playing());
    }

    #[test]
    fn test_media_error_outside_active_phases_is_ignored() {
        let mut session = PlaybackSession::new();
        session.on_media_error(PlaybackError::Unknown);
        assert_eq!(session.phase(), &PlaybackPhase::Idle);

        session.open("https://example.com/a.mp4");
        session.close();
        session.on_media_error(PlaybackError::Unknown);
        assert_eq!(session.phase(), &PlaybackPhase::Closed);
    }

    #[test]
    fn test_advance_after_failure_loads_next_candidate() {
        let mut session = PlaybackSession::new();
        session.open("gs://bucket/v.mp4");
        session.on_media_error(PlaybackError::UnsupportedFormat);
        let url = session.advance().map(|u| u.get_ref().to_string());
        assert_eq!(
            url,
            Some("https://storage.cloud.google.com/bucket/v.mp4".to_string())
        );
        assert_eq!(session.phase(), &PlaybackPhase::Loading);
        assert_eq!(session.current_candidate_index(), 1);
    }

    #[test]
    fn test_advance_with_single_candidate_stays_in_error() {
        let mut session = PlaybackSession::new();
        session.open("https://example.com/only.mp4");
        session.on_media_error(PlaybackError::NetworkFailure);
        assert_eq!(session.advance(), None);
        assert_eq!(
            session.phase(),
            &PlaybackPhase::Error(PlaybackError::NetworkFailure)
        );
        assert_eq!(session.current_candidate_index(), 0);
    }

    #[test]
    fn test_advance_outside_error_phase_is_rejected() {
        let mut session = PlaybackSession::new();
        session.open("gs://bucket/v.mp4");
        assert_eq!(session.advance(), None);
        assert_eq!(session.phase(), &PlaybackPhase::Loading);
        assert_eq!(session.current_candidate_index(), 0);
    }

    #[test]
    fn test_retry_reloads_the_same_candidate() {
        let mut session = PlaybackSession::new();
        session.open("gs://bucket/v.mp4");
        session.on_media_error(PlaybackError::NetworkFailure);
        let before = session.generation();
        let url = session.retry().map(|u| u.get_ref().to_string());
        assert_eq!(
            url,
            Some("https://storage.googleapis.com/bucket/v.mp4".to_string())
        );
        assert_eq!(session.phase(), &PlaybackPhase::Loading);
        assert_eq!(session.current_candidate_index(), 0);
        assert!(!session.is_current(before));
    }

    #[test]
    fn test_volume_clamped_and_zero_mutes() {
        let mut session = PlaybackSession::new();
        assert_eq!(session.volume(), 1.);
        session.set_volume(1.5);
        assert_eq!(session.volume(), 1.);
        assert!(!session.is_muted());
        session.set_volume(-0.2);
        assert_eq!(session.volume(), 0.);
        assert!(session.is_muted());
        session.set_volume(0.4);
        assert_eq!(session.volume(), 0.4);
        assert!(!session.is_muted());
    }

    #[test]
    fn test_seek_is_queued_until_metadata() {
        let mut session = PlaybackSession::new();
        session.open("https://example.com/a.mp4");
        assert_eq!(session.request_seek(42.), None);
        assert_eq!(session.on_metadata(120.), Some(42.));
        assert_eq!(session.on_metadata(120.), None);
    }

    #[test]
    fn test_seek_clamps_to_duration() {
        let mut session = PlaybackSession::new();
        session.open("https://example.com/a.mp4");
        session.on_data_ready(100.);
        assert_eq!(session.request_seek(250.), Some(100.));
        assert_eq!(session.request_seek(-5.), Some(0.));
        assert_eq!(session.request_seek(30.), Some(30.));
        assert_eq!(session.current_time(), 30.);
    }

    #[test]
    fn test_observe_time_clamps() {
        let mut session = PlaybackSession::new();
        session.open("https://example.com/a.mp4");
        session.on_data_ready(100.);
        session.observe_time(150.);
        assert_eq!(session.current_time(), 100.);
        session.observe_time(-2.);
        assert_eq!(session.current_time(), 0.);
        session.observe_time(55.5);
        assert_eq!(session.current_time(), 55.5);
    }

    #[test]
    fn test_close_resets_audio_defaults() {
        let mut session = PlaybackSession::new();
        session.open("https://example.com/a.mp4");
        session.on_data_ready(100.);
        session.set_volume(0.3);
        session.toggle_mute();
        session.close();
        assert_eq!(session.phase(), &PlaybackPhase::Closed);
        assert_eq!(session.volume(), 1.);
        assert!(!session.is_muted());
        assert_eq!(session.reference(), "");
        assert!(session.candidate_urls().is_empty());
    }
}
