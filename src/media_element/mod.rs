use crate::bindings::{
    jsClearSource, jsLoadSource, jsPause, jsPlay, jsSeek, jsSetMuted, jsSetVolume,
    jsStartObservingPlayback, jsStopObservingPlayback, jsToggleFullscreen, JsResult,
    LoadSourceErrorCode,
};
use crate::utils::url::Url;
use crate::Logger;
use thiserror::Error;

/// Error encountered while attaching a source URL to the media element.
#[derive(Debug, Error)]
pub(crate) enum AttachMediaSourceError {
    #[error("No media element is available: {0}")]
    NoMediaElement(String),
    #[error("Could not attach the source to the media element: {0}")]
    UnknownError(String),
}

impl From<(LoadSourceErrorCode, Option<String>)> for AttachMediaSourceError {
    fn from(err: (LoadSourceErrorCode, Option<String>)) -> Self {
        let msg = err.1.unwrap_or_default();
        match err.0 {
            LoadSourceErrorCode::NoMediaElement => AttachMediaSourceError::NoMediaElement(msg),
            LoadSourceErrorCode::UnknownError => AttachMediaSourceError::UnknownError(msg),
        }
    }
}

/// Abstraction over the HTMLMediaElement the player is attached to.
///
/// All playback side-effects go through this struct so the rest of the crate
/// only manipulates pure state. Each effectful call forwards to a binding on
/// the other side of the WebAssembly boundary.
pub(crate) struct MediaElementReference {
    /// Set to `true` while regular playback observations are being produced
    /// for the attached source.
    is_observing: bool,
}

impl MediaElementReference {
    pub(crate) fn new() -> Self {
        Self {
            is_observing: false,
        }
    }

    /// Attach the given URL to the media element and begin observing its
    /// playback. `generation` is echoed back on every observation raised for
    /// this source.
    pub(crate) fn attach(
        &mut self,
        generation: u32,
        url: &Url,
    ) -> Result<(), AttachMediaSourceError> {
        jsLoadSource(generation, url.get_ref()).result()?;
        if !self.is_observing {
            jsStartObservingPlayback();
            self.is_observing = true;
        }
        Ok(())
    }

    pub(crate) fn play(&self, generation: u32) {
        jsPlay(generation);
    }

    pub(crate) fn pause(&self) {
        jsPause();
    }

    pub(crate) fn seek(&self, position: f64) {
        jsSeek(position);
    }

    pub(crate) fn set_volume(&self, volume: f64) {
        jsSetVolume(volume);
    }

    pub(crate) fn set_muted(&self, muted: bool) {
        jsSetMuted(muted);
    }

    /// Toggle fullscreen display of the media element. Best-effort: not all
    /// environments allow it and a refusal only produces a log.
    pub(crate) fn toggle_fullscreen(&self) {
        if let Err((_, msg)) = jsToggleFullscreen().result() {
            Logger::debug(&format!(
                "Fullscreen toggle refused: {}",
                msg.unwrap_or_default()
            ));
        }
    }

    /// Detach the current source and stop observing playback.
    pub(crate) fn reset(&mut self) {
        jsClearSource();
        if self.is_observing {
            jsStopObservingPlayback();
            self.is_observing = false;
        }
    }
}
