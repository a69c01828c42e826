use crate::{
    bindings::{
        jsFreeResource, jsGetResourceData, MediaElementErrorCode, RequestId, ResourceId, TimerId,
        TimerReason,
    },
    requester::{ApiError, RetryResult},
    session::PlaybackError,
    wasm_bindgen, Logger,
};

use super::Dispatcher;

/// Why a playback observation was raised by the JavaScript-side.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackTickReason {
    LoadStarted = 0,
    LoadedMetadata = 1,
    LoadedData = 2,
    CanPlay = 3,
    TimeUpdate = 4,
    Play = 5,
    Pause = 6,
    Ended = 7,
}

/// Playback-related values observed on the media element, sent by the
/// JavaScript-side on every media event and at a regular interval.
#[wasm_bindgen]
pub struct MediaObservation {
    generation: u32,
    reason: PlaybackTickReason,
    current_time: f64,
    duration: f64,
    paused: bool,
    ended: bool,
}

#[wasm_bindgen]
impl MediaObservation {
    #[wasm_bindgen(constructor)]
    pub fn new(
        generation: u32,
        reason: PlaybackTickReason,
        current_time: f64,
        duration: f64,
        paused: bool,
        ended: bool,
    ) -> Self {
        Self {
            generation,
            reason,
            current_time,
            duration,
            paused,
            ended,
        }
    }
}

impl MediaObservation {
    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }

    pub(crate) fn reason(&self) -> PlaybackTickReason {
        self.reason
    }

    pub(crate) fn current_time(&self) -> f64 {
        self.current_time
    }

    pub(crate) fn duration(&self) -> f64 {
        self.duration
    }

    pub(crate) fn paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn ended(&self) -> bool {
        self.ended
    }
}

/// Response body kept in JavaScript's memory until it is read, identified by
/// a `ResourceId`. The JavaScript-side resource is freed on drop.
pub(crate) struct JsMemoryBlob {
    id: ResourceId,
}

impl JsMemoryBlob {
    pub(crate) fn from_resource_id(id: ResourceId) -> Self {
        Self { id }
    }

    pub(crate) fn data(&self) -> Option<Vec<u8>> {
        jsGetResourceData(self.id)
    }
}

impl Drop for JsMemoryBlob {
    fn drop(&mut self) {
        jsFreeResource(self.id);
    }
}

/// Methods triggered on JavaScript events by the JavaScript-side.
#[wasm_bindgen]
impl Dispatcher {
    /// A playback observation was produced for the attached source.
    pub fn on_playback_tick(&mut self, observation: MediaObservation) {
        if !self.session.is_current(observation.generation()) {
            Logger::debug("Ignoring playback tick for a replaced source");
            return;
        }
        self.handle_observation(observation);
    }

    /// The media element reported a fatal error for the attached source.
    pub fn on_media_error(
        &mut self,
        generation: u32,
        code: MediaElementErrorCode,
        message: Option<String>,
    ) {
        if !self.session.is_current(generation) {
            Logger::debug("Ignoring media error for a replaced source");
            return;
        }
        if let Some(message) = message {
            Logger::warn(&format!("Media element error: {}", message));
        }
        self.handle_media_failure(PlaybackError::from(code));
    }

    /// The `play` call on the media element was rejected.
    pub fn on_play_rejected(&mut self, generation: u32, reason: Option<String>) {
        if !self.session.is_current(generation) {
            return;
        }
        self.handle_play_rejection(reason);
    }

    /// A backend request finished with success. Its response body can be
    /// fetched through `resource_id`.
    pub fn on_request_finished(&mut self, request_id: RequestId, resource_id: ResourceId) {
        let blob = JsMemoryBlob::from_resource_id(resource_id);
        let Some(info) = self.requester.remove_pending(request_id) else {
            Logger::info(&format!("Unknown request finished: {}", request_id));
            return;
        };
        self.handle_request_success(info, blob);
    }

    /// A backend request failed, either through a network error, a timeout
    /// or a non-success HTTP status.
    pub fn on_request_failed(
        &mut self,
        request_id: RequestId,
        has_timeouted: bool,
        status: Option<u32>,
    ) {
        let error = ApiError::from_failure(has_timeouted, status);
        match self.requester.on_request_failed(request_id) {
            RetryResult::Retried => {}
            RetryResult::Abandoned(info) => self.handle_request_abandoned(info, error),
        }
    }

    /// A timer started by this `Dispatcher` ended.
    pub fn on_timer_ended(&mut self, timer_id: TimerId, reason: TimerReason) {
        match reason {
            TimerReason::RetryRequest => self.requester.on_retry_timer(timer_id),
        }
    }
}
