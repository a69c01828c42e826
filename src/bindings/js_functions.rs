use crate::wasm_bindgen;

/// # js_functions
///
/// This file lists all JavaScript functions that are callable from Rust as
/// well as the structs and enumerations used by those functions.

#[wasm_bindgen]
extern "C" {
    // Log the given text in the JavaScript console, with the log level given.
    pub fn jsLog(log_level: LogLevel, log: &str);

    // Starts a timer for the number of milliseconds indicated by the
    // `duration` argument.
    //
    // Once this timer has elapsed, and unless `jsClearTimer` has been called
    // since with the `TimerId` returned by this function, the
    // `on_timer_ended` method of the `Dispatcher` will be called with both
    // the corresponding `TimerId` and `reason`.
    pub fn jsTimer(duration: f64, reason: TimerReason) -> TimerId;

    // Clear a timer started with `jsTimer`.
    pub fn jsClearTimer(id: TimerId);

    // Perform an HTTP(S) request on the given `url` with the given method
    // and optional JSON body, and await a response.
    //
    // On a 2xx response, the response body is kept in JavaScript's memory
    // and its `ResourceId` is communicated through the Dispatcher's
    // `on_request_finished` method. Any other outcome goes through
    // `on_request_failed`. Both are always called asynchronously after the
    // `jsFetch` call, unless the request has been aborted through
    // `jsAbortRequest` in the meantime.
    //
    // To avoid memory leaks, it is __VERY__ important to call
    // `jsFreeResource` with the communicated `ResourceId` once the resource
    // is not needed anymore.
    pub fn jsFetch(url: &str, method: RequestMethod, body: Option<String>) -> RequestId;

    // Perform a multipart `POST` request on the given `url`.
    //
    // `fields_json` is a JSON object whose entries become the form's text
    // fields. If `attach_picked_file` is `true`, the file currently picked
    // by the user in the page's file input (which only exists on the
    // JavaScript-side) is appended as the form's `file` field.
    //
    // Completion is reported exactly like `jsFetch`.
    pub fn jsPostForm(url: &str, fields_json: &str, attach_picked_file: bool) -> RequestId;

    // Abort a request started with `jsFetch` or `jsPostForm` based on its
    // `request_id`.
    //
    // After calling this function, you won't get any event linked to that
    // request ever again.
    //
    // Returns `true` if a pending request with the given RequestId was found
    // and aborted.
    pub fn jsAbortRequest(request_id: RequestId) -> bool;

    // Returns the data, as a vector of bytes, of a resource behind a
    // `ResourceId`.
    //
    // Returns `None` if that `ResourceId` is not linked to any resource
    // right now.
    pub fn jsGetResourceData(id: ResourceId) -> Option<Vec<u8>>;

    // Free a resource stored in JavaScript's memory kept alive for the
    // current `Dispatcher`.
    pub fn jsFreeResource(resource_id: ResourceId) -> bool;

    // Returns a random value between 0 and 1, as `Math.random()` does.
    pub fn jsGetRandom() -> f64;

    // Returns the current UNIX timestamp in milliseconds, as `Date.now()`
    // does.
    pub fn jsNow() -> f64;

    // Assign the given candidate URL as the media element's source and start
    // loading it.
    //
    // The `generation` argument is echoed back on every media event the
    // JavaScript-side then emits for this load (`on_playback_tick`,
    // `on_media_error`, `on_play_rejected`), which lets the `Dispatcher`
    // discard events from a load that has been superseded since.
    pub fn jsLoadSource(generation: u32, url: &str) -> LoadSourceResult;

    // Detach the current source from the media element, if any, abandoning
    // any in-flight load.
    pub fn jsClearSource();

    // Call `play()` on the media element. The returned promise is caught on
    // the JavaScript-side: a rejection is reported through the Dispatcher's
    // `on_play_rejected` method rather than thrown.
    pub fn jsPlay(generation: u32);

    // Call `pause()` on the media element.
    pub fn jsPause();

    // Move the media element's playhead to the given position, in seconds.
    pub fn jsSeek(position: f64);

    // Update the media element's volume, between `0.` and `1.`.
    pub fn jsSetVolume(volume: f64);

    // Update the media element's `muted` attribute.
    pub fn jsSetMuted(muted: bool);

    // Best-effort fullscreen toggle on the player's container.
    //
    // The JavaScript-side probes whichever fullscreen capability the browser
    // exposes; an error here is reported in the result but is never fatal.
    pub fn jsToggleFullscreen() -> FullscreenToggleResult;

    // Open the given URL outside the embedded player (new tab or window).
    pub fn jsOpenExternal(url: &str) -> OpenExternalResult;

    // Last-resort escape hatch when no URL could be opened programmatically:
    // surface the given URL as plain text for manual copying.
    pub fn jsPromptManualCopy(url: &str);

    // Surface a best-effort, blocking user alert.
    pub fn jsAlert(message: &str);

    // After this function is called, the `Dispatcher` will receive a
    // `MediaObservation` through its `on_playback_tick` method on every
    // notable media event (load start, metadata, data, canplay, timeupdate,
    // play, pause, ended) until `jsStopObservingPlayback` is called.
    pub fn jsStartObservingPlayback();

    // Stop emitting `MediaObservation`s until `jsStartObservingPlayback` is
    // called again.
    pub fn jsStopObservingPlayback();

    pub fn jsAnnouncePhaseChange(phase: PlaybackPhaseCode);

    pub fn jsAnnounceSourceChange(url: &str, candidate_index: u32);

    pub fn jsAnnounceTimeUpdate(current_time: f64, duration: f64, formatted: &str);

    pub fn jsAnnouncePlayingChange(is_playing: bool);

    pub fn jsAnnounceVolumeChange(volume: f64, muted: bool);

    // Report a fatal playback fault, together with the JSON-serialized list
    // of candidate URLs that were attempted, so the page can offer retry,
    // fallback and external-open escapes.
    pub fn jsSendPlaybackError(code: PlaybackErrorCode, message: &str, attempted_urls_json: &str);

    // Report a non-fatal playback problem (e.g. a rejected play attempt).
    pub fn jsSendPlaybackWarning(message: &str);

    pub fn jsAnnounceFileList(files_json: &str);

    pub fn jsAnnounceRecordList(records_json: &str);

    pub fn jsAnnounceRecordSummary(filename: &str, summary_json: &str);

    pub fn jsAnnounceAnalysisComplete(filename: &str, record_json: Option<String>);

    pub fn jsAnnounceStats(total_files: u32, analyzed: u32, average_score: Option<f64>);

    pub fn jsAnnounceAuthChange(user_label: Option<&str>);

    // Hand the shaped export table over to the page's spreadsheet writer.
    //
    // `columns_json` is the JSON-serialized list of `{header, width}`
    // objects, `rows_json` the JSON-serialized list of rows (one list of
    // cell strings per record), in the same column order.
    pub fn jsWriteSpreadsheet(filename: &str, sheet_name: &str, columns_json: &str, rows_json: &str);

    // Read the persisted user label, if a login was stored by a previous
    // session.
    pub fn jsReadStoredUser() -> Option<String>;

    // Persist the given user label.
    pub fn jsStoreUser(user_label: &str);

    // Clear any persisted user label.
    pub fn jsClearStoredUser();
}

/// Levels with which a log can be emitted.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd)]
pub enum LogLevel {
    /// Log level reserved for very important errors and highly unexpected events.
    Error = 0,

    /// Log level reserved for less important errors and unexpected events.
    Warn = 1,

    /// Log level reserved for important events
    Info = 2,

    /// Log level used when debugging. Small-ish yet impactful events should be logged with it.
    Debug = 3,
}

/// HTTP method used by a `jsFetch` call.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestMethod {
    Get = 0,
    Post = 1,
}

/// "Reason" associated to a timer started by the Dispatcher.
///
/// This can then help to identify what the timer was for once resolved.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerReason {
    /// The timer is linked to a failed request that has to be retried.
    RetryRequest = 0,
}

/// Media-element fault codes, mirroring the `MediaError.code` constants the
/// browser reports on the element's `error` event.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaElementErrorCode {
    /// `MEDIA_ERR_ABORTED`: the fetching process was aborted at the user's
    /// request.
    Aborted = 1,

    /// `MEDIA_ERR_NETWORK`: a network error caused the media download to
    /// fail part-way.
    Network = 2,

    /// `MEDIA_ERR_DECODE`: the media could not be decoded.
    Decode = 3,

    /// `MEDIA_ERR_SRC_NOT_SUPPORTED`: the media resource was not suitable or
    /// not accessible.
    SrcNotSupported = 4,
}

/// Classified playback fault communicated to the page on a fatal playback
/// error.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackErrorCode {
    Aborted = 0,
    NetworkFailure = 1,
    UnsupportedFormat = 2,
    SourceNotAccessible = 3,
    Unknown = 4,
}

/// Outer playback phase communicated to the page on every phase transition.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackPhaseCode {
    Idle = 0,
    Loading = 1,
    Ready = 2,
    Error = 3,
    Closed = 4,
}

/// Trait allowing to convert "JavaScript Results" as exposed by the
/// JavaScript functions into `Result` structs more idiomatic to Rust.
pub(crate) trait JsResult<T, E> {
    fn result(self) -> Result<T, (E, Option<String>)>;
}

/// Errors that can arise when assigning a new source to the media element.
#[wasm_bindgen]
pub enum LoadSourceErrorCode {
    /// No media element is currently mounted on the page.
    NoMediaElement,

    /// The source could not be assigned because of an unknown error.
    UnknownError,
}

/// Result of calling the `jsLoadSource` JavaScript function.
///
/// Creation of a `LoadSourceResult` should only be performed by the
/// JavaScript side through the exposed static constructors.
#[wasm_bindgen]
pub struct LoadSourceResult {
    error: Option<(LoadSourceErrorCode, Option<String>)>,
}

#[wasm_bindgen]
impl LoadSourceResult {
    /// Creates a `LoadSourceResult` indicating success.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn success() -> Self {
        Self { error: None }
    }

    /// Creates a `LoadSourceResult` indicating failure, with the
    /// corresponding error.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn error(err: LoadSourceErrorCode, desc: Option<String>) -> Self {
        Self {
            error: Some((err, desc)),
        }
    }
}

impl JsResult<(), LoadSourceErrorCode> for LoadSourceResult {
    fn result(self) -> Result<(), (LoadSourceErrorCode, Option<String>)> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(())
        }
    }
}

/// Errors that can arise when toggling fullscreen on the player container.
#[wasm_bindgen]
pub enum FullscreenToggleErrorCode {
    /// No fullscreen capability could be found on the host environment.
    NotSupported,

    /// The toggle failed because of an unknown error.
    UnknownError,
}

/// Result of calling the `jsToggleFullscreen` JavaScript function.
///
/// Creation of a `FullscreenToggleResult` should only be performed by the
/// JavaScript side through the exposed static constructors.
#[wasm_bindgen]
pub struct FullscreenToggleResult {
    error: Option<(FullscreenToggleErrorCode, Option<String>)>,
}

#[wasm_bindgen]
impl FullscreenToggleResult {
    /// Creates a `FullscreenToggleResult` indicating success.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn success() -> Self {
        Self { error: None }
    }

    /// Creates a `FullscreenToggleResult` indicating failure, with the
    /// corresponding error.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn error(err: FullscreenToggleErrorCode, desc: Option<String>) -> Self {
        Self {
            error: Some((err, desc)),
        }
    }
}

impl JsResult<(), FullscreenToggleErrorCode> for FullscreenToggleResult {
    fn result(self) -> Result<(), (FullscreenToggleErrorCode, Option<String>)> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(())
        }
    }
}

/// Errors that can arise when opening a URL outside the embedded player.
#[wasm_bindgen]
pub enum OpenExternalErrorCode {
    /// The new tab or window was blocked by the host environment.
    Blocked,

    /// The URL could not be opened because of an unknown error.
    UnknownError,
}

/// Result of calling the `jsOpenExternal` JavaScript function.
///
/// Creation of an `OpenExternalResult` should only be performed by the
/// JavaScript side through the exposed static constructors.
#[wasm_bindgen]
pub struct OpenExternalResult {
    error: Option<(OpenExternalErrorCode, Option<String>)>,
}

#[wasm_bindgen]
impl OpenExternalResult {
    /// Creates an `OpenExternalResult` indicating success.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn success() -> Self {
        Self { error: None }
    }

    /// Creates an `OpenExternalResult` indicating failure, with the
    /// corresponding error.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn error(err: OpenExternalErrorCode, desc: Option<String>) -> Self {
        Self {
            error: Some((err, desc)),
        }
    }
}

impl JsResult<(), OpenExternalErrorCode> for OpenExternalResult {
    fn result(self) -> Result<(), (OpenExternalErrorCode, Option<String>)> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(())
        }
    }
}

/// Identify a resource allocated on the JavaScript side and kept alive until
/// `jsFreeResource` is called with it.
pub type ResourceId = u32;

/// Identify a pending request.
pub type RequestId = u32;

/// Identify a pending timer.
pub type TimerId = f64;
