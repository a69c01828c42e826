use crate::{
    auth::{check_credentials, UserRole, INVALID_CREDENTIALS_MESSAGE},
    bindings::{
        jsAlert, jsAnnounceAuthChange, jsClearStoredUser, jsOpenExternal, jsPromptManualCopy,
        jsReadStoredUser, jsStoreUser, JsResult,
    },
    media_element::MediaElementReference,
    records::RecordStore,
    requester::{Requester, UploadDescriptor},
    session::{PlaybackPhase, PlaybackSession},
    wasm_bindgen, Logger,
};

use super::Dispatcher;

/// Methods exposed to the JavaScript-side.
///
/// Note that these are not the only methods callable by JavaScript. There's
/// also "event_listeners" which as its name point at, should be called when
/// particular events happen. Such "event_listeners" are defined in their own
/// file.
#[wasm_bindgen]
impl Dispatcher {
    /// Create a new `Dispatcher`, restoring a previously stored login if
    /// there is one.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let user = jsReadStoredUser().and_then(|label| UserRole::from_label(&label));
        Dispatcher {
            session: PlaybackSession::new(),
            media_element_ref: MediaElementReference::new(),
            requester: Requester::new(),
            records: RecordStore::new(),
            user,
            selected_file: None,
        }
    }

    /// Start playing a new video reference in the viewer. `filename` is the
    /// stored file the reference belongs to, when it is known, so the right
    /// analysis record can be shown alongside.
    pub fn open_video(&mut self, reference: String, filename: Option<String>) {
        Logger::info(&format!("open_video called: {}", reference));
        self.selected_file = filename;
        self.start_load_of(&reference);
    }

    /// Close the viewer and detach the current source.
    pub fn close_video(&mut self) {
        Logger::info("close_video called");
        self.session.close();
        self.media_element_ref.reset();
        self.announce_phase();
        self.announce_volume();
    }

    pub fn toggle_play(&mut self) {
        if self.session.is_playing() {
            self.media_element_ref.pause();
        } else {
            self.media_element_ref.play(self.session.generation());
        }
    }

    pub fn seek(&mut self, position: f64) {
        if let Some(clamped) = self.session.request_seek(position) {
            self.media_element_ref.seek(clamped);
        }
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.session.set_volume(volume);
        self.media_element_ref.set_volume(self.session.volume());
        self.media_element_ref.set_muted(self.session.is_muted());
        self.announce_volume();
    }

    pub fn toggle_mute(&mut self) {
        let muted = self.session.toggle_mute();
        self.media_element_ref.set_muted(muted);
        self.announce_volume();
    }

    /// Seek back to the start and play. Play refusals are reported as a
    /// warning, not a playback failure.
    pub fn restart(&mut self) {
        self.seek(0.);
        self.media_element_ref.play(self.session.generation());
    }

    /// Re-attempt the current source after a playback failure.
    pub fn retry(&mut self) {
        if let Some(url) = self.session.retry() {
            let url = url.clone();
            let generation = self.session.generation();
            self.attach_candidate(generation, &url);
        }
    }

    /// Fall back to the next candidate URL after a playback failure.
    pub fn next_source(&mut self) {
        if let Some(url) = self.session.advance() {
            let url = url.clone();
            let generation = self.session.generation();
            self.attach_candidate(generation, &url);
        }
    }

    pub fn toggle_fullscreen(&mut self) {
        self.media_element_ref.toggle_fullscreen();
    }

    /// Open the current video in a new browser tab, trying each candidate
    /// URL in turn. If every attempt is blocked the first URL is offered for
    /// manual copying instead.
    pub fn open_externally(&mut self) {
        let urls = self.session.candidate_urls();
        if urls.is_empty() {
            jsAlert("No valid video URL available");
            return;
        }
        for url in urls.iter() {
            if jsOpenExternal(url).result().is_ok() {
                return;
            }
            Logger::debug(&format!("Could not open externally: {}", url));
        }
        jsPromptManualCopy(&urls[0]);
    }

    /// Re-fetch the file list and the analysis records from the backend.
    pub fn refresh(&mut self) {
        self.refresh_lists();
    }

    /// Show the given stored file in the viewer and fetch its summary.
    pub fn select_file(&mut self, file_name: String) {
        let Some(entry) = self.records.file_for(&file_name) else {
            Logger::warn(&format!("Cannot select unknown file: {}", file_name));
            return;
        };
        let reference = entry.public_url.clone();
        self.selected_file = Some(file_name.clone());
        self.start_load_of(&reference);
        self.requester.fetch_record_summary(file_name);
    }

    /// Send the file the user picked on the page to the analysis endpoint.
    pub fn upload_picked_file(&mut self, filename: String) {
        self.requester
            .submit_analysis(UploadDescriptor::PickedFile { filename });
    }

    /// Ask the backend to download and analyze the video at `url`.
    pub fn upload_from_url(&mut self, url: String, url_type: String) {
        self.requester
            .submit_analysis(UploadDescriptor::RemoteUrl { url, url_type });
    }

    /// Ask the backend to extract and analyze the video embedded at `url`.
    pub fn upload_embedded(&mut self, url: String) {
        self.requester
            .submit_analysis(UploadDescriptor::EmbeddedUrl { url });
    }

    /// Delete a stored file and its analysis record.
    pub fn delete_record(&mut self, filename: String) {
        self.requester.delete_record(filename);
    }

    /// Export every analysis record to a spreadsheet file.
    pub fn export_spreadsheet(&mut self) {
        self.write_spreadsheet();
    }

    /// Attempt to log in. Returns an error message on bad credentials,
    /// nothing on success.
    pub fn log_in(&mut self, username: String, password: String) -> Option<String> {
        match check_credentials(&username, &password) {
            Some(role) => {
                self.user = Some(role);
                jsStoreUser(role.label());
                jsAnnounceAuthChange(Some(role.label()));
                self.refresh_lists();
                None
            }
            None => Some(INVALID_CREDENTIALS_MESSAGE.to_string()),
        }
    }

    /// Log out, closing the viewer and dropping pending requests.
    pub fn log_out(&mut self) {
        self.user = None;
        self.selected_file = None;
        self.requester.reset();
        self.session.close();
        self.media_element_ref.reset();
        jsClearStoredUser();
        jsAnnounceAuthChange(None);
        self.announce_phase();
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// `true` while a playback failure is on display and the viewer offers
    /// recovery actions.
    pub fn is_in_error(&self) -> bool {
        matches!(self.session.phase(), PlaybackPhase::Error(_))
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
