use serde_json::Value;

use crate::{
    bindings::{
        jsAlert, jsAnnounceAnalysisComplete, jsAnnounceFileList, jsAnnouncePhaseChange,
        jsAnnouncePlayingChange, jsAnnounceRecordList, jsAnnounceRecordSummary,
        jsAnnounceSourceChange, jsAnnounceStats, jsAnnounceTimeUpdate, jsAnnounceVolumeChange,
        jsNow, jsSendPlaybackError, jsSendPlaybackWarning, jsWriteSpreadsheet, PlaybackPhaseCode,
    },
    records::export::{export_filename, export_rows, EXPORT_COLUMNS, EXPORT_SHEET_NAME},
    records::{
        interpret_analyze_response, FileEntry, RecordListResponse, SingleRecordResponse,
    },
    requester::{ApiError, ApiRequestInfo, ApiRequestType},
    session::{PlaybackError, PlaybackPhase},
    utils::time::format_clock,
    utils::url::Url,
    Logger,
};

use super::{Dispatcher, JsMemoryBlob, MediaObservation, PlaybackTickReason};

/// Message surfaced when the browser refuses the programmatic play call,
/// most often because no user gesture preceded it.
const PLAY_REJECTED_MESSAGE: &str =
    "Cannot play video. This may be due to browser security policies.";

impl Dispatcher {
    /// Resolve `reference` into its candidate URLs and begin loading the
    /// first one.
    pub(super) fn start_load_of(&mut self, reference: &str) {
        match self.session.open(reference) {
            Some(url) => {
                let url = url.clone();
                let generation = self.session.generation();
                self.attach_candidate(generation, &url);
            }
            None => {
                Logger::warn("No playable candidate could be derived");
                self.announce_phase();
                self.report_playback_error(&PlaybackError::SourceNotAccessible);
            }
        }
    }

    /// Attach a candidate URL to the media element and ask it to play.
    pub(super) fn attach_candidate(&mut self, generation: u32, url: &Url) {
        self.announce_phase();
        jsAnnounceSourceChange(url.get_ref(), self.session.current_candidate_index() as u32);
        if let Err(err) = self.media_element_ref.attach(generation, url) {
            Logger::error(&format!("Could not attach the source: {}", err));
            self.handle_media_failure(PlaybackError::Unknown);
            return;
        }
        self.media_element_ref.play(generation);
    }

    pub(super) fn handle_observation(&mut self, observation: MediaObservation) {
        match observation.reason() {
            PlaybackTickReason::LoadStarted => {
                Logger::debug("Media element started loading the source");
            }
            PlaybackTickReason::LoadedMetadata => {
                if let Some(position) = self.session.on_metadata(observation.duration()) {
                    self.media_element_ref.seek(position);
                }
            }
            PlaybackTickReason::LoadedData | PlaybackTickReason::CanPlay => {
                if self.session.on_data_ready(observation.duration()) {
                    self.announce_phase();
                }
            }
            PlaybackTickReason::TimeUpdate => {
                self.session.observe_time(observation.current_time());
                let current_time = self.session.current_time();
                let duration = self.session.duration().unwrap_or(0.);
                let formatted =
                    format!("{} / {}", format_clock(current_time), format_clock(duration));
                jsAnnounceTimeUpdate(current_time, duration, &formatted);
            }
            PlaybackTickReason::Play | PlaybackTickReason::Pause => {
                self.session.set_playing(!observation.paused());
                jsAnnouncePlayingChange(self.session.is_playing());
            }
            PlaybackTickReason::Ended => {
                if observation.ended() {
                    self.session.set_playing(false);
                    jsAnnouncePlayingChange(false);
                }
            }
        }
    }

    /// A fatal media failure was reported for the current source. The
    /// session moves to its error phase; recovery (retry, next candidate,
    /// external open) is left to explicit calls from the page.
    pub(super) fn handle_media_failure(&mut self, error: PlaybackError) {
        self.session.on_media_error(error.clone());
        self.announce_phase();
        self.report_playback_error(&error);
    }

    pub(super) fn handle_play_rejection(&mut self, reason: Option<String>) {
        if let Some(reason) = reason {
            Logger::info(&format!("Play call rejected: {}", reason));
        }
        self.session.set_playing(false);
        jsAnnouncePlayingChange(false);
        jsSendPlaybackWarning(PLAY_REJECTED_MESSAGE);
    }

    fn report_playback_error(&self, error: &PlaybackError) {
        let attempted = serde_json::to_string(&self.session.candidate_urls())
            .unwrap_or_else(|_| "[]".to_string());
        jsSendPlaybackError(error.code(), &error.to_string(), &attempted);
    }

    pub(super) fn announce_phase(&self) {
        let code = match self.session.phase() {
            PlaybackPhase::Idle => PlaybackPhaseCode::Idle,
            PlaybackPhase::Loading => PlaybackPhaseCode::Loading,
            PlaybackPhase::Ready => PlaybackPhaseCode::Ready,
            PlaybackPhase::Error(_) => PlaybackPhaseCode::Error,
            PlaybackPhase::Closed => PlaybackPhaseCode::Closed,
        };
        jsAnnouncePhaseChange(code);
    }

    pub(super) fn announce_volume(&self) {
        jsAnnounceVolumeChange(self.session.volume(), self.session.is_muted());
    }

    fn announce_stats(&self) {
        let (total_files, analyzed, average) = self.records.stats();
        jsAnnounceStats(total_files, analyzed, average);
    }

    fn announce_file_list(&self) {
        if let Ok(json) = serde_json::to_string(self.records.files()) {
            jsAnnounceFileList(&json);
        }
    }

    fn announce_record_list(&self) {
        if let Ok(json) = serde_json::to_string(self.records.records()) {
            jsAnnounceRecordList(&json);
        }
    }

    pub(super) fn refresh_lists(&mut self) {
        self.requester.fetch_file_list();
        self.requester.fetch_record_list();
    }

    pub(super) fn write_spreadsheet(&mut self) {
        if self.records.records().is_empty() {
            jsAlert("No data available to export");
            return;
        }
        let columns = EXPORT_COLUMNS
            .iter()
            .map(|c| serde_json::json!({ "header": c.header, "width": c.width }))
            .collect::<Vec<Value>>();
        let rows = export_rows(self.records.records());
        let (Ok(columns_json), Ok(rows_json)) = (
            serde_json::to_string(&columns),
            serde_json::to_string(&rows),
        ) else {
            Logger::error("Could not serialize the export table");
            return;
        };
        let filename = export_filename(jsNow());
        jsWriteSpreadsheet(&filename, EXPORT_SHEET_NAME, &columns_json, &rows_json);
    }

    /// A backend request completed. Route its response body based on what
    /// the request was for.
    pub(super) fn handle_request_success(&mut self, info: ApiRequestInfo, blob: JsMemoryBlob) {
        let Some(data) = blob.data() else {
            Logger::error("A request's response body could not be read back");
            return;
        };
        match info.request_type {
            ApiRequestType::FileList => match serde_json::from_slice::<Vec<FileEntry>>(&data) {
                Ok(files) => {
                    self.records.set_files(files);
                    self.announce_file_list();
                    self.announce_stats();
                }
                Err(err) => Logger::error(&format!(
                    "File list: {}",
                    ApiError::MalformedPayload(err.to_string())
                )),
            },
            ApiRequestType::RecordList => {
                match serde_json::from_slice::<RecordListResponse>(&data) {
                    Ok(response) => {
                        self.records.set_records(response.data);
                        self.announce_record_list();
                        self.announce_stats();
                    }
                    Err(err) => Logger::error(&format!(
                        "Record list: {}",
                        ApiError::MalformedPayload(err.to_string())
                    )),
                }
            }
            ApiRequestType::RecordSummary { filename } => {
                match serde_json::from_slice::<SingleRecordResponse>(&data) {
                    Ok(response) => {
                        let paragraphs = response
                            .summary
                            .map(|s| s.paragraphs())
                            .unwrap_or_default();
                        if let Ok(json) = serde_json::to_string(&paragraphs) {
                            jsAnnounceRecordSummary(&filename, &json);
                        }
                    }
                    Err(err) => Logger::error(&format!(
                        "Summary of {}: {}",
                        filename,
                        ApiError::MalformedPayload(err.to_string())
                    )),
                }
            }
            ApiRequestType::Analyze { upload } => {
                let response: Value = serde_json::from_slice(&data).unwrap_or(Value::Null);
                let outcome = interpret_analyze_response(&response, &upload);
                self.selected_file = Some(outcome.filename.clone());
                let record_json = outcome
                    .record
                    .as_ref()
                    .and_then(|record| serde_json::to_string(record).ok());
                if let Some(record) = outcome.record {
                    self.records.upsert_record(record);
                    self.announce_record_list();
                    self.announce_stats();
                }
                if let Ok(summary_json) = serde_json::to_string(&outcome.summary) {
                    jsAnnounceRecordSummary(&outcome.filename, &summary_json);
                }
                jsAnnounceAnalysisComplete(&outcome.filename, record_json);
                self.refresh_lists();
            }
            ApiRequestType::Delete { filename } => {
                self.records.remove(&filename);
                if self.selected_file.as_deref() == Some(&filename) {
                    self.selected_file = None;
                }
                self.announce_file_list();
                self.announce_record_list();
                self.announce_stats();
            }
        }
    }

    /// A request failed for good. List fetches fail silently so the page
    /// keeps showing the last known data; mutations surface an alert since
    /// the user explicitly asked for them. Local state is never touched on
    /// failure.
    pub(super) fn handle_request_abandoned(&mut self, info: ApiRequestInfo, error: ApiError) {
        match info.request_type {
            ApiRequestType::FileList | ApiRequestType::RecordList => {
                Logger::error(&format!("Could not refresh the backend lists: {}", error));
            }
            ApiRequestType::RecordSummary { filename } => {
                Logger::error(&format!(
                    "Could not fetch the summary of {}: {}",
                    filename, error
                ));
            }
            ApiRequestType::Analyze { .. } => {
                jsAlert(&format!("Upload failed: {}", error));
            }
            ApiRequestType::Delete { filename } => {
                Logger::error(&format!("Could not delete {}: {}", filename, error));
            }
        }
    }
}
