use serde_json::json;
use thiserror::Error;

use crate::bindings::{
    jsAbortRequest, jsClearTimer, jsFetch, jsGetRandom, jsPostForm, jsTimer, RequestId,
    RequestMethod, TimerId, TimerReason,
};
use crate::Logger;

/// Path prefix of every backend endpoint.
pub(crate) const API_BASE_URL: &str = "/api";

/// Initial delay before a failed list request is retried, in milliseconds.
const DEFAULT_BACKOFF_BASE: f64 = 300.;

/// Cap on the retry delay, in milliseconds.
const DEFAULT_BACKOFF_MAX: f64 = 3000.;

/// How many failures end retrying a list request for good.
const MAX_LIST_REQUEST_ATTEMPTS: u32 = 3;

/// Why a backend request failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ApiError {
    #[error("the request timed out")]
    Timeout,
    #[error("the backend answered with HTTP status {0}")]
    Status(u32),
    #[error("the backend could not be reached")]
    Unreachable,
    #[error("the response could not be parsed: {0}")]
    MalformedPayload(String),
}

impl ApiError {
    pub(crate) fn from_failure(has_timeouted: bool, status: Option<u32>) -> Self {
        if has_timeouted {
            ApiError::Timeout
        } else {
            match status {
                Some(status) => ApiError::Status(status),
                None => ApiError::Unreachable,
            }
        }
    }
}

/// How a video is handed to the analysis endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum UploadDescriptor {
    /// A file the user picked locally, transmitted as multipart form data.
    PickedFile { filename: String },
    /// A URL the backend should download the video from.
    RemoteUrl { url: String, url_type: String },
    /// A URL of a player page the video is embedded in.
    EmbeddedUrl { url: String },
}

/// The backend operation a pending request corresponds to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiRequestType {
    FileList,
    RecordList,
    RecordSummary { filename: String },
    Analyze { upload: UploadDescriptor },
    Delete { filename: String },
}

impl ApiRequestType {
    /// List fetches are safe to repeat; mutations are not retried so a slow
    /// backend cannot be asked to analyze or delete twice.
    fn is_retryable(&self) -> bool {
        matches!(self, ApiRequestType::FileList | ApiRequestType::RecordList)
    }
}

/// Metadata on a request that was sent and hasn't yet completed.
#[derive(Clone, Debug)]
pub(crate) struct ApiRequestInfo {
    pub(crate) request_id: RequestId,
    pub(crate) request_type: ApiRequestType,
    /// Amount of times the request failed so far.
    pub(crate) attempts_failed: u32,
    /// Set when the request failed and a retry timer is running for it.
    pub(crate) is_waiting_for_retry: bool,
}

/// What became of a failed request.
#[derive(Debug)]
pub(crate) enum RetryResult {
    /// A retry timer was started; a new attempt will follow.
    Retried,
    /// The request will not be re-attempted.
    Abandoned(ApiRequestInfo),
}

/// Delay before the `attempts_failed + 1`th attempt, exponentially grown and
/// fuzzed so simultaneous retries don't land together.
fn retry_delay(attempts_failed: u32, fuzz: f64) -> f64 {
    let unfuzzed =
        DEFAULT_BACKOFF_MAX.min(DEFAULT_BACKOFF_BASE * u32::pow(2, attempts_failed) as f64);
    let fuzzing_factor = fuzz * 0.4 + 0.8;
    unfuzzed * fuzzing_factor
}

/// Abstraction over the HTTP requests made to the backend.
///
/// Requests are actually performed on the other side of the WebAssembly
/// boundary. This struct keeps track of which ones are in flight, what they
/// were for, and schedules retries for failed list fetches.
pub(crate) struct Requester {
    pending_requests: Vec<ApiRequestInfo>,
    retry_timers: Vec<(TimerId, RequestId)>,
}

impl Requester {
    pub(crate) fn new() -> Self {
        Self {
            pending_requests: vec![],
            retry_timers: vec![],
        }
    }

    fn issue(&mut self, request_type: ApiRequestType, attempts_failed: u32) -> RequestId {
        let request_id = match &request_type {
            ApiRequestType::FileList => jsFetch(
                &format!("{}/get-file-urls", API_BASE_URL),
                RequestMethod::Get,
                None,
            ),
            ApiRequestType::RecordList => jsFetch(
                &format!("{}/get-video-data", API_BASE_URL),
                RequestMethod::Get,
                None,
            ),
            ApiRequestType::RecordSummary { filename } => jsFetch(
                &format!("{}/single-record", API_BASE_URL),
                RequestMethod::Post,
                Some(json!({ "filename": filename }).to_string()),
            ),
            ApiRequestType::Analyze { upload } => {
                let (fields, attach_picked_file) = match upload {
                    UploadDescriptor::PickedFile { .. } => (json!({}), true),
                    UploadDescriptor::RemoteUrl { url, url_type } => {
                        (json!({ "url": url, "url_type": url_type }), false)
                    }
                    UploadDescriptor::EmbeddedUrl { url } => {
                        (json!({ "embedded_url": url }), false)
                    }
                };
                jsPostForm(
                    &format!("{}/analyze-video", API_BASE_URL),
                    &fields.to_string(),
                    attach_picked_file,
                )
            }
            ApiRequestType::Delete { filename } => jsFetch(
                &format!("{}/delete-data", API_BASE_URL),
                RequestMethod::Post,
                Some(json!({ "filename": filename }).to_string()),
            ),
        };
        self.pending_requests.push(ApiRequestInfo {
            request_id,
            request_type,
            attempts_failed,
            is_waiting_for_retry: false,
        });
        request_id
    }

    pub(crate) fn fetch_file_list(&mut self) -> RequestId {
        self.issue(ApiRequestType::FileList, 0)
    }

    pub(crate) fn fetch_record_list(&mut self) -> RequestId {
        self.issue(ApiRequestType::RecordList, 0)
    }

    pub(crate) fn fetch_record_summary(&mut self, filename: String) -> RequestId {
        self.issue(ApiRequestType::RecordSummary { filename }, 0)
    }

    pub(crate) fn submit_analysis(&mut self, upload: UploadDescriptor) -> RequestId {
        self.issue(ApiRequestType::Analyze { upload }, 0)
    }

    pub(crate) fn delete_record(&mut self, filename: String) -> RequestId {
        self.issue(ApiRequestType::Delete { filename }, 0)
    }

    /// Abort all pending requests and cancel scheduled retries.
    pub(crate) fn reset(&mut self) {
        for info in self.pending_requests.drain(..) {
            if !info.is_waiting_for_retry {
                jsAbortRequest(info.request_id);
            }
        }
        for (timer_id, _) in self.retry_timers.drain(..) {
            jsClearTimer(timer_id);
        }
    }

    /// A request completed. Forget it and return what it was for.
    pub(crate) fn remove_pending(&mut self, request_id: RequestId) -> Option<ApiRequestInfo> {
        let pos = self
            .pending_requests
            .iter()
            .position(|info| info.request_id == request_id)?;
        Some(self.pending_requests.remove(pos))
    }

    /// A request failed. Schedules a retry for retryable requests that
    /// haven't exhausted their attempts, abandons the request otherwise.
    pub(crate) fn on_request_failed(&mut self, request_id: RequestId) -> RetryResult {
        let Some(pos) = self
            .pending_requests
            .iter()
            .position(|info| info.request_id == request_id)
        else {
            Logger::info(&format!(
                "Failure signaled for unknown request: {}",
                request_id
            ));
            return RetryResult::Retried;
        };
        let info = &mut self.pending_requests[pos];
        info.attempts_failed += 1;
        if !info.request_type.is_retryable() || info.attempts_failed >= MAX_LIST_REQUEST_ATTEMPTS {
            let info = self.pending_requests.remove(pos);
            return RetryResult::Abandoned(info);
        }
        info.is_waiting_for_retry = true;
        let delay = retry_delay(info.attempts_failed, jsGetRandom());
        Logger::warn(&format!(
            "List request failed, retrying in {} milliseconds",
            delay
        ));
        let timer_id = jsTimer(delay, TimerReason::RetryRequest);
        self.retry_timers.push((timer_id, request_id));
        RetryResult::Retried
    }

    /// A retry timer fired: re-issue the corresponding request.
    pub(crate) fn on_retry_timer(&mut self, timer_id: TimerId) {
        let Some(pos) = self.retry_timers.iter().position(|(id, _)| *id == timer_id) else {
            return;
        };
        let (_, request_id) = self.retry_timers.remove(pos);
        let Some(pos) = self
            .pending_requests
            .iter()
            .position(|info| info.request_id == request_id)
        else {
            return;
        };
        let info = self.pending_requests.remove(pos);
        self.issue(info.request_type, info.attempts_failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_growth_and_cap() {
        assert_eq!(retry_delay(0, 0.5), 300.);
        assert_eq!(retry_delay(1, 0.5), 600.);
        assert_eq!(retry_delay(2, 0.5), 1200.);
        assert_eq!(retry_delay(3, 0.5), 2400.);
        assert_eq!(retry_delay(4, 0.5), 3000.);
        assert_eq!(retry_delay(10, 0.5), 3000.);
    }

    #[test]
    fn test_retry_delay_fuzz_bounds() {
        assert_eq!(retry_delay(0, 0.), 240.);
        assert_eq!(retry_delay(0, 1.), 360.);
    }

    #[test]
    fn test_only_list_requests_are_retryable() {
        assert!(ApiRequestType::FileList.is_retryable());
        assert!(ApiRequestType::RecordList.is_retryable());
        assert!(!ApiRequestType::RecordSummary {
            filename: "v.mp4".to_string()
        }
        .is_retryable());
        assert!(!ApiRequestType::Analyze {
            upload: UploadDescriptor::PickedFile {
                filename: "v.mp4".to_string()
            }
        }
        .is_retryable());
        assert!(!ApiRequestType::Delete {
            filename: "v.mp4".to_string()
        }
        .is_retryable());
    }
}
