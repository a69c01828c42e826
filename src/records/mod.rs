use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::requester::UploadDescriptor;

pub(crate) mod export;

/// One stored video file as listed by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct FileEntry {
    pub(crate) file_name: String,
    #[serde(default)]
    pub(crate) public_url: String,
}

/// Analysis summary text, which the backend returns either as a single
/// string or as a list of paragraphs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum SummaryText {
    One(String),
    Many(Vec<String>),
}

impl SummaryText {
    pub(crate) fn paragraphs(&self) -> Vec<String> {
        match self {
            SummaryText::One(text) => vec![text.clone()],
            SummaryText::Many(texts) => texts.clone(),
        }
    }
}

/// One video's full analysis record.
///
/// Every field besides the filename is optional: the backend fills them in
/// progressively and older records may predate some of the checks. Two
/// groups of fields carry legacy non-snake-case names on the wire.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AnalysisRecord {
    pub(crate) filename: String,
    pub(crate) car_type: Option<String>,
    pub(crate) service_related_video: Option<String>,
    pub(crate) sound_and_image: Option<String>,
    pub(crate) show_license_plate: Option<String>,
    pub(crate) car_on_ramp: Option<String>,
    pub(crate) service_advisor_or_technician_name: Option<String>,
    #[serde(rename = "DealershipName")]
    pub(crate) dealership_name: Option<String>,
    pub(crate) customer_name: Option<String>,
    pub(crate) special_tools_tyres: Option<String>,
    pub(crate) special_tools_brake_pad: Option<String>,
    #[serde(rename = "Special_tools_disc")]
    pub(crate) special_tools_disc: Option<String>,
    pub(crate) attached_offer_mentioned: Option<String>,
    pub(crate) correct_ending: Option<String>,
    pub(crate) show_license_plate_eval: Option<String>,
    pub(crate) car_on_ramp_eval: Option<String>,
    pub(crate) service_advisor_or_technician_name_eval: Option<String>,
    #[serde(rename = "DealershipName_eval")]
    pub(crate) dealership_name_eval: Option<String>,
    pub(crate) customer_name_eval: Option<String>,
    pub(crate) special_tools_tyres_eval: Option<String>,
    pub(crate) special_tools_brake_pad_eval: Option<String>,
    #[serde(rename = "Special_tools_disc_eval")]
    pub(crate) special_tools_disc_eval: Option<String>,
    pub(crate) attached_offer_mentioned_eval: Option<String>,
    pub(crate) approve_offer_mentioned_eval: Option<String>,
    pub(crate) correct_ending_eval: Option<String>,
    pub(crate) total_points_eval: Option<String>,
    pub(crate) percentage: Option<String>,
    pub(crate) battery_checked_eval: Option<String>,
    pub(crate) wind_screen_checked_eval: Option<String>,
    pub(crate) summary: Option<SummaryText>,
    pub(crate) video_url: Option<String>,
}

/// Envelope of the record-list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct RecordListResponse {
    #[serde(default)]
    pub(crate) data: Vec<AnalysisRecord>,
}

/// Envelope of the single-record endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct SingleRecordResponse {
    #[serde(default)]
    pub(crate) summary: Option<SummaryText>,
}

/// Parse a percentage score such as `"85%"` (or plain `"85"`).
pub(crate) fn parse_percentage(text: &str) -> Option<f64> {
    text.trim().trim_end_matches('%').trim().parse::<f64>().ok()
}

/// In-memory view of everything fetched from the backend: the stored files
/// and their analysis records.
#[derive(Debug, Default)]
pub(crate) struct RecordStore {
    files: Vec<FileEntry>,
    records: Vec<AnalysisRecord>,
}

impl RecordStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_files(&mut self, files: Vec<FileEntry>) {
        self.files = files;
    }

    pub(crate) fn set_records(&mut self, records: Vec<AnalysisRecord>) {
        self.records = records;
    }

    pub(crate) fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub(crate) fn records(&self) -> &[AnalysisRecord] {
        &self.records
    }

    pub(crate) fn file_for(&self, file_name: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.file_name == file_name)
    }

    pub(crate) fn record_for(&self, filename: &str) -> Option<&AnalysisRecord> {
        self.records.iter().find(|r| r.filename == filename)
    }

    /// Insert a record, replacing any previous record for the same filename.
    pub(crate) fn upsert_record(&mut self, record: AnalysisRecord) {
        self.records.retain(|r| r.filename != record.filename);
        self.records.push(record);
    }

    /// Forget a deleted file and its record.
    pub(crate) fn remove(&mut self, filename: &str) {
        self.files.retain(|f| f.file_name != filename);
        self.records.retain(|r| r.filename != filename);
    }

    /// Dashboard statistics: total files, analyzed count and the average of
    /// the scores that parse, `None` if no record has one.
    pub(crate) fn stats(&self) -> (u32, u32, Option<f64>) {
        let scores: Vec<f64> = self
            .records
            .iter()
            .filter_map(|r| r.percentage.as_deref().and_then(parse_percentage))
            .collect();
        let average = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };
        (self.files.len() as u32, self.records.len() as u32, average)
    }
}

/// What could be made of an analysis response: the filename the backend
/// settled on, the URL under which the video can be watched, the record to
/// display right away (if the response carried one) and the summary text to
/// show.
#[derive(Debug, PartialEq)]
pub(crate) struct AnalyzeOutcome {
    pub(crate) filename: String,
    pub(crate) public_url: String,
    pub(crate) record: Option<AnalysisRecord>,
    pub(crate) summary: Vec<String>,
}

fn response_filename(response: &Value, upload: &UploadDescriptor) -> String {
    if let Some(name) = response.get("filename").and_then(Value::as_str) {
        return name.to_string();
    }
    if let Some(name) = response
        .get(0)
        .and_then(|first| first.get("filename"))
        .and_then(Value::as_str)
    {
        return name.to_string();
    }
    match upload {
        UploadDescriptor::PickedFile { filename } => filename.clone(),
        UploadDescriptor::EmbeddedUrl { .. } => "output-1200k.mp4".to_string(),
        UploadDescriptor::RemoteUrl { url, url_type } => {
            if url_type == "youtube" {
                "youtube_video.mp4".to_string()
            } else {
                match url.rsplit('/').next() {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => "processed_video.mp4".to_string(),
                }
            }
        }
    }
}

/// Interpret the immediate response of the analysis endpoint.
///
/// The backend is not consistent about where it puts the record: it may sit
/// under an `analysis` key, under a `data` key, or the response itself may
/// be the record. When none of these shapes match, no record is produced and
/// a provisional summary is used until the next list refresh brings the real
/// one.
pub(crate) fn interpret_analyze_response(
    response: &Value,
    upload: &UploadDescriptor,
) -> AnalyzeOutcome {
    let filename = response_filename(response, upload);
    let public_url = response
        .get("video_url")
        .or_else(|| response.get("url"))
        .and_then(Value::as_str)
        .unwrap_or("#")
        .to_string();

    let looks_like_record = |v: &Value| {
        v.get("summary").is_some() || v.get("percentage").is_some() || v.get("car_type").is_some()
    };
    let analysis = if let Some(inner) = response.get("analysis") {
        Some(inner)
    } else if let Some(inner) = response.get("data") {
        Some(inner)
    } else if looks_like_record(response) {
        Some(response)
    } else {
        None
    };

    match analysis {
        Some(value) => {
            let mut record: AnalysisRecord =
                serde_json::from_value(value.clone()).unwrap_or_default();
            record.filename = filename.clone();
            let summary = match &record.summary {
                Some(text) => text.paragraphs(),
                None => {
                    vec!["Analysis completed. Detailed results are now available.".to_string()]
                }
            };
            AnalyzeOutcome {
                filename,
                public_url,
                record: Some(record),
                summary,
            }
        }
        None => AnalyzeOutcome {
            filename,
            public_url,
            record: None,
            summary: vec![
                "Video uploaded and processed successfully. Analysis results will appear shortly."
                    .to_string(),
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("85%"), Some(85.));
        assert_eq!(parse_percentage("85"), Some(85.));
        assert_eq!(parse_percentage(" 72.5% "), Some(72.5));
        assert_eq!(parse_percentage("N/A"), None);
        assert_eq!(parse_percentage(""), None);
    }

    #[test]
    fn test_record_deserialization_with_legacy_names() {
        let record: AnalysisRecord = serde_json::from_value(json!({
            "filename": "v1.mp4",
            "car_type": "Ford",
            "DealershipName": "Main Street Motors",
            "DealershipName_eval": "2",
            "Special_tools_disc": "Yes",
            "Special_tools_disc_eval": "1",
            "percentage": "85%",
            "summary": ["p1", "p2"]
        }))
        .unwrap();
        assert_eq!(record.filename, "v1.mp4");
        assert_eq!(record.dealership_name.as_deref(), Some("Main Street Motors"));
        assert_eq!(record.special_tools_disc.as_deref(), Some("Yes"));
        assert_eq!(record.special_tools_disc_eval.as_deref(), Some("1"));
        assert_eq!(
            record.summary,
            Some(SummaryText::Many(vec!["p1".to_string(), "p2".to_string()]))
        );
        assert_eq!(record.correct_ending, None);
    }

    #[test]
    fn test_summary_text_single_string() {
        let record: AnalysisRecord = serde_json::from_value(json!({
            "filename": "v1.mp4",
            "summary": "one paragraph"
        }))
        .unwrap();
        assert_eq!(
            record.summary.unwrap().paragraphs(),
            vec!["one paragraph".to_string()]
        );
    }

    #[test]
    fn test_store_upsert_replaces_by_filename() {
        let mut store = RecordStore::new();
        store.upsert_record(AnalysisRecord {
            filename: "a.mp4".to_string(),
            percentage: Some("50%".to_string()),
            ..Default::default()
        });
        store.upsert_record(AnalysisRecord {
            filename: "a.mp4".to_string(),
            percentage: Some("80%".to_string()),
            ..Default::default()
        });
        assert_eq!(store.records().len(), 1);
        assert_eq!(
            store.record_for("a.mp4").unwrap().percentage.as_deref(),
            Some("80%")
        );
    }

    #[test]
    fn test_store_remove() {
        let mut store = RecordStore::new();
        store.set_files(vec![FileEntry {
            file_name: "a.mp4".to_string(),
            public_url: "https://example.com/a.mp4".to_string(),
        }]);
        store.upsert_record(AnalysisRecord {
            filename: "a.mp4".to_string(),
            ..Default::default()
        });
        store.remove("a.mp4");
        assert!(store.files().is_empty());
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_stats() {
        let mut store = RecordStore::new();
        assert_eq!(store.stats(), (0, 0, None));
        store.set_files(vec![
            FileEntry {
                file_name: "a.mp4".to_string(),
                public_url: String::new(),
            },
            FileEntry {
                file_name: "b.mp4".to_string(),
                public_url: String::new(),
            },
            FileEntry {
                file_name: "c.mp4".to_string(),
                public_url: String::new(),
            },
        ]);
        store.set_records(vec![
            AnalysisRecord {
                filename: "a.mp4".to_string(),
                percentage: Some("60%".to_string()),
                ..Default::default()
            },
            AnalysisRecord {
                filename: "b.mp4".to_string(),
                percentage: Some("80%".to_string()),
                ..Default::default()
            },
        ]);
        assert_eq!(store.stats(), (3, 2, Some(70.)));
    }

    #[test]
    fn test_stats_skip_unparseable_scores() {
        let mut store = RecordStore::new();
        store.set_records(vec![
            AnalysisRecord {
                filename: "a.mp4".to_string(),
                percentage: Some("N/A".to_string()),
                ..Default::default()
            },
            AnalysisRecord {
                filename: "b.mp4".to_string(),
                percentage: Some("90%".to_string()),
                ..Default::default()
            },
        ]);
        assert_eq!(store.stats(), (0, 2, Some(90.)));
    }

    #[test]
    fn test_analyze_filename_from_response() {
        let upload = UploadDescriptor::PickedFile {
            filename: "picked.mp4".to_string(),
        };
        let outcome = interpret_analyze_response(&json!({ "filename": "real.mp4" }), &upload);
        assert_eq!(outcome.filename, "real.mp4");

        let outcome =
            interpret_analyze_response(&json!([{ "filename": "first.mp4" }]), &upload);
        assert_eq!(outcome.filename, "first.mp4");
    }

    #[test]
    fn test_analyze_filename_fallbacks() {
        let empty = json!({});

        let outcome = interpret_analyze_response(
            &empty,
            &UploadDescriptor::PickedFile {
                filename: "picked.mp4".to_string(),
            },
        );
        assert_eq!(outcome.filename, "picked.mp4");

        let outcome = interpret_analyze_response(
            &empty,
            &UploadDescriptor::EmbeddedUrl {
                url: "https://cdn.example.com/embed/55".to_string(),
            },
        );
        assert_eq!(outcome.filename, "output-1200k.mp4");

        let outcome = interpret_analyze_response(
            &empty,
            &UploadDescriptor::RemoteUrl {
                url: "https://example.com/videos/clip.mp4".to_string(),
                url_type: "direct".to_string(),
            },
        );
        assert_eq!(outcome.filename, "clip.mp4");

        let outcome = interpret_analyze_response(
            &empty,
            &UploadDescriptor::RemoteUrl {
                url: "https://youtube.com/watch?v=id".to_string(),
                url_type: "youtube".to_string(),
            },
        );
        assert_eq!(outcome.filename, "youtube_video.mp4");
    }

    #[test]
    fn test_analyze_record_under_analysis_key() {
        let upload = UploadDescriptor::PickedFile {
            filename: "v.mp4".to_string(),
        };
        let outcome = interpret_analyze_response(
            &json!({
                "filename": "v.mp4",
                "video_url": "https://example.com/v.mp4",
                "analysis": { "percentage": "85%", "summary": ["done"] }
            }),
            &upload,
        );
        assert_eq!(outcome.public_url, "https://example.com/v.mp4");
        let record = outcome.record.unwrap();
        assert_eq!(record.filename, "v.mp4");
        assert_eq!(record.percentage.as_deref(), Some("85%"));
        assert_eq!(outcome.summary, vec!["done".to_string()]);
    }

    #[test]
    fn test_analyze_record_is_whole_response() {
        let upload = UploadDescriptor::PickedFile {
            filename: "v.mp4".to_string(),
        };
        let outcome = interpret_analyze_response(
            &json!({ "car_type": "Ford", "percentage": "70%" }),
            &upload,
        );
        let record = outcome.record.unwrap();
        assert_eq!(record.car_type.as_deref(), Some("Ford"));
        assert_eq!(
            outcome.summary,
            vec!["Analysis completed. Detailed results are now available.".to_string()]
        );
    }

    #[test]
    fn test_analyze_without_record_uses_provisional_summary() {
        let upload = UploadDescriptor::PickedFile {
            filename: "v.mp4".to_string(),
        };
        let outcome = interpret_analyze_response(&json!({ "status": "queued" }), &upload);
        assert_eq!(outcome.record, None);
        assert_eq!(outcome.public_url, "#");
        assert_eq!(
            outcome.summary,
            vec![
                "Video uploaded and processed successfully. Analysis results will appear shortly."
                    .to_string()
            ]
        );
    }
}
