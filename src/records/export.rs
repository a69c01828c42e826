use crate::records::AnalysisRecord;
use crate::utils::time::split_timestamp;

pub(crate) const EXPORT_SHEET_NAME: &str = "Video Analysis Data";

/// One spreadsheet column: header text and width in characters.
pub(crate) struct ExportColumn {
    pub(crate) header: &'static str,
    pub(crate) width: u32,
}

/// Spreadsheet layout, in the order analysts expect: identification fields,
/// then per-check observations, then per-check scores, then totals.
pub(crate) const EXPORT_COLUMNS: [ExportColumn; 31] = [
    ExportColumn { header: "Filename", width: 30 },
    ExportColumn { header: "Car Type", width: 15 },
    ExportColumn { header: "Service Related Video", width: 20 },
    ExportColumn { header: "Sound & Image", width: 15 },
    ExportColumn { header: "License Plate Visible", width: 20 },
    ExportColumn { header: "Car on Ramp", width: 15 },
    ExportColumn { header: "Technician/Advisor Name", width: 25 },
    ExportColumn { header: "Dealership Name", width: 20 },
    ExportColumn { header: "Customer Name", width: 20 },
    ExportColumn { header: "Special Tools - Tyres", width: 20 },
    ExportColumn { header: "Special Tools - Brake Pad", width: 25 },
    ExportColumn { header: "Special Tools - Disc", width: 20 },
    ExportColumn { header: "Offer Mentioned", width: 18 },
    ExportColumn { header: "Correct Ending", width: 15 },
    ExportColumn { header: "License Plate Score", width: 18 },
    ExportColumn { header: "Car on Ramp Score", width: 18 },
    ExportColumn { header: "Technician Name Score", width: 20 },
    ExportColumn { header: "Dealership Score", width: 18 },
    ExportColumn { header: "Customer Name Score", width: 20 },
    ExportColumn { header: "Tyre Tools Score", width: 18 },
    ExportColumn { header: "Brake Pad Tools Score", width: 22 },
    ExportColumn { header: "Disc Tools Score", width: 18 },
    ExportColumn { header: "Offer Mentioned Score", width: 22 },
    ExportColumn { header: "Approve Offer Score", width: 20 },
    ExportColumn { header: "Correct Ending Score", width: 20 },
    ExportColumn { header: "Total Points", width: 15 },
    ExportColumn { header: "Percentage", width: 12 },
    ExportColumn { header: "Battery Check", width: 15 },
    ExportColumn { header: "Windscreen Check", width: 18 },
    ExportColumn { header: "Summary", width: 50 },
    ExportColumn { header: "Video URL", width: 40 },
];

fn cell(field: &Option<String>) -> String {
    field.clone().unwrap_or_default()
}

/// Flatten a record into one spreadsheet row, one cell per entry of
/// `EXPORT_COLUMNS`, missing fields rendered as empty cells.
pub(crate) fn export_row(record: &AnalysisRecord) -> Vec<String> {
    vec![
        record.filename.clone(),
        cell(&record.car_type),
        cell(&record.service_related_video),
        cell(&record.sound_and_image),
        cell(&record.show_license_plate),
        cell(&record.car_on_ramp),
        cell(&record.service_advisor_or_technician_name),
        cell(&record.dealership_name),
        cell(&record.customer_name),
        cell(&record.special_tools_tyres),
        cell(&record.special_tools_brake_pad),
        cell(&record.special_tools_disc),
        cell(&record.attached_offer_mentioned),
        cell(&record.correct_ending),
        cell(&record.show_license_plate_eval),
        cell(&record.car_on_ramp_eval),
        cell(&record.service_advisor_or_technician_name_eval),
        cell(&record.dealership_name_eval),
        cell(&record.customer_name_eval),
        cell(&record.special_tools_tyres_eval),
        cell(&record.special_tools_brake_pad_eval),
        cell(&record.special_tools_disc_eval),
        cell(&record.attached_offer_mentioned_eval),
        cell(&record.approve_offer_mentioned_eval),
        cell(&record.correct_ending_eval),
        cell(&record.total_points_eval),
        cell(&record.percentage),
        cell(&record.battery_checked_eval),
        cell(&record.wind_screen_checked_eval),
        record
            .summary
            .as_ref()
            .map(|s| s.paragraphs().join(" "))
            .unwrap_or_default(),
        cell(&record.video_url),
    ]
}

pub(crate) fn export_rows(records: &[AnalysisRecord]) -> Vec<Vec<String>> {
    records.iter().map(export_row).collect()
}

/// Export file name stamped with the current date and time, e.g.
/// `Service_Video_Analysis_2024-02-29_13-30-45.xlsx`.
pub(crate) fn export_filename(now_ms: f64) -> String {
    let (date, time) = split_timestamp(now_ms);
    format!("Service_Video_Analysis_{}_{}.xlsx", date, time)
}
