/// Format a position in seconds the way the player UI displays it, as
/// `minutes:seconds` with zero-padded seconds.
pub(crate) fn format_clock(position: f64) -> String {
    let position = if position.is_finite() && position > 0. {
        position
    } else {
        0.
    };
    let minutes = (position / 60.).floor() as u64;
    let seconds = (position % 60.).floor() as u64;
    format!("{}:{:02}", minutes, seconds)
}

/// Split a UNIX timestamp in milliseconds into the `YYYY-MM-DD` and
/// `HH-MM-SS` strings used to stamp exported spreadsheet filenames.
pub(crate) fn split_timestamp(timestamp_ms: f64) -> (String, String) {
    let total_seconds = if timestamp_ms.is_finite() && timestamp_ms > 0. {
        (timestamp_ms / 1000.).floor() as i64
    } else {
        0
    };
    let days = total_seconds.div_euclid(86_400);
    let secs_of_day = total_seconds.rem_euclid(86_400);
    let (year, month, day) = civil_from_days(days);
    let date = format!("{:04}-{:02}-{:02}", year, month, day);
    let time = format!(
        "{:02}-{:02}-{:02}",
        secs_of_day / 3600,
        (secs_of_day % 3600) / 60,
        secs_of_day % 60
    );
    (date, time)
}

/// Gregorian calendar date for a number of days since the UNIX epoch.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let year = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    (if month <= 2 { year + 1 } else { year }, month, day)
}
