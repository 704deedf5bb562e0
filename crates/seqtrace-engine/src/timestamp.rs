use chrono::{Datelike, Local, NaiveDateTime};

/// Parse a logcat timestamp (`MM-DD HH:MM:SS.mmm`).
///
/// The source format carries no year, so the current calendar year is
/// assumed. Logs spanning a year boundary therefore produce anomalous
/// (possibly negative) deltas, which callers must tolerate.
pub fn parse_log_timestamp(timestamp: &str) -> Option<NaiveDateTime> {
    parse_with_year(timestamp, Local::now().year())
}

fn parse_with_year(timestamp: &str, year: i32) -> Option<NaiveDateTime> {
    let dated = format!("{year}-{timestamp}");
    NaiveDateTime::parse_from_str(&dated, "%Y-%m-%d %H:%M:%S%.3f").ok()
}

/// Signed difference `later - earlier` in seconds, with millisecond
/// resolution. Negative when the timestamps are out of order.
pub fn delta_seconds(earlier: NaiveDateTime, later: NaiveDateTime) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 1000.0
}
