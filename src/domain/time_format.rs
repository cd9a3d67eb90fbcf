// Time axis label formatting
use chrono::{DateTime, Utc};

/// Tick and hover label format for the time axis, always rendered in UTC.
pub const AXIS_TIME_FORMAT: &str = "%d %b %y, %Hh";

pub fn format_axis_time(time_millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(time_millis) {
        Some(time) => time.format(AXIS_TIME_FORMAT).to_string(),
        None => time_millis.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_axis_time() {
        assert_eq!(format_axis_time(1704067200000), "01 Jan 24, 00h");
        assert_eq!(format_axis_time(1704240000000 + 13 * 3_600_000), "03 Jan 24, 13h");
    }

    #[test]
    fn test_out_of_range_falls_back_to_millis() {
        assert_eq!(format_axis_time(i64::MAX), i64::MAX.to_string());
    }
}
