use chrono::{NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;

/// Accepted timestamp layouts, tried in order. The call platform sends
/// wall-clock time in its configured timezone, with or without a
/// trailing UTC designator it does not actually mean.
const TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%SZ",
];

/// The after-hours window in a fixed timezone.
///
/// Inbound timestamps are already expressed in that timezone, so
/// membership is a plain wall-clock hour comparison with no conversion.
#[derive(Debug, Clone)]
pub struct TimeWindow {
    start_hour: u32,
    end_hour: u32,
    tz: Tz,
}

impl TimeWindow {
    pub fn new(start_hour: u32, end_hour: u32, tz: Tz) -> Self {
        Self {
            start_hour,
            end_hour,
            tz,
        }
    }

    /// True if the timestamp falls inside the window. An unparsable or
    /// missing timestamp falls back to the current time in the window's
    /// timezone; evaluation never fails out to the caller.
    pub fn contains(&self, timestamp: Option<&str>) -> bool {
        let hour = match timestamp {
            Some(raw) => match parse_timestamp(raw) {
                Some(dt) => dt.hour(),
                None => {
                    tracing::warn!(
                        "Unrecognized timestamp '{}', falling back to current time",
                        raw
                    );
                    self.current_hour()
                }
            },
            None => self.current_hour(),
        };
        self.contains_hour(hour)
    }

    /// Wrap-around membership: 18/9 means 18:00 through 08:59 the next
    /// calendar day.
    pub fn contains_hour(&self, hour: u32) -> bool {
        hour >= self.start_hour || hour < self.end_hour
    }

    fn current_hour(&self) -> u32 {
        Utc::now().with_timezone(&self.tz).hour()
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_window() -> TimeWindow {
        TimeWindow::new(18, 9, chrono_tz::America::New_York)
    }

    #[test]
    fn test_evening_hours_inside_window() {
        let window = default_window();
        assert!(window.contains_hour(18));
        assert!(window.contains_hour(20));
        assert!(window.contains_hour(23));
    }

    #[test]
    fn test_early_morning_inside_window() {
        let window = default_window();
        assert!(window.contains_hour(0));
        assert!(window.contains_hour(5));
        assert!(window.contains_hour(8));
    }

    #[test]
    fn test_business_hours_outside_window() {
        let window = default_window();
        assert!(!window.contains_hour(9));
        assert!(!window.contains_hour(12));
        assert!(!window.contains_hour(17));
    }

    #[test]
    fn test_boundary_hours() {
        let window = default_window();
        // Start hour is inclusive, end hour is exclusive.
        assert!(window.contains_hour(18));
        assert!(!window.contains_hour(9));
        assert!(window.contains_hour(8));
        assert!(!window.contains_hour(17));
    }

    #[test]
    fn test_contains_with_iso_timestamp() {
        let window = default_window();
        assert!(window.contains(Some("2024-01-01T20:00:00")));
        assert!(!window.contains(Some("2024-01-01T12:00:00")));
    }

    #[test]
    fn test_contains_with_space_separated_timestamp() {
        let window = default_window();
        assert!(window.contains(Some("2024-01-01 23:30:00")));
        assert!(!window.contains(Some("2024-01-01 10:30:00")));
    }

    #[test]
    fn test_contains_with_zulu_suffix() {
        // The suffix is accepted but the time is still read as local
        // wall-clock, not converted from UTC.
        let window = default_window();
        assert!(window.contains(Some("2024-01-01T03:15:00Z")));
        assert!(!window.contains(Some("2024-01-01T14:15:00Z")));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-01-01T20:00:00").is_some());
        assert!(parse_timestamp("2024-01-01 20:00:00").is_some());
        assert!(parse_timestamp("2024-01-01T20:00:00Z").is_some());
        assert!(parse_timestamp("01/01/2024 8pm").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_misconfigured_window_matches_every_hour() {
        // With start <= end the wrap-around formula degrades to "always
        // inside"; Config::validate refuses such a window at startup.
        let window = TimeWindow::new(9, 18, chrono_tz::America::New_York);
        for hour in 0..24 {
            assert!(window.contains_hour(hour));
        }
    }
}
