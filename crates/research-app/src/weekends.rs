//! Weekend highlight bands for a visible time window

use chrono::{Datelike, Duration, NaiveTime};
use research_charts::TimeWindow;
use research_core::HighlightRange;

pub const WEEKEND_COLOR: &str = "#f5f5f5";
pub const WEEKEND_OPACITY: f64 = 0.4;

const WEEK_MS: i64 = 7 * 86_400_000;
const WEEKEND_MS: i64 = 2 * 86_400_000;

/// One band per weekend (Saturday 00:00 to Sunday 23:59:59.999 UTC) that
/// overlaps `window`, clipped to the window's ends.
pub fn weekend_ranges(window: TimeWindow) -> Vec<HighlightRange> {
    let Some(start) = window.start_time() else {
        return Vec::new();
    };

    // Saturday on or before the window start
    let days_since_saturday = (start.weekday().num_days_from_monday() + 2) % 7;
    let saturday = start.date_naive() - Duration::days(i64::from(days_since_saturday));
    let mut weekend_start = saturday.and_time(NaiveTime::MIN).and_utc().timestamp_millis();

    let mut ranges = Vec::new();
    while weekend_start <= window.end {
        let weekend_end = weekend_start + WEEKEND_MS - 1;
        let (from, to) = (weekend_start.max(window.start), weekend_end.min(window.end));
        if from <= to {
            ranges.push(
                HighlightRange::new(from, to)
                    .color(WEEKEND_COLOR)
                    .opacity(WEEKEND_OPACITY),
            );
        }
        weekend_start += WEEK_MS;
    }
    ranges
}
