//! Human readable durations for pool schedule fields.

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;
const MONTH: u64 = 4 * WEEK;
const YEAR: u64 = 52 * WEEK;

/// Format a second count as `1Y 2M 3w 4d 5h 6m 7s`.
///
/// Calendar-ish units (years of 52 weeks, months of 4 weeks, weeks, days)
/// only appear when non-zero; hours, minutes and seconds are always shown.
pub fn seconds_to_duration(total_seconds: u64) -> String {
    let optional = [
        (total_seconds / YEAR, "Y"),
        ((total_seconds % YEAR) / MONTH, "M"),
        ((total_seconds % MONTH) / WEEK, "w"),
        ((total_seconds % WEEK) / DAY, "d"),
    ];
    let always = [
        ((total_seconds % DAY) / HOUR, "h"),
        ((total_seconds % HOUR) / MINUTE, "m"),
        (total_seconds % MINUTE, "s"),
    ];

    optional
        .iter()
        .filter(|(value, _)| *value > 0)
        .chain(always.iter())
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect::<Vec<_>>()
        .join(" ")
}
