use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Bucket size used when aggregating daily records for the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Week,
    BiWeek,
}

impl Granularity {
    pub fn key(self, day: NaiveDate) -> String {
        match self {
            Granularity::Week => week_key(day),
            Granularity::BiWeek => bi_week_key(day),
        }
    }

    pub fn start(self, day: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Week => week_start(day),
            Granularity::BiWeek => bi_week_start(day),
        }
    }
}

pub fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DAY_FORMAT).ok()
}

/// ISO-8601 week label, e.g. `2025-W01`. The year is the ISO week-numbering
/// year, which differs from the calendar year around New Year.
pub fn week_key(day: NaiveDate) -> String {
    let iso = day.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

/// Pairs ISO weeks (1+2, 3+4, ...) within an ISO year. Week 53 has no partner,
/// so it forms a one-week bucket at the end of long years.
pub fn bi_week_key(day: NaiveDate) -> String {
    let iso = day.iso_week();
    format!("{}-B{:02}", iso.year(), bi_week_index(iso.week()))
}

pub fn bi_week_start(day: NaiveDate) -> NaiveDate {
    let iso = day.iso_week();
    let first_week = bi_week_index(iso.week()) * 2 + 1;
    NaiveDate::from_isoywd_opt(iso.year(), first_week, Weekday::Mon)
        .unwrap_or_else(|| week_start(day))
}

fn bi_week_index(week: u32) -> u32 {
    (week - 1) / 2
}

/// Axis label for a period start: `Sep 8` on desktop, `9/8` on mobile.
pub fn day_label(day: NaiveDate, compact: bool) -> String {
    if compact {
        day.format("%-m/%-d").to_string()
    } else {
        day.format("%b %-d").to_string()
    }
}
