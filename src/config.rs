use crate::errors::ConfigError;
use crate::models::Annotation;
use crate::period::parse_day;
use chrono::NaiveDate;
use std::{env, time::Duration};

pub const REFRESH_INTERVAL: Duration = Duration::from_millis(5000);
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);
pub const MOBILE_BREAKPOINT: u32 = 600;
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 800;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_UPSTREAM_URL: &str = "http://127.0.0.1:3000";
pub const DISPLAY_START: &str = "2025-09-07";
pub const DISPLAY_END: &str = "2026-01-31";

/// Message totals were not recorded before this day.
pub const TREND_START: &str = "2025-09-13";

pub const ANNOTATIONS: &[Annotation] = &[
    Annotation {
        date: "2025-09-29",
        label: "Sonnet 4.5",
        is_final: false,
    },
    Annotation {
        date: "2025-11-24",
        label: "Opus 4.5",
        is_final: false,
    },
    Annotation {
        date: "2026-01-31",
        label: "THE END",
        is_final: true,
    },
];

/// Inclusive range of days shown on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DisplayWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvertedWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream_url: String,
    pub window: DisplayWindow,
    pub trend_start: NaiveDate,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => value.parse::<u16>().map_err(|_| ConfigError::Port {
                name: "PORT",
                value,
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let upstream_url = env::var("UPSTREAM_URL")
            .unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let start = env_day("DISPLAY_START", DISPLAY_START)?;
        let end = env_day("DISPLAY_END", DISPLAY_END)?;

        Ok(Self {
            port,
            upstream_url,
            window: DisplayWindow::new(start, end)?,
            trend_start: day_or_err("TREND_START", TREND_START.to_string())?,
        })
    }
}

fn env_day(name: &'static str, default: &str) -> Result<NaiveDate, ConfigError> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());
    day_or_err(name, value)
}

fn day_or_err(name: &'static str, value: String) -> Result<NaiveDate, ConfigError> {
    parse_day(value.trim()).ok_or(ConfigError::Date { name, value })
}
