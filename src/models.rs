use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One day of counts as reported by the upstream counter API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub day: NaiveDate,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub count: u64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub right_count: u64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub total_messages: u64,
}

impl DailyRecord {
    pub fn from_totals(day: NaiveDate, totals: &Totals) -> Self {
        Self {
            day,
            count: totals.count,
            right_count: totals.right_count,
            total_messages: totals.total_messages,
        }
    }
}

/// Counter totals, as served by `/api/today` and as summed for the current week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Totals {
    #[serde(default, deserialize_with = "zero_if_null")]
    pub count: u64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub right_count: u64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub total_messages: u64,
}

impl Totals {
    pub fn add(&mut self, record: &DailyRecord) {
        self.count = self.count.saturating_add(record.count);
        self.right_count = self.right_count.saturating_add(record.right_count);
        self.total_messages = self.total_messages.saturating_add(record.total_messages);
    }
}

/// A week or bi-week bucket of daily records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodRecord {
    pub period_key: String,
    pub period_start: NaiveDate,
    pub count: u64,
    pub right_count: u64,
    pub total_messages: u64,
    pub constituent_days: Vec<NaiveDate>,
}

impl PeriodRecord {
    pub fn empty(period_key: String, period_start: NaiveDate) -> Self {
        Self {
            period_key,
            period_start,
            count: 0,
            right_count: 0,
            total_messages: 0,
            constituent_days: Vec::new(),
        }
    }

    pub fn absorb(&mut self, record: &DailyRecord) {
        self.count = self.count.saturating_add(record.count);
        self.right_count = self.right_count.saturating_add(record.right_count);
        self.total_messages = self.total_messages.saturating_add(record.total_messages);
        self.constituent_days.push(record.day);
    }

    pub fn stacked_total(&self) -> u64 {
        self.count.saturating_add(self.right_count)
    }

    /// Last calendar day that contributed to this period.
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.constituent_days.iter().max().copied()
    }
}

/// A release marker drawn over the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotation {
    pub date: &'static str,
    pub label: &'static str,
    pub is_final: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct CounterQuery {
    #[serde(default)]
    pub animate: bool,
    #[serde(default)]
    pub highlight: bool,
}

/// What one viewer is looking at: their viewport width and whether they have
/// the trend line switched on.
#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    pub width: Option<u32>,
    pub trend: Option<bool>,
}

fn zero_if_null<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
}
