use crate::models::{DailyRecord, PeriodRecord};
use crate::period::Granularity;
use std::collections::HashMap;

/// Group daily records into periods, summing every metric. Input order does not
/// matter; the output is sorted by period start.
pub fn aggregate(records: &[DailyRecord], granularity: Granularity) -> Vec<PeriodRecord> {
    let mut buckets: HashMap<String, PeriodRecord> = HashMap::new();

    for record in records {
        let key = granularity.key(record.day);
        let period = buckets
            .entry(key)
            .or_insert_with_key(|key| PeriodRecord::empty(key.clone(), granularity.start(record.day)));
        period.absorb(record);
    }

    let mut periods: Vec<PeriodRecord> = buckets.into_values().collect();
    periods.sort_by(|a, b| {
        a.period_start
            .cmp(&b.period_start)
            .then_with(|| a.period_key.cmp(&b.period_key))
    });
    periods
}

pub fn aggregate_by_week(records: &[DailyRecord]) -> Vec<PeriodRecord> {
    aggregate(records, Granularity::Week)
}

pub fn aggregate_by_bi_week(records: &[DailyRecord]) -> Vec<PeriodRecord> {
    aggregate(records, Granularity::BiWeek)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::parse_day;
    use chrono::{Duration, NaiveDate};

    fn record(day: &str, count: u64, right_count: u64, total_messages: u64) -> DailyRecord {
        DailyRecord {
            day: parse_day(day).expect("valid day"),
            count,
            right_count,
            total_messages,
        }
    }

    fn sample() -> Vec<DailyRecord> {
        let first = NaiveDate::from_ymd_opt(2025, 12, 20).unwrap();
        (0..30)
            .rev()
            .map(|offset| DailyRecord {
                day: first + Duration::days(offset),
                count: (offset as u64 * 7) % 5,
                right_count: offset as u64 % 3,
                total_messages: offset as u64 * 11,
            })
            .collect()
    }

    #[test]
    fn same_iso_week_collapses_into_one_period() {
        let periods = aggregate_by_week(&[
            record("2025-09-08", 3, 1, 10),
            record("2025-09-14", 2, 0, 5),
        ]);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].period_key, "2025-W37");
        assert_eq!(periods[0].period_start, parse_day("2025-09-08").unwrap());
        assert_eq!(periods[0].count, 5);
        assert_eq!(periods[0].right_count, 1);
        assert_eq!(periods[0].total_messages, 15);
    }

    #[test]
    fn sunday_and_monday_land_in_different_weeks() {
        let periods = aggregate_by_week(&[record("2025-09-07", 3, 0, 0), record("2025-09-08", 2, 0, 0)]);
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].count, 3);
        assert_eq!(periods[1].count, 2);
    }

    #[test]
    fn aggregation_is_lossless() {
        let records = sample();
        for granularity in [Granularity::Week, Granularity::BiWeek] {
            let periods = aggregate(&records, granularity);
            let sum = |f: fn(&PeriodRecord) -> u64| periods.iter().map(f).sum::<u64>();
            assert_eq!(sum(|p| p.count), records.iter().map(|r| r.count).sum::<u64>());
            assert_eq!(
                sum(|p| p.right_count),
                records.iter().map(|r| r.right_count).sum::<u64>()
            );
            assert_eq!(
                sum(|p| p.total_messages),
                records.iter().map(|r| r.total_messages).sum::<u64>()
            );
        }
    }

    #[test]
    fn every_day_appears_in_exactly_one_period() {
        let records = sample();
        let periods = aggregate_by_bi_week(&records);
        for record in &records {
            let hits = periods
                .iter()
                .filter(|p| p.constituent_days.contains(&record.day))
                .count();
            assert_eq!(hits, 1, "{} should belong to one period", record.day);
        }
        let total_days: usize = periods.iter().map(|p| p.constituent_days.len()).sum();
        assert_eq!(total_days, records.len());
    }

    #[test]
    fn output_is_sorted_by_period_start() {
        let periods = aggregate_by_week(&sample());
        assert!(periods.windows(2).all(|w| w[0].period_start <= w[1].period_start));
        assert_eq!(periods.first().unwrap().period_key, "2025-W51");
    }

    #[test]
    fn zero_days_still_create_periods() {
        let periods = aggregate_by_week(&[record("2025-10-01", 0, 0, 0)]);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].constituent_days.len(), 1);
        assert_eq!(periods[0].count, 0);
    }

    #[test]
    fn empty_input_yields_no_periods() {
        assert!(aggregate_by_week(&[]).is_empty());
    }
}
