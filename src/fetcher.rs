use crate::config::DisplayWindow;
use crate::errors::FetchError;
use crate::models::{DailyRecord, Totals};
use crate::period::week_key;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Client for the upstream counter API (`/api/today`, `/api/history`).
#[derive(Debug, Clone)]
pub struct CounterClient {
    http: Client,
    base_url: String,
}

impl CounterClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_today(&self) -> Result<Totals, FetchError> {
        self.get_json("/api/today").await
    }

    /// Full upstream history, unfiltered and in upstream order.
    pub async fn fetch_all_history(&self) -> Result<Vec<DailyRecord>, FetchError> {
        self.get_json("/api/history").await
    }

    /// One `/api/history` read: the current week's totals plus the days inside
    /// `window`, sorted, with today's record synthesized when upstream has not
    /// written it yet. `known_today` saves the `/api/today` round trip.
    pub async fn fetch_history(
        &self,
        window: &DisplayWindow,
        today: NaiveDate,
        known_today: Option<Totals>,
    ) -> Result<HistoryUpdate, FetchError> {
        let all = self.fetch_all_history().await?;
        let this_week = this_week_totals(&all, today);
        let mut records = filter_window(all, window);

        if window.contains(today) && !has_day(&records, today) {
            let totals = match known_today {
                Some(totals) => totals,
                None => self.fetch_today().await?,
            };
            fill_today(&mut records, window, today, &totals);
            debug!(%today, "filled missing day from today's totals");
        }

        Ok(HistoryUpdate { records, this_week })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let endpoint = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| FetchError::Decode { endpoint, source })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryUpdate {
    pub records: Vec<DailyRecord>,
    pub this_week: Totals,
}

/// Keep the days inside `window`, ordered by day.
pub fn filter_window(records: Vec<DailyRecord>, window: &DisplayWindow) -> Vec<DailyRecord> {
    let mut kept: Vec<DailyRecord> = records
        .into_iter()
        .filter(|record| window.contains(record.day))
        .collect();
    kept.sort_by_key(|record| record.day);
    kept
}

/// Insert a record for `today` at its sorted position unless one exists or
/// today is outside the window. Returns whether a record was inserted.
pub fn fill_today(
    history: &mut Vec<DailyRecord>,
    window: &DisplayWindow,
    today: NaiveDate,
    totals: &Totals,
) -> bool {
    if !window.contains(today) {
        return false;
    }
    match history.binary_search_by_key(&today, |record| record.day) {
        Ok(_) => false,
        Err(position) => {
            history.insert(position, DailyRecord::from_totals(today, totals));
            true
        }
    }
}

pub fn this_week_totals(history: &[DailyRecord], today: NaiveDate) -> Totals {
    let current = week_key(today);
    let mut totals = Totals::default();
    for record in history.iter().filter(|record| week_key(record.day) == current) {
        totals.add(record);
    }
    totals
}

fn has_day(history: &[DailyRecord], day: NaiveDate) -> bool {
    history.iter().any(|record| record.day == day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::parse_day;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn day(value: &str) -> NaiveDate {
        parse_day(value).expect("valid day")
    }

    fn record(value: &str, count: u64) -> DailyRecord {
        DailyRecord {
            day: day(value),
            count,
            right_count: 0,
            total_messages: count * 10,
        }
    }

    fn window() -> DisplayWindow {
        DisplayWindow::new(day("2025-09-07"), day("2025-09-30")).unwrap()
    }

    #[test]
    fn filter_window_drops_outside_days_and_sorts() {
        let kept = filter_window(
            vec![
                record("2025-09-20", 1),
                record("2025-09-06", 9),
                record("2025-09-07", 2),
                record("2025-10-01", 9),
                record("2025-09-30", 3),
            ],
            &window(),
        );
        let days: Vec<String> = kept.iter().map(|r| r.day.to_string()).collect();
        assert_eq!(days, ["2025-09-07", "2025-09-20", "2025-09-30"]);
    }

    #[test]
    fn fill_today_inserts_in_sorted_position() {
        let mut history = vec![record("2025-09-10", 1), record("2025-09-14", 2)];
        let totals = Totals {
            count: 7,
            right_count: 1,
            total_messages: 0,
        };
        assert!(fill_today(&mut history, &window(), day("2025-09-12"), &totals));
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].day, day("2025-09-12"));
        assert_eq!(history[1].count, 7);
        assert!(history.windows(2).all(|w| w[0].day < w[1].day));
    }

    #[test]
    fn fill_today_keeps_existing_and_respects_window() {
        let mut history = vec![record("2025-09-12", 1)];
        assert!(!fill_today(&mut history, &window(), day("2025-09-12"), &Totals::default()));
        assert!(!fill_today(&mut history, &window(), day("2025-10-05"), &Totals::default()));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn this_week_sums_only_current_iso_week() {
        let history = vec![
            record("2025-09-07", 100),
            record("2025-09-08", 2),
            record("2025-09-10", 3),
            record("2025-09-15", 100),
        ];
        let totals = this_week_totals(&history, day("2025-09-11"));
        assert_eq!(totals.count, 5);
        assert_eq!(totals.total_messages, 50);
    }

    #[tokio::test]
    async fn fetch_history_synthesizes_missing_today() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "day": "2025-09-15", "count": 4, "right_count": 1, "total_messages": 80 },
                { "day": "2025-09-01", "count": 9 },
                { "day": "2025-09-08", "count": 2, "right_count": 0, "total_messages": 30 }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/today"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "count": 6 })),
            )
            .mount(&server)
            .await;

        let client = CounterClient::new(server.uri());
        let history = client
            .fetch_history(&window(), day("2025-09-10"), None)
            .await
            .unwrap()
            .records;

        let days: Vec<String> = history.iter().map(|r| r.day.to_string()).collect();
        assert_eq!(days, ["2025-09-08", "2025-09-10", "2025-09-15"]);
        assert_eq!(history[1].count, 6);
        assert_eq!(history[1].right_count, 0);
        assert_eq!(history[1].total_messages, 0);
    }

    #[tokio::test]
    async fn fetch_history_skips_today_lookup_when_present() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "day": "2025-09-10", "count": 1, "right_count": 0, "total_messages": 5 }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/today"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let client = CounterClient::new(server.uri());
        let update = client
            .fetch_history(&window(), day("2025-09-10"), None)
            .await
            .unwrap();
        assert_eq!(update.records.len(), 1);
    }

    #[tokio::test]
    async fn known_today_fills_gap_without_extra_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "day": "2025-09-08", "count": 1, "right_count": 0, "total_messages": 5 }
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/today"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let known = Totals {
            count: 4,
            right_count: 2,
            total_messages: 12,
        };
        let client = CounterClient::new(server.uri());
        let update = client
            .fetch_history(&window(), day("2025-09-09"), Some(known))
            .await
            .unwrap();
        assert_eq!(update.records.len(), 2);
        assert_eq!(update.records[1].count, 4);
        assert_eq!(update.this_week.count, 1);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/today"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = CounterClient::new(server.uri());
        let err = client.fetch_today().await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 502, .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/history"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = CounterClient::new(server.uri());
        let err = client.fetch_all_history().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn this_week_comes_from_the_same_history_read() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "day": "2025-09-08", "count": 2, "right_count": 1, "total_messages": 10 },
                { "day": "2025-09-09", "count": 3, "right_count": 0, "total_messages": 20 },
                { "day": "2025-09-01", "count": 50, "right_count": 5, "total_messages": 90 }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = CounterClient::new(format!("{}/", server.uri()));
        let update = client
            .fetch_history(&window(), day("2025-09-12"), Some(Totals::default()))
            .await
            .unwrap();
        assert_eq!(update.records.len(), 3);
        assert_eq!(
            update.this_week,
            Totals {
                count: 5,
                right_count: 1,
                total_messages: 30
            }
        );
    }
}
