use crate::aggregate::aggregate;
use crate::chart::{chart_rows, render_chart, RenderedChart};
use crate::config::{ANNOTATIONS, REFRESH_INTERVAL};
use crate::fetcher::CounterClient;
use crate::layout::ChartLayout;
use crate::models::{DailyRecord, PeriodRecord};
use crate::overlay::{draw_annotations, draw_trend, place_annotations, trend_points};
use crate::state::AppState;
use chrono::{Local, NaiveDate};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

/// Periods for `layout`, already trimmed to what the chart shows.
pub fn visible_periods(history: &[DailyRecord], layout: &ChartLayout) -> Vec<PeriodRecord> {
    let periods = aggregate(history, layout.granularity);
    layout.visible(&periods).to_vec()
}

pub fn draw_chart(
    history: &[DailyRecord],
    layout: &ChartLayout,
    trend_visible: bool,
    trend_start: NaiveDate,
) -> Option<RenderedChart> {
    if history.is_empty() {
        return None;
    }
    let periods = visible_periods(history, layout);
    let mut chart = render_chart(&chart_rows(&periods, layout), layout);

    let markers = place_annotations(ANNOTATIONS, &periods, &chart.bars, layout.granularity);
    draw_annotations(&mut chart, &markers);

    let points = trend_points(&periods, &chart.bars, chart.plot_height(), trend_start);
    draw_trend(&mut chart, &points, trend_visible);

    Some(chart)
}

/// Fetch today, then history once, and store whatever arrived. A failed fetch
/// is logged and leaves its part of the dashboard as it was.
pub async fn refresh(state: &AppState, client: &CounterClient, today: NaiveDate) {
    let totals = match client.fetch_today().await {
        Ok(totals) => Some(totals),
        Err(err) => {
            warn!(error = %err, "skipping counter update");
            None
        }
    };
    let update = match client.fetch_history(&state.config.window, today, totals).await {
        Ok(update) => Some(update),
        Err(err) => {
            warn!(error = %err, "skipping history update");
            None
        }
    };

    let mut dashboard = state.dashboard.lock().await;
    if let Some(totals) = totals {
        dashboard.today = Some(totals);
        debug!(count = totals.count, right_count = totals.right_count, "counter updated");
    }
    if let Some(update) = update {
        debug!(days = update.records.len(), "history updated");
        dashboard.this_week = update.this_week;
        dashboard.history = update.records;
    }
}

/// Poll upstream every `REFRESH_INTERVAL`. Each tick runs to completion before
/// the next one starts, so responses are never applied out of order.
pub fn spawn_refresh_loop(state: AppState, client: CounterClient) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(REFRESH_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            refresh(&state, &client, Local::now().date_naive()).await;
        }
    })
}
