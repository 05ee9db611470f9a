use crate::config::DEFAULT_VIEWPORT_WIDTH;
use crate::counter::{CounterDisplay, CounterFrame, ScheduledFrame};
use crate::errors::AppError;
use crate::layout::ChartLayout;
use crate::lifecycle::{draw_chart, visible_periods};
use crate::models::{ChartQuery, CounterQuery, PeriodRecord, Totals};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use std::time::Duration;

const MAX_VIEWPORT_WIDTH: u32 = 10_000;

#[derive(Debug, Serialize)]
pub struct CounterResponse {
    pub today: Totals,
    pub this_week: Totals,
    pub frame: CounterFrame,
    pub upcoming: Vec<ScheduledFrame>,
    pub right_text: Option<String>,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = state.dashboard.lock().await.today;
    let frame = today
        .map(|totals| CounterDisplay::start(totals, true, false).frame_at(Duration::ZERO));
    Html(render_index(frame.as_ref()))
}

/// Each call starts its own display, so every page load gets the full
/// animation no matter how long the server has been up.
pub async fn get_counter(
    State(state): State<AppState>,
    Query(query): Query<CounterQuery>,
) -> Result<Json<CounterResponse>, AppError> {
    let dashboard = state.dashboard.lock().await;
    let today = dashboard
        .today
        .ok_or_else(|| AppError::unavailable("counter not loaded yet"))?;
    let display = CounterDisplay::start(today, query.animate, query.highlight);

    Ok(Json(CounterResponse {
        today,
        this_week: dashboard.this_week,
        frame: display.frame_at(Duration::ZERO),
        upcoming: display.schedule(Duration::ZERO),
        right_text: display.right_text(),
    }))
}

pub async fn get_periods(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<Vec<PeriodRecord>>, AppError> {
    let layout = layout_for(&query)?;
    let dashboard = state.dashboard.lock().await;
    Ok(Json(visible_periods(&dashboard.history, &layout)))
}

pub async fn get_chart(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<impl IntoResponse, AppError> {
    let layout = layout_for(&query)?;
    let history = state.dashboard.lock().await.history.clone();
    let chart = draw_chart(
        &history,
        &layout,
        query.trend.unwrap_or(true),
        state.config.trend_start,
    )
    .ok_or_else(|| AppError::unavailable("no history to chart yet"))?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], chart.to_svg()))
}

fn layout_for(query: &ChartQuery) -> Result<ChartLayout, AppError> {
    let width = query.width.unwrap_or(DEFAULT_VIEWPORT_WIDTH);
    if width == 0 || width > MAX_VIEWPORT_WIDTH {
        return Err(AppError::bad_request(format!(
            "width must be between 1 and {MAX_VIEWPORT_WIDTH}"
        )));
    }
    Ok(ChartLayout::for_viewport(width))
}
