use crate::chart::{escape, RenderedChart, BOWING, FONT_FAMILY, ROUGHNESS};
use crate::layout::BarSlot;
use crate::models::{Annotation, PeriodRecord};
use crate::period::{day_label, parse_day, Granularity};
use crate::rough::RoughPen;
use chrono::NaiveDate;
use std::fmt::Write as _;
use tracing::warn;

pub const ANNOTATION_COLOR: &str = "#e63946";
pub const TREND_COLOR: &str = "#c0c4ca";
pub const TREND_CLASS: &str = "total-line";
pub const TOOLTIP_OFFSET_X: f64 = 10.0;
pub const TOOLTIP_OFFSET_Y: f64 = -30.0;

/// Height of a value of 1, as a share of the plot.
const TREND_FLOOR: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationMarker {
    pub x: f64,
    pub label: &'static str,
    pub is_final: bool,
    pub period_key: String,
}

/// Annotations outside the charted periods are left out.
pub fn place_annotations(
    annotations: &[Annotation],
    periods: &[PeriodRecord],
    bars: &[BarSlot],
    granularity: Granularity,
) -> Vec<AnnotationMarker> {
    annotations
        .iter()
        .filter_map(|annotation| {
            let Some(date) = parse_day(annotation.date) else {
                warn!(date = annotation.date, "ignoring annotation with unreadable date");
                return None;
            };
            let key = granularity.key(date);
            let index = periods.iter().position(|period| period.period_key == key)?;
            let bar = bars.get(index)?;
            Some(AnnotationMarker {
                x: bar.center,
                label: annotation.label,
                is_final: annotation.is_final,
                period_key: key,
            })
        })
        .collect()
}

pub fn draw_annotations(chart: &mut RenderedChart, markers: &[AnnotationMarker]) {
    let plot_height = chart.plot_height();
    let font_size = if chart.layout.mobile { 11 } else { 13 };
    let mut svg = String::new();

    for marker in markers {
        let x = marker.x;
        if marker.is_final {
            // Arrow pointing up at the last bar, caption underneath the axis labels.
            let tip = plot_height + 24.0;
            let tail = plot_height + 40.0;
            let _ = write!(
                svg,
                concat!(
                    r#"<g class="annotation final" data-period="{key}">"#,
                    r#"<line x1="{x:.2}" y1="{tail:.2}" x2="{x:.2}" y2="{tip:.2}" stroke="{color}" stroke-width="2"/>"#,
                    r#"<path d="M{left:.2} {head:.2} L{x:.2} {tip:.2} L{right:.2} {head:.2}" fill="none" stroke="{color}" stroke-width="2"/>"#,
                    r#"<text x="{x:.2}" y="{caption:.2}" text-anchor="middle" fill="{color}" font-family="{font}" font-size="{size}" font-weight="bold">{label}</text>"#,
                    "</g>"
                ),
                key = escape(&marker.period_key),
                x = x,
                tail = tail,
                tip = tip,
                left = x - 5.0,
                right = x + 5.0,
                head = tip + 6.0,
                caption = tail + 14.0,
                color = ANNOTATION_COLOR,
                font = FONT_FAMILY,
                size = font_size,
                label = escape(marker.label),
            );
        } else {
            let _ = write!(
                svg,
                concat!(
                    r#"<g class="annotation" data-period="{key}">"#,
                    r#"<line x1="{x:.2}" y1="0" x2="{x:.2}" y2="{bottom:.2}" stroke="{color}" stroke-width="2" stroke-dasharray="5,5" opacity="0.7"/>"#,
                    r#"<text x="{x:.2}" y="-5" text-anchor="middle" fill="{color}" font-family="{font}" font-size="{size}" font-weight="bold">{label}</text>"#,
                    "</g>"
                ),
                key = escape(&marker.period_key),
                x = x,
                bottom = plot_height,
                color = ANNOTATION_COLOR,
                font = FONT_FAMILY,
                size = font_size,
                label = escape(marker.label),
            );
        }
    }

    chart.push_front(&svg);
}

pub fn sqrt_normalize(value: u64, min: u64, max: u64) -> f64 {
    let (sqrt_min, sqrt_max) = ((min as f64).sqrt(), (max as f64).sqrt());
    let range = sqrt_max - sqrt_min;
    let range = if range > 0.0 { range } else { 1.0 };
    ((value as f64).sqrt() - sqrt_min) / range
}

pub fn trend_y(normalized: f64, plot_height: f64) -> f64 {
    plot_height - (TREND_FLOOR + normalized * (1.0 - TREND_FLOOR)) * plot_height
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub x: f64,
    pub y: f64,
    pub value: u64,
    pub period_start: NaiveDate,
}

impl TrendPoint {
    pub fn tooltip_html(&self) -> String {
        format!("{}: <b>{}</b> total", day_label(self.period_start, false), self.value)
    }
}

/// Zero totals count as missing and are not plotted.
pub fn trend_points(
    periods: &[PeriodRecord],
    bars: &[BarSlot],
    plot_height: f64,
    trend_start: NaiveDate,
) -> Vec<TrendPoint> {
    let eligible: Vec<(&PeriodRecord, &BarSlot)> = periods
        .iter()
        .zip(bars)
        .filter(|(period, _)| period.total_messages > 0)
        .filter(|(period, _)| period.last_day().is_some_and(|day| day >= trend_start))
        .collect();

    // 1 is folded into both bounds, so the scale starts at √1 rather than at the
    // smallest plotted period.
    let min = eligible.iter().map(|(p, _)| p.total_messages).min().unwrap_or(1).min(1);
    let max = eligible.iter().map(|(p, _)| p.total_messages).max().unwrap_or(1).max(1);

    eligible
        .into_iter()
        .map(|(period, bar)| TrendPoint {
            x: bar.center,
            y: trend_y(sqrt_normalize(period.total_messages, min, max), plot_height),
            value: period.total_messages,
            period_start: period.period_start,
        })
        .collect()
}

pub fn draw_trend(chart: &mut RenderedChart, points: &[TrendPoint], visible: bool) {
    let display = if visible { "block" } else { "none" };
    let mobile = chart.layout.mobile;

    if points.len() > 1 {
        let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
        let mut pen = RoughPen::new(0x7E4D, ROUGHNESS, BOWING);
        let line = format!(
            r#"<path class="{TREND_CLASS}" d="{d}" fill="none" stroke="{TREND_COLOR}" stroke-width="{w}" opacity="0.6" style="display:{display}"/>"#,
            d = pen.linear_path(&coords),
            w = if mobile { 2.5 } else { 3.0 },
        );
        chart.push_behind(&line);
    }

    let radius = if mobile { 3.0 } else { 3.5 };
    let mut circles = String::new();
    for point in points {
        let _ = write!(
            circles,
            concat!(
                r#"<circle class="{class}" cx="{x:.2}" cy="{y:.2}" r="{r}" fill="{color}" stroke="white" stroke-width="1.5" "#,
                r#"opacity="0.9" style="cursor:pointer;display:{display}" data-tooltip="{tip}"/>"#
            ),
            class = TREND_CLASS,
            x = point.x,
            y = point.y,
            r = radius,
            color = TREND_COLOR,
            display = display,
            tip = escape(&point.tooltip_html()),
        );
    }
    chart.push_front(&circles);
}
