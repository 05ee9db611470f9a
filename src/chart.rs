use crate::layout::{BarSlot, ChartLayout, ValueScale};
use crate::models::PeriodRecord;
use crate::period::day_label;
use crate::rough::RoughPen;
use serde::Serialize;
use std::fmt::Write as _;

pub const ROUGHNESS: f64 = 1.5;
pub const BOWING: f64 = 1.0;
pub const FONT_FAMILY: &str = "Gaegu, cursive";
const AXIS_COLOR: &str = "#374151";
const Y_TICKS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Series {
    pub name: &'static str,
    pub color: &'static str,
}

/// Bottom to top stacking order.
pub const SERIES: [Series; 2] = [
    Series {
        name: "Absolutely right",
        color: "coral",
    },
    Series {
        name: "Just right",
        color: "skyblue",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRow {
    pub label: String,
    pub values: [u64; 2],
}

impl ChartRow {
    pub fn total(&self) -> u64 {
        self.values.iter().fold(0u64, |acc, v| acc.saturating_add(*v))
    }
}

pub fn chart_rows(periods: &[PeriodRecord], layout: &ChartLayout) -> Vec<ChartRow> {
    periods
        .iter()
        .map(|period| ChartRow {
            label: day_label(period.period_start, layout.mobile),
            values: [period.count, period.right_count],
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub layout: ChartLayout,
    pub bars: Vec<BarSlot>,
    pub scale: ValueScale,
    behind: String,
    body: String,
    front: String,
}

impl RenderedChart {
    pub fn plot_width(&self) -> f64 {
        self.layout.inner_width()
    }

    pub fn plot_height(&self) -> f64 {
        self.layout.inner_height()
    }

    // Overlay fragments are in plot coordinates.
    pub fn push_behind(&mut self, fragment: &str) {
        self.behind.push_str(fragment);
    }

    pub fn push_front(&mut self, fragment: &str) {
        self.front.push_str(fragment);
    }

    pub fn to_svg(&self) -> String {
        let layout = &self.layout;
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" class="tally-chart" "#,
                r#"data-layout="{kind}" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
                r#"<g class="plot" transform="translate({left},{top})">"#,
                r#"<g class="behind">{behind}</g>{body}<g class="front">{front}</g>"#,
                "</g></svg>"
            ),
            kind = if layout.mobile { "mobile" } else { "desktop" },
            w = layout.width,
            h = layout.height,
            left = layout.margin.left,
            top = layout.margin.top,
            behind = self.behind,
            body = self.body,
            front = self.front,
        )
    }
}

pub fn render_chart(rows: &[ChartRow], layout: &ChartLayout) -> RenderedChart {
    let plot_height = layout.inner_height();
    let bars = layout.bar_slots(rows.len());
    let max = rows.iter().map(ChartRow::total).max().unwrap_or(0);
    let scale = ValueScale::new(max, plot_height, Y_TICKS);

    let mut body = String::from(r#"<g class="bars">"#);
    for (row, slot) in rows.iter().zip(&bars) {
        draw_stack(&mut body, row, slot, &scale, layout);
    }
    body.push_str("</g>");
    draw_axes(&mut body, rows, &bars, &scale, layout);

    RenderedChart {
        layout: layout.clone(),
        bars,
        scale,
        behind: String::new(),
        body,
        front: String::new(),
    }
}

fn draw_stack(out: &mut String, row: &ChartRow, slot: &BarSlot, scale: &ValueScale, layout: &ChartLayout) {
    let mut base = 0u64;
    for (series_index, (series, value)) in SERIES.iter().zip(row.values).enumerate() {
        if value == 0 {
            continue;
        }
        let top = base.saturating_add(value);
        let y = scale.y(top as f64);
        let height = scale.y(base as f64) - y;
        base = top;

        let mut pen = RoughPen::new(
            (slot.index as u64) << 4 | series_index as u64,
            ROUGHNESS,
            BOWING,
        );
        let fill = pen.hachure(slot.x, y, slot.width, height, layout.stroke_width / 2.0);
        let outline = pen.rectangle(slot.x, y, slot.width, height);
        let _ = write!(
            out,
            concat!(
                r#"<g class="bar" data-series="{name}">"#,
                r#"<path d="{fill}" fill="none" stroke="{color}" stroke-width="{fill_w}"/>"#,
                r#"<path d="{outline}" fill="none" stroke="{color}" stroke-width="{w}"/>"#,
                "<title>{label}: {value} {name}</title></g>"
            ),
            name = escape(series.name),
            color = series.color,
            fill = fill,
            outline = outline,
            fill_w = layout.stroke_width / 2.0,
            w = layout.stroke_width,
            label = escape(&row.label),
            value = value,
        );
    }
}

fn draw_axes(out: &mut String, rows: &[ChartRow], bars: &[BarSlot], scale: &ValueScale, layout: &ChartLayout) {
    let plot_width = layout.inner_width();
    let plot_height = layout.inner_height();
    let mut pen = RoughPen::new(0xA715, ROUGHNESS / 2.0, BOWING);
    let stroke = layout.axis_stroke_width;

    let _ = write!(
        out,
        r#"<g class="axes" font-family="{FONT_FAMILY}" font-size="{size}" fill="{AXIS_COLOR}">"#,
        size = layout.axis_font_size,
    );
    let _ = write!(
        out,
        r#"<path class="x-axis" d="{}" fill="none" stroke="{AXIS_COLOR}" stroke-width="{stroke}"/>"#,
        pen.line(0.0, plot_height, plot_width, plot_height),
    );
    let _ = write!(
        out,
        r#"<path class="y-axis" d="{}" fill="none" stroke="{AXIS_COLOR}" stroke-width="{stroke}"/>"#,
        pen.line(0.0, 0.0, 0.0, plot_height),
    );

    for tick in scale.ticks() {
        let y = scale.y(tick);
        let _ = write!(
            out,
            r#"<text class="y-tick" x="-9" y="{y:.2}" dy="0.32em" text-anchor="end">{tick}</text>"#,
        );
    }

    // Every other label is hidden to keep the axis readable.
    for (index, (row, slot)) in rows.iter().zip(bars).enumerate() {
        let opacity = if index % 2 == 1 { 0 } else { 1 };
        let _ = write!(
            out,
            r#"<text class="x-label" x="{x:.2}" y="{y:.2}" text-anchor="middle" opacity="{opacity}">{label}</text>"#,
            x = slot.center,
            y = plot_height + 18.0,
            label = escape(&row.label),
        );
    }

    if let Some(label) = layout.y_label {
        let _ = write!(
            out,
            r#"<text class="y-label" transform="rotate(-90)" x="{x:.2}" y="{y:.2}" text-anchor="middle">{label}</text>"#,
            x = -plot_height / 2.0,
            y = -layout.margin.left + 20.0,
        );
    }
    out.push_str("</g>");
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
