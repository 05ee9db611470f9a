use crate::config::MOBILE_BREAKPOINT;
use crate::period::Granularity;
use serde::Serialize;

const MAX_CHART_WIDTH: f64 = 760.0;
const PAGE_GUTTER: f64 = 40.0;
const MOBILE_PERIODS: usize = 5;
/// Fraction of each band left empty around a bar.
const BAND_PADDING: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Responsive chart parameters derived from the viewport width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub viewport_width: u32,
    pub mobile: bool,
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub granularity: Granularity,
    pub max_periods: Option<usize>,
    pub axis_font_size: u32,
    pub axis_stroke_width: f64,
    pub stroke_width: f64,
    pub y_label: Option<&'static str>,
}

impl ChartLayout {
    pub fn for_viewport(viewport_width: u32) -> Self {
        let mobile = viewport_width <= MOBILE_BREAKPOINT;
        let width = (f64::from(viewport_width) - PAGE_GUTTER).clamp(0.0, MAX_CHART_WIDTH);

        if mobile {
            Self {
                viewport_width,
                mobile,
                width,
                height: 300.0,
                margin: Margin {
                    top: 20.0,
                    right: 10.0,
                    bottom: 60.0,
                    left: 40.0,
                },
                granularity: Granularity::BiWeek,
                max_periods: Some(MOBILE_PERIODS),
                axis_font_size: 10,
                axis_stroke_width: 1.0,
                stroke_width: 1.5,
                y_label: None,
            }
        } else {
            Self {
                viewport_width,
                mobile,
                width,
                height: 350.0,
                margin: Margin {
                    top: 30.0,
                    right: 20.0,
                    bottom: 70.0,
                    left: 80.0,
                },
                granularity: Granularity::Week,
                max_periods: None,
                axis_font_size: 12,
                axis_stroke_width: 1.5,
                stroke_width: 2.0,
                y_label: Some("Times Right"),
            }
        }
    }

    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// Drop all but the most recent periods when the layout caps them.
    pub fn visible<'a, T>(&self, periods: &'a [T]) -> &'a [T] {
        match self.max_periods {
            Some(limit) if periods.len() > limit => &periods[periods.len() - limit..],
            _ => periods,
        }
    }

    /// Horizontal position of every bar, in plot coordinates.
    pub fn bar_slots(&self, count: usize) -> Vec<BarSlot> {
        if count == 0 {
            return Vec::new();
        }
        let step = self.inner_width() / count as f64;
        let width = step * (1.0 - BAND_PADDING);
        (0..count)
            .map(|index| {
                let x = index as f64 * step + step * BAND_PADDING / 2.0;
                BarSlot {
                    index,
                    x,
                    width,
                    center: x + width / 2.0,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarSlot {
    pub index: usize,
    pub x: f64,
    pub width: f64,
    pub center: f64,
}

/// Linear value axis from zero to a rounded-up maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueScale {
    pub max: f64,
    pub step: f64,
    height: f64,
}

impl ValueScale {
    pub fn new(max_value: u64, height: f64, target_ticks: u32) -> Self {
        let step = nice_step(max_value.max(1) as f64, target_ticks.max(1));
        let max = (max_value.max(1) as f64 / step).ceil() * step;
        Self { max, step, height }
    }

    /// Pixel offset from the top of the plot for `value`.
    pub fn y(&self, value: f64) -> f64 {
        self.height - (value / self.max) * self.height
    }

    pub fn ticks(&self) -> Vec<f64> {
        let count = (self.max / self.step).round() as u32;
        (0..=count).map(|i| f64::from(i) * self.step).collect()
    }
}

fn nice_step(max: f64, target_ticks: u32) -> f64 {
    let raw = max / f64::from(target_ticks);
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let factor = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    (factor * magnitude).max(1.0)
}
