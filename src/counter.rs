use crate::models::Totals;
use serde::Serialize;
use std::time::Duration;

pub const SETTLE_DELAY: Duration = Duration::from_millis(1000);
pub const PULSE_DURATION: Duration = Duration::from_millis(300);
pub const PULSE_SCALE: f32 = 1.3;
pub const HIGHLIGHT_COLOR: &str = "#e63946";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterPhase {
    Idle,
    Animating,
    Pulsing,
    Updated,
}

impl CounterPhase {
    pub fn next(self) -> Option<(Duration, CounterPhase)> {
        match self {
            CounterPhase::Animating => Some((SETTLE_DELAY, CounterPhase::Pulsing)),
            CounterPhase::Pulsing => Some((PULSE_DURATION, CounterPhase::Idle)),
            CounterPhase::Idle | CounterPhase::Updated => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterFrame {
    pub phase: CounterPhase,
    pub text: String,
    pub scale: f32,
    pub color: Option<&'static str>,
    pub subtitle_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledFrame {
    pub delay_ms: u64,
    pub frame: CounterFrame,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CounterDisplay {
    totals: Totals,
    initial: CounterPhase,
    highlighted: bool,
}

impl CounterDisplay {
    /// Only an animated update with a positive count animates. `keep_highlight`
    /// carries the colour left by the viewer's earlier animation.
    pub fn start(totals: Totals, animate: bool, keep_highlight: bool) -> Self {
        let animated = animate && totals.count > 0;
        Self {
            totals,
            initial: if animated {
                CounterPhase::Animating
            } else {
                CounterPhase::Updated
            },
            highlighted: animated || keep_highlight,
        }
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn phase_at(&self, elapsed: Duration) -> CounterPhase {
        let mut phase = self.initial;
        let mut boundary = Duration::ZERO;
        while let Some((length, next)) = phase.next() {
            boundary += length;
            if elapsed < boundary {
                break;
            }
            phase = next;
        }
        phase
    }

    pub fn frame_at(&self, elapsed: Duration) -> CounterFrame {
        self.frame(self.phase_at(elapsed))
    }

    /// Frames still to come after `elapsed`, with delays relative to `elapsed`.
    pub fn schedule(&self, elapsed: Duration) -> Vec<ScheduledFrame> {
        let mut upcoming = Vec::new();
        let mut phase = self.initial;
        let mut boundary = Duration::ZERO;
        while let Some((length, next)) = phase.next() {
            boundary += length;
            if boundary > elapsed {
                upcoming.push(ScheduledFrame {
                    delay_ms: (boundary - elapsed).as_millis() as u64,
                    frame: self.frame(next),
                });
            }
            phase = next;
        }
        upcoming
    }

    pub fn right_text(&self) -> Option<String> {
        (self.totals.right_count > 0)
            .then(|| format!("(+ {} times I was just \"right\")", self.totals.right_count))
    }

    fn frame(&self, phase: CounterPhase) -> CounterFrame {
        let count = self.totals.count;
        let (text, scale, color) = match phase {
            CounterPhase::Animating => (count.saturating_sub(1), 1.0, None),
            CounterPhase::Pulsing => (count, PULSE_SCALE, Some(HIGHLIGHT_COLOR)),
            CounterPhase::Idle | CounterPhase::Updated => {
                (count, 1.0, self.highlighted.then_some(HIGHLIGHT_COLOR))
            }
        };
        CounterFrame {
            phase,
            text: text.to_string(),
            scale,
            color,
            subtitle_visible: true,
        }
    }
}
