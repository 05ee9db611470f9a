use crate::chart::{escape, SERIES};
use crate::config::{REFRESH_INTERVAL, RESIZE_DEBOUNCE};
use crate::counter::CounterFrame;
use crate::overlay::{TOOLTIP_OFFSET_X, TOOLTIP_OFFSET_Y, TREND_CLASS, TREND_COLOR};

pub fn render_index(frame: Option<&CounterFrame>) -> String {
    let (count, style, subtitle_opacity) = match frame {
        Some(frame) => (
            escape(&frame.text),
            counter_style(frame),
            if frame.subtitle_visible { "1" } else { "0" },
        ),
        None => ("&hellip;".to_string(), String::new(), "0"),
    };

    INDEX_HTML
        .replace("{{COUNT}}", &count)
        .replace("{{COUNT_STYLE}}", &style)
        .replace("{{SUBTITLE_OPACITY}}", subtitle_opacity)
        .replace("{{SERIES_0_NAME}}", SERIES[0].name)
        .replace("{{SERIES_0_COLOR}}", SERIES[0].color)
        .replace("{{SERIES_1_NAME}}", SERIES[1].name)
        .replace("{{SERIES_1_COLOR}}", SERIES[1].color)
        .replace("{{TREND_COLOR}}", TREND_COLOR)
        .replace("{{TREND_CLASS}}", TREND_CLASS)
        .replace("{{TOOLTIP_X}}", &TOOLTIP_OFFSET_X.to_string())
        .replace("{{TOOLTIP_Y}}", &TOOLTIP_OFFSET_Y.to_string())
        .replace("{{REFRESH_MS}}", &REFRESH_INTERVAL.as_millis().to_string())
        .replace("{{DEBOUNCE_MS}}", &RESIZE_DEBOUNCE.as_millis().to_string())
}

fn counter_style(frame: &CounterFrame) -> String {
    let mut style = String::new();
    if frame.scale != 1.0 {
        style.push_str(&format!("transform: scale({});", frame.scale));
    }
    if let Some(color) = frame.color {
        style.push_str(&format!("color: {color};"));
    }
    style
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Absolutely Right Tally</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Gaegu:wght@400;700&display=swap');

    :root {
      --bg: #fdfbf7;
      --ink: #2b2a28;
      --muted: #6b645d;
      --accent: #e63946;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Gaegu", cursive;
      display: grid;
      justify-items: center;
      padding: 32px 20px 48px;
    }

    .app {
      width: min(800px, 100%);
      display: grid;
      gap: 20px;
      text-align: center;
    }

    .tally {
      margin: 0;
      font-size: clamp(2rem, 6vw, 3.2rem);
      font-weight: 700;
    }

    #today-inline {
      display: inline-block;
      transition: transform 300ms ease, color 300ms ease;
    }

    .subtitle {
      margin: 0;
      color: var(--muted);
      font-size: 1.3rem;
      transition: opacity 0.5s ease-in;
    }

    #right-count {
      margin: 0;
      color: var(--muted);
      font-size: 1.1rem;
    }

    .legend {
      display: flex;
      flex-wrap: wrap;
      justify-content: center;
      gap: 18px;
      font-size: 1.1rem;
    }

    .legend-item {
      display: inline-flex;
      align-items: center;
      gap: 6px;
    }

    .legend-item.toggle {
      cursor: pointer;
    }

    .legend-item.disabled {
      opacity: 0.35;
      text-decoration: line-through;
    }

    .swatch {
      width: 14px;
      height: 14px;
      border-radius: 3px;
      display: inline-block;
    }

    #chart {
      position: relative;
      display: flex;
      justify-content: center;
      min-height: 300px;
    }

    .totals-tooltip {
      position: absolute;
      padding: 0.5rem;
      font-size: 0.95rem;
      line-height: 1rem;
      opacity: 0;
      display: none;
      pointer-events: none;
      z-index: 10000;
      color: #374151;
      background: rgba(255, 255, 255, 0.9);
      border-radius: 4px;
    }
  </style>
</head>
<body>
  <main class="app">
    <p class="tally">Claude said "You're absolutely right!" <span id="today-inline" style="{{COUNT_STYLE}}">{{COUNT}}</span> times today</p>
    <p class="subtitle" style="opacity: {{SUBTITLE_OPACITY}}">This week so far: <span id="this-week">&hellip;</span></p>
    <p id="right-count" style="display: none"></p>

    <div class="legend">
      <span class="legend-item"><span class="swatch" style="background: {{SERIES_0_COLOR}}"></span>{{SERIES_0_NAME}}</span>
      <span class="legend-item"><span class="swatch" style="background: {{SERIES_1_COLOR}}"></span>{{SERIES_1_NAME}}</span>
      <span class="legend-item toggle" id="legend-total"><span class="swatch" style="background: {{TREND_COLOR}}"></span>Total assistant messages</span>
    </div>

    <div id="chart"><div class="totals-tooltip" id="tooltip"></div></div>
  </main>

  <script>
    const countEl = document.getElementById('today-inline');
    const subtitleEl = document.querySelector('.subtitle');
    const thisWeekEl = document.getElementById('this-week');
    const rightEl = document.getElementById('right-count');
    const chartEl = document.getElementById('chart');
    const tooltip = document.getElementById('tooltip');
    const legendTotal = document.getElementById('legend-total');

    let frameTimers = [];
    let resizeTimer = null;
    let highlighted = false;
    let totalLineVisible = true;

    const applyFrame = (frame) => {
      countEl.textContent = frame.text;
      countEl.style.transform = frame.scale !== 1 ? `scale(${frame.scale})` : '';
      countEl.style.color = frame.color || '';
      subtitleEl.style.opacity = frame.subtitle_visible ? '1' : '0';
      if (frame.color) {
        highlighted = true;
      }
    };

    const loadCounter = async (animate) => {
      const res = await fetch(`/api/counter?animate=${animate}&highlight=${highlighted}`);
      if (!res.ok) {
        return;
      }
      const data = await res.json();
      frameTimers.forEach(clearTimeout);
      applyFrame(data.frame);
      frameTimers = data.upcoming.map((next) => setTimeout(() => applyFrame(next.frame), next.delay_ms));

      thisWeekEl.textContent = data.this_week.count;
      if (data.right_text) {
        rightEl.textContent = data.right_text;
        rightEl.style.display = 'block';
      } else {
        rightEl.style.display = 'none';
      }
    };

    const placeTooltip = (event) => {
      const rect = chartEl.getBoundingClientRect();
      tooltip.style.left = (event.clientX - rect.left + {{TOOLTIP_X}}) + 'px';
      tooltip.style.top = (event.clientY - rect.top + {{TOOLTIP_Y}}) + 'px';
    };

    const bindTooltips = () => {
      chartEl.querySelectorAll('circle.{{TREND_CLASS}}').forEach((point) => {
        point.addEventListener('mouseenter', (event) => {
          tooltip.innerHTML = point.dataset.tooltip;
          tooltip.style.display = 'block';
          tooltip.style.opacity = '1';
          placeTooltip(event);
        });
        point.addEventListener('mousemove', placeTooltip);
        point.addEventListener('mouseleave', () => {
          tooltip.style.opacity = '0';
          tooltip.style.display = 'none';
        });
      });
    };

    const loadChart = async () => {
      const res = await fetch(`/chart.svg?width=${window.innerWidth}&trend=${totalLineVisible}`);
      if (!res.ok) {
        return;
      }
      const svg = await res.text();
      chartEl.querySelectorAll('svg').forEach((old) => old.remove());
      chartEl.insertAdjacentHTML('afterbegin', svg);
      bindTooltips();
    };

    window.addEventListener('resize', () => {
      clearTimeout(resizeTimer);
      resizeTimer = setTimeout(() => loadChart().catch(console.error), {{DEBOUNCE_MS}});
    });

    legendTotal.addEventListener('click', () => {
      totalLineVisible = !totalLineVisible;
      legendTotal.classList.toggle('disabled', !totalLineVisible);
      chartEl.querySelectorAll('.{{TREND_CLASS}}').forEach((el) => {
        el.style.display = totalLineVisible ? 'block' : 'none';
      });
    });

    loadCounter(true).catch(console.error);
    loadChart().catch(console.error);
    setInterval(() => {
      loadCounter(false).catch(console.error);
      loadChart().catch(console.error);
    }, {{REFRESH_MS}});
  </script>
</body>
</html>
"#;
