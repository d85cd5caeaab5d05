use crate::dashboard::chart_title;
use crate::models::{DatasetKind, MetaResponse};

pub fn render_index(meta: &MetaResponse) -> String {
    let options = meta
        .countries
        .iter()
        .map(|country| {
            let selected = if *country == meta.default_country { " selected" } else { "" };
            let name = escape_html(country);
            format!(r#"<option value="{name}"{selected}>{name}</option>"#)
        })
        .collect::<Vec<_>>()
        .join("\n          ");

    let title = chart_title(DatasetKind::Confirmed, &meta.default_country, meta.default_average);
    INDEX_HTML
        .replace("{{TITLE}}", &escape_html(&title))
        .replace("{{COUNTRY_OPTIONS}}", &options)
        .replace("{{MIN_DATE}}", &meta.min_date.to_string())
        .replace("{{MAX_DATE}}", &meta.max_date.to_string())
        .replace("{{START_DATE}}", &meta.default_start.to_string())
        .replace("{{MIN_SPAN}}", &meta.min_span_days.to_string())
        .replace("{{AVERAGE_CHECKED}}", if meta.default_average { "checked" } else { "" })
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>COVID19-Dashboard</title>
  <style>
    :root {
      --bg: #ffffff;
      --ink: #1f2430;
      --title: #000080;
      --accent: #2f6fdb;
      --muted: #6b7280;
      --card: #f7f8fb;
      --error: #c0392b;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Helvetica Neue", Arial, sans-serif;
      padding: 24px 18px 40px;
    }

    h1, h3 {
      text-align: center;
      color: var(--title);
    }

    .controls {
      display: flex;
      flex-wrap: wrap;
      justify-content: space-between;
      gap: 18px;
      max-width: 1100px;
      margin: 0 auto 12px;
    }

    .group {
      display: grid;
      gap: 10px;
      min-width: 240px;
    }

    .group label {
      font-size: 0.9rem;
      color: var(--muted);
    }

    .radios {
      display: flex;
      gap: 14px;
    }

    select, input[type="date"] {
      padding: 6px 8px;
      font-size: 0.95rem;
    }

    .chart-card {
      max-width: 1100px;
      margin: 0 auto;
      background: var(--card);
      border-radius: 12px;
      padding: 12px;
    }

    svg {
      width: 100%;
      height: auto;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: rgba(0, 0, 0, 0.08);
    }

    .chart-axis {
      stroke: rgba(0, 0, 0, 0.3);
    }

    .chart-label {
      font-size: 11px;
      fill: var(--muted);
    }

    .status {
      min-height: 1.2em;
      text-align: center;
      color: var(--error);
    }

    footer {
      display: flex;
      justify-content: center;
      gap: 15px;
      margin-top: 24px;
      color: var(--muted);
      font-size: 0.85rem;
    }
  </style>
</head>
<body>
  <h1>COVID19-Dashboard</h1>
  <div class="controls">
    <div class="group">
      <label for="start-date">Period</label>
      <div>
        <input id="start-date" type="date" min="{{MIN_DATE}}" max="{{MAX_DATE}}" value="{{START_DATE}}" />
        <input id="end-date" type="date" min="{{MIN_DATE}}" max="{{MAX_DATE}}" value="{{MAX_DATE}}" />
      </div>
      <label><input id="average" type="checkbox" {{AVERAGE_CHECKED}} /> Enable 7 day averaging</label>
    </div>
    <div class="group">
      <label for="country">Country</label>
      <select id="country">
          {{COUNTRY_OPTIONS}}
      </select>
      <div class="radios">
        <label><input type="radio" name="kind" value="confirmed" checked /> Confirmed</label>
        <label><input type="radio" name="kind" value="deaths" /> Deaths</label>
        <label><input type="radio" name="kind" value="recovered" /> Recovered</label>
      </div>
    </div>
  </div>

  <h3 id="title">{{TITLE}}</h3>
  <p class="status" id="status"></p>
  <div class="chart-card">
    <svg id="chart" viewBox="0 0 960 420" role="img" aria-label="Case counts"></svg>
  </div>

  <footer>
    <span>Data: COVID-19 time series by the Johns Hopkins University CSSE</span>
    <a href="/api/meta">API</a>
  </footer>

  <script>
    const minSpanDays = {{MIN_SPAN}};
    const startEl = document.getElementById('start-date');
    const endEl = document.getElementById('end-date');
    const averageEl = document.getElementById('average');
    const countryEl = document.getElementById('country');
    const titleEl = document.getElementById('title');
    const statusEl = document.getElementById('status');
    const chartEl = document.getElementById('chart');

    const formatAxisValue = (value) => Math.round(value).toLocaleString();

    const renderLineChart = (points) => {
      const width = 960;
      const height = 420;
      const paddingX = 64;
      const paddingY = 32;
      if (points.length === 0) {
        chartEl.innerHTML = '';
        return;
      }

      const values = points.map((point) => point.value);
      const min = Math.min(0, ...values);
      const max = Math.max(1, ...values);
      const range = max - min || 1;
      const step = points.length > 1 ? (width - paddingX * 2) / (points.length - 1) : 0;
      const x = (index) => paddingX + index * step;
      const y = (value) => height - paddingY - ((value - min) / range) * (height - paddingY * 2);

      const path = points
        .map((point, index) => `${index === 0 ? 'M' : 'L'}${x(index)},${y(point.value)}`)
        .join(' ');

      const ticks = 4;
      let grid = '';
      for (let i = 0; i <= ticks; i += 1) {
        const value = min + (range * i) / ticks;
        const yPos = y(value);
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${yPos + 4}" text-anchor="end">${formatAxisValue(value)}</text>`;
      }

      const labelEvery = Math.max(1, Math.ceil(points.length / 8));
      const xLabels = points
        .map((point, index) => {
          if (index % labelEvery !== 0) {
            return '';
          }
          return `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${point.date}</text>`;
        })
        .join('');

      const zeroLine = `<line class="chart-axis" x1="${paddingX}" y1="${y(0)}" x2="${width - paddingX}" y2="${y(0)}" />`;
      chartEl.innerHTML = `${grid}${zeroLine}<path class="chart-line" d="${path}" />${xLabels}`;
    };

    const selectedKind = () => document.querySelector('input[name="kind"]:checked').value;

    const spanOk = () => {
      const start = new Date(startEl.value);
      const end = new Date(endEl.value);
      return (end - start) / 86400000 >= minSpanDays;
    };

    const refresh = async () => {
      if (!spanOk()) {
        statusEl.textContent = `Pick a period of at least ${minSpanDays} days.`;
        return;
      }
      const params = new URLSearchParams({
        kind: selectedKind(),
        country: countryEl.value,
        start: startEl.value,
        end: endEl.value,
        average: String(averageEl.checked)
      });
      const res = await fetch(`/api/chart?${params}`);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Unable to load chart');
      }
      const chart = await res.json();
      statusEl.textContent = '';
      titleEl.textContent = chart.title;
      renderLineChart(chart.points);
    };

    const onChange = () => refresh().catch((err) => {
      statusEl.textContent = err.message;
    });

    [startEl, endEl, averageEl, countryEl].forEach((el) => el.addEventListener('change', onChange));
    document.querySelectorAll('input[name="kind"]').forEach((el) => el.addEventListener('change', onChange));

    onChange();
  </script>
</body>
</html>
"#;
