//! HTML dashboard generator
//!
//! Two chart styles share one page layout: `chartjs` draws the charts with
//! Chart.js from embedded JSON, `bars` draws plain HTML/CSS bars and needs
//! no scripts beyond the notification timer.

use crate::error::Result;
use crate::file_manager::{ensure_dir_exists, remove_files, write_file};
use crate::present::{Presenter, RenderContext};
use case_dash_core::format::{format_count, format_crore, format_currency};
use case_dash_core::{DashboardViews, GroupCount};
use clap::ValueEnum;
use minijinja::{context, Environment};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Shared layout: header, notification, metric cards and tables
const BASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    {% block head %}{% endblock %}
    <style>
        :root {
            --bg-primary: #0d1117;
            --bg-secondary: #161b22;
            --bg-tertiary: #21262d;
            --text-primary: #c9d1d9;
            --text-secondary: #8b949e;
            --text-muted: #6e7681;
            --border-color: #30363d;
            --accent-blue: #58a6ff;
            --accent-green: #3fb950;
            --accent-red: #f85149;
            --accent-purple: #a371f7;
            --accent-orange: #d29922;
        }

        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg-primary);
            color: var(--text-primary);
            line-height: 1.6;
            min-height: 100vh;
        }

        .container {
            max-width: 1400px;
            margin: 0 auto;
            padding: 2rem;
        }

        header {
            text-align: center;
            margin-bottom: 2rem;
            padding: 2rem;
            background: linear-gradient(135deg, var(--bg-secondary) 0%, var(--bg-tertiary) 100%);
            border-radius: 16px;
            border: 1px solid var(--border-color);
        }

        h1 {
            font-size: 2.5rem;
            font-weight: 600;
            color: var(--accent-blue);
            margin-bottom: 0.5rem;
        }

        h2 {
            font-size: 1.15rem;
            font-weight: 600;
            padding: 1rem 1.5rem;
            background: var(--bg-tertiary);
            border-bottom: 1px solid var(--border-color);
        }

        .subtitle {
            color: var(--text-secondary);
            font-size: 1.1rem;
        }

        .meta {
            color: var(--text-muted);
            font-size: 0.9rem;
            margin-top: 0.5rem;
        }

        .toast {
            position: fixed;
            top: 20px;
            right: 20px;
            z-index: 9999;
            min-width: 300px;
            padding: 1rem 2.5rem 1rem 1rem;
            border-radius: 8px;
            border: 1px solid var(--border-color);
            background: var(--bg-tertiary);
        }

        .toast-error {
            border-color: var(--accent-red);
            color: var(--accent-red);
        }

        .toast-success {
            border-color: var(--accent-green);
            color: var(--accent-green);
        }

        .toast-close {
            position: absolute;
            top: 0.6rem;
            right: 0.75rem;
            background: none;
            border: none;
            color: inherit;
            font-size: 1.2rem;
            cursor: pointer;
        }

        .warnings {
            margin-bottom: 2rem;
            padding: 1rem 1.5rem;
            background: var(--bg-secondary);
            border: 1px solid var(--accent-orange);
            border-radius: 12px;
            color: var(--accent-orange);
        }

        .warnings ul {
            margin-top: 0.5rem;
            padding-left: 1.5rem;
            color: var(--text-secondary);
        }

        .metrics {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
            gap: 1rem;
            margin-bottom: 2rem;
        }

        .metric-card {
            padding: 1.5rem;
            background: var(--bg-secondary);
            border: 1px solid var(--border-color);
            border-radius: 12px;
            text-align: center;
        }

        .metric-value {
            font-size: 2rem;
            font-weight: 600;
            color: var(--accent-blue);
        }

        .metric-label {
            color: var(--text-secondary);
            font-size: 0.9rem;
            text-transform: uppercase;
            letter-spacing: 0.05em;
        }

        .charts {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(500px, 1fr));
            gap: 1.5rem;
            margin-bottom: 2rem;
        }

        .card {
            background: var(--bg-secondary);
            border: 1px solid var(--border-color);
            border-radius: 12px;
            margin-bottom: 2rem;
            overflow: hidden;
        }

        .charts .card {
            margin-bottom: 0;
        }

        .chart-container {
            padding: 1.5rem;
            height: 400px;
            position: relative;
        }

        .card-note {
            padding: 0.75rem 1.5rem;
            color: var(--text-muted);
            font-size: 0.85rem;
        }

        table {
            width: 100%;
            border-collapse: collapse;
        }

        th,
        td {
            padding: 0.85rem 1.5rem;
            text-align: left;
            border-top: 1px solid var(--border-color);
        }

        th {
            background: var(--bg-tertiary);
            color: var(--text-secondary);
            font-weight: 500;
            font-size: 0.85rem;
            text-transform: uppercase;
            letter-spacing: 0.05em;
        }

        tr:hover {
            background: var(--bg-tertiary);
        }

        .text-value {
            font-family: 'SF Mono', 'Fira Code', monospace;
            color: var(--accent-blue);
        }

        .status-badge {
            padding: 0.2rem 0.7rem;
            border-radius: 20px;
            font-size: 0.8rem;
            font-weight: 600;
        }

        .status-pending {
            background: rgba(210, 153, 34, 0.15);
            color: var(--accent-orange);
        }

        .status-disposed {
            background: rgba(63, 185, 80, 0.15);
            color: var(--accent-green);
        }

        .no-data {
            text-align: center;
            padding: 3rem;
            color: var(--text-muted);
        }

        footer {
            text-align: center;
            padding: 2rem;
            color: var(--text-muted);
            font-size: 0.9rem;
        }

        @media (max-width: 768px) {
            .container {
                padding: 1rem;
            }

            h1 {
                font-size: 1.75rem;
            }

            .charts {
                grid-template-columns: 1fr;
            }

            .chart-container {
                height: 300px;
            }

            th,
            td {
                padding: 0.75rem;
            }
        }
        {% block styles %}{% endblock %}
    </style>
</head>
<body>
    <div class="container">
        <header>
            <h1>⚖️ {{ title }}</h1>
            <p class="subtitle">Case Analytics Dashboard</p>
            {% if source %}
            <p class="meta">Source: {{ source }}</p>
            {% endif %}
            {% if last_update %}
            <p class="meta">Last updated: {{ last_update }}</p>
            {% endif %}
        </header>

        {% if notification %}
        <div class="toast toast-{{ notification.level }}" data-dismiss-ms="{{ notification.dismiss_after_ms }}">
            {{ notification.message }}
            <button type="button" class="toast-close" onclick="this.parentElement.remove()">&times;</button>
        </div>
        {% endif %}

        {% if warnings %}
        <details class="warnings">
            <summary>{{ warnings | length }} CSV parsing warning(s)</summary>
            <ul>
                {% for warning in warnings %}
                <li>{{ warning }}</li>
                {% endfor %}
            </ul>
        </details>
        {% endif %}

        {% if metrics %}
        <section class="metrics">
            <div class="metric-card">
                <div class="metric-value" id="total-cases">{{ metrics.total_cases }}</div>
                <div class="metric-label">Total Cases</div>
            </div>
            <div class="metric-card">
                <div class="metric-value" id="total-value">{{ metrics.total_value }}</div>
                <div class="metric-label">Total Value</div>
            </div>
            <div class="metric-card">
                <div class="metric-value" id="pending-cases">{{ metrics.pending_cases }}</div>
                <div class="metric-label">Pending Cases</div>
            </div>
            <div class="metric-card">
                <div class="metric-value" id="disposed-cases">{{ metrics.disposed_cases }}</div>
                <div class="metric-label">Disposed Cases</div>
            </div>
        </section>

        <section class="charts">
            {% block charts %}{% endblock %}
        </section>

        <div class="card">
            <h2>Court Statistics</h2>
            <table>
                <thead>
                    <tr>
                        <th>Court</th>
                        <th>Cases</th>
                        <th>Value (Cr)</th>
                    </tr>
                </thead>
                <tbody id="courtStatsTable">
                    {% for row in court_stats %}
                    <tr>
                        <td>{{ row.court }}</td>
                        <td>{{ row.cases }}</td>
                        <td class="text-value">{{ row.value_cr }}</td>
                    </tr>
                    {% endfor %}
                </tbody>
            </table>
        </div>

        <div class="card">
            <h2>Top {{ case_limit }} Cases by Value</h2>
            <table>
                <thead>
                    <tr>
                        <th>Sr. No.</th>
                        <th>Party 1</th>
                        <th>Party 2</th>
                        <th>Value</th>
                        <th>Court</th>
                        <th>Year</th>
                        <th>Status</th>
                    </tr>
                </thead>
                <tbody id="topCasesTable">
                    {% for case in top_cases %}
                    <tr>
                        <td>{{ case.serial_no }}</td>
                        <td>{{ case.party1 }}</td>
                        <td>{{ case.party2 }}</td>
                        <td class="text-value">{{ case.value }}</td>
                        <td>{{ case.court }}</td>
                        <td>{{ case.year }}</td>
                        <td><span class="status-badge {{ case.status_class }}">{{ case.status }}</span></td>
                    </tr>
                    {% endfor %}
                </tbody>
            </table>
            <p class="card-note">Limit: {{ case_limit }} (use --case-limit, at most 1000)</p>
        </div>

        <div class="card">
            <h2>Top {{ advocate_limit }} Advocates by Cases</h2>
            <table>
                <thead>
                    <tr>
                        <th>Advocate</th>
                        <th>Cases</th>
                        <th>Total Value</th>
                    </tr>
                </thead>
                <tbody id="topAdvocatesTable">
                    {% for advocate in top_advocates %}
                    <tr>
                        <td>{{ advocate.name }}</td>
                        <td>{{ advocate.cases }}</td>
                        <td class="text-value">{{ advocate.value }}</td>
                    </tr>
                    {% endfor %}
                </tbody>
            </table>
            <p class="card-note">Limit: {{ advocate_limit }} (use --advocate-limit, at most 100)</p>
        </div>
        {% else %}
        <div class="no-data">
            <p>No case data loaded.</p>
            <p>Provide a sample file or upload a CSV to get started.</p>
        </div>
        {% endif %}

        <footer>
            <p>Generated by case-dash</p>
        </footer>
    </div>

    <script>
        document.querySelectorAll('.toast').forEach(function (toast) {
            const delay = parseInt(toast.dataset.dismissMs, 10) || 5000;
            setTimeout(function () {
                if (toast.parentElement) {
                    toast.remove();
                }
            }, delay);
        });
    </script>
    {% block scripts %}{% endblock %}
</body>
</html>
"#;

/// Charts drawn by Chart.js
const CHARTJS_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block head %}
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
{% endblock %}
{% block charts %}
            <div class="card">
                <h2>Court Distribution</h2>
                <div class="chart-container"><canvas id="courtChart"></canvas></div>
            </div>
            <div class="card">
                <h2>Cases Filed per Year</h2>
                <div class="chart-container"><canvas id="yearChart"></canvas></div>
            </div>
            <div class="card">
                <h2>Court Workload</h2>
                <div class="chart-container"><canvas id="courtWorkloadChart"></canvas></div>
            </div>
            <div class="card">
                <h2>Top Advocates</h2>
                <div class="chart-container"><canvas id="advocateChart"></canvas></div>
            </div>
{% endblock %}
{% block scripts %}
    {% if metrics %}
    <script>
        window.DASHBOARD_CHARTS = {{ charts_json | safe }};

        const palette = [
            '#FF6384', '#36A2EB', '#FFCE56', '#4BC0C0', '#9966FF',
            '#FF9F40', '#FF6384', '#C9CBCF', '#4BC0C0', '#36A2EB'
        ];
        const axisColor = '#8b949e';
        const gridColor = '#30363d';

        document.addEventListener('DOMContentLoaded', function () {
            const data = window.DASHBOARD_CHARTS;
            const totalCases = data.court.counts.reduce((sum, n) => sum + n, 0);

            new Chart(document.getElementById('courtChart'), {
                type: 'pie',
                data: {
                    labels: data.court.labels,
                    datasets: [{ data: data.court.counts, backgroundColor: palette, borderWidth: 2, borderColor: '#fff' }]
                },
                options: {
                    responsive: true,
                    maintainAspectRatio: false,
                    plugins: {
                        legend: { position: 'bottom', labels: { color: axisColor, padding: 20, usePointStyle: true } },
                        tooltip: {
                            callbacks: {
                                label: function (context) {
                                    const percentage = ((context.parsed / totalCases) * 100).toFixed(1);
                                    return context.label + ': ' + context.parsed + ' cases (' + percentage + '%)';
                                }
                            }
                        }
                    }
                }
            });

            new Chart(document.getElementById('yearChart'), {
                type: 'line',
                data: {
                    labels: data.year.labels,
                    datasets: [{
                        label: 'Cases Filed',
                        data: data.year.counts,
                        borderColor: '#36A2EB',
                        backgroundColor: 'rgba(54, 162, 235, 0.1)',
                        fill: true,
                        tension: 0.4,
                        pointRadius: 6
                    }]
                },
                options: {
                    responsive: true,
                    maintainAspectRatio: false,
                    plugins: { legend: { display: false } },
                    scales: {
                        x: { title: { display: true, text: 'Year', color: axisColor }, ticks: { color: axisColor }, grid: { color: gridColor } },
                        y: { beginAtZero: true, title: { display: true, text: 'Number of Cases', color: axisColor }, ticks: { color: axisColor }, grid: { color: gridColor } }
                    }
                }
            });

            new Chart(document.getElementById('courtWorkloadChart'), {
                type: 'bar',
                data: {
                    labels: data.workload.labels,
                    datasets: [{
                        label: 'Number of Cases',
                        data: data.workload.counts,
                        backgroundColor: 'rgba(54, 162, 235, 0.8)',
                        borderColor: '#36A2EB',
                        borderWidth: 1
                    }]
                },
                options: {
                    responsive: true,
                    maintainAspectRatio: false,
                    plugins: {
                        legend: { display: false },
                        tooltip: {
                            callbacks: {
                                afterLabel: function (context) {
                                    return 'Total Value: ' + data.workload.values[context.dataIndex];
                                }
                            }
                        }
                    },
                    scales: {
                        x: { title: { display: true, text: 'Courts', color: axisColor }, ticks: { color: axisColor, maxRotation: 45 }, grid: { color: gridColor } },
                        y: { beginAtZero: true, title: { display: true, text: 'Number of Cases', color: axisColor }, ticks: { color: axisColor }, grid: { color: gridColor } }
                    }
                }
            });

            new Chart(document.getElementById('advocateChart'), {
                type: 'doughnut',
                data: {
                    labels: data.advocates.labels,
                    datasets: [{ data: data.advocates.counts, backgroundColor: palette, borderWidth: 2, borderColor: '#fff' }]
                },
                options: {
                    responsive: true,
                    maintainAspectRatio: false,
                    plugins: {
                        legend: { position: 'bottom', labels: { color: axisColor, padding: 15, usePointStyle: true } },
                        tooltip: {
                            callbacks: {
                                label: function (context) {
                                    return context.label + ': ' + context.parsed + ' cases';
                                }
                            }
                        }
                    }
                }
            });
        });
    </script>
    {% endif %}
{% endblock %}
"#;

/// Charts drawn as plain HTML bars
const BARS_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block styles %}
        .bar-chart {
            padding: 1rem 1.5rem;
        }

        .bar-row {
            display: flex;
            align-items: center;
            margin: 5px 0;
        }

        .bar-label {
            width: 140px;
            font-size: 12px;
            overflow: hidden;
            text-overflow: ellipsis;
            white-space: nowrap;
        }

        .bar-track {
            flex: 1;
            height: 20px;
            margin: 0 10px;
            background: var(--bg-tertiary);
            border-radius: 3px;
        }

        .bar-fill {
            height: 100%;
            display: flex;
            align-items: center;
            justify-content: center;
            border-radius: 3px;
            background: linear-gradient(45deg, #667eea, #764ba2);
            color: white;
            font-size: 11px;
            font-weight: bold;
        }

        .bar-count {
            width: 40px;
            font-size: 12px;
            font-weight: bold;
        }
{% endblock %}
{% block charts %}
            {% for chart in bar_charts %}
            <div class="card">
                <h2>{{ chart.title }}</h2>
                <div class="bar-chart" id="{{ chart.id }}">
                    {% for bar in chart.bars %}
                    <div class="bar-row">
                        <div class="bar-label" title="{{ bar.label }}">{{ bar.label }}</div>
                        <div class="bar-track">
                            <div class="bar-fill" style="width: {{ bar.percent }}%">{% if bar.inline %}{{ bar.count }}{% endif %}</div>
                        </div>
                        <div class="bar-count">{{ bar.count }}</div>
                    </div>
                    {% endfor %}
                </div>
            </div>
            {% endfor %}
{% endblock %}
"#;

/// Courts shown in the bar-style distribution chart
const COURT_BAR_LIMIT: usize = 8;

/// Courts shown in the bar-style workload chart
const WORKLOAD_BAR_LIMIT: usize = 6;

/// Advocates shown in the bar-style advocate chart
const ADVOCATE_BAR_LIMIT: usize = 8;

/// Files a rendering owns inside the output directory
const OUTPUT_FILES: [&str; 2] = ["index.html", "data.json"];

/// Counts at or below this are not printed inside their bar
const INLINE_COUNT_THRESHOLD: usize = 5;

/// Longest advocate name shown in the doughnut legend
const LEGEND_LABEL_CHARS: usize = 20;

/// How charts are drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ChartStyle {
    /// Chart.js canvases (loads Chart.js from a CDN)
    #[default]
    Chartjs,
    /// Plain HTML/CSS bars, no external scripts
    Bars,
}

impl ChartStyle {
    fn template_name(&self) -> &'static str {
        match self {
            ChartStyle::Chartjs => "chartjs.html",
            ChartStyle::Bars => "bars.html",
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Path to output directory
    pub output_dir: PathBuf,
    pub style: ChartStyle,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
            style: ChartStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct MetricCards {
    total_cases: String,
    total_value: String,
    pending_cases: String,
    disposed_cases: String,
}

#[derive(Debug, Clone, Serialize)]
struct CourtStatRow {
    court: String,
    cases: usize,
    value_cr: String,
}

#[derive(Debug, Clone, Serialize)]
struct CaseRow {
    serial_no: String,
    party1: String,
    party2: String,
    value: String,
    court: String,
    year: String,
    status: &'static str,
    status_class: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct AdvocateRow {
    name: String,
    cases: usize,
    value: String,
}

#[derive(Debug, Clone, Serialize)]
struct BarChart {
    id: &'static str,
    title: &'static str,
    bars: Vec<Bar>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
struct Bar {
    label: String,
    count: usize,
    percent: String,
    inline: bool,
}

#[derive(Debug, Clone, Serialize)]
struct Series {
    labels: Vec<String>,
    counts: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
struct WorkloadSeries {
    labels: Vec<String>,
    counts: Vec<usize>,
    values: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct ChartPayload {
    court: Series,
    year: Series,
    workload: WorkloadSeries,
    advocates: Series,
}

fn count_series(groups: &[GroupCount]) -> Series {
    Series {
        labels: groups.iter().map(|g| g.key.clone()).collect(),
        counts: groups.iter().map(|g| g.count).collect(),
    }
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() > LEGEND_LABEL_CHARS {
        let short: String = label.chars().take(LEGEND_LABEL_CHARS).collect();
        format!("{}...", short)
    } else {
        label.to_string()
    }
}

fn chart_payload(views: &DashboardViews) -> ChartPayload {
    ChartPayload {
        court: count_series(&views.court_distribution),
        year: count_series(&views.year_distribution),
        workload: WorkloadSeries {
            labels: views.court_workload.iter().map(|s| s.key.clone()).collect(),
            counts: views.court_workload.iter().map(|s| s.count).collect(),
            values: views
                .court_workload
                .iter()
                .map(|s| format_currency(s.total_value))
                .collect(),
        },
        advocates: Series {
            labels: views
                .advocate_distribution
                .iter()
                .map(|s| truncate_label(&s.key))
                .collect(),
            counts: views.advocate_distribution.iter().map(|s| s.count).collect(),
        },
    }
}

fn bars<S: Into<String>>(items: impl Iterator<Item = (S, usize)>) -> Vec<Bar> {
    let items: Vec<(S, usize)> = items.collect();
    let max = items.iter().map(|(_, count)| *count).max().unwrap_or(0);

    items
        .into_iter()
        .map(|(label, count)| Bar {
            label: label.into(),
            count,
            percent: if max == 0 {
                "0.0".to_string()
            } else {
                format!("{:.1}", count as f64 / max as f64 * 100.0)
            },
            inline: count > INLINE_COUNT_THRESHOLD,
        })
        .collect()
}

fn bar_charts(views: &DashboardViews) -> Vec<BarChart> {
    let mut courts = views.court_distribution.clone();
    courts.sort_by(|a, b| b.count.cmp(&a.count));
    courts.truncate(COURT_BAR_LIMIT);

    vec![
        BarChart {
            id: "courtChart",
            title: "Court Distribution",
            bars: bars(courts.iter().map(|g| (g.key.as_str(), g.count))),
        },
        BarChart {
            id: "yearChart",
            title: "Cases Filed per Year",
            bars: bars(
                views
                    .year_distribution
                    .iter()
                    .map(|g| (g.key.as_str(), g.count)),
            ),
        },
        BarChart {
            id: "courtWorkloadChart",
            title: "Court Workload",
            bars: bars(
                views
                    .court_workload
                    .iter()
                    .take(WORKLOAD_BAR_LIMIT)
                    .map(|s| (s.key.as_str(), s.count)),
            ),
        },
        BarChart {
            id: "advocateChart",
            title: "Top Advocates",
            bars: bars(
                views
                    .advocate_distribution
                    .iter()
                    .take(ADVOCATE_BAR_LIMIT)
                    .map(|s| (truncate_label(&s.key), s.count)),
            ),
        },
    ]
}

fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_template("base.html", BASE_TEMPLATE)?;
    env.add_template("chartjs.html", CHARTJS_TEMPLATE)?;
    env.add_template("bars.html", BARS_TEMPLATE)?;
    Ok(env)
}

/// Generate the HTML dashboard
pub fn generate_dashboard(
    views: Option<&DashboardViews>,
    ctx: &RenderContext<'_>,
    style: ChartStyle,
) -> Result<String> {
    let env = environment()?;
    let template = env.get_template(style.template_name())?;

    let metrics = views.map(|v| MetricCards {
        total_cases: format_count(v.summary.total),
        total_value: format_currency(v.summary.total_value),
        pending_cases: format_count(v.summary.pending),
        disposed_cases: format_count(v.summary.disposed),
    });

    let court_stats: Vec<CourtStatRow> = views
        .map(|v| {
            v.court_workload
                .iter()
                .map(|s| CourtStatRow {
                    court: s.key.clone(),
                    cases: s.count,
                    value_cr: format_crore(s.total_value),
                })
                .collect()
        })
        .unwrap_or_default();

    let top_cases: Vec<CaseRow> = views
        .map(|v| {
            v.top_cases
                .iter()
                .map(|c| CaseRow {
                    serial_no: c.serial_no.clone(),
                    party1: c.party1.clone(),
                    party2: c.party2.clone(),
                    value: format_currency(c.value),
                    court: c.court.clone(),
                    year: c.year.clone(),
                    status: c.status.label(),
                    status_class: match c.status {
                        case_dash_core::CaseStatus::Pending => "status-pending",
                        case_dash_core::CaseStatus::Disposed => "status-disposed",
                    },
                })
                .collect()
        })
        .unwrap_or_default();

    let top_advocates: Vec<AdvocateRow> = views
        .map(|v| {
            v.top_advocates
                .iter()
                .map(|s| AdvocateRow {
                    name: s.key.clone(),
                    cases: s.count,
                    value: format!("₹{} Cr", format_crore(s.total_value)),
                })
                .collect()
        })
        .unwrap_or_default();

    // Keep "</script>" inside data from closing the script element
    let charts_json = match views {
        Some(v) => serde_json::to_string(&chart_payload(v))?.replace("</", "<\\/"),
        None => "null".to_string(),
    };

    let html = template.render(context! {
        title => ctx.title,
        source => ctx.source,
        last_update => ctx.last_update.map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        notification => ctx.notification,
        warnings => ctx.warnings,
        metrics => metrics,
        court_stats => court_stats,
        top_cases => top_cases,
        top_advocates => top_advocates,
        case_limit => views.map(|v| v.case_limit),
        advocate_limit => views.map(|v| v.advocate_limit),
        bar_charts => views.map(bar_charts).unwrap_or_default(),
        charts_json => charts_json,
    })?;

    Ok(html)
}

/// Writes `index.html` and `data.json` into the configured directory.
///
/// The presenter owns both files: [`Presenter::clear`] removes them even
/// when an earlier run wrote them.
#[derive(Debug)]
pub struct HtmlPresenter {
    config: DashboardConfig,
}

impl HtmlPresenter {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    pub fn index_path(&self) -> PathBuf {
        self.config.output_dir.join("index.html")
    }

    fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }
}

impl Presenter for HtmlPresenter {
    fn render(&mut self, views: Option<&DashboardViews>, ctx: &RenderContext<'_>) -> Result<()> {
        ensure_dir_exists(self.output_dir())?;

        let html = generate_dashboard(views, ctx, self.config.style)?;
        let index_path = self.index_path();
        write_file(&index_path, html.as_bytes())?;

        // Also write the raw views as JSON
        if let Some(views) = views {
            let data_path = self.output_dir().join("data.json");
            let json = serde_json::to_string_pretty(views)?;
            write_file(&data_path, json.as_bytes())?;
        }

        debug!("Rendered dashboard to {}", self.output_dir().display());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let owned: Vec<PathBuf> = OUTPUT_FILES
            .iter()
            .map(|name| self.output_dir().join(name))
            .collect();
        remove_files(&owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::redraw;
    use case_dash_core::{compute_views, decode, Limits, Notification};
    use tempfile::TempDir;

    const CSV: &str = "Sr. No.,PARTY1,PARTY2,CASE VALUE,TRANSFEREE COURT,CASE YEAR,ADVOCATE,NEXT DATE BY HIGH COURT
1,Acme Ltd,State,\"2,50,00,000\",Delhi,2019,R. Sharma,2024-03-11
2,Bharat Mills,Union,5000,Mumbai,2020,P. Iyer,
3,<script>alert(1)</script>,State,700,Delhi,2020,R. Sharma,
";

    fn views() -> DashboardViews {
        compute_views(&decode(CSV).unwrap().rows, Limits::default())
    }

    fn ctx<'a>(notification: Option<&'a Notification>) -> RenderContext<'a> {
        RenderContext {
            title: "Test Dashboard",
            source: Some("sample-data.csv"),
            notification,
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_dashboard_empty() {
        let html = generate_dashboard(None, &ctx(None), ChartStyle::Chartjs).unwrap();
        assert!(html.contains("No case data loaded"));
        assert!(!html.contains("new Chart("));
    }

    #[test]
    fn test_generate_dashboard_chartjs() {
        let views = views();
        let html = generate_dashboard(Some(&views), &ctx(None), ChartStyle::Chartjs).unwrap();

        assert!(html.contains("Test Dashboard"));
        assert!(html.contains("chart.umd.min.js"));
        assert!(html.contains("courtWorkloadChart"));
        assert!(html.contains("₹2.5 Cr"));
        assert!(html.contains("status-pending"));
        assert!(html.contains("R. Sharma"));
    }

    #[test]
    fn test_generate_dashboard_bars() {
        let views = views();
        let html = generate_dashboard(Some(&views), &ctx(None), ChartStyle::Bars).unwrap();

        assert!(html.contains("bar-fill"));
        assert!(html.contains("width: 100.0%"));
        assert!(!html.contains("chart.umd.min.js"));
    }

    #[test]
    fn test_generate_dashboard_escapes_cells() {
        let views = views();
        for style in [ChartStyle::Chartjs, ChartStyle::Bars] {
            let html = generate_dashboard(Some(&views), &ctx(None), style).unwrap();
            assert!(!html.contains("<script>alert(1)</script>"));
        }
    }

    #[test]
    fn test_generate_dashboard_notification() {
        let notification = Notification::error("Please select a valid CSV file.");
        let html = generate_dashboard(None, &ctx(Some(&notification)), ChartStyle::Bars).unwrap();

        assert!(html.contains("toast-error"));
        assert!(html.contains("data-dismiss-ms=\"5000\""));
        assert!(html.contains("Please select a valid CSV file."));
    }

    #[test]
    fn test_bars_scale_to_largest() {
        let result = bars([("a", 10), ("b", 5), ("c", 0)].into_iter());
        let percents: Vec<&str> = result.iter().map(|b| b.percent.as_str()).collect();

        assert_eq!(percents, vec!["100.0", "50.0", "0.0"]);
        assert!(result[0].inline);
        assert!(!result[1].inline);
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Short"), "Short");
        assert_eq!(
            truncate_label("A Very Long Advocate Name Indeed"),
            "A Very Long Advocate..."
        );
    }

    #[test]
    fn test_presenter_writes_and_clears() {
        let dir = TempDir::new().unwrap();
        let mut presenter = HtmlPresenter::new(DashboardConfig {
            output_dir: dir.path().join("dist"),
            ..Default::default()
        });

        let views = views();
        presenter.render(Some(&views), &ctx(None)).unwrap();

        let index = dir.path().join("dist/index.html");
        let data = dir.path().join("dist/data.json");
        assert!(index.exists());
        assert!(data.exists());

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&data).unwrap()).unwrap();
        assert_eq!(json["summary"]["total"], 3);

        presenter.clear().unwrap();
        assert!(!index.exists());
        assert!(!data.exists());
    }

    #[test]
    fn test_redraw_without_data_removes_previous_run_output() {
        let dir = TempDir::new().unwrap();
        let config = DashboardConfig {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let views = views();
        redraw(&mut HtmlPresenter::new(config.clone()), Some(&views), &ctx(None)).unwrap();
        assert!(dir.path().join("data.json").exists());

        // a later run starts with a fresh presenter and nothing loaded
        redraw(&mut HtmlPresenter::new(config), None, &ctx(None)).unwrap();

        let index = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains("No case data loaded"));
        assert!(!dir.path().join("data.json").exists());
    }

    #[test]
    fn test_bar_charts_limit_workload_and_advocates() {
        let csv: String = std::iter::once(
            "Sr. No.,CASE VALUE,TRANSFEREE COURT,ADVOCATE\n".to_string(),
        )
        .chain((0..12).map(|i| {
            format!(
                "{},100,Court {},An Exceptionally Long Advocate Name {}\n",
                i, i, i
            )
        }))
        .collect();
        let views = compute_views(&decode(&csv).unwrap().rows, Limits::default());

        let charts = bar_charts(&views);
        let by_id = |id: &str| charts.iter().find(|c| c.id == id).unwrap();

        assert_eq!(by_id("courtChart").bars.len(), COURT_BAR_LIMIT);
        assert_eq!(by_id("courtWorkloadChart").bars.len(), WORKLOAD_BAR_LIMIT);
        let advocates = &by_id("advocateChart").bars;
        assert_eq!(advocates.len(), ADVOCATE_BAR_LIMIT);
        assert_eq!(advocates[0].label, "An Exceptionally Lon...");
    }
}
