//! Terminal output for the dashboard views

use crate::error::{Error, Result};
use crate::present::{Presenter, RenderContext};
use case_dash_core::format::{format_count, format_crore, format_currency};
use case_dash_core::{DashboardViews, NotificationLevel};
use clap::ValueEnum;
use std::io::Write;

/// Output format for the `summary` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Plain aligned text
    #[default]
    Text,
    /// Markdown tables
    Markdown,
    /// The views as pretty-printed JSON
    Json,
}

/// Writes the views to a terminal (or any writer)
pub struct TerminalPresenter<W: Write> {
    out: W,
    format: ReportFormat,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, format: ReportFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render(&mut self, views: Option<&DashboardViews>, ctx: &RenderContext<'_>) -> Result<()> {
        let body = match (self.format, views) {
            (ReportFormat::Json, Some(views)) => serde_json::to_string_pretty(views)?,
            (ReportFormat::Json, None) => "null".to_string(),
            (ReportFormat::Markdown, _) => markdown(views, ctx),
            (ReportFormat::Text, _) => text(views, ctx),
        };
        writeln!(self.out, "{}", body).map_err(|e| Error::Io(e.to_string()))?;
        self.out.flush().map_err(|e| Error::Io(e.to_string()))
    }

    fn clear(&mut self) -> Result<()> {
        // Terminal output is append-only
        Ok(())
    }
}

fn notification_line(ctx: &RenderContext<'_>) -> Option<String> {
    ctx.notification.map(|n| {
        let icon = match n.level {
            NotificationLevel::Success => "✅",
            NotificationLevel::Error => "❌",
        };
        format!("{} {}", icon, n.message)
    })
}

/// Markdown report
pub fn markdown(views: Option<&DashboardViews>, ctx: &RenderContext<'_>) -> String {
    let mut lines = Vec::new();

    lines.push(format!("## {}\n", ctx.title));
    if let Some(line) = notification_line(ctx) {
        lines.push(format!("> {}\n", line));
    }

    let Some(views) = views else {
        lines.push("No case data loaded.".to_string());
        return lines.join("\n");
    };

    if let Some(source) = ctx.source {
        lines.push(format!("Source: `{}`\n", source));
    }

    lines.push("### Summary\n".to_string());
    lines.push("| Metric | Value |".to_string());
    lines.push("|--------|-------|".to_string());
    lines.push(format!("| Total Cases | {} |", format_count(views.summary.total)));
    lines.push(format!(
        "| Total Value | {} |",
        format_currency(views.summary.total_value)
    ));
    lines.push(format!("| Pending | {} |", format_count(views.summary.pending)));
    lines.push(format!("| Disposed | {} |", format_count(views.summary.disposed)));
    lines.push(String::new());

    if !views.court_workload.is_empty() {
        lines.push("### Court Statistics\n".to_string());
        lines.push("| Court | Cases | Value (Cr) |".to_string());
        lines.push("|-------|-------|------------|".to_string());
        for stat in &views.court_workload {
            lines.push(format!(
                "| {} | {} | {} |",
                stat.key,
                stat.count,
                format_crore(stat.total_value)
            ));
        }
        lines.push(String::new());
    }

    if !views.year_distribution.is_empty() {
        lines.push("### Cases per Year\n".to_string());
        lines.push("| Year | Cases |".to_string());
        lines.push("|------|-------|".to_string());
        for group in &views.year_distribution {
            lines.push(format!("| {} | {} |", group.key, group.count));
        }
        lines.push(String::new());
    }

    lines.push(format!("### Top {} Cases by Value\n", views.case_limit));
    lines.push("| Sr. No. | Party 1 | Party 2 | Value | Court | Year | Status |".to_string());
    lines.push("|---------|---------|---------|-------|-------|------|--------|".to_string());
    for case in &views.top_cases {
        lines.push(format!(
            "| {} | {} | {} | {} | {} | {} | {} |",
            case.serial_no,
            case.party1,
            case.party2,
            format_currency(case.value),
            case.court,
            case.year,
            case.status
        ));
    }
    lines.push(String::new());

    lines.push(format!("### Top {} Advocates by Cases\n", views.advocate_limit));
    lines.push("| Advocate | Cases | Total Value |".to_string());
    lines.push("|----------|-------|-------------|".to_string());
    for stat in &views.top_advocates {
        lines.push(format!(
            "| {} | {} | ₹{} Cr |",
            stat.key,
            stat.count,
            format_crore(stat.total_value)
        ));
    }

    if !ctx.warnings.is_empty() {
        lines.push(String::new());
        lines.push("<details>".to_string());
        lines.push(format!(
            "<summary>{} CSV parsing warning(s)</summary>\n",
            ctx.warnings.len()
        ));
        for warning in ctx.warnings {
            lines.push(format!("- {}", warning));
        }
        lines.push("</details>".to_string());
    }

    lines.join("\n")
}

/// Compact text report
pub fn text(views: Option<&DashboardViews>, ctx: &RenderContext<'_>) -> String {
    let mut lines = Vec::new();

    if let Some(line) = notification_line(ctx) {
        lines.push(line);
    }

    let Some(views) = views else {
        lines.push("No case data loaded.".to_string());
        return lines.join("\n");
    };

    lines.push(format!(
        "{} cases, {} total, {} pending, {} disposed",
        format_count(views.summary.total),
        format_currency(views.summary.total_value),
        format_count(views.summary.pending),
        format_count(views.summary.disposed)
    ));

    lines.push(String::new());
    lines.push("Courts:".to_string());
    for stat in &views.court_workload {
        lines.push(format!(
            "  {:<30} {:>6} cases  {:>10} Cr",
            stat.key,
            stat.count,
            format_crore(stat.total_value)
        ));
    }

    lines.push(String::new());
    lines.push(format!("Top {} cases:", views.case_limit));
    for (i, case) in views.top_cases.iter().enumerate() {
        lines.push(format!(
            "  {:>3}. {} v. {}  {}  [{}, {}] {}",
            i + 1,
            case.party1,
            case.party2,
            format_currency(case.value),
            case.court,
            case.year,
            case.status
        ));
    }

    lines.push(String::new());
    lines.push(format!("Top {} advocates:", views.advocate_limit));
    for (i, stat) in views.top_advocates.iter().enumerate() {
        lines.push(format!(
            "  {:>3}. {:<30} {:>6} cases  ₹{} Cr",
            i + 1,
            stat.key,
            stat.count,
            format_crore(stat.total_value)
        ));
    }

    if !ctx.warnings.is_empty() {
        lines.push(String::new());
        lines.push(format!("{} CSV parsing warning(s)", ctx.warnings.len()));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use case_dash_core::{compute_views, decode, Limits, Notification};

    const CSV: &str = "Sr. No.,PARTY1,PARTY2,CASE VALUE,TRANSFEREE COURT,CASE YEAR,ADVOCATE,NEXT DATE BY HIGH COURT
1,Acme Ltd,State,\"2,50,00,000\",Delhi,2019,R. Sharma,2024-03-11
2,Bharat Mills,Union,5000,Mumbai,2020,P. Iyer,
";

    fn views() -> DashboardViews {
        compute_views(&decode(CSV).unwrap().rows, Limits::default())
    }

    fn render(format: ReportFormat, views: Option<&DashboardViews>, ctx: &RenderContext<'_>) -> String {
        let mut presenter = TerminalPresenter::new(Vec::new(), format);
        presenter.render(views, ctx).unwrap();
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    #[test]
    fn test_markdown_report() {
        let views = views();
        let ctx = RenderContext {
            title: "Cases",
            source: Some("sample-data.csv"),
            ..Default::default()
        };
        let output = render(ReportFormat::Markdown, Some(&views), &ctx);

        assert!(output.contains("## Cases"));
        assert!(output.contains("| Total Cases | 2 |"));
        assert!(output.contains("| Total Value | ₹2.5 Cr |"));
        assert!(output.contains("| Delhi | 1 | 2.5 |"));
        assert!(output.contains("| R. Sharma | 1 | ₹2.5 Cr |"));
    }

    #[test]
    fn test_text_report() {
        let views = views();
        let ctx = RenderContext {
            title: "Cases",
            ..Default::default()
        };
        let output = render(ReportFormat::Text, Some(&views), &ctx);

        assert!(output.starts_with("2 cases, ₹2.5 Cr total, 1 pending, 1 disposed"));
        assert!(output.contains("Top 10 cases:"));
        assert!(output.contains("1. Acme Ltd v. State"));
    }

    #[test]
    fn test_json_report() {
        let views = views();
        let output = render(ReportFormat::Json, Some(&views), &RenderContext::default());

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["summary"]["total"], 2);
        assert_eq!(value["case_limit"], 10);
    }

    #[test]
    fn test_report_without_data() {
        let notification = Notification::error("Error loading sample data.");
        let ctx = RenderContext {
            title: "Cases",
            notification: Some(&notification),
            ..Default::default()
        };
        let output = render(ReportFormat::Text, None, &ctx);

        assert!(output.contains("❌ Error loading sample data."));
        assert!(output.contains("No case data loaded."));
        assert_eq!(render(ReportFormat::Json, None, &ctx).trim(), "null");
    }
}
