//! case-dash CLI - Legal case analytics dashboard

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

mod error;
mod file_manager;
mod html;
mod present;
mod report;
mod source;
mod validation;

use case_dash_core::upload::content_type_for;
use case_dash_core::{
    CsvDecoder, DashboardState, Event, Notification, NotificationLevel, Outcome, RankingTable,
    Upload,
};
use html::{ChartStyle, DashboardConfig, HtmlPresenter};
use present::{redraw, Presenter, RenderContext};
use report::{ReportFormat, TerminalPresenter};
use source::Source;

/// case-dash: Legal case analytics dashboard
#[derive(Parser, Debug)]
#[command(name = "case-dash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the HTML dashboard
    Dashboard(DashboardArgs),
    /// Print the dashboard views to the terminal
    Summary(SummaryArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Sample data loaded at startup (path or http(s) URL)
    #[arg(long, env = "CASE_DASH_SAMPLE", default_value = "sample-data.csv")]
    sample: String,

    /// Skip loading the sample data
    #[arg(long, default_value = "false")]
    no_sample: bool,

    /// CSV file to upload after the sample has loaded
    #[arg(short, long, value_name = "FILE")]
    upload: Option<PathBuf>,

    /// Declared media type of the upload (guessed from the extension if omitted)
    #[arg(long)]
    content_type: Option<String>,

    /// Number of rows in the top cases table (at most 1000)
    #[arg(long, default_value = "10")]
    case_limit: String,

    /// Number of rows in the top advocates table (at most 100)
    #[arg(long, default_value = "10")]
    advocate_limit: String,

    /// CSV field delimiter
    #[arg(long, default_value = ",")]
    delimiter: char,
}

#[derive(Args, Debug)]
struct DashboardArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[arg(short, long, env = "CASE_DASH_OUTPUT", default_value = "dist")]
    output_dir: PathBuf,

    #[arg(short, long, default_value = "Legal Case Dashboard")]
    title: String,

    #[arg(long, value_enum, default_value_t = ChartStyle::Chartjs)]
    style: ChartStyle,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[arg(short, long, default_value = "Legal Case Dashboard")]
    title: String,

    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Dashboard(args) => dashboard_command(args),
        Commands::Summary(args) => summary_command(args),
    }
}

fn dashboard_command(args: DashboardArgs) -> Result<()> {
    info!("Building case dashboard");

    validation::validate_dir_writable(&args.output_dir, "Output directory")?;
    let (state, notification) = build_state(&args.source)?;

    let mut presenter = HtmlPresenter::new(DashboardConfig {
        output_dir: args.output_dir.clone(),
        style: args.style,
    });
    render(&mut presenter, &args.title, &state, notification.as_ref())?;

    info!("Dashboard written to {}", presenter.index_path().display());
    Ok(())
}

fn summary_command(args: SummaryArgs) -> Result<()> {
    let (state, notification) = build_state(&args.source)?;

    let mut presenter = TerminalPresenter::new(std::io::stdout().lock(), args.format);
    render(&mut presenter, &args.title, &state, notification.as_ref())
}

fn render<P: Presenter>(
    presenter: &mut P,
    title: &str,
    state: &DashboardState,
    notification: Option<&Notification>,
) -> Result<()> {
    let ctx = RenderContext::for_state(title, state, notification);
    redraw(presenter, state.views(), &ctx).with_context(|| "Failed to render dashboard")?;
    Ok(())
}

/// Replay the startup events: limits, the sample load, then the upload.
///
/// Returns the state and the most recent notification.
fn build_state(args: &SourceArgs) -> Result<(DashboardState, Option<Notification>)> {
    let delimiter = validation::validate_delimiter(args.delimiter)?;
    let mut state = DashboardState::new().with_decoder(CsvDecoder::new().with_delimiter(delimiter));
    let mut notification = None;

    for (table, raw) in [
        (RankingTable::Cases, &args.case_limit),
        (RankingTable::Advocates, &args.advocate_limit),
    ] {
        let outcome = state.handle(Event::LimitChanged {
            table,
            raw: raw.clone(),
        });
        report_outcome(&outcome, &mut notification);
    }
    debug!("Table limits: {:?}", state.limits());

    if args.no_sample {
        debug!("Skipping sample data");
    } else {
        let ticket = state.begin_load();
        info!("Loading sample data from {}", args.sample);

        // An unusable location is reported like any other unreadable source
        let (label, content) = match Source::parse(&args.sample) {
            Ok(source) => (source.to_string(), source.fetch()),
            Err(e) => (
                args.sample.clone(),
                Err(case_dash_core::Error::SourceUnavailable {
                    source_name: args.sample.clone(),
                    reason: e.to_string(),
                }),
            ),
        };

        let outcome = state.handle(Event::DataLoaded {
            ticket,
            source: label,
            content,
        });
        report_outcome(&outcome, &mut notification);
    }

    if let Some(ref path) = args.upload {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let content_type = args
            .content_type
            .clone()
            .unwrap_or_else(|| content_type_for(&file_name).to_string());
        info!("Uploading {} ({})", file_name, content_type);

        let ticket = state.begin_load();
        let outcome = state.handle(Event::UploadSelected {
            ticket,
            upload: Upload::new(file_name, content_type),
            read: Box::new(|| source::read_text(path)),
        });
        report_outcome(&outcome, &mut notification);
    }

    if let Some(snapshot) = state.snapshot() {
        info!(
            "Loaded {} rows from {} ({} warnings)",
            snapshot.rows.len(),
            snapshot.source,
            snapshot.warnings.len()
        );
        for warning in &snapshot.warnings {
            warn!("CSV parsing warning: {}", warning);
        }
    }

    Ok((state, notification))
}

/// Log an event outcome and keep its notification if it raised one
fn report_outcome(outcome: &Outcome, latest: &mut Option<Notification>) {
    if outcome.stale {
        warn!("A load finished after a newer one and replaced its data");
    }

    if let Some(ref notification) = outcome.notification {
        match notification.level {
            NotificationLevel::Error => match outcome.error {
                Some(ref cause) => error!("{}: {}", notification.message, cause),
                None => error!("{}", notification.message),
            },
            NotificationLevel::Success => info!("{}", notification.message),
        }
        *latest = Some(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const CSV: &str = "Sr. No.,PARTY1,PARTY2,CASE VALUE,TRANSFEREE COURT,CASE YEAR,ADVOCATE,NEXT DATE BY HIGH COURT
1,Acme Ltd,State,\"2,50,00,000\",Delhi,2019,R. Sharma,2024-03-11
2,Bharat Mills,Union,5000,Mumbai,2020,P. Iyer,
3,Crest Foods,State,700,Delhi,2020,R. Sharma,
";

    fn source_args(sample: &str) -> SourceArgs {
        SourceArgs {
            sample: sample.to_string(),
            no_sample: false,
            upload: None,
            content_type: None,
            case_limit: "10".to_string(),
            advocate_limit: "10".to_string(),
            delimiter: ',',
        }
    }

    #[test]
    fn test_cli_parses_dashboard_args() {
        let cli = Cli::try_parse_from([
            "case-dash",
            "dashboard",
            "--sample",
            "cases.csv",
            "--case-limit",
            "25",
            "--style",
            "bars",
        ])
        .unwrap();

        match cli.command {
            Commands::Dashboard(args) => {
                assert_eq!(args.source.sample, "cases.csv");
                assert_eq!(args.source.case_limit, "25");
                assert_eq!(args.style, ChartStyle::Bars);
            }
            _ => panic!("expected dashboard command"),
        }
    }

    #[test]
    fn test_build_state_from_sample() {
        let dir = TempDir::new().unwrap();
        let sample = dir.path().join("sample-data.csv");
        std::fs::write(&sample, CSV).unwrap();

        let mut args = source_args(sample.to_str().unwrap());
        args.case_limit = "2".to_string();
        let (state, notification) = build_state(&args).unwrap();

        assert!(notification.is_none());
        let views = state.views().unwrap();
        assert_eq!(views.summary.total, 3);
        assert_eq!(views.top_cases.len(), 2);
        assert_eq!(views.top_advocates[0].key, "R. Sharma");
    }

    #[test]
    fn test_build_state_missing_sample() {
        let dir = TempDir::new().unwrap();
        let args = source_args(dir.path().join("missing.csv").to_str().unwrap());

        let (state, notification) = build_state(&args).unwrap();

        assert!(!state.is_loaded());
        assert_eq!(notification.unwrap().message, "Error loading sample data.");
    }

    #[test]
    fn test_build_state_upload_replaces_sample() {
        let dir = TempDir::new().unwrap();
        let sample = dir.path().join("sample-data.csv");
        let upload = dir.path().join("cases.csv");
        std::fs::write(&sample, CSV).unwrap();
        std::fs::write(&upload, "CASE VALUE,TRANSFEREE COURT\n100,Chennai\n").unwrap();

        let mut args = source_args(sample.to_str().unwrap());
        args.upload = Some(upload);
        let (state, notification) = build_state(&args).unwrap();

        let notification = notification.unwrap();
        assert_eq!(notification.level, NotificationLevel::Success);
        assert_eq!(state.snapshot().unwrap().source, "cases.csv");
        assert_eq!(state.views().unwrap().summary.total, 1);
    }

    #[test]
    fn test_build_state_rejects_non_csv_upload() {
        let dir = TempDir::new().unwrap();
        let sample = dir.path().join("sample-data.csv");
        let upload = dir.path().join("cases.xlsx");
        std::fs::write(&sample, CSV).unwrap();
        std::fs::write(&upload, "not really a spreadsheet").unwrap();

        let mut args = source_args(sample.to_str().unwrap());
        args.upload = Some(upload);
        let (state, notification) = build_state(&args).unwrap();

        assert_eq!(notification.unwrap().message, "Please select a valid CSV file.");
        assert_eq!(state.views().unwrap().summary.total, 3);
    }

    #[test]
    fn test_build_state_unparsable_sample_location() {
        let (state, notification) = build_state(&source_args("http://")).unwrap();

        assert!(!state.is_loaded());
        let notification = notification.unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(notification.message, "Error loading sample data.");
    }

    #[test]
    fn test_build_state_missing_upload_keeps_sample() {
        let dir = TempDir::new().unwrap();
        let sample = dir.path().join("sample-data.csv");
        std::fs::write(&sample, CSV).unwrap();

        let mut args = source_args(sample.to_str().unwrap());
        args.upload = Some(dir.path().join("missing.csv"));
        let (state, notification) = build_state(&args).unwrap();

        assert_eq!(notification.unwrap().message, "Error parsing uploaded file.");
        assert_eq!(state.views().unwrap().summary.total, 3);
    }

    #[test]
    fn test_build_state_missing_upload_with_wrong_type() {
        let dir = TempDir::new().unwrap();
        let mut args = source_args("unused.csv");
        args.no_sample = true;
        args.upload = Some(dir.path().join("missing.xlsx"));

        let (state, notification) = build_state(&args).unwrap();

        // the declared type is rejected before any read is attempted
        assert_eq!(notification.unwrap().message, "Please select a valid CSV file.");
        assert!(!state.is_loaded());
    }

    #[test]
    fn test_build_state_rejects_bad_delimiter() {
        let mut args = source_args("sample-data.csv");
        args.no_sample = true;
        args.delimiter = '"';

        assert!(build_state(&args).is_err());
    }
}
