mod cli;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands, FetchArgs};
use report_dl::page_counter::count_pages;
use report_dl::{BatchSummary, Config, PageCountReport, RecordOutcome, ReportPipeline, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Fetch(ref args) => fetch(args).await,
        Commands::CountPages {
            ref dir,
            ref config,
            json,
        } => count(dir.as_deref(), config.as_deref(), json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.error_code(), error = %e, "report-dl failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Ok(Config::default()),
    }
}

async fn fetch(args: &FetchArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    args.apply(&mut config);

    let summary = ReportPipeline::new(config)?.run().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn count(dir: Option<&Path>, config: Option<&Path>, json: bool) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => load_config(config)?.count_dir,
    };

    let report = count_pages(&dir);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_page_counts(&report);
    }
    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    for record in &summary.records {
        let status = match &record.outcome {
            RecordOutcome::Downloaded { path, .. } => format!("saved {}", path.display()),
            RecordOutcome::NoPdf => "no pdf".to_string(),
            RecordOutcome::Skipped { reason } => format!("skipped: {reason}"),
            RecordOutcome::Failed { message, .. } => format!("failed: {message}"),
        };
        println!("[page {}] {}: {status}", record.page_no, record.title);
    }
    for page in &summary.failed_pages {
        println!("[page {}] list request failed: {}", page.page_no, page.message);
    }
    println!(
        "Downloaded {}, no PDF {}, skipped {}, failed {}, failed pages {}",
        summary.downloaded(),
        summary.no_pdf(),
        summary.skipped(),
        summary.failed(),
        summary.failed_pages.len()
    );
}

fn print_page_counts(report: &PageCountReport) {
    for file in &report.files {
        println!("{:>6}  {}", file.pages, file.path.display());
    }
    for skipped in &report.skipped {
        println!("{:>6}  {} (skipped: {})", "-", skipped.path.display(), skipped.reason);
    }
    println!("Total pages: {}", report.total);
}
