//! Command-line driver for bulletin download and report generation.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use bulletin_engine::collect;
use bulletin_fetch::{BulletinFetcher, DirSource};
use bulletin_pdf::PdfDecoder;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "aqi",
    about = "Fetch daily AQI bulletins and compile a city's readings"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download bulletins for a date range into the cache directory
    Download(DownloadArgs),
    /// Scan bulletins for a city and write a spreadsheet report
    Report(ReportArgs),
}

#[derive(Args)]
struct DownloadArgs {
    /// First bulletin date (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,

    /// Last bulletin date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    end: NaiveDate,

    /// Directory bulletins are cached in
    #[arg(long, default_value = "aqi_bulletins")]
    dir: PathBuf,

    /// Bulletin portal base URL
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(Args)]
struct ReportArgs {
    /// City to scan for
    #[arg(long)]
    city: String,

    /// First bulletin date (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,

    /// Last bulletin date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    end: NaiveDate,

    /// Directory bulletins are cached in
    #[arg(long, default_value = "aqi_bulletins")]
    dir: PathBuf,

    /// Output spreadsheet path (default: <city>_AQI_<start>_to_<end>.xlsx)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Scan the cache directory only, without downloading
    #[arg(long)]
    offline: bool,

    /// Bulletin portal base URL
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Download(args) => download(args).await,
        Command::Report(args) => report(args).await,
    }
}

async fn download(args: DownloadArgs) -> Result<()> {
    check_range(args.start, args.end)?;
    let fetcher = build_fetcher(&args.dir, args.base_url)?;

    let summary = fetcher.download_range(args.start, args.end).await;
    println!(
        "Fetched {} bulletins, {} unavailable. Files saved in {}",
        summary.fetched,
        summary.skipped,
        args.dir.display()
    );
    Ok(())
}

async fn report(args: ReportArgs) -> Result<()> {
    check_range(args.start, args.end)?;
    let city = args.city.trim();
    if city.is_empty() {
        bail!("city name is required");
    }

    let decoder = PdfDecoder::new();
    let records = if args.offline {
        let source = DirSource::new(&args.dir);
        collect(city, args.start, args.end, &source, &decoder).await
    } else {
        let fetcher = build_fetcher(&args.dir, args.base_url)?;
        let summary = fetcher.download_range(args.start, args.end).await;
        info!(fetched = summary.fetched, skipped = summary.skipped, "bulletin range ready");
        collect(city, args.start, args.end, &fetcher, &decoder).await
    };

    if records.is_empty() {
        bail!(
            "no data found for {} between {} and {}",
            city,
            args.start,
            args.end
        );
    }

    let out = args.out.unwrap_or_else(|| {
        PathBuf::from(format!("{}_AQI_{}_to_{}.xlsx", city, args.start, args.end))
    });
    report_xlsx::write_report(&out, &records, city, args.start, args.end)?;

    println!("{} records written to {}", records.len(), out.display());
    Ok(())
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        bail!("end date must not be before start date");
    }
    Ok(())
}

fn build_fetcher(dir: &Path, base_url: Option<String>) -> Result<BulletinFetcher> {
    let mut fetcher = BulletinFetcher::new(dir)?;
    if let Some(base_url) = base_url {
        fetcher = fetcher.with_base_url(base_url);
    }
    Ok(fetcher)
}
