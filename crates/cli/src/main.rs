//! # ordermerge-cli
//!
//! Command-line front end: merges order summary spreadsheets into one report.

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use ordermerge_core::{
    ensure_writable, merge, parse_decimal, JsonFileRateProvider, MergeConfig, MergeResult,
    RateTable,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// ordermerge - merge order summary spreadsheets into one report
#[derive(Parser)]
#[command(name = "ordermerge")]
#[command(author, version, about = "Merge order summary spreadsheets", long_about = None)]
struct Cli {
    /// Order summary files (.xlsx, .xls, .ods)
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Discount on total sales, in percent (`,` accepted as decimal point)
    #[arg(short, long, value_name = "PCT")]
    discount: Option<String>,

    /// Exchange rate in local units per foreign unit (CODE=RATE)
    #[arg(short, long = "rate", value_name = "CODE=RATE")]
    rates: Vec<String>,

    /// Saved rate provider response to refresh rates from
    #[arg(long, value_name = "FILE")]
    rates_json: Option<PathBuf>,

    /// Directory the report is written to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Hide the DATE / RFQ REF / QTN REF block of each order
    #[arg(long)]
    no_header_info: bool,

    /// Extract input files in parallel
    #[arg(long)]
    parallel: bool,

    /// Output format (table, json)
    #[arg(short = 'f', long = "format", default_value = "table")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output format for the run summary.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable summary (default)
    #[default]
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    if cli.files.is_empty() {
        // No inputs - show help
        Cli::parse_from(["ordermerge", "--help"]);
        return Ok(());
    }

    let config = load_config(&cli)?;
    let mut rates = config.rate_table().context("Invalid exchange rates")?;
    if let Some(path) = &cli.rates_json {
        if let Err(e) = rates.refresh_from(&JsonFileRateProvider::new(path)) {
            eprintln!("{} {e}; keeping configured rates", "Warning:".yellow().bold());
        }
    }

    let output_dir = output_dir(&cli, &config);
    ensure_writable(&output_dir)
        .with_context(|| format!("Cannot write to {}", output_dir.display()))?;

    let result = merge(&cli.files, config.discount_pct, &rates, &config.merge_options());
    let written = result
        .write_to_dir(&output_dir, Local::now().date_naive())
        .context("Failed to write merged report")?;

    match cli.format {
        OutputFormat::Table => print_table(&result, &written, config.discount_pct, &rates),
        OutputFormat::Json => print_json(&result, &written)?,
    }
    Ok(())
}

/// Configuration file (or defaults) with command-line overrides applied.
fn load_config(cli: &Cli) -> Result<MergeConfig> {
    let mut config = match &cli.config {
        Some(path) => MergeConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => MergeConfig::default(),
    };

    if let Some(discount) = &cli.discount {
        config.discount_pct = parse_decimal(discount)
            .with_context(|| format!("Invalid discount: '{discount}'"))?;
    }
    for rate in &cli.rates {
        let (code, value) = parse_rate_arg(rate)?;
        config.set_rate(&code, value);
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = Some(dir.clone());
    }
    if cli.no_header_info {
        config.show_header_info = false;
    }
    if cli.parallel {
        config.parallel = true;
    }

    config.validate()?;
    Ok(config)
}

/// Parse a `CODE=RATE` argument.
fn parse_rate_arg(arg: &str) -> Result<(String, f64)> {
    let (code, value) = arg
        .split_once('=')
        .with_context(|| format!("Invalid rate format: '{arg}'. Expected CODE=RATE format"))?;
    let code = code.trim();
    if code.is_empty() {
        bail!("Invalid rate format: '{arg}'. Currency code is empty");
    }
    let value = parse_decimal(value).with_context(|| format!("Invalid rate value: '{arg}'"))?;
    Ok((code.to_string(), value))
}

/// Configured output directory, else the first input's directory.
fn output_dir(cli: &Cli, config: &MergeConfig) -> PathBuf {
    config.output_dir.clone().unwrap_or_else(|| {
        cli.files
            .first()
            .and_then(|file| file.parent())
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

fn print_table(result: &MergeResult, written: &Path, discount_pct: f64, rates: &RateTable) {
    for status in &result.statuses {
        let name = file_label(&status.path);
        match &status.outcome {
            Ok(count) => println!("  {name}  {}", format!("{count} items").green()),
            Err(e) => println!("  {name}  {} ({e})", "unreadable".yellow()),
        }
    }

    println!();
    println!("{} {}", "Written:".green().bold(), written.display());
    println!(
        "{} orders, {} items{}",
        result.documents,
        result.total_items,
        if discount_pct > 0.0 {
            format!(", discount %{discount_pct}")
        } else {
            String::new()
        }
    );

    let rate_line: Vec<String> = rates
        .iter()
        .map(|(code, rate)| format!("{code}={rate}"))
        .collect();
    println!("{} {}", "Rates:".cyan(), rate_line.join(" "));

    if let Some(totals) = result.report.totals() {
        println!("  {:<22}{:>14.2}", "TOPLAM SATIŞ", totals.total_sales);
        println!("  {:<22}{:>14.2}", "TOPLAM ALIŞ", totals.total_cost);
        if totals.discount > 0.0 {
            println!("  {:<22}{:>14.2}", "İNDİRİM", totals.discount);
            println!("  {:<22}{:>14.2}", "FİNAL SATIŞ TUTARI", totals.final_sales);
        }
        let profit = format!("{:>14.2}", totals.profit);
        let profit = if totals.profit < 0.0 { profit.red() } else { profit.green() };
        println!("  {:<22}{}", "KÂR / ZARAR", profit.bold());
    } else {
        println!("{}", "No readable orders; report has no grand summary".yellow());
    }
}

fn print_json(result: &MergeResult, written: &Path) -> Result<()> {
    let files: Vec<serde_json::Value> = result
        .statuses
        .iter()
        .map(|status| match &status.outcome {
            Ok(count) => serde_json::json!({
                "file": status.path.display().to_string(),
                "items": count,
            }),
            Err(e) => serde_json::json!({
                "file": status.path.display().to_string(),
                "error": e.to_string(),
            }),
        })
        .collect();

    let totals = result.report.totals().map(|t| {
        serde_json::json!({
            "total_sales": t.total_sales,
            "total_cost": t.total_cost,
            "discount": t.discount,
            "final_sales": t.final_sales,
            "profit": t.profit,
        })
    });

    let summary = serde_json::json!({
        "output": written.display().to_string(),
        "documents": result.documents,
        "total_items": result.total_items,
        "vessels": result.vessel_names,
        "files": files,
        "totals": totals,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
