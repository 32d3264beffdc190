mod report;
mod stats;
mod tui;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::Parser;
use miernik_core::{
    aggregate_categories, aggregate_monthly, check_path, export_to_dir, parse_months, Config,
    DatePolicy, MonthSelection, RecordSource, WorkbookSource,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "miernik")]
#[command(about = "Budget-meter spreadsheet analyzer", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (falls back to $MIERNIK_CONFIG, then ~/.miernik/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args)]
struct MonthArgs {
    /// Months to include, e.g. "1,3,5-7" or "sty,lut"
    #[arg(short, long, conflicts_with = "all_months")]
    months: Option<String>,

    /// Include all twelve months
    #[arg(short = 'a', long)]
    all_months: bool,

    /// Abort on rows whose date cannot be parsed
    #[arg(long)]
    strict_dates: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Check file type and size without reading the content
    Check { file: PathBuf },
    /// Aggregate people and actions by program for the selected months
    Summary {
        file: PathBuf,
        #[command(flatten)]
        months: MonthArgs,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Break the whole file down into the five main categories
    Categories {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Write the summary workbook
    Export {
        file: PathBuf,
        #[command(flatten)]
        months: MonthArgs,
        /// Output directory (defaults to config export_dir, then the current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Chart people per main category
    Stats { file: PathBuf },
    /// Open the Terminal User Interface
    Tui { file: Option<PathBuf> },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "miernik=info,miernik_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_months(args: &MonthArgs) -> Result<MonthSelection> {
    if args.all_months {
        return Ok(MonthSelection::all());
    }
    match &args.months {
        Some(list) => parse_months(list),
        None => Err(anyhow!("Choose months with --months or --all-months")),
    }
}

fn date_policy(config: &Config, args: &MonthArgs) -> DatePolicy {
    if args.strict_dates {
        DatePolicy::Strict
    } else {
        config.date_policy
    }
}

fn load(file: &Path) -> Result<Vec<miernik_core::RawRecord>> {
    WorkbookSource::new(file)
        .load()
        .with_context(|| format!("Failed to load {}", file.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Full-screen commands own the terminal, so they run without a log subscriber.
    if !matches!(cli.command, None | Some(Commands::Tui { .. }) | Some(Commands::Stats { .. })) {
        init_tracing();
    }

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Some(Commands::Check { file }) => {
            check_path(&file).with_context(|| format!("{} rejected", file.display()))?;
            println!("OK: {}", file.display());
        }
        Some(Commands::Summary { file, months, json }) => {
            let selection = resolve_months(&months)?;
            let records = load(&file)?;
            let aggregate = aggregate_monthly(
                &records,
                &selection,
                &config.columns,
                date_policy(&config, &months),
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&aggregate)?);
            } else {
                report::show_summary(&aggregate);
            }
        }
        Some(Commands::Categories { file, json }) => {
            let records = load(&file)?;
            let categories = aggregate_categories(&records, &config.columns)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&categories)?);
            } else {
                report::show_categories(&categories);
            }
        }
        Some(Commands::Export { file, months, out }) => {
            let selection = resolve_months(&months)?;
            let records = load(&file)?;
            let aggregate = aggregate_monthly(
                &records,
                &selection,
                &config.columns,
                date_policy(&config, &months),
            )?;
            let dir = out
                .or_else(|| config.export_dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));
            let path = export_to_dir(&aggregate, &dir, Local::now().date_naive())?;
            info!(rows = records.len(), "export done");
            println!("Zapisano: {}", path.display());
        }
        Some(Commands::Stats { file }) => {
            let records = load(&file)?;
            let categories = aggregate_categories(&records, &config.columns)?;
            stats::run(&categories)?;
        }
        Some(Commands::Tui { file }) => {
            tui::run(config, file)?;
        }
        None => {
            tui::run(config, None)?;
        }
    }
    Ok(())
}
