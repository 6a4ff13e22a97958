//! retailboard - Retail sales analytics dashboard

mod cli;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use retailboard_core::{compute, AnalyticsConfig, DataStore, RetailboardConfig, Section};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "retailboard",
    version,
    about = "Retail sales analytics dashboard",
    long_about = "Computes decision-ready metrics from a retail SQLite database.\n\
                  \n\
                  Reads the inventory table and its analytic views (category_performance,\n\
                  store_performance, top_sellers, revenue_curve, performance_ranked, ...)\n\
                  and prints ranked tables, seasonal variance, Pareto concentration and\n\
                  performance cohorts.\n\
                  \n\
                  Examples:\n\
                    retailboard category                # Market share by category\n\
                    retailboard products --top 10       # Top sellers + price elasticity\n\
                    retailboard pareto --fraction 0.1   # Revenue share of the top 10%\n\
                    retailboard --json performance      # Star products as JSON\n\
                  \n\
                  Environment Variables:\n\
                    RETAILBOARD_CONFIG               # Config file path\n\
                    RETAILBOARD_DB                   # Database path (overrides config)\n\
                    RETAILBOARD_JSON                 # Emit JSON instead of tables\n\
                    RETAILBOARD_NO_COLOR             # Disable ANSI colors\n\
                    RUST_LOG                         # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (default: <config dir>/retailboard/config.toml)
    #[arg(long, env = "RETAILBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database path
    #[arg(long, env = "RETAILBOARD_DB")]
    db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, env = "RETAILBOARD_JSON")]
    json: bool,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, env = "RETAILBOARD_NO_COLOR")]
    no_color: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Revenue share by category
    Category,
    /// Store revenue vs the average store
    Store,
    /// Top products, price elasticity and high-risk revenue
    Products {
        /// Products per top list
        #[arg(long, short = 'n')]
        top: Option<usize>,
    },
    /// Seasonal demand variance per category
    Seasonal,
    /// Revenue concentration (80/20 check)
    Pareto {
        /// Top fraction of products to check, in (0, 1]
        #[arg(long, short = 'f')]
        fraction: Option<f64>,
    },
    /// Star products and underperformers by quartile
    Performance {
        /// Maximum products per cohort
        #[arg(long)]
        cap: Option<usize>,
    },
    /// Row counts of every upstream view
    Overview,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = load_config(cli.config.as_ref())?;
    if let Some(db) = cli.db {
        config.store.database_path = db;
    }

    let section = match cli.command {
        Command::Overview => None,
        Command::Category => Some(Section::CategoryAnalytics),
        Command::Store => Some(Section::StoreAnalytics),
        Command::Products { top } => {
            if let Some(top) = top {
                config.analytics.top_n = top;
            }
            Some(Section::ProductPerformance)
        }
        Command::Seasonal => Some(Section::SeasonalGrowth),
        Command::Pareto { fraction } => {
            if let Some(fraction) = fraction {
                config.analytics.pareto_fraction = fraction;
            }
            Some(Section::Pareto)
        }
        Command::Performance { cap } => {
            if let Some(cap) = cap {
                config.analytics.cohort_cap = cap;
            }
            Some(Section::PerformanceRanking)
        }
    };
    config.validate().context("Invalid options")?;

    let store = DataStore::new(config.store.clone());
    match section {
        Some(section) => run_section(&store, section, &config.analytics, cli.json, cli.no_color),
        None => run_overview(&store, cli.json, cli.no_color),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(explicit: Option<&PathBuf>) -> Result<RetailboardConfig> {
    let path = explicit.cloned().or_else(|| {
        dirs::config_dir().map(|dir: PathBuf| dir.join("retailboard").join("config.toml"))
    });

    match path {
        Some(path) => RetailboardConfig::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            tracing::debug!("No config directory, using defaults");
            Ok(RetailboardConfig::default())
        }
    }
}

fn run_section(
    store: &DataStore,
    section: Section,
    options: &AnalyticsConfig,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let start = Instant::now();
    let spinner = if json {
        None
    } else {
        Some(spinner(format!("Loading {} data...", section))?)
    };

    let result = store
        .load_section(section)
        .and_then(|input| compute(&input, options));

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    tracing::info!(
        section = %section,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Section ready"
    );

    match result {
        Ok(report) => println!("{}", cli::format_report(&report, json, no_color)),
        Err(e) if e.is_empty_input() => println!("{}", cli::format_no_data(section, json)),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to compute {} section", section));
        }
    }

    Ok(())
}

fn run_overview(store: &DataStore, json: bool, no_color: bool) -> Result<()> {
    let spinner = if json {
        None
    } else {
        Some(spinner("Counting view rows...".to_string())?)
    };

    let counts = store.view_counts();
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let counts = counts.context("Failed to count view rows")?;
    println!("{}", cli::format_overview(&counts, json, no_color));
    Ok(())
}

fn spinner(message: String) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid spinner template")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message);
    Ok(spinner)
}
