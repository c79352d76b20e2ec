//! docgap: Documentation Coverage Linter CLI

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use docgap::checker::{CoverageChecker, DiffRange};
use docgap::config::{parse_override_value, ConfigManager, CONFIG_FILENAME, FAIL_UNDER, MIN_QUALITY};
use docgap::reporter::{ConsoleReporter, JsonReporter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// docgap: find source files that lack adequate documentation
#[derive(Parser, Debug)]
#[command(name = "docgap")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Project root to analyze (default: current directory)
    path: Option<PathBuf>,

    /// Path to config file (default: .docgaprc.json in the project root)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output the report as JSON
    #[arg(long, short)]
    json: bool,

    /// Minimum coverage percentage (exit 1 if below)
    #[arg(long, value_name = "PCT")]
    fail_under: Option<f64>,

    /// Minimum quality score for a doc to count as adequate
    #[arg(long, value_name = "SCORE")]
    min_quality: Option<f64>,

    /// Override any config value by dotted path (value parsed as JSON, else string)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    overrides: Vec<(String, String)>,

    /// Only check files changed since this ref
    #[arg(long, requires = "head_ref", conflicts_with = "pr")]
    base_ref: Option<String>,

    /// Head ref of the diff range
    #[arg(long, requires = "base_ref", conflicts_with = "pr")]
    head_ref: Option<String>,

    /// Only check files changed in this PR (PR_BASE_REF...PR_HEAD_REF, default origin/main...HEAD)
    #[arg(long)]
    pr: bool,

    /// Quiet mode (one summary line)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (all gaps, info logging)
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .docgaprc.json with the default settings
    Init {
        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {:?}", raw)),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    if let Some(Commands::Init { dir, force }) = args.command {
        return run_init(dir.as_deref(), force);
    }

    let path = args.path.clone().unwrap_or_else(|| PathBuf::from("."));
    if !path.is_dir() {
        bail!("{} is not a directory", path.display());
    }
    let root = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", path.display()))?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| root.join(CONFIG_FILENAME));
    let mut manager = ConfigManager::load(&config_path);

    if let Some(pct) = args.fail_under {
        manager.set_threshold(FAIL_UNDER, serde_json::json!(pct))?;
    }
    if let Some(score) = args.min_quality {
        manager.set_threshold(MIN_QUALITY, serde_json::json!(score))?;
    }
    for (key, value) in &args.overrides {
        manager.set_threshold(key, parse_override_value(value))?;
    }

    let config = manager.build();
    let floor = config.minimum_coverage_percentage();
    info!("Analyzing {}", root.display());

    let checker = CoverageChecker::new(config, root);
    let report = match (&args.base_ref, &args.head_ref) {
        (Some(base), Some(head)) => checker.check_scoped(&DiffRange::new(base, head)),
        _ if args.pr => checker.check_scoped(&DiffRange::from_env()),
        _ => checker.check(),
    };

    if args.json {
        println!("{}", JsonReporter::new().pretty().report(&report));
    } else if args.quiet {
        ConsoleReporter::new().report_quiet(&report);
    } else {
        let reporter = if args.verbose {
            ConsoleReporter::new().verbose()
        } else {
            ConsoleReporter::new()
        };
        reporter.report(&report, floor);
    }

    if report.meets_threshold(floor) {
        return Ok(ExitCode::SUCCESS);
    }
    if !args.json {
        eprintln!(
            "{}: coverage {:.1}% is below the minimum {:.1}%",
            "Failed".red().bold(),
            report.coverage_percentage,
            floor
        );
    }
    Ok(ExitCode::from(1))
}

fn run_init(dir: Option<&Path>, force: bool) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        eprintln!(
            "{}: {} already exists; use --force to overwrite it",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    ConfigManager::defaults().save(&config_path)?;
    println!(
        "{}: Created {} with default settings",
        "Done".green().bold(),
        config_path.display()
    );
    Ok(ExitCode::SUCCESS)
}
