//! sbom-guard: SBOM diff, drift detection, and policy validation tool.

#![allow(clippy::needless_pass_by_value)]

use clap::{Parser, Subcommand};
use sbom_guard::cli::{self, OutputFormat};
use sbom_guard::drift::DriftOptions;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sbom-guard")]
#[command(version)]
#[command(about = "SBOM diff, drift detection, and policy validation", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Check passed / no gated changes
    1  Drift detected, policy failed, or changes with --fail-on-change
    2  Error occurred (unreadable file, malformed document, invalid policy)

EXAMPLES:
    # Diff two SBOMs
    sbom-guard diff old.cdx.json new.cdx.json

    # Save a baseline, then check for drift in CI
    sbom-guard baseline save sbom.json --name release-1.2 --label v1.2.0
    sbom-guard drift sbom.json --baseline release-1.2 --allow-upgrades

    # Validate against a policy rule set
    sbom-guard validate sbom.json --policy policy.yaml --fail-on-warning")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two SBOM files
    Diff(DiffArgs),

    /// Manage stored baselines
    #[command(subcommand)]
    Baseline(BaselineAction),

    /// Check an SBOM for drift against a stored baseline
    Drift(DriftArgs),

    /// Validate an SBOM against a policy rule set
    Validate(ValidateArgs),
}

/// Arguments for the `diff` subcommand
#[derive(Parser)]
struct DiffArgs {
    /// Path to the old/baseline SBOM
    old: PathBuf,

    /// Path to the new SBOM
    new: PathBuf,

    /// Include unchanged components in the result
    #[arg(long)]
    show_unchanged: bool,

    /// Skip license comparison entirely
    #[arg(long)]
    ignore_licenses: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    output: OutputFormat,

    /// Exit with code 1 if any changes are detected
    #[arg(long)]
    fail_on_change: bool,
}

/// Actions for the `baseline` subcommand
#[derive(Subcommand)]
enum BaselineAction {
    /// Save an SBOM as a named baseline (overwrites an existing one)
    Save {
        /// Path to the SBOM to snapshot
        sbom: PathBuf,

        /// Baseline name
        #[arg(long, default_value = "default")]
        name: String,

        /// Free-form version label (e.g. a release tag)
        #[arg(long, default_value = "")]
        label: String,

        /// Human-readable description
        #[arg(long, default_value = "")]
        description: String,

        /// Baseline storage directory
        #[arg(long, env = "SBOM_GUARD_BASELINE_DIR", default_value = ".sbom-baselines")]
        dir: PathBuf,
    },

    /// List stored baselines
    List {
        /// Baseline storage directory
        #[arg(long, env = "SBOM_GUARD_BASELINE_DIR", default_value = ".sbom-baselines")]
        dir: PathBuf,
    },

    /// Delete a stored baseline
    Delete {
        /// Baseline name
        name: String,

        /// Baseline storage directory
        #[arg(long, env = "SBOM_GUARD_BASELINE_DIR", default_value = ".sbom-baselines")]
        dir: PathBuf,
    },
}

/// Arguments for the `drift` subcommand
#[derive(Parser)]
struct DriftArgs {
    /// Path to the current SBOM
    sbom: PathBuf,

    /// Baseline name to compare against
    #[arg(long, default_value = "default")]
    baseline: String,

    /// Baseline storage directory
    #[arg(long, env = "SBOM_GUARD_BASELINE_DIR", default_value = ".sbom-baselines")]
    dir: PathBuf,

    /// Component pattern allowed to be added (repeatable; `*` wildcards at
    /// the ends only)
    #[arg(long = "allow-addition", value_name = "PATTERN")]
    allowed_additions: Vec<String>,

    /// Component pattern allowed to be removed (repeatable)
    #[arg(long = "allow-removal", value_name = "PATTERN")]
    allowed_removals: Vec<String>,

    /// Allow version upgrades
    #[arg(long)]
    allow_upgrades: bool,

    /// Allow version downgrades
    #[arg(long)]
    allow_downgrades: bool,

    /// Allow license changes (also hides them from the diff)
    #[arg(long)]
    allow_license_changes: bool,

    /// Fail on any change from the baseline, even otherwise-allowed ones
    #[arg(long)]
    strict: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    output: OutputFormat,
}

/// Arguments for the `validate` subcommand
#[derive(Parser)]
struct ValidateArgs {
    /// Path to the SBOM to validate
    sbom: PathBuf,

    /// Path to the policy YAML file
    #[arg(short, long)]
    policy: PathBuf,

    /// Also fail the result on warning-severity violations
    #[arg(long)]
    fail_on_warning: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    output: OutputFormat,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(cli.command) {
        eprintln!("Error: {err:#}");
        std::process::exit(2);
    }
}

/// Dispatch to command handlers
fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Diff(args) => cli::run_diff(
            args.old,
            args.new,
            args.show_unchanged,
            args.ignore_licenses,
            args.output,
            args.fail_on_change,
        ),

        Commands::Baseline(action) => match action {
            BaselineAction::Save {
                sbom,
                name,
                label,
                description,
                dir,
            } => cli::run_baseline_save(sbom, name, label, description, dir),
            BaselineAction::List { dir } => cli::run_baseline_list(dir),
            BaselineAction::Delete { name, dir } => cli::run_baseline_delete(name, dir),
        },

        Commands::Drift(args) => {
            let options = DriftOptions {
                allowed_additions: args.allowed_additions,
                allowed_removals: args.allowed_removals,
                allow_upgrades: args.allow_upgrades,
                allow_downgrades: args.allow_downgrades,
                allow_license_changes: args.allow_license_changes,
                strict_mode: args.strict,
            };
            cli::run_drift(args.sbom, args.baseline, args.dir, options, args.output)
        }

        Commands::Validate(args) => {
            cli::run_validate(args.sbom, args.policy, args.fail_on_warning, args.output)
        }
    }
}
