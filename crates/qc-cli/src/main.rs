mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{assign::AssignSubcommand, config::ConfigSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "qc",
    about = "QC compliance scheduling: due periods, missed checks, and escalation",
    version,
    propagate_version = true
)]
struct Cli {
    /// Facility root (default: auto-detect from .qc/)
    #[arg(long, global = true, env = "QC_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Evaluate as of this date (YYYY-MM-DD) instead of the system date
    #[arg(long, global = true, env = "QC_TODAY")]
    today: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize QC tracking in the current directory
    Init {
        /// Facility name (default: directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Manage worksheet assignments
    Assign {
        #[command(subcommand)]
        subcommand: AssignSubcommand,
    },

    /// Record a performed QC run
    Complete {
        machine: String,
        worksheet: String,
        /// Date performed (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Who performed it
        #[arg(long)]
        by: Option<String>,
    },

    /// List the due periods of a schedule
    Periods {
        frequency: String,
        start: String,
        /// Last date to generate through (default: today + lookahead)
        #[arg(long)]
        end: Option<String>,
    },

    /// Show the compliance status of one assignment
    Status { machine: String, worksheet: String },

    /// List missed periods of one assignment with their priority
    Missed { machine: String, worksheet: String },

    /// Facility-wide overdue report, most overdue first
    Overdue {
        /// Only critical items
        #[arg(long)]
        critical: bool,
        /// Only items for this machine
        #[arg(long)]
        machine: Option<String>,
    },

    /// Assignments due in their current period
    Due,

    /// Classify a days-overdue count for a frequency
    Classify {
        #[arg(allow_negative_numbers = true)]
        days: i64,
        frequency: String,
    },

    /// Inspect and validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let today = cli.today.as_deref();

    let result = match cli.command {
        Commands::Init { name } => cmd::init::run(&root, name.as_deref()),
        Commands::Assign { subcommand } => cmd::assign::run(&root, subcommand, cli.json),
        Commands::Complete {
            machine,
            worksheet,
            date,
            by,
        } => cmd::complete::run(
            &root,
            &machine,
            &worksheet,
            date.as_deref(),
            by.as_deref(),
            today,
            cli.json,
        ),
        Commands::Periods {
            frequency,
            start,
            end,
        } => cmd::periods::run(&root, &frequency, &start, end.as_deref(), today, cli.json),
        Commands::Status { machine, worksheet } => {
            cmd::status::run(&root, &machine, &worksheet, today, cli.json)
        }
        Commands::Missed { machine, worksheet } => {
            cmd::missed::run(&root, &machine, &worksheet, today, cli.json)
        }
        Commands::Overdue { critical, machine } => {
            cmd::overdue::run(&root, critical, machine.as_deref(), today, cli.json)
        }
        Commands::Due => cmd::due::run(&root, today, cli.json),
        Commands::Classify { days, frequency } => {
            cmd::classify::run(&root, days, &frequency, cli.json)
        }
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
