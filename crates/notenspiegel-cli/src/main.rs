mod commands;
mod output;

use clap::{Parser, Subcommand};
use notenspiegel_core::config::{load_config, SourceConfig};
use notenspiegel_core::error::NotenspiegelError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "notenspiegel",
    version,
    about = "Compare published ECTS grade distributions across cohorts"
)]
struct Cli {
    /// JSON config overriding host, marker, legacy semesters, ...
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the cohorts published on the index page
    Catalog {
        /// Index page to scrape (default: from config)
        #[arg(long, value_name = "URL")]
        index_url: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Check whether a location is on the trusted host
    Check {
        location: String,
    },
    /// Fetch and compare one or more cohorts
    Load {
        /// Document location(s), several joined by the separator token (default '$')
        input: String,

        /// Fetch with a small worker pool instead of one after another
        #[arg(long)]
        parallel: bool,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Extract the grade table from a local PDF (cohort taken from the file name)
    Parse {
        /// Path to an ECTS_Tab_*.pdf file
        pdf_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write parsed output to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "notenspiegel=debug"
    } else {
        "notenspiegel=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn run(cli: Cli) -> Result<(), NotenspiegelError> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SourceConfig::default(),
    };

    match cli.command {
        Commands::Catalog { index_url, output } => {
            commands::catalog::run(&config, index_url.as_deref(), &output)
        }
        Commands::Check { location } => commands::check::run(&config, &location),
        Commands::Load {
            input,
            parallel,
            output,
        } => commands::load::run(&config, &input, parallel, &output),
        Commands::Parse {
            pdf_file,
            output,
            out,
        } => commands::parse::run(&config, pdf_file, &output, out),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
