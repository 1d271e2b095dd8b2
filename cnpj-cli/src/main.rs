//! CNPJ command line tool
//!
//! Usage:
//!     cnpj check 54.550.752/0001-55
//!     cnpj search --pool companies.json "padaria"
//!     cnpj resolve --current 54.550.752/0002-36

mod commands;
mod error;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "cnpj")]
#[command(about = "CNPJ validation, company search and branch resolution")]
#[command(version)]
struct Args {
    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize, format and validate identifiers
    Check {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Rank companies from a JSON pool against a query
    Search {
        /// JSON array of {"id", "name", "cnpj"} records
        #[arg(long)]
        pool: PathBuf,

        /// JSON file with engine weights and limits
        #[arg(long)]
        config: Option<PathBuf>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        query: String,
    },

    /// Pick the CNPJ to persist, asking before swapping a branch for its headquarters
    Resolve {
        /// Value currently on the form
        #[arg(long, default_value = "")]
        current: String,

        /// Value supplied by enrichment
        #[arg(long, default_value = "")]
        enriched: String,

        /// Only canonicalize the current value ahead of a lookup
        #[arg(long)]
        before_query: bool,

        /// Give up on the prompt after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init(&args.log_level);

    info!("cnpj v{}", env!("CARGO_PKG_VERSION"));

    let mut stdout = std::io::stdout().lock();

    match args.command {
        Command::Check { ids } => {
            if !commands::check(&ids, &mut stdout)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Search {
            pool,
            config,
            limit,
            query,
        } => {
            let config = commands::load_config(config.as_deref(), limit)?;
            let pool = commands::load_pool(&pool)?;
            commands::search(&query, &pool, config, &mut stdout)?;
        }
        Command::Resolve {
            current,
            enriched,
            before_query,
            timeout_secs,
        } => {
            let args = commands::ResolveArgs {
                current: &current,
                enriched: &enriched,
                before_query,
                timeout: timeout_secs.map(Duration::from_secs),
            };
            let input = std::io::BufReader::new(std::io::stdin());
            let resolved = commands::resolve(args, input).await?;
            println!("{}", resolved);
        }
    }

    Ok(ExitCode::SUCCESS)
}
