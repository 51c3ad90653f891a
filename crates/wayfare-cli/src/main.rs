use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wayfare_cli::commands::{self, Overrides};
use wayfare_cli::{Backend, OutputFormat};

#[derive(Parser)]
#[command(name = "wayfare")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Resilient flight search and booking automation",
    long_about = "Wayfare drives a flight booking site through a browser, tolerating missing \
                  elements and flaky sessions, and saves the flights and bookings it finds."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Path to a TOML settings file
    #[arg(short, long, global = true, env = "WAYFARE_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Browser automation backend
    #[arg(long, global = true, value_enum)]
    backend: Option<Backend>,

    /// WebDriver or DevTools endpoint
    #[arg(long, global = true, value_name = "URL")]
    driver_url: Option<String>,

    /// Show the browser window
    #[arg(long, global = true)]
    headed: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search flights and save the results (retried on failure)
    Search {
        /// Departure city
        #[arg(long)]
        from: String,

        /// Destination city
        #[arg(long)]
        to: String,

        /// Keep records in memory instead of the database
        #[arg(long)]
        dry_run: bool,
    },

    /// Book the first flight on a route and save the confirmation
    Book {
        /// Departure city
        #[arg(long)]
        from: String,

        /// Destination city
        #[arg(long)]
        to: String,

        /// JSON file with passenger and payment details
        #[arg(long, value_name = "FILE")]
        passenger: PathBuf,

        /// Keep records in memory instead of the database
        #[arg(long)]
        dry_run: bool,
    },

    /// Initialise the database, search, then book
    Run {
        /// JSON file with passenger and payment details
        #[arg(long, value_name = "FILE")]
        passenger: PathBuf,

        /// Departure city
        #[arg(long, default_value = "Boston")]
        from: String,

        /// Destination city
        #[arg(long, default_value = "London")]
        to: String,

        /// Keep records in memory instead of the database
        #[arg(long)]
        dry_run: bool,
    },

    /// Create the database tables, waiting for the database to start
    InitDb,

    /// Print the effective settings
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let overrides = Overrides {
        backend: cli.backend.map(Into::into),
        driver_url: cli.driver_url,
        headed: cli.headed,
    };
    let settings = commands::load_settings(cli.config.as_deref(), &overrides)?;

    // Execute the command
    match cli.command {
        Commands::Search { from, to, dry_run } => {
            commands::search::execute(&settings, &from, &to, dry_run, cli.format)
        }
        Commands::Book {
            from,
            to,
            passenger,
            dry_run,
        } => commands::book::execute(&settings, &from, &to, &passenger, dry_run, cli.format),
        Commands::Run {
            passenger,
            from,
            to,
            dry_run,
        } => commands::run::execute(&settings, &from, &to, &passenger, dry_run, cli.format),
        Commands::InitDb => commands::init_db::execute(&settings),
        Commands::Config => commands::config::execute(&settings, cli.format),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("wayfare=debug")
    } else {
        EnvFilter::new("wayfare=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
