//! cityatlas CLI - European Cities Atlas viewer
//!
//! Command-line interface for browsing the atlas table and its codebook.

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};

use crate::{config::ViewerConfig, store::DataStore};

mod basic;
mod view;

/// cityatlas - Browse the European Cities Atlas and its codebook
#[derive(Parser)]
#[command(name = "cityatlas")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Main table location (URL or path), overriding the configuration
    #[arg(long, global = true)]
    data: Option<String>,

    /// Codebook location, overriding the configuration
    #[arg(long, global = true)]
    codebook: Option<String>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal viewer
    View,
    /// Render the viewer page as standalone HTML
    Page {
        /// Columns to show in the data table (default: the first few)
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,
        /// Column to describe in the information card (default: the first)
        #[arg(long)]
        inspect: Option<String>,
        /// Write the page here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print dataset totals
    Summary,
    /// Describe one column: codebook metadata and statistics
    Inspect {
        /// Column name
        column: String,
    },
    /// List the columns of the main table
    Columns,
    /// Display the first N rows
    Head {
        /// Number of rows to display
        #[arg(short = 'n', long, default_value = "10")]
        rows: usize,
    },
}

/// Run the cityatlas CLI.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = resolve_config(&cli).and_then(|config| {
        let store = DataStore::from_config(&config)?;
        match cli.command {
            Commands::View => view::cmd_view(&store, &config),
            Commands::Page {
                columns,
                inspect,
                output,
            } => basic::cmd_page(&store, &config, columns, inspect, output.as_deref()),
            Commands::Summary => basic::cmd_summary(&store),
            Commands::Inspect { column } => basic::cmd_inspect(&store, &column),
            Commands::Columns => basic::cmd_columns(&store),
            Commands::Head { rows } => basic::cmd_head(&store, rows),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Configuration file (or defaults) with command-line overrides applied.
fn resolve_config(cli: &Cli) -> crate::Result<ViewerConfig> {
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(data) = &cli.data {
        config = config.with_data_source(data.clone());
    }
    if let Some(codebook) = &cli.codebook {
        config = config.with_codebook_path(codebook.clone());
    }
    config.validate()?;
    Ok(config)
}

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
