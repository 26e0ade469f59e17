//! Refile CLI - refile command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

mod cmd;
mod util;

/// Refile - Keep attached files named after their records
#[derive(Parser)]
#[command(name = "refile")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/refile/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rename every attached file in a library now
    Rename {
        /// Library file (JSON)
        library: PathBuf,
        /// Only show what would be renamed
        #[arg(long)]
        dry_run: bool,
    },
    /// Watch a library and rename files whenever a record changes
    Watch {
        /// Library file (JSON)
        library: PathBuf,
    },
    /// Print the cleaned form of a name
    Clean {
        /// Raw text
        text: String,
        /// Keep directory separators
        #[arg(long)]
        dir: bool,
    },
    /// View and edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all configuration values
    List,
    /// Print one value
    Get {
        /// Config key
        key: String,
    },
    /// Change one value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// Show the config file path
    Path {
        /// Create the file with defaults if it is missing
        #[arg(long)]
        create: bool,
    },
    /// Print an annotated example config
    Example,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config_path = util::config_path(cli.config)?;

    match cli.command {
        Commands::Rename { library, dry_run } => cmd::rename::run(&config_path, &library, dry_run).await,
        Commands::Watch { library } => cmd::watch::run(&config_path, &library).await,
        Commands::Clean { text, dir } => cmd::clean::run(&text, dir),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::List => cmd::config::run_list(&config_path),
            ConfigCommands::Get { key } => cmd::config::run_get(&config_path, &key),
            ConfigCommands::Set { key, value } => cmd::config::run_set(&config_path, &key, &value),
            ConfigCommands::Path { create } => cmd::config::run_path(&config_path, create),
            ConfigCommands::Example => cmd::config::run_example(),
        },
    }
}
