use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use chatvault::cli::export::ExportArgs;
use chatvault::cli::{chats, export, schema};
use chatvault::config::Config;
use chatvault::logging::init_logging;

#[derive(Parser)]
#[command(name = "chatvault")]
#[command(about = "Convert a decrypted WhatsApp message store into a JSON archive")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "chatvault.yaml", global = true)]
    config: String,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the archive and write it as JSON
    Export {
        /// Decrypted msgstore.db (default: search the data directory)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Contacts mapping JSON file
        #[arg(long)]
        contacts: Option<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// List chats with message and call counts
    Chats {
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        #[arg(long)]
        contacts: Option<PathBuf>,
    },

    /// Report which expected tables the snapshot contains
    Schema {
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config
    let config = Config::load(&cli.config).unwrap_or_default();

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(level)?;

    match cli.command {
        Commands::Export {
            snapshot,
            contacts,
            output,
            compact,
        } => {
            export::run(
                &config,
                ExportArgs {
                    snapshot,
                    contacts,
                    output,
                    compact,
                },
            )?;
        }
        Commands::Chats { snapshot, contacts } => {
            chats::run(&config, snapshot, contacts)?;
        }
        Commands::Schema { snapshot } => {
            schema::run(&config, snapshot)?;
        }
    }

    Ok(())
}
