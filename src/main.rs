use anyhow::Result;
use clap::{Parser, Subcommand};

use segview::cli;
use segview::config::OutputFormat;
use segview::payload::PayloadKind;

#[derive(Debug, Parser)]
#[command(name = "segview")]
#[command(about = "Render customer segmentation results as readable reports")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Decode a service response and print its display tree
    Render {
        /// Payload file, or `-` to read stdin
        #[arg(default_value = "-")]
        input: String,
        /// Output format: table, json, csv (default from config)
        #[arg(long)]
        format: Option<String>,
        /// Payload kind: auto (default), population, prediction, analysis
        #[arg(long)]
        kind: Option<String>,
        /// Reject ragged transition matrices and unmatched segment keys
        #[arg(long)]
        strict: bool,
    },
    /// Show recent renders from the render log
    History {
        /// Number of entries to show (default from config)
        #[arg(long)]
        limit: Option<usize>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config to ~/.segview/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `output.format json`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Render {
            input,
            format,
            kind,
            strict,
        } => {
            let fmt = format.as_deref().map(|f| OutputFormat::from_str_opt(Some(f)));
            let kind = PayloadKind::from_str_opt(kind.as_deref());
            cli::run_render(&input, fmt, kind, strict)
        }
        Commands::History { limit, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_history(limit, fmt)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
