//! NPA command line host
//!
//! Seeds the standard template, prints the page outline and exports to PDF
//! or DOCX. Logs go to stderr so stdout stays usable for JSON.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use npa_export::{ExportConfig, ExportFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::commands::ExportArgs;

#[derive(Parser, Debug)]
#[command(name = "npa")]
#[command(version, about = "Norma Padrão de Ação document tool")]
struct Args {
    /// TOML export configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the seeded template as JSON
    Template {
        /// Issue date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the logical pages of a document
    Outline {
        /// Document JSON; the seeded template when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Export a document to PDF or DOCX
    Export {
        /// Output format: pdf or docx
        #[arg(short, long)]
        format: ExportFormat,

        /// Document JSON; the seeded template when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file; derived from the document number when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export timeout in milliseconds (overrides the configuration)
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Letterhead logo image (overrides the configuration)
        #[arg(long)]
        logo: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => ExportConfig::from_file(path)?,
        None => ExportConfig::default(),
    };

    match args.command {
        Command::Template { date, output } => commands::template(date, output.as_deref()),
        Command::Outline { input } => commands::outline(input.as_deref(), &config),
        Command::Export {
            format,
            input,
            output,
            timeout_ms,
            logo,
        } => {
            let export = ExportArgs {
                format,
                input,
                output,
                timeout_ms,
                logo,
            };
            commands::export_command(export, config).await
        }
    }
}
