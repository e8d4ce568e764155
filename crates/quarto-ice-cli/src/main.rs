/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! quarto-ice CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "quarto-ice")]
#[command(version)]
#[command(about = "Fill marker-annotated HTML templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a data document to an HTML template
    Fill {
        /// HTML template containing data-ice markers
        template: PathBuf,

        /// Data document (JSON, or YAML for any other extension)
        #[arg(short = 'd', long)]
        data: PathBuf,

        /// Engine options file (JSON or YAML)
        #[arg(long)]
        options: Option<PathBuf>,

        /// Remove markers whose value is blank
        #[arg(long)]
        auto_drop: bool,

        /// Write output to FILE instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Report markers that match nothing
        #[arg(long)]
        debug: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if matches!(cli.command, Commands::Fill { debug: true, .. }) {
        "quarto_ice=debug"
    } else {
        "quarto_ice=info"
    };

    // Initialize logging; stdout is reserved for rendered HTML
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Fill {
            template,
            data,
            options,
            auto_drop,
            output,
            debug,
        } => commands::fill::execute(commands::fill::FillArgs {
            template,
            data,
            options,
            auto_drop,
            output,
            debug,
        }),
    }
}
