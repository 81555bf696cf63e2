//! Paged select CLI
//!
//! Drive the paged select engine against an in-memory user directory, or
//! validate a widget configuration file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use paged_select_core::SelectConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod directory;
mod session;

use directory::TOTAL_USERS;
use session::SessionOptions;

#[derive(Parser)]
#[command(name = "paged-select")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Paginated, searchable select demo", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted session against a mock user directory
    Demo {
        /// Widget configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Users in the mock directory
        #[arg(short, long, default_value_t = TOTAL_USERS)]
        users: u32,

        /// Page size, overriding the configuration
        #[arg(short, long)]
        page_size: Option<u32>,

        /// Query typed into the input; `;` separates terms
        #[arg(short, long, default_value = "admin; user42@")]
        query: String,

        /// Print the final view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a widget configuration file
    CheckConfig {
        /// Configuration file (TOML)
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Demo {
            config,
            users,
            page_size,
            query,
            json,
        } => cmd_demo(config.as_deref(), users, page_size, query, json).await,

        Commands::CheckConfig { file } => cmd_check_config(&file),
    }
}

fn load_config(path: &Path) -> Result<SelectConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    SelectConfig::from_toml_str(&content)
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}

async fn cmd_demo(
    config: Option<&Path>,
    users: u32,
    page_size: Option<u32>,
    query: String,
    json: bool,
) -> Result<()> {
    let mut config = match config {
        Some(path) => load_config(path)?,
        None => SelectConfig::new()
            .multiple(true)
            .default_page_size(20)
            .placeholder("Search users by name, email, or role..."),
    };
    if let Some(size) = page_size {
        config = config.default_page_size(size);
    }
    config.validate()?;

    info!(
        "Running demo over {} users ({} per page, {})",
        users,
        config.default_page_size,
        if config.multiple { "multi-select" } else { "single-select" }
    );

    session::run(SessionOptions {
        config,
        total_users: users,
        query,
        json,
    })
    .await
}

fn cmd_check_config(file: &Path) -> Result<()> {
    let config = load_config(file)?;

    info!("{} is valid", file.display());
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}
