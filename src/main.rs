//! CLI entry point for portfolio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "portfolio-rs")]
#[command(version)]
#[command(about = "Personal portfolio site: projects, work, contact relay and GitHub stats", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the site server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to the configured address)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// List categories, or the items of one category
    List {
        /// Content kind (project, work)
        kind: Option<String>,

        /// Category slug
        category: Option<String>,
    },

    /// Create a new project or work item
    New {
        /// Content kind (project, work)
        kind: String,

        /// Category slug
        category: String,

        /// Title of the new item
        title: String,
    },

    /// Validate every content file
    Check,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "portfolio_rs=debug,info"
    } else {
        "portfolio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            let site = portfolio_rs::Portfolio::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| site.config.server.ip.clone());
            let port = port.unwrap_or(site.config.server.port);

            tracing::info!("Serving content from {:?}", site.content_dir);
            site.serve(&ip, port).await?;
        }

        Commands::List { kind, category } => {
            let site = portfolio_rs::Portfolio::new(&base_dir)?;
            portfolio_rs::commands::list::run(&site, kind.as_deref(), category.as_deref())?;
        }

        Commands::New {
            kind,
            category,
            title,
        } => {
            let site = portfolio_rs::Portfolio::new(&base_dir)?;
            tracing::info!("Creating new {} in {}: {}", kind, category, title);
            site.new_item(&kind, &category, &title)?;
        }

        Commands::Check => {
            let site = portfolio_rs::Portfolio::new(&base_dir)?;
            site.check()?;
        }

        Commands::Version => {
            println!("portfolio-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
