//! Plugin Bridge CLI - Main entry point

mod demo;
mod inspect;

use bridge_foundation::BridgeConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Plugin Bridge - inspect plugin storage and run a demo plugin session
#[derive(Parser, Debug)]
#[command(name = "bridge")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Load configuration from this file instead of the global/project files
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect the plugin store
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Inspect a project cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Load two sample plugins and show registries and trigger results
    Demo,
}

#[derive(Subcommand, Debug)]
enum StoreAction {
    /// List namespaces, or the documents of one namespace
    List {
        namespace: Option<String>,
    },
    /// Pretty-print a stored document
    Show {
        namespace: String,
        name: String,
    },
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// Print the project cache, or a single entry
    Show {
        project: String,
        path: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => BridgeConfig::load_from(path)?,
        None => BridgeConfig::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {}", e);
            BridgeConfig::default()
        }),
    };

    // RUST_LOG > --debug > config
    let log_level = if args.debug {
        "debug"
    } else {
        config.log_level()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match args.command {
        Command::Store { action } => match action {
            StoreAction::List { namespace } => inspect::store_list(&config, namespace.as_deref()),
            StoreAction::Show { namespace, name } => inspect::store_show(&config, &namespace, &name),
        },
        Command::Cache { action } => match action {
            CacheAction::Show { project, path } => {
                inspect::cache_show(&config, &project, path.as_deref())
            }
        },
        Command::Demo => demo::run().await,
    }
}
