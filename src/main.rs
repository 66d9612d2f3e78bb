//! Main entry point for the DualText Translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dualtext_translator::cli::commands::{self, Commands};
use dualtext_translator::core::config::{ClientConfig, CredentialPlacement};
use dualtext_translator::host::settings::JsonFileSettingsStore;
use dualtext_translator::host::SettingsOverrides;

/// DualText Translator - translate selected text next to the original
#[derive(Parser, Debug)]
#[command(name = "dualtext", version, about, long_about = None)]
struct Args {
    /// Settings file (defaults to <config dir>/dualtext/settings.json)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Translation endpoint (defaults to DUALTEXT_ENDPOINT or the DeepL API)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Send the API key in the Authorization header instead of the query string
    #[arg(long, global = true)]
    auth_header: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("dualtext_translator={}", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Override config with CLI args if provided
    let mut config = ClientConfig::from_env()?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if args.auth_header {
        config.credential_placement = CredentialPlacement::Header;
    }

    let store = JsonFileSettingsStore::new(
        args.settings
            .unwrap_or_else(JsonFileSettingsStore::default_path),
    );

    // Execute command
    match args.command {
        Some(Commands::Translate {
            text,
            source_lang,
            target_lang,
            api_key,
        }) => {
            let overrides = SettingsOverrides {
                source_language: source_lang,
                target_language: target_lang,
                api_key,
            };
            let produced = commands::handle_translate(config, &store, text, overrides).await?;
            if !produced {
                std::process::exit(1);
            }
        }
        Some(Commands::Settings { action }) => {
            commands::handle_settings(&store, action).await?;
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
