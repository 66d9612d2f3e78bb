//! CLI command definitions and handlers

use clap::Subcommand;
use std::time::Duration;

use crate::core::client::TranslationClient;
use crate::core::config::{ClientConfig, TranslatorSettings};
use crate::core::errors::TranslationFailure;
use crate::core::models::TranslationResult;
use crate::host::settings::JsonFileSettingsStore;
use crate::host::terminal::{ArgOrStdinSelection, TerminalPresenter};
use crate::host::{
    CommandOutcome, ResultConsumer, SettingsOverrides, SettingsStore, TranslateSelection,
};

/// Commands for DualText Translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate selected text (argument, or stdin when omitted)
    Translate {
        /// Text to translate
        text: Option<String>,

        /// Source language for this call only
        #[arg(long)]
        source_lang: Option<String>,

        /// Target language for this call only
        #[arg(short, long)]
        target_lang: Option<String>,

        /// API key for this call only
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show or change stored settings
    Settings {
        /// Settings operation
        #[command(subcommand)]
        action: SettingsAction,
    },
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the current settings (API key masked)
    Show,

    /// Update one or more settings
    Set {
        /// The language of the original text
        #[arg(long)]
        source_lang: Option<String>,

        /// The language for translation
        #[arg(short, long)]
        target_lang: Option<String>,

        /// API key for the translation service
        #[arg(long)]
        api_key: Option<String>,
    },
}

/// Handle translate command; returns whether a translation was produced
pub async fn handle_translate(
    config: ClientConfig,
    store: &JsonFileSettingsStore,
    text: Option<String>,
    overrides: SettingsOverrides,
) -> anyhow::Result<bool> {
    use indicatif::{ProgressBar, ProgressStyle};
    use tracing::info;

    let client = TranslationClient::new(config)?;
    // Read stdin before the spinner starts drawing.
    let selection = ArgOrStdinSelection::new(text).resolve()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Translating...");
    pb.enable_steady_tick(Duration::from_millis(100));
    let presenter = SpinnerPresenter {
        pb: pb.clone(),
        inner: TerminalPresenter,
    };

    let outcome = TranslateSelection::new(&client, store, &selection, &presenter)
        .with_overrides(overrides)
        .run()
        .await;
    pb.finish_and_clear();

    let outcome = outcome?;
    match &outcome {
        CommandOutcome::Translated(_) => info!("Translation completed"),
        CommandOutcome::Failed(failure) => info!("Translation failed: {}", failure.kind()),
        CommandOutcome::NoText => info!("Nothing to translate"),
    }

    Ok(outcome.is_success())
}

/// Clears the spinner before anything is printed
struct SpinnerPresenter {
    pb: indicatif::ProgressBar,
    inner: TerminalPresenter,
}

impl ResultConsumer for SpinnerPresenter {
    fn no_text(&self) {
        self.pb.finish_and_clear();
        self.inner.no_text();
    }

    fn present(&self, outcome: Result<&TranslationResult, &TranslationFailure>) {
        self.pb.finish_and_clear();
        self.inner.present(outcome);
    }
}

/// Handle settings command
pub async fn handle_settings(
    store: &JsonFileSettingsStore,
    action: SettingsAction,
) -> anyhow::Result<()> {
    match action {
        SettingsAction::Show => {
            let settings = store.load()?;
            print_settings(store, &settings);
        }
        SettingsAction::Set {
            source_lang,
            target_lang,
            api_key,
        } => {
            if source_lang.is_none() && target_lang.is_none() && api_key.is_none() {
                anyhow::bail!("Nothing to set; pass --source-lang, --target-lang or --api-key");
            }

            let overrides = SettingsOverrides {
                source_language: source_lang,
                target_language: target_lang,
                api_key,
            };
            let settings = overrides.apply(store.load()?);
            store.save(&settings)?;

            println!("✅ Settings saved");
            print_settings(store, &settings);
        }
    }

    Ok(())
}

fn print_settings(store: &JsonFileSettingsStore, settings: &TranslatorSettings) {
    println!("Settings file:   {}", store.path().display());
    println!("Source language: {}", settings.source_language);
    println!("Target language: {}", settings.target_language);
    println!("API key:         {}", settings.masked_api_key());
}
