//! Host-side adapters around the translation client
//!
//! The host owns the selection, the persisted settings and the presentation.
//! [`TranslateSelection`] ties them together: read the selection, reject
//! empty text, read settings, build a [`TranslationRequest`], call the
//! client and hand the outcome to a [`ResultConsumer`].

pub mod settings;
pub mod terminal;

use tracing::info;

use crate::core::client::TranslationClient;
use crate::core::config::TranslatorSettings;
use crate::core::errors::TranslationFailure;
use crate::core::models::{TranslationRequest, TranslationResult};

/// Supplies the text the user currently has selected
pub trait SelectionProvider {
    /// Current selection, possibly empty
    fn selection(&self) -> anyhow::Result<String>;
}

/// Loads and persists [`TranslatorSettings`]
pub trait SettingsStore {
    /// Load settings merged over defaults
    fn load(&self) -> anyhow::Result<TranslatorSettings>;

    /// Persist settings
    fn save(&self, settings: &TranslatorSettings) -> anyhow::Result<()>;
}

/// Receives the outcome of a translation for presentation
pub trait ResultConsumer {
    /// Called when the selection was empty and nothing was requested
    fn no_text(&self);

    /// Called once per translation attempt
    fn present(&self, outcome: Result<&TranslationResult, &TranslationFailure>);
}

/// What happened when the translate command ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Selection was empty; no request was made
    NoText,
    /// Translation succeeded
    Translated(TranslationResult),
    /// Translation failed
    Failed(TranslationFailure),
}

impl CommandOutcome {
    /// True when a translation was produced
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Translated(_))
    }
}

/// Per-call overrides of the stored settings
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// Replaces `source_language`
    pub source_language: Option<String>,
    /// Replaces `target_language`
    pub target_language: Option<String>,
    /// Replaces `api_key`
    pub api_key: Option<String>,
}

impl SettingsOverrides {
    /// Apply overrides on top of loaded settings
    pub fn apply(&self, mut settings: TranslatorSettings) -> TranslatorSettings {
        if let Some(source) = &self.source_language {
            settings.source_language = source.clone();
        }
        if let Some(target) = &self.target_language {
            settings.target_language = target.clone();
        }
        if let Some(key) = &self.api_key {
            settings.api_key = key.clone();
        }
        settings
    }
}

/// User-visible notice for a failure
pub fn failure_notice(failure: &TranslationFailure) -> String {
    match failure {
        TranslationFailure::MissingCredential => {
            "API key not configured or is a placeholder!".to_string()
        }
        other => format!("Failed to fetch translation. {}", other),
    }
}

/// The "translate selected text" command
pub struct TranslateSelection<'a> {
    client: &'a TranslationClient,
    settings: &'a dyn SettingsStore,
    selection: &'a dyn SelectionProvider,
    consumer: &'a dyn ResultConsumer,
    overrides: SettingsOverrides,
}

impl<'a> TranslateSelection<'a> {
    /// Wire the command to a client and the host's adapters
    pub fn new(
        client: &'a TranslationClient,
        settings: &'a dyn SettingsStore,
        selection: &'a dyn SelectionProvider,
        consumer: &'a dyn ResultConsumer,
    ) -> Self {
        Self {
            client,
            settings,
            selection,
            consumer,
            overrides: SettingsOverrides::default(),
        }
    }

    /// Override stored settings for this run
    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Run the command once.
    ///
    /// Errors are only returned for host problems (unreadable settings or
    /// selection); translation failures are reported as [`CommandOutcome::Failed`].
    /// An empty selection short-circuits before settings are touched.
    pub async fn run(&self) -> anyhow::Result<CommandOutcome> {
        let text = self.selection.selection()?;
        if text.trim().is_empty() {
            self.consumer.no_text();
            return Ok(CommandOutcome::NoText);
        }

        let settings = self.overrides.apply(self.settings.load()?);
        let request = TranslationRequest::new(
            text,
            settings.source_language,
            settings.target_language,
            settings.api_key,
        );

        info!(
            "Translating selection {} -> {}",
            request.source_lang, request.target_lang
        );

        match self.client.translate(&request).await {
            Ok(result) => {
                self.consumer.present(Ok(&result));
                Ok(CommandOutcome::Translated(result))
            }
            Err(failure) => {
                self.consumer.present(Err(&failure));
                Ok(CommandOutcome::Failed(failure))
            }
        }
    }
}
