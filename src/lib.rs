//! DualText Translator - translate a text selection and show it next to the original
//!
//! The [`core`] module turns a selection, a language pair and a credential into
//! one HTTP request and a typed outcome. The [`host`] module holds the adapter
//! traits a host implements (selection, settings, presentation), and [`cli`]
//! is the terminal host shipped with the crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod host;

// Re-export key types for convenience
pub use crate::core::{
    client::TranslationClient,
    config::{ClientConfig, CredentialPlacement, TranslatorSettings},
    errors::TranslationFailure,
    models::{TranslationRequest, TranslationResult, PLACEHOLDER_CREDENTIAL},
};

pub use crate::host::{
    CommandOutcome, ResultConsumer, SelectionProvider, SettingsStore, TranslateSelection,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
