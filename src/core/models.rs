//! Core data models for translation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Credential value shipped in the default settings, meaning "not configured yet"
pub const PLACEHOLDER_CREDENTIAL: &str = "auth-placeholder-deepl-zx9y8w7v6u5t4s3r2q1p0n";

/// Translation request
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Text to translate
    pub text: String,
    /// Source language code, e.g. `en`
    pub source_lang: String,
    /// Target language code, e.g. `fr`
    pub target_lang: String,
    /// Endpoint credential
    pub credential: String,
}

impl TranslationRequest {
    /// Build a request; surrounding whitespace is stripped from the credential
    pub fn new(
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            credential: credential.into().trim().to_string(),
        }
    }

    /// True when there is something other than whitespace to translate
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// True when the credential is usable for a real request
    pub fn has_credential(&self) -> bool {
        is_configured_credential(&self.credential)
    }
}

// Keep the credential out of debug output and logs.
impl fmt::Debug for TranslationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationRequest")
            .field("text", &self.text)
            .field("source_lang", &self.source_lang)
            .field("target_lang", &self.target_lang)
            .field("credential", &"<redacted>")
            .finish()
    }
}

/// Translation result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationResult {
    /// Text as it was selected
    pub original_text: String,
    /// Text returned by the endpoint
    pub translated_text: String,
    /// Source language the endpoint reported, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_source_lang: Option<String>,
}

/// Whether a credential is non-empty and not the shipped placeholder
pub fn is_configured_credential(credential: &str) -> bool {
    let credential = credential.trim();
    !credential.is_empty() && credential != PLACEHOLDER_CREDENTIAL
}
