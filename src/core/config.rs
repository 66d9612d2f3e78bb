//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::core::models::{is_configured_credential, PLACEHOLDER_CREDENTIAL};

/// Default translation endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.deepl.com/v2/translate";

/// Default request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;

/// Environment prefix for settings overrides (`DUALTEXT_API_KEY`, ...)
pub const ENV_PREFIX: &str = "DUALTEXT";

/// Where the credential travels on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialPlacement {
    /// `auth_key` query parameter
    #[default]
    Query,
    /// `Authorization: DeepL-Auth-Key ...` header
    Header,
}

/// Transport configuration for the translation client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Translation endpoint URL
    pub endpoint: String,
    /// Whole-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Where the credential travels
    #[serde(default)]
    pub credential_placement: CredentialPlacement,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            credential_placement: CredentialPlacement::Query,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let endpoint = std::env::var("DUALTEXT_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let timeout_ms = std::env::var("DUALTEXT_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_MS.to_string())
            .parse::<u64>()?;

        let credential_placement = match std::env::var("DUALTEXT_AUTH_HEADER") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => CredentialPlacement::Header,
            _ => CredentialPlacement::Query,
        };

        Ok(Self {
            endpoint,
            timeout_ms,
            credential_placement,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| anyhow::anyhow!("Invalid endpoint '{}': {}", self.endpoint, e))?;

        match url.scheme() {
            "https" => {}
            "http" => warn!("Endpoint {} is not HTTPS", url.host_str().unwrap_or_default()),
            other => return Err(anyhow::anyhow!("Unsupported endpoint scheme: {}", other)),
        }

        if self.timeout_ms == 0 {
            return Err(anyhow::anyhow!("timeout_ms must be greater than 0"));
        }

        Ok(())
    }
}

/// User-facing settings persisted by the host
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslatorSettings {
    /// The language of the original text
    pub source_language: String,
    /// The language for translation
    pub target_language: String,
    /// API key for the translation service
    pub api_key: String,
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            target_language: "fr".to_string(),
            api_key: PLACEHOLDER_CREDENTIAL.to_string(),
        }
    }
}

impl std::fmt::Debug for TranslatorSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorSettings")
            .field("source_language", &self.source_language)
            .field("target_language", &self.target_language)
            .field("api_key", &self.masked_api_key())
            .finish()
    }
}

impl TranslatorSettings {
    /// Load settings: defaults, then the JSON file (if present), then `DUALTEXT_*` env vars
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    /// Same as [`TranslatorSettings::load`] with a custom environment prefix
    pub fn load_with_env_prefix(path: &Path, env_prefix: &str) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let settings = config::Config::builder()
            .set_default("source_language", defaults.source_language)?
            .set_default("target_language", defaults.target_language)?
            .set_default("api_key", defaults.api_key)?
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Json)
                    .required(false),
            )
            .add_source(config::Environment::with_prefix(env_prefix))
            .build()?
            .try_deserialize::<Self>()?;

        debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    /// Save settings to a JSON file, creating parent directories
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Whether the API key is something other than empty or the placeholder
    pub fn has_api_key(&self) -> bool {
        is_configured_credential(&self.api_key)
    }

    /// API key safe to print: placeholder marker or last four characters
    pub fn masked_api_key(&self) -> String {
        if !self.has_api_key() {
            return "<not configured>".to_string();
        }
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    }
}
