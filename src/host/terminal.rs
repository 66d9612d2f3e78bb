//! Terminal host: selection from an argument or stdin, output to stdout/stderr

use std::io::Read;

use crate::core::errors::TranslationFailure;
use crate::core::models::TranslationResult;
use crate::host::{failure_notice, ResultConsumer, SelectionProvider};

/// Selection given on the command line, or read from stdin when absent
#[derive(Debug, Clone, Default)]
pub struct ArgOrStdinSelection {
    text: Option<String>,
}

impl ArgOrStdinSelection {
    /// `None` means read stdin
    pub fn new(text: Option<String>) -> Self {
        Self { text }
    }

    /// Read stdin now if no argument was given
    pub fn resolve(self) -> anyhow::Result<Self> {
        let text = self.selection()?;
        Ok(Self { text: Some(text) })
    }
}

impl SelectionProvider for ArgOrStdinSelection {
    fn selection(&self) -> anyhow::Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }

        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        // Piped input usually ends with a newline the user never selected.
        let trimmed = buffer.strip_suffix('\n').unwrap_or(&buffer);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        Ok(trimmed.to_string())
    }
}

/// Prints the original next to the translation
#[derive(Debug, Clone, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    /// Text block shown for a successful translation
    pub fn render(result: &TranslationResult) -> String {
        let mut out = String::from("Translation\n\n");
        out.push_str("Original");
        if let Some(lang) = &result.detected_source_lang {
            out.push_str(&format!(" ({})", lang));
        }
        out.push_str(":\n");
        out.push_str(&result.original_text);
        out.push_str("\n\nTranslated:\n");
        out.push_str(&result.translated_text);
        out
    }
}

impl ResultConsumer for TerminalPresenter {
    fn no_text(&self) {
        eprintln!("No text selected!");
    }

    fn present(&self, outcome: Result<&TranslationResult, &TranslationFailure>) {
        match outcome {
            Ok(result) => println!("{}", Self::render(result)),
            Err(failure) => eprintln!("❌ {}", failure_notice(failure)),
        }
    }
}
