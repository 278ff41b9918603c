//! LLM provider implementations for Lessonforge.
//!
//! One implementation covers the vast majority of backends: most LLM
//! providers expose an OpenAI-compatible `/v1/chat/completions` endpoint.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use lessonforge_config::AppConfig;
use lessonforge_core::error::ProviderError;

/// Build a provider from the application configuration.
///
/// Hosted providers need an API key; ollama runs locally and does not.
pub fn build_from_config(config: &AppConfig) -> Result<OpenAiCompatProvider, ProviderError> {
    let require_key = || {
        config.api_key.clone().ok_or_else(|| {
            ProviderError::NotConfigured(
                "No API key found. Set LESSONFORGE_API_KEY, OPENAI_API_KEY, or GROQ_API_KEY"
                    .into(),
            )
        })
    };

    let provider = match config.default_provider.as_str() {
        "openai" => OpenAiCompatProvider::openai(require_key()?),
        "groq" => OpenAiCompatProvider::groq(require_key()?),
        "ollama" => OpenAiCompatProvider::ollama(None),
        other => {
            return Err(ProviderError::NotConfigured(format!(
                "Unknown provider '{other}' (expected openai, groq, or ollama)"
            )));
        }
    };

    Ok(provider)
}
