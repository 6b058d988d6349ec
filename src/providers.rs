//! Vision provider construction from CLI choice and configuration.

use std::sync::Arc;

use anyhow::{Context, bail};

use autoslide_config::ProviderConfig;
use autoslide_protocols::VisionProvider;
use autoslide_provider_gemini::{GeminiClient, GeminiProvider};
use autoslide_provider_openai::OpenAIProvider;

pub(crate) const PROVIDERS: [&str; 2] = ["openai", "gemini"];

/// Environment variable consulted when the config carries no key.
pub(crate) fn api_key_env(provider: &str) -> String {
    format!("{}_API_KEY", provider.to_uppercase())
}

fn api_key(provider: &str, config: Option<&ProviderConfig>) -> anyhow::Result<String> {
    if let Some(key) = config.and_then(|c| c.api_key()) {
        return Ok(key.to_string());
    }
    let var = api_key_env(provider);
    std::env::var(&var)
        .ok()
        .filter(|k| !k.is_empty())
        .with_context(|| format!("No API key for {}: set providers.{}.api_key or {}", provider, provider, var))
}

/// Build the provider named `id`.
pub(crate) fn build(id: &str, config: Option<&ProviderConfig>) -> anyhow::Result<Arc<dyn VisionProvider>> {
    let key = api_key(id, config)?;
    let base_url = config.and_then(|c| c.base_url.as_deref());
    let model = config.and_then(|c| c.default_model.clone());

    let provider: Arc<dyn VisionProvider> = match id {
        "openai" => {
            let provider = match base_url {
                Some(base) => OpenAIProvider::with_url(
                    key,
                    format!("{}/chat/completions", base.trim_end_matches('/')),
                ),
                None => OpenAIProvider::new(key),
            };
            Arc::new(match model {
                Some(model) => provider.with_default_model(model),
                None => provider,
            })
        }
        "gemini" => {
            let provider = match base_url {
                Some(base) => {
                    GeminiProvider::with_client(GeminiClient::with_base_url(key, base.to_string()))
                }
                None => GeminiProvider::new(key),
            };
            Arc::new(match model {
                Some(model) => provider.with_default_model(model),
                None => provider,
            })
        }
        other => bail!("Unknown provider '{}', expected one of {:?}", other, PROVIDERS),
    };
    Ok(provider)
}
