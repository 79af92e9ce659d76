//! Reasoning provider construction for facade consumers.

use std::sync::Arc;
use std::time::Duration;

use vprovider::{ModelProvider, ProviderError, ProviderId};

use crate::ProviderSection;

#[derive(Debug, Clone)]
pub struct ProviderBuildConfig {
    pub provider_id: ProviderId,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl ProviderBuildConfig {
    pub fn new(provider_id: ProviderId) -> Self {
        Self {
            provider_id,
            api_key: None,
            base_url: None,
            timeout: Duration::from_secs(90),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl From<&ProviderSection> for ProviderBuildConfig {
    fn from(section: &ProviderSection) -> Self {
        Self {
            provider_id: section.provider_id(),
            api_key: section.resolved_api_key(),
            base_url: section.base_url.clone(),
            timeout: section.timeout(),
        }
    }
}

pub fn build_provider_from_api_key(
    provider_id: ProviderId,
    api_key: impl Into<String>,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    build_provider_with_config(ProviderBuildConfig::new(provider_id).with_api_key(api_key))
}

#[cfg(feature = "provider-openai")]
pub fn build_provider_with_config(
    config: ProviderBuildConfig,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    use vprovider::adapters::openai::{HttpChatTransport, OpenAiCompatProvider};

    let http = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|err| ProviderError::transport(err.to_string()))?;

    let mut transport = HttpChatTransport::for_provider(http, config.provider_id);
    if let Some(base_url) = config.base_url {
        transport = transport.with_base_url(base_url);
    }

    Ok(Arc::new(OpenAiCompatProvider::new(
        config.provider_id,
        config.api_key.as_deref(),
        Arc::new(transport),
    )?))
}

#[cfg(not(feature = "provider-openai"))]
pub fn build_provider_with_config(
    _config: ProviderBuildConfig,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    Err(ProviderError::invalid_request(
        "provider-openai feature is not enabled on vigil",
    ))
}

#[cfg(all(test, feature = "provider-openai"))]
mod tests {
    use vprovider::ProviderErrorKind;

    use super::*;

    #[test]
    fn hosted_provider_without_key_is_rejected() {
        let error = build_provider_with_config(ProviderBuildConfig::new(ProviderId::DashScope))
            .err()
            .expect("missing key should fail");
        assert_eq!(error.kind, ProviderErrorKind::Authentication);
    }

    #[test]
    fn ollama_builds_without_key() {
        let provider = build_provider_with_config(
            ProviderBuildConfig::new(ProviderId::Ollama)
                .with_base_url("http://127.0.0.1:11434/v1/")
                .with_timeout(Duration::from_secs(5)),
        )
        .expect("ollama provider should build");
        assert_eq!(provider.id(), ProviderId::Ollama);
    }

    #[test]
    fn api_key_shortcut_builds_openai() {
        let provider =
            build_provider_from_api_key(ProviderId::OpenAi, "sk-test").expect("provider");
        assert_eq!(provider.id(), ProviderId::OpenAi);
    }
}
