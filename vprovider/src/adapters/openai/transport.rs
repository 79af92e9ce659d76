//! Chat-completions transport trait and reqwest-based HTTP implementation.

use reqwest::{Client, Response};

use crate::{Message, ProviderError, ProviderFuture, ProviderId, StopReason, TokenUsage};

use super::serde_api::{ApiResponse, build_api_request, extract_error_message};

#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletion {
    pub model: String,
    pub content: String,
    pub stop_reason: StopReason,
    pub usage: TokenUsage,
}

pub trait ChatCompletionsTransport: Send + Sync + std::fmt::Debug {
    fn complete<'a>(
        &'a self,
        request: ChatCompletionRequest,
        api_key: Option<&'a str>,
    ) -> ProviderFuture<'a, Result<ChatCompletion, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    client: Client,
    base_url: String,
}

impl HttpChatTransport {
    pub fn new(client: Client) -> Self {
        Self::for_provider(client, ProviderId::OpenAi)
    }

    pub fn for_provider(client: Client, provider: ProviderId) -> Self {
        Self {
            client,
            base_url: provider.default_base_url().to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("chat completion failed with status {status}"));

        ProviderError::from_status(status.as_u16(), message)
    }
}

impl ChatCompletionsTransport for HttpChatTransport {
    fn complete<'a>(
        &'a self,
        request: ChatCompletionRequest,
        api_key: Option<&'a str>,
    ) -> ProviderFuture<'a, Result<ChatCompletion, ProviderError>> {
        Box::pin(async move {
            let api_request = build_api_request(&request)?;
            let mut builder = self
                .client
                .post(self.endpoint("chat/completions"))
                .json(&api_request);
            if let Some(key) = api_key {
                builder = builder.bearer_auth(key);
            }

            let response = builder.send().await.map_err(|err| {
                if err.is_timeout() {
                    ProviderError::timeout(err.to_string())
                } else {
                    ProviderError::transport(err.to_string())
                }
            })?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            let parsed: ApiResponse = response
                .json()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))?;

            ChatCompletion::try_from(parsed)
        })
    }
}
