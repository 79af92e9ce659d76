//! Chat-completions provider over a transport and the shared model types.

use std::sync::Arc;

use crate::{
    ModelProvider, ModelRequest, ModelResponse, ProviderError, ProviderFuture, ProviderId,
    SecretString, resolve_api_key,
};

use super::transport::{ChatCompletionRequest, ChatCompletionsTransport};

#[derive(Clone)]
pub struct OpenAiCompatProvider {
    id: ProviderId,
    api_key: Option<SecretString>,
    transport: Arc<dyn ChatCompletionsTransport>,
}

impl OpenAiCompatProvider {
    /// Fails when a hosted provider is given no usable key.
    pub fn new(
        id: ProviderId,
        api_key: Option<&str>,
        transport: Arc<dyn ChatCompletionsTransport>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            id,
            api_key: resolve_api_key(id, api_key)?,
            transport,
        })
    }

    pub(crate) fn build_completion_request(&self, request: ModelRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request.model,
            messages: request.messages,
            temperature: request.options.temperature,
            max_tokens: request.options.max_tokens,
        }
    }
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("id", &self.id)
            .field("api_key", &self.api_key)
            .field("transport", &self.transport)
            .finish()
    }
}

impl ModelProvider for OpenAiCompatProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let completion = self
                .transport
                .complete(
                    self.build_completion_request(request),
                    self.api_key.as_ref().map(SecretString::expose),
                )
                .await?;

            Ok(ModelResponse {
                provider: self.id,
                model: completion.model,
                content: completion.content,
                stop_reason: completion.stop_reason,
                usage: completion.usage,
            })
        })
    }
}
