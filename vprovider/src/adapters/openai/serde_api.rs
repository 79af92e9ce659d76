//! Chat-completions HTTP payload serde models and conversion helpers.

use serde::{Deserialize, Serialize};

use crate::{Message, ProviderError, StopReason, TokenUsage};

use super::transport::{ChatCompletion, ChatCompletionRequest};

pub(crate) fn build_api_request(
    request: &ChatCompletionRequest,
) -> Result<ApiRequest, ProviderError> {
    if request.messages.is_empty() {
        return Err(ProviderError::invalid_request(
            "chat completion requires at least one message",
        ));
    }

    let messages = request
        .messages
        .iter()
        .map(ApiMessage::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ApiRequest {
        model: request.model.clone(),
        messages,
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        stream: false,
    })
}

pub(crate) fn parse_stop_reason(value: Option<&str>) -> StopReason {
    match value {
        Some("stop") => StopReason::EndTurn,
        Some("length") => StopReason::MaxTokens,
        _ => StopReason::Other,
    }
}

pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ApiErrorEnvelope>(body).ok()?;
    Some(parsed.error.message)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiRequest {
    pub model: String,
    pub messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiMessage {
    pub role: &'static str,
    pub content: String,
}

impl TryFrom<&Message> for ApiMessage {
    type Error = ProviderError;

    fn try_from(value: &Message) -> Result<Self, Self::Error> {
        if value.content.trim().is_empty() {
            return Err(ProviderError::invalid_request(format!(
                "{} message content must not be empty",
                value.role.as_str()
            )));
        }

        Ok(Self {
            role: value.role.as_str(),
            content: value.content.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    pub model: String,
    pub choices: Vec<ApiChoice>,
    pub usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiChoice {
    pub message: ApiAssistantMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiAssistantMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TryFrom<ApiResponse> for ChatCompletion {
    type Error = ProviderError;

    fn try_from(value: ApiResponse) -> Result<Self, Self::Error> {
        let choice = value
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::transport("chat completion did not include choices"))?;

        let usage = value
            .usage
            .map(|usage| TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            })
            .unwrap_or_default();

        Ok(Self {
            model: value.model,
            content: choice.message.content.unwrap_or_default(),
            stop_reason: parse_stop_reason(choice.finish_reason.as_deref()),
            usage,
        })
    }
}
