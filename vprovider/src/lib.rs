//! Reasoning provider abstractions and the chat-completions adapter.

pub mod adapters;
mod credentials;
mod error;
mod model;
mod provider;
mod resilience;

pub mod prelude {
    pub use crate::{
        Message, ModelProvider, ModelRequest, ModelRequestBuilder, ModelResponse,
        NoopOperationHooks, ProviderError, ProviderErrorKind, ProviderFuture, ProviderId,
        ProviderOperationHooks, RetryPolicy, RetryingProvider, Role, StopReason, TokenUsage,
    };
    pub use vcommon::{BoxFuture, GenerationOptions, MetadataMap};
}

pub use credentials::{SecretString, resolve_api_key};
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{
    Message, ModelRequest, ModelRequestBuilder, ModelResponse, ProviderId, Role, StopReason,
    TokenUsage,
};
pub use provider::{ModelProvider, ProviderFuture};
pub use resilience::{
    NoopOperationHooks, ProviderOperationHooks, RetryPolicy, RetryingProvider, execute_with_retry,
};
