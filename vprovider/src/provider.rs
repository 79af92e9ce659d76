use vcommon::BoxFuture;

use crate::{ModelRequest, ModelResponse, ProviderError, ProviderId};

pub type ProviderFuture<'a, T> = BoxFuture<'a, T>;

/// Opaque reasoning capability: a prompt goes in, completion text comes out.
pub trait ModelProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>>;
}
