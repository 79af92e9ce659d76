//! Chat-completions adapter shared by OpenAI, DashScope compatible mode, and Ollama.

mod provider;
mod serde_api;
mod transport;

pub use provider::OpenAiCompatProvider;
pub use transport::{
    ChatCompletion, ChatCompletionRequest, ChatCompletionsTransport, HttpChatTransport,
};
