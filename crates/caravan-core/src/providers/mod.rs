//! LLM provider layer
//!
//! Both configured providers (OpenAI, Groq) speak the OpenAI chat completions
//! wire format, so a single client implements [`LlmProvider`] for whichever
//! one the resolved configuration selected.

pub mod openai;
pub mod types;

pub use openai::OpenAiClient;
pub use types::{
    ChatMessage, ChatResponse, ChatResponseBlock, LlmProvider, StopReason, TokenUsage,
    ToolDefinition, UsageTotals,
};
