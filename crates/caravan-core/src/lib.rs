//! caravan-core - configuration, providers, and crew orchestration
//!
//! This crate provides:
//! - Environment-driven provider configuration with a two-way OpenAI/Groq
//!   fallback, fail-fast validation, and secret-redacting display
//! - An OpenAI-compatible chat completions client behind the [`LlmProvider`]
//!   trait
//! - A tool registry with per-agent scoping and the travel research tools
//! - A sequential crew orchestrator that chains task outputs as context

pub mod agent;
pub mod config;
pub mod crew;
pub mod providers;
pub mod task;
pub mod tools;
pub mod travel;

// Re-export main types for convenience
pub use agent::Agent;
pub use config::{ConfigError, Provider, ProviderConfig, resolve};
pub use crew::{Crew, CrewOutput};
pub use providers::{LlmProvider, OpenAiClient, UsageTotals};
pub use task::{Task, TaskResult, TaskStatus};
pub use tools::{ToolHandler, ToolRegistry};
pub use travel::{TripRequest, travel_crew};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_exports() {
        // Just verify that all main types are exported
        let _ = std::mem::size_of::<ProviderConfig>();
        let _ = std::mem::size_of::<OpenAiClient>();
        let _ = std::mem::size_of::<ToolRegistry>();
        let _ = std::mem::size_of::<TripRequest>();
        let _ = std::mem::size_of::<CrewOutput>();
    }
}
