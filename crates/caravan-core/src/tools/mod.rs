//! Tool registry and per-agent scoping

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::providers::ToolDefinition;

pub mod research;

/// Individual tool handler
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> Value;
    async fn execute(&self, input: Value) -> Result<String>;
}

/// Registry of available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registry pre-loaded with the travel research tools
    pub fn with_research_tools() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(research::FlightSearchTool));
        registry.register(Arc::new(research::HotelSearchTool));
        registry.register(Arc::new(research::AttractionSearchTool));
        registry.register(Arc::new(research::TravelCostTool));
        registry
    }

    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        let name = handler.name().to_string();
        debug!("Registering tool: {}", name);
        self.tools.insert(name, handler);
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// View of the registry restricted to an agent's allowlist
    pub fn scoped<'a>(&'a self, allowed: &'a [String]) -> ScopedTools<'a> {
        ScopedTools {
            registry: self,
            allowed,
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry view that only advertises and executes an agent's allowed tools
pub struct ScopedTools<'a> {
    registry: &'a ToolRegistry,
    allowed: &'a [String],
}

impl ScopedTools<'_> {
    /// Definitions for the allowed tools, in allowlist order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.allowed
            .iter()
            .filter_map(|name| self.registry.tools.get(name))
            .map(|handler| ToolDefinition {
                name: handler.name().to_string(),
                description: handler.description().to_string(),
                input_schema: handler.input_schema(),
            })
            .collect()
    }

    /// Execute a tool the agent is allowed to use
    pub async fn execute(&self, tool_name: &str, input: Value) -> Result<String> {
        if !self.allowed.iter().any(|name| name == tool_name) {
            warn!("Agent requested tool outside its allowlist: {}", tool_name);
            return Err(anyhow!("Tool '{}' is not available to this agent", tool_name));
        }

        let handler = self
            .registry
            .tools
            .get(tool_name)
            .ok_or_else(|| anyhow!("Unknown tool: {}", tool_name))?;

        debug!("Executing tool: {} with input: {:?}", tool_name, input);
        match handler.execute(input).await {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("Tool {} failed: {}", tool_name, e);
                Err(e)
            }
        }
    }
}

/// Helper to build a JSON schema for tool input
pub fn json_schema(properties: Value, required: Vec<&str>) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl ToolHandler for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the input back"
        }

        fn input_schema(&self) -> Value {
            json_schema(
                serde_json::json!({
                    "text": {"type": "string", "description": "Text to echo"}
                }),
                vec!["text"],
            )
        }

        async fn execute(&self, input: Value) -> Result<String> {
            Ok(input
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string())
        }
    }

    #[test]
    fn test_register_and_count() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());
        registry.register(Arc::new(EchoTool));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_research_registry_has_all_four_tools() {
        let registry = ToolRegistry::with_research_tools();
        assert_eq!(registry.len(), 4);
        let all: Vec<String> = [
            "search_flight_prices",
            "search_hotel_options",
            "search_attractions_activities",
            "search_travel_costs",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(registry.scoped(&all).definitions().len(), 4);
    }

    #[test]
    fn test_scoped_definitions_filter() {
        let registry = ToolRegistry::with_research_tools();
        let allowed = vec!["search_flight_prices".to_string()];
        let defs = registry.scoped(&allowed).definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "search_flight_prices");
    }

    #[tokio::test]
    async fn test_scoped_execute_blocks_unlisted_tool() {
        let registry = ToolRegistry::with_research_tools();
        let allowed = vec!["search_flight_prices".to_string()];
        let scoped = registry.scoped(&allowed);
        let result = scoped
            .execute("search_hotel_options", serde_json::json!({}))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_scoped_execute_unknown_tool() {
        let registry = ToolRegistry::new();
        let allowed = vec!["missing".to_string()];
        let result = registry
            .scoped(&allowed)
            .execute("missing", serde_json::json!({}))
            .await;
        assert!(result.unwrap_err().to_string().contains("Unknown tool"));
    }

    #[tokio::test]
    async fn test_scoped_execute_allowed_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        let allowed = vec!["echo".to_string()];
        let result = registry
            .scoped(&allowed)
            .execute("echo", serde_json::json!({"text": "hi"}))
            .await
            .unwrap();
        assert_eq!(result, "hi");
    }
}
