//! Agent personas
//!
//! An agent is a prompt persona: a role, a goal, a backstory, and the tools
//! it may call. The persona renders its own system prompt; everything else
//! (model, temperature, provider) comes from the resolved configuration.

/// A crew member with a fixed persona and tool allowlist
#[derive(Debug, Clone)]
pub struct Agent {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub tools: Vec<String>,
}

impl Agent {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            tools: Vec::new(),
        }
    }

    /// Restrict the agent to the named tools
    pub fn with_tools(mut self, tools: &[&str]) -> Self {
        self.tools = tools.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Render the persona into a system prompt
    pub fn system_prompt(&self) -> String {
        format!(
            "You are the {role} of a travel planning crew.\n\n\
             ## Your goal\n{goal}\n\n\
             ## Background\n{backstory}\n\n\
             Use your research tools when you need current information, then \
             respond with your findings directly. Be thorough and concrete.",
            role = self.role,
            goal = self.goal,
            backstory = self.backstory,
        )
    }
}
