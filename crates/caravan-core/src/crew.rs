//! Sequential crew orchestration
//!
//! A crew runs its tasks in declaration order, one at a time. Each task gets
//! the trip request plus every prior task's output as context, then drives a
//! bounded tool-use loop against the provider. A failed task stops the run;
//! later tasks depend on earlier output.

use anyhow::{Result, anyhow};
use tracing::{debug, info, warn};

use crate::agent::Agent;
use crate::providers::types::{ChatBlock, ChatMessage, ChatMessageContent, ChatRole};
use crate::providers::{ChatResponseBlock, LlmProvider, StopReason, UsageTotals};
use crate::task::{Task, TaskResult, TaskStatus};
use crate::tools::{ScopedTools, ToolRegistry};

const MAX_TOOL_ITERATIONS: usize = 10;
const MAX_TOOL_OUTPUT: usize = 100_000;

/// A set of agents and the ordered tasks they run
#[derive(Debug)]
pub struct Crew {
    agents: Vec<Agent>,
    tasks: Vec<Task>,
}

impl Crew {
    /// Build a sequential crew, checking that every task names a known agent
    pub fn sequential(agents: Vec<Agent>, tasks: Vec<Task>) -> Result<Self> {
        if agents.is_empty() {
            return Err(anyhow!("Crew requires at least one agent"));
        }
        if tasks.is_empty() {
            return Err(anyhow!("Crew requires at least one task"));
        }
        for task in &tasks {
            if !agents.iter().any(|a| a.role == task.agent) {
                return Err(anyhow!(
                    "Task '{}' references unknown agent '{}'",
                    task.name,
                    task.agent
                ));
            }
        }
        Ok(Self { agents, tasks })
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Run all tasks in order. `context` is the rendered request the tasks
    /// share (destination, dates, party size, budget preference).
    pub async fn kickoff(
        &self,
        provider: &dyn LlmProvider,
        registry: &ToolRegistry,
        context: &str,
    ) -> CrewOutput {
        info!(
            "Crew kickoff: {} agents, {} tasks, provider {} ({})",
            self.agents.len(),
            self.tasks.len(),
            provider.provider_name(),
            provider.model(),
        );

        let mut results: Vec<TaskResult> = Vec::new();
        let mut totals = UsageTotals::new();

        for (idx, task) in self.tasks.iter().enumerate() {
            // Validated in sequential()
            let agent = self
                .agents
                .iter()
                .find(|a| a.role == task.agent)
                .expect("task agent validated at construction");

            info!(
                "[{}/{}] Task '{}' -> {}",
                idx + 1,
                self.tasks.len(),
                task.name,
                agent.role
            );

            let scoped = registry.scoped(&agent.tools);
            let prompt = build_task_prompt(task, context, &results);

            match run_task(provider, &scoped, agent, &prompt).await {
                Ok((output, usage)) => {
                    totals.merge(&usage);
                    results.push(TaskResult {
                        task: task.name.clone(),
                        agent: agent.role.clone(),
                        status: TaskStatus::Completed,
                        output,
                        usage,
                    });
                }
                Err(e) => {
                    warn!("Task '{}' failed: {}", task.name, e);
                    results.push(TaskResult {
                        task: task.name.clone(),
                        agent: agent.role.clone(),
                        status: TaskStatus::Failed,
                        output: format!("Error: {}", e),
                        usage: UsageTotals::new(),
                    });
                    // Later tasks build on this output; stop here
                    break;
                }
            }
        }

        CrewOutput { results, usage: totals }
    }
}

/// Compose the user message for a task: description, shared request, prior
/// task outputs, and the expected output contract.
fn build_task_prompt(task: &Task, context: &str, prior: &[TaskResult]) -> String {
    let mut prompt = format!("{}\n\n## Trip request\n{}", task.description, context);

    let completed: Vec<&TaskResult> = prior
        .iter()
        .filter(|r| r.status == TaskStatus::Completed)
        .collect();
    if !completed.is_empty() {
        prompt.push_str("\n\n## Findings from earlier crew members");
        for result in completed {
            prompt.push_str(&format!(
                "\n\n### {} ({})\n{}",
                result.task, result.agent, result.output
            ));
        }
    }

    prompt.push_str(&format!("\n\n## Expected output\n{}", task.expected_output));
    prompt
}

/// Drive one task's tool-use loop until the model ends its turn
async fn run_task(
    provider: &dyn LlmProvider,
    tools: &ScopedTools<'_>,
    agent: &Agent,
    prompt: &str,
) -> Result<(String, UsageTotals)> {
    let system = agent.system_prompt();
    let tool_defs = tools.definitions();
    let mut usage = UsageTotals::new();

    let mut conversation: Vec<ChatMessage> = vec![ChatMessage::user(prompt)];

    let mut iterations = 0;
    loop {
        iterations += 1;
        if iterations > MAX_TOOL_ITERATIONS {
            warn!("Tool loop exceeded maximum iterations ({})", MAX_TOOL_ITERATIONS);
            return Err(anyhow!("Tool loop exceeded maximum iterations"));
        }

        debug!("Tool loop iteration {} for {}", iterations, agent.role);

        let response = provider.chat(&conversation, &tool_defs, &system).await?;
        usage.add(response.usage);

        // Mirror the response into conversation history
        let assistant_blocks: Vec<ChatBlock> = response
            .blocks
            .iter()
            .map(|block| match block {
                ChatResponseBlock::Text { text } => ChatBlock::Text { text: text.clone() },
                ChatResponseBlock::ToolCall { id, name, input } => ChatBlock::ToolCall {
                    id: id.clone(),
                    name: name.clone(),
                    input: input.clone(),
                },
            })
            .collect();
        conversation.push(ChatMessage {
            role: ChatRole::Assistant,
            content: ChatMessageContent::Blocks(assistant_blocks),
        });

        match response.stop_reason {
            StopReason::ToolUse => {
                let mut tool_results = Vec::new();

                for block in &response.blocks {
                    if let ChatResponseBlock::ToolCall { id, name, input } = block {
                        info!("{} calling tool: {}", agent.role, name);
                        usage.record_tool_call(name);

                        let mut content = match tools.execute(name, input.clone()).await {
                            Ok(output) => output,
                            // Surface tool failures to the model instead of
                            // aborting the conversation
                            Err(e) => format!("Error: {}", e),
                        };

                        if content.len() > MAX_TOOL_OUTPUT {
                            content.truncate(MAX_TOOL_OUTPUT);
                            content.push_str("\n[Output truncated]");
                        }

                        tool_results.push(ChatBlock::ToolResult {
                            tool_call_id: id.clone(),
                            content,
                        });
                    }
                }

                if tool_results.is_empty() {
                    return Err(anyhow!("Stop reason was tool use but no tool calls found"));
                }

                conversation.push(ChatMessage {
                    role: ChatRole::User,
                    content: ChatMessageContent::Blocks(tool_results),
                });
            }
            StopReason::EndTurn | StopReason::MaxTokens => {
                if response.stop_reason == StopReason::MaxTokens {
                    warn!("{} response truncated by max_tokens", agent.role);
                }

                let text = response.text();
                if text.is_empty() {
                    return Err(anyhow!("No text response from agent"));
                }

                debug!(
                    "Task done for {} (iterations: {}, tokens: in={} out={})",
                    agent.role, iterations, usage.input_tokens, usage.output_tokens
                );
                return Ok((text, usage));
            }
            StopReason::Unknown => {
                return Err(anyhow!("Provider returned an unexpected stop reason"));
            }
        }
    }
}

/// Everything a crew run produced
#[derive(Debug)]
pub struct CrewOutput {
    pub results: Vec<TaskResult>,
    pub usage: UsageTotals,
}

impl CrewOutput {
    /// Whether every task completed
    pub fn is_success(&self) -> bool {
        !self.results.is_empty()
            && self
                .results
                .iter()
                .all(|r| r.status == TaskStatus::Completed)
    }

    /// The last completed task's output, which is the crew's final report
    pub fn final_report(&self) -> Option<&str> {
        self.results
            .iter()
            .rev()
            .find(|r| r.status == TaskStatus::Completed)
            .map(|r| r.output.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::types::{ChatResponse, TokenUsage, ToolDefinition};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted provider: pops pre-canned responses and records each prompt
    struct ScriptedProvider {
        responses: Mutex<Vec<Result<ChatResponse>>>,
        seen_prompts: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<ChatResponse>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                seen_prompts: Mutex::new(Vec::new()),
            }
        }

        fn text_response(text: &str) -> ChatResponse {
            ChatResponse {
                blocks: vec![ChatResponseBlock::Text {
                    text: text.to_string(),
                }],
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage {
                    input_tokens: 10,
                    output_tokens: 5,
                },
            }
        }

        fn tool_call_response(name: &str, input: serde_json::Value) -> ChatResponse {
            ChatResponse {
                blocks: vec![ChatResponseBlock::ToolCall {
                    id: "tc_1".to_string(),
                    name: name.to_string(),
                    input,
                }],
                stop_reason: StopReason::ToolUse,
                usage: TokenUsage {
                    input_tokens: 10,
                    output_tokens: 5,
                },
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn provider_name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-model"
        }

        async fn chat(
            &self,
            messages: &[ChatMessage],
            _tools: &[ToolDefinition],
            _system: &str,
        ) -> Result<ChatResponse> {
            if let Some(ChatMessage {
                content: ChatMessageContent::Text(text),
                ..
            }) = messages.first()
            {
                self.seen_prompts.lock().unwrap().push(text.clone());
            }
            self.responses
                .lock()
                .unwrap()
                .remove(0)
        }
    }

    fn two_task_crew() -> Crew {
        let agents = vec![
            Agent::new("Researcher", "Research things", "Curious")
                .with_tools(&["search_flight_prices"]),
            Agent::new("Writer", "Write things up", "Succinct"),
        ];
        let tasks = vec![
            Task::new("research", "Do the research", "Raw findings", "Researcher"),
            Task::new("write", "Write the report", "Final report", "Writer"),
        ];
        Crew::sequential(agents, tasks).unwrap()
    }

    #[test]
    fn test_sequential_rejects_unknown_agent() {
        let agents = vec![Agent::new("Researcher", "g", "b")];
        let tasks = vec![Task::new("t", "d", "e", "Nobody")];
        let result = Crew::sequential(agents, tasks);
        assert!(result.unwrap_err().to_string().contains("Nobody"));
    }

    #[test]
    fn test_sequential_rejects_empty() {
        assert!(Crew::sequential(vec![], vec![]).is_err());
        let agents = vec![Agent::new("A", "g", "b")];
        assert!(Crew::sequential(agents, vec![]).is_err());
    }

    #[tokio::test]
    async fn test_kickoff_runs_tasks_in_order() {
        let crew = two_task_crew();
        let provider = ScriptedProvider::new(vec![
            Ok(ScriptedProvider::text_response("flight findings")),
            Ok(ScriptedProvider::text_response("final plan")),
        ]);
        let registry = ToolRegistry::with_research_tools();

        let output = crew.kickoff(&provider, &registry, "Trip to Iceland").await;

        assert!(output.is_success());
        assert_eq!(output.results.len(), 2);
        assert_eq!(output.results[0].task, "research");
        assert_eq!(output.results[1].task, "write");
        assert_eq!(output.final_report(), Some("final plan"));
        assert_eq!(output.usage.api_calls, 2);
        assert_eq!(output.usage.total_tokens(), 30);
    }

    #[tokio::test]
    async fn test_kickoff_forwards_prior_output_as_context() {
        let crew = two_task_crew();
        let provider = ScriptedProvider::new(vec![
            Ok(ScriptedProvider::text_response("flight findings")),
            Ok(ScriptedProvider::text_response("final plan")),
        ]);
        let registry = ToolRegistry::with_research_tools();

        crew.kickoff(&provider, &registry, "Trip to Iceland").await;

        let prompts = provider.seen_prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        // First task sees no prior findings
        assert!(!prompts[0].contains("Findings from earlier crew members"));
        assert!(prompts[0].contains("Trip to Iceland"));
        // Second task sees the first task's output
        assert!(prompts[1].contains("Findings from earlier crew members"));
        assert!(prompts[1].contains("flight findings"));
        assert!(prompts[1].contains("Researcher"));
    }

    #[tokio::test]
    async fn test_kickoff_executes_tool_calls() {
        let crew = two_task_crew();
        let provider = ScriptedProvider::new(vec![
            Ok(ScriptedProvider::tool_call_response(
                "search_flight_prices",
                serde_json::json!({"destination": "Iceland"}),
            )),
            Ok(ScriptedProvider::text_response("flight findings")),
            Ok(ScriptedProvider::text_response("final plan")),
        ]);
        let registry = ToolRegistry::with_research_tools();

        let output = crew.kickoff(&provider, &registry, "Trip to Iceland").await;

        assert!(output.is_success());
        assert_eq!(output.usage.tool_calls, vec!["search_flight_prices"]);
        assert_eq!(output.usage.api_calls, 3);
    }

    #[tokio::test]
    async fn test_tool_error_is_fed_back_not_fatal() {
        let crew = two_task_crew();
        // The researcher asks for a tool outside its allowlist; the error is
        // surfaced as a tool result and the model recovers
        let provider = ScriptedProvider::new(vec![
            Ok(ScriptedProvider::tool_call_response(
                "search_hotel_options",
                serde_json::json!({}),
            )),
            Ok(ScriptedProvider::text_response("recovered findings")),
            Ok(ScriptedProvider::text_response("final plan")),
        ]);
        let registry = ToolRegistry::with_research_tools();

        let output = crew.kickoff(&provider, &registry, "Trip to Iceland").await;
        assert!(output.is_success());
    }

    #[tokio::test]
    async fn test_failed_task_stops_the_run() {
        let crew = two_task_crew();
        let provider = ScriptedProvider::new(vec![Err(anyhow!("API request failed"))]);
        let registry = ToolRegistry::with_research_tools();

        let output = crew.kickoff(&provider, &registry, "Trip to Iceland").await;

        assert!(!output.is_success());
        assert_eq!(output.results.len(), 1);
        assert_eq!(output.results[0].status, TaskStatus::Failed);
        assert!(output.final_report().is_none());
    }

    #[tokio::test]
    async fn test_runaway_tool_loop_is_bounded() {
        let crew = two_task_crew();
        // Always asks for another tool call; the loop must give up
        let responses: Vec<Result<ChatResponse>> = (0..12)
            .map(|_| {
                Ok(ScriptedProvider::tool_call_response(
                    "search_flight_prices",
                    serde_json::json!({"destination": "Iceland"}),
                ))
            })
            .collect();
        let provider = ScriptedProvider::new(responses);
        let registry = ToolRegistry::with_research_tools();

        let output = crew.kickoff(&provider, &registry, "Trip to Iceland").await;
        assert!(!output.is_success());
        assert!(output.results[0].output.contains("maximum iterations"));
    }
}
