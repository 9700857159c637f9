//! Task definitions and results

use crate::providers::UsageTotals;

/// A research assignment bound to an agent by role name
#[derive(Debug, Clone)]
pub struct Task {
    pub name: String,
    pub description: String,
    pub expected_output: String,
    /// Role of the agent that runs this task
    pub agent: String,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent: agent.into(),
        }
    }
}

/// Outcome of a single task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Completed,
    Failed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Result from a finished task
#[derive(Debug, Clone)]
pub struct TaskResult {
    pub task: String,
    pub agent: String,
    pub status: TaskStatus,
    pub output: String,
    pub usage: UsageTotals,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_construction() {
        let task = Task::new(
            "flight_research",
            "Research flight options",
            "A report with 2-3 flight options",
            "Flight Specialist",
        );
        assert_eq!(task.agent, "Flight Specialist");
        assert_eq!(task.name, "flight_research");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(TaskStatus::Completed.to_string(), "completed");
        assert_eq!(TaskStatus::Failed.to_string(), "failed");
    }
}
