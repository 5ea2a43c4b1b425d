use std::fmt;

use crate::connect::TaskStatus;

/// Run-state category of a connector task.
///
/// Classification is an exact, case-sensitive match against the states Kafka Connect reports.
/// Every other value, including empty and not-yet-known states, lands in `Unassigned` so that
/// each task is counted exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskState {
    Running,
    Paused,
    Failed,
    Unassigned,
}

impl TaskState {
    pub const RUNNING: &'static str = "RUNNING";
    pub const PAUSED: &'static str = "PAUSED";
    pub const FAILED: &'static str = "FAILED";

    pub fn classify(state: &str) -> Self {
        match state {
            Self::RUNNING => Self::Running,
            Self::PAUSED => Self::Paused,
            Self::FAILED => Self::Failed,
            _ => Self::Unassigned,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Failed => "failed",
            Self::Unassigned => "unassigned",
        };
        f.write_str(label)
    }
}

/// Per-connector task counts by [`TaskState`].
///
/// `total()` always equals the sum of the category counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskTally {
    pub running: usize,
    pub paused: usize,
    pub failed: usize,
    pub unassigned: usize,
}

impl TaskTally {
    pub fn tally<'t>(tasks: impl IntoIterator<Item = &'t TaskStatus>) -> Self {
        tasks
            .into_iter()
            .fold(Self::default(), |acc, task| acc.with(TaskState::classify(&task.state)))
    }

    fn with(mut self, state: TaskState) -> Self {
        match state {
            TaskState::Running => self.running += 1,
            TaskState::Paused => self.paused += 1,
            TaskState::Failed => self.failed += 1,
            TaskState::Unassigned => self.unassigned += 1,
        }
        self
    }

    pub fn count(&self, state: TaskState) -> usize {
        match state {
            TaskState::Running => self.running,
            TaskState::Paused => self.paused,
            TaskState::Failed => self.failed,
            TaskState::Unassigned => self.unassigned,
        }
    }

    pub fn total(&self) -> usize {
        self.running + self.paused + self.failed + self.unassigned
    }
}
