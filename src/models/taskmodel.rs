use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn to_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Whether a task may move from `self` to `to` in a single step.
    /// Completed is terminal: no edge leaves it.
    pub fn can_transition(&self, to: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, to),
            (Pending, InProgress) | (InProgress, Pending) | (InProgress, Completed) | (Pending, Completed)
        )
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Task {
    pub id: Uuid,
    pub job_id: Uuid,
    // The job's accepted freelancer at creation time.
    pub freelancer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::TaskStatus::*;

    #[test]
    fn forward_path_is_allowed() {
        assert!(Pending.can_transition(InProgress));
        assert!(InProgress.can_transition(Completed));
    }

    #[test]
    fn rollback_to_pending_is_allowed() {
        assert!(InProgress.can_transition(Pending));
    }

    #[test]
    fn direct_completion_is_allowed() {
        assert!(Pending.can_transition(Completed));
    }

    #[test]
    fn completed_is_terminal() {
        assert!(!Completed.can_transition(Pending));
        assert!(!Completed.can_transition(InProgress));
        assert!(!Completed.can_transition(Completed));
    }

    #[test]
    fn self_transitions_are_rejected() {
        assert!(!Pending.can_transition(Pending));
        assert!(!InProgress.can_transition(InProgress));
    }
}
