use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::taskmodel::{Task, TaskStatus};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: Option<String>,

    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskStatusDto {
    pub status: TaskStatus,
}

#[derive(Debug, Serialize)]
pub struct TaskResponseDto {
    pub status: String,
    pub data: Task,
}

/// Workroom view: tasks grouped by board column.
#[derive(Debug, Serialize)]
pub struct TaskBoardDto {
    pub pending: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub completed: Vec<Task>,
}

impl TaskBoardDto {
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut board = TaskBoardDto {
            pending: Vec::new(),
            in_progress: Vec::new(),
            completed: Vec::new(),
        };
        for task in tasks {
            match task.status {
                TaskStatus::Pending => board.pending.push(task),
                TaskStatus::InProgress => board.in_progress.push(task),
                TaskStatus::Completed => board.completed.push(task),
            }
        }
        board
    }
}

#[derive(Debug, Serialize)]
pub struct TaskBoardResponseDto {
    pub status: String,
    pub data: TaskBoardDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn task(status: TaskStatus) -> Task {
        Task {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            freelancer_id: Uuid::new_v4(),
            title: "Design mockup".to_string(),
            description: None,
            status,
            due_date: None,
            completed_at: None,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    #[test]
    fn tasks_land_in_their_columns() {
        let board = TaskBoardDto::from_tasks(vec![
            task(TaskStatus::Pending),
            task(TaskStatus::Completed),
            task(TaskStatus::InProgress),
            task(TaskStatus::Completed),
        ]);

        assert_eq!(board.pending.len(), 1);
        assert_eq!(board.in_progress.len(), 1);
        assert_eq!(board.completed.len(), 2);
    }
}
