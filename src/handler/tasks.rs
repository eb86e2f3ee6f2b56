use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::taskdtos::{
        CreateTaskDto, TaskBoardDto, TaskBoardResponseDto, TaskResponseDto, UpdateTaskStatusDto,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn tasks_handler() -> Router {
    Router::new()
        .route("/:job_id/tasks", get(get_task_board).post(create_task))
        .route("/tasks/:task_id/status", put(update_task_status))
}

pub async fn create_task(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<CreateTaskDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let task = app_state
        .task_service
        .create_task(job_id, &auth.user, body.title, body.description, body.due_date)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(TaskResponseDto {
        status: "success".to_string(),
        data: task,
    }))
}

pub async fn get_task_board(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let tasks = app_state
        .task_service
        .list_tasks(job_id, &auth.user)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(TaskBoardResponseDto {
        status: "success".to_string(),
        data: TaskBoardDto::from_tasks(tasks),
    }))
}

pub async fn update_task_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(task_id): Path<Uuid>,
    Json(body): Json<UpdateTaskStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let task = app_state
        .task_service
        .transition(task_id, &auth.user, body.status)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(TaskResponseDto {
        status: "success".to_string(),
        data: task,
    }))
}
