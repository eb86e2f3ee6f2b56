use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::jobdb::JobExt,
    dtos::jobdtos::{
        BidListResponseDto, BidResponseDto, CreateJobDto, JobListResponseDto, JobResponseDto,
        PaginationQuery, SubmitBidDto,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::usermodel::UserRole,
    AppState,
};

pub fn jobs_handler() -> Router {
    Router::new()
        .route("/", post(create_job).get(list_open_jobs))
        .route("/mine", get(list_my_jobs))
        .route("/:job_id", get(get_job))
        .route("/:job_id/complete", put(complete_job))
        .route("/:job_id/bids", post(submit_bid).get(list_job_bids))
        .route("/:job_id/bids/mine", get(get_own_bid))
        .route("/bids/:bid_id/accept", put(accept_bid))
        .route("/bids/:bid_id/reject", put(reject_bid))
        .route("/:job_id/collaboration", get(check_collaboration))
}

pub async fn create_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if auth.user.role != UserRole::Admin {
        return Err(HttpError::forbidden("Only job posters can create jobs"));
    }

    let job = app_state
        .db_client
        .create_job(
            auth.user.id,
            body.title,
            body.description,
            body.budget_min,
            body.budget_max,
            body.deadline,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        data: job,
    }))
}

pub async fn list_open_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let page = pagination.page.unwrap_or(1);
    let limit = pagination.limit.unwrap_or(20) as i64;
    let offset = ((page.saturating_sub(1)) as i64) * limit;

    let jobs = app_state
        .db_client
        .get_open_jobs(limit, offset)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(JobListResponseDto {
        status: "success".to_string(),
        results: jobs.len(),
        data: jobs,
    }))
}

pub async fn list_my_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let page = pagination.page.unwrap_or(1);
    let limit = pagination.limit.unwrap_or(20) as i64;
    let offset = ((page.saturating_sub(1)) as i64) * limit;

    let jobs = app_state
        .db_client
        .get_jobs_by_admin(auth.user.id, limit, offset)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(JobListResponseDto {
        status: "success".to_string(),
        results: jobs.len(),
        data: jobs,
    }))
}

pub async fn get_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .db_client
        .get_job_by_id(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        data: job,
    }))
}

pub async fn complete_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .task_service
        .complete_job(job_id, &auth.user)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        data: job,
    }))
}

pub async fn submit_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<SubmitBidDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let bid = app_state
        .bid_service
        .submit_bid(
            job_id,
            &auth.user,
            body.proposal,
            body.bid_amount,
            body.estimated_completion_time,
            body.cover_letter,
        )
        .await
        .map_err(HttpError::from)?;

    Ok(Json(BidResponseDto {
        status: "success".to_string(),
        data: bid,
    }))
}

pub async fn list_job_bids(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let bids = app_state
        .bid_service
        .list_job_bids(job_id, &auth.user)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(BidListResponseDto {
        status: "success".to_string(),
        results: bids.len(),
        data: bids,
    }))
}

pub async fn get_own_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let bid = app_state
        .bid_service
        .get_own_bid(job_id, auth.user.id)
        .await
        .map_err(HttpError::from)?
        .ok_or_else(|| HttpError::not_found("You have not bid on this job"))?;

    Ok(Json(BidResponseDto {
        status: "success".to_string(),
        data: bid,
    }))
}

pub async fn accept_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(bid_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let (job, bid) = app_state
        .bid_service
        .accept_bid(bid_id, &auth.user)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "job": job,
            "bid": bid
        }
    })))
}

pub async fn reject_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(bid_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let bid = app_state
        .bid_service
        .reject_bid(bid_id, &auth.user)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(BidResponseDto {
        status: "success".to_string(),
        data: bid,
    }))
}

/// Workroom access probe: answers whether the caller may collaborate on this
/// job and who the counterpart is. Denial is a definitive answer, not a
/// retryable failure; the client renders a restricted-access view from it.
pub async fn check_collaboration(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    use crate::dtos::userdtos::FilterUserDto;

    match app_state.collaboration.resolve(job_id, &auth.user).await {
        Ok(collaboration) => Ok(Json(serde_json::json!({
            "status": "success",
            "data": {
                "access": "granted",
                "job": collaboration.job,
                "counterpart": FilterUserDto::filter_user(&collaboration.counterpart)
            }
        }))),
        Err(e) if e.status_code() == axum::http::StatusCode::FORBIDDEN => {
            Ok(Json(serde_json::json!({
                "status": "success",
                "data": {
                    "access": "denied"
                }
            })))
        }
        Err(e) => Err(HttpError::from(e)),
    }
}
