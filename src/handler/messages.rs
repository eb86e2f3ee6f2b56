use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Path,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{get, put},
    Extension, Json, Router,
};
use futures::stream::{self, Stream, StreamExt};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::messagedtos::{MessageListResponseDto, MessageResponseDto, SendMessageDto},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::messagemodel::Message,
    AppState,
};

pub fn messages_handler() -> Router {
    Router::new()
        .route("/:job_id/messages", get(get_messages).post(send_message))
        .route("/:job_id/messages/subscribe", get(subscribe_messages))
        .route("/:job_id/messages/read", put(mark_as_read))
        .route("/:job_id/messages/unread-count", get(get_unread_count))
}

pub async fn send_message(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<SendMessageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let message = app_state
        .message_service
        .post_message(job_id, &auth.user, &body.content)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(MessageResponseDto {
        status: "success".to_string(),
        data: message,
    }))
}

pub async fn get_messages(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let messages = app_state
        .message_service
        .get_history(job_id, &auth.user)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(MessageListResponseDto {
        status: "success".to_string(),
        results: messages.len(),
        data: messages,
    }))
}

/// Live message feed. The subscriber first receives the full ordered
/// history, then new messages as they are posted. Closing the connection
/// drops the broadcast receiver, which is the unsubscription: nothing is
/// delivered past that point and the channel slot is reclaimed.
pub async fn subscribe_messages(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, HttpError> {
    let (history, receiver) = app_state
        .message_service
        .subscribe(job_id, &auth.user)
        .await
        .map_err(HttpError::from)?;

    tracing::debug!(
        job_id = %job_id,
        subscriber = %auth.user.id,
        backlog = history.len(),
        "message feed opened"
    );

    let history_stream = stream::iter(history.into_iter().map(message_event));

    let live_stream = BroadcastStream::new(receiver).filter_map(|result| async move {
        match result {
            Ok(message) => Some(message_event(message)),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                // Slow consumer: it can refetch history; the feed stays open.
                tracing::warn!(skipped, "message feed lagged, dropping missed events");
                None
            }
        }
    });

    Ok(Sse::new(history_stream.chain(live_stream)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}

fn message_event(message: Message) -> Result<Event, Infallible> {
    let event = Event::default()
        .event("message")
        .id(message.id.to_string());
    // Duplicate suppression on reconnect is keyed off the event id.
    Ok(match serde_json::to_string(&message) {
        Ok(payload) => event.data(payload),
        Err(_) => event.data("{}"),
    })
}

pub async fn mark_as_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let updated = app_state
        .message_service
        .mark_read(job_id, &auth.user)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "marked_read": updated
        }
    })))
}

pub async fn get_unread_count(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let count = app_state
        .message_service
        .unread_count(job_id, &auth.user)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "unread_count": count
        }
    })))
}
