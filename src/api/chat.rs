//! Chat turn and reply audio endpoints

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{self, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ApiState;
use crate::history::History;

/// Build chat router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/audio/{name}", get(audio))
        .with_state(state)
}

/// One submission from the widget
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Session state from the previous response; absent on the first turn
    #[serde(default)]
    pub history: Option<History>,
}

/// Reply audio plus the session state to send back next turn
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Where to fetch the reply audio; `null` when synthesis failed
    pub audio_url: Option<String>,
    pub reply: String,
    pub history: History,
}

/// Run one chat turn
async fn chat(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ChatError> {
    let turn = state
        .chatbot
        .respond(&request.message, request.history)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "chat turn failed");
            ChatError::GenerationFailed(e.to_string())
        })?;

    Ok(Json(ChatResponse {
        audio_url: turn.audio.as_deref().and_then(audio_url),
        reply: turn.reply,
        history: turn.history,
    }))
}

/// URL for a written audio file
///
/// The query string changes every turn so browsers refetch a shared file.
fn audio_url(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    Some(format!("/api/audio/{name}?v={}", Uuid::new_v4().simple()))
}

/// Serve a synthesized reply
///
/// Returns audio in MP3 format
async fn audio(
    State(state): State<Arc<ApiState>>,
    extract::Path(name): extract::Path<String>,
) -> Result<Response, ChatError> {
    let path = state
        .chatbot
        .audio_output()
        .resolve(&name)
        .ok_or(ChatError::NotFound)?;

    let audio = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ChatError::NotFound,
        _ => ChatError::Internal(e.to_string()),
    })?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        audio,
    )
        .into_response())
}

/// Chat API errors
#[derive(Debug)]
pub enum ChatError {
    GenerationFailed(String),
    NotFound,
    Internal(String),
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: ErrorBody,
        }

        #[derive(Serialize)]
        struct ErrorBody {
            code: &'static str,
            message: String,
        }

        let (status, code, message) = match self {
            Self::GenerationFailed(msg) => (StatusCode::BAD_GATEWAY, "generation_failed", msg),
            Self::NotFound => (StatusCode::NOT_FOUND, "not_found", "audio not found".to_string()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
        };

        (status, Json(ErrorResponse { error: ErrorBody { code, message } })).into_response()
    }
}
