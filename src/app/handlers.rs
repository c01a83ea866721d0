use crate::app::server::AppState;
use crate::core::{DrawRequest, DrawResponse, Storage};
use crate::domain::model::HealthResponse;
use crate::utils::error::DrawError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use std::path::Path;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub async fn index<S: Storage + 'static>(State(state): State<AppState<S>>) -> Response {
    let Some(dir) = state.static_dir.as_deref() else {
        return Html(INDEX_HTML).into_response();
    };

    let path = Path::new(dir).join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", path.display(), e);
            (StatusCode::NOT_FOUND, "index.html not found").into_response()
        }
    }
}

pub async fn list_participants<S: Storage + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<String>>, DrawError> {
    let participants = state.service.remaining_participants().await?;
    Ok(Json(participants))
}

pub async fn draw<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<DrawRequest>, JsonRejection>,
) -> Result<Json<DrawResponse>, DrawError> {
    // 無法解析的請求一律當作沒有填姓名
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Rejected draw body: {}", rejection);
            DrawRequest::default()
        }
    };

    let Some(name) = request.participant() else {
        return Err(DrawError::MissingName);
    };

    match state.service.draw(name).await {
        Ok(task) => Ok(Json(DrawResponse { task })),
        Err(e) => {
            if e.is_client_error() {
                tracing::warn!(participant = %name, "Draw rejected: {}", e);
            }
            Err(e)
        }
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
