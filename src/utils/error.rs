use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrawError {
    #[error("Participant name is missing or blank")]
    MissingName,

    #[error("Participant '{name}' has already drawn")]
    AlreadyDrawn { name: String },

    #[error("Task pool is empty")]
    NoTasksConfigured,

    #[error("Every task in the pool has been assigned")]
    PoolExhausted,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed at {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

impl DrawError {
    /// 抽籤規則被拒絕的請求 (而非伺服器故障)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DrawError::MissingName
                | DrawError::AlreadyDrawn { .. }
                | DrawError::NoTasksConfigured
                | DrawError::PoolExhausted
        )
    }

    /// 檔案不存在 (尚未配置) 的情況
    pub fn is_not_found(&self) -> bool {
        matches!(self, DrawError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// 回傳給前端顯示的訊息
    pub fn user_message(&self) -> String {
        match self {
            DrawError::MissingName => "请输入姓名".to_string(),
            DrawError::AlreadyDrawn { .. } => "你已经抽过了！".to_string(),
            DrawError::NoTasksConfigured => "任务列表为空，请联系管理员".to_string(),
            DrawError::PoolExhausted => "所有任务已被抽完！".to_string(),
            DrawError::ConfigError { .. }
            | DrawError::InvalidConfigValueError { .. }
            | DrawError::ConfigValidationError { .. } => self.to_string(),
            DrawError::IoError(_) | DrawError::SerializationError(_) => {
                "服务器内部错误".to_string()
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for DrawError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("❌ Request failed: {}", self);
        }

        (
            status,
            Json(ErrorBody {
                error: self.user_message(),
            }),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, DrawError>;
