use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store operation timed out")]
    Timeout,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// 种子数据下载/解析错误
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to fetch seed data: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("failed to decode seed data: {0}")]
    Decode(#[from] serde_json::Error),
}

/// 应用错误
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid month: {0}")]
    InvalidMonth(String),

    #[error("month is required")]
    MissingMonth,

    #[error("invalid {name}: {value}")]
    InvalidPage { name: &'static str, value: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Seed(#[from] SeedError),
}

impl AppError {
    /// 输入校验错误返回 400, 其余统一为 500
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMonth(_) | Self::MissingMonth | Self::InvalidPage { .. }
        )
    }

    /// 转换为 HTTP 错误响应
    /// 校验错误保留具体信息, 服务端错误折叠为接口的通用提示并记录日志
    pub fn into_api(self, failure: &str) -> ApiError {
        if self.is_client_error() {
            tracing::debug!("Rejected request: {}", self);
            ApiError::new(StatusCode::BAD_REQUEST, self.to_string())
        } else {
            tracing::error!("{} cause: {}", failure, self);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, failure)
        }
    }
}

/// 错误响应体: `{"message": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = MessageBody {
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
