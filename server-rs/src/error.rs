use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub const DUPLICATE_NAME_MESSAGE: &str = "An organization with this name already exists";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("{}", DUPLICATE_NAME_MESSAGE)]
    DuplicateName,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Server-side failure carrying the message shown to the client.
    #[error("{0}")]
    Unexpected(&'static str),
}

impl AppError {
    /// Replaces a server-side failure with `public`, logging the original.
    /// Client errors pass through untouched.
    pub fn masked(self, public: &'static str) -> Self {
        match self {
            AppError::BadRequest(_)
            | AppError::Validation(_)
            | AppError::DuplicateName
            | AppError::Unexpected(_) => self,
            other => {
                tracing::error!(error = %other, "{public}");
                AppError::Unexpected(public)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateName => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({ "success": false, "error": message });
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
