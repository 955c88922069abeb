use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Failures surfaced at the handler boundary.
///
/// Every variant renders as a plain-text body carrying the underlying message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Row store unreachable or faulty on a read.
    #[error("{0}")]
    Storage(#[source] sqlx::Error),

    /// Row store refused a write.
    #[error("{0}")]
    Rejected(#[source] sqlx::Error),

    /// Movie catalog unreachable, non-success, or undecodable.
    #[error("{0}")]
    Upstream(#[from] reqwest::Error),

    /// Malformed body or query string.
    #[error("{0}")]
    Validation(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Storage(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Storage(_) | AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Rejected(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {:?}", self);
        } else {
            tracing::warn!("request rejected: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}
