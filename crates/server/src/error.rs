use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::BugStoreError;
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] BugStoreError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Store(BugStoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(BugStoreError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(BugStoreError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Internal failures are logged server-side; the client only sees a
        // generic message.
        let message = match &self {
            ApiError::Store(BugStoreError::Database(source)) => {
                tracing::error!(error = %source, "database failure");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = ApiError::Store(BugStoreError::NotFound(Uuid::nil()));
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let error = ApiError::Store(BugStoreError::Validation("title is required".into()));
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }
}
