use axum::{
    Json,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use thiserror::Error;

/// Every way a delete request can fail. The `Display` text is what the
/// client sees in the `error` field.
#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("INVALID_ID")]
    InvalidId,
    #[error("DELETE_TOKEN_REQUIRED")]
    DeleteTokenRequired,
    /// No such post, or the lookup failed. Callers cannot tell which.
    #[error("NOT_FOUND")]
    NotFound,
    #[error("INVALID_DELETE_TOKEN")]
    InvalidDeleteToken,
    #[error("{0}")]
    Store(#[source] crate::store::StoreError),
}

impl DeleteError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId | Self::DeleteTokenRequired => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidDeleteToken => StatusCode::FORBIDDEN,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DeleteError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "application/json")],
            Json(json!({
                "ok": false,
                "error": self.to_string(),
            })),
        )
            .into_response()
    }
}
