use crate::checker::CheckError;
use crate::db::StoreError;
use crate::report::ExportError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Every handler error renders as `{"error": "<text>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Check(#[from] CheckError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Check(CheckError::UpstreamUnavailable(_) | CheckError::Upstream(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Check(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::DuplicateId(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
