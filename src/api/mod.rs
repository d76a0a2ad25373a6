//! # HTTP API
//!
//! All endpoints live under `/api`:
//!
//! * `GET    /cases` list every case.
//! * `POST   /cases` create a case; `400` when the id is taken.
//! * `PUT    /cases/{id}` replace a case's fields (unknown ids succeed silently).
//! * `DELETE /cases/{id}` remove a case.
//! * `GET    /cases/export` download all cases as a JSON file.
//! * `POST   /cases/batch_check` run the link check over every case.
//! * `POST   /import` upsert a JSON array of cases.
//! * `POST   /check_video_existence` and `POST /check_channel_video_existence`
//!   proxy the YouTube checks.

mod cases;
mod error;
mod videos;

pub use error::ApiError;

use crate::checker::ExistenceChecker;
use crate::db::Pool;
use actix_web::error::InternalError;
use actix_web::web::{delete, get, post, put, scope, JsonConfig};
use actix_web::{HttpResponse, Scope};
use serde_json::json;

/// The base path for all API endpoints.
const API_PATH: &str = "/api";

/// Shared per-worker state. Cloning is cheap: the pool and checker are handles.
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: Pool,
    pub checker: ExistenceChecker,
    pub default_channel_id: String,
}

/// JSON extractor config: size limit plus `{"error": ...}` bodies for
/// malformed payloads.
pub fn json_config(limit: usize) -> JsonConfig {
    JsonConfig::default().limit(limit).error_handler(|err, _req| {
        let body = json!({ "error": format!("Invalid JSON body: {}", err) });
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/cases", get().to(cases::list))
        .route("/cases", post().to(cases::create))
        .route("/cases/export", get().to(cases::export))
        .route("/cases/batch_check", post().to(cases::batch_check))
        .route("/cases/{id}", put().to(cases::update))
        .route("/cases/{id}", delete().to(cases::remove))
        .route("/import", post().to(cases::import))
        .route(
            "/check_video_existence",
            post().to(videos::check_video_existence),
        )
        .route(
            "/check_channel_video_existence",
            post().to(videos::check_channel_video_existence),
        )
}
