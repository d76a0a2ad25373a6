use super::{ApiError, AppState};
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct VideoCheckRequest {
    #[serde(default)]
    pub video_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChannelCheckRequest {
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
}

/// `POST /api/check_video_existence`
pub async fn check_video_existence(
    state: web::Data<AppState>,
    payload: web::Json<VideoCheckRequest>,
) -> Result<HttpResponse, ApiError> {
    let found = state
        .checker
        .check_video_exists(payload.video_url.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(found))
}

/// `POST /api/check_channel_video_existence`
pub async fn check_channel_video_existence(
    state: web::Data<AppState>,
    payload: web::Json<ChannelCheckRequest>,
) -> Result<HttpResponse, ApiError> {
    let found = state
        .checker
        .check_video_in_channel(payload.video_url.as_deref(), payload.channel_id.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(found))
}
