use super::{ApiError, AppState};
use crate::db;
use crate::import;
use crate::model::{CaseFields, NewCaseRequest};
use crate::report;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

const MISSING_CASE_FIELDS: &str = "Case ID and case name are required";
const NOT_A_LIST: &str = "Invalid data format, expected a JSON array of cases";

fn message(text: &str) -> Value {
    json!({ "message": text })
}

/// `GET /api/cases`
pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let cases = db::list_cases(&state.pool).await?;
    Ok(HttpResponse::Ok().json(cases))
}

/// `POST /api/cases`
pub async fn create(
    state: web::Data<AppState>,
    payload: web::Json<NewCaseRequest>,
) -> Result<HttpResponse, ApiError> {
    let NewCaseRequest { id, fields } = payload.into_inner();
    let id = id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request(MISSING_CASE_FIELDS))?;
    let case = fields
        .into_case(id)
        .map_err(|_| ApiError::bad_request(MISSING_CASE_FIELDS))?;
    db::create_case(&state.pool, &case).await?;
    info!(id = %case.id, "case created");
    Ok(HttpResponse::Created().json(message("Case added successfully")))
}

/// `PUT /api/cases/{id}`
pub async fn update(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<CaseFields>,
) -> Result<HttpResponse, ApiError> {
    let case = payload
        .into_inner()
        .into_case(id.into_inner())
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    let changed = db::update_case(&state.pool, &case).await?;
    if changed {
        info!(id = %case.id, "case updated");
    } else {
        info!(id = %case.id, "update for unknown case id ignored");
    }
    Ok(HttpResponse::Ok().json(message("Case updated successfully")))
}

/// `DELETE /api/cases/{id}`
pub async fn remove(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let removed = db::delete_case(&state.pool, &id).await?;
    info!(id = %id, removed, "case delete requested");
    Ok(HttpResponse::Ok().json(message("Case deleted successfully")))
}

/// `POST /api/import`
pub async fn import(
    state: web::Data<AppState>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let Some(records) = payload.as_array() else {
        return Err(ApiError::bad_request(NOT_A_LIST));
    };
    let result = import::reconcile(&state.pool, records).await;
    Ok(HttpResponse::Ok().json(result))
}

/// `GET /api/cases/export`
pub async fn export(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let body = report::export_cases(&state.pool).await?;
    let file_name = report::export_file_name(chrono::Utc::now());
    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(body))
}

#[derive(Debug, Default, Deserialize)]
pub struct BatchCheckRequest {
    #[serde(default)]
    pub channel_id: Option<String>,
}

/// `POST /api/cases/batch_check`
pub async fn batch_check(
    state: web::Data<AppState>,
    payload: Option<web::Json<BatchCheckRequest>>,
) -> Result<HttpResponse, ApiError> {
    let requested = payload.map(web::Json::into_inner).unwrap_or_default();
    let channel_id = requested
        .channel_id
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| state.default_channel_id.clone());
    let reports = report::batch_check(&state.pool, &state.checker, &channel_id).await?;
    Ok(HttpResponse::Ok().json(reports))
}
