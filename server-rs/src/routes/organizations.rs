use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::services::validation;
use crate::AppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
}

pub async fn list_organizations(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let list = state
        .organizations
        .get_all_organizations()
        .await
        .map_err(|e| e.masked("Failed to fetch organizations"))?;

    Ok(Json(json!({ "success": true, "data": list.data, "count": list.count })))
}

pub async fn stats(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let stats = state
        .organizations
        .get_stats()
        .await
        .map_err(|e| e.masked("Failed to fetch statistics"))?;

    Ok(Json(json!({ "success": true, "data": stats })))
}

pub async fn list_active(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let list = state
        .organizations
        .get_active_organizations()
        .await
        .map_err(|e| e.masked("Failed to fetch active organizations"))?;

    Ok(Json(json!({ "success": true, "data": list.data, "count": list.count })))
}

pub async fn search(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> AppResult<Json<Value>> {
    let name = q
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("Name parameter is required".into()))?;

    let found = state
        .organizations
        .search_organizations(&name)
        .await
        .map_err(|e| e.masked("Failed to search organizations"))?;

    Ok(Json(json!({
        "success": true, "data": found.data, "count": found.count, "query": found.query,
    })))
}

pub async fn create_organization(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    // Unparsable bodies go through validation like any other non-object.
    let body = body.map(|Json(v)| v).unwrap_or(Value::Null);

    validation::validate_create(&body).into_result()?;
    let request = validation::sanitize_create(&body);

    let organization = state
        .organizations
        .create_organization(request)
        .await
        .map_err(|e| e.masked("Failed to create organization"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": organization,
            "message": "Organization created successfully",
        })),
    ))
}
