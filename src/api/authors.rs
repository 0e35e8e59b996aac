//! Author management API handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::ApiError;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;

pub async fn list_authors(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let authors = state.catalog.list_authors().await?;
    let total = authors.len();

    Ok(Json(json!({ "authors": authors, "total": total })))
}

#[derive(Debug, Deserialize)]
pub struct CreateAuthorRequest {
    pub name: String,
}

pub async fn create_author(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<CreateAuthorRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    super::require_admin(&claims)?;

    let author = state.catalog.create_author(payload.name).await?;

    Ok((StatusCode::CREATED, Json(json!({ "author": author }))))
}

pub async fn delete_author(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    super::require_admin(&claims)?;

    if state.catalog.delete_author(id).await? {
        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Author deleted successfully" })),
        ))
    } else {
        Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Author not found" })),
        ))
    }
}
