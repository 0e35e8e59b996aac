//! Genre management API handlers

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

pub async fn list_genres(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let genres = state.catalog.list_genres().await?;
    let total = genres.len();

    Ok(Json(json!({ "genres": genres, "total": total })))
}

#[derive(Debug, Deserialize)]
pub struct CreateGenreRequest {
    pub name: String,
}

pub async fn create_genre(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<CreateGenreRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    super::require_admin(&claims)?;

    let genre = state.catalog.create_genre(payload.name).await?;

    Ok((StatusCode::CREATED, Json(json!({ "genre": genre }))))
}

pub async fn delete_genre(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    super::require_admin(&claims)?;

    if state.catalog.delete_genre(id).await? {
        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Genre deleted successfully" })),
        ))
    } else {
        Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Genre not found" })),
        ))
    }
}
