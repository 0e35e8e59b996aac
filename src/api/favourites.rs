//! Favourites API handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use uuid::Uuid;

use super::ApiError;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;

/// The member's favourite books, most recently added first.
pub async fn list_favourites(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Value>, ApiError> {
    let user_id = claims.user_id()?;
    let member = state.membership.require_approved(user_id).await?;

    let favourites = state.favourites.list_favourite_books(member.id).await?;
    let total = favourites.len();

    Ok(Json(json!({ "favourites": favourites, "total": total })))
}

pub async fn add_favourite(
    State(state): State<AppState>,
    claims: Claims,
    Path(book_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user_id = claims.user_id()?;
    let member = state.membership.require_approved(user_id).await?;

    if state.favourites.add(member.id, book_id).await? {
        Ok((
            StatusCode::CREATED,
            Json(json!({ "message": "Book added to favourites" })),
        ))
    } else {
        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Book was not added (unknown, deleted or already a favourite)" })),
        ))
    }
}

pub async fn remove_favourite(
    State(state): State<AppState>,
    claims: Claims,
    Path(book_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user_id = claims.user_id()?;
    let member = state.membership.require_approved(user_id).await?;

    if state.favourites.remove(member.id, book_id).await? {
        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Book removed from favourites" })),
        ))
    } else {
        Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Book is not in your favourites" })),
        ))
    }
}

pub async fn is_favourite(
    State(state): State<AppState>,
    claims: Claims,
    Path(book_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let user_id = claims.user_id()?;
    let member = state.membership.require_approved(user_id).await?;

    let favourite = state.favourites.is_favourite(member.id, book_id).await?;

    Ok(Json(json!({ "favourite": favourite })))
}
