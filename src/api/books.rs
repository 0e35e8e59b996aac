//! Book catalog API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::ApiError;
use crate::domain::{BookFilter, DomainError, PageRequest};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::{BookChanges, NewBook};

#[derive(Debug, Deserialize)]
pub struct ListBooksQuery {
    pub q: Option<String>,
    pub author_id: Option<Uuid>,
    pub genre_id: Option<Uuid>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// Public catalog view; soft-deleted books never show up here.
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<ListBooksQuery>,
) -> Result<Json<Value>, ApiError> {
    let page = PageRequest::new(query.page.unwrap_or(1), query.page_size.unwrap_or(20))?;
    let filter = BookFilter {
        query: query.q,
        author_id: query.author_id,
        genre_id: query.genre_id,
    };

    let result = state.catalog.browse(&filter, page).await?;

    Ok(Json(json!({
        "books": result.items,
        "page": result.page,
        "page_size": result.size,
        "total_items": result.total_items,
        "total_pages": result.total_pages
    })))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    match state.catalog.get(id).await {
        Ok(book) => Ok((StatusCode::OK, Json(json!({ "book": book })))),
        Err(DomainError::NotFound) => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Book not found" })),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn create_book(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<NewBook>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    super::require_admin(&claims)?;

    let created_by = claims.user_id()?;
    let book = state.catalog.create(payload, created_by).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "book": book,
            "message": "Book created successfully"
        })),
    ))
}

pub async fn update_book(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookChanges>,
) -> Result<Json<Value>, ApiError> {
    let acting_user = claims.user_id()?;
    let book = state.catalog.update(id, acting_user, payload).await?;

    Ok(Json(json!({
        "book": book,
        "message": "Book updated successfully"
    })))
}

pub async fn delete_book(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let acting_user = claims.user_id()?;
    state.catalog.soft_delete(id, acting_user).await?;

    Ok(Json(json!({ "message": "Book deleted successfully" })))
}

/// Creator-scoped view, including soft-deleted entries.
pub async fn my_books(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Value>, ApiError> {
    let user_id = claims.user_id()?;
    let books = state.catalog.list_by_creator(user_id).await?;
    let total = books.len();

    Ok(Json(json!({ "books": books, "total": total })))
}
