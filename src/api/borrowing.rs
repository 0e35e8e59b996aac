//! Borrowing API handlers
//!
//! The acting member is resolved from the token's user id. Borrowing
//! requires approved membership; returning only requires that the pair
//! actually has an active loan.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use uuid::Uuid;

use super::ApiError;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::BorrowOutcome;

pub async fn borrow_book(
    State(state): State<AppState>,
    claims: Claims,
    Path(book_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user_id = claims.user_id()?;
    let member = state.membership.require_approved(user_id).await?;

    let outcome = state.borrowing.borrow(member.id, book_id).await?;

    let response = match outcome {
        BorrowOutcome::Success => (
            StatusCode::OK,
            Json(json!({ "message": "Book borrowed successfully" })),
        ),
        BorrowOutcome::AlreadyBorrowedByMember => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "You already have this book on loan" })),
        ),
        BorrowOutcome::BorrowLimitReached => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "Return your current loan before borrowing another book" })),
        ),
        BorrowOutcome::BookUnavailable => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "Book is currently on loan to another member" })),
        ),
    };

    Ok(response)
}

pub async fn return_book(
    State(state): State<AppState>,
    claims: Claims,
    Path(book_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let user_id = claims.user_id()?;
    let member = state
        .membership
        .get_by_user_id(user_id)
        .await?
        .ok_or(DomainError::NotFound)?;

    state.borrowing.return_book(member.id, book_id).await?;

    Ok(Json(json!({ "message": "Book returned successfully" })))
}

pub async fn my_history(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Value>, ApiError> {
    let user_id = claims.user_id()?;

    let history = match state.membership.get_by_user_id(user_id).await? {
        Some(member) => state.borrowing.history(member.id).await?,
        None => Vec::new(),
    };
    let total = history.len();

    Ok(Json(json!({ "history": history, "total": total })))
}
