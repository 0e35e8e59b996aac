//! Review API handlers
//!
//! Submission and editing are member actions; moderation (pending queue,
//! approve, reject) is admin-only. Approved reviews are public.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::ApiError;
use crate::domain::{DomainError, PageRequest};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;

#[derive(Debug, Deserialize)]
pub struct ReviewPageQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// Approved reviews for a book, newest first, with the average rating
/// computed over every approved review (not just the requested page).
pub async fn list_book_reviews(
    State(state): State<AppState>,
    Path(book_id): Path<Uuid>,
    Query(query): Query<ReviewPageQuery>,
) -> Result<Json<Value>, ApiError> {
    let page = PageRequest::new(query.page.unwrap_or(1), query.page_size.unwrap_or(20))?;
    let listing = state.reviews.list_approved_for_book(book_id, page).await?;

    Ok(Json(json!({
        "reviews": listing.reviews.items,
        "page": listing.reviews.page,
        "page_size": listing.reviews.size,
        "total_items": listing.reviews.total_items,
        "total_pages": listing.reviews.total_pages,
        "average_rating": listing.average_rating
    })))
}

#[derive(Debug, Deserialize)]
pub struct ReviewSubmission {
    pub rating: i32,
    pub content: Option<String>,
}

pub async fn create_review(
    State(state): State<AppState>,
    claims: Claims,
    Path(book_id): Path<Uuid>,
    Json(payload): Json<ReviewSubmission>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user_id = claims.user_id()?;
    let member = state.membership.require_approved(user_id).await?;

    let created = state
        .reviews
        .create(book_id, member.id, payload.rating, payload.content)
        .await?;

    if created {
        Ok((
            StatusCode::CREATED,
            Json(json!({ "message": "Review submitted for moderation" })),
        ))
    } else {
        Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid review or already reviewed" })),
        ))
    }
}

pub async fn update_review(
    State(state): State<AppState>,
    claims: Claims,
    Path(book_id): Path<Uuid>,
    Json(payload): Json<ReviewSubmission>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user_id = claims.user_id()?;
    let member = state.membership.require_approved(user_id).await?;

    let updated = state
        .reviews
        .update(member.id, book_id, payload.rating, payload.content)
        .await?;

    if updated {
        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Review updated and queued for moderation" })),
        ))
    } else {
        Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No existing review or invalid submission" })),
        ))
    }
}

pub async fn my_review(
    State(state): State<AppState>,
    claims: Claims,
    Path(book_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user_id = claims.user_id()?;
    let member = state
        .membership
        .get_by_user_id(user_id)
        .await?
        .ok_or(DomainError::NotFound)?;

    match state
        .reviews
        .get_for_member_and_book(member.id, book_id)
        .await?
    {
        Some(review) => Ok((StatusCode::OK, Json(json!({ "review": review })))),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No review for this book" })),
        )),
    }
}

/// Moderation queue, oldest first.
pub async fn list_pending(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Value>, ApiError> {
    super::require_admin(&claims)?;

    let reviews = state.reviews.list_pending().await?;
    let total = reviews.len();

    Ok(Json(json!({ "reviews": reviews, "total": total })))
}

pub async fn approve_review(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    super::require_admin(&claims)?;

    if state.reviews.approve(id).await? {
        Ok((StatusCode::OK, Json(json!({ "message": "Review approved" }))))
    } else {
        Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Review not found" })),
        ))
    }
}

pub async fn reject_review(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    super::require_admin(&claims)?;

    if state.reviews.reject(id).await? {
        Ok((StatusCode::OK, Json(json!({ "message": "Review rejected" }))))
    } else {
        Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Review not found" })),
        ))
    }
}
