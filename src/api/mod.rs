pub mod authors;
pub mod books;
pub mod borrowing;
pub mod favourites;
pub mod genres;
pub mod health;
pub mod membership;
pub mod reviews;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;

/// Wraps domain errors with their HTTP mapping.
///
/// Handlers return `Result<_, ApiError>` so `?` works on any service call.
/// Database faults are logged here and answered with a generic message.
#[derive(Debug)]
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            DomainError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            DomainError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            DomainError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            DomainError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Reject callers whose token does not carry the admin role.
fn require_admin(claims: &Claims) -> Result<(), ApiError> {
    if claims.is_admin() {
        Ok(())
    } else {
        Err(ApiError(DomainError::Forbidden(
            "administrator role required".to_string(),
        )))
    }
}

pub fn api_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Membership
        .route("/membership/apply", post(membership::apply))
        .route("/membership/me", get(membership::my_membership))
        .route("/membership", get(membership::list_members))
        .route("/membership/:id/status", put(membership::set_status))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/mine", get(books::my_books))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Authors
        .route(
            "/authors",
            get(authors::list_authors).post(authors::create_author),
        )
        .route("/authors/:id", delete(authors::delete_author))
        // Genres
        .route(
            "/genres",
            get(genres::list_genres).post(genres::create_genre),
        )
        .route("/genres/:id", delete(genres::delete_genre))
        // Borrowing
        .route("/books/:id/borrow", post(borrowing::borrow_book))
        .route("/books/:id/return", put(borrowing::return_book))
        .route("/borrowing/history", get(borrowing::my_history))
        // Reviews
        .route(
            "/books/:id/reviews",
            get(reviews::list_book_reviews).post(reviews::create_review),
        )
        .route(
            "/books/:id/reviews/mine",
            get(reviews::my_review).put(reviews::update_review),
        )
        .route("/reviews/pending", get(reviews::list_pending))
        .route("/reviews/:id/approve", put(reviews::approve_review))
        .route("/reviews/:id", delete(reviews::reject_review))
        // Favourites
        .route("/favourites", get(favourites::list_favourites))
        .route(
            "/books/:id/favourite",
            get(favourites::is_favourite)
                .post(favourites::add_favourite)
                .delete(favourites::remove_favourite),
        )
        .with_state(state)
}
