//! Review Service - Pure business logic without HTTP layer
//!
//! One review per (member, book) pair, moderated: reviews are created
//! unapproved, edits re-enter moderation, and only approved reviews are
//! publicly listed.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    BookRepository, DomainError, MemberRepository, Page, PageRequest, Review, ReviewRepository,
};

/// Upper bound on review content length, in characters
const REVIEW_CONTENT_MAX: usize = 1000;

/// Approved review as shown on a book page
#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    pub id: Uuid,
    pub book_id: Uuid,
    pub member_id: Uuid,
    pub member_name: String,
    pub rating: i32,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Pending review as shown in the moderation queue
#[derive(Debug, Clone, Serialize)]
pub struct PendingReviewView {
    pub id: Uuid,
    pub book_id: Uuid,
    pub book_title: String,
    pub member_id: Uuid,
    pub member_name: String,
    pub rating: i32,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A page of approved reviews plus the all-pages average rating
#[derive(Debug, Serialize)]
pub struct BookReviewListing {
    pub reviews: Page<ReviewView>,
    pub average_rating: f64,
}

pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    books: Arc<dyn BookRepository>,
    members: Arc<dyn MemberRepository>,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        books: Arc<dyn BookRepository>,
        members: Arc<dyn MemberRepository>,
    ) -> Self {
        Self {
            reviews,
            books,
            members,
        }
    }

    /// Submit a review for a (member, book) pair.
    ///
    /// Returns false without error for invalid input or a duplicate
    /// pair; the unique constraint reports the duplicate, so a racing
    /// second submission also lands on false.
    pub async fn create(
        &self,
        book_id: Uuid,
        member_id: Uuid,
        rating: i32,
        content: Option<String>,
    ) -> Result<bool, DomainError> {
        if !is_valid_submission(book_id, member_id, rating, &content) {
            return Ok(false);
        }

        let review = Review {
            id: Uuid::new_v4(),
            book_id,
            member_id,
            rating,
            content,
            is_approved: false,
            created_at: Utc::now(),
        };

        let inserted = self.reviews.insert(review).await?;
        if inserted {
            tracing::info!("Member {} reviewed book {}", member_id, book_id);
        }
        Ok(inserted)
    }

    /// Overwrite the pair's review; the edit re-enters moderation.
    pub async fn update(
        &self,
        member_id: Uuid,
        book_id: Uuid,
        rating: i32,
        content: Option<String>,
    ) -> Result<bool, DomainError> {
        if !is_valid_submission(book_id, member_id, rating, &content) {
            return Ok(false);
        }

        let Some(mut review) = self.reviews.find_by_pair(member_id, book_id).await? else {
            return Ok(false);
        };

        review.rating = rating;
        review.content = content;
        review.is_approved = false;
        self.reviews.update(review).await?;

        Ok(true)
    }

    pub async fn get_for_member_and_book(
        &self,
        member_id: Uuid,
        book_id: Uuid,
    ) -> Result<Option<Review>, DomainError> {
        if member_id.is_nil() || book_id.is_nil() {
            return Ok(None);
        }
        self.reviews.find_by_pair(member_id, book_id).await
    }

    /// Approved reviews for a book, newest first, with reviewer names
    /// and the average rating over every approved review of the book.
    pub async fn list_approved_for_book(
        &self,
        book_id: Uuid,
        page: PageRequest,
    ) -> Result<BookReviewListing, DomainError> {
        let listing = self.reviews.list_approved_for_book(book_id, page).await?;

        let member_ids: Vec<Uuid> = listing.reviews.iter().map(|r| r.member_id).collect();
        let names = self.member_names(&member_ids).await?;

        let views: Vec<ReviewView> = listing
            .reviews
            .into_iter()
            .map(|review| {
                let member_name = names
                    .get(&review.member_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown Member".to_string());

                ReviewView {
                    id: review.id,
                    book_id: review.book_id,
                    member_id: review.member_id,
                    member_name,
                    rating: review.rating,
                    content: review.content,
                    created_at: review.created_at,
                }
            })
            .collect();

        let ratings = self.reviews.approved_ratings(book_id).await?;

        Ok(BookReviewListing {
            reviews: Page::from_items(views, page, listing.total),
            average_rating: round_average(&ratings),
        })
    }

    /// The moderation queue: every unapproved review with book titles
    /// and member names filled in.
    pub async fn list_pending(&self) -> Result<Vec<PendingReviewView>, DomainError> {
        let pending = self.reviews.list_pending().await?;

        let book_ids: Vec<Uuid> = pending.iter().map(|r| r.book_id).collect();
        let member_ids: Vec<Uuid> = pending.iter().map(|r| r.member_id).collect();

        let titles: HashMap<Uuid, String> = if book_ids.is_empty() {
            HashMap::new()
        } else {
            self.books.titles_by_ids(&book_ids).await?
        };
        let names = self.member_names(&member_ids).await?;

        let views = pending
            .into_iter()
            .map(|review| {
                let book_title = titles
                    .get(&review.book_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown Title".to_string());
                let member_name = names
                    .get(&review.member_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown Member".to_string());

                PendingReviewView {
                    id: review.id,
                    book_id: review.book_id,
                    book_title,
                    member_id: review.member_id,
                    member_name,
                    rating: review.rating,
                    content: review.content,
                    created_at: review.created_at,
                }
            })
            .collect();

        Ok(views)
    }

    /// Returns false when the review does not exist.
    pub async fn approve(&self, review_id: Uuid) -> Result<bool, DomainError> {
        let Some(mut review) = self.reviews.find_by_id(review_id).await? else {
            return Ok(false);
        };

        review.is_approved = true;
        self.reviews.update(review).await?;

        tracing::info!("Review {} approved", review_id);
        Ok(true)
    }

    /// Rejection deletes the review outright.
    pub async fn reject(&self, review_id: Uuid) -> Result<bool, DomainError> {
        let deleted = self.reviews.delete(review_id).await?;
        if deleted {
            tracing::info!("Review {} rejected", review_id);
        }
        Ok(deleted)
    }

    async fn member_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, DomainError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        self.members.names_by_ids(ids).await
    }
}

fn is_valid_submission(
    book_id: Uuid,
    member_id: Uuid,
    rating: i32,
    content: &Option<String>,
) -> bool {
    if book_id.is_nil() || member_id.is_nil() {
        return false;
    }
    if !(1..=5).contains(&rating) {
        return false;
    }
    if let Some(text) = content
        && text.chars().count() > REVIEW_CONTENT_MAX
    {
        return false;
    }
    true
}

/// Average rounded half-away-from-zero to 2 decimals; 0.0 for no reviews.
fn round_average(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    let average = sum as f64 / ratings.len() as f64;
    (average * 100.0).round() / 100.0
}
