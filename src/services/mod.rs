//! Services Layer
//!
//! The rule evaluators. Each service is a plain struct built at startup
//! with the repository trait objects it needs; no globals, no framework
//! lifecycle.

pub mod borrowing_service;
pub mod catalog_service;
pub mod favourites_service;
pub mod membership_service;
pub mod review_service;

pub use borrowing_service::{BorrowHistoryEntry, BorrowOutcome, BorrowingService};
pub use catalog_service::{BookChanges, BookSummary, CatalogService, NewBook};
pub use favourites_service::{FavouriteBookView, FavouritesService};
pub use membership_service::MembershipService;
pub use review_service::{BookReviewListing, PendingReviewView, ReviewService, ReviewView};
