//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use super::DomainError;
use super::entities::{
    Author, Book, BorrowRecord, FavouriteEntry, Genre, Member, MemberStatus, Review, User,
};
use super::pagination::PageRequest;

/// Filter criteria for catalog browsing
#[derive(Debug, Default, Clone)]
pub struct BookFilter {
    /// Free-text match against title and description
    pub query: Option<String>,
    pub author_id: Option<Uuid>,
    pub genre_id: Option<Uuid>,
}

/// One page of books with the unpaged total
#[derive(Debug)]
pub struct BookListing {
    pub books: Vec<Book>,
    pub total: u64,
}

/// One page of reviews with the unpaged total
#[derive(Debug)]
pub struct ReviewListing {
    pub reviews: Vec<Review>,
    pub total: u64,
}

/// Read-only access to the external identity mirror
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
}

/// Repository trait for membership records
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>, DomainError>;

    /// At most one member exists per external identity
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Member>, DomainError>;

    async fn insert(&self, member: Member) -> Result<Member, DomainError>;

    async fn update(&self, member: Member) -> Result<Member, DomainError>;

    async fn list_by_status(&self, status: MemberStatus) -> Result<Vec<Member>, DomainError>;

    /// Display names for a set of member ids (missing ids are simply absent)
    async fn names_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, DomainError>;
}

/// Repository trait for the author lookup table
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Author>, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, DomainError>;

    async fn create(&self, name: String) -> Result<Author, DomainError>;

    /// Returns false when no such author existed
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    async fn names_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, DomainError>;
}

/// Repository trait for the genre lookup table
#[async_trait]
pub trait GenreRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Genre>, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Genre>, DomainError>;

    async fn create(&self, name: String) -> Result<Genre, DomainError>;

    /// Returns false when no such genre existed
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    async fn names_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, DomainError>;
}

/// Repository trait for catalog entries
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Raw lookup; soft-deleted rows are returned and the caller decides
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, DomainError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Book>, DomainError>;

    /// Browse query: excludes soft-deleted rows, newest first
    async fn search(
        &self,
        filter: &BookFilter,
        page: PageRequest,
    ) -> Result<BookListing, DomainError>;

    /// Creator-scoped view, soft-deleted rows included
    async fn list_by_creator(&self, user_id: Uuid) -> Result<Vec<Book>, DomainError>;

    async fn insert(&self, book: Book) -> Result<Book, DomainError>;

    async fn update(&self, book: Book) -> Result<Book, DomainError>;

    async fn titles_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, DomainError>;
}

/// Repository trait for borrow records
#[async_trait]
pub trait BorrowingRepository: Send + Sync {
    /// The partial unique indexes on active records back this insert;
    /// a concurrent duplicate surfaces as a Conflict error
    async fn insert(&self, record: BorrowRecord) -> Result<BorrowRecord, DomainError>;

    async fn update(&self, record: BorrowRecord) -> Result<BorrowRecord, DomainError>;

    async fn find_active_for_pair(
        &self,
        member_id: Uuid,
        book_id: Uuid,
    ) -> Result<Option<BorrowRecord>, DomainError>;

    async fn find_active_by_member(
        &self,
        member_id: Uuid,
    ) -> Result<Option<BorrowRecord>, DomainError>;

    async fn find_active_for_book(&self, book_id: Uuid)
    -> Result<Option<BorrowRecord>, DomainError>;

    /// Full history for a member, newest first
    async fn history_by_member(&self, member_id: Uuid) -> Result<Vec<BorrowRecord>, DomainError>;
}

/// Repository trait for reviews
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Returns false when the (member, book) pair already has a review;
    /// the unique constraint closes the check-then-insert race
    async fn insert(&self, review: Review) -> Result<bool, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, DomainError>;

    async fn find_by_pair(
        &self,
        member_id: Uuid,
        book_id: Uuid,
    ) -> Result<Option<Review>, DomainError>;

    async fn update(&self, review: Review) -> Result<Review, DomainError>;

    /// Approved reviews for a book, newest first
    async fn list_approved_for_book(
        &self,
        book_id: Uuid,
        page: PageRequest,
    ) -> Result<ReviewListing, DomainError>;

    /// Ratings of every approved review of the book, unpaged
    async fn approved_ratings(&self, book_id: Uuid) -> Result<Vec<i32>, DomainError>;

    async fn list_pending(&self) -> Result<Vec<Review>, DomainError>;

    /// Returns false when no such review existed
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

/// Repository trait for favourites
#[async_trait]
pub trait FavouriteRepository: Send + Sync {
    /// Returns false when the pair is already favourited
    async fn insert(&self, entry: FavouriteEntry) -> Result<bool, DomainError>;

    /// Returns false when there was nothing to remove
    async fn remove(&self, member_id: Uuid, book_id: Uuid) -> Result<bool, DomainError>;

    async fn exists(&self, member_id: Uuid, book_id: Uuid) -> Result<bool, DomainError>;

    /// All entries for a member, most recently added first
    async fn entries_for_member(
        &self,
        member_id: Uuid,
    ) -> Result<Vec<FavouriteEntry>, DomainError>;
}
