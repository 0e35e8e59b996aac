//! Favourites Service - Pure business logic without HTTP layer
//!
//! Maintains each member's favourites set. Adds and removes are
//! idempotent from the caller's point of view: duplicates and missing
//! entries report false instead of failing.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    AuthorRepository, Book, BookRepository, DomainError, FavouriteEntry, FavouriteRepository,
    GenreRepository,
};

/// Favourited book as listed on the member's shelf
#[derive(Debug, Clone, Serialize)]
pub struct FavouriteBookView {
    pub book_id: Uuid,
    pub title: String,
    pub author_name: String,
    pub genre_name: String,
    pub image_url: Option<String>,
    pub added_at: DateTime<Utc>,
}

pub struct FavouritesService {
    favourites: Arc<dyn FavouriteRepository>,
    books: Arc<dyn BookRepository>,
    authors: Arc<dyn AuthorRepository>,
    genres: Arc<dyn GenreRepository>,
}

impl FavouritesService {
    pub fn new(
        favourites: Arc<dyn FavouriteRepository>,
        books: Arc<dyn BookRepository>,
        authors: Arc<dyn AuthorRepository>,
        genres: Arc<dyn GenreRepository>,
    ) -> Self {
        Self {
            favourites,
            books,
            authors,
            genres,
        }
    }

    /// Add a book to the member's favourites.
    ///
    /// False for nil ids, a missing or soft-deleted book, or a pair
    /// that is already favourited; the composite primary key backs the
    /// duplicate check under concurrency.
    pub async fn add(&self, member_id: Uuid, book_id: Uuid) -> Result<bool, DomainError> {
        if member_id.is_nil() || book_id.is_nil() {
            return Ok(false);
        }

        match self.books.find_by_id(book_id).await? {
            Some(book) if !book.is_deleted => {}
            _ => return Ok(false),
        }

        if self.favourites.exists(member_id, book_id).await? {
            return Ok(false);
        }

        let entry = FavouriteEntry {
            member_id,
            book_id,
            created_at: Utc::now(),
        };
        self.favourites.insert(entry).await
    }

    /// Returns false when there was nothing to remove.
    pub async fn remove(&self, member_id: Uuid, book_id: Uuid) -> Result<bool, DomainError> {
        self.favourites.remove(member_id, book_id).await
    }

    pub async fn is_favourite(&self, member_id: Uuid, book_id: Uuid) -> Result<bool, DomainError> {
        self.favourites.exists(member_id, book_id).await
    }

    /// The member's favourited books, most recently added first.
    /// Soft-deleted books are skipped; dangling author/genre references
    /// fall back to placeholder names.
    pub async fn list_favourite_books(
        &self,
        member_id: Uuid,
    ) -> Result<Vec<FavouriteBookView>, DomainError> {
        let entries = self.favourites.entries_for_member(member_id).await?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let book_ids: Vec<Uuid> = entries.iter().map(|e| e.book_id).collect();
        let books: HashMap<Uuid, Book> = self
            .books
            .find_by_ids(&book_ids)
            .await?
            .into_iter()
            .filter(|b| !b.is_deleted)
            .map(|b| (b.id, b))
            .collect();

        let author_ids: Vec<Uuid> = books.values().map(|b| b.author_id).collect();
        let genre_ids: Vec<Uuid> = books.values().map(|b| b.genre_id).collect();

        let author_names = if author_ids.is_empty() {
            HashMap::new()
        } else {
            self.authors.names_by_ids(&author_ids).await?
        };
        let genre_names = if genre_ids.is_empty() {
            HashMap::new()
        } else {
            self.genres.names_by_ids(&genre_ids).await?
        };

        let mut views = Vec::new();
        for entry in entries {
            let Some(book) = books.get(&entry.book_id) else {
                continue;
            };

            let author_name = author_names
                .get(&book.author_id)
                .cloned()
                .unwrap_or_else(|| "Unknown Author".to_string());
            let genre_name = genre_names
                .get(&book.genre_id)
                .cloned()
                .unwrap_or_else(|| "Unknown Genre".to_string());

            views.push(FavouriteBookView {
                book_id: book.id,
                title: book.title.clone(),
                author_name,
                genre_name,
                image_url: book.image_url.clone(),
                added_at: entry.created_at,
            });
        }

        Ok(views)
    }
}
