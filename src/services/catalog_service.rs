//! Catalog Service - Pure business logic without HTTP layer
//!
//! Book lifecycle (create, mutate, soft-delete) and catalog browsing.
//! Soft-deleted books are invisible everywhere except the creator's own
//! admin view; mutation is reserved to the creator.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Author, AuthorRepository, Book, BookFilter, BookRepository, DomainError, Genre,
    GenreRepository, Page, PageRequest, require_visible,
};

/// Input for creating a book; the creator id comes from the
/// authenticated identity, not the body
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub description: Option<String>,
    pub author_id: Uuid,
    pub genre_id: Uuid,
    pub published_date: Option<NaiveDate>,
    pub image_url: Option<String>,
}

/// Partial update; `None` leaves a field unchanged, `Some(None)` clears
/// a nullable one
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub author_id: Option<Uuid>,
    pub genre_id: Option<Uuid>,
    pub published_date: Option<Option<NaiveDate>>,
    pub image_url: Option<Option<String>>,
}

/// Catalog row as shown in browse results
#[derive(Debug, Clone, Serialize)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub author_id: Uuid,
    pub author_name: String,
    pub genre_id: Uuid,
    pub genre_name: String,
    pub published_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct CatalogService {
    books: Arc<dyn BookRepository>,
    authors: Arc<dyn AuthorRepository>,
    genres: Arc<dyn GenreRepository>,
}

impl CatalogService {
    pub fn new(
        books: Arc<dyn BookRepository>,
        authors: Arc<dyn AuthorRepository>,
        genres: Arc<dyn GenreRepository>,
    ) -> Self {
        Self {
            books,
            authors,
            genres,
        }
    }

    /// Browse the visible catalog, newest first.
    pub async fn browse(
        &self,
        filter: &BookFilter,
        page: PageRequest,
    ) -> Result<Page<BookSummary>, DomainError> {
        let listing = self.books.search(filter, page).await?;

        let author_ids: Vec<Uuid> = listing.books.iter().map(|b| b.author_id).collect();
        let genre_ids: Vec<Uuid> = listing.books.iter().map(|b| b.genre_id).collect();

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

        let summaries: Vec<BookSummary> = listing
            .books
            .into_iter()
            .map(|book| {
                let author_name = author_names
                    .get(&book.author_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown Author".to_string());
                let genre_name = genre_names
                    .get(&book.genre_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown Genre".to_string());

                BookSummary {
                    id: book.id,
                    title: book.title,
                    description: book.description,
                    author_id: book.author_id,
                    author_name,
                    genre_id: book.genre_id,
                    genre_name,
                    published_date: book.published_date,
                    image_url: book.image_url,
                    created_at: book.created_at,
                }
            })
            .collect();

        Ok(Page::from_items(summaries, page, listing.total))
    }

    /// Fetch one visible book; soft-deleted rows read as missing.
    pub async fn get(&self, book_id: Uuid) -> Result<Book, DomainError> {
        require_visible(self.books.find_by_id(book_id).await?)
    }

    pub async fn create(&self, new_book: NewBook, created_by: Uuid) -> Result<Book, DomainError> {
        if new_book.title.trim().is_empty() {
            return Err(DomainError::Validation("title must not be empty".to_string()));
        }
        if new_book.author_id.is_nil() || new_book.genre_id.is_nil() {
            return Err(DomainError::Validation(
                "author and genre ids must not be nil".to_string(),
            ));
        }

        let now = Utc::now();
        let book = Book {
            id: Uuid::new_v4(),
            title: new_book.title,
            description: new_book.description,
            author_id: new_book.author_id,
            genre_id: new_book.genre_id,
            published_date: new_book.published_date,
            image_url: new_book.image_url,
            created_by,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        let created = self.books.insert(book).await?;
        tracing::info!("Book {} created by {}", created.id, created_by);
        Ok(created)
    }

    /// Apply changes to a book. Only the creator may mutate it; the
    /// creator keeps access even after soft deletion.
    pub async fn update(
        &self,
        book_id: Uuid,
        acting_user: Uuid,
        changes: BookChanges,
    ) -> Result<Book, DomainError> {
        let mut book = self
            .books
            .find_by_id(book_id)
            .await?
            .ok_or(DomainError::NotFound)?;

        if book.created_by != acting_user {
            return Err(DomainError::Forbidden(
                "only the creator may modify this book".to_string(),
            ));
        }

        if let Some(title) = changes.title {
            if title.trim().is_empty() {
                return Err(DomainError::Validation("title must not be empty".to_string()));
            }
            book.title = title;
        }
        if let Some(description) = changes.description {
            book.description = description;
        }
        if let Some(author_id) = changes.author_id {
            book.author_id = author_id;
        }
        if let Some(genre_id) = changes.genre_id {
            book.genre_id = genre_id;
        }
        if let Some(published_date) = changes.published_date {
            book.published_date = published_date;
        }
        if let Some(image_url) = changes.image_url {
            book.image_url = image_url;
        }
        book.updated_at = Utc::now();

        self.books.update(book).await
    }

    /// Flag a book as deleted. Safe to repeat; only the creator may do it.
    pub async fn soft_delete(&self, book_id: Uuid, acting_user: Uuid) -> Result<(), DomainError> {
        let mut book = self
            .books
            .find_by_id(book_id)
            .await?
            .ok_or(DomainError::NotFound)?;

        if book.created_by != acting_user {
            return Err(DomainError::Forbidden(
                "only the creator may delete this book".to_string(),
            ));
        }

        book.is_deleted = true;
        book.updated_at = Utc::now();
        self.books.update(book).await?;

        tracing::info!("Book {} soft-deleted by {}", book_id, acting_user);
        Ok(())
    }

    /// Creator-scoped admin view; soft-deleted books included.
    pub async fn list_by_creator(&self, user_id: Uuid) -> Result<Vec<Book>, DomainError> {
        self.books.list_by_creator(user_id).await
    }

    pub async fn list_authors(&self) -> Result<Vec<Author>, DomainError> {
        self.authors.find_all().await
    }

    pub async fn create_author(&self, name: String) -> Result<Author, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::Validation("name must not be empty".to_string()));
        }
        self.authors.create(name).await
    }

    /// Returns false when no such author existed. Books keep their
    /// author reference; reads fall back to "Unknown Author".
    pub async fn delete_author(&self, id: Uuid) -> Result<bool, DomainError> {
        self.authors.delete(id).await
    }

    pub async fn list_genres(&self) -> Result<Vec<Genre>, DomainError> {
        self.genres.find_all().await
    }

    pub async fn create_genre(&self, name: String) -> Result<Genre, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::Validation("name must not be empty".to_string()));
        }
        self.genres.create(name).await
    }

    /// Returns false when no such genre existed.
    pub async fn delete_genre(&self, id: Uuid) -> Result<bool, DomainError> {
        self.genres.delete(id).await
    }
}
