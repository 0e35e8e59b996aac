//! SeaORM implementation of BookRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::{Book, BookFilter, BookListing, BookRepository, DomainError, PageRequest};
use crate::models::book::{ActiveModel, Column, Entity as BookEntity, Model};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, DomainError> {
        let book = BookEntity::find_by_id(id).one(&self.db).await?;
        Ok(book.map(to_book))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Book>, DomainError> {
        let books = BookEntity::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(to_book).collect())
    }

    async fn search(
        &self,
        filter: &BookFilter,
        page: PageRequest,
    ) -> Result<BookListing, DomainError> {
        let mut query = BookEntity::find().filter(Column::IsDeleted.eq(false));

        if let Some(q) = &filter.query
            && !q.is_empty()
        {
            let cond = Condition::any()
                .add(Column::Title.contains(q))
                .add(Column::Description.contains(q));
            query = query.filter(cond);
        }

        if let Some(author_id) = filter.author_id {
            query = query.filter(Column::AuthorId.eq(author_id));
        }

        if let Some(genre_id) = filter.genre_id {
            query = query.filter(Column::GenreId.eq(genre_id));
        }

        let paginator = query
            .order_by_desc(Column::CreatedAt)
            .paginate(&self.db, page.size());
        let total = paginator.num_items().await?;
        let books = paginator.fetch_page(page.index()).await?;

        Ok(BookListing {
            books: books.into_iter().map(to_book).collect(),
            total,
        })
    }

    async fn list_by_creator(&self, user_id: Uuid) -> Result<Vec<Book>, DomainError> {
        let books = BookEntity::find()
            .filter(Column::CreatedBy.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(to_book).collect())
    }

    async fn insert(&self, book: Book) -> Result<Book, DomainError> {
        let result = to_active(book).insert(&self.db).await?;
        Ok(to_book(result))
    }

    async fn update(&self, book: Book) -> Result<Book, DomainError> {
        let result = to_active(book).update(&self.db).await?;
        Ok(to_book(result))
    }

    async fn titles_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, DomainError> {
        let books = BookEntity::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(|b| (b.id, b.title)).collect())
    }
}

fn to_book(model: Model) -> Book {
    Book {
        id: model.id,
        title: model.title,
        description: model.description,
        author_id: model.author_id,
        genre_id: model.genre_id,
        published_date: model.published_date,
        image_url: model.image_url,
        created_by: model.created_by,
        is_deleted: model.is_deleted,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn to_active(book: Book) -> ActiveModel {
    ActiveModel {
        id: Set(book.id),
        title: Set(book.title),
        description: Set(book.description),
        author_id: Set(book.author_id),
        genre_id: Set(book.genre_id),
        published_date: Set(book.published_date),
        image_url: Set(book.image_url),
        created_by: Set(book.created_by),
        is_deleted: Set(book.is_deleted),
        created_at: Set(book.created_at),
        updated_at: Set(book.updated_at),
    }
}
