//! SeaORM implementation of ReviewRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::domain::{DomainError, PageRequest, Review, ReviewListing, ReviewRepository};
use crate::models::review::{ActiveModel, Column, Entity as ReviewEntity, Model};

/// SeaORM-based implementation of ReviewRepository
pub struct SeaOrmReviewRepository {
    db: DatabaseConnection,
}

impl SeaOrmReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for SeaOrmReviewRepository {
    async fn insert(&self, review: Review) -> Result<bool, DomainError> {
        // UNIQUE (member_id, book_id) turns a duplicate submission into
        // a clean false, including under concurrency
        match to_active(review).insert(&self.db).await {
            Ok(_) => Ok(true),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Ok(false),
                _ => Err(e.into()),
            },
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, DomainError> {
        let review = ReviewEntity::find_by_id(id).one(&self.db).await?;
        Ok(review.map(to_review))
    }

    async fn find_by_pair(
        &self,
        member_id: Uuid,
        book_id: Uuid,
    ) -> Result<Option<Review>, DomainError> {
        let review = ReviewEntity::find()
            .filter(Column::MemberId.eq(member_id))
            .filter(Column::BookId.eq(book_id))
            .one(&self.db)
            .await?;

        Ok(review.map(to_review))
    }

    async fn update(&self, review: Review) -> Result<Review, DomainError> {
        let result = to_active(review).update(&self.db).await?;
        Ok(to_review(result))
    }

    async fn list_approved_for_book(
        &self,
        book_id: Uuid,
        page: PageRequest,
    ) -> Result<ReviewListing, DomainError> {
        let paginator = ReviewEntity::find()
            .filter(Column::BookId.eq(book_id))
            .filter(Column::IsApproved.eq(true))
            .order_by_desc(Column::CreatedAt)
            .paginate(&self.db, page.size());

        let total = paginator.num_items().await?;
        let reviews = paginator.fetch_page(page.index()).await?;

        Ok(ReviewListing {
            reviews: reviews.into_iter().map(to_review).collect(),
            total,
        })
    }

    async fn approved_ratings(&self, book_id: Uuid) -> Result<Vec<i32>, DomainError> {
        let reviews = ReviewEntity::find()
            .filter(Column::BookId.eq(book_id))
            .filter(Column::IsApproved.eq(true))
            .all(&self.db)
            .await?;

        Ok(reviews.into_iter().map(|r| r.rating).collect())
    }

    async fn list_pending(&self) -> Result<Vec<Review>, DomainError> {
        let reviews = ReviewEntity::find()
            .filter(Column::IsApproved.eq(false))
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(reviews.into_iter().map(to_review).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = ReviewEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

fn to_review(model: Model) -> Review {
    Review {
        id: model.id,
        book_id: model.book_id,
        member_id: model.member_id,
        rating: model.rating,
        content: model.content,
        is_approved: model.is_approved,
        created_at: model.created_at,
    }
}

fn to_active(review: Review) -> ActiveModel {
    ActiveModel {
        id: Set(review.id),
        book_id: Set(review.book_id),
        member_id: Set(review.member_id),
        rating: Set(review.rating),
        content: Set(review.content),
        is_approved: Set(review.is_approved),
        created_at: Set(review.created_at),
    }
}
