//! SeaORM implementation of FavouriteRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use uuid::Uuid;

use crate::domain::{DomainError, FavouriteEntry, FavouriteRepository};
use crate::models::favourite::{ActiveModel, Column, Entity as FavouriteEntity};

/// SeaORM-based implementation of FavouriteRepository
pub struct SeaOrmFavouriteRepository {
    db: DatabaseConnection,
}

impl SeaOrmFavouriteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FavouriteRepository for SeaOrmFavouriteRepository {
    async fn insert(&self, entry: FavouriteEntry) -> Result<bool, DomainError> {
        // The composite primary key reports a racing duplicate as a
        // constraint violation, which we fold into false
        let active = ActiveModel {
            member_id: Set(entry.member_id),
            book_id: Set(entry.book_id),
            created_at: Set(entry.created_at),
        };

        match active.insert(&self.db).await {
            Ok(_) => Ok(true),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Ok(false),
                _ => Err(e.into()),
            },
        }
    }

    async fn remove(&self, member_id: Uuid, book_id: Uuid) -> Result<bool, DomainError> {
        let result = FavouriteEntity::delete_many()
            .filter(Column::MemberId.eq(member_id))
            .filter(Column::BookId.eq(book_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn exists(&self, member_id: Uuid, book_id: Uuid) -> Result<bool, DomainError> {
        let entry = FavouriteEntity::find()
            .filter(Column::MemberId.eq(member_id))
            .filter(Column::BookId.eq(book_id))
            .one(&self.db)
            .await?;

        Ok(entry.is_some())
    }

    async fn entries_for_member(
        &self,
        member_id: Uuid,
    ) -> Result<Vec<FavouriteEntry>, DomainError> {
        let entries = FavouriteEntity::find()
            .filter(Column::MemberId.eq(member_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(entries
            .into_iter()
            .map(|e| FavouriteEntry {
                member_id: e.member_id,
                book_id: e.book_id,
                created_at: e.created_at,
            })
            .collect())
    }
}
