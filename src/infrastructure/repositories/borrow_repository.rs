//! SeaORM implementation of BorrowingRepository
//!
//! Active-record uniqueness (one per book, one per member) is enforced
//! by partial unique indexes created in `db::init_db`; violations reach
//! the caller as Conflict through the DbErr conversion.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::{BorrowRecord, BorrowingRepository, DomainError};
use crate::models::borrow_record::{ActiveModel, Column, Entity as BorrowEntity, Model};

/// SeaORM-based implementation of BorrowingRepository
pub struct SeaOrmBorrowingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBorrowingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BorrowingRepository for SeaOrmBorrowingRepository {
    async fn insert(&self, record: BorrowRecord) -> Result<BorrowRecord, DomainError> {
        let result = to_active(record).insert(&self.db).await?;
        Ok(to_record(result))
    }

    async fn update(&self, record: BorrowRecord) -> Result<BorrowRecord, DomainError> {
        let result = to_active(record).update(&self.db).await?;
        Ok(to_record(result))
    }

    async fn find_active_for_pair(
        &self,
        member_id: Uuid,
        book_id: Uuid,
    ) -> Result<Option<BorrowRecord>, DomainError> {
        let record = BorrowEntity::find()
            .filter(Column::MemberId.eq(member_id))
            .filter(Column::BookId.eq(book_id))
            .filter(Column::ReturnedAt.is_null())
            .one(&self.db)
            .await?;

        Ok(record.map(to_record))
    }

    async fn find_active_by_member(
        &self,
        member_id: Uuid,
    ) -> Result<Option<BorrowRecord>, DomainError> {
        let record = BorrowEntity::find()
            .filter(Column::MemberId.eq(member_id))
            .filter(Column::ReturnedAt.is_null())
            .one(&self.db)
            .await?;

        Ok(record.map(to_record))
    }

    async fn find_active_for_book(
        &self,
        book_id: Uuid,
    ) -> Result<Option<BorrowRecord>, DomainError> {
        let record = BorrowEntity::find()
            .filter(Column::BookId.eq(book_id))
            .filter(Column::ReturnedAt.is_null())
            .one(&self.db)
            .await?;

        Ok(record.map(to_record))
    }

    async fn history_by_member(&self, member_id: Uuid) -> Result<Vec<BorrowRecord>, DomainError> {
        let records = BorrowEntity::find()
            .filter(Column::MemberId.eq(member_id))
            .order_by_desc(Column::BorrowedAt)
            .all(&self.db)
            .await?;

        Ok(records.into_iter().map(to_record).collect())
    }
}

fn to_record(model: Model) -> BorrowRecord {
    BorrowRecord {
        id: model.id,
        book_id: model.book_id,
        member_id: model.member_id,
        borrowed_at: model.borrowed_at,
        returned_at: model.returned_at,
    }
}

fn to_active(record: BorrowRecord) -> ActiveModel {
    ActiveModel {
        id: Set(record.id),
        book_id: Set(record.book_id),
        member_id: Set(record.member_id),
        borrowed_at: Set(record.borrowed_at),
        returned_at: Set(record.returned_at),
    }
}
