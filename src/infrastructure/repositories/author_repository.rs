//! SeaORM implementation of AuthorRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::{Author, AuthorRepository, DomainError};
use crate::models::author::{ActiveModel, Column, Entity as AuthorEntity};

/// SeaORM-based implementation of AuthorRepository
pub struct SeaOrmAuthorRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuthorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthorRepository for SeaOrmAuthorRepository {
    async fn find_all(&self) -> Result<Vec<Author>, DomainError> {
        let authors = AuthorEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        Ok(authors
            .into_iter()
            .map(|a| Author {
                id: a.id,
                name: a.name,
                created_at: a.created_at,
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, DomainError> {
        let author = AuthorEntity::find_by_id(id).one(&self.db).await?;

        Ok(author.map(|a| Author {
            id: a.id,
            name: a.name,
            created_at: a.created_at,
        }))
    }

    async fn create(&self, name: String) -> Result<Author, DomainError> {
        let author = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(chrono::Utc::now()),
        };

        let result = author.insert(&self.db).await?;

        Ok(Author {
            id: result.id,
            name: result.name,
            created_at: result.created_at,
        })
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = AuthorEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn names_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, DomainError> {
        let authors = AuthorEntity::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await?;

        Ok(authors.into_iter().map(|a| (a.id, a.name)).collect())
    }
}
