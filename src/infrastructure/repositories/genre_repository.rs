//! SeaORM implementation of GenreRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::{DomainError, Genre, GenreRepository};
use crate::models::genre::{ActiveModel, Column, Entity as GenreEntity};

/// SeaORM-based implementation of GenreRepository
pub struct SeaOrmGenreRepository {
    db: DatabaseConnection,
}

impl SeaOrmGenreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GenreRepository for SeaOrmGenreRepository {
    async fn find_all(&self) -> Result<Vec<Genre>, DomainError> {
        let genres = GenreEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        Ok(genres
            .into_iter()
            .map(|g| Genre {
                id: g.id,
                name: g.name,
                created_at: g.created_at,
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Genre>, DomainError> {
        let genre = GenreEntity::find_by_id(id).one(&self.db).await?;

        Ok(genre.map(|g| Genre {
            id: g.id,
            name: g.name,
            created_at: g.created_at,
        }))
    }

    async fn create(&self, name: String) -> Result<Genre, DomainError> {
        let genre = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(chrono::Utc::now()),
        };

        let result = genre.insert(&self.db).await?;

        Ok(Genre {
            id: result.id,
            name: result.name,
            created_at: result.created_at,
        })
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = GenreEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn names_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, DomainError> {
        let genres = GenreEntity::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await?;

        Ok(genres.into_iter().map(|g| (g.id, g.name)).collect())
    }
}
