//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::domain::{DomainError, User, UserRepository};
use crate::models::user::Entity as UserEntity;

/// SeaORM-based implementation of UserRepository
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let user = UserEntity::find_by_id(id).one(&self.db).await?;

        Ok(user.map(|u| User {
            id: u.id,
            username: u.username,
            role: u.role,
            created_at: u.created_at,
        }))
    }
}
