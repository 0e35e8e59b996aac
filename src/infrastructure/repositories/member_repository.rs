//! SeaORM implementation of MemberRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::{DomainError, Member, MemberRepository, MemberStatus};
use crate::models::member::{ActiveModel, Column, Entity as MemberEntity, Model};

/// SeaORM-based implementation of MemberRepository
pub struct SeaOrmMemberRepository {
    db: DatabaseConnection,
}

impl SeaOrmMemberRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemberRepository for SeaOrmMemberRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>, DomainError> {
        let member = MemberEntity::find_by_id(id).one(&self.db).await?;
        member.map(to_member).transpose()
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Member>, DomainError> {
        let member = MemberEntity::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        member.map(to_member).transpose()
    }

    async fn insert(&self, member: Member) -> Result<Member, DomainError> {
        let active = ActiveModel {
            id: Set(member.id),
            user_id: Set(member.user_id),
            name: Set(member.name),
            reason: Set(member.reason),
            status: Set(member.status.as_str().to_string()),
            joined_at: Set(member.joined_at),
            updated_at: Set(member.updated_at),
        };

        let result = active.insert(&self.db).await?;
        to_member(result)
    }

    async fn update(&self, member: Member) -> Result<Member, DomainError> {
        let active = ActiveModel {
            id: Set(member.id),
            user_id: Set(member.user_id),
            name: Set(member.name),
            reason: Set(member.reason),
            status: Set(member.status.as_str().to_string()),
            joined_at: Set(member.joined_at),
            updated_at: Set(member.updated_at),
        };

        let result = active.update(&self.db).await?;
        to_member(result)
    }

    async fn list_by_status(&self, status: MemberStatus) -> Result<Vec<Member>, DomainError> {
        let members = MemberEntity::find()
            .filter(Column::Status.eq(status.as_str()))
            .order_by_asc(Column::JoinedAt)
            .all(&self.db)
            .await?;

        members.into_iter().map(to_member).collect()
    }

    async fn names_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, DomainError> {
        let members = MemberEntity::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await?;

        Ok(members.into_iter().map(|m| (m.id, m.name)).collect())
    }
}

fn to_member(model: Model) -> Result<Member, DomainError> {
    Ok(Member {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
        reason: model.reason,
        status: model.status.parse()?,
        joined_at: model.joined_at,
        updated_at: model.updated_at,
    })
}
