//! Membership Service - Pure business logic without HTTP layer
//!
//! Owns the membership lifecycle: application, administrator decisions,
//! and the approved-member gate the other evaluators rely on.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    DomainError, Member, MemberRepository, MemberStatus, UserRepository,
};

pub struct MembershipService {
    members: Arc<dyn MemberRepository>,
    users: Arc<dyn UserRepository>,
}

impl MembershipService {
    pub fn new(members: Arc<dyn MemberRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { members, users }
    }

    /// Submit (or re-submit) a membership application for an identity.
    ///
    /// A Pending or Approved member cannot apply again; a Rejected or
    /// Revoked member re-enters the queue with a fresh join date.
    pub async fn apply(
        &self,
        user_id: Uuid,
        name: String,
        reason: Option<String>,
    ) -> Result<Member, DomainError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(DomainError::NotFound);
        }

        let now = Utc::now();

        if let Some(mut existing) = self.members.find_by_user_id(user_id).await? {
            match existing.status {
                MemberStatus::Pending | MemberStatus::Approved => {
                    return Err(DomainError::Conflict(
                        "an application for this identity is already on file".to_string(),
                    ));
                }
                MemberStatus::Rejected | MemberStatus::Revoked => {
                    existing.name = name;
                    existing.reason = reason;
                    existing.status = MemberStatus::Pending;
                    existing.joined_at = now;
                    existing.updated_at = now;

                    tracing::info!("Re-application for member {}", existing.id);
                    return self.members.update(existing).await;
                }
            }
        }

        let member = Member {
            id: Uuid::new_v4(),
            user_id,
            name,
            reason,
            status: MemberStatus::Pending,
            joined_at: now,
            updated_at: now,
        };

        tracing::info!("New membership application {}", member.id);
        self.members.insert(member).await
    }

    /// Administrator override: set any status from any other.
    /// Returns false when the member does not exist.
    pub async fn set_status(
        &self,
        member_id: Uuid,
        new_status: MemberStatus,
    ) -> Result<bool, DomainError> {
        let Some(mut member) = self.members.find_by_id(member_id).await? else {
            return Ok(false);
        };

        member.status = new_status;
        member.updated_at = Utc::now();
        self.members.update(member).await?;

        tracing::info!("Member {} status set to {}", member_id, new_status);
        Ok(true)
    }

    pub async fn get_by_user_id(&self, user_id: Uuid) -> Result<Option<Member>, DomainError> {
        self.members.find_by_user_id(user_id).await
    }

    /// Resolve the member for an identity and require Approved status.
    /// The api layer uses this to gate borrowing, reviews and favourites.
    pub async fn require_approved(&self, user_id: Uuid) -> Result<Member, DomainError> {
        let member = self
            .members
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| DomainError::Forbidden("no membership on file".to_string()))?;

        if member.status != MemberStatus::Approved {
            return Err(DomainError::Forbidden(format!(
                "membership is {}",
                member.status
            )));
        }

        Ok(member)
    }

    pub async fn list_by_status(
        &self,
        status: MemberStatus,
    ) -> Result<Vec<Member>, DomainError> {
        self.members.list_by_status(status).await
    }
}
