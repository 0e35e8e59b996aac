//! Domain entities shared by the rule evaluators
//!
//! Plain data types; the infrastructure layer maps SeaORM models into
//! these before anything in `services/` sees them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DomainError;

/// Lifecycle of a membership application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Pending,
    Approved,
    Rejected,
    Revoked,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Pending => "pending",
            MemberStatus::Approved => "approved",
            MemberStatus::Rejected => "rejected",
            MemberStatus::Revoked => "revoked",
        }
    }
}

impl std::str::FromStr for MemberStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MemberStatus::Pending),
            "approved" => Ok(MemberStatus::Approved),
            "rejected" => Ok(MemberStatus::Rejected),
            "revoked" => Ok(MemberStatus::Revoked),
            other => Err(DomainError::Validation(format!(
                "unknown member status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External identity mirror (provisioned outside this application)
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Identity-linked library membership
#[derive(Debug, Clone, Serialize)]
pub struct Member {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub reason: Option<String>,
    pub status: MemberStatus,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog entry
#[derive(Debug, Clone, Serialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub author_id: Uuid,
    pub genre_id: Uuid,
    pub published_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub created_by: Uuid,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One loan of one book by one member; `returned_at: None` means active
#[derive(Debug, Clone, Serialize)]
pub struct BorrowRecord {
    pub id: Uuid,
    pub book_id: Uuid,
    pub member_id: Uuid,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

/// A member's review of a book; invisible to the public until approved
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: Uuid,
    pub book_id: Uuid,
    pub member_id: Uuid,
    pub rating: i32,
    pub content: Option<String>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Membership of a book in a member's favourites set
#[derive(Debug, Clone, Serialize)]
pub struct FavouriteEntry {
    pub member_id: Uuid,
    pub book_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Records that support soft deletion.
///
/// Read paths call [`require_visible`] so a soft-deleted row behaves
/// exactly like a missing one.
pub trait Deletable {
    fn is_deleted(&self) -> bool;
}

impl Deletable for Book {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

/// Treat soft-deleted rows as absent.
pub fn require_visible<T: Deletable>(found: Option<T>) -> Result<T, DomainError> {
    match found {
        Some(record) if !record.is_deleted() => Ok(record),
        _ => Err(DomainError::NotFound),
    }
}
