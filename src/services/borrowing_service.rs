//! Borrowing Service - Pure business logic without HTTP layer
//!
//! Enforces "one active loan per member" and "one borrower per book".
//! The rejection checks run in a fixed order so the reported reason is
//! deterministic when several conflicts hold at once; the partial unique
//! indexes on active records close the remaining race window.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    BookRepository, BorrowRecord, BorrowingRepository, DomainError, MemberRepository,
    MemberStatus, require_visible,
};

/// Outcome of a borrow attempt; rejections are values, not errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowOutcome {
    Success,
    /// The member already holds this exact book
    AlreadyBorrowedByMember,
    /// The member already holds some other book (one loan at a time)
    BorrowLimitReached,
    /// Another member holds the book
    BookUnavailable,
}

/// History entry enriched with the book title
#[derive(Debug, Clone, Serialize)]
pub struct BorrowHistoryEntry {
    pub id: Uuid,
    pub book_id: Uuid,
    pub book_title: String,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

pub struct BorrowingService {
    borrows: Arc<dyn BorrowingRepository>,
    books: Arc<dyn BookRepository>,
    members: Arc<dyn MemberRepository>,
}

impl BorrowingService {
    pub fn new(
        borrows: Arc<dyn BorrowingRepository>,
        books: Arc<dyn BookRepository>,
        members: Arc<dyn MemberRepository>,
    ) -> Self {
        Self {
            borrows,
            books,
            members,
        }
    }

    /// Attempt to borrow a book for a member.
    ///
    /// Check order is part of the contract:
    /// same-pair loan, then the member's loan limit, then book
    /// availability. Only then is the record inserted.
    pub async fn borrow(
        &self,
        member_id: Uuid,
        book_id: Uuid,
    ) -> Result<BorrowOutcome, DomainError> {
        let member = self
            .members
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| DomainError::Forbidden("no membership on file".to_string()))?;

        if member.status != MemberStatus::Approved {
            return Err(DomainError::Forbidden(format!(
                "membership is {}",
                member.status
            )));
        }

        require_visible(self.books.find_by_id(book_id).await?)?;

        if self
            .borrows
            .find_active_for_pair(member_id, book_id)
            .await?
            .is_some()
        {
            return Ok(BorrowOutcome::AlreadyBorrowedByMember);
        }

        if self.borrows.find_active_by_member(member_id).await?.is_some() {
            return Ok(BorrowOutcome::BorrowLimitReached);
        }

        if self.borrows.find_active_for_book(book_id).await?.is_some() {
            return Ok(BorrowOutcome::BookUnavailable);
        }

        let record = BorrowRecord {
            id: Uuid::new_v4(),
            book_id,
            member_id,
            borrowed_at: Utc::now(),
            returned_at: None,
        };
        self.borrows.insert(record).await?;

        tracing::info!("Member {} borrowed book {}", member_id, book_id);
        Ok(BorrowOutcome::Success)
    }

    /// Close the active loan for exactly this (member, book) pair.
    ///
    /// NotFound when no such active loan exists, even if member or book
    /// separately hold other active loans.
    pub async fn return_book(&self, member_id: Uuid, book_id: Uuid) -> Result<(), DomainError> {
        let Some(mut record) = self.borrows.find_active_for_pair(member_id, book_id).await?
        else {
            return Err(DomainError::NotFound);
        };

        record.returned_at = Some(Utc::now());
        self.borrows.update(record).await?;

        tracing::info!("Member {} returned book {}", member_id, book_id);
        Ok(())
    }

    pub async fn has_any_active_borrow(&self, member_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.borrows.find_active_by_member(member_id).await?.is_some())
    }

    pub async fn is_book_borrowed(&self, book_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.borrows.find_active_for_book(book_id).await?.is_some())
    }

    pub async fn is_borrowed_by_member(
        &self,
        member_id: Uuid,
        book_id: Uuid,
    ) -> Result<bool, DomainError> {
        Ok(self
            .borrows
            .find_active_for_pair(member_id, book_id)
            .await?
            .is_some())
    }

    /// Full borrow history for a member, newest first, with book titles.
    pub async fn history(&self, member_id: Uuid) -> Result<Vec<BorrowHistoryEntry>, DomainError> {
        let records = self.borrows.history_by_member(member_id).await?;

        let book_ids: Vec<Uuid> = records.iter().map(|r| r.book_id).collect();
        let titles: HashMap<Uuid, String> = if book_ids.is_empty() {
            HashMap::new()
        } else {
            self.books.titles_by_ids(&book_ids).await?
        };

        let entries = records
            .into_iter()
            .map(|record| {
                let book_title = titles
                    .get(&record.book_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown Title".to_string());

                BorrowHistoryEntry {
                    id: record.id,
                    book_id: record.book_id,
                    book_title,
                    borrowed_at: record.borrowed_at,
                    returned_at: record.returned_at,
                }
            })
            .collect();

        Ok(entries)
    }
}
