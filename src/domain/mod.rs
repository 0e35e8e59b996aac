//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only entity types, trait definitions and domain error types.

pub mod entities;
pub mod errors;
pub mod pagination;
pub mod repositories;

pub use entities::*;
pub use errors::DomainError;
pub use pagination::{Page, PageRequest};
pub use repositories::*;
