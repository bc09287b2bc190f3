//! `stallbook-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;

pub use aggregate::Aggregate;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ExpenseId, ItemId, SaleId, TransactionId};

/// Money in the smallest currency unit (paisa).
pub type Money = i64;
