// src/store/mod.rs

//! Persistence boundary for quiz results.
//!
//! One result document per identity. `save` replaces the whole document and
//! nothing here retries; callers report failures and keep their prior state.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{identity::UserId, result::QuizResult};

pub use memory::InMemoryResultStore;
pub use postgres::PgResultStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Network, connection, or query failure. The caller may retry.
    #[error("result store unavailable: {0}")]
    Unavailable(String),

    /// Scores and answers disagree. Never written.
    #[error("refusing to save an inconsistent result for '{0}'")]
    Inconsistent(UserId),

    #[error("stored result for '{uid}' is malformed: {reason}")]
    Malformed { uid: UserId, reason: String },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Keyed result storage.
///
/// Contract:
/// - `save` overwrites any existing document for `uid` and rejects inconsistent results
/// - `fetch` returns `Ok(None)` when nothing is stored, which is not an error
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn save(&self, uid: &UserId, result: &QuizResult) -> Result<(), StoreError>;

    async fn fetch(&self, uid: &UserId) -> Result<Option<QuizResult>, StoreError>;

    async fn exists(&self, uid: &UserId) -> Result<bool, StoreError> {
        Ok(self.fetch(uid).await?.is_some())
    }
}
