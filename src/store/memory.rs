// src/store/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    models::{identity::UserId, result::QuizResult},
    store::{ResultStore, StoreError},
};

/// Process-local store used in demo mode and tests. Contents die with the process.
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    results: RwLock<HashMap<UserId, QuizResult>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.results.read().await.len()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn save(&self, uid: &UserId, result: &QuizResult) -> Result<(), StoreError> {
        if !result.is_consistent() {
            return Err(StoreError::Inconsistent(uid.clone()));
        }
        self.results
            .write()
            .await
            .insert(uid.clone(), result.clone());
        Ok(())
    }

    async fn fetch(&self, uid: &UserId) -> Result<Option<QuizResult>, StoreError> {
        Ok(self.results.read().await.get(uid).cloned())
    }

    async fn exists(&self, uid: &UserId) -> Result<bool, StoreError> {
        Ok(self.results.read().await.contains_key(uid))
    }
}
