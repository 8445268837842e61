use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::extract::FromRef;
use tokio::{
    sync::{Mutex, OwnedMutexGuard, RwLock},
    task::JoinHandle,
};
use uuid::Uuid;

use crate::{
    config::Config,
    identity::{GuestIdentityProvider, IdentityProvider, JwtIdentityProvider},
    models::question::QuestionBank,
    quiz::{
        controller::{SessionController, SessionError},
        demo,
    },
    store::{InMemoryResultStore, ResultStore, StoreError},
};

/// How often the sweeper looks for idle sessions.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

struct SessionEntry {
    controller: Arc<Mutex<SessionController>>,
    last_seen: Instant,
}

/// Live sessions keyed by id. Removing a session discards its in-memory state.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
}

impl SessionRegistry {
    pub async fn insert(&self, controller: SessionController) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(
            id,
            SessionEntry {
                controller: Arc::new(Mutex::new(controller)),
                last_seen: Instant::now(),
            },
        );
        id
    }

    /// Looks a session up and marks it as used.
    pub async fn get(&self, id: &Uuid) -> Option<Arc<Mutex<SessionController>>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.controller.clone())
    }

    /// Locks a session for one request.
    ///
    /// Fails with `Busy` instead of waiting when another request still holds it,
    /// so a duplicate click is ignored rather than replayed. `Ok(None)` means no
    /// such session.
    pub async fn lock(
        &self,
        id: &Uuid,
    ) -> Result<Option<OwnedMutexGuard<SessionController>>, SessionError> {
        match self.get(id).await {
            Some(session) => session
                .try_lock_owned()
                .map(Some)
                .map_err(|_| SessionError::Busy),
            None => Ok(None),
        }
    }

    pub async fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions unused for at least `idle_for`. Sessions with a request in
    /// flight are kept. Returns how many were dropped.
    pub async fn evict_idle(&self, idle_for: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            entry.last_seen.elapsed() < idle_for || entry.controller.try_lock().is_err()
        });
        before - sessions.len()
    }

    /// Runs [`evict_idle`](Self::evict_idle) periodically in the background.
    pub fn spawn_sweeper(&self, idle_for: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle(idle_for).await;
                if evicted > 0 {
                    tracing::info!("Evicted {} idle session(s)", evicted);
                }
            }
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub bank: Arc<QuestionBank>,
    pub store: Arc<dyn ResultStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn ResultStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            config,
            bank: Arc::new(QuestionBank::builtin()),
            store,
            identity,
            sessions: SessionRegistry::default(),
        }
    }

    /// State backed by the given store with JWT identities.
    pub fn with_store(config: Config, store: Arc<dyn ResultStore>) -> Self {
        let secret = config.jwt_secret.clone().unwrap_or_default();
        Self::new(config, store, Arc::new(JwtIdentityProvider::new(secret)))
    }

    /// Demo mode: guest identity, in-memory store, demo partner seeded.
    pub async fn demo(config: Config) -> Result<Self, StoreError> {
        let store = Arc::new(InMemoryResultStore::new());
        let state = Self::new(config, store, Arc::new(GuestIdentityProvider));
        demo::seed(state.store.as_ref(), &state.bank).await?;
        Ok(state)
    }

    pub fn new_controller(&self) -> SessionController {
        SessionController::new(self.bank.clone(), self.store.clone(), self.identity.clone())
    }
}

impl FromRef<AppState> for SessionRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<QuestionBank> {
    fn from_ref(state: &AppState) -> Self {
        state.bank.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ResultStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn busy_session_is_not_waited_on() {
        let state = AppState::demo(Config::demo()).await.unwrap();
        let id = state.sessions.insert(state.new_controller()).await;

        let guard = state.sessions.lock(&id).await.unwrap();
        assert!(guard.is_some());
        assert!(matches!(
            state.sessions.lock(&id).await,
            Err(SessionError::Busy)
        ));

        drop(guard);
        assert!(state.sessions.lock(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn removed_session_is_gone() {
        let state = AppState::demo(Config::demo()).await.unwrap();
        let id = state.sessions.insert(state.new_controller()).await;
        assert_eq!(state.sessions.len().await, 1);

        assert!(state.sessions.remove(&id).await);
        assert!(state.sessions.lock(&id).await.unwrap().is_none());
        assert!(!state.sessions.remove(&id).await);
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted() {
        let state = AppState::demo(Config::demo()).await.unwrap();
        let id = state.sessions.insert(state.new_controller()).await;

        // Recently used sessions survive a generous timeout
        assert_eq!(state.sessions.evict_idle(Duration::from_secs(3600)).await, 0);
        assert_eq!(state.sessions.len().await, 1);

        // Everything counts as idle with a zero timeout
        assert_eq!(state.sessions.evict_idle(Duration::ZERO).await, 1);
        assert!(state.sessions.lock(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn session_in_use_is_not_evicted() {
        let state = AppState::demo(Config::demo()).await.unwrap();
        let id = state.sessions.insert(state.new_controller()).await;

        let guard = state.sessions.lock(&id).await.unwrap();
        assert_eq!(state.sessions.evict_idle(Duration::ZERO).await, 0);

        drop(guard);
        assert_eq!(state.sessions.evict_idle(Duration::ZERO).await, 1);
    }

    #[tokio::test]
    async fn demo_state_has_partner() {
        let state = AppState::demo(Config::demo()).await.unwrap();
        let uid = crate::models::identity::UserId::new(demo::DEMO_PARTNER_UID).unwrap();
        assert!(state.store.exists(&uid).await.unwrap());
    }
}
