// src/identity/mod.rs

//! Identity provider boundary.
//!
//! The provider owns credential exchange. The service hands it whatever
//! credential the client presented and gets back an [`Identity`] or an
//! [`AuthError`].

pub mod jwt;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use crate::models::identity::Identity;

pub use jwt::JwtIdentityProvider;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No credential was presented.
    #[error("sign-in was cancelled")]
    Cancelled,

    #[error("sign-in rejected: {0}")]
    Rejected(String),

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchanges a credential for an identity.
    async fn sign_in(&self, credential: Option<&str>) -> Result<Identity, AuthError>;

    /// Ends the provider-side session, if it keeps one.
    async fn sign_out(&self, _identity: &Identity) {}
}

/// Provider used in demo mode: every sign-in yields the guest identity.
#[derive(Debug, Default, Clone)]
pub struct GuestIdentityProvider;

#[async_trait]
impl IdentityProvider for GuestIdentityProvider {
    async fn sign_in(&self, _credential: Option<&str>) -> Result<Identity, AuthError> {
        Ok(Identity::guest())
    }
}

/// Current identity of a session plus change notifications.
///
/// Subscribers see the identity at subscription time (or `None`) and every change
/// after that.
#[derive(Debug)]
pub struct IdentityWatch {
    tx: watch::Sender<Option<Identity>>,
}

impl Default for IdentityWatch {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityWatch {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn set(&self, identity: Option<Identity>) {
        // Only notify when the identity actually changes
        self.tx.send_if_modified(|current| {
            if *current == identity {
                false
            } else {
                *current = identity;
                true
            }
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }
}
