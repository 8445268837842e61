// src/quiz/controller.rs

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::watch;

use crate::{
    identity::{AuthError, IdentityProvider, IdentityWatch},
    models::{
        category::Category,
        identity::{Identity, UserId},
        question::QuestionBank,
    },
    quiz::session::{Effect, Event, Session, TransitionError},
    store::{ResultStore, StoreError},
};

/// Failures surfaced to the user. None of them end the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no result found for '{0}'")]
    PartnerNotFound(UserId),

    #[error("you have no saved result yet")]
    NoSavedResult,

    #[error("a request for this session is already in progress")]
    Busy,
}

/// Drives one session: applies events, performs the effects they ask for, and
/// commits the next state only once the effect succeeded.
///
/// On any error the session stays exactly as it was before the call.
pub struct SessionController {
    session: Session,
    bank: Arc<QuestionBank>,
    store: Arc<dyn ResultStore>,
    provider: Arc<dyn IdentityProvider>,
    identity: IdentityWatch,
}

impl SessionController {
    pub fn new(
        bank: Arc<QuestionBank>,
        store: Arc<dyn ResultStore>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            session: Session::new(),
            bank,
            store,
            provider,
            identity: IdentityWatch::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Fires with the current identity (or none) and on every sign-in/out.
    pub fn identity_changes(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.subscribe()
    }

    pub async fn sign_in(&mut self, credential: Option<&str>) -> Result<&Session, SessionError> {
        let identity = self.provider.sign_in(credential).await.map_err(|e| {
            tracing::warn!("Sign-in failed: {}", e);
            e
        })?;
        self.dispatch(Event::SignedIn(identity)).await?;
        self.identity.set(self.session.identity.clone());
        Ok(&self.session)
    }

    pub async fn sign_out(&mut self) -> Result<&Session, SessionError> {
        if let Some(identity) = &self.session.identity {
            self.provider.sign_out(identity).await;
        }
        self.dispatch(Event::SignedOut).await?;
        self.identity.set(None);
        Ok(&self.session)
    }

    /// Starts the quiz, signing in first with `credential` when nobody is signed in.
    pub async fn start_quiz(&mut self, credential: Option<&str>) -> Result<&Session, SessionError> {
        if self.session.identity.is_none() {
            self.sign_in(credential).await?;
        }
        self.dispatch(Event::StartQuiz).await?;
        Ok(&self.session)
    }

    pub async fn answer(&mut self, option: usize) -> Result<&Session, SessionError> {
        self.dispatch(Event::Answer { option }).await?;
        Ok(&self.session)
    }

    /// Shows the signed-in user's saved result without retaking the quiz.
    pub async fn review_saved(&mut self) -> Result<&Session, SessionError> {
        self.dispatch(Event::ReviewSaved).await?;
        Ok(&self.session)
    }

    pub async fn compare(
        &mut self,
        partner: UserId,
        focus: Option<Category>,
    ) -> Result<&Session, SessionError> {
        self.dispatch(Event::Compare { partner, focus }).await?;
        Ok(&self.session)
    }

    pub async fn back(&mut self) -> Result<&Session, SessionError> {
        self.dispatch(Event::Back).await?;
        Ok(&self.session)
    }

    pub async fn home(&mut self) -> Result<&Session, SessionError> {
        self.dispatch(Event::Home).await?;
        Ok(&self.session)
    }

    async fn dispatch(&mut self, event: Event) -> Result<(), SessionError> {
        let step = self.session.apply(&self.bank, event, Utc::now())?;

        let next = match step.effect {
            Effect::None => step.next,

            Effect::Save { uid, result } => {
                self.store.save(&uid, &result).await.map_err(|e| {
                    tracing::error!("Failed to save result for {}: {}", uid, e);
                    e
                })?;
                tracing::info!("Saved result for {}", uid);
                step.next
            }

            Effect::FetchOwn(uid) => {
                let result = self
                    .store
                    .fetch(&uid)
                    .await?
                    .ok_or(SessionError::NoSavedResult)?;
                step.next
                    .apply(&self.bank, Event::OwnResultLoaded(result), Utc::now())?
                    .next
            }

            Effect::FetchPartner { uid, focus } => {
                let partner = self
                    .store
                    .fetch(&uid)
                    .await?
                    .ok_or_else(|| SessionError::PartnerNotFound(uid.clone()))?;
                if !partner.is_consistent() {
                    tracing::warn!("Result for {} has scores that disagree with its answers", uid);
                }
                step.next
                    .apply(&self.bank, Event::PartnerLoaded { partner, focus }, Utc::now())?
                    .next
            }
        };

        tracing::debug!("Session view {:?} -> {:?}", self.session.view, next.view);
        self.session = next;
        Ok(())
    }
}
