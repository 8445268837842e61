// src/quiz/session.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::{
    models::{
        category::Category,
        identity::{Identity, UserId},
        question::QuestionBank,
        result::QuizResult,
    },
    quiz::{
        comparison::{Comparison, compare},
        scoring::{AnswerSheet, ScoringError, record_answer},
    },
};

/// Screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum View {
    Landing,
    /// Showing question `step` (0-based).
    InQuiz { step: usize },
    Results,
    Comparison,
}

/// Something the user did, or the resolution of a fetch the controller performed.
#[derive(Debug, Clone)]
pub enum Event {
    SignedIn(Identity),
    SignedOut,
    StartQuiz,
    Answer { option: usize },
    /// Show the caller's saved result instead of taking the quiz.
    ReviewSaved,
    OwnResultLoaded(QuizResult),
    Compare {
        partner: UserId,
        focus: Option<Category>,
    },
    PartnerLoaded {
        partner: QuizResult,
        focus: Option<Category>,
    },
    Back,
    Home,
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Event::SignedIn(_) => "sign_in",
            Event::SignedOut => "sign_out",
            Event::StartQuiz => "start_quiz",
            Event::Answer { .. } => "answer",
            Event::ReviewSaved => "review_saved",
            Event::OwnResultLoaded(_) => "own_result_loaded",
            Event::Compare { .. } => "compare",
            Event::PartnerLoaded { .. } => "partner_loaded",
            Event::Back => "back",
            Event::Home => "home",
        }
    }
}

/// Side effect the controller must perform before committing a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Save { uid: UserId, result: QuizResult },
    FetchOwn(UserId),
    FetchPartner {
        uid: UserId,
        focus: Option<Category>,
    },
}

/// Outcome of applying an event: the state to commit once `effect` succeeds.
#[derive(Debug, Clone)]
pub struct Step {
    pub next: Session,
    pub effect: Effect,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("'{event}' is not allowed on the {view:?} view")]
    InvalidTransition { view: View, event: &'static str },

    #[error("sign in before starting the quiz")]
    NotSignedIn,

    #[error("the question bank is empty")]
    EmptyBank,

    #[error("no result to compare against; finish the quiz first")]
    MissingResult,

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// Everything one user's session holds in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub view: View,
    pub identity: Option<Identity>,
    pub sheet: AnswerSheet,
    /// Result currently on the results page.
    pub result: Option<QuizResult>,
    pub comparison: Option<Comparison>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            view: View::Landing,
            identity: None,
            sheet: AnswerSheet::new(),
            result: None,
            comparison: None,
        }
    }

    /// Computes the transition for `event` without touching `self`.
    ///
    /// `now` stamps a freshly completed result.
    pub fn apply(
        &self,
        bank: &QuestionBank,
        event: Event,
        now: DateTime<Utc>,
    ) -> Result<Step, TransitionError> {
        let invalid = |event: &Event| TransitionError::InvalidTransition {
            view: self.view,
            event: event.name(),
        };

        match (self.view, event) {
            // Answers and results belong to one uid; a different user starts over
            (_, Event::SignedIn(identity)) => {
                let same_user = self
                    .identity
                    .as_ref()
                    .is_some_and(|current| current.uid == identity.uid);
                let next = if same_user {
                    Session {
                        identity: Some(identity),
                        ..self.clone()
                    }
                } else {
                    Session {
                        identity: Some(identity),
                        ..Session::new()
                    }
                };
                Ok(self.commit(next))
            }

            (_, Event::SignedOut) => Ok(self.commit(Session::new())),

            (View::Landing, Event::StartQuiz) => {
                if self.identity.is_none() {
                    return Err(TransitionError::NotSignedIn);
                }
                if bank.is_empty() {
                    return Err(TransitionError::EmptyBank);
                }
                Ok(self.commit(Session {
                    view: View::InQuiz { step: 0 },
                    sheet: AnswerSheet::new(),
                    result: None,
                    comparison: None,
                    ..self.clone()
                }))
            }

            (View::InQuiz { step }, Event::Answer { option }) => {
                let identity = self.identity.as_ref().ok_or(TransitionError::NotSignedIn)?;
                let sheet = record_answer(&self.sheet, bank, step, option)?;

                if !sheet.is_complete(bank) {
                    return Ok(self.commit(Session {
                        view: View::InQuiz { step: step + 1 },
                        sheet,
                        ..self.clone()
                    }));
                }

                let result = QuizResult::new(
                    identity.display_name.clone(),
                    sheet.into_answers(),
                    now,
                );
                let effect = if identity.is_guest() {
                    Effect::None
                } else {
                    Effect::Save {
                        uid: identity.uid.clone(),
                        result: result.clone(),
                    }
                };

                Ok(Step {
                    next: Session {
                        view: View::Results,
                        sheet: AnswerSheet::new(),
                        result: Some(result),
                        ..self.clone()
                    },
                    effect,
                })
            }

            (View::Landing, Event::ReviewSaved) => {
                let identity = self.identity.as_ref().ok_or(TransitionError::NotSignedIn)?;
                Ok(Step {
                    next: self.clone(),
                    effect: Effect::FetchOwn(identity.uid.clone()),
                })
            }

            (View::Landing, Event::OwnResultLoaded(result)) => Ok(self.commit(Session {
                view: View::Results,
                sheet: AnswerSheet::new(),
                result: Some(result),
                ..self.clone()
            })),

            (View::Results, Event::Compare { partner, focus }) => {
                if self.result.is_none() {
                    return Err(TransitionError::MissingResult);
                }
                Ok(Step {
                    next: self.clone(),
                    effect: Effect::FetchPartner {
                        uid: partner,
                        focus,
                    },
                })
            }

            (View::Results, Event::PartnerLoaded { partner, focus }) => {
                let mine = self.result.as_ref().ok_or(TransitionError::MissingResult)?;
                let comparison = compare(bank, mine, &partner, focus);
                Ok(self.commit(Session {
                    view: View::Comparison,
                    comparison: Some(comparison),
                    ..self.clone()
                }))
            }

            (View::Comparison, Event::Back) => Ok(self.commit(Session {
                view: View::Results,
                comparison: None,
                ..self.clone()
            })),

            (View::Results, Event::Home) => Ok(self.commit(Session {
                view: View::Landing,
                result: None,
                comparison: None,
                ..self.clone()
            })),

            (_, event) => Err(invalid(&event)),
        }
    }

    fn commit(&self, next: Session) -> Step {
        Step {
            next,
            effect: Effect::None,
        }
    }
}
