// src/models/session.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::{
        category::Category,
        identity::Identity,
        question::{PublicQuestion, QuestionBank},
        result::ResultSummary,
    },
    quiz::{
        comparison::{Comparison, verdict},
        scoring::Progress,
        session::{Session, View},
    },
};

/// DTO for answering the question on screen.
#[derive(Debug, Deserialize, Validate)]
pub struct AnswerRequest {
    /// 0 for the first option, 1 for the second.
    #[validate(range(max = 1, message = "Option must be 0 or 1."))]
    pub option: usize,
}

/// DTO for comparing against another user's result.
#[derive(Debug, Deserialize, Validate)]
pub struct CompareRequest {
    #[validate(length(
        min = 1,
        max = 128,
        message = "Partner id length must be between 1 and 128 characters."
    ))]
    pub partner_id: String,
    /// Restrict the per-question diffs to questions offering this category.
    pub focus: Option<Category>,
}

/// Comparison card as the results page shows it.
#[derive(Debug, Serialize)]
pub struct ComparisonSummary {
    #[serde(flatten)]
    pub comparison: Comparison,
    pub my_primary_label: &'static str,
    pub partner_primary_label: &'static str,
    pub verdict: &'static str,
}

impl From<&Comparison> for ComparisonSummary {
    fn from(comparison: &Comparison) -> Self {
        Self {
            comparison: comparison.clone(),
            my_primary_label: comparison.my_primary.label(),
            partner_primary_label: comparison.partner_primary.label(),
            verdict: verdict(comparison),
        }
    }
}

/// Everything a client needs to render the current view.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub view: View,
    pub identity: Option<Identity>,
    pub progress: Option<Progress>,
    pub question: Option<PublicQuestion>,
    pub result: Option<ResultSummary>,
    pub comparison: Option<ComparisonSummary>,
}

impl SessionSnapshot {
    pub fn new(session_id: Uuid, session: &Session, bank: &QuestionBank) -> Self {
        let (progress, question) = match session.view {
            View::InQuiz { step } => (
                Some(session.sheet.progress(bank)),
                bank.get(step).map(PublicQuestion::from),
            ),
            _ => (None, None),
        };

        Self {
            session_id,
            view: session.view,
            identity: session.identity.clone(),
            progress,
            question,
            result: session.result.as_ref().map(ResultSummary::from),
            comparison: session.comparison.as_ref().map(ComparisonSummary::from),
        }
    }
}
