// src/quiz/demo.rs

//! Fixtures for demo mode, when no database or identity provider is configured.

use chrono::Utc;

use crate::{
    models::{
        category::Category,
        identity::UserId,
        question::QuestionBank,
        result::QuizResult,
    },
    store::{ResultStore, StoreError},
};

pub const DEMO_PARTNER_UID: &str = "dummy-partner";
pub const DEMO_PARTNER_NAME: &str = "Demo Partner";

/// Order the demo partner prefers when a question offers two categories.
const DEMO_PREFERENCE: [Category; Category::COUNT] = [
    Category::WordsOfAffirmation,
    Category::ActsOfService,
    Category::QualityTime,
    Category::PhysicalTouch,
    Category::ReceivingGifts,
];

/// A complete result for the demo partner, answered by always picking the
/// preferred category. Scores are derived from the answers, so the result is
/// consistent with any bank.
pub fn partner_result(bank: &QuestionBank) -> QuizResult {
    let rank = |c: Category| DEMO_PREFERENCE.iter().position(|&p| p == c);
    let answers = bank
        .iter()
        .map(|q| {
            let [first, second] = &q.options;
            if rank(first.category) <= rank(second.category) {
                first.category
            } else {
                second.category
            }
        })
        .collect();
    QuizResult::new(DEMO_PARTNER_NAME, answers, Utc::now())
}

/// Stores the demo partner so guests have someone to compare with.
pub async fn seed(store: &dyn ResultStore, bank: &QuestionBank) -> Result<UserId, StoreError> {
    let uid = UserId::new(DEMO_PARTNER_UID)
        .ok_or_else(|| StoreError::Unavailable("demo partner uid is blank".to_string()))?;
    store.save(&uid, &partner_result(bank)).await?;
    tracing::info!("Seeded demo partner '{}'", uid);
    Ok(uid)
}
