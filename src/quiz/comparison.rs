// src/quiz/comparison.rs

use serde::Serialize;

use crate::{
    models::{category::Category, question::QuestionBank, result::QuizResult},
    quiz::scoring::compute_primary,
};

/// A question both people answered differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerDiff {
    pub question_id: u32,
    pub my_choice: String,
    pub partner_choice: String,
}

/// Side-by-side view of two results. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub my_name: String,
    pub partner_name: String,
    pub my_primary: Category,
    pub partner_primary: Category,
    pub same_primary: bool,
    /// Category the diffs were restricted to, if any.
    pub focus: Option<Category>,
    /// Ascending by question id.
    pub diffs: Vec<AnswerDiff>,
}

/// Compares two results question by question.
///
/// With a `focus`, only questions offering that category on at least one side are
/// considered. Answers are looked up by question id, so records of different lengths
/// still line up; a question missing from either record, or whose stored tag matches
/// neither of its options, is skipped.
pub fn compare(
    bank: &QuestionBank,
    mine: &QuizResult,
    partner: &QuizResult,
    focus: Option<Category>,
) -> Comparison {
    let my_primary = compute_primary(&mine.scores);
    let partner_primary = compute_primary(&partner.scores);

    let diffs = bank
        .iter()
        .filter(|q| focus.is_none_or(|c| q.involves(c)))
        .filter_map(|q| {
            let index = q.id as usize - 1;
            let my_tag = *mine.answers.get(index)?;
            let partner_tag = *partner.answers.get(index)?;
            if my_tag == partner_tag {
                return None;
            }
            let my_option = q.option_for(my_tag)?;
            let partner_option = q.option_for(partner_tag)?;
            Some(AnswerDiff {
                question_id: q.id,
                my_choice: my_option.text.clone(),
                partner_choice: partner_option.text.clone(),
            })
        })
        .collect();

    Comparison {
        my_name: mine.display_name.clone(),
        partner_name: partner.display_name.clone(),
        my_primary,
        partner_primary,
        same_primary: my_primary == partner_primary,
        focus,
        diffs,
    }
}

/// Closing remark for the comparison card.
pub fn verdict(comparison: &Comparison) -> &'static str {
    if comparison.same_primary {
        "You two speak the same love language, which makes it easier to understand each other."
    } else {
        "You feel loved through different languages. Try expressing love in your partner's language."
    }
}
