// src/quiz/scoring.rs

use serde::Serialize;
use thiserror::Error;

use crate::models::{
    category::Category,
    question::QuestionBank,
    result::ScoreTally,
};

/// Errors raised when an answer does not fit the current sheet.
///
/// The session state machine only ever answers the next question with 0 or 1,
/// so these indicate a caller bug rather than user error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("question index {index} is out of range for a bank of {total} questions")]
    OutOfRange { index: usize, total: usize },

    #[error("option index {0} is out of range, expected 0 or 1")]
    InvalidOption(usize),

    #[error("question index {got} answered out of order, expected {expected}")]
    SequenceViolation { expected: usize, got: usize },
}

/// Answers recorded so far together with their running tally.
///
/// Only `record_answer` grows a sheet, which keeps the tally equal to the
/// per-category count of the answers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    answers: Vec<Category>,
    tally: ScoreTally,
}

/// Quiz progress as shown by the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// 1-based number of the question being shown.
    pub step: usize,
    pub total: usize,
    pub percent: u8,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answers(&self) -> &[Category] {
        &self.answers
    }

    pub fn tally(&self) -> &ScoreTally {
        &self.tally
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn is_complete(&self, bank: &QuestionBank) -> bool {
        self.answers.len() == bank.len()
    }

    /// Progress for the question currently on screen (the next one to answer).
    pub fn progress(&self, bank: &QuestionBank) -> Progress {
        let total = bank.len();
        let step = (self.answers.len() + 1).min(total);
        let percent = if total == 0 {
            100
        } else {
            (step * 100 / total) as u8
        };
        Progress {
            step,
            total,
            percent,
        }
    }

    pub fn into_answers(self) -> Vec<Category> {
        self.answers
    }
}

/// Records the answer to question `question_index` and returns the grown sheet.
///
/// Questions must be answered in order: `question_index` has to equal the number
/// of answers already on the sheet. The input sheet is left untouched.
pub fn record_answer(
    sheet: &AnswerSheet,
    bank: &QuestionBank,
    question_index: usize,
    option_index: usize,
) -> Result<AnswerSheet, ScoringError> {
    let question = bank.get(question_index).ok_or(ScoringError::OutOfRange {
        index: question_index,
        total: bank.len(),
    })?;

    if question_index != sheet.answers.len() {
        return Err(ScoringError::SequenceViolation {
            expected: sheet.answers.len(),
            got: question_index,
        });
    }

    let option = question
        .options
        .get(option_index)
        .ok_or(ScoringError::InvalidOption(option_index))?;

    let mut next = sheet.clone();
    next.answers.push(option.category);
    next.tally.increment(option.category);
    Ok(next)
}

/// Category with the highest count. Ties go to the earliest category in canonical order.
pub fn compute_primary(tally: &ScoreTally) -> Category {
    Category::ALL
        .into_iter()
        .fold(Category::ALL[0], |best, candidate| {
            if tally.get(candidate) > tally.get(best) {
                candidate
            } else {
                best
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuizOption;

    fn two_question_bank() -> QuestionBank {
        QuestionBank::new(vec![
            [
                QuizOption::new("A", Category::WordsOfAffirmation),
                QuizOption::new("B", Category::QualityTime),
            ],
            [
                QuizOption::new("C", Category::ReceivingGifts),
                QuizOption::new("D", Category::ActsOfService),
            ],
        ])
    }

    fn answer_all(bank: &QuestionBank, choose: impl Fn(usize) -> usize) -> AnswerSheet {
        let mut sheet = AnswerSheet::new();
        for i in 0..bank.len() {
            sheet = record_answer(&sheet, bank, i, choose(i)).unwrap();
        }
        sheet
    }

    #[test]
    fn test_two_question_scenario() {
        let bank = two_question_bank();
        let sheet = answer_all(&bank, |i| i); // first option, then second

        assert_eq!(
            sheet.answers(),
            &[Category::WordsOfAffirmation, Category::ActsOfService]
        );
        assert_eq!(sheet.tally().get(Category::WordsOfAffirmation), 1);
        assert_eq!(sheet.tally().get(Category::ActsOfService), 1);
        assert_eq!(sheet.tally().get(Category::QualityTime), 0);
        // A and D tie at 1; canonical order picks A
        assert_eq!(compute_primary(sheet.tally()), Category::WordsOfAffirmation);
    }

    #[test]
    fn test_tally_sum_equals_question_count() {
        let bank = QuestionBank::builtin();
        let patterns: [fn(usize) -> usize; 4] = [
            |_| 0,
            |_| 1,
            |i| i % 2,
            |i| (i / 3) % 2,
        ];

        for choose in patterns {
            let sheet = answer_all(&bank, choose);
            assert!(sheet.is_complete(&bank));
            assert_eq!(sheet.tally().total() as usize, bank.len());
            assert_eq!(*sheet.tally(), ScoreTally::from_answers(sheet.answers()));
        }
    }

    #[test]
    fn test_every_sequence_of_small_bank_sums_to_n() {
        let bank = two_question_bank();
        for mask in 0..4usize {
            let sheet = answer_all(&bank, |i| (mask >> i) & 1);
            assert_eq!(sheet.tally().total(), 2);
        }
    }

    #[test]
    fn test_out_of_order_answer_rejected() {
        let bank = two_question_bank();
        let sheet = AnswerSheet::new();

        let err = record_answer(&sheet, &bank, 1, 0).unwrap_err();
        assert_eq!(err, ScoringError::SequenceViolation { expected: 0, got: 1 });

        let sheet = record_answer(&sheet, &bank, 0, 0).unwrap();
        let err = record_answer(&sheet, &bank, 0, 1).unwrap_err();
        assert_eq!(err, ScoringError::SequenceViolation { expected: 1, got: 0 });
    }

    #[test]
    fn test_answer_past_end_rejected() {
        let bank = two_question_bank();
        let sheet = answer_all(&bank, |_| 0);
        let err = record_answer(&sheet, &bank, 2, 0).unwrap_err();
        assert_eq!(err, ScoringError::OutOfRange { index: 2, total: 2 });
    }

    #[test]
    fn test_invalid_option_rejected() {
        let bank = two_question_bank();
        let err = record_answer(&AnswerSheet::new(), &bank, 0, 2).unwrap_err();
        assert_eq!(err, ScoringError::InvalidOption(2));
    }

    #[test]
    fn test_record_answer_leaves_input_untouched() {
        let bank = two_question_bank();
        let sheet = AnswerSheet::new();
        let next = record_answer(&sheet, &bank, 0, 1).unwrap();
        assert!(sheet.is_empty());
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn test_compute_primary_is_deterministic() {
        let tally = ScoreTally::from_answers(&[
            Category::PhysicalTouch,
            Category::QualityTime,
            Category::PhysicalTouch,
            Category::QualityTime,
        ]);
        for _ in 0..10 {
            assert_eq!(compute_primary(&tally), Category::QualityTime);
        }
        assert_eq!(
            compute_primary(&ScoreTally::default()),
            Category::WordsOfAffirmation
        );
    }

    #[test]
    fn test_compute_primary_picks_max() {
        let tally = ScoreTally::from_answers(&[
            Category::ReceivingGifts,
            Category::PhysicalTouch,
            Category::PhysicalTouch,
        ]);
        assert_eq!(compute_primary(&tally), Category::PhysicalTouch);
    }

    #[test]
    fn test_progress_matches_progress_bar() {
        let bank = two_question_bank();
        let sheet = AnswerSheet::new();
        assert_eq!(
            sheet.progress(&bank),
            Progress { step: 1, total: 2, percent: 50 }
        );
        let sheet = record_answer(&sheet, &bank, 0, 0).unwrap();
        assert_eq!(sheet.progress(&bank).percent, 100);
    }
}
