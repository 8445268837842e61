// src/models/result.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::category::Category;

/// Per-category answer counts.
///
/// Serialized as a map keyed by category tag (`{"A": 3, "B": 1, ...}`) with every
/// category present. Missing keys deserialize as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Category, u32>", into = "BTreeMap<Category, u32>")]
pub struct ScoreTally {
    counts: [u32; Category::COUNT],
}

impl ScoreTally {
    /// Tally of an answer record. A consistent result's scores equal this.
    pub fn from_answers(answers: &[Category]) -> Self {
        let mut tally = Self::default();
        for &category in answers {
            tally.increment(category);
        }
        tally
    }

    pub fn get(&self, category: Category) -> u32 {
        self.counts[category.index()]
    }

    pub fn increment(&mut self, category: Category) {
        self.counts[category.index()] += 1;
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Categories with their counts, highest first. Equal counts keep canonical order.
    pub fn ranked(&self) -> Vec<(Category, u32)> {
        let mut rows: Vec<(Category, u32)> =
            Category::ALL.into_iter().map(|c| (c, self.get(c))).collect();
        // sort_by is stable, which keeps canonical order among ties
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows
    }
}

impl From<BTreeMap<Category, u32>> for ScoreTally {
    fn from(map: BTreeMap<Category, u32>) -> Self {
        let mut tally = Self::default();
        for (category, count) in map {
            tally.counts[category.index()] = count;
        }
        tally
    }
}

impl From<ScoreTally> for BTreeMap<Category, u32> {
    fn from(tally: ScoreTally) -> Self {
        Category::ALL.into_iter().map(|c| (c, tally.get(c))).collect()
    }
}

/// A user's completed quiz as persisted. One per identity; a retake overwrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub display_name: String,
    pub scores: ScoreTally,
    /// Chosen category per question, in question order.
    pub answers: Vec<Category>,
    /// Time of the last save.
    pub timestamp: DateTime<Utc>,
}

impl QuizResult {
    pub fn new(display_name: impl Into<String>, answers: Vec<Category>, timestamp: DateTime<Utc>) -> Self {
        let scores = ScoreTally::from_answers(&answers);
        Self {
            display_name: display_name.into(),
            scores,
            answers,
            timestamp,
        }
    }

    /// Whether the stored tally is exactly the per-category count of the answers.
    pub fn is_consistent(&self) -> bool {
        ScoreTally::from_answers(&self.answers) == self.scores
    }
}

/// One row of the results chart.
#[derive(Debug, Serialize)]
pub struct ChartRow {
    pub category: Category,
    pub label: &'static str,
    pub score: u32,
}

/// DTO describing a result the way the results page presents it.
#[derive(Debug, Serialize)]
pub struct ResultSummary {
    pub display_name: String,
    pub scores: ScoreTally,
    pub answers: Vec<Category>,
    pub timestamp: DateTime<Utc>,
    pub primary: Category,
    pub primary_label: &'static str,
    pub primary_description: &'static str,
    pub chart: Vec<ChartRow>,
}

impl From<&QuizResult> for ResultSummary {
    fn from(result: &QuizResult) -> Self {
        let primary = crate::quiz::scoring::compute_primary(&result.scores);
        let chart = result
            .scores
            .ranked()
            .into_iter()
            .map(|(category, score)| ChartRow {
                category,
                label: category.label(),
                score,
            })
            .collect();

        Self {
            display_name: result.display_name.clone(),
            scores: result.scores,
            answers: result.answers.clone(),
            timestamp: result.timestamp,
            primary,
            primary_label: primary.label(),
            primary_description: primary.description(),
            chart,
        }
    }
}
