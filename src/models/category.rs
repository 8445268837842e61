// src/models/category.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The five love languages a quiz option can map to.
///
/// Declaration order is the canonical enumeration order (A < B < C < D < E).
/// It decides ties when picking a primary category, so do not reorder.
/// Serialized as the single-letter tag used by stored result documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "A")]
    WordsOfAffirmation,
    #[serde(rename = "B")]
    QualityTime,
    #[serde(rename = "C")]
    ReceivingGifts,
    #[serde(rename = "D")]
    ActsOfService,
    #[serde(rename = "E")]
    PhysicalTouch,
}

impl Category {
    pub const COUNT: usize = 5;

    /// All categories in canonical order.
    pub const ALL: [Category; Category::COUNT] = [
        Category::WordsOfAffirmation,
        Category::QualityTime,
        Category::ReceivingGifts,
        Category::ActsOfService,
        Category::PhysicalTouch,
    ];

    /// Position in the canonical order, usable as an array index.
    pub fn index(self) -> usize {
        match self {
            Category::WordsOfAffirmation => 0,
            Category::QualityTime => 1,
            Category::ReceivingGifts => 2,
            Category::ActsOfService => 3,
            Category::PhysicalTouch => 4,
        }
    }

    pub fn tag(self) -> char {
        match self {
            Category::WordsOfAffirmation => 'A',
            Category::QualityTime => 'B',
            Category::ReceivingGifts => 'C',
            Category::ActsOfService => 'D',
            Category::PhysicalTouch => 'E',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::WordsOfAffirmation => "Words of Affirmation",
            Category::QualityTime => "Quality Time",
            Category::ReceivingGifts => "Receiving Gifts",
            Category::ActsOfService => "Acts of Service",
            Category::PhysicalTouch => "Physical Touch",
        }
    }

    /// Long-form explanation shown on the results page for a primary category.
    pub fn description(self) -> &'static str {
        match self {
            Category::WordsOfAffirmation => {
                "You feel most loved when the people close to you say so: a warm word, \
                 encouragement, or sincere praise reaches you more than anything else."
            }
            Category::QualityTime => {
                "You feel truly connected when someone gives you their undivided attention \
                 and simply spends time with you."
            }
            Category::ReceivingGifts => {
                "A gift tells you that someone was thinking of you. It is the care behind \
                 the present, not the object itself, that you treasure."
            }
            Category::ActsOfService => {
                "You feel cared for when someone helps you through concrete actions, taking \
                 a burden off your shoulders without being asked."
            }
            Category::PhysicalTouch => {
                "Holding hands, a hug, or a hand on your shoulder gives you emotional security \
                 and tells you that you are loved."
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Parses either the letter tag ("A".."E", any case) or the variant name.
impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| {
                trimmed.eq_ignore_ascii_case(&c.tag().to_string())
                    || trimmed.eq_ignore_ascii_case(&format!("{:?}", c))
            })
            .ok_or_else(|| format!("Unknown category '{}'", s))
    }
}

/// DTO for listing categories to clients.
#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub tag: Category,
    pub label: &'static str,
    pub description: &'static str,
}

impl From<Category> for CategoryInfo {
    fn from(category: Category) -> Self {
        Self {
            tag: category,
            label: category.label(),
            description: category.description(),
        }
    }
}
