// src/models/question.rs

use serde::Serialize;

use crate::models::category::Category;

/// One of the two choices offered by a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizOption {
    /// Text shown on the option button.
    pub text: String,
    /// Love language the option counts towards.
    pub category: Category,
}

impl QuizOption {
    pub fn new(text: impl Into<String>, category: Category) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }
}

/// A forced-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    /// 1-based position in the bank.
    pub id: u32,
    pub options: [QuizOption; 2],
}

impl Question {
    /// Whether either option counts towards `category`.
    pub fn involves(&self, category: Category) -> bool {
        self.options.iter().any(|o| o.category == category)
    }

    /// The option carrying `category`, if any. Used to turn a stored tag back into text.
    pub fn option_for(&self, category: Category) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.category == category)
    }
}

/// DTO for sending a question to clients.
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: u32,
    pub options: [String; 2],
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            options: [q.options[0].text.clone(), q.options[1].text.clone()],
        }
    }
}

/// Ordered, immutable sequence of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Builds a bank from option pairs, numbering questions from 1 in the given order.
    pub fn new(pairs: Vec<[QuizOption; 2]>) -> Self {
        let questions = pairs
            .into_iter()
            .zip(1u32..)
            .map(|(options, id)| Question { id, options })
            .collect();
        Self { questions }
    }

    /// The built-in 30-question bank. Every pair of distinct categories appears three times.
    pub fn builtin() -> Self {
        let pairs = BUILTIN
            .iter()
            .map(|&(a_text, a_cat, b_text, b_cat)| {
                [QuizOption::new(a_text, a_cat), QuizOption::new(b_text, b_cat)]
            })
            .collect();
        Self::new(pairs)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Question at a 0-based position.
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Question by its 1-based id.
    pub fn by_id(&self, id: u32) -> Option<&Question> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

use Category::{
    ActsOfService as D, PhysicalTouch as E, QualityTime as B, ReceivingGifts as C,
    WordsOfAffirmation as A,
};

#[rustfmt::skip]
const BUILTIN: [(&str, Category, &str, Category); 30] = [
    ("I like to receive notes of affirmation.", A, "I like it when we spend an evening talking, just the two of us.", B),
    ("A small surprise gift makes my whole day.", C, "I feel loved when someone helps me finish a chore.", D),
    ("I like it when we hold hands while walking.", E, "Hearing \"I'm proud of you\" means a lot to me.", A),
    ("I like taking long walks together.", B, "I treasure keepsakes from the people I love.", C),
    ("It means a lot when someone runs an errand for me.", D, "A hug after a long day recharges me.", E),
    ("I feel loved when someone compliments my effort.", A, "I feel loved when someone brings me something back from a trip.", C),
    ("I value undivided attention over anything else.", B, "I appreciate it when someone cooks a meal for me.", D),
    ("A thoughtful present shows me someone was thinking of me.", C, "I feel close when someone sits right next to me.", E),
    ("Someone fixing what's broken at home makes me feel cared for.", D, "A heartfelt message in the middle of the day makes me smile.", A),
    ("A back rub is the best way to show affection.", E, "Sharing a hobby together makes me feel connected.", B),
    ("I love planning a trip together.", B, "I like being told that I'm appreciated.", A),
    ("I feel loved when someone takes care of things while I'm sick.", D, "Flowers for no reason make me happy.", C),
    ("Words of encouragement help me through hard times.", A, "A reassuring touch on the shoulder helps me through hard times.", E),
    ("I keep every card and present I'm given.", C, "I'd rather have a day out together than a present.", B),
    ("Cuddling while watching a movie is my favorite.", E, "I'd love it if someone did the dishes without being asked.", D),
    ("I like receiving a gift that matches my taste.", C, "I like hearing what someone loves about me.", A),
    ("Help with a big project shows me that I matter.", D, "A quiet dinner with no phones shows me that I matter.", B),
    ("I feel secure when someone holds me.", E, "I feel remembered when someone gives me a souvenir.", C),
    ("I'd rather be praised in front of others.", A, "I'd rather someone lend a hand when I'm busy.", D),
    ("Talking late into the night makes me feel close.", B, "Falling asleep holding hands makes me feel close.", E),
    ("An unexpected love letter would move me.", A, "An unexpected free afternoon together would move me.", B),
    ("I notice when someone fills up my car without being asked.", D, "I notice when someone picks out a present just for me.", C),
    ("Being thanked sincerely matters to me.", A, "A kiss goodbye matters to me.", E),
    ("Birthday gifts are really important to me.", C, "Celebrating my birthday together is what matters.", B),
    ("I like a playful nudge or a high five.", E, "I like it when someone takes over a task I dread.", D),
    ("A gift chosen with care speaks louder than words.", C, "Kind words speak louder than anything.", A),
    ("Doing activities together is how I feel loved.", B, "Having someone do things for me is how I feel loved.", D),
    ("I want to be hugged when I'm upset.", E, "A small gift would comfort me when I'm upset.", C),
    ("Breakfast made for me is a sign of love.", D, "\"You look great today\" is a sign of love.", A),
    ("Quality time is the best present.", B, "Physical closeness is the best present.", E),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_builtin_ids_are_sequential() {
        let bank = QuestionBank::builtin();
        assert_eq!(bank.len(), 30);
        for (i, q) in bank.iter().enumerate() {
            assert_eq!(q.id as usize, i + 1);
        }
    }

    #[test]
    fn test_builtin_covers_every_pair_evenly() {
        let bank = QuestionBank::builtin();
        let mut pairs: HashMap<(Category, Category), usize> = HashMap::new();
        let mut per_category: HashMap<Category, usize> = HashMap::new();

        for q in bank.iter() {
            let (a, b) = (q.options[0].category, q.options[1].category);
            assert_ne!(a, b, "question {} offers the same category twice", q.id);
            *pairs.entry((a.min(b), a.max(b))).or_default() += 1;
            *per_category.entry(a).or_default() += 1;
            *per_category.entry(b).or_default() += 1;
        }

        assert_eq!(pairs.len(), 10);
        assert!(pairs.values().all(|&n| n == 3));
        assert!(per_category.values().all(|&n| n == 12));
    }

    #[test]
    fn test_by_id_is_one_based() {
        let bank = QuestionBank::builtin();
        assert!(bank.by_id(0).is_none());
        assert_eq!(bank.by_id(1), bank.get(0));
        assert!(bank.by_id(31).is_none());
    }

    #[test]
    fn test_option_for_and_involves() {
        let bank = QuestionBank::builtin();
        let q = bank.by_id(1).unwrap();
        assert!(q.involves(Category::QualityTime));
        assert!(!q.involves(Category::PhysicalTouch));
        assert_eq!(
            q.option_for(Category::WordsOfAffirmation).map(|o| o.text.as_str()),
            Some("I like to receive notes of affirmation.")
        );
    }
}
