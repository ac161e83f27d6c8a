use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::letters::letter_value;

/// How a committed word is turned into points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    /// One point per letter
    #[default]
    Length,
    /// Sum of Scrabble-style letter values
    LetterValues,
}

impl FromStr for ScoringRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "length" => Ok(ScoringRule::Length),
            "letters" | "letter_values" => Ok(ScoringRule::LetterValues),
            other => Err(format!("unknown scoring rule '{}'", other)),
        }
    }
}

pub struct Scorer;

impl Scorer {
    /// Points awarded for `word` under `rule`
    pub fn word_points(rule: ScoringRule, word: &str) -> u64 {
        match rule {
            ScoringRule::Length => word.chars().count() as u64,
            ScoringRule::LetterValues => word
                .chars()
                .map(|letter| letter_value(letter) as u64)
                .sum(),
        }
    }
}

/// Process-wide running total. Only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score(u64);

impl Score {
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Add `points` and return the new total
    pub fn award(&mut self, points: u64) -> u64 {
        self.0 = self.0.saturating_add(points);
        self.0
    }
}
