use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use anyhow::Result;

use crate::ports::WordValidator;

/// Word list used to validate submissions. Words are stored lowercase.
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// Load dictionary from a file, one word per line
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let dict = Self::from_words(content.lines());

        tracing::info!("Loaded {} words into dictionary", dict.len());

        Ok(dict)
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|line| line.as_ref().trim().to_lowercase())
            .filter(|word| word.chars().count() >= 2)
            .collect();

        Self { words }
    }

    /// Create an empty dictionary that rejects everything
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Check if a word exists in the dictionary
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordValidator for Dictionary {
    fn is_valid(&self, word: &str) -> bool {
        self.contains(word)
    }
}
