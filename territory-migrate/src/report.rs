//! Summary of a migration run.

use serde::Serialize;

use crate::markers::LetterUsage;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub territories: usize,
    pub squares: usize,
    /// Legacy keys whose square replaced an earlier one for the same
    /// territory and letter.
    pub duplicates: Vec<String>,
    pub letters: Vec<LetterUsage>,
}

impl MigrationReport {
    /// Letters that ran out of markers before their last square.
    pub fn exhausted_letters(&self) -> Vec<char> {
        self.letters
            .iter()
            .filter(|u| u.is_exhausted())
            .map(|u| u.letter)
            .collect()
    }

    /// Letters with pool entries that were never assigned, and how many.
    pub fn unused_markers(&self) -> Vec<(char, usize)> {
        self.letters
            .iter()
            .filter(|u| u.unused() > 0)
            .map(|u| (u.letter, u.unused()))
            .collect()
    }

    pub fn null_markers(&self) -> usize {
        self.letters.iter().map(|u| u.null_markers).sum()
    }

    pub fn has_warnings(&self) -> bool {
        !self.duplicates.is_empty() || self.null_markers() > 0
    }
}
