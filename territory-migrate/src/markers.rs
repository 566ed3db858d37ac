//! Positional square marker allocation.
//!
//! Each letter A-Z has its own cursor into its marker pool. Cursors start at
//! zero, only move forward, and stop at the end of the pool; every square
//! after that receives a null marker.

use serde_json::Value;

use crate::key::KeyError;

const LETTERS: usize = 26;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursor {
    consumed: usize,
    available: usize,
    null_markers: usize,
    requested: bool,
}

/// Marker usage for one letter over a whole run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LetterUsage {
    pub letter: char,
    pub consumed: usize,
    pub available: usize,
    pub null_markers: usize,
}

impl LetterUsage {
    pub fn is_exhausted(&self) -> bool {
        self.null_markers > 0
    }

    pub fn unused(&self) -> usize {
        self.available - self.consumed
    }
}

/// Per-run letter cursors. Create one per transformation.
#[derive(Debug, Clone, Default)]
pub struct MarkerAllocator {
    cursors: [Cursor; LETTERS],
}

impl MarkerAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next marker for `letter` from `pool`, or `Ok(None)` once the
    /// pool is exhausted. Letters outside `A..=Z` are rejected.
    pub fn allocate(&mut self, letter: char, pool: &[Value]) -> Result<Option<Value>, KeyError> {
        let i = index(letter).ok_or(KeyError::NotUppercase(letter))?;
        let cursor = &mut self.cursors[i];
        cursor.requested = true;
        cursor.available = pool.len();

        match pool.get(cursor.consumed) {
            Some(marker) => {
                cursor.consumed += 1;
                Ok(Some(marker.clone()))
            }
            None => {
                cursor.null_markers += 1;
                Ok(None)
            }
        }
    }

    /// Number of markers taken so far for `letter`.
    pub fn position(&self, letter: char) -> usize {
        index(letter).map_or(0, |i| self.cursors[i].consumed)
    }

    /// Usage of every letter that was requested at least once, A to Z.
    pub fn usage(&self) -> Vec<LetterUsage> {
        self.cursors
            .iter()
            .zip('A'..='Z')
            .filter(|(c, _)| c.requested)
            .map(|(c, letter)| LetterUsage {
                letter,
                consumed: c.consumed,
                available: c.available,
                null_markers: c.null_markers,
            })
            .collect()
    }
}

fn index(letter: char) -> Option<usize> {
    letter
        .is_ascii_uppercase()
        .then(|| (letter as u8 - b'A') as usize)
}
