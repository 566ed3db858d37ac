//! Legacy square keys.
//!
//! A legacy key such as `"12A"` is a territory number followed by a single
//! square letter. Decomposition scans positions instead of searching for the
//! digit run textually, so only the first run of digits is ever treated as
//! the number.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("no territory number (key contains no digits)")]
    NoDigits,
    #[error("unexpected prefix {0:?} before the territory number")]
    UnexpectedPrefix(String),
    #[error("missing square letter after the territory number")]
    MissingLetter,
    #[error("square suffix {0:?} is not a single letter")]
    InvalidSuffix(String),
    #[error("square letter {0:?} is not an uppercase letter A-Z")]
    NotUppercase(char),
    #[error("territory number {0} does not fit in 32 bits")]
    NumberOverflow(String),
}

/// A decomposed legacy key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SquareKey {
    pub territory: u32,
    pub letter: char,
}

impl SquareKey {
    /// Key of the territory record in the target document, e.g. `terr12`.
    pub fn territory_key(&self) -> String {
        format!("terr{}", self.territory)
    }

    /// Key of the square entry inside a territory record, e.g. `SquareA`.
    pub fn square_key(&self) -> String {
        format!("Square{}", self.letter)
    }
}

impl fmt::Display for SquareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.territory, self.letter)
    }
}

/// Split a legacy key into its territory number and square letter.
pub fn decompose(key: &str) -> Result<SquareKey, KeyError> {
    let start = key
        .find(|c: char| c.is_ascii_digit())
        .ok_or(KeyError::NoDigits)?;
    if start > 0 {
        return Err(KeyError::UnexpectedPrefix(key[..start].to_string()));
    }

    let end = key[start..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|offset| start + offset)
        .unwrap_or(key.len());

    let digits = &key[start..end];
    let territory = digits
        .parse::<u32>()
        .map_err(|_| KeyError::NumberOverflow(digits.to_string()))?;

    let suffix = &key[end..];
    let mut chars = suffix.chars();
    let letter = match (chars.next(), chars.next()) {
        (None, _) => return Err(KeyError::MissingLetter),
        (Some(c), None) => c,
        (Some(_), Some(_)) => return Err(KeyError::InvalidSuffix(suffix.to_string())),
    };
    if !letter.is_ascii_uppercase() {
        return Err(KeyError::NotUppercase(letter));
    }

    Ok(SquareKey { territory, letter })
}
