//! Secrets and guesses: validation and scoring.
//!
//! A [`Code`] is four distinct decimal digits. Secrets and guesses share
//! the type since the rules for both are the same.

use std::fmt;

use serde::{Serialize, Serializer};

/// Number of digits in a code.
pub const CODE_LEN: usize = 4;

/// Why a string is not a valid code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("expected {CODE_LEN} characters, got {0}")]
    WrongLength(usize),
    #[error("{0:?} is not a decimal digit")]
    NotADigit(char),
    #[error("digit {0} appears more than once")]
    RepeatedDigit(u8),
}

/// Four distinct decimal digits, validated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code([u8; CODE_LEN]);

impl Code {
    /// Parses and validates a code.
    ///
    /// # Errors
    /// Returns the first rule `raw` breaks, checked in the order:
    /// length, digits, distinctness.
    pub fn parse(raw: &str) -> Result<Self, CodeError> {
        let len = raw.chars().count();
        if len != CODE_LEN {
            return Err(CodeError::WrongLength(len));
        }

        let mut digits = [0u8; CODE_LEN];
        let mut seen = [false; 10];
        for (slot, c) in digits.iter_mut().zip(raw.chars()) {
            let digit = c.to_digit(10).ok_or(CodeError::NotADigit(c))? as u8;
            if seen[digit as usize] {
                return Err(CodeError::RepeatedDigit(digit));
            }
            seen[digit as usize] = true;
            *slot = digit;
        }
        Ok(Self(digits))
    }

    pub fn digits(&self) -> [u8; CODE_LEN] {
        self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.0 {
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

/// Serialized as its four-character string.
impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// `true` iff `raw` is exactly four distinct decimal digits.
pub fn validate(raw: &str) -> bool {
    Code::parse(raw).is_ok()
}

/// The outcome of scoring one guess against one secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    /// Guess digits that appear anywhere in the secret.
    pub correct_digits: u8,
    /// Guess digits equal to the secret digit at the same index.
    pub correct_positions: u8,
}

impl Score {
    /// Every digit in place.
    pub fn is_win(&self) -> bool {
        self.correct_positions as usize == CODE_LEN
    }
}

/// Scores `guess` against `secret`. Both are digit-distinct, so a
/// membership test per guess digit is an exact count.
pub fn score(secret: &Code, guess: &Code) -> Score {
    let secret = secret.digits();
    let guess = guess.digits();

    let correct_digits = guess.iter().filter(|d| secret.contains(d)).count() as u8;
    let correct_positions = secret
        .iter()
        .zip(guess.iter())
        .filter(|(a, b)| a == b)
        .count() as u8;

    Score {
        correct_digits,
        correct_positions,
    }
}
