//! Guess scoring
//!
//! Pure functions: per-letter status of a guess against a solution, the
//! best status seen per keyboard letter, and win/loss determination.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::MAX_CHALLENGES;

/// Status of one letter position
///
/// Variants are ordered by keyboard precedence, so `max` picks the better one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterStatus {
    #[default]
    Unset,
    /// Letter not in the solution (or all its occurrences already used)
    Absent,
    /// Letter in the solution at another position
    Present,
    /// Letter at the right position
    Correct,
}

/// Where a game stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    InProgress,
    Won,
    Lost,
}

impl GameOutcome {
    pub fn is_completed(self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }
}

fn normalize(word: &str) -> Vec<char> {
    word.chars().flat_map(char::to_uppercase).collect()
}

/// Score `guess` against `solution`, one status per position
///
/// Exact matches are taken first; remaining letters are matched left to
/// right against the solution letters not yet used, so a repeated letter is
/// never marked more often than it occurs in the solution.
pub fn score_guess(guess: &str, solution: &str) -> Result<Vec<LetterStatus>> {
    let guess = normalize(guess);
    let solution = normalize(solution);

    if guess.len() != solution.len() {
        return Err(Error::Validation(format!(
            "Guess has {} letters, solution has {}",
            guess.len(),
            solution.len()
        )));
    }

    let mut statuses = vec![LetterStatus::Unset; guess.len()];
    let mut available: HashMap<char, usize> = HashMap::new();

    for (i, (&g, &s)) in guess.iter().zip(solution.iter()).enumerate() {
        if g == s {
            statuses[i] = LetterStatus::Correct;
        } else {
            *available.entry(s).or_insert(0) += 1;
        }
    }

    for (i, g) in guess.iter().enumerate() {
        if statuses[i] == LetterStatus::Correct {
            continue;
        }
        statuses[i] = match available.get_mut(g) {
            Some(count) if *count > 0 => {
                *count -= 1;
                LetterStatus::Present
            }
            _ => LetterStatus::Absent,
        };
    }

    Ok(statuses)
}

/// Best status per letter across all guesses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    letters: BTreeMap<char, LetterStatus>,
}

impl KeyboardState {
    /// Status of a key; letters never guessed are `Unset`
    pub fn get(&self, letter: char) -> LetterStatus {
        letter
            .to_uppercase()
            .next()
            .and_then(|c| self.letters.get(&c).copied())
            .unwrap_or_default()
    }

    /// Merge one scored guess; statuses only ever move up
    pub fn record(&mut self, guess: &str, statuses: &[LetterStatus]) {
        for (letter, &status) in normalize(guess).into_iter().zip(statuses) {
            let entry = self.letters.entry(letter).or_default();
            *entry = (*entry).max(status);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, LetterStatus)> + '_ {
        self.letters.iter().map(|(c, s)| (*c, *s))
    }

    /// Letters known not to be in the solution, alphabetically
    pub fn discarded(&self) -> Vec<char> {
        self.iter()
            .filter(|(_, s)| *s == LetterStatus::Absent)
            .map(|(c, _)| c)
            .collect()
    }
}

/// Aggregate keyboard statuses over every submitted guess
///
/// Guesses whose length does not match the solution are skipped.
pub fn keyboard_statuses<S: AsRef<str>>(guesses: &[S], solution: &str) -> KeyboardState {
    let mut keyboard = KeyboardState::default();
    for guess in guesses {
        if let Ok(statuses) = score_guess(guess.as_ref(), solution) {
            keyboard.record(guess.as_ref(), &statuses);
        }
    }
    keyboard
}

/// Letters ruled out by the guesses so far
pub fn discarded_letters<S: AsRef<str>>(guesses: &[S], solution: &str) -> Vec<char> {
    keyboard_statuses(guesses, solution).discarded()
}

pub fn is_solution<S: AsRef<str>>(guess: S, solution: &str) -> bool {
    normalize(guess.as_ref()) == normalize(solution)
}

/// Won if any guess matches, lost once the guesses run out
pub fn outcome<S: AsRef<str>>(guesses: &[S], solution: &str) -> GameOutcome {
    if guesses.iter().any(|g| is_solution(g, solution)) {
        GameOutcome::Won
    } else if guesses.len() >= MAX_CHALLENGES {
        GameOutcome::Lost
    } else {
        GameOutcome::InProgress
    }
}
