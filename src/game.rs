//! Single game simulation.
//!
//! A [`GameSession`] holds the whole state of one game (masked word, wrong guesses, lives and
//! guess count) and can be stepped one guess at a time. [`simulate`] drives a session to the
//! end with an [`Agent`] and returns a [`GameOutcome`].
//!
//! # Rules
//!
//! - A correct letter reveals **every** occurrence of that letter at once.
//! - A letter absent from the word is added to the wrong guesses and costs a life, even if it
//!   was already guessed.
//! - A correct letter that is already fully revealed reveals nothing and costs a life. Judges
//!   that only check `letter in word` charge nothing here, so an agent repeating correct
//!   letters can score lower locally than on such a judge.
//! - A malformed answer (see [`ContractViolation`]) costs a life and is recorded.
//!
//! The agent is always asked at least once; play then continues while lives remain and a
//! position is still hidden. Lives never go below zero, so with `max_lives == 0` exactly one
//! guess is made.

use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tracing::{debug, instrument, trace, warn};

use crate::agent_interface::Agent;
use crate::error::{ContractViolation, CorpusError};

/// Character used for hidden positions.
pub const PLACEHOLDER: char = '_';

/// Number of lives when nothing else is configured.
pub const DEFAULT_MAX_LIVES: u32 = 6;

/// A non-empty word made of lowercase letters `a`-`z`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Word(String);

impl Word {
    /// Validate `word`.
    ///
    /// # Errors
    /// [`CorpusError::InvalidWord`] if `word` is empty or contains anything but `a`-`z`.
    pub fn new(word: impl Into<String>) -> Result<Word, CorpusError> {
        let word = word.into();
        let reason = if word.is_empty() {
            Some("empty word")
        } else if !word.chars().all(|c| c.is_ascii_lowercase()) {
            Some("only lowercase letters a-z are allowed")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(CorpusError::InvalidWord { word, reason }),
            None => Ok(Word(word)),
        }
    }

    /// The word itself.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of letters.
    #[allow(clippy::len_without_is_empty)] // never empty
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Distinct letters of the word, sorted.
    pub fn distinct_letters(&self) -> BTreeSet<char> {
        self.0.chars().collect()
    }

    fn contains(&self, letter: char) -> bool {
        self.0.contains(letter)
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The word as seen by the agent: revealed letters and hidden positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedWord(Vec<Option<char>>);

impl MaskedWord {
    /// Every position hidden.
    pub fn hidden(len: usize) -> Self {
        MaskedWord(vec![None; len])
    }

    /// True when no position is hidden anymore.
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    /// Reveal every hidden occurrence of `letter` in `word`. Returns how many were revealed.
    fn reveal(&mut self, word: &Word, letter: char) -> usize {
        let mut revealed = 0;
        for (slot, c) in self.0.iter_mut().zip(word.as_str().chars()) {
            if c == letter && slot.is_none() {
                *slot = Some(c);
                revealed += 1;
            }
        }
        revealed
    }
}

impl Display for MaskedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.0 {
            write!(f, "{}", c.unwrap_or(PLACEHOLDER))?;
        }
        Ok(())
    }
}

impl Serialize for MaskedWord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Effect of a single guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessResult {
    /// `count` hidden positions were revealed.
    Revealed {
        /// Guessed letter.
        letter: char,
        /// Number of positions revealed by this guess.
        count: usize,
    },
    /// The letter is not in the word.
    Wrong(char),
    /// The letter is in the word but was already fully revealed.
    Repeated(char),
    /// The answer was not a valid letter.
    Violation(ContractViolation),
}

impl GuessResult {
    /// True if this guess cost a life.
    pub fn cost_life(&self) -> bool {
        !matches!(self, GuessResult::Revealed { .. })
    }
}

/// Result of a finished game. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameOutcome {
    /// Target word.
    pub word: Word,
    /// True if every letter was revealed.
    pub won: bool,
    /// Number of times the agent was asked for a letter.
    pub guesses: u32,
    /// Lives remaining at the end (0 for a lost game).
    pub lives_left: u32,
    /// Masked word at the end of the game.
    pub final_masked: MaskedWord,
    /// Malformed answers given during the game.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ContractViolation>,
}

/// State of one game in progress.
#[derive(Debug, Clone)]
pub struct GameSession {
    word: Word,
    masked: MaskedWord,
    wrong_guesses: BTreeSet<char>,
    lives: u32,
    guesses: u32,
    violations: Vec<ContractViolation>,
}

impl GameSession {
    /// Start a game on `word` with `max_lives` lives.
    pub fn new(word: Word, max_lives: u32) -> Self {
        GameSession {
            masked: MaskedWord::hidden(word.len()),
            word,
            wrong_guesses: BTreeSet::new(),
            lives: max_lives,
            guesses: 0,
            violations: vec![],
        }
    }

    /// Current masked word.
    pub fn masked(&self) -> &MaskedWord {
        &self.masked
    }

    /// Letters guessed so far that are not in the word.
    pub fn wrong_guesses(&self) -> &BTreeSet<char> {
        &self.wrong_guesses
    }

    /// Remaining lives.
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Guesses made so far.
    pub fn guesses(&self) -> u32 {
        self.guesses
    }

    /// True once every position is revealed.
    pub fn is_won(&self) -> bool {
        self.masked.is_complete()
    }

    /// True when no more guess will be accepted.
    pub fn is_finished(&self) -> bool {
        // do-while: the first guess is always allowed
        self.guesses > 0 && (self.lives == 0 || self.is_won())
    }

    /// Ask `agent` for a letter and apply it.
    ///
    /// Returns `None` if the game was already finished. Errors and panics of the agent are
    /// turned into a [`ContractViolation`].
    pub fn play_turn<A: Agent + ?Sized>(&mut self, agent: &mut A) -> Option<GuessResult> {
        if self.is_finished() {
            return None;
        }
        let masked = self.masked.to_string();
        let wrong_guesses = &self.wrong_guesses;
        let answer = panic::catch_unwind(AssertUnwindSafe(|| {
            agent.predict_next_letter(&masked, wrong_guesses)
        }));
        let guess = match answer {
            Ok(Ok(raw)) => parse_guess(&raw),
            Ok(Err(e)) => Err(ContractViolation::AgentError(format!("{e:#}"))),
            Err(_) => Err(ContractViolation::AgentPanicked),
        };
        Some(self.apply(guess))
    }

    /// Apply an answer given from outside (interactive play).
    ///
    /// Returns `None` if the game was already finished.
    pub fn apply_guess(&mut self, raw: &str) -> Option<GuessResult> {
        if self.is_finished() {
            return None;
        }
        Some(self.apply(parse_guess(raw)))
    }

    /// Outcome of the game, or `None` if it is not finished yet.
    pub fn into_outcome(self) -> Option<GameOutcome> {
        self.is_finished().then(|| self.finish())
    }

    fn apply(&mut self, guess: Result<char, ContractViolation>) -> GuessResult {
        self.guesses += 1;
        let result = match guess {
            Ok(letter) if self.word.contains(letter) => {
                match self.masked.reveal(&self.word, letter) {
                    0 => GuessResult::Repeated(letter),
                    count => GuessResult::Revealed { letter, count },
                }
            }
            Ok(letter) => {
                self.wrong_guesses.insert(letter);
                GuessResult::Wrong(letter)
            }
            Err(violation) => {
                warn!(word = %self.word, %violation, "contract violation");
                self.violations.push(violation.clone());
                GuessResult::Violation(violation)
            }
        };
        if result.cost_life() {
            self.lives = self.lives.saturating_sub(1);
        }
        trace!(guess = self.guesses, masked = %self.masked, lives = self.lives, ?result);
        result
    }

    fn finish(self) -> GameOutcome {
        GameOutcome {
            won: self.masked.is_complete(),
            guesses: self.guesses,
            lives_left: self.lives,
            final_masked: self.masked,
            violations: self.violations,
            word: self.word,
        }
    }
}

fn parse_guess(raw: &str) -> Result<char, ContractViolation> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Err(ContractViolation::Empty),
        (Some(c), None) if c.is_ascii_lowercase() => Ok(c),
        (Some(_), None) => Err(ContractViolation::NotALetter(raw.to_owned())),
        (Some(_), Some(_)) => Err(ContractViolation::MultipleCharacters(raw.to_owned())),
    }
}

/// Play a whole game of `word` with `agent`.
///
/// Never fails: a misbehaving agent simply loses lives.
#[instrument(level = "debug", skip(agent, word), fields(word = %word))]
pub fn simulate<A: Agent + ?Sized>(agent: &mut A, word: &Word, max_lives: u32) -> GameOutcome {
    let mut session = GameSession::new(word.clone(), max_lives);
    while session.play_turn(agent).is_some() {}
    let outcome = session.finish();
    debug!(won = outcome.won, guesses = outcome.guesses, lives_left = outcome.lives_left);
    outcome
}
