//! Aggregation of game outcomes into performance statistics.
//!
//! [`Tally`] is the running accumulator (only integer counts, so adding outcomes in any order
//! gives the same result) and [`AggregateStats`] the final, read-only figures.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CorpusError;
use crate::game::GameOutcome;

/// Wins for one word length.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthStats {
    /// Games won.
    #[serde(deserialize_with = "null_as_default")]
    pub wins: u32,
    /// Games played.
    #[serde(deserialize_with = "null_as_default")]
    pub total: u32,
    /// `100 * wins / total`.
    #[serde(deserialize_with = "null_as_default")]
    pub win_rate: f64,
}

/// Decode an explicit `null` as the default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Performance over a whole evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Number of games played.
    pub total_tests: u32,
    /// Games won.
    pub wins: u32,
    /// Games lost.
    pub losses: u32,
    /// Percentage of games won, in `[0, 100]`.
    pub win_rate: f64,
    /// Mean number of guesses per game.
    pub avg_guesses: f64,
    /// Sum of guesses over every game.
    pub total_guesses: u64,
    /// Breakdown keyed by word length.
    pub by_length: BTreeMap<usize, LengthStats>,
}

impl AggregateStats {
    /// Fold `outcomes` into statistics.
    ///
    /// # Errors
    /// [`CorpusError::Empty`] if there is no outcome at all.
    pub fn from_outcomes<'a>(
        outcomes: impl IntoIterator<Item = &'a GameOutcome>,
    ) -> Result<Self, CorpusError> {
        outcomes
            .into_iter()
            .fold(Tally::default(), |mut tally, outcome| {
                tally.add(outcome);
                tally
            })
            .finish()
    }

    /// Win rate rounded to one decimal.
    pub fn rounded_win_rate(&self) -> f64 {
        round1(self.win_rate)
    }

    /// Average guesses rounded to one decimal.
    pub fn rounded_avg_guesses(&self) -> f64 {
        round1(self.avg_guesses)
    }
}

/// Running counts of an evaluation in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    games: u32,
    wins: u32,
    guesses: u64,
    by_length: BTreeMap<usize, (u32, u32)>,
}

impl Tally {
    /// Count one more game.
    pub fn add(&mut self, outcome: &GameOutcome) {
        self.games += 1;
        self.guesses += u64::from(outcome.guesses);
        let entry = self.by_length.entry(outcome.word.len()).or_default();
        entry.1 += 1;
        if outcome.won {
            self.wins += 1;
            entry.0 += 1;
        }
    }

    /// Games counted so far.
    pub fn games(&self) -> u32 {
        self.games
    }

    /// Win rate so far, 0 when nothing was counted.
    pub fn win_rate(&self) -> f64 {
        percent(self.wins, self.games)
    }

    /// Final statistics.
    ///
    /// # Errors
    /// [`CorpusError::Empty`] if no game was counted.
    pub fn finish(self) -> Result<AggregateStats, CorpusError> {
        if self.games == 0 {
            return Err(CorpusError::Empty);
        }
        let by_length = self
            .by_length
            .into_iter()
            .map(|(len, (wins, total))| {
                let stats = LengthStats {
                    wins,
                    total,
                    win_rate: percent(wins, total),
                };
                (len, stats)
            })
            .collect();

        Ok(AggregateStats {
            total_tests: self.games,
            wins: self.wins,
            losses: self.games - self.wins,
            win_rate: percent(self.wins, self.games),
            avg_guesses: self.guesses as f64 / f64::from(self.games),
            total_guesses: self.guesses,
            by_length,
        })
    }
}

fn percent(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * f64::from(part) / f64::from(total)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
