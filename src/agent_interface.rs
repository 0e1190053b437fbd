//! Traits that need to be implemented to have an agent evaluated
//!
//! The evaluator only knows an agent through [`Agent`]. Each concurrent simulation gets its own
//! agent from an [`AgentFactory`], so agents do not need to be thread-safe.

use std::collections::{BTreeSet, HashMap};

/// What the guessing agent should implement
pub trait Agent {
    /// Predict the next letter to guess.
    ///
    /// `masked_word` is the current state, with `_` for hidden positions (e.g. `"h_ll_"`).
    /// `wrong_guesses` holds the letters already tried that are not in the word.
    ///
    /// The answer must be exactly one lowercase letter `a`-`z`. Anything else (including an
    /// `Err`) is a contract violation and costs the agent a life.
    fn predict_next_letter(
        &mut self,
        masked_word: &str,
        wrong_guesses: &BTreeSet<char>,
    ) -> anyhow::Result<String>;
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn predict_next_letter(
        &mut self,
        masked_word: &str,
        wrong_guesses: &BTreeSet<char>,
    ) -> anyhow::Result<String> {
        (**self).predict_next_letter(masked_word, wrong_guesses)
    }
}

/// What will be given to the evaluator to allow it to create agents
///
/// The evaluator calls [`new_agent`](AgentFactory::new_agent) once per worker thread.
pub trait AgentFactory<A: Agent> {
    /// Returns an initialized agent
    fn new_agent(&self) -> A;
}

impl<A: Agent, F: Fn() -> A> AgentFactory<A> for F {
    fn new_agent(&self) -> A {
        self()
    }
}

/// Baseline agent guessing the most frequent untried letter of its training words.
///
/// Ties are broken alphabetically, so the agent is fully deterministic. Letters absent from the
/// training words are tried last, in alphabetical order.
#[derive(Debug, Clone)]
pub struct FrequencyAgent {
    ranking: Vec<char>,
}

impl FrequencyAgent {
    /// Build the agent from training words. Non `a`-`z` characters are ignored.
    pub fn new<S: AsRef<str>>(training_words: &[S]) -> Self {
        let mut counts: HashMap<char, usize> = HashMap::new();
        for word in training_words {
            for c in word.as_ref().chars() {
                let c = c.to_ascii_lowercase();
                if c.is_ascii_lowercase() {
                    *counts.entry(c).or_default() += 1;
                }
            }
        }

        let mut ranking: Vec<char> = ('a'..='z').collect();
        // stable sort keeps alphabetical order among equal counts
        ranking.sort_by_key(|c| std::cmp::Reverse(counts.get(c).copied().unwrap_or(0)));
        FrequencyAgent { ranking }
    }

    /// Letters in the order the agent will try them.
    pub fn ranking(&self) -> &[char] {
        &self.ranking
    }
}

impl Agent for FrequencyAgent {
    fn predict_next_letter(
        &mut self,
        masked_word: &str,
        wrong_guesses: &BTreeSet<char>,
    ) -> anyhow::Result<String> {
        let guess = self
            .ranking
            .iter()
            .find(|c| !masked_word.contains(**c) && !wrong_guesses.contains(c))
            .copied()
            .unwrap_or('a'); // everything tried already
        Ok(guess.to_string())
    }
}
