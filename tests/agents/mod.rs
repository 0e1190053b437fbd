#![allow(dead_code)]

use std::collections::BTreeSet;

use hangman_eval::agent_interface::Agent;

/// Guesses the alphabet in order, skipping letters already tried.
pub struct AlphabetAgent;

impl Agent for AlphabetAgent {
    fn predict_next_letter(
        &mut self,
        masked_word: &str,
        wrong_guesses: &BTreeSet<char>,
    ) -> anyhow::Result<String> {
        let guess = ('a'..='z')
            .find(|c| !masked_word.contains(*c) && !wrong_guesses.contains(c))
            .unwrap_or('a');
        Ok(guess.to_string())
    }
}

/// Always answers the same thing.
pub struct Stubborn(pub String);

impl Stubborn {
    pub fn new(answer: &str) -> Self {
        Stubborn(answer.to_owned())
    }
}

impl Agent for Stubborn {
    fn predict_next_letter(
        &mut self,
        _masked_word: &str,
        _wrong_guesses: &BTreeSet<char>,
    ) -> anyhow::Result<String> {
        Ok(self.0.clone())
    }
}

/// Plays a fixed sequence of letters, then `z` forever.
pub struct Sequence {
    letters: Vec<char>,
    next: usize,
}

impl Sequence {
    pub fn new(letters: impl IntoIterator<Item = char>) -> Self {
        Sequence {
            letters: letters.into_iter().collect(),
            next: 0,
        }
    }
}

impl Agent for Sequence {
    fn predict_next_letter(
        &mut self,
        _masked_word: &str,
        _wrong_guesses: &BTreeSet<char>,
    ) -> anyhow::Result<String> {
        let letter = self.letters.get(self.next).copied().unwrap_or('z');
        self.next += 1;
        Ok(letter.to_string())
    }
}

/// Panics on words of odd length, plays like [`AlphabetAgent`] otherwise.
pub struct Flaky;

impl Agent for Flaky {
    fn predict_next_letter(
        &mut self,
        masked_word: &str,
        wrong_guesses: &BTreeSet<char>,
    ) -> anyhow::Result<String> {
        if masked_word.len() % 2 == 1 {
            panic!("cannot handle odd lengths");
        }
        AlphabetAgent.predict_next_letter(masked_word, wrong_guesses)
    }
}
