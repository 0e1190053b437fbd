//! Local batch evaluation of an agent over a word corpus.
//!
//! This module defines the [`Evaluator`] type, which orchestrates a local evaluation.
//! Its responsibilities include:
//!
//! - Validating the corpus and drawing an optional random sample from it
//! - Running one game per word on a pool of worker threads
//! - Folding the outcomes into [`AggregateStats`]
//!
//! # Workers & Agents
//!
//! Every worker thread builds its own agent with the [`AgentFactory`] and plays its games with
//! it, so agents never need to be shared between threads. Outcomes are sent back to the calling
//! thread over a channel and put back in corpus order, which makes the result independent of
//! scheduling.
//!
//! # Sampling
//!
//! When a sample size smaller than the corpus is requested, words are drawn uniformly without
//! replacement. With [`Configuration::with_seed`] the draw is reproducible.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, instrument, trace, warn};

use crate::agent_interface::{Agent, AgentFactory};
use crate::configuration::Configuration;
use crate::error::CorpusError;
use crate::game::{simulate, GameOutcome, Word};
use crate::logger::init_logger;
use crate::stats::{AggregateStats, Tally};

/// Statistics of a local evaluation together with every game played.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// Aggregated statistics.
    pub stats: AggregateStats,
    /// One outcome per evaluated word, in evaluation order.
    pub outcomes: Vec<GameOutcome>,
}

impl BatchReport {
    /// The first `n` outcomes.
    pub fn examples(&self, n: usize) -> &[GameOutcome] {
        &self.outcomes[..n.min(self.outcomes.len())]
    }
}

/// The main type for evaluating an agent locally.
///
/// # Type Parameters
/// - `A`: The agent type implementing [`Agent`]
/// - `F`: A factory implementing [`AgentFactory<A>`]
pub struct Evaluator<A, F>
where
    A: Agent,
    F: AgentFactory<A>,
{
    factory: F,
    config: Configuration,
    _agent: PhantomData<fn() -> A>,
}

impl<A: Agent, F: AgentFactory<A> + Sync> Evaluator<A, F> {
    /// Create an [`Evaluator`] with given [`Configuration`] and [`AgentFactory`]
    ///
    /// Installs the file logger when `config.log` is set.
    #[instrument(skip_all)]
    pub fn new(factory: F, config: Configuration) -> Evaluator<A, F> {
        if config.log {
            if let Err(e) = init_logger() {
                warn!("file logging disabled: {e:#}");
            }
        }

        trace!(?config);

        Evaluator {
            factory,
            config,
            _agent: PhantomData,
        }
    }

    /// Evaluate the agent over `corpus`, or over a random sample of `sample_size` words.
    ///
    /// # Errors
    /// Returns a [`CorpusError`] if the corpus is empty, contains an invalid word, or if
    /// `sample_size` is zero. No game is played in that case.
    pub fn evaluate<S: AsRef<str>>(
        &self,
        corpus: &[S],
        sample_size: Option<usize>,
    ) -> Result<AggregateStats, CorpusError> {
        Ok(self.run(corpus, sample_size)?.stats)
    }

    /// Same as [`evaluate`](Self::evaluate), also returning the outcome of every game.
    #[instrument(skip_all, fields(corpus = corpus.len(), ?sample_size))]
    pub fn run<S: AsRef<str>>(
        &self,
        corpus: &[S],
        sample_size: Option<usize>,
    ) -> Result<BatchReport, CorpusError> {
        let words = select_words(corpus, sample_size, self.config.seed)?;
        info!(words = words.len(), "starting evaluation");

        let outcomes = self.play_all(&words);
        let stats = AggregateStats::from_outcomes(&outcomes)?;
        info!(
            total = stats.total_tests,
            wins = stats.wins,
            win_rate = stats.win_rate,
            "evaluation finished"
        );
        Ok(BatchReport { stats, outcomes })
    }

    fn play_all(&self, words: &[Word]) -> Vec<GameOutcome> {
        let total = words.len();
        let workers = self.config.workers.clamp(1, total.max(1));
        let max_lives = self.config.max_lives;
        let next_word = AtomicUsize::new(0);
        let (tx_result, rx_result) = mpsc::channel();

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let tx_result = tx_result.clone();
                let next_word = &next_word;
                let factory = &self.factory;
                scope.spawn(move || {
                    let mut agent = factory.new_agent();
                    loop {
                        let index = next_word.fetch_add(1, Ordering::Relaxed);
                        let Some(word) = words.get(index) else {
                            break;
                        };
                        let outcome = simulate(&mut agent, word, max_lives);
                        if tx_result.send((index, outcome)).is_err() {
                            break;
                        }
                    }
                });
            }
            // only the workers hold senders now, so the loop ends when they are all done
            drop(tx_result);

            let mut slots: Vec<Option<GameOutcome>> = vec![None; total];
            let mut tally = Tally::default();
            for (index, outcome) in rx_result {
                tally.add(&outcome);
                slots[index] = Some(outcome);
                self.report_progress(&tally, total);
            }
            slots.into_iter().flatten().collect()
        })
    }

    fn report_progress(&self, tally: &Tally, total: usize) {
        let done = tally.games() as usize;
        let interval = self.config.progress_interval;
        let due = (interval > 0 && done % interval == 0) || done == total;
        if !due {
            return;
        }
        info!(done, total, win_rate = tally.win_rate(), "progress");
        if self.config.verbose {
            print_progress(done, total, tally.win_rate());
        }
    }
}

/// Validate `corpus` and pick the words to play.
fn select_words<S: AsRef<str>>(
    corpus: &[S],
    sample_size: Option<usize>,
    seed: Option<u64>,
) -> Result<Vec<Word>, CorpusError> {
    if corpus.is_empty() {
        return Err(CorpusError::Empty);
    }
    if sample_size == Some(0) {
        return Err(CorpusError::InvalidSampleSize);
    }
    let words = corpus
        .iter()
        .map(|w| Word::new(w.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    match sample_size {
        Some(n) if n < words.len() => {
            let mut rng = match seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            };
            let picked = rand::seq::index::sample(&mut rng, words.len(), n);
            trace!(?seed, sample = n, "sampled corpus");
            Ok(picked.into_iter().map(|i| words[i].clone()).collect())
        }
        _ => Ok(words),
    }
}

fn print_progress(done: usize, total: usize, win_rate: f64) {
    // clear line, green label, default color
    println!("\x1b[2K\x1b[32mProgress:\x1b[39m {done}/{total} | Win Rate: {win_rate:.1}%");
}
