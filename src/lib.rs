//! # Hangman Eval
//!
//! A Rust crate for scoring Hangman guessing agents, either locally on a word corpus or through
//! a remote judge.
//!
//! It provides:
//! - The [`Agent`](crate::agent_interface::Agent) trait agents implement, and a baseline
//!   [`FrequencyAgent`](crate::agent_interface::FrequencyAgent)
//! - Game simulation ([`simulate`](crate::game::simulate), [`GameSession`](crate::game::GameSession))
//! - Batch evaluation on a worker pool ([`Evaluator`](crate::evaluator::Evaluator))
//! - A client for remote evaluation ([`RemoteClient`](crate::remote::RemoteClient))
//! - Tiers and text reports ([`report`])
//!
//! # Documentation Overview
//!
//! - Game rules (what a wrong, repeated or malformed guess costs) are described in [`game`].
//! - For configuring local evaluation, see [`Configuration`](crate::configuration::Configuration).
//! - The submit / poll protocol and its configuration are described in [`remote`].
//! - Errors are listed in [`error`].
//!
//! # Usage Example
//!
//! ```no_run
//! use hangman_eval::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let training = ["python", "machine", "learning", "algorithm", "computer"];
//!     let corpus = ["hangman", "network", "neural", "artificial", "intelligence"];
//!
//!     // one agent per worker thread
//!     let factory = || FrequencyAgent::new(&training);
//!     let config = Configuration::new().with_seed(42);
//!     let evaluator = Evaluator::new(factory, config);
//!
//!     let report = evaluator.run(&corpus, Some(3))?;
//!     println!("{}", render_local_report(&report));
//!
//!     let verdict = Verdict::of(&report.stats);
//!     println!("tier: {}", verdict.tier);
//!     Ok(())
//! }
//! ```
//!
//! # Example Agent
//!
//! ```
//! use std::collections::BTreeSet;
//! use hangman_eval::agent_interface::Agent;
//!
//! /// Tries vowels first, then the rest of the alphabet.
//! struct VowelsFirst;
//!
//! impl Agent for VowelsFirst {
//!     fn predict_next_letter(
//!         &mut self,
//!         masked_word: &str,
//!         wrong_guesses: &BTreeSet<char>,
//!     ) -> anyhow::Result<String> {
//!         let guess = "eaoiu"
//!             .chars()
//!             .chain('a'..='z')
//!             .find(|c| !masked_word.contains(*c) && !wrong_guesses.contains(c))
//!             .unwrap_or('a');
//!         Ok(guess.to_string())
//!     }
//! }
//!
//! let outcome = hangman_eval::game::simulate(
//!     &mut VowelsFirst,
//!     &hangman_eval::game::Word::new("audio")?,
//!     6,
//! );
//! assert!(outcome.won);
//! # Ok::<(), anyhow::Error>(())
//! ```
#![warn(missing_docs)]

pub use anyhow;
pub mod agent_interface;
pub mod configuration;
pub mod error;
pub mod evaluator;
pub mod game;
mod logger;
pub mod remote;
pub mod report;
pub mod stats;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use hangman_eval::prelude::*;
/// ```
pub mod prelude {
    pub use crate::agent_interface::{Agent, AgentFactory, FrequencyAgent};
    pub use crate::configuration::Configuration;
    pub use crate::error::{ContractViolation, CorpusError, PollError, SubmissionError};
    pub use crate::evaluator::{BatchReport, Evaluator};
    pub use crate::game::{simulate, GameOutcome, GameSession, Word};
    pub use crate::remote::{
        AgentPackage, AwaitOutcome, EvaluationJob, JobStatus, PollConfig, RemoteClient,
        SubmissionMetadata,
    };
    pub use crate::report::{render_job_report, render_local_report, Tier, Verdict};
    pub use crate::stats::AggregateStats;
}
