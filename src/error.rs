//! Error types shared by the simulator, the batch evaluator and the remote client.
//!
//! Only [`CorpusError`] and [`SubmissionError`] ever reach the caller as `Err`.
//! [`ContractViolation`] is recorded inside a game outcome and [`PollError`] is
//! absorbed by the poll loop.

use serde::Serialize;
use thiserror::Error;

/// A malformed answer from an agent.
///
/// Penalised as a lost life and kept in the per-game diagnostics, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ContractViolation {
    /// The agent returned an error instead of a guess.
    #[error("agent returned an error: {0}")]
    AgentError(String),

    /// The agent panicked while predicting.
    #[error("agent panicked while predicting")]
    AgentPanicked,

    /// The agent returned an empty string.
    #[error("agent returned an empty guess")]
    Empty,

    /// The agent returned more than one character.
    #[error("agent returned more than one character: {0:?}")]
    MultipleCharacters(String),

    /// The agent returned a single character outside `a`-`z`.
    #[error("agent returned a character outside a-z: {0:?}")]
    NotALetter(String),
}

/// Problems with the corpus handed to the evaluator. Reported before any game is played.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorpusError {
    /// Nothing to evaluate.
    #[error("cannot evaluate an empty corpus")]
    Empty,

    /// A sample of zero words was requested.
    #[error("sample size must be at least 1")]
    InvalidSampleSize,

    /// A corpus entry is not a non-empty lowercase word.
    #[error("invalid word {word:?}: {reason}")]
    InvalidWord {
        /// The offending corpus entry.
        word: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

/// Failure of a submission to the remote judge. No job was created and nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The judge answered with a non-success HTTP status.
    #[error("submission rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The judge could not be reached.
    #[error("network error during submission: {0}")]
    Network(String),

    /// The judge accepted the request but the answer could not be understood.
    #[error("could not decode submission response: {0}")]
    Decode(String),
}

/// Transient failure while polling a job. The poll loop keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    /// The status request timed out.
    #[error("status request timed out: {0}")]
    Timeout(String),

    /// Connection level failure.
    #[error("network error while polling: {0}")]
    Network(String),

    /// The status endpoint answered with a non-success HTTP status.
    #[error("status check failed with status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },

    /// The status body could not be decoded.
    #[error("could not decode status response: {0}")]
    Decode(String),
}
