//! Evaluation delegated to a remote judge.
//!
//! The judge scores a submitted agent package on its own word list. The client side is a small
//! state machine:
//!
//! 1. [`RemoteClient::submit`] sends the package once and gets a job id back. A rejected or
//!    failed submission is returned as a [`SubmissionError`](crate::error::SubmissionError)
//!    and is never retried.
//! 2. [`RemoteClient::await_completion`] polls the job status:
//!    - `queued` / `running` / anything unknown: sleep, then poll again
//!    - `completed` / `failed`: return immediately
//!    - failed status requests are reported and polled again
//!
//! The wait can be bounded with [`PollConfig::with_max_wait`] and
//! [`PollConfig::with_max_consecutive_failures`], and interrupted with a [`CancelToken`]. The
//! resulting [`AwaitOutcome`] tells a job the judge failed apart from a judge the client could
//! not reach.
//!
//! # Example
//!
//! ```no_run
//! use hangman_eval::remote::{AgentPackage, AwaitOutcome, PollConfig, RemoteClient, SubmissionMetadata};
//! use hangman_eval::report::render_job_report;
//!
//! fn main() -> anyhow::Result<()> {
//!     let client = RemoteClient::connect("http://judge.example:8000", PollConfig::from_env())?;
//!     let package = AgentPackage::from_path("agent.py")?;
//!     let metadata = SubmissionMetadata::new("alice", "frequency_bot");
//!
//!     match client.submit_and_wait(&package, &metadata, &mut ())? {
//!         AwaitOutcome::Finished(job) => println!("{}", render_job_report(&job)),
//!         other => eprintln!("no result: {other:?}"),
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod protocol;
mod transport;

pub use client::{
    AwaitOutcome, CancelToken, Clock, PollConfig, PollObserver, RemoteClient, SystemClock,
    MAX_BACKOFF_FACTOR, MIN_POLL_INTERVAL,
};
pub use protocol::{
    AgentPackage, EvaluationJob, JobStatus, JudgeResults, Performance, StatusResponse,
    SubmissionMetadata, SubmitReceipt, WordResult,
};
pub use transport::{HttpJudge, JudgeTransport};
