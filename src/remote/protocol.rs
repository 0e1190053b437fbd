//! Messages exchanged with the remote judge.
//!
//! Every field coming from the judge is optional on the wire; missing or `null` values fall back
//! to defaults instead of failing the decode. A status body is read field by field, so the status
//! of a job is never lost because its results block is malformed.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::stats::{null_as_default, AggregateStats, LengthStats};

/// Status of a remote evaluation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    /// Waiting for a judge worker.
    Queued,
    /// Being evaluated.
    Running,
    /// Finished, results available. Terminal.
    Completed,
    /// The judge gave up on the job. Terminal.
    Failed,
    /// Anything the client does not recognize. Treated like `Running`.
    Unknown,
}

impl JobStatus {
    /// Map a raw status string. Unrecognized strings map to [`JobStatus::Unknown`].
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        [
            JobStatus::Queued,
            JobStatus::Running,
            JobStatus::Completed,
            JobStatus::Failed,
        ]
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(raw))
        .unwrap_or(JobStatus::Unknown)
    }

    /// True for `Completed` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Unknown => "unknown",
        }
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who submits, and under which name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionMetadata {
    /// Submitting user.
    pub user_id: String,
    /// Name of the submitted model.
    pub model_name: String,
}

impl SubmissionMetadata {
    /// Metadata with the given user and model names.
    pub fn new(user_id: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            model_name: model_name.into(),
        }
    }
}

impl Default for SubmissionMetadata {
    fn default() -> Self {
        Self::new("test_user", "my_hangman_bot")
    }
}

/// The opaque agent package sent to the judge (usually the agent source file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentPackage {
    /// File name announced to the judge.
    pub file_name: String,
    /// Raw content.
    pub bytes: Vec<u8>,
}

impl AgentPackage {
    /// Package in-memory content.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Package a file from disk, keeping its file name.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "agent".to_owned());
        Ok(Self { file_name, bytes })
    }
}

/// Answer of the judge to an accepted submission.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmitReceipt {
    /// Identifier to poll.
    pub job_id: String,
    /// Initial status, usually `queued`.
    #[serde(default)]
    pub status: Option<String>,
    /// Free text from the judge.
    #[serde(default)]
    pub message: Option<String>,
    /// Judge's estimate, in whatever form it sends.
    #[serde(default)]
    pub estimated_time: Option<Value>,
    /// Test words information (count or list, depending on the judge).
    #[serde(default)]
    pub test_words: Option<Value>,
}

/// Body of the status endpoint.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "Value")]
pub struct StatusResponse {
    /// Job identifier echoed by the judge.
    pub job_id: Option<String>,
    /// Raw status string.
    pub status: Option<String>,
    /// Submitting user.
    pub user_id: Option<String>,
    /// Submitted model name.
    pub model_name: Option<String>,
    /// Present once the judge has results.
    pub results: Option<JudgeResults>,
}

impl From<Value> for StatusResponse {
    fn from(value: Value) -> Self {
        let results = match value.get("results") {
            None | Some(Value::Null) => None,
            Some(raw) => match JudgeResults::deserialize(raw) {
                Ok(results) => Some(results),
                Err(e) => {
                    warn!(error = %e, "ignoring undecodable results block");
                    None
                }
            },
        };
        StatusResponse {
            job_id: text_field(&value, "job_id"),
            status: text_field(&value, "status"),
            user_id: text_field(&value, "user_id"),
            model_name: text_field(&value, "model_name"),
            results,
        }
    }
}

/// String or number field of a JSON object, as text.
fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Overall figures of a judged evaluation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Performance {
    /// Number of games.
    #[serde(deserialize_with = "null_as_default")]
    pub games_played: u32,
    /// Games won.
    #[serde(deserialize_with = "null_as_default")]
    pub wins: u32,
    /// Games lost.
    #[serde(deserialize_with = "null_as_default")]
    pub losses: u32,
    /// Percentage of games won.
    #[serde(deserialize_with = "null_as_default")]
    pub win_rate: f64,
    /// Mean guesses per game.
    #[serde(deserialize_with = "null_as_default")]
    pub avg_guesses: f64,
    /// Sum of guesses.
    #[serde(deserialize_with = "null_as_default")]
    pub total_guesses: u64,
}

/// One judged word.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WordResult {
    /// Target word.
    #[serde(deserialize_with = "null_as_default")]
    pub word: String,
    /// True if won.
    #[serde(deserialize_with = "null_as_default")]
    pub won: bool,
    /// Guesses used.
    pub guesses: Option<u32>,
    /// Lives remaining.
    pub lives_left: Option<u32>,
}

/// Results block of a finished job.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeResults {
    /// Overall performance.
    pub performance: Option<Performance>,
    /// Score out of 100 computed by the judge.
    pub overall_score: Option<f64>,
    /// Breakdown keyed by word length (JSON object keys are strings).
    #[serde(deserialize_with = "null_as_default")]
    pub length_performance: BTreeMap<String, LengthStats>,
    /// Bounded sample of individual games.
    #[serde(deserialize_with = "null_as_default")]
    pub word_results: Vec<WordResult>,
}

impl JudgeResults {
    /// The judge's figures in the same shape as a local evaluation.
    ///
    /// `None` when the judge sent no performance block.
    pub fn to_aggregate_stats(&self) -> Option<AggregateStats> {
        let perf = self.performance.as_ref()?;
        let by_length = self
            .length_performance
            .iter()
            .filter_map(|(len, stats)| match len.trim().parse::<usize>() {
                Ok(len) => Some((len, *stats)),
                Err(_) => {
                    warn!(key = %len, "ignoring non numeric word length from judge");
                    None
                }
            })
            .collect();
        Some(AggregateStats {
            total_tests: perf.games_played,
            wins: perf.wins,
            losses: perf.losses,
            win_rate: perf.win_rate,
            avg_guesses: perf.avg_guesses,
            total_guesses: perf.total_guesses,
            by_length,
        })
    }
}

/// A remote job as last observed.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationJob {
    /// Identifier returned at submission.
    pub job_id: String,
    /// Interpreted status.
    pub status: JobStatus,
    /// Status string as sent by the judge (`"unknown"` if it sent none).
    pub raw_status: String,
    /// Submitting user, if echoed.
    pub user_id: Option<String>,
    /// Model name, if echoed.
    pub model_name: Option<String>,
    /// Results, once available.
    pub results: Option<JudgeResults>,
}

impl EvaluationJob {
    /// Interpret a status response for `job_id`.
    pub fn from_response(job_id: &str, response: StatusResponse) -> Self {
        let raw_status = response
            .status
            .unwrap_or_else(|| JobStatus::Unknown.as_str().to_owned());
        EvaluationJob {
            job_id: response.job_id.unwrap_or_else(|| job_id.to_owned()),
            status: JobStatus::parse(&raw_status),
            raw_status,
            user_id: response.user_id,
            model_name: response.model_name,
            results: response.results,
        }
    }

    /// Statistics reported by the judge, if any.
    pub fn stats(&self) -> Option<AggregateStats> {
        self.results.as_ref()?.to_aggregate_stats()
    }
}
