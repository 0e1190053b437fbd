//! Submission and status polling against a remote judge, with its [`PollConfig`].

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, instrument, trace, warn};

use super::protocol::{AgentPackage, EvaluationJob, JobStatus, SubmissionMetadata, SubmitReceipt};
use super::transport::{HttpJudge, JudgeTransport};
use crate::error::{PollError, SubmissionError};

/// Shortest accepted interval between two status requests.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Largest accepted backoff factor.
pub const MAX_BACKOFF_FACTOR: f64 = 10.0;

/// Polling and timeout settings of the remote client.
///
/// The defaults poll every 5 seconds forever, without backoff. Use
/// [`with_max_wait`](PollConfig::with_max_wait) and
/// [`with_max_consecutive_failures`](PollConfig::with_max_consecutive_failures) to bound the
/// wait.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollConfig {
    pub(crate) poll_interval: Duration,
    pub(crate) backoff_factor: f64,
    pub(crate) max_poll_interval: Duration,
    pub(crate) max_wait: Option<Duration>,
    pub(crate) max_consecutive_failures: Option<u32>,
    pub(crate) submit_timeout: Duration,
    pub(crate) status_timeout: Duration,
}

impl PollConfig {
    /// Create a configuration with default parameters.
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            backoff_factor: 1.0,
            max_poll_interval: Duration::from_secs(60),
            max_wait: None,
            max_consecutive_failures: None,
            submit_timeout: Duration::from_secs(30),
            status_timeout: Duration::from_secs(10),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Read environment variables are:
    /// - `HANGMAN_POLL_INTERVAL_SECS` (u64)
    /// - `HANGMAN_BACKOFF_FACTOR` (f64)
    /// - `HANGMAN_MAX_POLL_INTERVAL_SECS` (u64)
    /// - `HANGMAN_MAX_WAIT_SECS` (u64)
    /// - `HANGMAN_MAX_CONSECUTIVE_FAILURES` (u32)
    ///
    /// Unset or unparsable values keep their default.
    pub fn from_env() -> Self {
        fn parse<T: std::str::FromStr>(var: &str) -> Option<T> {
            env::var(var).ok()?.trim().parse().ok()
        }

        let mut config = Self::new();
        if let Some(secs) = parse("HANGMAN_POLL_INTERVAL_SECS") {
            config = config.with_poll_interval(Duration::from_secs(secs));
        }
        if let Some(factor) = parse("HANGMAN_BACKOFF_FACTOR") {
            config = config.with_backoff_factor(factor);
        }
        if let Some(secs) = parse("HANGMAN_MAX_POLL_INTERVAL_SECS") {
            config = config.with_max_poll_interval(Duration::from_secs(secs));
        }
        config.max_wait = parse("HANGMAN_MAX_WAIT_SECS").map(Duration::from_secs);
        config.max_consecutive_failures = parse("HANGMAN_MAX_CONSECUTIVE_FAILURES");
        config
    }

    /// Interval before the first re-poll (at least [`MIN_POLL_INTERVAL`]).
    pub fn with_poll_interval(mut self, value: Duration) -> Self {
        self.poll_interval = value.max(MIN_POLL_INTERVAL);
        self
    }

    /// Multiply the interval by `value` after each non-terminal poll. The factor is kept between
    /// 1 and [`MAX_BACKOFF_FACTOR`].
    pub fn with_backoff_factor(mut self, value: f64) -> Self {
        self.backoff_factor = if value.is_finite() {
            value.clamp(1.0, MAX_BACKOFF_FACTOR)
        } else {
            1.0
        };
        self
    }

    /// Upper bound of the interval when backing off.
    pub fn with_max_poll_interval(mut self, value: Duration) -> Self {
        self.max_poll_interval = value.max(MIN_POLL_INTERVAL);
        self
    }

    /// Give up waiting after `value`.
    pub fn with_max_wait(mut self, value: Duration) -> Self {
        self.max_wait = Some(value);
        self
    }

    /// Give up after `value` failed status requests in a row.
    pub fn with_max_consecutive_failures(mut self, value: u32) -> Self {
        self.max_consecutive_failures = Some(value.max(1));
        self
    }

    /// Timeout of the submission request.
    pub fn with_submit_timeout(mut self, value: Duration) -> Self {
        self.submit_timeout = value;
        self
    }

    /// Timeout of each status request.
    pub fn with_status_timeout(mut self, value: Duration) -> Self {
        self.status_timeout = value;
        self
    }

    fn next_interval(&self, current: Duration) -> Duration {
        let cap = self.max_poll_interval.max(self.poll_interval);
        // too large for a Duration means past the cap anyway
        Duration::try_from_secs_f64(current.as_secs_f64() * self.backoff_factor)
            .map_or(cap, |next| next.min(cap))
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Source of time for the poll loop.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Instant;
    /// Block the current thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Wall clock, sleeping with [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Shared flag asking poll loops to stop at their next sleep.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every loop sharing this token to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once [`cancel`](Self::cancel) was called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Hooks called by the poll loop. Every method does nothing by default.
///
/// The loop already logs each event with `tracing`; observers are for callers that want to react
/// (progress display, metrics, ...).
pub trait PollObserver {
    /// The status differs from the previously observed one (always called on the first poll).
    fn on_status_change(&mut self, _previous: Option<&str>, _job: &EvaluationJob) {}

    /// The judge sent a status the client does not know.
    fn on_unknown_status(&mut self, _job: &EvaluationJob) {}

    /// A status request failed. `consecutive` counts failures in a row.
    fn on_poll_error(&mut self, _job_id: &str, _error: &PollError, _consecutive: u32) {}
}

impl PollObserver for () {}

/// How waiting for a job ended.
#[derive(Debug, Clone, PartialEq)]
pub enum AwaitOutcome {
    /// The judge reported a terminal status (`completed` or `failed`).
    Finished(EvaluationJob),
    /// `max_wait` elapsed before a terminal status.
    TimedOut {
        /// Polled job.
        job_id: String,
        /// Last status observed, if any poll succeeded.
        last_status: Option<JobStatus>,
        /// Time spent waiting.
        elapsed: Duration,
    },
    /// `max_consecutive_failures` status requests failed in a row.
    Unreachable {
        /// Polled job.
        job_id: String,
        /// Number of failures in a row.
        consecutive_failures: u32,
        /// Last failure.
        last_error: PollError,
    },
    /// The cancel token was triggered.
    Cancelled {
        /// Polled job.
        job_id: String,
    },
}

impl AwaitOutcome {
    /// The finished job, if any.
    pub fn job(&self) -> Option<&EvaluationJob> {
        match self {
            AwaitOutcome::Finished(job) => Some(job),
            _ => None,
        }
    }

    /// Consume the outcome, keeping the finished job.
    pub fn into_job(self) -> Option<EvaluationJob> {
        match self {
            AwaitOutcome::Finished(job) => Some(job),
            _ => None,
        }
    }
}

/// Client of the remote judge.
///
/// Submits agent packages and waits for their evaluation. One call to
/// [`await_completion`](Self::await_completion) never has two status requests in flight;
/// different jobs can be awaited concurrently from different threads.
pub struct RemoteClient<T, C = SystemClock> {
    transport: T,
    clock: C,
    config: PollConfig,
    cancel: CancelToken,
}

impl RemoteClient<HttpJudge> {
    /// Client for the HTTP judge at `base_url`.
    pub fn connect(base_url: &str, config: PollConfig) -> anyhow::Result<Self> {
        let transport = HttpJudge::new(base_url, &config)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: JudgeTransport> RemoteClient<T> {
    /// Client using `transport` and the wall clock.
    pub fn new(transport: T, config: PollConfig) -> Self {
        RemoteClient {
            transport,
            clock: SystemClock,
            config,
            cancel: CancelToken::new(),
        }
    }
}

impl<T: JudgeTransport, C: Clock> RemoteClient<T, C> {
    /// Replace the clock used to sleep and measure waits.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> RemoteClient<T, C2> {
        RemoteClient {
            transport: self.transport,
            clock,
            config: self.config,
            cancel: self.cancel,
        }
    }

    /// Share `token` with this client.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token cancelling this client's waits.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Submit `package` once. Never retried.
    ///
    /// # Errors
    /// A [`SubmissionError`] if the judge rejected the package or could not be reached. No job
    /// exists in that case.
    pub fn submit(
        &self,
        package: &AgentPackage,
        metadata: &SubmissionMetadata,
    ) -> Result<SubmitReceipt, SubmissionError> {
        self.transport.submit(package, metadata).inspect_err(|e| {
            warn!("submission failed: {e}");
        })
    }

    /// Submit then wait for the evaluation. The poll loop is only entered if the submission
    /// succeeded.
    pub fn submit_and_wait<O: PollObserver + ?Sized>(
        &self,
        package: &AgentPackage,
        metadata: &SubmissionMetadata,
        observer: &mut O,
    ) -> Result<AwaitOutcome, SubmissionError> {
        let receipt = self.submit(package, metadata)?;
        Ok(self.await_completion_with(&receipt.job_id, observer))
    }

    /// Poll `job_id` until it reaches a terminal status.
    pub fn await_completion(&self, job_id: &str) -> AwaitOutcome {
        self.await_completion_with(job_id, &mut ())
    }

    /// Same as [`await_completion`](Self::await_completion), reporting events to `observer`.
    ///
    /// `queued`, `running` and unrecognized statuses lead to another poll after a sleep.
    /// Failed status requests are reported and polled again; they never end the wait on their
    /// own unless `max_consecutive_failures` is set.
    #[instrument(skip(self, observer))]
    pub fn await_completion_with<O: PollObserver + ?Sized>(
        &self,
        job_id: &str,
        observer: &mut O,
    ) -> AwaitOutcome {
        let start = self.clock.now();
        let mut last_raw: Option<String> = None;
        let mut last_status = None;
        let mut interval = self.config.poll_interval;
        let mut failures = 0;

        loop {
            match self.transport.fetch_status(job_id) {
                Ok(response) => {
                    failures = 0;
                    let job = EvaluationJob::from_response(job_id, response);
                    if last_raw.as_deref() != Some(job.raw_status.as_str()) {
                        info!(status = %job.raw_status, "job status changed");
                        observer.on_status_change(last_raw.as_deref(), &job);
                        last_raw = Some(job.raw_status.clone());
                    }
                    last_status = Some(job.status);

                    match job.status {
                        JobStatus::Completed | JobStatus::Failed => {
                            let elapsed = self.clock.now().saturating_duration_since(start);
                            info!(status = %job.status, ?elapsed, "job finished");
                            return AwaitOutcome::Finished(job);
                        }
                        JobStatus::Unknown => {
                            warn!(status = %job.raw_status, "unknown job status, polling again");
                            observer.on_unknown_status(&job);
                        }
                        JobStatus::Queued | JobStatus::Running => {}
                    }
                }
                Err(error) => {
                    failures += 1;
                    warn!(%error, failures, "status check failed");
                    observer.on_poll_error(job_id, &error, failures);
                    if self
                        .config
                        .max_consecutive_failures
                        .is_some_and(|max| failures >= max)
                    {
                        return AwaitOutcome::Unreachable {
                            job_id: job_id.to_owned(),
                            consecutive_failures: failures,
                            last_error: error,
                        };
                    }
                }
            }

            // the sleep below is the only place where the loop may stop early
            let elapsed = self.clock.now().saturating_duration_since(start);
            let mut pause = interval;
            if let Some(max_wait) = self.config.max_wait {
                if elapsed >= max_wait {
                    warn!(?elapsed, "gave up waiting for job");
                    return AwaitOutcome::TimedOut {
                        job_id: job_id.to_owned(),
                        last_status,
                        elapsed,
                    };
                }
                pause = pause.min(max_wait - elapsed);
            }
            if self.cancel.is_cancelled() {
                return self.cancelled(job_id);
            }
            trace!(?pause, "sleeping before next poll");
            self.clock.sleep(pause);
            if self.cancel.is_cancelled() {
                return self.cancelled(job_id);
            }
            interval = self.config.next_interval(interval);
        }
    }

    fn cancelled(&self, job_id: &str) -> AwaitOutcome {
        info!("wait cancelled");
        AwaitOutcome::Cancelled {
            job_id: job_id.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    use super::*;
    use crate::remote::protocol::StatusResponse;

    /// Replays a list of status answers, repeating the last one forever.
    struct Scripted {
        answers: RefCell<VecDeque<Result<&'static str, PollError>>>,
        polls: Cell<u32>,
        submissions: Cell<u32>,
        accept: bool,
    }

    impl Scripted {
        fn new(answers: Vec<Result<&'static str, PollError>>) -> Self {
            Scripted {
                answers: RefCell::new(answers.into()),
                polls: Cell::new(0),
                submissions: Cell::new(0),
                accept: true,
            }
        }

        fn statuses(statuses: &[&'static str]) -> Self {
            Self::new(statuses.iter().map(|s| Ok(*s)).collect())
        }
    }

    impl JudgeTransport for Scripted {
        fn submit(
            &self,
            _package: &AgentPackage,
            _metadata: &SubmissionMetadata,
        ) -> Result<SubmitReceipt, SubmissionError> {
            self.submissions.set(self.submissions.get() + 1);
            if !self.accept {
                return Err(SubmissionError::Rejected {
                    status: 400,
                    body: "bad package".to_owned(),
                });
            }
            Ok(SubmitReceipt {
                job_id: "job-1".to_owned(),
                status: Some("queued".to_owned()),
                message: None,
                estimated_time: None,
                test_words: None,
            })
        }

        fn fetch_status(&self, job_id: &str) -> Result<StatusResponse, PollError> {
            self.polls.set(self.polls.get() + 1);
            let mut answers = self.answers.borrow_mut();
            let answer = if answers.len() > 1 {
                answers.pop_front()
            } else {
                answers.front().cloned()
            };
            let status = answer.expect("script is empty")?;
            Ok(StatusResponse {
                job_id: Some(job_id.to_owned()),
                status: Some(status.to_owned()),
                ..Default::default()
            })
        }
    }

    /// Clock advancing only when sleeping.
    struct FakeClock {
        start: Instant,
        offset: Cell<Duration>,
        sleeps: Cell<u32>,
    }

    impl FakeClock {
        fn new() -> Self {
            FakeClock {
                start: Instant::now(),
                offset: Cell::new(Duration::ZERO),
                sleeps: Cell::new(0),
            }
        }
    }

    impl Clock for &FakeClock {
        fn now(&self) -> Instant {
            self.start + self.offset.get()
        }

        fn sleep(&self, duration: Duration) {
            self.sleeps.set(self.sleeps.get() + 1);
            self.offset.set(self.offset.get() + duration);
        }
    }

    #[derive(Default)]
    struct Recorder {
        changes: Vec<String>,
        unknown: u32,
        errors: Vec<u32>,
    }

    impl PollObserver for Recorder {
        fn on_status_change(&mut self, _previous: Option<&str>, job: &EvaluationJob) {
            self.changes.push(job.raw_status.clone());
        }

        fn on_unknown_status(&mut self, _job: &EvaluationJob) {
            self.unknown += 1;
        }

        fn on_poll_error(&mut self, _job_id: &str, _error: &PollError, consecutive: u32) {
            self.errors.push(consecutive);
        }
    }

    fn client<'a>(
        transport: &'a Scripted,
        clock: &'a FakeClock,
        config: PollConfig,
    ) -> RemoteClient<&'a Scripted, &'a FakeClock> {
        RemoteClient::new(transport, config).with_clock(clock)
    }

    #[test]
    fn test_status_changes_until_completed() {
        let transport = Scripted::statuses(&["queued", "queued", "running", "completed"]);
        let clock = FakeClock::new();
        let mut recorder = Recorder::default();

        let outcome =
            client(&transport, &clock, PollConfig::new()).await_completion_with("job-1", &mut recorder);

        assert_eq!(outcome.job().unwrap().status, JobStatus::Completed);
        assert_eq!(recorder.changes, vec!["queued", "running", "completed"]);
        assert_eq!(transport.polls.get(), 4);
        assert_eq!(clock.sleeps.get(), 3);
        assert_eq!(clock.offset.get(), Duration::from_secs(15));
    }

    #[test]
    fn test_failed_first_poll_returns_without_sleeping() {
        let transport = Scripted::statuses(&["failed"]);
        let clock = FakeClock::new();

        let outcome = client(&transport, &clock, PollConfig::new()).await_completion("job-1");

        assert_eq!(outcome.job().unwrap().status, JobStatus::Failed);
        assert_eq!(transport.polls.get(), 1);
        assert_eq!(clock.sleeps.get(), 0);
    }

    #[test]
    fn test_unknown_status_and_errors_keep_polling() {
        let transport = Scripted::new(vec![
            Ok("paused"),
            Err(PollError::Network("connection refused".to_owned())),
            Err(PollError::Http { status: 502 }),
            Ok("running"),
            Ok("completed"),
        ]);
        let clock = FakeClock::new();
        let mut recorder = Recorder::default();

        let outcome =
            client(&transport, &clock, PollConfig::new()).await_completion_with("job-1", &mut recorder);

        assert!(matches!(outcome, AwaitOutcome::Finished(_)));
        assert_eq!(recorder.unknown, 1);
        assert_eq!(recorder.errors, vec![1, 2]);
        assert_eq!(recorder.changes, vec!["paused", "running", "completed"]);
        assert_eq!(transport.polls.get(), 5);
    }

    #[test]
    fn test_max_wait_times_out() {
        let transport = Scripted::statuses(&["running"]);
        let clock = FakeClock::new();
        let config = PollConfig::new().with_max_wait(Duration::from_secs(12));

        let outcome = client(&transport, &clock, config).await_completion("job-1");

        match outcome {
            AwaitOutcome::TimedOut {
                last_status,
                elapsed,
                ..
            } => {
                assert_eq!(last_status, Some(JobStatus::Running));
                assert_eq!(elapsed, Duration::from_secs(12));
            }
            other => panic!("expected a timeout, got {other:?}"),
        }
        // sleeps of 5s, 5s, then 2s to reach the deadline
        assert_eq!(clock.sleeps.get(), 3);
        assert_eq!(transport.polls.get(), 4);
    }

    #[test]
    fn test_consecutive_failures_make_judge_unreachable() {
        let transport = Scripted::new(vec![
            Ok("running"),
            Err(PollError::Timeout("10s".to_owned())),
        ]);
        let clock = FakeClock::new();
        let config = PollConfig::new().with_max_consecutive_failures(3);

        let outcome = client(&transport, &clock, config).await_completion("job-1");

        assert_eq!(
            outcome,
            AwaitOutcome::Unreachable {
                job_id: "job-1".to_owned(),
                consecutive_failures: 3,
                last_error: PollError::Timeout("10s".to_owned()),
            }
        );
    }

    #[test]
    fn test_backoff_is_capped() {
        let transport = Scripted::statuses(&["queued", "queued", "queued", "queued", "completed"]);
        let clock = FakeClock::new();
        let config = PollConfig::new()
            .with_poll_interval(Duration::from_secs(4))
            .with_backoff_factor(2.0)
            .with_max_poll_interval(Duration::from_secs(10));

        client(&transport, &clock, config).await_completion("job-1");

        // 4 + 8 + 10 + 10
        assert_eq!(clock.offset.get(), Duration::from_secs(32));
    }

    #[test]
    fn test_cancel_stops_at_sleep() {
        let transport = Scripted::statuses(&["running"]);
        let clock = FakeClock::new();
        let remote = client(&transport, &clock, PollConfig::new());
        remote.cancel_token().cancel();

        let outcome = remote.await_completion("job-1");

        assert!(matches!(outcome, AwaitOutcome::Cancelled { .. }));
        assert_eq!(transport.polls.get(), 1);
        assert_eq!(clock.sleeps.get(), 0);
    }

    #[test]
    fn test_rejected_submission_never_polls() {
        let mut transport = Scripted::statuses(&["completed"]);
        transport.accept = false;
        let clock = FakeClock::new();

        let result = client(&transport, &clock, PollConfig::new()).submit_and_wait(
            &AgentPackage::new("agent.py", "print('hi')"),
            &SubmissionMetadata::default(),
            &mut (),
        );

        assert!(matches!(
            result,
            Err(SubmissionError::Rejected { status: 400, .. })
        ));
        assert_eq!(transport.submissions.get(), 1);
        assert_eq!(transport.polls.get(), 0);
    }

    #[test]
    fn test_submit_and_wait() {
        let transport = Scripted::statuses(&["running", "completed"]);
        let clock = FakeClock::new();

        let outcome = client(&transport, &clock, PollConfig::new())
            .submit_and_wait(
                &AgentPackage::new("agent.py", "print('hi')"),
                &SubmissionMetadata::new("alice", "freq"),
                &mut (),
            )
            .unwrap();

        assert_eq!(outcome.into_job().unwrap().job_id, "job-1");
        assert_eq!(transport.submissions.get(), 1);
    }

    #[test]
    fn test_poll_interval_has_a_floor() {
        let config = PollConfig::new().with_poll_interval(Duration::ZERO);
        assert_eq!(config.poll_interval, MIN_POLL_INTERVAL);
        assert_eq!(PollConfig::new().with_backoff_factor(0.5).backoff_factor, 1.0);
    }

    #[test]
    fn test_huge_backoff_factor_is_clamped() {
        let transport = Scripted::statuses(&["queued", "queued", "queued", "completed"]);
        let clock = FakeClock::new();
        let config = PollConfig::new().with_backoff_factor(1e300);
        assert_eq!(config.backoff_factor, MAX_BACKOFF_FACTOR);

        let outcome = client(&transport, &clock, config).await_completion("job-1");

        assert_eq!(outcome.job().unwrap().status, JobStatus::Completed);
        // 5 + 50 + 60
        assert_eq!(clock.offset.get(), Duration::from_secs(115));
    }

    #[test]
    fn test_next_interval_saturates_at_the_cap() {
        let config = PollConfig::new()
            .with_poll_interval(Duration::from_secs(u64::MAX))
            .with_backoff_factor(MAX_BACKOFF_FACTOR);
        let huge = Duration::from_secs(u64::MAX);
        assert_eq!(config.next_interval(huge), huge);

        let fixed = PollConfig::new().with_poll_interval(Duration::from_secs(u64::MAX));
        assert_eq!(fixed.next_interval(huge), huge);
    }

    /// Decodes a fixed JSON body on every poll, like the HTTP transport does.
    struct JsonJudge(&'static str);

    impl JudgeTransport for JsonJudge {
        fn submit(
            &self,
            _package: &AgentPackage,
            _metadata: &SubmissionMetadata,
        ) -> Result<SubmitReceipt, SubmissionError> {
            Err(SubmissionError::Network("not used".to_owned()))
        }

        fn fetch_status(&self, _job_id: &str) -> Result<StatusResponse, PollError> {
            serde_json::from_str(self.0).map_err(|e| PollError::Decode(e.to_string()))
        }
    }

    #[test]
    fn test_completed_job_with_null_fields_finishes_on_first_poll() {
        let transport = JsonJudge(
            r#"{"job_id": 7, "status": "completed", "results": {
                "performance": {"games_played": 2, "wins": 1, "losses": 1, "win_rate": null},
                "length_performance": null,
                "word_results": null
            }}"#,
        );
        let clock = FakeClock::new();

        let outcome = RemoteClient::new(&transport, PollConfig::new())
            .with_clock(&clock)
            .await_completion("job-7");

        let AwaitOutcome::Finished(job) = outcome else {
            panic!("unexpected outcome: {outcome:?}");
        };
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.job_id, "7");
        assert_eq!(clock.sleeps.get(), 0);
        let stats = job.stats().unwrap();
        assert_eq!(stats.total_tests, 2);
        assert_eq!(stats.win_rate, 0.0);
        assert!(stats.by_length.is_empty());
    }

    #[test]
    fn test_malformed_results_keep_the_terminal_status() {
        let transport = JsonJudge(r#"{"status": "failed", "results": {"word_results": 3}}"#);
        let clock = FakeClock::new();

        let outcome = RemoteClient::new(&transport, PollConfig::new())
            .with_clock(&clock)
            .await_completion("job-8");

        let job = outcome.into_job().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.job_id, "job-8");
        assert!(job.results.is_none());
        assert_eq!(clock.sleeps.get(), 0);
    }
}
