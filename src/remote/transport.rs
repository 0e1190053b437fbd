//! How the client talks to the judge.
//!
//! [`JudgeTransport`] is the seam between the poll loop and the network; [`HttpJudge`] is the
//! HTTP implementation.

use std::time::Duration;

use reqwest::blocking::{multipart, Client};
use tracing::{debug, info, instrument};

use super::protocol::{AgentPackage, StatusResponse, SubmissionMetadata, SubmitReceipt};
use super::PollConfig;
use crate::error::{PollError, SubmissionError};

/// One request/response exchange with the judge per call.
///
/// Implementations must not retry submissions: the submission endpoint is not idempotent.
pub trait JudgeTransport {
    /// Submit an agent package for evaluation.
    fn submit(
        &self,
        package: &AgentPackage,
        metadata: &SubmissionMetadata,
    ) -> Result<SubmitReceipt, SubmissionError>;

    /// Fetch the current status of a job.
    fn fetch_status(&self, job_id: &str) -> Result<StatusResponse, PollError>;
}

impl<T: JudgeTransport + ?Sized> JudgeTransport for &T {
    fn submit(
        &self,
        package: &AgentPackage,
        metadata: &SubmissionMetadata,
    ) -> Result<SubmitReceipt, SubmissionError> {
        (**self).submit(package, metadata)
    }

    fn fetch_status(&self, job_id: &str) -> Result<StatusResponse, PollError> {
        (**self).fetch_status(job_id)
    }
}

/// Judge reachable over HTTP.
///
/// - `POST {base}/api/evaluate`, multipart form with the package under `files`, plus
///   `user_id` and `model_name`
/// - `GET {base}/api/status/{job_id}`
#[derive(Debug, Clone)]
pub struct HttpJudge {
    client: Client,
    base_url: String,
    submit_timeout: Duration,
    status_timeout: Duration,
}

impl HttpJudge {
    /// Create a transport for the judge at `base_url`, using the timeouts of `config`.
    pub fn new(base_url: &str, config: &PollConfig) -> anyhow::Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_owned(),
            submit_timeout: config.submit_timeout,
            status_timeout: config.status_timeout,
        })
    }

    /// Base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl JudgeTransport for HttpJudge {
    #[instrument(skip_all, fields(user_id = %metadata.user_id, model_name = %metadata.model_name))]
    fn submit(
        &self,
        package: &AgentPackage,
        metadata: &SubmissionMetadata,
    ) -> Result<SubmitReceipt, SubmissionError> {
        let url = format!("{}/api/evaluate", self.base_url);
        let part = multipart::Part::bytes(package.bytes.clone())
            .file_name(package.file_name.clone())
            .mime_str("text/plain")
            .map_err(|e| SubmissionError::Network(e.to_string()))?;
        let form = multipart::Form::new()
            .part("files", part)
            .text("user_id", metadata.user_id.clone())
            .text("model_name", metadata.model_name.clone());

        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(self.submit_timeout)
            .send()
            .map_err(|e| SubmissionError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let receipt: SubmitReceipt = resp
            .json()
            .map_err(|e| SubmissionError::Decode(e.to_string()))?;
        info!(job_id = %receipt.job_id, "submission accepted");
        Ok(receipt)
    }

    fn fetch_status(&self, job_id: &str) -> Result<StatusResponse, PollError> {
        let url = format!("{}/api/status/{job_id}", self.base_url);
        let resp = self
            .client
            .get(&url)
            .timeout(self.status_timeout)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    PollError::Timeout(e.to_string())
                } else {
                    PollError::Network(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PollError::Http {
                status: status.as_u16(),
            });
        }
        let body: StatusResponse = resp.json().map_err(|e| PollError::Decode(e.to_string()))?;
        debug!(job_id, status = ?body.status, "status fetched");
        Ok(body)
    }
}
