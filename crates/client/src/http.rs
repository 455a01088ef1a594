// crates/client/src/http.rs
//! HTTP layer for the progress contract.
//!
//! [`ProgressClient`] wraps a `reqwest::Client` with a base URL and an
//! explicit [`Credentials`] value. The credential is a constructor argument
//! rather than ambient state so a tracker's dependency on authentication is
//! visible in its signature.

use std::time::Duration;

use jobwatch_types::{JobSnapshot, StartedJob};

use crate::error::{PollError, StartError};

/// Per-request timeout. A poll tick must never hang past its interval
/// indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Bearer credentials for the job API.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    token: Option<String>,
}

impl Credentials {
    /// No authentication header attached.
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    /// Attach `Authorization: Bearer <token>` to every request.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    fn apply(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

/// Client for the job-progress HTTP contract.
#[derive(Debug, Clone)]
pub struct ProgressClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl ProgressClient {
    /// Create a client for the API rooted at `base_url`
    /// (e.g. `http://127.0.0.1:48620`).
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Fetch the current status of a job.
    ///
    /// `404` maps to [`PollError::NotFound`]; other non-2xx statuses map to
    /// [`PollError::Status`].
    pub async fn fetch_status(&self, job_id: &str) -> Result<JobSnapshot, PollError> {
        let url = format!("{}/api/progress/{}", self.base_url, job_id);
        let resp = self.credentials.apply(self.http.get(&url)).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PollError::NotFound);
        }
        if !status.is_success() {
            return Err(PollError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Issue a job-initiating POST to `path` (e.g. `/api/collect`).
    ///
    /// The response body may name the job under `job_id` or `task_id`, or
    /// carry no identifier at all; see [`StartedJob::id`].
    pub async fn start_job(
        &self,
        path: &str,
        params: &serde_json::Value,
    ) -> Result<StartedJob, StartError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .credentials
            .apply(self.http.post(&url).json(params))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StartError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            // Fire-and-forget endpoint: tolerated, no id to track.
            return Ok(StartedJob::default());
        }
        Ok(serde_json::from_str(&body)?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            ProgressClient::new("http://localhost:9999/", Credentials::anonymous()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999");
    }
}
