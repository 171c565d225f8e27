//! Client for the external open-response-assessment (ORA) grading service.
//!
//! Everything this unit knows about grading state lives on the other side of
//! this client. Calls are synchronous per request and fail fast; handlers
//! catch [`GradingServiceError`] and degrade to an error payload rather than
//! retrying.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use util::config;

/// Failure talking to the grading service.
#[derive(Debug, Error)]
pub enum GradingServiceError {
    #[error("grading service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("grading service returned HTTP {0}")]
    Status(u16),
}

/// Operations the grading endpoints consume from ORA.
///
/// Object-safe so tests can substitute a scripted stub. The two list
/// operations return the raw body text; their callers own the parse step and
/// recover locally from malformed payloads.
#[async_trait]
pub trait GradingService: Send + Sync {
    /// Per-channel activity flags for a user in a course.
    async fn get_combined_notifications(
        &self,
        course_id: &str,
        student_id: &str,
    ) -> Result<Value, GradingServiceError>;

    /// Raw problem-list JSON for a student's own submissions.
    async fn get_student_problem_list(
        &self,
        course_id: &str,
        student_id: &str,
    ) -> Result<String, GradingServiceError>;

    /// Raw flagged-submission JSON for the course.
    async fn get_flagged_problem_list(&self, course_id: &str)
    -> Result<String, GradingServiceError>;

    /// Forwards a moderation action; returns the upstream body verbatim.
    async fn take_action_on_flags(
        &self,
        course_id: &str,
        student_id: &str,
        submission_id: &str,
        action_type: &str,
    ) -> Result<String, GradingServiceError>;
}

/// `reqwest` implementation against the configured ORA endpoint.
pub struct OraService {
    client: Client,
    base_url: String,
}

impl OraService {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GradingServiceError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_config() -> Result<Self, GradingServiceError> {
        Self::new(
            config::grading_service_url(),
            Duration::from_secs(config::grading_service_timeout_secs()),
        )
    }

    async fn get_text(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<String, GradingServiceError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GradingServiceError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl GradingService for OraService {
    async fn get_combined_notifications(
        &self,
        course_id: &str,
        student_id: &str,
    ) -> Result<Value, GradingServiceError> {
        let response = self
            .client
            .get(format!("{}/combined_notifications", self.base_url))
            .query(&[("course_id", course_id), ("student_id", student_id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GradingServiceError::Status(status.as_u16()));
        }

        Ok(response.json::<Value>().await?)
    }

    async fn get_student_problem_list(
        &self,
        course_id: &str,
        student_id: &str,
    ) -> Result<String, GradingServiceError> {
        self.get_text(
            "/problem_list",
            &[("course_id", course_id), ("student_id", student_id)],
        )
        .await
    }

    async fn get_flagged_problem_list(
        &self,
        course_id: &str,
    ) -> Result<String, GradingServiceError> {
        self.get_text("/flagged_problem_list", &[("course_id", course_id)])
            .await
    }

    async fn take_action_on_flags(
        &self,
        course_id: &str,
        student_id: &str,
        submission_id: &str,
        action_type: &str,
    ) -> Result<String, GradingServiceError> {
        let response = self
            .client
            .post(format!("{}/take_action_on_flags", self.base_url))
            .form(&[
                ("course_id", course_id),
                ("student_id", student_id),
                ("submission_id", submission_id),
                ("action_type", action_type),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GradingServiceError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
