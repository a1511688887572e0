use super::batch_synthesis_repository::BatchSynthesisRepository;
use crate::domain::synthesis::dto::{CreateJobPayload, CreateJobResponse, JobStatusResponse};
use crate::domain::synthesis::Job;
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::SpeechServiceConfig;
use async_trait::async_trait;
use std::time::Duration;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const TALKING_AVATAR_PATH: &str = "batchsynthesis/talkingavatar";

/// Speech service REST implementation of the batch synthesis repository
pub struct SpeechBatchSynthesisRepository {
    jobs_url: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl SpeechBatchSynthesisRepository {
    pub fn new(config: &SpeechServiceConfig, request_timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            jobs_url: format!(
                "{}/api/texttospeech/{}/{}",
                config.endpoint.trim_end_matches('/'),
                config.api_version,
                TALKING_AVATAR_PATH
            ),
            api_key: config.api_key.clone(),
            http_client,
        })
    }

    pub fn jobs_url(&self) -> &str {
        &self.jobs_url
    }
}

#[async_trait]
impl BatchSynthesisRepository for SpeechBatchSynthesisRepository {
    async fn create_job(&self, payload: &CreateJobPayload) -> AppResult<Job> {
        tracing::debug!(
            url = %self.jobs_url,
            display_name = %payload.display_name,
            text_type = %payload.text_type,
            "Submitting talking avatar job"
        );

        let response = self
            .http_client
            .post(&self.jobs_url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| AppError::Transfer(format!("Job submission failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                "Speech service rejected the job"
            );
            return Err(AppError::SubmissionRejected {
                status: status.as_u16(),
                body,
            });
        }

        let created = response
            .json::<CreateJobResponse>()
            .await
            .map_err(|e| AppError::Transfer(format!("Failed to parse job creation response: {}", e)))?;

        tracing::info!(job_id = %created.id, status = status.as_u16(), "Job accepted");

        Ok(Job::pending(created.id))
    }

    async fn get_job(&self, job_id: &str) -> AppResult<JobStatusResponse> {
        let url = format!("{}/{}", self.jobs_url, job_id);

        let response = self
            .http_client
            .get(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Transfer(format!("Status check for job {} failed: {}", job_id, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Transfer(format!(
                "Status check for job {} returned {}: {}",
                job_id,
                status.as_u16(),
                body
            )));
        }

        response
            .json::<JobStatusResponse>()
            .await
            .map_err(|e| AppError::Transfer(format!("Failed to parse status of job {}: {}", job_id, e)))
    }
}
