use super::dto::CreateJobPayload;
use super::model::{DownloadedAsset, Job, JobStatus, SynthesisRequest};
use super::poll::PollPolicy;
use crate::error::{AppError, AppResult};
use crate::infrastructure::download::MediaDownloader;
use crate::infrastructure::repositories::BatchSynthesisRepository;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

pub struct SynthesisService {
    synthesis_repo: Arc<dyn BatchSynthesisRepository>,
    downloader: Arc<MediaDownloader>,
    poll_policy: PollPolicy,
    project_folder: PathBuf,
}

impl SynthesisService {
    pub fn new(
        synthesis_repo: Arc<dyn BatchSynthesisRepository>,
        downloader: Arc<MediaDownloader>,
        poll_policy: PollPolicy,
        project_folder: PathBuf,
    ) -> Self {
        Self {
            synthesis_repo,
            downloader,
            poll_policy,
            project_folder,
        }
    }
}

#[async_trait]
pub trait SynthesisServiceApi: Send + Sync {
    /// Validate the request locally and submit it.
    ///
    /// Nothing is sent when the script is empty or the background/codec combination is
    /// invalid. Returns the job in `Pending` state.
    async fn submit(&self, request: &SynthesisRequest) -> AppResult<Job>;

    /// Poll the job until it succeeds, fails, or the poll policy's timeout expires.
    ///
    /// A failed job is returned as `AppError::SynthesisFailed`.
    async fn wait_for_completion(&self, job_id: &str) -> AppResult<Job>;

    /// Stream the result of a succeeded job into the project folder
    async fn download_result(&self, job: &Job) -> AppResult<DownloadedAsset>;

    /// Submit, wait and download in one go
    async fn run(&self, request: &SynthesisRequest) -> AppResult<DownloadedAsset>;
}

#[async_trait]
impl SynthesisServiceApi for SynthesisService {
    async fn submit(&self, request: &SynthesisRequest) -> AppResult<Job> {
        request.validate()?;

        tracing::info!(
            text_type = %request.text_type,
            avatar_character = %request.options.avatar_character,
            avatar_style = request.options.avatar_style.as_str(),
            script_length = request.script_content.len(),
            "Submitting talking avatar synthesis"
        );

        let payload = CreateJobPayload::from(request);
        self.synthesis_repo.create_job(&payload).await
    }

    async fn wait_for_completion(&self, job_id: &str) -> AppResult<Job> {
        let started = Instant::now();

        let job = match self.poll_policy.timeout {
            Some(limit) => tokio::time::timeout(limit, self.poll_until_terminal(job_id))
                .await
                .map_err(|_| AppError::PollTimeout {
                    job_id: job_id.to_string(),
                    waited: started.elapsed(),
                })??,
            None => self.poll_until_terminal(job_id).await?,
        };

        match job.status {
            JobStatus::Failed => {
                let detail = job
                    .error_detail
                    .clone()
                    .unwrap_or_else(|| "no error detail reported".to_string());
                tracing::error!(
                    job_id = %job.id,
                    detail = %detail,
                    "Talking avatar synthesis failed"
                );
                Err(AppError::SynthesisFailed {
                    job_id: job.id,
                    detail,
                })
            }
            _ => {
                tracing::info!(
                    job_id = %job.id,
                    elapsed_secs = started.elapsed().as_secs_f64(),
                    "Talking avatar synthesis succeeded"
                );
                Ok(job)
            }
        }
    }

    async fn download_result(&self, job: &Job) -> AppResult<DownloadedAsset> {
        let url = job.result_url.as_deref().ok_or_else(|| {
            AppError::Transfer(format!("Job {} succeeded without a result URL", job.id))
        })?;

        self.downloader.download(url, &self.project_folder).await
    }

    async fn run(&self, request: &SynthesisRequest) -> AppResult<DownloadedAsset> {
        let job = self.submit(request).await?;
        let job = self.wait_for_completion(&job.id).await?;
        self.download_result(&job).await
    }
}

impl SynthesisService {
    /// Status checks until a terminal state. Returns Failed jobs as Ok; the caller decides.
    async fn poll_until_terminal(&self, job_id: &str) -> AppResult<Job> {
        let mut delay = self.poll_policy.interval;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let response = self.synthesis_repo.get_job(job_id).await?;
            let reported = response.status.clone();
            let (status, job) = response.into_job(job_id);

            match status {
                Some(status) if status.is_terminal() => {
                    tracing::info!(
                        job_id = %job_id,
                        status = %status,
                        attempt = attempt,
                        "Job reached terminal state"
                    );
                    if status == JobStatus::Succeeded && job.result_url.is_none() {
                        return Err(AppError::Transfer(format!(
                            "Job {} succeeded without a result URL",
                            job_id
                        )));
                    }
                    return Ok(job);
                }
                Some(status) => {
                    tracing::info!(
                        job_id = %job_id,
                        status = %status,
                        attempt = attempt,
                        next_check_secs = delay.as_secs_f64(),
                        "Job still in progress"
                    );
                }
                None => {
                    tracing::warn!(
                        job_id = %job_id,
                        reported_status = %reported,
                        attempt = attempt,
                        "Unrecognized job status, treating as in progress"
                    );
                }
            }

            tokio::time::sleep(delay).await;
            delay = self.poll_policy.next_delay(delay);
        }
    }
}
