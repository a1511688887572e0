use crate::domain::synthesis::dto::{CreateJobPayload, JobStatusResponse};
use crate::domain::synthesis::Job;
use crate::error::AppResult;
use async_trait::async_trait;

/// Repository for talking avatar batch synthesis jobs.
/// Abstracts the remote speech service so the poll loop can be driven by other backends.
///
/// Implementations are responsible for:
/// - Authenticating every call
/// - Mapping a rejected creation call to `AppError::SubmissionRejected`
/// - Mapping any other HTTP failure to `AppError::Transfer`
#[async_trait]
pub trait BatchSynthesisRepository: Send + Sync {
    /// Submit a new job. Returns the job in `Pending` state with the server-assigned id.
    async fn create_job(&self, payload: &CreateJobPayload) -> AppResult<Job>;

    /// Fetch the current status document of a job
    async fn get_job(&self, job_id: &str) -> AppResult<JobStatusResponse>;
}
