use std::time::Duration;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Submission rejected with status {status}: {body}")]
    SubmissionRejected { status: u16, body: String },

    #[error("Synthesis job {job_id} failed: {detail}")]
    SynthesisFailed { job_id: String, detail: String },

    #[error("Transfer error: {0}")]
    Transfer(String),

    #[error("Synthesis job {job_id} did not finish within {waited:?}")]
    PollTimeout { job_id: String, waited: Duration },
}

impl AppError {
    /// True for errors raised before any request reached the service
    pub fn is_fatal_before_network(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 2,
            Self::SubmissionRejected { .. } => 3,
            Self::SynthesisFailed { .. } => 4,
            Self::Transfer(_) => 5,
            Self::PollTimeout { .. } => 6,
        }
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
