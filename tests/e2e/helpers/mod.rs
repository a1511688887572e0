use mockito::{Mock, Server, ServerGuard};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use talking_avatar_batch::domain::synthesis::{PollPolicy, SynthesisService};
use talking_avatar_batch::infrastructure::config::SpeechServiceConfig;
use talking_avatar_batch::infrastructure::download::MediaDownloader;
use talking_avatar_batch::infrastructure::repositories::SpeechBatchSynthesisRepository;
use tempfile::TempDir;

pub mod assertions;

pub const TEST_API_KEY: &str = "test-speech-key";
pub const TEST_API_VERSION: &str = "3.1-preview1";
pub const JOBS_PATH: &str = "/api/texttospeech/3.1-preview1/batchsynthesis/talkingavatar";

pub struct TestContext {
    pub server: ServerGuard,
    pub speech: SpeechServiceConfig,
    pub project_folder: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let server = Server::new_async().await;

        let speech = SpeechServiceConfig {
            region: "westus2".to_string(),
            api_key: TEST_API_KEY.to_string(),
            api_version: TEST_API_VERSION.to_string(),
            endpoint: server.url(),
        };

        let project_folder = tempfile::tempdir().expect("Failed to create temp dir");

        Self {
            server,
            speech,
            project_folder,
        }
    }

    pub fn project_path(&self) -> &Path {
        self.project_folder.path()
    }

    pub fn repository(&self) -> SpeechBatchSynthesisRepository {
        SpeechBatchSynthesisRepository::new(&self.speech, Duration::from_secs(5))
            .expect("Failed to create repository")
    }

    pub fn downloader(&self) -> MediaDownloader {
        MediaDownloader::new(Duration::from_secs(5)).expect("Failed to create downloader")
    }

    /// Service wired against the stub server, polling every few milliseconds
    pub fn service(&self) -> SynthesisService {
        SynthesisService::new(
            Arc::new(self.repository()),
            Arc::new(self.downloader()),
            PollPolicy::fixed(Duration::from_millis(5)).with_timeout(Duration::from_secs(5)),
            self.project_path().to_path_buf(),
        )
    }

    /// Absolute URL on the stub server
    pub fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.server.url(), path_and_query)
    }

    pub async fn mock_job_status(&mut self, job_id: &str, body: serde_json::Value) -> Mock {
        self.server
            .mock("GET", format!("{}/{}", JOBS_PATH, job_id).as_str())
            .match_header("Ocp-Apim-Subscription-Key", TEST_API_KEY)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    pub async fn mock_video(&mut self, path: &str, bytes: &[u8], hits: usize) -> Mock {
        self.server
            .mock("GET", path)
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "video/webm")
            .with_body(bytes)
            .expect(hits)
            .create_async()
            .await
    }
}
