use crate::e2e::helpers;

use helpers::{TestContext, JOBS_PATH};
use serde_json::json;
use talking_avatar_batch::domain::synthesis::{JobStatus, SynthesisServiceApi};
use talking_avatar_batch::error::AppError;

#[tokio::test]
async fn it_should_extract_result_url_from_succeeded_job() {
    let mut ctx = TestContext::new().await;
    let status = ctx
        .mock_job_status(
            "abc",
            json!({
                "id": "abc",
                "status": "Succeeded",
                "createdDateTime": "2024-05-02T09:30:00Z",
                "lastActionDateTime": "2024-05-02T09:33:10Z",
                "outputs": {
                    "result": "https://host/path/0001.webm?sig=xyz",
                    "summary": "https://host/path/summary.json?sig=xyz"
                }
            }),
        )
        .await;

    let job = ctx.service().wait_for_completion("abc").await.unwrap();

    status.assert_async().await;
    assert_eq!(job.status, JobStatus::Succeeded);
    assert_eq!(
        job.result_url.as_deref(),
        Some("https://host/path/0001.webm?sig=xyz")
    );
    assert!(job.last_action_at.is_some());
}

#[tokio::test]
async fn it_should_surface_server_error_detail_for_failed_job() {
    let mut ctx = TestContext::new().await;
    ctx.mock_job_status(
        "abc",
        json!({ "id": "abc", "status": "Failed", "properties": { "error": "bad input" } }),
    )
    .await;

    let result = ctx.service().wait_for_completion("abc").await;

    match result {
        Err(AppError::SynthesisFailed { job_id, detail }) => {
            assert_eq!(job_id, "abc");
            assert_eq!(detail, "bad input");
        }
        other => panic!("expected SynthesisFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn it_should_abort_polling_on_http_failure() {
    let mut ctx = TestContext::new().await;
    ctx.server
        .mock("GET", format!("{}/abc", JOBS_PATH).as_str())
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let result = ctx.service().wait_for_completion("abc").await;

    match result {
        Err(AppError::Transfer(message)) => assert!(message.contains("500")),
        other => panic!("expected Transfer, got {:?}", other),
    }
}
