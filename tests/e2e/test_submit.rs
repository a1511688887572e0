use crate::e2e::helpers;

use helpers::fixtures::{plain_text_request, ssml_request, transparent_mp4_request};
use helpers::{TestContext, JOBS_PATH, TEST_API_KEY};
use mockito::Matcher;
use serde_json::json;
use talking_avatar_batch::domain::synthesis::{JobStatus, SynthesisServiceApi};
use talking_avatar_batch::error::AppError;

#[tokio::test]
async fn it_should_return_pending_job_when_service_accepts() {
    let mut ctx = TestContext::new().await;
    let create = ctx
        .server
        .mock("POST", JOBS_PATH)
        .match_header("Ocp-Apim-Subscription-Key", TEST_API_KEY)
        .match_body(Matcher::PartialJson(json!({
            "textType": "PlainText",
            "inputs": [{ "text": "Hi, I'm Lisa, your guide today." }],
            "properties": {
                "talkingAvatarCharacter": "lisa",
                "talkingAvatarStyle": "graceful-sitting"
            }
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"abc","status":"NotStarted","displayName":"talking avatar"}"#)
        .create_async()
        .await;

    let job = ctx
        .service()
        .submit(&plain_text_request("Hi, I'm Lisa, your guide today."))
        .await
        .unwrap();

    create.assert_async().await;
    assert_eq!(job.id, "abc");
    assert_eq!(job.status, JobStatus::Pending);
}

#[tokio::test]
async fn it_should_send_voice_for_ssml_scripts() {
    let mut ctx = TestContext::new().await;
    let create = ctx
        .server
        .mock("POST", JOBS_PATH)
        .match_body(Matcher::PartialJson(json!({
            "textType": "SSML",
            "synthesisConfig": { "voice": "en-US-JennyNeural" }
        })))
        .with_status(201)
        .with_body(r#"{"id":"ssml-job"}"#)
        .create_async()
        .await;

    let job = ctx.service().submit(&ssml_request()).await.unwrap();

    create.assert_async().await;
    assert_eq!(job.id, "ssml-job");
}

#[tokio::test]
async fn it_should_report_rejected_submission_with_status_and_body() {
    let mut ctx = TestContext::new().await;
    ctx.server
        .mock("POST", JOBS_PATH)
        .with_status(400)
        .with_body(r#"{"code":"InvalidRequest","message":"Unsupported avatar character"}"#)
        .create_async()
        .await;

    let result = ctx.service().submit(&plain_text_request("Hello")).await;

    match result {
        Err(AppError::SubmissionRejected { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("Unsupported avatar character"));
        }
        other => panic!("expected SubmissionRejected, got {:?}", other),
    }
}

#[tokio::test]
async fn it_should_reject_empty_script_without_calling_service() {
    let mut ctx = TestContext::new().await;
    let create = ctx
        .server
        .mock("POST", JOBS_PATH)
        .expect(0)
        .create_async()
        .await;

    let result = ctx.service().submit(&plain_text_request("")).await;

    assert!(matches!(result, Err(AppError::Configuration(_))));
    create.assert_async().await;
}

#[tokio::test]
async fn it_should_reject_transparent_background_without_webm_vp9() {
    let mut ctx = TestContext::new().await;
    let create = ctx
        .server
        .mock("POST", JOBS_PATH)
        .expect(0)
        .create_async()
        .await;

    let result = ctx.service().submit(&transparent_mp4_request()).await;

    assert!(matches!(result, Err(AppError::Configuration(_))));
    create.assert_async().await;
}
