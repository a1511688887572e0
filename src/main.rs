use anyhow::Context;
use std::process::ExitCode;
use std::sync::Arc;
use talking_avatar_batch::domain::synthesis::{
    DownloadedAsset, SynthesisRequest, SynthesisService, SynthesisServiceApi,
};
use talking_avatar_batch::error::AppError;
use talking_avatar_batch::infrastructure::config::{Config, LogFormat};
use talking_avatar_batch::infrastructure::download::MediaDownloader;
use talking_avatar_batch::infrastructure::repositories::SpeechBatchSynthesisRepository;
use talking_avatar_batch::infrastructure::script::load_script;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status when the run is interrupted with Ctrl-C
const INTERRUPTED_EXIT_CODE: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        region = %config.speech.region,
        api_version = %config.speech.api_version,
        project_folder = %config.project_folder.display(),
        "Starting talking avatar batch synthesis"
    );

    let outcome = tokio::select! {
        result = run(config) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, abandoning the synthesis job");
            return ExitCode::from(INTERRUPTED_EXIT_CODE);
        }
    };

    match outcome {
        Ok(asset) => {
            // Downstream tooling (muxers, editors) picks the file up from stdout
            println!("{}", asset.local_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Talking avatar batch synthesis failed");
            let code = e
                .downcast_ref::<AppError>()
                .map(|app_error| app_error.exit_code())
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}

async fn run(config: Config) -> anyhow::Result<DownloadedAsset> {
    let script = load_script(&config.script_path, config.text_type)
        .await
        .context("Loading script")?;
    let request = SynthesisRequest::new(script.text_type, script.content, config.synthesis.clone());

    // === DEPENDENCY INJECTION SETUP ===
    let synthesis_repo = Arc::new(SpeechBatchSynthesisRepository::new(
        &config.speech,
        config.request_timeout,
    )?);
    let downloader = Arc::new(MediaDownloader::new(config.request_timeout)?);
    let synthesis_service = SynthesisService::new(
        synthesis_repo,
        downloader,
        config.poll.clone(),
        config.project_folder.clone(),
    );

    let asset = synthesis_service
        .run(&request)
        .await
        .context("Running talking avatar synthesis")?;

    Ok(asset)
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "talking_avatar_batch=info,reqwest=warn".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "talking_avatar_batch=info,reqwest=warn".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
