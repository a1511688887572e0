use crate::domain::synthesis::{PollPolicy, SynthesisOptions, TextType};
use crate::error::{AppError, AppResult};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_VERSION: &str = "3.1-preview1";

#[derive(Debug, Clone)]
pub struct Config {
    pub speech: SpeechServiceConfig,
    pub script_path: PathBuf,
    /// None means "infer from the script extension"
    pub text_type: Option<TextType>,
    pub project_folder: PathBuf,
    pub synthesis: SynthesisOptions,
    pub poll: PollPolicy,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

#[derive(Clone, PartialEq)]
pub struct SpeechServiceConfig {
    pub region: String,
    pub api_key: String,
    pub api_version: String,
    pub endpoint: String,
}

// Keeps the key out of logs and panic messages
impl std::fmt::Debug for SpeechServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechServiceConfig")
            .field("region", &self.region)
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl SpeechServiceConfig {
    pub fn default_endpoint(region: &str) -> String {
        format!("https://{}.customvoice.api.speech.microsoft.com", region)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let region = required("SPEECH_REGION")?;
        let api_key = required("SPEECH_KEY")?;

        let speech = SpeechServiceConfig {
            endpoint: optional("SPEECH_ENDPOINT")
                .unwrap_or_else(|| SpeechServiceConfig::default_endpoint(&region)),
            api_version: optional("SPEECH_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            region,
            api_key,
        };

        let defaults = SynthesisOptions::default();
        let synthesis = SynthesisOptions {
            display_name: optional("DISPLAY_NAME").unwrap_or(defaults.display_name),
            description: optional("DESCRIPTION").unwrap_or(defaults.description),
            voice_name: optional("VOICE_NAME").unwrap_or(defaults.voice_name),
            avatar_character: optional("AVATAR_CHARACTER").unwrap_or(defaults.avatar_character),
            avatar_style: parse_or("AVATAR_STYLE", defaults.avatar_style)?,
            video_format: parse_or("VIDEO_FORMAT", defaults.video_format)?,
            video_codec: parse_or("VIDEO_CODEC", defaults.video_codec)?,
            subtitle_type: parse_or("SUBTITLE_TYPE", defaults.subtitle_type)?,
            background_color: optional("BACKGROUND_COLOR").unwrap_or(defaults.background_color),
            background_image: optional("BACKGROUND_IMAGE"),
            customized: parse_or("AVATAR_CUSTOMIZED", defaults.customized)?,
            bitrate_kbps: parse_optional("BITRATE_KBPS")?,
        };

        let poll_defaults = PollPolicy::default();
        let poll = PollPolicy {
            interval: parse_optional::<u64>("POLL_INTERVAL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(poll_defaults.interval),
            backoff_factor: parse_or("POLL_BACKOFF_FACTOR", poll_defaults.backoff_factor)?,
            max_interval: parse_optional::<u64>("POLL_MAX_INTERVAL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(poll_defaults.max_interval),
            timeout: parse_optional::<u64>("POLL_TIMEOUT_SECS")?.map(Duration::from_secs),
        };

        if poll.interval.is_zero() {
            return Err(AppError::Configuration(
                "POLL_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }
        if !poll.backoff_factor.is_finite() || poll.backoff_factor < 1.0 {
            return Err(AppError::Configuration(
                "POLL_BACKOFF_FACTOR must be at least 1.0".to_string(),
            ));
        }

        let config = Config {
            speech,
            script_path: optional("SCRIPT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("script.txt")),
            text_type: parse_optional("TEXT_TYPE")?,
            project_folder: optional("PROJECT_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            synthesis,
            poll,
            request_timeout: Duration::from_secs(parse_or("REQUEST_TIMEOUT_SECS", 30u64)?),
            log_format: optional("LOG_FORMAT")
                .map(|s| match s.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })
                .unwrap_or(LogFormat::Pretty),
        };

        Ok(config)
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(key: &str) -> AppResult<String> {
    optional(key).ok_or_else(|| AppError::Configuration(format!("{} must be set", key)))
}

fn parse_optional<T>(key: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional(key)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|e| AppError::Configuration(format!("Invalid {}: {}", key, e)))
        })
        .transpose()
}

fn parse_or<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_optional(key)?.unwrap_or(default))
}
