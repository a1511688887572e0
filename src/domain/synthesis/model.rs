use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;

/// How the service should interpret the script content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextType {
    #[serde(rename = "PlainText")]
    PlainText,
    #[serde(rename = "SSML")]
    Ssml,
}

impl TextType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextType::PlainText => "PlainText",
            TextType::Ssml => "SSML",
        }
    }

    /// Guess the text type from a script file extension.
    /// `.ssml` and `.xml` are markup, anything else is plain text.
    pub fn infer_from_path(path: &std::path::Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("ssml") | Some("xml") => TextType::Ssml,
            _ => TextType::PlainText,
        }
    }
}

impl FromStr for TextType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" => Ok(TextType::PlainText),
            "ssml" => Ok(TextType::Ssml),
            other => Err(AppError::Configuration(format!(
                "unknown text type '{}', expected PlainText or SSML",
                other
            ))),
        }
    }
}

impl std::fmt::Display for TextType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Avatar poses supported by the prebuilt characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvatarStyle {
    GracefulSitting,
    CasualSitting,
    TechnicalSitting,
    GracefulStanding,
    TechnicalStanding,
}

impl AvatarStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvatarStyle::GracefulSitting => "graceful-sitting",
            AvatarStyle::CasualSitting => "casual-sitting",
            AvatarStyle::TechnicalSitting => "technical-sitting",
            AvatarStyle::GracefulStanding => "graceful-standing",
            AvatarStyle::TechnicalStanding => "technical-standing",
        }
    }
}

impl FromStr for AvatarStyle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "graceful-sitting" => Ok(AvatarStyle::GracefulSitting),
            "casual-sitting" => Ok(AvatarStyle::CasualSitting),
            "technical-sitting" => Ok(AvatarStyle::TechnicalSitting),
            "graceful-standing" => Ok(AvatarStyle::GracefulStanding),
            "technical-standing" => Ok(AvatarStyle::TechnicalStanding),
            other => Err(AppError::Configuration(format!(
                "unsupported avatar style '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    Mp4,
    Webm,
}

impl FromStr for VideoFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" => Ok(VideoFormat::Mp4),
            "webm" => Ok(VideoFormat::Webm),
            other => Err(AppError::Configuration(format!(
                "unsupported video format '{}', expected mp4 or webm",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    Hevc,
    H264,
    Vp9,
}

impl FromStr for VideoCodec {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hevc" => Ok(VideoCodec::Hevc),
            "h264" => Ok(VideoCodec::H264),
            "vp9" => Ok(VideoCodec::Vp9),
            other => Err(AppError::Configuration(format!(
                "unsupported video codec '{}', expected hevc, h264 or vp9",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleType {
    SoftEmbedded,
    HardEmbedded,
    ExternalFile,
    None,
}

impl FromStr for SubtitleType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soft_embedded" => Ok(SubtitleType::SoftEmbedded),
            "hard_embedded" => Ok(SubtitleType::HardEmbedded),
            "external_file" => Ok(SubtitleType::ExternalFile),
            "none" => Ok(SubtitleType::None),
            other => Err(AppError::Configuration(format!(
                "unsupported subtitle type '{}'",
                other
            ))),
        }
    }
}

/// Avatar and video options shared by every job submitted from one configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOptions {
    pub display_name: String,
    pub description: String,
    pub voice_name: String,
    pub avatar_character: String,
    pub avatar_style: AvatarStyle,
    pub video_format: VideoFormat,
    pub video_codec: VideoCodec,
    pub subtitle_type: SubtitleType,
    pub background_color: String,
    pub background_image: Option<String>,
    pub customized: bool,
    pub bitrate_kbps: Option<u32>,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            display_name: "talking avatar".to_string(),
            description: String::new(),
            voice_name: "en-US-JennyNeural".to_string(),
            avatar_character: "lisa".to_string(),
            avatar_style: AvatarStyle::GracefulSitting,
            video_format: VideoFormat::Webm,
            video_codec: VideoCodec::Vp9,
            subtitle_type: SubtitleType::SoftEmbedded,
            background_color: "#FFFFFFFF".to_string(),
            background_image: None,
            customized: false,
            bitrate_kbps: None,
        }
    }
}

/// A single talking avatar job as submitted to the service
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text_type: TextType,
    pub script_content: String,
    pub options: SynthesisOptions,
}

impl SynthesisRequest {
    pub fn new(text_type: TextType, script_content: String, options: SynthesisOptions) -> Self {
        Self {
            text_type,
            script_content,
            options,
        }
    }

    /// Check everything that can be rejected locally, before the service sees the job
    pub fn validate(&self) -> Result<(), AppError> {
        if self.script_content.trim().is_empty() {
            return Err(AppError::Configuration(
                "script content cannot be empty".to_string(),
            ));
        }

        if self.wants_transparent_background()
            && (self.options.video_format != VideoFormat::Webm
                || self.options.video_codec != VideoCodec::Vp9)
        {
            return Err(AppError::Configuration(format!(
                "transparent background '{}' requires webm format with vp9 codec",
                self.options.background_color
            )));
        }

        Ok(())
    }

    /// `transparent` or an `#RRGGBBAA` color whose alpha is zero
    pub fn wants_transparent_background(&self) -> bool {
        is_transparent_color(&self.options.background_color)
    }
}

fn is_transparent_color(color: &str) -> bool {
    let color = color.trim();
    if color.eq_ignore_ascii_case("transparent") {
        return true;
    }

    match color.strip_prefix('#') {
        Some(hex) if hex.len() == 8 && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
            &hex[6..] == "00"
        }
        _ => false,
    }
}

/// Lifecycle of a batch synthesis job as reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    /// Map the service's status string. Returns None for values this client does not know.
    pub fn from_wire(status: &str) -> Option<Self> {
        match status {
            "NotStarted" | "Pending" => Some(JobStatus::Pending),
            "Running" => Some(JobStatus::Running),
            "Succeeded" => Some(JobStatus::Succeeded),
            "Failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Pending => "Pending",
            JobStatus::Running => "Running",
            JobStatus::Succeeded => "Succeeded",
            JobStatus::Failed => "Failed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub result_url: Option<String>,
    pub error_detail: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_action_at: Option<DateTime<Utc>>,
}

impl Job {
    /// A freshly accepted job, before the first status check
    pub fn pending(id: String) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            result_url: None,
            error_detail: None,
            created_at: None,
            last_action_at: None,
        }
    }
}

/// Media file written to disk for a succeeded job
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedAsset {
    pub source_url: String,
    pub local_path: PathBuf,
}
