use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{
    AvatarStyle, Job, JobStatus, SubtitleType, SynthesisRequest, TextType, VideoCodec,
    VideoFormat,
};

/// Body for POST /api/texttospeech/{version}/batchsynthesis/talkingavatar
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    pub display_name: String,
    pub description: String,
    pub text_type: TextType,
    pub synthesis_config: SynthesisConfigPayload,
    pub inputs: Vec<InputPayload>,
    pub properties: AvatarPropertiesPayload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SynthesisConfigPayload {
    pub voice: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InputPayload {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarPropertiesPayload {
    pub customized: bool,
    pub talking_avatar_character: String,
    pub talking_avatar_style: AvatarStyle,
    pub video_format: VideoFormat,
    pub video_codec: VideoCodec,
    pub subtitle_type: SubtitleType,
    pub background_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_kbps: Option<u32>,
}

impl From<&SynthesisRequest> for CreateJobPayload {
    fn from(request: &SynthesisRequest) -> Self {
        let options = &request.options;
        Self {
            display_name: options.display_name.clone(),
            description: options.description.clone(),
            text_type: request.text_type,
            // The service takes the voice from the markup for SSML jobs, but the field is still required
            synthesis_config: SynthesisConfigPayload {
                voice: options.voice_name.clone(),
            },
            inputs: vec![InputPayload {
                text: request.script_content.clone(),
            }],
            properties: AvatarPropertiesPayload {
                customized: options.customized,
                talking_avatar_character: options.avatar_character.clone(),
                talking_avatar_style: options.avatar_style,
                video_format: options.video_format,
                video_codec: options.video_codec,
                subtitle_type: options.subtitle_type,
                background_color: options.background_color.clone(),
                background_image: options.background_image.clone(),
                bitrate_kbps: options.bitrate_kbps,
            },
        }
    }
}

/// Response of the create call; the service echoes the job metadata back
#[derive(Debug, Deserialize)]
pub struct CreateJobResponse {
    pub id: String,
}

/// Response of GET .../talkingavatar/{id}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub outputs: Option<JobOutputs>,
    #[serde(default)]
    pub properties: Option<JobProperties>,
    #[serde(default)]
    pub created_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_action_date_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct JobOutputs {
    #[serde(default)]
    pub result: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobProperties {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl JobStatusResponse {
    /// Convert into the domain job. `status` is None when the service reports a value this
    /// client does not recognise.
    pub fn into_job(self, job_id: &str) -> (Option<JobStatus>, Job) {
        let status = JobStatus::from_wire(&self.status);
        let result_url = self.outputs.and_then(|outputs| outputs.result);
        let error_detail = self
            .properties
            .and_then(|properties| properties.error)
            .map(|error| describe_error(&error));

        let job = Job {
            id: self.id.unwrap_or_else(|| job_id.to_string()),
            status: status.unwrap_or(JobStatus::Running),
            result_url: match status {
                Some(JobStatus::Succeeded) => result_url,
                _ => None,
            },
            error_detail: match status {
                Some(JobStatus::Failed) => error_detail,
                _ => None,
            },
            created_at: self.created_date_time,
            last_action_at: self.last_action_date_time,
        };

        (status, job)
    }
}

/// Flatten the service's error value into a single human-readable line
fn describe_error(error: &serde_json::Value) -> String {
    match error {
        serde_json::Value::String(message) => message.clone(),
        serde_json::Value::Object(fields) => {
            let code = fields.get("code").and_then(|c| c.as_str());
            let message = fields.get("message").and_then(|m| m.as_str());
            match (code, message) {
                (Some(code), Some(message)) => format!("{}: {}", code, message),
                (None, Some(message)) => message.to_string(),
                _ => error.to_string(),
            }
        }
        other => other.to_string(),
    }
}
