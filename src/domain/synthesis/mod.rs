pub mod dto;
pub mod model;
pub mod poll;
pub mod service;

pub use model::{
    AvatarStyle, DownloadedAsset, Job, JobStatus, SubtitleType, SynthesisOptions,
    SynthesisRequest, TextType, VideoCodec, VideoFormat,
};
pub use poll::PollPolicy;
pub use service::{SynthesisService, SynthesisServiceApi};
