pub mod batch_synthesis_repository;
pub mod speech_batch_synthesis_repository;

pub use batch_synthesis_repository::BatchSynthesisRepository;
pub use speech_batch_synthesis_repository::SpeechBatchSynthesisRepository;
