pub mod google_stt_repository;
pub mod google_translation_repository;
pub mod google_tts_repository;
pub mod openai_tts_repository;
pub mod polly_tts_repository;
pub mod provider_error;
pub mod stt_repository;
pub mod text_batches;
pub mod translation_repository;
pub mod tts_repository;

pub use google_stt_repository::GoogleSttRepository;
pub use google_translation_repository::GoogleTranslationRepository;
pub use google_tts_repository::GoogleTtsRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use provider_error::ProviderError;
pub use stt_repository::SttRepository;
pub use translation_repository::TranslationRepository;
pub use tts_repository::TtsRepository;
