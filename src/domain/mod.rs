pub mod language;
pub mod shared;
pub mod stt;
pub mod translate;
pub mod tts;
