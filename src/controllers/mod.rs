pub mod health;
pub mod stt;
pub mod translate;
pub mod tts;
