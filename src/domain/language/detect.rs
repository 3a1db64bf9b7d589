use super::code::LanguageCode;
use lingua::{Language, LanguageDetectorBuilder};

/// Languages the gateway can auto-detect for synthesis
const DETECTABLE_LANGUAGES: [Language; 8] = [
    Language::English,
    Language::Spanish,
    Language::French,
    Language::German,
    Language::Italian,
    Language::Portuguese,
    Language::Russian,
    Language::Armenian,
];

/// Wraps a lingua detector restricted to `DETECTABLE_LANGUAGES`.
///
/// Building the detector loads language models, so build it once at startup.
pub struct LanguageDetector {
    detector: lingua::LanguageDetector,
}

impl LanguageDetector {
    pub fn new() -> Self {
        let detector = LanguageDetectorBuilder::from_languages(&DETECTABLE_LANGUAGES).build();
        Self { detector }
    }

    pub fn detect(&self, text: &str) -> Option<LanguageCode> {
        let language = self.detector.detect_language_of(text)?;
        LanguageCode::parse(iso_code(language)).ok()
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn iso_code(language: Language) -> &'static str {
    match language {
        Language::English => "en",
        Language::Spanish => "es",
        Language::French => "fr",
        Language::German => "de",
        Language::Italian => "it",
        Language::Portuguese => "pt",
        Language::Russian => "ru",
        Language::Armenian => "hy",
    }
}
