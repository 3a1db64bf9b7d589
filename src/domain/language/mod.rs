pub mod code;
pub mod detect;
pub mod policy;

pub use code::{InvalidLanguageCode, LanguageCode};
pub use detect::LanguageDetector;
pub use policy::{
    Capability, LanguagePolicy, LanguageSupportTable, ProviderConfig, ProviderKind, Resolution,
    TableError,
};
