use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// language[-Script][-REGION], with `_` accepted as a separator
static LANGUAGE_TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]{2,3})(?:[-_]([A-Za-z]{4}))?(?:[-_]([A-Za-z]{2}|[0-9]{3}))?$").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid language code: {0:?}")]
pub struct InvalidLanguageCode(pub String);

/// A validated BCP-47 style language code such as `fr`, `hy-AM` or `zh-Hant-TW`.
///
/// Codes are normalized on parse: the language subtag is lowercased, the
/// script subtag title-cased and the region uppercased, so `HY_am` and
/// `hy-AM` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageCode {
    tag: String,
    language: String,
    script: Option<String>,
    region: Option<String>,
}

impl LanguageCode {
    pub fn parse(input: &str) -> Result<Self, InvalidLanguageCode> {
        let trimmed = input.trim();
        let captures = LANGUAGE_TAG_PATTERN
            .captures(trimmed)
            .ok_or_else(|| InvalidLanguageCode(input.to_string()))?;

        let language = captures[1].to_ascii_lowercase();
        let script = captures.get(2).map(|m| {
            let lower = m.as_str().to_ascii_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => lower,
            }
        });
        let region = captures.get(3).map(|m| m.as_str().to_ascii_uppercase());

        Ok(Self::from_parts(language, script, region))
    }

    fn from_parts(language: String, script: Option<String>, region: Option<String>) -> Self {
        let mut tag = language.clone();
        if let Some(script) = &script {
            tag.push('-');
            tag.push_str(script);
        }
        if let Some(region) = &region {
            tag.push('-');
            tag.push_str(region);
        }

        Self {
            tag,
            language,
            script,
            region,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// The bare language subtag (`hy` for `hy-AM`)
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn is_bare(&self) -> bool {
        self.script.is_none() && self.region.is_none()
    }

    /// Lookup keys from most to least specific: `zh-Hant-TW`, `zh-Hant`, `zh`.
    pub fn candidates(&self) -> Vec<String> {
        let mut keys = vec![self.tag.clone()];
        if self.region.is_some() {
            if let Some(script) = &self.script {
                keys.push(format!("{}-{}", self.language, script));
            }
        }
        if !self.is_bare() {
            keys.push(self.language.clone());
        }
        keys
    }
}

impl FromStr for LanguageCode {
    type Err = InvalidLanguageCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}
