//! Session configuration.
//!
//! All values are fixed for the lifetime of a session and validated when the
//! session is built, never mid-stream. Configuration can be assembled with
//! the builder methods or loaded from TOML:
//!
//! ```toml
//! max_pending_chars = 200
//!
//! [segmentation]
//! language = "zh"
//! comma_split = true
//! min_utterance_duration = 2.5
//! unit_duration_seconds = 0.2
//!
//! [normalizer]
//! unicode_nfc = true
//! spell_numbers = "zh"
//! ```

use crate::duration::DEFAULT_UNIT_DURATION;
use crate::error::{SpeechflowError, SpeechflowResult};
use crate::normalizer::NumberLocale;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Default minimum estimated duration for a trailing utterance
pub const DEFAULT_MIN_UTTERANCE_DURATION: f64 = 2.5;

/// Language family, selects the boundary punctuation set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Chinese (mixed with English) punctuation rules
    #[default]
    Zh,
    /// Western punctuation rules
    Other,
}

impl Language {
    /// Language code as used in configuration
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = SpeechflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zh" => Ok(Self::Zh),
            "other" => Ok(Self::Other),
            _ => Err(SpeechflowError::invalid_configuration(format!(
                "Unknown language '{s}', expected 'zh' or 'other'"
            ))),
        }
    }
}

/// Segmentation settings for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Selects the boundary punctuation set
    pub language: Language,
    /// Whether commas count as boundary punctuation
    pub comma_split: bool,
    /// Estimated duration below which a trailing utterance is held back
    pub min_utterance_duration: f64,
    /// Seconds per duration unit used by the estimator
    #[serde(alias = "unit_duration")]
    pub unit_duration_seconds: f64,
}

impl SegmentationConfig {
    /// Create the default configuration for a language
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// Set the language
    #[must_use]
    pub const fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Enable or disable comma boundaries
    #[must_use]
    pub const fn with_comma_split(mut self, comma_split: bool) -> Self {
        self.comma_split = comma_split;
        self
    }

    /// Set the minimum utterance duration
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is not a finite positive number
    pub fn with_min_utterance_duration(mut self, seconds: f64) -> SpeechflowResult<Self> {
        check_positive("min_utterance_duration", seconds)?;
        self.min_utterance_duration = seconds;
        Ok(self)
    }

    /// Set the seconds per duration unit
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a finite positive number
    pub fn with_unit_duration(mut self, seconds: f64) -> SpeechflowResult<Self> {
        check_positive("unit_duration_seconds", seconds)?;
        self.unit_duration_seconds = seconds;
        Ok(self)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if either duration value is non-positive or not finite
    pub fn validate(&self) -> SpeechflowResult<()> {
        check_positive("min_utterance_duration", self.min_utterance_duration)?;
        check_positive("unit_duration_seconds", self.unit_duration_seconds)?;
        Ok(())
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            language: Language::Zh,
            comma_split: true,
            min_utterance_duration: DEFAULT_MIN_UTTERANCE_DURATION,
            unit_duration_seconds: DEFAULT_UNIT_DURATION,
        }
    }
}

/// Normalizer settings for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Compose incoming text to NFC before the other passes
    pub unicode_nfc: bool,
    /// Spell digit runs as words in this locale; `None` leaves digits alone
    pub spell_numbers: Option<NumberLocale>,
}

impl NormalizerConfig {
    /// Enable digit-run spelling
    #[must_use]
    pub const fn with_spell_numbers(mut self, locale: NumberLocale) -> Self {
        self.spell_numbers = Some(locale);
        self
    }

    /// Enable or disable the NFC pre-pass
    #[must_use]
    pub const fn with_unicode_nfc(mut self, enabled: bool) -> Self {
        self.unicode_nfc = enabled;
        self
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            unicode_nfc: true,
            spell_numbers: None,
        }
    }
}

/// Full configuration of a streaming session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Segmentation settings
    pub segmentation: SegmentationConfig,
    /// Normalizer settings
    pub normalizer: NormalizerConfig,
    /// Force a flush once the pending remainder exceeds this many characters
    pub max_pending_chars: Option<usize>,
    /// Drop emitted utterances that contain only punctuation
    pub skip_punctuation_only: bool,
}

impl SessionConfig {
    /// Set the segmentation settings
    #[must_use]
    pub fn with_segmentation(mut self, segmentation: SegmentationConfig) -> Self {
        self.segmentation = segmentation;
        self
    }

    /// Set the normalizer settings
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: NormalizerConfig) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Cap the pending remainder
    ///
    /// # Errors
    ///
    /// Returns an error if `max_chars` is zero
    pub fn with_max_pending_chars(mut self, max_chars: usize) -> SpeechflowResult<Self> {
        if max_chars == 0 {
            return Err(SpeechflowError::invalid_configuration(
                "max_pending_chars must be greater than 0",
            ));
        }
        self.max_pending_chars = Some(max_chars);
        Ok(self)
    }

    /// Keep or drop punctuation-only utterances
    #[must_use]
    pub const fn with_skip_punctuation_only(mut self, skip: bool) -> Self {
        self.skip_punctuation_only = skip;
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range
    pub fn validate(&self) -> SpeechflowResult<()> {
        self.segmentation.validate()?;
        if self.max_pending_chars == Some(0) {
            return Err(SpeechflowError::invalid_configuration(
                "max_pending_chars must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or a value is out of range
    pub fn from_toml_str(text: &str) -> SpeechflowResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or holds
    /// out-of-range values
    pub fn from_file<P: AsRef<Path>>(path: P) -> SpeechflowResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SpeechflowError::file(format!("{}: {e}", path.display())))?;
        tracing::debug!("Loaded session config from {:?}", path);
        Self::from_toml_str(&text)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            segmentation: SegmentationConfig::default(),
            normalizer: NormalizerConfig::default(),
            max_pending_chars: None,
            skip_punctuation_only: true,
        }
    }
}

fn check_positive(name: &str, value: f64) -> SpeechflowResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SpeechflowError::invalid_configuration(format!(
            "{name} must be a positive number, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SegmentationConfig::default();
        assert_eq!(config.language, Language::Zh);
        assert!(config.comma_split);
        assert!((config.min_utterance_duration - 2.5).abs() < f64::EPSILON);
        assert!((config.unit_duration_seconds - 0.2).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());

        let session = SessionConfig::default();
        assert!(session.normalizer.unicode_nfc);
        assert_eq!(session.normalizer.spell_numbers, None);
        assert!(session.skip_punctuation_only);
        assert_eq!(session.max_pending_chars, None);
    }

    #[test]
    fn test_builder_validation() {
        assert!(SegmentationConfig::default()
            .with_min_utterance_duration(0.0)
            .is_err());
        assert!(SegmentationConfig::default()
            .with_min_utterance_duration(-1.0)
            .is_err());
        assert!(SegmentationConfig::default().with_unit_duration(0.0).is_err());
        assert!(SegmentationConfig::default()
            .with_unit_duration(f64::NAN)
            .is_err());
        assert!(SessionConfig::default().with_max_pending_chars(0).is_err());

        let config = SegmentationConfig::new(Language::Other)
            .with_comma_split(false)
            .with_min_utterance_duration(1.0)
            .unwrap()
            .with_unit_duration(0.3)
            .unwrap();
        assert_eq!(config.language, Language::Other);
        assert!(!config.comma_split);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!("zh".parse::<Language>().unwrap(), Language::Zh);
        assert_eq!("OTHER".parse::<Language>().unwrap(), Language::Other);
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::Other.to_string(), "other");
    }

    #[test]
    fn test_from_toml_str() {
        let config = SessionConfig::from_toml_str(
            r#"
            max_pending_chars = 120
            skip_punctuation_only = false

            [segmentation]
            language = "other"
            comma_split = false
            min_utterance_duration = 1.5

            [normalizer]
            spell_numbers = "en"
            "#,
        )
        .unwrap();

        assert_eq!(config.segmentation.language, Language::Other);
        assert!(!config.segmentation.comma_split);
        assert!((config.segmentation.min_utterance_duration - 1.5).abs() < f64::EPSILON);
        assert!((config.segmentation.unit_duration_seconds - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.normalizer.spell_numbers, Some(NumberLocale::English));
        assert!(config.normalizer.unicode_nfc);
        assert_eq!(config.max_pending_chars, Some(120));
        assert!(!config.skip_punctuation_only);
    }

    #[test]
    fn test_from_toml_str_empty_is_default() {
        assert_eq!(SessionConfig::from_toml_str("").unwrap(), SessionConfig::default());
    }

    #[test]
    fn test_from_toml_str_rejects_bad_values() {
        let err = SessionConfig::from_toml_str("[segmentation]\nmin_utterance_duration = 0.0\n")
            .unwrap_err();
        assert!(matches!(err, SpeechflowError::InvalidConfiguration { .. }));

        let err = SessionConfig::from_toml_str("[segmentation]\nlanguage = \"fr\"\n").unwrap_err();
        assert!(matches!(err, SpeechflowError::ConfigParse { .. }));

        let err = SessionConfig::from_toml_str("max_pending_chars = 0\n").unwrap_err();
        assert!(matches!(err, SpeechflowError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[segmentation]\ncomma_split = false").unwrap();

        let config = SessionConfig::from_file(file.path()).unwrap();
        assert!(!config.segmentation.comma_split);

        let err = SessionConfig::from_file("/nonexistent/speechflow.toml").unwrap_err();
        assert!(matches!(err, SpeechflowError::FileError { .. }));
    }
}
