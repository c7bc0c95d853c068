//! Heuristic spoken-duration estimate for a span of text.
//!
//! The estimate is relative: it is only meant for comparing a candidate
//! utterance against a threshold, not for predicting wall-clock audio length.

use crate::error::{SpeechflowError, SpeechflowResult};
use crate::script::{count_scripts, ScriptCounts};

/// Units contributed by one Han ideograph
pub const IDEOGRAPH_WEIGHT: f64 = 1.5;
/// Units contributed by one kana character
pub const KANA_WEIGHT: f64 = 1.0;
/// Units contributed by one Latin word
pub const LATIN_WORD_WEIGHT: f64 = 1.5;

/// Default seconds per duration unit
pub const DEFAULT_UNIT_DURATION: f64 = 0.2;

/// Converts per-script unit counts into an estimated duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationEstimator {
    unit_duration: f64,
}

impl DurationEstimator {
    /// Create an estimator with the given seconds-per-unit
    ///
    /// # Errors
    ///
    /// Returns an error if `unit_duration` is not a finite positive number
    pub fn new(unit_duration: f64) -> SpeechflowResult<Self> {
        if !unit_duration.is_finite() || unit_duration <= 0.0 {
            return Err(SpeechflowError::invalid_configuration(format!(
                "unit_duration_seconds must be a positive number, got {unit_duration}"
            )));
        }
        Ok(Self { unit_duration })
    }

    /// Seconds per duration unit
    #[must_use]
    pub const fn unit_duration(&self) -> f64 {
        self.unit_duration
    }

    /// Weighted unit count of a span, before scaling
    #[must_use]
    pub fn units(text: &str) -> f64 {
        Self::units_from_counts(&count_scripts(text))
    }

    /// Estimated duration of a span in seconds
    #[must_use]
    pub fn estimate(&self, text: &str) -> f64 {
        Self::units(text) * self.unit_duration
    }

    #[allow(clippy::cast_precision_loss)]
    fn units_from_counts(counts: &ScriptCounts) -> f64 {
        counts.ideographs as f64 * IDEOGRAPH_WEIGHT
            + counts.kana as f64 * KANA_WEIGHT
            + counts.latin_words as f64 * LATIN_WORD_WEIGHT
    }
}

impl Default for DurationEstimator {
    fn default() -> Self {
        Self {
            unit_duration: DEFAULT_UNIT_DURATION,
        }
    }
}
