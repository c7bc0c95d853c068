//! Text normalization ahead of segmentation.
//!
//! ## Passes
//! 0. Unicode NFC composition (optional, on by default)
//! 1. Symbol substitution (`²` -> `平方`)
//! 2. Bracket and decoration stripping
//! 3. Blank collapsing around CJK text
//! 4. Digit-run spelling (optional, per locale)

/// Cardinal number spelling
pub mod numbers;
/// Individual rewrite passes
pub mod rules;

pub use numbers::NumberLocale;
pub use rules::{collapse_blanks, spell_digits, strip_brackets, substitute_symbols};

use unicode_normalization::UnicodeNormalization;

use crate::config::NormalizerConfig;

/// Applies the normalization passes in order (reusable, stateless)
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Create a normalizer
    #[must_use]
    pub const fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// The configuration in use
    #[must_use]
    pub const fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize a standalone fragment
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        self.normalize_after(text, None)
    }

    /// Normalize a fragment that follows `previous` in the stream.
    ///
    /// `previous` is the last character of the already-normalized text and
    /// only affects whether a leading space is kept.
    #[must_use]
    pub fn normalize_after(&self, text: &str, previous: Option<char>) -> String {
        if text.is_empty() {
            return String::new();
        }

        let composed = if self.config.unicode_nfc {
            text.nfc().collect::<String>()
        } else {
            text.to_string()
        };

        let substituted = substitute_symbols(&composed);
        let stripped = strip_brackets(&substituted);
        let collapsed = rules::collapse_blanks_after(&stripped, previous);

        match self.config.spell_numbers {
            Some(locale) => spell_digits(&collapsed, locale),
            None => collapsed,
        }
    }
}
