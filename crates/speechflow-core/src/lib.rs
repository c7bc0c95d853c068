//! # Speechflow Core
//!
//! Streaming text segmentation and normalization for real-time text-to-speech.
//!
//! Text produced incrementally (for example token deltas from a language
//! model) is cleaned up and cut into speakable utterances as it arrives.
//! Each step decides how much of the accumulated text is ready to speak and
//! how much must wait for more context.
//!
//! ## Features
//!
//! - Per-language boundary punctuation with optional comma splitting
//! - Duration-based deferral of short trailing clauses
//! - Closing-quote attachment
//! - Normalization passes: NFC, symbol substitution, bracket stripping,
//!   blank collapsing and optional number spelling
//! - Thread-safe session registry for many concurrent conversations
//!
//! ## Example
//!
//! ```rust
//! use speechflow_core::{SessionConfig, StreamSession};
//!
//! # fn main() -> speechflow_core::SpeechflowResult<()> {
//! let mut session = StreamSession::new(SessionConfig::default())?;
//!
//! let mut spoken = Vec::new();
//! for chunk in ["今天天气真不错，", "我们一起去公园散步吧。", "好吗"] {
//!     spoken.extend(session.push(chunk));
//! }
//! spoken.extend(session.finish());
//!
//! assert_eq!(spoken.last().map(|u| u.text.as_str()), Some("好吗"));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod buffer;
pub mod config;
pub mod duration;
pub mod error;
pub mod normalizer;
pub mod script;
pub mod segmenter;
pub mod session;

// Re-export main types for convenience
pub use buffer::{SessionBuffer, TextSpan};
pub use config::{Language, NormalizerConfig, SegmentationConfig, SessionConfig};
pub use duration::DurationEstimator;
pub use error::{SpeechflowError, SpeechflowResult};
pub use normalizer::{Normalizer, NumberLocale};
pub use script::{
    classify_char, contains_chinese, count_scripts, is_only_punctuation, ScriptClass, ScriptCounts,
};
pub use segmenter::{split_utterances, Advance, Segmenter, SplitDecision, SplitReason, Utterance};
pub use session::{SessionRegistry, StreamSession};

/// Version information for the speechflow-core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_readme_flow() {
        let mut session = StreamSession::new(SessionConfig::default()).unwrap();
        let mut spoken = Vec::new();
        for chunk in ["今天天气真不错，", "我们一起去公园散步吧。", "好吗"] {
            spoken.extend(session.push(chunk));
        }
        spoken.extend(session.finish());

        let texts: Vec<&str> = spoken.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["今天天气真不错，", "我们一起去公园散步吧。", "好吗"]);
    }
}
