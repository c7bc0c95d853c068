//! Incremental utterance segmentation.
//!
//! A [`Segmenter`] owns one session's buffer. Each call to
//! [`Segmenter::advance`] appends a (pre-normalized) chunk and splits the
//! buffer into text that is ready to speak and a remainder that waits for
//! more context. The split is always a single offset into the buffer, so
//! `ready_text + remainder` reproduces the buffer exactly.
//!
//! Split policy, given the candidate utterances found in the buffer:
//! - no boundary at all: hold everything (unless forced)
//! - buffer ends right on a boundary: that last candidate stays open, since
//!   a closing quote may still arrive with the next chunk
//! - last candidate long enough: emit every candidate, hold the open tail
//! - a single, short candidate: hold everything (unless forced)
//! - several candidates, last one short: emit all but the last, which is
//!   merged with whatever arrives next
//!
//! A forced flush empties the buffer in every case.

use tracing::{debug, trace};

use crate::buffer::{SessionBuffer, TextSpan};
use crate::config::{Language, SegmentationConfig};
use crate::duration::DurationEstimator;
use crate::error::SpeechflowResult;

/// Boundary punctuation for Chinese text (mixed with English)
pub const ZH_BOUNDARIES: &[char] = &['。', '？', '！', '；', '：', '、', '.', '?', '!', ';'];

/// Boundary punctuation for other languages
pub const OTHER_BOUNDARIES: &[char] = &['.', '?', '!', ';', ':'];

/// Commas, boundaries only when `comma_split` is set
pub const COMMA_BOUNDARIES: &[char] = &['，', ','];

/// Closing quotes that stay attached to the utterance they follow
pub const CLOSING_QUOTES: &[char] = &['"', '”'];

/// Whether `ch` can end an utterance under `config`
#[must_use]
pub fn is_boundary(ch: char, config: &SegmentationConfig) -> bool {
    let base = match config.language {
        Language::Zh => ZH_BOUNDARIES,
        Language::Other => OTHER_BOUNDARIES,
    };
    base.contains(&ch) || (config.comma_split && COMMA_BOUNDARIES.contains(&ch))
}

/// Candidate utterances found in a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryScan {
    /// Punctuation-terminated spans, in order and contiguous
    pub candidates: Vec<TextSpan>,
    /// Byte offset where the unterminated tail starts
    pub tail_start: usize,
}

/// Find candidate utterances in `text`.
///
/// Each candidate runs from the end of the previous one through a boundary
/// character, plus one closing quote directly after it. A boundary with no
/// content before it (as in `。。` or `?!`) extends the previous candidate
/// instead of opening a new one.
#[must_use]
pub fn scan_boundaries(text: &str, config: &SegmentationConfig) -> BoundaryScan {
    let mut candidates: Vec<TextSpan> = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !is_boundary(ch, config) {
            continue;
        }

        let mut end = idx + ch.len_utf8();
        if let Some(&(quote_idx, quote)) = chars.peek() {
            if CLOSING_QUOTES.contains(&quote) {
                end = quote_idx + quote.len_utf8();
                chars.next();
            }
        }

        let previous = candidates.last_mut().filter(|_| idx == start);
        if let Some(previous) = previous {
            previous.end = end;
        } else {
            candidates.push(TextSpan::new(start, end));
        }
        trace!(start, end, "boundary {:?}", ch);
        start = end;
    }

    BoundaryScan {
        candidates,
        tail_start: start,
    }
}

/// Why a segmentation step split where it did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitReason {
    /// Buffer was empty
    Empty,
    /// Forced flush emitted the whole buffer
    Forced,
    /// No boundary punctuation yet
    NoBoundary,
    /// Only boundary sits at the very end, waiting for a possible closing quote
    AwaitingQuote,
    /// Last candidate met the duration threshold
    LastLongEnough,
    /// Only one candidate and it is too short to speak alone
    SoleShortCandidate,
    /// Last candidate too short, held back to merge with later text
    DeferShortTail,
}

impl SplitReason {
    /// Stable name for logging
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Forced => "forced",
            Self::NoBoundary => "no_boundary",
            Self::AwaitingQuote => "awaiting_quote",
            Self::LastLongEnough => "last_long_enough",
            Self::SoleShortCandidate => "sole_short_candidate",
            Self::DeferShortTail => "defer_short_tail",
        }
    }
}

/// Where to split a buffer and why
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitDecision {
    /// Byte offset: text before it is ready, text after it is the remainder
    pub split_at: usize,
    /// Branch of the policy that chose the offset
    pub reason: SplitReason,
}

/// Decide how much of `text` is ready to speak
#[must_use]
pub fn plan_split(
    text: &str,
    config: &SegmentationConfig,
    estimator: &DurationEstimator,
    force_flush: bool,
) -> SplitDecision {
    let whole = |reason| SplitDecision {
        split_at: text.len(),
        reason,
    };
    let hold = |reason| SplitDecision {
        split_at: 0,
        reason,
    };

    if text.is_empty() {
        return hold(SplitReason::Empty);
    }
    if force_flush {
        return whole(SplitReason::Forced);
    }

    let scan = scan_boundaries(text, config);
    let mut candidates = scan.candidates.as_slice();
    let mut tail_start = scan.tail_start;

    if ends_on_boundary(text, config) {
        if let Some((open, closed)) = candidates.split_last() {
            tail_start = open.start;
            candidates = closed;
        }
    }

    let Some(last) = candidates.last() else {
        return hold(if scan.candidates.is_empty() {
            SplitReason::NoBoundary
        } else {
            SplitReason::AwaitingQuote
        });
    };

    let last_duration = estimator.estimate(last.slice(text));
    trace!(
        candidates = candidates.len(),
        last_duration,
        threshold = config.min_utterance_duration,
        "evaluating last candidate"
    );

    if last_duration >= config.min_utterance_duration {
        SplitDecision {
            split_at: tail_start,
            reason: SplitReason::LastLongEnough,
        }
    } else if candidates.len() == 1 {
        hold(SplitReason::SoleShortCandidate)
    } else {
        SplitDecision {
            split_at: last.start,
            reason: SplitReason::DeferShortTail,
        }
    }
}

/// Whether the text's final character is boundary punctuation with nothing
/// after it yet
fn ends_on_boundary(text: &str, config: &SegmentationConfig) -> bool {
    text.chars().next_back().is_some_and(|ch| is_boundary(ch, config))
}

/// Result of one segmentation step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advance {
    /// Text ready to hand to synthesis (possibly empty)
    pub ready_text: String,
    /// Text kept for the next step
    pub remainder: String,
}

impl Advance {
    /// Whether nothing is ready yet
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.ready_text.is_empty()
    }
}

/// A unit of speakable text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// The text, including its terminating punctuation and quote
    pub text: String,
    /// False for an unterminated tail emitted by a forced flush
    pub terminated: bool,
}

impl Utterance {
    /// Create a terminated utterance
    #[must_use]
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            terminated: true,
        }
    }
}

impl std::fmt::Display for Utterance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Split emitted ready text into its utterances, using the same boundary
/// and quote rules as segmentation. Trailing text without a boundary is
/// returned as a final, unterminated utterance.
#[must_use]
pub fn split_utterances(text: &str, config: &SegmentationConfig) -> Vec<Utterance> {
    let scan = scan_boundaries(text, config);
    let mut utterances: Vec<Utterance> = scan
        .candidates
        .iter()
        .map(|span| Utterance::new(span.slice(text)))
        .collect();

    if scan.tail_start < text.len() {
        utterances.push(Utterance {
            text: text[scan.tail_start..].to_string(),
            terminated: false,
        });
    }
    utterances
}

/// Stateful segmenter over one session buffer
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmentationConfig,
    estimator: DurationEstimator,
    buffer: SessionBuffer,
}

impl Segmenter {
    /// Create a segmenter with an empty buffer
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration holds a non-positive threshold
    /// or unit duration
    pub fn new(config: SegmentationConfig) -> SpeechflowResult<Self> {
        config.validate()?;
        let estimator = DurationEstimator::new(config.unit_duration_seconds)?;
        Ok(Self {
            config,
            estimator,
            buffer: SessionBuffer::new(),
        })
    }

    /// The configuration in use
    #[must_use]
    pub const fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// The duration estimator in use
    #[must_use]
    pub const fn estimator(&self) -> &DurationEstimator {
        &self.estimator
    }

    /// Text currently held back
    #[must_use]
    pub fn pending(&self) -> &str {
        self.buffer.as_str()
    }

    /// Number of characters currently held back
    #[must_use]
    pub fn pending_chars(&self) -> usize {
        self.buffer.char_count()
    }

    /// Append `chunk` and split off whatever is ready to speak.
    ///
    /// With `force_flush` the whole buffer is returned as ready text. The
    /// buffer keeps exactly the returned remainder.
    pub fn advance(&mut self, chunk: &str, force_flush: bool) -> Advance {
        self.buffer.push_str(chunk);

        let decision = plan_split(
            self.buffer.as_str(),
            &self.config,
            &self.estimator,
            force_flush,
        );
        let ready_text = self.buffer.drain_to(decision.split_at);
        let remainder = self.buffer.as_str().to_string();

        debug!(
            reason = decision.reason.as_str(),
            ready_bytes = ready_text.len(),
            remainder_bytes = remainder.len(),
            "segmentation step"
        );

        Advance {
            ready_text,
            remainder,
        }
    }

    /// Emit everything still buffered
    pub fn flush(&mut self) -> Advance {
        self.advance("", true)
    }

    /// Discard buffered text
    pub fn reset(&mut self) {
        self.buffer.take();
    }
}
