//! Streaming sessions: normalization plus segmentation per conversation.
//!
//! A [`StreamSession`] is the single-owner pipeline for one conversation.
//! [`SessionRegistry`] keeps many of them addressable by id; each session
//! sits behind its own mutex, so distinct sessions advance in parallel while
//! calls on the same session are serialized.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::{SpeechflowError, SpeechflowResult};
use crate::normalizer::Normalizer;
use crate::script::is_only_punctuation;
use crate::segmenter::{split_utterances, Segmenter, Utterance};

/// Normalizes raw chunks and emits ready utterances for one conversation
#[derive(Debug)]
pub struct StreamSession {
    id: Uuid,
    config: SessionConfig,
    normalizer: Normalizer,
    segmenter: Segmenter,
    /// Raw tail of the last chunk whose normalization depends on what comes
    /// next (trailing spaces, em-dashes, and digits when spelling)
    held_raw: String,
    /// Last character of the normalized stream so far
    last_char: Option<char>,
}

impl StreamSession {
    /// Create a session with a fresh id
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: SessionConfig) -> SpeechflowResult<Self> {
        Self::with_id(Uuid::new_v4(), config)
    }

    /// Create a session with a caller-chosen id
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn with_id(id: Uuid, config: SessionConfig) -> SpeechflowResult<Self> {
        config.validate()?;
        let segmenter = Segmenter::new(config.segmentation.clone())?;
        let normalizer = Normalizer::new(config.normalizer.clone());

        info!(session_id = %id, language = %config.segmentation.language, "Created stream session");

        Ok(Self {
            id,
            config,
            normalizer,
            segmenter,
            held_raw: String::new(),
            last_char: None,
        })
    }

    /// Session id
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Session configuration
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Normalized text waiting for more context
    #[must_use]
    pub fn pending(&self) -> &str {
        self.segmenter.pending()
    }

    /// Feed a raw chunk and collect the utterances that became ready
    pub fn push(&mut self, chunk: &str) -> Vec<Utterance> {
        self.step(chunk, false)
    }

    /// End of stream: emit everything still buffered
    pub fn finish(&mut self) -> Vec<Utterance> {
        self.step("", true)
    }

    fn step(&mut self, chunk: &str, end_of_stream: bool) -> Vec<Utterance> {
        let mut raw = std::mem::take(&mut self.held_raw);
        raw.push_str(chunk);

        if !end_of_stream {
            let stable = stable_prefix_len(&raw, self.config.normalizer.spell_numbers.is_some());
            self.held_raw = raw.split_off(stable);
        }

        let normalized = self.normalizer.normalize_after(&raw, self.last_char);
        if let Some(ch) = normalized.chars().last() {
            self.last_char = Some(ch);
        }

        let mut ready = self.segmenter.advance(&normalized, end_of_stream).ready_text;

        if let Some(max_chars) = self.config.max_pending_chars {
            let pending = self.segmenter.pending_chars();
            if pending > max_chars {
                warn!(
                    session_id = %self.id,
                    pending,
                    max_chars,
                    "Pending text exceeded cap, forcing flush"
                );
                ready.push_str(&self.segmenter.flush().ready_text);
            }
        }

        let utterances = self.collect_utterances(&ready);
        debug!(
            session_id = %self.id,
            chunk_bytes = chunk.len(),
            held_bytes = self.held_raw.len(),
            emitted = utterances.len(),
            pending_bytes = self.segmenter.pending().len(),
            end_of_stream,
            "Session step"
        );
        utterances
    }

    fn collect_utterances(&self, ready: &str) -> Vec<Utterance> {
        split_utterances(ready, &self.config.segmentation)
            .into_iter()
            .filter(|u| !(self.config.skip_punctuation_only && is_only_punctuation(&u.text)))
            .collect()
    }
}

/// Byte length of the part of `raw` that normalizes the same whatever
/// follows it.
///
/// The trailing run of spaces, em-dashes and (when digits are spelled)
/// ASCII digits is held back: a space is kept or dropped depending on its
/// right neighbour, `—` may pair with the next chunk's `—`, and `12` + `3`
/// is one number.
fn stable_prefix_len(raw: &str, spell_digits: bool) -> usize {
    raw.trim_end_matches(|c: char| c == ' ' || c == '—' || (spell_digits && c.is_ascii_digit()))
        .len()
}

/// Sessions addressable by id, shared across threads
#[derive(Debug)]
pub struct SessionRegistry {
    default_config: SessionConfig,
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<StreamSession>>>>,
}

impl SessionRegistry {
    /// Create a registry whose sessions default to `default_config`
    ///
    /// # Errors
    ///
    /// Returns an error if the default configuration is invalid
    pub fn new(default_config: SessionConfig) -> SpeechflowResult<Self> {
        default_config.validate()?;
        Ok(Self {
            default_config,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// Start a session with the default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be built
    pub fn create(&self) -> SpeechflowResult<Uuid> {
        self.create_with(self.default_config.clone())
    }

    /// Start a session with its own configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn create_with(&self, config: SessionConfig) -> SpeechflowResult<Uuid> {
        let session = StreamSession::new(config)?;
        let id = session.id();
        self.sessions.write().insert(id, Arc::new(Mutex::new(session)));
        Ok(id)
    }

    /// Feed a chunk to a session
    ///
    /// # Errors
    ///
    /// Returns an error if no session has this id
    pub fn push(&self, id: &Uuid, chunk: &str) -> SpeechflowResult<Vec<Utterance>> {
        let session = self.get(id)?;
        let utterances = session.lock().push(chunk);
        Ok(utterances)
    }

    /// Flush a session and remove it
    ///
    /// # Errors
    ///
    /// Returns an error if no session has this id
    pub fn finish(&self, id: &Uuid) -> SpeechflowResult<Vec<Utterance>> {
        let session = self
            .sessions
            .write()
            .remove(id)
            .ok_or_else(|| SpeechflowError::session_not_found(id.to_string()))?;
        let utterances = session.lock().finish();
        info!(session_id = %id, "Finished stream session");
        Ok(utterances)
    }

    /// Drop a session without flushing; returns whether it existed
    pub fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().remove(id).is_some();
        if removed {
            info!(session_id = %id, "Removed stream session");
        }
        removed
    }

    /// Whether a session with this id is live
    #[must_use]
    pub fn contains(&self, id: &Uuid) -> bool {
        self.sessions.read().contains_key(id)
    }

    /// Number of live sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether no session is live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    fn get(&self, id: &Uuid) -> SpeechflowResult<Arc<Mutex<StreamSession>>> {
        self.sessions
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| SpeechflowError::session_not_found(id.to_string()))
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self {
            default_config: SessionConfig::default(),
            sessions: RwLock::new(HashMap::new()),
        }
    }
}
