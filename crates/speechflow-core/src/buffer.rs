//! Per-session text buffer and spans over it.

/// Byte range into a [`SessionBuffer`] (or any text it was scanned from)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextSpan {
    /// Start byte offset, inclusive
    pub start: usize,
    /// End byte offset, exclusive
    pub end: usize,
}

impl TextSpan {
    /// Create a span
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slice the text this span was taken from
    #[must_use]
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Unconsumed text of one session.
///
/// Owned by exactly one segmenter; grows on every chunk and shrinks to the
/// remainder after every segmentation step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionBuffer {
    text: String,
}

impl SessionBuffer {
    /// Create an empty buffer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Append a chunk
    pub fn push_str(&mut self, chunk: &str) {
        self.text.push_str(chunk);
    }

    /// Current content
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Length in characters
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the buffer holds no text
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Remove and return everything before `offset`, keeping the rest.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is not on a character boundary
    pub fn drain_to(&mut self, offset: usize) -> String {
        let remainder = self.text.split_off(offset);
        std::mem::replace(&mut self.text, remainder)
    }

    /// Remove and return all content
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}
