//! Script classification for duration estimation and routing.
//!
//! Only three categories matter to the engine: Han ideographs, Japanese
//! kana, and runs of ASCII letters. Everything else (digits, punctuation,
//! other scripts) is left unclassified.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches strings made only of punctuation and symbol characters (or empty).
static PUNCTUATION_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{P}\p{S}]*$").unwrap());

/// Script category of a single character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptClass {
    /// CJK Unified Ideograph (U+4E00..=U+9FFF)
    Ideograph,
    /// Hiragana or Katakana (U+3040..=U+30FF)
    Kana,
    /// ASCII letter, part of a Latin word
    Latin,
}

/// Per-script unit counts over a span of text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptCounts {
    /// Number of Han ideographs
    pub ideographs: usize,
    /// Number of kana characters
    pub kana: usize,
    /// Number of maximal ASCII-letter runs
    pub latin_words: usize,
}

impl ScriptCounts {
    /// Whether no classified unit was found
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ideographs == 0 && self.kana == 0 && self.latin_words == 0
    }
}

/// Classify one character
#[must_use]
pub fn classify_char(ch: char) -> Option<ScriptClass> {
    if is_ideograph(ch) {
        Some(ScriptClass::Ideograph)
    } else if is_kana(ch) {
        Some(ScriptClass::Kana)
    } else if ch.is_ascii_alphabetic() {
        Some(ScriptClass::Latin)
    } else {
        None
    }
}

/// Count ideographs, kana and Latin words in a span.
///
/// A Latin word is a maximal run of ASCII letters; any other character
/// (including digits and CJK) ends the run.
#[must_use]
pub fn count_scripts(text: &str) -> ScriptCounts {
    let mut counts = ScriptCounts::default();
    let mut in_word = false;

    for ch in text.chars() {
        match classify_char(ch) {
            Some(ScriptClass::Latin) => {
                if !in_word {
                    counts.latin_words += 1;
                    in_word = true;
                }
                continue;
            }
            Some(ScriptClass::Ideograph) => counts.ideographs += 1,
            Some(ScriptClass::Kana) => counts.kana += 1,
            None => {}
        }
        in_word = false;
    }

    counts
}

/// Whether the text contains at least one Chinese ideograph
#[must_use]
pub fn contains_chinese(text: &str) -> bool {
    text.chars().any(is_ideograph)
}

/// Whether the text, once trimmed, is empty or made only of punctuation
/// and symbol characters.
///
/// Callers use this to skip synthesis of leftovers such as `"。"` or `"…"`.
#[must_use]
pub fn is_only_punctuation(text: &str) -> bool {
    PUNCTUATION_ONLY.is_match(text.trim())
}

fn is_ideograph(ch: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&ch)
}

fn is_kana(ch: char) -> bool {
    ('\u{3040}'..='\u{30FF}').contains(&ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_char() {
        assert_eq!(classify_char('你'), Some(ScriptClass::Ideograph));
        assert_eq!(classify_char('ひ'), Some(ScriptClass::Kana));
        assert_eq!(classify_char('カ'), Some(ScriptClass::Kana));
        assert_eq!(classify_char('a'), Some(ScriptClass::Latin));
        assert_eq!(classify_char('Z'), Some(ScriptClass::Latin));
        assert_eq!(classify_char('7'), None);
        assert_eq!(classify_char('。'), None);
        assert_eq!(classify_char('é'), None);
        assert_eq!(classify_char('한'), None);
    }

    #[test]
    fn test_count_scripts_mixed() {
        let counts = count_scripts("我用 Rust 写 hello-world こんにちは");
        assert_eq!(counts.ideographs, 3);
        assert_eq!(counts.latin_words, 3);
        assert_eq!(counts.kana, 5);
    }

    #[test]
    fn test_latin_words_split_on_non_letters() {
        assert_eq!(count_scripts("abc123def").latin_words, 2);
        assert_eq!(count_scripts("hello你好").latin_words, 1);
        assert_eq!(count_scripts("   ").latin_words, 0);
    }

    #[test]
    fn test_empty_counts() {
        assert!(count_scripts("").is_empty());
        assert!(count_scripts("123，。!?").is_empty());
        assert!(!count_scripts("a").is_empty());
    }

    #[test]
    fn test_contains_chinese() {
        assert!(contains_chinese("hello 世界"));
        assert!(!contains_chinese("hello world"));
        assert!(!contains_chinese("こんにちは"));
        assert!(!contains_chinese(""));
    }

    #[test]
    fn test_is_only_punctuation() {
        assert!(is_only_punctuation(""));
        assert!(is_only_punctuation("   "));
        assert!(is_only_punctuation("。"));
        assert!(is_only_punctuation(" ?! "));
        assert!(is_only_punctuation("……——"));
        assert!(is_only_punctuation("$+"));
        assert!(!is_only_punctuation("好。"));
        assert!(!is_only_punctuation("a."));
        assert!(!is_only_punctuation("1"));
        assert!(!is_only_punctuation("。 。"));
    }
}
