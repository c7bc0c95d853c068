//! Cardinal number spelling for digit runs.
//!
//! English output follows the common "inflect" rendering
//! (`1234` -> `one thousand, two hundred and thirty-four`); Chinese output
//! uses 万/亿 grouping with the usual 零 rules (`10010` -> `一万零一十`).

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::SpeechflowError;

const EN_ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const EN_TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const EN_SCALES: [&str; 7] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
];

const ZH_DIGITS: [char; 10] = ['零', '一', '二', '三', '四', '五', '六', '七', '八', '九'];

const ZH_SECTION_UNITS: [&str; 4] = ["千", "百", "十", ""];

/// Locale used when spelling digit runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberLocale {
    /// English cardinal words
    #[serde(rename = "en", alias = "english")]
    English,
    /// Chinese cardinal characters
    #[serde(rename = "zh", alias = "chinese")]
    Chinese,
}

impl NumberLocale {
    /// Spell a run of ASCII digits.
    ///
    /// Runs with a leading zero, or too long for a `u64`, are read digit by
    /// digit. Input that is not all ASCII digits is returned unchanged.
    #[must_use]
    pub fn spell(&self, digits: &str) -> String {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return digits.to_string();
        }

        let literal = digits.len() > 1 && digits.starts_with('0');
        match digits.parse::<u64>() {
            Ok(n) if !literal => match self {
                Self::English => english_cardinal(n),
                Self::Chinese => chinese_cardinal(n),
            },
            _ => self.spell_digit_by_digit(digits),
        }
    }

    fn spell_digit_by_digit(&self, digits: &str) -> String {
        let values = digits.bytes().map(|b| usize::from(b - b'0'));
        match self {
            Self::English => values.map(|d| EN_ONES[d]).collect::<Vec<_>>().join(" "),
            Self::Chinese => values.map(|d| ZH_DIGITS[d]).collect(),
        }
    }
}

impl FromStr for NumberLocale {
    type Err = SpeechflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "zh" | "chinese" => Ok(Self::Chinese),
            _ => Err(SpeechflowError::invalid_configuration(format!(
                "Unknown number locale '{s}', expected 'en' or 'zh'"
            ))),
        }
    }
}

/// English words for `n`
#[must_use]
pub fn english_cardinal(n: u64) -> String {
    if n == 0 {
        return EN_ONES[0].to_string();
    }

    let mut groups = Vec::new();
    let mut remaining = n;
    while remaining > 0 {
        groups.push((remaining % 1000) as usize);
        remaining /= 1000;
    }

    let mut parts: Vec<String> = Vec::new();
    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        let mut words = english_below_thousand(group);
        if scale > 0 {
            words.push(' ');
            words.push_str(EN_SCALES[scale]);
        }
        parts.push(words);
    }

    // "one thousand and one": a trailing group below a hundred is joined with "and"
    let last_group = groups[0];
    if parts.len() > 1 && last_group > 0 && last_group < 100 {
        let tail = parts.pop().unwrap_or_default();
        format!("{} and {tail}", parts.join(", "))
    } else {
        parts.join(", ")
    }
}

fn english_below_thousand(n: usize) -> String {
    let hundreds = n / 100;
    let rest = n % 100;

    let rest_words = if rest == 0 {
        None
    } else if rest < 20 {
        Some(EN_ONES[rest].to_string())
    } else if rest % 10 == 0 {
        Some(EN_TENS[rest / 10].to_string())
    } else {
        Some(format!("{}-{}", EN_TENS[rest / 10], EN_ONES[rest % 10]))
    };

    match (hundreds, rest_words) {
        (0, Some(words)) => words,
        (h, None) => format!("{} hundred", EN_ONES[h]),
        (h, Some(words)) => format!("{} hundred and {words}", EN_ONES[h]),
    }
}

/// Chinese characters for `n`
#[must_use]
pub fn chinese_cardinal(n: u64) -> String {
    if n == 0 {
        return ZH_DIGITS[0].to_string();
    }
    let words = chinese_grouped(n);
    // 10..=19 at the head of a number are read 十, 十五 rather than 一十
    match words.strip_prefix("一十") {
        Some(rest) => format!("十{rest}"),
        None => words,
    }
}

fn chinese_grouped(n: u64) -> String {
    if n >= 100_000_000 {
        chinese_split(n, 100_000_000, "亿")
    } else if n >= 10_000 {
        chinese_split(n, 10_000, "万")
    } else {
        chinese_section(n)
    }
}

fn chinese_split(n: u64, base: u64, unit: &str) -> String {
    let high = n / base;
    let low = n % base;

    let mut words = chinese_grouped(high);
    words.push_str(unit);
    if low > 0 {
        if low < base / 10 {
            words.push(ZH_DIGITS[0]);
        }
        words.push_str(&chinese_grouped(low));
    }
    words
}

/// Spell 1..=9999
fn chinese_section(n: u64) -> String {
    let digits = [n / 1000 % 10, n / 100 % 10, n / 10 % 10, n % 10];

    let mut words = String::new();
    let mut pending_zero = false;
    for (digit, unit) in digits.iter().zip(ZH_SECTION_UNITS) {
        if *digit == 0 {
            pending_zero = !words.is_empty();
            continue;
        }
        if pending_zero {
            words.push(ZH_DIGITS[0]);
            pending_zero = false;
        }
        words.push(ZH_DIGITS[*digit as usize]);
        words.push_str(unit);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "zero")]
    #[case(7, "seven")]
    #[case(13, "thirteen")]
    #[case(40, "forty")]
    #[case(42, "forty-two")]
    #[case(100, "one hundred")]
    #[case(105, "one hundred and five")]
    #[case(1000, "one thousand")]
    #[case(1001, "one thousand and one")]
    #[case(1100, "one thousand, one hundred")]
    #[case(1234, "one thousand, two hundred and thirty-four")]
    #[case(2_000_050, "two million and fifty")]
    #[case(1_000_000_000, "one billion")]
    fn test_english_cardinal(#[case] n: u64, #[case] expected: &str) {
        assert_eq!(english_cardinal(n), expected);
    }

    #[rstest]
    #[case(0, "零")]
    #[case(5, "五")]
    #[case(10, "十")]
    #[case(15, "十五")]
    #[case(20, "二十")]
    #[case(105, "一百零五")]
    #[case(110, "一百一十")]
    #[case(1001, "一千零一")]
    #[case(1010, "一千零一十")]
    #[case(10_010, "一万零一十")]
    #[case(100_000, "十万")]
    #[case(120_000, "十二万")]
    #[case(1_001_000, "一百万一千")]
    #[case(100_010_000, "一亿零一万")]
    #[case(110_000_000, "一亿一千万")]
    #[case(1_000_100_000_000, "一万零一亿")]
    fn test_chinese_cardinal(#[case] n: u64, #[case] expected: &str) {
        assert_eq!(chinese_cardinal(n), expected);
    }

    #[test]
    fn test_leading_zero_reads_digits() {
        assert_eq!(NumberLocale::English.spell("007"), "zero zero seven");
        assert_eq!(NumberLocale::Chinese.spell("0086"), "零零八六");
        assert_eq!(NumberLocale::English.spell("0"), "zero");
    }

    #[test]
    fn test_overflow_reads_digits() {
        let digits = "123456789012345678901234";
        let spelled = NumberLocale::Chinese.spell(digits);
        assert_eq!(spelled.chars().count(), digits.len());
        assert!(spelled.starts_with("一二三"));
    }

    #[test]
    fn test_non_digits_unchanged() {
        assert_eq!(NumberLocale::English.spell("12a"), "12a");
        assert_eq!(NumberLocale::English.spell(""), "");
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!("en".parse::<NumberLocale>().unwrap(), NumberLocale::English);
        assert_eq!("Chinese".parse::<NumberLocale>().unwrap(), NumberLocale::Chinese);
        assert!("de".parse::<NumberLocale>().is_err());
    }
}
