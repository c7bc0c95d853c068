//! Stateless rewrite passes applied to incoming text.
//!
//! Every pass is a pure function of its input and may be run on any
//! fragment independently. Pattern tables are compiled once per process.

use once_cell::sync::Lazy;
use regex::Regex;

use super::numbers::NumberLocale;

/// Typographic symbols and their spoken form.
///
/// No replacement may itself contain a key, so application order is irrelevant.
pub const SYMBOL_TABLE: &[(&str, &str)] = &[("²", "平方"), ("³", "立方")];

/// Parenthetical asides, removed with their content (non-greedy, single line).
static PARENTHETICAL_PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"\(.*?\)").unwrap(),
        Regex::new(r"（.*?）").unwrap(),
    ]
});

/// Decoration characters dropped outright, after parentheticals are gone.
const DECORATION_CHARS: &[char] = &['【', '】', '《', '》', '`'];

/// Unpaired parentheses left over once parentheticals are removed.
const STRAY_PARENS: &[char] = &['（', '）', '(', ')'];

const DOUBLE_EM_DASH: &str = "——";

/// Replace typographic symbols with their spoken equivalent
#[must_use]
pub fn substitute_symbols(text: &str) -> String {
    SYMBOL_TABLE
        .iter()
        .fold(text.to_string(), |acc, (symbol, spoken)| {
            if acc.contains(symbol) {
                acc.replace(symbol, spoken)
            } else {
                acc
            }
        })
}

/// Remove visual-only brackets and quote decorations.
///
/// Each rule is a single non-recursive pass: in `((a))` the first match
/// runs up to the first `)`, and the leftover `)` goes as a stray parenthesis.
#[must_use]
pub fn strip_brackets(text: &str) -> String {
    let mut result = text.to_string();
    for pattern in PARENTHETICAL_PATTERNS.iter() {
        result = pattern.replace_all(&result, "").into_owned();
    }
    result.retain(|c| !DECORATION_CHARS.contains(&c));
    let mut result = result.replace(DOUBLE_EM_DASH, " ");
    result.retain(|c| !STRAY_PARENS.contains(&c));
    result
}

/// Drop spaces that are not between two non-space ASCII characters.
///
/// `"你好 hello world 再见"` becomes `"你好hello world再见"`: the space
/// inside the Latin phrase survives, the ones touching CJK do not.
#[must_use]
pub fn collapse_blanks(text: &str) -> String {
    collapse_blanks_after(text, None)
}

/// [`collapse_blanks`] with a known left neighbour for the first character.
///
/// Streaming callers pass the last character of the previously emitted
/// fragment so that a space opening this fragment is judged in context.
#[must_use]
pub fn collapse_blanks_after(text: &str, previous: Option<char>) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());

    for (i, &ch) in chars.iter().enumerate() {
        if ch != ' ' {
            result.push(ch);
            continue;
        }

        let left = if i == 0 { previous } else { Some(chars[i - 1]) };
        let right = chars.get(i + 1).copied();
        if left.is_some_and(is_solid_ascii) && right.is_some_and(is_solid_ascii) {
            result.push(ch);
        }
    }

    result
}

/// Replace each maximal run of ASCII digits with its cardinal reading
#[must_use]
pub fn spell_digits(text: &str, locale: NumberLocale) -> String {
    let mut result = String::with_capacity(text.len());
    let mut run_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_ascii_digit() {
            run_start.get_or_insert(idx);
            continue;
        }
        if let Some(start) = run_start.take() {
            result.push_str(&locale.spell(&text[start..idx]));
        }
        result.push(ch);
    }
    if let Some(start) = run_start {
        result.push_str(&locale.spell(&text[start..]));
    }

    result
}

fn is_solid_ascii(ch: char) -> bool {
    ch.is_ascii() && ch != ' '
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_symbols() {
        assert_eq!(substitute_symbols("面积10m²"), "面积10m平方");
        assert_eq!(substitute_symbols("体积5m³，2m²"), "体积5m立方，2m平方");
        assert_eq!(substitute_symbols("nothing here"), "nothing here");
    }

    #[test]
    fn test_symbol_table_is_order_independent() {
        for (_, spoken) in SYMBOL_TABLE {
            for (symbol, _) in SYMBOL_TABLE {
                assert!(!spoken.contains(symbol));
            }
        }
    }

    #[test]
    fn test_strip_full_width_parenthetical() {
        assert_eq!(strip_brackets("测试（删除）完成"), "测试完成");
    }

    #[test]
    fn test_strip_half_width_parenthetical() {
        assert_eq!(strip_brackets("hello (aside) world"), "hello  world");
        assert_eq!(strip_brackets("a(1)b(2)c"), "abc");
    }

    #[test]
    fn test_strip_decorations() {
        assert_eq!(strip_brackets("【公告】《三体》很好看"), "公告三体很好看");
        assert_eq!(strip_brackets("run `cargo` now"), "run cargo now");
        assert_eq!(strip_brackets("他——我们的朋友"), "他 我们的朋友");
    }

    #[test]
    fn test_strip_is_single_pass() {
        assert_eq!(strip_brackets("x((y))z"), "xz");
        assert_eq!(strip_brackets("open (never closed"), "open never closed");
        assert_eq!(strip_brackets("stray）paren"), "strayparen");
    }

    #[test]
    fn test_parenthetical_does_not_span_lines() {
        assert_eq!(strip_brackets("(a\nb)"), "a\nb");
    }

    #[test]
    fn test_collapse_blanks() {
        assert_eq!(collapse_blanks("你好 world 再见"), "你好world再见");
        assert_eq!(collapse_blanks("你好 hello world 再见"), "你好hello world再见");
        assert_eq!(collapse_blanks("a  b"), "ab");
        assert_eq!(collapse_blanks(" lead and trail "), "lead and trail");
        assert_eq!(collapse_blanks("1 + 2"), "1 + 2");
        assert_eq!(collapse_blanks(""), "");
    }

    #[test]
    fn test_collapse_blanks_with_context() {
        assert_eq!(collapse_blanks_after(" world", Some('o')), " world");
        assert_eq!(collapse_blanks_after(" world", Some('好')), "world");
        assert_eq!(collapse_blanks_after(" world", None), "world");
    }

    #[test]
    fn test_spell_digits() {
        assert_eq!(spell_digits("我有3个苹果", NumberLocale::Chinese), "我有三个苹果");
        assert_eq!(
            spell_digits("room 101, floor 7", NumberLocale::English),
            "room one hundred and one, floor seven"
        );
        assert_eq!(spell_digits("2024年", NumberLocale::Chinese), "二千零二十四年");
        assert_eq!(spell_digits("no digits", NumberLocale::English), "no digits");
    }

    #[test]
    fn test_spell_digits_is_idempotent() {
        let once = spell_digits("共12项，第3项", NumberLocale::Chinese);
        assert_eq!(spell_digits(&once, NumberLocale::Chinese), once);
        assert!(!once.chars().any(|c| c.is_ascii_digit()));
    }
}
