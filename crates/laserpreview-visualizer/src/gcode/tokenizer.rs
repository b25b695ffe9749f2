//! G-code word tokenizer
//!
//! Lines are split on whitespace into letter-prefixed words such as `G1`,
//! `X12.5` or `S255`. Parsing is best effort: the numeric part is read
//! like C's `atof`, so trailing garbage is ignored and an unreadable number
//! is zero.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// A single letter-prefixed G-code word
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Word {
    /// Upper-cased address letter
    pub letter: char,
    /// Numeric argument, zero when unreadable
    pub value: f64,
}

/// Remove `;` comments and `( ... )` remarks from a line
pub fn strip_comments(line: &str) -> Cow<'_, str> {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = COMMENT_REGEX
        .get_or_init(|| Regex::new(r"\([^)]*\)?|;.*").expect("invalid regex pattern"));
    regex.replace_all(line, " ")
}

/// Words of a comment-free line, in order
pub fn words(line: &str) -> impl Iterator<Item = Word> + '_ {
    line.split_whitespace().filter_map(|token| {
        let mut chars = token.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        Some(Word {
            letter,
            value: parse_leading_f64(chars.as_str()),
        })
    })
}

/// Parse the longest numeric prefix of `s`, or zero if there is none
pub fn parse_leading_f64(s: &str) -> f64 {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        let frac_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        digits += end - frac_start;
    }
    if digits == 0 {
        return 0.0;
    }

    // Only take the exponent when it is complete.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_digits = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_digits {
            end = exp;
        }
    }

    match s[..end].parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_number() {
        assert_eq!(parse_leading_f64("12.5"), 12.5);
        assert_eq!(parse_leading_f64("-3"), -3.0);
        assert_eq!(parse_leading_f64("+.5"), 0.5);
        assert_eq!(parse_leading_f64("7."), 7.0);
        assert_eq!(parse_leading_f64("10abc"), 10.0);
        assert_eq!(parse_leading_f64("1e3"), 1000.0);
        assert_eq!(parse_leading_f64("2e"), 2.0);
        assert_eq!(parse_leading_f64("2e+x"), 2.0);
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(parse_leading_f64(""), 0.0);
        assert_eq!(parse_leading_f64("abc"), 0.0);
        assert_eq!(parse_leading_f64("-"), 0.0);
        assert_eq!(parse_leading_f64("."), 0.0);
        assert_eq!(parse_leading_f64("1e999"), 0.0);
        assert_eq!(parse_leading_f64("-1e999"), 0.0);
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("G1 X10 ; move").trim(), "G1 X10");
        assert_eq!(
            strip_comments("G1 (burn) X10 (fast)").split_whitespace().collect::<Vec<_>>(),
            vec!["G1", "X10"]
        );
        assert_eq!(strip_comments("(unterminated X5").trim(), "");
        assert_eq!(strip_comments("M5"), "M5");
    }

    #[test]
    fn test_words_uppercase_letters() {
        let parsed: Vec<Word> = words("g1 x10.5 y-2 s128").collect();
        assert_eq!(
            parsed,
            vec![
                Word { letter: 'G', value: 1.0 },
                Word { letter: 'X', value: 10.5 },
                Word { letter: 'Y', value: -2.0 },
                Word { letter: 'S', value: 128.0 },
            ]
        );
    }

    #[test]
    fn test_words_bad_number_defaults_to_zero() {
        let parsed: Vec<Word> = words("Xfoo").collect();
        assert_eq!(parsed, vec![Word { letter: 'X', value: 0.0 }]);
    }
}
