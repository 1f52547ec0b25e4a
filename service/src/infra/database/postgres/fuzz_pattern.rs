//! [`FuzzPattern`] definition.

use derive_more::Display;
use postgres_types::{FromSql, ToSql};

/// `SIMILAR TO` pattern matching any whitespace-separated word of the input.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct FuzzPattern(String);

impl FuzzPattern {
    /// Characters having a special meaning in `SIMILAR TO` patterns.
    const META: &'static [char] = &[
        '\\', '%', '|', '*', '+', '?', '{', '}', '(', ')', '[', ']', '_',
    ];

    /// Creates a new [`FuzzPattern`] out of the given `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        let mut pattern = String::with_capacity(input.len() + 8);
        pattern.push('(');
        for (i, word) in input.split_ascii_whitespace().enumerate() {
            if i > 0 {
                pattern.push('|');
            }
            pattern.push('%');
            for c in word.chars() {
                if Self::META.contains(&c) {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');
        }
        pattern.push(')');
        Self(pattern)
    }
}

#[cfg(test)]
mod spec {
    use super::FuzzPattern;

    #[test]
    fn alternates_words() {
        assert_eq!(
            FuzzPattern::new("green acres").to_string(),
            "(%green%|%acres%)",
        );
    }

    #[test]
    fn escapes_meta_characters() {
        assert_eq!(
            FuzzPattern::new("plot_12 (east)").to_string(),
            r"(%plot\_12%|%\(east\)%)",
        );
    }

    #[test]
    fn empty_input_matches_nothing() {
        assert_eq!(FuzzPattern::new("  ").to_string(), "()");
    }
}
