//! Delimited-value tokenizer
//!
//! Splits on exact occurrences of a single delimiter. There is no escaping,
//! quoting or trimming, so element values cannot contain the delimiter.

use std::iter::FusedIterator;
use std::str::Split;

/// Lazy sequence of tokens; clone it (or call [`Tokens::restart`]) to iterate again
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    input: &'a str,
    delimiter: char,
    inner: Split<'a, char>,
}

impl<'a> Tokens<'a> {
    /// A fresh iterator over the same input
    pub fn restart(&self) -> Tokens<'a> {
        tokenize(self.input, self.delimiter)
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.inner.next()
    }
}

impl FusedIterator for Tokens<'_> {}

/// Split `input` on every `delimiter`
///
/// An empty input yields one empty token and a trailing delimiter yields a
/// trailing empty token.
pub fn tokenize(input: &str, delimiter: char) -> Tokens<'_> {
    Tokens {
        input,
        delimiter,
        inner: input.split(delimiter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_one_empty_token() {
        assert_eq!(tokenize("", ',').collect::<Vec<_>>(), vec![""]);
    }

    #[test]
    fn test_trailing_delimiter() {
        assert_eq!(tokenize("a,b,", ',').collect::<Vec<_>>(), vec!["a", "b", ""]);
    }

    #[test]
    fn test_no_trimming_or_escaping() {
        assert_eq!(tokenize(" a ,\\,b", ',').collect::<Vec<_>>(), vec![" a ", "\\", "b"]);
        assert_eq!(tokenize("DAYS:1", ':').collect::<Vec<_>>(), vec!["DAYS", "1"]);
    }

    #[test]
    fn test_restartable() {
        let mut tokens = tokenize("x;y;z", ';');
        assert_eq!(tokens.next(), Some("x"));
        assert_eq!(tokens.restart().count(), 3);
        assert_eq!(tokens.clone().collect::<Vec<_>>(), vec!["y", "z"]);
        assert_eq!(tokens.count(), 2);
    }

    #[test]
    fn test_fused_after_exhaustion() {
        let mut tokens = tokenize("a", ',');
        assert_eq!(tokens.next(), Some("a"));
        assert_eq!(tokens.next(), None);
        assert_eq!(tokens.next(), None);
    }
}
