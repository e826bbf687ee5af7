//! URI references (RFC 3986), absolute or relative
//!
//! `url::Url` only holds absolute URLs, while a `uri` field may also hold a
//! relative reference such as `../static/logo.png` or `#top`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// RFC 3986 appendix B: scheme, authority, path, query, fragment
static REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([^:/?#]+):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .expect("valid URI reference regex")
});

static SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*$").expect("valid scheme regex"));

/// A validated URI reference, kept exactly as written
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uri {
    text: String,
    scheme_len: Option<usize>,
}

impl Uri {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme_len.map(|len| &self.text[..len])
    }

    /// Whether the reference carries a scheme
    pub fn is_absolute(&self) -> bool {
        self.scheme_len.is_some()
    }
}

impl FromStr for Uri {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = REFERENCE
            .captures(s)
            .ok_or_else(|| format!("malformed URI reference: {}", s))?;

        let scheme = caps.get(1).map(|m| m.as_str());
        if let Some(scheme) = scheme {
            if !SCHEME.is_match(scheme) {
                return Err(format!("illegal character in scheme name at index 0: {}", s));
            }
        }

        for (index, c) in s.char_indices() {
            if !is_uri_char(c) {
                return Err(format!("illegal character at index {}: {}", index, s));
            }
        }
        check_escapes(s)?;

        if let Some(fragment) = caps.get(5) {
            if let Some(offset) = fragment.as_str().find('#') {
                return Err(format!("illegal character in fragment at index {}: {}", fragment.start() + offset, s));
            }
        }

        let authority_range = caps.get(2).map(|m| m.range());
        for (index, c) in s.char_indices() {
            let in_authority = authority_range.as_ref().is_some_and(|range| range.contains(&index));
            if (c == '[' || c == ']') && !in_authority {
                return Err(format!("illegal character at index {}: {}", index, s));
            }
        }

        Ok(Uri {
            text: s.to_string(),
            scheme_len: scheme.map(str::len),
        })
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Unreserved, reserved, `%`, or any non-ASCII character that is not a control or space
fn is_uri_char(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphanumeric() || "-._~:/?#[]@!$&'()*+,;=%".contains(c)
    } else {
        !c.is_control() && !c.is_whitespace()
    }
}

/// Every `%` must start a two-digit hex escape
fn check_escapes(s: &str) -> Result<(), String> {
    let bytes = s.as_bytes();
    for (index, &b) in bytes.iter().enumerate() {
        if b == b'%' {
            let valid = bytes.get(index + 1..index + 3).is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(format!("malformed escape pair at index {}: {}", index, s));
            }
        }
    }
    Ok(())
}
