//! Attribute-list tokenizer.
//!
//! A three-state scanner over everything that follows the element name
//! inside a tag. It tolerates garbage: when no state matches, it
//! discards input up to the next parseable boundary and starts over. Every
//! loop arm consumes at least one byte of the remaining input, which is
//! what guarantees termination on adversarial input.

use smallvec::SmallVec;

use crate::policy::AllowedProtocols;

use super::protocol::bad_protocol;
use super::{is_space, leading_ws};

/// One parsed attribute.
///
/// `whole` is the exact `name="value"` (or bare `name`) fragment to emit if
/// the attribute survives validation. It is kept separate from `value`
/// because reconstruction re-quotes: bare values gain synthetic double
/// quotes so the output always parses cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrToken {
    pub name: String,
    pub value: String,
    pub whole: String,
}

pub type AttrTokens = SmallVec<[AttrToken; 8]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Expect an attribute name, `href` for instance.
    Name,
    /// After a name: `=` introduces a value, whitespace ends a bare
    /// attribute like `selected`.
    PostName,
    /// Expect a double-quoted, single-quoted, or bare value.
    Value,
}

/// Split a raw attribute list into tokens, filtering every value through
/// the protocol whitelist.
pub fn tokenize_attrs(attr: &str, protocols: &AllowedProtocols) -> AttrTokens {
    let mut tokens = AttrTokens::new();
    let mut rest = attr;
    let mut mode = Mode::Name;
    let mut name = String::new();

    while !rest.is_empty() {
        let mut matched = true;

        match mode {
            Mode::Name => {
                let len = rest
                    .bytes()
                    .take_while(|&b| b == b'-' || b.is_ascii_alphabetic())
                    .count();
                if len > 0 {
                    name = rest[..len].to_string();
                    rest = &rest[len..];
                    mode = Mode::PostName;
                } else {
                    matched = false;
                }
            }
            Mode::PostName => {
                let ws = leading_ws(rest);
                if rest[ws..].starts_with('=') {
                    let after_eq = ws + 1;
                    rest = &rest[after_eq + leading_ws(&rest[after_eq..])..];
                    mode = Mode::Value;
                } else if ws > 0 {
                    // Bare attribute: emit with an empty value.
                    tokens.push(AttrToken {
                        name: name.clone(),
                        value: String::new(),
                        whole: name.clone(),
                    });
                    rest = &rest[ws..];
                    mode = Mode::Name;
                } else {
                    matched = false;
                }
            }
            Mode::Value => {
                if let Some((raw, consumed)) = match_quoted(rest, b'"') {
                    let value = bad_protocol(raw, protocols);
                    tokens.push(AttrToken {
                        whole: format!("{name}=\"{value}\""),
                        name: name.clone(),
                        value,
                    });
                    rest = &rest[consumed..];
                    mode = Mode::Name;
                } else if let Some((raw, consumed)) = match_quoted(rest, b'\'') {
                    let value = bad_protocol(raw, protocols);
                    tokens.push(AttrToken {
                        whole: format!("{name}='{value}'"),
                        name: name.clone(),
                        value,
                    });
                    rest = &rest[consumed..];
                    mode = Mode::Name;
                } else if let Some((raw, consumed)) = match_bare(rest) {
                    let value = bad_protocol(raw, protocols);
                    // Synthetic quotes so the output conforms regardless of
                    // the input's quoting style.
                    tokens.push(AttrToken {
                        whole: format!("{name}=\"{value}\""),
                        name: name.clone(),
                        value,
                    });
                    rest = &rest[consumed..];
                    mode = Mode::Name;
                } else {
                    matched = false;
                }
            }
        }

        if !matched {
            // Not well formed: discard up to the next parseable boundary
            // and try again.
            rest = skip_malformed(rest);
            mode = Mode::Name;
        }
    }

    // The list ended right after a valueless attribute like `selected`.
    if mode == Mode::PostName {
        tokens.push(AttrToken {
            value: String::new(),
            whole: name.clone(),
            name,
        });
    }

    tokens
}

/// `"value"` or `'value'`, which must be followed by whitespace or end of
/// input. Returns the inner value and the total bytes consumed including
/// the trailing whitespace.
fn match_quoted(s: &str, quote: u8) -> Option<(&str, usize)> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&quote) {
        return None;
    }
    let close_rel = bytes[1..].iter().position(|&b| b == quote)?;
    let close = close_rel + 1;
    let after = close + 1;
    let ws = leading_ws(&s[after..]);
    if after + ws < s.len() && ws == 0 {
        return None;
    }
    Some((&s[1..close], after + ws))
}

/// An unquoted run of non-whitespace, non-quote bytes, followed by
/// whitespace or end of input.
fn match_bare(s: &str) -> Option<(&str, usize)> {
    let bytes = s.as_bytes();
    let len = bytes
        .iter()
        .take_while(|&&b| !is_space(b) && b != b'"' && b != b'\'')
        .count();
    if len == 0 {
        return None;
    }
    let ws = leading_ws(&s[len..]);
    if len + ws < s.len() && ws == 0 {
        return None;
    }
    Some((&s[..len], len + ws))
}

/// Malformed-input recovery: drop a run of quoted spans and stray bytes,
/// then the whitespace that ends it. An unterminated quote swallows the
/// rest of the input, so ambiguous fragments fail closed.
fn skip_malformed(s: &str) -> &str {
    let mut rest = s;
    loop {
        let bytes = rest.as_bytes();
        match bytes.first() {
            Some(b'"') | Some(b'\'') => {
                let quote = bytes[0];
                rest = match bytes[1..].iter().position(|&b| b == quote) {
                    Some(rel) => &rest[rel + 2..],
                    None => "",
                };
            }
            Some(&b) if !is_space(b) => {
                let mut i = 1;
                while i < rest.len() && !rest.is_char_boundary(i) {
                    i += 1;
                }
                rest = &rest[i..];
            }
            _ => break,
        }
    }
    &rest[leading_ws(rest)..]
}
