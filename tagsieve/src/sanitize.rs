//! The sanitization pipeline.
//!
//! Raw input flows one way: NUL stripping, legacy JS-entity stripping,
//! entity normalization, optional caller hook, then a tag-by-tag scan that
//! rebuilds every allowed tag and drops everything else. No stage holds
//! state across calls; the policy and protocol set are read-only inputs.

pub use self::entities::{decode_entities, normalize_entities};
pub use self::protocol::bad_protocol;
pub use self::tokenizer::{tokenize_attrs, AttrToken, AttrTokens};

mod entities;
mod protocol;
mod tag;
mod tokenizer;

#[cfg(test)]
mod tests;

use crate::policy::{AllowedProtocols, Policy};

type Hook = Box<dyn Fn(String) -> String + Send + Sync>;

/// A configured sanitizer: policy, protocol whitelist, and an optional
/// post-normalization hook.
///
/// Cheap to share: sanitization never mutates the sanitizer, so one
/// instance can serve any number of threads.
pub struct Sanitizer {
    policy: Policy,
    protocols: AllowedProtocols,
    hook: Option<Hook>,
}

impl Sanitizer {
    /// A sanitizer over `policy` with the default protocol whitelist.
    pub fn new(policy: Policy) -> Self {
        Sanitizer {
            policy,
            protocols: AllowedProtocols::default(),
            hook: None,
        }
    }

    pub fn with_protocols(mut self, protocols: AllowedProtocols) -> Self {
        self.protocols = protocols;
        self
    }

    /// Install a hook that runs between entity normalization and the tag
    /// scan. Identity when unset; meant for callers that post-process the
    /// normalized text before filtering.
    pub fn with_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Run the full pipeline over one input string.
    pub fn sanitize(&self, input: &str) -> String {
        let stripped = no_null(input);
        let stripped = strip_js_entities(&stripped);
        let normalized = normalize_entities(&stripped);
        let hooked = match &self.hook {
            Some(hook) => hook(normalized),
            None => normalized,
        };
        split_tags(&hooked, &self.policy, &self.protocols)
    }
}

/// One-shot pipeline without a hook, shared by the free functions.
pub(crate) fn sanitize_str(
    input: &str,
    policy: &Policy,
    protocols: &AllowedProtocols,
) -> String {
    let stripped = no_null(input);
    let stripped = strip_js_entities(&stripped);
    let normalized = normalize_entities(&stripped);
    split_tags(&normalized, policy, protocols)
}

/// Remove NUL bytes and literal `\0` escape sequences.
pub(crate) fn no_null(s: &str) -> String {
    s.replace('\0', "").replace("\\0", "")
}

/// Remove the ancient `&{...};` JavaScript-entity construct (a Netscape 4
/// extension that executed script from entity position).
fn strip_js_entities(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] == b'&' {
            if let Some(end) = match_js_entity(&bytes[pos..]) {
                pos += end;
                continue;
            }
        }
        let start = pos;
        pos += 1;
        while pos < bytes.len() && !s.is_char_boundary(pos) {
            pos += 1;
        }
        out.push_str(&s[start..pos]);
    }

    out
}

/// `&`, optional whitespace, `{`, anything up to `}` (or end of input),
/// then optional whitespace and an optional `;`.
fn match_js_entity(bytes: &[u8]) -> Option<usize> {
    let mut pos = 1;
    while pos < bytes.len() && is_space(bytes[pos]) {
        pos += 1;
    }
    if bytes.get(pos) != Some(&b'{') {
        return None;
    }
    pos += 1;
    while pos < bytes.len() && bytes[pos] != b'}' {
        pos += 1;
    }
    if pos == bytes.len() {
        // Unterminated: the construct swallows the rest of the input.
        return Some(pos);
    }
    pos += 1; // '}'
    while pos < bytes.len() && is_space(bytes[pos]) {
        pos += 1;
    }
    if bytes.get(pos) == Some(&b';') {
        pos += 1;
    }
    Some(pos)
}

/// Scan for tag-shaped spans (`<` through the next `>` or end of input) and
/// stray `>` characters, splicing the tag processor's output in place.
/// Everything else passes through unchanged.
fn split_tags(input: &str, policy: &Policy, protocols: &AllowedProtocols) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'<' => {
                let span_end = match bytes[pos + 1..].iter().position(|&b| b == b'>') {
                    Some(rel) => pos + rel + 2,
                    None => bytes.len(),
                };
                out.push_str(&tag::process_tag_span(
                    &input[pos..span_end],
                    policy,
                    protocols,
                ));
                pos = span_end;
            }
            b'>' => {
                out.push_str(&tag::process_tag_span(">", policy, protocols));
                pos += 1;
            }
            _ => {
                let start = pos;
                while pos < bytes.len() && bytes[pos] != b'<' && bytes[pos] != b'>' {
                    pos += 1;
                }
                out.push_str(&input[start..pos]);
            }
        }
    }

    out
}

/// Whitespace class used throughout the scanners: space, tab, newline,
/// carriage return, vertical tab, form feed.
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c')
}

/// Length of the leading whitespace run, in bytes.
pub(crate) fn leading_ws(s: &str) -> usize {
    s.bytes().take_while(|&b| is_space(b)).count()
}
