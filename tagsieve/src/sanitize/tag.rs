//! Per-tag processing: element whitelisting, attribute validation, and tag
//! reassembly.

use std::collections::HashMap;

use crate::policy::{AllowedProtocols, AttrRule, Constraint, Policy};

use super::tokenizer::tokenize_attrs;
use super::{is_space, leading_ws};

/// Process one `<...>` candidate span (a stray `>` arrives as the
/// degenerate one-character span).
///
/// A stray close bracket is always escaped. A span too malformed to be a
/// tag, or naming an element absent from the policy, is dropped entirely.
pub(crate) fn process_tag_span(
    span: &str,
    policy: &Policy,
    protocols: &AllowedProtocols,
) -> String {
    if !span.starts_with('<') {
        // It matched a bare ">" character.
        return "&gt;".to_string();
    }

    let Some((closing, name, attrlist)) = parse_tag_shape(span) else {
        // Seriously malformed, e.g. <:::>
        return String::new();
    };

    if policy.element_rules(name).is_none() {
        return String::new();
    }

    let element = if closing {
        format!("/{name}")
    } else {
        name.to_string()
    };
    rebuild_tag(&element, attrlist, policy, protocols)
}

/// Match `<`, optional `/`, an element name, then the attribute text up to
/// the closing `>` (which may be missing at end of input). Whitespace is
/// tolerated around the slash and before the name.
fn parse_tag_shape(span: &str) -> Option<(bool, &str, &str)> {
    let bytes = span.as_bytes();
    let mut pos = 1; // past '<'
    pos += leading_ws(&span[pos..]);

    let closing = bytes.get(pos) == Some(&b'/');
    if closing {
        pos += 1;
        pos += leading_ws(&span[pos..]);
    }

    let name_len = bytes[pos..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if name_len == 0 {
        return None;
    }
    let name = &span[pos..pos + name_len];
    let rest = &span[pos + name_len..];

    // The remainder may contain no '>' except as the final byte.
    let attrlist = match rest.find('>') {
        Some(i) if i + 1 == rest.len() => &rest[..i],
        Some(_) => return None,
        None => rest,
    };
    Some((closing, name, attrlist))
}

/// Rebuild a clean tag from an allowed element and its raw attribute text.
///
/// `element` may carry a leading `/` for closing tags; the slash-prefixed
/// name never resolves to attribute rules, so closing tags always take the
/// all-attributes-stripped path.
fn rebuild_tag(
    element: &str,
    attrlist: &str,
    policy: &Policy,
    protocols: &AllowedProtocols,
) -> String {
    let self_close = if has_selfclose_marker(attrlist) { " /" } else { "" };

    let rules = policy.element_rules(element).filter(|r| !r.is_empty());
    let Some(rules) = rules else {
        // No attributes allowed at all: drop everything after the name.
        return format!("<{element}{self_close}>");
    };

    let mut attrs = String::new();
    for token in tokenize_attrs(attrlist, protocols) {
        if attr_allowed(rules, &token.name, &token.value) {
            attrs.push(' ');
            attrs.push_str(&token.whole);
        }
    }

    // Nothing in the rebuilt attribute text may reopen a tag.
    let attrs: String = attrs.chars().filter(|&c| c != '<' && c != '>').collect();

    format!("<{element}{attrs}{self_close}>")
}

/// A `/` preceded by whitespace at the very end of the attribute text marks
/// a self-closing XHTML tag and is re-emitted.
fn has_selfclose_marker(attrlist: &str) -> bool {
    let bytes = attrlist.as_bytes();
    let mut end = bytes.len();
    while end > 0 && is_space(bytes[end - 1]) {
        end -= 1;
    }
    end >= 2 && bytes[end - 1] == b'/' && is_space(bytes[end - 2])
}

fn attr_allowed(rules: &HashMap<String, AttrRule>, name: &str, value: &str) -> bool {
    match rules.get(&name.to_ascii_lowercase()) {
        None => false,
        Some(AttrRule::Unconstrained) => true,
        Some(AttrRule::Constrained(checks)) => {
            checks.iter().all(|&check| check_attr_val(value, check))
        }
    }
}

/// Evaluate one value constraint. Any failing check rejects the whole
/// attribute.
fn check_attr_val(value: &str, constraint: Constraint) -> bool {
    match constraint {
        Constraint::MaxLen(limit) => value.len() <= limit,
        Constraint::MaxVal(limit) => {
            parse_bounded_uint(value).is_some_and(|v| v <= limit)
        }
    }
}

/// An unsigned integer of at most 6 digits with at most 6 leading and 6
/// trailing whitespace characters. Anything looser fails the check.
fn parse_bounded_uint(value: &str) -> Option<u64> {
    let bytes = value.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() && is_space(bytes[pos]) {
        pos += 1;
    }
    if pos > 6 {
        return None;
    }

    let digits_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let digits = &bytes[digits_start..pos];
    if digits.is_empty() || digits.len() > 6 {
        return None;
    }

    let trailing_start = pos;
    while pos < bytes.len() && is_space(bytes[pos]) {
        pos += 1;
    }
    if pos - trailing_start > 6 || pos != bytes.len() {
        return None;
    }

    let mut number: u64 = 0;
    for &d in digits {
        number = number * 10 + u64::from(d - b'0');
    }
    Some(number)
}
