//! URL-scheme whitelisting for attribute values.
//!
//! A single stripping pass can be defeated by stacking schemes
//! (`javascript:javascript:alert(1)`) or by entity-encoding the colon, so
//! the filter iterates to a fixpoint: the value is only returned once a
//! pass leaves it unchanged.

use crate::policy::AllowedProtocols;

use super::entities::decode_entities;
use super::{is_space, no_null};

/// Strip every disallowed scheme prefix from the front of `value`.
///
/// Values without a scheme (relative paths, plain words) come back
/// untouched. An allowed scheme is rebuilt canonically as `scheme:`,
/// lower-cased, entity-decoded, with embedded whitespace and NULs removed.
pub fn bad_protocol(value: &str, allowed: &AllowedProtocols) -> String {
    let mut current = no_null(value);
    loop {
        // Each pass either returns its input verbatim (fixpoint), shortens
        // it, or canonicalizes an allowed prefix, which the next pass maps
        // to itself. Termination follows from the strictly shrinking
        // disallowed case.
        let next = bad_protocol_once(&current, allowed);
        if next == current {
            return current;
        }
        current = no_null(&next);
    }
}

/// One pass: find a scheme-shaped prefix (letters, digits, whitespace, and
/// inline entities up to a colon, where the colon itself may be `&#58;` or
/// `&#x3A;`) and keep or drop it according to the whitelist.
pub(crate) fn bad_protocol_once(s: &str, allowed: &AllowedProtocols) -> String {
    let bytes = s.as_bytes();

    // Greedily collect prefix units: one alphanumeric or whitespace byte,
    // or a whole `&...;` entity span.
    let mut boundaries = vec![0usize];
    let mut pos = 0;
    while pos < bytes.len() {
        let b = bytes[pos];
        if b.is_ascii_alphanumeric() || is_space(b) {
            pos += 1;
            boundaries.push(pos);
        } else if b == b'&' {
            match bytes[pos + 1..].iter().position(|&c| c == b';') {
                Some(rel) => {
                    pos += rel + 2;
                    boundaries.push(pos);
                }
                None => break,
            }
        } else {
            break;
        }
    }

    // Backtrack from the longest prefix to the last viable colon token.
    for &boundary in boundaries.iter().rev() {
        let Some(token_len) = match_colon(&bytes[boundary..]) else {
            continue;
        };
        let mut end = boundary + token_len;
        while end < bytes.len() && is_space(bytes[end]) {
            end += 1;
        }
        let scheme = canonical_scheme(&s[..boundary]);
        let rest = &s[end..];
        return if allowed.contains(&scheme) {
            let mut out = String::with_capacity(scheme.len() + 1 + rest.len());
            out.push_str(&scheme);
            out.push(':');
            out.push_str(rest);
            out
        } else {
            // The whole prefix goes, colon included, not just the name.
            rest.to_string()
        };
    }

    // No scheme present at all.
    s.to_string()
}

/// `:`, `&#58;`, or `&#x3A;` (either case of `x` and `a`).
fn match_colon(bytes: &[u8]) -> Option<usize> {
    match bytes.first()? {
        b':' => Some(1),
        b'&' => {
            if bytes.starts_with(b"&#58;") {
                Some(5)
            } else if bytes.len() >= 6
                && bytes[1] == b'#'
                && (bytes[2] == b'x' || bytes[2] == b'X')
                && bytes[3] == b'3'
                && (bytes[4] == b'a' || bytes[4] == b'A')
                && bytes[5] == b';'
            {
                Some(6)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Whitespace removed, numeric entities decoded, NULs removed, lower-cased.
fn canonical_scheme(raw: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|&c| !(c.is_ascii() && is_space(c as u8)))
        .collect();
    let decoded = decode_entities(&compact);
    no_null(&decoded).to_ascii_lowercase()
}
