//! Character-entity handling.
//!
//! The normalizer disarms every literal `&` and then selectively re-enables
//! the shapes it recognizes: syntactically entity-like named references,
//! decimal references up to 65535, and hex references of 2 or 4 digits.
//! Anything else stays double-escaped and renders inert, which closes the
//! "obscure entity" bypass class without needing an entity table.

/// Longest named-entity body that is re-enabled (`&name;`).
const MAX_NAMED_LEN: usize = 20;

/// Escape all `&`, then restore the recognized entity shapes.
///
/// `AT&T` becomes `AT&amp;T`, `&#00058;` becomes `&#58;`, `&#XYZZY;`
/// becomes `&amp;#XYZZY;`, and `&#1000000;` stays `&amp;#1000000;`.
pub fn normalize_entities(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'&' {
            let start = pos;
            while pos < bytes.len() && bytes[pos] != b'&' {
                pos += 1;
            }
            out.push_str(&input[start..pos]);
            continue;
        }

        if let Some(len) = match_named(&bytes[pos..]) {
            out.push_str(&input[pos..pos + len]);
            pos += len;
        } else if let Some((len, value)) = match_decimal(&bytes[pos..]) {
            // Only 16-bit values are re-enabled; larger ones stay escaped so
            // huge references cannot smuggle encodings.
            if value <= 65535 {
                out.push_str("&#");
            } else {
                out.push_str("&amp;#");
            }
            out.push_str(&value.to_string());
            out.push(';');
            pos += len;
        } else if let Some((len, body)) = match_hex(&bytes[pos..]) {
            out.push_str("&#");
            out.push_str(&body);
            out.push(';');
            pos += len;
        } else {
            out.push_str("&amp;");
            pos += 1;
        }
    }

    out
}

/// `&name;` where name is `[A-Za-z][A-Za-z0-9]{0,19}`. Returns the full
/// span length including both delimiters.
fn match_named(bytes: &[u8]) -> Option<usize> {
    let mut i = 1;
    if !bytes.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    i += 1;
    while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
        i += 1;
    }
    if i - 1 > MAX_NAMED_LEN {
        return None;
    }
    (*bytes.get(i)? == b';').then_some(i + 1)
}

/// `&#0*N;` with at most five significant digits. Returns the span length
/// and the numeric value.
fn match_decimal(bytes: &[u8]) -> Option<(usize, u32)> {
    if bytes.get(1) != Some(&b'#') {
        return None;
    }
    let mut i = 2;
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits_start || bytes.get(i) != Some(&b';') {
        return None;
    }

    let digits = &bytes[digits_start..i];
    let significant = {
        let mut s = digits;
        while s.len() > 1 && s[0] == b'0' {
            s = &s[1..];
        }
        s
    };
    if significant.len() > 5 {
        return None;
    }

    let mut value: u32 = 0;
    for &d in significant {
        value = value * 10 + u32::from(d - b'0');
    }
    Some((i + 1, value))
}

/// `&#x0*HH;` or `&#x0*HHHH;` (case preserved, including the `x`). Zero
/// stripping is greedy, so `&#x0004;` re-enables as `&#x04;`. Returns the
/// span length and the `x`-plus-digits body to re-emit.
fn match_hex(bytes: &[u8]) -> Option<(usize, String)> {
    if bytes.get(1) != Some(&b'#') {
        return None;
    }
    let x = *bytes.get(2)?;
    if x != b'x' && x != b'X' {
        return None;
    }
    let mut i = 3;
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_hexdigit() {
        i += 1;
    }
    if i == digits_start || bytes.get(i) != Some(&b';') {
        return None;
    }
    let digits = &bytes[digits_start..i];

    // Longest run of leading zeros that still leaves a 2- or 4-digit body.
    for body_len in [2usize, 4] {
        if digits.len() >= body_len
            && digits[..digits.len() - body_len].iter().all(|&b| b == b'0')
        {
            let mut body = String::with_capacity(body_len + 1);
            body.push(char::from(x));
            for &d in &digits[digits.len() - body_len..] {
                body.push(char::from(d));
            }
            return Some((i + 1, body));
        }
    }
    None
}

/// Decode numeric character references to bytes (value taken modulo 256),
/// decimal pass first, hex pass second. Named entities are left alone; the
/// protocol filter has no use for them.
pub fn decode_entities(input: &str) -> String {
    let decimal = decode_pass(input, false);
    decode_pass(&decimal, true)
}

fn decode_pass(input: &str, hex: bool) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] == b'&' {
            if let Some((len, byte)) = match_numeric_ref(&bytes[pos..], hex) {
                out.push(char::from(byte));
                pos += len;
                continue;
            }
        }
        let start = pos;
        pos += 1;
        while pos < bytes.len() && !input.is_char_boundary(pos) {
            pos += 1;
        }
        out.push_str(&input[start..pos]);
    }

    out
}

/// `&#N;` (or `&#xH;` when `hex`) with any number of digits; the value wraps
/// at 256 like the original byte-oriented decoder.
fn match_numeric_ref(bytes: &[u8], hex: bool) -> Option<(usize, u8)> {
    if bytes.get(1) != Some(&b'#') {
        return None;
    }
    let mut i = 2;
    if hex {
        let x = *bytes.get(i)?;
        if x != b'x' && x != b'X' {
            return None;
        }
        i += 1;
    }
    let digits_start = i;
    let mut value: u32 = 0;
    while i < bytes.len() {
        let d = bytes[i];
        let digit = if hex {
            match d {
                b'0'..=b'9' => u32::from(d - b'0'),
                b'a'..=b'f' => u32::from(d - b'a') + 10,
                b'A'..=b'F' => u32::from(d - b'A') + 10,
                _ => break,
            }
        } else if d.is_ascii_digit() {
            u32::from(d - b'0')
        } else {
            break;
        };
        value = (value * if hex { 16 } else { 10 } + digit) % 256;
        i += 1;
    }
    if i == digits_start || bytes.get(i) != Some(&b';') {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some((i + 1, value as u8))
}
