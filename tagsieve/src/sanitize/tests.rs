#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::disallowed_methods)]
#![allow(clippy::panic)]

use crate::policy::{AllowedProtocols, AttrRule, Constraint, Policy};
use crate::{sanitize, sanitize_with_protocols};

use super::entities::{decode_entities, normalize_entities};
use super::protocol::bad_protocol;
use super::tokenizer::tokenize_attrs;

fn demo_policy() -> Policy {
    Policy::builder()
        .element(
            "a",
            [
                ("href", AttrRule::Unconstrained),
                ("title", AttrRule::Constrained(vec![Constraint::MaxLen(5)])),
            ],
        )
        .element("b", [])
        .element("br", [])
        .element(
            "img",
            [
                ("src", AttrRule::Unconstrained),
                ("width", AttrRule::Constrained(vec![Constraint::MaxVal(800)])),
            ],
        )
        .build()
        .expect("demo policy is well formed")
}

#[test]
fn test_ampersand_is_disarmed() {
    assert_eq!(normalize_entities("AT&T"), "AT&amp;T");
    assert_eq!(normalize_entities("a & b"), "a &amp; b");
}

#[test]
fn test_named_entities_pass_through() {
    // Any syntactically entity-shaped token survives, validated or not.
    assert_eq!(normalize_entities("&quot;"), "&quot;");
    assert_eq!(normalize_entities("&bogusname;"), "&bogusname;");
    // 21 letters is past the name-length bound.
    assert_eq!(
        normalize_entities("&abcdefghijklmnopqrstu;"),
        "&amp;abcdefghijklmnopqrstu;"
    );
    // No terminating semicolon, no restore.
    assert_eq!(normalize_entities("&quot"), "&amp;quot");
}

#[test]
fn test_decimal_references_bounded_at_16_bits() {
    assert_eq!(normalize_entities("&#58;"), "&#58;");
    assert_eq!(normalize_entities("&#00058;"), "&#58;");
    assert_eq!(normalize_entities("&#65535;"), "&#65535;");
    assert_eq!(normalize_entities("&#65536;"), "&amp;#65536;");
    assert_eq!(normalize_entities("&#1000000;"), "&amp;#1000000;");
}

#[test]
fn test_hex_references_two_or_four_digits() {
    assert_eq!(normalize_entities("&#x41;"), "&#x41;");
    assert_eq!(normalize_entities("&#X0041;"), "&#X41;");
    assert_eq!(normalize_entities("&#x0004;"), "&#x04;");
    // One or three digits do not match the shape.
    assert_eq!(normalize_entities("&#x4;"), "&amp;#x4;");
    assert_eq!(normalize_entities("&#x123;"), "&amp;#x123;");
    assert_eq!(normalize_entities("&#XYZZY;"), "&amp;#XYZZY;");
}

#[test]
fn test_decode_numeric_references() {
    assert_eq!(decode_entities("&#106;ava"), "java");
    assert_eq!(decode_entities("&#x3A;"), ":");
    // Decimal pass runs before the hex pass, so a decoded '&' can expose a
    // hex reference.
    assert_eq!(decode_entities("&#38;#x41;"), "A");
    // Named entities are not this decoder's business.
    assert_eq!(decode_entities("&amp;"), "&amp;");
}

#[test]
fn test_scheme_stacking_is_stripped_to_fixpoint() {
    let allowed = AllowedProtocols::new(["http", "https"]);
    assert_eq!(
        bad_protocol("javascript:javascript:alert(1)", &allowed),
        "alert(1)"
    );
    assert_eq!(
        bad_protocol("javascript:vbscript:javascript:x", &allowed),
        "x"
    );
}

#[test]
fn test_allowed_scheme_is_canonicalized() {
    let allowed = AllowedProtocols::default();
    assert_eq!(bad_protocol("http://example.com/", &allowed), "http://example.com/");
    assert_eq!(bad_protocol("HTTP://example.com/", &allowed), "http://example.com/");
    assert_eq!(bad_protocol("  ht tp : //example.com/", &allowed), "http://example.com/");
    assert_eq!(bad_protocol("mailto:user@example.com", &allowed), "mailto:user@example.com");
}

#[test]
fn test_entity_encoded_colons_and_schemes() {
    let allowed = AllowedProtocols::default();
    assert_eq!(bad_protocol("javascript&#58;alert(1)", &allowed), "alert(1)");
    assert_eq!(bad_protocol("javascript&#x3A;alert(1)", &allowed), "alert(1)");
    assert_eq!(bad_protocol("java&#115;cript:alert(1)", &allowed), "alert(1)");
}

#[test]
fn test_values_without_schemes_are_untouched() {
    let allowed = AllowedProtocols::default();
    assert_eq!(bad_protocol("/forum/thread?id=3", &allowed), "/forum/thread?id=3");
    assert_eq!(bad_protocol("alert(1)", &allowed), "alert(1)");
    assert_eq!(bad_protocol("", &allowed), "");
}

#[test]
fn test_tokenizer_basic_forms() {
    let allowed = AllowedProtocols::default();
    let tokens = tokenize_attrs("href=\"/x\" title='t' selected", &allowed);
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].whole, "href=\"/x\"");
    assert_eq!(tokens[1].whole, "title='t'");
    assert_eq!(tokens[2].name, "selected");
    assert_eq!(tokens[2].value, "");
    assert_eq!(tokens[2].whole, "selected");
}

#[test]
fn test_tokenizer_bare_values_gain_quotes() {
    let allowed = AllowedProtocols::default();
    let tokens = tokenize_attrs("width=500", &allowed);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].value, "500");
    assert_eq!(tokens[0].whole, "width=\"500\"");
}

#[test]
fn test_tokenizer_resynchronizes_after_garbage() {
    let allowed = AllowedProtocols::default();
    let tokens = tokenize_attrs("=junk \"quoted garbage\" href=\"/ok\"", &allowed);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].whole, "href=\"/ok\"");
}

#[test]
fn test_tokenizer_unterminated_quote_fails_closed() {
    let allowed = AllowedProtocols::default();
    assert!(tokenize_attrs("href=\"unterminated", &allowed).is_empty());
}

#[test]
fn test_tokenizer_value_needs_clean_boundary() {
    let allowed = AllowedProtocols::default();
    // A quoted value must end at whitespace or end of input.
    assert!(tokenize_attrs("a=\"v\"x", &allowed).is_empty());
}

#[test]
fn test_tokenizer_all_whitespace_input() {
    let allowed = AllowedProtocols::default();
    assert!(tokenize_attrs("    \t  \n ", &allowed).is_empty());
}

#[test]
fn test_unknown_element_is_dropped_content_stays() {
    let policy = demo_policy();
    assert_eq!(sanitize("<script>alert(1)</script>", &policy), "alert(1)");
    assert_eq!(sanitize("<iframe src=\"http://evil/\"></iframe>", &policy), "");
}

#[test]
fn test_stray_close_bracket_is_escaped() {
    let policy = demo_policy();
    assert_eq!(sanitize("a > b", &policy), "a &gt; b");
}

#[test]
fn test_seriously_malformed_tag_is_dropped() {
    let policy = demo_policy();
    assert_eq!(sanitize("<:::>", &policy), "");
    assert_eq!(sanitize("<>", &policy), "");
    assert_eq!(sanitize("< >", &policy), "");
}

#[test]
fn test_unclosed_tag_at_end_of_input() {
    let policy = demo_policy();
    // "< b" parses as an allowed element with no attributes.
    assert_eq!(sanitize("a < b", &policy), "a <b>");
    // A lone "<" is too malformed to be a tag.
    assert_eq!(sanitize("a <", &policy), "a ");
}

#[test]
fn test_element_case_is_preserved_and_matched_insensitively() {
    let policy = demo_policy();
    assert_eq!(sanitize("<B>x</B>", &policy), "<B>x</B>");
    assert_eq!(sanitize("<A Href=\"/x\">y</A>", &policy), "<A Href=\"/x\">y</A>");
}

#[test]
fn test_closing_tags_never_keep_attributes() {
    let policy = demo_policy();
    assert_eq!(sanitize("</a href=\"/x\">", &policy), "</a>");
}

#[test]
fn test_self_closing_marker_preserved() {
    let policy = demo_policy();
    assert_eq!(sanitize("<br / >", &policy), "<br />");
    assert_eq!(sanitize("<br />", &policy), "<br />");
    // Without the preceding whitespace the slash is just attribute junk.
    assert_eq!(sanitize("<br/>", &policy), "<br>");
}

#[test]
fn test_maxlen_rejects_whole_attribute() {
    let policy = demo_policy();
    assert_eq!(
        sanitize("<a title=\"abcdefgh\" href=\"/x\">y</a>", &policy),
        "<a href=\"/x\">y</a>"
    );
    assert_eq!(sanitize("<a title=\"abc\">y</a>", &policy), "<a title=\"abc\">y</a>");
}

#[test]
fn test_maxval_shape_and_bound() {
    let policy = demo_policy();
    assert_eq!(sanitize("<img width=\"400\">", &policy), "<img width=\"400\">");
    assert_eq!(sanitize("<img width=\"00400\">", &policy), "<img width=\"00400\">");
    assert_eq!(sanitize("<img width=\" 12 \">", &policy), "<img width=\" 12 \">");
    // Over the bound, non-numeric, or excessively padded: dropped.
    assert_eq!(sanitize("<img width=\"4000\">", &policy), "<img>");
    assert_eq!(sanitize("<img width=\"12px\">", &policy), "<img>");
    assert_eq!(sanitize("<img width=\"        12\">", &policy), "<img>");
}

#[test]
fn test_unknown_attribute_dropped_element_kept() {
    let policy = demo_policy();
    assert_eq!(
        sanitize("<a href=\"/x\" onclick=\"alert(1)\">y</a>", &policy),
        "<a href=\"/x\">y</a>"
    );
}

#[test]
fn test_attribute_text_cannot_reopen_a_tag() {
    let policy = demo_policy();
    assert_eq!(sanitize("<a href=\"x<y\">z</a>", &policy), "<a href=\"xy\">z</a>");
}

#[test]
fn test_scheme_filter_applies_inside_tags() {
    let policy = demo_policy();
    assert_eq!(
        sanitize("<a href=\"javascript:alert(1)\">y</a>", &policy),
        "<a href=\"alert(1)\">y</a>"
    );
    assert_eq!(
        sanitize("<a href=\"javascript&#58;alert(1)\">y</a>", &policy),
        "<a href=\"alert(1)\">y</a>"
    );
}

#[test]
fn test_custom_protocol_whitelist() {
    let policy = demo_policy();
    let https_only = AllowedProtocols::new(["https"]);
    assert_eq!(
        sanitize_with_protocols("<a href=\"http://x/\">y</a>", &policy, &https_only),
        "<a href=\"//x/\">y</a>"
    );
    assert_eq!(
        sanitize_with_protocols("<a href=\"https://x/\">y</a>", &policy, &https_only),
        "<a href=\"https://x/\">y</a>"
    );
}

#[test]
fn test_js_entities_are_removed() {
    let policy = demo_policy();
    assert_eq!(sanitize("&{alert(1)};x", &policy), "x");
    assert_eq!(sanitize("& {alert(1)} ;x", &policy), "x");
    // Unterminated constructs swallow the rest of the input.
    assert_eq!(sanitize("before&{alert(1)", &policy), "before");
}

#[test]
fn test_nul_bytes_cannot_split_a_scheme() {
    let policy = demo_policy();
    assert_eq!(
        sanitize("<a href=\"java\0script:alert(1)\">y</a>", &policy),
        "<a href=\"alert(1)\">y</a>"
    );
    assert_eq!(
        sanitize("<a href=\"java\\0script:alert(1)\">y</a>", &policy),
        "<a href=\"alert(1)\">y</a>"
    );
}

#[test]
fn test_entity_overflow_through_the_pipeline() {
    let policy = demo_policy();
    assert_eq!(sanitize("&#1000000;", &policy), "&amp;#1000000;");
}

#[test]
fn test_empty_input() {
    let policy = demo_policy();
    assert_eq!(sanitize("", &policy), "");
}

#[test]
fn test_empty_policy_strips_all_tags() {
    let policy = Policy::builder().build().expect("empty policy");
    assert_eq!(sanitize("<b>x</b><a href=\"/y\">z</a>", &policy), "xz");
}
