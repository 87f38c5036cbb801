#![doc = include_str!("../README.md")]
//!
//! ## API Guide
//!
//! ### For End Users
//!
//! Most applications should use the high-level entry points:
//!
//! - [`sanitize`] - Sanitize one string under a policy with the default
//!   protocol whitelist (recommended)
//! - [`sanitize_with_protocols`] - Same, with a custom protocol whitelist
//! - [`Sanitizer`] - Reusable handle when sanitizing many strings under
//!   one policy
//! - [`version`] - Library version information
//!
//! The policy is built once with [`Policy::builder`] and treated as
//! immutable; element and attribute names are case-folded at build time so
//! per-call matching is case-insensitive for free.
//!
//! ### For Advanced Users and Debugging
//!
//! The pipeline stages are exposed individually for testing, debugging,
//! and callers with unusual needs:
//!
//! - [`normalize_entities`] - The entity disarm/re-enable pass
//! - [`bad_protocol`] - The URL-scheme fixpoint filter
//! - [`tokenize_attrs`] - The fault-tolerant attribute tokenizer
//!
//! These expose the internal behavior that powers the sanitizer. Most
//! applications should **not** call them directly; the orchestrated
//! pipeline applies them in the one order that is known to be safe.

pub mod policy;
mod sanitize;


pub use policy::{AllowedProtocols, AttrRule, Constraint, Policy, PolicyBuilder, PolicyError};
pub use sanitize::{
    bad_protocol, decode_entities, normalize_entities, tokenize_attrs, AttrToken, AttrTokens,
    Sanitizer,
};

/// Sanitize untrusted markup under `policy` with the default protocol
/// whitelist (http, https, ftp, news, nntp, telnet, gopher, mailto).
///
/// Total over its input: every string, however malformed, maps to some
/// output string. Unknown elements and attributes are stripped, never
/// passed through.
///
/// # Examples
///
/// ```
/// use tagsieve::{sanitize, Policy};
///
/// let policy = Policy::builder()
///     .element("b", [])
///     .build()
///     .expect("valid policy");
///
/// assert_eq!(
///     sanitize("<b onclick=alert(1)>bold</b><script>x</script>", &policy),
///     "<b>bold</b>x",
/// );
/// ```
pub fn sanitize(input: &str, policy: &Policy) -> String {
    sanitize_with_protocols(input, policy, &AllowedProtocols::default())
}

/// Sanitize untrusted markup with an explicit URL-scheme whitelist.
///
/// # Examples
///
/// ```
/// use tagsieve::{sanitize_with_protocols, AllowedProtocols, AttrRule, Policy};
///
/// let policy = Policy::builder()
///     .element("a", [("href", AttrRule::Unconstrained)])
///     .build()
///     .expect("valid policy");
/// let https_only = AllowedProtocols::new(["https"]);
///
/// assert_eq!(
///     sanitize_with_protocols("<a href=\"http://x/\">x</a>", &policy, &https_only),
///     "<a href=\"//x/\">x</a>",
/// );
/// ```
pub fn sanitize_with_protocols(
    input: &str,
    policy: &Policy,
    protocols: &AllowedProtocols,
) -> String {
    sanitize::sanitize_str(input, policy, protocols)
}

/// Returns the version of the tagsieve library.
///
/// # Examples
///
/// ```
/// use tagsieve::version;
///
/// println!("tagsieve version: {}", version());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
