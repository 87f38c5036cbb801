//! Shared fixtures for the tagsieve benchmarks.

use tagsieve::{AttrRule, Constraint, Policy};

/// The policy every benchmark runs under: a forum-style whitelist.
#[allow(clippy::expect_used)]
pub fn bench_policy() -> Policy {
    Policy::builder()
        .element("a", [("href", AttrRule::Unconstrained)])
        .element("b", [])
        .element("i", [])
        .element("br", [])
        .element("blockquote", [])
        .element(
            "img",
            [
                ("src", AttrRule::Unconstrained),
                ("alt", AttrRule::Constrained(vec![Constraint::MaxLen(100)])),
                ("width", AttrRule::Constrained(vec![Constraint::MaxVal(1024)])),
            ],
        )
        .build()
        .expect("bench policy is well formed")
}
