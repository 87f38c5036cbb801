#![no_main]
use libfuzzer_sys::fuzz_target;
use tagsieve::{sanitize, AttrRule, Constraint, Policy};

#[allow(clippy::expect_used)]
fn fuzz_policy() -> Policy {
    Policy::builder()
        .element("a", [("href", AttrRule::Unconstrained)])
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
        .expect("fuzz policy is well formed")
}

fuzz_target!(|data: &[u8]| {
    // Fuzz the full sanitizer pipeline with arbitrary input
    let input = String::from_utf8_lossy(data);
    let policy = fuzz_policy();
    let _ = sanitize(&input, &policy);
});
