use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tagsieve::{AttrRule, Constraint, Policy};

/// JSON policy format:
///
/// ```json
/// {
///   "a": { "href": null, "title": { "maxlen": 5 } },
///   "b": {},
///   "img": { "src": null, "width": { "maxval": 800 } }
/// }
/// ```
///
/// `null` means the attribute is allowed without value checks.
#[derive(Debug, Deserialize)]
pub struct PolicySpec(BTreeMap<String, BTreeMap<String, Option<ChecksSpec>>>);

#[derive(Debug, Deserialize)]
pub struct ChecksSpec {
    #[serde(default)]
    maxlen: Option<usize>,
    #[serde(default)]
    maxval: Option<u64>,
}

impl PolicySpec {
    pub fn into_policy(self) -> Result<Policy, Box<dyn std::error::Error>> {
        let mut builder = Policy::builder();
        for (element, attrs) in self.0 {
            let entries = attrs.into_iter().map(|(attr, checks)| {
                let rule = match checks {
                    None => AttrRule::Unconstrained,
                    Some(checks) => {
                        let mut constraints = Vec::new();
                        if let Some(limit) = checks.maxlen {
                            constraints.push(Constraint::MaxLen(limit));
                        }
                        if let Some(limit) = checks.maxval {
                            constraints.push(Constraint::MaxVal(limit));
                        }
                        if constraints.is_empty() {
                            AttrRule::Unconstrained
                        } else {
                            AttrRule::Constrained(constraints)
                        }
                    }
                };
                (attr, rule)
            });
            builder = builder.element_entries(&element, entries.collect::<Vec<_>>());
        }
        Ok(builder.build()?)
    }
}

pub fn load_policy(path: &Path) -> Result<Policy, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let spec: PolicySpec = serde_json::from_str(&text)?;
    spec.into_policy()
}

/// The built-in policy used when no policy file is given: a small
/// forum-style whitelist.
pub fn builtin_policy() -> Policy {
    let policy = Policy::builder()
        .element("a", [("href", AttrRule::Unconstrained)])
        .element("b", [])
        .element("i", [])
        .element("u", [])
        .element("br", [])
        .element("p", [])
        .element("blockquote", [])
        .element("pre", [])
        .element(
            "img",
            [
                ("src", AttrRule::Unconstrained),
                ("alt", AttrRule::Constrained(vec![Constraint::MaxLen(100)])),
                ("width", AttrRule::Constrained(vec![Constraint::MaxVal(1024)])),
                ("height", AttrRule::Constrained(vec![Constraint::MaxVal(1024)])),
            ],
        )
        .build();
    match policy {
        Ok(policy) => policy,
        // The table above is static and valid; this is unreachable in
        // practice but the CLI should not panic either way.
        Err(_) => Policy::default(),
    }
}
