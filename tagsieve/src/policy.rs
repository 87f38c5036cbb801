//! The whitelist supplied by the caller: which elements may appear, which
//! attributes each element may carry, and what values those attributes may
//! take.
//!
//! All names are case-folded once, at construction time, so lookups during
//! sanitization are plain map hits. A built [`Policy`] is immutable and can
//! be shared across threads.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

/// A single value check attached to an allowed attribute.
///
/// The set of checks is a closed enum so that every kind is matched
/// exhaustively; a future check is a new variant, not a silent fall-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Value byte length must not exceed the bound.
    MaxLen(usize),
    /// Value must be a small unsigned integer (at most 6 digits, at most 6
    /// leading and 6 trailing whitespace characters) no greater than the
    /// bound.
    MaxVal(u64),
}

/// What an allowed attribute's value is held to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrRule {
    /// Attribute allowed, value unchecked.
    Unconstrained,
    /// Attribute allowed if the value passes every constraint.
    Constrained(Vec<Constraint>),
}

/// Errors from [`PolicyBuilder::build`]. A bad policy is caller
/// misconfiguration and is rejected up front; the sanitizer itself never
/// fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("invalid element name {0:?}: must be non-empty ASCII alphanumeric")]
    InvalidElementName(String),
    #[error("invalid attribute name {attribute:?} on element {element:?}: must match [-A-Za-z]+")]
    InvalidAttributeName { element: String, attribute: String },
}

/// The administrator-curated table of allowed elements and attributes.
///
/// Keys are stored lower-cased; every lookup lower-cases its query, so
/// matching is case-insensitive end to end.
#[derive(Debug, Clone, Default)]
pub struct Policy {
    elements: HashMap<String, HashMap<String, AttrRule>>,
}

impl Policy {
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    /// Attribute rules for an element, or `None` if the element is not
    /// allowed at all.
    pub fn element_rules(&self, name: &str) -> Option<&HashMap<String, AttrRule>> {
        self.elements.get(&name.to_ascii_lowercase())
    }

    /// Rule for one attribute of one element, or `None` if either is not
    /// allowed.
    pub fn attr_rule(&self, element: &str, attribute: &str) -> Option<&AttrRule> {
        self.element_rules(element)?
            .get(&attribute.to_ascii_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Builds a [`Policy`], folding names to lower case and validating them.
#[derive(Debug, Clone, Default)]
pub struct PolicyBuilder {
    elements: Vec<(String, Vec<(String, AttrRule)>)>,
}

impl PolicyBuilder {
    /// Allow an element with the given attribute rules. An empty rule array
    /// allows the element but strips every attribute from it.
    ///
    /// Repeated calls for the same element merge; a later rule for the same
    /// attribute replaces the earlier one.
    pub fn element<const N: usize>(self, name: &str, attrs: [(&str, AttrRule); N]) -> Self {
        self.element_entries(name, attrs.map(|(attr, rule)| (attr.to_string(), rule)))
    }

    /// Like [`element`](Self::element), for rule sets assembled at runtime.
    pub fn element_entries<I>(mut self, name: &str, attrs: I) -> Self
    where
        I: IntoIterator<Item = (String, AttrRule)>,
    {
        self.elements
            .push((name.to_string(), attrs.into_iter().collect()));
        self
    }

    pub fn build(self) -> Result<Policy, PolicyError> {
        let mut elements: HashMap<String, HashMap<String, AttrRule>> = HashMap::new();

        for (name, attrs) in self.elements {
            if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric()) {
                return Err(PolicyError::InvalidElementName(name));
            }
            let entry = elements.entry(name.to_ascii_lowercase()).or_default();
            for (attr, rule) in attrs {
                if attr.is_empty()
                    || !attr.bytes().all(|b| b == b'-' || b.is_ascii_alphabetic())
                {
                    return Err(PolicyError::InvalidAttributeName {
                        element: name,
                        attribute: attr,
                    });
                }
                entry.insert(attr.to_ascii_lowercase(), rule);
            }
        }

        Ok(Policy { elements })
    }
}

/// The set of URL schemes an attribute value may start with.
///
/// Scheme names are stored lower-cased; matching is case-insensitive. The
/// default set mirrors the classic safe list: http, https, ftp, news, nntp,
/// telnet, gopher, mailto.
#[derive(Debug, Clone)]
pub struct AllowedProtocols {
    schemes: HashSet<String>,
}

const DEFAULT_PROTOCOLS: [&str; 8] = [
    "http", "https", "ftp", "news", "nntp", "telnet", "gopher", "mailto",
];

impl Default for AllowedProtocols {
    fn default() -> Self {
        Self::new(DEFAULT_PROTOCOLS)
    }
}

impl AllowedProtocols {
    pub fn new<I, S>(schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        AllowedProtocols {
            schemes: schemes
                .into_iter()
                .map(|s| s.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// An empty set: every scheme prefix is stripped.
    pub fn none() -> Self {
        Self::new::<_, &str>([])
    }

    /// Case-insensitive membership test. The query is expected to already be
    /// decoded and whitespace-free; only case is folded here.
    pub fn contains(&self, scheme: &str) -> bool {
        self.schemes.contains(&scheme.to_ascii_lowercase())
    }
}
