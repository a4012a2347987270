//! Heuristic cookie classification and first-/third-party partitioning.
//!
//! Classification is an ordered list of (substrings, category) rules matched
//! case-insensitively against the cookie name, first match wins. The rules
//! are deliberately blunt: `"ga"` matches a cookie named `"saga"` and
//! `"csrf"` outranks everything else. That is accepted heuristic behavior
//! the test fixtures depend on, so the rule order and the literal substrings
//! must not be reorganized or deduplicated.
//!
//! The first-party check is equally heuristic: a cookie counts as
//! first-party when its domain (leading dot stripped) appears as a substring
//! of the site string. A cookie domain of `"io"` therefore matches a site
//! named `"shop.io"`. A strict eTLD+1 comparison would change observed
//! output and is intentionally not used.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scan::Cookie;

/// Policy category assigned to every scanned cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Strictly necessary cookies (sessions, CSRF tokens).
    Essential,
    /// Traffic measurement cookies.
    Analytics,
    /// Advertising and profiling cookies.
    Marketing,
    /// Anything the name heuristics did not recognize.
    Unclassified,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Essential => "Essential",
            Category::Analytics => "Analytics",
            Category::Marketing => "Marketing",
            Category::Unclassified => "Unclassified",
        };
        f.write_str(label)
    }
}

/// Ordered name-substring rules. Order is significant: earlier rules win
/// when a name matches several substrings (`"ga_csrf"` is Essential).
const RULES: &[(&[&str], Category)] = &[
    (&["session", "csrf"], Category::Essential),
    (&["ga", "gid", "analytics"], Category::Analytics),
    (&["ads", "marketing", "fb"], Category::Marketing),
];

/// A cookie paired with its assigned category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedCookie {
    /// The raw cookie as the scanner reported it.
    #[serde(flatten)]
    pub cookie: Cookie,
    /// Derived policy category.
    pub category: Category,
}

/// Classifies a cookie name into a policy category.
///
/// Pure and total: unknown patterns fall through to
/// [`Category::Unclassified`], never an error.
#[must_use]
pub fn classify(name: &str) -> Category {
    let name = name.to_lowercase();
    for (needles, category) in RULES {
        if needles.iter().any(|needle| name.contains(needle)) {
            return *category;
        }
    }
    Category::Unclassified
}

/// Assigns exactly one category to each cookie, preserving scanner order.
#[must_use]
pub fn classify_all(cookies: Vec<Cookie>) -> Vec<ClassifiedCookie> {
    cookies
        .into_iter()
        .map(|cookie| {
            let category = classify(&cookie.name);
            ClassifiedCookie { cookie, category }
        })
        .collect()
}

/// Splits classified cookies into (first-party, third-party) buckets.
///
/// A cookie is first-party when its domain, leading dot stripped, is a
/// non-empty substring of `site` (the URL string the scan was invoked
/// with). Every cookie lands in exactly one bucket, in scanner order.
#[must_use]
pub fn partition(
    cookies: &[ClassifiedCookie],
    site: &str,
) -> (Vec<ClassifiedCookie>, Vec<ClassifiedCookie>) {
    let mut first_party = Vec::new();
    let mut third_party = Vec::new();
    for classified in cookies {
        let domain = classified.cookie.bare_domain();
        if !domain.is_empty() && site.contains(domain) {
            first_party.push(classified.clone());
        } else {
            third_party.push(classified.clone());
        }
    }
    (first_party, third_party)
}
