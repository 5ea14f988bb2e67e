//! Locators and per-page locator registries.
//!
//! A [`Locator`] is a `(strategy, value)` pair that identifies DOM nodes. It
//! carries no runtime behavior: resolution happens in the driver, and a
//! locator that matches nothing fails later in the action layer.
//!
//! Every page module declares its locators as constants and lists them in a
//! static [`LocatorRegistry`], keyed by semantic name.

use crate::result::{SuiteError, SuiteResult};
use serde::Serialize;
use std::fmt;

/// Strategy used to resolve a locator value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Element id attribute
    Id,
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
    /// Element name attribute
    Name,
}

impl Strategy {
    /// Short name used in rendered locators
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable DOM locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Locator {
    /// Resolution strategy
    pub strategy: Strategy,
    /// Strategy-specific selector value
    pub value: &'static str,
}

impl Locator {
    /// Locate by id attribute
    #[must_use]
    pub const fn id(value: &'static str) -> Self {
        Self {
            strategy: Strategy::Id,
            value,
        }
    }

    /// Locate by CSS selector
    #[must_use]
    pub const fn css(value: &'static str) -> Self {
        Self {
            strategy: Strategy::Css,
            value,
        }
    }

    /// Locate by XPath expression
    #[must_use]
    pub const fn xpath(value: &'static str) -> Self {
        Self {
            strategy: Strategy::XPath,
            value,
        }
    }

    /// Locate by name attribute
    #[must_use]
    pub const fn name(value: &'static str) -> Self {
        Self {
            strategy: Strategy::Name,
            value,
        }
    }

    /// JavaScript expression evaluating to an array of every matching node,
    /// in document order
    #[must_use]
    pub fn to_query_all(&self) -> String {
        let v = self.value;
        match self.strategy {
            Strategy::Id => format!("[document.getElementById({v:?})].filter(Boolean)"),
            Strategy::Css => format!("Array.from(document.querySelectorAll({v:?}))"),
            Strategy::Name => format!("Array.from(document.getElementsByName({v:?}))"),
            Strategy::XPath => format!(
                "(() => {{ const r = document.evaluate({v:?}, document, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); const out = []; \
                 for (let i = 0; i < r.snapshotLength; i++) {{ out.push(r.snapshotItem(i)); }} \
                 return out; }})()"
            ),
        }
    }

    /// JavaScript expression evaluating to the `index`-th match, or `undefined`
    #[must_use]
    pub fn to_query_nth(&self, index: usize) -> String {
        format!("({})[{index}]", self.to_query_all())
    }

    /// JavaScript expression evaluating to the number of matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("({}).length", self.to_query_all())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.value)
    }
}

/// Semantic name to locator table for one page concept
#[derive(Debug, Clone, Copy)]
pub struct LocatorRegistry {
    page: &'static str,
    entries: &'static [(&'static str, Locator)],
}

impl LocatorRegistry {
    /// Declare a registry
    #[must_use]
    pub const fn new(page: &'static str, entries: &'static [(&'static str, Locator)]) -> Self {
        Self { page, entries }
    }

    /// Page concept this registry belongs to
    #[must_use]
    pub const fn page(&self) -> &'static str {
        self.page
    }

    /// Look up a locator by semantic name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Locator> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, locator)| *locator)
    }

    /// Semantic names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// All entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Locator)> {
        self.entries.iter().copied()
    }

    /// Number of entries
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names declared more than once
    #[must_use]
    pub fn duplicate_names(&self) -> Vec<&'static str> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates = Vec::new();
        for name in self.names() {
            if !seen.insert(name) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }

    /// Check names are unique and every value is non-empty
    pub fn validate(&self) -> SuiteResult<()> {
        let duplicates = self.duplicate_names();
        if !duplicates.is_empty() {
            return Err(SuiteError::configuration(format!(
                "page '{}' declares duplicate locator names: {}",
                self.page,
                duplicates.join(", ")
            )));
        }
        if let Some((name, _)) = self.iter().find(|(_, l)| l.value.trim().is_empty()) {
            return Err(SuiteError::configuration(format!(
                "page '{}' locator '{name}' has an empty value",
                self.page
            )));
        }
        Ok(())
    }
}
