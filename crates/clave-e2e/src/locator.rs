//! Locator abstraction: a strategy + selector pair naming one element on the
//! external page.
//!
//! Locators are the compatibility contract with the page under test: if the
//! page's markup changes, the constants in the page adapter change and
//! nothing else does. Selectors compile to JavaScript query expressions that
//! are evaluated in the page, so one strategy enum covers id, CSS, and XPath
//! lookups uniformly.

use std::fmt;

/// Selector strategy for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Element id lookup (`document.getElementById`)
    Id(String),
    /// CSS selector (e.g., `button[title='Copy password']`)
    Css(String),
    /// XPath selector
    XPath(String),
}

impl Selector {
    /// Create an id selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::XPath(selector.into())
    }

    /// Convert to a JavaScript expression yielding the first match or `null`
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Id(s) => format!("document.getElementById({s:?})"),
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::XPath(s) => {
                format!("document.evaluate({s:?}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue")
            }
        }
    }

    /// Convert to a JavaScript expression yielding an array of all matches
    #[must_use]
    pub fn to_query_all(&self) -> String {
        match self {
            Self::Id(s) => {
                format!("[document.getElementById({s:?})].filter((el) => el !== null)")
            }
            Self::Css(s) => format!("Array.from(document.querySelectorAll({s:?}))"),
            Self::XPath(s) => {
                format!(
                    "(() => {{ const r = document.evaluate({s:?}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); const out = []; for (let i = 0; i < r.snapshotLength; i += 1) {{ out.push(r.snapshotItem(i)); }} return out; }})()"
                )
            }
        }
    }

    /// Canonical `strategy:selector` key, used for logging and by the mock
    /// page's element table
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Id(s) => format!("id:{s}"),
            Self::Css(s) => format!("css:{s}"),
            Self::XPath(s) => format!("xpath:{s}"),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// A named locator: the selector plus a human label for logs and failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    label: &'static str,
}

impl Locator {
    /// Create a new locator
    #[must_use]
    pub const fn new(label: &'static str, selector: Selector) -> Self {
        Self { selector, label }
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the human label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.selector)
    }
}
