//! Locators: how to find an element.
//!
//! A [`Locator`] is an immutable `(strategy, value)` pair. Locators are
//! usually declared once per page or region type as associated constants,
//! so the constructors are `const fn` over `&'static str`:
//!
//! ```
//! use probar_pom::Locator;
//!
//! const SUBMIT: Locator = Locator::id("footer_email_submit");
//! const ITEMS: Locator = Locator::css("ul.results > li");
//! assert_eq!(SUBMIT.value(), "footer_email_submit");
//! assert_ne!(SUBMIT, ITEMS);
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Location strategy (WebDriver `By` parity, plus test IDs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
    /// `id` attribute
    Id,
    /// `name` attribute
    Name,
    /// Tag name
    TagName,
    /// Single class name
    ClassName,
    /// Exact link text
    LinkText,
    /// Substring of link text
    PartialLinkText,
    /// `data-testid` attribute
    TestId,
}

impl Strategy {
    /// Strategy name as used in error messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::Id => "id",
            Self::Name => "name",
            Self::TagName => "tag name",
            Self::ClassName => "class name",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
            Self::TestId => "test id",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable `(strategy, value)` pair describing how to find an element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    value: Cow<'static, str>,
}

impl Locator {
    /// Create a locator from a strategy and a static value
    #[must_use]
    pub const fn new(strategy: Strategy, value: &'static str) -> Self {
        Self {
            strategy,
            value: Cow::Borrowed(value),
        }
    }

    /// Create a locator from a strategy and an owned value
    #[must_use]
    pub fn owned(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: Cow::Owned(value.into()),
        }
    }

    /// CSS selector
    #[must_use]
    pub const fn css(selector: &'static str) -> Self {
        Self::new(Strategy::Css, selector)
    }

    /// XPath expression
    #[must_use]
    pub const fn xpath(expression: &'static str) -> Self {
        Self::new(Strategy::XPath, expression)
    }

    /// `id` attribute
    #[must_use]
    pub const fn id(id: &'static str) -> Self {
        Self::new(Strategy::Id, id)
    }

    /// `name` attribute
    #[must_use]
    pub const fn name(name: &'static str) -> Self {
        Self::new(Strategy::Name, name)
    }

    /// Tag name
    #[must_use]
    pub const fn tag_name(tag: &'static str) -> Self {
        Self::new(Strategy::TagName, tag)
    }

    /// Class name
    #[must_use]
    pub const fn class_name(class: &'static str) -> Self {
        Self::new(Strategy::ClassName, class)
    }

    /// Exact link text
    #[must_use]
    pub const fn link_text(text: &'static str) -> Self {
        Self::new(Strategy::LinkText, text)
    }

    /// Partial link text
    #[must_use]
    pub const fn partial_link_text(text: &'static str) -> Self {
        Self::new(Strategy::PartialLinkText, text)
    }

    /// `data-testid` attribute
    #[must_use]
    pub const fn test_id(id: &'static str) -> Self {
        Self::new(Strategy::TestId, id)
    }

    /// Location strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Selector value
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// JavaScript arrow function `(scope) => Element[]` returning every match
    /// under `scope` in document order.
    ///
    /// Values are embedded as JSON string literals, so they are always
    /// correctly quoted.
    #[must_use]
    pub fn to_js_finder(&self) -> String {
        let v = js_string(&self.value);
        match self.strategy {
            Strategy::Css => format!("(scope) => Array.from(scope.querySelectorAll({v}))"),
            Strategy::Id => {
                format!("(scope) => Array.from(scope.querySelectorAll('#' + CSS.escape({v})))")
            }
            Strategy::Name => format!(
                "(scope) => Array.from(scope.querySelectorAll('[name=\"' + CSS.escape({v}) + '\"]'))"
            ),
            Strategy::TagName => {
                format!("(scope) => Array.from(scope.getElementsByTagName({v}))")
            }
            Strategy::ClassName => {
                format!("(scope) => Array.from(scope.querySelectorAll('.' + CSS.escape({v})))")
            }
            Strategy::TestId => format!(
                "(scope) => Array.from(scope.querySelectorAll('[data-testid=\"' + CSS.escape({v}) + '\"]'))"
            ),
            Strategy::LinkText => format!(
                "(scope) => Array.from(scope.querySelectorAll('a')).filter(a => a.textContent.trim() === {v})"
            ),
            Strategy::PartialLinkText => format!(
                "(scope) => Array.from(scope.querySelectorAll('a')).filter(a => a.textContent.includes({v}))"
            ),
            Strategy::XPath => format!(
                "(scope) => {{ const r = document.evaluate({v}, scope, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
                 const out = []; for (let i = 0; i < r.snapshotLength; i++) out.push(r.snapshotItem(i)); return out; }}"
            ),
        }
    }
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::from("\"\""))
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.strategy, self.value)
    }
}
