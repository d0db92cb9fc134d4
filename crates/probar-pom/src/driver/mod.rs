//! Driver boundary.
//!
//! Page objects never talk to a browser directly. Everything they need
//! from the session goes through [`PomDriver`]: navigation, scoped element
//! lookup and a few read-only element accessors. The session itself is
//! created and torn down by the caller; pages only hold a shared handle.
//!
//! # Implementations
//!
//! - [`MockDriver`] - in-memory DOM for unit tests, with stale-element simulation
//! - `ChromiumDriver` - CDP via chromiumoxide (feature `browser`)

#[cfg(feature = "browser")]
mod chromium;
mod mock;

#[cfg(feature = "browser")]
pub use chromium::ChromiumDriver;
pub use mock::{MockDriver, MockElement};

use crate::locator::Locator;
use crate::result::PomResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to a DOM node, as handed out by a driver.
///
/// A handle may go stale when its node is removed or replaced; any driver
/// call that receives a stale handle fails with
/// [`PomError::StaleElement`](crate::PomError::StaleElement).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    id: String,
}

impl ElementHandle {
    /// Create a handle from a driver-specific identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Driver-specific identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Browser session capability consumed by pages and regions.
///
/// Calls are expected to be issued sequentially; implementations may
/// serialise internally but need not support overlapping operations.
#[async_trait]
pub trait PomDriver: Send + Sync {
    /// Navigate the session to `url`
    async fn navigate(&self, url: &str) -> PomResult<()>;

    /// URL of the current document
    async fn current_url(&self) -> PomResult<String>;

    /// First element matching `locator` under `scope` (whole document if `None`)
    async fn find_element(
        &self,
        locator: &Locator,
        scope: Option<&ElementHandle>,
    ) -> PomResult<ElementHandle>;

    /// Every element matching `locator` under `scope`; empty when none match
    async fn find_elements(
        &self,
        locator: &Locator,
        scope: Option<&ElementHandle>,
    ) -> PomResult<Vec<ElementHandle>>;

    /// Whether the element is rendered and visible
    async fn is_displayed(&self, element: &ElementHandle) -> PomResult<bool>;

    /// DOM property (falling back to the attribute of the same name)
    async fn property(&self, element: &ElementHandle, name: &str) -> PomResult<Option<String>>;

    /// Rendered text of the element
    async fn text(&self, element: &ElementHandle) -> PomResult<String>;
}
