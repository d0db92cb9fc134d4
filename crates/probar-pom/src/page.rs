//! Pages: full browsable documents.
//!
//! A [`Page`] holds the shared driver handle, the base URL, the URL
//! template and the seed URL resolved from them at construction. Page
//! object types wrap a `Page` and implement [`PageObject`], overriding
//! [`PageObject::loaded`] when "ready" means more than "navigated".
//!
//! # Example
//!
//! ```
//! use probar_pom::prelude::*;
//! use std::sync::Arc;
//!
//! struct Mozilla {
//!     page: Page,
//! }
//!
//! impl PageObject for Mozilla {
//!     fn page(&self) -> &Page {
//!         &self.page
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> probar_pom::PomResult<()> {
//! let driver = Arc::new(MockDriver::new());
//! let page = Page::builder(driver.clone())
//!     .with_base_url("https://www.mozilla.org/")
//!     .with_url_template("/{locale}/")
//!     .with_param("locale", "en-US")
//!     .build()?;
//! assert_eq!(page.seed_url(), Some("https://www.mozilla.org/en-US/"));
//!
//! let mozilla = Mozilla { page }.open().await?;
//! assert_eq!(driver.last_navigation().as_deref(), mozilla.page().seed_url());
//! # Ok(())
//! # }
//! ```

use crate::config::PomConfig;
use crate::driver::{ElementHandle, PomDriver};
use crate::locator::Locator;
use crate::result::{ErrorKind, PomError, PomResult};
use crate::url_template::{resolve_seed_url, UrlParams};
use crate::wait::{wait_until, WaitOptions, WaitResult};
use std::fmt;
use std::sync::Arc;

/// Builder for [`Page`]
pub struct PageBuilder {
    driver: Arc<dyn PomDriver>,
    base_url: Option<String>,
    url_template: Option<String>,
    params: UrlParams,
    wait: WaitOptions,
}

impl fmt::Debug for PageBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageBuilder")
            .field("base_url", &self.base_url)
            .field("url_template", &self.url_template)
            .field("params", &self.params)
            .field("wait", &self.wait)
            .finish_non_exhaustive()
    }
}

impl PageBuilder {
    /// Start building a page on `driver`
    #[must_use]
    pub fn new(driver: Arc<dyn PomDriver>) -> Self {
        Self {
            driver,
            base_url: None,
            url_template: None,
            params: UrlParams::new(),
            wait: WaitOptions::default(),
        }
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the URL template (absolute, or relative to the base URL)
    #[must_use]
    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = Some(template.into());
        self
    }

    /// Add a URL parameter
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params = self.params.param(key, value);
        self
    }

    /// Replace all URL parameters
    #[must_use]
    pub fn with_params(mut self, params: UrlParams) -> Self {
        self.params = params;
        self
    }

    /// Set the wait options used by `open` and by regions of this page
    #[must_use]
    pub fn with_wait_options(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Set the load timeout in milliseconds
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.wait.timeout_ms = timeout_ms;
        self
    }

    /// Apply base URL and wait settings from a config
    #[must_use]
    pub fn with_config(mut self, config: &PomConfig) -> Self {
        if let Some(ref base_url) = config.base_url {
            self.base_url = Some(base_url.clone());
        }
        self.wait = WaitOptions {
            ignored: self.wait.ignored,
            ..config.wait_options()
        };
        self
    }

    /// Resolve the seed URL and build the page. Does not navigate.
    ///
    /// # Errors
    ///
    /// [`PomError::MissingUrlParameter`] or [`PomError::InvalidUrl`] when the
    /// template cannot be resolved.
    pub fn build(self) -> PomResult<Page> {
        let seed_url = resolve_seed_url(
            self.base_url.as_deref(),
            self.url_template.as_deref(),
            &self.params,
        )?;
        Ok(Page {
            driver: self.driver,
            base_url: self.base_url,
            url_template: self.url_template,
            seed_url,
            wait: self.wait,
        })
    }
}

/// A full browsable document
#[derive(Clone)]
pub struct Page {
    driver: Arc<dyn PomDriver>,
    base_url: Option<String>,
    url_template: Option<String>,
    seed_url: Option<String>,
    wait: WaitOptions,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("base_url", &self.base_url)
            .field("url_template", &self.url_template)
            .field("seed_url", &self.seed_url)
            .field("wait", &self.wait)
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Start building a page
    #[must_use]
    pub fn builder(driver: Arc<dyn PomDriver>) -> PageBuilder {
        PageBuilder::new(driver)
    }

    /// Driver handle
    #[must_use]
    pub fn driver(&self) -> &dyn PomDriver {
        self.driver.as_ref()
    }

    /// Base URL
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// URL template, unresolved
    #[must_use]
    pub fn url_template(&self) -> Option<&str> {
        self.url_template.as_deref()
    }

    /// URL `open` navigates to
    #[must_use]
    pub fn seed_url(&self) -> Option<&str> {
        self.seed_url.as_deref()
    }

    /// Wait options for this page and its regions
    #[must_use]
    pub const fn wait_options(&self) -> &WaitOptions {
        &self.wait
    }

    /// First element matching `locator` anywhere in the document
    pub async fn find_element(&self, locator: &Locator) -> PomResult<ElementHandle> {
        self.driver.find_element(locator, None).await
    }

    /// Every element matching `locator` anywhere in the document
    pub async fn find_elements(&self, locator: &Locator) -> PomResult<Vec<ElementHandle>> {
        self.driver.find_elements(locator, None).await
    }

    /// Whether an element matching `locator` exists
    pub async fn is_element_present(&self, locator: &Locator) -> PomResult<bool> {
        present(self.driver.find_element(locator, None).await)
    }

    /// Whether an element matching `locator` exists and is displayed
    pub async fn is_element_displayed(&self, locator: &Locator) -> PomResult<bool> {
        displayed(self.driver(), self.driver.find_element(locator, None).await).await
    }
}

pub(crate) fn present(found: PomResult<ElementHandle>) -> PomResult<bool> {
    match found {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NoSuchElement => Ok(false),
        Err(e) => Err(e),
    }
}

pub(crate) async fn displayed(
    driver: &dyn PomDriver,
    found: PomResult<ElementHandle>,
) -> PomResult<bool> {
    match found {
        Ok(element) => driver.is_displayed(&element).await,
        Err(e) if e.kind() == ErrorKind::NoSuchElement => Ok(false),
        Err(e) => Err(e),
    }
}

/// A page object: a type built around a [`Page`].
///
/// Only [`page`](PageObject::page) is required. Override
/// [`loaded`](PageObject::loaded) to describe when the page is ready;
/// it must only read state.
#[allow(async_fn_in_trait)]
pub trait PageObject {
    /// The underlying page
    fn page(&self) -> &Page;

    /// Whether the page is ready for interaction
    async fn loaded(&self) -> PomResult<bool> {
        Ok(true)
    }

    /// Wait options bound to this page's load wait
    fn wait_options(&self) -> WaitOptions {
        self.page().wait_options().clone()
    }

    /// Name used in logs and timeout errors
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Poll [`loaded`](PageObject::loaded) until true
    ///
    /// # Errors
    ///
    /// [`PomError::Timeout`] if the page never loads, or any non-ignored
    /// error raised by `loaded`.
    async fn wait_for_page_to_load(&self) -> PomResult<WaitResult> {
        let options = self.wait_options();
        wait_until(&options, self.page_name(), || self.loaded()).await
    }

    /// Navigate to the seed URL and wait for the page to load.
    ///
    /// Always navigates, even if the browser is already on the seed URL.
    ///
    /// # Errors
    ///
    /// [`PomError::Usage`] without a seed URL, [`PomError::Navigation`] from
    /// the driver, or [`PomError::Timeout`] if the page never loads.
    async fn open(self) -> PomResult<Self>
    where
        Self: Sized,
    {
        let url = self
            .page()
            .seed_url()
            .ok_or_else(|| PomError::usage("Set a base URL or URL template to open this page."))?
            .to_string();
        tracing::debug!(page = self.page_name(), %url, "opening page");
        self.page().driver().navigate(&url).await?;
        let _ = self.wait_for_page_to_load().await?;
        Ok(self)
    }
}

impl PageObject for Page {
    fn page(&self) -> &Page {
        self
    }
}
