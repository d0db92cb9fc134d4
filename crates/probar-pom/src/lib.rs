//! Probar POM: Page Object Model for browser tests
//!
//! Describe a web application as [`Page`]s and [`Region`]s so tests talk
//! about "the newsletter form" instead of raw selectors and sleeps.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  PageObject ──owns──► Page ◄──borrows── Region ◄── Region ... │
//! │                        │                   │                  │
//! │                  seed URL (url)      RootStrategy             │
//! │                        │                   │                  │
//! │                        ▼                   ▼                  │
//! │              PomDriver (MockDriver | ChromiumDriver)          │
//! │                        ▲                                      │
//! │                  wait_until (poll until loaded)               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use probar_pom::prelude::*;
//! use std::sync::Arc;
//!
//! const NEWSLETTER: Locator = Locator::id("newsletter");
//! const EMAIL: Locator = Locator::css("input[type=email]");
//!
//! struct Newsletter<'p> {
//!     region: Region<'p>,
//! }
//!
//! impl<'p> RegionObject<'p> for Newsletter<'p> {
//!     const ROOT_LOCATOR: Option<Locator> = Some(NEWSLETTER);
//!
//!     fn from_region(region: Region<'p>) -> Self {
//!         Self { region }
//!     }
//!
//!     fn region(&self) -> &Region<'p> {
//!         &self.region
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> PomResult<()> {
//! let driver = Arc::new(MockDriver::new());
//! let form = driver.insert(None, MockElement::new().matching(NEWSLETTER))?;
//! let email = driver.insert(Some(&form), MockElement::new().matching(EMAIL))?;
//!
//! let page = Page::builder(driver.clone())
//!     .with_base_url("https://www.mozilla.org/")
//!     .build()?
//!     .open()
//!     .await?;
//! let newsletter: Newsletter<'_> = Region::load(&page).await?;
//! assert_eq!(newsletter.region().find_element(&EMAIL).await?, email);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod driver;
pub mod locator;
pub mod page;
pub mod region;
pub mod result;
pub mod tracing_support;
pub mod url_template;
pub mod wait;

pub use config::PomConfig;
#[cfg(feature = "browser")]
pub use driver::ChromiumDriver;
pub use driver::{ElementHandle, MockDriver, MockElement, PomDriver};
pub use locator::{Locator, Strategy};
pub use page::{Page, PageBuilder, PageObject};
pub use region::{Region, RegionObject, RootStrategy};
pub use result::{ErrorKind, PomError, PomResult};
pub use url_template::{resolve_seed_url, UrlParams};
pub use wait::{wait_until, WaitOptions, WaitResult};

/// Everything a page object module needs
pub mod prelude {
    pub use super::config::PomConfig;
    #[cfg(feature = "browser")]
    pub use super::driver::ChromiumDriver;
    pub use super::driver::{ElementHandle, MockDriver, MockElement, PomDriver};
    pub use super::locator::{Locator, Strategy};
    pub use super::page::{Page, PageBuilder, PageObject};
    pub use super::region::{Region, RegionObject, RootStrategy};
    pub use super::result::{ErrorKind, PomError, PomResult};
    pub use super::url_template::UrlParams;
    pub use super::wait::{WaitOptions, WaitResult};
}
