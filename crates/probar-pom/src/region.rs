//! Regions: sub-trees of a page.
//!
//! A [`Region`] borrows its owning [`Page`] and knows how to find its root
//! element through a [`RootStrategy`]. Region object types wrap a `Region`
//! and implement [`RegionObject`]. Roots located by a locator are looked
//! up again on every access, so a re-rendered root never leaves a region
//! holding a stale handle.
//!
//! Regions nest (a region's child regions search inside its root), repeat
//! (one region per element matched by a locator) and can be shared by any
//! number of page object types.

use crate::driver::ElementHandle;
use crate::locator::Locator;
use crate::page::{displayed, present, Page};
use crate::result::PomResult;
use crate::wait::{wait_until, WaitOptions, WaitResult};
use std::fmt;

// =============================================================================
// ROOT STRATEGY
// =============================================================================

/// How a region finds its root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootStrategy {
    /// No root: the whole document
    Page,
    /// A root element handed over at construction
    Explicit(ElementHandle),
    /// Look the root up with `locator`, inside `within` or the document
    Locate {
        /// Root locator
        locator: Locator,
        /// Scope to search in
        within: Option<Box<RootStrategy>>,
    },
}

impl RootStrategy {
    /// Locate by `locator` in the whole document
    #[must_use]
    pub const fn locate(locator: Locator) -> Self {
        Self::Locate {
            locator,
            within: None,
        }
    }

    /// Locate by `locator` inside whatever `parent` resolves to
    #[must_use]
    pub fn locate_within(locator: Locator, parent: Self) -> Self {
        match parent {
            Self::Page => Self::locate(locator),
            parent => Self::Locate {
                locator,
                within: Some(Box::new(parent)),
            },
        }
    }

    /// Resolve to a root element, or `None` for the document.
    ///
    /// # Errors
    ///
    /// [`crate::PomError::NoSuchElement`] when a locator in the chain
    /// matches nothing, [`crate::PomError::StaleElement`] when an explicit
    /// root has left the document.
    pub async fn resolve(&self, page: &Page) -> PomResult<Option<ElementHandle>> {
        let mut chain = Vec::new();
        let mut current = self;
        let mut scope = loop {
            match current {
                Self::Page => break None,
                Self::Explicit(element) => break Some(element.clone()),
                Self::Locate { locator, within } => {
                    chain.push(locator);
                    match within {
                        Some(parent) => current = parent,
                        None => break None,
                    }
                }
            }
        };
        for locator in chain.into_iter().rev() {
            scope = Some(page.driver().find_element(locator, scope.as_ref()).await?);
        }
        Ok(scope)
    }
}

impl fmt::Display for RootStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page => f.write_str("<document>"),
            Self::Explicit(element) => write!(f, "{element}"),
            Self::Locate {
                locator,
                within: None,
            } => write!(f, "{locator}"),
            Self::Locate {
                locator,
                within: Some(parent),
            } => write!(f, "{parent} >> {locator}"),
        }
    }
}

// =============================================================================
// REGION
// =============================================================================

/// A sub-tree of a page, bound to its owning page for its whole life.
///
/// Regions only come out of the `load*`, `child`, `children` and
/// [`Page::regions`] constructors, which resolve the root and wait for the
/// region to load. There is no way to bind one without that:
///
/// ```compile_fail
/// use probar_pom::prelude::*;
///
/// fn bind(page: &Page) -> Region<'_> {
///     Region::new(page, RootStrategy::Page)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Region<'p> {
    page: &'p Page,
    root: RootStrategy,
}

impl<'p> Region<'p> {
    /// Bind a region to `page` without resolving its root or waiting for it
    #[must_use]
    pub(crate) const fn new(page: &'p Page, root: RootStrategy) -> Self {
        Self { page, root }
    }

    /// Build and wait for a top-level region of type `R`.
    ///
    /// The root is located with [`RegionObject::ROOT_LOCATOR`] if set,
    /// otherwise the region covers the whole page.
    ///
    /// # Errors
    ///
    /// [`crate::PomError::NoSuchElement`] if the root locator matches
    /// nothing, [`crate::PomError::Timeout`] if the region never reports
    /// loaded.
    pub async fn load<R: RegionObject<'p>>(page: &'p Page) -> PomResult<R> {
        let strategy = R::ROOT_LOCATOR.map_or(RootStrategy::Page, RootStrategy::locate);
        Self::load_with_strategy(page, strategy).await
    }

    /// Build and wait for a region of type `R` rooted at `root`.
    ///
    /// An explicit root takes precedence over the type's root locator.
    ///
    /// # Errors
    ///
    /// [`crate::PomError::Timeout`] if the region never reports loaded.
    pub async fn load_with_root<R: RegionObject<'p>>(
        page: &'p Page,
        root: ElementHandle,
    ) -> PomResult<R> {
        Self::load_with_strategy(page, RootStrategy::Explicit(root)).await
    }

    /// Build and wait for a region of type `R` with the given strategy.
    ///
    /// The root is resolved once, before the load wait starts, so a root
    /// that cannot be found fails straight away.
    ///
    /// # Errors
    ///
    /// [`crate::PomError::NoSuchElement`] or [`crate::PomError::StaleElement`]
    /// if the root cannot be resolved, [`crate::PomError::Timeout`] if the
    /// region never loads.
    pub async fn load_with_strategy<R: RegionObject<'p>>(
        page: &'p Page,
        root: RootStrategy,
    ) -> PomResult<R> {
        tracing::debug!(region = std::any::type_name::<R>(), root = %root, "loading region");
        let region = R::from_region(Region::new(page, root));
        let _ = region.region().root().await?;
        let _ = region.wait_for_region_to_load().await?;
        Ok(region)
    }

    /// Build and wait for a nested region of type `R`.
    ///
    /// With a root locator the child searches inside this region's root;
    /// without one it shares this region's root.
    ///
    /// # Errors
    ///
    /// [`crate::PomError::Timeout`] if the child never loads.
    pub async fn child<R: RegionObject<'p>>(&self) -> PomResult<R> {
        let strategy = match R::ROOT_LOCATOR {
            Some(locator) => RootStrategy::locate_within(locator, self.root.clone()),
            None => self.root.clone(),
        };
        Self::load_with_strategy(self.page, strategy).await
    }

    /// One region of type `R` per element matching `locator` inside this
    /// region's root, in document order
    ///
    /// # Errors
    ///
    /// Errors from the lookup, or [`crate::PomError::Timeout`] if any of the
    /// regions never loads.
    pub async fn children<R: RegionObject<'p>>(&self, locator: &Locator) -> PomResult<Vec<R>> {
        let roots = self.find_elements(locator).await?;
        repeat(self.page, roots).await
    }

    /// The owning page
    #[must_use]
    pub const fn page(&self) -> &'p Page {
        self.page
    }

    /// How the root is found
    #[must_use]
    pub const fn root_strategy(&self) -> &RootStrategy {
        &self.root
    }

    /// Current root element, or `None` if the region covers the document
    ///
    /// # Errors
    ///
    /// Lookup errors while resolving the root.
    pub async fn root(&self) -> PomResult<Option<ElementHandle>> {
        let root = self.root.resolve(self.page).await?;
        tracing::trace!(strategy = %self.root, ?root, "resolved region root");
        Ok(root)
    }

    /// First element matching `locator` inside the root
    ///
    /// # Errors
    ///
    /// [`crate::PomError::NoSuchElement`] if nothing matches.
    pub async fn find_element(&self, locator: &Locator) -> PomResult<ElementHandle> {
        let root = self.root().await?;
        self.page.driver().find_element(locator, root.as_ref()).await
    }

    /// Every element matching `locator` inside the root
    ///
    /// # Errors
    ///
    /// Errors resolving the root.
    pub async fn find_elements(&self, locator: &Locator) -> PomResult<Vec<ElementHandle>> {
        let root = self.root().await?;
        self.page.driver().find_elements(locator, root.as_ref()).await
    }

    /// Whether an element matching `locator` exists inside the root
    ///
    /// # Errors
    ///
    /// Errors resolving the root.
    pub async fn is_element_present(&self, locator: &Locator) -> PomResult<bool> {
        let root = self.root().await?;
        present(self.page.driver().find_element(locator, root.as_ref()).await)
    }

    /// Whether an element matching `locator` exists inside the root and is
    /// displayed
    ///
    /// # Errors
    ///
    /// Errors resolving the root.
    pub async fn is_element_displayed(&self, locator: &Locator) -> PomResult<bool> {
        let root = self.root().await?;
        let driver = self.page.driver();
        displayed(driver, driver.find_element(locator, root.as_ref()).await).await
    }
}

async fn repeat<'p, R: RegionObject<'p>>(
    page: &'p Page,
    roots: Vec<ElementHandle>,
) -> PomResult<Vec<R>> {
    let mut regions = Vec::with_capacity(roots.len());
    for root in roots {
        regions.push(Region::load_with_root(page, root).await?);
    }
    Ok(regions)
}

impl Page {
    /// One region of type `R` per element matching `locator`, in document
    /// order. An empty match gives an empty list.
    ///
    /// # Errors
    ///
    /// Errors from the lookup, or [`crate::PomError::Timeout`] if any of the
    /// regions never loads.
    pub async fn regions<'p, R: RegionObject<'p>>(
        &'p self,
        locator: &Locator,
    ) -> PomResult<Vec<R>> {
        let roots = self.find_elements(locator).await?;
        repeat(self, roots).await
    }
}

// =============================================================================
// REGION OBJECT
// =============================================================================

/// A region object: a type built around a [`Region`].
///
/// Implement [`from_region`](RegionObject::from_region) and
/// [`region`](RegionObject::region); set
/// [`ROOT_LOCATOR`](RegionObject::ROOT_LOCATOR) when the region has a fixed
/// place in the page, and override [`loaded`](RegionObject::loaded) when it
/// needs time to become ready.
#[allow(async_fn_in_trait)]
pub trait RegionObject<'p>: Sized {
    /// Locator for the root element, if the region has a fixed place
    const ROOT_LOCATOR: Option<Locator> = None;

    /// Wrap a bound region
    fn from_region(region: Region<'p>) -> Self;

    /// The bound region
    fn region(&self) -> &Region<'p>;

    /// The owning page
    fn page(&self) -> &'p Page {
        self.region().page()
    }

    /// Whether the region is ready for interaction
    async fn loaded(&self) -> PomResult<bool> {
        Ok(true)
    }

    /// Wait options for the load wait, inherited from the page by default
    fn wait_options(&self) -> WaitOptions {
        self.page().wait_options().clone()
    }

    /// Name used in logs and timeout errors
    fn region_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Poll [`loaded`](RegionObject::loaded) until true
    ///
    /// # Errors
    ///
    /// [`crate::PomError::Timeout`] if the region never loads, or any
    /// non-ignored error raised by `loaded`.
    async fn wait_for_region_to_load(&self) -> PomResult<WaitResult> {
        let options = self.wait_options();
        wait_until(&options, self.region_name(), || self.loaded()).await
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement};
    use crate::page::PageObject;
    use crate::result::ErrorKind;
    use std::sync::Arc;
    use std::time::Duration;

    const NEWSLETTER: Locator = Locator::id("newsletter");
    const EMAIL: Locator = Locator::css("input[type=email]");
    const ITEM: Locator = Locator::css("li");
    const LIST: Locator = Locator::tag_name("ul");

    fn page(driver: &Arc<MockDriver>) -> Page {
        Page::builder(driver.clone()).with_timeout(1_000).build().unwrap()
    }

    /// Newsletter signup form with a fixed root
    #[derive(Debug)]
    struct Newsletter<'p> {
        region: Region<'p>,
    }

    impl<'p> RegionObject<'p> for Newsletter<'p> {
        const ROOT_LOCATOR: Option<Locator> = Some(NEWSLETTER);

        fn from_region(region: Region<'p>) -> Self {
            Self { region }
        }

        fn region(&self) -> &Region<'p> {
            &self.region
        }
    }

    impl Newsletter<'_> {
        async fn email(&self) -> PomResult<ElementHandle> {
            self.region.find_element(&EMAIL).await
        }
    }

    /// Newsletter form that is ready once its email field is rendered
    #[derive(Debug)]
    struct Signup<'p> {
        region: Region<'p>,
    }

    impl<'p> RegionObject<'p> for Signup<'p> {
        const ROOT_LOCATOR: Option<Locator> = Some(NEWSLETTER);

        fn from_region(region: Region<'p>) -> Self {
            Self { region }
        }

        fn region(&self) -> &Region<'p> {
            &self.region
        }

        async fn loaded(&self) -> PomResult<bool> {
            self.region.is_element_present(&EMAIL).await
        }
    }

    /// Region with no fixed place
    #[derive(Debug)]
    struct Anywhere<'p> {
        region: Region<'p>,
    }

    impl<'p> RegionObject<'p> for Anywhere<'p> {
        fn from_region(region: Region<'p>) -> Self {
            Self { region }
        }

        fn region(&self) -> &Region<'p> {
            &self.region
        }
    }

    /// Ready once its root carries `data-ready`
    #[derive(Debug)]
    struct Item<'p> {
        region: Region<'p>,
    }

    impl<'p> RegionObject<'p> for Item<'p> {
        fn from_region(region: Region<'p>) -> Self {
            Self { region }
        }

        fn region(&self) -> &Region<'p> {
            &self.region
        }

        async fn loaded(&self) -> PomResult<bool> {
            let Some(root) = self.region.root().await? else {
                return Ok(false);
            };
            let ready = self.page().driver().property(&root, "data-ready").await?;
            Ok(ready.is_some())
        }
    }

    impl Item<'_> {
        async fn label(&self) -> PomResult<String> {
            let root = self.region.root().await?.expect("item has a root");
            self.page().driver().text(&root).await
        }
    }

    /// Nested list level: a `ul` inside the parent's root
    #[derive(Debug)]
    struct Level<'p> {
        region: Region<'p>,
    }

    impl<'p> RegionObject<'p> for Level<'p> {
        const ROOT_LOCATOR: Option<Locator> = Some(LIST);

        fn from_region(region: Region<'p>) -> Self {
            Self { region }
        }

        fn region(&self) -> &Region<'p> {
            &self.region
        }
    }

    mod root_tests {
        use super::*;

        #[tokio::test]
        async fn test_root_from_locator() {
            let driver = Arc::new(MockDriver::new());
            let form = driver
                .insert(None, MockElement::new().matching(NEWSLETTER))
                .unwrap();
            let page = page(&driver);
            let newsletter: Newsletter<'_> = Region::load(&page).await.unwrap();
            assert_eq!(newsletter.region().root().await.unwrap(), Some(form));
        }

        #[tokio::test]
        async fn test_no_root_covers_document() {
            let driver = Arc::new(MockDriver::new());
            let input = driver
                .insert(None, MockElement::new().matching(EMAIL))
                .unwrap();
            let page = page(&driver);
            let anywhere: Anywhere<'_> = Region::load(&page).await.unwrap();
            assert!(anywhere.region().root().await.unwrap().is_none());
            assert_eq!(anywhere.region().find_element(&EMAIL).await.unwrap(), input);
        }

        #[tokio::test]
        async fn test_explicit_root_wins_over_locator() {
            let driver = Arc::new(MockDriver::new());
            let _form = driver
                .insert(None, MockElement::new().matching(NEWSLETTER))
                .unwrap();
            let other = driver.insert(None, MockElement::new()).unwrap();
            let page = page(&driver);
            let newsletter: Newsletter<'_> =
                Region::load_with_root(&page, other.clone()).await.unwrap();
            assert_eq!(newsletter.region().root().await.unwrap(), Some(other));
            assert!(!driver.was_called("find_element"));
        }

        #[tokio::test]
        async fn test_find_is_scoped_to_root() {
            let driver = Arc::new(MockDriver::new());
            let _outside = driver
                .insert(None, MockElement::new().matching(EMAIL))
                .unwrap();
            let form = driver
                .insert(None, MockElement::new().matching(NEWSLETTER))
                .unwrap();
            let inside = driver
                .insert(Some(&form), MockElement::new().matching(EMAIL))
                .unwrap();
            let page = page(&driver);
            let newsletter: Newsletter<'_> = Region::load(&page).await.unwrap();
            assert_eq!(newsletter.email().await.unwrap(), inside);
            assert_eq!(
                newsletter.region().find_elements(&EMAIL).await.unwrap(),
                vec![inside]
            );
        }

        #[tokio::test]
        async fn test_scoped_presence_and_visibility() {
            let driver = Arc::new(MockDriver::new());
            let form = driver
                .insert(None, MockElement::new().matching(NEWSLETTER))
                .unwrap();
            let page = page(&driver);
            let newsletter: Newsletter<'_> = Region::load(&page).await.unwrap();
            assert!(!newsletter.region().is_element_present(&EMAIL).await.unwrap());

            let _input = driver
                .insert(Some(&form), MockElement::new().matching(EMAIL).hidden())
                .unwrap();
            assert!(newsletter.region().is_element_present(&EMAIL).await.unwrap());
            assert!(!newsletter.region().is_element_displayed(&EMAIL).await.unwrap());
        }

        #[tokio::test]
        async fn test_located_root_survives_rerender() {
            let driver = Arc::new(MockDriver::new());
            let form = driver
                .insert(None, MockElement::new().matching(NEWSLETTER))
                .unwrap();
            let page = page(&driver);
            let first: Newsletter<'_> = Region::load(&page).await.unwrap();

            let rendered = driver.replace(&form).unwrap();
            let second: Newsletter<'_> = Region::load(&page).await.unwrap();

            assert_eq!(second.region().root().await.unwrap(), Some(rendered.clone()));
            assert_eq!(first.region().root().await.unwrap(), Some(rendered));
        }

        #[tokio::test]
        async fn test_explicit_root_goes_stale_after_rerender() {
            let driver = Arc::new(MockDriver::new());
            let form = driver
                .insert(None, MockElement::new().matching(NEWSLETTER))
                .unwrap();
            let page = page(&driver);
            let pinned: Anywhere<'_> = Region::load_with_root(&page, form.clone()).await.unwrap();
            let _ = driver.replace(&form).unwrap();
            let err = pinned.region().find_element(&EMAIL).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::StaleElement);
        }

        #[test]
        fn test_strategy_display() {
            let nested = RootStrategy::locate_within(LIST, RootStrategy::locate(NEWSLETTER));
            assert_eq!(nested.to_string(), "id \"newsletter\" >> tag name \"ul\"");
            assert_eq!(RootStrategy::Page.to_string(), "<document>");
            assert_eq!(
                RootStrategy::locate_within(LIST, RootStrategy::Page),
                RootStrategy::locate(LIST)
            );
        }
    }

    mod load_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_missing_root_fails_without_waiting() {
            let driver = Arc::new(MockDriver::new());
            let page = page(&driver);
            let started = tokio::time::Instant::now();
            let err = Region::load::<Newsletter<'_>>(&page).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NoSuchElement);
            assert_eq!(started.elapsed(), Duration::ZERO);
            assert_eq!(driver.call_count("find_element"), 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_missing_nested_root_fails_without_waiting() {
            let driver = Arc::new(MockDriver::new());
            let _form = driver
                .insert(None, MockElement::new().matching(NEWSLETTER))
                .unwrap();
            let page = page(&driver);
            let newsletter: Newsletter<'_> = Region::load(&page).await.unwrap();
            let err = newsletter.region().child::<Level<'_>>().await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NoSuchElement);
        }

        #[tokio::test(start_paused = true)]
        async fn test_loaded_can_wait_for_content() {
            let driver = Arc::new(MockDriver::new());
            let form = driver
                .insert(None, MockElement::new().matching(NEWSLETTER))
                .unwrap();
            let page = page(&driver);

            let dom = driver.clone();
            let render = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(300)).await;
                dom.insert(Some(&form), MockElement::new().matching(EMAIL))
                    .unwrap()
            });

            let started = tokio::time::Instant::now();
            let signup: Signup<'_> = Region::load(&page).await.unwrap();
            assert!(started.elapsed() >= Duration::from_millis(300));
            let email = render.await.unwrap();
            assert_eq!(signup.region().find_element(&EMAIL).await.unwrap(), email);
        }

        #[tokio::test(start_paused = true)]
        async fn test_never_loaded_region_times_out() {
            let driver = Arc::new(MockDriver::new());
            let el = driver.insert(None, MockElement::new()).unwrap();
            let page = Page::builder(driver.clone()).with_timeout(0).build().unwrap();
            let err = Region::load_with_root::<Item<'_>>(&page, el)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Timeout);
        }

        #[tokio::test(start_paused = true)]
        async fn test_waits_for_loaded() {
            let driver = Arc::new(MockDriver::new());
            let el = driver.insert(None, MockElement::new()).unwrap();
            let page = page(&driver);

            let dom = driver.clone();
            let target = el.clone();
            let ready = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(250)).await;
                dom.set_property(&target, "data-ready", "").unwrap();
            });

            let started = tokio::time::Instant::now();
            let item: Item<'_> = Region::load_with_root(&page, el).await.unwrap();
            assert!(started.elapsed() >= Duration::from_millis(250));
            assert!(item.loaded().await.unwrap());
            ready.await.unwrap();
        }

        #[tokio::test]
        async fn test_region_wait_is_rerunnable() {
            let driver = Arc::new(MockDriver::new());
            let _form = driver
                .insert(None, MockElement::new().matching(NEWSLETTER))
                .unwrap();
            let page = page(&driver);
            let newsletter: Newsletter<'_> = Region::load(&page).await.unwrap();
            let result = newsletter.wait_for_region_to_load().await.unwrap();
            assert_eq!(result.attempts, 1);
        }
    }

    mod repeat_tests {
        use super::*;

        #[tokio::test]
        async fn test_one_region_per_match() {
            let driver = Arc::new(MockDriver::new());
            let list = driver
                .insert(None, MockElement::new().matching(LIST))
                .unwrap();
            let labels = ["Firefox", "Thunderbird", "Pocket"];
            let mut roots = Vec::new();
            for label in labels {
                roots.push(
                    driver
                        .insert(
                            Some(&list),
                            MockElement::new()
                                .matching(ITEM)
                                .with_text(label)
                                .with_property("data-ready", "true"),
                        )
                        .unwrap(),
                );
            }
            let page = page(&driver);

            let items: Vec<Item<'_>> = page.regions(&ITEM).await.unwrap();
            assert_eq!(items.len(), 3);
            for ((item, root), label) in items.iter().zip(&roots).zip(labels) {
                assert!(item.loaded().await.unwrap());
                assert_eq!(item.region().root().await.unwrap().as_ref(), Some(root));
                assert_eq!(item.label().await.unwrap(), label);
            }
        }

        #[tokio::test]
        async fn test_no_matches_gives_empty_list() {
            let driver = Arc::new(MockDriver::new());
            let page = page(&driver);
            let items: Vec<Item<'_>> = page.regions(&ITEM).await.unwrap();
            assert!(items.is_empty());
        }

        #[tokio::test]
        async fn test_children_are_scoped_to_parent_root() {
            let driver = Arc::new(MockDriver::new());
            let _stray = driver
                .insert(None, MockElement::new().matching(ITEM))
                .unwrap();
            let list = driver
                .insert(None, MockElement::new().matching(LIST))
                .unwrap();
            for _ in 0..2 {
                let _ = driver
                    .insert(
                        Some(&list),
                        MockElement::new()
                            .matching(ITEM)
                            .with_property("data-ready", "true"),
                    )
                    .unwrap();
            }
            let page = page(&driver);
            let level: Level<'_> = Region::load(&page).await.unwrap();
            let items: Vec<Item<'_>> = level.region().children(&ITEM).await.unwrap();
            assert_eq!(items.len(), 2);
        }
    }

    mod nesting_tests {
        use super::*;

        #[tokio::test]
        async fn test_nested_regions_share_owning_page() {
            let driver = Arc::new(MockDriver::new());
            let mut parent = None;
            let mut lists = Vec::new();
            for _ in 0..5 {
                let list = driver
                    .insert(parent.as_ref(), MockElement::new().matching(LIST))
                    .unwrap();
                lists.push(list.clone());
                parent = Some(list);
            }
            let page = page(&driver);

            let mut level: Level<'_> = Region::load(&page).await.unwrap();
            assert_eq!(level.region().root().await.unwrap().as_ref(), Some(&lists[0]));
            for expected in &lists[1..] {
                level = level.region().child().await.unwrap();
                assert!(std::ptr::eq(level.page(), &page));
                assert_eq!(level.region().root().await.unwrap().as_ref(), Some(expected));
            }
        }

        #[tokio::test]
        async fn test_child_without_locator_shares_parent_root() {
            let driver = Arc::new(MockDriver::new());
            let form = driver
                .insert(None, MockElement::new().matching(NEWSLETTER))
                .unwrap();
            let page = page(&driver);
            let newsletter: Newsletter<'_> = Region::load(&page).await.unwrap();
            let inner: Anywhere<'_> = newsletter.region().child().await.unwrap();
            assert_eq!(inner.region().root().await.unwrap(), Some(form));
            assert!(std::ptr::eq(inner.page(), newsletter.page()));
        }

        #[tokio::test]
        async fn test_shared_region_type_across_pages() {
            struct Home<'a> {
                page: &'a Page,
            }
            impl PageObject for Home<'_> {
                fn page(&self) -> &Page {
                    self.page
                }
            }

            let driver = Arc::new(MockDriver::new());
            let _form = driver
                .insert(None, MockElement::new().matching(NEWSLETTER))
                .unwrap();
            let home_page = page(&driver);
            let about_page = page(&driver);
            let home = Home { page: &home_page };

            let on_home: Newsletter<'_> = Region::load(home.page()).await.unwrap();
            let on_about: Newsletter<'_> = Region::load(&about_page).await.unwrap();
            assert!(std::ptr::eq(on_home.page(), &home_page));
            assert!(std::ptr::eq(on_about.page(), &about_page));
        }
    }
}
