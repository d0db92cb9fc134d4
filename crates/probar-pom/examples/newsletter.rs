//! Newsletter Demo
//!
//! Models a product home page with a newsletter signup region and a
//! repeated list of product cards, against the in-memory mock driver.
//!
//! # Running
//!
//! ```bash
//! RUST_LOG=probar_pom=debug cargo run --example newsletter
//! ```

use probar_pom::prelude::*;
use probar_pom::tracing_support::init_test_tracing;
use std::sync::Arc;
use std::time::Duration;

const NEWSLETTER: Locator = Locator::id("newsletter-form");
const EMAIL: Locator = Locator::css("input[type=email]");
const SUBMIT: Locator = Locator::css("button[type=submit]");
const PRODUCT: Locator = Locator::css(".product-card");
const PRODUCT_NAME: Locator = Locator::css(".product-card h3");

/// The home page for one locale
struct Home {
    page: Page,
}

impl Home {
    fn new(driver: Arc<dyn PomDriver>, locale: &str) -> PomResult<Self> {
        let page = Page::builder(driver)
            .with_base_url("https://www.mozilla.org/")
            .with_url_template("/{locale}/")
            .with_param("locale", locale)
            .with_param("utm_source", "probar")
            .with_timeout(2_000)
            .build()?;
        Ok(Self { page })
    }

    async fn newsletter(&self) -> PomResult<Newsletter<'_>> {
        Region::load(&self.page).await
    }

    async fn products(&self) -> PomResult<Vec<Product<'_>>> {
        self.page.regions(&PRODUCT).await
    }
}

impl PageObject for Home {
    fn page(&self) -> &Page {
        &self.page
    }

    async fn loaded(&self) -> PomResult<bool> {
        self.page.is_element_displayed(&NEWSLETTER).await
    }
}

/// Signup form, found by id on every page that includes it
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

    async fn loaded(&self) -> PomResult<bool> {
        self.region.is_element_displayed(&SUBMIT).await
    }
}

impl Newsletter<'_> {
    async fn email_placeholder(&self) -> PomResult<Option<String>> {
        let email = self.region.find_element(&EMAIL).await?;
        self.page().driver().property(&email, "placeholder").await
    }
}

/// One product card
struct Product<'p> {
    region: Region<'p>,
}

impl<'p> RegionObject<'p> for Product<'p> {
    fn from_region(region: Region<'p>) -> Self {
        Self { region }
    }

    fn region(&self) -> &Region<'p> {
        &self.region
    }
}

impl Product<'_> {
    async fn name(&self) -> PomResult<String> {
        let heading = self.region.find_element(&PRODUCT_NAME).await?;
        self.page().driver().text(&heading).await
    }
}

/// Build the DOM the way a slow page would: the submit button shows up late
fn render(driver: &Arc<MockDriver>) -> PomResult<()> {
    let form = driver.insert(None, MockElement::new().matching(NEWSLETTER))?;
    let _ = driver.insert(
        Some(&form),
        MockElement::new()
            .matching(EMAIL)
            .with_property("placeholder", "yourname@example.com"),
    )?;
    for name in ["Firefox", "Thunderbird", "Mozilla VPN"] {
        let card = driver.insert(None, MockElement::new().matching(PRODUCT))?;
        let _ = driver.insert(
            Some(&card),
            MockElement::new().matching(PRODUCT_NAME).with_text(name),
        )?;
    }

    let late = Arc::clone(driver);
    let _ = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(350)).await;
        if let Err(e) = late.insert(Some(&form), MockElement::new().matching(SUBMIT)) {
            tracing::warn!(error = %e, "failed to render submit button");
        }
    });
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> PomResult<()> {
    let _ = init_test_tracing();

    println!("=== Probar POM: Newsletter Demo ===\n");

    let driver = Arc::new(MockDriver::new());
    render(&driver)?;

    let home = Home::new(driver.clone(), "en-US")?;
    println!("Seed URL: {}", home.page().seed_url().unwrap_or("<none>"));

    let started = tokio::time::Instant::now();
    let home = home.open().await?;
    println!("Opened {} in {:?}", driver.current_url().await?, started.elapsed());

    let newsletter = home.newsletter().await?;
    println!(
        "Newsletter email placeholder: {}",
        newsletter.email_placeholder().await?.unwrap_or_default()
    );

    println!("\nProducts:");
    for (i, product) in home.products().await?.iter().enumerate() {
        println!("  {}. {}", i + 1, product.name().await?);
    }

    println!("\nDriver calls: {}", driver.history().len());
    Ok(())
}
